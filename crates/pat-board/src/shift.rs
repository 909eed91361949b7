//! Per-shift turn and count bookkeeping
//!
//! Everything here works on a single `Shift` and never looks at the rest of
//! the board. Turn results are reported as [`Turn`] values and it is up to the
//! caller (the zone rotation) to act on them.

use pat_core::{Patient, Shift, SUPERVISOR_COUNT};

/// Skip value meaning "off rotation until resumed"
pub const PAUSED_SKIP: u32 = u32::MAX;

/// Outcome of a turn check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    /// The shift keeps (or may take) the turn
    Continues,
    /// The rotation has to move past this shift
    Over,
}

impl Turn {
    pub fn is_over(&self) -> bool {
        matches!(self, Self::Over)
    }
}

/// Add `delta` to a count, clamping at zero
pub fn adjust_count(shift: &mut Shift, key: &str, delta: i64) {
    let current = i64::from(shift.count(key));
    let updated = (current + delta).clamp(0, i64::from(u32::MAX)) as u32;
    shift.counts.insert(key.to_string(), updated);
}

pub fn add_patient(shift: &mut Shift, patient: &Patient) {
    adjust_count(shift, &patient.mode, 1);
}

pub fn remove_patient(shift: &mut Shift, patient: &Patient) {
    adjust_count(shift, &patient.mode, -1);
}

pub fn add_supervisor(shift: &mut Shift) {
    adjust_count(shift, SUPERVISOR_COUNT, 1);
}

pub fn remove_supervisor(shift: &mut Shift) {
    adjust_count(shift, SUPERVISOR_COUNT, -1);
}

/// Offer the shift its turn, consuming one pending skip if there is one
///
/// A paused shift declines every turn without using up its pause.
pub fn start_turn(shift: &mut Shift) -> Turn {
    if shift.skip == 0 {
        return Turn::Continues;
    }
    if !is_paused(shift) {
        shift.skip -= 1;
    }
    Turn::Over
}

/// Give the shift a patient on its turn, spending bonus if any is left
pub fn add_patient_on_turn(shift: &mut Shift, patient: &Patient) -> Turn {
    add_patient(shift, patient);
    if shift.bonus == 0 {
        return Turn::Over;
    }
    shift.bonus -= 1;
    Turn::Continues
}

/// Mark the next turn to be skipped; pending skips do not stack
pub fn skip_next_turn(shift: &mut Shift) {
    if shift.skip == 0 {
        shift.skip = 1;
    }
}

pub fn pause_turn(shift: &mut Shift) {
    shift.skip = PAUSED_SKIP;
}

pub fn resume_turn(shift: &mut Shift) {
    shift.skip = 0;
}

pub fn is_paused(shift: &Shift) -> bool {
    shift.skip == PAUSED_SKIP
}

#[cfg(test)]
mod tests {
    use super::*;
    use pat_core::{Provider, Role, Schedule};

    fn make_shift(bonus: u32) -> Shift {
        let schedule = Schedule::new("6a-3p", Role::Physician).with_bonus(bonus);
        Shift::new("one", Provider::new("Jeremy", "Voros"), &schedule)
    }

    #[test]
    fn test_counts_never_negative() {
        let mut shift = make_shift(0);
        adjust_count(&mut shift, "walkin", 2);
        adjust_count(&mut shift, "walkin", -5);
        assert_eq!(shift.count("walkin"), 0);

        for delta in [-1, 3, -2, -7, 1, -100, 4] {
            adjust_count(&mut shift, "ambo", delta);
        }
        assert_eq!(shift.count("ambo"), 4);
    }

    #[test]
    fn test_patient_and_supervisor_counts() {
        let mut shift = make_shift(0);
        let patient = Patient::new("1", "walkin");
        add_patient(&mut shift, &patient);
        add_patient(&mut shift, &patient);
        remove_patient(&mut shift, &patient);
        assert_eq!(shift.count("walkin"), 1);

        add_supervisor(&mut shift);
        remove_supervisor(&mut shift);
        remove_supervisor(&mut shift);
        assert_eq!(shift.count(SUPERVISOR_COUNT), 0);
    }

    #[test]
    fn test_start_turn_consumes_skip() {
        let mut shift = make_shift(0);
        assert_eq!(start_turn(&mut shift), Turn::Continues);

        skip_next_turn(&mut shift);
        skip_next_turn(&mut shift);
        assert_eq!(shift.skip, 1);
        assert_eq!(start_turn(&mut shift), Turn::Over);
        assert_eq!(shift.skip, 0);
        assert_eq!(start_turn(&mut shift), Turn::Continues);
    }

    #[test]
    fn test_bonus_extends_turn() {
        let mut shift = make_shift(2);
        let patient = Patient::new("3", "ambo");
        assert_eq!(add_patient_on_turn(&mut shift, &patient), Turn::Continues);
        assert_eq!(add_patient_on_turn(&mut shift, &patient), Turn::Continues);
        assert_eq!(add_patient_on_turn(&mut shift, &patient), Turn::Over);
        assert_eq!(shift.bonus, 0);
        assert_eq!(shift.count("ambo"), 3);
    }

    #[test]
    fn test_pause_and_resume() {
        let mut shift = make_shift(0);
        pause_turn(&mut shift);
        assert!(is_paused(&shift));
        assert!(start_turn(&mut shift).is_over());
        assert!(start_turn(&mut shift).is_over());
        assert!(is_paused(&shift));

        skip_next_turn(&mut shift);
        assert_eq!(shift.skip, PAUSED_SKIP);

        resume_turn(&mut shift);
        assert_eq!(start_turn(&mut shift), Turn::Continues);
    }
}
