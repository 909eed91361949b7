//! Zone membership and rotation
//!
//! Zones are circular queues of shift ids. Behaviour depends on the zone's
//! [`ZoneKind`]:
//!
//! - `Zone` and `ZonePatient` keep no pointers; new members go to the front
//!   and `shifts[0]` is the one up next
//! - `Rotation` keeps `active.patient`; a new member takes over the slot the
//!   current holder is in and becomes the one up next
//! - `RotationSuper` additionally keeps `active.supervisor`, which only ever
//!   points at a physician
//!
//! Rotation searches are bounded loops over the zone's members, never
//! unbounded recursion.

use pat_core::{ActiveSlot, Board, Direction, PatError, Result, ShiftId, Zone, ZoneKind};

use crate::draft::Draft;
use crate::shift::{self, Turn};

/// Laps a patient search may take: one to burn pending skips, one to land
const PATIENT_SEARCH_LAPS: usize = 2;

/// Add a shift to a zone; a no-op for members
pub fn join(draft: &mut Draft<'_>, zone_id: &str, shift_id: &str) -> Result<()> {
    let board = draft.board();
    let zone = board.zone(zone_id)?;
    let is_physician = board.shift(shift_id)?.role.is_physician();

    if zone.contains(shift_id) {
        return Ok(());
    }
    if zone.kind.supervises() && !is_physician && board.physicians_in(zone_id)? == 0 {
        return Err(PatError::PhysicianRequired {
            zone: zone_id.to_string(),
            shift: shift_id.to_string(),
        });
    }

    let zone = draft.zone_mut(zone_id)?;
    let index = match zone.kind {
        ZoneKind::Zone | ZoneKind::ZonePatient => 0,
        ZoneKind::Rotation | ZoneKind::RotationSuper => {
            let index = zone
                .active
                .patient
                .as_deref()
                .and_then(|id| zone.position(id))
                .unwrap_or(0);
            zone.active.patient = Some(shift_id.to_string());
            index
        }
    };
    if zone.kind.supervises() && is_physician && zone.active.supervisor.is_none() {
        zone.active.supervisor = Some(shift_id.to_string());
    }
    zone.shifts.insert(index, shift_id.to_string());
    Ok(())
}

/// Remove a shift from a zone, moving any pointer that rests on it first
pub fn leave(draft: &mut Draft<'_>, zone_id: &str, shift_id: &str) -> Result<()> {
    let board = draft.board();
    let zone = board.zone(zone_id)?;
    if !zone.contains(shift_id) {
        return Err(PatError::NotInZone {
            zone: zone_id.to_string(),
            shift: shift_id.to_string(),
        });
    }
    if zone.kind.supervises() && physicians_excluding(board, zone, shift_id)? == 0 {
        return Err(PatError::LastPhysician {
            zone: zone_id.to_string(),
            shift: shift_id.to_string(),
        });
    }

    let last_member = zone.shifts.len() == 1;
    for slot in ActiveSlot::ALL {
        if draft.zone(zone_id)?.active.get(slot).map(String::as_str) != Some(shift_id) {
            continue;
        }
        let next = if last_member {
            None
        } else {
            Some(next_on_leave(draft, zone_id, slot, shift_id)?)
        };
        draft.zone_mut(zone_id)?.active.set(slot, next);
    }

    draft.zone_mut(zone_id)?.shifts.retain(|id| id != shift_id);
    Ok(())
}

/// Shift `offset` places away from `shift_id`, wrapping around
pub fn find_neighbor(zone: &Zone, shift_id: &str, offset: isize) -> Result<ShiftId> {
    let index = zone.position(shift_id).ok_or_else(|| PatError::NotInZone {
        zone: zone.id.clone(),
        shift: shift_id.to_string(),
    })?;
    let len = zone.shifts.len() as isize;
    let next = (index as isize + offset).rem_euclid(len) as usize;
    Ok(zone.shifts[next].clone())
}

/// Move a rotation pointer to the next eligible shift
///
/// Supervisor pointers skip non-physicians. Patient pointers offer each
/// candidate its turn and pass over shifts that are skipping.
pub fn advance_rotation(
    draft: &mut Draft<'_>,
    zone_id: &str,
    slot: ActiveSlot,
    direction: Direction,
) -> Result<ShiftId> {
    let next = match slot {
        ActiveSlot::Supervisor => next_supervisor(draft.board(), zone_id, direction, None)?,
        ActiveSlot::Patient => next_patient(draft, zone_id, direction, None)?,
    };
    draft.zone_mut(zone_id)?.active.set(slot, Some(next.clone()));
    Ok(next)
}

/// Move one shift a single place within the zone; pointers stay put
pub fn adjust_order(
    draft: &mut Draft<'_>,
    zone_id: &str,
    shift_id: &str,
    direction: Direction,
) -> Result<()> {
    let zone = draft.zone(zone_id)?;
    let index = zone.position(shift_id).ok_or_else(|| PatError::NotInZone {
        zone: zone_id.to_string(),
        shift: shift_id.to_string(),
    })?;
    let len = zone.shifts.len() as isize;
    let target = (index as isize + direction.step()).rem_euclid(len) as usize;

    let zone = draft.zone_mut(zone_id)?;
    let moved = zone.shifts.remove(index);
    zone.shifts.insert(target, moved);
    Ok(())
}

/// Hand out the current supervisor and move the pointer on
pub fn provide_supervisor(draft: &mut Draft<'_>, zone_id: &str) -> Result<ShiftId> {
    let zone = draft.zone(zone_id)?;
    if zone.kind != ZoneKind::RotationSuper {
        return Err(PatError::NotSupervisorRotation(zone_id.to_string()));
    }
    let supervisor = zone
        .active
        .supervisor
        .clone()
        .ok_or_else(|| PatError::NoActiveSupervisor(zone_id.to_string()))?;
    advance_rotation(draft, zone_id, ActiveSlot::Supervisor, Direction::Forward)?;
    Ok(supervisor)
}

/// The shift a zone assignment goes to
pub fn active_target(board: &Board, zone_id: &str) -> Result<ShiftId> {
    let zone = board.zone(zone_id)?;
    let target = match zone.kind {
        ZoneKind::Rotation | ZoneKind::RotationSuper => zone.active.patient.clone(),
        ZoneKind::Zone | ZoneKind::ZonePatient => zone.shifts.first().cloned(),
    };
    target.ok_or_else(|| PatError::NoActiveShift {
        zone: zone_id.to_string(),
        slot: ActiveSlot::Patient.to_string(),
    })
}

fn physicians_excluding(board: &Board, zone: &Zone, shift_id: &str) -> Result<usize> {
    let mut count = 0;
    for id in zone.shifts.iter().filter(|id| id.as_str() != shift_id) {
        if board.shift(id)?.role.is_physician() {
            count += 1;
        }
    }
    Ok(count)
}

fn next_on_leave(
    draft: &mut Draft<'_>,
    zone_id: &str,
    slot: ActiveSlot,
    leaving: &str,
) -> Result<ShiftId> {
    match slot {
        ActiveSlot::Supervisor => {
            next_supervisor(draft.board(), zone_id, Direction::Forward, Some(leaving))
        }
        ActiveSlot::Patient => {
            match next_patient(draft, zone_id, Direction::Forward, Some(leaving)) {
                // everyone left is paused; the pointer still has to go somewhere
                Err(PatError::RotationExhausted(_)) => {
                    let zone = draft.zone(zone_id)?;
                    find_neighbor(zone, leaving, 1)
                }
                other => other,
            }
        }
    }
}

fn next_supervisor(
    board: &Board,
    zone_id: &str,
    direction: Direction,
    exclude: Option<&str>,
) -> Result<ShiftId> {
    let zone = board.zone(zone_id)?;
    let physicians = match exclude {
        Some(id) => physicians_excluding(board, zone, id)?,
        None => board.physicians_in(zone_id)?,
    };
    if physicians == 0 {
        return Err(PatError::NoPhysicianInZone(zone_id.to_string()));
    }
    let current = zone
        .active
        .supervisor
        .as_deref()
        .ok_or_else(|| PatError::NoActiveSupervisor(zone_id.to_string()))?;

    for step in 1..=zone.shifts.len() as isize {
        let candidate = find_neighbor(zone, current, direction.step() * step)?;
        if Some(candidate.as_str()) == exclude {
            continue;
        }
        if board.shift(&candidate)?.role.is_physician() {
            return Ok(candidate);
        }
    }
    Err(PatError::NoPhysicianInZone(zone_id.to_string()))
}

fn next_patient(
    draft: &mut Draft<'_>,
    zone_id: &str,
    direction: Direction,
    exclude: Option<&str>,
) -> Result<ShiftId> {
    let zone = draft.zone(zone_id)?;
    let current = zone
        .active
        .patient
        .clone()
        .ok_or_else(|| PatError::NoActiveShift {
            zone: zone_id.to_string(),
            slot: ActiveSlot::Patient.to_string(),
        })?;
    let probes = zone.shifts.len() * PATIENT_SEARCH_LAPS;

    for step in 1..=probes as isize {
        let candidate = find_neighbor(draft.zone(zone_id)?, &current, direction.step() * step)?;
        if Some(candidate.as_str()) == exclude {
            continue;
        }
        if shift::start_turn(draft.shift_mut(&candidate)?) == Turn::Continues {
            return Ok(candidate);
        }
    }
    Err(PatError::RotationExhausted(zone_id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{physician, sample_board};
    use crate::shift::pause_turn;
    use pat_core::Role;

    fn with_draft<T>(board: &mut Board, f: impl FnOnce(&mut Draft<'_>) -> T) -> T {
        let mut draft = Draft::new(board);
        let out = f(&mut draft);
        draft.commit();
        out
    }

    #[test]
    fn test_join_rotation_takes_active_slot() {
        let mut board = sample_board();
        board.shifts.insert("five".into(), physician("five", "Mike", "Hart"));

        with_draft(&mut board, |d| join(d, "main", "five")).unwrap();

        let main = &board.zones["main"];
        assert_eq!(main.shifts, vec!["two", "five", "one"]);
        assert_eq!(main.active.patient.as_deref(), Some("five"));
        assert_eq!(main.active.supervisor.as_deref(), Some("one"));
    }

    #[test]
    fn test_join_existing_member_is_noop() {
        let mut board = sample_board();
        let before = board.clone();
        with_draft(&mut board, |d| join(d, "main", "one")).unwrap();
        assert_eq!(board, before);
    }

    #[test]
    fn test_join_list_zone_goes_first() {
        let mut board = sample_board();
        with_draft(&mut board, |d| join(d, "off", "five")).unwrap();
        assert_eq!(board.zones["off"].shifts, vec!["five", "four"]);
        assert_eq!(board.zones["off"].active.patient, None);
    }

    #[test]
    fn test_non_physician_cannot_open_supervisor_zone() {
        let mut board = sample_board();
        board
            .zones
            .insert("peds".into(), Zone::new("peds", "Peds", ZoneKind::RotationSuper));

        let err = with_draft(&mut board, |d| join(d, "peds", "three")).unwrap_err();
        assert!(matches!(err, PatError::PhysicianRequired { .. }));

        with_draft(&mut board, |d| join(d, "peds", "five")).unwrap();
        with_draft(&mut board, |d| join(d, "peds", "three")).unwrap();
        let peds = &board.zones["peds"];
        assert_eq!(peds.active.supervisor.as_deref(), Some("five"));
        assert_eq!(peds.active.patient.as_deref(), Some("three"));
    }

    #[test]
    fn test_leave_advances_pointers_first() {
        let mut board = sample_board();
        with_draft(&mut board, |d| leave(d, "main", "one")).unwrap();

        let main = &board.zones["main"];
        assert_eq!(main.shifts, vec!["two"]);
        assert_eq!(main.active.patient.as_deref(), Some("two"));
        assert_eq!(main.active.supervisor.as_deref(), Some("two"));
    }

    #[test]
    fn test_last_physician_cannot_leave() {
        let mut board = sample_board();
        with_draft(&mut board, |d| leave(d, "main", "one")).unwrap();

        let err = with_draft(&mut board, |d| leave(d, "main", "two")).unwrap_err();
        assert!(matches!(err, PatError::LastPhysician { .. }));
    }

    #[test]
    fn test_non_physician_can_leave_with_one_physician_left() {
        let mut board = sample_board();
        with_draft(&mut board, |d| {
            join(d, "main", "three")?;
            leave(d, "main", "one")
        })
        .unwrap();
        with_draft(&mut board, |d| leave(d, "main", "three")).unwrap();
        assert_eq!(board.zones["main"].shifts, vec!["two"]);
    }

    #[test]
    fn test_leave_non_member() {
        let mut board = sample_board();
        let err = with_draft(&mut board, |d| leave(d, "main", "three")).unwrap_err();
        assert!(matches!(err, PatError::NotInZone { .. }));
    }

    #[test]
    fn test_leave_last_member_clears_pointers() {
        let mut board = sample_board();
        board
            .zones
            .insert("rot".into(), Zone::new("rot", "Rotation", ZoneKind::Rotation));
        with_draft(&mut board, |d| join(d, "rot", "three")).unwrap();
        with_draft(&mut board, |d| leave(d, "rot", "three")).unwrap();
        assert!(board.zones["rot"].shifts.is_empty());
        assert_eq!(board.zones["rot"].active.patient, None);
    }

    #[test]
    fn test_join_then_leave_round_trips() {
        let mut board = sample_board();
        board.shifts.insert("five".into(), physician("five", "Mike", "Hart"));
        let before = board.zones.clone();

        for zone_id in ["main", "off", "fasttrack"] {
            with_draft(&mut board, |d| {
                join(d, zone_id, "five")?;
                leave(d, zone_id, "five")
            })
            .unwrap();
        }
        assert_eq!(board.zones, before);
    }

    #[test]
    fn test_find_neighbor_wraps() {
        let board = sample_board();
        let main = &board.zones["main"];
        assert_eq!(find_neighbor(main, "one", 1).unwrap(), "two");
        assert_eq!(find_neighbor(main, "two", -1).unwrap(), "one");
        assert_eq!(find_neighbor(main, "two", 2).unwrap(), "two");
        assert!(matches!(
            find_neighbor(main, "six", 1),
            Err(PatError::NotInZone { .. })
        ));
    }

    #[test]
    fn test_advance_patient_passes_skipping_shift() {
        let mut board = sample_board();
        board.shifts.insert("five".into(), physician("five", "Mike", "Hart"));
        with_draft(&mut board, |d| join(d, "main", "five")).unwrap();
        // order [two, five, one], active five
        board.shifts.get_mut("one").unwrap().skip = 1;

        let next = with_draft(&mut board, |d| {
            advance_rotation(d, "main", ActiveSlot::Patient, Direction::Forward)
        })
        .unwrap();
        assert_eq!(next, "two");
        assert_eq!(board.shifts["one"].skip, 0);
    }

    #[test]
    fn test_advance_patient_backwards() {
        let mut board = sample_board();
        let next = with_draft(&mut board, |d| {
            advance_rotation(d, "main", ActiveSlot::Patient, Direction::Back)
        })
        .unwrap();
        assert_eq!(next, "two");
    }

    #[test]
    fn test_lone_skipping_shift_takes_turn_after_lap() {
        let mut board = sample_board();
        with_draft(&mut board, |d| leave(d, "main", "one")).unwrap();
        board.shifts.get_mut("two").unwrap().skip = 1;

        let next = with_draft(&mut board, |d| {
            advance_rotation(d, "main", ActiveSlot::Patient, Direction::Forward)
        })
        .unwrap();
        assert_eq!(next, "two");
        assert_eq!(board.shifts["two"].skip, 0);
    }

    #[test]
    fn test_advance_patient_all_paused() {
        let mut board = sample_board();
        pause_turn(board.shifts.get_mut("one").unwrap());
        pause_turn(board.shifts.get_mut("two").unwrap());
        let err = with_draft(&mut board, |d| {
            advance_rotation(d, "main", ActiveSlot::Patient, Direction::Forward)
        })
        .unwrap_err();
        assert!(matches!(err, PatError::RotationExhausted(_)));
    }

    #[test]
    fn test_advance_supervisor_skips_non_physicians() {
        let mut board = sample_board();
        with_draft(&mut board, |d| join(d, "main", "three")).unwrap();
        // order [two, three, one]; one wraps around to two
        let next = with_draft(&mut board, |d| {
            advance_rotation(d, "main", ActiveSlot::Supervisor, Direction::Forward)
        })
        .unwrap();
        assert_eq!(next, "two");

        // two -> one, passing three
        let next = with_draft(&mut board, |d| {
            advance_rotation(d, "main", ActiveSlot::Supervisor, Direction::Forward)
        })
        .unwrap();
        assert_eq!(next, "one");
    }

    #[test]
    fn test_supervisor_search_needs_physician() {
        let mut board = sample_board();
        let err = with_draft(&mut board, |d| {
            advance_rotation(d, "fasttrack", ActiveSlot::Supervisor, Direction::Forward)
        })
        .unwrap_err();
        assert!(matches!(err, PatError::NoPhysicianInZone(_)));
    }

    #[test]
    fn test_adjust_order() {
        let mut board = sample_board();
        with_draft(&mut board, |d| join(d, "main", "three")).unwrap();
        // [two, three, one]
        with_draft(&mut board, |d| adjust_order(d, "main", "two", Direction::Forward)).unwrap();
        assert_eq!(board.zones["main"].shifts, vec!["three", "two", "one"]);

        with_draft(&mut board, |d| adjust_order(d, "main", "one", Direction::Forward)).unwrap();
        assert_eq!(board.zones["main"].shifts, vec!["one", "three", "two"]);

        with_draft(&mut board, |d| adjust_order(d, "main", "one", Direction::Back)).unwrap();
        assert_eq!(board.zones["main"].shifts, vec!["three", "two", "one"]);
        assert_eq!(board.zones["main"].active.patient.as_deref(), Some("three"));
    }

    #[test]
    fn test_provide_supervisor() {
        let mut board = sample_board();
        let supervisor = with_draft(&mut board, |d| provide_supervisor(d, "main")).unwrap();
        assert_eq!(supervisor, "one");
        assert_eq!(board.zones["main"].active.supervisor.as_deref(), Some("two"));

        let err = with_draft(&mut board, |d| provide_supervisor(d, "fasttrack")).unwrap_err();
        assert!(matches!(err, PatError::NotSupervisorRotation(_)));
    }

    #[test]
    fn test_active_target_by_kind() {
        let board = sample_board();
        assert_eq!(active_target(&board, "main").unwrap(), "one");
        assert_eq!(active_target(&board, "fasttrack").unwrap(), "three");

        let mut board = board;
        board.zones.insert(
            "empty".into(),
            Zone::new("empty", "Empty", ZoneKind::ZonePatient),
        );
        assert!(matches!(
            active_target(&board, "empty"),
            Err(PatError::NoActiveShift { .. })
        ));
        assert_eq!(board.shift("three").unwrap().role, Role::App);
    }
}
