//! Patient assignment and reassignment
//!
//! Each function is the body of one board operation: it mutates the draft
//! and returns the event to record. Non-physician assignments are credited
//! to a supervisor through [`supervisor::engage_supervisor`].

use pat_core::{ActiveSlot, Direction, EventType, PatError, Patient, Result, Shift, ShiftId};

use crate::draft::Draft;
use crate::event::EventParams;
use crate::{shift, supervisor, zone};

fn assign_params(shift: &Shift, supervisor: Option<ShiftId>, patient: Patient) -> EventParams {
    EventParams::new(
        EventType::Assign,
        format!("Room {} assigned to {}", patient.room, shift.provider),
    )
    .with_shift(shift.id.clone())
    .with_supervisor(supervisor)
    .with_patient(patient)
}

/// Give a patient to a specific shift, whatever the rotation says
pub fn assign_to_shift(
    draft: &mut Draft<'_>,
    zone_id: &str,
    shift_id: &str,
    patient: Patient,
) -> Result<EventParams> {
    draft.zone(zone_id)?;
    let target = draft.shift_mut(shift_id)?;
    shift::add_patient(target, &patient);
    let role = target.role;

    let supervisor = supervisor::engage_supervisor(draft, zone_id, role)?;
    Ok(assign_params(draft.shift(shift_id)?, supervisor, patient))
}

/// Give a patient to whoever is up next in a zone
///
/// The rotation only moves on once the shift has used up its bonus turns.
pub fn assign_to_zone(draft: &mut Draft<'_>, zone_id: &str, patient: Patient) -> Result<EventParams> {
    let target_id = zone::active_target(draft.board(), zone_id)?;
    let (kind, trigger_skip) = {
        let zone = draft.zone(zone_id)?;
        (zone.kind, zone.trigger_skip.clone())
    };

    let target = draft.shift_mut(&target_id)?;
    let turn = shift::add_patient_on_turn(target, &patient);
    let role = target.role;
    if turn.is_over() && kind.rotates() {
        zone::advance_rotation(draft, zone_id, ActiveSlot::Patient, Direction::Forward)?;
    }
    if trigger_skip.contains(&role) {
        shift::skip_next_turn(draft.shift_mut(&target_id)?);
    }

    let supervisor = supervisor::engage_supervisor(draft, zone_id, role)?;
    Ok(assign_params(draft.shift(&target_id)?, supervisor, patient))
}

/// Hand the patient of an earlier assignment over to another shift
///
/// The earlier event is amended to `reassign` and a fresh `assign` event is
/// returned for the new holder.
pub fn reassign_patient(
    draft: &mut Draft<'_>,
    event_id: &str,
    new_shift_id: &str,
) -> Result<EventParams> {
    let event = draft.board().event(event_id)?;
    let patient = event
        .patient
        .clone()
        .ok_or_else(|| PatError::EventMissingPatient(event_id.to_string()))?;
    let old_shift_id = event
        .shift
        .clone()
        .ok_or_else(|| PatError::EventMissingShift(event_id.to_string()))?;
    let carried = event.supervisor_shift.clone();

    let new_role = draft.shift(new_shift_id)?.role;
    let old_role = draft.shift(&old_shift_id)?.role;

    shift::add_patient(draft.shift_mut(new_shift_id)?, &patient);
    shift::remove_patient(draft.shift_mut(&old_shift_id)?, &patient);

    let message = format!("Reassigned to: {}", draft.shift(new_shift_id)?.provider);
    let prior = draft.event_mut(event_id)?;
    prior.kind = EventType::Reassign;
    prior.message = message;

    let supervisor = match (new_role.is_physician(), old_role.is_physician()) {
        (true, _) => None,
        (false, true) => {
            shift::add_supervisor(draft.shift_mut(&old_shift_id)?);
            Some(old_shift_id)
        }
        (false, false) => carried,
    };
    Ok(assign_params(draft.shift(new_shift_id)?, supervisor, patient))
}
