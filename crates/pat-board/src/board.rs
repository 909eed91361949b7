//! Staffing operations: sign in and out, zone moves, pointer nudges, pause
//! and reset.
//!
//! Like [`crate::assign`], every function here is the body of one board
//! operation and returns the event it wants recorded.

use pat_core::{
    ActiveSlot, Direction, EventId, EventType, Provider, Result, Schedule, Shift, ShiftId, ZoneId,
    OFF_ZONE,
};

use crate::draft::Draft;
use crate::event::EventParams;
use crate::stamp::{fresh_id, Stamper};
use crate::{shift, zone};

fn provider_of(draft: &Draft<'_>, shift_id: &str) -> Result<Provider> {
    Ok(draft.shift(shift_id)?.provider.clone())
}

/// Create a shift from a schedule and put it in the schedule's zones
pub fn sign_in(
    draft: &mut Draft<'_>,
    stamper: &impl Stamper,
    provider: Provider,
    schedule: &Schedule,
) -> Result<EventParams> {
    let shift_id = fresh_id(stamper, |id| draft.board().shifts.contains_key(id));
    let message = format!("{} signed in.", provider);
    draft.insert_shift(Shift::new(shift_id.clone(), provider, schedule));
    for zone_id in &schedule.join_zones {
        zone::join(draft, zone_id, &shift_id)?;
    }
    Ok(EventParams::new(EventType::SignIn, message).with_shift(shift_id))
}

/// Take a shift out of every zone and park it in the off zone
pub fn sign_out(draft: &mut Draft<'_>, shift_id: &str) -> Result<EventParams> {
    let provider = provider_of(draft, shift_id)?;
    let zones: Vec<ZoneId> = draft
        .board()
        .zones
        .values()
        .filter(|zone| zone.id != OFF_ZONE && zone.contains(shift_id))
        .map(|zone| zone.id.clone())
        .collect();
    for zone_id in &zones {
        zone::leave(draft, zone_id, shift_id)?;
    }
    zone::join(draft, OFF_ZONE, shift_id)?;
    Ok(EventParams::new(EventType::SignOut, format!("{} signed out.", provider)).with_shift(shift_id))
}

pub fn join_zone(draft: &mut Draft<'_>, zone_id: &str, shift_id: &str) -> Result<EventParams> {
    let provider = provider_of(draft, shift_id)?;
    let name = draft.zone(zone_id)?.name.clone();
    zone::join(draft, zone_id, shift_id)?;
    Ok(EventParams::new(EventType::Join, format!("{} joined {}.", provider, name)).with_shift(shift_id))
}

pub fn leave_zone(draft: &mut Draft<'_>, zone_id: &str, shift_id: &str) -> Result<EventParams> {
    let provider = provider_of(draft, shift_id)?;
    let name = draft.zone(zone_id)?.name.clone();
    zone::leave(draft, zone_id, shift_id)?;
    Ok(EventParams::new(EventType::Leave, format!("{} left {}.", provider, name)).with_shift(shift_id))
}

pub fn switch_zone(
    draft: &mut Draft<'_>,
    from_zone: &str,
    to_zone: &str,
    shift_id: &str,
) -> Result<EventParams> {
    let provider = provider_of(draft, shift_id)?;
    let from_name = draft.zone(from_zone)?.name.clone();
    let to_name = draft.zone(to_zone)?.name.clone();
    zone::leave(draft, from_zone, shift_id)?;
    zone::join(draft, to_zone, shift_id)?;
    Ok(EventParams::new(
        EventType::Switched,
        format!("{} left {} to join {}.", provider, from_name, to_name),
    )
    .with_shift(shift_id))
}

/// Nudge one of a zone's pointers by hand
pub fn move_active(
    draft: &mut Draft<'_>,
    zone_id: &str,
    slot: ActiveSlot,
    direction: Direction,
) -> Result<EventParams> {
    let landed: ShiftId = zone::advance_rotation(draft, zone_id, slot, direction)?;
    let provider = provider_of(draft, &landed)?;
    let verb = match direction {
        Direction::Forward => "forward to",
        Direction::Back => "back to",
    };
    Ok(EventParams::new(
        EventType::AdvanceRotation,
        format!("{} moved {} {}.", slot.label(), verb, provider),
    )
    .with_shift(landed))
}

pub fn change_position(
    draft: &mut Draft<'_>,
    zone_id: &str,
    shift_id: &str,
    direction: Direction,
) -> Result<EventParams> {
    zone::adjust_order(draft, zone_id, shift_id, direction)?;
    let provider = provider_of(draft, shift_id)?;
    let name = &draft.zone(zone_id)?.name;
    let verb = match direction {
        Direction::Forward => "up",
        Direction::Back => "back",
    };
    Ok(EventParams::new(
        EventType::ChangePosition,
        format!("{} moved {} in {}", provider, verb, name),
    )
    .with_shift(shift_id))
}

/// Take a shift off rotation without removing it from its zones
pub fn pause_shift(draft: &mut Draft<'_>, shift_id: &str) -> Result<EventParams> {
    let target = draft.shift_mut(shift_id)?;
    shift::pause_turn(target);
    let message = format!("{} paused.", target.provider);
    Ok(EventParams::new(EventType::PauseShift, message).with_shift(shift_id))
}

pub fn unpause_shift(draft: &mut Draft<'_>, shift_id: &str) -> Result<EventParams> {
    let target = draft.shift_mut(shift_id)?;
    shift::resume_turn(target);
    let message = format!("{} unpaused.", target.provider);
    Ok(EventParams::new(EventType::UnpauseShift, message).with_shift(shift_id))
}

/// Empty every zone and drop all shifts and history
pub fn reset(draft: &mut Draft<'_>) -> Result<EventParams> {
    let zones: Vec<ZoneId> = draft.board().zones.keys().cloned().collect();
    for zone_id in &zones {
        draft.zone_mut(zone_id)?.clear();
    }
    let shifts: Vec<ShiftId> = draft.board().shifts.keys().cloned().collect();
    for shift_id in &shifts {
        draft.remove_shift(shift_id);
    }
    let events: Vec<EventId> = draft.board().events.keys().cloned().collect();
    for event_id in &events {
        draft.remove_event(event_id);
    }
    draft.timeline_mut().clear();
    Ok(EventParams::new(EventType::Reset, "Board Reset"))
}
