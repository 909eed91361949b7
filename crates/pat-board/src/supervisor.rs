//! Which zone supplies a zone's supervisor
//!
//! A zone with `superFrom` borrows the supervisor of that other zone;
//! otherwise it supervises itself through its own `active.supervisor`.

use pat_core::{Board, PatError, Result, Role, ShiftId, ZoneId};

use crate::draft::Draft;
use crate::{shift, zone};

/// Where a zone's supervisor comes from right now
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupervisorSource {
    /// Zone whose supervisor rotation is used
    pub zone_id: ZoneId,
    /// That zone's current supervisor
    pub shift_id: ShiftId,
}

pub fn resolve_supervisor_source(board: &Board, zone_id: &str) -> Result<SupervisorSource> {
    let zone = board.zone(zone_id)?;
    match &zone.super_from {
        Some(from) => {
            let source = board.zone(from)?;
            let shift_id = source
                .active
                .supervisor
                .clone()
                .ok_or_else(|| PatError::NoActiveSupervisor(from.clone()))?;
            Ok(SupervisorSource {
                zone_id: from.clone(),
                shift_id,
            })
        }
        None => {
            let shift_id = zone
                .active
                .supervisor
                .clone()
                .ok_or_else(|| PatError::NoSupervisorSource(zone_id.to_string()))?;
            Ok(SupervisorSource {
                zone_id: zone_id.to_string(),
                shift_id,
            })
        }
    }
}

/// Credit a supervisor when a non-physician takes a patient in `zone_id`
///
/// Returns the supervising shift, or `None` when `role` needs no supervisor.
pub fn engage_supervisor(
    draft: &mut Draft<'_>,
    zone_id: &str,
    role: Role,
) -> Result<Option<ShiftId>> {
    if role.is_physician() {
        return Ok(None);
    }
    let source = resolve_supervisor_source(draft.board(), zone_id)?;
    let supervisor = zone::provide_supervisor(draft, &source.zone_id)?;
    shift::add_supervisor(draft.shift_mut(&supervisor)?);
    Ok(Some(supervisor))
}
