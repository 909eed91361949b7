//! Working view of a board inside a transaction
//!
//! A [`Draft`] mutates the board in place but remembers, the first time any
//! zone, shift, event or the timeline is borrowed mutably, what that branch
//! looked like before. Those records are the transaction's inverse patches:
//! replaying them restores the board exactly, whether the transaction is
//! being rolled back after an error or undone later.
//!
//! Reads go through [`Draft::board`] and are never recorded.

use pat_core::{Board, BoardEvent, EventId, InversePatch, PatError, Result, Shift, Zone};
use std::collections::HashSet;

pub struct Draft<'a> {
    board: &'a mut Board,
    patches: Vec<InversePatch>,
    zones: HashSet<String>,
    shifts: HashSet<String>,
    events: HashSet<String>,
    timeline: bool,
}

impl<'a> Draft<'a> {
    pub fn new(board: &'a mut Board) -> Self {
        Self {
            board,
            patches: Vec::new(),
            zones: HashSet::new(),
            shifts: HashSet::new(),
            events: HashSet::new(),
            timeline: false,
        }
    }

    pub fn board(&self) -> &Board {
        self.board
    }

    pub fn zone(&self, zone_id: &str) -> Result<&Zone> {
        self.board.zone(zone_id)
    }

    pub fn shift(&self, shift_id: &str) -> Result<&Shift> {
        self.board.shift(shift_id)
    }

    pub fn zone_mut(&mut self, zone_id: &str) -> Result<&mut Zone> {
        self.record_zone(zone_id);
        self.board
            .zones
            .get_mut(zone_id)
            .ok_or_else(|| PatError::ZoneNotFound(zone_id.to_string()))
    }

    pub fn shift_mut(&mut self, shift_id: &str) -> Result<&mut Shift> {
        self.record_shift(shift_id);
        self.board
            .shifts
            .get_mut(shift_id)
            .ok_or_else(|| PatError::ShiftNotFound(shift_id.to_string()))
    }

    pub fn event_mut(&mut self, event_id: &str) -> Result<&mut BoardEvent> {
        self.record_event(event_id, false);
        self.board
            .events
            .get_mut(event_id)
            .ok_or_else(|| PatError::EventNotFound(event_id.to_string()))
    }

    pub fn timeline_mut(&mut self) -> &mut Vec<EventId> {
        if !self.timeline {
            self.timeline = true;
            self.patches.push(InversePatch::Timeline {
                value: self.board.timeline.clone(),
            });
        }
        &mut self.board.timeline
    }

    pub fn insert_shift(&mut self, shift: Shift) {
        self.record_shift(&shift.id);
        self.board.shifts.insert(shift.id.clone(), shift);
    }

    pub fn remove_shift(&mut self, shift_id: &str) -> Option<Shift> {
        self.record_shift(shift_id);
        self.board.shifts.remove(shift_id)
    }

    pub fn insert_event(&mut self, event: BoardEvent) {
        self.record_event(&event.id, false);
        self.board.events.insert(event.id.clone(), event);
    }

    pub fn remove_event(&mut self, event_id: &str) -> Option<BoardEvent> {
        self.record_event(event_id, true);
        self.board.events.remove(event_id)
    }

    /// Keep the changes and hand back what it takes to reverse them
    pub fn commit(self) -> Vec<InversePatch> {
        self.patches
    }

    /// Throw the changes away, leaving the board as it was
    pub fn rollback(self) {
        apply_patches(self.board, self.patches);
    }

    fn record_zone(&mut self, zone_id: &str) {
        if self.zones.insert(zone_id.to_string()) {
            self.patches.push(InversePatch::Zone {
                id: zone_id.to_string(),
                value: self.board.zones.get(zone_id).cloned(),
            });
        }
    }

    fn record_shift(&mut self, shift_id: &str) {
        if self.shifts.insert(shift_id.to_string()) {
            self.patches.push(InversePatch::Shift {
                id: shift_id.to_string(),
                value: self.board.shifts.get(shift_id).cloned(),
            });
        }
    }

    /// Removed events are recorded with [`shallow_event`]
    fn record_event(&mut self, event_id: &str, removing: bool) {
        if self.events.insert(event_id.to_string()) {
            let prior = self.board.events.get(event_id);
            let value = if removing {
                prior.map(shallow_event)
            } else {
                prior.cloned().map(Box::new)
            };
            self.patches.push(InversePatch::Event {
                id: event_id.to_string(),
                value,
            });
        }
    }
}

/// Copy of an event whose own inverse patches keep only flat event bodies
///
/// An event pushed off the timeline is recorded inside the patches of the
/// event that pushed it. Dropping the patches of events nested one level
/// down keeps that chain from growing with every operation.
fn shallow_event(event: &BoardEvent) -> Box<BoardEvent> {
    let mut copy = event.clone();
    for patch in &mut copy.inverse_patches {
        if let InversePatch::Event { value: Some(nested), .. } = patch {
            nested.inverse_patches.clear();
        }
    }
    Box::new(copy)
}

/// Replay inverse patches onto a board, most recent record first
pub fn apply_patches(board: &mut Board, patches: Vec<InversePatch>) {
    for patch in patches.into_iter().rev() {
        match patch {
            InversePatch::Zone { id, value } => match value {
                Some(zone) => {
                    board.zones.insert(id, zone);
                }
                None => {
                    board.zones.remove(&id);
                }
            },
            InversePatch::Shift { id, value } => match value {
                Some(shift) => {
                    board.shifts.insert(id, shift);
                }
                None => {
                    board.shifts.remove(&id);
                }
            },
            InversePatch::Event { id, value } => match value {
                Some(event) => {
                    board.events.insert(id, *event);
                }
                None => {
                    board.events.remove(&id);
                }
            },
            InversePatch::Timeline { value } => board.timeline = value,
        }
    }
}
