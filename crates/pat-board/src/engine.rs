//! Transactional board operations and single-step undo
//!
//! Every public operation runs as one transaction over a [`Draft`]:
//! - on error, the draft is rolled back and the board is left exactly as it was
//! - on success, one event is recorded and carries the inverse patches
//!   needed to undo the whole operation, including events it pushed off the
//!   timeline

use pat_core::{
    ActiveSlot, Board, BoardEvent, Direction, EngineConfig, EventId, PatError, Patient, Provider,
    Result, Schedule,
};
use tracing::debug;

use crate::draft::{apply_patches, Draft};
use crate::event::{self, EventParams};
use crate::stamp::{Stamper, SystemStamper};
use crate::{assign, board as ops};

/// Runs board operations against a caller-owned [`Board`]
pub struct Engine<S: Stamper = SystemStamper> {
    config: EngineConfig,
    stamper: S,
}

impl Engine<SystemStamper> {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_stamper(config, SystemStamper)
    }
}

impl Default for Engine<SystemStamper> {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl<S: Stamper> Engine<S> {
    pub fn with_stamper(config: EngineConfig, stamper: S) -> Self {
        Self { config, stamper }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn stamper(&self) -> &S {
        &self.stamper
    }

    /// Run `recipe` as one undoable operation
    ///
    /// The recipe mutates the draft and names the event to record. Its error
    /// is returned unchanged after the board has been restored.
    pub fn transact<F>(&self, board: &mut Board, recipe: F) -> Result<EventId>
    where
        F: FnOnce(&mut Draft<'_>) -> Result<EventParams>,
    {
        let mut draft = Draft::new(board);
        let params = match recipe(&mut draft) {
            Ok(params) => params,
            Err(err) => {
                draft.rollback();
                return Err(err);
            }
        };

        let kind = params.kind;
        let event_id = event::add(&mut draft, &self.stamper, self.config.event_limit, params);
        let patches = draft.commit();
        let touched = patches.len();
        if let Some(event) = board.events.get_mut(&event_id) {
            event.inverse_patches = patches;
        }

        debug!("Committed {} event {} ({} patches)", kind, event_id, touched);
        Ok(event_id)
    }

    /// Revert the most recent event
    ///
    /// Returns the removed event with its inverse patches spent.
    pub fn undo(&self, board: &mut Board) -> Result<BoardEvent> {
        let event_id = board
            .timeline
            .first()
            .cloned()
            .ok_or(PatError::NothingToUndo)?;
        let mut event = board
            .events
            .remove(&event_id)
            .ok_or_else(|| PatError::EventNotFound(event_id.clone()))?;

        let patches = std::mem::take(&mut event.inverse_patches);
        apply_patches(board, patches);
        board.events.remove(&event_id);
        board.timeline.retain(|id| id != &event_id);

        debug!("Undid {} event {}", event.kind, event_id);
        Ok(event)
    }

    pub fn reset(&self, board: &mut Board) -> Result<EventId> {
        self.transact(board, ops::reset)
    }

    /// Sign a provider in; the new shift id is the event's `shift`
    pub fn sign_in(
        &self,
        board: &mut Board,
        provider: Provider,
        schedule: &Schedule,
    ) -> Result<EventId> {
        self.transact(board, |draft| {
            ops::sign_in(draft, &self.stamper, provider, schedule)
        })
    }

    pub fn sign_out(&self, board: &mut Board, shift_id: &str) -> Result<EventId> {
        self.transact(board, |draft| ops::sign_out(draft, shift_id))
    }

    pub fn join_zone(&self, board: &mut Board, zone_id: &str, shift_id: &str) -> Result<EventId> {
        self.transact(board, |draft| ops::join_zone(draft, zone_id, shift_id))
    }

    pub fn leave_zone(&self, board: &mut Board, zone_id: &str, shift_id: &str) -> Result<EventId> {
        self.transact(board, |draft| ops::leave_zone(draft, zone_id, shift_id))
    }

    pub fn switch_zone(
        &self,
        board: &mut Board,
        from_zone: &str,
        to_zone: &str,
        shift_id: &str,
    ) -> Result<EventId> {
        self.transact(board, |draft| {
            ops::switch_zone(draft, from_zone, to_zone, shift_id)
        })
    }

    pub fn move_active(
        &self,
        board: &mut Board,
        zone_id: &str,
        slot: ActiveSlot,
        direction: Direction,
    ) -> Result<EventId> {
        self.transact(board, |draft| ops::move_active(draft, zone_id, slot, direction))
    }

    pub fn change_position(
        &self,
        board: &mut Board,
        zone_id: &str,
        shift_id: &str,
        direction: Direction,
    ) -> Result<EventId> {
        self.transact(board, |draft| {
            ops::change_position(draft, zone_id, shift_id, direction)
        })
    }

    pub fn pause_shift(&self, board: &mut Board, shift_id: &str) -> Result<EventId> {
        self.transact(board, |draft| ops::pause_shift(draft, shift_id))
    }

    pub fn unpause_shift(&self, board: &mut Board, shift_id: &str) -> Result<EventId> {
        self.transact(board, |draft| ops::unpause_shift(draft, shift_id))
    }

    pub fn assign_to_shift(
        &self,
        board: &mut Board,
        zone_id: &str,
        shift_id: &str,
        patient: Patient,
    ) -> Result<EventId> {
        self.transact(board, |draft| {
            assign::assign_to_shift(draft, zone_id, shift_id, patient)
        })
    }

    pub fn assign_to_zone(&self, board: &mut Board, zone_id: &str, patient: Patient) -> Result<EventId> {
        self.transact(board, |draft| assign::assign_to_zone(draft, zone_id, patient))
    }

    pub fn reassign_patient(
        &self,
        board: &mut Board,
        event_id: &str,
        new_shift_id: &str,
    ) -> Result<EventId> {
        self.transact(board, |draft| {
            assign::reassign_patient(draft, event_id, new_shift_id)
        })
    }
}
