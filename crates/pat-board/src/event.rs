//! The bounded event log

use pat_core::{BoardEvent, EventId, EventType, Patient, ShiftId};

use crate::draft::Draft;
use crate::stamp::{fresh_id, Stamper};

/// What an operation wants recorded about itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventParams {
    pub kind: EventType,
    pub message: String,
    pub patient: Option<Patient>,
    pub shift: Option<ShiftId>,
    pub supervisor_shift: Option<ShiftId>,
}

impl EventParams {
    pub fn new(kind: EventType, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            patient: None,
            shift: None,
            supervisor_shift: None,
        }
    }

    pub fn with_shift(mut self, shift_id: impl Into<String>) -> Self {
        self.shift = Some(shift_id.into());
        self
    }

    pub fn with_patient(mut self, patient: Patient) -> Self {
        self.patient = Some(patient);
        self
    }

    pub fn with_supervisor(mut self, shift_id: Option<ShiftId>) -> Self {
        self.supervisor_shift = shift_id;
        self
    }
}

/// Record a new event at the head of the timeline
///
/// The timeline is cut to `limit` entries and events that fell off it are
/// dropped from the board.
pub fn add(
    draft: &mut Draft<'_>,
    stamper: &impl Stamper,
    limit: usize,
    params: EventParams,
) -> EventId {
    let id = fresh_id(stamper, |id| draft.board().events.contains_key(id));
    draft.insert_event(BoardEvent {
        id: id.clone(),
        time: stamper.now(),
        kind: params.kind,
        message: params.message,
        patient: params.patient,
        shift: params.shift,
        supervisor_shift: params.supervisor_shift,
        inverse_patches: Vec::new(),
    });

    let timeline = draft.timeline_mut();
    timeline.insert(0, id.clone());
    timeline.truncate(limit.max(1));

    let evicted: Vec<EventId> = draft
        .board()
        .events
        .keys()
        .filter(|key| !draft.board().timeline.contains(*key))
        .cloned()
        .collect();
    for event_id in evicted {
        draft.remove_event(&event_id);
    }
    id
}
