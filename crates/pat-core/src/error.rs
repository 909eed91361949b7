//! Unified error types for PAT

use thiserror::Error;

/// Unified error type for all board operations
#[derive(Error, Debug)]
pub enum PatError {
    // Missing references
    #[error("Zone not found: {0}")]
    ZoneNotFound(String),

    #[error("Shift not found: {0}")]
    ShiftNotFound(String),

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("Zone {zone} does not contain shift {shift}")]
    NotInZone { zone: String, shift: String },

    // Invariant violations
    #[error("Shift {shift} is the last physician in zone {zone}")]
    LastPhysician { zone: String, shift: String },

    #[error("Cannot add shift {shift}: zone {zone} needs a physician first")]
    PhysicianRequired { zone: String, shift: String },

    #[error("Zone {0} has no superFrom and no active supervisor")]
    NoSupervisorSource(String),

    #[error("Zone {0} does not have an active supervisor")]
    NoActiveSupervisor(String),

    #[error("Zone {zone} has no active {slot}")]
    NoActiveShift { zone: String, slot: String },

    #[error("Zone {0} is not a supervisor rotation")]
    NotSupervisorRotation(String),

    #[error("Event {0} has no patient")]
    EventMissingPatient(String),

    #[error("Event {0} has no shift")]
    EventMissingShift(String),

    // Search exhaustion
    #[error("No physicians in zone {0}, cannot find next supervisor")]
    NoPhysicianInZone(String),

    #[error("Every shift in zone {0} is skipping, cannot advance rotation")]
    RotationExhausted(String),

    // Undo
    #[error("Nothing to undo")]
    NothingToUndo,

    // Ambient
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Broad classes of [`PatError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A zone, shift or event id did not resolve
    MissingReference,
    /// The operation would break a board invariant
    InvariantViolation,
    /// A bounded rotation search found no candidate
    SearchExhausted,
    /// Configuration, storage and serialization failures
    Ambient,
}

impl PatError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ZoneNotFound(_)
            | Self::ShiftNotFound(_)
            | Self::EventNotFound(_)
            | Self::NotInZone { .. } => ErrorKind::MissingReference,
            Self::LastPhysician { .. }
            | Self::PhysicianRequired { .. }
            | Self::NoSupervisorSource(_)
            | Self::NoActiveSupervisor(_)
            | Self::NoActiveShift { .. }
            | Self::NotSupervisorRotation(_)
            | Self::EventMissingPatient(_)
            | Self::EventMissingShift(_)
            | Self::NothingToUndo => ErrorKind::InvariantViolation,
            Self::NoPhysicianInZone(_) | Self::RotationExhausted(_) => ErrorKind::SearchExhausted,
            Self::Config(_) | Self::Store(_) | Self::Io(_) | Self::Serialization(_) => {
                ErrorKind::Ambient
            }
        }
    }
}

/// Result type alias using PatError
pub type Result<T> = std::result::Result<T, PatError>;
