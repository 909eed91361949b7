//! # pat-board
//!
//! Rotation and assignment engine for PAT boards.
//!
//! This crate provides:
//! - Per-shift turn and count bookkeeping
//! - Zone rotation with patient and supervisor pointers
//! - Cross-zone supervisor delegation
//! - Assignment, staffing and reset operations
//! - A bounded event log where every operation can be undone
//!
//! Operations are synchronous and take the board by `&mut`; a failed
//! operation leaves the board exactly as it was.

pub mod assign;
pub mod board;
pub mod draft;
mod engine;
pub mod event;
pub mod shift;
pub mod stamp;
pub mod supervisor;
pub mod zone;

#[cfg(test)]
mod fixtures;

pub use draft::Draft;
pub use engine::Engine;
pub use event::EventParams;
pub use shift::{Turn, PAUSED_SKIP};
pub use stamp::{SequenceStamper, Stamper, SystemStamper};
pub use supervisor::SupervisorSource;
