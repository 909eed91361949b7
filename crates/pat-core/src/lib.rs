//! # pat-core
//!
//! Core types for PAT, the patient assignment tracker.
//!
//! A board holds named zones (queues of provider shifts), the shifts
//! themselves, and a short, undoable history of board events.
//!
//! ## Core Paradigm
//!
//! - The board is one value, owned by whoever holds it
//! - Zones refer to shifts by id, never by reference
//! - Every event carries what is needed to reverse it

pub mod config;
mod error;
mod types;

pub use config::{EngineConfig, SiteConfig};
pub use error::{ErrorKind, PatError, Result};
pub use types::*;
