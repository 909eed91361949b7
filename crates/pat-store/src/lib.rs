//! # pat-store
//!
//! Board persistence for PAT sites.
//!
//! The board engine never does I/O. This crate keeps each site's board in
//! a [`BoardStore`] and wraps the engine in a [`SiteBoard`], which loads the
//! board once, runs operations one at a time and saves after each change.
//!
//! ```no_run
//! use pat_core::{Patient, SiteConfig};
//! use pat_store::{JsonFileStore, SiteBoard};
//! use std::path::Path;
//!
//! # async fn example() -> pat_core::Result<()> {
//! let config = SiteConfig::load_or_default(Path::new("."))?;
//! let site = SiteBoard::from_config(&config, JsonFileStore::new(".pat/boards"));
//! site.apply(|engine, board| engine.assign_to_zone(board, "main", Patient::new("4", "ambo")))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod fail_open;
mod site;
mod store;

pub use site::SiteBoard;
pub use store::{BoardStore, JsonFileStore, MemoryStore};
