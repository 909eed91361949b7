//! Identifiers and timestamps for new shifts and events

use chrono::Local;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Length of generated ids
const SHORT_ID_LEN: usize = 6;

/// Source of ids and display times
pub trait Stamper {
    /// A new id; callers retry on collision
    fn next_id(&self) -> String;

    /// Display time for an event
    fn now(&self) -> String;
}

/// Short random ids and local wall-clock times
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemStamper;

impl Stamper for SystemStamper {
    fn next_id(&self) -> String {
        Uuid::new_v4().simple().to_string()[..SHORT_ID_LEN].to_string()
    }

    fn now(&self) -> String {
        Local::now().format("%H:%M").to_string()
    }
}

/// Predictable ids (`{prefix}1`, `{prefix}2`, ...) and a fixed time
#[derive(Debug)]
pub struct SequenceStamper {
    prefix: String,
    time: String,
    next: AtomicU64,
}

impl SequenceStamper {
    pub fn new(prefix: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            time: time.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl Stamper for SequenceStamper {
    fn next_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}{}", self.prefix, n)
    }

    fn now(&self) -> String {
        self.time.clone()
    }
}

/// Draw ids until one is not taken
pub fn fresh_id(stamper: &impl Stamper, taken: impl Fn(&str) -> bool) -> String {
    loop {
        let id = stamper.next_id();
        if !taken(&id) {
            return id;
        }
    }
}
