//! Core type definitions for the PAT board
//!
//! The [`Board`] is the aggregate root: it owns every [`Zone`], [`Shift`] and
//! [`BoardEvent`]. Zones refer to shifts by id only. The serialized form of a
//! `Board` is the whole persisted document.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::{PatError, Result};

/// Zone identifier
pub type ZoneId = String;

/// Shift identifier
pub type ShiftId = String;

/// Board event identifier
pub type EventId = String;

/// Count key credited when a shift supervises another provider's patient
pub const SUPERVISOR_COUNT: &str = "supervisor";

/// Zone every signed-out shift ends up in
pub const OFF_ZONE: &str = "off";

/// Provider role on a shift
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Physician,
    App,
    Resident,
}

impl Role {
    /// Only physicians can supervise
    pub fn is_physician(&self) -> bool {
        matches!(self, Self::Physician)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Physician => write!(f, "physician"),
            Self::App => write!(f, "app"),
            Self::Resident => write!(f, "resident"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "physician" | "doctor" => Ok(Self::Physician),
            "app" => Ok(Self::App),
            "resident" => Ok(Self::Resident),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

/// Zone behaviour
///
/// - `Zone`: a plain list, nobody is "up next"
/// - `ZonePatient`: first in line gets the patient
/// - `Rotation`: a movable `active.patient` pointer
/// - `RotationSuper`: rotation plus a movable `active.supervisor` pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneKind {
    #[serde(alias = "list")]
    Zone,
    #[serde(alias = "simple")]
    ZonePatient,
    Rotation,
    #[serde(alias = "supervisor")]
    RotationSuper,
}

impl ZoneKind {
    /// Whether the zone keeps an `active.patient` pointer
    pub fn rotates(&self) -> bool {
        matches!(self, Self::Rotation | Self::RotationSuper)
    }

    /// Whether the zone keeps an `active.supervisor` pointer
    pub fn supervises(&self) -> bool {
        matches!(self, Self::RotationSuper)
    }
}

impl std::fmt::Display for ZoneKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Zone => write!(f, "zone"),
            Self::ZonePatient => write!(f, "zone_patient"),
            Self::Rotation => write!(f, "rotation"),
            Self::RotationSuper => write!(f, "rotation_super"),
        }
    }
}

impl std::str::FromStr for ZoneKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "zone" | "list" => Ok(Self::Zone),
            "zone_patient" | "simple" => Ok(Self::ZonePatient),
            "rotation" => Ok(Self::Rotation),
            "rotation_super" | "supervisor" => Ok(Self::RotationSuper),
            _ => Err(format!("Invalid zone type: {}", s)),
        }
    }
}

/// Which "up next" pointer of a zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveSlot {
    Patient,
    Supervisor,
}

impl ActiveSlot {
    pub const ALL: [ActiveSlot; 2] = [ActiveSlot::Patient, ActiveSlot::Supervisor];

    /// Label used in event messages
    pub fn label(&self) -> &'static str {
        match self {
            Self::Patient => "Next Patient",
            Self::Supervisor => "Supervisor",
        }
    }
}

impl std::fmt::Display for ActiveSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Patient => write!(f, "patient"),
            Self::Supervisor => write!(f, "supervisor"),
        }
    }
}

impl std::str::FromStr for ActiveSlot {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "patient" => Ok(Self::Patient),
            "supervisor" => Ok(Self::Supervisor),
            _ => Err(format!("Invalid active slot: {}", s)),
        }
    }
}

/// Direction of travel through a rotation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Forward,
    Back,
}

impl Direction {
    /// Unit offset for circular index arithmetic
    pub fn step(&self) -> isize {
        match self {
            Self::Forward => 1,
            Self::Back => -1,
        }
    }
}

/// "Who is up next" pointers of a zone
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Active {
    #[serde(default)]
    pub patient: Option<ShiftId>,
    #[serde(default)]
    pub supervisor: Option<ShiftId>,
}

impl Active {
    pub fn get(&self, slot: ActiveSlot) -> Option<&ShiftId> {
        match slot {
            ActiveSlot::Patient => self.patient.as_ref(),
            ActiveSlot::Supervisor => self.supervisor.as_ref(),
        }
    }

    pub fn set(&mut self, slot: ActiveSlot, shift_id: Option<ShiftId>) {
        match slot {
            ActiveSlot::Patient => self.patient = shift_id,
            ActiveSlot::Supervisor => self.supervisor = shift_id,
        }
    }
}

/// A named queue of shifts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub id: ZoneId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ZoneKind,
    /// Zone that supplies this zone's supervisor; `None` means self
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub super_from: Option<ZoneId>,
    /// Roles that skip their next turn elsewhere after taking a patient here
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub trigger_skip: BTreeSet<Role>,
    /// Display position, carried for the view layer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    #[serde(default)]
    pub active: Active,
    #[serde(default)]
    pub shifts: Vec<ShiftId>,
}

impl Zone {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: ZoneKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            super_from: None,
            trigger_skip: BTreeSet::new(),
            order: None,
            active: Active::default(),
            shifts: Vec::new(),
        }
    }

    pub fn with_super_from(mut self, zone_id: impl Into<String>) -> Self {
        self.super_from = Some(zone_id.into());
        self
    }

    pub fn with_trigger_skip(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.trigger_skip = roles.into_iter().collect();
        self
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = Some(order);
        self
    }

    pub fn contains(&self, shift_id: &str) -> bool {
        self.shifts.iter().any(|id| id == shift_id)
    }

    pub fn position(&self, shift_id: &str) -> Option<usize> {
        self.shifts.iter().position(|id| id == shift_id)
    }

    /// Empty the zone and clear both pointers
    pub fn clear(&mut self) {
        self.active = Active::default();
        self.shifts.clear();
    }
}

/// The person working a shift
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Provider {
    pub first: String,
    pub last: String,
}

impl Provider {
    pub fn new(first: impl Into<String>, last: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            last: last.into(),
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.first, self.last)
    }
}

/// Sign-in template for a shift
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub bonus: u32,
    /// Zones joined on sign-in, in order
    #[serde(default)]
    pub join_zones: Vec<ZoneId>,
}

impl Schedule {
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            role,
            bonus: 0,
            join_zones: Vec::new(),
        }
    }

    pub fn with_bonus(mut self, bonus: u32) -> Self {
        self.bonus = bonus;
        self
    }

    pub fn with_zones(mut self, zones: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.join_zones = zones.into_iter().map(Into::into).collect();
        self
    }
}

/// One provider's working session on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    pub id: ShiftId,
    pub name: String,
    pub role: Role,
    pub provider: Provider,
    /// Remaining turn extensions
    #[serde(default)]
    pub bonus: u32,
    /// Pending skipped turns
    #[serde(default)]
    pub skip: u32,
    #[serde(default)]
    pub counts: BTreeMap<String, u32>,
}

impl Shift {
    pub fn new(id: impl Into<String>, provider: Provider, schedule: &Schedule) -> Self {
        Self {
            id: id.into(),
            name: schedule.name.clone(),
            role: schedule.role,
            provider,
            bonus: schedule.bonus,
            skip: 0,
            counts: BTreeMap::new(),
        }
    }

    /// Current value of a count, zero when never touched
    pub fn count(&self, key: &str) -> u32 {
        self.counts.get(key).copied().unwrap_or(0)
    }
}

/// A patient being assigned
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Patient {
    pub room: String,
    pub mode: String,
}

impl Patient {
    pub fn new(room: impl Into<String>, mode: impl Into<String>) -> Self {
        Self {
            room: room.into(),
            mode: mode.into(),
        }
    }
}

/// Kind of board event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventType {
    Reset,
    SignIn,
    SignOut,
    Join,
    Leave,
    Switched,
    Assign,
    Reassign,
    AdvanceRotation,
    ChangePosition,
    PauseShift,
    UnpauseShift,
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Reset => "reset",
            Self::SignIn => "signIn",
            Self::SignOut => "signOut",
            Self::Join => "join",
            Self::Leave => "leave",
            Self::Switched => "switched",
            Self::Assign => "assign",
            Self::Reassign => "reassign",
            Self::AdvanceRotation => "advanceRotation",
            Self::ChangePosition => "changePosition",
            Self::PauseShift => "pauseShift",
            Self::UnpauseShift => "unpauseShift",
        };
        write!(f, "{}", name)
    }
}

/// Record of the value a board branch held before a transaction
///
/// `None` means the branch did not exist and is removed on replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum InversePatch {
    Zone {
        id: ZoneId,
        value: Option<Zone>,
    },
    Shift {
        id: ShiftId,
        value: Option<Shift>,
    },
    Event {
        id: EventId,
        value: Option<Box<BoardEvent>>,
    },
    Timeline {
        value: Vec<EventId>,
    },
}

/// Audit record of one committed operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardEvent {
    pub id: EventId,
    pub time: String,
    #[serde(rename = "type")]
    pub kind: EventType,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient: Option<Patient>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift: Option<ShiftId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supervisor_shift: Option<ShiftId>,
    #[serde(default)]
    pub inverse_patches: Vec<InversePatch>,
}

/// The whole board for one site and day
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub date: String,
    #[serde(default)]
    pub zones: BTreeMap<ZoneId, Zone>,
    #[serde(default)]
    pub shifts: BTreeMap<ShiftId, Shift>,
    /// Event ids, most recent first
    #[serde(default)]
    pub timeline: Vec<EventId>,
    #[serde(default)]
    pub events: BTreeMap<EventId, BoardEvent>,
}

impl Board {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            ..Self::default()
        }
    }

    pub fn with_zone(mut self, zone: Zone) -> Self {
        self.zones.insert(zone.id.clone(), zone);
        self
    }

    pub fn zone(&self, zone_id: &str) -> Result<&Zone> {
        self.zones
            .get(zone_id)
            .ok_or_else(|| PatError::ZoneNotFound(zone_id.to_string()))
    }

    pub fn shift(&self, shift_id: &str) -> Result<&Shift> {
        self.shifts
            .get(shift_id)
            .ok_or_else(|| PatError::ShiftNotFound(shift_id.to_string()))
    }

    pub fn event(&self, event_id: &str) -> Result<&BoardEvent> {
        self.events
            .get(event_id)
            .ok_or_else(|| PatError::EventNotFound(event_id.to_string()))
    }

    /// Most recent event, if any
    pub fn latest_event(&self) -> Option<&BoardEvent> {
        self.timeline.first().and_then(|id| self.events.get(id))
    }

    /// Number of physician members of a zone
    pub fn physicians_in(&self, zone_id: &str) -> Result<usize> {
        let zone = self.zone(zone_id)?;
        let mut count = 0;
        for shift_id in &zone.shifts {
            if self.shift(shift_id)?.role.is_physician() {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Whether `events` holds exactly the ids on the timeline
    pub fn timeline_consistent(&self) -> bool {
        self.events.len() == self.timeline.len()
            && self.timeline.iter().all(|id| self.events.contains_key(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_kind_parsing() {
        assert_eq!("rotation_super".parse::<ZoneKind>().unwrap(), ZoneKind::RotationSuper);
        assert_eq!("simple".parse::<ZoneKind>().unwrap(), ZoneKind::ZonePatient);
        assert_eq!(ZoneKind::ZonePatient.to_string(), "zone_patient");
        assert!("bogus".parse::<ZoneKind>().is_err());
    }

    #[test]
    fn test_zone_kind_legacy_names_deserialize() {
        for (name, kind) in [
            ("list", ZoneKind::Zone),
            ("simple", ZoneKind::ZonePatient),
            ("supervisor", ZoneKind::RotationSuper),
        ] {
            let parsed: ZoneKind = serde_json::from_str(&format!("\"{}\"", name)).unwrap();
            assert_eq!(parsed, kind);
            assert_eq!(name.parse::<ZoneKind>().unwrap(), kind);
        }
        assert_eq!(serde_json::to_string(&ZoneKind::Zone).unwrap(), "\"zone\"");
    }

    #[test]
    fn test_zone_kind_capabilities() {
        assert!(!ZoneKind::Zone.rotates());
        assert!(!ZoneKind::ZonePatient.rotates());
        assert!(ZoneKind::Rotation.rotates());
        assert!(!ZoneKind::Rotation.supervises());
        assert!(ZoneKind::RotationSuper.rotates());
        assert!(ZoneKind::RotationSuper.supervises());
    }

    #[test]
    fn test_zone_serializes_in_board_shape() {
        let zone = Zone::new("fasttrack", "Fast Track", ZoneKind::ZonePatient)
            .with_super_from("main")
            .with_trigger_skip([Role::App]);
        let json = serde_json::to_value(&zone).unwrap();
        assert_eq!(json["type"], "zone_patient");
        assert_eq!(json["superFrom"], "main");
        assert_eq!(json["triggerSkip"][0], "app");
        assert!(json["active"]["patient"].is_null());
    }

    #[test]
    fn test_event_type_serialization() {
        let json = serde_json::to_string(&EventType::AdvanceRotation).unwrap();
        assert_eq!(json, "\"advanceRotation\"");
        assert_eq!(EventType::SignOut.to_string(), "signOut");
    }

    #[test]
    fn test_board_lookups() {
        let board = Board::new("09/25/2004").with_zone(Zone::new("off", "Off", ZoneKind::Zone));
        assert!(board.zone("off").is_ok());
        assert!(matches!(board.zone("main"), Err(PatError::ZoneNotFound(_))));
        assert!(matches!(board.shift("one"), Err(PatError::ShiftNotFound(_))));
        assert!(board.timeline_consistent());
    }

    #[test]
    fn test_shift_count_defaults_to_zero() {
        let schedule = Schedule::new("6a-3p", Role::Physician).with_bonus(2);
        let shift = Shift::new("one", Provider::new("Jeremy", "Voros"), &schedule);
        assert_eq!(shift.count("walkin"), 0);
        assert_eq!(shift.bonus, 2);
        assert_eq!(shift.provider.to_string(), "Jeremy Voros");
    }

    #[test]
    fn test_board_round_trips_through_json() {
        let board = Board::new("09/25/2004")
            .with_zone(Zone::new("main", "Main", ZoneKind::RotationSuper).with_order(10));
        let json = serde_json::to_string(&board).unwrap();
        let back: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(board, back);
    }
}
