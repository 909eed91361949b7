//! Sample board shared by the unit tests
//!
//! Zones: `off` (list, holds `four`), `main` (supervisor rotation, `[two,
//! one]`, `one` up next and supervising) and `fasttrack` (first-in-line,
//! supervised from `main`, APPs skip their next turn after a patient here).
//! Shift `five` is signed in but in no zone.

use pat_core::{
    Active, Board, BoardEvent, EventType, Patient, Provider, Role, Schedule, Shift, Zone,
    ZoneKind,
};

pub fn physician(id: &str, first: &str, last: &str) -> Shift {
    let schedule = Schedule::new("8a-6p", Role::Physician).with_bonus(2);
    Shift::new(id, Provider::new(first, last), &schedule)
}

pub fn app(id: &str, first: &str, last: &str) -> Shift {
    let schedule = Schedule::new("6a-3p APP", Role::App);
    Shift::new(id, Provider::new(first, last), &schedule)
}

fn assign_event(id: &str, shift: &str, supervisor: Option<&str>, patient: Patient) -> BoardEvent {
    BoardEvent {
        id: id.to_string(),
        time: "07:30".to_string(),
        kind: EventType::Assign,
        message: format!("Room {} assigned", patient.room),
        patient: Some(patient),
        shift: Some(shift.to_string()),
        supervisor_shift: supervisor.map(str::to_string),
        inverse_patches: Vec::new(),
    }
}

pub fn sample_board() -> Board {
    let mut off = Zone::new("off", "Off", ZoneKind::Zone);
    off.shifts = vec!["four".into()];

    let mut main = Zone::new("main", "Main", ZoneKind::RotationSuper);
    main.active = Active {
        patient: Some("one".into()),
        supervisor: Some("one".into()),
    };
    main.shifts = vec!["two".into(), "one".into()];

    let mut fasttrack = Zone::new("fasttrack", "Fast Track", ZoneKind::ZonePatient)
        .with_super_from("main")
        .with_trigger_skip([Role::App]);
    fasttrack.shifts = vec!["three".into()];

    let mut one = physician("one", "Jeremy", "Voros");
    one.name = "6a-3p".into();
    for key in ["walkin", "ambo", "ft", "supervisor"] {
        one.counts.insert(key.into(), 1);
    }

    let mut board = Board::new("09/25/2004")
        .with_zone(off)
        .with_zone(main)
        .with_zone(fasttrack);
    for shift in [
        one,
        physician("two", "Kelly", "Blake"),
        app("three", "Shelley", "Cheever"),
        app("four", "Brian", "Kasavana"),
        physician("five", "Mike", "Hart"),
    ] {
        board.shifts.insert(shift.id.clone(), shift);
    }

    let moved = BoardEvent {
        id: "two".into(),
        time: "07:15".into(),
        kind: EventType::ChangePosition,
        message: "Jeremy Voros moved up in Main".into(),
        patient: None,
        shift: Some("one".into()),
        supervisor_shift: None,
        inverse_patches: Vec::new(),
    };
    for event in [
        assign_event("one", "three", Some("two"), Patient::new("Tr A", "walkin")),
        moved,
        assign_event("three", "one", None, Patient::new("4", "ambo")),
    ] {
        board.events.insert(event.id.clone(), event);
    }
    board.timeline = vec!["three".into(), "two".into(), "one".into()];
    board
}
