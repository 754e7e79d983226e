//! Unit tests for the mission and panel models.

use mission_board::models::{
    Area, Endpoint, Leg, Mission, MissionRecord, MissionStatus, MissionType, PanelConfig, Stage,
};
use mission_board::AppError;

fn area(code: &str) -> Area {
    Area::parse(code).expect("valid area")
}

fn pending_send_record() -> MissionRecord {
    MissionRecord {
        id: 7,
        robot_name: None,
        start_point: Some(area("A1")),
        destination: None,
        status: MissionStatus::Pending,
        mission_type: MissionType::Send,
        cargo_type: Some("boxes".into()),
        number_of_pieces: Some(3),
        created_by_panel_id: Some("P1".into()),
        assigned_to_panel_id: None,
    }
}

fn queued_record() -> MissionRecord {
    MissionRecord {
        id: 8,
        robot_name: Some("AMR-01".into()),
        start_point: Some(area("A1")),
        destination: Some(area("X1")),
        status: MissionStatus::InQueue,
        mission_type: MissionType::Send,
        cargo_type: None,
        number_of_pieces: None,
        created_by_panel_id: Some("P1".into()),
        assigned_to_panel_id: Some("P2".into()),
    }
}

// ── Area ─────────────────────────────────────────────────

#[test]
fn area_accepts_bare_and_prefixed_codes() {
    assert_eq!(area("A1"), area("Point A1"));
    assert_eq!(area("Point A1").code(), "A1");
    assert_eq!(area("A1").to_point_ref(), "Point A1");
    assert_eq!(area("  C3").to_string(), "C3");
}

#[test]
fn area_rejects_blank_code() {
    let err = Area::parse("   ").expect_err("blank code");
    assert!(matches!(err, AppError::Validation(_)));
}

#[test]
fn area_serializes_as_bare_code() {
    let json = serde_json::to_string(&vec![area("A1"), area("B2")]).expect("serialize");
    assert_eq!(json, r#"["A1","B2"]"#);

    let parsed: Vec<Area> = serde_json::from_str(r#"["Point A1","B2"]"#).expect("deserialize");
    assert_eq!(parsed, vec![area("A1"), area("B2")]);
}

// ── Status and type ──────────────────────────────────────

#[test]
fn status_uses_display_strings_on_the_wire() {
    let json = serde_json::to_string(&MissionStatus::InQueue).expect("serialize");
    assert_eq!(json, r#""In queue""#);
    assert_eq!(
        MissionStatus::parse("In queue").expect("parse"),
        MissionStatus::InQueue
    );
    assert_eq!(MissionStatus::Completed.to_string(), "Completed");
}

#[test]
fn unknown_status_is_a_data_integrity_error() {
    let err = MissionStatus::parse("Lost").expect_err("unknown status");
    assert!(matches!(err, AppError::DataIntegrity(_)));

    let err = MissionType::parse("Fetch").expect_err("unknown type");
    assert!(matches!(err, AppError::DataIntegrity(_)));
}

#[test]
fn only_queued_and_active_missions_auto_advance() {
    assert!(!MissionStatus::Pending.auto_advances());
    assert!(MissionStatus::InQueue.auto_advances());
    assert!(MissionStatus::Active.auto_advances());
    assert!(!MissionStatus::Completed.auto_advances());
}

#[test]
fn counterpart_swaps_roles() {
    assert_eq!(MissionType::Send.counterpart(), MissionType::Receive);
    assert_eq!(MissionType::Receive.counterpart(), MissionType::Send);
}

// ── Stage ────────────────────────────────────────────────

#[test]
fn stage_advances_forward_only() {
    let leg = Leg {
        start: area("A1"),
        destination: area("X1"),
    };
    let pending = Stage::Pending(Endpoint::Start(area("A1")));
    assert_eq!(pending.advanced(), None);

    let queued = Stage::InQueue(leg.clone());
    let active = queued.advanced().expect("queued advances");
    assert_eq!(active, Stage::Active(leg.clone()));
    let completed = active.advanced().expect("active advances");
    assert_eq!(completed, Stage::Completed(leg));
    assert_eq!(completed.advanced(), None);
}

// ── Record conversion ────────────────────────────────────

#[test]
fn record_uses_wire_field_names() {
    let json = serde_json::to_value(pending_send_record()).expect("serialize");
    assert_eq!(json["id"], 7);
    assert_eq!(json["type"], "Send");
    assert_eq!(json["status"], "Pending");
    assert_eq!(json["startPoint"], "Point A1");
    assert!(json["destination"].is_null());
    assert_eq!(json["cargoType"], "boxes");
    assert_eq!(json["numberOfPieces"], 3);
    assert_eq!(json["createdByPanelId"], "P1");
    assert!(json["assignedToPanelId"].is_null());
}

#[test]
fn pending_record_keeps_its_single_endpoint() {
    let mission = Mission::try_from(pending_send_record()).expect("valid mission");
    assert_eq!(mission.stage, Stage::Pending(Endpoint::Start(area("A1"))));
    assert_eq!(mission.start_point(), Some(&area("A1")));
    assert_eq!(mission.destination(), None);
    assert!(mission.is_created_by("P1"));
    assert!(!mission.is_assigned_to("P1"));
}

#[test]
fn record_round_trips_through_mission() {
    for record in [pending_send_record(), queued_record()] {
        let mission = Mission::try_from(record.clone()).expect("valid mission");
        assert_eq!(MissionRecord::from(&mission), record);
    }
}

#[test]
fn mission_serializes_in_record_shape() {
    let mission = Mission::try_from(queued_record()).expect("valid mission");
    let json = serde_json::to_value(&mission).expect("serialize");
    assert_eq!(json["status"], "In queue");
    assert_eq!(json["startPoint"], "Point A1");
    assert_eq!(json["destination"], "Point X1");
    assert_eq!(json["assignedToPanelId"], "P2");

    let back: Mission = serde_json::from_value(json).expect("deserialize");
    assert_eq!(back, mission);
}

#[test]
fn legacy_record_without_creator_is_rejected() {
    let raw = r#"{"id":3,"status":"Pending","type":"Receive","destination":"Point B1"}"#;
    let record: MissionRecord = serde_json::from_str(raw).expect("lenient record");
    assert_eq!(record.created_by_panel_id, None);
    assert_eq!(record.destination, Some(area("B1")));

    let err = Mission::try_from(record).expect_err("no creator");
    assert!(matches!(err, AppError::DataIntegrity(_)));
}

#[test]
fn empty_creator_is_rejected() {
    let mut record = pending_send_record();
    record.created_by_panel_id = Some(String::new());
    assert!(matches!(
        Mission::try_from(record),
        Err(AppError::DataIntegrity(_))
    ));
}

#[test]
fn pending_record_needs_exactly_one_endpoint() {
    let mut both = pending_send_record();
    both.destination = Some(area("X1"));
    assert!(matches!(
        Mission::try_from(both),
        Err(AppError::DataIntegrity(_))
    ));

    let mut neither = pending_send_record();
    neither.start_point = None;
    assert!(matches!(
        Mission::try_from(neither),
        Err(AppError::DataIntegrity(_))
    ));
}

#[test]
fn resolved_record_needs_both_endpoints() {
    let mut record = queued_record();
    record.destination = None;
    assert!(matches!(
        Mission::try_from(record),
        Err(AppError::DataIntegrity(_))
    ));
}

// ── Panel ────────────────────────────────────────────────

#[test]
fn panel_permission_helpers() {
    let panel = PanelConfig::new("P2", vec![area("X1")], vec![area("A1")], vec![area("B1")]);
    assert!(panel.operates_from(&area("X1")));
    assert!(panel.can_send_to(&area("A1")));
    assert!(panel.can_receive_from(&area("B1")));
    assert!(!panel.can_receive_from(&area("A1")));
}

#[test]
fn panel_validation_requires_id_and_permissions() {
    let valid = PanelConfig::new("P1", vec![area("A1")], vec![area("B1")], vec![area("C1")]);
    assert!(valid.validate().is_ok());

    let blank_id = PanelConfig::new(" ", vec![area("A1")], vec![area("B1")], vec![area("C1")]);
    assert!(matches!(blank_id.validate(), Err(AppError::Validation(_))));

    let no_send = PanelConfig::new("P1", vec![area("A1")], Vec::new(), vec![area("C1")]);
    assert!(matches!(no_send.validate(), Err(AppError::Validation(_))));

    let no_receive = PanelConfig::new("P1", vec![area("A1")], vec![area("B1")], Vec::new());
    assert!(matches!(no_receive.validate(), Err(AppError::Validation(_))));
}

#[test]
fn panel_serializes_camel_case() {
    let panel = PanelConfig::new("P1", vec![area("A1")], vec![area("B1")], vec![area("C1")]);
    let json = serde_json::to_value(&panel).expect("serialize");
    assert_eq!(json["userId"], "P1");
    assert_eq!(json["selectedAreas"][0], "A1");
    assert_eq!(json["sendToLocations"][0], "B1");
    assert_eq!(json["receiveFromLocations"][0], "C1");
    assert!(json["createdAt"].is_string());
}
