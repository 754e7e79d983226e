use mission_board::models::{Area, MissionRecord, MissionStatus, MissionType, PanelConfig};
use mission_board::projection::board::{
    available_actions, displayed_route, filter_tab, status_label, BoardTab, CardAction,
};
use mission_board::projection::{project, PanelMission};

fn area(code: &str) -> Area {
    Area::parse(code).expect("valid area")
}

fn viewer(id: &str) -> PanelConfig {
    PanelConfig::new(id, vec![area("X1")], vec![area("A1")], vec![area("A1")])
}

fn record(id: i64, status: MissionStatus, creator: &str, assignee: Option<&str>) -> MissionRecord {
    let resolved = status != MissionStatus::Pending;
    MissionRecord {
        id,
        robot_name: assignee.map(|_| "AMR-01".to_owned()),
        start_point: Some(area("A1")),
        destination: resolved.then(|| area("X1")),
        status,
        mission_type: MissionType::Send,
        cargo_type: Some("boxes".into()),
        number_of_pieces: Some(1),
        created_by_panel_id: Some(creator.to_owned()),
        assigned_to_panel_id: assignee.map(str::to_owned),
    }
}

fn projected_for(panel_id: &str) -> Vec<PanelMission> {
    let records = vec![
        record(1, MissionStatus::Pending, "P1", None),
        record(2, MissionStatus::InQueue, "P1", Some("P2")),
        record(3, MissionStatus::Active, "P1", Some("P2")),
        record(4, MissionStatus::Completed, "P1", Some("P2")),
    ];
    project(&records, &viewer(panel_id))
}

#[test]
fn pending_tab_also_lists_queued_missions() {
    let projected = projected_for("P2");
    let ids = |tab| {
        filter_tab(&projected, tab)
            .iter()
            .map(|item| item.mission.id)
            .collect::<Vec<_>>()
    };
    assert_eq!(ids(BoardTab::Pending), vec![1, 2]);
    assert_eq!(ids(BoardTab::Active), vec![3]);
    assert_eq!(ids(BoardTab::Completed), vec![4]);
}

#[test]
fn tab_titles_and_status_labels() {
    assert_eq!(BoardTab::Pending.title(), "Ordered Missions");
    assert_eq!(BoardTab::Completed.title(), "Completed Missions");
    assert_eq!(status_label(MissionStatus::Pending), "Ordered");
    assert_eq!(status_label(MissionStatus::InQueue), "Departure");
    assert_eq!(status_label(MissionStatus::Active), "Active");
    assert_eq!(status_label(MissionStatus::Completed), "Completed");
}

#[test]
fn pending_route_hides_unknown_endpoint() {
    let projected = projected_for("P2");
    let pending = displayed_route(&projected[0]);
    assert_eq!(pending.from, Some(area("A1")));
    assert_eq!(pending.to, None);

    let queued = displayed_route(&projected[1]);
    assert_eq!(queued.to, Some(area("X1")));
}

#[test]
fn actions_follow_ownership_and_status() {
    let for_acceptor = projected_for("P2");
    assert_eq!(
        available_actions(&for_acceptor[0], "P2"),
        vec![CardAction::Receive]
    );
    assert_eq!(
        available_actions(&for_acceptor[1], "P2"),
        vec![CardAction::Cancel]
    );
    assert!(available_actions(&for_acceptor[2], "P2").is_empty());
    assert!(available_actions(&for_acceptor[3], "P2").is_empty());

    let for_creator = projected_for("P1");
    assert_eq!(
        available_actions(&for_creator[0], "P1"),
        vec![CardAction::Cancel]
    );
    assert_eq!(
        available_actions(&for_creator[1], "P1"),
        vec![CardAction::Cancel]
    );
}
