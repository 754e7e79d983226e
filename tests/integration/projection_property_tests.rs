//! Projection invariants over a populated board.

use mission_board::lifecycle::AdvanceOutcome;
use mission_board::models::{MissionId, MissionStatus, MissionType, PanelConfig};

use super::test_helpers::{area, Harness};

/// Board with one mission in every status plus a pending one of each type.
async fn populated() -> (Harness, Vec<MissionId>) {
    let h = Harness::sqlite().await.with_panels().await;
    let s = &h.service;

    let send_pending = s
        .create_mission("P1", MissionType::Send, Some("boxes".into()), None, &area("A1"))
        .await
        .expect("create");
    let receive_pending = s
        .create_mission("P1", MissionType::Receive, Some("boxes".into()), None, &area("A1"))
        .await
        .expect("create");

    let queued = s
        .create_mission("P1", MissionType::Send, None, None, &area("A1"))
        .await
        .expect("create");
    s.accept_as_receive(queued.id, "P2", &area("X1"))
        .await
        .expect("accept");

    let active = s
        .create_mission("P1", MissionType::Receive, None, None, &area("A1"))
        .await
        .expect("create");
    s.accept_as_send(active.id, "P2", &area("B1"))
        .await
        .expect("accept");
    s.advance(active.id, MissionStatus::InQueue)
        .await
        .expect("advance");

    let completed = s
        .create_mission("P1", MissionType::Send, None, None, &area("A1"))
        .await
        .expect("create");
    s.accept_as_receive(completed.id, "P2", &area("B1"))
        .await
        .expect("accept");
    for expected in [MissionStatus::InQueue, MissionStatus::Active] {
        s.advance(completed.id, expected).await.expect("advance");
    }

    let ids = vec![
        send_pending.id,
        receive_pending.id,
        queued.id,
        active.id,
        completed.id,
    ];
    (h, ids)
}

fn expected_assignee_role(panel: &PanelConfig, start: &str, destination: &str) -> MissionType {
    if panel.can_receive_from(&area(start)) {
        MissionType::Receive
    } else {
        assert!(panel.can_send_to(&area(destination)));
        MissionType::Send
    }
}

#[tokio::test]
async fn creator_and_assignee_roles_are_symmetric() {
    let (h, _) = populated().await;
    let assignee = h.registry.get("P2").await.expect("P2");

    let for_creator = h.service.project_for_panel("P1").await.expect("project");
    for item in &for_creator {
        assert_eq!(item.display_type, item.mission.mission_type);
        assert!(item.is_created_by_this_panel);
    }

    let for_assignee = h.service.project_for_panel("P2").await.expect("project");
    for item in for_assignee
        .iter()
        .filter(|item| item.mission.status() != MissionStatus::Pending)
    {
        let start = item.mission.start_point().expect("resolved start");
        let destination = item.mission.destination().expect("resolved destination");
        assert_eq!(
            item.display_type,
            expected_assignee_role(&assignee, start.code(), destination.code()),
            "mission {}",
            item.mission.id
        );
        assert_ne!(item.display_type, item.mission.mission_type);
    }
}

#[tokio::test]
async fn claimed_missions_stay_hidden_from_third_panels() {
    let (h, ids) = populated().await;

    // P4 could see every route on the board if the missions were unclaimed.
    let wide = PanelConfig::new(
        "P4",
        vec![area("C1")],
        vec![area("A1"), area("X1"), area("B1")],
        vec![area("A1"), area("B1")],
    );
    h.registry.register(wide).await.expect("register P4");

    let visible: Vec<MissionId> = h
        .service
        .project_for_panel("P4")
        .await
        .expect("project")
        .iter()
        .map(|item| item.mission.id)
        .collect();
    assert_eq!(visible, ids[..2].to_vec(), "only pending missions are offered");

    let for_p3 = h.service.project_for_panel("P3").await.expect("project");
    assert!(for_p3.is_empty());
}

#[tokio::test]
async fn accepted_missions_have_both_endpoints() {
    let (h, ids) = populated().await;
    for record in h.service.records().await.expect("records") {
        if record.status == MissionStatus::Pending {
            assert!(record.start_point.is_some() ^ record.destination.is_some());
        } else {
            assert!(record.start_point.is_some(), "mission {}", record.id);
            assert!(record.destination.is_some(), "mission {}", record.id);
            assert!(record.robot_name.is_some());
            assert_eq!(record.assigned_to_panel_id.as_deref(), Some("P2"));
        }
    }
    assert_eq!(ids.len(), 5);
}

#[tokio::test]
async fn projection_is_stable_without_mutation() {
    let (h, _) = populated().await;
    for panel in ["P1", "P2", "P3"] {
        let first = h.service.project_for_panel(panel).await.expect("project");
        let second = h.service.project_for_panel(panel).await.expect("project");
        assert_eq!(first, second, "panel {panel}");
    }
}

#[tokio::test]
async fn status_only_moves_forward() {
    let (h, ids) = populated().await;
    let completed = ids[4];

    for expected in [
        MissionStatus::Pending,
        MissionStatus::InQueue,
        MissionStatus::Active,
        MissionStatus::Completed,
    ] {
        let outcome = h
            .service
            .advance(completed, expected)
            .await
            .expect("advance");
        assert_eq!(outcome, AdvanceOutcome::Stale);
    }

    let pending = ids[0];
    let outcome = h
        .service
        .advance(pending, MissionStatus::Pending)
        .await
        .expect("advance");
    assert_eq!(outcome, AdvanceOutcome::Stale);

    let queued = ids[2];
    assert_eq!(
        h.service
            .advance(queued, MissionStatus::Active)
            .await
            .expect("advance"),
        AdvanceOutcome::Stale,
        "a queued mission cannot skip to completed"
    );

    let record = h.missions.get(completed).await.expect("get").expect("stored");
    assert_eq!(record.status, MissionStatus::Completed);
}
