use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use mission_board::models::{Area, PanelConfig};
use mission_board::persistence::{db, panel_repo::PanelRepo, PanelStore};

fn area(code: &str) -> Area {
    Area::parse(code).expect("valid area")
}

fn panel(id: &str) -> PanelConfig {
    PanelConfig::new(id, vec![area("A1"), area("A2")], vec![area("B1")], vec![area("C1")])
}

async fn repo() -> PanelRepo {
    let pool = db::connect_memory().await.expect("db connect");
    PanelRepo::new(Arc::new(pool))
}

#[tokio::test]
async fn upsert_and_get_round_trip() {
    let repo = repo().await;
    let original = panel("P1");
    repo.upsert(&original).await.expect("insert");

    let fetched = repo.get("P1").await.expect("get").expect("present");
    assert_eq!(fetched, original);
    assert!(repo.get("P9").await.expect("get").is_none());
}

#[tokio::test]
async fn upsert_replaces_area_lists() {
    let repo = repo().await;
    repo.upsert(&panel("P1")).await.expect("insert");

    let mut edited = panel("P1");
    edited.send_to_locations = vec![area("B1"), area("B2")];
    repo.upsert(&edited).await.expect("update");

    let fetched = repo.get("P1").await.expect("get").expect("present");
    assert_eq!(fetched.send_to_locations, vec![area("B1"), area("B2")]);
    assert_eq!(repo.list().await.expect("list").len(), 1);
}

#[tokio::test]
async fn list_orders_by_registration_time() {
    let repo = repo().await;
    let base = Utc.with_ymd_and_hms(2026, 1, 5, 8, 0, 0).single().expect("timestamp");
    let mut later = panel("A-late");
    later.created_at = base + Duration::minutes(5);
    let mut earlier = panel("Z-early");
    earlier.created_at = base;
    repo.upsert(&later).await.expect("insert");
    repo.upsert(&earlier).await.expect("insert");

    let ids: Vec<String> = repo
        .list()
        .await
        .expect("list")
        .into_iter()
        .map(|p| p.user_id)
        .collect();
    assert_eq!(ids, vec!["Z-early", "A-late"]);
}

#[tokio::test]
async fn remove_deletes_panel() {
    let store: Arc<dyn PanelStore> = Arc::new(repo().await);
    store.put(&panel("P1")).await.expect("put");
    store.delete("P1").await.expect("delete");
    assert!(store.get_by_user_id("P1").await.expect("get").is_none());
    assert!(store.list_all().await.expect("list").is_empty());
}
