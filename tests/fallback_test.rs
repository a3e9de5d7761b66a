use std::sync::Arc;
use std::time::Duration;

use hospital_backend::local::{LocalStore, keys};
use hospital_backend::models::{Doctor, NewDoctorRequest};
use hospital_backend::remote::{MemoryRemoteStore, RemoteStore, tables};
use hospital_backend::store::HospitalStore;
use serde_json::json;

async fn store_with(remote: Arc<MemoryRemoteStore>) -> HospitalStore {
    let local = LocalStore::open("sqlite::memory:")
        .await
        .expect("Failed to open local store");
    HospitalStore::with_debounce(remote, local, Duration::from_millis(250))
}

fn dr_a() -> NewDoctorRequest {
    NewDoctorRequest {
        name: "Dr. A".to_string(),
        qualification: "MBBS".to_string(),
        department_id: "d1".to_string(),
        photo: "x".to_string(),
        available_days: vec!["Mon".to_string()],
        time_slots: vec!["10-11".to_string()],
    }
}

#[tokio::test]
async fn missing_relation_enters_fallback_and_mutations_apply_locally() {
    let remote = Arc::new(MemoryRemoteStore::new());
    remote.set_schema_missing(true);
    let store = store_with(remote.clone()).await;

    store.refresh_forced().await;

    let state = store.snapshot();
    assert!(!state.db_connected);
    assert!(state.fallback);
    assert!(state.last_error.is_some());

    // Mutations keep working against the local mirror, no remote write.
    store.add_doctor(dr_a()).await.expect("add doctor locally");

    let state = store.snapshot();
    assert_eq!(state.doctors.len(), 1);
    assert!(!state.doctors[0].id.is_empty());
    assert!(remote.rows(tables::DOCTORS).is_empty());
}

#[tokio::test]
async fn add_then_remove_in_fallback_excludes_the_id() {
    let remote = Arc::new(MemoryRemoteStore::new());
    remote.set_schema_missing(true);
    let store = store_with(remote.clone()).await;

    store.refresh_forced().await;
    store.add_doctor(dr_a()).await.expect("add doctor");
    let id = store.snapshot().doctors[0].id.clone();

    store.remove_doctor(&id).await.expect("remove doctor");

    assert!(store.snapshot().doctors.iter().all(|d| d.id != id));
}

#[tokio::test]
async fn unreachable_remote_serves_the_persisted_snapshot() {
    let remote = Arc::new(
        MemoryRemoteStore::new().with_rows(tables::DOCTORS, vec![json!({"id": "d1", "name": "Dr. B"})]),
    );
    let store = store_with(remote.clone()).await;

    store.refresh_forced().await;
    assert!(store.snapshot().db_connected);

    remote.set_unreachable(true);
    store.refresh_forced().await;

    let state = store.snapshot();
    assert!(!state.db_connected);
    assert!(!state.fallback);
    assert!(state.last_error.is_some());
    // Collections still carry the last persisted values.
    assert_eq!(state.doctors.len(), 1);
    assert_eq!(state.doctors[0].name, "Dr. B");
}

#[tokio::test]
async fn successful_forced_refresh_exits_fallback() {
    let remote = Arc::new(MemoryRemoteStore::new());
    remote.set_schema_missing(true);
    let store = store_with(remote.clone()).await;

    store.refresh_forced().await;
    assert!(store.snapshot().fallback);
    store.add_doctor(dr_a()).await.expect("add doctor locally");

    remote.set_schema_missing(false);
    remote
        .insert(tables::DOCTORS, json!({"name": "Dr. Remote"}))
        .await
        .expect("seed remote");

    store.refresh_forced().await;

    let state = store.snapshot();
    assert!(!state.fallback);
    assert!(state.db_connected);
    // Remote data replaces the local mirror wholesale.
    assert_eq!(state.doctors.len(), 1);
    assert_eq!(state.doctors[0].name, "Dr. Remote");
}

#[tokio::test]
async fn throttled_refresh_never_probes_the_remote_in_fallback() {
    let remote = Arc::new(MemoryRemoteStore::new());
    remote.set_schema_missing(true);
    let store = store_with(remote.clone()).await;

    store.refresh_forced().await;
    assert!(store.snapshot().fallback);

    remote.set_schema_missing(false);
    tokio::time::sleep(Duration::from_millis(300)).await;
    store.refresh().await;

    assert_eq!(remote.select_count(tables::DOCTORS), 0);
    assert!(store.snapshot().fallback);
}

#[tokio::test]
async fn local_snapshot_roundtrip() {
    let local = LocalStore::open("sqlite::memory:")
        .await
        .expect("Failed to open local store");

    let doctors = vec![Doctor {
        id: "d1".to_string(),
        name: "Dr. B".to_string(),
        qualification: "MS".to_string(),
        department_id: "dept-1".to_string(),
        photo: "p".to_string(),
        available_days: vec!["Tue".to_string()],
        time_slots: vec!["12-13".to_string()],
    }];

    local.save(keys::DOCTORS, &doctors).await.expect("save");
    let loaded: Option<Vec<Doctor>> = local.load(keys::DOCTORS).await.expect("load");
    assert_eq!(loaded, Some(doctors));

    let missing: Option<Vec<Doctor>> = local.load(keys::NOTICES).await.expect("load missing");
    assert!(missing.is_none());
}
