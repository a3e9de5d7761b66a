use std::sync::Arc;
use std::time::Duration;

use hospital_backend::local::LocalStore;
use hospital_backend::models::{
    AppointmentStatus, BookAppointmentRequest, NewDoctorRequest, UpdateConfigRequest,
};
use hospital_backend::remote::{MemoryRemoteStore, tables};
use hospital_backend::store::{CONFIG_ROW_ID, HospitalStore};
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

fn booking() -> BookAppointmentRequest {
    BookAppointmentRequest {
        patient_name: "Asha Singh".to_string(),
        patient_phone: "+91 90000 00000".to_string(),
        patient_email: "asha@example.com".to_string(),
        doctor_id: "d1".to_string(),
        date: "2025-06-01".to_string(),
        time_slot: "10-11".to_string(),
        status: None,
    }
}

#[tokio::test]
async fn added_doctor_appears_with_generated_id() {
    let remote = Arc::new(MemoryRemoteStore::new());
    let store = store_with(remote.clone()).await;

    store.add_doctor(dr_a()).await.expect("add doctor");

    let state = store.snapshot();
    assert_eq!(state.doctors.len(), 1);

    let doctor = &state.doctors[0];
    assert!(!doctor.id.is_empty());
    assert_eq!(doctor.name, "Dr. A");
    assert_eq!(doctor.qualification, "MBBS");
    assert_eq!(doctor.department_id, "d1");
    assert_eq!(doctor.photo, "x");
    assert_eq!(doctor.available_days, vec!["Mon"]);
    assert_eq!(doctor.time_slots, vec!["10-11"]);

    assert!(state.db_connected);
    assert!(!state.loading);
    assert!(!state.fallback);
}

#[tokio::test]
async fn add_then_remove_excludes_the_id() {
    let remote = Arc::new(MemoryRemoteStore::new());
    let store = store_with(remote.clone()).await;

    store.add_doctor(dr_a()).await.expect("add doctor");
    let id = store.snapshot().doctors[0].id.clone();

    store.remove_doctor(&id).await.expect("remove doctor");

    let state = store.snapshot();
    assert!(state.doctors.iter().all(|d| d.id != id));
    assert!(remote.rows(tables::DOCTORS).is_empty());
}

#[tokio::test]
async fn booking_always_starts_pending() {
    let remote = Arc::new(MemoryRemoteStore::new());
    let store = store_with(remote.clone()).await;

    let mut request = booking();
    request.status = Some("Confirmed".to_string());
    store.book_appointment(request).await.expect("book");

    let state = store.snapshot();
    assert_eq!(state.appointments.len(), 1);
    assert_eq!(state.appointments[0].status, AppointmentStatus::Pending);
}

#[tokio::test]
async fn status_update_changes_only_the_status() {
    let remote = Arc::new(MemoryRemoteStore::new());
    let store = store_with(remote.clone()).await;

    store.book_appointment(booking()).await.expect("book");
    let before = store.snapshot().appointments[0].clone();
    assert_eq!(before.status, AppointmentStatus::Pending);

    store
        .update_appointment_status(&before.id, AppointmentStatus::Confirmed)
        .await
        .expect("update status");

    let after = store.snapshot().appointments[0].clone();
    assert_eq!(after.status, AppointmentStatus::Confirmed);
    assert_eq!(after.id, before.id);
    assert_eq!(after.patient_name, before.patient_name);
    assert_eq!(after.patient_phone, before.patient_phone);
    assert_eq!(after.date, before.date);
    assert_eq!(after.time_slot, before.time_slot);
}

#[tokio::test]
async fn refresh_within_debounce_window_is_dropped() {
    let remote = Arc::new(
        MemoryRemoteStore::new().with_rows(tables::DOCTORS, vec![json!({"id": "d1", "name": "Dr. B"})]),
    );
    let store = store_with(remote.clone()).await;

    store.refresh().await;
    store.refresh().await;
    assert_eq!(remote.select_count(tables::DOCTORS), 1);

    tokio::time::sleep(Duration::from_millis(300)).await;
    store.refresh().await;
    assert_eq!(remote.select_count(tables::DOCTORS), 2);
}

#[tokio::test]
async fn forced_refresh_bypasses_the_debounce_gate() {
    let remote = Arc::new(MemoryRemoteStore::new());
    let store = store_with(remote.clone()).await;

    store.refresh().await;
    store.refresh_forced().await;
    assert_eq!(remote.select_count(tables::DOCTORS), 2);
}

#[tokio::test]
async fn config_upserts_against_the_well_known_row() {
    let remote = Arc::new(MemoryRemoteStore::new());
    let store = store_with(remote.clone()).await;

    store
        .update_config(UpdateConfigRequest {
            name: Some("City Care Hospital".to_string()),
            ..Default::default()
        })
        .await
        .expect("create config");

    let rows = remote.rows(tables::HOSPITAL_CONFIG);
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0].get("id").and_then(|v| v.as_str()),
        Some(CONFIG_ROW_ID)
    );

    store
        .update_config(UpdateConfigRequest {
            phone: Some("+91 11111 11111".to_string()),
            ..Default::default()
        })
        .await
        .expect("update config");

    // Still a single row, updated in place.
    assert_eq!(remote.rows(tables::HOSPITAL_CONFIG).len(), 1);

    let config = store.snapshot().config;
    assert_eq!(config.name, "City Care Hospital");
    assert_eq!(config.phone, "+91 11111 11111");
}

#[tokio::test]
async fn appointments_come_back_newest_first() {
    let remote = Arc::new(MemoryRemoteStore::new().with_rows(
        tables::APPOINTMENTS,
        vec![
            json!({"id": "a1", "patientName": "Early", "date": "2025-01-01"}),
            json!({"id": "a2", "patientName": "Late", "date": "2025-06-01"}),
        ],
    ));
    let store = store_with(remote.clone()).await;

    store.refresh_forced().await;

    let appointments = store.snapshot().appointments;
    assert_eq!(appointments[0].date, "2025-06-01");
    assert_eq!(appointments[1].date, "2025-01-01");
}
