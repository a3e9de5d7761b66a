use hospital_backend::models::AppointmentStatus;
use hospital_backend::normalize::{
    DEFAULT_DOCTOR_NAME, DEFAULT_DOCTOR_PHOTO, appointment_from_row, config_from_row,
    doctor_from_row, notice_from_row,
};
use serde_json::{Map, Value, json};

fn row(value: Value) -> Map<String, Value> {
    value.as_object().expect("row must be an object").clone()
}

#[test]
fn doctor_row_with_camel_case_keys() {
    let doctor = doctor_from_row(&row(json!({
        "id": "doc-1",
        "name": "Dr. Mehta",
        "qualification": "MBBS, MD",
        "departmentId": "dept-1",
        "photo": "https://example.com/mehta.png",
        "availableDays": ["Mon", "Wed"],
        "timeSlots": ["10-11", "11-12"]
    })));

    assert_eq!(doctor.id, "doc-1");
    assert_eq!(doctor.name, "Dr. Mehta");
    assert_eq!(doctor.qualification, "MBBS, MD");
    assert_eq!(doctor.department_id, "dept-1");
    assert_eq!(doctor.available_days, vec!["Mon", "Wed"]);
    assert_eq!(doctor.time_slots, vec!["10-11", "11-12"]);
}

#[test]
fn doctor_row_with_snake_case_keys() {
    let doctor = doctor_from_row(&row(json!({
        "id": "doc-2",
        "name": "Dr. Rao",
        "department_id": "dept-9",
        "available_days": ["Fri"],
        "time_slots": ["15-16"]
    })));

    assert_eq!(doctor.department_id, "dept-9");
    assert_eq!(doctor.available_days, vec!["Fri"]);
    assert_eq!(doctor.time_slots, vec!["15-16"]);
}

#[test]
fn doctor_row_missing_fields_takes_defaults() {
    let doctor = doctor_from_row(&row(json!({ "id": "doc-3" })));

    assert_eq!(doctor.name, DEFAULT_DOCTOR_NAME);
    assert_eq!(doctor.photo, DEFAULT_DOCTOR_PHOTO);
    assert_eq!(doctor.qualification, "");
    assert!(doctor.available_days.is_empty());
}

#[test]
fn null_values_count_as_missing() {
    let doctor = doctor_from_row(&row(json!({
        "id": "doc-4",
        "name": null,
        "photo": null
    })));

    assert_eq!(doctor.name, DEFAULT_DOCTOR_NAME);
    assert_eq!(doctor.photo, DEFAULT_DOCTOR_PHOTO);
}

#[test]
fn day_list_accepts_comma_separated_string() {
    let doctor = doctor_from_row(&row(json!({
        "id": "doc-5",
        "availabledays": "Mon, Tue, Thu"
    })));

    assert_eq!(doctor.available_days, vec!["Mon", "Tue", "Thu"]);
}

#[test]
fn appointment_row_with_lowercase_keys() {
    let appointment = appointment_from_row(&row(json!({
        "id": "apt-1",
        "patientname": "Asha Singh",
        "patientphone": "+91 90000 00000",
        "patientemail": "asha@example.com",
        "doctorid": "doc-1",
        "date": "2025-06-01",
        "timeslot": "10-11",
        "status": "confirmed"
    })));

    assert_eq!(appointment.patient_name, "Asha Singh");
    assert_eq!(appointment.patient_phone, "+91 90000 00000");
    assert_eq!(appointment.patient_email, "asha@example.com");
    assert_eq!(appointment.doctor_id, "doc-1");
    assert_eq!(appointment.time_slot, "10-11");
    assert_eq!(appointment.status, AppointmentStatus::Confirmed);
}

#[test]
fn unknown_or_missing_status_defaults_to_pending() {
    let unknown = appointment_from_row(&row(json!({ "id": "apt-2", "status": "Archived" })));
    assert_eq!(unknown.status, AppointmentStatus::Pending);

    let missing = appointment_from_row(&row(json!({ "id": "apt-3" })));
    assert_eq!(missing.status, AppointmentStatus::Pending);
}

#[test]
fn notice_importance_coerces_from_number_and_string() {
    let from_number = notice_from_row(&row(json!({
        "id": "n-1",
        "title": "Holiday",
        "is_important": 1
    })));
    assert!(from_number.is_important);

    let from_string = notice_from_row(&row(json!({
        "id": "n-2",
        "title": "OPD timings",
        "isImportant": "false"
    })));
    assert!(!from_string.is_important);

    let missing = notice_from_row(&row(json!({ "id": "n-3", "title": "Camp" })));
    assert!(!missing.is_important);
}

#[test]
fn config_row_missing_fields_keeps_seed_values() {
    let config = config_from_row(&row(json!({
        "id": "cfg-1",
        "name": "City Care Hospital"
    })));

    assert_eq!(config.name, "City Care Hospital");
    // Untouched fields fall back to the seed record, not empty strings.
    assert!(!config.phone.is_empty());
    assert!(!config.logo.is_empty());
}
