//! Entity normalization for rows coming back from the remote record store.
//!
//! Remote rows have no reliable naming convention — the same column shows up
//! as `patientName`, `patient_name`, or `patientname` depending on how the
//! schema was created. Each canonical field probes an ordered alias list and
//! takes the first defined, non-null value; a row missing every alias gets
//! the documented default instead of an error.

use serde_json::{Map, Value};
use tracing::warn;

use crate::models::{
    Appointment, AppointmentStatus, Department, Doctor, HospitalConfig, Notice, Service,
};

/// An untyped row as returned by the remote store.
pub type RawRow = Map<String, Value>;

pub const DEFAULT_DOCTOR_NAME: &str = "Unnamed Doctor";
pub const DEFAULT_DOCTOR_PHOTO: &str = "https://via.placeholder.com/300x300.png?text=Doctor";

/// First defined, non-null value among the alias keys.
pub fn find_value<'a>(row: &'a RawRow, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .find_map(|key| row.get(*key).filter(|v| !v.is_null()))
}

fn text(row: &RawRow, aliases: &[&str], default: &str) -> String {
    match find_value(row, aliases) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => {
            warn!("unexpected shape for {:?}: {}", aliases[0], other);
            default.to_string()
        }
        None => default.to_string(),
    }
}

/// String lists arrive either as a JSON array of strings or as one
/// comma-separated string.
fn text_list(row: &RawRow, aliases: &[&str]) -> Vec<String> {
    match find_value(row, aliases) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str())
            .map(|s| s.to_string())
            .collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect(),
        Some(other) => {
            warn!("unexpected shape for {:?}: {}", aliases[0], other);
            Vec::new()
        }
        None => Vec::new(),
    }
}

fn flag(row: &RawRow, aliases: &[&str], default: bool) -> bool {
    match find_value(row, aliases) {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_i64().map(|n| n != 0).unwrap_or(default),
        Some(Value::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "t" | "1" => true,
            "false" | "f" | "0" => false,
            _ => default,
        },
        Some(other) => {
            warn!("unexpected shape for {:?}: {}", aliases[0], other);
            default
        }
        None => default,
    }
}

pub fn doctor_from_row(row: &RawRow) -> Doctor {
    Doctor {
        id: text(row, &["id"], ""),
        name: text(row, &["name"], DEFAULT_DOCTOR_NAME),
        qualification: text(row, &["qualification"], ""),
        department_id: text(row, &["departmentId", "department_id", "departmentid"], ""),
        photo: text(row, &["photo"], DEFAULT_DOCTOR_PHOTO),
        available_days: text_list(row, &["availableDays", "available_days", "availabledays"]),
        time_slots: text_list(row, &["timeSlots", "time_slots", "timeslots"]),
    }
}

pub fn department_from_row(row: &RawRow) -> Department {
    Department {
        id: text(row, &["id"], ""),
        name: text(row, &["name"], ""),
        description: text(row, &["description"], ""),
        icon: text(row, &["icon"], ""),
    }
}

pub fn service_from_row(row: &RawRow) -> Service {
    Service {
        id: text(row, &["id"], ""),
        title: text(row, &["title", "name"], ""),
        description: text(row, &["description"], ""),
    }
}

pub fn appointment_from_row(row: &RawRow) -> Appointment {
    let status_label = text(row, &["status"], "");
    let status = AppointmentStatus::from_label(&status_label).unwrap_or_default();

    Appointment {
        id: text(row, &["id"], ""),
        patient_name: text(row, &["patientName", "patient_name", "patientname"], ""),
        patient_phone: text(row, &["patientPhone", "patient_phone", "patientphone"], ""),
        patient_email: text(row, &["patientEmail", "patient_email", "patientemail"], ""),
        doctor_id: text(row, &["doctorId", "doctor_id", "doctorid"], ""),
        date: text(row, &["date"], ""),
        time_slot: text(row, &["timeSlot", "time_slot", "timeslot"], ""),
        status,
    }
}

pub fn notice_from_row(row: &RawRow) -> Notice {
    Notice {
        id: text(row, &["id"], ""),
        title: text(row, &["title"], ""),
        content: text(row, &["content"], ""),
        date: text(row, &["date"], ""),
        is_important: flag(row, &["isImportant", "is_important", "isimportant"], false),
    }
}

/// Missing config fields fall back to the seed values rather than `""` so a
/// half-filled row never blanks out the site header.
pub fn config_from_row(row: &RawRow) -> HospitalConfig {
    let defaults = HospitalConfig::default();
    HospitalConfig {
        name: text(row, &["name"], &defaults.name),
        logo: text(row, &["logo"], &defaults.logo),
        address: text(row, &["address"], &defaults.address),
        phone: text(row, &["phone"], &defaults.phone),
        email: text(row, &["email"], &defaults.email),
    }
}
