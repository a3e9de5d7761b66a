//! The sync engine: an in-memory snapshot of all six collections, refreshed
//! wholesale from the remote record store and mirrored into local storage.
//!
//! Every mutation writes remote-then-refetches; nothing is patched row by
//! row. When the remote schema turns out to be missing the engine flips into
//! fallback mode and applies mutations to the local mirror instead.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use serde::Serialize;
use serde_json::{Value, json};
use tokio::sync::{Mutex, watch};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::local::{LocalStore, keys};
use crate::models::{
    Appointment, AppointmentStatus, BookAppointmentRequest, Department, Doctor, HospitalConfig,
    NewDepartmentRequest, NewDoctorRequest, NewNoticeRequest, NewServiceRequest, Notice, Service,
    UpdateAppointmentRequest, UpdateConfigRequest, UpdateDoctorRequest,
};
use crate::normalize::{self, RawRow};
use crate::remote::{RemoteStore, tables, write_candidates};

/// Well-known id of the singleton config row. The config is always written
/// under this id, never "whichever row comes back first".
pub const CONFIG_ROW_ID: &str = "00000000-0000-0000-0000-000000000001";

const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// The published snapshot. Consumers must treat every field as fully
/// replaced on each update, never incrementally patched.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HospitalState {
    pub doctors: Vec<Doctor>,
    pub departments: Vec<Department>,
    pub services: Vec<Service>,
    pub appointments: Vec<Appointment>,
    pub notices: Vec<Notice>,
    pub config: HospitalConfig,
    /// True until the first refresh completes.
    pub loading: bool,
    pub db_connected: bool,
    /// Fallback/demo mode: mutations go to the local mirror.
    pub fallback: bool,
    pub last_error: Option<String>,
}

impl Default for HospitalState {
    fn default() -> Self {
        Self {
            doctors: Vec::new(),
            departments: Vec::new(),
            services: Vec::new(),
            appointments: Vec::new(),
            notices: Vec::new(),
            config: HospitalConfig::default(),
            loading: true,
            db_connected: false,
            fallback: false,
            last_error: None,
        }
    }
}

pub struct HospitalStore {
    remote: Arc<dyn RemoteStore>,
    local: LocalStore,
    state: watch::Sender<HospitalState>,
    last_refresh: Mutex<Option<Instant>>,
    /// Bumped on every mutation; a refresh started before the bump discards
    /// its results instead of clobbering the newer write.
    generation: AtomicU64,
    debounce: Duration,
}

impl HospitalStore {
    pub fn new(remote: Arc<dyn RemoteStore>, local: LocalStore) -> Self {
        Self::with_debounce(remote, local, DEFAULT_DEBOUNCE)
    }

    pub fn with_debounce(
        remote: Arc<dyn RemoteStore>,
        local: LocalStore,
        debounce: Duration,
    ) -> Self {
        let (state, _) = watch::channel(HospitalState::default());
        Self {
            remote,
            local,
            state,
            last_refresh: Mutex::new(None),
            generation: AtomicU64::new(0),
            debounce,
        }
    }

    pub fn local(&self) -> &LocalStore {
        &self.local
    }

    /// Current snapshot (cloned out of the watch channel).
    pub fn snapshot(&self) -> HospitalState {
        self.state.borrow().clone()
    }

    /// Reactive subscription; receivers see whole-snapshot replacements.
    pub fn subscribe(&self) -> watch::Receiver<HospitalState> {
        self.state.subscribe()
    }

    fn publish(&self, update: impl FnOnce(&mut HospitalState)) {
        self.state.send_modify(update);
    }

    fn fallback_active(&self) -> bool {
        self.state.borrow().fallback
    }

    // ------------------------------------------------------------------
    // Refresh
    // ------------------------------------------------------------------

    /// Throttled refresh: a call within the debounce window of the previous
    /// one is dropped. In fallback mode this never probes the remote.
    pub async fn refresh(&self) {
        self.refresh_inner(false).await;
    }

    /// Bypasses the debounce gate and, on full success, exits fallback mode.
    pub async fn refresh_forced(&self) {
        self.refresh_inner(true).await;
    }

    async fn refresh_inner(&self, force: bool) {
        let fallback = self.fallback_active();
        if !force && fallback {
            return;
        }

        {
            let mut last = self.last_refresh.lock().await;
            if !force {
                if let Some(previous) = *last {
                    if previous.elapsed() < self.debounce {
                        return;
                    }
                }
            }
            *last = Some(Instant::now());
        }

        let generation = self.generation.load(Ordering::SeqCst);

        let (r_docs, r_depts, r_servs, r_apts, r_notes, r_cfg) = tokio::join!(
            self.remote.select_all(tables::DOCTORS, None),
            self.remote.select_all(tables::DEPARTMENTS, None),
            self.remote.select_all(tables::SERVICES, None),
            self.remote.select_all(tables::APPOINTMENTS, Some("date")),
            self.remote.select_all(tables::NOTICES, Some("date")),
            self.remote.select_all(tables::HOSPITAL_CONFIG, None),
        );

        if self.generation.load(Ordering::SeqCst) != generation {
            info!("discarding refresh results superseded by a newer mutation");
            return;
        }

        let mut last_error: Option<String> = None;
        let mut schema_missing = false;
        let mut note = |e: &AppError| {
            if e.is_schema_missing() {
                schema_missing = true;
            }
            if last_error.is_none() {
                last_error = Some(e.to_string());
            }
        };

        let doctors = match r_docs {
            Ok(rows) => Some(normalize_rows(&rows, normalize::doctor_from_row)),
            Err(e) => {
                note(&e);
                None
            }
        };
        let departments = match r_depts {
            Ok(rows) => Some(normalize_rows(&rows, normalize::department_from_row)),
            Err(e) => {
                note(&e);
                None
            }
        };
        let services = match r_servs {
            Ok(rows) => Some(normalize_rows(&rows, normalize::service_from_row)),
            Err(e) => {
                note(&e);
                None
            }
        };
        let appointments = match r_apts {
            Ok(rows) => Some(normalize_rows(&rows, normalize::appointment_from_row)),
            Err(e) => {
                note(&e);
                None
            }
        };
        let notices = match r_notes {
            Ok(rows) => Some(normalize_rows(&rows, normalize::notice_from_row)),
            Err(e) => {
                note(&e);
                None
            }
        };
        let config = match r_cfg {
            Ok(rows) => {
                let row = rows
                    .iter()
                    .find(|r| r.get("id").and_then(Value::as_str) == Some(CONFIG_ROW_ID))
                    .or_else(|| rows.first());
                let config = row.and_then(Value::as_object).map(normalize::config_from_row);
                if let Some(config) = &config {
                    if let Err(e) = self.local.save(keys::CONFIG, config).await {
                        warn!("failed to persist config snapshot: {}", e);
                    }
                }
                config
            }
            Err(e) => {
                note(&e);
                match self.local.load(keys::CONFIG).await {
                    Ok(config) => config,
                    Err(e) => {
                        warn!("failed to load config snapshot: {}", e);
                        None
                    }
                }
            }
        };

        let doctors = self.cache_or_restore(keys::DOCTORS, doctors).await;
        let departments = self.cache_or_restore(keys::DEPARTMENTS, departments).await;
        let services = self.cache_or_restore(keys::SERVICES, services).await;
        let appointments = self.cache_or_restore(keys::APPOINTMENTS, appointments).await;
        let notices = self.cache_or_restore(keys::NOTICES, notices).await;

        let connected = last_error.is_none();
        let exit_fallback = force && connected;

        self.publish(|state| {
            state.doctors = doctors;
            state.departments = departments;
            state.services = services;
            state.appointments = appointments;
            state.notices = notices;
            if let Some(config) = config {
                state.config = config;
            }
            state.loading = false;
            state.db_connected = connected;
            state.last_error = last_error;
            if exit_fallback {
                if state.fallback {
                    info!("remote store reachable again, leaving fallback mode");
                }
                state.fallback = false;
            } else if schema_missing {
                state.fallback = true;
            }
        });
    }

    /// Fetched collections replace the persisted snapshot; failed fetches
    /// re-serve the last persisted values (possibly empty on first run).
    async fn cache_or_restore<T>(&self, key: &str, fetched: Option<Vec<T>>) -> Vec<T>
    where
        T: Serialize + serde::de::DeserializeOwned,
    {
        match fetched {
            Some(items) => {
                if let Err(e) = self.local.save(key, &items).await {
                    warn!("failed to persist {} snapshot: {}", key, e);
                }
                items
            }
            None => match self.local.load(key).await {
                Ok(Some(items)) => items,
                Ok(None) => Vec::new(),
                Err(e) => {
                    warn!("failed to load {} snapshot: {}", key, e);
                    Vec::new()
                }
            },
        }
    }

    // ------------------------------------------------------------------
    // Remote writes (with table-name candidates)
    // ------------------------------------------------------------------

    async fn remote_insert(&self, table: &str, row: Value) -> Result<(), AppError> {
        let mut missing: Option<AppError> = None;
        for candidate in write_candidates(table) {
            match self.remote.insert(candidate, row.clone()).await {
                Ok(()) => return Ok(()),
                Err(e) if e.is_schema_missing() => {
                    warn!("insert into {} failed, table missing", candidate);
                    missing = Some(e);
                }
                Err(e) => return Err(e),
            }
        }
        Err(unavailable(table, missing))
    }

    async fn remote_update(
        &self,
        table: &str,
        id: &str,
        patch: Value,
    ) -> Result<Vec<Value>, AppError> {
        let mut missing: Option<AppError> = None;
        for candidate in write_candidates(table) {
            match self.remote.update_by_id(candidate, id, patch.clone()).await {
                Ok(rows) => return Ok(rows),
                Err(e) if e.is_schema_missing() => {
                    warn!("update on {} failed, table missing", candidate);
                    missing = Some(e);
                }
                Err(e) => return Err(e),
            }
        }
        Err(unavailable(table, missing))
    }

    async fn remote_delete(&self, table: &str, id: &str) -> Result<(), AppError> {
        let mut missing: Option<AppError> = None;
        for candidate in write_candidates(table) {
            match self.remote.delete_by_id(candidate, id).await {
                Ok(()) => return Ok(()),
                Err(e) if e.is_schema_missing() => {
                    warn!("delete from {} failed, table missing", candidate);
                    missing = Some(e);
                }
                Err(e) => return Err(e),
            }
        }
        Err(unavailable(table, missing))
    }

    // ------------------------------------------------------------------
    // Mutation plumbing
    // ------------------------------------------------------------------

    /// Connected-mode epilogue: bump the mutation generation so stale
    /// in-flight refreshes get discarded, then refetch everything.
    async fn finish_mutation(&self) -> Result<(), AppError> {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.refresh_forced().await;
        Ok(())
    }

    fn record_error(&self, operation: &str, e: &AppError) {
        error!("remote write failed during {}: {}", operation, e);
        let message = e.to_string();
        self.publish(|state| state.last_error = Some(message));
    }

    fn enter_fallback(&self, operation: &str, e: &AppError) {
        warn!(
            "remote schema missing during {}, entering fallback mode: {}",
            operation, e
        );
        let message = e.to_string();
        self.publish(|state| {
            state.fallback = true;
            state.db_connected = false;
            state.last_error = Some(message);
        });
    }

    /// Fallback mode persists the whole mirror synchronously with each
    /// mutation.
    async fn persist_mirror(&self) -> Result<(), AppError> {
        let snapshot = self.snapshot();
        self.local.save(keys::DOCTORS, &snapshot.doctors).await?;
        self.local.save(keys::DEPARTMENTS, &snapshot.departments).await?;
        self.local.save(keys::SERVICES, &snapshot.services).await?;
        self.local.save(keys::APPOINTMENTS, &snapshot.appointments).await?;
        self.local.save(keys::NOTICES, &snapshot.notices).await?;
        self.local.save(keys::CONFIG, &snapshot.config).await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Doctors
    // ------------------------------------------------------------------

    pub async fn add_doctor(&self, req: NewDoctorRequest) -> Result<(), AppError> {
        if !self.fallback_active() {
            let payload = serde_json::to_value(&req)?;
            match self.remote_insert(tables::DOCTORS, payload).await {
                Ok(()) => return self.finish_mutation().await,
                Err(e) if e.is_schema_missing() => self.enter_fallback("add doctor", &e),
                Err(e) => {
                    self.record_error("add doctor", &e);
                    return self.finish_mutation().await;
                }
            }
        }

        let doctor = Doctor {
            id: local_id(),
            name: req.name,
            qualification: req.qualification,
            department_id: req.department_id,
            photo: req.photo,
            available_days: req.available_days,
            time_slots: req.time_slots,
        };
        self.publish(|state| state.doctors.push(doctor));
        self.persist_mirror().await
    }

    pub async fn update_doctor(&self, id: &str, req: UpdateDoctorRequest) -> Result<(), AppError> {
        if !self.fallback_active() {
            let patch = serde_json::to_value(&req)?;
            match self.remote_update(tables::DOCTORS, id, patch).await {
                Ok(_) => return self.finish_mutation().await,
                Err(e) if e.is_schema_missing() => self.enter_fallback("update doctor", &e),
                Err(e) => {
                    self.record_error("update doctor", &e);
                    return self.finish_mutation().await;
                }
            }
        }

        self.publish(|state| {
            let Some(doctor) = state.doctors.iter_mut().find(|d| d.id == id) else {
                return;
            };
            if let Some(name) = req.name {
                doctor.name = name;
            }
            if let Some(qualification) = req.qualification {
                doctor.qualification = qualification;
            }
            if let Some(department_id) = req.department_id {
                doctor.department_id = department_id;
            }
            if let Some(photo) = req.photo {
                doctor.photo = photo;
            }
            if let Some(available_days) = req.available_days {
                doctor.available_days = available_days;
            }
            if let Some(time_slots) = req.time_slots {
                doctor.time_slots = time_slots;
            }
        });
        self.persist_mirror().await
    }

    pub async fn remove_doctor(&self, id: &str) -> Result<(), AppError> {
        if !self.fallback_active() {
            match self.remote_delete(tables::DOCTORS, id).await {
                Ok(()) => return self.finish_mutation().await,
                Err(e) if e.is_schema_missing() => self.enter_fallback("remove doctor", &e),
                Err(e) => {
                    self.record_error("remove doctor", &e);
                    return self.finish_mutation().await;
                }
            }
        }

        self.publish(|state| state.doctors.retain(|d| d.id != id));
        self.persist_mirror().await
    }

    // ------------------------------------------------------------------
    // Departments
    // ------------------------------------------------------------------

    pub async fn add_department(&self, req: NewDepartmentRequest) -> Result<(), AppError> {
        if !self.fallback_active() {
            let payload = serde_json::to_value(&req)?;
            match self.remote_insert(tables::DEPARTMENTS, payload).await {
                Ok(()) => return self.finish_mutation().await,
                Err(e) if e.is_schema_missing() => self.enter_fallback("add department", &e),
                Err(e) => {
                    self.record_error("add department", &e);
                    return self.finish_mutation().await;
                }
            }
        }

        let department = Department {
            id: local_id(),
            name: req.name,
            description: req.description,
            icon: req.icon,
        };
        self.publish(|state| state.departments.push(department));
        self.persist_mirror().await
    }

    pub async fn remove_department(&self, id: &str) -> Result<(), AppError> {
        if !self.fallback_active() {
            match self.remote_delete(tables::DEPARTMENTS, id).await {
                Ok(()) => return self.finish_mutation().await,
                Err(e) if e.is_schema_missing() => self.enter_fallback("remove department", &e),
                Err(e) => {
                    self.record_error("remove department", &e);
                    return self.finish_mutation().await;
                }
            }
        }

        self.publish(|state| state.departments.retain(|d| d.id != id));
        self.persist_mirror().await
    }

    // ------------------------------------------------------------------
    // Services
    // ------------------------------------------------------------------

    pub async fn add_service(&self, req: NewServiceRequest) -> Result<(), AppError> {
        if !self.fallback_active() {
            let payload = serde_json::to_value(&req)?;
            match self.remote_insert(tables::SERVICES, payload).await {
                Ok(()) => return self.finish_mutation().await,
                Err(e) if e.is_schema_missing() => self.enter_fallback("add service", &e),
                Err(e) => {
                    self.record_error("add service", &e);
                    return self.finish_mutation().await;
                }
            }
        }

        let service = Service {
            id: local_id(),
            title: req.title,
            description: req.description,
        };
        self.publish(|state| state.services.push(service));
        self.persist_mirror().await
    }

    pub async fn remove_service(&self, id: &str) -> Result<(), AppError> {
        if !self.fallback_active() {
            match self.remote_delete(tables::SERVICES, id).await {
                Ok(()) => return self.finish_mutation().await,
                Err(e) if e.is_schema_missing() => self.enter_fallback("remove service", &e),
                Err(e) => {
                    self.record_error("remove service", &e);
                    return self.finish_mutation().await;
                }
            }
        }

        self.publish(|state| state.services.retain(|s| s.id != id));
        self.persist_mirror().await
    }

    // ------------------------------------------------------------------
    // Notices
    // ------------------------------------------------------------------

    pub async fn add_notice(&self, req: NewNoticeRequest) -> Result<(), AppError> {
        if !self.fallback_active() {
            let payload = serde_json::to_value(&req)?;
            match self.remote_insert(tables::NOTICES, payload).await {
                Ok(()) => return self.finish_mutation().await,
                Err(e) if e.is_schema_missing() => self.enter_fallback("add notice", &e),
                Err(e) => {
                    self.record_error("add notice", &e);
                    return self.finish_mutation().await;
                }
            }
        }

        let notice = Notice {
            id: local_id(),
            title: req.title,
            content: req.content,
            date: req.date,
            is_important: req.is_important,
        };
        self.publish(|state| state.notices.insert(0, notice));
        self.persist_mirror().await
    }

    pub async fn remove_notice(&self, id: &str) -> Result<(), AppError> {
        if !self.fallback_active() {
            match self.remote_delete(tables::NOTICES, id).await {
                Ok(()) => return self.finish_mutation().await,
                Err(e) if e.is_schema_missing() => self.enter_fallback("remove notice", &e),
                Err(e) => {
                    self.record_error("remove notice", &e);
                    return self.finish_mutation().await;
                }
            }
        }

        self.publish(|state| state.notices.retain(|n| n.id != id));
        self.persist_mirror().await
    }

    // ------------------------------------------------------------------
    // Appointments
    // ------------------------------------------------------------------

    /// Bookings always start `Pending`; any status supplied by the caller is
    /// ignored.
    pub async fn book_appointment(&self, req: BookAppointmentRequest) -> Result<(), AppError> {
        if !self.fallback_active() {
            let mut payload = serde_json::to_value(&req)?;
            if let Some(fields) = payload.as_object_mut() {
                fields.insert(
                    "status".to_string(),
                    json!(AppointmentStatus::Pending.as_str()),
                );
            }
            match self.remote_insert(tables::APPOINTMENTS, payload).await {
                Ok(()) => return self.finish_mutation().await,
                Err(e) if e.is_schema_missing() => self.enter_fallback("book appointment", &e),
                Err(e) => {
                    self.record_error("book appointment", &e);
                    return self.finish_mutation().await;
                }
            }
        }

        let appointment = Appointment {
            id: local_id(),
            patient_name: req.patient_name,
            patient_phone: req.patient_phone,
            patient_email: req.patient_email,
            doctor_id: req.doctor_id,
            date: req.date,
            time_slot: req.time_slot,
            status: AppointmentStatus::Pending,
        };
        self.publish(|state| state.appointments.insert(0, appointment));
        self.persist_mirror().await
    }

    pub async fn update_appointment(
        &self,
        id: &str,
        req: UpdateAppointmentRequest,
    ) -> Result<(), AppError> {
        if !self.fallback_active() {
            let patch = serde_json::to_value(&req)?;
            match self.remote_update(tables::APPOINTMENTS, id, patch).await {
                Ok(_) => return self.finish_mutation().await,
                Err(e) if e.is_schema_missing() => self.enter_fallback("update appointment", &e),
                Err(e) => {
                    self.record_error("update appointment", &e);
                    return self.finish_mutation().await;
                }
            }
        }

        self.publish(|state| {
            let Some(appointment) = state.appointments.iter_mut().find(|a| a.id == id) else {
                return;
            };
            if let Some(patient_name) = req.patient_name {
                appointment.patient_name = patient_name;
            }
            if let Some(patient_phone) = req.patient_phone {
                appointment.patient_phone = patient_phone;
            }
            if let Some(patient_email) = req.patient_email {
                appointment.patient_email = patient_email;
            }
            if let Some(doctor_id) = req.doctor_id {
                appointment.doctor_id = doctor_id;
            }
            if let Some(date) = req.date {
                appointment.date = date;
            }
            if let Some(time_slot) = req.time_slot {
                appointment.time_slot = time_slot;
            }
            if let Some(status) = req.status {
                appointment.status = status;
            }
        });
        self.persist_mirror().await
    }

    pub async fn update_appointment_status(
        &self,
        id: &str,
        status: AppointmentStatus,
    ) -> Result<(), AppError> {
        if !self.fallback_active() {
            let patch = json!({ "status": status.as_str() });
            match self.remote_update(tables::APPOINTMENTS, id, patch).await {
                Ok(_) => return self.finish_mutation().await,
                Err(e) if e.is_schema_missing() => self.enter_fallback("update status", &e),
                Err(e) => {
                    self.record_error("update status", &e);
                    return self.finish_mutation().await;
                }
            }
        }

        self.publish(|state| {
            if let Some(appointment) = state.appointments.iter_mut().find(|a| a.id == id) {
                appointment.status = status;
            }
        });
        self.persist_mirror().await
    }

    pub async fn remove_appointment(&self, id: &str) -> Result<(), AppError> {
        if !self.fallback_active() {
            match self.remote_delete(tables::APPOINTMENTS, id).await {
                Ok(()) => return self.finish_mutation().await,
                Err(e) if e.is_schema_missing() => self.enter_fallback("remove appointment", &e),
                Err(e) => {
                    self.record_error("remove appointment", &e);
                    return self.finish_mutation().await;
                }
            }
        }

        self.publish(|state| state.appointments.retain(|a| a.id != id));
        self.persist_mirror().await
    }

    // ------------------------------------------------------------------
    // Config
    // ------------------------------------------------------------------

    /// Upsert against the well-known singleton row: update first, insert
    /// with the fixed id when no row exists yet.
    pub async fn update_config(&self, req: UpdateConfigRequest) -> Result<(), AppError> {
        if !self.fallback_active() {
            let patch = serde_json::to_value(&req)?;
            match self
                .remote_update(tables::HOSPITAL_CONFIG, CONFIG_ROW_ID, patch.clone())
                .await
            {
                Ok(rows) if rows.is_empty() => {
                    let mut row = patch.as_object().cloned().unwrap_or_default();
                    row.insert("id".to_string(), json!(CONFIG_ROW_ID));
                    match self
                        .remote_insert(tables::HOSPITAL_CONFIG, Value::Object(row))
                        .await
                    {
                        Ok(()) => return self.finish_mutation().await,
                        Err(e) if e.is_schema_missing() => {
                            self.enter_fallback("update config", &e)
                        }
                        Err(e) => {
                            self.record_error("update config", &e);
                            return self.finish_mutation().await;
                        }
                    }
                }
                Ok(_) => return self.finish_mutation().await,
                Err(e) if e.is_schema_missing() => self.enter_fallback("update config", &e),
                Err(e) => {
                    self.record_error("update config", &e);
                    return self.finish_mutation().await;
                }
            }
        }

        self.publish(|state| {
            if let Some(name) = req.name {
                state.config.name = name;
            }
            if let Some(logo) = req.logo {
                state.config.logo = logo;
            }
            if let Some(address) = req.address {
                state.config.address = address;
            }
            if let Some(phone) = req.phone {
                state.config.phone = phone;
            }
            if let Some(email) = req.email {
                state.config.email = email;
            }
        });
        self.persist_mirror().await
    }
}

fn local_id() -> String {
    Uuid::new_v4().to_string()
}

fn unavailable(table: &str, missing: Option<AppError>) -> AppError {
    missing.unwrap_or_else(|| {
        AppError::SchemaMissing(format!("no table candidates for \"{}\"", table))
    })
}

fn normalize_rows<T>(rows: &[Value], normalize_one: impl Fn(&RawRow) -> T) -> Vec<T> {
    rows.iter()
        .filter_map(|row| match row.as_object() {
            Some(fields) => Some(normalize_one(fields)),
            None => {
                warn!("skipping non-object row: {}", row);
                None
            }
        })
        .collect()
}
