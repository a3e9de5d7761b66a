use axum::Json;
use axum::extract::Path;
use axum::routing::{delete, patch, post};
use axum::{Router, extract::State, http::StatusCode, routing::get};
use serde::Deserialize;

use crate::error::AppError;
use crate::models::*;
use crate::state::AppState;
use crate::store::HospitalState;

#[derive(Deserialize)]
struct UpdateStatusRequest {
    status: AppointmentStatus,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/state", get(full_state))
        .route("/refresh", post(refresh_now))
        .route("/doctors", get(list_doctors).post(create_doctor))
        .route("/doctors/{id}", patch(update_doctor).delete(delete_doctor))
        .route("/departments", get(list_departments).post(create_department))
        .route("/departments/{id}", delete(delete_department))
        .route("/services", get(list_services).post(create_service))
        .route("/services/{id}", delete(delete_service))
        .route("/notices", get(list_notices).post(create_notice))
        .route("/notices/{id}", delete(delete_notice))
        .route("/appointments", get(list_appointments).post(book_appointment))
        .route(
            "/appointments/{id}",
            patch(update_appointment).delete(delete_appointment),
        )
        .route("/appointments/{id}/status", patch(update_appointment_status))
        .route("/config", get(get_config).put(update_config))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1")
        .execute(state.store.local().pool())
        .await?;
    Ok(StatusCode::OK)
}

/// Full snapshot including the connectivity and fallback flags. Consumers
/// must treat each response as a whole-state replacement.
async fn full_state(State(state): State<AppState>) -> Json<HospitalState> {
    Json(state.store.snapshot())
}

async fn refresh_now(State(state): State<AppState>) -> Json<HospitalState> {
    state.store.refresh_forced().await;
    Json(state.store.snapshot())
}

async fn list_doctors(State(state): State<AppState>) -> Json<Vec<Doctor>> {
    Json(state.store.snapshot().doctors)
}

async fn create_doctor(
    State(state): State<AppState>,
    Json(req): Json<NewDoctorRequest>,
) -> Result<Json<Vec<Doctor>>, AppError> {
    state.store.add_doctor(req).await?;
    Ok(Json(state.store.snapshot().doctors))
}

async fn update_doctor(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateDoctorRequest>,
) -> Result<Json<Vec<Doctor>>, AppError> {
    state.store.update_doctor(&id, req).await?;
    Ok(Json(state.store.snapshot().doctors))
}

async fn delete_doctor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Doctor>>, AppError> {
    state.store.remove_doctor(&id).await?;
    Ok(Json(state.store.snapshot().doctors))
}

async fn list_departments(State(state): State<AppState>) -> Json<Vec<Department>> {
    Json(state.store.snapshot().departments)
}

async fn create_department(
    State(state): State<AppState>,
    Json(req): Json<NewDepartmentRequest>,
) -> Result<Json<Vec<Department>>, AppError> {
    state.store.add_department(req).await?;
    Ok(Json(state.store.snapshot().departments))
}

async fn delete_department(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Department>>, AppError> {
    state.store.remove_department(&id).await?;
    Ok(Json(state.store.snapshot().departments))
}

async fn list_services(State(state): State<AppState>) -> Json<Vec<Service>> {
    Json(state.store.snapshot().services)
}

async fn create_service(
    State(state): State<AppState>,
    Json(req): Json<NewServiceRequest>,
) -> Result<Json<Vec<Service>>, AppError> {
    state.store.add_service(req).await?;
    Ok(Json(state.store.snapshot().services))
}

async fn delete_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Service>>, AppError> {
    state.store.remove_service(&id).await?;
    Ok(Json(state.store.snapshot().services))
}

async fn list_notices(State(state): State<AppState>) -> Json<Vec<Notice>> {
    Json(state.store.snapshot().notices)
}

async fn create_notice(
    State(state): State<AppState>,
    Json(req): Json<NewNoticeRequest>,
) -> Result<Json<Vec<Notice>>, AppError> {
    state.store.add_notice(req).await?;
    Ok(Json(state.store.snapshot().notices))
}

async fn delete_notice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Notice>>, AppError> {
    state.store.remove_notice(&id).await?;
    Ok(Json(state.store.snapshot().notices))
}

async fn list_appointments(State(state): State<AppState>) -> Json<Vec<Appointment>> {
    Json(state.store.snapshot().appointments)
}

async fn book_appointment(
    State(state): State<AppState>,
    Json(req): Json<BookAppointmentRequest>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    state.store.book_appointment(req).await?;
    Ok(Json(state.store.snapshot().appointments))
}

async fn update_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateAppointmentRequest>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    state.store.update_appointment(&id, req).await?;
    Ok(Json(state.store.snapshot().appointments))
}

async fn update_appointment_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    state
        .store
        .update_appointment_status(&id, req.status)
        .await?;
    Ok(Json(state.store.snapshot().appointments))
}

async fn delete_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    state.store.remove_appointment(&id).await?;
    Ok(Json(state.store.snapshot().appointments))
}

async fn get_config(State(state): State<AppState>) -> Json<HospitalConfig> {
    Json(state.store.snapshot().config)
}

async fn update_config(
    State(state): State<AppState>,
    Json(req): Json<UpdateConfigRequest>,
) -> Result<Json<HospitalConfig>, AppError> {
    state.store.update_config(req).await?;
    Ok(Json(state.store.snapshot().config))
}
