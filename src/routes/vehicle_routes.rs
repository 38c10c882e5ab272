use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::vehicle_dto::{
    AvailabilityQuery, AvailabilityResponse, CreateVehicleRequest, VehicleEnvelope,
    VehicleListResponse,
};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::validation::{ValidatedJson, ValidatedQuery};

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vehicles).post(create_vehicle))
        .route("/available", get(available_vehicles))
        .route("/:id", delete(delete_vehicle))
}

async fn create_vehicle(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateVehicleRequest>,
) -> Result<(StatusCode, Json<VehicleEnvelope>), AppError> {
    let controller = VehicleController::new(&state);
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_vehicles(
    State(state): State<AppState>,
) -> Result<Json<VehicleListResponse>, AppError> {
    let controller = VehicleController::new(&state);
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn available_vehicles(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let controller = VehicleController::new(&state);
    let response = controller.available(query).await?;
    Ok(Json(response))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<VehicleEnvelope>, AppError> {
    let controller = VehicleController::new(&state);
    let response = controller.delete(&id).await?;
    Ok(Json(response))
}
