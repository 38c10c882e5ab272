use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use crate::controllers::booking_controller::BookingController;
use crate::dto::booking_dto::{
    BookingEnvelope, BookingListQuery, BookingListResponse, CreateBookingRequest,
};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::validation::{ValidatedJson, ValidatedQuery};

pub fn create_booking_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_bookings).post(create_booking))
        .route("/:id", delete(delete_booking))
}

async fn create_booking(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingEnvelope>), AppError> {
    let controller = BookingController::new(&state);
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_bookings(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<BookingListQuery>,
) -> Result<Json<BookingListResponse>, AppError> {
    let controller = BookingController::new(&state);
    let response = controller.list(query).await?;
    Ok(Json(response))
}

async fn delete_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BookingEnvelope>, AppError> {
    let controller = BookingController::new(&state);
    let response = controller.delete(&id).await?;
    Ok(Json(response))
}
