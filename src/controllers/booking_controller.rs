use crate::controllers::parse_id;
use crate::dto::booking_dto::{
    BookingEnvelope, BookingListQuery, BookingListResponse, BookingResponse, CreateBookingRequest,
};
use crate::services::BookingService;
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, AppError};
use crate::utils::validation::validate_datetime;

pub struct BookingController {
    bookings: BookingService,
    list_limit: i64,
}

impl BookingController {
    pub fn new(state: &AppState) -> Self {
        Self {
            bookings: state.bookings.clone(),
            list_limit: state.config.booking_list_limit,
        }
    }

    pub async fn create(&self, request: CreateBookingRequest) -> Result<BookingEnvelope, AppError> {
        let vehicle_id = parse_id(&request.vehicle_id, "Vehicle")?;
        let start_time = validate_datetime(&request.start_time)
            .map_err(|_| bad_request_error("Invalid start time format"))?;

        let details = self
            .bookings
            .book(
                vehicle_id,
                &request.customer_id,
                &request.from_pincode,
                &request.to_pincode,
                start_time,
            )
            .await?;

        Ok(BookingEnvelope {
            message: "Booking created".to_string(),
            booking: details.into(),
        })
    }

    pub async fn list(&self, query: BookingListQuery) -> Result<BookingListResponse, AppError> {
        let limit = query.limit_or(self.list_limit)?;
        let items = self.bookings.list(limit).await?;

        Ok(BookingListResponse {
            items: items.into_iter().map(BookingResponse::from).collect(),
        })
    }

    pub async fn delete(&self, raw_id: &str) -> Result<BookingEnvelope, AppError> {
        let id = parse_id(raw_id, "Booking")?;
        let booking = self.bookings.cancel(id).await?;

        Ok(BookingEnvelope {
            message: "Booking cancelled".to_string(),
            booking: booking.into(),
        })
    }
}
