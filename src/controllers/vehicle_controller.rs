use crate::controllers::parse_id;
use crate::dto::vehicle_dto::{
    AvailabilityQuery, AvailabilityResponse, CreateVehicleRequest, VehicleEnvelope,
    VehicleListResponse, VehicleResponse,
};
use crate::services::{AvailabilityService, VehicleService};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub struct VehicleController {
    vehicles: VehicleService,
    availability: AvailabilityService,
}

impl VehicleController {
    pub fn new(state: &AppState) -> Self {
        Self {
            vehicles: state.vehicles.clone(),
            availability: state.availability.clone(),
        }
    }

    pub async fn create(&self, request: CreateVehicleRequest) -> Result<VehicleEnvelope, AppError> {
        let vehicle = self
            .vehicles
            .register(&request.name, request.capacity_kg, request.tyres)
            .await?;

        Ok(VehicleEnvelope {
            message: "Vehicle created".to_string(),
            vehicle: vehicle.into(),
        })
    }

    pub async fn list(&self) -> Result<VehicleListResponse, AppError> {
        let vehicles = self.vehicles.list().await?;
        Ok(VehicleListResponse {
            vehicles: vehicles.into_iter().map(VehicleResponse::from).collect(),
        })
    }

    pub async fn available(&self, query: AvailabilityQuery) -> Result<AvailabilityResponse, AppError> {
        let params = query.parse()?;
        let result = self
            .availability
            .search(
                params.capacity_required,
                &params.from_pincode,
                &params.to_pincode,
                params.start_time,
            )
            .await?;

        Ok(AvailabilityResponse {
            estimated_ride_duration_hours: result.estimated_ride_duration_hours,
            available: result.available.into_iter().map(VehicleResponse::from).collect(),
        })
    }

    pub async fn delete(&self, raw_id: &str) -> Result<VehicleEnvelope, AppError> {
        let id = parse_id(raw_id, "Vehicle")?;
        let vehicle = self.vehicles.remove(id).await?;

        Ok(VehicleEnvelope {
            message: "Vehicle deleted".to_string(),
            vehicle: vehicle.into(),
        })
    }
}
