pub mod api_response;
pub mod auth_dto;
pub mod lease_request_dto;
pub mod quotation_dto;
pub mod user_dto;
pub mod vehicle_dto;

pub use api_response::ApiResponse;
