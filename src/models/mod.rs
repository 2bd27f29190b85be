//! Domain models
//!
//! Records as the backend and the local store hold them, plus the pure
//! derivations (totals, expiry flags, counts) computed over them.

pub mod lease_request;
pub mod quotation;
pub mod status;
pub mod user;
pub mod vehicle;

/// Backend identifiers are 64-bit integers
pub type EntityId = i64;

pub use lease_request::{request_stats, LeaseRequest, VehicleType};
pub use quotation::{Quotation, QuotationSummary, QuotationTotals};
pub use status::{effective_status, RequestStatus, StatusCounts};
pub use user::{SessionContext, UserProfile, UserRole};
pub use vehicle::{SavedVehicle, VehicleDetails};
