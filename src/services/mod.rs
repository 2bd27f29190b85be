//! Services module
//!
//! The facades the dashboards talk to. Each service checks the caller's role,
//! validates its input and delegates transport to a repository.

pub mod account_service;
pub mod auth_service;
pub mod dashboard_service;
pub mod lease_request_service;
pub mod otp_service;
pub mod quotation_service;
pub mod vehicle_lookup_service;

pub use account_service::AccountService;
pub use auth_service::{AuthService, SessionStore};
pub use dashboard_service::DashboardService;
pub use lease_request_service::LeaseRequestService;
pub use otp_service::OtpService;
pub use quotation_service::{QuotationPdf, QuotationService};
pub use vehicle_lookup_service::VehicleLookupService;
