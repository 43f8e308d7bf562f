// =====================================================================================
// MONITORING CELL - STORE REACHABILITY HEALTH CHECK
// =====================================================================================

pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{HealthResponse, HealthStatus};
pub use router::monitoring_routes;
pub use services::HealthService;
