//! HTTP API module for the shift ledger.
//!
//! This module exposes registration of workplaces and workers, contract and
//! shift scheduling, monthly wages and monthly workplace reports over REST.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    CloseContractRequest, CreateContractRequest, CreateWorkerRequest, CreateWorkplaceRequest,
    ReportFormat, ReportQuery, SaveShiftRequest, WagesQuery,
};
pub use response::{ApiError, WagesResponse};
pub use state::AppState;
