//! HTTP API module for the Daily Payment Engine.
//!
//! This module provides the REST endpoints for computing a day statelessly,
//! editing the day ledger, closing and reopening days, and reading the
//! audit log.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    ActorQuery, AdjustmentRequest, AuditQuery, CalculationRequest, CloseDayRequest,
    HourOverrideRequest, PaymentStatusRequest, ReopenDayRequest, ScopeQuery,
};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
