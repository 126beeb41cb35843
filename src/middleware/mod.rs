//! App-wide middleware. Route-level authentication lives in `crate::auth`.

pub mod recover;
pub mod request_id;

pub use recover::CatchPanic;
pub use request_id::{RequestId, RequestIdMiddleware, X_REQUEST_ID};
