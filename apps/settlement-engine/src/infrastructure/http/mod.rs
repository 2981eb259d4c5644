//! HTTP/REST API adapter.
//!
//! Inbound adapter implementing REST endpoints that delegate to the engines.

mod controller;
mod extract;
mod request;
mod response;

pub use controller::{AppState, create_router};
pub use extract::{CallerId, JsonBody, QueryParams, USER_ID_HEADER};
pub use request::*;
pub use response::*;
