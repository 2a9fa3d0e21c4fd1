//! HTTP middleware components.

pub mod rate_limit;

pub use rate_limit::{RateLimiter, enforce_rate_limit, get_client_id, rate_limit_response};
