//! Rate limiting middleware.
//!
//! Fixed-window counters per (route, client), held in a process-wide map.
//! The window is one minute; the limit comes from
//! `API_REQUEST_LIMIT_PER_MINUTE`.

use std::net::SocketAddr;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::{ConnectInfo, MatchedPath, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use dashmap::DashMap;
use tracing::debug;

use crate::state::AppState;

/// Window length in seconds.
const WINDOW_SECS: u64 = 60;

/// Counter map size at which stale windows are swept out.
const SWEEP_THRESHOLD: usize = 100_000;

/// Per-key counter for the current window.
#[derive(Debug, Clone, Copy)]
struct WindowCounter {
    bucket: u64,
    count: u32,
}

/// Process-wide rate limiter keyed by route and client identity.
#[derive(Debug)]
pub struct RateLimiter {
    limit_per_minute: u32,
    counters: DashMap<String, WindowCounter>,
}

impl RateLimiter {
    /// Create a new rate limiter.
    pub fn new(limit_per_minute: u32) -> Self {
        Self {
            limit_per_minute,
            counters: DashMap::new(),
        }
    }

    /// Check if a request should be rate limited.
    ///
    /// Returns Ok(()) if allowed, Err with retry-after seconds if limited.
    pub fn check(&self, route: &str, client: &str) -> Result<(), u64> {
        let now_secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        self.check_at(route, client, now_secs)
    }

    fn check_at(&self, route: &str, client: &str, now_secs: u64) -> Result<(), u64> {
        let bucket = now_secs / WINDOW_SECS;

        if self.counters.len() > SWEEP_THRESHOLD {
            self.counters.retain(|_, c| c.bucket == bucket);
        }

        let key = format!("rate:{route}:{client}");
        let mut entry = self
            .counters
            .entry(key)
            .or_insert(WindowCounter { bucket, count: 0 });
        if entry.bucket != bucket {
            *entry = WindowCounter { bucket, count: 0 };
        }
        entry.count += 1;

        if entry.count > self.limit_per_minute {
            let count = entry.count;
            drop(entry);
            debug!(
                route = route,
                client = client,
                count = count,
                limit = self.limit_per_minute,
                "rate limit exceeded"
            );
            Err(WINDOW_SECS - (now_secs % WINDOW_SECS))
        } else {
            Ok(())
        }
    }
}

/// Get the client identifier (IP address) for rate limiting.
pub fn get_client_id(addr: Option<SocketAddr>, headers: &axum::http::HeaderMap) -> String {
    // Check X-Forwarded-For header first (for proxied requests)
    if let Some(forwarded) = headers.get("x-forwarded-for")
        && let Ok(value) = forwarded.to_str()
        && let Some(ip) = value.split(',').next()
    {
        return ip.trim().to_string();
    }

    // Check X-Real-IP header
    if let Some(real_ip) = headers.get("x-real-ip")
        && let Ok(value) = real_ip.to_str()
    {
        return value.to_string();
    }

    // Fall back to connection address
    addr.map(|a| a.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Rate limit exceeded response.
pub fn rate_limit_response(retry_after: u64) -> Response {
    (
        StatusCode::TOO_MANY_REQUESTS,
        [
            ("retry-after", retry_after.to_string()),
            ("content-type", "application/json".to_string()),
        ],
        format!(r#"{{"error":"Rate limit exceeded","retry_after":{retry_after}}}"#),
    )
        .into_response()
}

/// Middleware enforcing the per-route, per-client request limit on the API.
pub async fn enforce_rate_limit(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    if !req.uri().path().starts_with("/v1/") {
        return next.run(req).await;
    }

    // Prefer the matched route template so every id under one endpoint
    // shares a window.
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let addr = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0);
    let client = get_client_id(addr, req.headers());

    match state.rate_limiter().check(&route, &client) {
        Ok(()) => next.run(req).await,
        Err(retry_after) => rate_limit_response(retry_after),
    }
}
