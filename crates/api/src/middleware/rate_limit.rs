//! Rate limiting middleware.
//!
//! Limits RSVP submissions per client IP. The guest form is unauthenticated,
//! so the address is the only stable key available. `X-Forwarded-For` is
//! only consulted when `security.trust_forwarded_for` is set, i.e. when a
//! reverse proxy in front of the service overwrites it.

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{
    clock::{Clock, DefaultClock},
    state::keyed::DefaultKeyedStateStore,
    Quota, RateLimiter as GovRateLimiter,
};
use std::{net::SocketAddr, num::NonZeroU32};

use crate::app::AppState;
use crate::error::ApiError;

type IpRateLimiter = GovRateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>;

/// Key used when neither a forwarded header nor the peer address is known.
const UNKNOWN_CLIENT: &str = "unknown";

/// Tracked clients above which refilled buckets are pruned.
const PRUNE_THRESHOLD: usize = 10_000;

/// Rate limiter state shared across all requests.
pub struct RateLimiterState {
    limiter: IpRateLimiter,
    rate_limit_per_minute: u32,
}

impl RateLimiterState {
    /// Returns `None` when the limit is 0 (disabled).
    pub fn new(rate_limit_per_minute: u32) -> Option<Self> {
        let per_minute = NonZeroU32::new(rate_limit_per_minute)?;
        Some(Self {
            limiter: GovRateLimiter::keyed(Quota::per_minute(per_minute)),
            rate_limit_per_minute,
        })
    }

    pub fn rate_limit_per_minute(&self) -> u32 {
        self.rate_limit_per_minute
    }

    /// Ok if allowed, otherwise the retry-after delay in whole seconds (at least 1).
    pub fn check(&self, client: &str) -> Result<(), u64> {
        match self.limiter.check_key(&client.to_string()) {
            Ok(_) => Ok(()),
            Err(not_until) => {
                let wait_time = not_until.wait_time_from(DefaultClock::default().now());
                Err(wait_time.as_secs().max(1))
            }
        }
    }

    /// Drops buckets that have fully refilled.
    pub fn prune(&self) {
        self.limiter.retain_recent();
    }

    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }
}

impl std::fmt::Debug for RateLimiterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiterState")
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("tracked_clients", &self.tracked_clients())
            .finish()
    }
}

/// Socket peer address, or the first `X-Forwarded-For` hop when the proxy is trusted.
pub fn client_key(req: &Request<Body>, trust_forwarded_for: bool) -> String {
    if trust_forwarded_for {
        let forwarded = req
            .headers()
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        if let Some(ip) = forwarded {
            return ip.to_string();
        }
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

/// Middleware that applies the per-IP submission limit.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(ref rate_limiter) = state.rate_limiter {
        if rate_limiter.tracked_clients() > PRUNE_THRESHOLD {
            rate_limiter.prune();
        }
        let client = client_key(&req, state.config.security.trust_forwarded_for);
        if let Err(retry_after) = rate_limiter.check(&client) {
            tracing::warn!(
                client = %client,
                limit = rate_limiter.rate_limit_per_minute(),
                retry_after,
                "Submission rate limit exceeded"
            );
            return ApiError::RateLimited { retry_after }.into_response();
        }
    }

    next.run(req).await
}
