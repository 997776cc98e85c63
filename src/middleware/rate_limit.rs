use std::{
    collections::HashMap,
    net::{IpAddr, SocketAddr},
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use axum::{
    Json,
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderValue, Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{
    response::{ApiResponse, Meta},
    state::AppState,
};

pub const WINDOW: Duration = Duration::from_secs(60);

// Expired windows are swept once the map grows past this.
const SWEEP_THRESHOLD: usize = 10_000;

/// Client address, or `None` when the server was not started with
/// connect info (all such requests share one bucket).
pub type RateLimitKey = Option<IpAddr>;

/// Fixed-window request counter per client address.
#[derive(Clone, Debug, Default)]
pub struct RateLimiter {
    state: Arc<Mutex<HashMap<RateLimitKey, (u64, Instant)>>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one request for `key`; `false` once `limit` is exceeded
    /// inside the current window.
    pub fn check(&self, key: RateLimitKey, limit: u64) -> bool {
        self.check_at(key, limit, Instant::now())
    }

    fn check_at(&self, key: RateLimitKey, limit: u64, now: Instant) -> bool {
        let mut state = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::error!("rate limiter lock poisoned, continuing with stale counters");
                poisoned.into_inner()
            }
        };

        if state.len() > SWEEP_THRESHOLD {
            state.retain(|_, (_, start)| now.duration_since(*start) <= WINDOW);
        }

        let (count, start) = state.entry(key).or_insert((0, now));
        if now.duration_since(*start) > WINDOW {
            *count = 1;
            *start = now;
            true
        } else {
            *count += 1;
            *count <= limit
        }
    }
}

/// Rejects clients that exceed `API_RATE_LIMIT` requests per minute.
pub async fn rate_limit(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let key = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    if !state.rate_limiter.check(key, state.config.api_rate_limit) {
        tracing::warn!(client = ?key, "rate limit exceeded");
        let body = ApiResponse::success(
            "Too Many Requests",
            serde_json::json!({ "error": "Too Many Requests" }),
            Some(Meta::empty()),
        );
        let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
        response.headers_mut().insert(
            header::RETRY_AFTER,
            HeaderValue::from_static("60"),
        );
        return response;
    }

    next.run(req).await
}
