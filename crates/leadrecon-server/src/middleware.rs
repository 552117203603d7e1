use std::{
    collections::HashMap,
    net::{IpAddr, SocketAddr},
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header::RETRY_AFTER, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::api::ApiError;

const REQUEST_ID_HEADER: &str = "x-request-id";
const MAX_REQUEST_ID_LEN: usize = 128;

/// Request ID carried as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Keeps a caller-supplied `x-request-id` when it is short printable ASCII,
/// otherwise assigns a fresh `UUIDv4`. The id is stored as a [`RequestId`]
/// extension and echoed on the response.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| is_usable_request_id(v))
        .map_or_else(|| Uuid::new_v4().to_string(), ToOwned::to_owned);

    req.extensions_mut().insert(RequestId(id.clone()));
    let mut res = next.run(req).await;
    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, val);
    }
    res
}

fn is_usable_request_id(id: &str) -> bool {
    !id.is_empty() && id.len() <= MAX_REQUEST_ID_LEN && id.bytes().all(|b| b.is_ascii_graphic())
}

/// Which caller a comparison request is charged to. Requests served without
/// connection info (in-process tests) share one anonymous budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Client {
    Peer(IpAddr),
    Anonymous,
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started_at: Instant,
    count: usize,
}

/// Fixed-window limiter on comparison requests, one window per client IP.
/// Windows that have elapsed are pruned on every charge.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    max_requests: usize,
    window: Duration,
    clients: Arc<Mutex<HashMap<Client, Window>>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            clients: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    #[must_use]
    pub fn per_minute(max_requests: usize) -> Self {
        Self::new(max_requests, Duration::from_secs(60))
    }

    /// Charges one request to `client` at `now`. Returns the time left in the
    /// client's window when its budget is spent.
    async fn charge(&self, client: Client, now: Instant) -> Result<(), Duration> {
        let mut clients = self.clients.lock().await;
        clients.retain(|_, w| now.duration_since(w.started_at) < self.window);

        let window = clients.entry(client).or_insert(Window {
            started_at: now,
            count: 0,
        });
        if window.count >= self.max_requests {
            return Err(self
                .window
                .saturating_sub(now.duration_since(window.started_at)));
        }
        window.count += 1;
        Ok(())
    }
}

pub async fn enforce_rate_limit(
    State(rate_limit): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    let client = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or(Client::Anonymous, |ConnectInfo(addr)| Client::Peer(addr.ip()));

    match rate_limit.charge(client, Instant::now()).await {
        Ok(()) => next.run(req).await,
        Err(retry_in) => {
            let request_id = req
                .extensions()
                .get::<RequestId>()
                .map(|id| id.0.clone())
                .unwrap_or_default();
            tracing::warn!(?client, request_id = %request_id, "comparison rate limit hit");

            let mut res = ApiError::new(
                request_id,
                "rate_limited",
                "too many comparison requests; retry later",
            )
            .into_response();
            let secs = retry_in.as_secs().max(1);
            if let Ok(val) = HeaderValue::from_str(&secs.to_string()) {
                res.headers_mut().insert(RETRY_AFTER, val);
            }
            res
        }
    }
}
