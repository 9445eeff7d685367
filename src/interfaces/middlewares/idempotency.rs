use actix_web::{
    body::{to_bytes, BoxBody},
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorInternalServerError,
    http::{header::{HeaderName, HeaderValue}, Method, StatusCode},
    web::Bytes,
    Error, HttpResponse, ResponseError,
};
use dashmap::DashMap;
use futures_util::future::{ok, Ready, LocalBoxFuture};
use std::{
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
    time::{Duration, Instant},
};
use tokio::sync::Mutex;

use crate::{constants::{IDEMPOTENCY_KEY_HEADER, IDEMPOTENCY_KEY_LEN}, errors::AssetError};

#[derive(Debug, Clone)]
struct CachedResponse {
    status: StatusCode,
    headers: Vec<(HeaderName, HeaderValue)>,
    body: Bytes,
    stored_at: Instant,
}

impl CachedResponse {
    fn to_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status);
        for (name, value) in &self.headers {
            builder.append_header((name.clone(), value.clone()));
        }
        builder.body(self.body.clone())
    }
}

type Slot = Arc<Mutex<Option<CachedResponse>>>;

/// Responses recorded per idempotency key. Cloning shares the same map.
#[derive(Clone)]
pub struct IdempotencyStore {
    entries: Arc<DashMap<String, Slot>>,
    ttl: Duration,
}

impl IdempotencyStore {
    pub fn new(ttl: Duration) -> Self {
        IdempotencyStore {
            entries: Arc::new(DashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn slot(&self, key: &str) -> Slot {
        self.entries
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(None)))
            .clone()
    }

    fn is_fresh(&self, cached: &CachedResponse) -> bool {
        cached.stored_at.elapsed() < self.ttl
    }

    /// Drops expired and abandoned entries. Slots still in use are kept.
    pub fn purge_expired(&self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, slot| match slot.try_lock() {
            Ok(guard) => guard.as_ref().is_some_and(|cached| self.is_fresh(cached)),
            Err(_) => true,
        });
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Replays the first response for repeated unsafe requests carrying the same
/// `X-Idempotency-Key`. Requests without the header pass straight through.
pub struct Idempotency {
    store: IdempotencyStore,
}

impl Idempotency {
    pub fn new(store: IdempotencyStore) -> Self {
        Idempotency { store }
    }
}

impl<S> Transform<S, ServiceRequest> for Idempotency
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = IdempotencyService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(IdempotencyService {
            service: Rc::new(service),
            store: self.store.clone(),
        })
    }
}

pub struct IdempotencyService<S> {
    service: Rc<S>,
    store: IdempotencyStore,
}

impl<S> Service<ServiceRequest> for IdempotencyService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let store = self.store.clone();

        Box::pin(async move {
            if is_safe_method(req.method()) {
                return service.call(req).await;
            }

            let key = match req.headers().get(IDEMPOTENCY_KEY_HEADER) {
                None => return service.call(req).await,
                Some(value) => match value.to_str() {
                    Ok(key) if key.len() == IDEMPOTENCY_KEY_LEN => key.to_string(),
                    _ => {
                        tracing::warn!("Rejected malformed idempotency key");
                        let res = AssetError::InvalidIdempotencyKey.error_response();
                        return Ok(req.into_response(res));
                    }
                },
            };

            let slot = store.slot(&key);
            let mut guard = slot.lock().await;

            if let Some(cached) = guard.as_ref().filter(|cached| store.is_fresh(cached)) {
                tracing::info!(key = %key, "Replaying cached response");
                return Ok(req.into_response(cached.to_response()));
            }

            let res = service.call(req).await?;
            let (http_req, http_res) = res.into_parts();
            let (head, body) = http_res.into_parts();
            let body = to_bytes(body)
                .await
                .map_err(|e| ErrorInternalServerError(e.to_string()))?;

            *guard = Some(CachedResponse {
                status: head.status(),
                headers: head
                    .headers()
                    .iter()
                    .map(|(name, value)| (name.clone(), value.clone()))
                    .collect(),
                body: body.clone(),
                stored_at: Instant::now(),
            });

            Ok(ServiceResponse::new(http_req, head.set_body(BoxBody::new(body))))
        })
    }
}

fn is_safe_method(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS | Method::TRACE)
}
