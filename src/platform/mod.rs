/// Platform binding accessor
///
/// The execution context is installed on every request as an axum
/// `Extension`. Handlers take a [`Platform`] argument, which resolves the
/// relational binding, the object store binding and the raw environment map
/// from that context. Nothing is cached between calls: every extraction clones
/// the handles out of the context again.

pub mod clock;

pub use clock::{Clock, FixedClock, SystemClock};

use crate::{api::error::ApiError, project::ProjectStore, storage::ObjectStore};
use axum::{extract::FromRequestParts, http::request::Parts};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Per-request environment supplied by the hosting server
///
/// A binding that was not configured for this deployment is `None`.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    db: Option<ProjectStore>,
    storage: Option<Arc<dyn ObjectStore>>,
    env: Arc<BTreeMap<String, String>>,
    clock: Arc<dyn Clock>,
}

impl ExecutionContext {
    /// Context with no bindings and the system clock
    pub fn new(env: BTreeMap<String, String>) -> Self {
        Self {
            db: None,
            storage: None,
            env: Arc::new(env),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_database(mut self, db: ProjectStore) -> Self {
        self.db = Some(db);
        self
    }

    pub fn with_storage(mut self, storage: Arc<dyn ObjectStore>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

/// Bindings resolved for the current request
#[derive(Debug, Clone)]
pub struct Platform {
    /// Relational store binding
    pub db: Option<ProjectStore>,
    /// Object store binding
    pub storage: Option<Arc<dyn ObjectStore>>,
    /// Raw `STUDIO_*` configuration map
    pub env: Arc<BTreeMap<String, String>>,
    clock: Arc<dyn Clock>,
}

impl Platform {
    /// Resolve the bindings held by `context`
    pub fn from_context(context: &ExecutionContext) -> Self {
        Self {
            db: context.db.clone(),
            storage: context.storage.clone(),
            env: Arc::clone(&context.env),
            clock: Arc::clone(&context.clock),
        }
    }

    /// Current time in epoch milliseconds, as seen by this deployment
    pub fn now_millis(&self) -> i64 {
        self.clock.now_millis()
    }
}

impl<S> FromRequestParts<S> for Platform
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<ExecutionContext>() {
            Some(context) => Ok(Self::from_context(context)),
            None => {
                tracing::error!("❌ Request reached a handler without an execution context");
                Err(ApiError::internal("Execution context unavailable"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryObjectStore;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::get,
        Extension, Router,
    };
    use tower::ServiceExt;

    async fn describe(platform: Platform) -> String {
        format!(
            "db={} storage={} env={}",
            platform.db.is_some(),
            platform.storage.is_some(),
            platform.env.len()
        )
    }

    #[test]
    fn empty_context_resolves_to_absent_bindings() {
        let platform = Platform::from_context(&ExecutionContext::new(BTreeMap::new()));

        assert!(platform.db.is_none());
        assert!(platform.storage.is_none());
        assert!(platform.env.is_empty());
    }

    #[test]
    fn each_resolution_reads_the_context_again() {
        let mut env = BTreeMap::new();
        env.insert("STUDIO_ENV".to_string(), "staging".to_string());
        let context = ExecutionContext::new(env)
            .with_storage(Arc::new(MemoryObjectStore::new()))
            .with_clock(Arc::new(FixedClock(1234)));

        let first = Platform::from_context(&context);
        let second = Platform::from_context(&context);

        assert!(first.storage.is_some() && second.storage.is_some());
        assert_eq!(second.env.get("STUDIO_ENV").map(String::as_str), Some("staging"));
        assert_eq!(first.now_millis(), 1234);
    }

    #[tokio::test]
    async fn extractor_reads_context_from_extensions() {
        let app = Router::new()
            .route("/probe", get(describe))
            .layer(Extension(
                ExecutionContext::new(BTreeMap::new()).with_storage(Arc::new(MemoryObjectStore::new())),
            ));

        let req = Request::builder().uri("/probe").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(resp.into_body(), 1024).await.unwrap();
        assert_eq!(&bytes[..], b"db=false storage=true env=0");
    }

    #[tokio::test]
    async fn missing_context_is_a_server_error() {
        let app = Router::new().route("/probe", get(describe));

        let req = Request::builder().uri("/probe").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(resp.into_body(), 1024).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Execution context unavailable");
    }
}
