//! HTTP API
//!
//! JSON endpoints for computing sums and products and for listing the
//! results stored under a client token.

pub mod compute;
pub mod error;
pub mod model;
pub mod results;

use std::any::Any;
use std::sync::Arc;

use axum::Router;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

use crate::keys::KeySequence;
use crate::store::ResultStore;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ResultStore>,
    pub keys: Arc<KeySequence>,
}

impl AppState {
    pub fn new(store: Arc<ResultStore>) -> Self {
        Self {
            store,
            keys: Arc::new(KeySequence::new()),
        }
    }
}

/// Build the API router
pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/sum", post(compute::sum))
        .route("/multiply", post(compute::multiply))
        .route("/results", get(results::get_all_by_token))
        .with_state(state);
    with_middleware(routes)
}

/// Wrap `router` with request ids and panic recovery
///
/// Layers added last run first: the request id is assigned before anything
/// else and is echoed on every response, including recovered panics.
fn with_middleware(router: Router) -> Router {
    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic"
    };
    tracing::error!("Handler panicked: {}", detail);
    error::ApiError::Internal.into_response()
}

#[cfg(test)]
pub(crate) mod test_util {
    use axum::Router;
    use axum::body::{self, Body};
    use axum::http::{Request, StatusCode, header};
    use serde_json::Value;
    use tower::ServiceExt;

    pub async fn post_json(app: &Router, uri: &str, body: impl Into<String>) -> (StatusCode, Value) {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.into()))
            .unwrap();
        send(app, req).await
    }

    pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        send(app, req).await
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }
}
