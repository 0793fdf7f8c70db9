mod handlers;

pub use handlers::{InboundEvent, SUBSCRIPTION_VALIDATION_EVENT};

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::cascade::CascadePublisher;

pub fn create_router(publisher: CascadePublisher) -> Router {
    let api = Router::new()
        // Manual whole-project run
        .route("/cascade", post(handlers::run_cascade))
        // Workflow transitions delivered by Event Grid
        .route("/events", post(handlers::receive_events))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(publisher)
}
