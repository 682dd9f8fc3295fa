//! Shared application state and HTTP routing.

use std::sync::Arc;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use rust_decimal::Decimal;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers, middleware,
    services::{password_service::PasswordService, token_service::TokenService},
    store::Store,
};

/// State shared by every handler via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub tokens: TokenService,
    pub passwords: PasswordService,

    /// Balance credited to every new user
    pub starting_balance: Decimal,
}

/// Build the HTTP router.
///
/// # Routes
///
/// - `GET /health` - public
/// - `POST /sign-up`, `POST /sign-in` - public
/// - `GET /validate` - reads the token itself (its error messages differ from the middleware's)
/// - `GET /transactions`, `POST /transactions` - behind the auth middleware
pub fn router(state: AppState) -> Router {
    let authenticated_routes = Router::new()
        .route(
            "/transactions",
            get(handlers::transactions::list_transactions)
                .post(handlers::transactions::create_transaction),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/sign-up", post(handlers::auth::sign_up))
        .route("/sign-in", post(handlers::auth::sign_in))
        .route("/validate", get(handlers::auth::validate))
        .merge(authenticated_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
