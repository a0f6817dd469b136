//! HTTP surface.

use crate::{
    auth::{AccessGuard, TokenConfig, TokenConfigError, TokenIssuer},
    characters::CharacterService,
    store::{AccountStore, CharacterStore},
};
use anyhow::Result;
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, HeaderValue, Method, Request,
    },
    routing::{get, post},
    Extension, Router,
};
use std::{future::Future, sync::Arc};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;

mod envelope;
pub mod error;
pub mod handlers;
mod openapi;

pub use envelope::ServiceResponse;
pub use openapi::openapi;

const REQUEST_ID: &str = "x-request-id";

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub(crate) guard: AccessGuard,
    pub(crate) characters: CharacterService,
}

impl AppState {
    /// # Errors
    /// Returns an error if the token configuration cannot key the issuer.
    pub fn new(
        tokens: &TokenConfig,
        accounts: Arc<dyn AccountStore>,
        characters: Arc<dyn CharacterStore>,
    ) -> Result<Self, TokenConfigError> {
        let issuer = Arc::new(TokenIssuer::new(tokens)?);
        Ok(Self {
            guard: AccessGuard::new(issuer, accounts),
            characters: CharacterService::new(characters),
        })
    }
}

/// Build the full application with its middleware stack.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_origin(Any);

    Router::new()
        .route(
            "/health",
            get(handlers::health::health).options(handlers::health::health),
        )
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/character/GetAll", get(handlers::character::get_all))
        .route(
            "/character/:id",
            get(handlers::character::get_single).delete(handlers::character::delete),
        )
        .route(
            "/character",
            post(handlers::character::add).put(handlers::character::update),
        )
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static(REQUEST_ID),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    REQUEST_ID,
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(cors)
                .layer(Extension(state)),
        )
}

/// Serve the application on `listener` until `shutdown` resolves.
///
/// # Errors
/// Returns an error if the server fails.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!("Listening on {}", addr);
    }

    axum::serve(listener, router(state).into_make_service())
        .with_graceful_shutdown(async move {
            shutdown.await;
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID)
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
