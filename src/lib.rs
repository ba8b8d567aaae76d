#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod extract;
pub mod guard;
pub mod model;
pub mod openapi;
pub mod route;
pub mod sanitize;
pub mod store;
pub mod trace;

use std::sync::Arc;

use aide::{axum::ApiRouter, openapi::OpenApi};
use argon2::Argon2;
use axum::{Extension, Router};
use tower::ServiceBuilder;
use tower_http::{
	compression::CompressionLayer,
	cors::CorsLayer,
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	trace::TraceLayer,
};

pub use error::AppError;
pub use store::Database;

/// The shared application state.
///
/// This holds the dependencies every handler may need: the store handle and
/// the password hasher. It is built once at startup and passed in explicitly.
#[derive(Clone, axum::extract::FromRef)]
pub struct AppState {
	pub database: Database,
	pub hasher: Argon2<'static>,
}

impl AppState {
	pub fn new(database: Database) -> Self {
		Self {
			database,
			hasher: Argon2::default(),
		}
	}
}

/// Builds the application router with its documentation and middleware.
pub fn app(state: AppState) -> Router {
	aide::gen::on_error(|error| tracing::warn!(%error, "failed to generate api docs"));

	let mut api = OpenApi::default();

	ApiRouter::new()
		.merge(route::auth::routes())
		.merge(route::post::routes())
		.nest("/docs", route::docs::routes())
		.finish_api_with(&mut api, openapi::docs)
		.layer(Extension(Arc::new(api)))
		.layer(
			ServiceBuilder::new()
				.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
				.layer(TraceLayer::new_for_http())
				.layer(PropagateRequestIdLayer::x_request_id())
				.layer(CorsLayer::permissive())
				.layer(CompressionLayer::new()),
		)
		.with_state(state)
}
