use std::sync::Arc;

use axum::{extract::Request, ServiceExt};
use postboard::{
	config::Config,
	store::{MemoryStore, PgStore},
	trace, AppState, Database,
};
use tower::Layer;
use tower_http::normalize_path::NormalizePathLayer;

#[tokio::main]
async fn main() {
	dotenvy::dotenv().ok();

	let config = Config::from_env().expect("invalid configuration");
	let _guard = trace::init_tracing_subscriber(&config).expect("failed to initialize tracing");

	let database: Database = if let Some(url) = config.database_url.as_deref() {
		Arc::new(
			PgStore::connect(url, config.max_connections)
				.await
				.expect("failed to connect to database"),
		)
	} else {
		tracing::warn!("DATABASE_URL is not set, storing data in memory");

		Arc::new(MemoryStore::new())
	};

	let app = NormalizePathLayer::trim_trailing_slash().layer(postboard::app(AppState::new(database)));

	let listener = tokio::net::TcpListener::bind((config.host, config.port))
		.await
		.expect("failed to bind to port");

	tracing::info!("listening on {}:{}", config.host, config.port);

	axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
		.with_graceful_shutdown(shutdown_signal())
		.await
		.expect("server error");
}

async fn shutdown_signal() {
	if let Err(error) = tokio::signal::ctrl_c().await {
		tracing::error!(%error, "failed to listen for shutdown signal");
	}

	tracing::info!("shutting down");
}
