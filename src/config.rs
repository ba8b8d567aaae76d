use std::net::IpAddr;

use tracing::level_filters::LevelFilter;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{name} has an invalid value {value:?}")]
	Invalid { name: &'static str, value: String },
}

/// Runtime configuration, read from the environment (and a `.env` file, if present).
#[derive(Debug, Clone)]
pub struct Config {
	/// Postgres connection string. Without it, posts are kept in memory.
	pub database_url: Option<String>,
	pub max_connections: u32,
	pub host: IpAddr,
	pub port: u16,
	pub log_level: LevelFilter,
	/// Collector endpoint for OpenTelemetry traces and metrics.
	pub otlp_endpoint: Option<String>,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			database_url: None,
			max_connections: 10,
			host: IpAddr::from([127, 0, 0, 1]),
			port: 3000,
			log_level: LevelFilter::INFO,
			otlp_endpoint: None,
		}
	}
}

impl Config {
	pub fn from_env() -> Result<Self, Error> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Builds the configuration from an arbitrary variable lookup, falling back
	/// to the defaults for unset variables.
	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
		let defaults = Self::default();
		let lookup = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

		Ok(Self {
			database_url: lookup("DATABASE_URL"),
			max_connections: parse(&lookup, "DATABASE_MAX_CONNECTIONS")?
				.unwrap_or(defaults.max_connections),
			host: parse(&lookup, "HOST")?.unwrap_or(defaults.host),
			port: parse(&lookup, "PORT")?.unwrap_or(defaults.port),
			log_level: parse(&lookup, "LOG_LEVEL")?.unwrap_or(defaults.log_level),
			otlp_endpoint: lookup("OTEL_EXPORTER_OTLP_ENDPOINT"),
		})
	}
}

fn parse<T: std::str::FromStr>(
	lookup: &impl Fn(&str) -> Option<String>,
	name: &'static str,
) -> Result<Option<T>, Error> {
	lookup(name)
		.map(|value| {
			value
				.trim()
				.parse()
				.map_err(|_| Error::Invalid { name, value })
		})
		.transpose()
}
