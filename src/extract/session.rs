use std::str::FromStr;

use aide::OperationInput;
use axum::{
	extract::{FromRef, FromRequestParts},
	http::{header, request},
};
use uuid::Uuid;

use crate::{error::RouteError, openapi::SECURITY_SCHEME_BEARER, route::auth, Database};

pub const AUTHORIZATION_PREFIX: &str = "Bearer ";

/// Extracts the bearer token and related user from the request.
///
/// If the `Authorization` header is missing, [`auth::Error::MissingToken`] is returned.
/// If it is malformed or the token is unknown, [`auth::Error::InvalidToken`] is returned.
///
/// ```rust,ignore
/// async fn route(session: Session) {
///   println!("{:?}", session.user);
/// }
/// ```
#[derive(Debug)]
pub struct Session {
	pub token: Uuid,
	pub user: auth::model::User,
}

/// Parses the value of an `Authorization` header into a session token.
pub fn parse_bearer(value: &str) -> Result<Uuid, auth::Error> {
	let token = value
		.strip_prefix(AUTHORIZATION_PREFIX)
		.ok_or(auth::Error::InvalidToken)?;

	Uuid::from_str(token.trim()).map_err(|_| auth::Error::InvalidToken)
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Session
where
	Database: FromRef<S>,
	S: Sync + Send,
{
	type Rejection = RouteError<auth::Error>;

	/// Extracts the session from the request using the bearer token.
	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let header = parts
			.headers
			.get(header::AUTHORIZATION)
			.ok_or(auth::Error::MissingToken)?;

		let token = parse_bearer(header.to_str().map_err(|_| auth::Error::InvalidToken)?)?;

		let database = Database::from_ref(state);
		let user = database
			.find_session_user(token)
			.await?
			.ok_or(auth::Error::InvalidToken)?;

		Ok(Session { token, user })
	}
}

impl OperationInput for Session {
	/// Operation input for the session extractor.
	///
	/// This adds a bearer token requirement to the `OpenAPI` operation.
	fn operation_input(_ctx: &mut aide::gen::GenContext, operation: &mut aide::openapi::Operation) {
		operation.security.push(
			[(SECURITY_SCHEME_BEARER.to_string(), Vec::new())]
				.into_iter()
				.collect(),
		);
	}
}

#[cfg(test)]
mod test {
	use uuid::Uuid;

	use super::parse_bearer;
	use crate::route::auth::Error;

	#[test]
	fn test_parse_bearer() {
		let token = Uuid::new_v4();

		assert_eq!(parse_bearer(&format!("Bearer {token}")).ok(), Some(token));
		assert!(matches!(
			parse_bearer(&token.to_string()),
			Err(Error::InvalidToken)
		));
		assert!(matches!(
			parse_bearer("Bearer not-a-token"),
			Err(Error::InvalidToken)
		));
		assert!(matches!(parse_bearer("Basic abc"), Err(Error::InvalidToken)));
	}
}
