use aide::axum::{
	routing::{delete_with, get_with, patch_with, post_with},
	ApiRouter,
};
use axum::http::StatusCode;

use crate::{error, AppState};

pub mod model;
pub mod route;

/// An error that can occur during authentication.
///
/// Note that the messages are presented to the client, so they should not contain
/// sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("invalid email or password")]
	InvalidEmailOrPassword,
	#[error("password hashing error")]
	Argon(#[from] argon2::Error),
	#[error("missing bearer token")]
	MissingToken,
	#[error("invalid bearer token")]
	InvalidToken,
	#[error("email already taken")]
	EmailTaken,
	#[error("passwords do not match")]
	PasswordMismatch,
}

pub type RouteError = error::RouteError<Error>;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route("/sign-up", post_with(sign_up, sign_up_docs))
		.api_route("/sign-in", post_with(sign_in, sign_in_docs))
		.api_route(
			"/change-password",
			patch_with(change_password, change_password_docs),
		)
		.api_route("/sign-out", delete_with(sign_out, sign_out_docs))
		.api_route("/me", get_with(get_me, get_me_docs))
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::InvalidEmailOrPassword | Self::MissingToken | Self::InvalidToken => {
				StatusCode::UNAUTHORIZED
			}
			Self::Argon(..) => StatusCode::INTERNAL_SERVER_ERROR,
			Self::EmailTaken => StatusCode::CONFLICT,
			Self::PasswordMismatch => StatusCode::UNPROCESSABLE_ENTITY,
		}
	}

	fn into_errors(self) -> Vec<error::Message> {
		let code = match self {
			Self::InvalidEmailOrPassword => "invalid_email_or_password",
			Self::Argon(ref error) => {
				tracing::error!(%error, "failed to hash password");
				"internal_error"
			}
			Self::MissingToken => "missing_token",
			Self::InvalidToken => "invalid_token",
			Self::EmailTaken => "email_taken",
			Self::PasswordMismatch => "password_mismatch",
		};

		let message = error::Message::new(code);

		match self {
			Self::Argon(..) => message.into_vec(),
			Self::EmailTaken => message
				.content(self.to_string())
				.field("credentials.email")
				.into_vec(),
			Self::PasswordMismatch => message
				.content(self.to_string())
				.field("credentials.passwordConfirmation")
				.into_vec(),
			_ => message.content(self.to_string()).into_vec(),
		}
	}
}
