use aide::axum::IntoApiResponse;
use argon2::Argon2;
use axum::{extract::State, http::StatusCode};
use macros::route;
use uuid::Uuid;

use crate::{
	extract::{Json, Session},
	openapi::tag,
	store, AppState, Database,
};

use super::{model, Error, RouteError};

pub const KEY_LENGTH: usize = 32;

/// Hashes a password with Argon2, using the user's id as a salt.
/// Since this is only used for signing in and setting a password,
/// the scope of this function can remain in here with no issues.
fn hash_password(
	hasher: &Argon2,
	password: &str,
	id: &Uuid,
) -> Result<[u8; KEY_LENGTH], argon2::Error> {
	let mut hash = [0; KEY_LENGTH];

	hasher.hash_password_into(password.as_bytes(), id.as_bytes(), &mut hash)?;
	Ok(hash)
}

/// Sign up
/// Registers a new account. Sign in afterwards to receive a bearer token.
#[route(tag = tag::AUTH, response(status = 201, description = "Signed up successfully.", shape = "Json<model::UserResponse>"))]
pub async fn sign_up(
	State(state): State<AppState>,
	Json(body): Json<model::SignUpBody>,
) -> Result<impl IntoApiResponse, RouteError> {
	let credentials = body.credentials;

	if credentials.password != credentials.password_confirmation {
		return Err(Error::PasswordMismatch.into());
	}

	let id = Uuid::new_v4();
	let hashed = hash_password(&state.hasher, &credentials.password, &id).map_err(Error::Argon)?;

	let user = state
		.database
		.create_user(model::NewUser {
			id,
			email: credentials.email,
			password: hashed.to_vec(),
		})
		.await
		.map_err(|e| match e {
			store::Error::Duplicate("email") => Error::EmailTaken.into(),
			e => RouteError::from(e),
		})?;

	tracing::info!(user = %user.id, "signed up");

	Ok((StatusCode::CREATED, Json(model::UserResponse { user })))
}

/// Sign in
/// Signs in to an account, returning the user and a bearer token.
#[route(tag = tag::AUTH, response(status = 201, description = "Signed in successfully.", shape = "Json<model::SignInResponse>"))]
pub async fn sign_in(
	State(state): State<AppState>,
	Json(body): Json<model::SignInBody>,
) -> Result<impl IntoApiResponse, RouteError> {
	let credentials = body.credentials;

	let Some(user) = state
		.database
		.find_user_by_email(&credentials.email)
		.await?
	else {
		return Err(Error::InvalidEmailOrPassword.into());
	};

	let hashed = hash_password(&state.hasher, &credentials.password, &user.id).map_err(Error::Argon)?;

	if user.password != hashed {
		return Err(Error::InvalidEmailOrPassword.into());
	}

	let session = state.database.create_session(user.id).await?;

	Ok((
		StatusCode::CREATED,
		Json(model::SignInResponse {
			user,
			token: session.id,
		}),
	))
}

/// Change password
/// Replaces the password of the authenticated user after checking the old one.
#[route(tag = tag::AUTH, response(status = 204, description = "Password changed."))]
pub async fn change_password(
	State(state): State<AppState>,
	session: Session,
	Json(body): Json<model::ChangePasswordBody>,
) -> Result<impl IntoApiResponse, RouteError> {
	let passwords = body.passwords;
	let user = session.user;

	let old = hash_password(&state.hasher, &passwords.old, &user.id).map_err(Error::Argon)?;

	if user.password != old {
		return Err(Error::InvalidEmailOrPassword.into());
	}

	let new = hash_password(&state.hasher, &passwords.new, &user.id).map_err(Error::Argon)?;

	state.database.update_password(user.id, new.to_vec()).await?;

	Ok(StatusCode::NO_CONTENT)
}

/// Sign out
/// Revokes the bearer token used for this request.
#[route(tag = tag::AUTH, response(status = 204, description = "Signed out successfully."))]
pub async fn sign_out(
	State(database): State<Database>,
	session: Session,
) -> Result<impl IntoApiResponse, RouteError> {
	database.delete_session(session.token).await?;

	Ok(StatusCode::NO_CONTENT)
}

/// Get user
/// Returns the authenticated user.
#[route(tag = tag::AUTH)]
pub async fn get_me(session: Session) -> Json<model::UserResponse> {
	Json(model::UserResponse { user: session.user })
}
