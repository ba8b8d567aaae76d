use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A single user.
#[derive(Debug, Clone, Serialize, JsonSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
	/// The unique identifier of the user.
	pub id: Uuid,
	/// The user's email address, used for signing in.
	pub email: String,
	/// The hashed password.
	#[serde(skip)]
	pub password: Vec<u8>,
	/// The creation time of the user.
	pub created_at: chrono::DateTime<chrono::Utc>,
	/// The time of the last update to the user.
	pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// A user that has not been stored yet.
///
/// The id is chosen up front since it salts the password hash.
#[derive(Debug)]
pub struct NewUser {
	pub id: Uuid,
	pub email: String,
	pub password: Vec<u8>,
}

/// A signed-in session. Its id is the bearer token.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Session {
	pub id: Uuid,
	pub user_id: Uuid,
	/// The creation time of the session.
	pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignUpInput {
	#[validate(email)]
	pub email: String,
	#[validate(length(min = 8, max = 128))]
	pub password: String,
	pub password_confirmation: String,
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct SignUpBody {
	#[validate(nested)]
	pub credentials: SignUpInput,
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct SignInInput {
	#[validate(email)]
	pub email: String,
	#[validate(length(min = 1, max = 128))]
	pub password: String,
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct SignInBody {
	#[validate(nested)]
	pub credentials: SignInInput,
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct ChangePasswordInput {
	#[validate(length(min = 1, max = 128))]
	pub old: String,
	#[validate(length(min = 8, max = 128))]
	pub new: String,
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct ChangePasswordBody {
	#[validate(nested)]
	pub passwords: ChangePasswordInput,
}

#[derive(Serialize, JsonSchema)]
pub struct UserResponse {
	pub user: User,
}

#[derive(Serialize, JsonSchema)]
pub struct SignInResponse {
	pub user: User,
	/// The bearer token to send in the `Authorization` header.
	pub token: Uuid,
}
