mod session;

pub use session::Session;

use std::marker::PhantomData;

use aide::OperationIo;
use axum::{
	body::Body,
	extract::{FromRequest, FromRequestParts, Request},
	http::{request, Response},
	response::IntoResponse,
};
use schemars::JsonSchema;
use serde::de;

use crate::{error::AppError, sanitize};

/// Extractor that deserializes a JSON body and validates it.
///
/// T must implement [`serde::de::DeserializeOwned`] and [`validator::Validate`]
/// in order to be used in an extractor.
///
/// ```rust,ignore
/// async fn route(Json(body): Json<CreatePostBody>) {
///   // ...
/// }
/// ```
#[derive(OperationIo)]
#[aide(
	input_with = "axum::Json<T>",
	output_with = "axum::Json<T>",
	json_schema
)]
pub struct Json<T>(pub T);

impl<T> IntoResponse for Json<T>
where
	T: serde::Serialize,
{
	fn into_response(self) -> Response<Body> {
		axum::Json(self.0).into_response()
	}
}

#[axum::async_trait]
impl<T, S> FromRequest<S> for Json<T>
where
	T: de::DeserializeOwned + validator::Validate + JsonSchema + 'static,
	S: Send + Sync,
{
	type Rejection = AppError;

	async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
		let result = axum::Json::<T>::from_request(req, state).await?.0;

		result.validate()?;
		Ok(Self(result))
	}
}

/// Extractor like [`Json<T>`] that removes blank fields before deserializing.
///
/// Used for partial updates, where an empty string means "leave unchanged".
/// Only the JSON syntax is checked on extraction; deserializing into `T` and
/// validating happen in [`Stripped::parse`], so handlers can load and authorize
/// the target resource first. See [`sanitize::remove_blanks`].
///
/// ```rust,ignore
/// async fn route(body: Stripped<UpdatePostBody>) -> Result<(), AppError> {
///   // check the resource exists and belongs to the caller
///   let body = body.parse()?;
/// }
/// ```
#[derive(OperationIo)]
#[aide(input_with = "axum::Json<T>", json_schema)]
pub struct Stripped<T>(serde_json::Value, PhantomData<T>);

impl<T> Stripped<T>
where
	T: de::DeserializeOwned + validator::Validate,
{
	/// Deserializes the sanitized payload and validates it.
	pub fn parse(self) -> Result<T, AppError> {
		let result = serde_json::from_value::<T>(self.0)?;

		result.validate()?;
		Ok(result)
	}
}

#[axum::async_trait]
impl<T, S> FromRequest<S> for Stripped<T>
where
	T: JsonSchema + 'static,
	S: Send + Sync,
{
	type Rejection = AppError;

	async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
		let mut payload = axum::Json::<serde_json::Value>::from_request(req, state)
			.await?
			.0;

		sanitize::remove_blanks(&mut payload);

		Ok(Self(payload, PhantomData))
	}
}

/// Extractor that deserializes a path parameter and validates it.
#[derive(OperationIo)]
#[aide(input_with = "axum::extract::Path<T>", json_schema)]
pub struct Path<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for Path<T>
where
	T: de::DeserializeOwned + validator::Validate + Send,
	S: Send + Sync,
{
	type Rejection = AppError;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let result = axum::extract::Path::<T>::from_request_parts(parts, state)
			.await?
			.0;

		result.validate()?;
		Ok(Self(result))
	}
}
