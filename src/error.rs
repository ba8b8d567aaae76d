use std::borrow::Cow;

use aide::OperationOutput;
use axum::{
	body::Body,
	extract::rejection,
	http::{Response, StatusCode},
	response::IntoResponse,
	Json,
};
use schemars::JsonSchema;
use serde::Serialize;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::store;

pub type Map = serde_json::Map<String, serde_json::Value>;

/// A single error message presented to the client.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Message {
	/// A stable, machine-readable error code.
	pub code: Cow<'static, str>,
	/// A human-readable description of the error.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub content: Option<Cow<'static, str>>,
	/// The input field that caused the error, if any.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub field: Option<Cow<'static, str>>,
	/// Additional structured details.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<Map>,
}

impl Message {
	pub fn new(code: impl Into<Cow<'static, str>>) -> Self {
		Self {
			code: code.into(),
			content: None,
			field: None,
			details: None,
		}
	}

	#[must_use]
	pub fn content(mut self, content: impl Into<Cow<'static, str>>) -> Self {
		self.content = Some(content.into());
		self
	}

	#[must_use]
	pub fn field(mut self, field: impl Into<Cow<'static, str>>) -> Self {
		self.field = Some(field.into());
		self
	}

	#[must_use]
	pub fn detail(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
		self.details
			.get_or_insert_with(Map::new)
			.insert(key.into(), value.into());
		self
	}

	pub fn into_vec(self) -> Vec<Self> {
		vec![self]
	}
}

/// The body of every error response.
#[derive(Debug, Serialize, JsonSchema)]
pub struct ErrorResponse {
	pub success: bool,
	pub errors: Vec<Message>,
}

fn respond(status: StatusCode, errors: Vec<Message>) -> Response<Body> {
	(
		status,
		Json(ErrorResponse {
			success: false,
			errors,
		}),
	)
		.into_response()
}

/// Shape of a route-specific error when sent to the client.
///
/// Each route module declares its own error enum and implements this trait,
/// then uses [`RouteError`] as the error type of its handlers.
pub trait ErrorShape: std::error::Error {
	fn status(&self) -> StatusCode;
	fn into_errors(self) -> Vec<Message>;
}

/// Errors shared by every route: rejected input and store failures.
///
/// The Display output is logged, never sent to the client.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
	#[error("validation error: {0}")]
	Validation(#[from] ValidationErrors),
	#[error("json error: {0}")]
	Json(#[from] rejection::JsonRejection),
	#[error("path error: {0}")]
	Path(#[from] rejection::PathRejection),
	#[error("payload error: {0}")]
	Payload(#[from] serde_json::Error),
	#[error("store error: {0}")]
	Store(#[from] store::Error),
}

impl AppError {
	pub fn status(&self) -> StatusCode {
		match self {
			Self::Validation(..) | Self::Payload(..) => StatusCode::UNPROCESSABLE_ENTITY,
			Self::Json(rejection) => rejection.status(),
			Self::Path(rejection) => rejection.status(),
			Self::Store(..) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	pub fn into_errors(self) -> Vec<Message> {
		match self {
			Self::Validation(errors) => {
				let mut messages = Vec::new();

				validation_messages(&errors, "", &mut messages);
				messages
			}
			Self::Json(rejection) => Message::new("invalid_json")
				.content(rejection.body_text())
				.into_vec(),
			Self::Path(rejection) => Message::new("invalid_path")
				.content(rejection.body_text())
				.into_vec(),
			Self::Payload(error) => Message::new("invalid_payload")
				.content(error.to_string())
				.into_vec(),
			Self::Store(error) => {
				tracing::error!(%error, "store operation failed");
				Message::new("internal_error").into_vec()
			}
		}
	}
}

/// Flattens nested validation errors, naming fields by their path (e.g. `post.title`).
fn validation_messages(errors: &ValidationErrors, prefix: &str, messages: &mut Vec<Message>) {
	for (field, kind) in errors.errors() {
		let path = if prefix.is_empty() {
			field.to_string()
		} else {
			format!("{prefix}.{field}")
		};

		match kind {
			ValidationErrorsKind::Field(errors) => {
				messages.extend(errors.iter().map(|error| {
					let message = Message::new(error.code.clone()).field(path.clone());

					match &error.message {
						Some(content) => message.content(content.clone()),
						None => message,
					}
				}));
			}
			ValidationErrorsKind::Struct(errors) => validation_messages(errors, &path, messages),
			ValidationErrorsKind::List(items) => {
				for (index, errors) in items {
					validation_messages(errors, &format!("{path}[{index}]"), messages);
				}
			}
		}
	}
}

impl IntoResponse for AppError {
	fn into_response(self) -> Response<Body> {
		let status = self.status();

		respond(status, self.into_errors())
	}
}

/// Error type returned by route handlers, combining the route-specific
/// error `E` with the shared [`AppError`].
#[derive(Debug)]
pub enum RouteError<E> {
	Route(E),
	App(AppError),
}

impl<E> OperationOutput for RouteError<E> {
	type Inner = ErrorResponse;
}

impl<E: ErrorShape> From<E> for RouteError<E> {
	fn from(error: E) -> Self {
		Self::Route(error)
	}
}

impl<E> From<AppError> for RouteError<E> {
	fn from(error: AppError) -> Self {
		Self::App(error)
	}
}

impl<E> From<store::Error> for RouteError<E> {
	fn from(error: store::Error) -> Self {
		Self::App(AppError::Store(error))
	}
}

impl<E: ErrorShape> IntoResponse for RouteError<E> {
	fn into_response(self) -> Response<Body> {
		match self {
			Self::Route(error) => {
				tracing::debug!(%error, "request rejected");

				let status = error.status();

				respond(status, error.into_errors())
			}
			Self::App(error) => error.into_response(),
		}
	}
}
