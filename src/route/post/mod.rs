use aide::axum::{routing::get_with, ApiRouter};
use axum::http::StatusCode;
use uuid::Uuid;

use crate::{error, guard::GuardError, AppState};

pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown_post")]
	UnknownPost(Uuid),
	#[error("not_post_owner")]
	NotOwner(Uuid),
}

pub type RouteError = error::RouteError<Error>;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route(
			"/posts",
			get_with(get_posts, get_posts_docs).post_with(create_post, create_post_docs),
		)
		.api_route("/myposts", get_with(get_my_posts, get_my_posts_docs))
		.api_route(
			"/posts/:id",
			get_with(get_post, get_post_docs)
				.patch_with(update_post, update_post_docs)
				.delete_with(delete_post, delete_post_docs),
		)
}

impl GuardError for Error {
	fn not_found(id: Uuid) -> Self {
		Self::UnknownPost(id)
	}

	fn not_owner(id: Uuid) -> Self {
		Self::NotOwner(id)
	}
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownPost(..) => StatusCode::NOT_FOUND,
			Self::NotOwner(..) => StatusCode::UNAUTHORIZED,
		}
	}

	fn into_errors(self) -> Vec<error::Message> {
		let content = match self {
			Self::UnknownPost(..) => "The post you requested does not exist.",
			Self::NotOwner(..) => "Only the owner of a post may change it.",
		};

		let (Self::UnknownPost(post) | Self::NotOwner(post)) = self;

		error::Message::new(self.to_string())
			.content(content)
			.detail("post", post.to_string())
			.into_vec()
	}
}
