use aide::axum::IntoApiResponse;
use axum::{extract::State, http::StatusCode};
use macros::route;

use crate::{
	extract::{Json, Path, Session, Stripped},
	guard::{require_found, require_ownership},
	openapi::tag,
	store, Database,
};

use super::{model, Error, RouteError};

/// Get all posts
/// Returns every post, oldest first, with its owner populated.
#[route(tag = tag::POST)]
pub async fn get_posts(
	State(database): State<Database>,
) -> Result<Json<model::PostsResponse>, RouteError> {
	let posts = database.find_posts(model::PostFilter::All).await?;
	let posts = store::populate_owners(database.as_ref(), posts).await?;

	Ok(Json(model::PostsResponse { posts }))
}

/// Get own posts
/// Returns the posts owned by the authenticated user, oldest first, with the owner populated.
#[route(tag = tag::POST)]
pub async fn get_my_posts(
	State(database): State<Database>,
	session: Session,
) -> Result<Json<model::PostsResponse>, RouteError> {
	let posts = database
		.find_posts(model::PostFilter::OwnedBy(session.user.id))
		.await?;
	let posts = store::populate_owners(database.as_ref(), posts).await?;

	Ok(Json(model::PostsResponse { posts }))
}

/// Get single post
/// Returns a single post by its unique id.
#[route(tag = tag::POST)]
pub async fn get_post(
	State(database): State<Database>,
	Path(path): Path<model::IdInput>,
) -> Result<Json<model::PostResponse>, RouteError> {
	let post = require_found::<_, Error>(path.id, database.find_post(path.id).await?)?;

	Ok(Json(model::PostResponse { post }))
}

/// Create post
/// Creates a new post owned by the authenticated user.
#[route(tag = tag::POST, response(status = 201, description = "The created post.", shape = "Json<model::PostResponse>"))]
pub async fn create_post(
	State(database): State<Database>,
	session: Session,
	Json(body): Json<model::CreatePostBody>,
) -> Result<impl IntoApiResponse, RouteError> {
	let post = database.create_post(session.user.id, body.post).await?;

	tracing::info!(post = %post.id, owner = %post.owner, "created post");

	Ok((StatusCode::CREATED, Json(model::PostResponse { post })))
}

/// Update post
/// Updates a post owned by the authenticated user. Blank fields are ignored and the owner cannot be changed.
#[route(tag = tag::POST, response(status = 204, description = "The post was updated."))]
pub async fn update_post(
	State(database): State<Database>,
	session: Session,
	Path(path): Path<model::IdInput>,
	body: Stripped<model::UpdatePostBody>,
) -> Result<impl IntoApiResponse, RouteError> {
	let post = require_found::<_, Error>(path.id, database.find_post(path.id).await?)?;
	let post = require_ownership::<_, Error>(session.user.id, post)?;
	let body = body.parse()?;

	require_found::<_, Error>(post.id, database.update_post(post.id, body.post).await?)?;

	Ok(StatusCode::NO_CONTENT)
}

/// Delete post
/// Deletes a post owned by the authenticated user.
#[route(tag = tag::POST, response(status = 204, description = "The post was deleted."))]
pub async fn delete_post(
	State(database): State<Database>,
	session: Session,
	Path(path): Path<model::IdInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	let post = require_found::<_, Error>(path.id, database.find_post(path.id).await?)?;
	let post = require_ownership::<_, Error>(session.user.id, post)?;

	if !database.delete_post(post.id).await? {
		return Err(Error::UnknownPost(post.id).into());
	}

	tracing::info!(post = %post.id, "deleted post");

	Ok(StatusCode::NO_CONTENT)
}
