mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use std::{collections::HashMap, sync::Arc};

use uuid::Uuid;

use crate::{
	model::{Comment, NewComment},
	route::{
		auth::model::{NewUser, Session, User},
		post::model::{CreatePostInput, PopulatedPost, Post, PostFilter, UpdatePostInput},
	},
};

/// The shared store handle held in the application state.
pub type Database = Arc<dyn Store>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// A unique value is already taken, e.g. an email address.
	#[error("duplicate {0}")]
	Duplicate(&'static str),
	/// A referenced document does not exist.
	#[error("unknown {0} {1}")]
	Missing(&'static str, Uuid),
	/// A value breaks a storage rule, e.g. empty comment text.
	#[error("invalid {0}")]
	Invalid(&'static str),
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
	#[error("migration error: {0}")]
	Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Persistence for users, sessions, posts and comments.
///
/// Lookups by id return `Ok(None)` when nothing matches; deciding whether that
/// is an error is up to the caller.
#[axum::async_trait]
pub trait Store: Send + Sync {
	/// Stores a new user. Fails with [`Error::Duplicate`] if the email is taken.
	async fn create_user(&self, user: NewUser) -> Result<User, Error>;
	async fn find_user(&self, id: Uuid) -> Result<Option<User>, Error>;
	async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, Error>;
	/// Returns the users with the given ids, skipping ids that do not exist.
	async fn find_users(&self, ids: &[Uuid]) -> Result<Vec<User>, Error>;
	async fn update_password(&self, id: Uuid, password: Vec<u8>) -> Result<(), Error>;

	async fn create_session(&self, user_id: Uuid) -> Result<Session, Error>;
	/// Resolves a session id (bearer token) to its user.
	async fn find_session_user(&self, session_id: Uuid) -> Result<Option<User>, Error>;
	async fn delete_session(&self, session_id: Uuid) -> Result<(), Error>;

	/// Lists posts matching the filter, oldest first.
	async fn find_posts(&self, filter: PostFilter) -> Result<Vec<Post>, Error>;
	async fn find_post(&self, id: Uuid) -> Result<Option<Post>, Error>;
	async fn create_post(&self, owner: Uuid, input: CreatePostInput) -> Result<Post, Error>;
	/// Merges the set fields of `input` into the post. Returns `None` if it does not exist.
	async fn update_post(&self, id: Uuid, input: UpdatePostInput) -> Result<Option<Post>, Error>;
	/// Returns whether a post was deleted.
	async fn delete_post(&self, id: Uuid) -> Result<bool, Error>;

	/// Stores a comment. Fails with [`Error::Missing`] if the owner or parent does
	/// not exist, and with [`Error::Invalid`] if the text is empty.
	async fn create_comment(&self, owner: Uuid, input: NewComment) -> Result<Comment, Error>;
	async fn find_comment(&self, id: Uuid) -> Result<Option<Comment>, Error>;
	/// Lists the direct replies to a comment, oldest first.
	async fn find_replies(&self, parent: Uuid) -> Result<Vec<Comment>, Error>;
}

/// Resolves the owner of each post to the full user.
pub async fn populate_owners(
	store: &dyn Store,
	posts: Vec<Post>,
) -> Result<Vec<PopulatedPost>, Error> {
	let mut ids = posts.iter().map(|post| post.owner).collect::<Vec<_>>();

	ids.sort_unstable();
	ids.dedup();

	let owners = store
		.find_users(&ids)
		.await?
		.into_iter()
		.map(|user| (user.id, user))
		.collect::<HashMap<_, _>>();

	Ok(posts
		.into_iter()
		.map(|post| {
			let owner = owners.get(&post.owner).cloned();

			PopulatedPost::new(post, owner)
		})
		.collect())
}
