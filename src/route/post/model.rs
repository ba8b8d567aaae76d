pub use crate::route::model::IdInput;

use macros::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{guard::Owned, route::auth::model::User};

/// A single post, created by a user.
#[model]
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, Validate, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
	/// The unique identifier of the post.
	#[serde(skip_deserializing)]
	pub id: Uuid,
	/// The user that created the post. Only this user may change or delete it.
	#[serde(skip_deserializing)]
	pub owner: Uuid,
	/// The title of the post.
	#[validate(length(min = 1, max = 256))]
	pub title: String,
	/// The text of the post.
	#[serde(default, alias = "text")]
	pub body: String,
	/// The creation time of the post.
	#[serde(skip_deserializing)]
	pub created_at: chrono::DateTime<chrono::Utc>,
	/// The time of the last update to the post.
	#[serde(skip_deserializing)]
	pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Owned for Post {
	fn id(&self) -> Uuid {
		self.id
	}

	fn owner(&self) -> Uuid {
		self.owner
	}
}

/// A post with its owner resolved to the full user.
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PopulatedPost {
	pub id: Uuid,
	/// The user that created the post. Posts are removed along with their owner,
	/// so this is only `null` if the store was edited by hand.
	pub owner: Option<User>,
	pub title: String,
	pub body: String,
	pub created_at: chrono::DateTime<chrono::Utc>,
	pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl PopulatedPost {
	pub fn new(post: Post, owner: Option<User>) -> Self {
		Self {
			id: post.id,
			owner,
			title: post.title,
			body: post.body,
			created_at: post.created_at,
			updated_at: post.updated_at,
		}
	}
}

/// Which posts to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostFilter {
	All,
	OwnedBy(Uuid),
}

impl PostFilter {
	pub fn matches(&self, post: &Post) -> bool {
		match self {
			Self::All => true,
			Self::OwnedBy(owner) => post.owner == *owner,
		}
	}
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct CreatePostBody {
	#[validate(nested)]
	pub post: CreatePostInput,
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct UpdatePostBody {
	#[validate(nested)]
	pub post: UpdatePostInput,
}

#[derive(Serialize, JsonSchema)]
pub struct PostResponse {
	pub post: Post,
}

#[derive(Serialize, JsonSchema)]
pub struct PostsResponse {
	pub posts: Vec<PopulatedPost>,
}
