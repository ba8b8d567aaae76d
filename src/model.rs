use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::guard::Owned;

/// A comment left by a user.
///
/// Comments form threads through `parent`: the replies to a comment are the
/// comments whose `parent` is its id, in creation order.
#[derive(Debug, Clone, Serialize, JsonSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
	pub id: Uuid,
	/// The user that wrote the comment.
	pub owner: Uuid,
	/// The comment this one replies to, if any.
	pub parent: Option<Uuid>,
	pub text: String,
	pub created_at: chrono::DateTime<chrono::Utc>,
	pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Owned for Comment {
	fn id(&self) -> Uuid {
		self.id
	}

	fn owner(&self) -> Uuid {
		self.owner
	}
}

#[derive(Debug, Clone, Deserialize, Validate, JsonSchema)]
pub struct NewComment {
	/// The comment being replied to. It must already exist.
	pub parent: Option<Uuid>,
	#[validate(length(min = 1))]
	pub text: String,
}
