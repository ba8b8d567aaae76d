use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Error, Store};
use crate::{
	model::{Comment, NewComment},
	route::{
		auth::model::{NewUser, Session, User},
		post::model::{CreatePostInput, Post, PostFilter, UpdatePostInput},
	},
};

/// An in-process store, used when no database is configured and in tests.
///
/// Posts and comments are kept in insertion order so listings come back
/// oldest first without sorting.
#[derive(Debug, Default)]
pub struct MemoryStore {
	inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
	users: HashMap<Uuid, User>,
	sessions: HashMap<Uuid, Session>,
	posts: Vec<Post>,
	comments: Vec<Comment>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}
}

#[axum::async_trait]
impl Store for MemoryStore {
	async fn create_user(&self, user: NewUser) -> Result<User, Error> {
		let mut inner = self.inner.write().await;

		if inner.users.values().any(|u| u.email == user.email) {
			return Err(Error::Duplicate("email"));
		}

		let now = chrono::Utc::now();
		let user = User {
			id: user.id,
			email: user.email,
			password: user.password,
			created_at: now,
			updated_at: now,
		};

		inner.users.insert(user.id, user.clone());

		Ok(user)
	}

	async fn find_user(&self, id: Uuid) -> Result<Option<User>, Error> {
		Ok(self.inner.read().await.users.get(&id).cloned())
	}

	async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, Error> {
		Ok(self
			.inner
			.read()
			.await
			.users
			.values()
			.find(|user| user.email == email)
			.cloned())
	}

	async fn find_users(&self, ids: &[Uuid]) -> Result<Vec<User>, Error> {
		let inner = self.inner.read().await;

		Ok(ids
			.iter()
			.filter_map(|id| inner.users.get(id).cloned())
			.collect())
	}

	async fn update_password(&self, id: Uuid, password: Vec<u8>) -> Result<(), Error> {
		let mut inner = self.inner.write().await;
		let user = inner
			.users
			.get_mut(&id)
			.ok_or(Error::Missing("user", id))?;

		user.password = password;
		user.updated_at = chrono::Utc::now();

		Ok(())
	}

	async fn create_session(&self, user_id: Uuid) -> Result<Session, Error> {
		let mut inner = self.inner.write().await;

		if !inner.users.contains_key(&user_id) {
			return Err(Error::Missing("user", user_id));
		}

		let session = Session {
			id: Uuid::new_v4(),
			user_id,
			created_at: chrono::Utc::now(),
		};

		inner.sessions.insert(session.id, session.clone());

		Ok(session)
	}

	async fn find_session_user(&self, session_id: Uuid) -> Result<Option<User>, Error> {
		let inner = self.inner.read().await;

		Ok(inner
			.sessions
			.get(&session_id)
			.and_then(|session| inner.users.get(&session.user_id))
			.cloned())
	}

	async fn delete_session(&self, session_id: Uuid) -> Result<(), Error> {
		self.inner.write().await.sessions.remove(&session_id);

		Ok(())
	}

	async fn find_posts(&self, filter: PostFilter) -> Result<Vec<Post>, Error> {
		Ok(self
			.inner
			.read()
			.await
			.posts
			.iter()
			.filter(|post| filter.matches(post))
			.cloned()
			.collect())
	}

	async fn find_post(&self, id: Uuid) -> Result<Option<Post>, Error> {
		Ok(self
			.inner
			.read()
			.await
			.posts
			.iter()
			.find(|post| post.id == id)
			.cloned())
	}

	async fn create_post(&self, owner: Uuid, input: CreatePostInput) -> Result<Post, Error> {
		let now = chrono::Utc::now();
		let post = Post {
			id: Uuid::new_v4(),
			owner,
			title: input.title,
			body: input.body,
			created_at: now,
			updated_at: now,
		};

		self.inner.write().await.posts.push(post.clone());

		Ok(post)
	}

	async fn update_post(&self, id: Uuid, input: UpdatePostInput) -> Result<Option<Post>, Error> {
		let mut inner = self.inner.write().await;
		let Some(post) = inner.posts.iter_mut().find(|post| post.id == id) else {
			return Ok(None);
		};

		if let Some(title) = input.title {
			post.title = title;
		}

		if let Some(body) = input.body {
			post.body = body;
		}

		post.updated_at = chrono::Utc::now();

		Ok(Some(post.clone()))
	}

	async fn delete_post(&self, id: Uuid) -> Result<bool, Error> {
		let mut inner = self.inner.write().await;
		let before = inner.posts.len();

		inner.posts.retain(|post| post.id != id);

		Ok(inner.posts.len() != before)
	}

	async fn create_comment(&self, owner: Uuid, input: NewComment) -> Result<Comment, Error> {
		if input.text.is_empty() {
			return Err(Error::Invalid("text"));
		}

		let mut inner = self.inner.write().await;

		if !inner.users.contains_key(&owner) {
			return Err(Error::Missing("user", owner));
		}

		if let Some(parent) = input.parent {
			if !inner.comments.iter().any(|comment| comment.id == parent) {
				return Err(Error::Missing("comment", parent));
			}
		}

		let now = chrono::Utc::now();
		let comment = Comment {
			id: Uuid::new_v4(),
			owner,
			parent: input.parent,
			text: input.text,
			created_at: now,
			updated_at: now,
		};

		inner.comments.push(comment.clone());

		Ok(comment)
	}

	async fn find_comment(&self, id: Uuid) -> Result<Option<Comment>, Error> {
		Ok(self
			.inner
			.read()
			.await
			.comments
			.iter()
			.find(|comment| comment.id == id)
			.cloned())
	}

	async fn find_replies(&self, parent: Uuid) -> Result<Vec<Comment>, Error> {
		Ok(self
			.inner
			.read()
			.await
			.comments
			.iter()
			.filter(|comment| comment.parent == Some(parent))
			.cloned()
			.collect())
	}
}

#[cfg(test)]
mod test {
	use uuid::Uuid;

	use super::MemoryStore;
	use crate::{
		model::NewComment,
		route::{
			auth::model::NewUser,
			post::model::{CreatePostInput, PostFilter, UpdatePostInput},
		},
		store::{self, Error, Store},
	};

	async fn user(store: &MemoryStore, email: &str) -> Uuid {
		store
			.create_user(NewUser {
				id: Uuid::new_v4(),
				email: email.into(),
				password: vec![0; 32],
			})
			.await
			.unwrap()
			.id
	}

	fn post(title: &str) -> CreatePostInput {
		CreatePostInput {
			title: title.into(),
			body: String::new(),
		}
	}

	#[tokio::test]
	async fn test_duplicate_email() {
		let store = MemoryStore::new();

		user(&store, "a@example.com").await;

		let result = store
			.create_user(NewUser {
				id: Uuid::new_v4(),
				email: "a@example.com".into(),
				password: vec![],
			})
			.await;

		assert!(matches!(result, Err(Error::Duplicate("email"))));
	}

	#[tokio::test]
	async fn test_sessions_resolve_and_revoke() {
		let store = MemoryStore::new();
		let owner = user(&store, "a@example.com").await;
		let session = store.create_session(owner).await.unwrap();

		let found = store.find_session_user(session.id).await.unwrap();
		assert_eq!(found.map(|u| u.id), Some(owner));

		store.delete_session(session.id).await.unwrap();

		assert!(store.find_session_user(session.id).await.unwrap().is_none());
	}

	#[tokio::test]
	async fn test_filter_by_owner() {
		let store = MemoryStore::new();
		let alice = user(&store, "alice@example.com").await;
		let bob = user(&store, "bob@example.com").await;

		store.create_post(alice, post("one")).await.unwrap();
		store.create_post(bob, post("two")).await.unwrap();
		store.create_post(alice, post("three")).await.unwrap();

		let all = store.find_posts(PostFilter::All).await.unwrap();
		let titles = all.iter().map(|p| p.title.as_str()).collect::<Vec<_>>();

		assert_eq!(titles, ["one", "two", "three"]);

		let mine = store.find_posts(PostFilter::OwnedBy(alice)).await.unwrap();

		assert_eq!(mine.len(), 2);
		assert!(mine.iter().all(|p| p.owner == alice));
	}

	#[tokio::test]
	async fn test_update_merges_fields() {
		let store = MemoryStore::new();
		let owner = user(&store, "a@example.com").await;
		let created = store
			.create_post(
				owner,
				CreatePostInput {
					title: "title".into(),
					body: "body".into(),
				},
			)
			.await
			.unwrap();

		let updated = store
			.update_post(
				created.id,
				UpdatePostInput {
					title: None,
					body: Some("new body".into()),
				},
			)
			.await
			.unwrap()
			.unwrap();

		assert_eq!(updated.title, "title");
		assert_eq!(updated.body, "new body");
		assert_eq!(updated.owner, owner);
		assert!(updated.updated_at >= created.updated_at);

		let missing = store
			.update_post(
				Uuid::new_v4(),
				UpdatePostInput {
					title: Some("x".into()),
					body: None,
				},
			)
			.await
			.unwrap();

		assert!(missing.is_none());
	}

	#[tokio::test]
	async fn test_delete_post() {
		let store = MemoryStore::new();
		let owner = user(&store, "a@example.com").await;
		let created = store.create_post(owner, post("gone")).await.unwrap();

		assert!(store.delete_post(created.id).await.unwrap());
		assert!(!store.delete_post(created.id).await.unwrap());
		assert!(store.find_post(created.id).await.unwrap().is_none());
	}

	#[tokio::test]
	async fn test_populate_owners() {
		let store = MemoryStore::new();
		let owner = user(&store, "a@example.com").await;

		store.create_post(owner, post("one")).await.unwrap();

		let posts = store.find_posts(PostFilter::All).await.unwrap();
		let populated = store::populate_owners(&store, posts).await.unwrap();

		assert_eq!(populated.len(), 1);
		assert_eq!(populated[0].owner.as_ref().map(|u| u.id), Some(owner));
	}

	#[tokio::test]
	async fn test_comment_threads() {
		let store = MemoryStore::new();
		let owner = user(&store, "a@example.com").await;

		let root = store
			.create_comment(
				owner,
				NewComment {
					parent: None,
					text: "root".into(),
				},
			)
			.await
			.unwrap();

		for text in ["first", "second"] {
			store
				.create_comment(
					owner,
					NewComment {
						parent: Some(root.id),
						text: text.into(),
					},
				)
				.await
				.unwrap();
		}

		let replies = store.find_replies(root.id).await.unwrap();
		let texts = replies.iter().map(|c| c.text.as_str()).collect::<Vec<_>>();

		assert_eq!(texts, ["first", "second"]);
		assert!(replies.iter().all(|c| c.owner == owner));

		let found = store.find_comment(root.id).await.unwrap().unwrap();
		assert_eq!(found.text, "root");

		let unknown = Uuid::new_v4();
		let orphan = store
			.create_comment(
				owner,
				NewComment {
					parent: Some(unknown),
					text: "orphan".into(),
				},
			)
			.await;

		assert!(matches!(orphan, Err(Error::Missing("comment", id)) if id == unknown));
	}

	#[tokio::test]
	async fn test_comment_rules() {
		let store = MemoryStore::new();
		let owner = user(&store, "a@example.com").await;

		let empty = store
			.create_comment(
				owner,
				NewComment {
					parent: None,
					text: String::new(),
				},
			)
			.await;

		assert!(matches!(empty, Err(Error::Invalid("text"))));

		let stranger = Uuid::new_v4();
		let unowned = store
			.create_comment(
				stranger,
				NewComment {
					parent: None,
					text: "hello".into(),
				},
			)
			.await;

		assert!(matches!(unowned, Err(Error::Missing("user", id)) if id == stranger));
		assert!(store.find_replies(stranger).await.unwrap().is_empty());
	}
}
