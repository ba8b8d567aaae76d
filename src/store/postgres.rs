use sqlx::postgres::{PgPool, PgPoolOptions};
use uuid::Uuid;

use super::{Error, Store};
use crate::{
	model::{Comment, NewComment},
	route::{
		auth::model::{NewUser, Session, User},
		post::model::{CreatePostInput, Post, PostFilter, UpdatePostInput},
	},
};

/// A store backed by Postgres.
#[derive(Debug, Clone)]
pub struct PgStore {
	pool: PgPool,
}

impl PgStore {
	/// Connects to the database and runs any pending migrations.
	pub async fn connect(url: &str, max_connections: u32) -> Result<Self, Error> {
		let pool = PgPoolOptions::new()
			.max_connections(max_connections)
			.connect(url)
			.await?;

		sqlx::migrate!().run(&pool).await?;

		tracing::info!("connected to database, migrations applied");

		Ok(Self { pool })
	}
}

/// Maps a violated constraint to the matching store error.
///
/// `owner` and `parent` are the ids referenced by the failed insert, if any.
fn constraint_error(error: sqlx::Error, owner: Option<Uuid>, parent: Option<Uuid>) -> Error {
	if let sqlx::Error::Database(ref database) = error {
		match (database.constraint(), owner, parent) {
			(Some("user_email_key"), ..) => return Error::Duplicate("email"),
			(Some("comment_text_check"), ..) => return Error::Invalid("text"),
			(Some("comment_owner_fkey"), Some(owner), _) => return Error::Missing("user", owner),
			(Some("comment_parent_fkey"), _, Some(parent)) => {
				return Error::Missing("comment", parent)
			}
			_ => {}
		}
	}

	Error::Database(error)
}

#[axum::async_trait]
impl Store for PgStore {
	async fn create_user(&self, user: NewUser) -> Result<User, Error> {
		sqlx::query_as::<_, User>(
			r#"
				INSERT INTO "user" (id, email, password)
				VALUES ($1, $2, $3)
				RETURNING *
			"#,
		)
		.bind(user.id)
		.bind(&user.email)
		.bind(&user.password)
		.fetch_one(&self.pool)
		.await
		.map_err(|e| constraint_error(e, None, None))
	}

	async fn find_user(&self, id: Uuid) -> Result<Option<User>, Error> {
		Ok(
			sqlx::query_as::<_, User>(r#"SELECT * FROM "user" WHERE id = $1"#)
				.bind(id)
				.fetch_optional(&self.pool)
				.await?,
		)
	}

	async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, Error> {
		Ok(
			sqlx::query_as::<_, User>(r#"SELECT * FROM "user" WHERE email = $1"#)
				.bind(email)
				.fetch_optional(&self.pool)
				.await?,
		)
	}

	async fn find_users(&self, ids: &[Uuid]) -> Result<Vec<User>, Error> {
		Ok(
			sqlx::query_as::<_, User>(r#"SELECT * FROM "user" WHERE id = ANY($1)"#)
				.bind(ids)
				.fetch_all(&self.pool)
				.await?,
		)
	}

	async fn update_password(&self, id: Uuid, password: Vec<u8>) -> Result<(), Error> {
		let status = sqlx::query(
			r#"
				UPDATE "user"
				SET password = $1, updated_at = now()
				WHERE id = $2
			"#,
		)
		.bind(password)
		.bind(id)
		.execute(&self.pool)
		.await?;

		if status.rows_affected() == 0 {
			return Err(Error::Missing("user", id));
		}

		Ok(())
	}

	async fn create_session(&self, user_id: Uuid) -> Result<Session, Error> {
		Ok(sqlx::query_as::<_, Session>(
			r#"
				INSERT INTO session (id, user_id)
				VALUES ($1, $2)
				RETURNING *
			"#,
		)
		.bind(Uuid::new_v4())
		.bind(user_id)
		.fetch_one(&self.pool)
		.await?)
	}

	async fn find_session_user(&self, session_id: Uuid) -> Result<Option<User>, Error> {
		Ok(sqlx::query_as::<_, User>(
			r#"
				SELECT * FROM "user" WHERE id = (
					SELECT user_id FROM session WHERE id = $1
				)
			"#,
		)
		.bind(session_id)
		.fetch_optional(&self.pool)
		.await?)
	}

	async fn delete_session(&self, session_id: Uuid) -> Result<(), Error> {
		sqlx::query("DELETE FROM session WHERE id = $1")
			.bind(session_id)
			.execute(&self.pool)
			.await?;

		Ok(())
	}

	async fn find_posts(&self, filter: PostFilter) -> Result<Vec<Post>, Error> {
		let query = match filter {
			PostFilter::All => sqlx::query_as::<_, Post>(
				r#"
					SELECT * FROM post
					ORDER BY created_at, id
				"#,
			),
			PostFilter::OwnedBy(owner) => sqlx::query_as::<_, Post>(
				r#"
					SELECT * FROM post
					WHERE owner = $1
					ORDER BY created_at, id
				"#,
			)
			.bind(owner),
		};

		Ok(query.fetch_all(&self.pool).await?)
	}

	async fn find_post(&self, id: Uuid) -> Result<Option<Post>, Error> {
		Ok(
			sqlx::query_as::<_, Post>("SELECT * FROM post WHERE id = $1")
				.bind(id)
				.fetch_optional(&self.pool)
				.await?,
		)
	}

	async fn create_post(&self, owner: Uuid, input: CreatePostInput) -> Result<Post, Error> {
		Ok(sqlx::query_as::<_, Post>(
			r#"
				INSERT INTO post (id, owner, title, body)
				VALUES ($1, $2, $3, $4)
				RETURNING *
			"#,
		)
		.bind(Uuid::new_v4())
		.bind(owner)
		.bind(input.title)
		.bind(input.body)
		.fetch_one(&self.pool)
		.await?)
	}

	async fn update_post(&self, id: Uuid, input: UpdatePostInput) -> Result<Option<Post>, Error> {
		Ok(sqlx::query_as::<_, Post>(
			r#"
				UPDATE post
				SET title = COALESCE($1, title), body = COALESCE($2, body), updated_at = now()
				WHERE id = $3
				RETURNING *
			"#,
		)
		.bind(input.title)
		.bind(input.body)
		.bind(id)
		.fetch_optional(&self.pool)
		.await?)
	}

	async fn delete_post(&self, id: Uuid) -> Result<bool, Error> {
		let status = sqlx::query("DELETE FROM post WHERE id = $1")
			.bind(id)
			.execute(&self.pool)
			.await?;

		Ok(status.rows_affected() > 0)
	}

	async fn create_comment(&self, owner: Uuid, input: NewComment) -> Result<Comment, Error> {
		let parent = input.parent;

		sqlx::query_as::<_, Comment>(
			r#"
				INSERT INTO comment (id, owner, parent, text)
				VALUES ($1, $2, $3, $4)
				RETURNING *
			"#,
		)
		.bind(Uuid::new_v4())
		.bind(owner)
		.bind(parent)
		.bind(input.text)
		.fetch_one(&self.pool)
		.await
		.map_err(|e| constraint_error(e, Some(owner), parent))
	}

	async fn find_comment(&self, id: Uuid) -> Result<Option<Comment>, Error> {
		Ok(
			sqlx::query_as::<_, Comment>("SELECT * FROM comment WHERE id = $1")
				.bind(id)
				.fetch_optional(&self.pool)
				.await?,
		)
	}

	async fn find_replies(&self, parent: Uuid) -> Result<Vec<Comment>, Error> {
		Ok(sqlx::query_as::<_, Comment>(
			r#"
				SELECT * FROM comment
				WHERE parent = $1
				ORDER BY created_at, id
			"#,
		)
		.bind(parent)
		.fetch_all(&self.pool)
		.await?)
	}
}
