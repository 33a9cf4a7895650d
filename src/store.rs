use sqlx::{migrate::MigrateDatabase, query, query_as, Pool, Sqlite, SqlitePool};

use log::{error, info};

use crate::auth::SessionId;
use crate::user::User;

type Result<T> = std::result::Result<T, ()>;

#[derive(Debug, PartialEq, Eq)]
pub enum FindError {
    NotFound,
    Internal,
}

#[derive(Debug, PartialEq, Eq)]
pub enum InsertError {
    DuplicateUsername,
    Internal,
}

pub struct Store(pub Pool<Sqlite>);

pub async fn init(url: &str) {
    match Sqlite::create_database(url).await {
        Ok(()) => {
            info!("Using {url}");
        }
        Err(e) => {
            let sqlx::Error::Database(db_err) = e else {
                panic!("error creating database: {e}");
            };

            panic!("sql db error: {db_err:?}");
        }
    }
}

impl Store {
    pub async fn new(url: &str) -> Self {
        let pool = match SqlitePool::connect(url).await {
            Ok(pool) => pool,
            Err(_err) => {
                init(url).await;
                SqlitePool::connect(url).await.expect("db connection")
            }
        };

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("migration");

        Self(pool)
    }
}

impl Store {
    pub async fn find_user(&self, username: &str) -> std::result::Result<User, FindError> {
        query_as::<_, User>(
            "
            SELECT *
            FROM users
            WHERE username = ?
            ",
        )
        .bind(username)
        .fetch_one(&self.0)
        .await
        .map_err(|e| {
            if matches!(e, sqlx::Error::RowNotFound) {
                FindError::NotFound
            } else {
                error!("couldn't look up user {username}: {e:?}");
                FindError::Internal
            }
        })
    }

    pub async fn insert_user(
        &self,
        username: &str,
        email: &str,
        pwhash: &str,
    ) -> std::result::Result<User, InsertError> {
        query_as::<_, User>(
            "
            INSERT INTO users
            (username, email, pwhash)
            VALUES
            (?, ?, ?)
            RETURNING *
            ",
        )
        .bind(username)
        .bind(email)
        .bind(pwhash)
        .fetch_one(&self.0)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                InsertError::DuplicateUsername
            } else {
                error!("couldn't insert user {username}: {e:?}");
                InsertError::Internal
            }
        })
    }

    /// session_id: set to None to logout / make NULL
    pub async fn set_session(&self, user_id: i64, session_id: Option<&SessionId>) -> bool {
        let session_id = session_id.map(SessionId::to_string);

        query(
            "
            UPDATE users
            SET session_id = ?
            WHERE id = ?
            ",
        )
        .bind(session_id)
        .bind(user_id)
        .execute(&self.0)
        .await
        .map_err(|e| {
            error!("couldn't update session for user {user_id}: {e}");
            e
        })
        .is_ok()
    }

    pub async fn user_by_session(&self, session_id: &SessionId) -> Result<Option<User>> {
        query_as::<_, User>(
            "
            SELECT *
            FROM users
            WHERE session_id = ?
            ",
        )
        .bind(session_id.to_string())
        .fetch_optional(&self.0)
        .await
        .map_err(|e| {
            error!("couldn't query for session {session_id}: {e:?}");
        })
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db) => db
            .message()
            .contains("UNIQUE constraint failed: users.username"),
        _ => false,
    }
}
