use anyhow::Result;
use shared::Animal;
use sqlx::{migrate::MigrateDatabase, Row, Sqlite, SqlitePool};
use std::sync::Arc;
use uuid::Uuid;

/// A stored login account. Never leaves the backend crate.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    pub password_hash: String,
}

/// Whether a path segment is structurally a record identifier. Anything
/// else is treated as referring to no record at all, never as an error.
pub fn valid_id(id: &str) -> bool {
    Uuid::parse_str(id).is_ok()
}

/// DbConnection manages the document store holding animal listings and
/// user accounts. Animal documents are stored as sparse JSON bodies so the
/// schema stays as permissive as the listings themselves.
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Create a new database connection
    pub async fn new(url: &str) -> Result<Self> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?
        }

        let pool = SqlitePool::connect(url).await?;

        Self::setup_schema(&pool).await?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Initialize a test database with a unique name
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        let test_id = Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);

        Self::new(&db_url).await
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS animals (
                id TEXT PRIMARY KEY,
                doc TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// List every animal in insertion order.
    pub async fn list_animals(&self) -> Result<Vec<Animal>> {
        let rows = sqlx::query("SELECT id, doc FROM animals ORDER BY rowid")
            .fetch_all(&*self.pool)
            .await?;

        rows.iter()
            .map(|row| {
                let doc: String = row.get("doc");
                let mut animal: Animal = serde_json::from_str(&doc)?;
                animal.id = Some(row.get("id"));
                Ok(animal)
            })
            .collect()
    }

    /// Persist a new animal document and return its assigned identifier.
    pub async fn insert_animal(&self, animal: &Animal) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let doc = serde_json::to_string(&Animal {
            id: None,
            ..animal.clone()
        })?;

        sqlx::query("INSERT INTO animals (id, doc) VALUES (?, ?)")
            .bind(&id)
            .bind(&doc)
            .execute(&*self.pool)
            .await?;

        Ok(id)
    }

    /// Fetch one animal. A malformed identifier reads as absent.
    pub async fn find_animal(&self, id: &str) -> Result<Option<Animal>> {
        if !valid_id(id) {
            return Ok(None);
        }

        let row = sqlx::query("SELECT doc FROM animals WHERE id = ?")
            .bind(id)
            .fetch_optional(&*self.pool)
            .await?;

        match row {
            Some(r) => {
                let doc: String = r.get("doc");
                let mut animal: Animal = serde_json::from_str(&doc)?;
                animal.id = Some(id.to_string());
                Ok(Some(animal))
            }
            None => Ok(None),
        }
    }

    /// Replace the document body of an existing animal, keeping its id.
    /// Missing and malformed identifiers are silent no-ops.
    pub async fn update_animal(&self, id: &str, animal: &Animal) -> Result<()> {
        if !valid_id(id) {
            return Ok(());
        }

        let doc = serde_json::to_string(&Animal {
            id: None,
            ..animal.clone()
        })?;

        sqlx::query("UPDATE animals SET doc = ? WHERE id = ?")
            .bind(&doc)
            .bind(id)
            .execute(&*self.pool)
            .await?;

        Ok(())
    }

    /// Delete an animal. Absence and malformed identifiers are not errors.
    pub async fn delete_animal(&self, id: &str) -> Result<bool> {
        if !valid_id(id) {
            return Ok(false);
        }

        let result = sqlx::query("DELETE FROM animals WHERE id = ?")
            .bind(id)
            .execute(&*self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Store a new user account and return its assigned identifier.
    pub async fn insert_user(&self, username: &str, password_hash: &str) -> Result<String> {
        let id = Uuid::new_v4().to_string();

        sqlx::query("INSERT INTO users (id, username, password_hash) VALUES (?, ?, ?)")
            .bind(&id)
            .bind(username)
            .bind(password_hash)
            .execute(&*self.pool)
            .await?;

        Ok(id)
    }

    /// Look up a user account by username.
    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<UserRecord>> {
        let row = sqlx::query("SELECT id, username, password_hash FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&*self.pool)
            .await?;

        Ok(row.map(|r| UserRecord {
            id: r.get("id"),
            username: r.get("username"),
            password_hash: r.get("password_hash"),
        }))
    }
}
