use crate::db::DbConnection;
use crate::session::SessionUser;
use anyhow::Result;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use shared::Animal;
use thiserror::Error;
use tracing::info;

pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 8;

/// Storage-facing operations over the animal collection.
#[derive(Clone)]
pub struct AnimalService {
    db: DbConnection,
}

impl AnimalService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Result<Vec<Animal>> {
        self.db.list_animals().await
    }

    pub async fn add(&self, animal: &Animal) -> Result<String> {
        info!("Adding animal: {}", animal.name);
        self.db.insert_animal(animal).await
    }

    pub async fn get(&self, id: &str) -> Result<Option<Animal>> {
        self.db.find_animal(id).await
    }

    /// Replace a stored record's contents. Updates are idempotent: a
    /// missing id is a silent no-op.
    pub async fn replace(&self, id: &str, animal: &Animal) -> Result<()> {
        info!("Updating animal {}", id);
        self.db.update_animal(id, animal).await
    }

    pub async fn remove(&self, id: &str) -> Result<bool> {
        info!("Deleting animal {}", id);
        self.db.delete_animal(id).await
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// Under-length username or password.
    #[error("{0}")]
    Validation(String),
    /// Username already registered.
    #[error("Username is already taken")]
    Conflict,
    /// Unknown username or wrong password; deliberately the same error
    /// either way so the response does not reveal which.
    #[error("Invalid username or password")]
    BadCredentials,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Validates username/password pairs against stored hashes and creates
/// new accounts. Only the Argon2id hash of a password is ever stored.
#[derive(Clone)]
pub struct CredentialService {
    db: DbConnection,
}

impl CredentialService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Create a new account. The existence check and insert are separate
    /// statements; a race between concurrent registrations falls through
    /// to the store's UNIQUE constraint.
    pub async fn register(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let username = username.trim();
        if username.chars().count() < MIN_USERNAME_LEN {
            return Err(AuthError::Validation(format!(
                "Username must be at least {} characters",
                MIN_USERNAME_LEN
            )));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        if self.db.find_user_by_username(username).await?.is_some() {
            return Err(AuthError::Conflict);
        }

        let password_hash = hash_password(password)?;
        let id = self
            .db
            .insert_user(username, &password_hash)
            .await
            .map_err(|_| AuthError::Conflict)?;

        info!("Registered user {}", username);
        Ok(id)
    }

    /// Check a credential pair and hand back the session identity.
    pub async fn login(&self, username: &str, password: &str) -> Result<SessionUser, AuthError> {
        let Some(user) = self.db.find_user_by_username(username.trim()).await? else {
            return Err(AuthError::BadCredentials);
        };

        if !verify_password(password, &user.password_hash)? {
            return Err(AuthError::BadCredentials);
        }

        info!("User {} logged in", user.username);
        Ok(SessionUser {
            id: user.id,
            username: user.username,
        })
    }
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::Internal(anyhow::anyhow!("password hashing failed: {e}")))?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| AuthError::Internal(anyhow::anyhow!("stored hash is unreadable: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
