//! Teacher registration and password verification.

use rand::RngCore;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr,
};
use sha2::Sha256;
use tracing::info;

use crate::clock;
use crate::entity::teacher::{self, ActiveModel as TeacherActiveModel, Entity as TeacherEntity};
use crate::error::{Error, Result};

/// PBKDF2 rounds used unless overridden with [`CredentialStore::with_iterations`].
pub const DEFAULT_ITERATIONS: u32 = 100_000;

/// Salt length in bytes before hex encoding.
const SALT_BYTES: usize = 16;

/// Derived key length in bytes before hex encoding.
const HASH_BYTES: usize = 32;

/// Salt fed to the throwaway hash computed for unknown usernames.
const DUMMY_SALT: &str = "00000000000000000000000000000000";

/// Persists teachers and checks their passwords.
///
/// Passwords are stretched with PBKDF2-HMAC-SHA256 under a per-teacher random
/// salt; only the hex digest and the salt are stored.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    conn: DatabaseConnection,
    iterations: u32,
}

impl CredentialStore {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self {
            conn,
            iterations: DEFAULT_ITERATIONS,
        }
    }

    /// Overrides the PBKDF2 round count.
    ///
    /// Changing this after teachers have registered locks them out, since the
    /// count is not stored per row.
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations.max(1);
        self
    }

    /// Registers a teacher and returns the new teacher's id.
    ///
    /// Username and display name are trimmed. Fails with [`Error::Validation`]
    /// when any of the three inputs is blank and with
    /// [`Error::DuplicateUsername`] when the username is taken.
    pub async fn register(&self, username: &str, password: &str, display_name: &str) -> Result<i32> {
        let username = username.trim();
        let display_name = display_name.trim();

        if username.is_empty() || password.trim().is_empty() {
            return Err(Error::validation("Both username and password are required"));
        }
        if display_name.is_empty() {
            return Err(Error::validation("Name is required"));
        }

        let taken = TeacherEntity::find()
            .filter(teacher::Column::Username.eq(username))
            .one(&self.conn)
            .await?
            .is_some();
        if taken {
            return Err(Error::DuplicateUsername(username.to_string()));
        }

        let salt = generate_salt();
        let password_hash = hash_password(password, &salt, self.iterations);

        let model = TeacherActiveModel {
            username: Set(username.to_string()),
            display_name: Set(display_name.to_string()),
            password_hash: Set(password_hash),
            salt: Set(salt),
            created_at: Set(clock::now()),
            ..Default::default()
        };

        // A concurrent registration can slip in between the check and the insert
        let inserted = model.insert(&self.conn).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                Error::DuplicateUsername(username.to_string())
            }
            _ => Error::Database(e),
        })?;

        info!(teacher_id = inserted.id, username, "teacher registered");
        Ok(inserted.id)
    }

    /// Checks a username/password pair.
    ///
    /// Returns `Ok(None)` both for an unknown username and for a wrong
    /// password. The digest comparison runs in constant time.
    pub async fn verify(&self, username: &str, password: &str) -> Result<Option<teacher::Model>> {
        let found = TeacherEntity::find()
            .filter(teacher::Column::Username.eq(username))
            .one(&self.conn)
            .await?;

        let Some(teacher) = found else {
            // Burn the same work as a real check
            std::hint::black_box(hash_password(password, DUMMY_SALT, self.iterations));
            return Ok(None);
        };

        let attempt = hash_password(password, &teacher.salt, self.iterations);
        if constant_time_eq(attempt.as_bytes(), teacher.password_hash.as_bytes()) {
            Ok(Some(teacher))
        } else {
            Ok(None)
        }
    }
}

fn generate_salt() -> String {
    let mut bytes = [0u8; SALT_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn hash_password(password: &str, salt: &str, iterations: u32) -> String {
    let mut key = [0u8; HASH_BYTES];
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt.as_bytes(), iterations, &mut key);
    hex::encode(key)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |diff, (x, y)| diff | (x ^ y)) == 0
}
