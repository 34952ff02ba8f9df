use std::sync::Arc;

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand_core::OsRng;
use thiserror::Error;

use crate::domain::entities::session::User;
use crate::usecase::ports::repo::{RepoError, UserRepository};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Preencha todos os campos")]
    MissingCredentials,
    #[error("E-mail ou senha inválidos")]
    InvalidCredentials,
    #[error("Erro ao autenticar: {0}")]
    Hash(String),
    #[error("Erro ao autenticar: {0}")]
    Repo(#[from] RepoError),
}

pub struct AuthService {
    users: Arc<dyn UserRepository>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let Some(stored) = self.users.find_user(email)? else {
            tracing::info!(email, "login rejected: unknown user");
            return Err(AuthError::InvalidCredentials);
        };
        if !verify_password(password, &stored.password_hash)? {
            tracing::info!(email, "login rejected: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        tracing::info!(email, "user signed in");
        Ok(User {
            id: stored.id,
            email: stored.email,
        })
    }

    pub fn register(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        let hash = hash_password(password)?;
        let id = self.users.create_user(email, &hash)?;
        Ok(User {
            id,
            email: email.to_string(),
        })
    }

    /// Creates the account unless the email is already registered.
    /// Returns whether a new account was created.
    pub fn ensure_user(&self, email: &str, password: &str) -> Result<bool, AuthError> {
        if self.users.find_user(email.trim())?.is_some() {
            return Ok(false);
        }
        self.register(email, password)?;
        tracing::info!(email, "bootstrap user created");
        Ok(true)
    }
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| AuthError::Hash(format!("argon2 hash failed: {err}")))?
        .to_string();
    Ok(hash)
}

fn verify_password(password: &str, password_hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|err| AuthError::Hash(format!("stored hash is invalid: {err}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
