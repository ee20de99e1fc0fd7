//! Authentication service.
//!
//! Registration, login, password change, and admin user creation, plus
//! the input validation rules the platform enforces on identity fields.

mod error;
mod token;

pub use error::AuthError;
pub use token::{AuthUser, TokenService};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::SqlitePool;

use shoprate_core::{Email, Role, UserId};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::user::User;

/// Name length bounds.
const MIN_NAME_LENGTH: usize = 20;
const MAX_NAME_LENGTH: usize = 60;

/// Password length bounds.
const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_PASSWORD_LENGTH: usize = 16;

/// Special characters a password must draw from.
const PASSWORD_SPECIALS: &[char] = &['@', '$', '!', '%', '*', '?', '&'];

/// Maximum address length.
const MAX_ADDRESS_LENGTH: usize = 400;

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new customer account (always role `USER`).
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail`, `InvalidName`, `InvalidAddress`,
    /// or `WeakPassword` when a field fails validation, and
    /// `UserAlreadyExists` when the email is taken.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        address: Option<&str>,
    ) -> Result<User, AuthError> {
        self.create_user(name, email, password, address, Role::User)
            .await
    }

    /// Create a user with an explicit role (admin operation).
    ///
    /// # Errors
    ///
    /// Same as [`Self::register`].
    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
        address: Option<&str>,
        role: Role,
    ) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        validate_name(name)?;
        validate_address(address)?;
        validate_password(password)?;

        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(name, &email, &password_hash, address, role)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Login with email and password.
    ///
    /// Wrong email and wrong password are indistinguishable to the caller.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email)?;

        let user = self
            .users
            .get_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &user.password_hash)?;

        Ok(user)
    }

    /// Change the caller's password after re-verifying the current one.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the current password is
    /// wrong, `WeakPassword` if the new one fails validation.
    pub async fn change_password(
        &self,
        user_id: UserId,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let user = self
            .users
            .get_by_id(user_id)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(current_password, &user.password_hash)?;
        validate_password(new_password)?;

        let new_hash = hash_password(new_password)?;
        self.users.update_password(user_id, &new_hash).await?;

        Ok(())
    }
}

/// Validate a person name: 20-60 characters.
fn validate_name(name: &str) -> Result<(), AuthError> {
    let len = name.chars().count();
    if !(MIN_NAME_LENGTH..=MAX_NAME_LENGTH).contains(&len) {
        return Err(AuthError::InvalidName(format!(
            "name must be between {MIN_NAME_LENGTH} and {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate an optional address: at most 400 characters.
fn validate_address(address: Option<&str>) -> Result<(), AuthError> {
    if let Some(address) = address
        && address.chars().count() > MAX_ADDRESS_LENGTH
    {
        return Err(AuthError::InvalidAddress(format!(
            "address must not exceed {MAX_ADDRESS_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a password: 8-16 characters drawn from letters, digits, and
/// the special set, with at least one uppercase letter and one special
/// character.
fn validate_password(password: &str) -> Result<(), AuthError> {
    let len = password.chars().count();
    if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&len) {
        return Err(AuthError::WeakPassword(format!(
            "password must be {MIN_PASSWORD_LENGTH}-{MAX_PASSWORD_LENGTH} characters"
        )));
    }

    let allowed =
        |c: char| c.is_ascii_alphanumeric() || PASSWORD_SPECIALS.contains(&c);
    if !password.chars().all(allowed) {
        return Err(AuthError::WeakPassword(
            "password may only contain letters, digits, and @$!%*?&".to_owned(),
        ));
    }

    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(AuthError::WeakPassword(
            "password must contain at least one uppercase letter".to_owned(),
        ));
    }

    if !password.chars().any(|c| PASSWORD_SPECIALS.contains(&c)) {
        return Err(AuthError::WeakPassword(
            "password must contain at least one special character (@$!%*?&)".to_owned(),
        ));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
