//! Core business logic for the authentication system.

use crate::auth::models::*;
use crate::config::Config;
use crate::database::models::{CreateUser, User};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::user_repository::UserRepository;
use crate::utils::jwt::JwtUtils;
use bcrypt::{DEFAULT_COST, hash, verify};
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

/// A valid bcrypt hash of a throwaway string. Verification runs against it
/// when the email is unknown so response timing does not reveal whether an
/// account exists.
const DUMMY_HASH: &str = "$2a$12$R9h/cIPz0gi.URNNX3kh2OPST9/PgBkqquzi.Ss7KIUgO2t0jWMUW";

/// Authentication service for registration, login, and password management
pub struct AuthService<'a> {
    pool: &'a SqlitePool,
    jwt_utils: JwtUtils,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService instance
    pub fn new(pool: &'a SqlitePool, config: &Config) -> Self {
        AuthService {
            pool,
            jwt_utils: JwtUtils::from_config(config),
        }
    }

    /// Register a new user with a securely hashed password
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<UserInfo> {
        Self::validate_request(&request)?;

        let repo = UserRepository::new(self.pool);
        if repo.email_exists(&request.email).await? {
            return Err(ServiceError::already_exists("User", &request.email));
        }

        let password_hash = Self::hash_password(&request.password)?;
        let user = repo
            .create_user(CreateUser {
                id: Uuid::now_v7().to_string(),
                username: request.username,
                email: request.email,
                password_hash,
            })
            .await?;

        Ok(Self::user_info(user))
    }

    /// Authenticate a user and mint a session token.
    ///
    /// Returns the signed token together with the user info and the session
    /// lifetime in seconds; the handler attaches the token as a cookie.
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<(String, LoginResponse)> {
        Self::validate_request(&request)?;

        let repo = UserRepository::new(self.pool);
        let user = match repo.get_user_by_email(&request.email).await? {
            Some(user) => user,
            None => {
                let _ = Self::verify_password(&request.password, DUMMY_HASH);
                return Err(ServiceError::unauthorized("Invalid email or password"));
            }
        };

        if !Self::verify_password(&request.password, &user.password_hash)? {
            return Err(ServiceError::unauthorized("Invalid email or password"));
        }

        let token = self
            .jwt_utils
            .generate_token(user.id.clone(), user.email.clone())?;

        let response = LoginResponse {
            user: Self::user_info(user),
            expires_in: self.jwt_utils.expires_in_seconds(),
        };

        Ok((token, response))
    }

    /// Replace the stored password hash after re-verifying the current one
    pub async fn change_password(&self, request: ChangePasswordRequest) -> ServiceResult<()> {
        Self::validate_request(&request)?;

        let repo = UserRepository::new(self.pool);
        let user = repo
            .get_user_by_email(&request.email)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", &request.email))?;

        if !Self::verify_password(&request.current_password, &user.password_hash)? {
            return Err(ServiceError::unauthorized("Current password is incorrect"));
        }

        let password_hash = Self::hash_password(&request.new_password)?;
        repo.update_password_hash(&user.id, &password_hash).await?;

        Ok(())
    }

    /// Look up the profile for an authenticated user id
    pub async fn get_profile(&self, user_id: &str) -> ServiceResult<UserInfo> {
        let repo = UserRepository::new(self.pool);
        let user = repo
            .get_user_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id))?;

        Ok(Self::user_info(user))
    }

    fn user_info(user: User) -> UserInfo {
        UserInfo {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }

    fn validate_request<T: Validate>(request: &T) -> ServiceResult<()> {
        if let Err(validation_errors) = request.validate() {
            let error_messages: Vec<String> = validation_errors
                .field_errors()
                .into_iter()
                .flat_map(|(field, errors)| {
                    errors.iter().map(move |error| {
                        format!(
                            "{}: {}",
                            field,
                            error.message.as_ref().unwrap_or(&"Invalid value".into())
                        )
                    })
                })
                .collect();
            return Err(ServiceError::validation(error_messages.join(", ")));
        }
        Ok(())
    }

    fn hash_password(password: &str) -> ServiceResult<String> {
        hash(password, DEFAULT_COST)
            .map_err(|e| ServiceError::internal_error(format!("Password hashing failed: {}", e)))
    }

    fn verify_password(password: &str, hash: &str) -> ServiceResult<bool> {
        verify(password, hash).map_err(|e| {
            ServiceError::internal_error(format!("Password verification failed: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_pool;

    fn test_config() -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            acquire_timeout_seconds: 3,
            jwt_secret: "auth-service-test-secret".to_string(),
            jwt_expires_in_seconds: 3600,
            server_port: 0,
            storage: None,
            gemini_api_key: None,
        }
    }

    fn register_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            username: "tester".to_string(),
            email: email.to_string(),
            password: "hunter2!".to_string(),
        }
    }

    #[tokio::test]
    async fn duplicate_registration_is_a_conflict() {
        let pool = test_pool().await;
        let config = test_config();
        let service = AuthService::new(&pool, &config);

        service
            .register(register_request("dup@example.com"))
            .await
            .unwrap();
        let err = service
            .register(register_request("dup@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn login_round_trips_through_the_minted_token() {
        let pool = test_pool().await;
        let config = test_config();
        let service = AuthService::new(&pool, &config);

        let registered = service
            .register(register_request("login@example.com"))
            .await
            .unwrap();

        let (token, response) = service
            .login(LoginRequest {
                email: "login@example.com".to_string(),
                password: "hunter2!".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(response.user.email, "login@example.com");
        assert_eq!(response.expires_in, 3600);

        let claims = JwtUtils::from_config(&config).validate_token(&token).unwrap();
        assert_eq!(claims.sub, registered.id);
        assert_eq!(claims.email, "login@example.com");
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_are_both_unauthorized() {
        let pool = test_pool().await;
        let config = test_config();
        let service = AuthService::new(&pool, &config);

        service
            .register(register_request("wrongpw@example.com"))
            .await
            .unwrap();

        let err = service
            .login(LoginRequest {
                email: "wrongpw@example.com".to_string(),
                password: "not-the-password".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized { .. }));

        let err = service
            .login(LoginRequest {
                email: "nobody@example.com".to_string(),
                password: "whatever".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn change_password_reverifies_the_current_one() {
        let pool = test_pool().await;
        let config = test_config();
        let service = AuthService::new(&pool, &config);

        service
            .register(register_request("change@example.com"))
            .await
            .unwrap();

        let err = service
            .change_password(ChangePasswordRequest {
                email: "change@example.com".to_string(),
                current_password: "wrong".to_string(),
                new_password: "next".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized { .. }));

        let err = service
            .change_password(ChangePasswordRequest {
                email: "ghost@example.com".to_string(),
                current_password: "hunter2!".to_string(),
                new_password: "next".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));

        service
            .change_password(ChangePasswordRequest {
                email: "change@example.com".to_string(),
                current_password: "hunter2!".to_string(),
                new_password: "correct horse".to_string(),
            })
            .await
            .unwrap();

        service
            .login(LoginRequest {
                email: "change@example.com".to_string(),
                password: "correct horse".to_string(),
            })
            .await
            .unwrap();
    }
}
