//! Login and registration forms.
//!
//! Validation runs before any request is made, so a rejected form never
//! reaches the backend.

use std::sync::LazyLock;

use regex::Regex;

use crate::api::{AuthApi, LoginResponse};
use crate::errors::{FormError, ValidationError};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

pub const LOGIN_FAILED: &str = "Login failed";
pub const REGISTRATION_FAILED: &str = "Registration failed";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.username.trim().is_empty() {
            return Err(ValidationError::EmptyUsername);
        }
        if self.password.is_empty() {
            return Err(ValidationError::EmptyPassword);
        }
        Ok(())
    }

    pub async fn submit(&self, api: &dyn AuthApi) -> Result<LoginResponse, FormError> {
        self.validate()?;
        Ok(api.login(self.username.trim(), &self.password).await?)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    /// Checks in the order the fields appear on the form.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.username.trim().is_empty() {
            return Err(ValidationError::EmptyUsername);
        }
        if self.password.is_empty() {
            return Err(ValidationError::EmptyPassword);
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        if !is_valid_email(&self.email) {
            return Err(ValidationError::InvalidEmail);
        }
        Ok(())
    }

    /// Register, then sign in with the same credentials.
    ///
    /// A failed login after a successful registration is reported as an
    /// error even though the account now exists.
    pub async fn submit(&self, api: &dyn AuthApi) -> Result<LoginResponse, FormError> {
        self.validate()?;
        let username = self.username.trim();
        api.register(username, &self.password, self.email.trim())
            .await?;
        Ok(api.login(username, &self.password).await?)
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::AuthStatus;
    use crate::errors::ApiError;
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingAuth {
        calls: Mutex<Vec<String>>,
        reject_register: bool,
    }

    impl RecordingAuth {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AuthApi for RecordingAuth {
        async fn register(&self, username: &str, _: &str, email: &str) -> Result<(), ApiError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("register {} {}", username, email));
            if self.reject_register {
                return Err(ApiError::Server {
                    status: StatusCode::CONFLICT,
                    message: "Username already taken".into(),
                });
            }
            Ok(())
        }
        async fn login(&self, username: &str, _: &str) -> Result<LoginResponse, ApiError> {
            self.calls.lock().unwrap().push(format!("login {}", username));
            Ok(LoginResponse::default())
        }
        async fn logout(&self) -> Result<(), ApiError> {
            unreachable!()
        }
        async fn auth_status(&self) -> Result<AuthStatus, ApiError> {
            unreachable!()
        }
    }

    fn register_form(password: &str, confirm: &str) -> RegisterForm {
        RegisterForm {
            username: "alice".into(),
            email: "alice@example.com".into(),
            password: password.into(),
            confirm_password: confirm.into(),
        }
    }

    #[test]
    fn login_requires_both_fields() {
        assert_eq!(
            LoginForm::new(" ", "pw").validate(),
            Err(ValidationError::EmptyUsername)
        );
        assert_eq!(
            LoginForm::new("bob", "").validate(),
            Err(ValidationError::EmptyPassword)
        );
        assert!(LoginForm::new("bob", "pw").validate().is_ok());
    }

    #[test]
    fn email_format() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.d"));
        assert!(!is_valid_email("@c.d"));
    }

    #[test]
    fn mismatch_is_reported_before_email() {
        let mut form = register_form("a", "b");
        form.email = "nope".into();
        assert_eq!(form.validate(), Err(ValidationError::PasswordMismatch));
    }

    #[tokio::test]
    async fn mismatched_passwords_never_hit_the_network() {
        let api = RecordingAuth::default();
        let err = register_form("a", "b").submit(&api).await.unwrap_err();
        assert_eq!(err.display_message(REGISTRATION_FAILED), "Passwords do not match");
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn registration_logs_in_afterwards() {
        let api = RecordingAuth::default();
        register_form("pw", "pw").submit(&api).await.unwrap();
        assert_eq!(
            api.calls(),
            vec!["register alice alice@example.com", "login alice"]
        );
    }

    #[tokio::test]
    async fn rejected_registration_skips_login() {
        let api = RecordingAuth {
            reject_register: true,
            ..Default::default()
        };
        let err = register_form("pw", "pw").submit(&api).await.unwrap_err();
        assert_eq!(err.display_message(REGISTRATION_FAILED), "Username already taken");
        assert_eq!(api.calls(), vec!["register alice alice@example.com"]);
    }
}
