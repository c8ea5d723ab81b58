//! API DTOs (Data Transfer Objects)
//!
//! Request bodies deliberately have no `Debug` derive: they carry passwords.

use platform::password::check_length_policy;
use serde::{Deserialize, Serialize};

use crate::application::{SignInInput, SignUpInput, UserView};
use crate::domain::value_object::{registration_status::RegistrationStatus, user_role::UserRole};
use crate::error::{AuthError, AuthResult};

// ============================================================================
// Sign Up
// ============================================================================

/// Sign up request
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl SignUpRequest {
    /// Input-boundary checks: presence and password length
    ///
    /// Email format is left to the `Email` value object.
    pub fn validate(self) -> AuthResult<SignUpInput> {
        let email = self
            .email
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| AuthError::Validation("email is required".to_string()))?;

        let password = self
            .password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| AuthError::Validation("password is required".to_string()))?;

        check_length_policy(&password).map_err(|e| AuthError::Validation(e.to_string()))?;

        Ok(SignUpInput { email, password })
    }
}

// ============================================================================
// Sign In
// ============================================================================

/// Sign in request
///
/// Missing fields deserialize as empty and fail as invalid credentials.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl From<SignInRequest> for SignInInput {
    fn from(req: SignInRequest) -> Self {
        SignInInput {
            email: req.email,
            password: req.password,
        }
    }
}

/// Sign in response (tokens travel in cookies only)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub user_id: String,
}

// ============================================================================
// Users
// ============================================================================

/// Public user view
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub registration_status: RegistrationStatus,
    pub role: UserRole,
}

impl From<UserView> for UserResponse {
    fn from(view: UserView) -> Self {
        Self {
            id: view.user_id.to_string(),
            email: view.email.into_db(),
            registration_status: view.registration_status,
            role: view.user_role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(json: &str) -> AuthResult<SignUpInput> {
        serde_json::from_str::<SignUpRequest>(json).unwrap().validate()
    }

    #[test]
    fn test_signup_validation() {
        let input = signup(r#"{"email":"alice@example.com","password":"Secr3tPW!"}"#).unwrap();
        assert_eq!(input.email, "alice@example.com");

        for body in [
            r#"{"password":"Secr3tPW!"}"#,
            r#"{"email":"  ","password":"Secr3tPW!"}"#,
            r#"{"email":"alice@example.com"}"#,
            r#"{"email":"alice@example.com","password":"short"}"#,
        ] {
            assert!(matches!(signup(body), Err(AuthError::Validation(_))), "{body}");
        }

        let long = format!(r#"{{"email":"a@b.co","password":"{}"}}"#, "x".repeat(129));
        assert!(matches!(signup(&long), Err(AuthError::Validation(_))));
    }

    #[test]
    fn test_user_response_shape() {
        let response = UserResponse {
            id: "7d1c0d0e-0000-4000-8000-000000000000".to_string(),
            email: "alice@example.com".to_string(),
            registration_status: RegistrationStatus::Pending,
            role: UserRole::User,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["registrationStatus"], "PENDING");
        assert_eq!(json["role"], "USER");
        assert!(json.get("password").is_none());
        assert!(json.get("passwordHash").is_none());
    }
}
