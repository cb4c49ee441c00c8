//! API request and response types

use serde::{Deserialize, Serialize};
use validator::Validate;

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Sign-up request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(length(min = 1, max = 64, message = "Username must be 1-64 characters"))]
    pub username: String,
    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,
}

/// Sign-in request
///
/// Deliberately not length-validated: a rejected sign-in must look the
/// same whatever was wrong with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInRequest {
    pub username: String,
    pub password: String,
}

/// Issued token response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
}

/// Identity carried by a verified token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretResponse {
    pub user_id: String,
    pub username: String,
}

/// Registered account summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpResponse {
    pub user_id: String,
    pub username: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_up_request_length_rules() {
        let ok = SignUpRequest {
            username: "alice".to_string(),
            password: "correct-horse".to_string(),
        };
        assert!(ok.validate().is_ok());

        let short_password = SignUpRequest {
            username: "alice".to_string(),
            password: "pw1".to_string(),
        };
        assert!(short_password.validate().is_err());

        let empty_username = SignUpRequest {
            username: String::new(),
            password: "correct-horse".to_string(),
        };
        assert!(empty_username.validate().is_err());
    }

    #[test]
    fn test_auth_response_serializes_token() {
        let response = AuthResponse {
            token: "abc.def.ghi".to_string(),
            token_type: "Bearer".to_string(),
            expires_in: 3600,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["token"], "abc.def.ghi");
        assert_eq!(json["token_type"], "Bearer");
    }
}
