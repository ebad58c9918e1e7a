//! JSON response bodies returned by the HTTP API.
//!
//! Every non-config endpoint answers with the same envelope:
//!
//! ```json
//! { "success": true, "message": "Wake packet sent to AA:BB:CC:DD:EE:FF", "timestamp": 1700000000000 }
//! ```
//!
//! `authToken` appears only on a successful login and `timestamp` only on a
//! successful wake; absent fields are omitted rather than sent as `null`.

use serde::{Deserialize, Serialize};

/// Standard `{success, message}` envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    /// Milliseconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl ApiResponse {
    /// A `success: true` response.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            auth_token: None,
            timestamp: None,
        }
    }

    /// A `success: false` response.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            ..Self::ok(message)
        }
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn with_timestamp(mut self, millis: i64) -> Self {
        self.timestamp = Some(millis);
        self
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: i64,
    pub server: String,
    pub version: String,
}

impl HealthResponse {
    /// Server name reported by the health probe.
    pub const SERVER_NAME: &'static str = "WOL Server";

    pub fn ok(timestamp: i64) -> Self {
        Self {
            status: "OK".to_string(),
            timestamp,
            server: Self::SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_serializes_only_success_and_message() {
        // Arrange
        let body = ApiResponse::failure("Authentication required");

        // Act
        let json = serde_json::to_string(&body).unwrap();

        // Assert
        assert_eq!(json, r#"{"success":false,"message":"Authentication required"}"#);
    }

    #[test]
    fn test_login_success_uses_camel_case_token_field() {
        let body = ApiResponse::ok("Login successful").with_auth_token("tok");
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["authToken"], "tok");
        assert!(value.get("timestamp").is_none());
    }

    #[test]
    fn test_wake_response_carries_timestamp() {
        let body = ApiResponse::ok("Wake packet sent to AA:BB:CC:DD:EE:FF").with_timestamp(42);
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["timestamp"], 42);
        assert_eq!(value["success"], true);
    }

    #[test]
    fn test_health_reports_ok_and_crate_version() {
        let health = HealthResponse::ok(7);
        assert_eq!(health.status, "OK");
        assert_eq!(health.server, "WOL Server");
        assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(health.timestamp, 7);
    }
}
