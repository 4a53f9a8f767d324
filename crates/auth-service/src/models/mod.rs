use chrono::{DateTime, Utc};
use common::secret::SecretString;
use serde::{Deserialize, Serialize};

/// A username/password pair as supplied by a login request.
///
/// Transient: produced per request, never persisted. The password is held
/// in a `SecretString` so a derived `Debug` cannot leak it into logs.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

/// User record as delivered by the user directory service.
///
/// Read-only here; the directory owns the record. The password hash is a
/// bcrypt string and is compared, never decoded or stored.
#[derive(Debug, Clone, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    #[serde(rename = "password")]
    pub password_hash: String,
    pub roles: Vec<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Configuration parameter as exchanged with the configuration service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub parameter_name: String,
    pub value: String,
    pub description: String,
}

/// An authenticated identity plus its granted role names.
///
/// Produced by both the login path and the introspection path; the shape is
/// identical regardless of which path built it. Role names are carried
/// verbatim from the directory: no case normalization, no deduplication.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AuthenticatedPrincipal {
    pub username: String,
    pub roles: Vec<String>,
}

/// Result of a successful login: the signed compact token and its expiry.
///
/// Not persisted by this service; session storage, if any, is a
/// collaborator-side concern.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub username: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use common::secret::ExposeSecret;

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds: Credentials =
            serde_json::from_str(r#"{"username": "alice", "password": "hunter2"}"#)
                .expect("credentials should deserialize");

        let shown = format!("{creds:?}");
        assert!(shown.contains("alice"));
        assert!(!shown.contains("hunter2"));
        assert_eq!(creds.password.expose_secret(), "hunter2");
    }

    #[test]
    fn test_user_record_deserializes_directory_payload() {
        let json = r#"{
            "id": "u1",
            "username": "alice",
            "password": "$2b$12$abcdefghijklmnopqrstuv",
            "roles": ["ADMIN", "USER"],
            "active": true
        }"#;

        let record: UserRecord = serde_json::from_str(json).expect("record should deserialize");
        assert_eq!(record.id, "u1");
        assert_eq!(record.roles, vec!["ADMIN", "USER"]);
        assert!(record.active);
    }

    #[test]
    fn test_user_record_active_defaults_to_true() {
        let json = r#"{"id": "u2", "username": "bob", "password": "h", "roles": []}"#;
        let record: UserRecord = serde_json::from_str(json).expect("record should deserialize");
        assert!(record.active);
    }

    #[test]
    fn test_session_serializes_camel_case() {
        let session = Session {
            username: "alice".to_string(),
            token: "abc.def.ghi".to_string(),
            expires_at: DateTime::from_timestamp(1_700_000_000, 0)
                .expect("valid timestamp")
                .with_timezone(&Utc),
        };

        let json = serde_json::to_string(&session).expect("session should serialize");
        assert!(json.contains("expiresAt"));
        assert!(!json.contains("expires_at"));
    }

    #[test]
    fn test_parameter_round_trips_camel_case() {
        let parameter = Parameter {
            parameter_name: "jwtSecretKey".to_string(),
            value: "{}".to_string(),
            description: "JWT secret key".to_string(),
        };

        let json = serde_json::to_string(&parameter).expect("parameter should serialize");
        assert!(json.contains("parameterName"));

        let back: Parameter = serde_json::from_str(&json).expect("parameter should deserialize");
        assert_eq!(back.parameter_name, "jwtSecretKey");
    }
}
