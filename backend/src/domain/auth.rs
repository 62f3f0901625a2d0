//! Authenticated request context.
//!
//! The gateway in front of this service resolves the caller and forwards a
//! `loggedUser` object with every request: in the JSON body for writes and as
//! a JSON-encoded query parameter for reads and deletes. Validators receive
//! this context from the caller; they never fetch it themselves.

use serde::{Deserialize, Serialize};

/// Application grants attached to the authenticated user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraUserData {
    /// Applications the user is authorized to act on.
    #[serde(default)]
    pub apps: Vec<String>,
}

/// The authenticated user forwarded by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggedUser {
    /// Stable user identifier.
    pub id: String,
    /// Authorization data beyond the identifier.
    #[serde(default)]
    pub extra_user_data: ExtraUserData,
}

impl LoggedUser {
    /// Whether the user is authorized for `application`.
    pub fn may_use_application(&self, application: &str) -> bool {
        self.extra_user_data
            .apps
            .iter()
            .any(|app| app == application)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(apps: &[&str]) -> LoggedUser {
        LoggedUser {
            id: "u1".to_owned(),
            extra_user_data: ExtraUserData {
                apps: apps.iter().map(|app| (*app).to_owned()).collect(),
            },
        }
    }

    #[test]
    fn application_grants_are_exact_matches() {
        let user = user(&["rw", "gfw"]);
        assert!(user.may_use_application("rw"));
        assert!(!user.may_use_application("RW"));
        assert!(!user.may_use_application("aqueduct"));
    }

    #[test]
    fn deserializes_gateway_shape() {
        let parsed: LoggedUser = serde_json::from_str(
            r#"{"id": "u1", "extraUserData": {"apps": ["rw"]}}"#,
        )
        .expect("gateway payload should parse");
        assert_eq!(parsed.id, "u1");
        assert_eq!(parsed.extra_user_data.apps, vec!["rw".to_owned()]);
    }

    #[test]
    fn missing_extra_user_data_defaults_to_no_apps() {
        let parsed: LoggedUser =
            serde_json::from_str(r#"{"id": "u1"}"#).expect("payload should parse");
        assert!(parsed.extra_user_data.apps.is_empty());
    }
}
