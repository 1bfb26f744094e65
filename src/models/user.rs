use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored account. Never serialized directly: use `PublicUser`.
#[derive(Debug, Clone, PartialEq)]
pub struct UserAccount {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    /// Google OAuth tokens (access/refresh/expiry). Opaque here.
    pub google_tokens: Option<serde_json::Value>,
    pub time_zone: String,
    pub last_calendar_sync: Option<DateTime<Utc>>,
    pub calendar_sync_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to create an account. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUserAccount {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub time_zone: Option<String>,
}

/// Account as returned to clients: no credentials, no tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub time_zone: String,
    pub last_calendar_sync: Option<DateTime<Utc>>,
    pub calendar_sync_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserAccount> for PublicUser {
    fn from(user: UserAccount) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            time_zone: user.time_zone,
            last_calendar_sync: user.last_calendar_sync,
            calendar_sync_enabled: user.calendar_sync_enabled,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_user_hides_credentials() {
        let now = Utc::now();
        let user = UserAccount {
            id: Uuid::new_v4(),
            name: "Ama".into(),
            email: "ama@example.com".into(),
            password_hash: "pbkdf2-sha256$1000$c2FsdA$aGFzaA".into(),
            google_tokens: Some(serde_json::json!({ "access_token": "secret" })),
            time_zone: "UTC".into(),
            last_calendar_sync: None,
            calendar_sync_enabled: false,
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(PublicUser::from(user)).unwrap();
        assert_eq!(json["email"], "ama@example.com");
        assert_eq!(json["timeZone"], "UTC");
        assert_eq!(json["calendarSyncEnabled"], false);
        assert!(json["lastCalendarSync"].is_null());
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("googleTokens").is_none());
    }
}
