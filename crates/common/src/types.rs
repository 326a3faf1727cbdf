// Core domain types shared across all Gatehouse crates.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A workspace as seen by the sign-in path: its id and auth policy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkspaceRef {
    pub id: Uuid,
    pub is_password_auth_enabled: bool,
}

impl WorkspaceRef {
    pub fn new(id: Uuid) -> Self {
        Self { id, is_password_auth_enabled: true }
    }

    pub fn with_password_auth(mut self, enabled: bool) -> Self {
        self.is_password_auth_enabled = enabled;
        self
    }
}

/// Stored user data returned by a successful password challenge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    /// PHC-formatted hash. `None` for accounts created through SSO only.
    pub password_hash: Option<String>,
}

/// Reference to a user that already exists in the directory.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExistingUser {
    pub id: Uuid,
}

/// Profile collected for a user that does not exist yet.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewUserPayload {
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub password_hash: Option<String>,
}

/// Who is signing in: a known user or someone signing up.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SignInUser {
    ExistingUser { existing_user: ExistingUser },
    NewUser { new_user_payload: NewUserPayload },
}

impl SignInUser {
    pub fn existing(id: Uuid) -> Self {
        Self::ExistingUser { existing_user: ExistingUser { id } }
    }

    pub fn new_user(payload: NewUserPayload) -> Self {
        Self::NewUser { new_user_payload: payload }
    }
}

/// A pending, time-bounded grant for one email to join one workspace.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Invitation {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub email: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Invitation {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Everything known about a sign-in attempt when access is decided.
///
/// `invitation` has already been looked up and validated by the caller;
/// `workspace_invite_hash` is the public invite link hash of the workspace.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignInContext {
    pub user: SignInUser,
    pub workspace: Option<WorkspaceRef>,
    #[serde(default)]
    pub invitation: Option<Invitation>,
    #[serde(default)]
    pub workspace_invite_hash: Option<String>,
}

impl SignInContext {
    pub fn new(user: SignInUser) -> Self {
        Self { user, workspace: None, invitation: None, workspace_invite_hash: None }
    }

    pub fn with_workspace(mut self, workspace: WorkspaceRef) -> Self {
        self.workspace = Some(workspace);
        self
    }

    pub fn with_invitation(mut self, invitation: Invitation) -> Self {
        self.invitation = Some(invitation);
        self
    }

    pub fn with_invite_hash(mut self, hash: impl Into<String>) -> Self {
        self.workspace_invite_hash = Some(hash.into());
        self
    }
}

/// Password sign-in payload.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub captcha_token: Option<String>,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into(), captcha_token: None }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("captcha_token", &self.captcha_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sign_in_user_serializes_with_type_tag() {
        let id = Uuid::new_v4();
        let value = serde_json::to_value(SignInUser::existing(id)).expect("should serialize");
        assert_eq!(value["type"], "existing_user");
        assert_eq!(value["existing_user"]["id"], json!(id));

        let parsed: SignInUser = serde_json::from_value(json!({
            "type": "new_user",
            "new_user_payload": { "email": "new@example.com" }
        }))
        .expect("should deserialize");
        assert_eq!(
            parsed,
            SignInUser::new_user(NewUserPayload {
                email: "new@example.com".into(),
                ..NewUserPayload::default()
            })
        );
    }

    #[test]
    fn credentials_debug_redacts_secrets() {
        let mut credentials = Credentials::new("a@example.com", "hunter2");
        credentials.captcha_token = Some("captcha-secret".into());
        let rendered = format!("{credentials:?}");
        assert!(rendered.contains("a@example.com"));
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("captcha-secret"));
    }

    #[test]
    fn invitation_expires_at_boundary() {
        let now = Utc::now();
        let invitation = Invitation {
            id: Uuid::new_v4(),
            workspace_id: Uuid::new_v4(),
            email: "a@example.com".into(),
            expires_at: now,
            created_at: now - chrono::Duration::hours(1),
        };
        assert!(invitation.is_expired_at(now));
        assert!(!invitation.is_expired_at(now - chrono::Duration::seconds(1)));
    }

    #[test]
    fn context_builder_sets_optional_fields() {
        let workspace = WorkspaceRef::new(Uuid::new_v4()).with_password_auth(false);
        let context = SignInContext::new(SignInUser::existing(Uuid::new_v4()))
            .with_workspace(workspace)
            .with_invite_hash("hash");
        assert_eq!(context.workspace, Some(workspace));
        assert!(!workspace.is_password_auth_enabled);
        assert_eq!(context.workspace_invite_hash.as_deref(), Some("hash"));
        assert!(context.invitation.is_none());
    }
}
