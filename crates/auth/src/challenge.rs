//! Password challenge against a target workspace.

use std::sync::Arc;

use gatehouse_common::types::{Credentials, UserRecord, WorkspaceRef};
use tracing::{debug, info};

use crate::{
    error::AuthError,
    ports::{CredentialVerifier, MembershipStore, UserDirectory, WorkspaceInvitationGateway},
};

#[derive(Clone)]
pub struct ChallengeService {
    directory: Arc<dyn UserDirectory>,
    verifier: Arc<dyn CredentialVerifier>,
    memberships: Arc<dyn MembershipStore>,
    invitations: Arc<dyn WorkspaceInvitationGateway>,
    password_auth_enabled: bool,
}

impl ChallengeService {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        verifier: Arc<dyn CredentialVerifier>,
        memberships: Arc<dyn MembershipStore>,
        invitations: Arc<dyn WorkspaceInvitationGateway>,
    ) -> Self {
        Self { directory, verifier, memberships, invitations, password_auth_enabled: true }
    }

    /// Server-wide switch; when off every workspace rejects password sign-in.
    pub fn with_password_auth_enabled(mut self, enabled: bool) -> Self {
        self.password_auth_enabled = enabled;
        self
    }

    /// Verifies `credentials` and makes sure the user ends up a member of
    /// `workspace`, consuming a pending invitation when needed.
    ///
    /// The returned record is exactly what the directory produced.
    pub async fn challenge(
        &self,
        credentials: &Credentials,
        workspace: &WorkspaceRef,
    ) -> Result<UserRecord, AuthError> {
        if !self.password_auth_enabled || !workspace.is_password_auth_enabled {
            debug!(workspace_id = %workspace.id, "password sign-in disabled");
            return Err(AuthError::AuthDisabled);
        }

        let Some(user) = self.directory.find_by_email(&credentials.email).await? else {
            debug!(workspace_id = %workspace.id, reason = "unknown_email", "challenge failed");
            return Err(AuthError::InvalidCredentials);
        };

        let Some(password_hash) = user.password_hash.as_deref() else {
            debug!(user_id = %user.id, reason = "no_password_hash", "challenge failed");
            return Err(AuthError::InvalidCredentials);
        };

        if !self.verifier.verify(&credentials.password, password_hash) {
            debug!(user_id = %user.id, reason = "wrong_password", "challenge failed");
            return Err(AuthError::InvalidCredentials);
        }

        if self.memberships.exists(user.id, workspace.id).await? {
            return Ok(user);
        }

        let Some(invitation) = self.invitations.get_pending(&user.email, workspace.id).await?
        else {
            debug!(user_id = %user.id, workspace_id = %workspace.id, "no pending invitation");
            return Err(AuthError::NotInvited);
        };

        self.invitations.validate(&invitation).await?;
        self.memberships.add(user.id, workspace.id).await?;

        info!(
            user_id = %user.id,
            workspace_id = %workspace.id,
            invitation_id = %invitation.id,
            "user joined workspace through invitation"
        );

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, Utc};
    use gatehouse_common::types::{Credentials, Invitation, UserRecord, WorkspaceRef};
    use uuid::Uuid;

    use super::ChallengeService;
    use crate::{
        error::AuthError,
        testing::{StubDirectory, StubInvitations, StubMemberships, StubVerifier},
    };

    struct Harness {
        directory: Arc<StubDirectory>,
        verifier: Arc<StubVerifier>,
        memberships: Arc<StubMemberships>,
        invitations: Arc<StubInvitations>,
        service: ChallengeService,
    }

    fn harness(
        user: Option<UserRecord>,
        password_ok: bool,
        is_member: bool,
        invitations: StubInvitations,
    ) -> Harness {
        let directory = Arc::new(StubDirectory::returning(user));
        let verifier = Arc::new(StubVerifier::accepting(password_ok));
        let memberships = Arc::new(StubMemberships::member(is_member));
        let invitations = Arc::new(invitations);
        let service = ChallengeService::new(
            directory.clone(),
            verifier.clone(),
            memberships.clone(),
            invitations.clone(),
        );
        Harness { directory, verifier, memberships, invitations, service }
    }

    fn stored_user() -> UserRecord {
        UserRecord { id: Uuid::new_v4(), email: "e".into(), password_hash: Some("h".into()) }
    }

    fn pending_invitation(workspace_id: Uuid) -> Invitation {
        let now = Utc::now();
        Invitation {
            id: Uuid::new_v4(),
            workspace_id,
            email: "e".into(),
            expires_at: now + Duration::days(3),
            created_at: now,
        }
    }

    fn enabled_workspace() -> WorkspaceRef {
        WorkspaceRef::new(Uuid::new_v4())
    }

    #[tokio::test]
    async fn member_gets_stored_record_back() {
        let user = stored_user();
        let h = harness(Some(user.clone()), true, true, StubInvitations::none());

        let response = h
            .service
            .challenge(&Credentials::new("e", "p"), &enabled_workspace())
            .await
            .expect("challenge should pass");

        assert_eq!(response, user);
        assert_eq!(h.directory.lookups(), 1);
        assert_eq!(h.verifier.calls(), vec![("p".to_owned(), "h".to_owned())]);
        assert_eq!(h.memberships.exists_calls(), 1);
        assert_eq!(h.invitations.lookups(), 0);
        assert_eq!(h.invitations.validations(), 0);
        assert!(h.memberships.added().is_empty());
    }

    #[tokio::test]
    async fn invited_user_is_added_to_workspace() {
        let user = stored_user();
        let workspace = enabled_workspace();
        let h = harness(
            Some(user.clone()),
            true,
            false,
            StubInvitations::with(Some(pending_invitation(workspace.id)), true),
        );

        let response = h
            .service
            .challenge(&Credentials::new("e", "p"), &workspace)
            .await
            .expect("invited user should pass");

        assert_eq!(response, user);
        assert_eq!(h.directory.lookups(), 1);
        assert_eq!(h.invitations.lookups(), 1);
        assert_eq!(h.invitations.validations(), 1);
        assert_eq!(h.memberships.added(), vec![(user.id, workspace.id)]);
    }

    #[tokio::test]
    async fn disabled_workspace_rejects_before_lookup() {
        let h = harness(Some(stored_user()), true, true, StubInvitations::none());
        let workspace = enabled_workspace().with_password_auth(false);

        let error = h
            .service
            .challenge(&Credentials::new("e", "p"), &workspace)
            .await
            .expect_err("password auth is disabled");

        assert!(matches!(error, AuthError::AuthDisabled));
        assert_eq!(h.directory.lookups(), 0);
    }

    #[tokio::test]
    async fn server_wide_switch_rejects_before_lookup() {
        let h = harness(Some(stored_user()), true, true, StubInvitations::none());
        let service = h.service.clone().with_password_auth_enabled(false);

        let error = service
            .challenge(&Credentials::new("e", "p"), &enabled_workspace())
            .await
            .expect_err("password auth is disabled server-wide");

        assert!(matches!(error, AuthError::AuthDisabled));
        assert_eq!(h.directory.lookups(), 0);
    }

    #[tokio::test]
    async fn unknown_email_and_wrong_password_are_indistinguishable() {
        let unknown = harness(None, true, true, StubInvitations::none());
        let wrong_password = harness(Some(stored_user()), false, true, StubInvitations::none());
        let workspace = enabled_workspace();
        let credentials = Credentials::new("e", "p");

        let unknown_error = unknown
            .service
            .challenge(&credentials, &workspace)
            .await
            .expect_err("unknown email must fail");
        let wrong_error = wrong_password
            .service
            .challenge(&credentials, &workspace)
            .await
            .expect_err("wrong password must fail");

        assert!(matches!(unknown_error, AuthError::InvalidCredentials));
        assert!(matches!(wrong_error, AuthError::InvalidCredentials));
        assert_eq!(unknown_error.to_string(), wrong_error.to_string());
        assert_eq!(unknown_error.code(), wrong_error.code());
        assert!(unknown.verifier.calls().is_empty());
        assert_eq!(wrong_password.memberships.exists_calls(), 0);
    }

    #[tokio::test]
    async fn account_without_password_hash_is_rejected_without_verifying() {
        let user = UserRecord { password_hash: None, ..stored_user() };
        let h = harness(Some(user), true, true, StubInvitations::none());

        let error = h
            .service
            .challenge(&Credentials::new("e", "p"), &enabled_workspace())
            .await
            .expect_err("sso-only account cannot use a password");

        assert!(matches!(error, AuthError::InvalidCredentials));
        assert!(h.verifier.calls().is_empty());
    }

    #[tokio::test]
    async fn non_member_without_invitation_is_not_invited() {
        let h = harness(Some(stored_user()), true, false, StubInvitations::none());

        let error = h
            .service
            .challenge(&Credentials::new("e", "p"), &enabled_workspace())
            .await
            .expect_err("non-member without invitation must fail");

        assert!(matches!(error, AuthError::NotInvited));
        assert_eq!(h.invitations.lookups(), 1);
        assert_eq!(h.invitations.validations(), 0);
        assert!(h.memberships.added().is_empty());
    }

    #[tokio::test]
    async fn invalid_invitation_stops_before_membership_write() {
        let workspace = enabled_workspace();
        let h = harness(
            Some(stored_user()),
            true,
            false,
            StubInvitations::with(Some(pending_invitation(workspace.id)), false),
        );

        let error = h
            .service
            .challenge(&Credentials::new("e", "p"), &workspace)
            .await
            .expect_err("expired invitation must fail");

        assert!(matches!(error, AuthError::InvitationInvalid { .. }));
        assert_eq!(h.invitations.validations(), 1);
        assert!(h.memberships.added().is_empty());
    }
}
