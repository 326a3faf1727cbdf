//! In-process store backing every sign-in port. Used by tests and by
//! single-node deployments without PostgreSQL.

use std::{collections::HashMap, sync::Arc};

use anyhow::anyhow;
use chrono::{DateTime, Duration, Utc};
use gatehouse_common::{
    email::normalize_email,
    types::{Invitation, UserRecord, WorkspaceRef},
};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::AuthError,
    invitation::{generate_invite_token, validate_invitation},
    ports::{
        BoxFuture, MembershipStore, UserDirectory, WorkspaceAccessChecker,
        WorkspaceInvitationGateway,
    },
};

#[derive(Clone, Default)]
pub struct MemoryAuthStore {
    state: Arc<RwLock<MemoryState>>,
}

#[derive(Default)]
struct MemoryState {
    users: HashMap<Uuid, UserRecord>,
    workspaces: HashMap<Uuid, MemoryWorkspace>,
    memberships: HashMap<(Uuid, Uuid), MembershipStatus>,
    invitations: HashMap<Uuid, MemoryInvitation>,
}

#[derive(Clone)]
struct MemoryWorkspace {
    is_password_auth_enabled: bool,
    deleted_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum MembershipStatus {
    Active,
    Suspended,
}

#[derive(Clone)]
struct MemoryInvitation {
    invitation: Invitation,
    token_hash: Vec<u8>,
    accepted_at: Option<DateTime<Utc>>,
}

impl MemoryAuthStore {
    pub async fn insert_user(
        &self,
        email: &str,
        password_hash: Option<String>,
    ) -> Result<UserRecord, AuthError> {
        let email = normalize_email(email).map_err(AuthError::internal)?;
        let mut state = self.state.write().await;
        if state.users.values().any(|user| user.email == email) {
            return Err(AuthError::internal(anyhow!("email is already registered")));
        }

        let user = UserRecord { id: Uuid::new_v4(), email, password_hash };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    pub async fn insert_workspace(&self, is_password_auth_enabled: bool) -> WorkspaceRef {
        let workspace = WorkspaceRef { id: Uuid::new_v4(), is_password_auth_enabled };
        self.state
            .write()
            .await
            .workspaces
            .insert(workspace.id, MemoryWorkspace { is_password_auth_enabled, deleted_at: None });
        workspace
    }

    pub async fn get_workspace(&self, workspace_id: Uuid) -> Option<WorkspaceRef> {
        let state = self.state.read().await;
        let workspace = state.workspaces.get(&workspace_id)?;
        if workspace.deleted_at.is_some() {
            return None;
        }
        Some(WorkspaceRef {
            id: workspace_id,
            is_password_auth_enabled: workspace.is_password_auth_enabled,
        })
    }

    pub async fn delete_workspace(&self, workspace_id: Uuid) {
        if let Some(workspace) = self.state.write().await.workspaces.get_mut(&workspace_id) {
            workspace.deleted_at = Some(Utc::now());
        }
    }

    pub async fn insert_membership(&self, user_id: Uuid, workspace_id: Uuid) {
        self.state.write().await.memberships.insert((workspace_id, user_id), MembershipStatus::Active);
    }

    pub async fn suspend_membership(&self, user_id: Uuid, workspace_id: Uuid) {
        if let Some(status) = self.state.write().await.memberships.get_mut(&(workspace_id, user_id))
        {
            *status = MembershipStatus::Suspended;
        }
    }

    /// Stores a new invitation and returns it with the one-time token.
    pub async fn create_invitation(
        &self,
        workspace_id: Uuid,
        email: &str,
        expires_in: Duration,
    ) -> Result<(Invitation, String), AuthError> {
        let email = normalize_email(email).map_err(AuthError::internal)?;
        let (token, token_hash) = generate_invite_token();
        let now = Utc::now();
        let invitation = Invitation {
            id: Uuid::new_v4(),
            workspace_id,
            email,
            expires_at: now + expires_in,
            created_at: now,
        };

        self.state.write().await.invitations.insert(
            invitation.id,
            MemoryInvitation { invitation: invitation.clone(), token_hash, accepted_at: None },
        );

        Ok((invitation, token))
    }

    pub async fn accept_invitation(&self, invitation_id: Uuid) {
        if let Some(record) = self.state.write().await.invitations.get_mut(&invitation_id) {
            record.accepted_at = Some(Utc::now());
        }
    }

    pub async fn find_invitation_by_token_hash(&self, token_hash: &[u8]) -> Option<Invitation> {
        let state = self.state.read().await;
        state
            .invitations
            .values()
            .find(|record| record.accepted_at.is_none() && record.token_hash == token_hash)
            .map(|record| record.invitation.clone())
    }

    pub async fn member_count(&self, workspace_id: Uuid) -> usize {
        let state = self.state.read().await;
        state
            .memberships
            .iter()
            .filter(|((ws_id, _), status)| {
                *ws_id == workspace_id && **status == MembershipStatus::Active
            })
            .count()
    }
}

impl MemoryState {
    fn is_active_member(&self, user_id: Uuid, workspace_id: Uuid) -> bool {
        self.memberships
            .get(&(workspace_id, user_id))
            .is_some_and(|status| *status == MembershipStatus::Active)
    }

    fn workspace_is_live(&self, workspace_id: Uuid) -> bool {
        self.workspaces.get(&workspace_id).is_some_and(|workspace| workspace.deleted_at.is_none())
    }
}

impl UserDirectory for MemoryAuthStore {
    fn find_by_email<'a>(
        &'a self,
        email: &'a str,
    ) -> BoxFuture<'a, Result<Option<UserRecord>, AuthError>> {
        Box::pin(async move {
            let Ok(email) = normalize_email(email) else {
                return Ok(None);
            };
            let state = self.state.read().await;
            Ok(state.users.values().find(|user| user.email == email).cloned())
        })
    }
}

impl MembershipStore for MemoryAuthStore {
    fn exists(&self, user_id: Uuid, workspace_id: Uuid) -> BoxFuture<'_, Result<bool, AuthError>> {
        Box::pin(async move { Ok(self.state.read().await.is_active_member(user_id, workspace_id)) })
    }

    fn add(&self, user_id: Uuid, workspace_id: Uuid) -> BoxFuture<'_, Result<(), AuthError>> {
        Box::pin(async move {
            let mut state = self.state.write().await;
            if !state.workspace_is_live(workspace_id) {
                return Err(AuthError::internal(anyhow!("workspace {workspace_id} does not exist")));
            }
            // Reactivates a suspended row.
            state.memberships.insert((workspace_id, user_id), MembershipStatus::Active);
            Ok(())
        })
    }
}

impl WorkspaceAccessChecker for MemoryAuthStore {
    fn check(&self, user_id: Uuid, workspace_id: Uuid) -> BoxFuture<'_, Result<(), AuthError>> {
        Box::pin(async move {
            let state = self.state.read().await;
            if state.workspace_is_live(workspace_id) && state.is_active_member(user_id, workspace_id)
            {
                Ok(())
            } else {
                Err(AuthError::access_denied("user does not have access to this workspace"))
            }
        })
    }
}

impl WorkspaceInvitationGateway for MemoryAuthStore {
    fn get_pending<'a>(
        &'a self,
        email: &'a str,
        workspace_id: Uuid,
    ) -> BoxFuture<'a, Result<Option<Invitation>, AuthError>> {
        Box::pin(async move {
            let Ok(email) = normalize_email(email) else {
                return Ok(None);
            };
            let state = self.state.read().await;
            Ok(state
                .invitations
                .values()
                .filter(|record| {
                    record.accepted_at.is_none()
                        && record.invitation.workspace_id == workspace_id
                        && record.invitation.email == email
                })
                .max_by_key(|record| record.invitation.created_at)
                .map(|record| record.invitation.clone()))
        })
    }

    fn validate<'a>(&'a self, invitation: &'a Invitation) -> BoxFuture<'a, Result<(), AuthError>> {
        Box::pin(async move {
            let state = self.state.read().await;
            match state.invitations.get(&invitation.id) {
                Some(record) if record.accepted_at.is_none() => {
                    validate_invitation(&record.invitation, Utc::now())
                }
                Some(_) => Err(AuthError::invitation_invalid("invitation was already accepted")),
                None => Err(AuthError::invitation_invalid("invitation no longer exists")),
            }
        })
    }
}
