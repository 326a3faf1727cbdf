//! PostgreSQL implementation of the sign-in ports.

use chrono::{DateTime, Duration, Utc};
use gatehouse_common::{
    email::normalize_email,
    types::{Invitation, UserRecord, WorkspaceRef},
};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::{
    error::AuthError,
    invitation::{generate_invite_token, validate_invitation},
    ports::{
        BoxFuture, MembershipStore, UserDirectory, WorkspaceAccessChecker,
        WorkspaceInvitationGateway,
    },
};

#[derive(Clone)]
pub struct PgAuthStore {
    pool: PgPool,
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: Option<String>,
}

impl From<UserRow> for UserRecord {
    fn from(value: UserRow) -> Self {
        Self { id: value.id, email: value.email, password_hash: value.password_hash }
    }
}

#[derive(Debug, FromRow)]
struct WorkspaceRow {
    id: Uuid,
    is_password_auth_enabled: bool,
}

impl From<WorkspaceRow> for WorkspaceRef {
    fn from(value: WorkspaceRow) -> Self {
        Self { id: value.id, is_password_auth_enabled: value.is_password_auth_enabled }
    }
}

#[derive(Debug, FromRow)]
struct InvitationRow {
    id: Uuid,
    workspace_id: Uuid,
    email: String,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    accepted_at: Option<DateTime<Utc>>,
}

impl InvitationRow {
    fn into_invitation(self) -> Invitation {
        Invitation {
            id: self.id,
            workspace_id: self.workspace_id,
            email: self.email,
            expires_at: self.expires_at,
            created_at: self.created_at,
        }
    }
}

impl PgAuthStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn create_user(
        &self,
        email: &str,
        password_hash: Option<&str>,
    ) -> Result<UserRecord, AuthError> {
        let email = normalize_email(email).map_err(AuthError::internal)?;
        sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, email, password_hash
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map(UserRecord::from)
        .map_err(map_sqlx_error)
    }

    pub async fn create_workspace(
        &self,
        name: &str,
        is_password_auth_enabled: bool,
    ) -> Result<WorkspaceRef, AuthError> {
        sqlx::query_as::<_, WorkspaceRow>(
            r#"
            INSERT INTO workspaces (id, name, is_password_auth_enabled)
            VALUES ($1, $2, $3)
            RETURNING id, is_password_auth_enabled
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(is_password_auth_enabled)
        .fetch_one(&self.pool)
        .await
        .map(WorkspaceRef::from)
        .map_err(map_sqlx_error)
    }

    pub async fn get_workspace(&self, workspace_id: Uuid) -> Result<Option<WorkspaceRef>, AuthError> {
        let row = sqlx::query_as::<_, WorkspaceRow>(
            r#"
            SELECT id, is_password_auth_enabled
            FROM workspaces
            WHERE id = $1
              AND deleted_at IS NULL
            "#,
        )
        .bind(workspace_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(WorkspaceRef::from))
    }

    /// Stores a new invitation and returns it with the one-time token. Only
    /// the token hash is persisted.
    pub async fn create_invitation(
        &self,
        workspace_id: Uuid,
        email: &str,
        expires_in: Duration,
    ) -> Result<(Invitation, String), AuthError> {
        let email = normalize_email(email).map_err(AuthError::internal)?;
        let (token, token_hash) = generate_invite_token();
        let expires_at = Utc::now() + expires_in;

        let row = sqlx::query_as::<_, InvitationRow>(
            r#"
            INSERT INTO workspace_invitations (id, workspace_id, email, token_hash, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, workspace_id, email, expires_at, created_at, accepted_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(workspace_id)
        .bind(&email)
        .bind(token_hash)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok((row.into_invitation(), token))
    }
}

impl UserDirectory for PgAuthStore {
    fn find_by_email<'a>(
        &'a self,
        email: &'a str,
    ) -> BoxFuture<'a, Result<Option<UserRecord>, AuthError>> {
        Box::pin(async move {
            let Ok(email) = normalize_email(email) else {
                return Ok(None);
            };

            sqlx::query_as::<_, UserRow>(
                r#"
                SELECT id, email, password_hash
                FROM users
                WHERE lower(email) = $1
                  AND deleted_at IS NULL
                "#,
            )
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map(|row| row.map(UserRecord::from))
            .map_err(map_sqlx_error)
        })
    }
}

impl MembershipStore for PgAuthStore {
    fn exists(&self, user_id: Uuid, workspace_id: Uuid) -> BoxFuture<'_, Result<bool, AuthError>> {
        Box::pin(async move { is_active_member(&self.pool, user_id, workspace_id).await })
    }

    fn add(&self, user_id: Uuid, workspace_id: Uuid) -> BoxFuture<'_, Result<(), AuthError>> {
        Box::pin(async move {
            sqlx::query(
                r#"
                INSERT INTO workspace_members (workspace_id, user_id, status)
                VALUES ($1, $2, 'active')
                ON CONFLICT (workspace_id, user_id) DO UPDATE SET status = 'active'
                "#,
            )
            .bind(workspace_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

            Ok(())
        })
    }
}

impl WorkspaceAccessChecker for PgAuthStore {
    fn check(&self, user_id: Uuid, workspace_id: Uuid) -> BoxFuture<'_, Result<(), AuthError>> {
        Box::pin(async move {
            if is_active_member(&self.pool, user_id, workspace_id).await? {
                Ok(())
            } else {
                Err(AuthError::access_denied("user does not have access to this workspace"))
            }
        })
    }
}

impl WorkspaceInvitationGateway for PgAuthStore {
    fn get_pending<'a>(
        &'a self,
        email: &'a str,
        workspace_id: Uuid,
    ) -> BoxFuture<'a, Result<Option<Invitation>, AuthError>> {
        Box::pin(async move {
            let Ok(email) = normalize_email(email) else {
                return Ok(None);
            };

            sqlx::query_as::<_, InvitationRow>(
                r#"
                SELECT id, workspace_id, email, expires_at, created_at, accepted_at
                FROM workspace_invitations
                WHERE workspace_id = $1
                  AND lower(email) = $2
                  AND accepted_at IS NULL
                ORDER BY created_at DESC
                LIMIT 1
                "#,
            )
            .bind(workspace_id)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map(|row| row.map(InvitationRow::into_invitation))
            .map_err(map_sqlx_error)
        })
    }

    fn validate<'a>(&'a self, invitation: &'a Invitation) -> BoxFuture<'a, Result<(), AuthError>> {
        Box::pin(async move {
            let row = sqlx::query_as::<_, InvitationRow>(
                r#"
                SELECT id, workspace_id, email, expires_at, created_at, accepted_at
                FROM workspace_invitations
                WHERE id = $1
                "#,
            )
            .bind(invitation.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

            let Some(row) = row else {
                return Err(AuthError::invitation_invalid("invitation no longer exists"));
            };
            if row.accepted_at.is_some() {
                return Err(AuthError::invitation_invalid("invitation was already accepted"));
            }

            validate_invitation(&row.into_invitation(), Utc::now())
        })
    }
}

async fn is_active_member(pool: &PgPool, user_id: Uuid, workspace_id: Uuid) -> Result<bool, AuthError> {
    sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS(
            SELECT 1
            FROM workspace_members m
            JOIN workspaces w ON w.id = m.workspace_id
            WHERE m.workspace_id = $1
              AND m.user_id = $2
              AND m.status = 'active'
              AND w.deleted_at IS NULL
        )
        "#,
    )
    .bind(workspace_id)
    .bind(user_id)
    .fetch_one(pool)
    .await
    .map_err(map_sqlx_error)
}

fn map_sqlx_error(error: sqlx::Error) -> AuthError {
    if let sqlx::Error::Database(database_error) = &error {
        if database_error.code().as_deref() == Some("23505") {
            return AuthError::internal(anyhow::anyhow!("record already exists"));
        }
    }

    AuthError::internal(error)
}
