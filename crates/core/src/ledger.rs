//! The invitation ledger.
//!
//! Single entry point for every invitation state change. Creation claims a
//! pending-pair guard so an organization cannot stack unresolved invitations
//! on one user. Resolution is guarded by compare-and-set on the exact
//! invitation revision it examined; acceptance additionally appends the
//! membership to both sides in the same storage transaction, so readers
//! never observe a partially applied acceptance.

use shorthands_storage::StorageBackend;
use shorthands_types::{
    entities::{Invitation, InvitationStatus, MemberEntry, MembershipEntry, Organization, User},
    error::{Error, Result},
};

use crate::repository::{InvitationRepository, OrganizationRepository, UserRepository};

/// How many times an acceptance is retried when it loses a race on the
/// user or organization record before giving up
const MAX_RESOLVE_ATTEMPTS: usize = 3;

/// Coordinates invitation lifecycle operations across entities
pub struct InvitationLedger<S: StorageBackend> {
    storage: S,
    users: UserRepository<S>,
    organizations: OrganizationRepository<S>,
    invitations: InvitationRepository<S>,
}

impl<S: StorageBackend> InvitationLedger<S> {
    /// Create a new ledger over the given storage
    pub fn new(storage: S) -> Self {
        Self {
            users: UserRepository::new(storage.clone()),
            organizations: OrganizationRepository::new(storage.clone()),
            invitations: InvitationRepository::new(storage.clone()),
            storage,
        }
    }

    /// Create a pending invitation from an organization to a user
    ///
    /// Both records must exist. At most one pending invitation per
    /// (organization, user) pair; a duplicate surfaces as a conflict.
    /// Names are denormalized onto the invitation for display.
    pub async fn create(&self, caller_org_id: i64, target_user_id: i64) -> Result<Invitation> {
        let org = self
            .organizations
            .get(caller_org_id)
            .await?
            .ok_or_else(|| Error::not_found("Organization not found."))?;

        let user = self
            .users
            .get(target_user_id)
            .await?
            .ok_or_else(|| Error::not_found("User not found."))?;

        let invitation = Invitation::builder()
            .organization_id(org.id)
            .organization_name(org.name)
            .user_id(user.id)
            .username(user.username)
            .build();

        self.invitations.create(invitation.clone()).await?;

        tracing::info!(
            invitation_id = invitation.id,
            organization_id = invitation.organization_id,
            user_id = invitation.user_id,
            "Invitation created"
        );

        Ok(invitation)
    }

    /// Resolve a pending invitation to `accepted` or `rejected`
    ///
    /// Only the invited user may resolve, and only while the invitation is
    /// pending. Rejection flips the status; acceptance also appends the
    /// membership to the user and organization records, all in one
    /// transaction guarded by the invitation revision. Losing a race on
    /// the invitation itself is a conflict (or not-found when the race was
    /// a withdrawal); losing one on the user or organization record
    /// retries with fresh reads.
    pub async fn resolve(
        &self,
        invitation_id: i64,
        target_status: InvitationStatus,
        caller_user_id: i64,
    ) -> Result<Invitation> {
        if !target_status.is_terminal() {
            return Err(Error::validation("Status must be accepted or rejected."));
        }

        for attempt in 1..=MAX_RESOLVE_ATTEMPTS {
            let raw_invitation = self
                .invitations
                .get_raw(invitation_id)
                .await?
                .ok_or_else(|| Error::not_found("Invitation not found."))?;
            let invitation = InvitationRepository::<S>::decode(&raw_invitation)?;

            if invitation.user_id != caller_user_id {
                return Err(Error::forbidden("This invitation was not sent to you."));
            }
            if !invitation.is_pending() {
                return Err(Error::conflict("Invitation has already been resolved."));
            }

            let mut updated = invitation.clone();
            updated.status = target_status;
            let updated_data = serde_json::to_vec(&updated)
                .map_err(|e| Error::internal(format!("Failed to serialize invitation: {e}")))?;

            let mut txn = self
                .storage
                .transaction()
                .await
                .map_err(|e| Error::internal(format!("Failed to start transaction: {e}")))?;

            let invitation_key = InvitationRepository::<S>::invitation_key(invitation_id);
            txn.compare_and_set(
                invitation_key.clone(),
                Some(raw_invitation.to_vec()),
                updated_data,
            )
            .map_err(|e| Error::internal(format!("Failed to stage invitation update: {e}")))?;

            txn.delete(InvitationRepository::<S>::pending_pair_key(
                invitation.organization_id,
                invitation.user_id,
            ));

            if target_status == InvitationStatus::Accepted {
                self.stage_membership_writes(txn.as_mut(), &invitation).await?;
            }

            match txn.commit().await {
                Ok(()) => {
                    tracing::info!(
                        invitation_id,
                        status = %target_status,
                        "Invitation resolved"
                    );
                    return Ok(updated);
                },
                Err(e) if e.conflict_key() == Some(invitation_key.as_slice()) => {
                    // Someone else resolved or withdrew it first; re-read
                    // to report which
                    return match self.invitations.get_raw(invitation_id).await? {
                        Some(_) => Err(Error::conflict("Invitation has already been resolved.")),
                        None => Err(Error::not_found("Invitation not found.")),
                    };
                },
                Err(e) if e.is_conflict() => {
                    tracing::warn!(
                        invitation_id,
                        attempt,
                        "Acceptance lost a race on a membership record, retrying"
                    );
                },
                Err(e) => {
                    return Err(Error::internal(format!(
                        "Failed to commit invitation resolution: {e}"
                    )));
                },
            }
        }

        Err(Error::internal(format!(
            "Failed to resolve invitation {invitation_id} after {MAX_RESOLVE_ATTEMPTS} attempts"
        )))
    }

    /// Stage the two membership appends for an acceptance
    ///
    /// Both writes are compare-and-set against the record bytes read here,
    /// so a concurrent unrelated update to either record fails the whole
    /// transaction instead of being silently overwritten. Appends are
    /// idempotent for an already-present membership.
    async fn stage_membership_writes(
        &self,
        txn: &mut dyn shorthands_storage::Transaction,
        invitation: &Invitation,
    ) -> Result<()> {
        let user_key = UserRepository::<S>::user_key(invitation.user_id);
        let raw_user = self
            .storage
            .get(&user_key)
            .await
            .map_err(|e| Error::internal(format!("Failed to get user: {e}")))?
            .ok_or_else(|| Error::not_found("User not found."))?;
        let mut user: User = serde_json::from_slice(&raw_user)
            .map_err(|e| Error::internal(format!("Failed to deserialize user: {e}")))?;

        user.add_membership(MembershipEntry {
            id: invitation.organization_id,
            name: invitation.organization_name.clone(),
        });
        let user_data = serde_json::to_vec(&user)
            .map_err(|e| Error::internal(format!("Failed to serialize user: {e}")))?;
        txn.compare_and_set(user_key, Some(raw_user.to_vec()), user_data)
            .map_err(|e| Error::internal(format!("Failed to stage user membership: {e}")))?;

        let org_key = OrganizationRepository::<S>::org_key(invitation.organization_id);
        let raw_org = self
            .storage
            .get(&org_key)
            .await
            .map_err(|e| Error::internal(format!("Failed to get organization: {e}")))?
            .ok_or_else(|| Error::not_found("Organization not found."))?;
        let mut org: Organization = serde_json::from_slice(&raw_org)
            .map_err(|e| Error::internal(format!("Failed to deserialize organization: {e}")))?;

        org.add_member(MemberEntry {
            id: invitation.user_id,
            username: invitation.username.clone(),
        });
        let org_data = serde_json::to_vec(&org)
            .map_err(|e| Error::internal(format!("Failed to serialize organization: {e}")))?;
        txn.compare_and_set(org_key, Some(raw_org.to_vec()), org_data)
            .map_err(|e| Error::internal(format!("Failed to stage organization member: {e}")))?;

        Ok(())
    }

    /// Withdraw an invitation
    ///
    /// Only the organization that sent it may withdraw. Resolved
    /// invitations are removable too; memberships granted by an earlier
    /// acceptance are untouched.
    pub async fn withdraw(&self, invitation_id: i64, caller_org_id: i64) -> Result<Invitation> {
        let invitation = self
            .invitations
            .get(invitation_id)
            .await?
            .ok_or_else(|| Error::not_found("Invitation not found."))?;

        if invitation.organization_id != caller_org_id {
            return Err(Error::forbidden("This invitation belongs to another organization."));
        }

        self.invitations.delete(&invitation).await?;

        tracing::info!(invitation_id, organization_id = caller_org_id, "Invitation withdrawn");

        Ok(invitation)
    }

    /// List invitations addressed to a user, newest first
    pub async fn list_for_user(
        &self,
        user_id: i64,
        status: Option<InvitationStatus>,
    ) -> Result<Vec<Invitation>> {
        let invitations = self.invitations.list_for_user(user_id).await?;
        Ok(Self::filter_and_sort(invitations, status))
    }

    /// List invitations sent by an organization, newest first
    pub async fn list_for_organization(
        &self,
        org_id: i64,
        status: Option<InvitationStatus>,
    ) -> Result<Vec<Invitation>> {
        let invitations = self.invitations.list_for_organization(org_id).await?;
        Ok(Self::filter_and_sort(invitations, status))
    }

    fn filter_and_sort(
        mut invitations: Vec<Invitation>,
        status: Option<InvitationStatus>,
    ) -> Vec<Invitation> {
        if let Some(status) = status {
            invitations.retain(|i| i.status == status);
        }
        // Newest first; IDs break creation-time ties deterministically
        invitations.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        invitations
    }
}
