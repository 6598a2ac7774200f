use bytes::Bytes;
use shorthands_storage::StorageBackend;
use shorthands_types::{
    entities::Invitation,
    error::{Error, Result},
};

/// Repository for Invitation entity operations
///
/// Key schema:
/// - invitation:{id} -> Invitation data
/// - invitation:user:{user_id}:{id} -> invitation_id (user listing)
/// - invitation:org:{org_id}:{id} -> invitation_id (organization listing)
/// - invitation:pending:{org_id}:{user_id} -> invitation_id (one pending
///   invitation per pair; claimed at create, released at resolve/withdraw)
pub struct InvitationRepository<S: StorageBackend> {
    storage: S,
}

impl<S: StorageBackend> InvitationRepository<S> {
    /// Create a new invitation repository
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Generate key for invitation by ID
    pub(crate) fn invitation_key(id: i64) -> Vec<u8> {
        format!("invitation:{id}").into_bytes()
    }

    /// Generate key for the user listing index
    pub(crate) fn user_index_key(user_id: i64, id: i64) -> Vec<u8> {
        format!("invitation:user:{user_id}:{id}").into_bytes()
    }

    /// Generate key for the organization listing index
    pub(crate) fn org_index_key(org_id: i64, id: i64) -> Vec<u8> {
        format!("invitation:org:{org_id}:{id}").into_bytes()
    }

    /// Generate key for the pending-pair guard
    pub(crate) fn pending_pair_key(org_id: i64, user_id: i64) -> Vec<u8> {
        format!("invitation:pending:{org_id}:{user_id}").into_bytes()
    }

    /// Create a new invitation
    ///
    /// Claims the pending-pair guard key; a second unresolved invitation
    /// for the same organization and user surfaces as a conflict.
    pub async fn create(&self, invitation: Invitation) -> Result<()> {
        let data = serde_json::to_vec(&invitation)
            .map_err(|e| Error::internal(format!("Failed to serialize invitation: {e}")))?;

        let mut txn = self
            .storage
            .transaction()
            .await
            .map_err(|e| Error::internal(format!("Failed to start transaction: {e}")))?;

        let id_bytes = invitation.id.to_le_bytes().to_vec();

        txn.set(Self::invitation_key(invitation.id), data);
        txn.set(Self::user_index_key(invitation.user_id, invitation.id), id_bytes.clone());
        txn.set(Self::org_index_key(invitation.organization_id, invitation.id), id_bytes.clone());
        txn.compare_and_set(
            Self::pending_pair_key(invitation.organization_id, invitation.user_id),
            None,
            id_bytes,
        )
        .map_err(|e| Error::internal(format!("Failed to stage pending guard: {e}")))?;

        txn.commit().await.map_err(|e| {
            if e.is_conflict() {
                Error::conflict("An invitation for this user is already pending.")
            } else {
                Error::internal(format!("Failed to commit invitation creation: {e}"))
            }
        })?;

        Ok(())
    }

    /// Get an invitation by ID
    pub async fn get(&self, id: i64) -> Result<Option<Invitation>> {
        match self.get_raw(id).await? {
            Some(bytes) => Ok(Some(Self::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Get the raw stored bytes of an invitation
    ///
    /// The ledger uses these as compare-and-set expectations so that a
    /// resolve only commits against the exact revision it examined.
    pub async fn get_raw(&self, id: i64) -> Result<Option<Bytes>> {
        self.storage
            .get(&Self::invitation_key(id))
            .await
            .map_err(|e| Error::internal(format!("Failed to get invitation: {e}")))
    }

    /// Decode invitation bytes
    pub(crate) fn decode(bytes: &[u8]) -> Result<Invitation> {
        serde_json::from_slice(bytes)
            .map_err(|e| Error::internal(format!("Failed to deserialize invitation: {e}")))
    }

    /// Get all invitations addressed to a user
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<Invitation>> {
        let start = format!("invitation:user:{user_id}:").into_bytes();
        let end = format!("invitation:user:{user_id}~").into_bytes();
        self.collect_range(start, end).await
    }

    /// Get all invitations sent by an organization
    pub async fn list_for_organization(&self, org_id: i64) -> Result<Vec<Invitation>> {
        let start = format!("invitation:org:{org_id}:").into_bytes();
        let end = format!("invitation:org:{org_id}~").into_bytes();
        self.collect_range(start, end).await
    }

    async fn collect_range(&self, start: Vec<u8>, end: Vec<u8>) -> Result<Vec<Invitation>> {
        let kvs = self
            .storage
            .get_range(start..end)
            .await
            .map_err(|e| Error::internal(format!("Failed to list invitations: {e}")))?;

        let mut invitations = Vec::new();
        for kv in kvs {
            let Ok(id) = super::parse_i64_id(&kv.value) else { continue };
            if let Some(invitation) = self.get(id).await? {
                invitations.push(invitation);
            }
        }

        Ok(invitations)
    }

    /// Delete an invitation and all its index entries
    pub async fn delete(&self, invitation: &Invitation) -> Result<()> {
        let mut txn = self
            .storage
            .transaction()
            .await
            .map_err(|e| Error::internal(format!("Failed to start transaction: {e}")))?;

        txn.delete(Self::invitation_key(invitation.id));
        txn.delete(Self::user_index_key(invitation.user_id, invitation.id));
        txn.delete(Self::org_index_key(invitation.organization_id, invitation.id));
        if invitation.is_pending() {
            txn.delete(Self::pending_pair_key(invitation.organization_id, invitation.user_id));
        }

        txn.commit()
            .await
            .map_err(|e| Error::internal(format!("Failed to commit invitation deletion: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use shorthands_storage::Backend;
    use shorthands_types::IdGenerator;

    use super::*;

    fn create_test_repo() -> InvitationRepository<Backend> {
        InvitationRepository::new(Backend::memory())
    }

    fn test_invitation(org_id: i64, user_id: i64) -> Invitation {
        let _ = IdGenerator::init(1);
        Invitation::builder()
            .organization_id(org_id)
            .organization_name("acme")
            .user_id(user_id)
            .username("bob")
            .build()
    }

    #[tokio::test]
    async fn test_create_and_get_invitation() {
        let repo = create_test_repo();

        let invitation = test_invitation(100, 200);
        let id = invitation.id;
        repo.create(invitation).await.unwrap();

        let retrieved = repo.get(id).await.unwrap().unwrap();
        assert_eq!(retrieved.organization_id, 100);
        assert_eq!(retrieved.user_id, 200);
        assert!(retrieved.is_pending());
    }

    #[tokio::test]
    async fn test_second_pending_invitation_conflicts() {
        let repo = create_test_repo();

        repo.create(test_invitation(100, 200)).await.unwrap();
        let err = repo.create(test_invitation(100, 200)).await.unwrap_err();
        assert_eq!(err.status_code(), 409);

        // Different pairs are unaffected
        repo.create(test_invitation(100, 201)).await.unwrap();
        repo.create(test_invitation(101, 200)).await.unwrap();
    }

    #[tokio::test]
    async fn test_list_for_user_and_organization() {
        let repo = create_test_repo();

        repo.create(test_invitation(100, 200)).await.unwrap();
        repo.create(test_invitation(100, 201)).await.unwrap();
        repo.create(test_invitation(101, 200)).await.unwrap();

        assert_eq!(repo.list_for_user(200).await.unwrap().len(), 2);
        assert_eq!(repo.list_for_user(201).await.unwrap().len(), 1);
        assert_eq!(repo.list_for_organization(100).await.unwrap().len(), 2);
        assert_eq!(repo.list_for_organization(101).await.unwrap().len(), 1);
        assert!(repo.list_for_organization(999).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_releases_pending_guard() {
        let repo = create_test_repo();

        let invitation = test_invitation(100, 200);
        let id = invitation.id;
        repo.create(invitation.clone()).await.unwrap();

        repo.delete(&invitation).await.unwrap();

        assert!(repo.get(id).await.unwrap().is_none());
        assert!(repo.list_for_user(200).await.unwrap().is_empty());
        assert!(repo.list_for_organization(100).await.unwrap().is_empty());

        // The pair can be invited again
        repo.create(test_invitation(100, 200)).await.unwrap();
    }
}
