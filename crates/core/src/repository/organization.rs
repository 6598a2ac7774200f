use shorthands_storage::StorageBackend;
use shorthands_types::{
    entities::Organization,
    error::{Error, Result},
};

/// Repository for Organization entity operations
///
/// Key schema:
/// - org:{id} -> Organization data
/// - org:name:{name} -> org_id (lowercased, enforces uniqueness)
pub struct OrganizationRepository<S: StorageBackend> {
    storage: S,
}

impl<S: StorageBackend> OrganizationRepository<S> {
    /// Create a new organization repository
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Generate key for organization by ID
    pub(crate) fn org_key(id: i64) -> Vec<u8> {
        format!("org:{id}").into_bytes()
    }

    /// Generate key for organization name index
    fn org_name_index_key(name: &str) -> Vec<u8> {
        format!("org:name:{}", name.trim().to_lowercase()).into_bytes()
    }

    /// Create a new organization
    pub async fn create(&self, org: Organization) -> Result<()> {
        let org_data = serde_json::to_vec(&org)
            .map_err(|e| Error::internal(format!("Failed to serialize organization: {e}")))?;

        let mut txn = self
            .storage
            .transaction()
            .await
            .map_err(|e| Error::internal(format!("Failed to start transaction: {e}")))?;

        txn.set(Self::org_key(org.id), org_data);

        txn.compare_and_set(
            Self::org_name_index_key(&org.name),
            None,
            org.id.to_le_bytes().to_vec(),
        )
        .map_err(|e| Error::internal(format!("Failed to stage name index: {e}")))?;

        txn.commit().await.map_err(|e| {
            if e.is_conflict() {
                Error::conflict("Organization name is already taken.")
            } else {
                Error::internal(format!("Failed to commit organization creation: {e}"))
            }
        })?;

        Ok(())
    }

    /// Get an organization by ID
    pub async fn get(&self, id: i64) -> Result<Option<Organization>> {
        let data = self
            .storage
            .get(&Self::org_key(id))
            .await
            .map_err(|e| Error::internal(format!("Failed to get organization: {e}")))?;

        match data {
            Some(bytes) => {
                let org: Organization = serde_json::from_slice(&bytes).map_err(|e| {
                    Error::internal(format!("Failed to deserialize organization: {e}"))
                })?;
                Ok(Some(org))
            },
            None => Ok(None),
        }
    }

    /// Get an organization by name (case-insensitive)
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Organization>> {
        let data = self
            .storage
            .get(&Self::org_name_index_key(name))
            .await
            .map_err(|e| Error::internal(format!("Failed to get organization by name: {e}")))?;

        match data {
            Some(bytes) => {
                let id = super::parse_i64_id(&bytes)?;
                self.get(id).await
            },
            None => Ok(None),
        }
    }

    /// Update an existing organization
    pub async fn update(&self, org: Organization) -> Result<()> {
        let old_org = self
            .get(org.id)
            .await?
            .ok_or_else(|| Error::not_found(format!("Organization {} not found", org.id)))?;

        let org_data = serde_json::to_vec(&org)
            .map_err(|e| Error::internal(format!("Failed to serialize organization: {e}")))?;

        let old_index = Self::org_name_index_key(&old_org.name);
        let new_index = Self::org_name_index_key(&org.name);

        if old_index != new_index {
            let mut txn = self
                .storage
                .transaction()
                .await
                .map_err(|e| Error::internal(format!("Failed to start transaction: {e}")))?;

            txn.set(Self::org_key(org.id), org_data);
            txn.delete(old_index);
            txn.compare_and_set(new_index, None, org.id.to_le_bytes().to_vec())
                .map_err(|e| Error::internal(format!("Failed to stage name index: {e}")))?;

            txn.commit().await.map_err(|e| {
                if e.is_conflict() {
                    Error::conflict("Organization name is already taken.")
                } else {
                    Error::internal(format!("Failed to commit organization update: {e}"))
                }
            })?;
        } else {
            self.storage
                .set(Self::org_key(org.id), org_data)
                .await
                .map_err(|e| Error::internal(format!("Failed to update organization: {e}")))?;
        }

        Ok(())
    }

    /// Delete an organization and its name index
    pub async fn delete(&self, id: i64) -> Result<()> {
        let org = self
            .get(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("Organization {id} not found")))?;

        let mut txn = self
            .storage
            .transaction()
            .await
            .map_err(|e| Error::internal(format!("Failed to start transaction: {e}")))?;

        txn.delete(Self::org_key(id));
        txn.delete(Self::org_name_index_key(&org.name));

        txn.commit()
            .await
            .map_err(|e| Error::internal(format!("Failed to commit organization deletion: {e}")))?;

        Ok(())
    }
}
