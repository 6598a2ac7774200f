use shorthands_storage::StorageBackend;
use shorthands_types::{
    entities::Short,
    error::{Error, Result},
};

/// Repository for Short entity operations
///
/// Key schema:
/// - short:{id} -> Short data
/// - short:org:{org_id}:{id} -> short_id (organization listing)
/// - short:hand:{org_id}:{shorthand} -> short_id (lowercased, enforces
///   per-organization uniqueness)
pub struct ShortRepository<S: StorageBackend> {
    storage: S,
}

impl<S: StorageBackend> ShortRepository<S> {
    /// Create a new short repository
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Generate key for short by ID
    fn short_key(id: i64) -> Vec<u8> {
        format!("short:{id}").into_bytes()
    }

    /// Generate key for the organization listing index
    fn org_index_key(org_id: i64, id: i64) -> Vec<u8> {
        format!("short:org:{org_id}:{id}").into_bytes()
    }

    /// Generate key for the per-organization shorthand index
    fn shorthand_index_key(org_id: i64, shorthand: &str) -> Vec<u8> {
        format!("short:hand:{org_id}:{}", shorthand.trim().to_lowercase()).into_bytes()
    }

    /// Create a new short
    pub async fn create(&self, short: Short) -> Result<()> {
        let data = serde_json::to_vec(&short)
            .map_err(|e| Error::internal(format!("Failed to serialize short: {e}")))?;

        let mut txn = self
            .storage
            .transaction()
            .await
            .map_err(|e| Error::internal(format!("Failed to start transaction: {e}")))?;

        let id_bytes = short.id.to_le_bytes().to_vec();

        txn.set(Self::short_key(short.id), data);
        txn.set(Self::org_index_key(short.organization_id, short.id), id_bytes.clone());
        txn.compare_and_set(
            Self::shorthand_index_key(short.organization_id, &short.shorthand),
            None,
            id_bytes,
        )
        .map_err(|e| Error::internal(format!("Failed to stage shorthand index: {e}")))?;

        txn.commit().await.map_err(|e| {
            if e.is_conflict() {
                Error::conflict("This shorthand already exists in your organization.")
            } else {
                Error::internal(format!("Failed to commit short creation: {e}"))
            }
        })?;

        Ok(())
    }

    /// Get a short by ID
    pub async fn get(&self, id: i64) -> Result<Option<Short>> {
        let data = self
            .storage
            .get(&Self::short_key(id))
            .await
            .map_err(|e| Error::internal(format!("Failed to get short: {e}")))?;

        match data {
            Some(bytes) => {
                let short: Short = serde_json::from_slice(&bytes)
                    .map_err(|e| Error::internal(format!("Failed to deserialize short: {e}")))?;
                Ok(Some(short))
            },
            None => Ok(None),
        }
    }

    /// Get all shorts of an organization
    pub async fn list_for_organization(&self, org_id: i64) -> Result<Vec<Short>> {
        let start = format!("short:org:{org_id}:").into_bytes();
        let end = format!("short:org:{org_id}~").into_bytes();

        let kvs = self
            .storage
            .get_range(start..end)
            .await
            .map_err(|e| Error::internal(format!("Failed to list shorts: {e}")))?;

        let mut shorts = Vec::new();
        for kv in kvs {
            let Ok(id) = super::parse_i64_id(&kv.value) else { continue };
            if let Some(short) = self.get(id).await? {
                shorts.push(short);
            }
        }

        Ok(shorts)
    }

    /// Update an existing short
    ///
    /// A shorthand change releases the old index entry and claims the new
    /// one under the same uniqueness guard as `create`.
    pub async fn update(&self, short: Short) -> Result<()> {
        let old_short = self
            .get(short.id)
            .await?
            .ok_or_else(|| Error::not_found(format!("Short {} not found", short.id)))?;

        let data = serde_json::to_vec(&short)
            .map_err(|e| Error::internal(format!("Failed to serialize short: {e}")))?;

        let old_index = Self::shorthand_index_key(old_short.organization_id, &old_short.shorthand);
        let new_index = Self::shorthand_index_key(short.organization_id, &short.shorthand);

        if old_index != new_index {
            let mut txn = self
                .storage
                .transaction()
                .await
                .map_err(|e| Error::internal(format!("Failed to start transaction: {e}")))?;

            txn.set(Self::short_key(short.id), data);
            txn.delete(old_index);
            txn.compare_and_set(new_index, None, short.id.to_le_bytes().to_vec())
                .map_err(|e| Error::internal(format!("Failed to stage shorthand index: {e}")))?;

            txn.commit().await.map_err(|e| {
                if e.is_conflict() {
                    Error::conflict("This shorthand already exists in your organization.")
                } else {
                    Error::internal(format!("Failed to commit short update: {e}"))
                }
            })?;
        } else {
            self.storage
                .set(Self::short_key(short.id), data)
                .await
                .map_err(|e| Error::internal(format!("Failed to update short: {e}")))?;
        }

        Ok(())
    }

    /// Delete a short and its index entries
    pub async fn delete(&self, id: i64) -> Result<()> {
        let short = self
            .get(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("Short {id} not found")))?;

        let mut txn = self
            .storage
            .transaction()
            .await
            .map_err(|e| Error::internal(format!("Failed to start transaction: {e}")))?;

        txn.delete(Self::short_key(id));
        txn.delete(Self::org_index_key(short.organization_id, id));
        txn.delete(Self::shorthand_index_key(short.organization_id, &short.shorthand));

        txn.commit()
            .await
            .map_err(|e| Error::internal(format!("Failed to commit short deletion: {e}")))?;

        Ok(())
    }
}
