use shorthands_storage::StorageBackend;
use shorthands_types::{
    entities::User,
    error::{Error, Result},
};

/// Repository for User entity operations
///
/// Key schema:
/// - user:{id} -> User data
/// - user:name:{username} -> user_id (lowercased, enforces uniqueness)
pub struct UserRepository<S: StorageBackend> {
    storage: S,
}

impl<S: StorageBackend> UserRepository<S> {
    /// Create a new user repository
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Generate key for user by ID
    pub(crate) fn user_key(id: i64) -> Vec<u8> {
        format!("user:{id}").into_bytes()
    }

    /// Generate key for username index
    fn username_index_key(username: &str) -> Vec<u8> {
        format!("user:name:{}", username.trim().to_lowercase()).into_bytes()
    }

    /// Create a new user
    ///
    /// Usernames are unique case-insensitively; a duplicate surfaces as
    /// a conflict.
    pub async fn create(&self, user: User) -> Result<()> {
        let user_data = serde_json::to_vec(&user)
            .map_err(|e| Error::internal(format!("Failed to serialize user: {e}")))?;

        let mut txn = self
            .storage
            .transaction()
            .await
            .map_err(|e| Error::internal(format!("Failed to start transaction: {e}")))?;

        txn.set(Self::user_key(user.id), user_data);

        // The index claim is the uniqueness guard: it only commits if no
        // other registration for this name got there first.
        txn.compare_and_set(
            Self::username_index_key(&user.username),
            None,
            user.id.to_le_bytes().to_vec(),
        )
        .map_err(|e| Error::internal(format!("Failed to stage username index: {e}")))?;

        txn.commit().await.map_err(|e| {
            if e.is_conflict() {
                Error::conflict("Username is already taken.")
            } else {
                Error::internal(format!("Failed to commit user creation: {e}"))
            }
        })?;

        Ok(())
    }

    /// Get a user by ID
    pub async fn get(&self, id: i64) -> Result<Option<User>> {
        let data = self
            .storage
            .get(&Self::user_key(id))
            .await
            .map_err(|e| Error::internal(format!("Failed to get user: {e}")))?;

        match data {
            Some(bytes) => {
                let user: User = serde_json::from_slice(&bytes)
                    .map_err(|e| Error::internal(format!("Failed to deserialize user: {e}")))?;
                Ok(Some(user))
            },
            None => Ok(None),
        }
    }

    /// Get a user by username (case-insensitive)
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let data = self
            .storage
            .get(&Self::username_index_key(username))
            .await
            .map_err(|e| Error::internal(format!("Failed to get user by username: {e}")))?;

        match data {
            Some(bytes) => {
                let id = super::parse_i64_id(&bytes)?;
                self.get(id).await
            },
            None => Ok(None),
        }
    }

    /// Update an existing user
    ///
    /// If the username changed, the old index entry is removed and the
    /// new one claimed with the same uniqueness guard as `create`.
    pub async fn update(&self, user: User) -> Result<()> {
        let old_user = self
            .get(user.id)
            .await?
            .ok_or_else(|| Error::not_found(format!("User {} not found", user.id)))?;

        let user_data = serde_json::to_vec(&user)
            .map_err(|e| Error::internal(format!("Failed to serialize user: {e}")))?;

        let old_index = Self::username_index_key(&old_user.username);
        let new_index = Self::username_index_key(&user.username);

        if old_index != new_index {
            let mut txn = self
                .storage
                .transaction()
                .await
                .map_err(|e| Error::internal(format!("Failed to start transaction: {e}")))?;

            txn.set(Self::user_key(user.id), user_data);
            txn.delete(old_index);
            txn.compare_and_set(new_index, None, user.id.to_le_bytes().to_vec())
                .map_err(|e| Error::internal(format!("Failed to stage username index: {e}")))?;

            txn.commit().await.map_err(|e| {
                if e.is_conflict() {
                    Error::conflict("Username is already taken.")
                } else {
                    Error::internal(format!("Failed to commit user update: {e}"))
                }
            })?;
        } else {
            self.storage
                .set(Self::user_key(user.id), user_data)
                .await
                .map_err(|e| Error::internal(format!("Failed to update user: {e}")))?;
        }

        Ok(())
    }

    /// Delete a user and its username index
    pub async fn delete(&self, id: i64) -> Result<()> {
        let user = self
            .get(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("User {id} not found")))?;

        let mut txn = self
            .storage
            .transaction()
            .await
            .map_err(|e| Error::internal(format!("Failed to start transaction: {e}")))?;

        txn.delete(Self::user_key(id));
        txn.delete(Self::username_index_key(&user.username));

        txn.commit()
            .await
            .map_err(|e| Error::internal(format!("Failed to commit user deletion: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use shorthands_storage::Backend;
    use shorthands_types::IdGenerator;

    use super::*;

    fn create_test_repo() -> UserRepository<Backend> {
        UserRepository::new(Backend::memory())
    }

    fn test_user(username: &str) -> User {
        let _ = IdGenerator::init(1);
        User::builder().username(username).password_hash("$argon2id$test").build()
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let repo = create_test_repo();

        let user = test_user("bob");
        let id = user.id;
        repo.create(user).await.unwrap();

        let retrieved = repo.get(id).await.unwrap().unwrap();
        assert_eq!(retrieved.username, "bob");
        assert!(retrieved.organizations.is_empty());
    }

    #[tokio::test]
    async fn test_get_by_username_is_case_insensitive() {
        let repo = create_test_repo();

        let user = test_user("Bob");
        let id = user.id;
        repo.create(user).await.unwrap();

        let retrieved = repo.get_by_username("bob").await.unwrap().unwrap();
        assert_eq!(retrieved.id, id);
        assert!(repo.get_by_username("BOB").await.unwrap().is_some());
        assert!(repo.get_by_username("alice").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let repo = create_test_repo();

        repo.create(test_user("bob")).await.unwrap();
        let err = repo.create(test_user("BOB")).await.unwrap_err();
        assert_eq!(err.status_code(), 409);
    }

    #[tokio::test]
    async fn test_update_username_moves_index() {
        let repo = create_test_repo();

        let mut user = test_user("bob");
        repo.create(user.clone()).await.unwrap();

        user.username = "robert".to_string();
        repo.update(user.clone()).await.unwrap();

        assert!(repo.get_by_username("bob").await.unwrap().is_none());
        assert_eq!(repo.get_by_username("robert").await.unwrap().unwrap().id, user.id);
    }

    #[tokio::test]
    async fn test_update_rejects_taken_username() {
        let repo = create_test_repo();

        repo.create(test_user("alice")).await.unwrap();
        let mut bob = test_user("bob");
        repo.create(bob.clone()).await.unwrap();

        bob.username = "alice".to_string();
        let err = repo.update(bob).await.unwrap_err();
        assert_eq!(err.status_code(), 409);
    }

    #[tokio::test]
    async fn test_delete_user_releases_username() {
        let repo = create_test_repo();

        let user = test_user("bob");
        let id = user.id;
        repo.create(user).await.unwrap();

        repo.delete(id).await.unwrap();

        assert!(repo.get(id).await.unwrap().is_none());
        assert!(repo.get_by_username("bob").await.unwrap().is_none());

        // The name is available again
        repo.create(test_user("bob")).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_missing_user_is_not_found() {
        let repo = create_test_repo();
        let err = repo.delete(12345).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
    }
}
