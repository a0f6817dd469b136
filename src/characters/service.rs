use super::{Character, CharacterDraft, CharacterId};
use crate::{
    auth::{
        guard::{scope_list, scope_one},
        AccountId, AuthError,
    },
    store::{CharacterStore, StoreError},
};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Character operations, always on behalf of an authenticated caller.
#[derive(Clone)]
pub struct CharacterService {
    store: Arc<dyn CharacterStore>,
}

impl CharacterService {
    #[must_use]
    pub fn new(store: Arc<dyn CharacterStore>) -> Self {
        Self { store }
    }

    /// # Errors
    /// Returns an error if the store fails.
    #[instrument(skip(self))]
    pub async fn get_all(&self, caller_id: AccountId) -> Result<Vec<Character>, AuthError> {
        Ok(self.store.list(scope_list(caller_id)).await?)
    }

    /// # Errors
    /// [`AuthError::NotFound`] when the character is missing or not the caller's.
    #[instrument(skip(self))]
    pub async fn get_by_id(
        &self,
        caller_id: AccountId,
        id: CharacterId,
    ) -> Result<Character, AuthError> {
        let found = self.store.get(scope_list(caller_id), id).await?;
        scope_one(caller_id, found)
    }

    /// Create a character for the caller and return the caller's full list.
    ///
    /// # Errors
    /// Returns an error if the store fails.
    #[instrument(skip(self, draft))]
    pub async fn add(
        &self,
        caller_id: AccountId,
        draft: CharacterDraft,
    ) -> Result<Vec<Character>, AuthError> {
        let created = self.store.insert(caller_id, draft).await?;
        debug!(character_id = created.id, "character created");
        self.get_all(caller_id).await
    }

    /// # Errors
    /// [`AuthError::NotFound`] when the character is missing or not the caller's.
    #[instrument(skip(self, draft))]
    pub async fn update(
        &self,
        caller_id: AccountId,
        id: CharacterId,
        draft: CharacterDraft,
    ) -> Result<Character, AuthError> {
        let updated = self.store.update(scope_list(caller_id), id, draft).await?;
        scope_one(caller_id, updated)
    }

    /// Delete one of the caller's characters and return what is left.
    ///
    /// # Errors
    /// [`AuthError::NotFound`] when the character is missing or not the caller's.
    #[instrument(skip(self))]
    pub async fn delete(
        &self,
        caller_id: AccountId,
        id: CharacterId,
    ) -> Result<Vec<Character>, AuthError> {
        if !self.store.delete(scope_list(caller_id), id).await? {
            return Err(AuthError::NotFound);
        }
        self.get_all(caller_id).await
    }

    /// # Errors
    /// Returns the store error when the backend is unreachable.
    pub async fn ping(&self) -> Result<(), StoreError> {
        self.store.ping().await
    }
}
