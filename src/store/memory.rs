use super::{AccountStore, CharacterStore, StoreError};
use crate::{
    auth::{Account, AccountId, NewAccount, OwnerScope},
    characters::{Character, CharacterDraft, CharacterId},
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// Process-local store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    accounts: RwLock<Accounts>,
    characters: RwLock<Characters>,
}

#[derive(Debug, Default)]
struct Accounts {
    last_id: AccountId,
    by_id: BTreeMap<AccountId, Account>,
}

#[derive(Debug, Default)]
struct Characters {
    last_id: CharacterId,
    by_id: BTreeMap<CharacterId, Character>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .by_id
            .values()
            .find(|account| account.username == username)
            .cloned())
    }

    async fn username_exists(&self, username: &str) -> Result<bool, StoreError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .by_id
            .values()
            .any(|account| account.username == username))
    }

    async fn insert_account(&self, account: NewAccount) -> Result<AccountId, StoreError> {
        // Check and insert under one write guard.
        let mut accounts = self.accounts.write().await;
        if accounts
            .by_id
            .values()
            .any(|existing| existing.username == account.username)
        {
            return Err(StoreError::Conflict);
        }

        accounts.last_id += 1;
        let id = accounts.last_id;
        accounts.by_id.insert(id, account.into_account(id));
        Ok(id)
    }
}

#[async_trait]
impl CharacterStore for MemoryStore {
    async fn list(&self, scope: OwnerScope) -> Result<Vec<Character>, StoreError> {
        let characters = self.characters.read().await;
        Ok(characters
            .by_id
            .values()
            .filter(|character| scope.matches(character))
            .cloned()
            .collect())
    }

    async fn get(
        &self,
        scope: OwnerScope,
        id: CharacterId,
    ) -> Result<Option<Character>, StoreError> {
        let characters = self.characters.read().await;
        Ok(characters
            .by_id
            .get(&id)
            .filter(|character| scope.matches(character))
            .cloned())
    }

    async fn insert(
        &self,
        owner_id: AccountId,
        draft: CharacterDraft,
    ) -> Result<Character, StoreError> {
        let mut characters = self.characters.write().await;
        characters.last_id += 1;
        let character = draft.into_character(characters.last_id, owner_id);
        characters.by_id.insert(character.id, character.clone());
        Ok(character)
    }

    async fn update(
        &self,
        scope: OwnerScope,
        id: CharacterId,
        draft: CharacterDraft,
    ) -> Result<Option<Character>, StoreError> {
        let mut characters = self.characters.write().await;
        let Some(existing) = characters
            .by_id
            .get_mut(&id)
            .filter(|character| scope.matches(character))
        else {
            return Ok(None);
        };

        *existing = draft.into_character(id, existing.owner_id);
        Ok(Some(existing.clone()))
    }

    async fn delete(&self, scope: OwnerScope, id: CharacterId) -> Result<bool, StoreError> {
        let mut characters = self.characters.write().await;
        let owned = characters
            .by_id
            .get(&id)
            .is_some_and(|character| scope.matches(character));
        if owned {
            characters.by_id.remove(&id);
        }
        Ok(owned)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
