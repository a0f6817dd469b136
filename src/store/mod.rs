//! Persistence collaborators.
//!
//! The auth core and the character service only see these traits. Two adapters
//! ship with the crate: [`MemoryStore`] for development and tests, and
//! [`PgStore`] when a Postgres DSN is configured.

use crate::{
    auth::{Account, AccountId, NewAccount, OwnerScope},
    characters::{Character, CharacterDraft, CharacterId},
};
use async_trait::async_trait;
use thiserror::Error;

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("conflicting record")]
    Conflict,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError>;

    async fn username_exists(&self, username: &str) -> Result<bool, StoreError>;

    /// Insert a new account. Must fail with [`StoreError::Conflict`] when the
    /// username is taken, even if a concurrent caller checked first.
    async fn insert_account(&self, account: NewAccount) -> Result<AccountId, StoreError>;
}

/// Character persistence. Reads and writes of existing records are filtered by
/// an [`OwnerScope`], so a record owned by someone else is indistinguishable
/// from a missing one.
#[async_trait]
pub trait CharacterStore: Send + Sync {
    async fn list(&self, scope: OwnerScope) -> Result<Vec<Character>, StoreError>;

    async fn get(
        &self,
        scope: OwnerScope,
        id: CharacterId,
    ) -> Result<Option<Character>, StoreError>;

    async fn insert(
        &self,
        owner_id: AccountId,
        draft: CharacterDraft,
    ) -> Result<Character, StoreError>;

    /// Returns `None` when no character with `id` is in scope.
    async fn update(
        &self,
        scope: OwnerScope,
        id: CharacterId,
        draft: CharacterDraft,
    ) -> Result<Option<Character>, StoreError>;

    /// Returns `false` when no character with `id` is in scope.
    async fn delete(&self, scope: OwnerScope, id: CharacterId) -> Result<bool, StoreError>;

    /// Cheap liveness check used by the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;
}
