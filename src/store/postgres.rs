//! Postgres adapter.

use super::{AccountStore, CharacterStore, StoreError};
use crate::{
    auth::{Account, AccountId, NewAccount, OwnerScope},
    characters::{Character, CharacterClass, CharacterDraft, CharacterId},
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{
    postgres::{PgPoolOptions, PgRow},
    PgPool, Row,
};
use std::time::Duration;
use tracing::Instrument;

const SCHEMA_SQL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/sql/schema.sql"));

const CHARACTER_COLUMNS: &str =
    "id, owner_id, name, hit_points, strength, defense, intelligence, class";

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

macro_rules! db_span {
    ($operation:literal, $query:expr) => {
        tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = $operation,
            db.statement = $query
        )
    };
}

impl PgStore {
    /// Connect and make sure the schema exists.
    ///
    /// # Errors
    /// Returns an error if the database is unreachable or the schema cannot be
    /// applied.
    pub async fn connect(dsn: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .min_connections(1)
            .max_connections(5)
            .max_lifetime(Duration::from_secs(60 * 2))
            .test_before_acquire(true)
            .connect(dsn)
            .await
            .context("Failed to connect to database")?;

        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Apply `sql/schema.sql`. Every statement is idempotent.
    ///
    /// # Errors
    /// Returns an error naming the first statement that failed.
    pub async fn ensure_schema(&self) -> Result<()> {
        for (index, statement) in split_sql_statements(SCHEMA_SQL).iter().enumerate() {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .with_context(|| format!("failed to execute schema statement {}", index + 1))?;
        }
        Ok(())
    }
}

#[async_trait]
impl AccountStore for PgStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        let query =
            "SELECT id, username, password_hash, password_salt FROM accounts WHERE username = $1";
        let row = sqlx::query(query)
            .bind(username)
            .fetch_optional(&self.pool)
            .instrument(db_span!("SELECT", query))
            .await?;

        row.map(|row| account_from_row(&row))
            .transpose()
            .map_err(StoreError::from)
    }

    async fn username_exists(&self, username: &str) -> Result<bool, StoreError> {
        let query = "SELECT EXISTS (SELECT 1 FROM accounts WHERE username = $1)";
        let exists: bool = sqlx::query_scalar(query)
            .bind(username)
            .fetch_one(&self.pool)
            .instrument(db_span!("SELECT", query))
            .await?;
        Ok(exists)
    }

    async fn insert_account(&self, account: NewAccount) -> Result<AccountId, StoreError> {
        let query = "INSERT INTO accounts (username, password_hash, password_salt) \
                     VALUES ($1, $2, $3) RETURNING id";
        let result = sqlx::query_scalar(query)
            .bind(&account.username)
            .bind(account.digest.hash.as_slice())
            .bind(account.digest.salt.as_slice())
            .fetch_one(&self.pool)
            .instrument(db_span!("INSERT", query))
            .await;

        match result {
            Ok(id) => Ok(id),
            Err(err) if is_unique_violation(&err) => Err(StoreError::Conflict),
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait]
impl CharacterStore for PgStore {
    async fn list(&self, scope: OwnerScope) -> Result<Vec<Character>, StoreError> {
        let query =
            format!("SELECT {CHARACTER_COLUMNS} FROM characters WHERE owner_id = $1 ORDER BY id");
        let rows = sqlx::query(&query)
            .bind(scope.owner_id())
            .fetch_all(&self.pool)
            .instrument(db_span!("SELECT", query.as_str()))
            .await?;

        rows.iter()
            .map(character_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(StoreError::from)
    }

    async fn get(
        &self,
        scope: OwnerScope,
        id: CharacterId,
    ) -> Result<Option<Character>, StoreError> {
        let query =
            format!("SELECT {CHARACTER_COLUMNS} FROM characters WHERE id = $1 AND owner_id = $2");
        let row = sqlx::query(&query)
            .bind(id)
            .bind(scope.owner_id())
            .fetch_optional(&self.pool)
            .instrument(db_span!("SELECT", query.as_str()))
            .await?;

        row.as_ref()
            .map(character_from_row)
            .transpose()
            .map_err(StoreError::from)
    }

    async fn insert(
        &self,
        owner_id: AccountId,
        draft: CharacterDraft,
    ) -> Result<Character, StoreError> {
        let query = format!(
            "INSERT INTO characters (owner_id, name, hit_points, strength, defense, intelligence, class) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {CHARACTER_COLUMNS}"
        );
        let row = sqlx::query(&query)
            .bind(owner_id)
            .bind(&draft.name)
            .bind(draft.hit_points)
            .bind(draft.strength)
            .bind(draft.defense)
            .bind(draft.intelligence)
            .bind(i32::from(draft.class))
            .fetch_one(&self.pool)
            .instrument(db_span!("INSERT", query.as_str()))
            .await?;

        Ok(character_from_row(&row)?)
    }

    async fn update(
        &self,
        scope: OwnerScope,
        id: CharacterId,
        draft: CharacterDraft,
    ) -> Result<Option<Character>, StoreError> {
        let query = format!(
            "UPDATE characters SET name = $3, hit_points = $4, strength = $5, defense = $6, \
             intelligence = $7, class = $8 WHERE id = $1 AND owner_id = $2 \
             RETURNING {CHARACTER_COLUMNS}"
        );
        let row = sqlx::query(&query)
            .bind(id)
            .bind(scope.owner_id())
            .bind(&draft.name)
            .bind(draft.hit_points)
            .bind(draft.strength)
            .bind(draft.defense)
            .bind(draft.intelligence)
            .bind(i32::from(draft.class))
            .fetch_optional(&self.pool)
            .instrument(db_span!("UPDATE", query.as_str()))
            .await?;

        row.as_ref()
            .map(character_from_row)
            .transpose()
            .map_err(StoreError::from)
    }

    async fn delete(&self, scope: OwnerScope, id: CharacterId) -> Result<bool, StoreError> {
        let query = "DELETE FROM characters WHERE id = $1 AND owner_id = $2";
        let result = sqlx::query(query)
            .bind(id)
            .bind(scope.owner_id())
            .execute(&self.pool)
            .instrument(db_span!("DELETE", query))
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let query = "SELECT 1";
        sqlx::query(query)
            .execute(&self.pool)
            .instrument(db_span!("SELECT", query))
            .await?;
        Ok(())
    }
}

fn account_from_row(row: &PgRow) -> Result<Account, sqlx::Error> {
    Ok(Account {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        password_hash: row.try_get("password_hash")?,
        password_salt: row.try_get("password_salt")?,
    })
}

fn character_from_row(row: &PgRow) -> Result<Character, sqlx::Error> {
    let class: i32 = row.try_get("class")?;
    Ok(Character {
        id: row.try_get("id")?,
        owner_id: row.try_get("owner_id")?,
        name: row.try_get("name")?,
        hit_points: row.try_get("hit_points")?,
        strength: row.try_get("strength")?,
        defense: row.try_get("defense")?,
        intelligence: row.try_get("intelligence")?,
        class: CharacterClass::try_from(class).map_err(|err| sqlx::Error::Decode(Box::new(err)))?,
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}

fn split_sql_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();

    for line in sql.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("--") && current.trim().is_empty() {
            continue;
        }
        current.push_str(line);
        current.push('\n');

        if trimmed.ends_with(';') {
            let statement = current.trim();
            if !statement.is_empty() {
                statements.push(statement.to_string());
            }
            current.clear();
        }
    }

    let leftover = current.trim();
    if !leftover.is_empty() {
        statements.push(leftover.to_string());
    }

    statements
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::{borrow::Cow, error::Error as StdError, fmt};

    #[derive(Debug)]
    struct TestDbError {
        code: Option<&'static str>,
    }

    impl fmt::Display for TestDbError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "test database error")
        }
    }

    impl StdError for TestDbError {}

    impl DatabaseError for TestDbError {
        fn message(&self) -> &'static str {
            "test database error"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            self.code.map(Cow::Borrowed)
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::UniqueViolation
        }
    }

    #[test]
    fn is_unique_violation_matches_sqlstate() {
        let err = sqlx::Error::Database(Box::new(TestDbError {
            code: Some("23505"),
        }));
        assert!(is_unique_violation(&err));

        let err = sqlx::Error::Database(Box::new(TestDbError {
            code: Some("23503"),
        }));
        assert!(!is_unique_violation(&err));

        let err = sqlx::Error::Database(Box::new(TestDbError { code: None }));
        assert!(!is_unique_violation(&err));

        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
    }

    #[test]
    fn schema_splits_into_idempotent_statements() {
        let statements = split_sql_statements(SCHEMA_SQL);
        assert_eq!(statements.len(), 3);
        assert!(statements[0].starts_with("CREATE TABLE IF NOT EXISTS accounts"));
        assert!(statements[1].starts_with("CREATE TABLE IF NOT EXISTS characters"));
        assert!(statements[2].starts_with("CREATE INDEX IF NOT EXISTS"));
        assert!(statements.iter().all(|s| s.contains("IF NOT EXISTS")));
    }

    #[test]
    fn split_keeps_unterminated_trailing_statement() {
        let statements = split_sql_statements("SELECT 1;\n-- note\nSELECT 2");
        assert_eq!(statements, vec!["SELECT 1;".to_string(), "SELECT 2".to_string()]);
    }
}
