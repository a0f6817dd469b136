use super::password::PasswordDigest;
use std::fmt;

pub type AccountId = i64;

/// A registered account as persisted by an [`AccountStore`](crate::store::AccountStore).
#[derive(Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub username: String,
    pub password_hash: Vec<u8>,
    pub password_salt: Vec<u8>,
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"***")
            .field("password_salt", &"***")
            .finish()
    }
}

/// Account fields known before the store assigns an id.
#[derive(Clone)]
pub struct NewAccount {
    pub username: String,
    pub digest: PasswordDigest,
}

impl NewAccount {
    #[must_use]
    pub fn into_account(self, id: AccountId) -> Account {
        Account {
            id,
            username: self.username,
            password_hash: self.digest.hash.to_vec(),
            password_salt: self.digest.salt.to_vec(),
        }
    }
}

impl fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAccount")
            .field("username", &self.username)
            .field("digest", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password;
    use anyhow::Result;

    #[test]
    fn debug_output_redacts_credentials() -> Result<()> {
        let digest = password::derive("hunter2")?;
        let account = NewAccount {
            username: "alice".to_string(),
            digest,
        }
        .into_account(7);

        let rendered = format!("{account:?}");
        assert!(rendered.contains("alice"));
        assert!(rendered.contains("***"));
        assert!(!rendered.contains(&format!("{:?}", account.password_hash)));
        Ok(())
    }

    #[test]
    fn into_account_keeps_digest_bytes() -> Result<()> {
        let digest = password::derive("pw")?;
        let expected_hash = digest.hash.to_vec();
        let expected_salt = digest.salt.to_vec();
        let account = NewAccount {
            username: "bob".to_string(),
            digest,
        }
        .into_account(1);

        assert_eq!(account.id, 1);
        assert_eq!(account.password_hash, expected_hash);
        assert_eq!(account.password_salt, expected_salt);
        Ok(())
    }
}
