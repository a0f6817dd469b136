//! Identity and authorization core.
//!
//! Flow overview:
//! - register: [`password::derive`] a salted digest, then insert the account.
//! - login: look the account up, [`password::verify`], then [`TokenIssuer::issue`].
//! - every character request: [`AccessGuard::authenticate`] the bearer header,
//!   then scope the store call with [`guard::scope_list`] or [`guard::scope_one`].
//!
//! Nothing here keeps per-request state. The only shared value is the read-only
//! [`TokenIssuer`], built once from [`TokenConfig`] at startup.

mod account;
mod error;
pub mod guard;
pub mod password;
pub mod token;

pub use account::{Account, AccountId, NewAccount};
pub use error::{AuthError, TokenConfigError, TokenError};
pub use guard::{AccessGuard, OwnerScope};
pub use token::{Claims, TokenConfig, TokenIssuer};
