//! Map parsed CLI arguments to an action.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::auth;
use anyhow::Result;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let dsn = matches.get_one::<String>("dsn").cloned();
    let auth_opts = auth::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        dsn,
        token_secret: auth_opts.token_secret,
        token_ttl_seconds: auth_opts.token_ttl_seconds,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn server_action_from_env() {
        temp_env::with_vars(
            [
                ("RPG_PORT", Some("9000")),
                ("RPG_DSN", None),
                ("RPG_TOKEN_SECRET", Some("0123456789abcdef0123456789abcdef")),
                ("RPG_TOKEN_TTL_SECONDS", Some("120")),
            ],
            || {
                let matches = crate::cli::commands::new().get_matches_from(vec!["rpg"]);
                let action = handler(&matches);
                assert!(action.is_ok());
                if let Ok(Action::Server(args)) = action {
                    assert_eq!(args.port, 9000);
                    assert_eq!(args.dsn, None);
                    assert_eq!(args.token_ttl_seconds, 120);
                    assert_eq!(
                        args.token_secret.expose_secret(),
                        "0123456789abcdef0123456789abcdef"
                    );
                }
            },
        );
    }
}
