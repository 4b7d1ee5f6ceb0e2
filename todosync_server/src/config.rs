use std::net::SocketAddr;

use clap::Parser;

/// Server configuration. Every flag can also be set through the environment.
#[derive(Parser, Debug, Clone)]
#[command(name = "todosync-server", version, about = "todosync HTTP and GraphQL server")]
pub struct Config {
    /// SeaORM database URL.
    #[arg(long, env = "TODOSYNC_DATABASE_URL", default_value = "sqlite:./todosync.db?mode=rwc")]
    pub database_url: String,

    /// Address to listen on.
    #[arg(long, env = "TODOSYNC_LISTEN", default_value = "127.0.0.1:4000")]
    pub listen: SocketAddr,

    /// Create this account on startup if it does not exist.
    #[arg(long, env = "TODOSYNC_SEED_USERNAME", requires = "seed_password")]
    pub seed_username: Option<String>,

    #[arg(long, env = "TODOSYNC_SEED_PASSWORD", hide_env_values = true)]
    pub seed_password: Option<String>,

    /// Capacity of the store's change notification channel.
    #[arg(long, env = "TODOSYNC_CHANGE_CAPACITY", default_value_t = 256)]
    pub change_capacity: usize,
}

impl Config {
    /// The account to seed, if both halves are configured.
    pub fn seed_account(&self) -> Option<(&str, &str)> {
        match (&self.seed_username, &self.seed_password) {
            (Some(username), Some(password)) => Some((username.as_str(), password.as_str())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["todosync-server"]).unwrap();
        assert_eq!(config.listen.port(), 4000);
        assert!(config.seed_account().is_none());
    }

    #[test]
    fn test_seed_account_needs_both_halves() {
        let config = Config::try_parse_from([
            "todosync-server",
            "--seed-username",
            "meteorite",
            "--seed-password",
            "password",
        ])
        .unwrap();
        assert_eq!(config.seed_account(), Some(("meteorite", "password")));

        assert!(Config::try_parse_from(["todosync-server", "--seed-username", "x"]).is_err());
    }
}
