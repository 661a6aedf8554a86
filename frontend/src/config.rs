use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use dishpoll_shared::{Directory, Error, Result};

use crate::catalog::CatalogSource;

pub const DEFAULT_DATA_DIR: &str = ".dishpoll";
pub const DEFAULT_CATALOG: &str = "https://raw.githubusercontent.com/syook/react-dishpoll/main/db.json";

const BUNDLED_USERS: &str = include_str!("../data/users.json");

#[derive(Parser, Debug, Clone)]
#[command(
    name = "dishpoll",
    about = "Rank your three favourite dishes and see how the poll stands",
    version,
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub config: Config,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Sign in and remember the user for later commands.
    Login(LoginArgs),

    /// Forget the signed-in user.
    Logout,

    /// Show the signed-in user.
    Whoami,

    /// List the dishes together with your current ranks.
    Dishes,

    /// Rank a dish 1, 2 or 3, or `clear` its rank.
    Vote(VoteArgs),

    /// Show the leaderboard, your selections and poll statistics.
    Results(ResultsArgs),
}

#[derive(Args, Debug, Clone)]
pub struct LoginArgs {
    pub username: String,

    #[arg(long, env = "DISHPOLL_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Args, Debug, Clone)]
pub struct VoteArgs {
    #[arg(value_name = "DISH_ID")]
    pub dish: String,

    #[arg(value_name = "RANK", allow_hyphen_values = true)]
    pub rank: String,
}

#[derive(Args, Debug, Clone)]
pub struct ResultsArgs {
    /// Print the leaderboard as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct Config {
    /// Directory holding the persisted votes and session.
    #[arg(long, global = true, value_name = "DIR", env = "DISHPOLL_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Dish catalog, either an http(s) URL or a local JSON file.
    #[arg(long, global = true, value_name = "URL|PATH", env = "DISHPOLL_CATALOG", default_value = DEFAULT_CATALOG)]
    pub catalog: String,

    /// JSON list of users allowed to sign in. Defaults to the bundled list.
    #[arg(long, global = true, value_name = "PATH", env = "DISHPOLL_USERS")]
    pub users: Option<PathBuf>,
}

impl Config {
    pub fn catalog_source(&self) -> CatalogSource {
        CatalogSource::parse(&self.catalog)
    }

    pub fn directory(&self) -> Result<Directory> {
        match &self.users {
            Some(path) => {
                let blob = std::fs::read_to_string(path)
                    .map_err(|e| Error::storage(format!("Failed to read users from {}", path.display()), e))?;
                Directory::from_json(&blob)
            }
            None => Directory::from_json(BUNDLED_USERS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn vote_accepts_clear_and_negative_ranks() {
        let cli = Cli::try_parse_from(["dishpoll", "vote", "3", "-1"]).unwrap();
        match cli.command {
            Command::Vote(args) => assert_eq!((args.dish.as_str(), args.rank.as_str()), ("3", "-1")),
            other => panic!("unexpected command {other:?}"),
        }

        let cli = Cli::try_parse_from(["dishpoll", "vote", "3", "clear", "--data-dir", "/tmp/x"]).unwrap();
        assert_eq!(cli.config.data_dir, PathBuf::from("/tmp/x"));
    }

    #[test]
    fn bundled_users_parse() {
        let config = Config {
            data_dir: DEFAULT_DATA_DIR.into(),
            catalog: DEFAULT_CATALOG.into(),
            users: None,
        };
        assert!(!config.directory().unwrap().is_empty());
    }
}
