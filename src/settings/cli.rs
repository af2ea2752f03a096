use crate::domain_model::{EntityId, UserId};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "stanceline", about = "Command line client for the stances API")]
pub struct Cli {
    #[arg(long)]
    pub settings: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Exchange credentials for a token pair.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and log in.
    Signup {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        full_name: Option<String>,
    },
    /// Revoke the refresh token and forget both tokens.
    Logout,
    /// Show the account the stored tokens belong to.
    Me,
    /// Print a feed, one JSON item per line.
    Feed {
        #[command(subcommand)]
        kind: FeedKind,
        /// Stop after this many pages.
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum FeedKind {
    /// Home entity feed.
    Entities,
    /// Home stance feed.
    Stances {
        #[arg(long = "entity")]
        entities: Vec<EntityId>,
    },
    /// Stances by followed users.
    Following,
    /// Stances on one entity, best first.
    EntityStances { entity_id: EntityId },
    /// Stances written by one user.
    UserStances { user_id: UserId },
    /// Followers of one user.
    Followers { user_id: UserId },
    /// Accounts one user follows.
    Followees { user_id: UserId },
}
