use std::path::PathBuf;

use anyhow::Result;
use bb_client::{ClientConfig, StorageType, config::parse_timeout};
use bb_types::{auth::AccountType, pagination::DEFAULT_PAGE_SIZE, web::HandMode};
use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "bb", version, about = "Admin client for the Big Brother childcare backend")]
pub struct Cli {
    /// Backend origin (overrides BB_API_ORIGIN)
    #[arg(long, global = true, value_name = "URL")]
    pub origin: Option<String>,
    /// Request timeout in seconds (overrides BB_API_TIMEOUT_SECS)
    #[arg(long, global = true, value_name = "SECONDS")]
    pub timeout: Option<String>,
    /// Session storage file (overrides BB_STORAGE_PATH)
    #[arg(long, global = true, value_name = "PATH")]
    pub storage: Option<PathBuf>,
    #[command(subcommand)]
    pub cmd: Command,
}

impl Cli {
    /// Environment and defaults first, then flags.
    pub fn client_config(&self) -> Result<ClientConfig> {
        let mut config = ClientConfig::from_env()?;
        if let Some(origin) = &self.origin {
            config = config.with_origin(origin)?;
        }
        if let Some(secs) = &self.timeout {
            config = config.with_timeout(Some(parse_timeout(secs)?));
        }
        if let Some(path) = &self.storage {
            config = config.with_storage(StorageType::File(path.clone()));
        }
        Ok(config)
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and store the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "BB_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Register a new account
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long, env = "BB_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long = "first-name")]
        first_name: String,
        #[arg(long = "last-name")]
        last_name: String,
        /// admin, staff or parent
        #[arg(long = "account-type")]
        account_type: AccountType,
        #[arg(long)]
        location: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the stored session's claims
    Whoami,
    #[command(subcommand)]
    Children(ChildrenCmd),
    #[command(subcommand)]
    Users(UsersCmd),
    #[command(subcommand)]
    Contacts(ContactsCmd),
    #[command(subcommand)]
    Relationships(RelationshipsCmd),
    #[command(subcommand)]
    MealPlans(LocationListCmd),
    #[command(subcommand)]
    Newsletters(LocationListCmd),
    #[command(subcommand)]
    Media(MediaCmd),
    #[command(subcommand)]
    Reports(ReportsCmd),
    /// Activity log by location or by user
    Logs(LogsArgs),
    #[command(subcommand)]
    Mail(MailCmd),
    /// Ask the backend for activity suggestions
    Suggest {
        #[arg(long)]
        prompt: String,
        #[arg(long)]
        child: Option<String>,
    },
    #[command(subcommand)]
    Prefs(PrefsCmd),
}

#[derive(Debug, Clone, Copy, Args)]
pub struct PageArgs {
    /// 1-based page number
    #[arg(long, default_value_t = 1)]
    pub page: usize,
    #[arg(long = "per-page", default_value_t = DEFAULT_PAGE_SIZE)]
    pub per_page: usize,
}

#[derive(Debug, Subcommand)]
pub enum ChildrenCmd {
    /// Children at a location (defaults to the session's location)
    List {
        #[arg(long)]
        location: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },
    Show {
        id: String,
    },
    Delete {
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum UsersCmd {
    List {
        #[arg(long)]
        location: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },
}

#[derive(Debug, Subcommand)]
pub enum ContactsCmd {
    List {
        #[arg(long)]
        child: String,
        #[command(flatten)]
        page: PageArgs,
    },
}

#[derive(Debug, Subcommand)]
pub enum RelationshipsCmd {
    List {
        #[arg(long, conflicts_with = "parent", required_unless_present = "parent")]
        child: Option<String>,
        #[arg(long)]
        parent: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },
}

#[derive(Debug, Subcommand)]
pub enum LocationListCmd {
    List {
        #[arg(long)]
        location: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },
}

#[derive(Debug, Subcommand)]
pub enum MediaCmd {
    List {
        #[arg(long)]
        child: String,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Upload a photo or document for a child
    Upload {
        #[arg(long)]
        child: String,
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        caption: Option<String>,
        /// Guessed from the file extension when omitted
        #[arg(long = "content-type")]
        content_type: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum ReportsCmd {
    /// Progress reports for a child, split into sections
    List {
        #[arg(long)]
        child: String,
        #[command(flatten)]
        page: PageArgs,
    },
}

#[derive(Debug, Args)]
pub struct LogsArgs {
    #[arg(long, conflicts_with = "user", required_unless_present = "user")]
    pub location: Option<String>,
    #[arg(long)]
    pub user: Option<String>,
    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Debug, Subcommand)]
pub enum MailCmd {
    Send {
        /// Recipient address (repeatable)
        #[arg(long = "to", required = true)]
        to: Vec<String>,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        body: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum PrefsCmd {
    Show,
    Set {
        #[arg(long = "dark-mode", action = ArgAction::Set, value_name = "BOOL")]
        dark_mode: Option<bool>,
        #[arg(long = "colorblind-mode", action = ArgAction::Set, value_name = "BOOL")]
        colorblind_mode: Option<bool>,
        /// left or right
        #[arg(long = "hand-mode")]
        hand_mode: Option<HandMode>,
    },
}
