//! Command-line interface: the headless host that drives the settlement
//! workflow end to end.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use dialoguer::Password;
use tracing::warn;

use crate::api::{CollectionApi, HttpApi};
use crate::auth::Authenticator;
use crate::config::Config;
use crate::domain::Denomination;
use crate::error::{Error, Result};
use crate::qr::LoginHint;
use crate::session::CredentialStore;
use crate::settlement::{FormInput, Phase, SettlementSession};

/// kwesta - volunteer cash-reconciliation client.
#[derive(Parser, Debug)]
#[command(name = "kwesta")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "kwesta.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in to a collection server
    Login(LoginArgs),

    /// Log out and clear stored credentials
    Logout,

    /// List volunteers awaiting settlement
    Volunteers,

    /// Settle one volunteer's box
    Settle(SettleArgs),

    /// Show event statistics
    Stats(StatsArgs),
}

#[derive(Parser, Debug)]
pub struct LoginArgs {
    /// Server base URL
    #[arg(long)]
    pub url: Option<String>,

    /// Login name
    #[arg(long)]
    pub user: Option<String>,

    /// Decoded QR payload pre-filling url and user
    #[arg(long)]
    pub qr: Option<String>,
}

#[derive(Parser, Debug)]
pub struct SettleArgs {
    /// Volunteer id to settle
    #[arg(long)]
    pub volunteer: i64,

    /// Denomination count as code=count (e.g. m1zl=3, b100zl=2); repeatable
    #[arg(long = "count")]
    pub counts: Vec<String>,

    /// Card-terminal amount
    #[arg(long)]
    pub terminal: Option<String>,

    /// Additional counter id to credit; repeatable
    #[arg(long = "counter")]
    pub counters: Vec<i64>,

    /// Foreign currency found in the box
    #[arg(long)]
    pub foreign_currency: Option<String>,

    /// Other donations found in the box
    #[arg(long)]
    pub other_donations: Option<String>,

    /// Remarks from the counting crew
    #[arg(long)]
    pub counters_remarks: Option<String>,

    /// Remarks from the volunteer
    #[arg(long)]
    pub volunteer_remarks: Option<String>,

    /// Counting room
    #[arg(long)]
    pub room: Option<String>,
}

#[derive(Parser, Debug)]
pub struct StatsArgs {
    #[arg(value_enum)]
    pub view: StatsView,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum StatsView {
    /// Per-counter aggregates
    Counting,
    /// Event total and top volunteers
    Summary,
    /// Per-volunteer aggregates
    Volunteer,
}

/// Credential store persisted as a JSON map in the user config directory.
pub struct FileStore {
    path: PathBuf,
    values: Mutex<std::collections::HashMap<String, String>>,
}

impl FileStore {
    pub fn open_default() -> Result<Self> {
        let dir = dirs::config_dir()
            .ok_or_else(|| Error::InvalidInput("no user config directory".into()))?
            .join("kwesta");
        std::fs::create_dir_all(&dir)?;
        Ok(Self::open(dir.join("credentials.json")))
    }

    pub fn open(path: PathBuf) -> Self {
        let values = std::fs::read_to_string(&path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        Self {
            path,
            values: Mutex::new(values),
        }
    }

    fn flush(&self, values: &std::collections::HashMap<String, String>) {
        match serde_json::to_string_pretty(values) {
            Ok(raw) => {
                if let Err(e) = std::fs::write(&self.path, raw) {
                    warn!(error = %e, path = %self.path.display(), "failed to persist credentials");
                }
            }
            Err(e) => warn!(error = %e, "failed to encode credentials"),
        }
    }
}

impl CredentialStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut values = self.values.lock().unwrap();
        values.insert(key.to_string(), value.to_string());
        self.flush(&values);
    }

    fn remove(&self, key: &str) {
        let mut values = self.values.lock().unwrap();
        values.remove(key);
        self.flush(&values);
    }
}

/// Dispatch a parsed command line.
pub async fn run(cli: Cli, config: Config) -> Result<()> {
    let gateway: Arc<dyn CollectionApi> = Arc::new(HttpApi::new(Duration::from_secs(
        config.network.timeout_secs,
    )));
    let store: Arc<dyn CredentialStore> = Arc::new(FileStore::open_default()?);

    match cli.command {
        Commands::Login(args) => login(gateway, store, args).await,
        Commands::Logout => {
            Authenticator::new(gateway, store).logout().await;
            println!("Signed out.");
            Ok(())
        }
        Commands::Volunteers => volunteers(gateway, store).await,
        Commands::Settle(args) => settle(gateway, store, args).await,
        Commands::Stats(args) => stats(gateway, store, args).await,
    }
}

async fn login(
    gateway: Arc<dyn CollectionApi>,
    store: Arc<dyn CredentialStore>,
    args: LoginArgs,
) -> Result<()> {
    let hint = match args.qr.as_deref() {
        Some(payload) => Some(LoginHint::parse(payload)?),
        None => None,
    };

    let url = args
        .url
        .or_else(|| hint.as_ref().map(|h| h.url.clone()))
        .ok_or_else(|| Error::InvalidInput("pass --url or --qr".into()))?;
    let user = args
        .user
        .or_else(|| hint.as_ref().map(|h| h.user.clone()))
        .ok_or_else(|| Error::InvalidInput("pass --user or --qr".into()))?;

    let password = Password::new()
        .with_prompt(format!("Password for {user}"))
        .interact()?;

    Authenticator::new(gateway, store)
        .login(&url, &user, &password)
        .await?;
    println!("Logged in as {user}.");
    Ok(())
}

async fn volunteers(gateway: Arc<dyn CollectionApi>, store: Arc<dyn CredentialStore>) -> Result<()> {
    let session = require_session(store.as_ref())?;
    let volunteers = gateway.fetch_volunteers(&session).await?;

    if volunteers.is_empty() {
        println!("No volunteers.");
        return Ok(());
    }
    for v in volunteers {
        let marker = if v.settled { "x" } else { " " };
        println!("[{marker}] {:>6}  {}  {} {}", v.id, v.display_id, v.first_name, v.last_name);
    }
    Ok(())
}

async fn settle(
    gateway: Arc<dyn CollectionApi>,
    store: Arc<dyn CredentialStore>,
    args: SettleArgs,
) -> Result<()> {
    let mut session = SettlementSession::new(gateway, store);

    if let Phase::Failed { message } = session.open(args.volunteer).await {
        return Err(Error::InvalidInput(message.clone()));
    }
    match session.phase() {
        Phase::Unauthenticated => {
            return Err(Error::InvalidInput("not logged in, run `kwesta login`".into()))
        }
        Phase::Ready => {}
        other => return Err(Error::InvalidInput(format!("unexpected state: {other:?}"))),
    }

    if let Some(volunteer) = session.volunteer() {
        println!("Settling {}", volunteer.headline());
    }

    for raw in &args.counts {
        let (code, count) = raw
            .split_once('=')
            .ok_or_else(|| Error::InvalidInput(format!("expected code=count, got '{raw}'")))?;
        let denomination: Denomination = code
            .parse()
            .map_err(Error::InvalidInput)?;
        session.edit(FormInput::Count(denomination, count.to_string()));
    }
    if let Some(amount) = &args.terminal {
        if !session.tally().has_card_terminal() {
            return Err(Error::InvalidInput(
                "this volunteer carried no card terminal".into(),
            ));
        }
        session.edit(FormInput::TerminalEnabled(true));
        session.edit(FormInput::TerminalAmount(amount.clone()));
    }
    for id in &args.counters {
        session.edit(FormInput::SelectCounter(*id));
    }
    if let Some(text) = args.foreign_currency {
        session.edit(FormInput::ForeignCurrency(text));
    }
    if let Some(text) = args.other_donations {
        session.edit(FormInput::OtherDonations(text));
    }
    if let Some(text) = args.counters_remarks {
        session.edit(FormInput::CountersRemarks(text));
    }
    if let Some(text) = args.volunteer_remarks {
        session.edit(FormInput::VolunteerRemarks(text));
    }
    if let Some(text) = args.room {
        session.edit(FormInput::Room(text));
    }

    let summary = session.summary();
    if summary.show_terminal {
        println!("Cash:     {:.2} zł", summary.cash_total);
        println!("Terminal: {:.2} zł", summary.terminal_total);
    }
    println!("Total:    {:.2} zł", summary.grand_total);
    println!(
        "Counters: {}",
        session
            .selected_counters()
            .iter()
            .map(|p| p.display_name())
            .collect::<Vec<_>>()
            .join(", ")
    );

    match session.submit().await {
        Phase::Succeeded { settlement_id } => {
            println!("Settled, record #{settlement_id}.");
            Ok(())
        }
        Phase::Failed { message } => Err(Error::InvalidInput(message.clone())),
        Phase::Unauthenticated => {
            Err(Error::InvalidInput("session expired, run `kwesta login`".into()))
        }
        other => Err(Error::InvalidInput(format!("unexpected state: {other:?}"))),
    }
}

async fn stats(
    gateway: Arc<dyn CollectionApi>,
    store: Arc<dyn CredentialStore>,
    args: StatsArgs,
) -> Result<()> {
    let session = require_session(store.as_ref())?;

    match args.view {
        StatsView::Counting => {
            for row in gateway.fetch_counting_stats(&session).await? {
                println!(
                    "{:>6}  {} {}  {} settlements  {:.2} zł",
                    row.id, row.first_name, row.last_name, row.settlements, row.total
                );
            }
        }
        StatsView::Summary => {
            let stats = gateway.fetch_summary(&session).await?;
            println!("Event total: {:.2} zł", stats.summary.grand_total);
            for (place, row) in stats.top_volunteers.iter().enumerate() {
                println!(
                    "{:>2}. {}  {} {}  {:.2} zł",
                    place + 1,
                    row.display_id,
                    row.first_name,
                    row.last_name,
                    row.total
                );
            }
        }
        StatsView::Volunteer => {
            for row in gateway.fetch_volunteer_stats(&session).await? {
                println!(
                    "{:>6}  {}  {} {}  {:.2} zł",
                    row.id, row.display_id, row.first_name, row.last_name, row.total
                );
            }
        }
    }
    Ok(())
}

/// Load the stored session and refuse to proceed when it is missing or
/// expired, mirroring the check every authenticated screen performs.
fn require_session(store: &dyn CredentialStore) -> Result<crate::session::Session> {
    let session = crate::session::Session::load(store)
        .ok_or_else(|| Error::InvalidInput("not logged in, run `kwesta login`".into()))?;
    if session.is_expired(chrono::Utc::now()) {
        crate::session::clear_session(store);
        return Err(Error::InvalidInput("session expired, run `kwesta login`".into()));
    }
    Ok(session)
}
