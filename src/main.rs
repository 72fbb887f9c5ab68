mod auth;
mod config;
mod controller;
mod entities;
mod error;
mod projection;
mod remote;
mod resource;
mod selection;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::json;

use auth::TokenStore;
use config::Config;
use controller::{Controller, Modal};
use entities::{Admin, Booking, ContactMessage, GalleryItem};
use projection::SortOrder;
use remote::http::HttpBackend;
use resource::Resource;

#[derive(Parser, Debug)]
#[command(name = "admindeck", about = "Terminal admin console for the bookings site")]
struct Cli {
    /// Path to the configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a starter configuration file
    Init(InitArgs),
    /// Log in and store the session token
    Login(LoginArgs),
    /// Forget any stored session token
    Logout,
    /// List a collection, with optional search and sort
    List(ListArgs),
    /// Show one entry in full
    Show(EntryArgs),
    /// Create an entry from a JSON document
    Add(DocArgs),
    /// Update an entry from a JSON document
    Edit(EditArgs),
    /// Delete one or more entries by id
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
struct InitArgs {
    /// Base URL of the admin API
    #[arg(long)]
    api_base: String,
}

#[derive(Args, Debug)]
struct LoginArgs {
    email: String,
    password: String,

    /// Keep the session across reboots
    #[arg(long, default_value_t = false)]
    remember: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Collection {
    Bookings,
    Contacts,
    Gallery,
    Admins,
}

#[derive(Args, Debug)]
struct ListArgs {
    #[arg(value_enum)]
    collection: Collection,

    /// Case-insensitive filter over the collection's search fields
    #[arg(long)]
    search: Option<String>,

    /// Sort order: asc or desc
    #[arg(long, default_value = "asc")]
    sort: String,
}

#[derive(Args, Debug)]
struct EntryArgs {
    #[arg(value_enum)]
    collection: Collection,
    id: String,
}

#[derive(Args, Debug)]
struct DocArgs {
    #[arg(value_enum)]
    collection: Collection,

    /// Entry fields as a JSON object
    json: String,
}

#[derive(Args, Debug)]
struct EditArgs {
    #[arg(value_enum)]
    collection: Collection,
    id: String,

    /// Replacement fields as a JSON object
    json: String,
}

#[derive(Args, Debug)]
struct DeleteArgs {
    #[arg(value_enum)]
    collection: Collection,

    #[arg(required = true)]
    ids: Vec<String>,
}

/// Dispatch a generic runner over the entity kind named on the command line.
macro_rules! with_resource {
    ($collection:expr, $f:ident ( $($args:expr),* )) => {
        match $collection {
            Collection::Bookings => $f::<Booking>($($args),*).await,
            Collection::Contacts => $f::<ContactMessage>($($args),*).await,
            Collection::Gallery => $f::<GalleryItem>($($args),*).await,
            Collection::Admins => $f::<Admin>($($args),*).await,
        }
    };
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    // init runs before any config exists
    if let Command::Init(args) = &cli.command {
        let path = config::init(cli.config.as_deref(), &args.api_base)?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let config = config::load(cli.config.as_deref())?;
    log::debug!("using config {}", config.config_path.display());

    match cli.command {
        Command::Init(_) => unreachable!(),
        Command::Login(args) => run_login(&config, args).await,
        Command::Logout => run_logout(&config),
        Command::List(args) => {
            let order = SortOrder::from_str(&args.sort)
                .with_context(|| format!("--sort must be asc or desc, got '{}'", args.sort))?;
            with_resource!(args.collection, run_list(&config, args.search, order))
        }
        Command::Show(args) => with_resource!(args.collection, run_show(&config, &args.id)),
        Command::Add(args) => with_resource!(args.collection, run_add(&config, &args.json)),
        Command::Edit(args) => {
            with_resource!(args.collection, run_edit(&config, &args.id, &args.json))
        }
        Command::Delete(args) => with_resource!(args.collection, run_delete(&config, args.ids)),
    }
}

fn token_store(config: &Config) -> TokenStore {
    TokenStore::new(
        config.token_path.clone(),
        config.session_token_path.clone(),
    )
}

fn make_controller<E: Resource>(config: &Config) -> Controller<E, HttpBackend> {
    let backend = HttpBackend::new(config.api_base.clone(), Arc::new(token_store(config)));
    Controller::new(backend)
}

async fn run_login(config: &Config, args: LoginArgs) -> Result<()> {
    let login = auth::login(&config.api_base, &args.email, &args.password)
        .await
        .context("login failed")?;
    token_store(config).save(&login.token, args.remember)?;
    if login.message.is_empty() {
        println!("Logged in.");
    } else {
        println!("{}", login.message);
    }
    Ok(())
}

fn run_logout(config: &Config) -> Result<()> {
    token_store(config).clear()?;
    println!("Logged out.");
    Ok(())
}

async fn run_list<E: Resource>(
    config: &Config,
    search: Option<String>,
    order: SortOrder,
) -> Result<()> {
    let mut ctl = make_controller::<E>(config);
    ctl.load()
        .await
        .with_context(|| format!("failed to fetch {}", E::COLLECTION))?;

    if let Some(query) = search {
        ctl.set_query(query);
    }
    ctl.set_order(order);

    let visible = ctl.visible();
    if visible.is_empty() {
        println!("No entries found.");
        return Ok(());
    }
    for entry in visible {
        println!("{}  {}", entry.id(), entry.summary());
    }
    Ok(())
}

async fn run_show<E: Resource>(config: &Config, id: &str) -> Result<()> {
    let mut ctl = make_controller::<E>(config);
    ctl.load()
        .await
        .with_context(|| format!("failed to fetch {}", E::COLLECTION))?;

    if !ctl.open_view(id) {
        bail!("no {} entry with id {id}", E::COLLECTION);
    }
    if let Modal::Open { draft, .. } = ctl.modal() {
        println!("{}", serde_json::to_string_pretty(draft)?);
        println!("id: {id}");
    }
    Ok(())
}

async fn run_add<E: Resource>(config: &Config, document: &str) -> Result<()> {
    if !E::EDITABLE {
        bail!("{} entries cannot be created from the console", E::COLLECTION);
    }
    let parsed: E = serde_json::from_str(document).context("invalid JSON document")?;

    let mut ctl = make_controller::<E>(config);
    ctl.load()
        .await
        .with_context(|| format!("failed to fetch {}", E::COLLECTION))?;

    ctl.open_add();
    if let Some(draft) = ctl.draft_mut() {
        *draft = parsed;
    }
    ctl.submit().await.context("create failed")?;

    match ctl.items().first() {
        Some(created) => println!("Created {} entry {}.", E::COLLECTION, created.id()),
        None => println!("Created {} entry.", E::COLLECTION),
    }
    Ok(())
}

async fn run_edit<E: Resource>(config: &Config, id: &str, document: &str) -> Result<()> {
    if !E::EDITABLE {
        bail!("{} entries cannot be edited from the console", E::COLLECTION);
    }

    let mut ctl = make_controller::<E>(config);
    ctl.load()
        .await
        .with_context(|| format!("failed to fetch {}", E::COLLECTION))?;

    if !ctl.open_edit(id) {
        bail!("no {} entry with id {id}", E::COLLECTION);
    }

    // Re-attach the target id so the draft still points at the same entity.
    let mut doc: serde_json::Value =
        serde_json::from_str(document).context("invalid JSON document")?;
    let object = doc
        .as_object_mut()
        .context("expected a JSON object of fields")?;
    object.insert("_id".to_string(), json!(id));
    let parsed: E = serde_json::from_value(doc).context("invalid JSON document")?;

    if let Some(draft) = ctl.draft_mut() {
        *draft = parsed;
    }
    ctl.submit().await.context("update failed")?;

    println!("Updated {} entry {}.", E::COLLECTION, id);
    Ok(())
}

async fn run_delete<E: Resource>(config: &Config, ids: Vec<String>) -> Result<()> {
    let mut ctl = make_controller::<E>(config);
    ctl.load()
        .await
        .with_context(|| format!("failed to fetch {}", E::COLLECTION))?;

    if let [id] = ids.as_slice() {
        if ctl.delete(id).await.context("delete failed")? {
            println!("Deleted {id}.");
        } else {
            println!("No {} entry with id {id}.", E::COLLECTION);
        }
        return Ok(());
    }

    for id in &ids {
        if !ctl.toggle_select(id) {
            eprintln!("warning: no {} entry with id {id}", E::COLLECTION);
        }
    }
    let report = ctl.delete_selected().await?;
    println!("{}", report.summary());
    if !report.is_clean() {
        bail!("some deletions failed");
    }
    Ok(())
}
