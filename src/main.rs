use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use suirss::config::{Config, Settings, RPC_URL_ENV};
use suirss::feed::{self, ItemWindow, MyFeed, DEFAULT_LIMIT, DEFAULT_OFFSET};
use suirss::network::Network;
use suirss::rpc::SuiClient;
use suirss::schema::{Address, ChannelFields};
use suirss::server::{self, AppState};
use suirss::tx::{self, RssPackage, TransactionKind};

/// Get the config directory path (~/.config/suirss/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("suirss"))
}

#[derive(Parser, Debug)]
#[command(name = "suirss", about = "RSS feeds stored on the Sui ledger")]
struct Args {
    /// Config file (default: ~/.config/suirss/config.toml)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Network presets to use (overrides the config file)
    #[arg(long, global = true)]
    network: Option<Network>,

    /// Fullnode JSON-RPC URL (overrides network presets and the config file)
    #[arg(long, env = RPC_URL_ENV, global = true)]
    rpc_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve feeds over HTTP as /<name>.xml
    Serve {
        #[arg(long)]
        listen: Option<SocketAddr>,
    },
    /// Print a feed's XML
    Print {
        name: String,
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: u64,
        #[arg(long, default_value_t = DEFAULT_OFFSET)]
        offset: u64,
    },
    /// Show a feed's on-chain record
    Show { name: String },
    /// List registered feed names
    Discover {
        #[arg(long)]
        cursor: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// List feeds administered by an address
    MyFeeds { owner: Address },
    /// List SuiNS names owned by an address
    Names { owner: Address },
    /// Encode an unsigned publisher transaction (base64 TransactionKind)
    #[command(subcommand)]
    Tx(TxCommand),
}

#[derive(Subcommand, Debug)]
enum TxCommand {
    /// Create a feed for an owned SuiNS name
    NewFeed(TxArgs),
    /// Replace a feed's title, link and description
    EditFeed(TxArgs),
    /// Publish an item to a feed
    PostItem(TxArgs),
}

#[derive(ClapArgs, Debug)]
struct TxArgs {
    /// Address that will sign the transaction
    #[arg(long)]
    owner: Address,
    /// Feed name, without `.sui`
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "")]
    title: String,
    #[arg(long, default_value = "")]
    link: String,
    #[arg(long, default_value = "")]
    description: String,
}

impl TxArgs {
    fn fields(&self) -> ChannelFields {
        ChannelFields {
            title: self.title.clone(),
            link: self.link.clone(),
            description: self.description.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => get_config_dir()?.join("config.toml"),
    };
    let mut config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    if let Some(network) = args.network {
        config.network = network;
    }
    if let Some(url) = &args.rpc_url {
        config.rpc_url = Some(url.clone());
    }
    let settings = config.resolve().context("Invalid configuration")?;
    tracing::debug!(?settings, "Resolved settings");

    let client = SuiClient::new(settings.rpc_url.clone());

    match args.command {
        Command::Serve { listen } => {
            let table_id = feed::feeds_table_id(&client, &settings)
                .await
                .context("Failed to resolve feed name table")?;
            let listen = listen.unwrap_or(settings.listen);
            let state = Arc::new(AppState {
                client,
                settings,
                table_id,
            });
            server::serve(listen, state)
                .await
                .with_context(|| format!("Server on {listen} failed"))?;
        }
        Command::Print {
            name,
            limit,
            offset,
        } => {
            let table_id = feed::feeds_table_id(&client, &settings).await?;
            let window = ItemWindow { limit, offset };
            let xml = feed::feed_by_name(&client, &settings, &table_id, &name, window)
                .await
                .with_context(|| format!("Failed to render feed `{name}`"))?;
            println!("{xml}");
        }
        Command::Show { name } => {
            let table_id = feed::feeds_table_id(&client, &settings).await?;
            let id = feed::resolve_feed_id(&client, &table_id, &name).await?;
            let rss = feed::fetch_feed(&client, &id).await?.value;
            let fields = rss.channel_fields();
            println!("name:        {}", rss.name);
            println!("id:          {}", rss.id);
            println!("title:       {}", fields.title);
            println!("link:        {}", fields.link);
            println!("description: {}", fields.description);
            println!("items:       {}", rss.item_count());
            println!("public:      {}", rss.is_public);
            println!("publishers:  {}", rss.publishers.len());
            if let Some(updated) = rss.last_updated() {
                println!("updated:     {}", updated.to_rfc3339());
            }
        }
        Command::Discover { cursor, limit } => {
            let table_id = feed::feeds_table_id(&client, &settings).await?;
            let page = feed::discover(&client, &table_id, cursor.as_deref(), limit).await?;
            for name in &page.names {
                println!("{name}");
            }
            if let (true, Some(next)) = (page.has_next_page, &page.next_cursor) {
                eprintln!("more: --cursor {next}");
            }
        }
        Command::MyFeeds { owner } => {
            let feeds = feed::my_feeds(&client, &settings.package_id, &owner).await?;
            if feeds.is_empty() {
                eprintln!("No feeds administered by {owner}");
            }
            for f in feeds {
                println!(
                    "{}\t{}\t{} items\tcap {}",
                    f.feed.value.short_name(),
                    f.feed.object_id,
                    f.feed.value.item_count(),
                    f.cap.object_ref.object_id
                );
            }
        }
        Command::Names { owner } => {
            for reg in feed::suins_names(&client, &settings.suins_package_id, &owner).await? {
                let expires = reg
                    .value
                    .expires_at()
                    .map(|t| t.format("%Y-%m-%d").to_string())
                    .unwrap_or_default();
                println!("{}\t{}\t{}", reg.value.short_name(), reg.object_ref.object_id, expires);
            }
        }
        Command::Tx(cmd) => {
            let kind = build_tx(&client, &settings, cmd).await?;
            println!("{}", kind.to_base64().context("Failed to encode transaction")?);
        }
    }

    Ok(())
}

async fn build_tx(
    client: &SuiClient,
    settings: &Settings,
    cmd: TxCommand,
) -> Result<TransactionKind> {
    let package = RssPackage::new(settings.package_id);
    match cmd {
        TxCommand::NewFeed(args) => {
            let registration = feed::suins_names(client, &settings.suins_package_id, &args.owner)
                .await?
                .into_iter()
                .find(|reg| reg.value.short_name() == args.name)
                .with_context(|| format!("{} does not own `{}.sui`", args.owner, args.name))?;
            let registry = feed::fetch_registry(client, &settings.registry_id).await?;
            Ok(tx::create_feed_tx(
                package,
                registry.arg(true),
                registration.object_ref,
                &args.fields(),
                args.owner,
            )?)
        }
        TxCommand::EditFeed(args) => {
            let mine = administered_feed(client, settings, &args).await?;
            let feed = mine.feed.arg(true);
            Ok(tx::edit_feed_tx(package, feed, mine.cap.object_ref, &args.fields())?)
        }
        TxCommand::PostItem(args) => {
            let mine = administered_feed(client, settings, &args).await?;
            let feed = mine.feed.arg(true);
            Ok(tx::post_item_tx(package, feed, mine.cap.object_ref, &args.fields())?)
        }
    }
}

/// The named feed and the owner's cap for it.
async fn administered_feed(
    client: &SuiClient,
    settings: &Settings,
    args: &TxArgs,
) -> Result<MyFeed> {
    let table_id = feed::feeds_table_id(client, settings).await?;
    let feed_id = feed::resolve_feed_id(client, &table_id, &args.name).await?;
    feed::my_feeds(client, &settings.package_id, &args.owner)
        .await?
        .into_iter()
        .find(|f| f.feed.object_id == feed_id)
        .with_context(|| format!("{} holds no admin cap for `{}`", args.owner, args.name))
}
