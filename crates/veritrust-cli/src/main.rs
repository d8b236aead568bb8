mod input;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use tracing_subscriber::EnvFilter;
use veritrust_registry::{
    Credentials, DEFAULT_AUTH_HEADER, DEFAULT_BASE_URL, OperationKind, RegistryClient,
    SearchFilters, csv_filter, execute_items,
};

#[derive(Parser)]
#[command(name = "veritrust", about = "Interact with the Veritrust A2A Agent Registry")]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct ConnectionArgs {
    /// Registry base URL.
    #[arg(long, env = "VERITRUST_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// API key, if the registry requires one.
    #[arg(long, env = "VERITRUST_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Header used for the API key.
    #[arg(long, env = "VERITRUST_AUTH_HEADER", default_value = DEFAULT_AUTH_HEADER, global = true)]
    auth_header: String,

    /// Send the API key without the `Bearer ` prefix.
    #[arg(long, env = "VERITRUST_NO_BEARER", global = true)]
    no_bearer: bool,

    /// Request timeout in seconds. No timeout when unset.
    #[arg(long, env = "VERITRUST_TIMEOUT_SECS", global = true)]
    timeout_secs: Option<u64>,
}

impl ConnectionArgs {
    fn credentials(&self) -> Credentials {
        let mut credentials = Credentials::new(&self.base_url)
            .custom_header(&self.auth_header)
            .use_bearer(!self.no_bearer);
        if let Some(key) = &self.api_key {
            credentials = credentials.api_key(key);
        }
        credentials
    }

    fn client(&self) -> Result<RegistryClient, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(RegistryClient::with_http_client(
            builder.build()?,
            self.credentials(),
        ))
    }
}

#[derive(Subcommand)]
enum Command {
    /// List agents.
    List {
        /// Only verified agents.
        #[arg(long)]
        verified: bool,
    },
    /// Get one agent by UUID.
    Get { uuid: String },
    /// Search agents.
    Search(SearchArgs),
    /// Register an agent by Agent Card URL.
    Register { agent_card_url: String },
    /// Re-verify an existing agent by UUID.
    Reverify { uuid: String },
    /// Run one operation over input items read as JSON.
    Run {
        /// Operation to run for every item.
        #[arg(long, short, default_value = "list")]
        operation: OperationKind,
        /// JSON array or newline-delimited JSON file. Reads stdin when omitted.
        #[arg(long, short)]
        input: Option<PathBuf>,
    },
    /// Describe the available operations and their parameters.
    Operations,
}

#[derive(Args)]
struct SearchArgs {
    #[arg(long, default_value = "")]
    query: String,
    /// Comma-separated skills.
    #[arg(long, default_value = "")]
    skills: String,
    /// Comma-separated protocols.
    #[arg(long, default_value = "")]
    protocols: String,
    /// Comma-separated tags.
    #[arg(long, default_value = "")]
    tags: String,
    #[arg(long, default_value = "")]
    owner_did: String,
    /// Only verified agents.
    #[arg(long)]
    verified: bool,
}

impl SearchArgs {
    fn filters(self) -> SearchFilters {
        SearchFilters {
            query: self.query,
            owner_did: self.owner_did,
            verified: self.verified,
            skills: csv_filter(&self.skills),
            protocols: csv_filter(&self.protocols),
            tags: csv_filter(&self.tags),
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    let client = cli.connection.client()?;
    tracing::debug!(base_url = client.credentials().base(), "registry client ready");

    let output = match cli.command {
        Command::List { verified } => client.list(verified).await?,
        Command::Get { uuid } => client.get(uuid).await?,
        Command::Search(args) => client.search(args.filters()).await?,
        Command::Register { agent_card_url } => client.register(agent_card_url).await?,
        Command::Reverify { uuid } => client.reverify(uuid).await?,
        Command::Run { operation, input } => {
            let items = input::read_items(input.as_deref())?;
            let records = execute_items(&client, operation, &items).await?;
            tracing::info!(operation = %operation, items = records.len(), "run complete");
            serde_json::to_value(records)?
        }
        Command::Operations => serde_json::to_value(veritrust_registry::operations())?,
    };

    print_json(&output)?;
    Ok(())
}

fn print_json(value: &Value) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
