use clap::{Parser, Subcommand};
use simplelog::{ConfigBuilder, WriteLogger};
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use twin::api::ApiClient;
use twin::core::config::{self, ResolvedConfig, TwinConfig};
use twin::core::storage::Store;

#[derive(Parser)]
#[command(name = "twin", about = "Chat with your digital twin")]
struct Args {
    /// Name shown for the twin (overrides config and TWIN_NAME)
    #[arg(short, long)]
    name: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Log in to the twin backend (password is read from stdin)
    Login { username: String },
    /// Forget the saved backend session
    Logout,
    /// Show the logged-in account
    Whoami,
    /// Manage third-party data connections
    Connections {
        #[command(subcommand)]
        action: Option<ConnectionsAction>,
    },
}

#[derive(Subcommand)]
enum ConnectionsAction {
    /// List connections (default)
    List,
    /// Connect a data source by id
    Connect { id: String },
    /// Disconnect a data source by id
    Disconnect { id: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let file_config = config::load_config().unwrap_or_else(|e| {
        eprintln!("Warning: {e}; using defaults");
        TwinConfig::default()
    });
    let config = config::resolve(&file_config, args.name.as_deref());

    // Initialize file logger - writes to twin.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create("twin.log") {
        let _ = WriteLogger::init(config.log_level, log_config, log_file);
    }

    log::info!("Twin starting up as '{}'", config.twin_name);

    let store = match Store::open_default() {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Cannot open data directory: {e}");
            return ExitCode::FAILURE;
        }
    };

    let Some(command) = args.command else {
        return match twin::tui::run(config, store) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Terminal error: {e}");
                ExitCode::FAILURE
            }
        };
    };

    let client = ApiClient::new(config.api_base_url.clone()).with_session_file(store.auth_path());
    match run_command(command, client, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Command failed: {}", e);
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run_command(
    command: Command,
    mut client: ApiClient,
    config: &ResolvedConfig,
) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Login { username } => {
            let password = read_password(&username)?;
            let user = client.login(&username, &password).await?;
            println!("Logged in to {} as {}", config.api_base_url, user.display_name());
        }
        Command::Logout => {
            client.logout();
            println!("Logged out");
        }
        Command::Whoami => {
            let user = client.me().await?;
            println!("{} <{}>", user.display_name(), user.email);
        }
        Command::Connections { action } => match action.unwrap_or(ConnectionsAction::List) {
            ConnectionsAction::List => {
                let connections = client.connections().await?;
                if connections.is_empty() {
                    println!("No data connections");
                }
                for connection in connections {
                    println!("{}", connection.summary());
                }
            }
            ConnectionsAction::Connect { id } => {
                println!("{}", client.connect(&id).await?.summary());
            }
            ConnectionsAction::Disconnect { id } => {
                println!("{}", client.disconnect(&id).await?.summary());
            }
        },
    }
    Ok(())
}

fn read_password(username: &str) -> io::Result<String> {
    eprint!("Password for {username}: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
