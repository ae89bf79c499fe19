//! cess-portal: command-line client for CESS decentralized storage.

mod config;
mod prompt;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use portal_chain::JsonRpcBridge;
use portal_client::{
    ClientError, Downloader, ErrorKind, FindResult, Uploader, delete_file, find_files,
};
use portal_scheduler::WsDialer;

use crate::config::PortalConfig;
use crate::prompt::TerminalPassphrase;

#[derive(Parser)]
#[command(
    name = "cess-portal",
    version,
    about = "Upload, download and manage files on CESS decentralized storage"
)]
struct Cli {
    /// Configuration file (defaults to the per-user portal.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Upload a file
    Upload {
        /// File to upload
        path: PathBuf,

        /// Number of backups the network keeps
        #[arg(long, value_name = "N", default_value = "3")]
        backups: String,

        /// Encrypt with this passphrase (the file is public without one)
        #[arg(long, value_name = "KEY")]
        key: Option<String>,
    },
    /// Download a file into the install directory
    Download {
        /// Id printed by `upload`
        file_id: String,
    },
    /// Delete a file
    Delete { file_id: String },
    /// Show one file record, or list the account's files
    Find { file_id: Option<String> },
}

/// Exit code for input validation failures.
const EXIT_INVALID_INPUT: u8 = 2;
/// Exit code when the file exists but is not active yet.
const EXIT_NOT_READY: u8 = 3;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match PortalConfig::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("failed to load configuration: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli.command, &config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {e}");
            exit_code(e.kind())
        }
    }
}

async fn run(command: Command, config: &PortalConfig) -> Result<(), ClientError> {
    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        rpc = %config.chain.rpc_addr,
        "starting cess-portal"
    );

    let client_config = config.client_config();
    let bridge = JsonRpcBridge::new(
        config.chain.rpc_addr.clone(),
        config.chain.account_address.clone(),
    )?;
    let dialer = WsDialer;

    match command {
        Command::Upload { path, backups, key } => {
            let receipt = Uploader::new(&client_config, &bridge, &dialer)
                .upload(&path, &backups, key.as_deref())
                .await?;
            println!("{}", receipt.file_id);
            if let Some(key_path) = &receipt.key_path {
                eprintln!(
                    "passphrase stored in plaintext at {} (keep it safe)",
                    key_path.display()
                );
            }
        }
        Command::Download { file_id } => {
            let receipt = Downloader::new(&client_config, &bridge, &dialer)
                .download(&file_id, &TerminalPassphrase)
                .await?;
            println!("{}", receipt.path.display());
        }
        Command::Delete { file_id } => {
            delete_file(&bridge, &file_id).await?;
            println!("deleted {file_id}");
        }
        Command::Find { file_id } => match find_files(&bridge, file_id.as_deref()).await? {
            FindResult::Record(rec) => {
                println!("id:       {}", rec.id);
                println!("name:     {}", rec.name);
                println!("state:    {}", rec.state);
                println!("public:   {}", rec.is_public);
                if !rec.hash.is_empty() {
                    println!("hash:     {}", rec.hash);
                }
                if rec.backups > 0 {
                    println!("backups:  {}", rec.backups);
                }
                if rec.size_kb > 0 {
                    println!("size:     {} KiB", rec.size_kb);
                }
            }
            FindResult::Listing(ids) => {
                for id in ids {
                    println!("{id}");
                }
            }
        },
    }

    Ok(())
}

/// Maps an error class to the process exit code.
fn exit_code(kind: ErrorKind) -> ExitCode {
    match kind {
        ErrorKind::InputValidation => ExitCode::from(EXIT_INVALID_INPUT),
        ErrorKind::NotReady => ExitCode::from(EXIT_NOT_READY),
        _ => ExitCode::FAILURE,
    }
}
