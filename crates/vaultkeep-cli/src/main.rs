//! Vaultkeep command-line wallet
//!
//! Every invocation is a fresh process: the session starts from storage
//! (`sync`), so commands that need an unlocked wallet unlock first.

mod commands;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use directories::ProjectDirs;
use std::path::PathBuf;
use std::sync::Arc;
use vaultkeep_storage_sqlite::{KeystoreCapabilities, MockKeystore, Platform, SqliteStore};
use vaultkeep_wallet_service::{ServiceConfig, WalletService};

/// Database file inside the data directory
const DB_FILE: &str = "vaultkeep.db";

#[derive(Parser)]
#[command(name = "vaultkeep")]
#[command(version, about = "Encrypted key custody for a single wallet", long_about = None)]
struct Cli {
    /// Directory holding the wallet database
    #[arg(long, global = true, env = "VAULTKEEP_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// JSON service configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Wallet password
    #[arg(long, global = true, env = "VAULTKEEP_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Machine-readable output
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a mnemonic or private key into a new vault
    Init {
        /// BIP-39 mnemonic or 64-hex private key
        #[arg(long, env = "VAULTKEEP_SECRET", hide_env_values = true)]
        secret: Option<String>,

        /// Generate a new mnemonic with this many words instead
        #[arg(
            long,
            value_name = "WORDS",
            num_args = 0..=1,
            default_missing_value = "12",
            conflicts_with = "secret"
        )]
        generate: Option<usize>,

        /// Replace an existing vault
        #[arg(long)]
        force: bool,
    },

    /// Show whether a vault exists
    Status,

    /// Check the password against the vault
    Unlock,

    /// Print the decrypted secret
    Reveal,

    /// Sign a message
    Sign {
        /// Account index
        #[arg(short, long, default_value = "0")]
        account: u32,

        /// Message text
        #[arg(short, long, conflicts_with = "hex")]
        message: Option<String>,

        /// Message bytes as hex
        #[arg(long)]
        hex: Option<String>,

        /// BIP-39 passphrase for mnemonic vaults
        #[arg(long, env = "VAULTKEEP_BIP39_PASSPHRASE", hide_env_values = true, default_value = "")]
        bip39_passphrase: String,
    },

    /// Print the public key of an account
    Pubkey {
        /// Account index
        #[arg(short, long, default_value = "0")]
        account: u32,

        /// BIP-39 passphrase for mnemonic vaults
        #[arg(long, env = "VAULTKEEP_BIP39_PASSPHRASE", hide_env_values = true, default_value = "")]
        bip39_passphrase: String,
    },

    /// Check a signature against a public key
    Verify {
        /// Public key as hex
        #[arg(long)]
        public_key: String,

        /// Signature as hex
        #[arg(long)]
        signature: String,

        /// Message text
        #[arg(short, long, conflicts_with = "hex")]
        message: Option<String>,

        /// Message bytes as hex
        #[arg(long)]
        hex: Option<String>,
    },

    /// Change the vault password
    Passwd {
        /// New password
        #[arg(long, env = "VAULTKEEP_NEW_PASSWORD", hide_env_values = true)]
        new_password: String,
    },

    /// Delete the vault
    Wipe {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },

    /// Display currency
    Currency {
        #[command(subcommand)]
        action: CurrencyAction,
    },
}

#[derive(Subcommand)]
enum CurrencyAction {
    /// Show the current currency
    Get,
    /// Set the currency
    Set {
        /// Currency code, e.g. usd
        code: String,
    },
    /// Return to the default currency
    Reset,
    /// List supported codes
    List,
}

/// Options shared by command handlers
pub struct GlobalOpts {
    /// Wallet password, if given
    pub password: Option<String>,
    /// Machine-readable output
    pub json: bool,
}

impl GlobalOpts {
    /// Password or an error naming how to pass it
    pub fn password(&self) -> Result<&str> {
        self.password
            .as_deref()
            .context("password required (--password or VAULTKEEP_PASSWORD)")
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json = cli.json;

    if let Err(e) = run(cli).await {
        output::print_error(&e, json);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => ServiceConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ServiceConfig::default(),
    };

    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => default_data_dir()?,
    };
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating data directory {}", data_dir.display()))?;
    let db_path = data_dir.join(DB_FILE);
    tracing::debug!("Using database {}", db_path.display());

    let store = Arc::new(
        SqliteStore::open(&db_path).with_context(|| format!("opening {}", db_path.display()))?,
    );
    // No native keystore bridge in the terminal build
    let keystore = Arc::new(MockKeystore::with_capabilities(KeystoreCapabilities {
        platform: Platform::current(),
        ..Default::default()
    }));

    let service = WalletService::new(store, keystore, config)?;
    service.sync().await?;

    let opts = GlobalOpts {
        password: cli.password,
        json: cli.json,
    };

    match cli.command {
        Commands::Init {
            secret,
            generate,
            force,
        } => {
            let secret = match (secret, generate) {
                (Some(secret), None) => commands::InitSecret::Given(secret),
                (None, Some(words)) => commands::InitSecret::Generate(words),
                _ => anyhow::bail!("pass --secret or --generate"),
            };
            commands::init(&service, &opts, secret, force).await
        }
        Commands::Status => commands::status(&service, &opts).await,
        Commands::Unlock => commands::unlock(&service, &opts).await,
        Commands::Reveal => commands::reveal(&service, &opts).await,
        Commands::Sign {
            account,
            message,
            hex: hex_message,
            bip39_passphrase,
        } => {
            let bytes = message_bytes(message, hex_message)?;
            commands::sign(&service, &opts, account, &bip39_passphrase, &bytes).await
        }
        Commands::Pubkey {
            account,
            bip39_passphrase,
        } => commands::pubkey(&service, &opts, account, &bip39_passphrase).await,
        Commands::Verify {
            public_key,
            signature,
            message,
            hex: hex_message,
        } => {
            let bytes = message_bytes(message, hex_message)?;
            commands::verify(&opts, &public_key, &signature, &bytes)
        }
        Commands::Passwd { new_password } => commands::passwd(&service, &opts, &new_password).await,
        Commands::Wipe { yes } => commands::wipe(&service, &opts, yes).await,
        Commands::Currency { action } => match action {
            CurrencyAction::Get => commands::currency_get(&service, &opts),
            CurrencyAction::Set { code } => commands::currency_set(&service, &opts, &code).await,
            CurrencyAction::Reset => commands::currency_reset(&service, &opts).await,
            CurrencyAction::List => commands::currency_list(&opts),
        },
    }
}

fn message_bytes(message: Option<String>, hex_message: Option<String>) -> Result<Vec<u8>> {
    match (message, hex_message) {
        (Some(text), None) => Ok(text.into_bytes()),
        (None, Some(h)) => hex::decode(h.trim()).context("invalid --hex message"),
        _ => anyhow::bail!("pass exactly one of --message or --hex"),
    }
}

fn default_data_dir() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("org", "vaultkeep", "vaultkeep")
        .context("cannot determine a data directory; pass --data-dir")?;
    Ok(dirs.data_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_sign() {
        let cli = Cli::try_parse_from(["vaultkeep", "--password", "pw", "sign", "-a", "2", "-m", "hi"]).unwrap();
        match cli.command {
            Commands::Sign { account, message, .. } => {
                assert_eq!(account, 2);
                assert_eq!(message.as_deref(), Some("hi"));
            }
            _ => panic!("expected sign"),
        }
        assert_eq!(cli.password.as_deref(), Some("pw"));
    }

    #[test]
    fn test_parse_init_generate() {
        let cli = Cli::try_parse_from(["vaultkeep", "init", "--generate"]).unwrap();
        match cli.command {
            Commands::Init { secret, generate, .. } => {
                assert!(secret.is_none());
                assert_eq!(generate, Some(12));
            }
            _ => panic!("expected init"),
        }

        let cli = Cli::try_parse_from(["vaultkeep", "init", "--generate", "24"]).unwrap();
        assert!(matches!(cli.command, Commands::Init { generate: Some(24), .. }));

        assert!(Cli::try_parse_from(["vaultkeep", "init", "--secret", "x", "--generate"]).is_err());
    }

    #[test]
    fn test_message_bytes() {
        assert_eq!(message_bytes(Some("hi".into()), None).unwrap(), b"hi");
        assert_eq!(message_bytes(None, Some("0a0b".into())).unwrap(), vec![10, 11]);
        assert!(message_bytes(None, Some("zz".into())).is_err());
        assert!(message_bytes(None, None).is_err());
    }
}
