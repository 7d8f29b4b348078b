// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TIDEPOOL CLI - Fixed-Pair Exchange Client for Users & Liquidity Providers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use std::path::PathBuf;
use tidepool_core::SwapDirection;

mod commands;

/// Pre-deployed exchange contract this client serves (one fixed pair).
const DEFAULT_EXCHANGE_ADDR: &str = "0xd54b47f8e6a1b97f3a69a6a60cb5cb0d0d623d2b";
/// The exchange's paired token contract.
const DEFAULT_TOKEN_ADDR: &str = "0x9f8a2ce4358146bf8e8f8c67b675e4b12cf4cd9c";

#[derive(Parser)]
#[command(name = "tidepool")]
#[command(about = "Tidepool CLI - AMM Exchange & Liquidity Management", long_about = None)]
#[command(version)]
struct Cli {
    /// RPC endpoint URL (reads TIDEPOOL_RPC_URL env var, or defaults to http://localhost:3030)
    #[arg(
        short,
        long,
        env = "TIDEPOOL_RPC_URL",
        default_value = "http://localhost:3030"
    )]
    rpc: String,

    /// Exchange contract address
    #[arg(long, env = "TIDEPOOL_EXCHANGE_ADDR", default_value = DEFAULT_EXCHANGE_ADDR)]
    exchange: String,

    /// Token contract address
    #[arg(long, env = "TIDEPOOL_TOKEN_ADDR", default_value = DEFAULT_TOKEN_ADDR)]
    token: String,

    /// Config directory (default: ~/.tidepool)
    #[arg(short, long)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Wallet management
    Wallet {
        #[command(subcommand)]
        action: WalletCommands,
    },

    /// Show pool reserves and LP supply
    Reserves,

    /// Show an account's native, token, and LP balances
    Balances {
        /// Account address (0x...)
        address: String,
    },

    /// Compute a quote without submitting anything
    Quote {
        #[command(subcommand)]
        action: QuoteCommands,
    },

    /// Liquidity management
    Liquidity {
        #[command(subcommand)]
        action: LiquidityCommands,
    },

    /// Swap between the native currency and the token
    Swap {
        /// Wallet name
        #[arg(short, long)]
        wallet: String,

        /// Amount to swap (decimal, e.g. 1.5)
        #[arg(short, long)]
        amount: String,

        /// Swap direction
        #[arg(short, long)]
        direction: Direction,

        /// Minimum acceptable output (decimal; defaults to the quoted output)
        #[arg(long)]
        min_out: Option<String>,

        /// Fail instead of approving the allowance automatically
        #[arg(long, default_value = "false")]
        no_approve: bool,
    },
}

#[derive(Subcommand)]
enum WalletCommands {
    /// Create new wallet
    New {
        /// Wallet name
        #[arg(short, long)]
        name: String,
    },

    /// List all wallets
    List,

    /// Export wallet (encrypted)
    Export {
        /// Wallet name
        name: String,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Import wallet
    Import {
        /// Input file path
        input: PathBuf,

        /// Wallet name
        #[arg(short, long)]
        name: String,
    },
}

#[derive(Subcommand)]
enum QuoteCommands {
    /// Token amount required alongside a native deposit
    Deposit {
        /// Native amount to add (decimal)
        #[arg(short, long)]
        native: String,
    },

    /// Native and token amounts returned for burning LP tokens
    Withdraw {
        /// LP amount to burn (decimal)
        #[arg(short, long)]
        lp: String,
    },

    /// Expected output of a swap (contract-priced)
    Swap {
        /// Input amount (decimal)
        #[arg(short, long)]
        amount: String,

        /// Swap direction
        #[arg(short, long)]
        direction: Direction,
    },
}

#[derive(Subcommand)]
enum LiquidityCommands {
    /// Add liquidity to the pool
    Add {
        /// Wallet name
        #[arg(short, long)]
        wallet: String,

        /// Native amount to deposit (decimal)
        #[arg(short, long)]
        native: String,

        /// Token amount (decimal). Required for the first deposit into an
        /// empty pool; otherwise derived from the pool ratio.
        #[arg(short, long)]
        token: Option<String>,

        /// Fail instead of approving the allowance automatically
        #[arg(long, default_value = "false")]
        no_approve: bool,
    },

    /// Remove liquidity by burning LP tokens
    Remove {
        /// Wallet name
        #[arg(short, long)]
        wallet: String,

        /// LP amount to burn (decimal)
        #[arg(short, long)]
        lp: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Direction {
    /// Pay native currency, receive tokens
    NativeToToken,
    /// Pay tokens, receive native currency
    TokenToNative,
}

impl From<Direction> for SwapDirection {
    fn from(d: Direction) -> Self {
        match d {
            Direction::NativeToToken => SwapDirection::NativeToToken,
            Direction::TokenToNative => SwapDirection::TokenToNative,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    print_banner();

    let config_dir = cli.config_dir.unwrap_or_else(|| {
        dirs::home_dir()
            .unwrap_or_else(|| std::path::PathBuf::from("."))
            .join(".tidepool")
    });
    std::fs::create_dir_all(&config_dir)?;

    match cli.command {
        Commands::Wallet { action } => commands::wallet::handle(action, &config_dir)?,
        Commands::Reserves => {
            commands::query::reserves(&cli.rpc, &cli.exchange, &cli.token).await?
        }
        Commands::Balances { address } => {
            commands::query::balances(&address, &cli.rpc, &cli.exchange, &cli.token).await?
        }
        Commands::Quote { action } => {
            commands::query::quote(action, &cli.rpc, &cli.exchange, &cli.token).await?
        }
        Commands::Liquidity { action } => {
            commands::liquidity::handle(action, &cli.rpc, &cli.exchange, &cli.token, &config_dir)
                .await?
        }
        Commands::Swap {
            wallet,
            amount,
            direction,
            min_out,
            no_approve,
        } => {
            commands::swap::handle(
                &wallet,
                &amount,
                direction.into(),
                min_out.as_deref(),
                no_approve,
                &cli.rpc,
                &cli.exchange,
                &cli.token,
                &config_dir,
            )
            .await?
        }
    }

    Ok(())
}

fn print_banner() {
    println!("{}", "╔══════════════════════════════════════╗".cyan());
    println!(
        "{}",
        "║   TIDEPOOL - Exchange Client v0.4    ║".cyan().bold()
    );
    println!("{}", "╚══════════════════════════════════════╝".cyan());
    println!();
}

pub(crate) fn print_success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg);
}

pub(crate) fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red().bold(), msg);
}

pub(crate) fn print_info(msg: &str) {
    println!("{} {}", "ℹ".blue().bold(), msg);
}

// ─────────────────────────────────────────────────────────────────
// UNIT TESTS
// ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_wallet_new() {
        let cli = Cli::try_parse_from(["tidepool", "wallet", "new", "--name", "test_wallet"]);
        assert!(cli.is_ok(), "Failed to parse: {:?}", cli.err());
        match cli.unwrap().command {
            Commands::Wallet {
                action: WalletCommands::New { name },
            } => assert_eq!(name, "test_wallet"),
            _ => panic!("Expected Wallet::New"),
        }
    }

    #[test]
    fn test_cli_wallet_list() {
        let cli = Cli::try_parse_from(["tidepool", "wallet", "list"]);
        assert!(cli.is_ok());
        match cli.unwrap().command {
            Commands::Wallet {
                action: WalletCommands::List,
            } => {}
            _ => panic!("Expected Wallet::List"),
        }
    }

    #[test]
    fn test_cli_wallet_export() {
        let cli = Cli::try_parse_from([
            "tidepool", "wallet", "export", "mywallet", "--output", "/tmp/w.json",
        ]);
        assert!(cli.is_ok());
        match cli.unwrap().command {
            Commands::Wallet {
                action: WalletCommands::Export { name, output },
            } => {
                assert_eq!(name, "mywallet");
                assert_eq!(output, PathBuf::from("/tmp/w.json"));
            }
            _ => panic!("Expected Wallet::Export"),
        }
    }

    #[test]
    fn test_cli_reserves() {
        let cli = Cli::try_parse_from(["tidepool", "reserves"]);
        assert!(cli.is_ok());
        match cli.unwrap().command {
            Commands::Reserves => {}
            _ => panic!("Expected Reserves"),
        }
    }

    #[test]
    fn test_cli_balances() {
        let cli = Cli::try_parse_from(["tidepool", "balances", "0xabc123"]);
        assert!(cli.is_ok());
        match cli.unwrap().command {
            Commands::Balances { address } => assert_eq!(address, "0xabc123"),
            _ => panic!("Expected Balances"),
        }
    }

    #[test]
    fn test_cli_quote_deposit() {
        let cli = Cli::try_parse_from(["tidepool", "quote", "deposit", "--native", "10"]);
        assert!(cli.is_ok());
        match cli.unwrap().command {
            Commands::Quote {
                action: QuoteCommands::Deposit { native },
            } => assert_eq!(native, "10"),
            _ => panic!("Expected Quote::Deposit"),
        }
    }

    #[test]
    fn test_cli_quote_swap_direction() {
        let cli = Cli::try_parse_from([
            "tidepool",
            "quote",
            "swap",
            "--amount",
            "1.5",
            "--direction",
            "token-to-native",
        ])
        .unwrap();
        match cli.command {
            Commands::Quote {
                action: QuoteCommands::Swap { amount, direction },
            } => {
                assert_eq!(amount, "1.5");
                assert_eq!(direction, Direction::TokenToNative);
            }
            _ => panic!("Expected Quote::Swap"),
        }
    }

    #[test]
    fn test_cli_liquidity_add_with_optional_token() {
        let cli = Cli::try_parse_from([
            "tidepool",
            "liquidity",
            "add",
            "--wallet",
            "w1",
            "--native",
            "10",
            "--token",
            "50",
        ])
        .unwrap();
        match cli.command {
            Commands::Liquidity {
                action:
                    LiquidityCommands::Add {
                        wallet,
                        native,
                        token,
                        no_approve,
                    },
            } => {
                assert_eq!(wallet, "w1");
                assert_eq!(native, "10");
                assert_eq!(token.as_deref(), Some("50"));
                assert!(!no_approve);
            }
            _ => panic!("Expected Liquidity::Add"),
        }
    }

    #[test]
    fn test_cli_liquidity_remove() {
        let cli = Cli::try_parse_from([
            "tidepool", "liquidity", "remove", "--wallet", "w1", "--lp", "3",
        ]);
        assert!(cli.is_ok());
    }

    #[test]
    fn test_cli_swap() {
        let cli = Cli::try_parse_from([
            "tidepool",
            "swap",
            "--wallet",
            "w1",
            "--amount",
            "2",
            "--direction",
            "native-to-token",
            "--no-approve",
        ])
        .unwrap();
        match cli.command {
            Commands::Swap {
                wallet,
                amount,
                direction,
                min_out,
                no_approve,
            } => {
                assert_eq!(wallet, "w1");
                assert_eq!(amount, "2");
                assert_eq!(direction, Direction::NativeToToken);
                assert_eq!(min_out, None);
                assert!(no_approve);
            }
            _ => panic!("Expected Swap"),
        }
    }

    #[test]
    fn test_cli_default_rpc_url() {
        let cli = Cli::try_parse_from(["tidepool", "reserves"]).unwrap();
        assert_eq!(cli.rpc, "http://localhost:3030");
    }

    #[test]
    fn test_cli_default_contract_addresses() {
        let cli = Cli::try_parse_from(["tidepool", "reserves"]).unwrap();
        assert_eq!(cli.exchange, DEFAULT_EXCHANGE_ADDR);
        assert_eq!(cli.token, DEFAULT_TOKEN_ADDR);
    }

    #[test]
    fn test_cli_custom_rpc_url() {
        let cli =
            Cli::try_parse_from(["tidepool", "--rpc", "http://node.example:9000", "reserves"])
                .unwrap();
        assert_eq!(cli.rpc, "http://node.example:9000");
    }

    #[test]
    fn test_cli_missing_required_args() {
        // swap without --amount should fail
        let result = Cli::try_parse_from([
            "tidepool",
            "swap",
            "--wallet",
            "w1",
            "--direction",
            "native-to-token",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_rejects_unknown_direction() {
        let result = Cli::try_parse_from([
            "tidepool",
            "quote",
            "swap",
            "--amount",
            "1",
            "--direction",
            "sideways",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_unknown_subcommand() {
        let result = Cli::try_parse_from(["tidepool", "foobar"]);
        assert!(result.is_err());
    }
}
