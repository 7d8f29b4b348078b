use crate::{print_error, print_info, QuoteCommands};
use colored::*;
use tidepool_client::wallet::validate_address;
use tidepool_client::LedgerProvider;
use tidepool_core::quote::{required_token_deposit, withdrawal_amounts};
use tidepool_core::{format_amount, parse_amount, SwapDirection};

pub async fn reserves(
    rpc: &str,
    exchange: &str,
    token: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    print_info("Fetching pool reserves...");
    let provider = LedgerProvider::connect(rpc, exchange, token).await?;
    let snapshot = provider.read_reserves().await?;

    println!();
    println!("{}", "Pool Reserves".cyan().bold());
    println!("{}", "─".repeat(50));
    println!("  {}: {}", "Exchange".bold(), provider.exchange().green());
    println!(
        "  {}: {}",
        "Native Reserve".bold(),
        format_amount(snapshot.native_reserve).cyan()
    );
    println!(
        "  {}: {}",
        "Token Reserve".bold(),
        format_amount(snapshot.token_reserve).cyan()
    );
    println!(
        "  {}: {}",
        "LP Supply".bold(),
        format_amount(snapshot.lp_total_supply).cyan()
    );
    println!();

    Ok(())
}

/// Print one account's balances. Also used to refresh the display after a
/// confirmed mutation.
pub async fn show_account(
    provider: &LedgerProvider,
    address: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let balances = provider.read_account_balances(address).await?;

    println!();
    println!("{} {}", "Address:".bold(), address.green());
    println!(
        "  {}: {}",
        "Native".bold(),
        format_amount(balances.native).cyan()
    );
    println!(
        "  {}: {}",
        "Tokens".bold(),
        format_amount(balances.token).cyan()
    );
    println!(
        "  {}: {}",
        "LP Tokens".bold(),
        format_amount(balances.lp_tokens).cyan()
    );
    println!();

    Ok(())
}

pub async fn balances(
    address: &str,
    rpc: &str,
    exchange: &str,
    token: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if !validate_address(address) {
        print_error("Invalid address format. Expected 0x followed by 40 hex digits.");
        return Ok(());
    }
    let provider = LedgerProvider::connect(rpc, exchange, token).await?;
    show_account(&provider, address).await
}

pub async fn quote(
    action: QuoteCommands,
    rpc: &str,
    exchange: &str,
    token: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let provider = LedgerProvider::connect(rpc, exchange, token).await?;
    let snapshot = provider.read_reserves().await?;

    match action {
        QuoteCommands::Deposit { native } => {
            let input = parse_amount(&native)?;
            if snapshot.native_reserve.is_zero() {
                print_info(
                    "Pool is uninitialized: the first deposit chooses both amounts freely.",
                );
                return Ok(());
            }
            let required =
                required_token_deposit(input, snapshot.native_reserve, snapshot.token_reserve)?;
            println!();
            println!(
                "Depositing {} native requires {} tokens to keep the pool ratio.",
                format_amount(input).cyan(),
                format_amount(required).green().bold()
            );
            println!();
        }
        QuoteCommands::Withdraw { lp } => {
            let burn = parse_amount(&lp)?;
            let (native_out, token_out) = withdrawal_amounts(
                burn,
                snapshot.lp_total_supply,
                snapshot.native_reserve,
                snapshot.token_reserve,
            )?;
            println!();
            println!(
                "Burning {} LP tokens returns {} native and {} tokens.",
                format_amount(burn).cyan(),
                format_amount(native_out).green().bold(),
                format_amount(token_out).green().bold()
            );
            println!();
        }
        QuoteCommands::Swap { amount, direction } => {
            let amount_in = parse_amount(&amount)?;
            let direction: SwapDirection = direction.into();
            let (reserve_in, reserve_out) = match direction {
                SwapDirection::NativeToToken => {
                    (snapshot.native_reserve, snapshot.token_reserve)
                }
                SwapDirection::TokenToNative => {
                    (snapshot.token_reserve, snapshot.native_reserve)
                }
            };
            let out = provider.swap_output(amount_in, reserve_in, reserve_out).await?;
            let receive = match direction {
                SwapDirection::NativeToToken => "tokens",
                SwapDirection::TokenToNative => "native",
            };
            println!();
            println!(
                "Swapping {} ({}) yields {} {}.",
                format_amount(amount_in).cyan(),
                direction,
                format_amount(out).green().bold(),
                receive
            );
            println!();
        }
    }

    Ok(())
}
