use crate::commands::{common, query};
use crate::{print_error, print_info, print_success, LiquidityCommands};
use colored::*;
use std::path::Path;
use tidepool_client::TransactionSubmitter;
use tidepool_core::quote::{required_token_deposit, withdrawal_amounts};
use tidepool_core::session::{SessionEvent, SessionView};
use tidepool_core::{format_amount, parse_amount, U256};

pub async fn handle(
    action: LiquidityCommands,
    rpc: &str,
    exchange: &str,
    token: &str,
    config_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        LiquidityCommands::Add {
            wallet,
            native,
            token: token_amount,
            no_approve,
        } => {
            add(
                &wallet,
                &native,
                token_amount.as_deref(),
                no_approve,
                rpc,
                exchange,
                token,
                config_dir,
            )
            .await
        }
        LiquidityCommands::Remove { wallet, lp } => {
            remove(&wallet, &lp, rpc, exchange, token, config_dir).await
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn add(
    wallet: &str,
    native: &str,
    token_amount: Option<&str>,
    no_approve: bool,
    rpc: &str,
    exchange: &str,
    token: &str,
    config_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let native_amount = parse_amount(native)?;
    if native_amount.is_zero() {
        print_error("Native amount must be nonzero.");
        return Ok(());
    }

    let (provider, session) = common::connect(rpc, exchange, token).await?;
    let reserves = provider.read_reserves().await?;
    let mut view = SessionView::default().with_reserves(reserves);

    let token_amount = if reserves.native_reserve.is_zero() {
        // First deposit into an empty pool: no ratio constraint, the user
        // chooses both amounts.
        match token_amount {
            Some(t) => parse_amount(t)?,
            None => {
                print_error("Pool is uninitialized: the first deposit needs an explicit --token amount.");
                return Ok(());
            }
        }
    } else {
        if token_amount.is_some() {
            print_info("Pool already has liquidity; the token amount is set by the pool ratio.");
        }
        let required =
            required_token_deposit(native_amount, reserves.native_reserve, reserves.token_reserve)?;
        view = view.with_deposit_quote(required);
        println!(
            "  Depositing {} native requires {} tokens.",
            format_amount(native_amount).cyan(),
            format_amount(required).green().bold()
        );
        required
    };

    if token_amount.is_zero() {
        print_error("Token amount must be nonzero.");
        return Ok(());
    }

    let keypair = common::load_wallet_keypair(wallet, config_dir)?;
    let submitter = TransactionSubmitter::new(provider.clone(), keypair);

    let submitting = session.apply(SessionEvent::SubmissionStarted)?;
    print_info("Submitting liquidity deposit...");
    let result = submitter
        .deposit_liquidity(token_amount, native_amount, !no_approve)
        .await;
    submitting.apply(SessionEvent::SubmissionSettled)?;
    view = view.after_submission(result.is_ok());

    match result {
        Ok(tx) => {
            println!();
            print_success("Liquidity added!");
            println!("  {}: {}", "Tx Hash".bold(), tx.hash.green());
            println!(
                "  {}: {} native / {} tokens",
                "Deposited".bold(),
                format_amount(native_amount).cyan(),
                format_amount(token_amount).cyan()
            );
            // The confirmed deposit invalidated every displayed amount;
            // re-derive from the ledger (minted LP shows up here).
            debug_assert!(view.deposit_quote.is_none());
            query::show_account(&provider, submitter.caller()).await?;
        }
        Err(e) => {
            // Quotes stay in place: a failed submission changed nothing.
            print_error(&format!("Add liquidity failed: {}", e));
        }
    }

    Ok(())
}

async fn remove(
    wallet: &str,
    lp: &str,
    rpc: &str,
    exchange: &str,
    token: &str,
    config_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let lp_amount = parse_amount(lp)?;
    if lp_amount.is_zero() {
        print_error("LP amount must be nonzero.");
        return Ok(());
    }

    let (provider, session) = common::connect(rpc, exchange, token).await?;
    let reserves = provider.read_reserves().await?;

    // Advisory only; the ledger computes the actual payout.
    let (native_out, token_out) = withdrawal_amounts(
        lp_amount,
        reserves.lp_total_supply,
        reserves.native_reserve,
        reserves.token_reserve,
    )?;
    let mut view = SessionView::default()
        .with_reserves(reserves)
        .with_withdrawal_quote(native_out, token_out);
    println!(
        "  Burning {} LP tokens returns about {} native and {} tokens.",
        format_amount(lp_amount).cyan(),
        format_amount(native_out).green(),
        format_amount(token_out).green()
    );

    let keypair = common::load_wallet_keypair(wallet, config_dir)?;
    let submitter = TransactionSubmitter::new(provider.clone(), keypair);

    let submitting = session.apply(SessionEvent::SubmissionStarted)?;
    print_info("Submitting liquidity withdrawal...");
    let result = submitter.withdraw_liquidity(lp_amount).await;
    submitting.apply(SessionEvent::SubmissionSettled)?;
    view = view.after_submission(result.is_ok());

    match result {
        Ok(tx) => {
            println!();
            print_success("Liquidity removed!");
            println!("  {}: {}", "Tx Hash".bold(), tx.hash.green());
            println!(
                "  {}: {}",
                "LP Burned".bold(),
                format_amount(lp_amount).cyan()
            );
            debug_assert_eq!(view.withdrawal_quote, None::<(U256, U256)>);
            query::show_account(&provider, submitter.caller()).await?;
        }
        Err(e) => {
            print_error(&format!("Remove liquidity failed: {}", e));
        }
    }

    Ok(())
}
