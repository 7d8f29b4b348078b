use crate::commands::{common, query};
use crate::{print_error, print_info, print_success};
use colored::*;
use std::path::Path;
use tidepool_client::TransactionSubmitter;
use tidepool_core::session::{SessionEvent, SessionView};
use tidepool_core::{format_amount, parse_amount, SwapDirection};

#[allow(clippy::too_many_arguments)]
pub async fn handle(
    wallet: &str,
    amount: &str,
    direction: SwapDirection,
    min_out: Option<&str>,
    no_approve: bool,
    rpc: &str,
    exchange: &str,
    token: &str,
    config_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let amount_in = parse_amount(amount)?;
    if amount_in.is_zero() {
        print_error("Swap amount must be nonzero.");
        return Ok(());
    }

    let (provider, session) = common::connect(rpc, exchange, token).await?;
    let reserves = provider.read_reserves().await?;

    let (reserve_in, reserve_out) = match direction {
        SwapDirection::NativeToToken => (reserves.native_reserve, reserves.token_reserve),
        SwapDirection::TokenToNative => (reserves.token_reserve, reserves.native_reserve),
    };
    // Contract-priced, fee included. The displayed quote doubles as the
    // minimum acceptable output unless the user loosened it explicitly.
    let quoted = provider
        .swap_output(amount_in, reserve_in, reserve_out)
        .await?;
    let mut view = SessionView::default()
        .with_reserves(reserves)
        .with_swap_quote(quoted);

    let receive = match direction {
        SwapDirection::NativeToToken => "tokens",
        SwapDirection::TokenToNative => "native",
    };
    println!(
        "  Swapping {} ({}) yields {} {}.",
        format_amount(amount_in).cyan(),
        direction,
        format_amount(quoted).green().bold(),
        receive
    );

    let min_out = match min_out {
        Some(s) => parse_amount(s)?,
        None => quoted,
    };

    let keypair = common::load_wallet_keypair(wallet, config_dir)?;
    let submitter = TransactionSubmitter::new(provider.clone(), keypair);

    let submitting = session.apply(SessionEvent::SubmissionStarted)?;
    print_info("Submitting swap...");
    let result = submitter
        .swap(direction, amount_in, min_out, !no_approve)
        .await;
    submitting.apply(SessionEvent::SubmissionSettled)?;
    view = view.after_submission(result.is_ok());

    match result {
        Ok(tx) => {
            println!();
            print_success("Swap executed!");
            println!("  {}: {}", "Tx Hash".bold(), tx.hash.green());
            println!(
                "  {}: {} ({})",
                "Sold".bold(),
                format_amount(amount_in).cyan(),
                direction
            );
            println!(
                "  {}: {} {} (minimum)",
                "Received".bold(),
                format_amount(min_out).green(),
                receive
            );
            debug_assert!(view.swap_quote.is_none());
            query::show_account(&provider, submitter.caller()).await?;
        }
        Err(e) => {
            print_error(&format!("Swap failed: {}", e));
        }
    }

    Ok(())
}
