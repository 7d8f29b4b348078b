use crate::commands::common;
use crate::{print_error, print_info, print_success, WalletCommands};
use colored::*;
use std::path::Path;
use tidepool_client::{KeyPair, WalletFile};

pub fn handle(action: WalletCommands, config_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        WalletCommands::New { name } => create_new_wallet(&name, config_dir)?,
        WalletCommands::List => list_wallets(config_dir)?,
        WalletCommands::Export { name, output } => export_wallet(&name, config_dir, &output)?,
        WalletCommands::Import { input, name } => import_wallet(&input, config_dir, &name)?,
    }
    Ok(())
}

fn create_new_wallet(name: &str, config_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", "Creating new wallet...".yellow());
    println!();

    let wallet_file = common::wallet_file_path(config_dir, name);
    if wallet_file.exists() {
        print_error(&format!("Wallet '{}' already exists!", name));
        return Ok(());
    }

    let password = common::read_password(true)?;
    if password.len() < 12 {
        print_error("Password must be at least 12 characters!");
        return Ok(());
    }

    print_info("Generating Ed25519 keypair...");
    let keypair = KeyPair::generate();
    let wallet = WalletFile::create(name, &keypair, &password)?;

    std::fs::create_dir_all(config_dir.join("wallets"))?;
    wallet.save(&wallet_file)?;

    println!();
    print_success(&format!("Wallet '{}' created successfully!", name));
    println!();
    println!("{} {}", "Address:".bold(), keypair.address().green());
    println!("{} {}", "Location:".bold(), wallet_file.display());
    println!();
    println!(
        "{}",
        "⚠️  IMPORTANT: Keep your password safe! It cannot be recovered."
            .yellow()
            .bold()
    );

    Ok(())
}

fn list_wallets(config_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let wallet_dir = config_dir.join("wallets");

    if !wallet_dir.exists() {
        print_info("No wallets found. Create one with: tidepool wallet new --name <name>");
        return Ok(());
    }

    println!("{}", "Available wallets:".bold());
    println!();

    let mut count = 0;
    for entry in std::fs::read_dir(&wallet_dir)? {
        let path = entry?.path();
        if path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        match WalletFile::load(&path) {
            Ok(wallet) => {
                println!("  {} {}", "•".cyan(), wallet.name.bold());
                println!("    {}: {}", "Address".dimmed(), wallet.address.green());
                println!();
                count += 1;
            }
            Err(e) => {
                print_error(&format!("Skipping {}: {}", path.display(), e));
            }
        }
    }

    if count == 0 {
        print_info("No wallets found.");
    } else {
        println!(
            "{} {} {}",
            "Total:".bold(),
            count.to_string().cyan(),
            "wallet(s)".dimmed()
        );
    }

    Ok(())
}

fn export_wallet(
    name: &str,
    config_dir: &Path,
    output: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let wallet_file = common::wallet_file_path(config_dir, name);

    if !wallet_file.exists() {
        print_error(&format!("Wallet '{}' not found!", name));
        return Ok(());
    }

    std::fs::copy(&wallet_file, output)?;
    print_success(&format!("Wallet exported to: {}", output.display()));
    println!(
        "{}",
        "⚠️  Keep this file secure! It contains your encrypted private key.".yellow()
    );

    Ok(())
}

fn import_wallet(
    input: &Path,
    config_dir: &Path,
    name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if !input.exists() {
        print_error(&format!("File not found: {}", input.display()));
        return Ok(());
    }

    // Reject anything that does not load as a wallet before it lands in the
    // wallet directory.
    let wallet = WalletFile::load(input)?;

    let wallet_file = common::wallet_file_path(config_dir, name);
    if wallet_file.exists() {
        print_error(&format!("Wallet '{}' already exists!", name));
        return Ok(());
    }

    std::fs::create_dir_all(config_dir.join("wallets"))?;
    std::fs::copy(input, &wallet_file)?;
    print_success(&format!(
        "Wallet imported as '{}' ({})",
        name, wallet.address
    ));

    Ok(())
}
