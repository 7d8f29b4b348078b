use std::path::{Path, PathBuf};

use tidepool_client::{KeyPair, LedgerProvider, WalletFile};
use tidepool_core::session::{SessionEvent, SessionState};

pub fn wallet_file_path(config_dir: &Path, name: &str) -> PathBuf {
    config_dir.join("wallets").join(format!("{}.json", name))
}

/// Password from env var (for automation/scripting) or interactive prompt.
pub fn read_password(confirm: bool) -> Result<String, Box<dyn std::error::Error>> {
    match std::env::var("TIDEPOOL_WALLET_PASSWORD") {
        Ok(p) if !p.is_empty() => Ok(p),
        _ => {
            let password = rpassword::prompt_password("Enter wallet password: ")?;
            if confirm {
                let again = rpassword::prompt_password("Confirm password: ")?;
                if password != again {
                    return Err("Passwords do not match".into());
                }
            }
            Ok(password)
        }
    }
}

/// Shared wallet loader — loads the wallet file, prompts for the password,
/// decrypts the secret key, and verifies the derived address. Used by every
/// command that signs.
pub fn load_wallet_keypair(
    wallet_name: &str,
    config_dir: &Path,
) -> Result<KeyPair, Box<dyn std::error::Error>> {
    let wallet_file = wallet_file_path(config_dir, wallet_name);
    if !wallet_file.exists() {
        return Err(format!(
            "Wallet '{}' not found at {}",
            wallet_name,
            wallet_file.display()
        )
        .into());
    }

    let wallet = WalletFile::load(&wallet_file)?;
    let password = read_password(false)?;
    let keypair = wallet
        .unlock(&password)
        .map_err(|e| format!("Cannot unlock wallet '{}': {}", wallet_name, e))?;
    Ok(keypair)
}

/// Connection walk for mutation flows: Idle → AwaitingConnection →
/// Connected, or back to Idle on failure. The returned state keeps the
/// submission serialization explicit in the calling command.
pub async fn connect(
    rpc: &str,
    exchange: &str,
    token: &str,
) -> Result<(LedgerProvider, SessionState), Box<dyn std::error::Error>> {
    let awaiting = SessionState::Idle.apply(SessionEvent::ConnectRequested)?;
    match LedgerProvider::connect(rpc, exchange, token).await {
        Ok(provider) => {
            let connected = awaiting.apply(SessionEvent::ConnectionEstablished)?;
            Ok((provider, connected))
        }
        Err(e) => {
            awaiting.apply(SessionEvent::ConnectionFailed)?;
            Err(e.into())
        }
    }
}
