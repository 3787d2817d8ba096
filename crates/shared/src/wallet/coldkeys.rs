use anyhow::{Context, Result};
use directories::BaseDirs;
use log::{debug, warn};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

const COLDKEY_PUB_FILENAME: &str = "coldkeypub.txt";

#[derive(Debug, Deserialize)]
struct ColdkeyPub {
    #[serde(rename = "ss58Address")]
    ss58_address: String,
}

/// `~/.bittensor/wallets`, if a home directory can be resolved.
pub fn default_wallet_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(".bittensor").join("wallets"))
}

/// Collects the public coldkey address of every wallet under `path`.
///
/// Each wallet is a directory holding a `coldkeypub.txt` JSON file. A missing
/// wallet directory yields an empty set; unreadable wallets are skipped.
pub fn list_local_coldkeys(path: &Path) -> Result<HashSet<String>> {
    let mut coldkeys = HashSet::new();

    if !path.exists() {
        debug!("Wallet path {path:?} does not exist, no local coldkeys");
        return Ok(coldkeys);
    }

    let entries = fs::read_dir(path)
        .with_context(|| format!("Failed to read wallet path {}", path.display()))?;

    for entry in entries {
        let wallet_dir = entry?.path();
        if !wallet_dir.is_dir() {
            continue;
        }

        let coldkey_file = wallet_dir.join(COLDKEY_PUB_FILENAME);
        if !coldkey_file.exists() {
            continue;
        }

        match read_coldkey(&coldkey_file) {
            Ok(address) => {
                debug!("Found coldkey {address} in {wallet_dir:?}");
                coldkeys.insert(address);
            }
            Err(e) => warn!("Skipping wallet {wallet_dir:?}: {e:#}"),
        }
    }

    Ok(coldkeys)
}

fn read_coldkey(coldkey_file: &Path) -> Result<String> {
    let contents = fs::read_to_string(coldkey_file).context("Failed to read coldkey file")?;
    let coldkey: ColdkeyPub =
        serde_json::from_str(&contents).context("Failed to parse coldkey file")?;
    Ok(coldkey.ss58_address)
}
