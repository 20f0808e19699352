//! Wallet service - crypto holdings and backup export
//!
//! Backups are plain JSON files carrying placeholder key material; the
//! dashboard never holds real keys.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{Asset, WalletBackup};

/// Backup file as listed on disk
#[derive(Debug, Clone, Serialize)]
pub struct WalletBackupFile {
    pub name: String,
    pub path: PathBuf,
    pub size_bytes: u64,
}

pub struct WalletService {
    data_dir: PathBuf,
    assets: Vec<Asset>,
}

impl WalletService {
    pub fn new(data_dir: PathBuf, assets: Vec<Asset>) -> Self {
        Self { data_dir, assets }
    }

    fn backups_dir(&self) -> PathBuf {
        self.data_dir.join("backups")
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    /// Find a held asset by symbol, case-insensitively
    pub fn find(&self, symbol: &str) -> Option<&Asset> {
        let symbol = symbol.trim();
        self.assets
            .iter()
            .find(|a| a.symbol.eq_ignore_ascii_case(symbol))
    }

    pub fn total_usd(&self) -> Decimal {
        self.assets.iter().map(|a| a.usd_value).sum()
    }

    pub fn backup(&self) -> Result<WalletBackup> {
        WalletBackup::new(self.assets.clone()).context("Failed to build wallet backup")
    }

    /// Write a backup into the backups directory and return its file
    pub fn export_backup(&self) -> Result<WalletBackupFile> {
        let dir = self.backups_dir();
        fs::create_dir_all(&dir).context("Failed to create backups directory")?;

        let now = Utc::now();
        let name = format!(
            "wallet-backup-{}-{:06}.json",
            now.format("%Y-%m-%dT%H-%M-%S"),
            now.timestamp_subsec_micros()
        );
        let path = dir.join(&name);
        self.export_backup_to(&path)?;

        let size_bytes = fs::metadata(&path)?.len();
        Ok(WalletBackupFile {
            name,
            path,
            size_bytes,
        })
    }

    /// Write a backup to an explicit path
    pub fn export_backup_to(&self, path: &Path) -> Result<WalletBackup> {
        let backup = self.backup()?;
        let content = serde_json::to_string_pretty(&backup)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write backup to {}", path.display()))?;
        Ok(backup)
    }

    /// Read a backup file back and check its checksum
    pub fn read_backup(path: &Path) -> Result<WalletBackup> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let backup: WalletBackup =
            serde_json::from_str(&content).context("Backup file is not valid JSON")?;
        if !backup.verify() {
            anyhow::bail!("Backup checksum does not match its contents");
        }
        Ok(backup)
    }

    /// Exported backups, newest first
    pub fn list_backups(&self) -> Result<Vec<WalletBackupFile>> {
        let dir = self.backups_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()).map(String::from) else {
                continue;
            };
            let size_bytes = fs::metadata(&path)?.len();
            files.push(WalletBackupFile {
                name,
                path,
                size_bytes,
            });
        }

        // Timestamped names sort chronologically
        files.sort_by(|a, b| b.name.cmp(&a.name));
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::demo::demo_assets;
    use crate::domain::{PLACEHOLDER_MNEMONIC, PLACEHOLDER_PRIVATE_KEY};
    use tempfile::TempDir;

    fn service(dir: &TempDir) -> WalletService {
        WalletService::new(dir.path().to_path_buf(), demo_assets())
    }

    #[test]
    fn test_total_usd() {
        let dir = TempDir::new().unwrap();
        let wallet = service(&dir);
        let expected: Decimal = demo_assets().iter().map(|a| a.usd_value).sum();
        assert_eq!(wallet.total_usd(), expected);
        assert_eq!(wallet.find("eth").unwrap().symbol, "ETH");
        assert!(wallet.find("DOGE").is_none());
    }

    #[test]
    fn test_export_and_read_back() {
        let dir = TempDir::new().unwrap();
        let wallet = service(&dir);

        let file = wallet.export_backup().unwrap();
        assert!(file.path.exists());
        assert!(file.size_bytes > 0);

        let backup = WalletService::read_backup(&file.path).unwrap();
        assert_eq!(backup.assets.len(), wallet.assets().len());
        assert_eq!(backup.private_key, PLACEHOLDER_PRIVATE_KEY);
        assert_eq!(backup.mnemonic, PLACEHOLDER_MNEMONIC);

        let listed = wallet.list_backups().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, file.name);
    }

    #[test]
    fn test_tampered_backup_is_rejected() {
        let dir = TempDir::new().unwrap();
        let wallet = service(&dir);
        let path = dir.path().join("backup.json");
        let mut backup = wallet.export_backup_to(&path).unwrap();

        backup.assets[0].balance = Decimal::new(1000, 0);
        fs::write(&path, serde_json::to_string(&backup).unwrap()).unwrap();

        assert!(WalletService::read_backup(&path).is_err());
    }

    #[test]
    fn test_no_backups_yet() {
        let dir = TempDir::new().unwrap();
        assert!(service(&dir).list_backups().unwrap().is_empty());
    }
}
