//! Host identity bootstrap.
//!
//! Loads the server's private key if the file exists; otherwise generates a
//! fresh ed25519 key, writes it owner-only and uses it from then on. The
//! key is never regenerated while the file is present, so clients keep a
//! stable host fingerprint across restarts.

use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use rand::rngs::OsRng;
use russh::keys::ssh_key::LineEnding;
use russh::keys::{load_secret_key, Algorithm, PrivateKey};

pub fn load_or_create(path: &Path) -> Result<PrivateKey> {
    if path.exists() {
        let key = load_secret_key(path, None)
            .with_context(|| format!("Failed to load host key from {}", path.display()))?;
        info!("Loaded host key from {}", path.display());
        return Ok(key);
    }

    let key = PrivateKey::random(&mut OsRng, Algorithm::Ed25519)
        .context("Failed to generate host key")?;
    let encoded = key
        .to_openssh(LineEnding::LF)
        .context("Failed to encode host key")?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    std::fs::write(path, encoded.as_bytes())
        .with_context(|| format!("Failed to write host key to {}", path.display()))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
            .with_context(|| format!("Failed to restrict permissions on {}", path.display()))?;
    }
    info!("Generated new host key at {}", path.display());
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn generates_then_reloads_same_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("host_key");
        let first = load_or_create(&path).unwrap();
        assert!(path.exists());
        let second = load_or_create(&path).unwrap();
        assert_eq!(
            first.public_key().to_openssh().unwrap(),
            second.public_key().to_openssh().unwrap()
        );
    }

    #[cfg(unix)]
    #[test]
    fn key_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("host_key");
        load_or_create(&path).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
