use anyhow::Context;
use std::path::PathBuf;
use std::process::Command;

/// Run rustfmt over the given files.
///
/// The binary defaults to `rustfmt` and can be overridden with
/// `VAULT_CODEGEN_RUSTFMT_BIN`.
pub fn format_files(files: &[PathBuf]) -> anyhow::Result<()> {
    if files.is_empty() {
        return Ok(());
    }
    let rustfmt_bin =
        std::env::var("VAULT_CODEGEN_RUSTFMT_BIN").unwrap_or_else(|_| "rustfmt".to_string());

    let status = Command::new(&rustfmt_bin)
        .arg("--edition")
        .arg("2021")
        .args(files)
        .status()
        .with_context(|| format!("Failed to run {rustfmt_bin}"))?;
    if !status.success() {
        anyhow::bail!("rustfmt failed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::sync::{Mutex, OnceLock};

    // Serialize environment mutations to avoid test races
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn run_with_stub(exit_code: i32) -> anyhow::Result<()> {
        let dir = tempfile::tempdir().unwrap();
        let stub = dir.path().join("rustfmt");
        fs::write(&stub, format!("#!/bin/sh\nexit {exit_code}\n")).unwrap();
        let mut perms = fs::metadata(&stub).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&stub, perms).unwrap();
        let target = dir.path().join("lib.rs");
        fs::write(&target, "pub fn f() {}\n").unwrap();

        let _guard = ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap();
        let old_bin = env::var("VAULT_CODEGEN_RUSTFMT_BIN").ok();
        env::set_var("VAULT_CODEGEN_RUSTFMT_BIN", &stub);
        let res = format_files(&[target]);
        match old_bin {
            Some(v) => env::set_var("VAULT_CODEGEN_RUSTFMT_BIN", v),
            None => env::remove_var("VAULT_CODEGEN_RUSTFMT_BIN"),
        }
        res
    }

    #[test]
    fn test_format_files_success() {
        assert!(run_with_stub(0).is_ok());
    }

    #[test]
    fn test_format_files_error() {
        assert!(run_with_stub(1).is_err());
    }

    #[test]
    fn test_format_files_empty_is_noop() {
        assert!(format_files(&[]).is_ok());
    }
}
