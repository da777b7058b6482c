use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Environment variable naming the database file.
pub(crate) const DB_ENV_VAR: &str = "SPENT_DB";
const DB_FILE_NAME: &str = "spent.db";

/// Where the database lives: `--db` wins over `SPENT_DB`, which wins over
/// the platform data directory. The parent directory is created if missing.
pub(crate) fn resolve_db_path(cli_override: Option<&str>) -> Result<PathBuf> {
    let path = choose_db_path(cli_override, std::env::var_os(DB_ENV_VAR))?;
    ensure_parent_dir(&path)?;
    Ok(path)
}

fn choose_db_path(cli_override: Option<&str>, env_value: Option<OsString>) -> Result<PathBuf> {
    if let Some(path) = cli_override.filter(|p| !p.trim().is_empty()) {
        return Ok(PathBuf::from(expand_home(path)));
    }
    if let Some(path) = env_value.filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    default_db_path()
}

fn default_db_path() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "spent", "Spent")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(proj_dirs.data_dir().join(DB_FILE_NAME))
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create data directory: {}", dir.display()))?;
    }
    Ok(())
}

pub(crate) fn expand_home(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}
