//! Path utilities: expand ~ and resolve the export output directory.

use std::path::PathBuf;

pub fn expand_tilde(path: &str) -> PathBuf {
    if path.starts_with("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(path.trim_start_matches("~/"));
    }
    PathBuf::from(path)
}

/// `--out` wins over the configured export directory; an empty config
/// value means the current working directory.
pub fn resolve_output_dir(cli_out: Option<&String>, configured: &str) -> PathBuf {
    match cli_out {
        Some(dir) => expand_tilde(dir),
        None if configured.trim().is_empty() => PathBuf::from("."),
        None => expand_tilde(configured),
    }
}
