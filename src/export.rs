use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

/// Write `content` to `path`, creating parent directories.
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create directory {}", parent.display()))?;
        }
    }
    std::fs::write(path, content).with_context(|| format!("write {}", path.display()))
}

/// Write to `out` if given, stdout otherwise.
pub fn write_output(out: Option<&Path>, content: &str) -> Result<()> {
    match out {
        Some(path) => write_file(path, content),
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(content.as_bytes()).context("write stdout")?;
            lock.flush().context("flush stdout")
        }
    }
}

pub fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    let mut out = serde_json::to_string_pretty(value).context("serialize JSON")?;
    out.push('\n');
    Ok(out)
}
