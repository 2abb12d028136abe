//! Log file location and per-run rotation.

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use directories::ProjectDirs;

/// Archived runs kept next to the active log.
const KEEP_ARCHIVES: usize = 10;

const DEFAULT_LOG_NAME: &str = "pageselect.log";

/// `pageselect.log` in the user cache directory.
///
/// - Linux: `$XDG_CACHE_HOME/pageselect` or `~/.cache/pageselect`
/// - macOS: `~/Library/Caches/dev.pageselect.pageselect`
/// - Windows: `C:\Users\<User>\AppData\Local\pageselect\pageselect\cache`
pub fn default_log_file() -> Option<PathBuf> {
    ProjectDirs::from("dev", "pageselect", "pageselect")
        .map(|dirs| dirs.cache_dir().join(DEFAULT_LOG_NAME))
}

/// Makes `path` ready for a new run.
///
/// Creates the parent directory, moves a previous log aside as
/// `<stem>-<timestamp>.<ext>` and prunes the oldest archives of that log.
pub fn prepare_log_file(path: &Path) -> io::Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let (stem, ext) = split_name(path);
    if path.exists() {
        let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        fs::rename(path, dir.join(format!("{stem}-{stamp}.{ext}")))?;
    }

    prune_archives(dir, &stem, &ext)
}

fn split_name(path: &Path) -> (String, String) {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "pageselect".to_string());
    let ext = path
        .extension()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "log".to_string());
    (stem, ext)
}

/// Archive names embed a sortable timestamp, so name order is age order.
fn prune_archives(dir: &Path, stem: &str, ext: &str) -> io::Result<()> {
    let prefix = format!("{stem}-");
    let suffix = format!(".{ext}");

    let mut archives: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(&prefix) && n.ends_with(&suffix))
        })
        .collect();

    if archives.len() <= KEEP_ARCHIVES {
        return Ok(());
    }
    archives.sort();
    let excess = archives.len() - KEEP_ARCHIVES;
    for old in &archives[..excess] {
        fs::remove_file(old)?;
    }
    Ok(())
}
