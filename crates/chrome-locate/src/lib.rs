//! # chrome-locate
//!
//! Find a Chrome / Chromium executable suitable for headless rendering,
//! so that callers do not need to hard-code browser paths per platform.
//!
//! ## Search order
//!
//! [`locate_chrome`] walks the following chain and returns the first hit:
//!
//! 1. The explicit path passed by the caller (must exist, no fallback).
//! 2. `CHROME_EXECUTABLE_PATH`, then `PUPPETEER_EXECUTABLE_PATH`.
//! 3. The Puppeteer / Chrome-for-Testing cache
//!    (`~/.cache/puppeteer/chrome/<version>/chrome-<platform>/...`),
//!    newest version first.
//! 4. Well-known system install locations for the current OS.
//! 5. Browser binaries found on `PATH`.
//!
//! Auto-detected results (steps 2-5) are cached for the process lifetime.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use chrome_locate::locate_chrome;
//!
//! let chrome = locate_chrome(None).expect("no Chrome installed");
//! println!("using {}", chrome.display());
//! ```

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use thiserror::Error;

// ── Public constants ─────────────────────────────────────────────────────────

/// Primary environment override.
pub const CHROME_PATH_ENV: &str = "CHROME_EXECUTABLE_PATH";

/// Secondary override, honoured for compatibility with Puppeteer setups.
pub const PUPPETEER_PATH_ENV: &str = "PUPPETEER_EXECUTABLE_PATH";

/// Executable names searched on `PATH`, most specific first.
const PATH_NAMES: &[&str] = &[
    "google-chrome-stable",
    "google-chrome",
    "chromium",
    "chromium-browser",
    "chrome",
];

// ── Error type ───────────────────────────────────────────────────────────────

/// Errors returned by chrome-locate.
#[derive(Error, Debug)]
pub enum LocateError {
    /// The caller named an executable that does not exist.
    #[error("Chrome executable not found at '{path}'")]
    MissingExecutable { path: PathBuf },

    /// Nothing in the search chain resolved to a file.
    #[error(
        "No Chrome or Chromium executable found ({searched} locations searched). \
         Install Chrome or set {CHROME_PATH_ENV}."
    )]
    NotFound { searched: usize },
}

// ── Public API ───────────────────────────────────────────────────────────────

static RESOLVED_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Resolve the browser executable to launch.
///
/// An explicit path is returned as-is when it exists and is an error
/// otherwise; it never falls through to auto-detection.
pub fn locate_chrome(explicit: Option<&Path>) -> Result<PathBuf, LocateError> {
    if let Some(path) = explicit {
        return if path.is_file() {
            Ok(path.to_path_buf())
        } else {
            Err(LocateError::MissingExecutable {
                path: path.to_path_buf(),
            })
        };
    }

    if let Some(path) = RESOLVED_PATH.get() {
        return Ok(path.clone());
    }

    let candidates = candidates();
    let found = candidates
        .iter()
        .find(|p| p.is_file())
        .cloned()
        .ok_or(LocateError::NotFound {
            searched: candidates.len(),
        })?;

    let _ = RESOLVED_PATH.set(found.clone());
    Ok(found)
}

/// Every location the auto-detection chain checks, in order.
///
/// Entries are not filtered for existence.
pub fn candidates() -> Vec<PathBuf> {
    let mut out = Vec::new();

    for var in [CHROME_PATH_ENV, PUPPETEER_PATH_ENV] {
        if let Some(value) = std::env::var_os(var).filter(|v| !v.is_empty()) {
            out.push(PathBuf::from(value));
        }
    }

    if let Some(home) = dirs::home_dir() {
        out.extend(puppeteer_cache_candidates(
            &home.join(".cache").join("puppeteer"),
        ));
    }

    out.extend(system_candidates());

    if let Some(path_var) = std::env::var_os("PATH") {
        out.extend(path_candidates(&path_var));
    }

    out
}

/// Chrome-for-Testing binaries under a Puppeteer cache root, newest first.
///
/// Layout: `<root>/chrome/<platform>-<version>/chrome-<platform>/<binary>`.
/// Only the sub-layouts matching the current OS are returned.
pub fn puppeteer_cache_candidates(cache_root: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(cache_root.join("chrome")) else {
        return Vec::new();
    };

    let mut versions: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    versions.sort_by(|a, b| version_key(b).cmp(&version_key(a)).then_with(|| b.cmp(a)));

    versions
        .iter()
        .flat_map(|dir| cache_layouts().iter().map(move |rel| dir.join(rel)))
        .collect()
}

/// Numeric components of a `<platform>-<major>.<minor>.<build>.<patch>` directory name.
fn version_key(dir: &Path) -> Vec<u64> {
    dir.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.rsplit_once('-'))
        .map(|(_, version)| {
            version
                .split('.')
                .map(|part| part.parse().unwrap_or(0))
                .collect()
        })
        .unwrap_or_default()
}

/// `dir/name` for every `PATH` entry and every known browser name.
pub fn path_candidates(path_var: &OsStr) -> Vec<PathBuf> {
    std::env::split_paths(path_var)
        .flat_map(|dir| {
            PATH_NAMES
                .iter()
                .map(move |name| dir.join(executable_name(name)))
        })
        .collect()
}

// ── Internal: platform tables ────────────────────────────────────────────────

fn cache_layouts() -> &'static [&'static str] {
    match (std::env::consts::OS, std::env::consts::ARCH) {
        ("macos", "aarch64") => &[
            "chrome-mac-arm64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing",
        ],
        ("macos", _) => &[
            "chrome-mac-x64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing",
        ],
        ("windows", _) => &["chrome-win64/chrome.exe", "chrome-win32/chrome.exe"],
        _ => &["chrome-linux64/chrome", "chrome-linux/chrome"],
    }
}

fn system_candidates() -> Vec<PathBuf> {
    match std::env::consts::OS {
        "macos" => vec![
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome"),
            PathBuf::from("/Applications/Chromium.app/Contents/MacOS/Chromium"),
        ],
        "windows" => {
            let mut v = vec![
                PathBuf::from(r"C:\Program Files\Google\Chrome\Application\chrome.exe"),
                PathBuf::from(r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe"),
            ];
            if let Some(local) = dirs::data_local_dir() {
                v.push(local.join(r"Google\Chrome\Application\chrome.exe"));
            }
            v
        }
        _ => [
            "/usr/bin/google-chrome-stable",
            "/usr/bin/google-chrome",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
        ]
        .iter()
        .map(PathBuf::from)
        .collect(),
    }
}

fn executable_name(name: &str) -> String {
    if cfg!(windows) {
        format!("{name}.exe")
    } else {
        name.to_string()
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_must_exist() {
        let err = locate_chrome(Some(Path::new("/definitely/not/here/chrome"))).unwrap_err();
        assert!(matches!(err, LocateError::MissingExecutable { .. }));
        assert!(err.to_string().contains("/definitely/not/here/chrome"));
    }

    #[test]
    fn explicit_path_is_returned_verbatim() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let found = locate_chrome(Some(file.path())).unwrap();
        assert_eq!(found, file.path());
    }

    #[test]
    fn puppeteer_cache_lists_newest_version_first() {
        let root = tempfile::tempdir().unwrap();
        for v in ["linux-118.0.5993.70", "linux-121.0.6167.85"] {
            std::fs::create_dir_all(root.path().join("chrome").join(v)).unwrap();
        }

        let found = puppeteer_cache_candidates(root.path());
        let layouts = cache_layouts().len();
        assert_eq!(found.len(), 2 * layouts);
        assert!(found[0].starts_with(root.path().join("chrome/linux-121.0.6167.85")));
        assert!(found[layouts].starts_with(root.path().join("chrome/linux-118.0.5993.70")));
    }

    #[test]
    fn puppeteer_cache_compares_versions_numerically() {
        let root = tempfile::tempdir().unwrap();
        for v in ["linux-99.0.4844.51", "linux-121.0.6167.85", "mac-arm64-121.0.6167.184"] {
            std::fs::create_dir_all(root.path().join("chrome").join(v)).unwrap();
        }

        let found = puppeteer_cache_candidates(root.path());
        let layouts = cache_layouts().len();
        assert!(found[0].starts_with(root.path().join("chrome/mac-arm64-121.0.6167.184")));
        assert!(found[layouts].starts_with(root.path().join("chrome/linux-121.0.6167.85")));
        assert!(found[2 * layouts].starts_with(root.path().join("chrome/linux-99.0.4844.51")));
    }

    #[test]
    fn version_key_reads_dotted_suffix() {
        assert_eq!(version_key(Path::new("linux-121.0.6167.85")), vec![121, 0, 6167, 85]);
        assert_eq!(version_key(Path::new("mac-arm64-99.1")), vec![99, 1]);
        assert!(version_key(Path::new("stray")).is_empty());
    }

    #[test]
    fn missing_cache_root_yields_nothing() {
        let root = tempfile::tempdir().unwrap();
        assert!(puppeteer_cache_candidates(&root.path().join("nope")).is_empty());
    }

    #[test]
    fn path_candidates_cover_every_dir_and_name() {
        let joined = std::env::join_paths(["/opt/a", "/opt/b"]).unwrap();
        let found = path_candidates(&joined);
        assert_eq!(found.len(), 2 * PATH_NAMES.len());
        assert_eq!(found[0], Path::new("/opt/a").join(executable_name("google-chrome-stable")));
        assert!(found[PATH_NAMES.len()].starts_with("/opt/b"));
    }

    #[test]
    fn not_found_message_names_env_override() {
        let msg = LocateError::NotFound { searched: 7 }.to_string();
        assert!(msg.contains("7 locations"));
        assert!(msg.contains(CHROME_PATH_ENV));
    }
}
