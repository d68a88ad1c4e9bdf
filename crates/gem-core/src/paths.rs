//! Configuration search locations and path expansion.
//!
//! # Search order
//!
//! - Linux: `/etc/pd/gem.conf`, `~/.pd/gem.conf`
//! - macOS: `/Library/Pd/gem.conf`, `~/Library/Pd/gem.conf`
//! - Windows: `%CommonProgramFiles%\Pd\gem.conf`, `%AppData%\Pd\gem.conf`
//!
//! followed by `gem.conf` in the working directory.

use std::path::PathBuf;

/// File name of the settings file in every search directory.
pub const SETTINGS_FILE: &str = "gem.conf";

/// Returns the platform directories searched for [`SETTINGS_FILE`], system
/// directory first. Entries are unexpanded.
#[must_use]
pub fn config_dirs() -> &'static [&'static str] {
    #[cfg(target_os = "linux")]
    {
        &["/etc/pd", "~/.pd"]
    }
    #[cfg(target_os = "macos")]
    {
        &["/Library/Pd", "~/Library/Pd"]
    }
    #[cfg(target_os = "windows")]
    {
        &["%CommonProgramFiles%\\Pd", "%AppData%\\Pd"]
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        &[]
    }
}

/// Expands `~`, `$VAR`, `${VAR}` and `%VAR%` in a directory entry.
///
/// A leading `~` becomes the home directory. Unset `$` variables expand to
/// nothing; unset `%` variables are left as written.
pub fn expand(entry: &str, env: &dyn Fn(&str) -> Option<String>) -> PathBuf {
    let mut out = String::new();
    let mut rest = entry;

    if let Some(after) = rest.strip_prefix('~') {
        if after.is_empty() || after.starts_with('/') || after.starts_with('\\') {
            if let Some(home) = dirs::home_dir() {
                out.push_str(&home.to_string_lossy());
                rest = after;
            }
        }
    }

    while let Some(pos) = rest.find(|c: char| c == '$' || c == '%') {
        out.push_str(&rest[..pos]);
        let marker = rest.as_bytes()[pos];
        let tail = &rest[pos + 1..];

        if marker == b'%' {
            match tail.find('%') {
                Some(end) if end > 0 => {
                    let name = &tail[..end];
                    match env(name) {
                        Some(value) => out.push_str(&value),
                        None => {
                            out.push('%');
                            out.push_str(name);
                            out.push('%');
                        }
                    }
                    rest = &tail[end + 1..];
                }
                _ => {
                    out.push('%');
                    rest = tail;
                }
            }
            continue;
        }

        let (name, next) = if let Some(braced) = tail.strip_prefix('{') {
            match braced.find('}') {
                Some(end) => (&braced[..end], &braced[end + 1..]),
                None => ("", tail),
            }
        } else {
            let end = tail
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(tail.len());
            (&tail[..end], &tail[end..])
        };

        if name.is_empty() {
            out.push('$');
        } else if let Some(value) = env(name) {
            out.push_str(&value);
        }
        rest = next;
    }
    out.push_str(rest);
    PathBuf::from(out)
}

/// Returns every settings file location in merge order.
pub fn settings_files(env: &dyn Fn(&str) -> Option<String>) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = config_dirs()
        .iter()
        .map(|dir| expand(dir, env).join(SETTINGS_FILE))
        .collect();
    files.push(PathBuf::from(SETTINGS_FILE));
    files
}
