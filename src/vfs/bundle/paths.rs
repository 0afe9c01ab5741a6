/*!
 * Bundle Path Normalization
 * Archive entry names and lookup paths share one key form
 */

use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR, MAIN_SEPARATOR_STR};

/// Key of the bundle root directory
pub const ROOT: &str = ".";

/// Convert an archive entry name (always `/`-separated) into a filesystem key
pub(super) fn entry_key(name: &str) -> PathBuf {
    normalize(Path::new(&name.replace('/', MAIN_SEPARATOR_STR)))
}

/// Normalize a lookup path into key form
///
/// Separators become the host separator, `.`/`..` and repeated separators are cleaned,
/// and the result is relative to the bundle root. The root itself is `"."`.
pub(super) fn normalize(path: &Path) -> PathBuf {
    let native = path.to_string_lossy().replace('/', MAIN_SEPARATOR_STR);
    let rooted = Path::new(MAIN_SEPARATOR_STR).join(native.trim_start_matches(MAIN_SEPARATOR));
    let cleaned = PathBuf::from(path_clean::clean(&rooted));

    let key: PathBuf = cleaned
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect();

    if key.as_os_str().is_empty() {
        PathBuf::from(ROOT)
    } else {
        key
    }
}

/// Every proper ancestor of `key`, nearest first, ending with the root
pub(super) fn ancestors(key: &Path) -> impl Iterator<Item = PathBuf> + '_ {
    key.ancestors().skip(1).map(|p| {
        if p.as_os_str().is_empty() {
            PathBuf::from(ROOT)
        } else {
            p.to_path_buf()
        }
    })
}
