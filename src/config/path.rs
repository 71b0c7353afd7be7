//! Path normalization for rsync locations and targets
//!
//! rsync treats `src/` and `src` differently, so every location and target
//! handed to it carries exactly one trailing separator.

use std::path::Path;

/// Path separator used in locations and targets
pub const SEPARATOR: char = '/';

/// Path-root marker; also the host value meaning "local machine"
pub const ROOT: &str = "/";

/// Ensure `path` ends with exactly one trailing separator.
///
/// Empty input is returned unchanged. Idempotent.
pub fn normalize(path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    let mut out = path.trim_end_matches(SEPARATOR).to_string();
    out.push(SEPARATOR);
    out
}

/// Join `tail` beneath `base`.
///
/// An absolute `tail` replaces `base` entirely, so a remote host qualifier
/// such as `pasilla:` is lost here and must be re-attached by the caller.
pub fn join(base: &str, tail: &str) -> String {
    Path::new(base).join(tail).to_string_lossy().into_owned()
}
