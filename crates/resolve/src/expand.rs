//! Expansion of candidate paths into concrete local paths.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::types::USER_MARKER;

/// `%VAR%`, `${VAR}` and `$VAR` references.
static ENV_VAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"%([A-Za-z_][A-Za-z0-9_()]*)%|\$\{([A-Za-z_][A-Za-z0-9_]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)")
        .expect("valid env var pattern")
});

/// Replaces every user marker in `path` with `identity`.
pub fn expand_user(path: &str, identity: &str) -> String {
    path.replace(USER_MARKER, identity)
}

/// Expands environment variable references through `lookup`.
///
/// References to unknown variables are left verbatim.
pub fn expand_vars(text: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    ENV_VAR
        .replace_all(text, |caps: &Captures| {
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .or_else(|| caps.get(3))
                .map_or("", |m| m.as_str());
            lookup(name).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Converts a Windows-style path to this platform's separators.
pub fn to_native_path(path: &str) -> Cow<'_, str> {
    if cfg!(windows) {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(path.replace('\\', "/"))
    }
}
