//! Cleanup of save-location text scraped from wiki tables.
//!
//! Wiki cells carry footnote brackets, file names, footnote asterisks and
//! editing artifacts around the actual directory. The cleanup is an
//! ordered list of rewrite rules applied until the text stops changing,
//! which keeps [`normalize`] idempotent even when one rule exposes work
//! for an earlier one (`dir\*loop_save` only ends in `*` once the
//! literal is gone).

use std::sync::LazyLock;

use regex::Regex;

/// Environment placeholders recognized in wiki paths, in lookup order.
pub const PLACEHOLDERS: [&str; 3] = ["%LOCALAPPDATA%", "%USERPROFILE%", "%APPDATA%"];

const SEPARATORS: [char; 2] = ['\\', '/'];

enum Rule {
    Replace {
        pattern: Regex,
        replacement: &'static str,
    },
    DropFileName,
}

impl Rule {
    fn replace(pattern: &str, replacement: &'static str) -> Self {
        Rule::Replace {
            pattern: Regex::new(pattern).expect("rewrite rule pattern is valid"),
            replacement,
        }
    }

    fn apply(&self, text: &str) -> String {
        let out = match self {
            Rule::Replace {
                pattern,
                replacement,
            } => pattern.replace_all(text, *replacement).into_owned(),
            Rule::DropFileName => drop_file_name(text),
        };
        out.trim().to_string()
    }
}

static RULES: LazyLock<[Rule; 4]> = LazyLock::new(|| {
    [
        // Footnotes and conditions: "[Note 1]", "[citation needed]".
        Rule::replace(r"\[.*?\]", ""),
        Rule::DropFileName,
        Rule::replace(r"\*$", ""),
        Rule::replace("loop_save", ""),
    ]
});

/// Normalizes one scraped save-location cell.
///
/// Returns `None` when nothing but annotations remains.
pub fn normalize(raw: &str) -> Option<String> {
    let mut text = raw.trim().to_string();
    loop {
        let next = apply_rules(&text);
        if next == text {
            break;
        }
        text = next;
    }
    (!text.is_empty()).then_some(text)
}

fn apply_rules(text: &str) -> String {
    let mut text = collapse_placeholder(text);
    for rule in RULES.iter() {
        text = rule.apply(&text);
    }
    text
}

/// Keeps a single occurrence of the first known placeholder present.
///
/// Everything from the second occurrence of that placeholder onward is
/// dropped: wiki cells sometimes repeat the path in another notation.
pub fn collapse_placeholder(text: &str) -> String {
    for placeholder in PLACEHOLDERS {
        if let Some(first) = text.find(placeholder) {
            let after = first + placeholder.len();
            let end = text[after..]
                .find(placeholder)
                .map_or(text.len(), |i| after + i);
            return text[..end].trim().to_string();
        }
    }
    text.trim().to_string()
}

/// Drops the last path component when it looks like a file name.
fn drop_file_name(text: &str) -> String {
    let split = text.rfind(SEPARATORS).map_or(0, |i| i + 1);
    let (head, file) = text.split_at(split);
    if !has_extension(file) {
        return text.to_string();
    }

    let trimmed = head.trim_end_matches(SEPARATORS);
    // Keep the separator of a bare root such as `C:\`.
    if trimmed.is_empty() || trimmed.ends_with(':') {
        head.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Leading dots do not start an extension (`.config` is a directory name).
fn has_extension(file: &str) -> bool {
    file.trim_start_matches('.').contains('.')
}
