use std::fs;
use std::path::Path;

use crate::SteamError;

/// A value in a text KeyValues document.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Object(KeyValues),
}

/// An ordered list of key/value pairs, as found in `libraryfolders.vdf`
/// and `appmanifest_*.acf`.
///
/// Keys are compared case-insensitively on lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyValues {
    entries: Vec<(String, Value)>,
}

impl KeyValues {
    /// Returns the first value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }

    /// Returns the string stored under `key`, if it is a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.get(key) {
            Some(Value::Str(s)) => Some(s),
            _ => None,
        }
    }

    /// Returns the nested object stored under `key`, if it is an object.
    pub fn get_object(&self, key: &str) -> Option<&KeyValues> {
        match self.get(key) {
            Some(Value::Object(kv)) => Some(kv),
            _ => None,
        }
    }

    /// Iterates over all entries in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Str(String),
    Open,
    Close,
}

/// Reads and parses a text KeyValues file.
pub fn load_vdf(path: &Path) -> Result<KeyValues, SteamError> {
    let text = fs::read_to_string(path)
        .map_err(|e| SteamError::Io(format!("failed to read {}: {e}", path.display())))?;
    parse_vdf(&text)
}

/// Parses text KeyValues data.
pub fn parse_vdf(text: &str) -> Result<KeyValues, SteamError> {
    let tokens = tokenize(text)?;
    let (kv, _) = parse_object(&tokens, 0, false)?;
    Ok(kv)
}

fn parse_object(
    tokens: &[Token],
    mut pos: usize,
    nested: bool,
) -> Result<(KeyValues, usize), SteamError> {
    let mut kv = KeyValues::default();

    loop {
        match tokens.get(pos) {
            None if nested => {
                return Err(SteamError::Vdf("unexpected end of data in object".into()));
            }
            None => return Ok((kv, pos)),
            Some(Token::Close) if nested => return Ok((kv, pos + 1)),
            Some(Token::Close) => {
                return Err(SteamError::Vdf(format!("unbalanced '}}' at token {pos}")));
            }
            Some(Token::Open) => {
                return Err(SteamError::Vdf(format!("expected key at token {pos}, got '{{'")));
            }
            Some(Token::Str(key)) => match tokens.get(pos + 1) {
                Some(Token::Str(val)) => {
                    kv.entries.push((key.clone(), Value::Str(val.clone())));
                    pos += 2;
                }
                Some(Token::Open) => {
                    let (child, new_pos) = parse_object(tokens, pos + 2, true)?;
                    kv.entries.push((key.clone(), Value::Object(child)));
                    pos = new_pos;
                }
                _ => {
                    return Err(SteamError::Vdf(format!("missing value for key '{key}'")));
                }
            },
        }
    }
}

fn tokenize(text: &str) -> Result<Vec<Token>, SteamError> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '{' => {
                chars.next();
                tokens.push(Token::Open);
            }
            '}' => {
                chars.next();
                tokens.push(Token::Close);
            }
            '/' => {
                chars.next();
                if chars.peek() != Some(&'/') {
                    return Err(SteamError::Vdf("stray '/' outside of a string".into()));
                }
                // Comment runs to end of line.
                for c in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
            }
            '[' => {
                // Platform conditional such as [$WIN32]; not needed here.
                for c in chars.by_ref() {
                    if c == ']' {
                        break;
                    }
                }
            }
            '"' => {
                chars.next();
                let mut s = String::new();
                let mut closed = false;
                while let Some(c) = chars.next() {
                    match c {
                        '"' => {
                            closed = true;
                            break;
                        }
                        '\\' => match chars.next() {
                            Some('n') => s.push('\n'),
                            Some('t') => s.push('\t'),
                            Some(other) => s.push(other),
                            None => break,
                        },
                        other => s.push(other),
                    }
                }
                if !closed {
                    return Err(SteamError::Vdf(format!("unterminated string '{s}'")));
                }
                tokens.push(Token::Str(s));
            }
            _ => {
                let mut s = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() || matches!(c, '{' | '}' | '"') {
                        break;
                    }
                    s.push(c);
                    chars.next();
                }
                tokens.push(Token::Str(s));
            }
        }
    }

    Ok(tokens)
}
