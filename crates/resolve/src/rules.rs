//! Substitution of the wiki's semantic tokens.
//!
//! Each title gets an ordered rule list (token → replacement). The user
//! token is not resolved here: it becomes [`USER_MARKER`] and is expanded
//! per identity during verification.

use savekeep_steam::GameRecord;

use crate::types::USER_MARKER;

pub const USER_ID_TOKEN: &str = "<user-id>";
pub const STEAM_FOLDER_TOKEN: &str = "<Steam-folder>";
pub const UBISOFT_FOLDER_TOKEN: &str = "<Ubisoft-Connect-folder>";
pub const PATH_TO_GAME_TOKEN: &str = "<path-to-game>";

/// Install roots that semantic tokens resolve against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roots {
    pub steam: String,
    pub ubisoft: Option<String>,
    pub path_to_game: String,
}

/// One token rewrite; `None` means the token has no configured value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRule {
    pub token: &'static str,
    pub replacement: Option<String>,
}

/// A template referenced a token that cannot be resolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no value configured for {token}")]
pub struct UnresolvedToken {
    pub token: &'static str,
}

/// Builds the rule list for one title.
pub fn token_rules(roots: &Roots, game: &GameRecord) -> Vec<TokenRule> {
    vec![
        TokenRule {
            token: USER_ID_TOKEN,
            replacement: Some(USER_MARKER.to_string()),
        },
        TokenRule {
            token: STEAM_FOLDER_TOKEN,
            replacement: Some(roots.steam.clone()),
        },
        TokenRule {
            token: UBISOFT_FOLDER_TOKEN,
            replacement: roots.ubisoft.clone(),
        },
        TokenRule {
            token: PATH_TO_GAME_TOKEN,
            replacement: Some(format!(
                "{}{}\\{}",
                roots.steam, roots.path_to_game, game.install_dir
            )),
        },
    ]
}

/// Applies `rules` in order to `template`.
pub fn substitute(template: &str, rules: &[TokenRule]) -> Result<String, UnresolvedToken> {
    let mut out = template.to_string();
    for rule in rules {
        if !out.contains(rule.token) {
            continue;
        }
        let replacement = rule
            .replacement
            .as_deref()
            .ok_or(UnresolvedToken { token: rule.token })?;
        out = out.replace(rule.token, replacement);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roots() -> Roots {
        Roots {
            steam: r"C:\Steam".into(),
            ubisoft: Some(r"C:\Ubisoft".into()),
            path_to_game: r"\steamapps\common".into(),
        }
    }

    fn game() -> GameRecord {
        GameRecord {
            appid: "620".into(),
            name: "Portal 2".into(),
            install_dir: "Portal 2".into(),
        }
    }

    #[test]
    fn substitutes_every_token() {
        let rules = token_rules(&roots(), &game());
        assert_eq!(
            substitute(r"<Steam-folder>\userdata\<user-id>\620\remote", &rules).unwrap(),
            r"C:\Steam\userdata\{}\620\remote"
        );
        assert_eq!(
            substitute(r"<Ubisoft-Connect-folder>\savegames\<user-id>\46", &rules).unwrap(),
            r"C:\Ubisoft\savegames\{}\46"
        );
        assert_eq!(
            substitute(r"<path-to-game>\portal2\SAVE", &rules).unwrap(),
            r"C:\Steam\steamapps\common\Portal 2\portal2\SAVE"
        );
    }

    #[test]
    fn placeholders_are_left_for_verification() {
        let rules = token_rules(&roots(), &game());
        assert_eq!(
            substitute(r"%APPDATA%\Game\<user-id>", &rules).unwrap(),
            r"%APPDATA%\Game\{}"
        );
    }

    #[test]
    fn unresolved_token_only_when_used() {
        let roots = Roots {
            ubisoft: None,
            ..roots()
        };
        let rules = token_rules(&roots, &game());
        assert!(substitute(r"%APPDATA%\Game", &rules).is_ok());
        assert_eq!(
            substitute(r"<Ubisoft-Connect-folder>\savegames", &rules),
            Err(UnresolvedToken {
                token: UBISOFT_FOLDER_TOKEN
            })
        );
    }
}
