//! Save-path resolution for installed Steam titles.
//!
//! Installed titles are looked up on PCGamingWiki, the documented
//! templates have their semantic tokens substituted into candidate paths,
//! and candidates are expanded per local identity and checked on disk.
//! Each stage persists its output as a JSON table.

pub mod config;
pub mod error;
pub mod expand;
pub mod pipeline;
pub mod rules;
pub mod table;
pub mod types;
pub mod verify;

pub use config::{Arch, Config};
pub use error::{ConfigError, ResolveError};
pub use pipeline::{LookupOutcome, Pipeline, SavePathSource};
pub use rules::{Roots, TokenRule, UnresolvedToken, substitute, token_rules};
pub use types::{CandidateEntry, USER_MARKER, VerifiedEntry};
pub use verify::{verify, verify_and_persist, verify_with};
