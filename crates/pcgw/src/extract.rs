//! Extraction of save locations from a PCGamingWiki article.
//!
//! The article layout is addressed by fixed ids and class names; when the
//! wiki changes its markup, extraction yields nothing rather than failing.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::normalize::normalize;

/// Platforms whose rows describe a Windows/Steam save location.
const PLATFORMS: [&str; 2] = ["steam", "windows"];

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

static SECTION: LazyLock<Selector> = LazyLock::new(|| selector("span#Save_game_data_location"));
static ROW: LazyLock<Selector> =
    LazyLock::new(|| selector("tr.template-infotable-body.table-gamedata-body-row"));
static SYSTEM: LazyLock<Selector> = LazyLock::new(|| selector("th.table-gamedata-body-system"));
static LOCATION: LazyLock<Selector> =
    LazyLock::new(|| selector("td.table-gamedata-body-location"));

/// Returns the normalized save paths listed in an article.
///
/// `None` covers both a missing "Save game data location" section and a
/// section without any usable Steam/Windows row.
pub fn save_paths_from_html(html: &str) -> Option<Vec<String>> {
    let document = Html::parse_document(html);
    let anchor = document.select(&SECTION).next()?;
    let table = next_table(&document, anchor)?;

    let paths: Vec<String> = table
        .select(&ROW)
        .filter(|row| is_supported_platform(row))
        .filter_map(|row| row.select(&LOCATION).next())
        .filter_map(|cell| normalize(&element_text(cell)))
        .collect();

    (!paths.is_empty()).then_some(paths)
}

/// Finds the first `<table>` after `anchor` in document order.
fn next_table<'a>(document: &'a Html, anchor: ElementRef<'a>) -> Option<ElementRef<'a>> {
    document
        .tree
        .root()
        .descendants()
        .skip_while(|node| node.id() != anchor.id())
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "table")
}

fn is_supported_platform(row: &ElementRef<'_>) -> bool {
    row.select(&SYSTEM).next().is_some_and(|th| {
        let platform = element_text(th).to_lowercase();
        PLATFORMS.contains(&platform.as_str())
    })
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}
