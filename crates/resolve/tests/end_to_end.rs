//! Discovery through verification against a mock wiki and a temporary
//! Steam installation.

use std::fs;
use std::path::Path;
use std::time::Duration;

use savekeep_resolve::{CandidateEntry, Pipeline, Roots, table, verify_with};
use savekeep_steam::Paths;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serves `body` as HTML to every connection until the test ends.
async fn wiki_server(body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());

    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            let mut buf = vec![0u8; 8192];
            let _ = stream.read(&mut buf).await;
            let resp = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = stream.write_all(resp.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
    });

    url
}

fn steam_install(base: &Path, appid: &str, installdir: &str) {
    let steamapps = base.join("steamapps");
    fs::create_dir_all(&steamapps).unwrap();
    fs::write(
        steamapps.join("libraryfolders.vdf"),
        r#""libraryfolders" { "0" { "label" "" } }"#,
    )
    .unwrap();
    fs::write(
        steamapps.join(format!("appmanifest_{appid}.acf")),
        format!(
            r#""AppState" {{ "appid" "{appid}" "name" "Test Game" "installdir" "{installdir}" }}"#
        ),
    )
    .unwrap();
}

const ARTICLE: &str = r#"<html><body>
<h3><span class="mw-headline" id="Save_game_data_location">Save game data location</span></h3>
<table>
<tr class="template-infotable-body table-gamedata-body-row">
  <th class="table-gamedata-body-system">Windows</th>
  <td class="table-gamedata-body-location">%APPDATA%\&lt;user-id&gt;\Saves</td>
</tr>
<tr class="template-infotable-body table-gamedata-body-row">
  <th class="table-gamedata-body-system">Linux</th>
  <td class="table-gamedata-body-location">$XDG_DATA_HOME/Game</td>
</tr>
</table>
</body></html>"#;

const LINUX_ONLY_ARTICLE: &str = r#"<html><body>
<h3><span class="mw-headline" id="Save_game_data_location">Save game data location</span></h3>
<table>
<tr class="template-infotable-body table-gamedata-body-row">
  <th class="table-gamedata-body-system">Linux</th>
  <td class="table-gamedata-body-location">$XDG_DATA_HOME/Game</td>
</tr>
<tr class="template-infotable-body table-gamedata-body-row">
  <th class="table-gamedata-body-system">macOS</th>
  <td class="table-gamedata-body-location">$HOME/Library/Application Support/Game</td>
</tr>
</table>
</body></html>"#;

fn roots(base: &Path) -> Roots {
    Roots {
        steam: base.to_string_lossy().into_owned(),
        ubisoft: None,
        path_to_game: r"\steamapps\common".into(),
    }
}

#[tokio::test]
async fn discovered_title_resolves_to_existing_save_dir() {
    let steam = tempfile::tempdir().unwrap();
    let appdata = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    steam_install(steam.path(), "123", "Test Game");
    fs::create_dir_all(appdata.path().join("U1").join("Saves")).unwrap();

    let games = savekeep_steam::discover(&Paths::with_base(steam.path())).unwrap();
    assert_eq!(games.len(), 1);

    let url = wiki_server(ARTICLE).await;
    let client = savekeep_pcgw::Client::new(Duration::from_secs(5))
        .unwrap()
        .with_base_url(url);
    let pipeline = Pipeline::new(client, roots(steam.path())).with_limits(2, Duration::from_secs(5));

    let candidate_table = out.path().join("steam_paths.json");
    let candidates = pipeline
        .resolve_and_persist(&games, &candidate_table)
        .await
        .unwrap();
    assert_eq!(
        candidates,
        vec![CandidateEntry {
            appid: "123".into(),
            path: r"%APPDATA%\{}\Saves".into(),
        }]
    );
    assert_eq!(table::read_candidates(&candidate_table).unwrap(), candidates);

    let appdata_root = appdata.path().to_string_lossy().into_owned();
    let identities = vec!["U1".to_string(), "U2".to_string()];
    let verified = verify_with(&candidates, &identities, |name| {
        (name == "APPDATA").then(|| appdata_root.clone())
    });

    assert_eq!(verified.len(), 1);
    assert_eq!(verified[0].appid, "123");
    assert!(Path::new(&verified[0].path).ends_with(Path::new("U1").join("Saves")));
    assert!(Path::new(&verified[0].path).is_dir());

    let resolved_table = out.path().join("steam_paths_final.json");
    table::write_resolved(&resolved_table, &verified).unwrap();
    assert_eq!(table::read_resolved(&resolved_table).unwrap(), verified);
}

#[tokio::test]
async fn nothing_on_disk_yields_empty_tables() {
    let steam = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    steam_install(steam.path(), "123", "Test Game");

    let games = savekeep_steam::discover(&Paths::with_base(steam.path())).unwrap();
    let url = wiki_server(ARTICLE).await;
    let client = savekeep_pcgw::Client::new(Duration::from_secs(5))
        .unwrap()
        .with_base_url(url);
    let pipeline = Pipeline::new(client, roots(steam.path()));

    let candidates = pipeline.resolve_all(&games).await;
    assert_eq!(candidates.len(), 1);

    let verified = verify_with(&candidates, &["U1".to_string()], |_| None);
    assert!(verified.is_empty());

    let resolved_table = out.path().join("steam_paths_final.json");
    table::write_resolved(&resolved_table, &verified).unwrap();
    assert_eq!(fs::read_to_string(&resolved_table).unwrap(), "[]\n");
}

#[tokio::test]
async fn article_without_windows_rows_yields_empty_tables() {
    let steam = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    steam_install(steam.path(), "123", "Test Game");

    let games = savekeep_steam::discover(&Paths::with_base(steam.path())).unwrap();
    let url = wiki_server(LINUX_ONLY_ARTICLE).await;
    let client = savekeep_pcgw::Client::new(Duration::from_secs(5))
        .unwrap()
        .with_base_url(url);
    let pipeline = Pipeline::new(client, roots(steam.path()));

    let candidate_table = out.path().join("steam_paths.json");
    let candidates = pipeline
        .resolve_and_persist(&games, &candidate_table)
        .await
        .unwrap();
    assert!(candidates.is_empty());
    assert_eq!(fs::read_to_string(&candidate_table).unwrap(), "[]\n");

    let verified = verify_with(&candidates, &["U1".to_string()], |_| None);
    assert!(verified.is_empty());

    let resolved_table = out.path().join("steam_paths_final.json");
    table::write_resolved(&resolved_table, &verified).unwrap();
    assert_eq!(fs::read_to_string(&resolved_table).unwrap(), "[]\n");
}
