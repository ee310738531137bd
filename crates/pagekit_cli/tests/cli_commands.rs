use std::path::Path;
use std::process::{Command, Output};

fn pagekit(db: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pagekit"))
        .arg("--db")
        .arg(db)
        .args(args)
        .env_remove("PAGEKIT_CONFIG")
        .env_remove("PAGEKIT_DB_PATH")
        .env_remove("PAGEKIT_TEMPLATE_PATH")
        .env_remove("PAGEKIT_LOG_LEVEL")
        .env_remove("PAGEKIT_LOG_DIR")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn init_create_render_and_delete() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("site.db");

    assert_eq!(stdout(&pagekit(&db, &["init"])).trim(), "seeded 3 page(s)");
    assert_eq!(stdout(&pagekit(&db, &["count"])).trim(), "3");

    let id = stdout(&pagekit(
        &db,
        &["create", "--title", "Fresh <page>", "--content", "Body"],
    ))
    .trim()
    .to_string();
    assert_eq!(id, "4");

    let html = stdout(&pagekit(&db, &["render", "--page", &id]));
    assert!(html.contains("<h1>Fresh &lt;page&gt;</h1>"));

    let json = stdout(&pagekit(&db, &["get", &id]));
    assert!(json.contains("\"title\": \"Fresh <page>\""));

    stdout(&pagekit(&db, &["delete", &id]));
    assert_eq!(stdout(&pagekit(&db, &["count"])).trim(), "3");
}

#[test]
fn render_of_unknown_page_shows_placeholder() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("site.db");
    stdout(&pagekit(&db, &["init"]));

    let html = stdout(&pagekit(&db, &["render", "--page", "999"]));
    assert!(html.contains("Page not found"));
}

#[test]
fn get_of_unknown_page_fails() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("site.db");
    stdout(&pagekit(&db, &["init"]));

    let output = pagekit(&db, &["get", "999"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("page 999 not found"));
}

#[test]
fn render_without_page_table_fails() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("empty.db");

    let output = pagekit(&db, &["render"]);
    assert!(!output.status.success());
}
