use std::fs;
use std::path::Path;

use breadbox_cli::{Cli, Command, execute, load_request};
use breadbox_engine::RequestInput;
use clap::Parser;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tempfile::TempDir;

const RESOURCES: &str = r#"[
  {
    "slug": "categories",
    "fields": [{"field": "name", "type": "text"}]
  },
  {
    "slug": "posts",
    "display_name": "Posts",
    "fields": [
      {"field": "title", "type": "text", "details": "{\"validation\":{\"rule\":\"required\"}}"},
      {"field": "featured", "type": "checkbox", "details": {"on": "Yes", "off": "No"}},
      {"field": "cover", "type": "image"},
      {
        "field": "post_belongsto_category_relationship",
        "type": "relationship",
        "details": {"type": "belongsTo", "model": "categories", "column": "category_id"}
      }
    ]
  }
]"#;

fn workspace() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("resources.json"), RESOURCES).unwrap();
    dir
}

fn cli(dir: &Path, args: &[&str]) -> Cli {
    let db = dir.join("breadbox.db");
    let resources = dir.join("resources.json");
    let storage = dir.join("storage");
    let mut argv = vec![
        "breadbox".to_string(),
        "--db".to_string(),
        db.display().to_string(),
        "--resources".to_string(),
        resources.display().to_string(),
        "--disk-root".to_string(),
        storage.display().to_string(),
    ];
    argv.extend(args.iter().map(|a| a.to_string()));
    Cli::try_parse_from(argv).unwrap()
}

fn write_json(dir: &Path, name: &str, value: Value) -> String {
    let path = dir.join(name);
    fs::write(&path, value.to_string()).unwrap();
    path.display().to_string()
}

#[test]
fn parses_subcommands() {
    let parsed = Cli::try_parse_from(["breadbox", "upsert", "posts", "req.json", "--id", "5"]).unwrap();
    match parsed.command {
        Command::Upsert { slug, id, .. } => {
            assert_eq!(slug, "posts");
            assert_eq!(id, Some(5));
        }
        other => panic!("unexpected command {other:?}"),
    }
    assert!(Cli::try_parse_from(["breadbox", "delete", "posts"]).is_err());
}

#[test]
fn request_file_reads_uploads_relative_to_itself() {
    let dir = workspace();
    fs::write(dir.path().join("cover.png"), b"png").unwrap();
    let path = write_json(
        dir.path(),
        "request.json",
        json!({"values": {"title": "Hi"}, "files": {"cover": ["cover.png"]}}),
    );

    let request = load_request(Path::new(&path)).unwrap();
    assert_eq!(request.input("title"), Some(&json!("Hi")));
    assert_eq!(request.files("cover")[0].original_name, "cover.png");
    assert_eq!(request.files("cover")[0].bytes, b"png".to_vec());
}

#[test]
fn upsert_then_update_then_delete() {
    let dir = workspace();
    fs::write(dir.path().join("cover.png"), b"png").unwrap();
    let create = write_json(
        dir.path(),
        "create.json",
        json!({"values": {"title": "Hi", "featured": "on"}, "files": {"cover": ["cover.png"]}}),
    );

    let outcome = execute(&cli(dir.path(), &["upsert", "posts", &create])).unwrap();
    assert!(outcome.success, "{}", outcome.output);
    let created: Value = serde_json::from_str(&outcome.output).unwrap();
    assert_eq!(created["featured"], json!(true));
    let id = created["id"].as_i64().unwrap();
    let cover = created["cover"].as_str().unwrap().to_string();
    assert!(dir.path().join("storage").join(&cover).exists());

    let update = write_json(dir.path(), "update.json", json!({"values": {"title": "Hello"}}));
    let outcome = execute(&cli(dir.path(), &["upsert", "posts", &update, "--id", &id.to_string()])).unwrap();
    let updated: Value = serde_json::from_str(&outcome.output).unwrap();
    assert_eq!(updated["title"], json!("Hello"));
    assert_eq!(updated["featured"], json!(false));
    assert_eq!(updated["cover"], json!(cover));

    let outcome = execute(&cli(dir.path(), &["delete", "posts", &id.to_string()])).unwrap();
    assert!(outcome.success);
    assert!(!dir.path().join("storage").join(&cover).exists());
}

#[test]
fn validation_failure_is_reported_not_raised() {
    let dir = workspace();
    let request = write_json(dir.path(), "bad.json", json!({"values": {"featured": "on"}}));

    let outcome = execute(&cli(dir.path(), &["validate", "posts", &request])).unwrap();
    assert!(!outcome.success);
    let errors: Value = serde_json::from_str(&outcome.output).unwrap();
    assert_eq!(errors, json!({"title": ["The title field is required."]}));

    let outcome = execute(&cli(dir.path(), &["upsert", "posts", &request])).unwrap();
    assert!(!outcome.success);
}

#[test]
fn missing_record_is_an_error() {
    let dir = workspace();
    assert!(execute(&cli(dir.path(), &["delete", "posts", "99"])).is_err());
}

#[test]
fn reorder_menu_reports_missing_items() {
    let dir = workspace();
    let tree = write_json(dir.path(), "tree.json", json!([{"id": 1, "children": [{"id": 2}]}]));
    let err = execute(&cli(dir.path(), &["reorder-menu", &tree])).unwrap_err();
    assert!(format!("{err:#}").contains("not found"), "{err:#}");
}
