use assert_cmd::Command;
use httpmock::{Method::GET, MockServer};
use predicates::prelude::*;
use serde_json::json;

fn hn(server: &MockServer) -> Command {
    let mut cmd = Command::cargo_bin("hn").unwrap();
    cmd.env_remove("HN_API_URL")
        .arg("--log-level")
        .arg("warn")
        .arg("--base-url")
        .arg(server.base_url())
        .arg("--interval-ms")
        .arg("0");
    cmd
}

#[test]
fn version_flag() {
    Command::cargo_bin("hn")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("hn "));
}

#[test]
fn item_raw_prints_json() -> anyhow::Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v0/item/8863.json");
        then.status(200)
            .json_body(json!({"id": 8863, "by": "dhouston", "type": "story"}));
    });
    let out = hn(&server).args(["item", "8863", "--raw"]).output()?;
    assert!(out.status.success());
    let v: serde_json::Value = serde_json::from_slice(&out.stdout)?;
    assert_eq!(v["id"], json!(8863));
    assert_eq!(v["by"], json!("dhouston"));
    Ok(())
}

#[test]
fn item_typed_prints_summary() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v0/item/8863.json");
        then.status(200).json_body(json!({
            "id": 8863, "by": "dhouston", "title": "My YC app: Dropbox",
            "url": "http://www.getdropbox.com/u/2/screencast.html"
        }));
    });
    hn(&server)
        .args(["item", "8863"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Title: My YC app: Dropbox"))
        .stdout(predicate::str::contains("Submitted by: dhouston"))
        .stdout(predicate::str::contains("Id: 8863"));
}

#[test]
fn missing_item_fails_with_message() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v0/item/404404.json");
        then.status(200).body("null");
    });
    hn(&server)
        .args(["item", "404404"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("item 404404 not found"));
}

#[test]
fn non_numeric_item_is_rejected() {
    let server = MockServer::start();
    hn(&server)
        .args(["item", "notanumber"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not an integer"));
}

#[test]
fn top_honours_limit() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v0/topstories.json");
        then.status(200).json_body(json!([5, 4, 3]));
    });
    hn(&server)
        .args(["top", "--limit", "2"])
        .assert()
        .success()
        .stdout("5\n4\n");
}

#[test]
fn top_stories_report_skips_vanished_items() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v0/topstories.json");
        then.status(200).json_body(json!([1, 2]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/v0/item/1.json");
        then.status(200).body("null");
    });
    server.mock(|when, then| {
        when.method(GET).path("/v0/item/2.json");
        then.status(200)
            .json_body(json!({"id": 2, "title": "Second", "by": "pg"}));
    });
    hn(&server)
        .arg("top-stories")
        .assert()
        .success()
        .stdout(predicate::str::contains("Hacker News Top Stories"))
        .stdout(predicate::str::contains("Title: Second"))
        .stdout(predicate::str::contains("Id: 1").not());
}

#[test]
fn max_item_and_updates() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v0/maxitem.json");
        then.status(200).body("9130260");
    });
    server.mock(|when, then| {
        when.method(GET).path("/v0/updates.json");
        then.status(200)
            .json_body(json!({"items": [8423305], "profiles": ["thefox", "mdda"]}));
    });
    hn(&server)
        .arg("max-item")
        .assert()
        .success()
        .stdout("9130260\n");
    hn(&server)
        .arg("updates")
        .assert()
        .success()
        .stdout(predicate::str::contains("Items (1):"))
        .stdout(predicate::str::contains("Profiles (2):"));
}

#[test]
fn server_error_exits_non_zero() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v0/user/jl.json");
        then.status(502);
    });
    hn(&server)
        .args(["user", "jl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("502"));
}
