mod support;

use std::path::Path;
use std::process::{Command, Output};

fn sceneboard(config: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sceneboard"))
        .args(["--color", "never", "--config"])
        .arg(config)
        .args(args)
        .env_remove("SCENEBOARD_ENDPOINT_URL")
        .env_remove("RUST_LOG")
        .output()
        .expect("run sceneboard")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn cli_create_list_show_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let config = support::write_config(dir.path(), &support::local_config(&dir.path().join("store")));

    let created = sceneboard(&config, &["--json", "create", "--name", "Opening"]);
    assert!(created.status.success(), "stderr: {}", stderr(&created));
    let value: serde_json::Value = serde_json::from_str(stdout(&created).trim()).unwrap();
    let id = value["event"]["id"].as_str().unwrap().to_string();

    let listed = sceneboard(&config, &["list"]);
    assert!(listed.status.success(), "stderr: {}", stderr(&listed));
    assert!(stdout(&listed).contains("Opening"));
    assert!(stdout(&listed).contains(&id));

    let shown = sceneboard(&config, &["show", &id]);
    assert!(shown.status.success());
    assert!(stdout(&shown).contains("left"));
}

#[test]
fn cli_show_unknown_id_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = support::write_config(dir.path(), &support::local_config(&dir.path().join("store")));

    let output = sceneboard(&config, &["show", "nope"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("nope"), "stderr: {}", stderr(&output));
}

#[test]
fn cli_import_then_export() {
    let dir = tempfile::tempdir().unwrap();
    let config = support::write_config(dir.path(), &support::local_config(&dir.path().join("store")));
    let module = dir.path().join("dialogs.js");
    std::fs::write(
        &module,
        "export const dialogs = { intro: [{ text: \"Hi\", speaker: \"right\" }] };\n",
    )
    .unwrap();

    let imported = sceneboard(&config, &["import", module.to_str().unwrap()]);
    assert!(imported.status.success(), "stderr: {}", stderr(&imported));
    assert!(stdout(&imported).contains("intro"));

    let exported = sceneboard(&config, &["export"]);
    assert!(exported.status.success());
    let text = stdout(&exported);
    assert!(text.starts_with("export const dialogs = {"));
    assert!(text.contains("\"speaker\": \"right\""));
}

#[test]
fn cli_rejects_malformed_import() {
    let dir = tempfile::tempdir().unwrap();
    let config = support::write_config(dir.path(), &support::local_config(&dir.path().join("store")));
    let module = dir.path().join("bad.js");
    std::fs::write(&module, "export const dialogs = {\n  intro: [\n").unwrap();

    let output = sceneboard(&config, &["import", module.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("line"), "stderr: {}", stderr(&output));
}

#[test]
fn cli_rejects_deeply_nested_import() {
    let dir = tempfile::tempdir().unwrap();
    let config = support::write_config(dir.path(), &support::local_config(&dir.path().join("store")));
    let module = dir.path().join("deep.js");
    let depth = 1_000_000;
    std::fs::write(
        &module,
        format!("export const dialogs = {{ a: {}{} }};", "[".repeat(depth), "]".repeat(depth)),
    )
    .unwrap();

    let output = sceneboard(&config, &["import", module.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("nesting too deep"), "stderr: {}", stderr(&output));
}

#[test]
fn cli_returns_nonzero_on_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = support::write_config(dir.path(), "[logging]\nformat = \"xml\"\n");

    let output = sceneboard(&config, &["config", "validate"]);
    assert!(!output.status.success(), "Expected nonzero exit code");
    let combined = format!("{}{}", stdout(&output), stderr(&output));
    assert!(
        combined.contains("logging.format"),
        "Expected error message about invalid config.\n{combined}"
    );
}

#[test]
fn cli_config_init_writes_template() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("fresh").join("config.toml");

    let output = sceneboard(&config, &["config", "init"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(config.exists());

    let again = sceneboard(&config, &["config", "init"]);
    assert!(!again.status.success());
    assert!(stderr(&again).contains("--force"));
}

#[test]
fn cli_play_without_animation_prints_every_line() {
    let dir = tempfile::tempdir().unwrap();
    let config = support::write_config(dir.path(), &support::local_config(&dir.path().join("store")));
    let module = dir.path().join("dialogs.js");
    std::fs::write(
        &module,
        "export const dialogs = { duel: [{ text: \"Ready\", speaker: \"left\" }, { text: \"Go\", speaker: \"right\" }] };\n",
    )
    .unwrap();
    assert!(sceneboard(&config, &["import", module.to_str().unwrap()])
        .status
        .success());

    // stdin is empty, so each Enter prompt sees end of input.
    let output = sceneboard(&config, &["play", "duel", "--no-animate"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("◀ Ready"));
    assert!(text.contains("Go ▶"));
    assert!(text.contains("2 / 2"));
}

#[test]
fn cli_images_scan_writes_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    let img = dir.path().join("img");
    std::fs::create_dir(&img).unwrap();
    std::fs::write(img.join("b.PNG"), b"").unwrap();
    std::fs::write(img.join("a.jpg"), b"").unwrap();
    std::fs::write(img.join("favicon.ico"), b"").unwrap();

    let output = sceneboard(
        &config,
        &["images", "scan", "--dir", img.to_str().unwrap()],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let manifest = std::fs::read_to_string(img.join("images.json")).unwrap();
    let images: Vec<String> = serde_json::from_str(&manifest).unwrap();
    assert_eq!(images, vec!["./img/a.jpg", "./img/b.PNG"]);
}
