use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use serde_json::{Value, json};

/// Helper to create a temp directory that is cleaned up on drop.
struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(name: &str) -> Self {
        let path =
            std::env::temp_dir().join(format!("form_decode_test_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&path);
        fs::create_dir_all(&path).expect("failed to create temp dir");
        Self { path }
    }

    fn join(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

fn write_variant_schema(dir: &TempDir, tag: &str, required: &[&str]) -> PathBuf {
    let mut properties = serde_json::Map::new();
    properties.insert("name".to_string(), json!({"type": "string"}));
    for field in required {
        properties.insert(field.to_string(), json!({"type": "string"}));
    }
    let schema = json!({
        "title": tag,
        "type": "object",
        "properties": properties,
        "required": required,
    });
    let path = dir.join(&format!("{tag}.json"));
    fs::write(&path, serde_json::to_string_pretty(&schema).unwrap())
        .expect("failed to write schema");
    path
}

fn run_with_stdin(args: &[&str], stdin: &str) -> std::process::Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_form-decode"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to run form-decode");
    child
        .stdin
        .as_mut()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes())
        .expect("failed to write stdin");
    child.wait_with_output().expect("failed to wait")
}

#[test]
fn decode_urlencoded_body_from_stdin() {
    let output = run_with_stdin(
        &["decode"],
        "name=John+Doe&root%5Baddress%5D%5Bcity%5D=New+York&root%5Bhobbies%5D%5B0%5D=walking",
    );

    assert!(output.status.success(), "decode should succeed");
    let tree: Value =
        serde_json::from_slice(&output.stdout).expect("decode should print valid JSON");
    assert_eq!(
        tree,
        json!({
            "name": "John Doe",
            "address": {"city": "New York"},
            "hobbies": ["walking"],
        })
    );
}

#[test]
fn decode_lines_mode_with_default_list() {
    let output = run_with_stdin(
        &["decode", "--lines"],
        "hobbies=[]\nroot[hobbies][1]=reading\n",
    );

    assert!(output.status.success());
    let tree: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(tree, json!({"hobbies": ["", "reading"]}));
}

#[test]
fn decode_rejects_ambiguous_structure() {
    let output = run_with_stdin(&["decode", "--lines"], "root[a][0]=x\nroot[a][foo]=y\n");

    assert!(!output.status.success(), "ambiguous input should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("error:") && stderr.contains("'a'"),
        "stderr should name the conflicting path. stderr: {stderr}"
    );
}

#[test]
fn decode_with_custom_root_prefix() {
    let output = run_with_stdin(&["decode", "--lines", "--root", "person"], "person[age]=30\n");

    assert!(output.status.success());
    let tree: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(tree, json!({"age": "30"}));
}

#[test]
fn augment_injects_discriminator_property() {
    let dir = TempDir::new("augment");
    let schema_path = write_variant_schema(&dir, "Friend", &["known_since"]);

    let output = Command::new(env!("CARGO_BIN_EXE_form-decode"))
        .args(["augment", schema_path.to_str().unwrap()])
        .output()
        .expect("failed to run form-decode");

    assert!(output.status.success());
    let document: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        document["properties"]["_type"],
        json!({
            "type": "string",
            "enum": ["Friend"],
            "default": "Friend",
            "title": "Type",
        })
    );
}

#[test]
fn augment_writes_files_into_output_directory() {
    let dir = TempDir::new("augment_out");
    let out = TempDir::new("augment_out_dir");
    let friend = write_variant_schema(&dir, "Friend", &[]);
    let family = write_variant_schema(&dir, "FamilyMember", &["relationship"]);

    let output = Command::new(env!("CARGO_BIN_EXE_form-decode"))
        .args([
            "augment",
            friend.to_str().unwrap(),
            family.to_str().unwrap(),
            "--output",
            out.path.to_str().unwrap(),
        ])
        .output()
        .expect("failed to run form-decode");

    assert!(output.status.success());
    assert!(out.join("Friend.json").exists());
    assert!(out.join("FamilyMember.json").exists());
}

#[test]
fn resolve_selects_variant_by_discriminator() {
    let dir = TempDir::new("resolve");
    let friend = write_variant_schema(&dir, "Friend", &["known_since"]);
    let family = write_variant_schema(&dir, "FamilyMember", &["relationship"]);

    let tree = json!({
        "contacts": [
            {"_type": "FamilyMember", "name": "Bob", "relationship": "Father"},
        ],
    });
    let input = dir.join("tree.json");
    fs::write(&input, serde_json::to_string_pretty(&tree).unwrap()).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_form-decode"))
        .args([
            "resolve",
            "--schemas",
            friend.to_str().unwrap(),
            "--schemas",
            family.to_str().unwrap(),
            "--input",
            input.to_str().unwrap(),
            "--pointer",
            "/contacts/0",
        ])
        .output()
        .expect("failed to run form-decode");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("FamilyMember"),
        "resolved tag should be printed. stdout: {stdout}"
    );
}

#[test]
fn resolve_rejects_unknown_tag() {
    let dir = TempDir::new("resolve_unknown");
    let friend = write_variant_schema(&dir, "Friend", &[]);

    let input = dir.join("tree.json");
    fs::write(
        &input,
        serde_json::to_string(&json!({"_type": "Ghost", "name": "X"})).unwrap(),
    )
    .unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_form-decode"))
        .args([
            "resolve",
            "--schemas",
            friend.to_str().unwrap(),
            "--input",
            input.to_str().unwrap(),
        ])
        .output()
        .expect("failed to run form-decode");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Ghost"),
        "unknown tag should be named. stderr: {stderr}"
    );
}
