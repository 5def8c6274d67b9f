use std::process::Command;

#[test]
fn cli_compiles_without_warnings() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "bee-meadow"])
        .status()
        .expect("failed to invoke cargo check for bee-meadow CLI binary");

    assert!(status.success(), "cargo check --bin bee-meadow should succeed");
}
