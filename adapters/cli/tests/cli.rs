use std::{fs, path::PathBuf, process::Command};

fn cellwise() -> Command {
    Command::new(env!("CARGO_BIN_EXE_cellwise"))
}

fn demo(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../demos")
        .join(name)
}

#[test]
fn run_replays_the_mining_demo() {
    let output = cellwise()
        .args(["run"])
        .arg(demo("mine_ridge.toml"))
        .output()
        .expect("failed to launch cellwise");
    assert!(output.status.success(), "cellwise run should succeed");

    let stdout = String::from_utf8(output.stdout).expect("stdout is utf8");
    assert!(
        stdout.contains("> Designated 9 of 10 mining designations, 1 blocked by"),
        "unexpected output:\n{stdout}"
    );
    assert!(stdout.contains("> Confirmed 1 segment."), "unexpected output:\n{stdout}");
    assert!(stdout.contains(".#####.."), "final layout should be printed");
}

#[test]
fn run_announces_the_gap_in_the_wall_ring() {
    let output = cellwise()
        .args(["run"])
        .arg(demo("wall_ring.toml"))
        .output()
        .expect("failed to launch cellwise");
    assert!(output.status.success(), "cellwise run should succeed");

    let stdout = String::from_utf8(output.stdout).expect("stdout is utf8");
    assert!(
        stdout.contains("> Enclosed a room: 14 cells, 1 gap at 7, 4."),
        "unexpected output:\n{stdout}"
    );
    assert!(stdout.contains("> steel at 7, 4. 1 of 1."), "unexpected output:\n{stdout}");
    assert!(stdout.contains("> Confirmed 1 segment."), "unexpected output:\n{stdout}");
}

#[test]
fn encode_then_decode_restores_the_rows() {
    let layout = std::env::temp_dir().join(format!("cellwise-cli-{}.txt", std::process::id()));
    fs::write(&layout, "WWW\nW.W\nWWW\n").expect("write layout");

    let encoded = cellwise()
        .arg("encode")
        .arg(&layout)
        .output()
        .expect("failed to launch cellwise");
    let _ = fs::remove_file(&layout);
    assert!(encoded.status.success(), "cellwise encode should succeed");
    let value = String::from_utf8(encoded.stdout).expect("stdout is utf8");
    assert!(value.starts_with("cellwise:v1:3x3:"), "unexpected encoding {value}");

    let decoded = cellwise()
        .args(["decode", value.trim()])
        .output()
        .expect("failed to launch cellwise");
    assert!(decoded.status.success(), "cellwise decode should succeed");
    let rows = String::from_utf8(decoded.stdout).expect("stdout is utf8");
    assert_eq!(rows, "cellwise:v1 3x3\nWWW\nW.W\nWWW\n");
}

#[test]
fn malformed_transfer_strings_fail() {
    let output = cellwise()
        .args(["decode", "cellwise:v9:3x3:AAAA"])
        .output()
        .expect("failed to launch cellwise");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("v9"), "error should name the version: {stderr}");
}
