use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn trajectory_cmd(temp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("mouse-trajectory").expect("binary exists");
    // Keep the user's real config out of the tests.
    cmd.arg("--config").arg(temp.path().join("config.toml"));
    cmd
}

fn write_table(path: &Path) {
    std::fs::write(
        path,
        "x,y,l_button_down,stamp\n\
         5,5,0,0\n\
         5,5,1,10000000\n\
         40,5,1,20000000\n\
         40,30,1,30000000\n\
         40,30,0,40000000\n\
         40,30,0,50000000\n",
    )
    .unwrap();
}

#[test]
fn help_lists_subcommands() {
    let temp = TempDir::new().unwrap();
    trajectory_cmd(&temp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Record and replay pointer trajectories"))
        .stdout(predicate::str::contains("record"))
        .stdout(predicate::str::contains("play"))
        .stdout(predicate::str::contains("inspect"));
}

#[test]
fn version_includes_git_hash_slot() {
    let temp = TempDir::new().unwrap();
    trajectory_cmd(&temp)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")))
        .stdout(predicate::str::contains("("));
}

#[test]
fn play_missing_file_fails() {
    let temp = TempDir::new().unwrap();
    trajectory_cmd(&temp)
        .args(["play"])
        .arg(temp.path().join("absent.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to play"));
}

#[test]
fn inspect_reports_rows_and_strokes() {
    let temp = TempDir::new().unwrap();
    let table = temp.path().join("stroke.csv");
    write_table(&table);

    trajectory_cmd(&temp)
        .arg("inspect")
        .arg(&table)
        .assert()
        .success()
        .stdout(predicate::str::contains("rows: 6"))
        .stdout(predicate::str::contains("duration: 0.050 s"))
        .stdout(predicate::str::contains("strokes: 1"));
}

#[test]
fn inspect_rejects_malformed_table() {
    let temp = TempDir::new().unwrap();
    let table = temp.path().join("bad.csv");
    std::fs::write(&table, "x,y,l_button_down,stamp\n1,2,maybe,0\n").unwrap();

    trajectory_cmd(&temp)
        .arg("inspect")
        .arg(&table)
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 2"));
}

#[test]
fn record_script_writes_table() {
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("out").join("take.csv");
    let script = "\
# draw an L
move 10 10
wait 60
press 10 10
move 50 10
wait 60
move 50 50
wait 60
release 50 50
wait 60
";

    trajectory_cmd(&temp)
        .args(["record", "--frequency", "100"])
        .arg(&output)
        .write_stdin(script)
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved"));

    let text = std::fs::read_to_string(&output).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("x,y,l_button_down,stamp"));
    let rows: Vec<&str> = lines.collect();
    assert!(rows.len() >= 5, "only {} rows recorded", rows.len());
    assert!(rows[0].ends_with(",0"), "first stamp not normalized: {}", rows[0]);
    assert!(rows.iter().any(|row| row.split(',').nth(2) == Some("1")));
}

#[test]
fn record_takes_split_on_cut() {
    let temp = TempDir::new().unwrap();
    let data = temp.path().join("data");
    std::fs::write(
        temp.path().join("config.toml"),
        format!("[recording]\noutput_directory = {:?}\n", data.display().to_string()),
    )
    .unwrap();

    let script = "move 1 1\nwait 50\ncut\nmove 2 2\nwait 50\ncut\n";
    trajectory_cmd(&temp)
        .args(["record", "--takes", "2", "--prefix", "pen", "--frequency", "100"])
        .write_stdin(script)
        .assert()
        .success();

    assert!(data.join("pen_001.csv").exists());
    assert!(data.join("pen_002.csv").exists());
}

#[test]
fn record_rejects_bad_script_line() {
    let temp = TempDir::new().unwrap();
    trajectory_cmd(&temp)
        .arg("record")
        .arg(temp.path().join("take.csv"))
        .write_stdin("move 1 1\nteleport 3 3\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown command"));
}

#[test]
fn play_writes_snapshot() {
    let temp = TempDir::new().unwrap();
    let table = temp.path().join("stroke.csv");
    let snapshot = temp.path().join("canvas.png");
    write_table(&table);

    trajectory_cmd(&temp)
        .arg("play")
        .arg(&table)
        .arg("--snapshot")
        .arg(&snapshot)
        .assert()
        .success()
        .stdout(predicate::str::contains("Played 6 samples"));

    let image = image::open(&snapshot).unwrap().to_luma8();
    assert_eq!(image.dimensions(), (512, 512));
    assert!(image.pixels().any(|p| p.0[0] == 0));
}

#[test]
fn init_config_refuses_existing_file() {
    let temp = TempDir::new().unwrap();
    trajectory_cmd(&temp).arg("init-config").assert().success();
    assert!(temp.path().join("config.toml").exists());

    trajectory_cmd(&temp)
        .arg("init-config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}
