use assert_cmd::cargo::cargo_bin_cmd;
use predicates::str::contains;

#[test]
fn missing_path_exits_with_status_one() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let missing = dir.path().join("nope.jpg");

    let mut cmd = cargo_bin_cmd!("exif_rename");
    cmd.arg(&missing)
        .assert()
        .code(1)
        .stdout(contains("neither a file or a directory"));
    Ok(())
}

#[test]
fn no_arguments_is_an_error() {
    let mut cmd = cargo_bin_cmd!("exif_rename");
    cmd.assert().code(1).stdout(contains("missing argument"));
}

#[test]
fn help_lists_flags() {
    let mut cmd = cargo_bin_cmd!("exif_rename");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(contains("--device-marker"))
        .stdout(contains("--json"));
}
