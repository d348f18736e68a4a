use std::process::{Command, Stdio};

#[test]
fn version_flag_prints_and_exits_zero() {
    let output = Command::new(env!("CARGO_BIN_EXE_minish"))
        .arg("-v")
        .stdin(Stdio::null())
        .output()
        .expect("run minish -v");

    // Exits 0 without entering the read loop: with stdin closed, reaching
    // the prompt would produce no version line at all.
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let expected = format!(
        "Shell Version: {}.{}\n",
        env!("CARGO_PKG_VERSION_MAJOR"),
        env!("CARGO_PKG_VERSION_MINOR")
    );
    assert_eq!(stdout, expected);
}

#[test]
fn unrecognized_flag_exits_nonzero() {
    let output = Command::new(env!("CARGO_BIN_EXE_minish"))
        .arg("--definitely-not-a-flag")
        .stdin(Stdio::null())
        .output()
        .expect("run minish with bad flag");

    assert!(!output.status.success());
}
