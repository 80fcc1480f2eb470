use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::tempdir;

fn spc2wav<I, S>(args: I, dir: &Path) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    Command::new(env!("CARGO_BIN_EXE_spc2wav"))
        .args(args)
        .current_dir(dir)
        .env_remove("SPC2WAV_ENGINE")
        .output()
        .expect("failed to run spc2wav")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn no_arguments() {
    let dir = tempdir().unwrap();
    let output = spc2wav(Vec::<&str>::new(), dir.path());

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Please supply a valid input SPC file"));
}

#[test]
fn input_must_be_spc() {
    let dir = tempdir().unwrap();
    let output = spc2wav(["test.txt", "output.wav"], dir.path());

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Please supply a valid input SPC file"));
}

#[test]
fn output_must_be_wav() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("test.spc"), vec![0u8; 66048]).unwrap();
    let output = spc2wav(["test.spc", "output.mp3"], dir.path());

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("This tool outputs .wav files"));
    assert!(!dir.path().join("output.mp3").exists());
}

#[test]
fn input_must_exist() {
    let dir = tempdir().unwrap();
    let output = spc2wav(["nonexistent.spc", "output.wav"], dir.path());

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Input file not found: nonexistent.spc"));
}

#[test]
fn unloadable_engine_fails_without_output() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("test.spc"), vec![0u8; 66048]).unwrap();
    let output = spc2wav(
        ["test.spc", "output.wav", "--engine", "./no-such-engine.so"],
        dir.path(),
    );

    assert_eq!(output.status.code(), Some(1));
    let message = stderr(&output);
    assert!(message.contains("Error during conversion"), "{}", message);
    assert!(message.contains("no-such-engine.so"), "{}", message);
    assert!(!dir.path().join("output.wav").exists());
}

#[test]
fn prints_version_banner() {
    let dir = tempdir().unwrap();
    let output = spc2wav(Vec::<&str>::new(), dir.path());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("spc2wav version"));
}
