use std::error::Error;
use std::fs;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use image::{ImageBuffer, Rgb};
use serde_json::{Value, json};
use tempfile::tempdir;

const USAGE: &str = "Image path not provided. Usage: undertone-cli <image_path>";

/// Run the binary inside `work_dir` and return its exit code and parsed stdout.
fn run_cli(work_dir: &Path, args: &[&str]) -> Result<(i32, Value), Box<dyn Error>> {
    let mut cmd = cargo_bin_cmd!("undertone-cli");
    cmd.current_dir(work_dir).env_remove("RUST_LOG");
    for arg in args {
        cmd.arg(arg);
    }
    let output = cmd.output()?;
    let stdout = String::from_utf8(output.stdout)?;
    assert_eq!(
        stdout.lines().count(),
        1,
        "stdout should hold exactly one JSON line: {stdout:?}"
    );
    let value: Value = serde_json::from_str(&stdout)?;
    Ok((output.status.code().unwrap_or(-1), value))
}

fn write_sample_image(path: &Path) -> Result<(), Box<dyn Error>> {
    let img = ImageBuffer::from_fn(64, 64, |x, y| {
        let r = ((x + y) % 255) as u8;
        Rgb([r, 128, 255u8.saturating_sub(r)])
    });
    img.save(path)?;
    Ok(())
}

#[test]
fn missing_argument_is_a_usage_error() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let (code, value) = run_cli(dir.path(), &[])?;
    assert_eq!(code, 1);
    assert_eq!(value, json!({ "error": USAGE }));
    Ok(())
}

#[test]
fn extra_arguments_are_a_usage_error() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let (code, value) = run_cli(dir.path(), &["a.jpg", "b.jpg"])?;
    assert_eq!(code, 1);
    assert_eq!(value, json!({ "error": USAGE }));
    Ok(())
}

#[test]
fn separator_does_not_hide_an_extra_argument() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let (code, value) = run_cli(dir.path(), &["--", "a.jpg"])?;
    assert_eq!(code, 1);
    assert_eq!(value, json!({ "error": USAGE }));
    Ok(())
}

#[test]
fn hyphenated_argument_is_read_as_image_path() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    for path in ["-photo.jpg", "--help"] {
        let (code, value) = run_cli(dir.path(), &[path])?;
        assert_eq!(code, 0, "argument {path}");
        assert_eq!(
            value,
            json!({ "error": format!("Could not read image {path}") })
        );
    }
    Ok(())
}

#[test]
fn unreadable_image_prints_error_document() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let (code, value) = run_cli(dir.path(), &["no_such_photo.jpg"])?;
    assert_eq!(code, 0);
    assert_eq!(
        value,
        json!({ "error": "Could not read image no_such_photo.jpg" })
    );
    Ok(())
}

#[test]
fn missing_model_is_a_setup_failure() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    write_sample_image(&dir.path().join("sample.png"))?;

    let (code, value) = run_cli(dir.path(), &["sample.png"])?;
    assert_eq!(code, 2);
    let message = value["error"].as_str().unwrap_or_default();
    assert!(
        message.starts_with("Could not load face detection model models/seeta_fd_frontal_v1.0.bin"),
        "unexpected message: {message}"
    );
    Ok(())
}

#[test]
fn invalid_settings_file_is_a_setup_failure() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    fs::create_dir_all(dir.path().join("config"))?;
    fs::write(
        dir.path().join("config/undertone_settings.json"),
        r#"{"detection": {"scale_factor": 0.5}}"#,
    )?;
    write_sample_image(&dir.path().join("sample.png"))?;

    let (code, value) = run_cli(dir.path(), &["sample.png"])?;
    assert_eq!(code, 2);
    let message = value["error"].as_str().unwrap_or_default();
    assert!(message.contains("scale_factor"), "unexpected message: {message}");
    Ok(())
}
