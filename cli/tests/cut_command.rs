use std::process::Command;

use image::{Rgba, RgbaImage};

fn jigsaw_cutter() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_jigsaw-cutter"));
    command.env("RUST_LOG", "warn");
    command.env_remove("JIGSAW_OUTPUT_DIR");
    command.env_remove("JIGSAW_CUT_CONFIG");
    command
}

fn write_source(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("source.png");
    RgbaImage::from_fn(160, 120, |x, y| Rgba([x as u8, y as u8, 77, 255]))
        .save(&path)
        .expect("save source");
    path
}

#[test]
fn cut_creates_output_dir_and_prints_preview_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = write_source(dir.path());
    let out = dir.path().join("pieces");

    let output = jigsaw_cutter()
        .arg("cut")
        .arg(&source)
        .args(["--rows", "2", "--cols", "2", "--prefix", "p_"])
        .arg("--output-dir")
        .arg(&out)
        .output()
        .expect("run");

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.trim().ends_with("p_outline_with_image.png"), "{stdout}");
    assert_eq!(std::fs::read_dir(&out).expect("read dir").count(), 2 * 2 + 2);
    assert!(out.join("p_1_1.png").exists());
}

#[test]
fn config_file_feeds_the_cut() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = write_source(dir.path());
    let config = dir.path().join("cut.toml");
    std::fs::write(&config, "curve_points = 32\njpeg_quality = 70\n").expect("write config");
    let out = dir.path().join("jpeg");

    let status = jigsaw_cutter()
        .arg("cut")
        .arg(&source)
        .args(["--rows", "1", "--cols", "3", "--format", "jpeg", "--mode", "rectangular"])
        .arg("--output-dir")
        .arg(&out)
        .arg("--config")
        .arg(&config)
        .status()
        .expect("run");

    assert!(status.success());
    assert!(out.join("piece_0_2.jpg").exists());
    assert!(out.join("piece_outline_only.jpg").exists());
}

#[test]
fn zero_rows_exit_non_zero() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = write_source(dir.path());
    let out = dir.path().join("never");

    let output = jigsaw_cutter()
        .arg("cut")
        .arg(&source)
        .args(["--rows", "0", "--cols", "2"])
        .arg("--output-dir")
        .arg(&out)
        .output()
        .expect("run");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("at least one row"));
    assert!(!out.exists());
}

#[test]
fn slots_lists_every_cell() {
    let output = jigsaw_cutter()
        .args(["slots", "--rows", "3", "--cols", "3", "--width", "300", "--height", "300"])
        .output()
        .expect("run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 9);
    let centre = stdout
        .lines()
        .find(|line| line.starts_with("1_1"))
        .expect("centre line");
    assert!(centre.contains("crop=(77, 93, 223, 207)"), "{centre}");
    assert!(centre.contains("bottom=female"), "{centre}");
}
