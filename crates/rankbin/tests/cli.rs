use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// 8x8 image: left half at 10, right half at 200.
fn write_two_cluster_image(dir: &TempDir) -> PathBuf {
    let img = image::GrayImage::from_fn(8, 8, |x, _| image::Luma([if x < 4 { 10 } else { 200 }]));
    let path = dir.path().join("input.png");
    img.save(&path).unwrap();
    path
}

fn otsu() -> Command {
    Command::cargo_bin("rankbin-otsu").unwrap()
}

fn load_luma8(path: &Path) -> image::GrayImage {
    image::open(path).unwrap().to_luma8()
}

#[test]
fn segments_two_clusters() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_two_cluster_image(&dir);
    let output = dir.path().join("mask.png");

    otsu()
        .arg(&input)
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("threshold: 104"));

    let mask = load_luma8(&output);
    assert_eq!(mask.dimensions(), (8, 8));
    for (x, _, px) in mask.enumerate_pixels() {
        let expected = if x < 4 { 0 } else { 255 };
        assert_eq!(px.0[0], expected, "pixel in column {x}");
    }
}

#[test]
fn threshold_override_skips_the_search() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_two_cluster_image(&dir);
    let output = dir.path().join("mask.png");

    otsu()
        .args(["-t", "5"])
        .arg(&input)
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("threshold: 5"));

    let mask = load_luma8(&output);
    assert!(mask.pixels().all(|p| p.0[0] == 255));
}

#[test]
fn rejects_out_of_range_threshold() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_two_cluster_image(&dir);

    otsu()
        .args(["-t", "300"])
        .arg(&input)
        .arg(dir.path().join("mask.png"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("300"));
}

#[test]
fn missing_positionals_print_usage() {
    otsu()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn rejects_multi_channel_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("rgb.png");
    image::RgbImage::from_pixel(4, 4, image::Rgb([1, 2, 3]))
        .save(&input)
        .unwrap();

    otsu()
        .arg(&input)
        .arg(dir.path().join("mask.png"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("single-channel"));
}

#[test]
fn missing_input_is_a_runtime_error() {
    let dir = tempfile::tempdir().unwrap();
    otsu()
        .arg(dir.path().join("nope.png"))
        .arg(dir.path().join("mask.png"))
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("error:"));
}

#[test]
fn writes_sixteen_bit_output_and_report() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_two_cluster_image(&dir);
    let output = dir.path().join("mask16.png");
    let report = dir.path().join("report.json");

    otsu()
        .args(["--bits", "16", "--report"])
        .arg(&report)
        .arg(&input)
        .arg(&output)
        .assert()
        .success();

    let mask = image::open(&output).unwrap();
    let mask = mask.as_luma16().expect("16-bit grayscale output");
    assert_eq!(mask.get_pixel(0, 0).0[0], 0);
    assert_eq!(mask.get_pixel(7, 7).0[0], 65535);

    let raw = std::fs::read_to_string(&report).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["threshold"], 104);
    assert_eq!(json["total_pixels"], 64);
    assert_eq!(json["overridden"], false);
}

#[test]
fn rejects_unsupported_bit_depth() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_two_cluster_image(&dir);
    otsu()
        .args(["--bits", "12"])
        .arg(&input)
        .arg(dir.path().join("mask.png"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("expected 8 or 16"));
}
