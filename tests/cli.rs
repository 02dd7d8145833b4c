use std::path::Path;
use std::process::{Command, Output};

fn mandelbrot(args: &[&str], dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mandelbrot"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[test]
fn without_g_prints_usage_and_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let out = mandelbrot(&[], dir.path());
    assert_eq!(out.status.code(), Some(0));
    let stdout = text(&out.stdout);
    assert!(stdout.contains("Usage:"), "{stdout}");
    assert!(stdout.contains("-g"), "{stdout}");
    assert!(out.stderr.is_empty());
    assert!(!dir.path().join("mandelbrot.bmp").exists());
}

#[test]
fn unknown_flag_prints_usage_to_stderr_and_fails() {
    let dir = tempfile::tempdir().unwrap();
    let out = mandelbrot(&["-x"], dir.path());
    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
    let stderr = text(&out.stderr);
    assert!(stderr.contains("-x"), "{stderr}");
    assert_eq!(stderr.matches("Usage:").count(), 1, "{stderr}");
}

#[test]
fn non_numeric_width_fails() {
    let dir = tempfile::tempdir().unwrap();
    let out = mandelbrot(&["-g", "-w", "wide"], dir.path());
    assert_eq!(out.status.code(), Some(1));
    assert!(!dir.path().join("mandelbrot.bmp").exists());
}

#[test]
fn zero_width_fails() {
    let dir = tempfile::tempdir().unwrap();
    let out = mandelbrot(&["-g", "-q", "-w", "0"], dir.path());
    assert_eq!(out.status.code(), Some(1));
    let stderr = text(&out.stderr);
    assert!(stderr.contains("invalid image dimensions"), "{stderr}");
    assert!(!dir.path().join("mandelbrot.bmp").exists());
}

#[test]
fn unwritable_output_fails() {
    let dir = tempfile::tempdir().unwrap();
    let out = mandelbrot(
        &["-g", "-q", "-w", "8", "-h", "8", "-o", "missing/x.bmp"],
        dir.path(),
    );
    assert_eq!(out.status.code(), Some(1));
    let stderr = text(&out.stderr);
    assert!(stderr.contains("cannot write"), "{stderr}");
}

#[test]
fn generates_the_default_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = mandelbrot(&["-g", "-q", "-w", "16", "-h", "12", "-t", "64"], dir.path());
    assert_eq!(out.status.code(), Some(0));
    let stdout = text(&out.stdout);
    assert!(stdout.contains("mandelbrot.bmp saved"), "{stdout}");
    let written = image::open(dir.path().join("mandelbrot.bmp"))
        .unwrap()
        .to_rgb8();
    assert_eq!(written.dimensions(), (16, 12));
}
