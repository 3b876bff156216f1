use std::process::Command;
use tempfile::tempdir;

fn bin() -> String {
    env!("CARGO_BIN_EXE_oxidat").to_string()
}

fn script(len: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(len);
    let mut line = 0u32;
    while data.len() < len {
        data.extend_from_slice(format!("<msg id=\"{line:04}\">Hello there.</msg>\n").as_bytes());
        line += 1;
    }
    data.truncate(len);
    data
}

#[test]
fn cli_compress_decompress_roundtrip() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("script.bin");
    let original = script(10_000);
    std::fs::write(&input, &original).unwrap();

    let st = Command::new(bin())
        .args(["compress", "--no-progress"])
        .arg(&input)
        .status()
        .unwrap();
    assert!(st.success());

    let packed = dir.path().join("script.bin.lz");
    let bytes = std::fs::read(&packed).unwrap();
    assert_eq!(&bytes[1..4], b"3;1");
    assert!(bytes.len() < original.len());

    let out_dir = dir.path().join("out");
    let st = Command::new(bin())
        .arg("decompress")
        .arg("-o")
        .arg(&out_dir)
        .arg(&packed)
        .status()
        .unwrap();
    assert!(st.success());
    assert_eq!(std::fs::read(out_dir.join("script.bin")).unwrap(), original);
}

#[test]
fn cli_compress_many_files() {
    let dir = tempdir().unwrap();
    let out_dir = dir.path().join("packed");
    let mut cmd = Command::new(bin());
    cmd.args(["compress", "--no-progress", "-o"]).arg(&out_dir);
    for i in 0..6 {
        let path = dir.path().join(format!("entry_{i}.bin"));
        std::fs::write(&path, script(500 + i * 300)).unwrap();
        cmd.arg(path);
    }
    assert!(cmd.status().unwrap().success());

    for i in 0..6 {
        assert!(out_dir.join(format!("entry_{i}.bin.lz")).exists());
    }
}

#[test]
fn cli_store_flag_writes_stored_stream() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("font.tex");
    std::fs::write(&input, script(2000)).unwrap();

    let st = Command::new(bin())
        .args(["compress", "--store"])
        .arg(&input)
        .status()
        .unwrap();
    assert!(st.success());

    let bytes = std::fs::read(dir.path().join("font.tex.lz")).unwrap();
    assert_eq!(&bytes[1..4], b"3;0");
    assert_eq!(bytes.len(), 2000 + 8);
}

#[test]
fn cli_refuses_overwrite_without_force() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("a.bin");
    std::fs::write(&input, b"payload payload payload").unwrap();
    std::fs::write(dir.path().join("a.bin.lz"), b"keep").unwrap();

    let out = Command::new(bin())
        .arg("compress")
        .arg(&input)
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Error:"));
    assert_eq!(std::fs::read(dir.path().join("a.bin.lz")).unwrap(), b"keep");

    let st = Command::new(bin())
        .args(["compress", "-f"])
        .arg(&input)
        .status()
        .unwrap();
    assert!(st.success());
}

#[test]
fn cli_decompress_headerless_copies_raw() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("entry_0003");
    std::fs::write(&input, b"RIFF....WAVEfmt ").unwrap();

    let st = Command::new(bin())
        .args(["decompress", "--length", "8"])
        .arg(&input)
        .status()
        .unwrap();
    assert!(st.success());
    assert_eq!(
        std::fs::read(dir.path().join("entry_0003.out")).unwrap(),
        b"RIFF...."
    );
}

#[test]
fn cli_info_json() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("msg.bin");
    std::fs::write(&input, script(3000)).unwrap();
    assert!(
        Command::new(bin())
            .arg("compress")
            .arg(&input)
            .status()
            .unwrap()
            .success()
    );

    let out = Command::new(bin())
        .args(["info", "--json"])
        .arg(dir.path().join("msg.bin.lz"))
        .output()
        .unwrap();
    assert!(out.status.success());

    let info: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(info["method"], "windowed");
    assert_eq!(info["tag"], "3;1");
    assert_eq!(info["flag"], 0x20);
    assert_eq!(info["original_size"], 3000);
    assert_eq!(info["decoded_size"], 3000);
    assert!(info["tokens"]["matches"].as_u64().unwrap() > 0);
    assert!(info.get("error").is_none());
}

#[test]
fn cli_info_traced_counts_match_quiet() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("msg.bin");
    std::fs::write(&input, script(3000)).unwrap();
    assert!(
        Command::new(bin())
            .arg("compress")
            .arg(&input)
            .status()
            .unwrap()
            .success()
    );
    let packed = dir.path().join("msg.bin.lz");

    let run = |extra: &[&str]| {
        let out = Command::new(bin())
            .args(["info", "--json"])
            .args(extra)
            .arg(&packed)
            .output()
            .unwrap();
        assert!(out.status.success());
        let info: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
        (info["tokens"].clone(), String::from_utf8_lossy(&out.stderr).into_owned())
    };

    let (quiet, _) = run(&[]);
    let (traced, stderr) = run(&["-vv"]);
    assert_eq!(quiet, traced);
    assert!(stderr.contains("[CTRL] Group 1 @0x0008"));
}

#[test]
fn cli_info_rejects_unknown_tag() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("image.png");
    std::fs::write(&input, b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR").unwrap();

    let out = Command::new(bin()).arg("info").arg(&input).output().unwrap();
    assert!(!out.status.success());
}

#[test]
fn cli_trace_writes_log() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("msg.bin");
    std::fs::write(&input, script(1500)).unwrap();

    let st = Command::new(bin())
        .arg("trace")
        .arg(&input)
        .status()
        .unwrap();
    assert!(st.success());

    let log = std::fs::read_to_string(dir.path().join("msg.bin.lz.clog")).unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines[0], "=== Compression Log ===");
    // A group's tokens are logged before its control byte.
    assert!(lines[1].starts_with("[RAW]  @0x0009: "));
    let first_group = lines
        .iter()
        .position(|line| line.starts_with("[CTRL]"))
        .unwrap();
    assert!(first_group > 1);
    assert!(lines[first_group].starts_with("[CTRL] Group 1 @0x0008 ("));
    assert!(log.contains("[LZ77] @0x"));
    assert!(log.contains("=== Summary ==="));
    assert!(log.contains("Raw bytes:"));
    assert!(dir.path().join("msg.bin.lz").exists());
}

#[test]
fn cli_completions_bash() {
    let out = Command::new(bin())
        .args(["completions", "bash"])
        .output()
        .unwrap();
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("oxidat"));
}
