//! Stats registry shared by every run in the working directory.
//! One line per completed run, semicolon separated:
//! `input_name;output_name;in_bytes;out_bytes;ratio;elapsed_ms`.
//! Appends are line-atomic, concurrent runs interleave whole lines.

use std::io::Write;
use std::path::Path;
use std::time::Duration;
use crate::STDRESULT;

const COMPRESSION_LOG: &str = "compression.txt";
const DECOMPRESSION_LOG: &str = "decompression.txt";

fn file_name(path: &str) -> &str {
    Path::new(path).file_name().and_then(|n| n.to_str()).unwrap_or(path)
}

fn append_record(log_path: &str,in_path: &str,out_path: &str,ratio_of: fn(u64,u64) -> f64,elapsed: Duration) -> STDRESULT {
    let in_bytes = std::fs::metadata(in_path)?.len();
    let out_bytes = std::fs::metadata(out_path)?.len();
    let ratio = ratio_of(in_bytes,out_bytes);
    let line = format!("{};{};{};{};{:.5};{}\n",
        file_name(in_path),file_name(out_path),in_bytes,out_bytes,ratio,elapsed.as_millis());
    let mut registry = std::fs::OpenOptions::new().append(true).create(true).open(log_path)?;
    registry.write_all(line.as_bytes())?;
    Ok(())
}

pub fn record_compression(in_path: &str,out_path: &str,elapsed: Duration) -> STDRESULT {
    append_record(COMPRESSION_LOG,in_path,out_path,
        |i,o| if i > 0 { o as f64 / i as f64 } else { 0.0 },elapsed)
}

/// Same numeric ratio as the matching compression run.
pub fn record_decompression(in_path: &str,out_path: &str,elapsed: Duration) -> STDRESULT {
    append_record(DECOMPRESSION_LOG,in_path,out_path,
        |i,o| if o > 0 { i as f64 / o as f64 } else { 0.0 },elapsed)
}

// *************** TESTS *****************

#[test]
fn records_have_six_fields() {
    let temp_dir = tempfile::tempdir().expect("no temp dir");
    let in_path = temp_dir.path().join("sample.txt");
    let out_path = temp_dir.path().join("sample.huff");
    std::fs::write(&in_path,"some text").unwrap();
    std::fs::write(&out_path,[0u8;8]).unwrap();
    let log_path = temp_dir.path().join("registry.txt");
    append_record(log_path.to_str().unwrap(),in_path.to_str().unwrap(),out_path.to_str().unwrap(),
        |i,o| if i > 0 { o as f64 / i as f64 } else { 0.0 },Duration::from_millis(12)).unwrap();
    let line = std::fs::read_to_string(&log_path).unwrap();
    let fields: Vec<&str> = line.trim_end().split(';').collect();
    assert_eq!(fields,vec!["sample.txt","sample.huff","9","8","0.88889","12"]);
}
