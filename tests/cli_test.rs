use assert_cmd::prelude::*; // Add methods on commands
use predicates::prelude::*;
use std::path::Path;
use std::process::Command; // Run programs
use tempfile;
type STDRESULT = Result<(),Box<dyn std::error::Error>>;

#[test]
fn cli_round_trip() -> STDRESULT {
    let in_path = std::fs::canonicalize(Path::new("tests").join("fable.txt"))?;
    let temp_dir = tempfile::tempdir()?;
    let huff_path = temp_dir.path().join("fable.huff");
    let out_path = temp_dir.path().join("fable_out.txt");
    let mut cmd = Command::cargo_bin("huffstream")?;
    cmd.current_dir(temp_dir.path())
        .arg("compress")
        .arg(&in_path)
        .arg(&huff_path)
        .assert()
        .success();
    let mut cmd = Command::cargo_bin("huffstream")?;
    cmd.current_dir(temp_dir.path())
        .arg("decompress")
        .arg(&huff_path)
        .arg(&out_path)
        .assert()
        .success();
    match (std::fs::read(&in_path),std::fs::read(&out_path)) {
        (Ok(v1),Ok(v2)) => {
            assert_eq!(v1,v2);
        },
        _ => panic!("unable to compare output with input")
    }
    // each run appends its record in the working directory
    assert!(temp_dir.path().join("compression.txt").exists());
    assert!(temp_dir.path().join("decompression.txt").exists());
    Ok(())
}

#[test]
fn compression_shrinks_the_fixture() -> STDRESULT {
    let in_path = std::fs::canonicalize(Path::new("tests").join("fable.txt"))?;
    let temp_dir = tempfile::tempdir()?;
    let huff_path = temp_dir.path().join("fable.huff");
    let mut cmd = Command::cargo_bin("huffstream")?;
    cmd.current_dir(temp_dir.path())
        .arg("compress")
        .arg(&in_path)
        .arg(&huff_path)
        .assert()
        .success();
    let in_size = std::fs::metadata(&in_path)?.len();
    let out_size = std::fs::metadata(&huff_path)?.len();
    assert!(out_size < in_size,"{} did not shrink below {}",out_size,in_size);
    Ok(())
}

#[test]
fn missing_subcommand_is_a_usage_error() -> STDRESULT {
    let mut cmd = Command::cargo_bin("huffstream")?;
    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Usage"));
    Ok(())
}

#[test]
fn wrong_arity_is_a_usage_error() -> STDRESULT {
    let mut cmd = Command::cargo_bin("huffstream")?;
    cmd.arg("compress")
        .arg("only_one_path")
        .assert()
        .failure()
        .code(1);
    Ok(())
}

#[test]
fn unreadable_input_fails() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let mut cmd = Command::cargo_bin("huffstream")?;
    cmd.current_dir(temp_dir.path())
        .arg("compress")
        .arg("no_such_file.txt")
        .arg("out.huff")
        .assert()
        .failure()
        .code(1);
    Ok(())
}
