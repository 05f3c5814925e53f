use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;

use crate::{CliTest, stderr, stdout};

const COUNTER: &str = "class Counter {\n    #count = 0;\n    increment() { return ++this.#count; }\n}\n";

#[test]
fn test_mangle_converts_outputs() -> Result<()> {
    let test = CliTest::with_file("out-build/vs/counter.js", COUNTER)?;

    test.snapshot_settings().bind(|| {
        assert_cmd_snapshot!(test.mangle_command(), @r"
        success: true
        exit_code: 0
        ----- stdout -----
        ✓ Converted 1 file of 1: 1 class, 1 private name, 2 edits in [TIME]

        ----- stderr -----
        ");
    });

    assert_eq!(
        test.read_file("out-build/vs/counter.js")?,
        "class Counter {\n    $a = 0;\n    increment() { return ++this.$a; }\n}\n"
    );

    Ok(())
}

#[test]
fn test_mangle_excludes() -> Result<()> {
    let test = CliTest::with_file("out-build/vs/counter.js", COUNTER)?;
    test.write_file("out-build/vendor/counter.js", COUNTER)?;
    test.write_file(
        ".nlsmanglerc.json",
        r#"{ "mangle": { "excludes": ["vendor/**"] } }"#,
    )?;

    let output = test.run(&["mangle", "--exclude", "vs/skip/**"])?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("1 file excluded"));
    assert_eq!(test.read_file("out-build/vendor/counter.js")?, COUNTER);

    Ok(())
}

#[test]
fn test_mangle_disabled() -> Result<()> {
    let test = CliTest::with_file("out-build/vs/counter.js", COUNTER)?;
    test.write_file(".nlsmanglerc.json", r#"{ "mangle": { "enabled": false } }"#)?;

    let output = test.run(&["mangle"])?;
    assert!(output.status.success());
    assert!(stdout(&output).contains("disabled"));
    assert_eq!(test.read_file("out-build/vs/counter.js")?, COUNTER);

    Ok(())
}

#[test]
fn test_mangle_parse_error_continues_and_fails() -> Result<()> {
    let test = CliTest::with_file("out-build/a.js", COUNTER)?;
    test.write_file("out-build/b.js", "class Broken { #x = ; }\n")?;

    test.snapshot_settings().bind(|| {
        assert_cmd_snapshot!(test.mangle_command().args(["--dir", "out-build"]), @r"
        success: false
        exit_code: 1
        ----- stdout -----
        ✘ Converted 1 file of 2: 1 class, 1 private name, 2 edits in [TIME]

        ----- stderr -----
        warning: 1 file could not be processed (use -v for details)
        ");
    });
    assert!(!test.read_file("out-build/a.js")?.contains('#'));

    Ok(())
}
