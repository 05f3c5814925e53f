use anyhow::{Context, Result};
use insta_cmd::assert_cmd_snapshot;
use serde_json::Value;

use crate::{CliTest, stderr, stdout};

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.command().arg("init"), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Created .nlsmanglerc.json

    ----- stderr -----
    ");

    let content = test.read_file(".nlsmanglerc.json")?;
    let parsed: Value = serde_json::from_str(&content).context("Config should be valid JSON")?;
    assert_eq!(parsed["sourceRoot"], "./src");
    assert_eq!(parsed["outDir"], "./out-build");
    assert_eq!(parsed["nlsGlobal"], "_NLS_MESSAGES");
    assert_eq!(parsed["mangle"]["enabled"], true);

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::with_file(".nlsmanglerc.json", "{}")?;

    assert_cmd_snapshot!(test.command().arg("init"), @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    Error: .nlsmanglerc.json already exists
    ");
    assert_eq!(test.read_file(".nlsmanglerc.json")?, "{}");

    Ok(())
}

#[test]
fn test_invalid_config_is_an_error() -> Result<()> {
    let test = CliTest::with_file(".nlsmanglerc.json", r#"{ "ignores": ["[oops"] }"#)?;

    let output = test.run(&["nls"])?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Invalid glob pattern in 'ignores'"));

    Ok(())
}

#[test]
fn test_help_lists_commands() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.run(&["--help"])?;
    let help = stdout(&output);
    for command in ["nls", "postprocess", "mangle", "init"] {
        assert!(help.contains(command), "missing {command} in help");
    }

    Ok(())
}
