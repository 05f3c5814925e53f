use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;

use crate::{CliTest, stderr, stdout};

fn project_with_index() -> Result<CliTest> {
    let test = CliTest::with_file(
        "src/vs/a.ts",
        "import { localize, localize2 } from '../nls';\nlocalize('hello', \"Hello\");\nlocalize2('title', 'Title');\n",
    )?;
    let output = test.run(&["nls"])?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    // Compiled output of the transformed source.
    test.write_file(
        "out-build/vs/a.js",
        "localize(\"%%NLS:vs/a#hello%%\", \"Hello\");\nlocalize2(\"%%NLS2:vs/a#title%%\", 'Title');\n",
    )?;
    Ok(test)
}

#[test]
fn test_postprocess_production_mode() -> Result<()> {
    let test = project_with_index()?;

    // `nls.messages.js` is scanned too but holds no placeholders.
    test.snapshot_settings().bind(|| {
        assert_cmd_snapshot!(test.postprocess_command(), @r"
        success: true
        exit_code: 0
        ----- stdout -----
        ✓ Post-processed 1 file of 2: 2 placeholders replaced, 1 message blanked in [TIME]

        ----- stderr -----
        ");
    });

    assert_eq!(
        test.read_file("out-build/vs/a.js")?,
        "localize(0, null);\nlocalize2(1, 'Title');\n"
    );

    Ok(())
}

#[test]
fn test_postprocess_preserve_english() -> Result<()> {
    let test = project_with_index()?;

    let output = test.run(&["postprocess", "--preserve-english"])?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    assert_eq!(
        test.read_file("out-build/vs/a.js")?,
        "localize(0, \"Hello\");\nlocalize2(1, 'Title');\n"
    );

    Ok(())
}

#[test]
fn test_postprocess_reports_missing_placeholders() -> Result<()> {
    let test = project_with_index()?;
    test.write_file(
        "out-build/vs/stale.js",
        "localize(\"%%NLS:vs/stale#gone%%\", \"Gone\");\n",
    )?;

    let output = test.run(&["postprocess", "-v"])?;
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("1 placeholder not found in the index"));
    assert!(out.contains("%%NLS:vs/stale#gone%%"));
    assert_eq!(
        test.read_file("out-build/vs/stale.js")?,
        "localize(\"%%NLS:vs/stale#gone%%\", \"Gone\");\n"
    );

    Ok(())
}

#[test]
fn test_postprocess_without_index_is_an_error() -> Result<()> {
    let test = CliTest::with_file("out-build/a.js", "x();\n")?;

    let output = test.run(&["postprocess"])?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("nls.placeholders.json"));

    Ok(())
}
