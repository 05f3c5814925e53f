use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;
use serde_json::Value;

use crate::{CliTest, stderr};

const SOURCE: &str = r#"import * as nls from '../../nls';

export const title = nls.localize('title', "Explorer");
export const open = nls.localize2({ key: 'open', comment: ['Open a file'] }, 'Open');
"#;

#[test]
fn test_nls_transforms_sources_and_writes_artifacts() -> Result<()> {
    let test = CliTest::with_file("src/vs/workbench/explorer.ts", SOURCE)?;
    test.write_file("src/vs/base/plain.ts", "export const x = 1;\n")?;

    test.snapshot_settings().bind(|| {
        assert_cmd_snapshot!(test.nls_command(), @r"
        success: true
        exit_code: 0
        ----- stdout -----
        ✓ Transformed 1 file of 2 (2 localize calls) in [TIME]
          2 messages written to [ROOT]/out-build

        ----- stderr -----
        ");
    });

    let transformed = test.read_file("out-build/vs/workbench/explorer.ts")?;
    assert!(transformed.contains(r#"nls.localize("%%NLS:vs/workbench/explorer#title%%", "Explorer")"#));
    assert!(transformed.contains(r#"nls.localize2("%%NLS2:vs/workbench/explorer#open%%", 'Open')"#));
    assert_eq!(test.read_file("out-build/vs/base/plain.ts")?, "export const x = 1;\n");

    let messages: Value = serde_json::from_str(&test.read_file("out-build/nls.messages.json")?)?;
    assert_eq!(messages, serde_json::json!(["Open", "Explorer"]));

    let keys: Value = serde_json::from_str(&test.read_file("out-build/nls.keys.json")?)?;
    assert_eq!(
        keys,
        serde_json::json!([[
            "vs/workbench/explorer",
            [{ "key": "open", "comment": ["Open a file"] }, "title"]
        ]])
    );

    assert_eq!(
        test.read_file("out-build/nls.messages.js")?,
        r#"globalThis._NLS_MESSAGES=["Open","Explorer"];"#
    );
    assert!(test.root().join("out-build/nls.metadata.json").exists());
    assert!(test.root().join("out-build/nls.placeholders.json").exists());

    Ok(())
}

#[test]
fn test_nls_honours_config_and_flags() -> Result<()> {
    let test = CliTest::with_file("source/vs/a.ts", SOURCE)?;
    test.write_file(
        ".nlsmanglerc.json",
        r#"{ "sourceRoot": "./source", "nlsGlobal": "_VSCODE_NLS_MESSAGES", "extraOutDirs": ["./dist"] }"#,
    )?;

    let output = test.run(&["nls", "--out-dir", "build"])?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    assert!(
        test.read_file("build/nls.messages.js")?
            .starts_with("globalThis._VSCODE_NLS_MESSAGES=")
    );
    assert_eq!(
        test.read_file("build/nls.messages.json")?,
        test.read_file("dist/nls.messages.json")?
    );

    Ok(())
}

#[test]
fn test_nls_fails_on_unsupported_key() -> Result<()> {
    let test = CliTest::with_file(
        "src/vs/a.ts",
        "import { localize } from '../nls';\nconst key = 'k';\nlocalize(key, 'Dynamic');\n",
    )?;

    let output = test.run(&["nls"])?;
    assert_eq!(output.status.code(), Some(2));
    let err = stderr(&output);
    assert!(err.contains("vs/a.ts:3:10"), "stderr: {err}");
    assert!(!test.root().join("out-build/nls.messages.json").exists());

    Ok(())
}
