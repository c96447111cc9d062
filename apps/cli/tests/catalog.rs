use std::error::Error;
use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn catalog_lists_locales_and_missing_keys() -> Result<(), Box<dyn Error>> {
    let langs = tempdir()?;
    fs::write(
        langs.path().join("en.json"),
        r#"{ "locale": "en", "strings": { "hello": "hello", "bye": "bye" } }"#,
    )?;
    fs::write(
        langs.path().join("fr.json"),
        r#"{ "locale": "fr", "display_name": "Français", "strings": { "hello": "bonjour" } }"#,
    )?;

    Command::cargo_bin("l10n-cli")?
        .args([
            "--catalog",
            langs.path().to_str().unwrap(),
            "catalog",
            "--reference",
            "en",
        ])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Loaded 2 locale(s); default locale: en-US")
                .and(predicate::str::contains(" - en [en]: 2 strings [reference]"))
                .and(predicate::str::contains(
                    " - Français [fr]: 1 strings, missing 1 key(s)",
                ))
                .and(predicate::str::contains("· bye")),
        );

    Command::cargo_bin("l10n-cli")?
        .args([
            "--catalog",
            langs.path().to_str().unwrap(),
            "catalog",
            "--reference",
            "en",
            "--fail-on-missing",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 missing catalog key(s) detected"));
    Ok(())
}

#[test]
fn invalid_pack_reports_error() -> Result<(), Box<dyn Error>> {
    let langs = tempdir()?;
    fs::write(langs.path().join("bad.json"), "{")?;

    Command::cargo_bin("l10n-cli")?
        .args(["--catalog", langs.path().to_str().unwrap(), "catalog"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse catalog file"));
    Ok(())
}
