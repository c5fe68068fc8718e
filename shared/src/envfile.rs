// SPDX-License-Identifier: MIT

//! Upserts of `KEY=VALUE` lines in a dotenv-style file.

use std::{fs, io, path::Path};

/// Key of a `KEY=VALUE` line, ignoring comments and blank lines.
fn line_key(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    if trimmed.starts_with('#') {
        return None;
    }
    let (key, _) = trimmed.split_once('=')?;
    Some(key.trim_end())
}

/// Replaces the line holding `key` or appends one. Later duplicates of the key
/// are dropped so the result always holds exactly one line for it.
pub fn upsert(contents: &str, key: &str, value: &str) -> String {
    let entry = format!("{key}={value}");
    let mut replaced = false;
    let mut lines: Vec<&str> = Vec::new();

    for line in contents.lines() {
        if line_key(line) == Some(key) {
            if !replaced {
                lines.push(&entry);
                replaced = true;
            }
            continue;
        }
        lines.push(line);
    }
    if !replaced {
        lines.push(&entry);
    }

    let mut updated = lines.join("\n");
    updated.push('\n');
    updated
}

/// Applies every `(key, value)` upsert to the file at `path`, creating it
/// (and its parent directories) when missing.
pub fn upsert_file(path: &Path, entries: &[(&str, &str)]) -> io::Result<()> {
    let mut contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => String::new(),
        Err(err) => return Err(err),
    };

    for (key, value) in entries {
        contents = upsert(&contents, key, value);
    }

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "LOCALHOST_PRODUCT_CONTRACT_ADDRESS";

    #[test]
    fn replaces_existing_value_in_place() {
        let contents = "RPC_URL=http://127.0.0.1:8545\nLOCALHOST_PRODUCT_CONTRACT_ADDRESS=0xold\nCHAIN_ID=31337\n";
        let updated = upsert(contents, KEY, "0xabc");

        assert_eq!(
            updated,
            "RPC_URL=http://127.0.0.1:8545\nLOCALHOST_PRODUCT_CONTRACT_ADDRESS=0xabc\nCHAIN_ID=31337\n"
        );
    }

    #[test]
    fn appends_missing_key() {
        assert_eq!(upsert("CHAIN_ID=31337", KEY, "0xabc"), "CHAIN_ID=31337\nLOCALHOST_PRODUCT_CONTRACT_ADDRESS=0xabc\n");
        assert_eq!(upsert("", KEY, "0xabc"), "LOCALHOST_PRODUCT_CONTRACT_ADDRESS=0xabc\n");
    }

    #[test]
    fn upsert_is_idempotent() {
        let once = upsert("# contracts\nCHAIN_ID=31337\n", KEY, "0xabc");
        let twice = upsert(&once, KEY, "0xabc");

        assert_eq!(once, twice);
        assert_eq!(twice.lines().filter(|line| line.starts_with(KEY)).count(), 1);
    }

    #[test]
    fn key_prefixes_and_comments_are_not_matches() {
        let contents = "# LOCALHOST_PRODUCT_CONTRACT_ADDRESS=0xcomment\nLOCALHOST_PRODUCT_CONTRACT_ADDRESS_V2=0xv2\n";
        let updated = upsert(contents, KEY, "0xabc");

        assert!(updated.contains("# LOCALHOST_PRODUCT_CONTRACT_ADDRESS=0xcomment"));
        assert!(updated.contains("LOCALHOST_PRODUCT_CONTRACT_ADDRESS_V2=0xv2"));
        assert!(updated.ends_with("LOCALHOST_PRODUCT_CONTRACT_ADDRESS=0xabc\n"));
    }

    #[test]
    fn duplicated_keys_collapse_to_one_line() {
        let contents = "CONTRACT_ADDRESS=0x1\nOTHER=1\nCONTRACT_ADDRESS=0x2\n";
        assert_eq!(upsert(contents, "CONTRACT_ADDRESS", "0x3"), "CONTRACT_ADDRESS=0x3\nOTHER=1\n");
    }

    #[test]
    fn creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");

        upsert_file(&path, &[("CONTRACT_ADDRESS", "0xabc"), ("LOCALHOST_CONTRACT_ADDRESS", "0xabc")]).unwrap();
        upsert_file(&path, &[("CONTRACT_ADDRESS", "0xabc")]).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "CONTRACT_ADDRESS=0xabc\nLOCALHOST_CONTRACT_ADDRESS=0xabc\n"
        );
    }
}
