//! JSON config and state files.

use crate::error::{CliError, CliResult};
use serde_json::Value;
use std::fs;
use std::path::Path;

pub fn read_json(path: &Path) -> CliResult<Value> {
    let raw = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a state file; a missing file means the instance does not exist yet.
pub fn read_state(path: &Path) -> CliResult<Option<Value>> {
    if !path.exists() {
        return Ok(None);
    }
    read_json(path).map(Some)
}

/// Write pretty JSON, replacing the file through a sibling temp file.
pub fn write_json(path: &Path, value: &Value) -> CliResult<()> {
    let write_err = |source| CliError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut body = serde_json::to_string_pretty(value)?;
    body.push('\n');

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, body).map_err(write_err)?;
    fs::rename(&tmp, path).map_err(write_err)
}

pub fn remove(path: &Path) -> CliResult<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(CliError::Write {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_state_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        assert!(read_state(&path).unwrap().is_none());

        write_json(&path, &json!({"key": "document"})).unwrap();
        assert_eq!(read_state(&path).unwrap(), Some(json!({"key": "document"})));
        assert!(!path.with_extension("json.tmp").exists());

        remove(&path).unwrap();
        remove(&path).unwrap();
        assert!(read_state(&path).unwrap().is_none());
    }

    #[test]
    fn test_invalid_json_is_reported_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let err = read_json(&path).unwrap_err();
        assert!(matches!(err, CliError::Json { .. }));
        assert!(err.to_string().contains("config.json"));
    }
}
