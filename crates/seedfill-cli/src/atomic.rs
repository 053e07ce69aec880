use std::fs::{OpenOptions, create_dir_all};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::CliError;

/// Writes `data` to a sibling temp file, syncs it, then renames it over
/// `path`. Readers never observe a partially written file.
pub fn write_bytes_atomic(path: &Path, data: &[u8]) -> Result<(), CliError> {
    let parent = path.parent().filter(|parent| !parent.as_os_str().is_empty());
    if let Some(parent) = parent {
        create_dir_all(parent)?;
    }

    let tmp_path = temp_path(path)?;
    let mut file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(&tmp_path)?;
    file.write_all(data)?;
    file.sync_all()?;

    std::fs::rename(&tmp_path, path)?;
    if let Some(parent) = parent {
        sync_dir(parent)?;
    }

    Ok(())
}

fn temp_path(path: &Path) -> Result<PathBuf, CliError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| CliError::InvalidConfig(format!("invalid output path '{}'", path.display())))?;
    let tmp_name = format!("{}.tmp", file_name.to_string_lossy());
    Ok(path.with_file_name(tmp_name))
}

fn sync_dir(path: &Path) -> io::Result<()> {
    let dir = OpenOptions::new().read(true).open(path)?;
    dir.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(label: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "seedfill_atomic_{label}_{}",
            uuid::Uuid::new_v4()
        ));
        create_dir_all(&dir).expect("create temp dir");
        dir
    }

    #[test]
    fn replaces_existing_file_without_leftovers() {
        let dir = temp_dir("replace");
        let path = dir.join("nested").join("value.json");
        write_bytes_atomic(&path, b"{\"a\":1}").expect("first write");
        write_bytes_atomic(&path, b"{\"a\":2}").expect("second write");

        assert_eq!(std::fs::read(&path).expect("read"), b"{\"a\":2}");
        assert!(!path.with_file_name("value.json.tmp").exists());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn rejects_paths_without_file_name() {
        let result = write_bytes_atomic(Path::new("/"), b"x");
        assert!(result.is_err());
    }
}
