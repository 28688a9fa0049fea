//! All-or-nothing file writes

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

/// Write `contents` to a uniquely named sibling temporary file, then rename it
/// over `path`.
///
/// Readers see either the old file or the complete new one. The temporary
/// file is removed on every failure path.
pub fn write_atomically(path: &Path, contents: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::Builder::new()
        .prefix(&temp_prefix(path))
        .suffix(".tmp")
        .tempfile_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    persist(tmp, path)
}

fn persist(tmp: NamedTempFile, path: &Path) -> io::Result<()> {
    tmp.persist(path).map(drop).map_err(|e| e.error)
}

/// `.name.` so leftovers are hidden and traceable to their target
fn temp_prefix(path: &Path) -> OsString {
    let mut prefix = OsString::from(".");
    prefix.push(path.file_name().unwrap_or_else(|| path.as_os_str()));
    prefix.push(".");
    prefix
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Arc;
    use std::thread;

    use super::*;

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.yml");
        fs::write(&path, "old").unwrap();

        write_atomically(&path, b"new").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert_eq!(entries(dir.path()), vec!["layout.yml"]);
    }

    #[test]
    fn test_missing_directory_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.png");
        assert!(write_atomically(&path, b"data").is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_failed_rename_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("taken");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("inner"), "x").unwrap();

        assert!(write_atomically(&target, b"data").is_err());
        assert_eq!(entries(dir.path()), vec!["taken"]);
    }

    #[test]
    fn test_concurrent_writers_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let path = Arc::new(dir.path().join("out.png"));

        let writers: Vec<_> = (0..8u8)
            .map(|i| {
                let path = Arc::clone(&path);
                thread::spawn(move || write_atomically(&path, &[i; 64]))
            })
            .collect();
        for writer in writers {
            writer.join().unwrap().unwrap();
        }

        let written = fs::read(&*path).unwrap();
        assert_eq!(written.len(), 64);
        assert!(written.iter().all(|b| *b == written[0]));
        assert_eq!(entries(dir.path()), vec!["out.png"]);
    }

    #[test]
    fn test_temp_prefix() {
        assert_eq!(temp_prefix(Path::new("/tmp/out.png")), OsString::from(".out.png."));
    }
}
