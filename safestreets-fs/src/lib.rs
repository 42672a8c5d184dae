//! Capability-based file access for SafeStreets data files.
//!
//! Every helper anchors the target path to an ambient directory handle from
//! `cap-std` and then works relative to it. Writes go through a sibling
//! temporary file that is renamed over the target, so readers never see a
//! half-written street collection.
#![forbid(unsafe_code)]

use std::io::{self, Read, Write};
use std::path::Component;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use log::debug;

/// Directory handle plus the path of the target relative to it.
struct Anchored {
    dir: fs_utf8::Dir,
    relative: Utf8PathBuf,
}

/// Split `path` into an ambient base directory and a relative remainder.
///
/// Absolute paths anchor at the filesystem root (or the drive prefix on
/// Windows); relative paths anchor at the current directory.
fn anchor(path: &Utf8Path) -> io::Result<Anchored> {
    let std_path = path.as_std_path();
    let base = match std_path.components().next() {
        Some(Component::Prefix(prefix)) => {
            let drive = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;
            Utf8PathBuf::from(drive).join(std::path::MAIN_SEPARATOR_STR)
        }
        Some(Component::RootDir) => Utf8PathBuf::from(std::path::MAIN_SEPARATOR_STR),
        _ => Utf8PathBuf::from("."),
    };
    let relative = if base.as_str() == "." {
        path.to_path_buf()
    } else {
        path.strip_prefix(&base)
            .map_err(|_| io::Error::other(format!("cannot strip {base} from {path}")))?
            .to_path_buf()
    };
    let dir = fs_utf8::Dir::open_ambient_dir(&base, ambient_authority())?;
    Ok(Anchored { dir, relative })
}

/// Open the directory containing `path` and return it with the file name.
fn parent_and_name(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::other(format!("{path} does not name a file")))?
        .to_owned();
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, name))
}

/// Whether the existing entry at `path` is a regular file.
///
/// # Errors
///
/// Returns an [`io::ErrorKind::NotFound`] error when `path` or its parent
/// does not exist, and any other error raised while reading metadata.
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = parent_and_name(path)?;
    dir.metadata(name.as_str()).map(|meta| meta.is_file())
}

/// Create every missing directory above `path`.
///
/// # Errors
///
/// Returns an error when a directory cannot be created.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_str().is_empty() {
        return Ok(());
    }
    let anchored = anchor(parent)?;
    if anchored.relative.as_str().is_empty() {
        return Ok(());
    }
    anchored.dir.create_dir_all(&anchored.relative)
}

/// Read the whole of `path` as UTF-8 text.
///
/// # Errors
///
/// Returns an error when the file cannot be opened or is not valid UTF-8.
pub fn read_to_string(path: &Utf8Path) -> io::Result<String> {
    let mut file = fs_utf8::File::open_ambient(path, ambient_authority())?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    debug!("read {} bytes from {path}", contents.len());
    Ok(contents)
}

/// Replace the contents of `path` with `bytes`, creating parent directories
/// as needed.
///
/// The data is written to a temporary sibling first and renamed into place.
///
/// # Errors
///
/// Returns an error when a directory, the temporary file, or the rename
/// fails. The temporary file is removed on a failed write.
pub fn write_atomically(path: &Utf8Path, bytes: &[u8]) -> io::Result<()> {
    ensure_parent_dir(path)?;
    let (dir, name) = parent_and_name(path)?;
    let staging = format!(".{name}.tmp");
    let written = dir.create(&staging).and_then(|mut file| {
        file.write_all(bytes)?;
        file.sync_all()
    });
    if let Err(err) = written {
        if let Err(cleanup) = dir.remove_file(&staging) {
            debug!("could not remove {staging} after failed write: {cleanup}");
        }
        return Err(err);
    }
    dir.rename(&staging, &dir, &name)?;
    debug!("wrote {} bytes to {path}", bytes.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn workdir() -> (TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().expect("temporary directory");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("UTF-8 temp path");
        (dir, root)
    }

    #[rstest]
    fn writes_create_missing_parents(workdir: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = workdir;
        let target = root.join("nested/deeper/streets.json");
        write_atomically(&target, b"[]").expect("write succeeds");
        assert_eq!(read_to_string(&target).expect("read back"), "[]");
        assert!(file_is_file(&target).expect("metadata"));
    }

    #[rstest]
    fn rewrites_replace_previous_contents(workdir: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = workdir;
        let target = root.join("streets.json");
        write_atomically(&target, b"first").expect("first write");
        write_atomically(&target, b"second").expect("second write");
        assert_eq!(read_to_string(&target).expect("read back"), "second");
        let staging = file_is_file(&root.join(".streets.json.tmp")).expect_err("no staging file");
        assert_eq!(staging.kind(), io::ErrorKind::NotFound);
    }

    #[rstest]
    fn directories_are_not_files(workdir: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = workdir;
        assert!(!file_is_file(&root).expect("metadata"));
    }

    #[rstest]
    fn missing_entries_report_not_found(workdir: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = workdir;
        let err = file_is_file(&root.join("absent.json")).expect_err("missing entry");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[rstest]
    fn reading_a_missing_file_fails(workdir: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = workdir;
        let err = read_to_string(&root.join("absent.json")).expect_err("missing file");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
