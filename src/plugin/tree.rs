use std::fs;
use std::io;
use std::path::Path;

use ignore::WalkBuilder;

use crate::error::{InstallError, InstallResult};

/// Recursively copies `src` to `dst`. Symbolic links are recreated as links
/// with the same target; they are never followed. `dst` must not exist.
pub fn copy_tree(src: &Path, dst: &Path) -> InstallResult<usize> {
    let copy_err = |path: &Path, source: io::Error| InstallError::CopyFailed {
        path: path.to_path_buf(),
        source,
    };

    let mut copied = 0;
    let walker = WalkBuilder::new(src)
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    for entry in walker {
        let entry = entry.map_err(|err| copy_err(src, walk_error_to_io(err)))?;
        let path = entry.path();
        let relative = path.strip_prefix(src).unwrap_or(path);
        let target = dst.join(relative);

        let Some(file_type) = entry.file_type() else {
            continue;
        };

        if file_type.is_symlink() {
            let link = fs::read_link(path).map_err(|e| copy_err(path, e))?;
            make_symlink(&link, path, &target).map_err(|e| copy_err(&target, e))?;
        } else if file_type.is_dir() {
            fs::create_dir(&target).map_err(|e| copy_err(&target, e))?;
            continue;
        } else {
            fs::copy(path, &target).map_err(|e| copy_err(path, e))?;
        }

        tracing::trace!(from = %path.display(), to = %target.display(), "copied");
        copied += 1;
    }

    Ok(copied)
}

/// Removes whatever is at `path`. A symlink is unlinked rather than followed.
pub fn remove_tree(path: &Path) -> io::Result<()> {
    let metadata = fs::symlink_metadata(path)?;
    if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

pub fn remove_tree_checked(path: &Path) -> InstallResult<()> {
    remove_tree(path).map_err(|source| InstallError::RemoveFailed {
        path: path.to_path_buf(),
        source,
    })
}

pub fn exists_no_follow(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

fn walk_error_to_io(err: ignore::Error) -> io::Error {
    match err.into_io_error() {
        Some(io_err) => io_err,
        None => io::Error::other("directory walk failed"),
    }
}

#[cfg(unix)]
fn make_symlink(link: &Path, _original: &Path, target: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(link, target)
}

// Resolved on the source side: the destination sibling may not be copied yet.
#[cfg(windows)]
fn make_symlink(link: &Path, original: &Path, target: &Path) -> io::Result<()> {
    let resolved = original.parent().map(|p| p.join(link)).unwrap_or_default();
    if resolved.is_dir() {
        std::os::windows::fs::symlink_dir(link, target)
    } else {
        std::os::windows::fs::symlink_file(link, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn copies_nested_files_and_hidden_entries() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("Widget");
        fs::create_dir_all(src.join("Resources/Images")).unwrap();
        fs::write(src.join("Widget"), b"binary").unwrap();
        fs::write(src.join("Resources/Images/icon.png"), b"png").unwrap();
        fs::write(src.join(".gitignore"), b"*.png\n").unwrap();

        let dst = tmp.path().join("out");
        let copied = copy_tree(&src, &dst).unwrap();

        assert_eq!(copied, 3);
        assert_eq!(fs::read(dst.join("Widget")).unwrap(), b"binary");
        assert_eq!(fs::read(dst.join("Resources/Images/icon.png")).unwrap(), b"png");
        assert!(dst.join(".gitignore").is_file());
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_copied_as_links() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("Widget");
        fs::create_dir_all(src.join("Versions/A")).unwrap();
        fs::write(src.join("Versions/A/lib"), b"lib").unwrap();
        std::os::unix::fs::symlink("Versions/A", src.join("Current")).unwrap();
        std::os::unix::fs::symlink("missing", src.join("dangling")).unwrap();

        let dst = tmp.path().join("out");
        copy_tree(&src, &dst).unwrap();

        let current = dst.join("Current");
        assert!(fs::symlink_metadata(&current).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_link(&current).unwrap(), PathBuf::from("Versions/A"));
        assert!(fs::symlink_metadata(dst.join("dangling")).unwrap().file_type().is_symlink());
    }

    #[test]
    fn copy_into_existing_destination_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("Widget");
        fs::create_dir(&src).unwrap();
        let dst = tmp.path().join("out");
        fs::create_dir(&dst).unwrap();

        let err = copy_tree(&src, &dst).unwrap_err();
        assert!(matches!(err, InstallError::CopyFailed { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn remove_tree_unlinks_symlink_without_following() {
        let tmp = tempfile::tempdir().unwrap();
        let real = tmp.path().join("real");
        fs::create_dir(&real).unwrap();
        fs::write(real.join("keep"), b"x").unwrap();
        let link = tmp.path().join("link");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        remove_tree(&link).unwrap();

        assert!(!exists_no_follow(&link));
        assert!(real.join("keep").is_file());
    }

    #[test]
    fn remove_missing_path_reports_path() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope");

        match remove_tree_checked(&missing) {
            Err(InstallError::RemoveFailed { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected RemoveFailed, got {other:?}"),
        }
    }

    #[cfg(windows)]
    #[test]
    fn directory_links_stay_directory_links() {
        use std::os::windows::fs::FileTypeExt;

        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("Widget");
        fs::create_dir_all(src.join("Versions/A")).unwrap();
        if std::os::windows::fs::symlink_dir("Versions\\A", src.join("Current")).is_err() {
            // Creating symlinks needs developer mode or elevation.
            return;
        }

        let dst = tmp.path().join("out");
        copy_tree(&src, &dst).unwrap();

        let file_type = fs::symlink_metadata(dst.join("Current")).unwrap().file_type();
        assert!(file_type.is_symlink_dir());
    }
}
