use crate::error::AuditError;
use std::fs;
use std::path::{Path, PathBuf};

/// A file found under the controller root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerSource {
    /// Path relative to the root, `/` separated.
    pub relative_path: String,
    /// Namespace, sub-directories and file stem joined with `::`; a
    /// `mod.rs` file names its directory module.
    pub identifier: String,
    pub path: PathBuf,
}

/// Recursively list every file under `root`.
///
/// Entries are visited in file name order inside each directory, so the
/// result is stable across platforms.
pub fn discover(root: &Path, namespace: &str) -> Result<Vec<ControllerSource>, AuditError> {
    let metadata = fs::metadata(root).map_err(|e| AuditError::UnreadableRoot {
        path: root.to_path_buf(),
        reason: e.to_string(),
    })?;
    if !metadata.is_dir() {
        return Err(AuditError::UnreadableRoot {
            path: root.to_path_buf(),
            reason: "not a directory".to_string(),
        });
    }

    let entries = sorted_entries(root).map_err(|e| AuditError::UnreadableRoot {
        path: root.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut sources = Vec::new();
    walk(entries, &mut Vec::new(), namespace, &mut sources)?;
    Ok(sources)
}

fn walk(
    entries: Vec<(PathBuf, fs::FileType)>,
    dirs: &mut Vec<String>,
    namespace: &str,
    sources: &mut Vec<ControllerSource>,
) -> Result<(), AuditError> {
    for (path, file_type) in entries {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        // Symlinked directories are never followed.
        if file_type.is_symlink() && fs::metadata(&path).map_or(true, |meta| meta.is_dir()) {
            tracing::warn!(path = %path.display(), "skipping symlinked directory or broken link");
            continue;
        }

        if file_type.is_dir() {
            let children = sorted_entries(&path).map_err(|source| AuditError::Io {
                path: path.clone(),
                source,
            })?;
            dirs.push(name);
            walk(children, dirs, namespace, sources)?;
            dirs.pop();
            continue;
        }

        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut relative = dirs.clone();
        relative.push(name);

        let mut segments: Vec<&str> = Vec::with_capacity(dirs.len() + 2);
        if !namespace.is_empty() {
            segments.push(namespace);
        }
        segments.extend(dirs.iter().map(String::as_str));
        // `<dir>/mod.rs` is the module `<dir>` itself.
        if stem != "mod" {
            segments.push(&stem);
        }

        sources.push(ControllerSource {
            relative_path: relative.join("/"),
            identifier: segments.join("::"),
            path,
        });
    }
    Ok(())
}

fn sorted_entries(dir: &Path) -> std::io::Result<Vec<(PathBuf, fs::FileType)>> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.and_then(|entry| Ok((entry.path(), entry.file_type()?))))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by(|(a, _), (b, _)| a.file_name().cmp(&b.file_name()));
    Ok(entries)
}
