//! Writing generated files to disk

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ProjectWriteError {
    #[error("Refusing to write outside the output directory: {path}")]
    UnsafePath { path: String },

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Output location for a relative project path, `None` when the path is empty,
/// absolute or climbs out of the project root
fn resolve(out_dir: &Path, relative: &str) -> Option<PathBuf> {
    let relative = Path::new(relative);
    let mut resolved = out_dir.to_path_buf();
    let mut depth = 0;

    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                resolved.push(part);
                depth += 1;
            }
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    (depth > 0).then_some(resolved)
}

/// Writes every file under `out_dir`, creating directories as needed
///
/// All paths are checked before anything is written, so an unsafe path leaves
/// the directory untouched.
pub fn write_project(
    files: &BTreeMap<String, String>,
    out_dir: &Path,
) -> Result<Vec<PathBuf>, ProjectWriteError> {
    let targets = files
        .iter()
        .map(|(path, content)| {
            resolve(out_dir, path)
                .map(|target| (target, content))
                .ok_or_else(|| ProjectWriteError::UnsafePath { path: path.clone() })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut written = Vec::with_capacity(targets.len());
    for (target, content) in targets {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|source| ProjectWriteError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&target, content).map_err(|source| ProjectWriteError::Io {
            path: target.clone(),
            source,
        })?;
        debug!("Wrote {}", target.display());
        written.push(target);
    }

    Ok(written)
}
