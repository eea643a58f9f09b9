//! Solution and project discovery.
//!
//! A solution is a directory tree (or a `.sln` file, whose parent
//! directory is taken) holding projects; a project is a directory with a
//! `.csproj` file; documents are the `.cs` files beneath it. Pairing to
//! test projects follows the `<ProjectName>.Test` convention.

use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use strata_core::Conventions;
use thiserror::Error;

/// Errors while loading a solution.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// The solution path does not exist. Fatal: nothing can be analyzed.
    #[error("Solution path not found: {0}")]
    MissingRoot(PathBuf),

    /// Walking the directory tree failed.
    #[error("Failed to walk {path}: {source}")]
    Walk {
        /// Directory being walked.
        path: PathBuf,
        /// Underlying walker error.
        source: ignore::Error,
    },
}

/// One project: its name, directory, and owned documents.
#[derive(Debug, Clone)]
pub struct Project {
    /// Project name (the `.csproj` file stem).
    pub name: String,
    /// Directory containing the `.csproj`.
    pub dir: PathBuf,
    /// All `.cs` documents owned by this project.
    pub documents: Vec<PathBuf>,
}

/// A loaded solution.
#[derive(Debug)]
pub struct Solution {
    /// Root directory of the solution.
    pub root: PathBuf,
    /// All discovered projects.
    pub projects: Vec<Project>,
}

impl Solution {
    /// Loads a solution from a directory or `.sln` file path.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::MissingRoot`] if the path does not
    /// exist — the caller treats this as fatal — or a walk error if
    /// discovery fails.
    pub fn load(path: &Path, exclude: &[String]) -> Result<Self, WorkspaceError> {
        if !path.exists() {
            return Err(WorkspaceError::MissingRoot(path.to_path_buf()));
        }
        let root = if path.is_file() {
            path.parent().unwrap_or(Path::new(".")).to_path_buf()
        } else {
            path.to_path_buf()
        };

        let mut project_files = Vec::new();
        let mut documents = Vec::new();

        let mut builder = WalkBuilder::new(&root);
        builder.hidden(false).git_ignore(true);
        for entry in builder.build() {
            let entry = entry.map_err(|source| WorkspaceError::Walk {
                path: root.clone(),
                source,
            })?;
            let entry_path = entry.path();
            if !entry_path.is_file() || is_excluded(entry_path, &root, exclude) {
                continue;
            }
            match entry_path.extension().and_then(|e| e.to_str()) {
                Some("csproj") => project_files.push(entry_path.to_path_buf()),
                Some("cs") => documents.push(entry_path.to_path_buf()),
                _ => {}
            }
        }

        project_files.sort();
        documents.sort();

        let mut projects: Vec<Project> = project_files
            .iter()
            .filter_map(|file| {
                let name = file.file_stem()?.to_str()?.to_string();
                let dir = file.parent()?.to_path_buf();
                Some(Project {
                    name,
                    dir,
                    documents: Vec::new(),
                })
            })
            .collect();

        // Each document belongs to the deepest project directory above it.
        for document in documents {
            let owner = projects
                .iter_mut()
                .filter(|p| document.starts_with(&p.dir))
                .max_by_key(|p| p.dir.components().count());
            if let Some(project) = owner {
                project.documents.push(document);
            } else {
                tracing::debug!("Document outside any project: {}", document.display());
            }
        }

        tracing::info!(
            "Loaded solution at {} with {} project(s)",
            root.display(),
            projects.len()
        );

        Ok(Self { root, projects })
    }

    /// Looks up a project by exact name.
    #[must_use]
    pub fn project(&self, name: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.name == name)
    }

    /// The test project paired with an implementation project, if any.
    #[must_use]
    pub fn test_project_for(
        &self,
        project_name: &str,
        conventions: &Conventions,
    ) -> Option<&Project> {
        self.project(&conventions.test_project_name(project_name))
    }
}

/// Whether a path contains an excluded segment (e.g. `bin`, `obj`).
fn is_excluded(path: &Path, root: &Path, exclude: &[String]) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative.components().any(|component| {
        if let std::path::Component::Normal(segment) = component {
            let segment = segment.to_string_lossy();
            exclude.iter().any(|e| segment.as_ref() == e.as_str())
        } else {
            false
        }
    })
}
