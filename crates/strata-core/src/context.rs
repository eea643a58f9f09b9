//! Context types for rule execution.

use std::path::{Path, PathBuf};

/// Context about the document being analyzed.
///
/// Rules receive this alongside the syntax tree and use it to anchor
/// findings and make path-aware decisions.
#[derive(Debug, Clone)]
pub struct DocumentContext<'a> {
    /// Absolute path to the document.
    pub path: &'a Path,
    /// Document contents.
    pub content: &'a str,
    /// Name of the project that owns this document.
    pub project: &'a str,
    /// Path relative to the solution root.
    pub relative_path: PathBuf,
}

impl<'a> DocumentContext<'a> {
    /// Creates a new document context.
    #[must_use]
    pub fn new(path: &'a Path, content: &'a str, project: &'a str, root: &Path) -> Self {
        let relative_path = path
            .strip_prefix(root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf);

        Self {
            path,
            content,
            project,
            relative_path,
        }
    }

    /// Calculates the byte offset for a 1-indexed line and column.
    ///
    /// Returns 0 for out-of-range lines.
    #[must_use]
    pub fn offset_for(&self, line: usize, column: usize) -> usize {
        if line == 0 {
            return 0;
        }

        let mut offset = 0;
        for (i, line_content) in self.content.lines().enumerate() {
            if i + 1 == line {
                return offset + column.saturating_sub(1);
            }
            offset += line_content.len() + 1;
        }

        offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_path_strips_root() {
        let ctx = DocumentContext::new(
            Path::new("/solution/Chaine.Referentiel/DAL.Implementation/DalReference.cs"),
            "",
            "Chaine.Referentiel",
            Path::new("/solution"),
        );
        assert_eq!(
            ctx.relative_path,
            PathBuf::from("Chaine.Referentiel/DAL.Implementation/DalReference.cs")
        );
    }

    #[test]
    fn relative_path_falls_back_when_outside_root() {
        let ctx = DocumentContext::new(
            Path::new("/elsewhere/DalReference.cs"),
            "",
            "P",
            Path::new("/solution"),
        );
        assert_eq!(ctx.relative_path, PathBuf::from("/elsewhere/DalReference.cs"));
    }

    #[test]
    fn offset_calculation() {
        let content = "line1\nline2\nline3";
        let ctx = DocumentContext::new(Path::new("test.cs"), content, "P", Path::new("."));
        assert_eq!(ctx.offset_for(1, 1), 0);
        assert_eq!(ctx.offset_for(2, 1), 6);
        assert_eq!(ctx.offset_for(2, 3), 8);
    }
}
