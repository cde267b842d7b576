//! File-backed skill catalog: a tab-delimited `id<TAB>name` list of active
//! skills. Stands in for the relational catalog when running without one;
//! the query path never touches it, only refresh does.

use skillmatch_core::{CatalogError, Skill, SkillCatalog};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SkillCatalog for FileCatalog {
    fn fetch_active_skills(&self) -> Result<Vec<Skill>, CatalogError> {
        let content = std::fs::read_to_string(&self.path).map_err(|err| {
            if err.kind() == ErrorKind::NotFound {
                CatalogError::Connectivity(format!(
                    "skill catalog not found: {}",
                    self.path.display()
                ))
            } else {
                CatalogError::Transient(format!(
                    "failed to read {}: {err}",
                    self.path.display()
                ))
            }
        })?;

        let mut skills = Vec::new();
        for (line_no, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let (id, name) = trimmed.split_once('\t').ok_or_else(|| {
                CatalogError::Transient(format!(
                    "malformed catalog row at line {}: missing tab separator",
                    line_no + 1
                ))
            })?;
            let id: i64 = id.trim().parse().map_err(|_| {
                CatalogError::Transient(format!(
                    "malformed catalog row at line {}: bad skill id {id:?}",
                    line_no + 1
                ))
            })?;

            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            skills.push(Skill::new(id, name));
        }

        Ok(skills)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tab_delimited_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skills.tsv");
        std::fs::write(&path, "# active skills\n1\tPython\n2\tRust\n\n3\t  \n4\tGo\n").unwrap();

        let skills = FileCatalog::new(&path).fetch_active_skills().unwrap();

        assert_eq!(skills.len(), 3);
        assert_eq!(skills[0], Skill::new(1, "Python"));
        assert_eq!(skills[2], Skill::new(4, "Go"));
    }

    #[test]
    fn missing_file_is_a_connectivity_error() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = FileCatalog::new(dir.path().join("absent.tsv"));

        let err = catalog.fetch_active_skills().unwrap_err();
        assert!(matches!(err, CatalogError::Connectivity(_)));
    }

    #[test]
    fn malformed_rows_are_transient_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skills.tsv");
        std::fs::write(&path, "not-a-row\n").unwrap();

        let err = FileCatalog::new(&path).fetch_active_skills().unwrap_err();
        assert!(matches!(err, CatalogError::Transient(_)));
    }
}
