//! File store for curated role → skills records. The format matches the
//! original knowledge-base file: a `role,skills` header, then one record
//! per line with the skills comma-separated inside the second field.
//! Writes use the same temporary-file-then-rename discipline as the
//! vector store so readers never see a partially written table.

use atomicwrites::{AtomicFile, OverwriteBehavior};
use skillmatch_core::{Error, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct MappingStore {
    path: PathBuf,
}

impl MappingStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load all (role, skills) records. Blank lines and the header are
    /// skipped; records without at least a role and one skill are dropped
    /// with a warning rather than failing the whole load.
    pub fn load(&self) -> Result<Vec<(String, Vec<String>)>> {
        let content = std::fs::read_to_string(&self.path)?;
        let mut records = Vec::new();

        for (line_no, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if line_no == 0 && trimmed.eq_ignore_ascii_case("role,skills") {
                continue;
            }

            let fields = split_record(trimmed);
            if fields.len() < 2 {
                tracing::warn!(line = line_no + 1, "skipping malformed mapping record");
                continue;
            }

            let role = fields[0].trim().to_string();
            let skills: Vec<String> = fields[1..]
                .iter()
                .flat_map(|field| field.split(','))
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();

            if role.is_empty() || skills.is_empty() {
                tracing::warn!(line = line_no + 1, "skipping empty mapping record");
                continue;
            }
            records.push((role, skills));
        }

        Ok(records)
    }

    /// Write the full record set atomically.
    pub fn save(&self, records: &[(String, Vec<String>)]) -> Result<()> {
        let mut out = String::from("role,skills\n");
        for (role, skills) in records {
            out.push_str(&quote_field(role));
            out.push(',');
            out.push_str(&quote_field(&skills.join(",")));
            out.push('\n');
        }

        AtomicFile::new(&self.path, OverwriteBehavior::AllowOverwrite)
            .write(|file| file.write_all(out.as_bytes()))
            .map_err(|e| Error::Storage(format!("failed to write {}: {e}", self.path.display())))
    }
}

/// Split one delimited record into fields, honoring double quotes and
/// `""` escapes.
fn split_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut chars = line.chars().peekable();
    let mut in_quotes = false;

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                chars.next();
                field.push('"');
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut field));
            }
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}

fn quote_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
