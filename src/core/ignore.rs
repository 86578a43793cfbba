use glob::Pattern;
use std::fs;
use std::io;
use std::path::Path;

use crate::error::{Error, Result};

pub const IGNORE_FILE: &str = ".pairsyncignore";

// A pattern matches the whole relative path or any single component of it.
#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    patterns: Vec<Pattern>,
}

impl IgnoreRules {
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rules = IgnoreRules::default();
        for pattern in patterns {
            rules.add(pattern.as_ref())?;
        }
        Ok(rules)
    }

    pub fn add(&mut self, pattern: &str) -> Result<()> {
        let compiled = Pattern::new(pattern).map_err(|source| Error::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        self.patterns.push(compiled);
        Ok(())
    }

    pub fn extend_from_file(&mut self, path: &Path) -> Result<()> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(source) => {
                return Err(Error::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            self.add(line)?;
        }
        log::debug!("Loaded ignore patterns from {}", path.display());
        Ok(())
    }

    pub fn is_ignored(&self, relative_path: &str) -> bool {
        self.patterns.iter().any(|pattern| {
            pattern.matches(relative_path)
                || relative_path
                    .split('/')
                    .any(|component| pattern.matches(component))
        })
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
