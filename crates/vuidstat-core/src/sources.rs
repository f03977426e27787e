//! Source providers for identifier extraction

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// One source file, fully read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub content: String,
}

/// Trait for providing source files to scan, in order
pub trait Sources {
    fn load(self) -> Result<Vec<SourceFile>>;
}

/// Sources from an explicit, ordered list of file paths
#[derive(Debug, Clone, Default)]
pub struct PathSources(Vec<PathBuf>);

impl PathSources {
    /// Create from an iterator of paths
    pub fn new(paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self(paths.into_iter().map(Into::into).collect())
    }

    /// Locate each generated file in the first candidate directory that has
    /// it and append it after the hand-written sources.
    ///
    /// Fails if any generated file is found in none of the directories.
    pub fn with_generated(
        mut self,
        root: impl AsRef<Path>,
        files: &[impl AsRef<str>],
        dirs: &[impl AsRef<str>],
    ) -> Result<Self> {
        let root = root.as_ref();
        for file in files {
            let file = file.as_ref();
            let found = dirs
                .iter()
                .map(|dir| root.join(dir.as_ref()).join(file))
                .find(|candidate| candidate.is_file());
            match found {
                Some(path) => {
                    debug!("resolved generated source {}", path.display());
                    self.0.push(path);
                }
                None => {
                    return Err(Error::GeneratedSourceMissing {
                        file: file.to_string(),
                        searched: dirs
                            .iter()
                            .map(|dir| root.join(dir.as_ref()).display().to_string())
                            .collect(),
                    });
                }
            }
        }
        Ok(self)
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.0
    }
}

impl Sources for PathSources {
    fn load(self) -> Result<Vec<SourceFile>> {
        self.0
            .into_iter()
            .map(|path| match std::fs::read_to_string(&path) {
                Ok(content) => Ok(SourceFile { path, content }),
                Err(source) => Err(Error::SourceUnreadable { path, source }),
            })
            .collect()
    }
}

/// In-memory sources (useful for testing)
#[derive(Debug, Clone, Default)]
pub struct MemorySources(Vec<SourceFile>);

impl MemorySources {
    /// Create empty memory sources
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Add a file with content
    pub fn add(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.0.push(SourceFile {
            path: path.into(),
            content: content.into(),
        });
        self
    }
}

impl Sources for MemorySources {
    fn load(self) -> Result<Vec<SourceFile>> {
        Ok(self.0)
    }
}
