//! Test utilities for apidoc
//!
//! Builds in-memory projects from `(path, source)` pairs so descriptors can
//! be exercised without touching the filesystem.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::context::DocContext;
use crate::reflect::{ClassEntry, ClassRegistry, SourceOrigin};
use crate::url::UrlResolver;

/// Result type for test helpers
pub type TestResult<T> = Result<T, String>;

/// An in-memory project
#[derive(Debug, Default)]
pub struct TestProject {
    files: Vec<(PathBuf, String, SourceOrigin)>,
    urls: UrlResolver,
}

impl TestProject {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a documented source file
    #[must_use]
    pub fn file(mut self, path: impl AsRef<Path>, source: &str) -> Self {
        self.files
            .push((path.as_ref().to_path_buf(), source.to_string(), SourceOrigin::Project));
        self
    }

    /// Add a source that is resolved but not documented
    #[must_use]
    pub fn reference(mut self, path: impl AsRef<Path>, source: &str) -> Self {
        self.files
            .push((path.as_ref().to_path_buf(), source.to_string(), SourceOrigin::Reference));
        self
    }

    #[must_use]
    pub fn urls(mut self, urls: UrlResolver) -> Self {
        self.urls = urls;
        self
    }

    /// Register every file on top of the built-in stubs
    ///
    /// # Errors
    /// Returns the parse errors of the first file that fails
    pub fn try_context(self) -> TestResult<DocContext> {
        let mut registry = ClassRegistry::with_builtins();
        for (path, source, origin) in &self.files {
            registry
                .register_source(path, source, *origin)
                .map_err(|errors| format!("{}: {errors:?}", path.display()))?;
        }
        Ok(DocContext::new(registry, self.urls))
    }

    /// Like [`TestProject::try_context`]
    ///
    /// # Panics
    /// Panics if a file does not parse
    #[must_use]
    pub fn context(self) -> DocContext {
        match self.try_context() {
            Ok(ctx) => ctx,
            Err(message) => panic!("test project does not parse: {message}"),
        }
    }
}

/// Parse `source` alone and return the entry named `name`
///
/// # Panics
/// Panics if the source does not parse or lacks `name`
#[must_use]
pub fn entry(source: &str, name: &str) -> Rc<ClassEntry> {
    let mut registry = ClassRegistry::new();
    if let Err(errors) = registry.register_source(Path::new("test.php"), source, SourceOrigin::Project) {
        panic!("test source does not parse: {errors:?}");
    }
    match registry.get(name) {
        Some(entry) => Rc::clone(entry),
        None => panic!("test source declares no `{name}`"),
    }
}
