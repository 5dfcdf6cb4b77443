//! Documentation runs
//!
//! A [`Generator`] discovers the PHP sources of a project, builds the
//! run context, renders a page for every documented structure and writes
//! the pages below the output directory. Every page is rendered before
//! the first one is written, so a failing run leaves no partial output.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, DocConfig};
use crate::context::DocContext;
use crate::reflect::{ClassRegistry, SourceOrigin};
use crate::render::{HtmlRenderer, RenderError};
use crate::tree::StructureTree;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("source path {} does not exist", .0.display())]
    MissingSource(PathBuf),

    #[error("failed to scan {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: ignore::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{first} and {second} would both be written to {}", page.display())]
    PageCollision {
        page: PathBuf,
        first: String,
        second: String,
    },

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// A source file left out of the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub errors: Vec<String>,
}

/// Outcome of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateReport {
    pub files_scanned: usize,
    pub files_skipped: Vec<SkippedFile>,
    pub structures: usize,
    /// Pages relative to the output directory; empty for checks
    pub pages: Vec<PathBuf>,
}

pub struct Generator {
    config: DocConfig,
    root: PathBuf,
    output_dir: PathBuf,
}

impl Generator {
    /// A generator for the project at `root`; relative config paths are
    /// taken from there
    #[must_use]
    pub fn new(config: DocConfig, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let output_dir = root.join(&config.output.dir);
        Self {
            config,
            root,
            output_dir,
        }
    }

    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    #[must_use]
    pub fn config(&self) -> &DocConfig {
        &self.config
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Render and write every page
    pub fn run(&self) -> Result<GenerateReport, GenerateError> {
        self.execute(true)
    }

    /// Everything [`Generator::run`] does except writing
    pub fn check(&self) -> Result<GenerateReport, GenerateError> {
        self.execute(false)
    }

    /// Parse and register all sources
    pub fn load(&self) -> Result<(DocContext, GenerateReport), GenerateError> {
        self.config.validate()?;
        let excludes = self.config.exclude_patterns()?;
        let mut registry = ClassRegistry::with_builtins();
        let mut report = GenerateReport::default();

        let sources = self
            .config
            .source
            .paths
            .iter()
            .map(|path| (path, SourceOrigin::Project))
            .chain(
                self.config
                    .source
                    .reference
                    .iter()
                    .map(|path| (path, SourceOrigin::Reference)),
            );
        for (path, origin) in sources {
            for file in self.discover(path, &excludes)? {
                let text = fs::read_to_string(&file).map_err(|source| GenerateError::Read {
                    path: file.clone(),
                    source,
                })?;
                report.files_scanned += 1;
                let shown = self.relative(&file);
                match registry.register_source(&shown, &text, origin) {
                    Ok(names) => debug!(file = %shown.display(), classes = names.len(), "registered file"),
                    Err(errors) => {
                        warn!(
                            file = %shown.display(),
                            errors = errors.len(),
                            "skipping file with parse errors"
                        );
                        report.files_skipped.push(SkippedFile {
                            path: shown,
                            errors: errors.iter().map(ToString::to_string).collect(),
                        });
                    }
                }
            }
        }

        let ctx = DocContext::new(registry, self.config.url_resolver());
        Ok((ctx, report))
    }

    fn execute(&self, write: bool) -> Result<GenerateReport, GenerateError> {
        let (ctx, mut report) = self.load()?;
        let structures = ctx.documented();
        report.structures = structures.len();
        info!(
            files = report.files_scanned,
            skipped = report.files_skipped.len(),
            structures = structures.len(),
            "sources loaded"
        );

        let mut owners: HashMap<String, &str> = HashMap::new();
        for structure in &structures {
            let page = structure.output_path();
            if let Some(first) = owners.get(&page) {
                return Err(GenerateError::PageCollision {
                    page: PathBuf::from(page),
                    first: (*first).to_string(),
                    second: structure.name().to_string(),
                });
            }
            owners.insert(page, structure.name());
        }

        let tree: StructureTree = structures.iter().cloned().collect();
        let renderer = HtmlRenderer::new(&ctx, &tree, self.config.project.name.clone());
        let mut pages = Vec::with_capacity(structures.len() + 1);
        for structure in &structures {
            debug!(structure = structure.name(), "rendering");
            pages.push((PathBuf::from(structure.output_path()), renderer.render_structure(structure)?));
        }
        pages.push((PathBuf::from("index.html"), renderer.render_index()?));

        if !write {
            return Ok(report);
        }
        for (page, html) in pages {
            let target = self.output_dir.join(&page);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|source| GenerateError::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
            fs::write(&target, html).map_err(|source| GenerateError::Write {
                path: target.clone(),
                source,
            })?;
            report.pages.push(page);
        }
        info!(
            pages = report.pages.len(),
            output = %self.output_dir.display(),
            "documentation written"
        );
        Ok(report)
    }

    /// `.php` files below `path` not matched by an exclude pattern, sorted
    fn discover(
        &self,
        path: &Path,
        excludes: &[glob::Pattern],
    ) -> Result<Vec<PathBuf>, GenerateError> {
        let base = self.root.join(path);
        if !base.exists() {
            return Err(GenerateError::MissingSource(base));
        }

        let mut files = Vec::new();
        for entry in WalkBuilder::new(&base).standard_filters(false).build() {
            let entry = entry.map_err(|source| GenerateError::Walk {
                path: base.clone(),
                source,
            })?;
            let file = entry.path();
            let is_php = entry.file_type().is_some_and(|ft| ft.is_file())
                && file.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("php"));
            if !is_php {
                continue;
            }
            let relative = self.relative(file);
            if excludes.iter().any(|pattern| pattern.matches_path(&relative)) {
                debug!(file = %relative.display(), "excluded");
                continue;
            }
            files.push(file.to_path_buf());
        }
        files.sort();
        Ok(files)
    }

    fn relative(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf)
    }
}
