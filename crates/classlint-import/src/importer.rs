//! Walks class directories and archives into one [`CodeModel`].

use crate::classfile::parse_class;
use crate::error::ImportError;
use classlint_core::{ClassDescriptor, CodeModel, CodeModelBuilder, ImportConfig};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

const SKIPPED_ENTRIES: &[&str] = &["module-info.class", "package-info.class"];

/// Imports compiled classes into a [`CodeModel`].
///
/// Classes from `locations` whose package matches one of the package
/// prefixes are analyzed; everything else (other packages, `libraries`)
/// is kept only to resolve references such as meta-annotations.
///
/// ```no_run
/// use classlint_import::ClassFileImporter;
///
/// # fn main() -> Result<(), classlint_import::ImportError> {
/// let model = ClassFileImporter::new()
///     .location("build/classes/java/main")
///     .package("com.example.archunitrules")
///     .import()?;
/// println!("{} classes", model.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClassFileImporter {
    locations: Vec<PathBuf>,
    libraries: Vec<PathBuf>,
    packages: Vec<String>,
    exclude: Vec<String>,
}

impl ClassFileImporter {
    /// Creates an importer without locations.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an importer from the `[import]` configuration table.
    #[must_use]
    pub fn from_config(config: &ImportConfig) -> Self {
        Self {
            locations: config.locations.clone(),
            libraries: config.libraries.clone(),
            packages: config.packages.clone(),
            exclude: config.exclude.clone(),
        }
    }

    /// Adds a class directory, `.jar`/`.zip` archive or single `.class` file.
    #[must_use]
    pub fn location(mut self, path: impl Into<PathBuf>) -> Self {
        self.locations.push(path.into());
        self
    }

    /// Adds several locations.
    #[must_use]
    pub fn locations<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.locations.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Adds a location imported for resolution only.
    #[must_use]
    pub fn library(mut self, path: impl Into<PathBuf>) -> Self {
        self.libraries.push(path.into());
        self
    }

    /// Restricts analysis to a package and its subpackages.
    #[must_use]
    pub fn package(mut self, prefix: impl Into<String>) -> Self {
        self.packages.push(prefix.into());
        self
    }

    /// Skips artifacts whose path matches the glob.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude.push(pattern.into());
        self
    }

    /// Reads every location and builds the model.
    ///
    /// # Errors
    ///
    /// Any unreadable or malformed artifact aborts the whole import.
    pub fn import(&self) -> Result<CodeModel, ImportError> {
        if self.locations.is_empty() {
            return Err(ImportError::NoLocations);
        }
        let exclude = self
            .exclude
            .iter()
            .map(|p| {
                glob::Pattern::new(p).map_err(|source| ImportError::InvalidExclude {
                    pattern: p.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            "Importing {} location(s), {} librar(y/ies)",
            self.locations.len(),
            self.libraries.len()
        );

        let mut sink = Sink {
            builder: CodeModel::builder(),
            packages: &self.packages,
            exclude: &exclude,
            analyzed: true,
        };
        for location in &self.locations {
            sink.read_location(location)?;
        }
        sink.analyzed = false;
        for library in &self.libraries {
            sink.read_location(library)?;
        }

        let model = sink.builder.build();
        info!(
            "Imported {} class(es), {} library class(es)",
            model.len(),
            model.library_classes().len()
        );
        Ok(model)
    }
}

/// Returns true if `package` equals a prefix or is nested below it.
fn in_packages(packages: &[String], package: &str) -> bool {
    packages.is_empty()
        || packages.iter().any(|prefix| {
            prefix.is_empty()
                || package == prefix
                || package
                    .strip_prefix(prefix.as_str())
                    .is_some_and(|rest| rest.starts_with('.'))
        })
}

struct Sink<'a> {
    builder: CodeModelBuilder,
    packages: &'a [String],
    exclude: &'a [glob::Pattern],
    analyzed: bool,
}

impl Sink<'_> {
    fn read_location(&mut self, location: &Path) -> Result<(), ImportError> {
        let before = self.builder.len();
        if location.is_dir() {
            self.read_directory(location)?;
        } else if is_archive(location) {
            self.read_archive(location)?;
        } else {
            let bytes = std::fs::read(location).map_err(|source| ImportError::Io {
                path: location.to_path_buf(),
                source,
            })?;
            self.accept(&bytes, &location.display().to_string())?;
        }
        debug!(
            "{}: {} class(es)",
            location.display(),
            self.builder.len() - before
        );
        Ok(())
    }

    fn read_directory(&mut self, root: &Path) -> Result<(), ImportError> {
        let walker = WalkDir::new(root).sort_by_file_name();
        for entry in walker {
            let entry = entry.map_err(|e| ImportError::Io {
                path: e.path().map_or_else(|| root.to_path_buf(), Path::to_path_buf),
                source: e.into(),
            })?;
            let path = entry.path();
            if !entry.file_type().is_file() || self.is_excluded(path) {
                continue;
            }
            if is_archive(path) {
                self.read_archive(path)?;
                continue;
            }
            if !is_class_file(&entry.file_name().to_string_lossy()) {
                continue;
            }
            let bytes = std::fs::read(path).map_err(|source| ImportError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            self.accept(&bytes, &path.display().to_string())?;
        }
        Ok(())
    }

    fn read_archive(&mut self, path: &Path) -> Result<(), ImportError> {
        if self.is_excluded(path) {
            return Ok(());
        }
        let archive_error = |source| ImportError::Archive {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(|source| ImportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut archive = zip::ZipArchive::new(file).map_err(archive_error)?;

        let mut names: Vec<String> = archive
            .file_names()
            .filter(|name| !name.starts_with("META-INF/"))
            .filter(|name| is_class_file(name.rsplit('/').next().unwrap_or(*name)))
            .map(str::to_string)
            .collect();
        names.sort();

        for name in names {
            let mut entry = archive.by_name(&name).map_err(archive_error)?;
            let mut bytes = Vec::new();
            entry
                .read_to_end(&mut bytes)
                .map_err(|source| ImportError::Io {
                    path: path.join(&name),
                    source,
                })?;
            self.accept(&bytes, &format!("{}!{name}", path.display()))?;
        }
        Ok(())
    }

    fn accept(&mut self, bytes: &[u8], origin: &str) -> Result<(), ImportError> {
        let class = parse_class(bytes).map_err(|source| ImportError::Format {
            origin: origin.to_string(),
            source,
        })?;
        self.add(class);
        Ok(())
    }

    fn add(&mut self, class: ClassDescriptor) {
        if self.analyzed && in_packages(self.packages, class.package_name()) {
            self.builder.add(class);
        } else {
            self.builder.add_library(class);
        }
    }

    fn is_excluded(&self, path: &Path) -> bool {
        let excluded = self.exclude.iter().any(|p| p.matches_path(path));
        if excluded {
            debug!("Excluding: {}", path.display());
        }
        excluded
    }
}

fn is_class_file(file_name: &str) -> bool {
    file_name.ends_with(".class") && !SKIPPED_ENTRIES.contains(&file_name)
}

fn is_archive(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("jar") || e.eq_ignore_ascii_case("zip"))
}
