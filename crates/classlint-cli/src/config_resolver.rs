//! Locates `classlint.toml`: an explicit `--config` path, then the project
//! directory, then `config.toml` in `$CLASSLINT_CONFIG_DIR` or
//! `~/.classlint`.

use std::path::{Path, PathBuf};

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`.
    Explicit(PathBuf),
    /// Found in the project directory.
    Project(PathBuf),
    /// Found in the global config directory.
    Global(PathBuf),
    /// No config found.
    Default,
}

impl ConfigSource {
    /// Returns the resolved path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Directory that relative `[import]` locations are resolved against.
    #[must_use]
    pub fn base_dir(&self, cwd: &Path) -> PathBuf {
        match self {
            Self::Explicit(p) | Self::Project(p) => p
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .map_or_else(|| cwd.to_path_buf(), |dir| cwd.join(dir)),
            Self::Global(_) | Self::Default => cwd.to_path_buf(),
        }
    }

    /// Returns `true` if the config was loaded from the global directory.
    #[must_use]
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global(_))
    }
}

const PROJECT_CONFIG_NAMES: &[&str] = &["classlint.toml", ".classlint.toml"];

/// Resolves the configuration for a project directory.
#[must_use]
pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    ConfigSearch::new(project_dir, global_dir_from_env()).resolve(explicit)
}

/// The directories searched when no `--config` is given.
#[derive(Debug, Clone)]
struct ConfigSearch {
    project_dir: PathBuf,
    global_dir: Option<PathBuf>,
}

impl ConfigSearch {
    fn new(project_dir: &Path, global_dir: Option<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.to_path_buf(),
            global_dir,
        }
    }

    /// Candidate files, most specific first.
    fn candidates(&self) -> Vec<ConfigSource> {
        let mut candidates: Vec<ConfigSource> = PROJECT_CONFIG_NAMES
            .iter()
            .map(|name| ConfigSource::Project(self.project_dir.join(name)))
            .collect();
        candidates.extend(
            self.global_dir
                .as_ref()
                .map(|dir| ConfigSource::Global(dir.join("config.toml"))),
        );
        candidates
    }

    fn resolve(&self, explicit: Option<&Path>) -> ConfigSource {
        if let Some(path) = explicit {
            return ConfigSource::Explicit(path.to_path_buf());
        }
        let found = self
            .candidates()
            .into_iter()
            .find(|candidate| candidate.path().is_some_and(Path::exists));
        match found {
            Some(source) => {
                tracing::debug!("Using configuration {source:?}");
                source
            }
            None => ConfigSource::Default,
        }
    }
}

/// `$CLASSLINT_CONFIG_DIR`, else `~/.classlint/`.
fn global_dir_from_env() -> Option<PathBuf> {
    std::env::var_os("CLASSLINT_CONFIG_DIR")
        .map(PathBuf::from)
        .or_else(|| home::home_dir().map(|h| h.join(".classlint")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn temp_dir() -> TempDir {
        let Ok(dir) = TempDir::new() else {
            panic!("cannot create temp dir");
        };
        dir
    }

    fn touch(path: &Path) {
        if let Err(e) = fs::write(path, "") {
            panic!("cannot write {}: {e}", path.display());
        }
    }

    #[test]
    fn explicit_wins_over_project_config() {
        let tmp = temp_dir();
        let explicit = tmp.path().join("ci.toml");
        touch(&explicit);
        touch(&tmp.path().join("classlint.toml"));

        let result = ConfigSearch::new(tmp.path(), None).resolve(Some(&explicit));
        assert_eq!(result, ConfigSource::Explicit(explicit));
    }

    #[test]
    fn candidates_list_project_names_before_global() {
        let search = ConfigSearch::new(Path::new("/repo"), Some(PathBuf::from("/home/u/.classlint")));
        let paths: Vec<PathBuf> = search
            .candidates()
            .iter()
            .filter_map(|c| c.path().map(Path::to_path_buf))
            .collect();
        assert_eq!(
            paths,
            [
                PathBuf::from("/repo/classlint.toml"),
                PathBuf::from("/repo/.classlint.toml"),
                PathBuf::from("/home/u/.classlint/config.toml"),
            ]
        );
        assert_eq!(ConfigSearch::new(Path::new("/repo"), None).candidates().len(), 2);
    }

    #[test]
    fn explicit_path_is_not_checked_for_existence() {
        let result = ConfigSearch::new(Path::new("/tmp"), None).resolve(Some(Path::new("/missing.toml")));
        assert_eq!(result, ConfigSource::Explicit(PathBuf::from("/missing.toml")));
    }

    #[test]
    fn plain_name_preferred_over_dot_prefix() {
        let tmp = temp_dir();
        touch(&tmp.path().join("classlint.toml"));
        touch(&tmp.path().join(".classlint.toml"));

        let result = ConfigSearch::new(tmp.path(), None).resolve(None);
        assert_eq!(result, ConfigSource::Project(tmp.path().join("classlint.toml")));
    }

    #[test]
    fn dot_prefixed_project_config_found() {
        let tmp = temp_dir();
        touch(&tmp.path().join(".classlint.toml"));

        let result = ConfigSearch::new(tmp.path(), None).resolve(None);
        assert_eq!(result, ConfigSource::Project(tmp.path().join(".classlint.toml")));
    }

    #[test]
    fn global_config_is_the_fallback() {
        let project = temp_dir();
        let global = temp_dir();
        touch(&global.path().join("config.toml"));

        let result = ConfigSearch::new(project.path(), Some(global.path().to_path_buf())).resolve(None);
        assert_eq!(result, ConfigSource::Global(global.path().join("config.toml")));
        assert!(result.is_global());

        touch(&project.path().join("classlint.toml"));
        let result = ConfigSearch::new(project.path(), Some(global.path().to_path_buf())).resolve(None);
        assert!(matches!(result, ConfigSource::Project(_)));
    }

    #[test]
    fn empty_global_dir_means_defaults() {
        let project = temp_dir();
        let global = temp_dir();

        let result = ConfigSearch::new(project.path(), Some(global.path().to_path_buf())).resolve(None);
        assert_eq!(result, ConfigSource::Default);
        assert!(result.path().is_none());
    }

    #[test]
    fn relative_locations_resolve_next_to_the_config() {
        let cwd = Path::new("/work");
        let explicit = ConfigSource::Explicit(PathBuf::from("config/ci.toml"));
        assert_eq!(explicit.base_dir(cwd), PathBuf::from("/work/config"));

        let bare = ConfigSource::Explicit(PathBuf::from("ci.toml"));
        assert_eq!(bare.base_dir(cwd), PathBuf::from("/work"));

        let project = ConfigSource::Project(PathBuf::from("/repo/classlint.toml"));
        assert_eq!(project.base_dir(cwd), PathBuf::from("/repo"));

        let global = ConfigSource::Global(PathBuf::from("/home/u/.classlint/config.toml"));
        assert_eq!(global.base_dir(cwd), PathBuf::from("/work"));
    }
}
