//! Filesystem conventions: where the project lives and where each kind of
//! artifact goes inside it.

use std::convert::Infallible;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::domain::{ArtifactKind, CONFIG_FILE_NAME, ProjectConfig};

/// Directory created by the project bootstrap; its presence means
/// `init_project` already ran.
pub const BEDROCK_DIR: &str = "htdocs";

/// A context type accepted by path lookups.
///
/// Parsing never fails: unknown input becomes [`ContextKind::Unsupported`]
/// and every lookup answers `None` for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContextKind {
    Project,
    Vvv,
    Scripts,
    Bedrock,
    Wordpress,
    Plugin,
    Theme,
    Unsupported(String),
}

impl ContextKind {
    /// Every supported kind, in display order.
    pub const SUPPORTED: [ContextKind; 7] = [
        Self::Project,
        Self::Vvv,
        Self::Scripts,
        Self::Bedrock,
        Self::Wordpress,
        Self::Plugin,
        Self::Theme,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Project => "project",
            Self::Vvv => "vvv",
            Self::Scripts => "scripts",
            Self::Bedrock => "bedrock",
            Self::Wordpress => "wordpress",
            Self::Plugin => "plugin",
            Self::Theme => "theme",
            Self::Unsupported(raw) => raw,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported(_))
    }

    /// Output directory for this kind, relative to the project root.
    pub fn base_path(&self, config: &ProjectConfig) -> Option<PathBuf> {
        let app = Path::new(BEDROCK_DIR).join("web").join("app");
        match self {
            Self::Project => Some(PathBuf::from(".")),
            Self::Vvv => Some(PathBuf::from("vvv")),
            Self::Scripts => Some(PathBuf::from("scripts")),
            Self::Bedrock => Some(PathBuf::from(BEDROCK_DIR)),
            Self::Wordpress => Some(Path::new(BEDROCK_DIR).join("web").join("wp")),
            Self::Plugin => Some(app.join("plugins").join(&config.plugin.slug)),
            Self::Theme => Some(app.join("themes").join(&config.theme.slug)),
            Self::Unsupported(_) => None,
        }
    }

    /// Source directory for this kind, relative to the assets or templates root.
    pub fn assets_path(&self) -> Option<PathBuf> {
        self.is_supported().then(|| PathBuf::from(self.as_str()))
    }
}

impl FromStr for ContextKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Ok(Self::SUPPORTED
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .unwrap_or_else(|| Self::Unsupported(s.to_string())))
    }
}

impl From<ArtifactKind> for ContextKind {
    fn from(kind: ArtifactKind) -> Self {
        match kind {
            ArtifactKind::Plugin => Self::Plugin,
            ArtifactKind::Theme => Self::Theme,
        }
    }
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Absolute locations used during one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    /// Tool resource root (holds `assets/` and `templates/`).
    pub root: PathBuf,
    /// Process working directory.
    pub cwd: PathBuf,
    /// Target project directory.
    pub project: PathBuf,
    /// Static asset bundles, `<root>/assets`.
    pub assets: PathBuf,
    /// Template groups, `<root>/templates`.
    pub templates: PathBuf,
    /// Staged plugin archives, `<cwd>/plugins`.
    pub plugins: PathBuf,
    /// The `project.yml` in use (may not exist yet).
    pub config: PathBuf,
}

impl ProjectPaths {
    /// Resolve all paths for a run.
    ///
    /// Walks upward from `cwd` for the first `project.yml` (checked with
    /// `is_file`). A hit fixes the config file and, unless `project_dir` is
    /// given, the project directory (the file's parent). Without a hit the
    /// project is `project_dir` or `cwd`, and the config file is expected at
    /// `<project>/project.yml`.
    pub fn resolve(
        cwd: impl Into<PathBuf>,
        root: impl Into<PathBuf>,
        project_dir: Option<PathBuf>,
        is_file: impl Fn(&Path) -> bool,
    ) -> Self {
        let cwd = cwd.into();
        let root = root.into();

        let found = find_upward(&cwd, CONFIG_FILE_NAME, &is_file);

        let project = match (&project_dir, &found) {
            (Some(dir), _) => absolutize(&cwd, dir),
            (None, Some(config)) => config
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| cwd.clone()),
            (None, None) => cwd.clone(),
        };

        let config = found.unwrap_or_else(|| project.join(CONFIG_FILE_NAME));

        Self {
            assets: root.join("assets"),
            templates: root.join("templates"),
            plugins: cwd.join("plugins"),
            root,
            cwd,
            project,
            config,
        }
    }

    /// Absolute output directory for `kind`.
    pub fn base_path(&self, kind: &ContextKind, config: &ProjectConfig) -> Option<PathBuf> {
        kind.base_path(config).map(|rel| self.join_project(&rel))
    }

    /// Absolute asset bundle directory for `kind`.
    pub fn asset_dir(&self, kind: &ContextKind) -> Option<PathBuf> {
        kind.assets_path().map(|rel| self.assets.join(rel))
    }

    fn join_project(&self, rel: &Path) -> PathBuf {
        if rel == Path::new(".") {
            self.project.clone()
        } else {
            self.project.join(rel)
        }
    }
}

fn find_upward(start: &Path, file_name: &str, is_file: &impl Fn(&Path) -> bool) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(file_name))
        .find(|candidate| is_file(candidate))
}

fn absolutize(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}
