//! Scaffold Service - main application orchestrator.
//!
//! This service drives the whole project generation workflow:
//! 1. Stage plugin archives and render helper scripts
//! 2. Initialise the git repository
//! 3. Bootstrap the Bedrock project
//! 4. Scaffold the plugin and the theme
//!
//! Every step checks for its own output first, so a run can be repeated after
//! fixing whatever made a previous one fail.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use crate::{
    application::ports::{
        ExternalCommand, Filesystem, ProcessRunner, TemplateRenderer, TemplateStore,
    },
    application::ApplicationError,
    domain::{
        ArtifactKind, BEDROCK_DIR, ContextKind, DomainError, PluginArchive, ProjectConfig,
        ProjectPaths, TemplateData, inflect,
    },
    error::ForgeResult,
};

/// Files removed from a fresh Bedrock checkout, relative to the project.
const BEDROCK_DENYLIST: [&str; 4] = [
    "htdocs/README.md",
    "htdocs/CHANGELOG.md",
    "htdocs/LICENSE.md",
    "htdocs/.github",
];

const PLACEHOLDER_FILE: &str = "index.php";
const PLACEHOLDER_CONTENT: &str = "<?php\n// Silence is golden.\n";

const PLUGIN_DIRS: &[&str] = &["assets/css", "assets/js", "includes", "languages"];
const THEME_DIRS: &[&str] = &[
    "assets/css",
    "assets/js",
    "assets/images",
    "templates",
    "languages",
];

/// Adapters the orchestrator works through.
#[derive(Clone)]
pub struct ScaffoldPorts {
    pub filesystem: Arc<dyn Filesystem>,
    pub store: Arc<dyn TemplateStore>,
    pub renderer: Arc<dyn TemplateRenderer>,
    pub runner: Arc<dyn ProcessRunner>,
}

/// One orchestration step, as reported back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    ProjectFiles,
    Repo,
    Project,
    Plugin,
    Theme,
    PluginTests,
    ThemeTests,
}

impl Step {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ProjectFiles => "project files",
            Self::Repo => "repository",
            Self::Project => "project",
            Self::Plugin => "plugin",
            Self::Theme => "theme",
            Self::PluginTests => "plugin tests",
            Self::ThemeTests => "theme tests",
        }
    }

    fn for_artifact(kind: ArtifactKind) -> Self {
        match kind {
            ArtifactKind::Plugin => Self::Plugin,
            ArtifactKind::Theme => Self::Theme,
        }
    }

    fn for_tests(kind: ArtifactKind) -> Self {
        match kind {
            ArtifactKind::Plugin => Self::PluginTests,
            ArtifactKind::Theme => Self::ThemeTests,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a step did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Performed,
    /// Nothing to do; the reason is shown to the user.
    Skipped(String),
    /// The step failed; the error was already logged.
    Failed(String),
}

impl StepOutcome {
    fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped(reason.into())
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Ordered outcomes of a multi-step run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScaffoldReport {
    steps: Vec<(Step, StepOutcome)>,
}

impl ScaffoldReport {
    pub fn push(&mut self, step: Step, outcome: StepOutcome) {
        self.steps.push((step, outcome));
    }

    pub fn steps(&self) -> &[(Step, StepOutcome)] {
        &self.steps
    }

    pub fn outcome(&self, step: Step) -> Option<&StepOutcome> {
        self.steps.iter().find(|(s, _)| *s == step).map(|(_, o)| o)
    }

    pub fn has_failures(&self) -> bool {
        self.steps.iter().any(|(_, o)| o.is_failed())
    }
}

/// Main scaffolding service.
///
/// Only obtainable through [`ScaffoldService::init`], which prepares the
/// project directory.
pub struct ScaffoldService {
    config: ProjectConfig,
    paths: ProjectPaths,
    data: TemplateData,
    ports: ScaffoldPorts,
}

impl ScaffoldService {
    /// Prepare the project directory and build the service.
    ///
    /// In the `test` environment the project directory is wiped first.
    #[instrument(skip_all, fields(project = %paths.project.display(), env = %config.env))]
    pub fn init(
        config: ProjectConfig,
        paths: ProjectPaths,
        ports: ScaffoldPorts,
    ) -> ForgeResult<Self> {
        let data = TemplateData::new(&config)?;
        let fs = &ports.filesystem;

        if config.is_test_env() && fs.exists(&paths.project) {
            warn!("Test environment: removing existing project directory");
            fs.remove_dir_all(&paths.project)?;
        }
        fs.create_dir_all(&paths.project)?;

        Ok(Self {
            config,
            paths,
            data,
            ports,
        })
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    pub fn paths(&self) -> &ProjectPaths {
        &self.paths
    }

    pub fn template_data(&self) -> &TemplateData {
        &self.data
    }

    /// Absolute output directory for `kind`; `None` if unsupported.
    pub fn base_path(&self, kind: &ContextKind) -> Option<PathBuf> {
        self.paths.base_path(kind, &self.config)
    }

    /// Asset/template directory name for `kind`; `None` if unsupported.
    pub fn assets_path(&self, kind: &ContextKind) -> Option<PathBuf> {
        kind.assets_path()
    }

    /// Generate the whole project.
    ///
    /// # Errors
    ///
    /// [`DomainError::MissingRequiredField`] for an empty `project.title`,
    /// before anything is touched. Step failures do not error; they are
    /// recorded in the report.
    #[instrument(
        skip_all,
        fields(run_id = %uuid::Uuid::new_v4(), title = %self.config.project.title)
    )]
    pub fn create_project(&mut self) -> ForgeResult<ScaffoldReport> {
        if self.config.project.title.is_empty() {
            return Err(DomainError::MissingRequiredField {
                field: "project.title",
            }
            .into());
        }

        info!("Creating project");
        let mut report = ScaffoldReport::default();

        report.push(Step::ProjectFiles, self.init_project_files());
        report.push(Step::Repo, self.init_repo());
        report.push(Step::Project, self.init_project());
        report.push(Step::Plugin, self.init_plugin());
        report.push(Step::Theme, self.init_theme());

        if report.has_failures() {
            warn!("Project created with failed steps");
        } else {
            info!("Project created");
        }
        Ok(report)
    }

    /// Stage plugin archives and render the `scripts` (and `vvv`) groups.
    pub fn init_project_files(&mut self) -> StepOutcome {
        let result = self.try_init_project_files();
        settle(Step::ProjectFiles, result)
    }

    /// `git init` plus the `origin` remote, when enabled.
    pub fn init_repo(&self) -> StepOutcome {
        settle(Step::Repo, self.try_init_repo())
    }

    /// Bootstrap Bedrock into `htdocs`.
    pub fn init_project(&self) -> StepOutcome {
        settle(Step::Project, self.try_init_project())
    }

    pub fn init_plugin(&self) -> StepOutcome {
        settle(Step::Plugin, self.try_init_artifact(ArtifactKind::Plugin))
    }

    pub fn init_theme(&self) -> StepOutcome {
        settle(Step::Theme, self.try_init_artifact(ArtifactKind::Theme))
    }

    /// Scaffold only the plugin; requires `plugin.name`.
    pub fn create_plugin(&self) -> ForgeResult<StepOutcome> {
        self.create_artifact(ArtifactKind::Plugin)
    }

    /// Scaffold only the theme; requires `theme.name`.
    pub fn create_theme(&self) -> ForgeResult<StepOutcome> {
        self.create_artifact(ArtifactKind::Theme)
    }

    /// Add the test harness to an existing plugin.
    pub fn create_plugin_tests(&self) -> ForgeResult<StepOutcome> {
        self.create_tests(ArtifactKind::Plugin)
    }

    /// Add the test harness to an existing theme.
    pub fn create_theme_tests(&self) -> ForgeResult<StepOutcome> {
        self.create_tests(ArtifactKind::Theme)
    }

    // ── steps ─────────────────────────────────────────────────────────────

    fn try_init_project_files(&mut self) -> ForgeResult<StepOutcome> {
        for archive in self.stage_plugin_archives()? {
            self.data.push_plugin(archive);
        }

        if let Some(scripts) = self.base_path(&ContextKind::Scripts) {
            self.render_group("scripts", &scripts)?;
        }

        if self.config.vvv {
            if let Some(vvv) = self.base_path(&ContextKind::Vvv) {
                self.render_group("vvv", &vvv)?;
            }
        }

        Ok(StepOutcome::Performed)
    }

    fn stage_plugin_archives(&self) -> ForgeResult<Vec<PluginArchive>> {
        let fs = &self.ports.filesystem;
        let source = &self.paths.plugins;

        if !fs.is_dir(source) {
            debug!(path = %source.display(), "No plugin staging directory");
            return Ok(Vec::new());
        }

        let target_dir = self.paths.project.join("plugins");
        let mut archives = Vec::new();

        for path in fs.list_dir(source)? {
            let is_zip = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));
            if !is_zip || !fs.is_file(&path) {
                continue;
            }

            let (Some(stem), Some(file)) = (path.file_stem(), path.file_name()) else {
                continue;
            };
            let file = file.to_string_lossy().into_owned();

            let target = target_dir.join(&file);
            if fs.exists(&target) {
                debug!(file = %file, "Plugin archive already staged");
            } else {
                fs.create_dir_all(&target_dir)?;
                fs.copy_file(&path, &target)?;
                info!(file = %file, "Plugin archive copied");
            }

            archives.push(PluginArchive {
                name: inflect::title_case(&stem.to_string_lossy()),
                file,
            });
        }

        Ok(archives)
    }

    fn try_init_repo(&self) -> ForgeResult<StepOutcome> {
        if !self.config.repo.create {
            return Ok(StepOutcome::skipped("repository creation disabled"));
        }

        let project = &self.paths.project;
        if self.ports.filesystem.exists(&project.join(".git")) {
            return Ok(StepOutcome::skipped("repository already exists"));
        }

        self.run(&ExternalCommand::new("git", ["init"]), project)?;

        let url = &self.config.repo.url;
        if !url.is_empty() {
            let remote = ExternalCommand::new("git", ["remote", "add", "origin", url.as_str()]);
            if let Err(e) = self.run(&remote, project) {
                warn!(url = %url, error = %e, "Failed to add origin remote");
                return Err(e);
            }
        }

        Ok(StepOutcome::Performed)
    }

    fn try_init_project(&self) -> ForgeResult<StepOutcome> {
        let fs = &self.ports.filesystem;
        let project = &self.paths.project;
        let htdocs = project.join(BEDROCK_DIR);

        if fs.exists(&htdocs) {
            return Ok(StepOutcome::skipped("project already bootstrapped"));
        }

        self.run(
            &ExternalCommand::new("composer", ["create-project", "roots/bedrock", BEDROCK_DIR]),
            project,
        )?;

        self.link_uploads()?;

        if let Some(bedrock) = self.base_path(&ContextKind::Bedrock) {
            self.render_group("bedrock", &bedrock)?;
        }
        if let Some(root) = self.base_path(&ContextKind::Project) {
            self.render_group("project", &root)?;
        }

        for entry in BEDROCK_DENYLIST {
            let path = project.join(entry);
            if fs.is_dir(&path) {
                fs.remove_dir_all(&path)?;
            } else if fs.exists(&path) {
                fs.remove_file(&path)?;
            }
        }

        self.run(&ExternalCommand::new("composer", ["install"]), &htdocs)?;

        Ok(StepOutcome::Performed)
    }

    /// Point Bedrock's uploads directory at `<project>/uploads`, which is kept
    /// outside the checkout.
    fn link_uploads(&self) -> ForgeResult<()> {
        let fs = &self.ports.filesystem;
        let shared = self.paths.project.join("uploads");
        let link = self
            .paths
            .project
            .join(BEDROCK_DIR)
            .join("web")
            .join("app")
            .join("uploads");

        fs.create_dir_all(&shared)?;

        // Bedrock ships a real directory here.
        if fs.is_dir(&link) {
            fs.remove_dir_all(&link)?;
        } else if let Some(parent) = link.parent() {
            fs.create_dir_all(parent)?;
        }

        if fs.symlink(&shared, &link)? {
            info!(link = %link.display(), "Uploads directory linked");
        }
        Ok(())
    }

    fn try_init_artifact(&self, kind: ArtifactKind) -> ForgeResult<StepOutcome> {
        let artifact = self.config.artifact(kind);

        if !artifact.scaffold {
            return Ok(StepOutcome::skipped(format!("{kind} scaffolding disabled")));
        }
        if artifact.name.is_empty() {
            return Ok(StepOutcome::skipped(format!("no {kind} name configured")));
        }

        let base = self.artifact_base(kind)?;
        if self.ports.filesystem.exists(&base) {
            return Ok(StepOutcome::skipped(format!("{kind} already exists")));
        }

        info!(kind = %kind, name = %artifact.name, "Scaffolding");
        self.render_group(kind.as_str(), &base)?;

        let dirs = match kind {
            ArtifactKind::Plugin => PLUGIN_DIRS,
            ArtifactKind::Theme => THEME_DIRS,
        };
        self.create_placeholders(&base, dirs)?;

        if kind == ArtifactKind::Theme {
            self.copy_theme_assets(&base)?;
            self.build_theme(&base)?;
        }

        Ok(StepOutcome::Performed)
    }

    fn create_artifact(&self, kind: ArtifactKind) -> ForgeResult<StepOutcome> {
        self.require_name(kind)?;
        Ok(settle(
            Step::for_artifact(kind),
            self.try_init_artifact(kind),
        ))
    }

    #[instrument(skip(self), fields(kind = %kind))]
    fn create_tests(&self, kind: ArtifactKind) -> ForgeResult<StepOutcome> {
        self.require_name(kind)?;

        let fs = &self.ports.filesystem;
        let base = self.artifact_base(kind)?;
        if !fs.is_dir(&base) {
            return Err(ApplicationError::ArtifactMissing {
                artifact: kind.as_str(),
                name: self.config.artifact(kind).name.clone(),
                path: base,
            }
            .into());
        }

        if fs.exists(&base.join("tests")) {
            return Ok(settle(
                Step::for_tests(kind),
                Ok(StepOutcome::skipped("tests already exist")),
            ));
        }

        let rendered = self.render_group(kind.tests_group(), &base);
        Ok(settle(
            Step::for_tests(kind),
            rendered.map(|_| StepOutcome::Performed),
        ))
    }

    fn require_name(&self, kind: ArtifactKind) -> ForgeResult<()> {
        if self.config.artifact(kind).name.is_empty() {
            return Err(DomainError::MissingRequiredField {
                field: kind.name_field(),
            }
            .into());
        }
        Ok(())
    }

    fn artifact_base(&self, kind: ArtifactKind) -> ForgeResult<PathBuf> {
        let context = ContextKind::from(kind);
        self.base_path(&context)
            .ok_or_else(|| DomainError::UnsupportedContext(context.to_string()).into())
    }

    fn create_placeholders(&self, base: &Path, dirs: &[&str]) -> ForgeResult<()> {
        let fs = &self.ports.filesystem;
        for dir in dirs {
            let dir = base.join(dir);
            fs.create_dir_all(&dir)?;

            let placeholder = dir.join(PLACEHOLDER_FILE);
            if !fs.exists(&placeholder) {
                fs.write_file(&placeholder, PLACEHOLDER_CONTENT)?;
            }
        }
        debug!(count = dirs.len(), "Placeholder directories created");
        Ok(())
    }

    fn copy_theme_assets(&self, base: &Path) -> ForgeResult<()> {
        let fs = &self.ports.filesystem;
        match self.paths.asset_dir(&ContextKind::Theme) {
            Some(assets) if fs.is_dir(&assets) => {
                fs.copy_dir_all(&assets, base)?;
                info!(from = %assets.display(), "Theme assets copied");
            }
            Some(assets) => {
                warn!(path = %assets.display(), "Theme asset bundle not found, skipping");
            }
            None => {}
        }
        Ok(())
    }

    fn build_theme(&self, base: &Path) -> ForgeResult<()> {
        let commands = [
            ExternalCommand::new("npm", ["install"]),
            ExternalCommand::new("bower", ["install"]),
            ExternalCommand::new("npm", ["run", "build"]),
        ];
        for command in &commands {
            self.run(command, base)?;
        }
        Ok(())
    }

    // ── helpers ───────────────────────────────────────────────────────────

    /// Render every file of `group` into `dest`. Both the relative path and
    /// the content of each file are templates.
    #[instrument(skip(self), fields(dest = %dest.display()))]
    fn render_group(&self, group: &str, dest: &Path) -> ForgeResult<usize> {
        let fs = &self.ports.filesystem;
        let renderer = &self.ports.renderer;
        let data = self.data.as_value();

        let files = self.ports.store.load_group(group)?;

        for file in &files {
            let raw_path = file.path.to_string_lossy();
            let rel = renderer.render(&raw_path, data)?;
            let content = renderer.render(&file.content, data)?;

            let target = dest.join(rel.trim_start_matches('/'));
            if let Some(parent) = target.parent() {
                fs.create_dir_all(parent)?;
            }
            fs.write_file(&target, &content)?;
            debug!(file = %target.display(), "Rendered");
        }

        info!(count = files.len(), "Template group rendered");
        Ok(files.len())
    }

    fn run(&self, command: &ExternalCommand, cwd: &Path) -> ForgeResult<()> {
        info!(command = %command, cwd = %cwd.display(), "Running");
        self.ports.runner.run(command, cwd)
    }
}

/// Turn a step result into an outcome, logging it where it happened.
fn settle(step: Step, result: ForgeResult<StepOutcome>) -> StepOutcome {
    match result {
        Ok(StepOutcome::Skipped(reason)) => {
            info!(step = %step, reason = %reason, "Step skipped");
            StepOutcome::Skipped(reason)
        }
        Ok(outcome) => {
            info!(step = %step, "Step completed");
            outcome
        }
        Err(e) => {
            error!(step = %step, error = %e, "Step failed");
            StepOutcome::Failed(e.to_string())
        }
    }
}
