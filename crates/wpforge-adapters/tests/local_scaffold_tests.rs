//! Orchestration on a real directory tree, with commands recorded.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;
use wpforge_adapters::{FilesystemTemplateStore, LocalFilesystem, MustacheRenderer, RecordingRunner};
use wpforge_core::prelude::*;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn resources(root: &Path) {
    write(root, "templates/scripts/build.sh", "echo {{project.slug}}\n");
    write(root, "templates/bedrock/.env", "WP_HOME=http://{{project.url}}\n");
    write(root, "templates/project/.gitignore", "htdocs/web/wp\n");
    write(
        root,
        "templates/plugin/{{plugin.slug}}.php",
        "<?php\n/**\n * Plugin Name: {{plugin.name}}\n */\n",
    );
    write(root, "templates/theme/style.css", "/* {{theme.name}} */\n");
    write(root, "assets/theme/package.json", "{}\n");
}

fn service(temp: &TempDir, runner: &RecordingRunner, yaml: &str) -> ScaffoldService {
    let root = temp.path().join("resources");
    resources(&root);

    let project = temp.path().join("acme");
    let paths = ProjectPaths::resolve(temp.path(), &root, Some(project), Path::is_file);

    let filesystem: Arc<dyn Filesystem> = Arc::new(LocalFilesystem::new());
    let raw = wpforge_core::application::services::config_service::parse_yaml(
        Path::new("project.yml"),
        yaml,
    )
    .unwrap();
    let config = ConfigService::new(Arc::clone(&filesystem), paths.clone())
        .parse_config(&raw)
        .unwrap();

    ScaffoldService::init(
        config,
        paths.clone(),
        ScaffoldPorts {
            filesystem,
            store: Arc::new(FilesystemTemplateStore::new(&paths.templates)),
            renderer: Arc::new(MustacheRenderer::new()),
            runner: Arc::new(runner.clone()),
        },
    )
    .unwrap()
}

#[test]
fn full_project_on_disk() {
    let temp = TempDir::new().unwrap();
    let runner = RecordingRunner::new();
    let mut svc = service(&temp, &runner, "project: {title: Acme Site}");

    let report = svc.create_project().unwrap();
    assert!(!report.has_failures(), "{report:?}");

    let project = temp.path().join("acme");
    assert_eq!(
        fs::read_to_string(project.join("scripts/build.sh")).unwrap(),
        "echo acme-site\n"
    );
    assert_eq!(
        fs::read_to_string(project.join("htdocs/.env")).unwrap(),
        "WP_HOME=http://acme-site.dev\n"
    );
    assert!(project.join(".gitignore").is_file());

    let plugin = project.join("htdocs/web/app/plugins/acme-site");
    let main = fs::read_to_string(plugin.join("acme-site.php")).unwrap();
    assert!(main.contains("Plugin Name: Acme Site"));
    assert!(plugin.join("languages/index.php").is_file());

    let theme = project.join("htdocs/web/app/themes/acme-site");
    assert!(theme.join("package.json").is_file());
    assert!(theme.join("assets/images/index.php").is_file());

    // repo.create is off by default
    assert!(!runner.commands().iter().any(|c| c.starts_with("git")));
}

#[cfg(unix)]
#[test]
fn uploads_are_linked_outside_the_checkout() {
    let temp = TempDir::new().unwrap();
    let runner = RecordingRunner::new();
    let svc = service(&temp, &runner, "project: {title: Acme Site}");

    assert_eq!(svc.init_project(), StepOutcome::Performed);

    let link = temp.path().join("acme/htdocs/web/app/uploads");
    let meta = fs::symlink_metadata(&link).unwrap();
    assert!(meta.file_type().is_symlink());
    assert_eq!(fs::read_link(&link).unwrap(), temp.path().join("acme/uploads"));
}

#[test]
fn missing_templates_root_fails_steps_not_the_run() {
    let temp = TempDir::new().unwrap();
    let runner = RecordingRunner::new();
    let mut svc = service(&temp, &runner, "project: {title: Acme Site}");
    fs::remove_dir_all(temp.path().join("resources/templates")).unwrap();

    let report = svc.create_project().unwrap();

    assert!(report.outcome(Step::ProjectFiles).unwrap().is_failed());
    assert!(report.outcome(Step::Plugin).unwrap().is_failed());
    assert!(report.has_failures());
}
