//! Manifest → registry integration tests.

use assert_fs::prelude::*;
use chrono::NaiveDate;
use conductor_core::{ActionKind, Config, RegistryError, Task, TaskName};
use conductor_tasks::{build_registry, build_registry_with, BuildError};
use conductor_template::{TemplateContext, TemplateEngine};
use rstest::rstest;

const BOILERPLATE: &str = r#"
package: package.json
banner: "/*! {{ pkg.name }} - v{{ pkg.version }} - {{ today }} */"
tasks:
  dist:
    alias: [compass, csslint, jshint, yuidoc, requirejs]
    description: Production build
  compass:
    kind: compass
    options:
      http_path: "/"
      css_dir: www/css
      sass_dir: www/scss
      output_style: expanded
      force: true
  csslint:
    kind: csslint
    options:
      csslintrc: www/csslintrc.json
    targets:
      - name: strict
        options:
          src: ["www/css/*.css"]
      - name: lax
  jshint:
    kind: jshint
    deps: [compass]
    options:
      files: ["www/app/*.js"]
      options: { curly: true }
      globals: { define: true }
  yuidoc:
    kind: yuidoc
    options:
      name: "{{ pkg.name }}"
      version: "{{ pkg.version }}"
      paths: [www/js/app/]
      outdir: www-built/docs/
  requirejs:
    kind: requirejs
    options:
      app_dir: www
      dir: www-built
      modules:
        - name: config
"#;

fn project() -> assert_fs::TempDir {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    dir.child("package.json")
        .write_str(r#"{"name":"multipage","version":"0.3.0"}"#)
        .expect("package");
    dir.child("conductor.yaml").write_str(BOILERPLATE).expect("manifest");
    dir
}

fn fixed_engine(config: &Config) -> TemplateEngine {
    let date = NaiveDate::from_ymd_opt(2013, 4, 1).expect("date");
    let ctx = TemplateContext::from_config_on(config, date).expect("context");
    TemplateEngine::new(&ctx).expect("engine")
}

#[test]
fn boilerplate_registers_targets_and_aliases() {
    let dir = project();
    let config = Config::load_at(&dir.path().join("conductor.yaml")).expect("load");
    let registry = build_registry_with(&config, &fixed_engine(&config)).expect("build");

    let names: Vec<&str> = registry.names().map(TaskName::as_str).collect();
    assert_eq!(
        names,
        [
            "compass",
            "csslint",
            "csslint:lax",
            "csslint:strict",
            "dist",
            "jshint",
            "requirejs",
            "yuidoc"
        ]
    );

    match registry.resolve("csslint").expect("csslint") {
        Task::Alias { members, .. } => {
            assert_eq!(members, &[TaskName::from("csslint:strict"), TaskName::from("csslint:lax")])
        }
        other => panic!("expected alias, got {other:?}"),
    }
    assert_eq!(registry.resolve("csslint:strict").expect("strict").kind(), "csslint");
    assert_eq!(
        registry.resolve("jshint").expect("jshint").references(),
        &[TaskName::from("compass")]
    );
    assert_eq!(
        registry.resolve("dist").expect("dist").description(),
        Some("Production build")
    );
}

#[test]
fn describe_reflects_typed_options() {
    let dir = project();
    let config = Config::load_at(&dir.path().join("conductor.yaml")).expect("load");
    let registry = build_registry(&config).expect("build");

    match registry.resolve("compass").expect("compass") {
        Task::Concrete { action, .. } => assert_eq!(
            action.describe(),
            "compass compile --http-path / --css-dir www/css --sass-dir www/scss --output-style expanded --force"
        ),
        other => panic!("expected concrete, got {other:?}"),
    }
    match registry.resolve("yuidoc").expect("yuidoc") {
        Task::Concrete { action, .. } => {
            assert_eq!(action.describe(), "yuidoc www/js/app/ -> www-built/docs/")
        }
        other => panic!("expected concrete, got {other:?}"),
    }
}

#[rstest]
#[case::unknown_key(
    "tasks:\n  c:\n    kind: compass\n    options:\n      css_directory: www/css\n",
    ActionKind::Compass
)]
#[case::wrong_type(
    "tasks:\n  j:\n    kind: jshint\n    options:\n      files: www/app\n",
    ActionKind::Jshint
)]
#[case::missing_required(
    "tasks:\n  y:\n    kind: yuidoc\n    options:\n      paths: []\n",
    ActionKind::Yuidoc
)]
fn bad_options_name_task_and_kind(#[case] yaml: &str, #[case] expected: ActionKind) {
    let config = Config::parse("/p", yaml).expect("parse");
    let err = build_registry(&config).unwrap_err();
    match err {
        BuildError::Options { kind, .. } => assert_eq!(kind, expected),
        other => panic!("expected options error, got {other}"),
    }
}

#[test]
fn dangling_alias_member_fails_validation() {
    let config = Config::parse("/p", "tasks:\n  dist: [compass]\n").expect("parse");
    let err = build_registry(&config).unwrap_err();
    assert!(
        matches!(
            err,
            BuildError::Registry(RegistryError::MissingReference { ref missing, .. })
                if missing.as_str() == "compass"
        ),
        "got: {err}"
    );
}

#[test]
fn broken_template_is_reported_with_key() {
    let yaml = "tasks:\n  c:\n    kind: command\n    options:\n      program: \"{{ pkg.missing.deeper }}\"\n";
    let config = Config::parse("/p", yaml).expect("parse");
    let err = build_registry(&config).unwrap_err();
    assert!(matches!(err, BuildError::Template(_)), "got: {err}");
    assert!(err.to_string().contains("c.program"), "got: {err}");
}

#[test]
fn target_deps_extend_task_deps() {
    let yaml = r#"
tasks:
  clean:
    kind: command
    options: { program: "true" }
  prep:
    kind: command
    options: { program: "true" }
  lint:
    kind: command
    deps: [clean]
    options: { program: "true" }
    targets:
      - name: css
        deps: [prep]
"#;
    let config = Config::parse("/p", yaml).expect("parse");
    let registry = build_registry(&config).expect("build");
    assert_eq!(
        registry.resolve("lint:css").expect("lint:css").references(),
        &[TaskName::from("clean"), TaskName::from("prep")]
    );
}
