//! Manifest loading.
//!
//! # Manifest layout
//!
//! ```yaml
//! package: package.json        # optional; parsed as JSON, exposed to templates as `pkg`
//! banner: "/*! {{ pkg.name }} */"
//! tasks:
//!   default: [lint]            # alias shorthand
//!   dist:
//!     alias: [compass, jshint]
//!   compass:
//!     kind: compass
//!     deps: []
//!     options: { css_dir: www/css, sass_dir: www/scss }
//!   csslint:
//!     kind: csslint
//!     options: { csslintrc: www/csslintrc.json }
//!     targets:
//!       - name: strict
//!         options: { src: ["www/css/*.css"] }
//! ```
//!
//! # API pattern
//!
//! - [`Config::load_at`] reads one explicit file.
//! - [`Config::parse`] builds a config from a YAML string plus a root dir.
//! - [`discover_from`] walks up from a directory looking for [`MANIFEST_FILE`].
//!
//! The resulting [`Config`] is an ordinary value: build it once and pass it
//! by reference to whatever populates the registry.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};

use crate::error::{io_err, ConfigError};
use crate::types::{ActionKind, TaskName};

/// Default manifest file name searched for by [`discover_from`].
pub const MANIFEST_FILE: &str = "conductor.yaml";

/// Environment variable the CLI reads an explicit manifest path from.
pub const CONFIG_ENV: &str = "CONDUCTOR_CONFIG";

// ---------------------------------------------------------------------------
// Manifest document
// ---------------------------------------------------------------------------

/// Root of the YAML manifest.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// JSON file with project metadata (name, version, …), relative to the manifest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<PathBuf>,
    /// Header template, available to option templates as `banner`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
    /// A name declared twice is a parse error, not a silent override.
    #[serde(default, deserialize_with = "unique_tasks")]
    pub tasks: BTreeMap<TaskName, TaskEntry>,
}

fn unique_tasks<'de, D>(deserializer: D) -> Result<BTreeMap<TaskName, TaskEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    struct UniqueTasks;

    impl<'de> Visitor<'de> for UniqueTasks {
        type Value = BTreeMap<TaskName, TaskEntry>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a mapping of task names to task entries")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut tasks = BTreeMap::new();
            while let Some((name, entry)) = map.next_entry::<TaskName, TaskEntry>()? {
                if tasks.contains_key(&name) {
                    return Err(de::Error::custom(format!(
                        "task '{name}' is declared more than once"
                    )));
                }
                tasks.insert(name, entry);
            }
            Ok(tasks)
        }
    }

    deserializer.deserialize_map(UniqueTasks)
}

/// One entry under `tasks:`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TaskEntry {
    /// `name: [a, b]`
    Alias(Vec<TaskName>),
    /// Full mapping form.
    Detailed(TaskSpec),
}

/// Sequences are aliases and mappings are [`TaskSpec`]s. Decoding each shape
/// directly keeps serde's message for a misspelled key.
impl<'de> Deserialize<'de> for TaskEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_yaml::Value::deserialize(deserializer)?;
        match value {
            serde_yaml::Value::Sequence(_) => serde_yaml::from_value(value)
                .map(TaskEntry::Alias)
                .map_err(de::Error::custom),
            serde_yaml::Value::Mapping(_) => serde_yaml::from_value(value)
                .map(TaskEntry::Detailed)
                .map_err(de::Error::custom),
            other => Err(de::Error::custom(format!(
                "expected a list of task names or a task mapping, found {}",
                yaml_kind(&other)
            ))),
        }
    }
}

fn yaml_kind(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "a boolean",
        serde_yaml::Value::Number(_) => "a number",
        serde_yaml::Value::String(_) => "a string",
        serde_yaml::Value::Sequence(_) => "a sequence",
        serde_yaml::Value::Mapping(_) => "a mapping",
        serde_yaml::Value::Tagged(_) => "a tagged value",
    }
}

/// Mapping form of a task entry. Exactly one of `alias` / `kind` is set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<Vec<TaskName>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ActionKind>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deps: Vec<TaskName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Kind-specific options; decoded into a typed struct by the task builder.
    #[serde(default, skip_serializing_if = "serde_yaml::Mapping::is_empty")]
    pub options: serde_yaml::Mapping,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<TargetSpec>,
}

/// A named variant of a concrete task (`csslint:strict`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetSpec {
    pub name: String,
    /// Extra prerequisites for this target, on top of the task's `deps`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deps: Vec<TaskName>,
    /// Overrides merged over the task-level options, key by key.
    #[serde(default, skip_serializing_if = "serde_yaml::Mapping::is_empty")]
    pub options: serde_yaml::Mapping,
}

/// A validated view of a [`TaskEntry`].
#[derive(Debug, Clone, Copy)]
pub enum EntryShape<'a> {
    Alias {
        members: &'a [TaskName],
        description: Option<&'a str>,
    },
    Action {
        kind: ActionKind,
        spec: &'a TaskSpec,
    },
}

impl TaskEntry {
    /// Classify the entry, rejecting ambiguous or empty mapping forms.
    pub fn shape<'a>(&'a self, name: &TaskName) -> Result<EntryShape<'a>, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidTask {
            task: name.clone(),
            reason: reason.to_string(),
        };
        match self {
            TaskEntry::Alias(members) => Ok(EntryShape::Alias {
                members,
                description: None,
            }),
            TaskEntry::Detailed(spec) => match (&spec.alias, spec.kind) {
                (Some(_), Some(_)) => Err(invalid("set either `alias` or `kind`, not both")),
                (None, None) => Err(invalid("missing `alias` or `kind`")),
                (Some(members), None) => {
                    if !spec.deps.is_empty() || !spec.options.is_empty() || !spec.targets.is_empty() {
                        return Err(invalid("alias tasks take no `deps`, `options` or `targets`"));
                    }
                    Ok(EntryShape::Alias {
                        members,
                        description: spec.description.as_deref(),
                    })
                }
                (None, Some(kind)) => Ok(EntryShape::Action { kind, spec }),
            },
        }
    }
}

impl Manifest {
    /// Structural checks that don't need the task kinds: names and shapes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, entry) in &self.tasks {
            if name.as_str().is_empty() || name.is_qualified() {
                return Err(ConfigError::InvalidTask {
                    task: name.clone(),
                    reason: format!(
                        "task names must be non-empty and must not contain '{}'",
                        TaskName::TARGET_SEPARATOR
                    ),
                });
            }
            if let EntryShape::Action { spec, .. } = entry.shape(name)? {
                let mut seen = Vec::with_capacity(spec.targets.len());
                for target in &spec.targets {
                    if target.name.is_empty() || target.name.contains(TaskName::TARGET_SEPARATOR) {
                        return Err(ConfigError::InvalidTask {
                            task: name.clone(),
                            reason: format!("invalid target name '{}'", target.name),
                        });
                    }
                    if seen.contains(&target.name.as_str()) {
                        return Err(ConfigError::InvalidTask {
                            task: name.clone(),
                            reason: format!("target '{}' declared twice", target.name),
                        });
                    }
                    seen.push(target.name.as_str());
                }
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Everything loaded at startup: the manifest plus resolved metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory relative paths resolve against (the manifest's parent).
    pub root: PathBuf,
    pub manifest: Manifest,
    /// Parsed `package` file, if the manifest names one.
    pub package: Option<serde_json::Value>,
}

impl Config {
    /// Load the manifest at `path`.
    ///
    /// Returns `ConfigError::Io` if unreadable, `ConfigError::Parse` (with
    /// path + line context) if malformed.
    pub fn load_at(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
        let manifest: Manifest = serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        let root = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();
        tracing::debug!(path = %path.display(), tasks = manifest.tasks.len(), "loaded manifest");
        Self::from_manifest(root, manifest)
    }

    /// Build a config from an in-memory YAML document.
    pub fn parse(root: impl Into<PathBuf>, yaml: &str) -> Result<Self, ConfigError> {
        let root = root.into();
        let manifest: Manifest = serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse {
            path: root.join(MANIFEST_FILE),
            source: e,
        })?;
        Self::from_manifest(root, manifest)
    }

    /// Validate `manifest` and load its package metadata.
    pub fn from_manifest(root: PathBuf, manifest: Manifest) -> Result<Self, ConfigError> {
        manifest.validate()?;
        let package = match &manifest.package {
            Some(rel) => Some(load_package(&root.join(rel))?),
            None => None,
        };
        Ok(Config {
            root,
            manifest,
            package,
        })
    }
}

fn load_package(path: &Path) -> Result<serde_json::Value, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    serde_json::from_str(&contents).map_err(|e| ConfigError::Package {
        path: path.to_path_buf(),
        source: e,
    })
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

/// Nearest [`MANIFEST_FILE`] in `start` or one of its ancestors.
pub fn discover_from(start: &Path) -> Result<PathBuf, ConfigError> {
    start
        .ancestors()
        .map(|dir| dir.join(MANIFEST_FILE))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| ConfigError::ManifestNotFound {
            file: MANIFEST_FILE,
            start: start.to_path_buf(),
        })
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
