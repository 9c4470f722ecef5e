//! Manifest → [`Registry`].
//!
//! For each manifest entry:
//!
//! 1. Classify it (alias or action) and reject malformed shapes.
//! 2. For actions, merge task-level options under each target's options.
//! 3. Render option templates.
//! 4. Decode into the kind's typed options and register.
//!
//! A task with targets registers `task:target` for every target plus an
//! alias `task` over all of them in declared order, so `csslint` runs every
//! target and `csslint:strict` runs one.

use serde_yaml::Mapping;

use conductor_core::config::{EntryShape, TaskSpec};
use conductor_core::{ActionKind, Config, Registry, Task, TaskName};
use conductor_template::{TemplateContext, TemplateEngine};

use crate::error::BuildError;
use crate::kinds;

/// Build and validate the registry for `config`, templating against today's date.
pub fn build_registry(config: &Config) -> Result<Registry, BuildError> {
    let ctx = TemplateContext::from_config(config)?;
    build_registry_with(config, &TemplateEngine::new(&ctx)?)
}

/// [`build_registry`] with a caller-supplied template engine.
pub fn build_registry_with(config: &Config, engine: &TemplateEngine) -> Result<Registry, BuildError> {
    let mut registry = Registry::new();

    for (name, entry) in &config.manifest.tasks {
        match entry.shape(name)? {
            EntryShape::Alias { members, description } => {
                let mut task = Task::alias(members);
                if let Some(text) = description {
                    task = task.with_description(text);
                }
                registry.register(name.clone(), task)?;
            }
            EntryShape::Action { kind, spec } => register_action(&mut registry, engine, name, kind, spec)?,
        }
    }

    registry.validate()?;
    tracing::debug!(tasks = registry.len(), "registry built");
    Ok(registry)
}

fn register_action(
    registry: &mut Registry,
    engine: &TemplateEngine,
    name: &TaskName,
    kind: ActionKind,
    spec: &TaskSpec,
) -> Result<(), BuildError> {
    if spec.targets.is_empty() {
        let task = concrete(engine, name, kind, &spec.options, spec.deps.clone(), spec.description.as_deref())?;
        registry.register(name.clone(), task)?;
        return Ok(());
    }

    let mut members = Vec::with_capacity(spec.targets.len());
    for target in &spec.targets {
        let qualified = TaskName::qualified(name, &target.name);
        let options = merge_options(&spec.options, &target.options);
        let deps = spec.deps.iter().chain(&target.deps).cloned().collect();
        let task = concrete(engine, &qualified, kind, &options, deps, spec.description.as_deref())?;
        registry.register(qualified.clone(), task)?;
        members.push(qualified);
    }

    let mut alias = Task::alias(members);
    if let Some(text) = &spec.description {
        alias = alias.with_description(text.as_str());
    }
    registry.register(name.clone(), alias)?;
    Ok(())
}

fn concrete(
    engine: &TemplateEngine,
    name: &TaskName,
    kind: ActionKind,
    options: &Mapping,
    deps: Vec<TaskName>,
    description: Option<&str>,
) -> Result<Task, BuildError> {
    let rendered = engine.render_options(name.as_str(), options)?;
    let action = kinds::decode(kind, name, rendered)?;
    Ok(Task::Concrete {
        action,
        deps,
        description: description.map(str::to_string),
    })
}

/// Shallow merge: every key in `overrides` replaces the same key in `base`.
pub fn merge_options(base: &Mapping, overrides: &Mapping) -> Mapping {
    let mut merged = base.clone();
    for (k, v) in overrides {
        merged.insert(k.clone(), v.clone());
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::Value;

    #[test]
    fn target_options_override_task_options() {
        let base: Mapping = serde_yaml::from_str("csslintrc: a.json\nsrc: [x]\n").expect("base");
        let over: Mapping = serde_yaml::from_str("src: [y]\n").expect("over");
        let merged = merge_options(&base, &over);
        assert_eq!(merged["csslintrc"], Value::from("a.json"));
        assert_eq!(merged["src"][0], Value::from("y"));
    }
}
