//! YAML prompt scripts

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::Path;
use termprompt_core::{Choice, PromptKind, PromptSpec, Validator, Value};

const DEFAULT_REQUIRED_MESSAGE: &str = "Please enter a value";
const DIR_NOT_EMPTY: &str = "Directory is not empty!";

/// Entries that may already exist in a directory that still counts as empty
const SAFE_ENTRIES: &[&str] = &[
    ".DS_Store",
    ".git",
    ".gitkeep",
    ".gitattributes",
    ".gitignore",
    ".gitlab-ci.yml",
    ".hg",
    ".hgcheck",
    ".hgignore",
    ".idea",
    ".npmignore",
    ".travis.yml",
    ".yarn",
    ".yarnrc.yml",
    "docs",
    "LICENSE",
    "mkdocs.yml",
    "Thumbs.db",
];

/// One prompt as written in a script file
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptEntry {
    pub kind: String,
    pub name: String,
    pub message: String,
    /// Defaults to `name`
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub initial: Option<Value>,
    #[serde(default)]
    pub hint: Option<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
    /// Reject empty text input
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub required_message: Option<String>,
    /// Reject paths that exist and are not empty directories
    #[serde(default)]
    pub empty_dir: bool,
}

impl ScriptEntry {
    pub fn into_spec(self) -> Result<PromptSpec> {
        let kind: PromptKind = self.kind.parse()?;
        let validator = self.validator();

        let mut spec = PromptSpec::new(kind, self.name.clone(), self.message)
            .label(self.label.unwrap_or(self.name))
            .choices(self.choices);
        spec.initial = self.initial;
        spec.hint = self.hint;
        spec.validate = validator;
        Ok(spec)
    }

    fn validator(&self) -> Option<Validator> {
        let required = self.required.then(|| {
            self.required_message
                .clone()
                .unwrap_or_else(|| DEFAULT_REQUIRED_MESSAGE.to_string())
        });

        match (required, self.empty_dir) {
            (None, false) => None,
            (Some(message), false) => Some(Validator::required(message)),
            (required, true) => Some(Validator::new_async(move |value: String| {
                let required = required.clone();
                async move {
                    if let Some(message) = required {
                        if value.is_empty() {
                            return Err(message);
                        }
                    }
                    check_empty_dir(&value).await
                }
            })),
        }
    }
}

/// Parse a script from YAML text
pub fn parse_script(text: &str) -> Result<Vec<PromptSpec>> {
    let entries: Vec<ScriptEntry> =
        serde_yaml::from_str(text).context("Failed to parse prompt script")?;
    entries.into_iter().map(ScriptEntry::into_spec).collect()
}

pub fn load_script(path: &Path) -> Result<Vec<PromptSpec>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let specs = parse_script(&text)?;
    if specs.is_empty() {
        bail!("Prompt script {} contains no prompts", path.display());
    }
    Ok(specs)
}

/// Accept `path` when it does not exist yet or holds nothing but safe entries.
pub async fn check_empty_dir(path: &str) -> std::result::Result<(), String> {
    let metadata = match tokio::fs::metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.to_string()),
    };
    if !metadata.is_dir() {
        return Err(DIR_NOT_EMPTY.to_string());
    }

    let mut entries = tokio::fs::read_dir(path).await.map_err(|e| e.to_string())?;
    while let Some(entry) = entries.next_entry().await.map_err(|e| e.to_string())? {
        let name = entry.file_name();
        if !is_safe_entry(&name.to_string_lossy()) {
            return Err(DIR_NOT_EMPTY.to_string());
        }
    }
    Ok(())
}

fn is_safe_entry(name: &str) -> bool {
    SAFE_ENTRIES.contains(&name)
        || name.ends_with(".iml")
        || name.starts_with("npm-debug.log")
        || name.starts_with("yarn-debug.log")
        || name.starts_with("yarn-error.log")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = r#"
- kind: text
  name: dir
  message: Where should we create your new project?
  initial: ./my-app
  required: true
- kind: confirm
  name: deps
  label: deps
  message: Install dependencies?
  hint: recommended
  initial: true
- kind: select
  name: how
  message: How would you like to start?
  initial: quick
  choices:
    - { value: quick, label: Quick start }
    - { value: other, label: Use a template, hint: advanced }
- kind: multiselect
  name: langs
  message: Pick languages
  choices:
    - { value: ts, label: TypeScript }
    - { value: py, label: Python }
"#;

    #[test]
    fn test_parse_script() {
        let specs = parse_script(SCRIPT).unwrap();
        assert_eq!(specs.len(), 4);

        assert_eq!(specs[0].kind, PromptKind::Text);
        assert_eq!(specs[0].label, "dir");
        assert_eq!(specs[0].initial, Some(Value::from("./my-app")));
        assert!(specs[0].validate.is_some());

        assert_eq!(specs[1].initial, Some(Value::Bool(true)));
        assert_eq!(specs[1].hint.as_deref(), Some("recommended"));
        assert!(specs[1].validate.is_none());

        assert_eq!(specs[2].choices.len(), 2);
        assert_eq!(specs[2].choices[1].hint.as_deref(), Some("advanced"));
        assert_eq!(specs[3].kind, PromptKind::MultiSelect);
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let err = parse_script("- { kind: autocomplete, name: a, message: A }").unwrap_err();
        assert!(err.to_string().contains("invalid prompt kind: autocomplete"));
    }

    #[test]
    fn test_load_script_rejects_empty_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("prompts.yaml");
        std::fs::write(&path, "[]\n").unwrap();
        let err = load_script(&path).unwrap_err();
        assert!(err.to_string().contains("contains no prompts"));

        std::fs::write(&path, SCRIPT).unwrap();
        assert_eq!(load_script(&path).unwrap().len(), 4);
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        assert!(parse_script("- { kind: text, name: a, message: A, colour: red }").is_err());
    }

    #[tokio::test]
    async fn test_required_message() {
        let specs = parse_script(
            "- { kind: text, name: a, message: A, required: true, required_message: Needed }",
        )
        .unwrap();
        let validator = specs[0].validate.as_ref().unwrap();
        assert_eq!(validator.validate(String::new()).await, Err("Needed".to_string()));
        assert_eq!(validator.validate("x".to_string()).await, Ok(()));
    }

    #[tokio::test]
    async fn test_check_empty_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("app");
        let path = dir.to_string_lossy().into_owned();

        assert_eq!(check_empty_dir(&path).await, Ok(()));

        std::fs::create_dir(&dir).unwrap();
        std::fs::write(dir.join(".gitignore"), "node_modules\n").unwrap();
        std::fs::write(dir.join("project.iml"), "").unwrap();
        assert_eq!(check_empty_dir(&path).await, Ok(()));

        std::fs::write(dir.join("package.json"), "{}").unwrap();
        assert_eq!(
            check_empty_dir(&path).await,
            Err(DIR_NOT_EMPTY.to_string())
        );
    }

    #[tokio::test]
    async fn test_empty_dir_validator_from_script() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("main.rs"), "").unwrap();
        let specs =
            parse_script("- { kind: text, name: dir, message: Where to, empty_dir: true }")
                .unwrap();
        let validator = specs[0].validate.as_ref().unwrap();
        let taken = tmp.path().to_string_lossy().into_owned();
        assert_eq!(
            validator.validate(taken).await,
            Err(DIR_NOT_EMPTY.to_string())
        );
        let fresh = tmp.path().join("new").to_string_lossy().into_owned();
        assert_eq!(validator.validate(fresh).await, Ok(()));
    }
}
