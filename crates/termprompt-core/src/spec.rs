//! Prompt configuration: kinds, choices, values and validators

use crate::error::PromptError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;
use std::sync::Arc;

/// The four supported prompt kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKind {
    Text,
    Confirm,
    Select,
    MultiSelect,
}

impl PromptKind {
    /// List-style prompts navigate with `j`/`k` and hide the caret
    pub fn is_list(&self) -> bool {
        matches!(self, PromptKind::Select | PromptKind::MultiSelect)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PromptKind::Text => "text",
            PromptKind::Confirm => "confirm",
            PromptKind::Select => "select",
            PromptKind::MultiSelect => "multiselect",
        }
    }
}

impl fmt::Display for PromptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PromptKind {
    type Err = PromptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(PromptKind::Text),
            "confirm" => Ok(PromptKind::Confirm),
            "select" => Ok(PromptKind::Select),
            "multiselect" => Ok(PromptKind::MultiSelect),
            other => Err(PromptError::InvalidKind(other.to_string())),
        }
    }
}

/// An answer, or the value carried by a choice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Text(String),
    List(Vec<Value>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Text(s) => write!(f, "{}", s),
            Value::List(items) => {
                let parts: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "{}", parts.join(", "))
            }
        }
    }
}

/// One entry of a select or multiselect list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub value: Value,
    pub label: String,
    #[serde(default)]
    pub hint: Option<String>,
}

impl Choice {
    pub fn new(value: impl Into<Value>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            hint: None,
        }
    }

    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Future returned by a [`Validator`]: `Err` carries the message to show
pub type ValidationFuture = Pin<Box<dyn Future<Output = Result<(), String>> + Send>>;

/// Checks a text answer before it is accepted
#[derive(Clone)]
pub struct Validator(Arc<dyn Fn(String) -> ValidationFuture + Send + Sync>);

impl Validator {
    /// Wrap a synchronous check
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&str) -> Result<(), String> + Send + Sync + 'static,
    {
        Self(Arc::new(move |value: String| {
            let result = check(&value);
            Box::pin(async move { result }) as ValidationFuture
        }))
    }

    /// Wrap an asynchronous check, e.g. one that inspects the filesystem
    pub fn new_async<F, Fut>(check: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), String>> + Send + 'static,
    {
        Self(Arc::new(move |value: String| {
            Box::pin(check(value)) as ValidationFuture
        }))
    }

    /// Reject empty input with `message`
    pub fn required(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(move |value| {
            if value.is_empty() {
                Err(message.clone())
            } else {
                Ok(())
            }
        })
    }

    pub fn validate(&self, value: String) -> ValidationFuture {
        (self.0)(value)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Validator")
    }
}

/// Immutable description of one prompt in a run
#[derive(Debug, Clone)]
pub struct PromptSpec {
    pub kind: PromptKind,
    /// Answer key, unique within a run
    pub name: String,
    pub message: String,
    /// Short tag printed before the message
    pub label: String,
    pub initial: Option<Value>,
    pub hint: Option<String>,
    pub choices: Vec<Choice>,
    pub validate: Option<Validator>,
}

impl PromptSpec {
    pub fn new(kind: PromptKind, name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            message: message.into(),
            label: String::new(),
            initial: None,
            hint: None,
            choices: Vec::new(),
            validate: None,
        }
    }

    pub fn text(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(PromptKind::Text, name, message)
    }

    pub fn confirm(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(PromptKind::Confirm, name, message)
    }

    pub fn select(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(PromptKind::Select, name, message)
    }

    pub fn multiselect(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(PromptKind::MultiSelect, name, message)
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn initial(mut self, initial: impl Into<Value>) -> Self {
        self.initial = Some(initial.into());
        self
    }

    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn choice(mut self, choice: Choice) -> Self {
        self.choices.push(choice);
        self
    }

    pub fn choices(mut self, choices: impl IntoIterator<Item = Choice>) -> Self {
        self.choices.extend(choices);
        self
    }

    pub fn validate(mut self, validator: Validator) -> Self {
        self.validate = Some(validator);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_str() {
        assert_eq!("select".parse::<PromptKind>().unwrap(), PromptKind::Select);
        assert_eq!(
            "multiselect".parse::<PromptKind>().unwrap(),
            PromptKind::MultiSelect
        );
        let err = "autocomplete".parse::<PromptKind>().unwrap_err();
        assert_eq!(err.to_string(), "invalid prompt kind: autocomplete");
    }

    #[test]
    fn test_value_display() {
        let list = Value::List(vec!["a".into(), "b".into()]);
        assert_eq!(list.to_string(), "a, b");
        assert_eq!(Value::Bool(true).to_string(), "true");
    }

    #[tokio::test]
    async fn test_required_validator() {
        let validator = Validator::required("Required");
        assert_eq!(
            validator.validate(String::new()).await,
            Err("Required".to_string())
        );
        assert_eq!(validator.validate("x".to_string()).await, Ok(()));
    }

    #[tokio::test]
    async fn test_async_validator() {
        let validator = Validator::new_async(|value: String| async move {
            tokio::task::yield_now().await;
            if value.starts_with('.') {
                Ok(())
            } else {
                Err("Use a relative path".to_string())
            }
        });
        assert_eq!(validator.validate("./app".to_string()).await, Ok(()));
        assert!(validator.validate("/app".to_string()).await.is_err());
    }
}
