//! Project-setup questionnaire run by `termprompt demo`

use crate::script::check_empty_dir;
use std::time::Duration;
use termprompt_core::{Answers, Choice, PromptSpec, Theme, Validator, Value};

pub const DEFAULT_DIR: &str = "./my-app";

/// How long each simulated setup step takes
const STEP_TIME: Duration = Duration::from_millis(1200);

/// Where the project goes and how it starts
pub fn project_specs(theme: &Theme) -> Vec<PromptSpec> {
    vec![
        PromptSpec::text("dir", "Where should we create your new project?")
            .label(theme.tag("dir"))
            .initial(DEFAULT_DIR)
            .validate(Validator::new_async(|value: String| async move {
                check_empty_dir(&value).await
            })),
        PromptSpec::select("how", "How would you like to start your new project?")
            .label(theme.tag("how"))
            .initial("quick")
            .choice(Choice::new("quick", "Quick start"))
            .choice(Choice::new("other", "Use a template")),
    ]
}

/// Tooling questions, asked once the template is in place
pub fn setup_specs(theme: &Theme) -> Vec<PromptSpec> {
    vec![
        PromptSpec::confirm("deps", "Install dependencies?")
            .label(theme.tag("deps"))
            .hint("recommended")
            .initial(true),
        PromptSpec::confirm("git", "Initialize a new git repository?")
            .label(theme.tag("git"))
            .hint("recommended")
            .initial(true),
        PromptSpec::select("ts", "TypeScript or JavaScript?")
            .label(theme.tag("ts"))
            .initial(true)
            .choice(Choice::new(true, "TypeScript").hint("(recommended)"))
            .choice(Choice::new(false, "JavaScript")),
    ]
}

/// Status line printed after an answer, as `(prefix, text)`
pub fn follow_up(name: &str, value: &Value) -> Option<(&'static str, &'static str)> {
    match (name, value) {
        ("deps", Value::Bool(false)) => {
            Some(("No problem!", "Remember to install dependencies after setup."))
        }
        ("git", Value::Bool(false)) => Some(("Sounds good!", "You can always run git init manually.")),
        ("ts", Value::Bool(false)) => {
            Some(("Heads up!", "TypeScript conversion is not yet supported."))
        }
        _ => None,
    }
}

/// A setup step shown behind a loading indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub start: &'static str,
    pub end: &'static str,
}

/// Steps the given answers ask for, in the order they run
pub fn steps(answers: &Answers) -> Vec<Step> {
    let mut steps = Vec::new();
    if answers.get("how").is_some() {
        steps.push(Step {
            start: "Template copying...",
            end: "Template copied",
        });
    }
    if answers.get("deps") == Some(&Value::Bool(true)) {
        steps.push(Step {
            start: "Dependencies installing...",
            end: "Dependencies installed",
        });
    }
    if answers.get("git") == Some(&Value::Bool(true)) {
        steps.push(Step {
            start: "Git initializing...",
            end: "Git initialized",
        });
    }
    steps
}

/// The demo never touches the disk; a step only takes time
pub async fn perform() {
    tokio::time::sleep(STEP_TIME).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor};
    use std::sync::{Arc, Mutex};
    use termprompt_core::{run_prompts, Flow, KeyReader, RunOptions};

    #[test]
    fn test_follow_up_only_for_declines() {
        assert_eq!(follow_up("deps", &Value::Bool(true)), None);
        assert_eq!(
            follow_up("git", &Value::Bool(false)).map(|(prefix, _)| prefix),
            Some("Sounds good!")
        );
        assert_eq!(follow_up("dir", &Value::from("./app")), None);
    }

    #[test]
    fn test_labels_are_tags() {
        let specs = project_specs(&Theme::PLAIN);
        assert_eq!(specs[0].label, "   dir  ");
        assert_eq!(setup_specs(&Theme::PLAIN)[0].label, "  deps  ");
    }

    #[tokio::test]
    async fn test_demo_answers() {
        // Both groups read from one reader, as the CLI does with stdin
        let keys = KeyReader::spawn(Cursor::new(b"./app\r1yn\r".to_vec()));

        let prefixes = Arc::new(Mutex::new(Vec::new()));
        let seen = prefixes.clone();
        let report = move |spec: &PromptSpec, value: &Value, _: &Answers| {
            if let Some((prefix, _)) = follow_up(&spec.name, value) {
                seen.lock().unwrap().push(prefix);
            }
            Flow::Continue
        };

        // Keys typed while a validator is pending are dropped, so keep the
        // scripted input synchronous
        let mut project = project_specs(&Theme::PLAIN);
        project[0].validate = None;

        let options = RunOptions::with_keys(keys.clone(), io::sink()).on_submit(report.clone());
        let first = run_prompts(project, options).await.unwrap();
        assert_eq!(first.get("dir"), Some(&Value::from("./app")));
        assert_eq!(first.get("how"), Some(&Value::from("quick")));
        assert_eq!(steps(&first).len(), 1);

        let options = RunOptions::with_keys(keys, io::sink()).on_submit(report);
        let second = run_prompts(setup_specs(&Theme::PLAIN), options)
            .await
            .unwrap();
        assert_eq!(second.get("deps"), Some(&Value::Bool(true)));
        assert_eq!(second.get("git"), Some(&Value::Bool(false)));
        assert_eq!(second.get("ts"), Some(&Value::Bool(true)));
        assert_eq!(*prefixes.lock().unwrap(), vec!["Sounds good!"]);

        let ends: Vec<&str> = steps(&second).iter().map(|s| s.end).collect();
        assert_eq!(ends, vec!["Dependencies installed"]);
    }
}
