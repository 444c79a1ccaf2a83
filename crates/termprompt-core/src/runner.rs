//! Running a sequence of prompts and collecting answers
//!
//! One prompt is live at a time. Each holds raw mode for exactly its own
//! lifetime, and the next prompt starts only after the previous one is done,
//! aborted, or out of input.

use crate::action::{action_for, Action};
use crate::error::{PromptError, Result};
use crate::key::KeyEvent;
use crate::prompts::{
    ConfirmPrompt, Effect, MultiSelectPrompt, Outcome, Prompt, SelectPrompt, Snapshot, Status,
    TextPrompt,
};
use crate::render::Renderer;
use crate::spec::{PromptKind, PromptSpec, Validator, Value};
use crate::terminal::{CrosstermMode, KeyReader, NoRawMode, RawModeGuard, TerminalMode};
use crate::theme::Theme;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashSet;
use std::io::{self, Read, Write};
use std::sync::Arc;

/// Default width when the terminal size is not known
const DEFAULT_COLUMNS: usize = 80;

/// Whether the run goes on after a hook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

pub type SubmitHook = Box<dyn FnMut(&PromptSpec, &Value, &Answers) -> Flow + Send>;
pub type CancelHook = Box<dyn FnMut(&PromptSpec, &Answers) -> Flow + Send>;
pub type StateHook = Box<dyn FnMut(&PromptSpec, &Snapshot) + Send>;

/// Answers keyed by prompt name, in the order the prompts ran
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Answers {
    entries: Vec<(String, Value)>,
}

impl Answers {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, name: String, value: Value) {
        self.entries.push((name, value));
    }
}

impl Serialize for Answers {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Where prompts read from and draw to, plus the run's hooks
pub struct RunOptions {
    keys: KeyReader,
    output: Box<dyn Write + Send>,
    columns: usize,
    theme: Theme,
    mode: Arc<dyn TerminalMode>,
    on_submit: Option<SubmitHook>,
    on_cancel: Option<CancelHook>,
    on_state: Option<StateHook>,
}

impl RunOptions {
    /// Arbitrary streams, no raw mode, 80 columns and plain output
    pub fn new<R, W>(input: R, output: W) -> Self
    where
        R: Read + Send + 'static,
        W: Write + Send + 'static,
    {
        Self::with_keys(KeyReader::spawn(input), output)
    }

    /// Read keys from an existing reader, so consecutive runs share one input
    pub fn with_keys<W>(keys: KeyReader, output: W) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            keys,
            output: Box::new(output),
            columns: DEFAULT_COLUMNS,
            theme: Theme::PLAIN,
            mode: Arc::new(NoRawMode),
            on_submit: None,
            on_cancel: None,
            on_state: None,
        }
    }

    /// The controlling terminal: stdin in raw mode, stdout, detected width and colors
    pub fn stdio() -> Self {
        let (_, columns) = console::Term::stdout().size();
        Self::with_keys(KeyReader::stdin(), io::stdout())
            .columns(columns as usize)
            .theme(Theme::detect())
            .mode(CrosstermMode)
    }

    /// Terminal width in columns; 0 when unknown
    pub fn columns(mut self, columns: usize) -> Self {
        self.columns = columns;
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn mode<M: TerminalMode + 'static>(mut self, mode: M) -> Self {
        self.mode = Arc::new(mode);
        self
    }

    pub fn shared_mode(mut self, mode: Arc<dyn TerminalMode>) -> Self {
        self.mode = mode;
        self
    }

    /// Called after each answer is recorded. `Flow::Stop` ends the run.
    pub fn on_submit<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&PromptSpec, &Value, &Answers) -> Flow + Send + 'static,
    {
        self.on_submit = Some(Box::new(hook));
        self
    }

    /// Called when a prompt is aborted or runs out of input. Without a hook
    /// the run stops; `Flow::Continue` moves on to the next prompt.
    pub fn on_cancel<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&PromptSpec, &Answers) -> Flow + Send + 'static,
    {
        self.on_cancel = Some(Box::new(hook));
        self
    }

    /// Observe every state change of every prompt
    pub fn on_state<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&PromptSpec, &Snapshot) + Send + 'static,
    {
        self.on_state = Some(Box::new(hook));
        self
    }
}

/// Ask each prompt in order and collect the answers.
///
/// Returns early, with the answers gathered so far, when a hook says stop
/// or a prompt is cancelled without an `on_cancel` hook that continues.
pub async fn run_prompts(specs: Vec<PromptSpec>, options: RunOptions) -> Result<Answers> {
    let mut names = HashSet::new();
    for spec in &specs {
        if !names.insert(spec.name.as_str()) {
            return Err(PromptError::DuplicateName(spec.name.clone()));
        }
    }

    let RunOptions {
        keys,
        output,
        columns,
        theme,
        mode,
        mut on_submit,
        mut on_cancel,
        on_state,
    } = options;

    let mut session = Session {
        keys,
        output,
        columns,
        theme,
        mode,
        on_state,
    };

    let mut answers = Answers::default();
    for spec in &specs {
        let outcome = match spec.kind {
            PromptKind::Text => session.drive(TextPrompt::new(spec), spec).await?,
            PromptKind::Confirm => session.drive(ConfirmPrompt::new(spec), spec).await?,
            PromptKind::Select => session.drive(SelectPrompt::new(spec)?, spec).await?,
            PromptKind::MultiSelect => session.drive(MultiSelectPrompt::new(spec)?, spec).await?,
        };

        let flow = match outcome {
            Outcome::Submitted(value) => {
                answers.push(spec.name.clone(), value.clone());
                match on_submit.as_mut() {
                    Some(hook) => hook(spec, &value, &answers),
                    None => Flow::Continue,
                }
            }
            Outcome::Aborted | Outcome::Exited => match on_cancel.as_mut() {
                Some(hook) => hook(spec, &answers),
                None => Flow::Stop,
            },
        };

        if flow == Flow::Stop {
            break;
        }
    }

    Ok(answers)
}

/// Streams and settings shared by the prompts of one run
struct Session {
    keys: KeyReader,
    output: Box<dyn Write + Send>,
    columns: usize,
    theme: Theme,
    mode: Arc<dyn TerminalMode>,
    on_state: Option<StateHook>,
}

enum Input {
    Key(Option<KeyEvent>),
    Expired,
}

impl Session {
    /// Feed keys to `prompt` until it reaches a terminal state or input ends.
    async fn drive<P: Prompt>(&mut self, mut prompt: P, spec: &PromptSpec) -> Result<Outcome> {
        let guard = RawModeGuard::acquire(self.mode.clone())?;
        let mut renderer = Renderer::new(self.columns);
        let list = prompt.kind().is_list();

        self.draw(&mut renderer, &prompt)?;
        self.fire(spec, prompt.snapshot());

        let mut replay: Option<KeyEvent> = None;
        let outcome = loop {
            let input = match (replay.take(), prompt.deadline()) {
                (Some(key), _) => Input::Key(Some(key)),
                (None, Some(deadline)) => tokio::select! {
                    key = self.keys.next() => Input::Key(key),
                    _ = tokio::time::sleep_until(deadline) => Input::Expired,
                },
                (None, None) => Input::Key(self.keys.next().await),
            };

            let key = match input {
                Input::Key(Some(key)) => key,
                Input::Key(None) => break Outcome::Exited,
                Input::Expired => {
                    prompt.expire();
                    self.draw(&mut renderer, &prompt)?;
                    continue;
                }
            };

            match prompt.update(action_for(&key, list)) {
                Effect::None => {}
                Effect::Redraw => {
                    self.draw(&mut renderer, &prompt)?;
                    self.fire(spec, prompt.snapshot());
                }
                Effect::Bell => renderer.bell(&mut self.output)?,
                Effect::Validate(value) => {
                    replay = self
                        .validate(&mut prompt, spec.validate.as_ref(), value, list)
                        .await;
                    self.draw(&mut renderer, &prompt)?;
                    self.fire(spec, prompt.snapshot());
                }
            }

            match prompt.status() {
                Status::Active => {}
                Status::Done => break Outcome::Submitted(prompt.value()),
                Status::Aborted => break Outcome::Aborted,
            }
        };

        if outcome == Outcome::Exited {
            let snapshot = Snapshot {
                exited: true,
                ..prompt.snapshot()
            };
            self.fire(spec, snapshot);
        }

        renderer.finish(&mut self.output)?;
        guard.release()?;
        Ok(outcome)
    }

    /// Run the validator while watching the keyboard.
    ///
    /// An abort key cancels immediately and the validator's result is dropped
    /// unseen. The first other key is returned for replay once validation
    /// settles; any later ones are discarded.
    async fn validate<P: Prompt>(
        &mut self,
        prompt: &mut P,
        validator: Option<&Validator>,
        value: String,
        list: bool,
    ) -> Option<KeyEvent> {
        let Some(validator) = validator else {
            prompt.validated(Ok(()));
            return None;
        };

        let mut pending = validator.validate(value);
        let mut held = None;
        let mut input_open = true;
        loop {
            tokio::select! {
                biased;
                result = &mut pending => {
                    prompt.validated(result);
                    return held;
                }
                key = self.keys.next(), if input_open => match key {
                    Some(key) if action_for(&key, list) == Action::Abort => {
                        prompt.update(Action::Abort);
                        return None;
                    }
                    Some(key) => {
                        if held.is_none() {
                            held = Some(key);
                        }
                    }
                    None => input_open = false,
                },
            }
        }
    }

    fn draw<P: Prompt>(&mut self, renderer: &mut Renderer, prompt: &P) -> Result<()> {
        renderer.draw(&mut self.output, prompt.frame(&self.theme, self.columns))?;
        Ok(())
    }

    fn fire(&mut self, spec: &PromptSpec, snapshot: Snapshot) {
        if let Some(hook) = self.on_state.as_mut() {
            hook(spec, &snapshot);
        }
    }
}
