//! Termprompt CLI - Inline interactive prompts from the command line

mod demo;
mod script;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use termprompt_core::terminal::CrosstermMode;
use termprompt_core::{
    print, run_prompts, Answers, Flow, KeyReader, Loaded, LoadingIndicator, PromptSpec,
    RunOptions, Theme, Value,
};

#[derive(Parser, Debug)]
#[command(name = "termprompt")]
#[command(about = "Ask inline interactive questions in the terminal")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Disable colored output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Only use ASCII glyphs
    #[arg(long, global = true)]
    pub ascii: bool,

    /// Terminal width to lay prompts out for (detected when omitted)
    #[arg(long, global = true)]
    pub columns: Option<usize>,

    /// Keep loading indicators still
    #[arg(long = "no-motion", global = true)]
    pub no_motion: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the prompts listed in a YAML script and print the answers
    Run(RunArgs),
    /// Run the project-setup questionnaire
    Demo,
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// YAML file with one entry per prompt
    pub file: PathBuf,
}

/// Leave raw mode and show the cursor again
fn restore_terminal() {
    let _ = crossterm::terminal::disable_raw_mode();
    let _ = console::Term::stdout().show_cursor();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure the terminal is usable again after a panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore_terminal();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        restore_terminal();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    let mut theme = Theme::detect();
    if args.no_color {
        theme.color = false;
    }
    if args.ascii {
        theme.ascii = true;
    }
    let columns = args
        .columns
        .unwrap_or_else(|| console::Term::stdout().size().1 as usize);

    let result = match args.command {
        Some(Command::Run(run_args)) => run_script(&run_args.file, theme, columns).await,
        // No subcommand provided, default to the questionnaire
        Some(Command::Demo) | None => run_demo(theme, columns, !args.no_motion).await,
    };

    restore_terminal();
    result
}

async fn run_script(path: &Path, theme: Theme, columns: usize) -> Result<()> {
    let specs = script::load_script(path)?;
    cliclack::intro("termprompt")?;
    cliclack::log::info(format!("{} prompts from {}", specs.len(), path.display()))?;

    let answers = ask(specs, theme, columns, |_, _| {}).await?;

    print!("{}", serde_yaml::to_string(&answers)?);
    cliclack::outro(format!("{} answers collected", answers.len()))?;
    Ok(())
}

async fn run_demo(theme: Theme, columns: usize, motion: bool) -> Result<()> {
    cliclack::intro("Create a new project")?;

    let project = ask(demo::project_specs(&theme), theme, columns, report(theme, columns)).await?;
    for step in demo::steps(&project) {
        run_step(step, theme, columns, motion).await?;
    }

    let setup = ask(demo::setup_specs(&theme), theme, columns, report(theme, columns)).await?;
    for step in demo::steps(&setup) {
        run_step(step, theme, columns, motion).await?;
    }
    cliclack::log::success(format!("{} answers recorded", project.len() + setup.len()))?;

    let dir = project
        .get("dir")
        .and_then(|v| v.as_str())
        .unwrap_or(demo::DEFAULT_DIR)
        .to_string();
    cliclack::outro(format!("That's it! Your project is ready in {}", dir))?;
    Ok(())
}

/// Print the demo's follow-up line for an answer
fn report(theme: Theme, columns: usize) -> impl FnMut(&PromptSpec, &Value) + Send + 'static {
    move |spec: &PromptSpec, value: &Value| {
        if let Some((prefix, text)) = demo::follow_up(&spec.name, value) {
            let _ = print::info(&mut io::stdout(), &theme, columns, prefix, text);
        }
    }
}

/// Show a loading indicator while `step` runs. Ctrl+C ends the process.
async fn run_step(step: demo::Step, theme: Theme, columns: usize, motion: bool) -> Result<()> {
    let indicator = LoadingIndicator::new(step.start, step.end)
        .theme(theme)
        .columns(columns)
        .motion(motion)
        .mode(CrosstermMode);
    let keys = KeyReader::stdin();
    match indicator.run(&mut io::stdout(), Some(&keys), demo::perform()).await? {
        Loaded::Done(()) => Ok(()),
        Loaded::Interrupted => {
            restore_terminal();
            std::process::exit(130);
        }
    }
}

/// Run `specs` on the terminal, calling `after` for every answer.
///
/// Exits the process when the user cancels.
async fn ask<F>(specs: Vec<PromptSpec>, theme: Theme, columns: usize, mut after: F) -> Result<Answers>
where
    F: FnMut(&PromptSpec, &Value) + Send + 'static,
{
    let cancelled = Arc::new(AtomicBool::new(false));
    let flag = cancelled.clone();

    let options = RunOptions::stdio()
        .theme(theme)
        .columns(columns)
        .on_submit(move |spec, value, _| {
            after(spec, value);
            Flow::Continue
        })
        .on_cancel(move |_, _| {
            flag.store(true, Ordering::SeqCst);
            Flow::Stop
        });

    let answers = match run_prompts(specs, options).await {
        Ok(answers) => answers,
        Err(e) => {
            let _ = print::error(&mut io::stdout(), &theme, columns, "Oh no!", &e.to_string());
            return Err(e.into());
        }
    };
    if cancelled.load(Ordering::SeqCst) {
        cliclack::outro_cancel("Cancelled")?;
        restore_terminal();
        std::process::exit(1);
    }
    Ok(answers)
}
