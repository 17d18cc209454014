//! quiz-form - headless driver for the quiz form controllers
//!
//! Loads a page document, replays recorded input events through the
//! dispatcher and prints what the page would have done as JSON.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use stereo_quiz_form::state::FormState;
use stereo_quiz_form::surface::Presentation;
use stereo_quiz_form::{
    App, Document, FormConfig, FormRules, HeadlessSurface, PageEvent, PageSummary, Reaction,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "quiz-form", version, about = "Quiz form constraint and submit checks")]
struct Cli {
    #[arg(
        long,
        global = true,
        help = "Config file (defaults to the platform config directory)"
    )]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Dispatch a JSON array of events against a page document
    Replay {
        document: PathBuf,
        events: PathBuf,
        #[arg(long, default_value_t = false, help = "Wait for emphasis timers before reporting")]
        settle: bool,
    },
    /// Show how a page document is wired
    Inspect { document: PathBuf },
}

#[derive(Debug, Serialize)]
struct Step {
    event: PageEvent,
    reaction: Reaction,
}

#[derive(Debug, Serialize)]
struct ReplayReport {
    generated_at: DateTime<Utc>,
    page: &'static str,
    steps: Vec<Step>,
    summary: PageSummary,
    presentation: Presentation,
}

#[derive(Debug, Serialize)]
struct InspectReport {
    page: &'static str,
    items: Vec<String>,
    native_value: Option<String>,
    questions: Vec<usize>,
    unwired_questions: Vec<usize>,
    toggle_targets: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the report
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stereo_quiz_form=info,quiz_form=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => FormConfig::load_from(path)?,
        None => FormConfig::load()?,
    };
    let rules = config.rules();

    match cli.command {
        Commands::Replay {
            document,
            events,
            settle,
        } => replay(&document, &events, rules, settle).await,
        Commands::Inspect { document } => inspect(&document, &rules),
    }
}

async fn replay(document: &Path, events: &Path, rules: FormRules, settle: bool) -> Result<()> {
    let document = Document::from_path(document)?;
    let content = fs::read_to_string(events)
        .with_context(|| format!("failed to read events {}", events.display()))?;
    let events: Vec<PageEvent> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse events {}", events.display()))?;

    let emphasis = rules.emphasis;
    let surface = HeadlessSurface::new();
    let mut app = App::from_document(&document, rules, surface.clone())?;
    tracing::info!(page = app.form().page_name(), events = events.len(), "replaying");

    let steps: Vec<Step> = events
        .into_iter()
        .map(|event| {
            let reaction = app.handle_event(event.clone());
            Step { event, reaction }
        })
        .collect();

    if settle {
        tokio::time::sleep(emphasis).await;
        // Let the spawned clears run before the snapshot
        tokio::task::yield_now().await;
    }

    let report = ReplayReport {
        generated_at: Utc::now(),
        page: app.form().page_name(),
        steps,
        summary: app.summary(),
        presentation: surface.snapshot(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn inspect(document: &Path, rules: &FormRules) -> Result<()> {
    let document = Document::from_path(document)?;
    let page = document.build(rules)?;

    let mut report = InspectReport {
        page: page.form.page_name(),
        items: Vec::new(),
        native_value: None,
        questions: Vec::new(),
        unwired_questions: Vec::new(),
        toggle_targets: page.toggles.iter().map(|t| t.target_id.clone()).collect(),
    };
    match &page.form {
        FormState::None => {}
        FormState::Selection(state) => {
            report.items = state.items.iter().map(|i| i.id.clone()).collect();
            report.native_value = state.native().map(str::to_string);
        }
        FormState::Response(form) => {
            report.questions = form.blocks.iter().map(|b| b.index).collect();
            report.unwired_questions = form.unwired_blocks();
        }
    }
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
