//! Command line front end: list, run and print the worked examples.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use milp_primer::config::{OutputFormat, Overrides, Settings};
use milp_primer::problems::{self, COLLECTION_COMPLETE, Chapter, Example};
use milp_primer::report::{self, Report};
use milp_primer::{ModelWithProblem, logging};

#[derive(Parser)]
#[command(name = "milp-primer")]
#[command(about = "Worked linear and mixed-integer programming examples")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Settings file (defaults to ./milp-primer.toml when present)
    #[arg(long, global = true, env = "MILP_PRIMER_CONFIG")]
    config: Option<PathBuf>,

    /// Print reports as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Print each model in LP format before its report (a `model` field with --json)
    #[arg(long, global = true)]
    show_model: bool,

    /// Integrality tolerance of the solver
    #[arg(long, global = true)]
    tolerance: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all examples.
    List,

    /// Run examples by id.
    Run {
        /// Example ids, e.g. `knapsack`
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Run every example of a chapter.
    Chapter {
        /// Chapter number: 3, 4 or 5
        number: u8,
    },

    /// Run the whole collection.
    All,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let overrides = Overrides {
        format: cli.json.then_some(OutputFormat::Json),
        show_model: cli.show_model.then_some(true),
        int_tolerance: cli.tolerance,
    };
    let settings =
        Settings::load_with(cli.config.as_deref(), &overrides).context("loading settings")?;

    logging::init(&settings.log.filter);
    debug!(?settings, "settings loaded");

    match cli.command {
        Commands::List => list()?,
        Commands::Run { ids } => {
            let examples = ids
                .iter()
                .map(|id| problems::find(id))
                .collect::<Result<Vec<_>, _>>()?;
            run(&examples, &settings, false)?;
        }
        Commands::Chapter { number } => run(&problems::by_chapter(number)?, &settings, true)?,
        Commands::All => {
            run(&problems::catalog(), &settings, true)?;
            if settings.output.format == OutputFormat::Text {
                let mut out = io::stdout().lock();
                writeln!(out, "{}{COLLECTION_COMPLETE}", report::section("Done"))?;
            }
        }
    }
    Ok(())
}

fn list() -> Result<()> {
    let mut out = io::stdout().lock();
    let examples = problems::catalog();
    for chapter in Chapter::ALL {
        writeln!(out, "{chapter}")?;
        for example in examples.iter().filter(|e| e.chapter() == chapter) {
            writeln!(
                out,
                "  {}.{:<3}{:<24}{}",
                chapter.number(),
                example.number(),
                example.id(),
                example.title()
            )?;
        }
    }
    Ok(())
}

/// Runs the examples in order. With `chapters`, each chapter opens with its introduction
/// and closes with its summary.
fn run(examples: &[Box<dyn Example>], settings: &Settings, chapters: bool) -> Result<()> {
    let params = &settings.solver;
    let text = settings.output.format == OutputFormat::Text;
    let mut reports: Vec<Report> = Vec::with_capacity(examples.len());
    let mut out = io::stdout().lock();

    for (i, example) in examples.iter().enumerate() {
        let chapter = example.chapter();
        let chapter_starts = i == 0 || examples[i - 1].chapter() != chapter;
        let chapter_ends = examples.get(i + 1).is_none_or(|next| next.chapter() != chapter);

        if text && chapters && chapter_starts {
            write!(out, "{}", report::section(&chapter.to_string()))?;
            if let Some(introduction) = chapter.introduction() {
                writeln!(out, "\n{introduction}")?;
            }
        }

        info!(id = example.id(), "running {}", example.heading());
        let lp = settings
            .output
            .show_model
            .then(|| example.model(params).to_lp_string());
        if let (true, Some(lp)) = (text, &lp) {
            write!(out, "{}{lp}", report::section(&format!("Model: {}", example.id())))?;
        }

        let mut report = example
            .run(params)
            .with_context(|| format!("running {}", example.id()))?;
        info!(id = %report.id, status = %report.status, objective = ?report.objective, "done");
        report.model = lp;

        if text {
            write!(out, "{}", report.render_text())?;
            if chapters && chapter_ends {
                writeln!(
                    out,
                    "{}{}\n\n{}",
                    report::section(&format!("{chapter} summary")),
                    chapter.summary(),
                    chapter.completion()
                )?;
            }
        }
        reports.push(report);
    }

    if !text {
        writeln!(out, "{}", report::render_json(&reports)?)?;
    }
    Ok(())
}
