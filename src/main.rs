//! squin CLI: interview-driven book recommendations.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use chrono::Datelike;
use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use squin::catalog::{ListKind, categories};
use squin::config::Settings;
use squin::interview::{self, Answer, InterviewState, QuestionKind, QuestionId, QUESTIONS};
use squin::recommend::{RecommendRequest, Recommender};

#[derive(Parser)]
#[command(name = "squin", version, about = "Conversational book recommendation engine")]
struct Cli {
    /// Path to a squin.toml config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the fixed interview question sequence as JSON.
    Questions,

    /// Run the interview on stdin and write the session state as JSON.
    Interview {
        /// Output path for the session state.
        #[arg(long, default_value = "session.json")]
        out: PathBuf,
    },

    /// Recommend books from a saved interview session.
    Recommend {
        /// Session state written by `squin interview`.
        #[arg(long, default_value = "session.json")]
        session: PathBuf,

        /// Direct ISBN-13 lookup instead of a search.
        #[arg(long)]
        isbn: Option<String>,

        /// Browse a curated listing (e.g. "bestseller") instead of searching.
        #[arg(long)]
        list: Option<String>,

        /// Explicit category name (overrides the session's genres).
        #[arg(long)]
        category: Option<String>,

        /// Embedding backend for this run: "local" or "remote".
        #[arg(long)]
        provider: Option<String>,

        /// Number of results to return.
        #[arg(long, default_value = "5")]
        top_k: usize,

        /// Candidate pool size per catalog fetch.
        #[arg(long, default_value = "40")]
        max_results: u32,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut settings = Settings::load(cli.config.as_deref()).into_diagnostic()?;

    match cli.command {
        Commands::Questions => {
            let questions: Vec<serde_json::Value> = QUESTIONS
                .iter()
                .map(|q| {
                    let options: Vec<&str> = if q.id == QuestionId::Genre {
                        categories::genre_options()
                    } else {
                        q.options.to_vec()
                    };
                    serde_json::json!({
                        "id": q.id.as_wire(),
                        "kind": q.kind,
                        "prompt": q.prompt,
                        "options": options,
                    })
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&questions).into_diagnostic()?
            );
        }

        Commands::Interview { out } => {
            let state = run_interview()?;
            let json = serde_json::to_string_pretty(&state).into_diagnostic()?;
            std::fs::write(&out, json).into_diagnostic()?;
            println!("Session written to {}", out.display());
        }

        Commands::Recommend {
            session,
            isbn,
            list,
            category,
            provider,
            top_k,
            max_results,
        } => {
            let content = std::fs::read_to_string(&session).into_diagnostic()?;
            let state: InterviewState = serde_json::from_str(&content).into_diagnostic()?;

            if let Some(name) = provider {
                settings.embedding_provider = name.parse()?;
            }

            let list_kind = match list.as_deref() {
                Some(name) => Some(
                    ListKind::parse(name)
                        .ok_or_else(|| miette::miette!("unknown listing \"{name}\""))?,
                ),
                None => None,
            };

            let recommender = Recommender::from_settings(&settings)?;
            let request = RecommendRequest {
                narrative: state.narrative,
                constraints: state.constraints,
                isbn,
                list_kind,
                category,
                top_k,
                max_results,
                ..RecommendRequest::default()
            };
            let items = recommender.recommend(&request)?;

            if items.is_empty() {
                println!("No recommendations found.");
                return Ok(());
            }
            for (i, item) in items.iter().enumerate() {
                println!("{}. {} — {}", i + 1, item.title, item.author);
                println!(
                    "   {} | {} | {}",
                    item.category, item.pubdate, item.link
                );
                println!(
                    "   score {:.3} (semantic {:.3}, rule {:.2}, popularity {:.2})",
                    item.scores.total,
                    item.scores.semantic,
                    item.scores.rule,
                    item.scores.popularity
                );
            }
        }
    }

    Ok(())
}

/// Walk the fixed question sequence on stdin, folding each answer into the
/// session state.
fn run_interview() -> Result<InterviewState> {
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    let now_year = chrono::Utc::now().year();
    let mut state = InterviewState::default();

    for question in QUESTIONS {
        let options: Vec<&str> = if question.id == QuestionId::Genre {
            categories::genre_options()
        } else {
            question.options.to_vec()
        };

        println!();
        println!("{}", question.prompt);
        for (i, option) in options.iter().enumerate() {
            println!("  {}. {}", i + 1, option);
        }
        match question.kind {
            QuestionKind::FreeText => print!("> "),
            QuestionKind::SingleChoice => print!("choose one (number, empty to skip)> "),
            QuestionKind::MultiChoice => print!("choose any (comma-separated, empty to skip)> "),
        }
        std::io::stdout().flush().into_diagnostic()?;

        let line = match lines.next() {
            Some(line) => line.into_diagnostic()?,
            None => break,
        };
        let line = line.trim();

        let answer = match question.kind {
            QuestionKind::FreeText => Answer::text(line),
            QuestionKind::SingleChoice => match pick_one(line, &options) {
                Some(label) => Answer::choice(label),
                None => Answer::default(),
            },
            QuestionKind::MultiChoice => {
                let picked = pick_many(line, &options);
                if question.id == QuestionId::Genre {
                    Answer::genres(&picked)
                } else {
                    Answer::choices(&picked)
                }
            }
        };

        let outcome = interview::apply(&state, question.id, &answer, now_year);
        if !outcome.negatives.is_empty() {
            println!("  (제외: {})", outcome.negatives.join(", "));
        }
        state = outcome.state;
    }

    Ok(state)
}

fn pick_one<'a>(line: &str, options: &[&'a str]) -> Option<&'a str> {
    let index: usize = line.parse().ok()?;
    options.get(index.checked_sub(1)?).copied()
}

fn pick_many<'a>(line: &str, options: &[&'a str]) -> Vec<&'a str> {
    line.split(',')
        .filter_map(|part| {
            let index: usize = part.trim().parse().ok()?;
            options.get(index.checked_sub(1)?).copied()
        })
        .collect()
}
