use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};

use codemaster::app::App;
use codemaster::config::Config;
use codemaster::courses::{self, DEFAULT_COURSE};
use codemaster::format;
use codemaster::gateway::Gateway;
use codemaster::image::ImageUpload;
use codemaster::{handler, logging, tui, ui};

#[derive(Parser)]
#[command(name = "codemaster")]
#[command(version, about = "Coding course companion with Gemini-powered explain, refactor, chat and research")]
struct Cli {
    /// Log verbosity (written to the log file, never the terminal)
    #[arg(long, default_value = "info", env = "CODEMASTER_LOG")]
    log_level: Level,

    /// Course to open (defaults to the last one used)
    #[arg(long)]
    course: Option<String>,

    /// Print one-shot results as HTML fragments
    #[arg(long)]
    html: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive terminal UI (default)
    Tui,
    /// Ask the coding assistant a single question
    Ask {
        prompt: String,
    },
    /// Analyze an image (PNG, JPEG or WEBP, up to 4MB)
    Image {
        path: PathBuf,
        prompt: String,
    },
    /// Research a question with web search grounding
    Search {
        prompt: String,
    },
    /// Deep dive into a complex question with the pro model
    Deep {
        prompt: String,
    },
    /// Explain a file, or the course sample when no file is given
    Explain {
        file: Option<PathBuf>,
    },
    /// Refactor a file, or the course sample when no file is given
    Refactor {
        file: Option<PathBuf>,
    },
    /// List available courses
    Courses,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(err) = logging::init(cli.log_level) {
        eprintln!("Warning: logging disabled: {:#}", err);
    }

    let config = Config::load().context("could not load config")?;

    let command = cli.command.unwrap_or(Commands::Tui);
    if let Commands::Courses = command {
        list_courses();
        return Ok(());
    }

    let settings = config.gateway_settings()?;
    let gateway = Gateway::new(&settings)?;
    info!(fast = %settings.fast_model, pro = %settings.pro_model, "gateway ready");

    let course = cli
        .course
        .or(config.last_course.clone())
        .unwrap_or_else(|| DEFAULT_COURSE.to_string());

    match command {
        Commands::Tui => run_tui(gateway, &course).await,
        Commands::Ask { prompt } => {
            let reply = gateway.chat(&[], &prompt).await?;
            print_text(&reply, cli.html);
            Ok(())
        }
        Commands::Image { path, prompt } => {
            let upload = ImageUpload::load(&path)?;
            let reply = gateway.analyze_image(&prompt, &upload).await?;
            print_text(&reply, cli.html);
            Ok(())
        }
        Commands::Search { prompt } => {
            let result = gateway.grounded_search(&prompt).await?;
            print_text(&result.text, cli.html);

            let citations = result.citations();
            if !citations.is_empty() {
                println!("\nSources:");
                for citation in citations {
                    println!("  - {} <{}>", citation.label, citation.uri);
                }
            }
            Ok(())
        }
        Commands::Deep { prompt } => {
            let reply = gateway.complex_query(&prompt).await?;
            print_text(&reply, cli.html);
            Ok(())
        }
        Commands::Explain { file } => {
            let code = code_source(file.as_deref(), &course)?;
            let reply = gateway.explain_code(&code).await?;
            print_text(&reply, cli.html);
            Ok(())
        }
        Commands::Refactor { file } => {
            let code = code_source(file.as_deref(), &course)?;
            let reply = gateway.refactor_code(&code).await?;
            print_text(&reply, cli.html);
            Ok(())
        }
        Commands::Courses => Ok(()),
    }
}

async fn run_tui(gateway: Gateway, course: &str) -> Result<()> {
    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();
    let mut app = App::new(gateway, course).with_course_persistence();

    info!(course = app.editor.course(), "tui started");

    let result = async {
        while !app.should_quit {
            terminal.draw(|frame| ui::render(&mut app, frame))?;

            match events.next().await {
                Some(event) => handler::handle_event(&mut app, event).await?,
                None => break,
            }
        }
        Ok::<(), anyhow::Error>(())
    }
    .await;

    tui::restore()?;
    result
}

fn list_courses() {
    for course in courses::all() {
        let lines = course.sample.trim().lines().count();
        println!("{:<24} {} lines", course.name, lines);
    }
}

/// Read code from a file, or fall back to the course sample
fn code_source(file: Option<&Path>, course: &str) -> Result<String> {
    match file {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("could not read {}", path.display()))
        }
        None => {
            let Some(course) = courses::find(course) else {
                bail!("unknown course: {}", course);
            };
            Ok(course.sample.to_string())
        }
    }
}

fn print_text(text: &str, html: bool) {
    if html {
        println!("{}", format::to_html(text));
    } else {
        println!("{}", text);
    }
}
