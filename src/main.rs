use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use owo_colors::OwoColorize;
use paper_assistant::assistant::{self, ResearchAssistant};
use paper_assistant::config::{
    default_config_path, find_config_file, load_config, Config, ConfigFile, LoggingConfig,
    LOCAL_CONFIG_FILE,
};
use paper_assistant::mcp::McpServer;
use paper_assistant::models::PaperRecord;
use paper_assistant::ui::{self, Status};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Topic used when none is given
const DEFAULT_TOPIC: &str = "machine learning and healthcare";

/// Paper Assistant - Fetch arXiv papers, summarize them and ask questions about them
#[derive(Parser, Debug)]
#[command(name = "paper-assistant")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Fetch arXiv papers, summarize them and ask questions about them", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Request timeout in seconds (overrides the configuration file)
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Use local stand-in models instead of the hosted inference API
    #[arg(long, global = true)]
    offline: bool,

    /// Show all environment variables
    #[arg(long)]
    env: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Detailed text on a terminal, JSON otherwise
    Auto,
    /// Table format (paper lists only)
    Table,
    /// JSON format (machine-readable)
    Json,
    /// Detailed text format
    Plain,
}

impl OutputFormat {
    fn resolve(self) -> OutputFormat {
        match self {
            OutputFormat::Auto if std::io::stdout().is_terminal() => OutputFormat::Plain,
            OutputFormat::Auto => OutputFormat::Json,
            other => other,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch papers on a topic and show them
    #[command(alias = "f")]
    Fetch {
        /// Research topic
        #[arg(default_value = DEFAULT_TOPIC)]
        topic: String,

        /// Number of papers to fetch (1-10)
        #[arg(long, short = 'n', value_parser = clap::value_parser!(u64).range(1..=10))]
        max_papers: Option<u64>,

        /// Also show a model summary of each paper
        #[arg(long, short)]
        summarize: bool,
    },

    /// Ask a question about the first paper fetched for a topic
    #[command(alias = "a")]
    Ask {
        /// Question about the first paper's summary
        question: String,

        /// Research topic
        #[arg(long, short, default_value = DEFAULT_TOPIC)]
        topic: String,

        /// Number of papers to fetch (1-10)
        #[arg(long, short = 'n', value_parser = clap::value_parser!(u64).range(1..=10))]
        max_papers: Option<u64>,
    },

    /// Group fetched summaries into contributions, methodologies and conclusions
    #[command(alias = "x")]
    Extract {
        /// Research topic
        #[arg(default_value = DEFAULT_TOPIC)]
        topic: String,

        /// Number of papers to fetch (1-10)
        #[arg(long, short = 'n', value_parser = clap::value_parser!(u64).range(1..=10))]
        max_papers: Option<u64>,
    },

    /// Summarize free text ("-" reads standard input)
    Summarize {
        /// Text to summarize
        text: String,
    },

    /// Run the MCP server
    Serve {
        /// Run in stdio mode (for MCP clients)
        #[arg(long, default_value_t = true)]
        stdio: bool,

        /// Run in HTTP/SSE mode (overrides --stdio)
        #[arg(long)]
        http: bool,

        /// Port for HTTP mode
        #[arg(long, short, default_value_t = 3000)]
        port: u16,

        /// Host to bind to for HTTP mode
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Print the configuration file in use
    Path,

    /// Write a default configuration file
    Init {
        /// Where to write (default: per-user config directory)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long, short)]
        force: bool,
    },
}

/// Print all available environment variables
fn print_env_vars() {
    println!("Paper Assistant - Environment Variables");
    println!();
    println!("API Keys:");
    println!("  HF_TOKEN                                   Hugging Face API token for hosted models");
    println!();
    println!("Configuration overrides (nested keys use a double underscore):");
    println!("  PAPER_ASSISTANT_ARXIV__BASE_URL             arXiv query endpoint");
    println!("  PAPER_ASSISTANT_ARXIV__DEFAULT_MAX_RESULTS  Papers fetched by default (default: 5)");
    println!("  PAPER_ASSISTANT_INFERENCE__BASE_URL         Inference API endpoint");
    println!("  PAPER_ASSISTANT_INFERENCE__TOKEN            Inference API token");
    println!("  PAPER_ASSISTANT_INFERENCE__SUMMARIZER_MODEL Summarization model (default: facebook/bart-large-cnn)");
    println!("  PAPER_ASSISTANT_INFERENCE__QA_MODEL         QA model (default: deepset/bert-base-cased-squad2)");
    println!("  PAPER_ASSISTANT_HTTP__TIMEOUT_SECS          Request timeout (default: 30)");
    println!("  PAPER_ASSISTANT_LOGGING__LEVEL              Log level (default: info)");
    println!("  PAPER_ASSISTANT_LOGGING__FORMAT             \"json\" for JSON log lines");
    println!();
    println!("Other Settings:");
    println!("  RUST_LOG                                   Rust logging filter (overrides -v/-q)");
}

fn init_tracing(verbose: u8, quiet: bool, logging: &LoggingConfig) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => logging.level.clone(),
            1 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("paper_assistant={}", level)));

    let registry = tracing_subscriber::registry().with(filter);
    if logging.is_json() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn resolve_config(cli: &Cli) -> Result<(Config, Option<PathBuf>)> {
    let path = cli.config.clone().or_else(find_config_file);
    let mut config = load_config(path.as_deref()).with_context(|| match &path {
        Some(p) => format!("Failed to load configuration from {}", p.display()),
        None => "Failed to load configuration".to_string(),
    })?;

    if let Some(timeout) = cli.timeout {
        config.http.timeout_secs = timeout;
    }
    Ok((config, path))
}

fn max_papers(requested: Option<u64>, config: &Config) -> usize {
    requested
        .map(|n| n as usize)
        .unwrap_or(config.arxiv.default_max_results)
        .max(1)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.env {
        print_env_vars();
        return Ok(());
    }

    let (config, config_path) = resolve_config(&cli)?;
    init_tracing(cli.verbose, cli.quiet, &config.logging);
    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }

    let Some(command) = cli.command else {
        println!("No command provided. Use --help for usage information.");
        println!("Common commands:");
        println!("  fetch [topic]       - Fetch and show papers");
        println!("  ask <question>      - Ask about the first fetched paper");
        println!("  extract [topic]     - Group summaries by keyword");
        println!("  serve               - Run MCP server");
        return Ok(());
    };

    if let Commands::Config { command } = &command {
        return run_config_command(command, config, config_path);
    }

    let assistant = if cli.offline {
        ResearchAssistant::offline(&config)?
    } else {
        ResearchAssistant::from_config(&config)?
    };
    let assistant = assistant::init(assistant)?;
    let format = cli.output.resolve();

    match command {
        Commands::Fetch {
            topic,
            max_papers: requested,
            summarize,
        } => {
            let n = max_papers(requested, &config);
            let papers = fetch(&assistant, &topic, n, cli.quiet).await?;

            let mut summaries = Vec::new();
            if summarize {
                for paper in &papers {
                    let spin = ui::spinner(&format!("Summarizing \"{}\"", paper.title.trim()), cli.quiet);
                    let summary = assistant.summarize_paper(&paper.summary).await;
                    ui::finish_spinner(spin);
                    summaries.push(summary?);
                }
            }

            match format {
                OutputFormat::Json => {
                    let value = if summarize {
                        serde_json::json!({ "papers": papers, "summaries": summaries })
                    } else {
                        serde_json::to_value(&papers)?
                    };
                    println!("{}", serde_json::to_string_pretty(&value)?);
                }
                OutputFormat::Table => println!("{}", ui::papers_table(&papers)),
                _ => {
                    for (idx, paper) in papers.iter().enumerate() {
                        ui::print_paper(idx, paper);
                        if let Some(summary) = summaries.get(idx) {
                            ui::print_full_summary(summary);
                        }
                    }
                }
            }
        }

        Commands::Ask {
            question,
            topic,
            max_papers: requested,
        } => {
            if question.trim().is_empty() {
                ui::print_status(Status::Warning, "Please enter a question.");
                return Ok(());
            }

            let n = max_papers(requested, &config);
            let papers = fetch(&assistant, &topic, n, cli.quiet).await?;
            let Some(first) = papers.first() else {
                anyhow::bail!("No papers found for \"{}\"", topic);
            };

            let spin = ui::spinner("Looking for the answer", cli.quiet);
            let span = assistant
                .answer_question_with_span(&question, &first.summary)
                .await;
            ui::finish_spinner(spin);
            let span = span?;

            if format == OutputFormat::Json {
                let value = serde_json::json!({ "paper": first, "answer": span });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                if !cli.quiet {
                    println!("{} {}", "About:".dimmed(), first.title.trim());
                }
                ui::print_answer(&span);
            }
        }

        Commands::Extract {
            topic,
            max_papers: requested,
        } => {
            let n = max_papers(requested, &config);
            let papers = fetch(&assistant, &topic, n, cli.quiet).await?;
            let result = assistant.extract_key_information(&papers);

            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                ui::print_classification(&result);
            }
        }

        Commands::Summarize { text } => {
            let text = if text == "-" {
                std::io::read_to_string(std::io::stdin()).context("Failed to read standard input")?
            } else {
                text
            };

            let spin = ui::spinner("Summarizing", cli.quiet);
            let summary = assistant.summarize_paper(&text).await;
            ui::finish_spinner(spin);
            let summary = summary?;

            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "summary": summary }))?);
            } else {
                println!("{}", summary);
            }
        }

        Commands::Serve {
            stdio,
            http,
            port,
            host,
        } => {
            let server = McpServer::new(Arc::clone(&assistant))?;

            // Use HTTP mode if --http flag is provided, otherwise use --stdio flag
            if http || !stdio {
                let addr = format!("{}:{}", host, port);
                let (bound_addr, handle) = server.run_http(&addr).await?;
                tracing::info!("MCP server listening on {}", bound_addr);

                handle
                    .await
                    .map_err(|e| anyhow::anyhow!("Server task failed: {}", e))?;
            } else {
                server.run().await?;
            }
        }

        Commands::Config { .. } => unreachable!("handled before the assistant is built"),
    }

    Ok(())
}

async fn fetch(
    assistant: &ResearchAssistant,
    topic: &str,
    n: usize,
    quiet: bool,
) -> Result<Vec<PaperRecord>> {
    if !quiet {
        ui::print_status(
            Status::Search,
            &format!("Fetching {} papers on the topic: {}", n, topic.bold()),
        );
    }

    let spin = ui::spinner("Querying arXiv", quiet);
    let papers = assistant.fetch_papers_strict(topic, n).await;
    ui::finish_spinner(spin);

    let papers = papers.context("Fetching papers failed")?;
    if papers.is_empty() && !quiet {
        ui::print_status(Status::Warning, "No papers found.");
    }
    Ok(papers)
}

fn run_config_command(
    command: &ConfigCommands,
    config: Config,
    config_path: Option<PathBuf>,
) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            print!("{}", ConfigFile::from(config).to_redacted_toml()?);
        }
        ConfigCommands::Path => match config_path {
            Some(path) => println!("{}", path.display()),
            None => {
                println!("No configuration file found. Looked for:");
                println!("  ./{}", LOCAL_CONFIG_FILE);
                if let Some(path) = default_config_path() {
                    println!("  {}", path.display());
                }
            }
        },
        ConfigCommands::Init { path, force } => {
            let path = path
                .clone()
                .or_else(default_config_path)
                .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE));

            if path.exists() && !force {
                anyhow::bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }

            ConfigFile::create_default().save(&path)?;
            ui::print_status(
                Status::Success,
                &format!("Wrote default configuration to {}", path.display()),
            );
        }
    }
    Ok(())
}
