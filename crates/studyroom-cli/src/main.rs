use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use studyroom_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "studyroom", version, about = "Studyroom study planner CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Subject management
    Subjects {
        #[command(subcommand)]
        action: commands::subjects::SubjectsAction,
    },
    /// Dashboard figures and the weekly chart
    Progress {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Today's suggested study plan
    Plan {
        /// Wall-clock time to evaluate slots against (HH:MM, default now)
        #[arg(long)]
        at: Option<String>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Study assistant: summaries, mind maps, resources
    Assist {
        #[command(subcommand)]
        action: commands::assist::AssistAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Interactive study session with a live timer
    Session {
        /// Milliseconds per timer second
        #[arg(long, default_value_t = 1000)]
        tick_ms: u64,
    },
    /// Timer engine tools
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Print a shell completion script
    Completions {
        shell: Shell,
    },
}

/// `RUST_LOG` wins; otherwise the configured level. Logs go to stderr so
/// JSON on stdout stays clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = Config::load()
            .map(|c| c.log.level)
            .unwrap_or_else(|_| "warn".to_string());
        EnvFilter::new(level)
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "studyroom", &mut std::io::stdout());
        return;
    }
    init_tracing();

    let result = match cli.command {
        Commands::Subjects { action } => commands::subjects::run(action),
        Commands::Progress { json } => commands::progress::run(json),
        Commands::Plan { at, json } => commands::plan::run(at.as_deref(), json),
        Commands::Assist { action } => commands::assist::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Session { tick_ms } => commands::session::run(tick_ms),
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Completions { .. } => Ok(()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
