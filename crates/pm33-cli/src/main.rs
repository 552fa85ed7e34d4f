mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{
    config::ConfigSubcommand, engagement::RecordSubcommand, insights::Situation,
    onboarding::OnboardingSubcommand, palette::PaletteSubcommand,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "pm33",
    about = "PM33 workflow state: persona, onboarding and engagement tracking",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .pm33/ or .git/)
    #[arg(long, global = true, env = "PM33_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize PM33 state storage in the current project
    Init,

    /// Show the rehydrated workflow state
    State,

    /// Choose a persona; routes onboarding to the persona's first stage
    Persona { persona: String },

    /// Inspect or move onboarding progress
    Onboarding {
        #[command(subcommand)]
        subcommand: OnboardingSubcommand,
    },

    /// Record engagement events
    Record {
        #[command(subcommand)]
        subcommand: RecordSubcommand,
    },

    /// Recompute the daily engagement streak
    Streak,

    /// Collapse or expand the sidebar
    Sidebar,

    /// Command palette state
    Palette {
        #[command(subcommand)]
        subcommand: PaletteSubcommand,
    },

    /// Contextual next-step suggestions
    Suggest {
        #[command(flatten)]
        situation: Situation,
    },

    /// Quick actions relevant to the current situation
    Actions {
        #[command(flatten)]
        situation: Situation,
    },

    /// Whether the UI should escalate to firefighting mode
    Firefighting {
        #[command(flatten)]
        situation: Situation,
    },

    /// Return every field to its default
    Reset,

    /// Inspect and validate configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Drive a live session from stdin, with keyboard shortcuts attached
    Session {
        /// Open navigations in the default browser
        #[arg(long)]
        open: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    tracing::debug!(root = %root.display(), "resolved root");

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::State => cmd::state::run(&root, cli.json),
        Commands::Persona { persona } => cmd::onboarding::set_persona(&root, &persona, cli.json),
        Commands::Onboarding { subcommand } => cmd::onboarding::run(&root, subcommand, cli.json),
        Commands::Record { subcommand } => cmd::engagement::record(&root, subcommand, cli.json),
        Commands::Streak => cmd::engagement::streak(&root, cli.json),
        Commands::Sidebar => cmd::palette::toggle_sidebar(&root, cli.json),
        Commands::Palette { subcommand } => cmd::palette::run(&root, subcommand, cli.json),
        Commands::Suggest { situation } => cmd::insights::suggest(&root, &situation, cli.json),
        Commands::Actions { situation } => cmd::insights::actions(&root, &situation, cli.json),
        Commands::Firefighting { situation } => {
            cmd::insights::firefighting(&root, &situation, cli.json)
        }
        Commands::Reset => cmd::state::reset(&root),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
        Commands::Session { open } => cmd::session::run(&root, open),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
