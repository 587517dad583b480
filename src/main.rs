use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use cotiza::cli::theme::ThemeAction;
use cotiza::core::BASE_CURRENCY;
use cotiza::core::log::init_logging;
use cotiza::preferences::Theme;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
    Toggle,
}

impl From<ThemeArg> for ThemeAction {
    fn from(arg: ThemeArg) -> ThemeAction {
        match arg {
            ThemeArg::Light => ThemeAction::Set(Theme::Light),
            ThemeArg::Dark => ThemeAction::Set(Theme::Dark),
            ThemeArg::Toggle => ThemeAction::Toggle,
        }
    }
}

impl From<Commands> for cotiza::AppCommand {
    fn from(cmd: Commands) -> cotiza::AppCommand {
        match cmd {
            Commands::Serve { bind } => cotiza::AppCommand::Serve { bind },
            Commands::Rates { from } => cotiza::AppCommand::Rates { from },
            Commands::Convert { amount, from } => cotiza::AppCommand::Convert { amount, from },
            Commands::Theme { mode } => cotiza::AppCommand::Theme {
                action: mode.map(ThemeAction::from),
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Run the rate gateway HTTP server
    Serve {
        /// Address to listen on, e.g. 0.0.0.0:3000
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Show current rates against a currency
    Rates {
        /// Currency the rates are expressed against
        #[arg(short, long, default_value = BASE_CURRENCY)]
        from: String,
    },
    /// Convert an amount into every other currency
    Convert {
        /// Amount to convert, e.g. 150.5
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Currency the amount is in
        #[arg(short, long, default_value = BASE_CURRENCY)]
        from: String,
    },
    /// Show or change the display theme
    Theme {
        #[arg(value_enum)]
        mode: Option<ThemeArg>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let serving = matches!(cli.command, Some(Commands::Serve { .. }));
    init_logging(cli.verbose, serving);

    let result = match cli.command {
        Some(Commands::Setup) => cotiza::cli::setup::setup(),
        Some(cmd) => cotiza::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
