use anyhow::Result;
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use log::LevelFilter;
use std::io;
use std::path::PathBuf;

mod commands;
mod config;

/// Pilot Light build script generator.
///
/// Reads a project description (pl_build.toml) and writes a shell script that
/// compiles and links every target with gcc, one configuration at a time.
///
/// EXAMPLES:
///     pl generate                     Write build.sh next to pl_build.toml
///     pl generate --shell sh          Generate a POSIX sh script
///     pl check                        Validate the project description
///     pl package --debug              Zip headers and binaries with debug symbols
///
/// ENVIRONMENT VARIABLES:
///     PL_BUILD_SHELL    Default shell dialect (bash or sh)
///     PL_BUILD_OUTPUT   Default output script path
///     PL_BUILD_OUT_DIR  Default build output directory for packaging
///     PL_BUILD_JSON     Set to 1, true, yes or on for JSON output by default
///     RUST_LOG          Log filter (overridden by --verbose)
#[derive(Parser)]
#[command(name = "pl")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a build script from the project description
    ///
    /// EXAMPLES:
    ///     pl generate                          Use pl_build.toml from this or a parent directory
    ///     pl generate --project demo.json      Use an explicit project file
    ///     pl generate --output ../build.sh     Write somewhere else
    #[command(visible_alias = "g")]
    Generate {
        /// Project file (defaults to the nearest pl_build.toml)
        #[arg(long, short = 'p')]
        project: Option<PathBuf>,
        /// Output script path
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
        /// Shell dialect: bash or sh
        #[arg(long, short = 's')]
        shell: Option<String>,
        /// Indentation of conditional blocks
        #[arg(long)]
        indent: Option<usize>,
        /// JSON output (default from PL_BUILD_JSON)
        #[arg(long)]
        json: bool,
    },

    /// Validate the project description without writing anything
    #[command(visible_alias = "c")]
    Check {
        /// Project file (defaults to the nearest pl_build.toml)
        #[arg(long, short = 'p')]
        project: Option<PathBuf>,
        /// JSON output (default from PL_BUILD_JSON)
        #[arg(long)]
        json: bool,
    },

    /// Package headers and binaries into a zip archive
    ///
    /// Binaries are moved out of the build output directory.
    ///
    /// EXAMPLES:
    ///     pl package                     Package ../out
    ///     pl package --out-dir build     Package another output directory
    ///     pl package --debug             Include debug symbols
    Package {
        /// Build output directory
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Project root holding the header directories (defaults to the parent of the output directory)
        #[arg(long)]
        root: Option<PathBuf>,
        /// Package manifest (TOML); defaults to the Pilot Light manifest
        #[arg(long, short = 'm')]
        manifest: Option<PathBuf>,
        /// Include debug symbols
        #[arg(long)]
        debug: bool,
        /// JSON output (default from PL_BUILD_JSON)
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    ///
    /// EXAMPLES:
    ///     pl completions bash > ~/.local/share/bash-completion/completions/pl
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_logging(verbose: u8) {
    let mut builder = pretty_env_logger::formatted_builder();
    match (verbose, std::env::var("RUST_LOG")) {
        (0, Ok(filters)) => {
            builder.parse_filters(&filters);
        }
        (0, Err(_)) => {
            builder.filter_level(LevelFilter::Warn);
        }
        (1, _) => {
            builder.filter_level(LevelFilter::Info);
        }
        _ => {
            builder.filter_level(LevelFilter::Debug);
        }
    }
    builder.init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let cli_config = config::Config::from_env();

    match cli.command {
        Commands::Generate {
            project,
            output,
            shell,
            indent,
            json,
        } => {
            commands::generate::run(commands::generate::GenerateArgs {
                project,
                output,
                shell,
                indent,
                json: json || cli_config.default_json,
            })?;
        }
        Commands::Check { project, json } => {
            commands::check::run(project.as_deref(), json || cli_config.default_json)?;
        }
        Commands::Package {
            out_dir,
            root,
            manifest,
            debug,
            json,
        } => {
            commands::package::run(commands::package::PackageArgs {
                out_dir,
                root,
                manifest,
                debug,
                json: json || cli_config.default_json,
            })?;
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut io::stdout());
        }
    }

    Ok(())
}
