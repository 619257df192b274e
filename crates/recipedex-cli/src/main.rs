mod commands;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use commands::{RootArgs, DEFAULT_CONFIG_FILE, EXIT_FAILURE};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "recipedex",
    version,
    about = "Validate recipe manifests and generate the recipedex index"
)]
struct Cli {
    /// Configuration file (defaults to ./recipedex.toml when present).
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output results as structured JSON.
    #[arg(long, default_value_t = false, global = true)]
    json: bool,

    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate every recipe and write the JSON index.
    Generate {
        #[command(flatten)]
        roots: RootArgs,
        /// Where to write the index.
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Validate every recipe without writing anything.
    Check {
        #[command(flatten)]
        roots: RootArgs,
    },
    /// Write the default configuration as TOML.
    InitConfig {
        /// Destination file.
        #[arg(default_value = DEFAULT_CONFIG_FILE)]
        path: PathBuf,
        /// Overwrite an existing file.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
    /// Generate shell completions for bash, zsh, fish, elvish, or powershell.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
    /// Generate man pages in the specified directory.
    ManPages {
        /// Output directory for man pages.
        #[arg(default_value = "man")]
        dir: PathBuf,
    },
}

fn main() -> ExitCode {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let msg = info.to_string();
        if msg.contains("Broken pipe")
            || msg.contains("broken pipe")
            || msg.contains("os error 32")
            || msg.contains("failed printing to stdout")
        {
            std::process::exit(0);
        }
        default_hook(info);
    }));

    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RECIPEDEX_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.clone().or_else(|| {
        let implicit = Path::new(DEFAULT_CONFIG_FILE);
        implicit.is_file().then(|| implicit.to_path_buf())
    });
    let json_output = cli.json;

    let result = match cli.command {
        Commands::Generate { roots, output } => {
            commands::resolve_config(config_path.as_deref(), &roots, output.as_deref())
                .and_then(|config| commands::generate::run(config, json_output))
        }
        Commands::Check { roots } => commands::resolve_config(config_path.as_deref(), &roots, None)
            .and_then(|config| commands::check::run(config, json_output)),
        Commands::InitConfig { path, force } => commands::init_config::run(&path, force, json_output),
        Commands::Completions { shell } => commands::completions::run::<Cli>(shell),
        Commands::ManPages { dir } => commands::man_pages::run::<Cli>(&dir),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
