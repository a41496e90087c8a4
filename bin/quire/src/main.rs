//! Quire CLI
//!
//! Publishes a site described by a configuration file and a content manifest.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use clap::Parser;
use color_eyre::eyre::Result;

/// Command-line interface for Quire.
#[derive(Parser)]
#[command(name = "quire", version, about = "A concurrent static HTML publisher")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "quire.toml")]
    config: std::path::PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Publish the site to the output directory
    Build {
        /// Output directory, overriding build.output_dir
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,
    },
    /// List the files a build would write without writing them
    Plan {
        /// Output directory, overriding build.output_dir
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    quire::init_tracing(cli.verbose);

    match cli.command {
        Commands::Build { output } => {
            quire::cmd::build::run(&cli.config, output.as_deref())?;
        }
        Commands::Plan { output } => {
            quire::cmd::plan::run(&cli.config, output.as_deref())?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_cli_build_command_parsing() {
        let args = ["quire", "build", "--output", "dist"];
        let cli = Cli::parse_from(args);

        assert_eq!(cli.config, std::path::PathBuf::from("quire.toml"));
        assert_eq!(cli.verbose, 0);

        match cli.command {
            Commands::Build { output } => {
                assert_eq!(output, Some(std::path::PathBuf::from("dist")));
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_build_default_output() {
        let cli = Cli::parse_from(["quire", "build"]);

        match cli.command {
            Commands::Build { output } => assert!(output.is_none()),
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_plan_command_parsing() {
        let cli = Cli::parse_from(["quire", "plan"]);
        assert!(matches!(cli.command, Commands::Plan { output: None }));
    }

    #[test]
    fn test_cli_verbosity_flags() {
        let args = ["quire", "-vvv", "build"];
        let cli = Cli::parse_from(args);
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn test_cli_custom_config_path() {
        let args = ["quire", "--config", "site.toml", "plan"];
        let cli = Cli::parse_from(args);
        assert_eq!(cli.config, std::path::PathBuf::from("site.toml"));
    }
}
