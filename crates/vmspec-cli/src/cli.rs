//! Command-line interface argument parsing and definitions

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use vmspec_core::{Arch, ValidationMode};

/// vmspec - validate and normalize virtual-machine instance specifications
#[derive(Parser, Debug)]
#[command(
    name = "vmspec",
    version,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "VMSPEC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check a specification and report every violation
    Validate(SpecArgs),

    /// Print the fully normalized specification
    Normalize(NormalizeArgs),
}

/// Arguments shared by every command that reads a spec
#[derive(Parser, Debug)]
pub struct SpecArgs {
    /// Path to the instance specification (YAML or JSON)
    #[arg(value_name = "SPEC")]
    pub spec: PathBuf,

    /// Also require ssh.localPort to be set
    #[arg(long)]
    pub strict: bool,

    /// Guest architecture to assume when the spec leaves it unset
    /// (defaults to the host architecture)
    #[arg(long, value_parser = parse_arch)]
    pub arch: Option<Arch>,
}

impl SpecArgs {
    /// Strict on the command line wins over the config file
    pub fn validation_mode(&self, configured: ValidationMode) -> ValidationMode {
        if self.strict {
            ValidationMode::Strict
        } else {
            configured
        }
    }
}

#[derive(Parser, Debug)]
pub struct NormalizeArgs {
    #[command(flatten)]
    pub spec: SpecArgs,

    /// Output file path (stdout if not specified)
    #[arg(long = "save-to")]
    pub output_file: Option<PathBuf>,
}

/// Output format options
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Human,
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
    /// YAML
    Yaml,
}

fn parse_arch(s: &str) -> Result<Arch, String> {
    s.parse::<Arch>().map_err(|e| e.to_string())
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn use_color(&self) -> bool {
        !self.no_color && std::env::var("NO_COLOR").is_err()
    }

    /// Effective verbosity, zero when quiet
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_args() {
        let cli = Cli::parse_from([
            "vmspec", "-vv", "validate", "lima.yaml", "--strict", "--arch", "arm64",
        ]);
        assert_eq!(cli.verbosity_level(), 2);
        match cli.command {
            Commands::Validate(args) => {
                assert_eq!(args.spec, PathBuf::from("lima.yaml"));
                assert!(args.strict);
                assert_eq!(args.arch, Some(Arch::Aarch64));
                assert_eq!(args.validation_mode(ValidationMode::Standard), ValidationMode::Strict);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_normalize_args() {
        let cli = Cli::parse_from([
            "vmspec", "-o", "yaml", "normalize", "lima.yaml", "--save-to", "out.yaml",
        ]);
        assert_eq!(cli.output, Some(OutputFormat::Yaml));
        match cli.command {
            Commands::Normalize(args) => {
                assert_eq!(args.output_file, Some(PathBuf::from("out.yaml")));
                assert!(!args.spec.strict);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_quiet_zeroes_verbosity() {
        let cli = Cli::parse_from(["vmspec", "--quiet", "validate", "lima.yaml"]);
        assert_eq!(cli.verbosity_level(), 0);
    }

    #[test]
    fn test_bad_arch_rejected() {
        let result = Cli::try_parse_from(["vmspec", "validate", "lima.yaml", "--arch", "mips"]);
        assert!(result.is_err());
    }
}
