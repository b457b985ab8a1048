//! accelctl - NeuroAccel curve CLI
//!
//! Calculate, inspect and export NeuroAccel sensitivity curves, manage the
//! persisted settings, and apply curves to external accel tools.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod commands;
mod completion;
mod error;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use neuroaccel_curves::CurveVariant;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::apply::ApplyArgs;
use crate::commands::{Context, SettingsCommands};

#[derive(Parser)]
#[command(name = "accelctl")]
#[command(about = "NeuroAccel CLI - Calculate, export and apply mouse sensitivity curves")]
#[command(version)]
#[command(long_about = "
accelctl is a command-line interface for the NeuroAccel curve engine.
It calculates sensitivity curves from the persisted settings or a settings
file, exports them as lookup tables and writes them where Raw Accel picks
them up.

Use --json flag for machine-readable output suitable for scripting.
")]
struct Cli {
    /// Output format (human-readable or JSON)
    #[arg(
        long,
        global = true,
        help = "Output in JSON format for machine parsing"
    )]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Settings document to use instead of the per-user one
    #[arg(long, global = true, env = "NEUROACCEL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the default settings of a curve variant
    Defaults {
        #[arg(long, default_value_t = CurveVariant::Segmented)]
        variant: CurveVariant,
    },

    /// Show parameter descriptors (labels, bounds, steps)
    Params {
        #[arg(long, default_value_t = CurveVariant::Segmented)]
        variant: CurveVariant,
    },

    /// Calculate and print the curve
    Curve {
        /// Settings document to read instead of the persisted settings
        #[arg(short, long)]
        settings: Option<PathBuf>,
        /// Split a three-segment curve at its boundaries
        #[arg(long)]
        segments: bool,
    },

    /// Export the curve as LUT text
    Export {
        /// Settings document to read instead of the persisted settings
        #[arg(short, long)]
        settings: Option<PathBuf>,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write the curve where an accel tool picks it up
    Apply {
        /// Directory of the accel tool's settings
        #[arg(long)]
        dest: PathBuf,
        /// Settings document to read instead of the persisted settings
        #[arg(short, long)]
        settings: Option<PathBuf>,
        /// Writer to use (raw_accel, lut_text)
        #[arg(long, default_value = "raw_accel")]
        writer: String,
        /// Profile name in the accel tool
        #[arg(long, default_value = "NeuroAccel")]
        profile: String,
        /// Base sensitivity multiplier
        #[arg(long, default_value_t = 1.0)]
        sensitivity: f64,
        /// Vertical to horizontal sensitivity ratio
        #[arg(long, default_value_t = 1.0)]
        y_x_ratio: f64,
        /// Show the changes without writing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Persisted settings commands
    #[command(subcommand)]
    Settings(SettingsCommands),

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "accelctl={0},neuroaccel_settings={0},neuroaccel_writers={0}",
                    log_level
                )
                .into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match execute_command(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                output::print_error_json(&e);
            } else {
                output::print_error_human(&e);
            }
            ExitCode::from(error::exit_code(&e))
        }
    }
}

fn execute_command(cli: &Cli) -> Result<()> {
    let ctx = Context {
        json: cli.json,
        config: cli.config.clone(),
    };

    match &cli.command {
        Commands::Defaults { variant } => commands::curve::defaults(*variant, &ctx),
        Commands::Params { variant } => commands::curve::params(*variant, &ctx),
        Commands::Curve { settings, segments } => {
            commands::curve::curve(settings.as_deref(), *segments, &ctx)
        }
        Commands::Export { settings, output } => {
            commands::curve::export(settings.as_deref(), output.as_deref(), &ctx)
        }
        Commands::Apply {
            dest,
            settings,
            writer,
            profile,
            sensitivity,
            y_x_ratio,
            dry_run,
        } => commands::apply::execute(
            &ApplyArgs {
                dest,
                settings_file: settings.as_deref(),
                writer,
                profile,
                sensitivity: *sensitivity,
                y_x_ratio: *y_x_ratio,
                dry_run: *dry_run,
            },
            &ctx,
        ),
        Commands::Settings(cmd) => commands::settings::execute(cmd, &ctx),
        Commands::Completion { shell } => {
            completion::generate_completion(*shell);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    // --- Global flag parsing ---

    #[test]
    fn parse_defaults_with_defaults() -> TestResult {
        let cli = Cli::try_parse_from(["accelctl", "defaults"])?;
        assert!(!cli.json);
        assert_eq!(cli.verbose, 0);
        assert!(matches!(
            cli.command,
            Commands::Defaults {
                variant: CurveVariant::Segmented
            }
        ));
        Ok(())
    }

    #[test]
    fn parse_global_json_flag_before_and_after_subcommand() -> TestResult {
        let before = Cli::try_parse_from(["accelctl", "--json", "params"])?;
        assert!(before.json);
        let after = Cli::try_parse_from(["accelctl", "params", "--json"])?;
        assert!(after.json);
        Ok(())
    }

    #[test]
    fn parse_verbose_levels() -> TestResult {
        for (args, expected) in [
            (vec!["accelctl", "defaults"], 0),
            (vec!["accelctl", "-v", "defaults"], 1),
            (vec!["accelctl", "-vv", "defaults"], 2),
            (vec!["accelctl", "-vvv", "defaults"], 3),
        ] {
            let cli = Cli::try_parse_from(args)?;
            assert_eq!(cli.verbose, expected);
        }
        Ok(())
    }

    #[test]
    fn parse_config_flag() -> TestResult {
        let cli = Cli::try_parse_from(["accelctl", "--config", "/tmp/s.json", "settings", "show"])?;
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/s.json")));
        assert!(matches!(cli.command, Commands::Settings(SettingsCommands::Show)));
        Ok(())
    }

    // --- Curve commands ---

    #[test]
    fn parse_variant_names() -> TestResult {
        for (arg, expected) in [
            ("single", CurveVariant::Single),
            ("segmented", CurveVariant::Segmented),
            ("three_segment", CurveVariant::Segmented),
        ] {
            let cli = Cli::try_parse_from(["accelctl", "params", "--variant", arg])?;
            match cli.command {
                Commands::Params { variant } => assert_eq!(variant, expected),
                _ => return Err("expected Params command".into()),
            }
        }
        Ok(())
    }

    #[test]
    fn parse_curve_segments() -> TestResult {
        let cli = Cli::try_parse_from(["accelctl", "curve", "--settings", "a.json", "--segments"])?;
        match &cli.command {
            Commands::Curve { settings, segments } => {
                assert_eq!(settings.as_deref(), Some(std::path::Path::new("a.json")));
                assert!(*segments);
            }
            _ => return Err("expected Curve command".into()),
        }
        Ok(())
    }

    #[test]
    fn parse_export_output() -> TestResult {
        let cli = Cli::try_parse_from(["accelctl", "export", "-o", "lut.txt"])?;
        match &cli.command {
            Commands::Export { settings, output } => {
                assert!(settings.is_none());
                assert_eq!(output.as_deref(), Some(std::path::Path::new("lut.txt")));
            }
            _ => return Err("expected Export command".into()),
        }
        Ok(())
    }

    #[test]
    fn parse_apply_defaults() -> TestResult {
        let cli = Cli::try_parse_from(["accelctl", "apply", "--dest", "/opt/rawaccel"])?;
        match &cli.command {
            Commands::Apply {
                dest,
                writer,
                profile,
                sensitivity,
                y_x_ratio,
                dry_run,
                ..
            } => {
                assert_eq!(dest, &PathBuf::from("/opt/rawaccel"));
                assert_eq!(writer, "raw_accel");
                assert_eq!(profile, "NeuroAccel");
                assert!((sensitivity - 1.0).abs() < f64::EPSILON);
                assert!((y_x_ratio - 1.0).abs() < f64::EPSILON);
                assert!(!dry_run);
            }
            _ => return Err("expected Apply command".into()),
        }
        Ok(())
    }

    #[test]
    fn parse_apply_options() -> TestResult {
        let cli = Cli::try_parse_from([
            "accelctl",
            "apply",
            "--dest",
            "out",
            "--writer",
            "lut_text",
            "--profile",
            "Aim",
            "--sensitivity",
            "0.8",
            "--y-x-ratio",
            "1.2",
            "--dry-run",
        ])?;
        match &cli.command {
            Commands::Apply {
                writer,
                profile,
                sensitivity,
                y_x_ratio,
                dry_run,
                ..
            } => {
                assert_eq!(writer, "lut_text");
                assert_eq!(profile, "Aim");
                assert!((sensitivity - 0.8).abs() < f64::EPSILON);
                assert!((y_x_ratio - 1.2).abs() < f64::EPSILON);
                assert!(*dry_run);
            }
            _ => return Err("expected Apply command".into()),
        }
        Ok(())
    }

    // --- Settings commands ---

    #[test]
    fn parse_settings_set() -> TestResult {
        let cli = Cli::try_parse_from(["accelctl", "settings", "set", "micro_range", "24"])?;
        match &cli.command {
            Commands::Settings(SettingsCommands::Set { key, value }) => {
                assert_eq!(key, "micro_range");
                assert_eq!(value, "24");
            }
            _ => return Err("expected Settings Set command".into()),
        }
        Ok(())
    }

    #[test]
    fn parse_settings_reset_variant() -> TestResult {
        let cli = Cli::try_parse_from(["accelctl", "settings", "reset", "--variant", "single"])?;
        assert!(matches!(
            cli.command,
            Commands::Settings(SettingsCommands::Reset {
                variant: CurveVariant::Single
            })
        ));
        Ok(())
    }

    #[test]
    fn parse_completion_bash() -> TestResult {
        let cli = Cli::try_parse_from(["accelctl", "completion", "bash"])?;
        assert!(matches!(cli.command, Commands::Completion { .. }));
        Ok(())
    }

    // --- Rejection / error cases ---

    #[test]
    fn reject_no_subcommand() {
        assert!(Cli::try_parse_from(["accelctl"]).is_err());
    }

    #[test]
    fn reject_unknown_variant() {
        assert!(Cli::try_parse_from(["accelctl", "defaults", "--variant", "bezier"]).is_err());
    }

    #[test]
    fn reject_apply_without_dest() {
        assert!(Cli::try_parse_from(["accelctl", "apply"]).is_err());
    }

    #[test]
    fn reject_non_numeric_sensitivity() {
        let result =
            Cli::try_parse_from(["accelctl", "apply", "--dest", "d", "--sensitivity", "fast"]);
        assert!(result.is_err());
    }

    #[test]
    fn reject_settings_set_missing_value() {
        assert!(Cli::try_parse_from(["accelctl", "settings", "set", "dpi"]).is_err());
    }
}
