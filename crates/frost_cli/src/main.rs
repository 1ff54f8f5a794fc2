//! Frost CLI: load iCE40 chip databases and decode, re-encode or inspect
//! ASCII bitstreams against them.
//!
//! `frost check` loads a chipdb and prints its size, `frost roundtrip`
//! decodes a bitstream and writes it back out, and `frost dump` prints the
//! decoded configuration as JSON.

#![warn(missing_docs)]

mod check;
mod dump;
mod pipeline;
mod roundtrip;

#[cfg(test)]
mod fixtures;

use std::io::IsTerminal;
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Frost: an iCE40 device-configuration codec.
#[derive(Parser, Debug)]
#[command(name = "frost", version, about = "iCE40 chipdb and ASCII bitstream codec")]
pub struct Cli {
    /// Flags shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalFlags,

    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

/// Flags accepted before or after any subcommand.
#[derive(Args, Debug)]
pub struct GlobalFlags {
    /// Only print errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// When to color diagnostics.
    #[arg(long, global = true, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// Path to a `frost.toml` file or the directory holding one.
    #[arg(long, global = true)]
    pub config: Option<String>,
}

impl GlobalFlags {
    /// Settles the color mode against the terminal.
    pub fn resolve(self) -> GlobalArgs {
        GlobalArgs {
            quiet: self.quiet,
            color: self.color.enabled(),
            config: self.config,
        }
    }
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load a chipdb and report its size.
    Check(CheckArgs),
    /// Decode a bitstream and encode it again.
    Roundtrip(RoundtripArgs),
    /// Decode a bitstream and print the configuration as JSON.
    Dump(DumpArgs),
}

/// Arguments for `frost check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Chip database (defaults to `device.chipdb` from `frost.toml`).
    #[arg(long)]
    pub chipdb: Option<String>,
}

/// Arguments for `frost roundtrip`.
#[derive(Args, Debug)]
pub struct RoundtripArgs {
    /// ASCII bitstream to decode.
    pub bitstream: String,

    /// Chip database (defaults to `device.chipdb` from `frost.toml`).
    #[arg(long)]
    pub chipdb: Option<String>,

    /// Write the re-encoded bitstream here instead of stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<String>,
}

/// Arguments for `frost dump`.
#[derive(Args, Debug)]
pub struct DumpArgs {
    /// ASCII bitstream to decode.
    pub bitstream: String,

    /// Chip database (defaults to `device.chipdb` from `frost.toml`).
    #[arg(long)]
    pub chipdb: Option<String>,

    /// Print compact single-line JSON.
    #[arg(long)]
    pub compact: bool,
}

/// The `--color` setting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Color when stderr is a terminal.
    Auto,
    /// Always color.
    Always,
    /// Never color.
    Never,
}

impl ColorMode {
    fn enabled(self) -> bool {
        match self {
            ColorMode::Auto => std::io::stderr().is_terminal(),
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

/// Settings every command runs with.
pub struct GlobalArgs {
    /// Suppress notes and warnings.
    pub quiet: bool,
    /// Emit ANSI colors on stderr.
    pub color: bool,
    /// `--config`, if given.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    let global = cli.global.resolve();

    let outcome = match &cli.command {
        Command::Check(args) => check::run(args, &global),
        Command::Roundtrip(args) => roundtrip::run(args, &global),
        Command::Dump(args) => dump::run(args, &global),
    };

    let code = outcome.unwrap_or_else(|e| {
        eprintln!("error: {e}");
        1
    });
    process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_check_default() {
        let cli = Cli::parse_from(["frost", "check"]);
        match cli.command {
            Command::Check(ref args) => assert!(args.chipdb.is_none()),
            _ => panic!("expected Check command"),
        }
        assert!(!cli.global.quiet);
        assert_eq!(cli.global.color, ColorMode::Auto);
    }

    #[test]
    fn parse_check_with_chipdb() {
        let cli = Cli::parse_from(["frost", "check", "--chipdb", "chipdb-1k.txt"]);
        match cli.command {
            Command::Check(ref args) => assert_eq!(args.chipdb.as_deref(), Some("chipdb-1k.txt")),
            _ => panic!("expected Check command"),
        }
    }

    #[test]
    fn parse_roundtrip() {
        let cli = Cli::parse_from([
            "frost",
            "roundtrip",
            "blinky.asc",
            "--chipdb",
            "chipdb-1k.txt",
            "-o",
            "out.asc",
        ]);
        match cli.command {
            Command::Roundtrip(ref args) => {
                assert_eq!(args.bitstream, "blinky.asc");
                assert_eq!(args.chipdb.as_deref(), Some("chipdb-1k.txt"));
                assert_eq!(args.output.as_deref(), Some("out.asc"));
            }
            _ => panic!("expected Roundtrip command"),
        }
    }

    #[test]
    fn parse_dump() {
        let cli = Cli::parse_from(["frost", "dump", "blinky.asc", "--compact"]);
        match cli.command {
            Command::Dump(ref args) => {
                assert_eq!(args.bitstream, "blinky.asc");
                assert!(args.chipdb.is_none());
                assert!(args.compact);
            }
            _ => panic!("expected Dump command"),
        }
    }

    #[test]
    fn roundtrip_requires_bitstream() {
        assert!(Cli::try_parse_from(["frost", "roundtrip"]).is_err());
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from([
            "frost",
            "--quiet",
            "--color",
            "never",
            "--config",
            "/work/frost.toml",
            "check",
        ]);
        let global = cli.global.resolve();
        assert!(global.quiet);
        assert!(!global.color);
        assert_eq!(global.config.as_deref(), Some("/work/frost.toml"));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["frost", "dump", "a.asc", "--color", "always", "-q"]);
        assert!(cli.global.quiet);
        assert_eq!(cli.global.color, ColorMode::Always);
        assert!(cli.global.resolve().color);
    }
}
