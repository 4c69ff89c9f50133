//! LazyPad - host-side configurator for a 3x3 macropad
//!
//! This binary provides the scriptable command-line surface: inspecting,
//! validating and converting macro tree files, and talking to the device
//! over its serial link.

use clap::{Parser, Subcommand};
use lazypad::cli::{self, ExitCode};
use tracing_subscriber::EnvFilter;

/// LazyPad - configurator for a 3x3 macropad with rotary encoder
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum CliCommand {
    /// List available serial ports
    Ports(cli::PortsArgs),
    /// Summarize a macro tree file
    Inspect(cli::InspectArgs),
    /// Validate a macro tree file
    Validate(cli::ValidateArgs),
    /// Convert between the nested and flat forms
    Convert(cli::ConvertArgs),
    /// Fetch the macro tree from the device
    Pull(cli::PullArgs),
    /// Transfer a macro tree to the device
    Push(cli::PushArgs),
    /// Send a device command (reset, enable USB, save)
    Device(cli::DeviceArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match &cli.command {
        CliCommand::Ports(args) => cli::ports::run(args),
        CliCommand::Inspect(args) => cli::inspect::run(args),
        CliCommand::Validate(args) => cli::validate::run(args),
        CliCommand::Convert(args) => cli::convert::run(args),
        CliCommand::Pull(args) => cli::pull::run(args),
        CliCommand::Push(args) => cli::push::run(args),
        CliCommand::Device(args) => cli::device::run(args),
    };

    let code = match result {
        Ok(exit) => exit.code(),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::Error.code()
        }
    };
    std::process::exit(code);
}
