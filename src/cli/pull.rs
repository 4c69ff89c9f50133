//! `lazypad pull` - fetch the macro tree from the device.

use crate::cli::common::{await_response, open_link, ExitCode};
use crate::parser::nested;
use crate::transport::{protocol, Command, Request, Response};
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;

/// Arguments for the `pull` command.
#[derive(Debug, Args)]
pub struct PullArgs {
    /// Serial port of the device (defaults to the configured port)
    #[arg(long, value_name = "PORT")]
    pub port: Option<String>,

    /// File to write the nested JSON form to
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Seconds to wait for the transfer
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,
}

/// Requests `get_macros` and writes the received tree to `--output`.
pub fn run(args: &PullArgs) -> Result<ExitCode> {
    let mut link = open_link(args.port.clone())?;
    link.send(&Request::new(Command::GetMacros))?;

    let response = await_response(
        &mut link,
        Duration::from_secs(args.timeout),
        |response| matches!(response, Response::Ack { tag, .. } if tag == protocol::ACK_MACROS),
    )?;
    link.close();

    let Response::Ack {
        content: Some(content),
        ..
    } = response
    else {
        anyhow::bail!("Device sent a macros acknowledgment without content");
    };

    let tree = nested::from_value(content).context("Device sent an invalid tree")?;
    nested::save(&tree, &args.output)?;
    println!("Wrote {}", args.output.display());
    Ok(ExitCode::Success)
}
