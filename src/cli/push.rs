//! `lazypad push` - transfer a macro tree to the device.

use crate::cli::common::{await_response, open_link, ExitCode};
use crate::parser::nested;
use crate::transport::{protocol, Command, Request, Response};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;

/// Arguments for the `push` command.
#[derive(Debug, Args)]
pub struct PushArgs {
    /// Serial port of the device (defaults to the configured port)
    #[arg(long, value_name = "PORT")]
    pub port: Option<String>,

    /// Macro tree file in the nested JSON form
    #[arg(long, value_name = "FILE")]
    pub file: PathBuf,

    /// Also persist the tree to the device flash (`save_macros`)
    #[arg(long)]
    pub save: bool,

    /// Seconds to wait for each acknowledgment
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,
}

/// Accepts any status acknowledgment that is not part of the connection
/// handshake.
fn is_status(response: &Response) -> bool {
    !matches!(
        response,
        Response::Ack { tag, .. }
            if tag == protocol::ACK_VERSION || tag == protocol::ACK_USB_ENABLED
    )
}

/// Sends the tree in `--file` via `set_macros`.
pub fn run(args: &PushArgs) -> Result<ExitCode> {
    let tree = nested::load(&args.file)?;
    let timeout = Duration::from_secs(args.timeout);

    let mut link = open_link(args.port.clone())?;
    link.send(&Request::with_content(
        Command::SetMacros,
        serde_json::to_value(&tree)?,
    ))?;
    let ack = await_response(&mut link, timeout, is_status)?;
    if let Response::Ack { tag, .. } = &ack {
        println!("{tag}");
    }

    if args.save {
        link.send(&Request::new(Command::SaveMacros))?;
        let ack = await_response(&mut link, timeout, is_status)?;
        if let Response::Ack { tag, .. } = &ack {
            println!("{tag}");
        }
    }

    link.close();
    Ok(ExitCode::Success)
}
