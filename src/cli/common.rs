//! Shared helpers for CLI command handlers.

use crate::config::Config;
use crate::transport::{LinkEvent, Response, SerialLink};
use anyhow::{bail, Context, Result};
use std::time::{Duration, Instant};

/// Process exit codes shared by all subcommands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// The command succeeded.
    Success = 0,
    /// The input was processed but failed validation.
    ValidationFailed = 1,
    /// The command could not run (I/O, transport, bad arguments).
    Error = 2,
}

impl ExitCode {
    /// The numeric process exit code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// Resolves the serial port to use: the `--port` argument wins, then the
/// configured default port.
pub fn resolve_port(cli_port: Option<String>) -> Result<String> {
    if let Some(port) = cli_port {
        return Ok(port);
    }
    let config = Config::load()?;
    config.serial.port.context(
        "No serial port given. Pass --port or set `serial.port` in the config file",
    )
}

/// Opens a link on the resolved port.
pub fn open_link(cli_port: Option<String>) -> Result<SerialLink> {
    let port = resolve_port(cli_port)?;
    let mut link = SerialLink::new();
    link.open(&port)
        .with_context(|| format!("Could not connect to {port}"))?;
    Ok(link)
}

/// Polls the link until a frame satisfies `accept`, a device error
/// arrives, the link drops, or `timeout` passes.
///
/// Device warnings are printed and skipped; handshake acknowledgments the
/// caller is not interested in are skipped by returning `false` from
/// `accept`.
pub fn await_response(
    link: &mut SerialLink,
    timeout: Duration,
    mut accept: impl FnMut(&Response) -> bool,
) -> Result<Response> {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        for event in link.poll() {
            match event {
                LinkEvent::Frame(Response::Err(message)) => {
                    bail!("Device error: {message}");
                }
                LinkEvent::Frame(Response::Warn(message)) => {
                    eprintln!("Device warning: {message}");
                }
                LinkEvent::Frame(response) => {
                    if accept(&response) {
                        return Ok(response);
                    }
                }
                LinkEvent::Closed => bail!("Connection lost"),
                LinkEvent::Opened | LinkEvent::DecodeError(_) => {}
            }
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    bail!("Timed out waiting for the device")
}
