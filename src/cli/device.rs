//! `lazypad device` - fire-and-acknowledge device commands.

use crate::cli::common::{await_response, open_link, ExitCode};
use crate::transport::{protocol, Command, Request, Response};
use anyhow::Result;
use clap::{Args, ValueEnum};
use std::time::Duration;

/// Device actions without a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DeviceAction {
    /// Restart the device firmware
    SoftReset,
    /// Reset the device hardware
    HardReset,
    /// Re-enable the device's USB mass storage (reboots the device)
    EnableUsb,
    /// Persist the device's working tree to its flash
    Save,
}

impl DeviceAction {
    const fn command(self) -> Command {
        match self {
            Self::SoftReset => Command::SoftReset,
            Self::HardReset => Command::HardReset,
            Self::EnableUsb => Command::EnableUsb,
            Self::Save => Command::SaveMacros,
        }
    }
}

/// Arguments for the `device` command.
#[derive(Debug, Args)]
pub struct DeviceArgs {
    /// Serial port of the device (defaults to the configured port)
    #[arg(long, value_name = "PORT")]
    pub port: Option<String>,

    /// Action to send
    #[arg(value_enum)]
    pub action: DeviceAction,
}

/// Sends one device action and reports the acknowledgment.
pub fn run(args: &DeviceArgs) -> Result<ExitCode> {
    let mut link = open_link(args.port.clone())?;
    link.send(&Request::new(args.action.command()))?;

    // Resets may drop the link before acknowledging; that is fine.
    let ack = await_response(&mut link, Duration::from_secs(2), |response| {
        !matches!(
            response,
            Response::Ack { tag, .. }
                if tag == protocol::ACK_VERSION || tag == protocol::ACK_USB_ENABLED
        )
    });
    match ack {
        Ok(Response::Ack { tag, .. }) => println!("{tag}"),
        Ok(_) => {}
        Err(_) => println!("Command sent"),
    }

    link.close();
    Ok(ExitCode::Success)
}
