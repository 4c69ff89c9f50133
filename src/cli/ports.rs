//! `lazypad ports` - list available serial ports.

use crate::cli::common::ExitCode;
use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;
use serialport::SerialPortType;

/// Arguments for the `ports` command.
#[derive(Debug, Args)]
pub struct PortsArgs {
    /// Output machine-readable JSON
    #[arg(long)]
    pub json: bool,
}

/// Lists the serial ports on this machine, marking USB devices.
pub fn run(args: &PortsArgs) -> Result<ExitCode> {
    let ports = serialport::available_ports().context("Failed to enumerate serial ports")?;

    if args.json {
        let list: Vec<_> = ports
            .iter()
            .map(|port| match &port.port_type {
                SerialPortType::UsbPort(usb) => json!({
                    "name": port.port_name,
                    "type": "usb",
                    "vid": usb.vid,
                    "pid": usb.pid,
                    "product": usb.product,
                }),
                _ => json!({ "name": port.port_name, "type": "other" }),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(ExitCode::Success);
    }

    if ports.is_empty() {
        println!("No serial ports found.");
        return Ok(ExitCode::Success);
    }

    for port in ports {
        match port.port_type {
            SerialPortType::UsbPort(usb) => {
                let product = usb.product.unwrap_or_else(|| "unknown".to_string());
                println!(
                    "{}  usb {:04x}:{:04x}  {}",
                    port.port_name, usb.vid, usb.pid, product
                );
            }
            _ => println!("{}", port.port_name),
        }
    }
    Ok(ExitCode::Success)
}
