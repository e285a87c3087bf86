//! devpilot - Command-line interface for device automation
//!
//! Usage:
//!     devpilot [OPTIONS] <COMMAND>
//!
//! Environment Variables:
//!     DEVPILOT_DEVICE_ID: ADB device ID for multi-device setups
//!     DEVPILOT_MATCH_THRESHOLD: Visual match acceptance threshold (default: 0.8)
//!     RUST_LOG: Log filter (e.g. device_pilot=debug)

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use device_pilot::{AdbChannel, Device};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// devpilot - remote control and automation for a connected Android device
#[derive(Parser, Debug)]
#[command(name = "devpilot")]
#[command(about = "Remote control and automation for a connected Android device")]
#[command(after_help = r#"Examples:
    # Tap the first element whose text is OK
    devpilot tap "//node[@text='OK']"

    # Tap wherever the reference image appears on screen
    devpilot tap ./button.png

    # Print the center of a located element as JSON
    devpilot locate --json "//node[@text='Settings']"

    # Type into the focused field, clearing it first
    devpilot type --clear "anonymous@example.org"

    # Package lifecycle
    devpilot install ./app.apk
    devpilot launch org.example.app
    devpilot stop org.example.app
    devpilot uninstall org.example.app

    # Connection management
    devpilot connect 192.168.1.100:5555
    devpilot devices
"#)]
struct Cli {
    /// ADB device ID
    #[arg(short = 'd', long, env = "DEVPILOT_DEVICE_ID")]
    device_id: Option<String>,

    /// Path to the adb binary
    #[arg(long, default_value = "adb")]
    adb_path: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Locate an element by structural pattern or reference image
    Locate {
        /// Structural pattern (//node[@attr='value']) or image path
        payload: String,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Locate an element and tap its center
    Tap {
        /// Structural pattern (//node[@attr='value']) or image path
        payload: String,
    },
    /// Type text into the focused field
    Type {
        text: String,
        /// Clear the field before typing
        #[arg(long)]
        clear: bool,
    },
    /// Print a fresh structural UI dump
    Dump,
    /// Run a raw shell command on the device
    Shell { command: String },
    /// Install an APK
    Install { apk: PathBuf },
    /// Uninstall a package
    Uninstall { package: String },
    /// Launch a package
    Launch { package: String },
    /// Force-stop a package
    Stop { package: String },
    /// List connected devices
    Devices,
    /// Connect to a remote device over TCP/IP
    Connect { address: String },
    /// Disconnect from a remote device (all when omitted)
    Disconnect { address: Option<String> },
    /// Reboot the device and wait for it to come back
    Reboot,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    which::which(&cli.adb_path)
        .map_err(|_| anyhow!("adb binary not found: {}", cli.adb_path))?;

    let channel = AdbChannel::new(cli.device_id.clone()).with_adb_path(&cli.adb_path);

    match cli.command {
        Command::Locate { payload, json } => {
            let device = Device::new(channel);
            match device.locate(&payload).await? {
                Some(point) => {
                    if json {
                        println!("{}", serde_json::to_string(&point)?);
                    } else {
                        println!("{} {}", point.x, point.y);
                    }
                }
                None => {
                    eprintln!("not found");
                    std::process::exit(1);
                }
            }
        }
        Command::Tap { payload } => {
            let device = Device::new(channel);
            if !device.tap(&payload).await? {
                eprintln!("not found");
                std::process::exit(1);
            }
        }
        Command::Type { text, clear } => {
            Device::new(channel).type_text(&text, clear).await?;
        }
        Command::Dump => {
            let text = Device::new(channel).dump_ui().await?;
            println!("{}", text);
        }
        Command::Shell { command } => {
            let output = Device::new(channel).execute(&command).await?;
            print!("{}", output);
        }
        Command::Install { apk } => {
            Device::new(channel)
                .install_package(&apk)
                .await
                .with_context(|| format!("installing {}", apk.display()))?;
        }
        Command::Uninstall { package } => {
            Device::new(channel).uninstall_package(&package).await?;
        }
        Command::Launch { package } => {
            Device::new(channel).launch_package(&package).await?;
        }
        Command::Stop { package } => {
            Device::new(channel).stop_package(&package).await?;
        }
        Command::Devices => {
            let devices = channel.list_devices().await?;
            if devices.is_empty() {
                println!("No devices connected");
            }
            for info in devices {
                println!(
                    "{}\t{}\t{}",
                    info.device_id,
                    info.status,
                    info.model.unwrap_or_default()
                );
            }
        }
        Command::Connect { address } => {
            println!("{}", channel.connect(&address).await?);
        }
        Command::Disconnect { address } => {
            println!("{}", channel.disconnect(address.as_deref()).await?);
        }
        Command::Reboot => {
            channel.reboot().await?;
            println!("Device is back");
        }
    }

    Ok(())
}
