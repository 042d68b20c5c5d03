//! adb-backed implementation of the device bridge

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Output;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{error, info, warn};

use super::{locate_adb, DeviceBridge};
use crate::config::BridgeConfig;
use crate::error::{DroidProxError, Result};
use crate::models::{Device, ONLINE_STATE};

/// Value written to `http_proxy` to disable the proxy on a device
///
/// The `settings delete` verb is unreliable for this key on some Android
/// builds, so clearing always writes this sentinel instead.
pub const PROXY_DISABLE_SENTINEL: &str = ":0";

const GLOBAL_PROXY_SETTING: &str = "http_proxy";
const MODEL_PROPERTY: &str = "ro.product.model";

/// Bridge adapter invoking the adb executable
pub struct AdbBridge {
    adb_path: Option<PathBuf>,
    command_timeout: Duration,
}

impl AdbBridge {
    /// Create a bridge, locating the adb executable once up front
    ///
    /// A missing executable is not an error here; every operation on a
    /// pathless bridge degrades to an empty or failed result.
    pub fn new(config: &BridgeConfig) -> Self {
        let adb_path = locate_adb(config.adb_path.as_deref());

        match &adb_path {
            Some(path) => info!("Using bridge executable at {}", path.display()),
            None => warn!("Bridge executable not found; device operations are disabled"),
        }

        Self {
            adb_path,
            command_timeout: Duration::from_secs(config.command_timeout),
        }
    }

    /// Run an adb command, optionally scoped to a device with `-s`
    async fn run(&self, device_id: Option<&str>, args: &[&str]) -> Result<Output> {
        let adb = self
            .adb_path
            .as_ref()
            .ok_or(DroidProxError::BridgeUnavailable)?;

        let mut cmd = Command::new(adb);
        if let Some(id) = device_id {
            cmd.args(["-s", id]);
        }
        cmd.args(args);

        // Keep the subprocess from flashing a console window
        #[cfg(windows)]
        cmd.creation_flags(0x0800_0000); // CREATE_NO_WINDOW

        timeout(self.command_timeout, cmd.output())
            .await
            .map_err(|_| DroidProxError::BridgeTimeout)?
            .map_err(|e| DroidProxError::BridgeCommand(e.to_string()))
    }

    /// Run an adb command and return its stdout, failing on non-zero exit
    async fn run_checked(&self, device_id: Option<&str>, args: &[&str]) -> Result<String> {
        let output = self.run(device_id, args).await?;

        if !output.status.success() {
            return Err(DroidProxError::BridgeCommand(format!(
                "adb {} exited with {}",
                args.join(" "),
                output.status
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn device_model(&self, device_id: &str) -> Option<String> {
        match self
            .run_checked(Some(device_id), &["shell", "getprop", MODEL_PROPERTY])
            .await
        {
            Ok(stdout) => {
                let model = stdout.trim();
                if model.is_empty() {
                    None
                } else {
                    Some(model.to_string())
                }
            }
            Err(e) => {
                warn!("Failed to query model for {}: {}", device_id, e);
                None
            }
        }
    }

    async fn write_proxy_setting(&self, device_id: &str, value: &str) -> bool {
        let args = [
            "shell",
            "settings",
            "put",
            "global",
            GLOBAL_PROXY_SETTING,
            value,
        ];

        match self.run(Some(device_id), &args).await {
            Ok(output) if output.status.success() => true,
            Ok(output) => {
                error!(
                    "Proxy setting write on {} exited with {}",
                    device_id, output.status
                );
                false
            }
            Err(e) => {
                error!("Proxy setting write on {} failed: {}", device_id, e);
                false
            }
        }
    }
}

#[async_trait]
impl DeviceBridge for AdbBridge {
    async fn list_devices(&self) -> Vec<Device> {
        let stdout = match self.run_checked(None, &["devices", "-l"]).await {
            Ok(stdout) => stdout,
            Err(e) => {
                error!("Error listing devices: {}", e);
                return Vec::new();
            }
        };

        let mut devices = Vec::new();
        for (id, state) in parse_devices_output(&stdout) {
            let device = if state == ONLINE_STATE {
                match self.device_model(&id).await {
                    Some(model) => Device {
                        id,
                        model,
                        status: state,
                    },
                    None => Device::unreachable(id, state),
                }
            } else {
                Device::unreachable(id, state)
            };
            devices.push(device);
        }

        info!("Found {} connected devices", devices.len());
        devices
    }

    async fn set_device_proxy(&self, device_id: &str, host: &str, port: u16) -> bool {
        self.write_proxy_setting(device_id, &format!("{}:{}", host, port))
            .await
    }

    async fn clear_device_proxy(&self, device_id: &str) -> bool {
        self.write_proxy_setting(device_id, PROXY_DISABLE_SENTINEL)
            .await
    }
}

/// Parse the line-oriented `adb devices -l` output into (id, state) pairs
///
/// The first line is a header; each following non-empty line carries the
/// device id and its state token, then optional descriptor fields.
fn parse_devices_output(output: &str) -> Vec<(String, String)> {
    output
        .lines()
        .skip(1)
        .filter_map(|line| {
            let mut tokens = line.split_whitespace();
            let id = tokens.next()?;
            let state = tokens.next()?;
            Some((id.to_string(), state.to_string()))
        })
        .collect()
}
