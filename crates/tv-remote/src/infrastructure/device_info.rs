//! Best-effort device info fetch.
//!
//! `GET http://<ip>:8001/api/v2/` returns a JSON description of the TV.  The
//! result is purely informational: every failure (refused, timeout, non-2xx,
//! bad JSON) is logged and turned into `None`, and the caller carries on.
//!
//! This request is plain HTTP and does not share the control channel's
//! certificate-trust setting.

use std::net::IpAddr;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};
use tv_remote_core::protocol::endpoint::PLAIN_PORT;
use tv_remote_core::Device;

/// Path of the device info document.
pub const DEVICE_INFO_PATH: &str = "/api/v2/";

/// Why a device info fetch produced nothing.  Only ever logged.
#[derive(Debug, Error)]
pub enum InfoFetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected HTTP status {0}")]
    Status(reqwest::StatusCode),
    #[error("invalid device info document: {0}")]
    Parse(#[from] tv_remote_core::ProtocolError),
}

/// Builds the device info URL for `ip` on `port`.
pub fn device_info_url(ip: IpAddr, port: u16) -> String {
    match ip {
        IpAddr::V4(v4) => format!("http://{v4}:{port}{DEVICE_INFO_PATH}"),
        IpAddr::V6(v6) => format!("http://[{v6}]:{port}{DEVICE_INFO_PATH}"),
    }
}

/// Fetches the device record from the TV's default plaintext port.
///
/// Returns `None` on any failure.
pub async fn fetch_device_info(ip: IpAddr, timeout: Duration) -> Option<Device> {
    fetch_device_info_from(ip, PLAIN_PORT, timeout).await
}

/// Fetches the device record from an explicit port.
///
/// Returns `None` on any failure.
pub async fn fetch_device_info_from(ip: IpAddr, port: u16, timeout: Duration) -> Option<Device> {
    match try_fetch(ip, port, timeout).await {
        Ok(device) => {
            debug!("device info from {ip}: {device:?}");
            Some(device)
        }
        Err(e) => {
            warn!("failed to get TV info from {ip}: {e}");
            None
        }
    }
}

async fn try_fetch(ip: IpAddr, port: u16, timeout: Duration) -> Result<Device, InfoFetchError> {
    // The TV is always on the LAN; never route this through a proxy.
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .no_proxy()
        .build()?;
    let resp = client.get(device_info_url(ip, port)).send().await?;

    let status = resp.status();
    if !status.is_success() {
        return Err(InfoFetchError::Status(status));
    }

    let body = resp.text().await?;
    Ok(Device::from_info_json(&body, ip)?)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
