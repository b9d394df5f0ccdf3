//! Descriptive record of a Samsung TV.
//!
//! The TV serves a JSON document at `http://<ip>:8001/api/v2/`:
//!
//! ```json
//! {
//!   "device": {
//!     "name": "[TV] Samsung Q60 Series (55)",
//!     "modelName": "QE55Q60AAUXXC",
//!     "ip": "192.168.1.2",
//!     "OS": "Tizen",
//!     "resolution": "3840x2160",
//!     "wifiMac": "a0:d0:5b:00:00:00"
//!   },
//!   "name": "...", "version": "2.0.25", ...
//! }
//! ```
//!
//! Every field is optional: firmwares differ in what they report, and the
//! record is informational only.

use std::fmt;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use crate::protocol::codec::ProtocolError;

/// A TV as described by its status endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Network address reported by the TV (or the queried address).
    pub ip: Option<String>,
    /// Friendly name, e.g. `[TV] Samsung Q60 Series (55)`.
    pub name: Option<String>,
    /// Model number.
    pub model_name: Option<String>,
    /// Operating system label, usually `Tizen`.
    pub os: Option<String>,
    /// Panel resolution, e.g. `3840x2160`.
    pub resolution: Option<String>,
    /// WiFi MAC address.
    pub wifi_mac: Option<String>,
}

/// Top-level document returned by `GET /api/v2/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeviceInfoResponse {
    #[serde(default)]
    pub device: RawDevice,
}

/// The `device` object, with the TV's own field names.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDevice {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "modelName")]
    pub model_name: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default, rename = "OS")]
    pub os: Option<String>,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default, rename = "wifiMac")]
    pub wifi_mac: Option<String>,
}

impl Device {
    /// Parses the status document.  `queried` fills in `ip` when the TV omits it.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::MalformedFrame`] if `body` is not the expected JSON.
    pub fn from_info_json(body: &str, queried: IpAddr) -> Result<Self, ProtocolError> {
        let resp: DeviceInfoResponse =
            serde_json::from_str(body).map_err(|e| ProtocolError::MalformedFrame(e.to_string()))?;
        Ok(Self::from_response(resp, queried))
    }

    /// Normalises an already parsed status document.
    pub fn from_response(resp: DeviceInfoResponse, queried: IpAddr) -> Self {
        let raw = resp.device;
        Self {
            ip: raw.ip.or_else(|| Some(queried.to_string())),
            name: raw.name,
            model_name: raw.model_name,
            os: raw.os,
            resolution: raw.resolution,
            wifi_mac: raw.wifi_mac,
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn or_unknown(v: &Option<String>) -> &str {
            v.as_deref().unwrap_or("Unknown")
        }
        writeln!(f, "Name:       {}", or_unknown(&self.name))?;
        writeln!(f, "Model:      {}", or_unknown(&self.model_name))?;
        writeln!(f, "IP:         {}", or_unknown(&self.ip))?;
        writeln!(f, "OS:         {}", or_unknown(&self.os))?;
        writeln!(f, "Resolution: {}", or_unknown(&self.resolution))?;
        write!(f, "WiFi MAC:   {}", or_unknown(&self.wifi_mac))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
