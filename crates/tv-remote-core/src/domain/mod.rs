//! Domain entities for the TV remote.
//!
//! - **`device`** – [`device::Device`], the descriptive record of a TV as
//!   reported by its plaintext status endpoint.

pub mod device;

pub use device::{Device, DeviceInfoResponse};
