use serde::{Deserialize, Serialize};

/// Bridge state reported for a device that is online and authorized
pub const ONLINE_STATE: &str = "device";

/// Model name used for devices whose model cannot be queried
pub const OFFLINE_MODEL: &str = "Offline Device";

/// Model name used for assigned devices that are no longer connected
pub const UNKNOWN_MODEL: &str = "Unknown Device";

/// A device reported by the bridge
///
/// Devices are discovered fresh on every listing and never persisted.
/// The status is the raw state token from the bridge; anything other
/// than [`ONLINE_STATE`] is unusable for proxy assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    pub model: String,
    pub status: String,
}

impl Device {
    /// Create a device in the online state
    pub fn online(id: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            model: model.into(),
            status: ONLINE_STATE.to_string(),
        }
    }

    /// Create a device in a non-online state with the offline model sentinel
    pub fn unreachable(id: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            model: OFFLINE_MODEL.to_string(),
            status: status.into(),
        }
    }

    /// Whether this device is eligible for proxy assignment
    pub fn is_online(&self) -> bool {
        self.status == ONLINE_STATE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_is_online() {
        let device = Device::online("emulator-5554", "sdk_gphone_x86");
        assert!(device.is_online());
        assert_eq!(device.model, "sdk_gphone_x86");

        let device = Device::unreachable("ZY22DQ7KXP", "unauthorized");
        assert!(!device.is_online());
        assert_eq!(device.model, OFFLINE_MODEL);
        assert_eq!(device.status, "unauthorized");
    }

    #[test]
    fn test_device_serialization_shape() {
        let device = Device::online("emulator-5554", "Pixel 7");
        let json = serde_json::to_value(&device).unwrap();

        assert_eq!(json["id"], "emulator-5554");
        assert_eq!(json["model"], "Pixel 7");
        assert_eq!(json["status"], "device");
    }
}
