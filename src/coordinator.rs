//! Assignment coordinator
//!
//! Business logic over the registry and the device bridge: proxy format
//! validation, the one-proxy-per-device / one-device-per-proxy invariants,
//! greedy bulk assignment, and pushing or clearing the device-side setting.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::bridge::DeviceBridge;
use crate::error::DroidProxError;
use crate::models::{
    is_valid_proxy, AssignOutcome, AssignmentInfo, Device, ProxyEndpoint, UNKNOWN_MODEL,
};
use crate::registry::ProxyRegistry;

/// Coordinates proxy-to-device assignments
///
/// Mutating operations persist through the registry on every change and
/// report plain outcomes; no call panics or bubbles an error to the
/// front end.
pub struct AssignmentCoordinator {
    registry: ProxyRegistry,
    bridge: Arc<dyn DeviceBridge>,
}

impl AssignmentCoordinator {
    pub fn new(registry: ProxyRegistry, bridge: Arc<dyn DeviceBridge>) -> Self {
        Self { registry, bridge }
    }

    /// Devices currently reported by the bridge
    pub async fn connected_devices(&self) -> Vec<Device> {
        self.bridge.list_devices().await
    }

    /// The proxy pool as persisted
    pub fn load_proxies(&self) -> Vec<String> {
        self.registry.load_pool()
    }

    /// Current bindings enriched with live device models
    ///
    /// Devices are listed once per call; assigned devices that are no
    /// longer connected carry the unknown-model sentinel.
    pub async fn assignments_view(&self) -> HashMap<String, AssignmentInfo> {
        let devices = self.bridge.list_devices().await;

        self.registry
            .assignments()
            .iter()
            .map(|(proxy, device_id)| {
                let device_model = devices
                    .iter()
                    .find(|d| &d.id == device_id)
                    .map(|d| d.model.clone())
                    .unwrap_or_else(|| UNKNOWN_MODEL.to_string());

                (
                    proxy.clone(),
                    AssignmentInfo {
                        device_id: device_id.clone(),
                        device_model,
                    },
                )
            })
            .collect()
    }

    /// Merge candidates into the pool, dropping malformed entries
    ///
    /// Malformed candidates are logged and skipped; the rest of the batch
    /// still goes through. The persisted pool is deduplicated and sorted.
    pub fn add_proxies(&mut self, candidates: &[String]) -> bool {
        let mut merged: BTreeSet<String> = self.registry.load_pool().into_iter().collect();
        merged.extend(candidates.iter().cloned());

        let valid: Vec<String> = merged
            .into_iter()
            .filter(|proxy| {
                if is_valid_proxy(proxy) {
                    true
                } else {
                    warn!("Invalid proxy format: {}", proxy);
                    false
                }
            })
            .collect();

        let success = self.registry.save_pool(&valid);
        if success {
            info!("Pool saved with {} proxies", valid.len());
        }
        success
    }

    /// Remove proxies from the pool, releasing any bindings they hold
    ///
    /// Device-side settings are not touched; only the registry changes.
    pub fn delete_proxies(&mut self, to_delete: &[String]) -> bool {
        let remaining: Vec<String> = self
            .registry
            .load_pool()
            .into_iter()
            .filter(|proxy| !to_delete.contains(proxy))
            .collect();

        for proxy in to_delete {
            self.registry.unassign(proxy);
        }

        self.registry.save_pool(&remaining)
    }

    /// Wipe the pool and every binding; live devices keep their settings
    pub fn delete_all_proxies(&mut self) -> bool {
        self.registry.clear_assignments();
        self.registry.save_pool(&[])
    }

    /// Bind a proxy to a device, pushing the setting through the bridge
    ///
    /// A proxy already bound to the requested device short-circuits as a
    /// success with no bridge traffic. A device's previous proxy is
    /// released first (device-side clear is best-effort on this path).
    /// The binding is recorded only after the bridge confirms the write.
    pub async fn assign_single_proxy(&mut self, device_id: &str, proxy: &str) -> AssignOutcome {
        if self.registry.assignments().get(proxy).map(String::as_str) == Some(device_id) {
            return AssignOutcome::ok("proxy already assigned to this device");
        }

        if let Some(old_proxy) = self.registry.proxy_for_device(device_id) {
            self.registry.unassign(&old_proxy);
            if !self.bridge.clear_device_proxy(device_id).await {
                warn!(
                    "Failed to clear previous proxy {} on device {}",
                    old_proxy, device_id
                );
            }
        }

        if self.registry.assignments().contains_key(proxy) {
            return AssignOutcome::fail(
                DroidProxError::ProxyInUse {
                    proxy: proxy.to_string(),
                }
                .to_string(),
            );
        }

        let endpoint: ProxyEndpoint = match proxy.parse() {
            Ok(endpoint) => endpoint,
            Err(e) => return AssignOutcome::fail(e.to_string()),
        };

        if self
            .bridge
            .set_device_proxy(device_id, &endpoint.host, endpoint.port)
            .await
        {
            self.registry.assign(proxy, device_id);
            info!("Assigned {} to {}", proxy, device_id);
            AssignOutcome::ok("proxy set successfully")
        } else {
            AssignOutcome::fail(
                DroidProxError::DeviceCommandFailed {
                    device_id: device_id.to_string(),
                }
                .to_string(),
            )
        }
    }

    /// Release a single binding, strictly
    ///
    /// An unbound proxy is already satisfied and returns true without any
    /// bridge call. A failed device-side clear keeps the binding intact.
    pub async fn unassign_proxy(&mut self, proxy: &str) -> bool {
        let Some(device_id) = self.registry.assignments().get(proxy).cloned() else {
            return true;
        };

        if self.bridge.clear_device_proxy(&device_id).await {
            self.registry.unassign(proxy);
            info!("Released {} from {}", proxy, device_id);
            true
        } else {
            warn!(
                "Failed to clear proxy on device {}; keeping binding for {}",
                device_id, proxy
            );
            false
        }
    }

    /// Release every binding, best-effort
    ///
    /// Clears each bound device but wipes the assignment map even when
    /// individual device clears fail, unlike [`unassign_proxy`].
    ///
    /// [`unassign_proxy`]: Self::unassign_proxy
    pub async fn unassign_all_proxies(&mut self) -> bool {
        let bindings: Vec<(String, String)> = self
            .registry
            .assignments()
            .iter()
            .map(|(proxy, device_id)| (proxy.clone(), device_id.clone()))
            .collect();

        for (proxy, device_id) in &bindings {
            if !self.bridge.clear_device_proxy(device_id).await {
                warn!("Failed to clear proxy {} on device {}", proxy, device_id);
            }
        }

        self.registry.clear_assignments()
    }

    /// Greedily pair online devices with unassigned pool proxies
    ///
    /// Devices are taken in bridge listing order, proxies in pool order;
    /// a proxy consumed by a failed pairing is not offered again. Overall
    /// success means at least one pairing went through.
    pub async fn bulk_assign_proxies(&mut self) -> AssignOutcome {
        let devices: Vec<Device> = self
            .bridge
            .list_devices()
            .await
            .into_iter()
            .filter(Device::is_online)
            .collect();

        let available: Vec<String> = self
            .registry
            .load_pool()
            .into_iter()
            .filter(|proxy| !self.registry.assignments().contains_key(proxy))
            .collect();

        info!("Available devices: {}", devices.len());
        info!("Available proxies: {}", available.len());

        if devices.is_empty() {
            warn!("No available devices found");
            return AssignOutcome::fail(DroidProxError::NoDevicesAvailable.to_string());
        }
        if available.is_empty() {
            warn!("No available proxies found");
            return AssignOutcome::fail(DroidProxError::NoProxiesAvailable.to_string());
        }

        let mut queue = available.into_iter();
        let mut assigned = 0usize;

        for device in &devices {
            let Some(proxy) = queue.next() else {
                break;
            };

            let outcome = self.assign_single_proxy(&device.id, &proxy).await;
            if outcome.success {
                assigned += 1;
                info!("Successfully assigned {} to {}", proxy, device.id);
            } else {
                warn!(
                    "Failed to assign proxy to device {}: {}",
                    device.id, outcome.message
                );
            }
        }

        if assigned > 0 {
            info!("Successfully assigned {} proxies", assigned);
            AssignOutcome::ok(format!("assigned {} proxies", assigned))
        } else {
            warn!("No successful assignments made");
            AssignOutcome::fail("failed to assign any proxies")
        }
    }

    /// Clear the proxy setting on every online device and wipe the map
    ///
    /// Reports success only when every device-level clear succeeded, but
    /// the assignment map is wiped regardless.
    pub async fn delete_all_device_proxies(&mut self) -> bool {
        let devices = self.bridge.list_devices().await;
        let mut success = true;

        for device in devices.iter().filter(|d| d.is_online()) {
            if !self.bridge.clear_device_proxy(&device.id).await {
                error!("Failed to clear proxy for device {}", device.id);
                success = false;
            }
        }

        self.registry.clear_assignments();

        if success {
            info!("Cleared proxy settings on all devices");
        }
        success
    }

    #[cfg(test)]
    fn assignments(&self) -> &HashMap<String, String> {
        self.registry.assignments()
    }
}
