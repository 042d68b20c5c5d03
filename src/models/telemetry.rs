use serde::{Deserialize, Serialize};

/// Point-in-time snapshot of host-wide network counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkStats {
    pub bytes_sent: u64,
    pub bytes_recv: u64,
    pub packets_sent: u64,
    pub packets_recv: u64,
    /// Wall-clock time of the snapshot, `%H:%M:%S` local time
    pub timestamp: String,
}
