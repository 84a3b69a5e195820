//! Network configuration.

/// Tunables of one network endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetConfig {
    /// Largest accepted frame payload in bytes.
    /// Default: 64 KiB
    pub max_msg_size: usize,

    /// Maximum inbound messages dispatched per event-loop wakeup.
    pub burst_size: usize,

    /// Worker threads for connection I/O when the endpoint gets its own
    /// multi-threaded runtime (client-facing side of the relay).
    pub worker_threads: usize,

    /// Capacity of the inbound queue between reader tasks and the loop.
    pub channel_capacity: usize,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            max_msg_size: 65_536,
            burst_size: 1_000,
            worker_threads: 8,
            channel_capacity: 10_000,
        }
    }
}

impl NetConfig {
    #[must_use]
    pub fn with_max_msg_size(mut self, max_msg_size: usize) -> Self {
        self.max_msg_size = max_msg_size;
        self
    }

    #[must_use]
    pub fn with_burst_size(mut self, burst_size: usize) -> Self {
        self.burst_size = burst_size.max(1);
        self
    }

    #[must_use]
    pub fn with_worker_threads(mut self, worker_threads: usize) -> Self {
        self.worker_threads = worker_threads.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_clamps_zero() {
        let cfg = NetConfig::default().with_burst_size(0).with_worker_threads(0);
        assert_eq!(cfg.burst_size, 1);
        assert_eq!(cfg.worker_threads, 1);
    }
}
