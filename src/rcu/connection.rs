use crate::common::wrapping_millis::WrappingMillis;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionState {
    Disconnected,
    Connected { last_heartbeat_at: WrappingMillis },
}

/// Tracks whether the peer's heartbeats are still arriving.
///
/// `Connected` is a sampled property: it only becomes `Disconnected` when
/// [`check_timeout`](Self::check_timeout) runs and sees the timeout exceeded.
#[derive(Debug, Clone)]
pub struct ConnectionMonitor {
    state: ConnectionState,
    timeout_ms: u16,
}

impl ConnectionMonitor {
    pub const fn new(timeout_ms: u16) -> Self {
        Self {
            state: ConnectionState::Disconnected,
            timeout_ms,
        }
    }

    /// Records a processed heartbeat. Returns `true` if this connected the node.
    pub fn on_heartbeat(&mut self, now: WrappingMillis) -> bool {
        let was_connected = self.is_connected();
        self.state = ConnectionState::Connected {
            last_heartbeat_at: now,
        };
        !was_connected
    }

    /// Returns `true` if the connection was lost on this check.
    pub fn check_timeout(&mut self, now: WrappingMillis) -> bool {
        if let ConnectionState::Connected { last_heartbeat_at } = self.state {
            if now.elapsed_since(last_heartbeat_at) > self.timeout_ms {
                self.state = ConnectionState::Disconnected;
                return true;
            }
        }
        false
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.state, ConnectionState::Connected { .. })
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Time since the last heartbeat, `None` while disconnected.
    pub fn since_last_heartbeat(&self, now: WrappingMillis) -> Option<u16> {
        match self.state {
            ConnectionState::Connected { last_heartbeat_at } => {
                Some(now.elapsed_since(last_heartbeat_at))
            }
            ConnectionState::Disconnected => None,
        }
    }
}
