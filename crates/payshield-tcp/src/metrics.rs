//! Transport metrics types.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// A serializable snapshot of a transport's counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransportMetrics {
    /// Total number of round trips attempted.
    pub requests: u64,

    /// Round trips that ended with a reply of any kind.
    pub replies: u64,

    /// Round trips that ended with an error.
    pub failures: u64,

    /// Round trips that ended with a timeout.
    pub timeouts: u64,

    /// Total number of bytes written.
    pub bytes_sent: u64,

    /// Total number of bytes read.
    pub bytes_received: u64,

    /// The average round-trip latency, in milliseconds.
    pub average_latency_ms: f64,
}

/// Lock-free counters updated by every round trip.
#[derive(Debug, Default)]
pub struct AtomicMetrics {
    requests: AtomicU64,
    replies: AtomicU64,
    failures: AtomicU64,
    timeouts: AtomicU64,
    bytes_sent: AtomicU64,
    bytes_received: AtomicU64,
    /// Exponential moving average in microseconds.
    avg_latency_us: AtomicU64,
}

impl AtomicMetrics {
    /// Creates a new `AtomicMetrics` instance with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_request(&self, bytes_sent: usize) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        self.bytes_sent
            .fetch_add(bytes_sent as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_reply(&self, bytes_received: usize, latency_us: u64) {
        self.replies.fetch_add(1, Ordering::Relaxed);
        self.bytes_received
            .fetch_add(bytes_received as u64, Ordering::Relaxed);
        self.update_latency_us(latency_us);
    }

    pub(crate) fn record_failure(&self, timed_out: bool) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        if timed_out {
            self.timeouts.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Updates the average latency using an exponential moving average (EMA).
    fn update_latency_us(&self, latency_us: u64) {
        let current = self.avg_latency_us.load(Ordering::Relaxed);
        let new_avg = if current == 0 {
            latency_us
        } else {
            // alpha = 0.1
            current.saturating_mul(9).saturating_add(latency_us) / 10
        };
        self.avg_latency_us.store(new_avg, Ordering::Relaxed);
    }

    /// Creates a serializable `TransportMetrics` snapshot from the current values.
    pub fn snapshot(&self) -> TransportMetrics {
        TransportMetrics {
            requests: self.requests.load(Ordering::Relaxed),
            replies: self.replies.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
            bytes_sent: self.bytes_sent.load(Ordering::Relaxed),
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
            average_latency_ms: (self.avg_latency_us.load(Ordering::Relaxed) as f64) / 1000.0,
        }
    }

    /// Resets all counters to zero.
    pub fn reset(&self) {
        for counter in [
            &self.requests,
            &self.replies,
            &self.failures,
            &self.timeouts,
            &self.bytes_sent,
            &self.bytes_received,
            &self.avg_latency_us,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}
