//! Simulation result reports.
//!
//! Structured results with `Display` impls that render the console-style
//! text the UI shows verbatim in its result popups.

use std::fmt;

use super::{TransportMode, PING_PAYLOAD_BYTES, TCP_ROUND_TRIP_MS};

/// One synthesized echo reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingSample {
    /// Response time in milliseconds, drawn from [1, 100]
    pub time_ms: u32,
    /// Time-to-live, drawn from [50, 128]
    pub ttl: u32,
}

/// End-to-end ping statistics. Ping does not animate hop by hop; it
/// reports aggregate numbers only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingReport {
    pub target_id: String,
    pub target_ip: String,
    pub samples: Vec<PingSample>,
    pub min_ms: u32,
    pub max_ms: u32,
    pub avg_ms: u32,
    pub sent: u32,
    pub received: u32,
    pub lost: u32,
}

impl PingReport {
    /// Aggregate a full set of samples into a report. The mock link never
    /// drops packets, so `lost` is always zero.
    pub fn from_samples(target_id: &str, target_ip: &str, samples: Vec<PingSample>) -> Self {
        debug_assert!(!samples.is_empty());
        let times: Vec<u32> = samples.iter().map(|s| s.time_ms).collect();
        let min_ms = times.iter().copied().min().unwrap_or(0);
        let max_ms = times.iter().copied().max().unwrap_or(0);
        let avg_ms = times.iter().sum::<u32>() / times.len() as u32;
        let sent = samples.len() as u32;
        Self {
            target_id: target_id.to_string(),
            target_ip: target_ip.to_string(),
            samples,
            min_ms,
            max_ms,
            avg_ms,
            sent,
            received: sent,
            lost: 0,
        }
    }
}

impl fmt::Display for PingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Pinging {} [{}] with {} bytes of data:",
            self.target_id, self.target_ip, PING_PAYLOAD_BYTES
        )?;
        for sample in &self.samples {
            writeln!(
                f,
                "Reply from {}: bytes={} time={}ms TTL={}",
                self.target_ip, PING_PAYLOAD_BYTES, sample.time_ms, sample.ttl
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Ping statistics for {}:", self.target_ip)?;
        writeln!(
            f,
            "    Packets: Sent = {}, Received = {}, Lost = {} (0% loss),",
            self.sent, self.received, self.lost
        )?;
        writeln!(f, "Approximate round trip times in milli-seconds:")?;
        write!(
            f,
            "    Minimum = {}ms, Maximum = {}ms, Average = {}ms",
            self.min_ms, self.max_ms, self.avg_ms
        )
    }
}

/// Outcome of a completed packet-send session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketReport {
    pub from: String,
    pub to: String,
    pub payload: String,
    pub mode: TransportMode,
}

impl fmt::Display for PacketReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            TransportMode::Udp => writeln!(f, "Data Packet Transmission:")?,
            TransportMode::Tcp => writeln!(
                f,
                "TCP Data Packet Transmission Round Trip: {}ms",
                TCP_ROUND_TRIP_MS
            )?,
        }
        writeln!(f, "From: {}", self.from)?;
        writeln!(f, "To: {}", self.to)?;
        writeln!(f, "Data: {}", self.payload)?;
        if self.mode == TransportMode::Tcp {
            writeln!(f, "Acknowledgment: Received")?;
        }
        write!(f, "Status: Success")
    }
}

/// Terminal payload of a `SimulationResult` event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulationReport {
    Ping(PingReport),
    Packet(PacketReport),
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ping(report) => report.fmt(f),
            Self::Packet(report) => report.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ping_report_aggregates() {
        let samples = vec![
            PingSample { time_ms: 10, ttl: 64 },
            PingSample { time_ms: 30, ttl: 64 },
            PingSample { time_ms: 20, ttl: 100 },
            PingSample { time_ms: 40, ttl: 50 },
        ];
        let report = PingReport::from_samples("Server_1", "192.168.1.9", samples);
        assert_eq!(report.min_ms, 10);
        assert_eq!(report.max_ms, 40);
        assert_eq!(report.avg_ms, 25);
        assert_eq!(report.sent, 4);
        assert_eq!(report.lost, 0);
    }

    #[test]
    fn test_ping_report_rendering() {
        let samples = vec![PingSample { time_ms: 5, ttl: 60 }];
        let text = PingReport::from_samples("Server_1", "192.168.1.9", samples).to_string();
        assert!(text.starts_with("Pinging Server_1 [192.168.1.9] with 32 bytes of data:"));
        assert!(text.contains("Reply from 192.168.1.9: bytes=32 time=5ms TTL=60"));
        assert!(text.contains("Packets: Sent = 1, Received = 1, Lost = 0 (0% loss),"));
        assert!(text.ends_with("Minimum = 5ms, Maximum = 5ms, Average = 5ms"));
    }

    #[test]
    fn test_packet_report_rendering() {
        let udp = PacketReport {
            from: "Computer_1".to_string(),
            to: "Server_1".to_string(),
            payload: "Hello, Network!".to_string(),
            mode: TransportMode::Udp,
        };
        let text = udp.to_string();
        assert!(text.starts_with("Data Packet Transmission:"));
        assert!(text.contains("Data: Hello, Network!"));
        assert!(text.ends_with("Status: Success"));
        assert!(!text.contains("Acknowledgment"));

        let tcp = PacketReport { mode: TransportMode::Tcp, ..udp };
        let text = tcp.to_string();
        assert!(text.starts_with("TCP Data Packet Transmission Round Trip: 60ms"));
        assert!(text.contains("Acknowledgment: Received"));
    }
}
