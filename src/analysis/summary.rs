use serde::Serialize;

/// Share of one protocol in the capture
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProtocolShare {
    pub protocol: String,
    pub count: u64,
    /// Fraction of total packets, in `0.0..=1.0`
    pub fraction: f64,
}

/// One bucket of the capture time series
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimeBucket {
    /// Bucket start, in seconds relative to the capture start
    pub offset: f64,
    /// Packets whose timestamp falls into this bucket
    pub count: u64,
}

/// Whole-capture aggregate statistics
///
/// Every field covers all scanned packets, independent of how many
/// detailed records were retained.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CaptureSummary {
    /// Number of packets scanned
    pub total_packets: u64,
    /// Sum of captured lengths, in bytes
    pub total_bytes: u64,
    /// Capture duration in seconds, 0 when fewer than two packets carry
    /// timestamps
    pub duration: f64,
    /// Average packets per second; the duration is floored at 1 ms to
    /// avoid division by zero on single-packet captures
    pub packets_per_second: f64,
    /// Average captured length
    pub avg_packet_size: f64,
    /// Median captured length; even counts average the two middle values
    pub median_packet_size: f64,
    pub min_packet_size: u32,
    pub max_packet_size: u32,
    /// Number of distinct network-layer addresses seen
    pub unique_ips: usize,
    /// Protocol tallies, most frequent first
    pub protocol_distribution: Vec<ProtocolShare>,
    /// Packet-rate histogram over the capture duration
    pub time_series: Vec<TimeBucket>,
}
