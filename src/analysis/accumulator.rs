use std::collections::{BTreeMap, BTreeSet};
use std::net::IpAddr;

use crate::analysis::conversation::{canonical_pair, ConversationRecord};
use crate::analysis::summary::{CaptureSummary, ProtocolShare, TimeBucket};
use crate::decode::DecodedFrame;

/// Finalized aggregates of one parse pass
#[derive(Debug)]
pub(crate) struct Aggregates {
    pub summary: CaptureSummary,
    pub conversations: Vec<ConversationRecord>,
    pub protocols: BTreeSet<String>,
    pub ip_addresses: BTreeSet<String>,
}

#[derive(Debug)]
struct ConversationState {
    protocol: String,
    packet_count: u64,
    total_bytes: u64,
    start_time: Option<f64>,
    end_time: Option<f64>,
}

/// Running aggregation state
///
/// Fed once per scanned packet; covers the whole capture even when the
/// engine stops retaining detailed records.
#[derive(Debug, Default)]
pub(crate) struct Accumulator {
    total_packets: u64,
    total_bytes: u64,
    protocol_counts: BTreeMap<String, u64>,
    ip_addresses: BTreeSet<IpAddr>,
    conversations: BTreeMap<(String, String), ConversationState>,
    sizes: Vec<u32>,
    timestamps: Vec<f64>,
    first_ts: Option<f64>,
    min_ts: Option<f64>,
    max_ts: Option<f64>,
}

impl Accumulator {
    pub fn new() -> Accumulator {
        Accumulator::default()
    }

    /// Fold one decoded packet into the aggregates
    ///
    /// Returns the packet time relative to the first timestamped packet,
    /// when the packet carries a timestamp.
    pub fn register(
        &mut self,
        frame: &DecodedFrame,
        timestamp: Option<f64>,
        caplen: u32,
    ) -> Option<f64> {
        self.total_packets += 1;
        self.total_bytes += caplen as u64;
        self.sizes.push(caplen);
        *self
            .protocol_counts
            .entry(frame.protocol.clone())
            .or_insert(0) += 1;
        if let Some(ip) = frame.src_ip {
            self.ip_addresses.insert(ip);
        }
        if let Some(ip) = frame.dst_ip {
            self.ip_addresses.insert(ip);
        }
        self.update_conversation(frame, timestamp, caplen);
        timestamp.map(|ts| {
            let first = *self.first_ts.get_or_insert(ts);
            self.timestamps.push(ts);
            self.min_ts = Some(self.min_ts.map_or(ts, |min| min.min(ts)));
            self.max_ts = Some(self.max_ts.map_or(ts, |max| max.max(ts)));
            (ts - first).max(0.0)
        })
    }

    fn update_conversation(&mut self, frame: &DecodedFrame, timestamp: Option<f64>, caplen: u32) {
        if frame.source.is_empty() || frame.destination.is_empty() {
            return;
        }
        let key = canonical_pair(&frame.source, &frame.destination);
        let state = self
            .conversations
            .entry(key)
            .or_insert_with(|| ConversationState {
                protocol: frame.protocol.clone(),
                packet_count: 0,
                total_bytes: 0,
                start_time: None,
                end_time: None,
            });
        state.packet_count += 1;
        state.total_bytes += caplen as u64;
        if let Some(ts) = timestamp {
            state.start_time = Some(state.start_time.map_or(ts, |start| start.min(ts)));
            state.end_time = Some(state.end_time.map_or(ts, |end| end.max(ts)));
        }
    }

    /// Close the pass and compute the derived statistics
    pub fn finalize(self, time_buckets: usize) -> Aggregates {
        let total = self.total_packets;
        let duration = match (self.min_ts, self.max_ts) {
            (Some(min), Some(max)) => (max - min).max(0.0),
            _ => 0.0,
        };

        let mut sorted = self.sizes;
        sorted.sort_unstable();
        let (avg_packet_size, median_packet_size, min_packet_size, max_packet_size) =
            if sorted.is_empty() {
                (0.0, 0.0, 0, 0)
            } else {
                let avg = self.total_bytes as f64 / sorted.len() as f64;
                let mid = sorted.len() / 2;
                let median = if sorted.len() % 2 == 0 {
                    (sorted[mid - 1] as f64 + sorted[mid] as f64) / 2.0
                } else {
                    sorted[mid] as f64
                };
                (avg, median, sorted[0], sorted[sorted.len() - 1])
            };

        let buckets = time_buckets.clamp(10, 20);
        let width = duration / buckets as f64;
        let mut time_series: Vec<TimeBucket> = (0..buckets)
            .map(|idx| TimeBucket {
                offset: idx as f64 * width,
                count: 0,
            })
            .collect();
        if let Some(min) = self.min_ts {
            if duration > 0.0 {
                for &ts in &self.timestamps {
                    let idx = (((ts - min) / width) as usize).min(buckets - 1);
                    time_series[idx].count += 1;
                }
            } else {
                // all timestamps identical: everything lands in the first bucket
                time_series[0].count = self.timestamps.len() as u64;
            }
        }

        let mut protocol_distribution: Vec<ProtocolShare> = self
            .protocol_counts
            .iter()
            .map(|(protocol, &count)| ProtocolShare {
                protocol: protocol.clone(),
                count,
                fraction: if total > 0 {
                    count as f64 / total as f64
                } else {
                    0.0
                },
            })
            .collect();
        protocol_distribution
            .sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.protocol.cmp(&b.protocol)));

        let protocols = self.protocol_counts.keys().cloned().collect();
        let ip_addresses: BTreeSet<String> =
            self.ip_addresses.iter().map(IpAddr::to_string).collect();

        let conversations = self
            .conversations
            .into_iter()
            .map(|((endpoint_a, endpoint_b), state)| ConversationRecord {
                endpoint_a,
                endpoint_b,
                protocol: state.protocol,
                packet_count: state.packet_count,
                total_bytes: state.total_bytes,
                start_time: state.start_time.unwrap_or(0.0),
                end_time: state.end_time.unwrap_or(0.0),
            })
            .collect();

        let summary = CaptureSummary {
            total_packets: total,
            total_bytes: self.total_bytes,
            duration,
            packets_per_second: total as f64 / duration.max(0.001),
            avg_packet_size,
            median_packet_size,
            min_packet_size,
            max_packet_size,
            unique_ips: self.ip_addresses.len(),
            protocol_distribution,
            time_series,
        };

        Aggregates {
            summary,
            conversations,
            protocols,
            ip_addresses,
        }
    }
}
