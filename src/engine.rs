//! Capture analysis engine
//!
//! Drives a streaming reader over a whole capture, decodes every packet and
//! aggregates the results into a [`CaptureAnalysis`]. The engine is where
//! the tolerance policy lives: only an unusable container header is a hard
//! error, every later anomaly degrades, skips or stops early while keeping
//! the records parsed so far.

use std::collections::BTreeSet;
use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::analysis::{
    hex_preview, Accumulator, CaptureSummary, ConversationRecord, PacketRecord,
};
use crate::blocks::CaptureBlockOwned;
use crate::capture::create_reader;
use crate::decode::decode_frame;
use crate::error::{AnalysisError, CaptureError};
use crate::linktype::Linktype;
use crate::pcapng::NgBlock;
use crate::traits::{CaptureIterator, NgPacketBlock};

/// Bytes of captured data rendered into each record's hex preview
const HEX_PREVIEW_BYTES: usize = 64;

/// Upper bound for the parse buffer when growing to fit a large block
const GROW_LIMIT: usize = 0x0800_0000;

/// Tuning knobs of the analysis engine
#[derive(Clone, Debug)]
pub struct AnalyzerConfig {
    /// Maximum number of detailed [`PacketRecord`]s kept in the result.
    /// Statistics always cover every scanned packet.
    pub packet_detail_limit: usize,
    /// Number of buckets of the time-series histogram, clamped to `10..=20`
    pub time_buckets: usize,
    /// Timestamp resolution, in units per second, applied to enhanced
    /// packet blocks when no interface description is available; zero is
    /// read as one unit per second
    pub default_ts_resolution: u64,
    /// Initial capacity of the parse buffer, in bytes
    pub buffer_capacity: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        AnalyzerConfig {
            packet_detail_limit: 1000,
            time_buckets: 16,
            default_ts_resolution: 1_000_000,
            buffer_capacity: 65536,
        }
    }
}

/// Description of one capture interface of a PCAP-NG section
///
/// Built from Interface Description Blocks in arrival order, and looked up
/// by index when decoding Enhanced Packet Block timestamps. The table lives
/// for one parse pass.
#[derive(Clone, Copy, Debug)]
pub struct InterfaceDescriptor {
    /// Position in the section, in arrival order
    pub index: usize,
    /// Link-layer type of the frames captured on this interface
    pub linktype: Linktype,
    /// Maximum number of octets captured per packet
    pub snaplen: u32,
    /// Timestamp resolution, in units per second
    pub ts_resolution: u64,
    /// Timestamp offset, in seconds
    pub ts_offset: u64,
}

/// Complete result of one capture analysis
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CaptureAnalysis {
    /// Whole-capture statistics, covering every scanned packet
    pub summary: CaptureSummary,
    /// Retained per-packet records, in input order, capped by
    /// [`AnalyzerConfig::packet_detail_limit`]
    pub packets: Vec<PacketRecord>,
    /// Distinct protocol labels seen
    pub protocols: BTreeSet<String>,
    /// Conversation table, one record per unordered endpoint pair
    pub conversations: Vec<ConversationRecord>,
    /// Distinct network-layer addresses seen, stripped of ports
    pub ip_addresses: BTreeSet<String>,
    /// True when more packets were scanned than retained
    pub detail_truncated: bool,
}

/// Analyze a capture held in memory, with the default configuration
///
/// ## Example
///
/// ```rust
/// use capsight::analyze;
///
/// // classic little-endian capture with a single empty record
/// let mut capture = vec![
///     0xd4, 0xc3, 0xb2, 0xa1, 0x02, 0x00, 0x04, 0x00,
///     0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
///     0xff, 0xff, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00,
/// ];
/// capture.extend_from_slice(&[0u8; 16]);
///
/// let analysis = analyze(&capture).expect("analysis");
/// assert_eq!(analysis.summary.total_packets, 1);
/// ```
pub fn analyze(input: &[u8]) -> Result<CaptureAnalysis, AnalysisError> {
    CaptureAnalyzer::new().analyze(input)
}

/// Configurable, reusable capture analyzer
///
/// One analyzer can run any number of independent analyses; it keeps no
/// state between runs apart from its configuration and the optional
/// cancellation flag.
#[derive(Clone, Debug, Default)]
pub struct CaptureAnalyzer {
    config: AnalyzerConfig,
    cancel: Option<Arc<AtomicBool>>,
}

impl CaptureAnalyzer {
    /// Create an analyzer with the default configuration
    pub fn new() -> CaptureAnalyzer {
        CaptureAnalyzer::default()
    }

    /// Create an analyzer with the provided configuration
    pub fn with_config(config: AnalyzerConfig) -> CaptureAnalyzer {
        CaptureAnalyzer {
            config,
            cancel: None,
        }
    }

    /// Install a cooperative cancellation flag
    ///
    /// The flag is checked between records. Once set, the run stops and
    /// finalizes whatever was accumulated into a normal result.
    pub fn set_cancel_flag(&mut self, flag: Arc<AtomicBool>) {
        self.cancel = Some(flag);
    }

    /// Analyze a capture held in memory
    pub fn analyze(&self, input: &[u8]) -> Result<CaptureAnalysis, AnalysisError> {
        self.run(input, |_| ())
    }

    /// Analyze a capture held in memory, reporting coarse progress
    ///
    /// The callback receives a fraction in `[0.0, 1.0]`, at most a few
    /// times: at the start, once the container is recognized, and on
    /// completion. It is never called after a terminal error.
    pub fn analyze_with_progress<F>(
        &self,
        input: &[u8],
        progress: F,
    ) -> Result<CaptureAnalysis, AnalysisError>
    where
        F: FnMut(f32),
    {
        self.run(input, progress)
    }

    /// Analyze a capture read from any byte source
    ///
    /// The source is consumed through the streaming readers, so memory usage
    /// stays bounded by the parse buffer regardless of the capture size.
    pub fn analyze_reader<R>(&self, source: R) -> Result<CaptureAnalysis, AnalysisError>
    where
        R: Read,
    {
        self.run(source, |_| ())
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map_or(false, |flag| flag.load(Ordering::Relaxed))
    }

    fn run<R, F>(&self, source: R, mut progress: F) -> Result<CaptureAnalysis, AnalysisError>
    where
        R: Read,
        F: FnMut(f32),
    {
        progress(0.0);
        let mut ctx = ParseContext::new(&self.config);
        let mut reader = match create_reader(self.config.buffer_capacity, source) {
            Ok(reader) => reader,
            Err(CaptureError::BadSectionHeader) => {
                // an invalid byte-order magic makes the whole section
                // unparsable; reported as an empty analysis, not an error
                warn!("invalid section byte-order magic, returning an empty analysis");
                progress(1.0);
                return Ok(ctx.finish());
            }
            Err(e) => return Err(e.into()),
        };
        progress(0.1);
        debug!(format = ?reader.format(), "capture container detected");
        let mut capacity = self.config.buffer_capacity;
        loop {
            if self.is_cancelled() {
                debug!("analysis cancelled, finalizing partial results");
                break;
            }
            match reader.next() {
                Ok((offset, block)) => {
                    ctx.handle_block(block);
                    reader.consume(offset);
                }
                Err(CaptureError::Eof) => break,
                Err(CaptureError::Incomplete(_)) => {
                    if let Err(e) = reader.refill() {
                        warn!(error = %e, "refill failed, keeping records parsed so far");
                        break;
                    }
                }
                Err(CaptureError::BufferTooSmall) => {
                    let doubled = capacity.saturating_mul(2);
                    if doubled > GROW_LIMIT || !reader.grow(doubled) {
                        warn!(capacity, "block exceeds the buffer growth limit, stopping");
                        break;
                    }
                    capacity = doubled;
                    if let Err(e) = reader.refill() {
                        warn!(error = %e, "refill failed, keeping records parsed so far");
                        break;
                    }
                }
                Err(CaptureError::UnexpectedEof) => {
                    debug!("input ends inside a record, keeping records parsed so far");
                    break;
                }
                Err(CaptureError::InvalidRecordLength) => {
                    // realign to the next 16-byte absolute offset and resume
                    let skip = 16 - reader.consumed() % 16;
                    debug!(skip, "corrupt record header, realigning");
                    if !skip_bytes(&mut *reader, skip) {
                        break;
                    }
                }
                Err(e) => {
                    debug!(error = %e, "unparsable block, stopping early");
                    break;
                }
            }
        }
        progress(1.0);
        Ok(ctx.finish())
    }
}

/// Consume `remaining` bytes from the stream, refilling as needed
///
/// Returns false if the stream ends (or fails) before that many bytes
/// could be skipped.
fn skip_bytes(reader: &mut (dyn CaptureIterator + '_), mut remaining: usize) -> bool {
    while remaining > 0 {
        let available = reader.data().len();
        if available == 0 {
            if reader.reader_exhausted() || reader.refill().is_err() {
                return false;
            }
            continue;
        }
        let step = remaining.min(available);
        reader.consume(step);
        remaining -= step;
    }
    true
}

/// Mutable state of one analysis run
struct ParseContext<'a> {
    config: &'a AnalyzerConfig,
    accumulator: Accumulator,
    packets: Vec<PacketRecord>,
    interfaces: Vec<InterfaceDescriptor>,
    classic_linktype: Linktype,
    sequence: u64,
    detail_truncated: bool,
}

impl<'a> ParseContext<'a> {
    fn new(config: &'a AnalyzerConfig) -> ParseContext<'a> {
        ParseContext {
            config,
            accumulator: Accumulator::new(),
            packets: Vec::new(),
            interfaces: Vec::new(),
            classic_linktype: Linktype::ETHERNET,
            sequence: 0,
            detail_truncated: false,
        }
    }

    fn handle_block(&mut self, block: CaptureBlockOwned) {
        match block {
            CaptureBlockOwned::ClassicHeader(header) => {
                trace!(linktype = header.network.0, "classic global header");
                self.classic_linktype = header.network;
            }
            CaptureBlockOwned::Classic(record) => {
                let timestamp = Some(record.timestamp());
                self.record_packet(
                    self.classic_linktype,
                    record.data,
                    timestamp,
                    record.caplen,
                    record.origlen,
                );
            }
            CaptureBlockOwned::Ng(block) => self.handle_ng_block(block),
        }
    }

    fn handle_ng_block(&mut self, block: NgBlock) {
        match block {
            NgBlock::SectionHeader(shb) => {
                trace!(
                    major = shb.major_version,
                    minor = shb.minor_version,
                    big_endian = shb.big_endian(),
                    "section header"
                );
                // interface ids are section-local
                self.interfaces.clear();
            }
            NgBlock::InterfaceDescription(idb) => {
                let ts_resolution = match idb.ts_resolution() {
                    Some(resolution) => resolution,
                    None => {
                        warn!(
                            if_tsresol = idb.if_tsresol,
                            "invalid interface timestamp resolution, using the default"
                        );
                        self.config.default_ts_resolution
                    }
                };
                let descriptor = InterfaceDescriptor {
                    index: self.interfaces.len(),
                    linktype: idb.linktype,
                    snaplen: idb.snaplen,
                    ts_resolution,
                    ts_offset: idb.ts_offset().max(0) as u64,
                };
                trace!(
                    index = descriptor.index,
                    linktype = descriptor.linktype.0,
                    "interface description"
                );
                self.interfaces.push(descriptor);
            }
            NgBlock::EnhancedPacket(epb) => {
                let descriptor = self
                    .interfaces
                    .get(epb.if_id as usize)
                    .or_else(|| self.interfaces.first());
                let (linktype, ts_offset, resolution) = match descriptor {
                    Some(d) => (d.linktype, d.ts_offset, d.ts_resolution),
                    None => (Linktype::ETHERNET, 0, self.config.default_ts_resolution),
                };
                let timestamp = Some(epb.decode_ts_f64(ts_offset, resolution));
                self.record_packet(
                    linktype,
                    epb.packet_data(),
                    timestamp,
                    epb.caplen,
                    epb.origlen,
                );
            }
            NgBlock::SimplePacket(spb) => {
                let linktype = self
                    .interfaces
                    .first()
                    .map_or(Linktype::ETHERNET, |d| d.linktype);
                let data = spb.packet_data();
                self.record_packet(linktype, data, None, data.len() as u32, spb.origlen);
            }
            NgBlock::Unknown(block) => {
                trace!(block_type = block.block_type, "skipping unknown block");
            }
        }
    }

    fn record_packet(
        &mut self,
        linktype: Linktype,
        data: &[u8],
        timestamp: Option<f64>,
        caplen: u32,
        origlen: u32,
    ) {
        let frame = decode_frame(linktype, data);
        let relative_time = self.accumulator.register(&frame, timestamp, caplen);
        if self.packets.len() < self.config.packet_detail_limit {
            let info = if timestamp.is_none() {
                "no timestamp available".to_string()
            } else {
                frame.info
            };
            self.packets.push(PacketRecord {
                sequence_number: self.sequence,
                timestamp,
                relative_time,
                caplen,
                origlen,
                source: frame.source,
                destination: frame.destination,
                protocol: frame.protocol,
                info,
                layers: frame.layers,
                hex_preview: hex_preview(data, HEX_PREVIEW_BYTES),
            });
        } else if !self.detail_truncated {
            debug!(
                limit = self.config.packet_detail_limit,
                "packet detail limit reached, statistics continue over the full capture"
            );
            self.detail_truncated = true;
        }
        self.sequence += 1;
    }

    fn finish(self) -> CaptureAnalysis {
        let aggregates = self.accumulator.finalize(self.config.time_buckets);
        debug!(
            total_packets = aggregates.summary.total_packets,
            retained = self.packets.len(),
            conversations = aggregates.conversations.len(),
            "analysis finished"
        );
        CaptureAnalysis {
            summary: aggregates.summary,
            packets: self.packets,
            protocols: aggregates.protocols,
            conversations: aggregates.conversations,
            ip_addresses: aggregates.ip_addresses,
            detail_truncated: self.detail_truncated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pcap::ClassicRecord;
    use crate::pcapng::SimplePacketBlock;

    fn empty_record(ts_sec: u32) -> ClassicRecord<'static> {
        ClassicRecord {
            ts_sec,
            ts_usec: 0,
            caplen: 0,
            origlen: 0,
            data: &[],
        }
    }

    #[test]
    fn config_defaults() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.packet_detail_limit, 1000);
        assert_eq!(config.time_buckets, 16);
        assert_eq!(config.default_ts_resolution, 1_000_000);
        assert_eq!(config.buffer_capacity, 65536);
    }

    #[test]
    fn detail_cap_keeps_full_statistics() {
        let config = AnalyzerConfig {
            packet_detail_limit: 2,
            ..AnalyzerConfig::default()
        };
        let mut ctx = ParseContext::new(&config);
        for n in 0..5 {
            ctx.handle_block(CaptureBlockOwned::Classic(empty_record(n)));
        }
        let analysis = ctx.finish();
        assert_eq!(analysis.summary.total_packets, 5);
        assert_eq!(analysis.packets.len(), 2);
        assert!(analysis.detail_truncated);
        assert_eq!(analysis.packets[1].sequence_number, 1);
    }

    #[test]
    fn simple_packet_has_no_timestamp() {
        let config = AnalyzerConfig::default();
        let mut ctx = ParseContext::new(&config);
        let spb = SimplePacketBlock {
            block_type: crate::pcapng::SPB_MAGIC,
            block_len1: 20,
            origlen: 4,
            data: &[0x01, 0x02, 0x03, 0x04],
            block_len2: 20,
        };
        ctx.handle_block(CaptureBlockOwned::Ng(NgBlock::SimplePacket(spb)));
        let analysis = ctx.finish();
        assert_eq!(analysis.packets.len(), 1);
        let record = &analysis.packets[0];
        assert_eq!(record.timestamp, None);
        assert_eq!(record.relative_time, None);
        assert_eq!(record.info, "no timestamp available");
        assert_eq!(record.caplen, 4);
    }

    #[test]
    fn sequence_numbers_are_monotonic() {
        let config = AnalyzerConfig::default();
        let mut ctx = ParseContext::new(&config);
        for n in 0..4 {
            ctx.handle_block(CaptureBlockOwned::Classic(empty_record(n)));
        }
        let analysis = ctx.finish();
        let numbers: Vec<u64> = analysis.packets.iter().map(|p| p.sequence_number).collect();
        assert_eq!(numbers, vec![0, 1, 2, 3]);
    }
}
