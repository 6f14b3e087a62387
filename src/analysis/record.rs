use serde::Serialize;

use crate::decode::DecodedLayer;

/// Fully decoded, immutable description of one captured packet
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PacketRecord {
    /// Input-order sequence number, unique and monotonically increasing
    pub sequence_number: u64,
    /// Absolute capture timestamp in seconds, `None` when the container
    /// carries no timing information (simple packet blocks)
    pub timestamp: Option<f64>,
    /// Seconds since the first timestamped packet of the capture
    pub relative_time: Option<f64>,
    /// Number of octets present in the capture
    pub caplen: u32,
    /// Length of the packet as seen on the wire
    pub origlen: u32,
    /// Source endpoint label (MAC, IP or IP:port, best available)
    pub source: String,
    /// Destination endpoint label
    pub destination: String,
    /// Most specific protocol recognized
    pub protocol: String,
    /// One-line summary of the most specific layer
    pub info: String,
    /// Decoded layers, lowest first
    pub layers: Vec<DecodedLayer>,
    /// First bytes of the captured data, as space-separated hex octets
    pub hex_preview: String,
}

impl PacketRecord {
    /// Ordered layer trace, lowest layer first
    pub fn layer_names(&self) -> Vec<&'static str> {
        self.layers.iter().map(DecodedLayer::name).collect()
    }
}

/// Render the first `limit` bytes as a lowercase hex preview
pub(crate) fn hex_preview(data: &[u8], limit: usize) -> String {
    let mut out = String::with_capacity(3 * limit.min(data.len()));
    for (idx, byte) in data.iter().take(limit).enumerate() {
        if idx > 0 {
            out.push(' ');
        }
        out.push_str(&format!("{:02x}", byte));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_preview_format() {
        assert_eq!(hex_preview(&[0xde, 0xad, 0xbe, 0xef], 64), "de ad be ef");
        assert_eq!(hex_preview(&[0x00, 0x0a, 0xff], 2), "00 0a");
        assert_eq!(hex_preview(&[], 64), "");
    }
}
