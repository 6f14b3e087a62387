use serde::Serialize;

/// Bidirectional traffic aggregate between two endpoints
///
/// The endpoint pair is unordered: packets in either direction accumulate
/// into the same conversation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConversationRecord {
    /// Lexicographically smaller endpoint of the pair
    pub endpoint_a: String,
    /// Lexicographically larger endpoint of the pair
    pub endpoint_b: String,
    /// Protocol of the first packet seen for the pair
    pub protocol: String,
    pub packet_count: u64,
    /// Sum of captured lengths, in bytes
    pub total_bytes: u64,
    /// Timestamp of the first timestamped packet, 0 when none carried one
    pub start_time: f64,
    /// Timestamp of the last timestamped packet, 0 when none carried one
    pub end_time: f64,
}

/// Canonical unordered endpoint pair, smaller endpoint first
pub(crate) fn canonical_pair(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_is_direction_independent() {
        let ab = canonical_pair("10.0.0.1:80", "10.0.0.2:49152");
        let ba = canonical_pair("10.0.0.2:49152", "10.0.0.1:80");
        assert_eq!(ab, ba);
        assert_eq!(ab.0, "10.0.0.1:80");
    }
}
