//! Layered frame decoding
//!
//! Turns the raw bytes of one captured frame into a [`DecodedFrame`]:
//! endpoint labels, a protocol name, a human-readable info string and the
//! ordered list of decoded layers. Decoding starts from the link type of
//! the capture and walks down as far as the bytes allow; a frame that stops
//! matching at some depth keeps everything decoded above it.
//!
//! Decoding is display-oriented and never validates checksums.

mod application;
mod layer;
mod link;
mod network;
mod transport;

pub use layer::*;

use std::net::IpAddr;

use crate::linktype::Linktype;

/// Result of decoding one captured frame through the layer pipeline
#[derive(Debug, Default)]
pub struct DecodedFrame {
    /// Source endpoint label (MAC, IP or IP:port, best available)
    pub source: String,
    /// Destination endpoint label
    pub destination: String,
    /// Most specific protocol name recognized
    pub protocol: String,
    /// One-line summary of the most specific layer
    pub info: String,
    /// Decoded layers, lowest first
    pub layers: Vec<DecodedLayer>,
    /// Network-layer source address, when the frame has one
    pub src_ip: Option<IpAddr>,
    /// Network-layer destination address, when the frame has one
    pub dst_ip: Option<IpAddr>,
}

/// Decode one captured frame, starting from the capture link type
pub fn decode_frame(linktype: Linktype, data: &[u8]) -> DecodedFrame {
    let mut frame = DecodedFrame::default();
    link::decode_link(&mut frame, linktype, data);
    if frame.protocol.is_empty() {
        frame.protocol = match frame.layers.last() {
            Some(layer) => layer.name().to_string(),
            None => "Unknown".to_string(),
        };
    }
    if frame.info.is_empty() {
        frame.info = frame.protocol.clone();
    }
    frame
}

/// Append a transport port to an endpoint label, bracketing IPv6 addresses
pub(crate) fn push_port(endpoint: &mut String, is_v6: bool, port: u16) {
    if is_v6 {
        *endpoint = format!("[{}]:{}", endpoint, port);
    } else {
        endpoint.push_str(&format!(":{}", port));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_frame_is_unknown() {
        let frame = decode_frame(Linktype::ETHERNET, &[]);
        assert_eq!(frame.protocol, "Unknown");
        assert!(frame.layers.is_empty());
    }

    #[test]
    fn port_labels() {
        let mut v4 = "192.168.0.1".to_string();
        push_port(&mut v4, false, 80);
        assert_eq!(v4, "192.168.0.1:80");

        let mut v6 = "fe80::1".to_string();
        push_port(&mut v6, true, 443);
        assert_eq!(v6, "[fe80::1]:443");
    }
}
