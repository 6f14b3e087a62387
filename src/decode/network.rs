use std::convert::TryFrom;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use crate::decode::layer::{DecodedLayer, Ipv4Info, Ipv6Info};
use crate::decode::{transport, DecodedFrame};

/// Well-known IP protocol numbers, as shown in protocol labels
pub fn protocol_name(protocol: u8) -> String {
    match protocol {
        1 => "ICMP".to_string(),
        2 => "IGMP".to_string(),
        6 => "TCP".to_string(),
        17 => "UDP".to_string(),
        41 => "IPv6".to_string(),
        47 => "GRE".to_string(),
        50 => "ESP".to_string(),
        51 => "AH".to_string(),
        58 => "ICMPv6".to_string(),
        89 => "OSPF".to_string(),
        103 => "PIM".to_string(),
        132 => "SCTP".to_string(),
        other => format!("Protocol-{}", other),
    }
}

pub(crate) fn decode_ipv4(frame: &mut DecodedFrame, data: &[u8]) {
    if data.len() < 20 {
        frame.info = "truncated IPv4 header".to_string();
        return;
    }
    let version = data[0] >> 4;
    let header_len = (data[0] & 0x0f) * 4;
    let total_len = u16::from_be_bytes([data[2], data[3]]);
    let ttl = data[8];
    let protocol = data[9];
    let source = Ipv4Addr::new(data[12], data[13], data[14], data[15]);
    let destination = Ipv4Addr::new(data[16], data[17], data[18], data[19]);

    frame.source = source.to_string();
    frame.destination = destination.to_string();
    frame.src_ip = Some(IpAddr::V4(source));
    frame.dst_ip = Some(IpAddr::V4(destination));
    frame.protocol = protocol_name(protocol);
    frame.info = format!("{} → {}", source, destination);
    frame.layers.push(DecodedLayer::Ipv4(Ipv4Info {
        version,
        header_len,
        total_len,
        ttl,
        protocol,
        source,
        destination,
    }));

    let header_len = header_len as usize;
    if header_len >= 20 && data.len() >= header_len {
        transport::decode_transport(frame, protocol, &data[header_len..]);
    }
}

pub(crate) fn decode_ipv6(frame: &mut DecodedFrame, data: &[u8]) {
    if data.len() < 40 {
        frame.info = "truncated IPv6 header".to_string();
        return;
    }
    let payload_len = u16::from_be_bytes([data[4], data[5]]);
    let next_header = data[6];
    let hop_limit = data[7];
    let source = Ipv6Addr::from(<[u8; 16]>::try_from(&data[8..24]).unwrap_or([0; 16]));
    let destination = Ipv6Addr::from(<[u8; 16]>::try_from(&data[24..40]).unwrap_or([0; 16]));

    frame.source = source.to_string();
    frame.destination = destination.to_string();
    frame.src_ip = Some(IpAddr::V6(source));
    frame.dst_ip = Some(IpAddr::V6(destination));
    frame.protocol = protocol_name(next_header);
    frame.info = format!("{} → {}", source, destination);
    frame.layers.push(DecodedLayer::Ipv6(Ipv6Info {
        payload_len,
        next_header,
        hop_limit,
        source,
        destination,
    }));

    transport::decode_transport(frame, next_header, &data[40..]);
}
