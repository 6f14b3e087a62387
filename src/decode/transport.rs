use crate::decode::layer::{DecodedLayer, IcmpInfo, TcpFlags, TcpInfo, UdpInfo};
use crate::decode::{application, push_port, DecodedFrame};

/// Decode the transport layer, dispatching on the IP protocol number
pub(crate) fn decode_transport(frame: &mut DecodedFrame, protocol: u8, data: &[u8]) {
    match protocol {
        6 => decode_tcp(frame, data),
        17 => decode_udp(frame, data),
        1 => decode_icmp(frame, data),
        58 => decode_icmpv6(frame, data),
        _ => (),
    }
}

fn is_v6(frame: &DecodedFrame) -> bool {
    matches!(frame.src_ip, Some(std::net::IpAddr::V6(_)))
}

fn decode_tcp(frame: &mut DecodedFrame, data: &[u8]) {
    if data.len() < 20 {
        frame.info = "truncated TCP header".to_string();
        return;
    }
    let src_port = u16::from_be_bytes([data[0], data[1]]);
    let dst_port = u16::from_be_bytes([data[2], data[3]]);
    let seq = u32::from_be_bytes([data[4], data[5], data[6], data[7]]);
    let ack = u32::from_be_bytes([data[8], data[9], data[10], data[11]]);
    let header_len = (data[12] >> 4) * 4;
    let flags = TcpFlags::from_bits(data[13]);
    let window = u16::from_be_bytes([data[14], data[15]]);

    let v6 = is_v6(frame);
    push_port(&mut frame.source, v6, src_port);
    push_port(&mut frame.destination, v6, dst_port);
    frame.info = format!(
        "{} → {} {} Seq={} Ack={} Win={}",
        src_port,
        dst_port,
        flags.label(),
        seq,
        ack,
        window
    );
    if src_port == 80 || dst_port == 80 {
        frame.protocol = "HTTP".to_string();
    } else if src_port == 443 || dst_port == 443 {
        frame.protocol = "HTTPS".to_string();
    }
    frame.layers.push(DecodedLayer::Tcp(TcpInfo {
        src_port,
        dst_port,
        seq,
        ack,
        header_len,
        flags,
        window,
    }));

    let header_len = header_len as usize;
    if header_len >= 20 && data.len() > header_len {
        application::classify_tcp(frame, src_port, dst_port, &data[header_len..]);
    }
}

fn decode_udp(frame: &mut DecodedFrame, data: &[u8]) {
    if data.len() < 8 {
        frame.info = "truncated UDP header".to_string();
        return;
    }
    let src_port = u16::from_be_bytes([data[0], data[1]]);
    let dst_port = u16::from_be_bytes([data[2], data[3]]);
    let length = u16::from_be_bytes([data[4], data[5]]);

    let v6 = is_v6(frame);
    push_port(&mut frame.source, v6, src_port);
    push_port(&mut frame.destination, v6, dst_port);
    frame.info = format!("{} → {} Len={}", src_port, dst_port, length);
    if src_port == 53 || dst_port == 53 {
        frame.protocol = "DNS".to_string();
    }
    frame.layers.push(DecodedLayer::Udp(UdpInfo {
        src_port,
        dst_port,
        length,
    }));

    application::classify_udp(frame, src_port, dst_port, &data[8..]);
}

/// ICMP type/code description, Wireshark style
fn icmp_description(icmp_type: u8, code: u8) -> String {
    match (icmp_type, code) {
        (0, _) => "Echo (ping) reply".to_string(),
        (3, 0) => "Destination unreachable (Network unreachable)".to_string(),
        (3, 1) => "Destination unreachable (Host unreachable)".to_string(),
        (3, 2) => "Destination unreachable (Protocol unreachable)".to_string(),
        (3, 3) => "Destination unreachable (Port unreachable)".to_string(),
        (3, 4) => "Destination unreachable (Fragmentation needed)".to_string(),
        (3, c) => format!("Destination unreachable (Code {})", c),
        (5, _) => "Redirect".to_string(),
        (8, _) => "Echo (ping) request".to_string(),
        (11, 0) => "Time exceeded (Time to live exceeded in transit)".to_string(),
        (11, 1) => "Time exceeded (Fragment reassembly time exceeded)".to_string(),
        (t, c) => format!("ICMP Type {}, Code {}", t, c),
    }
}

fn icmpv6_description(icmp_type: u8, code: u8) -> String {
    match icmp_type {
        1 => "Destination unreachable".to_string(),
        3 => "Time exceeded".to_string(),
        128 => "Echo (ping) request".to_string(),
        129 => "Echo (ping) reply".to_string(),
        133 => "Router Solicitation".to_string(),
        134 => "Router Advertisement".to_string(),
        135 => "Neighbor Solicitation".to_string(),
        136 => "Neighbor Advertisement".to_string(),
        t => format!("ICMPv6 Type {}, Code {}", t, code),
    }
}

fn decode_icmp(frame: &mut DecodedFrame, data: &[u8]) {
    if data.len() < 4 {
        frame.info = "truncated ICMP header".to_string();
        return;
    }
    let icmp_type = data[0];
    let code = data[1];
    let description = icmp_description(icmp_type, code);
    frame.info = description.clone();
    frame.layers.push(DecodedLayer::Icmp(IcmpInfo {
        icmp_type,
        code,
        description,
    }));
}

fn decode_icmpv6(frame: &mut DecodedFrame, data: &[u8]) {
    if data.len() < 4 {
        frame.info = "truncated ICMPv6 header".to_string();
        return;
    }
    let icmp_type = data[0];
    let code = data[1];
    let description = icmpv6_description(icmp_type, code);
    frame.info = description.clone();
    frame.layers.push(DecodedLayer::Icmpv6(IcmpInfo {
        icmp_type,
        code,
        description,
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icmp_descriptions() {
        assert_eq!(icmp_description(8, 0), "Echo (ping) request");
        assert_eq!(icmp_description(0, 0), "Echo (ping) reply");
        assert_eq!(
            icmp_description(3, 3),
            "Destination unreachable (Port unreachable)"
        );
        assert_eq!(icmp_description(42, 7), "ICMP Type 42, Code 7");
        assert_eq!(icmpv6_description(135, 0), "Neighbor Solicitation");
        assert_eq!(icmpv6_description(200, 1), "ICMPv6 Type 200, Code 1");
    }

    #[test]
    fn tcp_info_format() {
        let mut frame = DecodedFrame::default();
        frame.source = "10.0.0.1".to_string();
        frame.destination = "10.0.0.2".to_string();
        let mut data = Vec::new();
        data.extend_from_slice(&49152u16.to_be_bytes());
        data.extend_from_slice(&9000u16.to_be_bytes());
        data.extend_from_slice(&100u32.to_be_bytes());
        data.extend_from_slice(&0u32.to_be_bytes());
        data.push(5 << 4);
        data.push(0x02); // SYN
        data.extend_from_slice(&64240u16.to_be_bytes());
        data.extend_from_slice(&[0u8; 4]); // checksum, urgent
        decode_tcp(&mut frame, &data);
        assert_eq!(frame.source, "10.0.0.1:49152");
        assert_eq!(frame.destination, "10.0.0.2:9000");
        assert_eq!(frame.info, "49152 → 9000 [SYN] Seq=100 Ack=0 Win=64240");
        assert!(frame.protocol.is_empty());
    }

    #[test]
    fn port_80_is_labeled_http() {
        let mut frame = DecodedFrame::default();
        let mut data = Vec::new();
        data.extend_from_slice(&49152u16.to_be_bytes());
        data.extend_from_slice(&80u16.to_be_bytes());
        data.extend_from_slice(&[0u8; 8]);
        data.push(5 << 4);
        data.push(0x10);
        data.extend_from_slice(&[0u8; 6]);
        decode_tcp(&mut frame, &data);
        assert_eq!(frame.protocol, "HTTP");
    }
}
