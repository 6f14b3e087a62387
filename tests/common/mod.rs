//! Synthetic capture builders shared by the integration tests
#![allow(dead_code)]

pub const SRC_MAC: [u8; 6] = [0x11, 0x22, 0x33, 0x44, 0x55, 0x66];
pub const DST_MAC: [u8; 6] = [0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff];

// ---- classic PCAP -------------------------------------------------------

/// 24-byte little-endian global header
pub fn classic_header_le(linktype: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(24);
    out.extend_from_slice(&[0xd4, 0xc3, 0xb2, 0xa1]);
    out.extend_from_slice(&2u16.to_le_bytes());
    out.extend_from_slice(&4u16.to_le_bytes());
    out.extend_from_slice(&0i32.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&0xffffu32.to_le_bytes());
    out.extend_from_slice(&linktype.to_le_bytes());
    out
}

/// 24-byte big-endian global header
pub fn classic_header_be(linktype: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(24);
    out.extend_from_slice(&[0xa1, 0xb2, 0xc3, 0xd4]);
    out.extend_from_slice(&2u16.to_be_bytes());
    out.extend_from_slice(&4u16.to_be_bytes());
    out.extend_from_slice(&0i32.to_be_bytes());
    out.extend_from_slice(&0u32.to_be_bytes());
    out.extend_from_slice(&0xffffu32.to_be_bytes());
    out.extend_from_slice(&linktype.to_be_bytes());
    out
}

/// One little-endian record, caplen == origlen == data length
pub fn classic_record_le(ts_sec: u32, ts_usec: u32, data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(16 + data.len());
    out.extend_from_slice(&ts_sec.to_le_bytes());
    out.extend_from_slice(&ts_usec.to_le_bytes());
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out.extend_from_slice(data);
    out
}

/// One big-endian record, caplen == origlen == data length
pub fn classic_record_be(ts_sec: u32, ts_usec: u32, data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(16 + data.len());
    out.extend_from_slice(&ts_sec.to_be_bytes());
    out.extend_from_slice(&ts_usec.to_be_bytes());
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(data);
    out
}

// ---- PCAP-NG ------------------------------------------------------------

fn pad32(out: &mut Vec<u8>) {
    while out.len() % 4 != 0 {
        out.push(0);
    }
}

/// Section header block, little-endian body
pub fn ng_shb_le() -> Vec<u8> {
    let mut out = Vec::with_capacity(28);
    out.extend_from_slice(&0x0a0d_0d0au32.to_le_bytes());
    out.extend_from_slice(&28u32.to_le_bytes());
    out.extend_from_slice(&0x1a2b_3c4du32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&(-1i64).to_le_bytes());
    out.extend_from_slice(&28u32.to_le_bytes());
    out
}

/// Section header block, big-endian body (framing stays little-endian)
pub fn ng_shb_be() -> Vec<u8> {
    let mut out = Vec::with_capacity(28);
    out.extend_from_slice(&0x0a0d_0d0au32.to_le_bytes());
    out.extend_from_slice(&28u32.to_le_bytes());
    out.extend_from_slice(&0x1a2b_3c4du32.to_be_bytes());
    out.extend_from_slice(&1u16.to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes());
    out.extend_from_slice(&(-1i64).to_be_bytes());
    out.extend_from_slice(&28u32.to_le_bytes());
    out
}

/// Section header block with a corrupt byte-order magic
pub fn ng_shb_bad_bom() -> Vec<u8> {
    let mut out = ng_shb_le();
    out[8..12].copy_from_slice(&[0x01, 0x02, 0x03, 0x04]);
    out
}

/// Interface description block without options
pub fn ng_idb_le(linktype: u16, snaplen: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(20);
    out.extend_from_slice(&1u32.to_le_bytes());
    out.extend_from_slice(&20u32.to_le_bytes());
    out.extend_from_slice(&linktype.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&snaplen.to_le_bytes());
    out.extend_from_slice(&20u32.to_le_bytes());
    out
}

/// Interface description block carrying an `if_tsresol` option
pub fn ng_idb_le_with_tsresol(linktype: u16, snaplen: u32, tsresol: u8) -> Vec<u8> {
    let mut out = Vec::with_capacity(28);
    out.extend_from_slice(&1u32.to_le_bytes());
    out.extend_from_slice(&28u32.to_le_bytes());
    out.extend_from_slice(&linktype.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&snaplen.to_le_bytes());
    out.extend_from_slice(&9u16.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&[tsresol, 0, 0, 0]);
    out.extend_from_slice(&28u32.to_le_bytes());
    out
}

/// Interface description block carrying `if_tsresol` and `if_tsoffset`
pub fn ng_idb_le_with_ts_options(
    linktype: u16,
    snaplen: u32,
    tsresol: u8,
    tsoffset: i64,
) -> Vec<u8> {
    let mut out = Vec::with_capacity(40);
    out.extend_from_slice(&1u32.to_le_bytes());
    out.extend_from_slice(&40u32.to_le_bytes());
    out.extend_from_slice(&linktype.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&snaplen.to_le_bytes());
    out.extend_from_slice(&9u16.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&[tsresol, 0, 0, 0]);
    out.extend_from_slice(&14u16.to_le_bytes());
    out.extend_from_slice(&8u16.to_le_bytes());
    out.extend_from_slice(&tsoffset.to_le_bytes());
    out.extend_from_slice(&40u32.to_le_bytes());
    out
}

/// Interface description block, big-endian body
pub fn ng_idb_be(linktype: u16, snaplen: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(20);
    out.extend_from_slice(&1u32.to_le_bytes());
    out.extend_from_slice(&20u32.to_le_bytes());
    out.extend_from_slice(&linktype.to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes());
    out.extend_from_slice(&snaplen.to_be_bytes());
    out.extend_from_slice(&20u32.to_le_bytes());
    out
}

/// Enhanced packet block without options, little-endian body
pub fn ng_epb_le(if_id: u32, ts: u64, data: &[u8]) -> Vec<u8> {
    let padded = (data.len() + 3) & !3;
    let total = (32 + padded) as u32;
    let mut out = Vec::with_capacity(total as usize);
    out.extend_from_slice(&6u32.to_le_bytes());
    out.extend_from_slice(&total.to_le_bytes());
    out.extend_from_slice(&if_id.to_le_bytes());
    out.extend_from_slice(&((ts >> 32) as u32).to_le_bytes());
    out.extend_from_slice(&(ts as u32).to_le_bytes());
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out.extend_from_slice(data);
    pad32(&mut out);
    out.extend_from_slice(&total.to_le_bytes());
    out
}

/// Enhanced packet block without options, big-endian body
pub fn ng_epb_be(if_id: u32, ts: u64, data: &[u8]) -> Vec<u8> {
    let padded = (data.len() + 3) & !3;
    let total = (32 + padded) as u32;
    let mut out = Vec::with_capacity(total as usize);
    out.extend_from_slice(&6u32.to_le_bytes());
    out.extend_from_slice(&total.to_le_bytes());
    out.extend_from_slice(&if_id.to_be_bytes());
    out.extend_from_slice(&((ts >> 32) as u32).to_be_bytes());
    out.extend_from_slice(&(ts as u32).to_be_bytes());
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(data);
    pad32(&mut out);
    out.extend_from_slice(&total.to_le_bytes());
    out
}

/// Simple packet block, little-endian body
pub fn ng_spb_le(origlen: u32, data: &[u8]) -> Vec<u8> {
    let padded = (data.len() + 3) & !3;
    let total = (16 + padded) as u32;
    let mut out = Vec::with_capacity(total as usize);
    out.extend_from_slice(&3u32.to_le_bytes());
    out.extend_from_slice(&total.to_le_bytes());
    out.extend_from_slice(&origlen.to_le_bytes());
    out.extend_from_slice(data);
    pad32(&mut out);
    out.extend_from_slice(&total.to_le_bytes());
    out
}

/// Block of an arbitrary type, skipped by the engine
pub fn ng_unknown_le(block_type: u32, body: &[u8]) -> Vec<u8> {
    let padded = (body.len() + 3) & !3;
    let total = (12 + padded) as u32;
    let mut out = Vec::with_capacity(total as usize);
    out.extend_from_slice(&block_type.to_le_bytes());
    out.extend_from_slice(&total.to_le_bytes());
    out.extend_from_slice(body);
    pad32(&mut out);
    out.extend_from_slice(&total.to_le_bytes());
    out
}

// ---- frames -------------------------------------------------------------

/// Ethernet II frame with the fixed test MAC addresses
pub fn eth_frame(ethertype: u16, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(14 + payload.len());
    out.extend_from_slice(&DST_MAC);
    out.extend_from_slice(&SRC_MAC);
    out.extend_from_slice(&ethertype.to_be_bytes());
    out.extend_from_slice(payload);
    out
}

/// Minimal IPv4 packet, no options
pub fn ipv4_packet(protocol: u8, src: [u8; 4], dst: [u8; 4], payload: &[u8]) -> Vec<u8> {
    let total_len = (20 + payload.len()) as u16;
    let mut out = Vec::with_capacity(total_len as usize);
    out.push(0x45);
    out.push(0);
    out.extend_from_slice(&total_len.to_be_bytes());
    out.extend_from_slice(&[0, 0, 0, 0]);
    out.push(64);
    out.push(protocol);
    out.extend_from_slice(&[0, 0]);
    out.extend_from_slice(&src);
    out.extend_from_slice(&dst);
    out.extend_from_slice(payload);
    out
}

/// TCP segment, header length 20
pub fn tcp_segment(src_port: u16, dst_port: u16, flags: u8, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(20 + payload.len());
    out.extend_from_slice(&src_port.to_be_bytes());
    out.extend_from_slice(&dst_port.to_be_bytes());
    out.extend_from_slice(&1u32.to_be_bytes());
    out.extend_from_slice(&0u32.to_be_bytes());
    out.push(5 << 4);
    out.push(flags);
    out.extend_from_slice(&64240u16.to_be_bytes());
    out.extend_from_slice(&[0, 0, 0, 0]);
    out.extend_from_slice(payload);
    out
}

/// UDP datagram
pub fn udp_datagram(src_port: u16, dst_port: u16, payload: &[u8]) -> Vec<u8> {
    let length = (8 + payload.len()) as u16;
    let mut out = Vec::with_capacity(length as usize);
    out.extend_from_slice(&src_port.to_be_bytes());
    out.extend_from_slice(&dst_port.to_be_bytes());
    out.extend_from_slice(&length.to_be_bytes());
    out.extend_from_slice(&[0, 0]);
    out.extend_from_slice(payload);
    out
}

/// 8-byte ICMP echo message
pub fn icmp_echo(icmp_type: u8) -> Vec<u8> {
    vec![icmp_type, 0, 0, 0, 0, 1, 0, 1]
}

/// 28-byte ARP request ("Who has target? Tell sender")
pub fn arp_request(sender_ip: [u8; 4], target_ip: [u8; 4]) -> Vec<u8> {
    let mut out = Vec::with_capacity(28);
    out.extend_from_slice(&1u16.to_be_bytes());
    out.extend_from_slice(&0x0800u16.to_be_bytes());
    out.push(6);
    out.push(4);
    out.extend_from_slice(&1u16.to_be_bytes());
    out.extend_from_slice(&SRC_MAC);
    out.extend_from_slice(&sender_ip);
    out.extend_from_slice(&[0u8; 6]);
    out.extend_from_slice(&target_ip);
    out
}

/// Ethernet + IPv4 + TCP frame
pub fn eth_ipv4_tcp(
    src: [u8; 4],
    dst: [u8; 4],
    src_port: u16,
    dst_port: u16,
    flags: u8,
    payload: &[u8],
) -> Vec<u8> {
    eth_frame(
        0x0800,
        &ipv4_packet(6, src, dst, &tcp_segment(src_port, dst_port, flags, payload)),
    )
}

/// Ethernet + IPv4 + UDP frame
pub fn eth_ipv4_udp(
    src: [u8; 4],
    dst: [u8; 4],
    src_port: u16,
    dst_port: u16,
    payload: &[u8],
) -> Vec<u8> {
    eth_frame(
        0x0800,
        &ipv4_packet(17, src, dst, &udp_datagram(src_port, dst_port, payload)),
    )
}

/// 42-byte Ethernet + IPv4 + ICMP echo frame
pub fn eth_ipv4_icmp(src: [u8; 4], dst: [u8; 4], icmp_type: u8) -> Vec<u8> {
    eth_frame(0x0800, &ipv4_packet(1, src, dst, &icmp_echo(icmp_type)))
}

/// First query of a DNS request for `example.com`, type A
pub fn dns_query_payload() -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&0x1234u16.to_be_bytes());
    out.extend_from_slice(&0x0100u16.to_be_bytes());
    out.extend_from_slice(&1u16.to_be_bytes());
    out.extend_from_slice(&[0u8; 6]);
    out.push(7);
    out.extend_from_slice(b"example");
    out.push(3);
    out.extend_from_slice(b"com");
    out.push(0);
    out.extend_from_slice(&1u16.to_be_bytes());
    out.extend_from_slice(&1u16.to_be_bytes());
    out
}
