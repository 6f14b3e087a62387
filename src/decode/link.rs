use std::convert::TryInto;
use std::net::Ipv4Addr;

use crate::decode::layer::{ArpInfo, DecodedLayer, EthernetInfo, MacAddr};
use crate::decode::{network, DecodedFrame};
use crate::linktype::Linktype;

const ETHERTYPE_IPV4: u16 = 0x0800;
const ETHERTYPE_ARP: u16 = 0x0806;
const ETHERTYPE_IPV6: u16 = 0x86DD;

/// Decode the link layer of a frame, dispatching on the capture link type
pub(crate) fn decode_link(frame: &mut DecodedFrame, linktype: Linktype, data: &[u8]) {
    match linktype {
        Linktype::ETHERNET => decode_ethernet(frame, data),
        Linktype::RAW => {
            // no link header: guess the IP version from the first nibble
            match data.first().map(|b| b >> 4) {
                Some(4) => network::decode_ipv4(frame, data),
                Some(6) => network::decode_ipv6(frame, data),
                _ => frame.info = "raw frame with no recognizable IP header".to_string(),
            }
        }
        Linktype::IPV4 => network::decode_ipv4(frame, data),
        Linktype::IPV6 => network::decode_ipv6(frame, data),
        _ => {
            frame.protocol = format!("Link-type {}", linktype.0);
            frame.info = format!("link type {} is not decoded", linktype.0);
        }
    }
}

fn decode_ethernet(frame: &mut DecodedFrame, data: &[u8]) {
    if data.len() < 14 {
        frame.info = "truncated Ethernet frame".to_string();
        return;
    }
    let destination = MacAddr(data[0..6].try_into().unwrap_or([0; 6]));
    let source = MacAddr(data[6..12].try_into().unwrap_or([0; 6]));
    let ethertype = u16::from_be_bytes([data[12], data[13]]);
    frame.source = source.to_string();
    frame.destination = destination.to_string();
    frame.layers.push(DecodedLayer::Ethernet(EthernetInfo {
        destination,
        source,
        ethertype,
    }));
    let payload = &data[14..];
    match ethertype {
        ETHERTYPE_IPV4 => network::decode_ipv4(frame, payload),
        ETHERTYPE_IPV6 => network::decode_ipv6(frame, payload),
        ETHERTYPE_ARP => decode_arp(frame, payload),
        _ => {
            frame.protocol = format!("EtherType 0x{:04X}", ethertype);
            frame.info = format!("Ethernet II, type 0x{:04X}", ethertype);
        }
    }
}

fn decode_arp(frame: &mut DecodedFrame, data: &[u8]) {
    if data.len() < 28 {
        frame.protocol = "ARP".to_string();
        frame.info = "truncated ARP message".to_string();
        return;
    }
    let hardware_type = u16::from_be_bytes([data[0], data[1]]);
    let protocol_type = u16::from_be_bytes([data[2], data[3]]);
    let operation = u16::from_be_bytes([data[6], data[7]]);
    let sender_mac = MacAddr(data[8..14].try_into().unwrap_or([0; 6]));
    let sender_ip = Ipv4Addr::new(data[14], data[15], data[16], data[17]);
    let target_mac = MacAddr(data[18..24].try_into().unwrap_or([0; 6]));
    let target_ip = Ipv4Addr::new(data[24], data[25], data[26], data[27]);

    frame.protocol = "ARP".to_string();
    frame.info = match operation {
        1 => format!("Who has {}? Tell {}", target_ip, sender_ip),
        2 => format!("{} is at {}", sender_ip, sender_mac),
        op => format!("ARP operation {}", op),
    };
    frame.layers.push(DecodedLayer::Arp(ArpInfo {
        hardware_type,
        protocol_type,
        operation,
        sender_mac,
        sender_ip,
        target_mac,
        target_ip,
    }));
}
