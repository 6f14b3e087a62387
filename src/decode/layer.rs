use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use serde::{Serialize, Serializer};

/// Ethernet hardware address
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MacAddr(pub [u8; 6]);

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let b = &self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            b[0], b[1], b[2], b[3], b[4], b[5]
        )
    }
}

impl Serialize for MacAddr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One decoded protocol layer of a captured frame
///
/// Layers are pushed in decode order, lowest first.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "layer", rename_all = "snake_case")]
pub enum DecodedLayer {
    Ethernet(EthernetInfo),
    Arp(ArpInfo),
    Ipv4(Ipv4Info),
    Ipv6(Ipv6Info),
    Tcp(TcpInfo),
    Udp(UdpInfo),
    Icmp(IcmpInfo),
    Icmpv6(IcmpInfo),
    Http(HttpInfo),
    Dns(DnsInfo),
    Tls(TlsInfo),
    Dhcp(DhcpInfo),
}

impl DecodedLayer {
    /// Short layer name, as shown in the layer trace
    pub fn name(&self) -> &'static str {
        match self {
            DecodedLayer::Ethernet(_) => "Ethernet",
            DecodedLayer::Arp(_) => "ARP",
            DecodedLayer::Ipv4(_) => "IPv4",
            DecodedLayer::Ipv6(_) => "IPv6",
            DecodedLayer::Tcp(_) => "TCP",
            DecodedLayer::Udp(_) => "UDP",
            DecodedLayer::Icmp(_) => "ICMP",
            DecodedLayer::Icmpv6(_) => "ICMPv6",
            DecodedLayer::Http(_) => "HTTP",
            DecodedLayer::Dns(_) => "DNS",
            DecodedLayer::Tls(_) => "TLS",
            DecodedLayer::Dhcp(_) => "DHCP",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EthernetInfo {
    pub destination: MacAddr,
    pub source: MacAddr,
    pub ethertype: u16,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ArpInfo {
    pub hardware_type: u16,
    pub protocol_type: u16,
    /// 1 for request, 2 for reply
    pub operation: u16,
    pub sender_mac: MacAddr,
    pub sender_ip: Ipv4Addr,
    pub target_mac: MacAddr,
    pub target_ip: Ipv4Addr,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Ipv4Info {
    pub version: u8,
    /// Header length in bytes, decoded from the IHL field
    pub header_len: u8,
    pub total_len: u16,
    pub ttl: u8,
    pub protocol: u8,
    pub source: Ipv4Addr,
    pub destination: Ipv4Addr,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Ipv6Info {
    pub payload_len: u16,
    pub next_header: u8,
    pub hop_limit: u8,
    pub source: Ipv6Addr,
    pub destination: Ipv6Addr,
}

/// TCP control flags, one bit each
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TcpFlags {
    pub fin: bool,
    pub syn: bool,
    pub rst: bool,
    pub psh: bool,
    pub ack: bool,
    pub urg: bool,
    pub ece: bool,
    pub cwr: bool,
}

impl TcpFlags {
    pub fn from_bits(bits: u8) -> TcpFlags {
        TcpFlags {
            fin: bits & 0x01 != 0,
            syn: bits & 0x02 != 0,
            rst: bits & 0x04 != 0,
            psh: bits & 0x08 != 0,
            ack: bits & 0x10 != 0,
            urg: bits & 0x20 != 0,
            ece: bits & 0x40 != 0,
            cwr: bits & 0x80 != 0,
        }
    }

    /// Set flags as `[SYN, ACK]` text
    pub fn label(&self) -> String {
        let mut names = Vec::new();
        if self.fin {
            names.push("FIN");
        }
        if self.syn {
            names.push("SYN");
        }
        if self.rst {
            names.push("RST");
        }
        if self.psh {
            names.push("PSH");
        }
        if self.ack {
            names.push("ACK");
        }
        if self.urg {
            names.push("URG");
        }
        if self.ece {
            names.push("ECE");
        }
        if self.cwr {
            names.push("CWR");
        }
        format!("[{}]", names.join(", "))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TcpInfo {
    pub src_port: u16,
    pub dst_port: u16,
    pub seq: u32,
    pub ack: u32,
    /// Header length in bytes, decoded from the data offset field
    pub header_len: u8,
    pub flags: TcpFlags,
    pub window: u16,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UdpInfo {
    pub src_port: u16,
    pub dst_port: u16,
    pub length: u16,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IcmpInfo {
    pub icmp_type: u8,
    pub code: u8,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HttpInfo {
    /// Request line or status line
    pub start_line: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DnsInfo {
    pub transaction_id: u16,
    pub is_response: bool,
    pub opcode: u8,
    pub response_code: u8,
    pub question_count: u16,
    pub answer_count: u16,
    /// First question name, when present and parsable
    pub query_name: Option<String>,
    pub query_type: Option<u16>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TlsInfo {
    pub content_type: u8,
    /// Protocol version label, for ex. `TLSv1.2`
    pub version_label: String,
    /// Record content label, for ex. `Handshake`
    pub content_label: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DhcpInfo {
    /// DHCP message type from option 53, when present
    pub message_type: Option<u8>,
    pub message_label: String,
    pub transaction_id: u32,
}
