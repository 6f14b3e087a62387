use crate::decode::layer::{DecodedLayer, DhcpInfo, DnsInfo, HttpInfo, TlsInfo};
use crate::decode::DecodedFrame;

const HTTP_METHODS: &[&str] = &[
    "GET ", "POST ", "PUT ", "DELETE ", "HEAD ", "OPTIONS ", "PATCH ", "CONNECT ", "TRACE ",
];

// TLS record content types
const CHANGE_CIPHER_SPEC: u8 = 20;
const ALERT: u8 = 21;
const HANDSHAKE: u8 = 22;
const APPLICATION_DATA: u8 = 23;

// TLS handshake message types
const CLIENT_HELLO: u8 = 1;
const SERVER_HELLO: u8 = 2;

// BOOTP/DHCP
const DHCP_MIN_LEN: usize = 240;
const DHCP_MAGIC_COOKIE: [u8; 4] = [0x63, 0x82, 0x53, 0x63];
const DHCP_OPT_MESSAGE_TYPE: u8 = 53;

/// Refine a TCP frame with application-level recognition
///
/// Only the protocol name, info string and layer list are updated; the
/// endpoint labels set by the lower layers are never altered.
pub(crate) fn classify_tcp(frame: &mut DecodedFrame, src_port: u16, dst_port: u16, payload: &[u8]) {
    if payload.is_empty() {
        return;
    }
    let port = well_known(src_port, dst_port);
    match port {
        Some(80) | Some(8080) => {
            if let Some(start_line) = http_start_line(payload) {
                frame.protocol = "HTTP".to_string();
                frame.info = start_line.clone();
                frame.layers.push(DecodedLayer::Http(HttpInfo { start_line }));
            }
        }
        Some(443) => classify_tls(frame, payload),
        Some(22) => {
            frame.protocol = "SSH".to_string();
            if payload.starts_with(b"SSH-") {
                frame.info = first_line(payload);
            }
        }
        Some(21) => frame.protocol = "FTP".to_string(),
        Some(25) => frame.protocol = "SMTP".to_string(),
        Some(110) => frame.protocol = "POP3".to_string(),
        Some(143) => frame.protocol = "IMAP".to_string(),
        _ => (),
    }
}

/// Refine a UDP frame with application-level recognition
pub(crate) fn classify_udp(frame: &mut DecodedFrame, src_port: u16, dst_port: u16, payload: &[u8]) {
    match well_known(src_port, dst_port) {
        Some(53) => classify_dns(frame, payload),
        Some(67) | Some(68) => classify_dhcp(frame, payload),
        Some(123) => frame.protocol = "NTP".to_string(),
        Some(161) | Some(162) => frame.protocol = "SNMP".to_string(),
        _ => (),
    }
}

/// Pick the well-known port of the pair, preferring the destination
fn well_known(src_port: u16, dst_port: u16) -> Option<u16> {
    const PORTS: &[u16] = &[21, 22, 25, 53, 67, 68, 80, 110, 123, 143, 161, 162, 443, 8080];
    if PORTS.contains(&dst_port) {
        Some(dst_port)
    } else if PORTS.contains(&src_port) {
        Some(src_port)
    } else {
        None
    }
}

fn first_line(payload: &[u8]) -> String {
    let end = payload
        .iter()
        .position(|&b| b == b'\r' || b == b'\n')
        .unwrap_or_else(|| payload.len().min(120));
    String::from_utf8_lossy(&payload[..end.min(120)]).into_owned()
}

/// Extract the HTTP request line or status line, when the payload starts
/// with one
fn http_start_line(payload: &[u8]) -> Option<String> {
    let is_request = HTTP_METHODS
        .iter()
        .any(|method| payload.starts_with(method.as_bytes()));
    let is_response = payload.starts_with(b"HTTP/");
    if is_request || is_response {
        Some(first_line(payload))
    } else {
        None
    }
}

fn classify_tls(frame: &mut DecodedFrame, payload: &[u8]) {
    // TLS record header: content type, 2-byte version, 2-byte length
    if payload.len() < 5 {
        return;
    }
    let content_type = payload[0];
    if !(CHANGE_CIPHER_SPEC..=APPLICATION_DATA).contains(&content_type) || payload[1] != 3 {
        return;
    }
    let version_label = match (payload[1], payload[2]) {
        (3, 0) => "SSLv3",
        (3, 1) => "TLSv1",
        (3, 2) => "TLSv1.1",
        (3, 3) => "TLSv1.2",
        (3, 4) => "TLSv1.3",
        _ => return,
    }
    .to_string();
    let content_label = match content_type {
        CHANGE_CIPHER_SPEC => "Change Cipher Spec".to_string(),
        ALERT => "Alert".to_string(),
        HANDSHAKE => match payload.get(5) {
            Some(&CLIENT_HELLO) => "Client Hello".to_string(),
            Some(&SERVER_HELLO) => "Server Hello".to_string(),
            _ => "Handshake".to_string(),
        },
        _ => "Application Data".to_string(),
    };
    frame.protocol = version_label.clone();
    frame.info = format!("{} {}", version_label, content_label);
    frame.layers.push(DecodedLayer::Tls(TlsInfo {
        content_type,
        version_label,
        content_label,
    }));
}

fn classify_dns(frame: &mut DecodedFrame, payload: &[u8]) {
    if payload.len() < 12 {
        return;
    }
    let transaction_id = u16::from_be_bytes([payload[0], payload[1]]);
    let flags = u16::from_be_bytes([payload[2], payload[3]]);
    let question_count = u16::from_be_bytes([payload[4], payload[5]]);
    let answer_count = u16::from_be_bytes([payload[6], payload[7]]);
    let is_response = flags & 0x8000 != 0;
    let opcode = ((flags >> 11) & 0x0f) as u8;
    let response_code = (flags & 0x0f) as u8;

    let (query_name, query_type) = if question_count > 0 {
        parse_dns_question(&payload[12..])
    } else {
        (None, None)
    };

    let mut info = if is_response {
        format!("Standard query response 0x{:04x}", transaction_id)
    } else {
        format!("Standard query 0x{:04x}", transaction_id)
    };
    if opcode != 0 {
        info = format!("DNS opcode {} 0x{:04x}", opcode, transaction_id);
    }
    if let (Some(name), Some(qtype)) = (&query_name, query_type) {
        info.push_str(&format!(" {} {}", dns_type_label(qtype), name));
    }
    if is_response && response_code == 3 {
        info.push_str(" No such name");
    }

    frame.protocol = "DNS".to_string();
    frame.info = info;
    frame.layers.push(DecodedLayer::Dns(DnsInfo {
        transaction_id,
        is_response,
        opcode,
        response_code,
        question_count,
        answer_count,
        query_name,
        query_type,
    }));
}

/// Walk the first question: length-prefixed labels, then type and class.
/// Compression pointers are not followed.
fn parse_dns_question(data: &[u8]) -> (Option<String>, Option<u16>) {
    let mut name = String::new();
    let mut pos = 0usize;
    loop {
        let len = match data.get(pos) {
            Some(&len) => len as usize,
            None => return (None, None),
        };
        if len == 0 {
            pos += 1;
            break;
        }
        // compression pointer, only valid in answers
        if len & 0xc0 != 0 {
            return (None, None);
        }
        if pos + 1 + len > data.len() || name.len() > 253 {
            return (None, None);
        }
        if !name.is_empty() {
            name.push('.');
        }
        name.push_str(&String::from_utf8_lossy(&data[pos + 1..pos + 1 + len]));
        pos += 1 + len;
    }
    if name.is_empty() {
        return (None, None);
    }
    let qtype = if pos + 2 <= data.len() {
        Some(u16::from_be_bytes([data[pos], data[pos + 1]]))
    } else {
        None
    };
    (Some(name), qtype)
}

fn dns_type_label(qtype: u16) -> String {
    match qtype {
        1 => "A".to_string(),
        2 => "NS".to_string(),
        5 => "CNAME".to_string(),
        6 => "SOA".to_string(),
        12 => "PTR".to_string(),
        15 => "MX".to_string(),
        16 => "TXT".to_string(),
        28 => "AAAA".to_string(),
        33 => "SRV".to_string(),
        255 => "ANY".to_string(),
        other => format!("Type {}", other),
    }
}

fn classify_dhcp(frame: &mut DecodedFrame, payload: &[u8]) {
    frame.protocol = "DHCP".to_string();
    if payload.len() < DHCP_MIN_LEN || payload[236..240] != DHCP_MAGIC_COOKIE {
        frame.info = "BOOTP message".to_string();
        return;
    }
    let transaction_id = u32::from_be_bytes([payload[4], payload[5], payload[6], payload[7]]);
    let message_type = dhcp_message_type(&payload[DHCP_MIN_LEN..]);
    let message_label = match message_type {
        Some(1) => "DHCP Discover".to_string(),
        Some(2) => "DHCP Offer".to_string(),
        Some(3) => "DHCP Request".to_string(),
        Some(4) => "DHCP Decline".to_string(),
        Some(5) => "DHCP ACK".to_string(),
        Some(6) => "DHCP NAK".to_string(),
        Some(7) => "DHCP Release".to_string(),
        Some(8) => "DHCP Inform".to_string(),
        Some(t) => format!("DHCP message type {}", t),
        None => "DHCP".to_string(),
    };
    frame.info = format!("{} - Transaction ID 0x{:x}", message_label, transaction_id);
    frame.layers.push(DecodedLayer::Dhcp(DhcpInfo {
        message_type,
        message_label,
        transaction_id,
    }));
}

/// Walk the DHCP option list looking for the message type (option 53)
fn dhcp_message_type(mut options: &[u8]) -> Option<u8> {
    loop {
        match options.first() {
            None | Some(&0xff) => return None,
            Some(&0) => options = &options[1..],
            Some(&code) => {
                let len = *options.get(1)? as usize;
                if options.len() < 2 + len {
                    return None;
                }
                if code == DHCP_OPT_MESSAGE_TYPE && len >= 1 {
                    return Some(options[2]);
                }
                options = &options[2 + len..];
            }
        }
    }
}
