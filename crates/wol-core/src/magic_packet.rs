//! Wake-on-LAN magic packet codec.
//!
//! Wire format:
//! ```text
//! [0xFF x 6][MAC x 16]
//! ```
//! Total payload size: 102 bytes.  The payload is sent as a single UDP
//! datagram to the LAN broadcast address; there is no header, checksum, or
//! acknowledgement.
//!
//! # MAC address text forms
//!
//! | Form                    | `parse_mac` | `is_valid_mac` |
//! |-------------------------|-------------|----------------|
//! | `AA:BB:CC:DD:EE:FF`     | ok          | true           |
//! | `aa-bb-cc-dd-ee-ff`     | ok          | true           |
//! | `AA:BB-CC:DD-EE:FF`     | ok          | false (mixed)  |
//! | `AABBCCDDEEFF`          | ok          | false (bare)   |
//! | `AA:BB:CC:DD:EE`        | error       | false          |
//!
//! `parse_mac` is lenient because it only needs the 12 hex digits.
//! `is_valid_mac` is the strict check applied before a MAC is stored.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Number of bytes in a hardware (MAC) address.
pub const MAC_ADDRESS_SIZE: usize = 6;

/// How many times the MAC is repeated after the sync stream.
pub const MAC_REPETITIONS: usize = 16;

/// Length of the leading `0xFF` synchronisation stream.
pub const SYNC_STREAM_SIZE: usize = 6;

/// Total size of an encoded magic packet.
pub const MAGIC_PACKET_SIZE: usize = SYNC_STREAM_SIZE + MAC_ADDRESS_SIZE * MAC_REPETITIONS;

/// Errors that can occur while parsing a MAC address.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MacError {
    /// The text did not contain exactly 12 hexadecimal digits once separators
    /// were removed.
    #[error("invalid MAC address format: {0:?}")]
    InvalidMacFormat(String),
}

/// A parsed 6-byte hardware address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddress([u8; MAC_ADDRESS_SIZE]);

impl MacAddress {
    /// Wraps raw address bytes.
    pub const fn new(bytes: [u8; MAC_ADDRESS_SIZE]) -> Self {
        Self(bytes)
    }

    /// Returns the raw address bytes.
    pub const fn octets(&self) -> [u8; MAC_ADDRESS_SIZE] {
        self.0
    }
}

impl fmt::Display for MacAddress {
    /// Formats as uppercase, colon-separated hex (`AA:BB:CC:DD:EE:FF`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

impl FromStr for MacAddress {
    type Err = MacError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_mac(s)
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Parses a MAC address, ignoring any `:` or `-` separators.
///
/// Accepts upper, lower, and mixed case.
///
/// # Errors
///
/// Returns [`MacError::InvalidMacFormat`] unless exactly 12 hexadecimal
/// characters remain after the separators are removed.
///
/// # Examples
///
/// ```rust
/// use wol_core::parse_mac;
///
/// let mac = parse_mac("aa:bb:cc:dd:ee:ff").unwrap();
/// assert_eq!(mac.octets(), [0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]);
/// assert!(parse_mac("AA:BB:CC:DD:EE").is_err());
/// ```
pub fn parse_mac(text: &str) -> Result<MacAddress, MacError> {
    let digits = strip_separators(text);
    if digits.len() != MAC_ADDRESS_SIZE * 2 || !digits.iter().all(u8::is_ascii_hexdigit) {
        return Err(MacError::InvalidMacFormat(text.to_string()));
    }

    let mut bytes = [0u8; MAC_ADDRESS_SIZE];
    for (byte, pair) in bytes.iter_mut().zip(digits.chunks_exact(2)) {
        *byte = (hex_value(pair[0]) << 4) | hex_value(pair[1]);
    }
    Ok(MacAddress(bytes))
}

/// Encodes the 102-byte magic packet for `mac`.
///
/// # Examples
///
/// ```rust
/// use wol_core::{encode, parse_mac, MAGIC_PACKET_SIZE};
///
/// let packet = encode(&parse_mac("01:23:45:67:89:AB").unwrap());
/// assert_eq!(packet.len(), MAGIC_PACKET_SIZE);
/// assert_eq!(&packet[..6], &[0xFF; 6]);
/// assert_eq!(&packet[6..12], &[0x01, 0x23, 0x45, 0x67, 0x89, 0xAB]);
/// ```
pub fn encode(mac: &MacAddress) -> [u8; MAGIC_PACKET_SIZE] {
    let mut packet = [0xFFu8; MAGIC_PACKET_SIZE];
    for chunk in packet[SYNC_STREAM_SIZE..].chunks_exact_mut(MAC_ADDRESS_SIZE) {
        chunk.copy_from_slice(&mac.0);
    }
    packet
}

/// Returns `true` when `text` is in canonical `XX:XX:XX:XX:XX:XX` or
/// `XX-XX-XX-XX-XX-XX` form.
///
/// One separator style must be used throughout; a bare 12-digit string is
/// rejected.
pub fn is_valid_mac(text: &str) -> bool {
    let bytes = text.as_bytes();
    if bytes.len() != 17 {
        return false;
    }
    let separator = bytes[2];
    if separator != b':' && separator != b'-' {
        return false;
    }

    bytes.iter().enumerate().all(|(i, &b)| {
        if i % 3 == 2 {
            b == separator
        } else {
            b.is_ascii_hexdigit()
        }
    })
}

/// Normalises any 12-hex-digit MAC text to uppercase colon-separated form.
///
/// Input that cannot be normalised is returned unchanged.
///
/// ```rust
/// use wol_core::format_mac;
///
/// assert_eq!(format_mac("aabbccddeeff"), "AA:BB:CC:DD:EE:FF");
/// assert_eq!(format_mac("not a mac"), "not a mac");
/// ```
pub fn format_mac(text: &str) -> String {
    match parse_mac(text) {
        Ok(mac) => mac.to_string(),
        Err(_) => text.to_string(),
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn strip_separators(text: &str) -> Vec<u8> {
    text.bytes().filter(|b| *b != b':' && *b != b'-').collect()
}

/// Converts one ASCII hex digit to its value.  Callers validate first.
fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        b'A'..=b'F' => digit - b'A' + 10,
        _ => 0,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magic_packet_size_is_102() {
        assert_eq!(MAGIC_PACKET_SIZE, 102);
    }

    #[test]
    fn test_parse_mac_accepts_colon_separated() {
        // Arrange / Act
        let mac = parse_mac("AA:BB:CC:DD:EE:FF").unwrap();

        // Assert
        assert_eq!(mac.octets(), [0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]);
    }

    #[test]
    fn test_parse_mac_accepts_dash_separated_lowercase() {
        let mac = parse_mac("01-23-45-67-89-ab").unwrap();
        assert_eq!(mac.octets(), [0x01, 0x23, 0x45, 0x67, 0x89, 0xAB]);
    }

    #[test]
    fn test_parse_mac_accepts_bare_digits_and_mixed_case() {
        let mac = parse_mac("aAbBcCdDeEfF").unwrap();
        assert_eq!(mac.octets(), [0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]);
    }

    #[test]
    fn test_parse_mac_rejects_short_input() {
        // Arrange
        let text = "AA:BB:CC:DD:EE";

        // Act
        let result = parse_mac(text);

        // Assert
        assert_eq!(result, Err(MacError::InvalidMacFormat(text.to_string())));
    }

    #[test]
    fn test_parse_mac_rejects_non_hex_digits() {
        assert!(parse_mac("GG:BB:CC:DD:EE:FF").is_err());
    }

    #[test]
    fn test_parse_mac_rejects_sign_characters() {
        // `u8::from_str_radix` would accept a leading '+'; the codec must not.
        assert!(parse_mac("+A:BB:CC:DD:EE:FF").is_err());
    }

    #[test]
    fn test_parse_mac_rejects_too_many_digits() {
        assert!(parse_mac("AA:BB:CC:DD:EE:FF:00").is_err());
    }

    #[test]
    fn test_encode_starts_with_sync_stream() {
        // Arrange
        let mac = MacAddress::new([1, 2, 3, 4, 5, 6]);

        // Act
        let packet = encode(&mac);

        // Assert
        assert_eq!(&packet[..SYNC_STREAM_SIZE], &[0xFF; SYNC_STREAM_SIZE]);
    }

    #[test]
    fn test_encode_repeats_mac_sixteen_times() {
        let mac = MacAddress::new([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);
        let packet = encode(&mac);

        for k in 0..MAC_REPETITIONS {
            let start = SYNC_STREAM_SIZE + k * MAC_ADDRESS_SIZE;
            assert_eq!(
                &packet[start..start + MAC_ADDRESS_SIZE],
                &mac.octets(),
                "repetition {k} must equal the MAC"
            );
        }
    }

    #[test]
    fn test_encode_all_ff_mac_is_all_ff_packet() {
        let packet = encode(&MacAddress::new([0xFF; 6]));
        assert!(packet.iter().all(|b| *b == 0xFF));
    }

    #[test]
    fn test_is_valid_mac_accepts_canonical_forms() {
        assert!(is_valid_mac("AA:BB:CC:DD:EE:FF"));
        assert!(is_valid_mac("aa-bb-cc-dd-ee-ff"));
        assert!(is_valid_mac("0a:1B:2c:3D:4e:5F"));
    }

    #[test]
    fn test_is_valid_mac_rejects_short() {
        assert!(!is_valid_mac("AA:BB:CC:DD:EE"));
    }

    #[test]
    fn test_is_valid_mac_rejects_bare_digits() {
        assert!(!is_valid_mac("AABBCCDDEEFF"));
    }

    #[test]
    fn test_is_valid_mac_rejects_non_hex() {
        assert!(!is_valid_mac("GG:BB:CC:DD:EE:FF"));
    }

    #[test]
    fn test_is_valid_mac_rejects_mixed_separators() {
        assert!(!is_valid_mac("AA:BB-CC:DD:EE:FF"));
    }

    #[test]
    fn test_is_valid_mac_rejects_other_separators() {
        assert!(!is_valid_mac("AA.BB.CC.DD.EE.FF"));
        assert!(!is_valid_mac(""));
    }

    #[test]
    fn test_format_mac_normalises_bare_lowercase() {
        assert_eq!(format_mac("aabbccddeeff"), "AA:BB:CC:DD:EE:FF");
    }

    #[test]
    fn test_format_mac_normalises_dash_form() {
        assert_eq!(format_mac("aa-bb-cc-dd-ee-ff"), "AA:BB:CC:DD:EE:FF");
    }

    #[test]
    fn test_format_mac_returns_unparseable_input_unchanged() {
        assert_eq!(format_mac("AA:BB:CC"), "AA:BB:CC");
        assert_eq!(format_mac("zzzzzzzzzzzz"), "zzzzzzzzzzzz");
    }

    #[test]
    fn test_mac_address_from_str_matches_parse_mac() {
        let a: MacAddress = "01:02:03:04:05:06".parse().unwrap();
        assert_eq!(a, parse_mac("010203040506").unwrap());
        assert_eq!(a.to_string(), "01:02:03:04:05:06");
    }
}
