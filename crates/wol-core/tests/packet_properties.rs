//! Integration tests for the wol-core public API.
//!
//! These tests exercise the codec, allowlist matcher, config update path, and
//! authentication rules together through the crate root re-exports, the same
//! way the server crate consumes them.

use std::net::IpAddr;

use wol_core::{
    auth::bearer_token, check_login, encode, format_mac, is_allowed, is_authenticated,
    is_valid_mac, matches, parse_mac, ConfigUpdate, WolConfig, MAGIC_PACKET_SIZE,
};

/// A spread of MACs covering both separators, every case style, and edge bytes.
const MACS: &[&str] = &[
    "00:00:00:00:00:00",
    "FF:FF:FF:FF:FF:FF",
    "aa:bb:cc:dd:ee:ff",
    "AA-BB-CC-DD-EE-FF",
    "01-23-45-67-89-aB",
    "De:aD:bE:eF:00:01",
    "10:20:30:40:50:60",
];

#[test]
fn test_every_valid_mac_encodes_to_the_fixed_layout() {
    for text in MACS {
        // Arrange
        assert!(is_valid_mac(text), "{text} must be canonical");
        let mac = parse_mac(text).expect("canonical MAC must parse");

        // Act
        let packet = encode(&mac);

        // Assert
        assert_eq!(packet.len(), MAGIC_PACKET_SIZE);
        assert_eq!(&packet[0..6], &[0xFF; 6], "{text}: sync stream");
        for k in 0..16 {
            assert_eq!(
                &packet[6 + 6 * k..12 + 6 * k],
                &mac.octets(),
                "{text}: repetition {k}"
            );
        }
    }
}

#[test]
fn test_formatted_mac_is_canonical_and_parses_to_same_bytes() {
    for text in MACS {
        let formatted = format_mac(text);
        assert!(is_valid_mac(&formatted));
        assert_eq!(formatted, formatted.to_uppercase());
        assert_eq!(parse_mac(&formatted), parse_mac(text));
    }
}

#[test]
fn test_listed_invalid_macs_are_rejected() {
    assert!(!is_valid_mac("AA:BB:CC:DD:EE"));
    assert!(!is_valid_mac("AABBCCDDEEFF"));
    assert!(!is_valid_mac("GG:BB:CC:DD:EE:FF"));
}

#[test]
fn test_format_mac_of_bare_lowercase_digits() {
    assert_eq!(format_mac("aabbccddeeff"), "AA:BB:CC:DD:EE:FF");
}

#[test]
fn test_cidr_examples() {
    let ip = |s: &str| s.parse::<IpAddr>().unwrap();

    assert!(matches(ip("192.168.1.50"), "192.168.1.0/24"));
    assert!(!matches(ip("192.168.2.1"), "192.168.1.0/24"));
    assert!(matches(ip("10.0.0.1"), "10.0.0.1"));
    assert!(!matches(ip("10.0.0.1"), "not-a-cidr/40"));
}

#[test]
fn test_allowlist_from_a_config_update_gates_requesters() {
    // Arrange: the dashboard sends a comma-split list with stray blanks
    let update: ConfigUpdate = serde_json::from_str(
        r#"{"ipAllowlist": ["192.168.1.0/24", "", " 10.0.0.5 "]}"#,
    )
    .unwrap();

    // Act
    let cfg = update.apply_to(&WolConfig::default()).unwrap();

    // Assert
    assert_eq!(cfg.ip_allowlist.len(), 2);
    assert!(is_allowed("192.168.1.9".parse().unwrap(), &cfg.ip_allowlist));
    assert!(is_allowed("10.0.0.5".parse().unwrap(), &cfg.ip_allowlist));
    assert!(!is_allowed("10.0.0.6".parse().unwrap(), &cfg.ip_allowlist));
}

#[test]
fn test_login_then_authenticate_with_returned_token() {
    // Arrange
    let cfg = WolConfig {
        auth_token: "dashboard-token".to_string(),
        ..WolConfig::default()
    };

    // Act: the dashboard logs in, then reuses the token as a bearer
    assert!(check_login(&cfg, "admin123"));
    let header = format!("Bearer {}", cfg.auth_token);

    // Assert
    assert!(is_authenticated(&cfg, bearer_token(&header), None));
}

#[test]
fn test_authentication_matrix() {
    let required = WolConfig {
        auth_token: "t".to_string(),
        ..WolConfig::default()
    };
    let unconfigured = WolConfig::default();
    let disabled = WolConfig {
        require_authentication: false,
        ..WolConfig::default()
    };

    assert!(is_authenticated(&disabled, None, None));
    assert!(!is_authenticated(&unconfigured, Some("t"), Some("t")));
    assert!(is_authenticated(&required, Some("t"), Some("x")));
    assert!(!is_authenticated(&required, Some("x"), Some("t")));
    assert!(is_authenticated(&required, None, Some("t")));
}
