//! Mock address generation and validation.
//!
//! This module produces syntactically valid mock IPv4/MAC addresses for
//! newly placed devices and validates user-edited address fields. The
//! validators are pure predicates: they return a boolean and never fail.
//!
//! The subnet validator is intentionally narrow: it only accepts masks of
//! the form `255.255.X.Y`. Legitimate masks such as `255.0.0.0` are
//! rejected. Do not broaden it without flagging the behavior change to
//! callers that rely on the current acceptance set.

use rand::Rng;
use regex::Regex;
use std::sync::OnceLock;

/// Subnet mask assigned to devices at creation time.
pub const DEFAULT_SUBNET_MASK: &str = "255.255.255.0";

fn ipv4_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        const OCTET: &str = "(25[0-5]|2[0-4][0-9]|[0-1]?[0-9][0-9]?)";
        Regex::new(&format!(r"^{OCTET}\.{OCTET}\.{OCTET}\.{OCTET}$"))
            .expect("static IPv4 pattern compiles")
    })
}

fn mac_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([0-9A-Fa-f]{2}[:-]){5}([0-9A-Fa-f]{2})$")
            .expect("static MAC pattern compiles")
    })
}

fn subnet_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^255\.255\.(\d{1,3})\.(\d{1,3})$").expect("static subnet pattern compiles")
    })
}

/// Check if a string is a valid dotted-quad IPv4 address (octets 0-255)
pub fn validate_ipv4(ip: &str) -> bool {
    ipv4_pattern().is_match(ip)
}

/// Check if a string is a valid MAC address: six 2-digit hex groups
/// separated by colons or hyphens
pub fn validate_mac(mac: &str) -> bool {
    mac_pattern().is_match(mac)
}

/// Check if a string is a valid subnet mask of the form `255.255.X.Y`
/// with X and Y each in 0-255
pub fn validate_subnet_mask(subnet: &str) -> bool {
    let Some(captures) = subnet_pattern().captures(subnet) else {
        return false;
    };
    // The pattern admits up to three digits per group; range-check them
    captures
        .iter()
        .skip(1)
        .flatten()
        .all(|group| group.as_str().parse::<u16>().is_ok_and(|n| n <= 255))
}

/// Generate a mock IPv4 address in the `192.168.1.0/24` range.
///
/// The host octet is drawn uniformly from [1, 254]. The candidate is
/// re-drawn until it passes [`validate_ipv4`]; the generator and validator
/// are kept consistent by contract, not by assumption.
pub fn generate_ipv4() -> String {
    let mut rng = rand::thread_rng();
    loop {
        let ip = format!("192.168.1.{}", rng.gen_range(1..=254));
        if validate_ipv4(&ip) {
            return ip;
        }
        log::warn!("Generated IP {} failed validation, re-drawing", ip);
    }
}

/// Generate a mock MAC address: six random octets, lowercase hex,
/// colon-separated. Re-drawn until it passes [`validate_mac`].
pub fn generate_mac() -> String {
    let mut rng = rand::thread_rng();
    loop {
        let mac = (0..6)
            .map(|_| format!("{:02x}", rng.gen_range(0..=255u8)))
            .collect::<Vec<_>>()
            .join(":");
        if validate_mac(&mac) {
            return mac;
        }
        log::warn!("Generated MAC {} failed validation, re-drawing", mac);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ipv4_validation() {
        assert!(validate_ipv4("192.168.1.1"));
        assert!(validate_ipv4("0.0.0.0"));
        assert!(validate_ipv4("255.255.255.255"));
        assert!(!validate_ipv4("256.1.1.1"));
        assert!(!validate_ipv4("192.168.1"));
        assert!(!validate_ipv4("192.168.1.1.1"));
        assert!(!validate_ipv4("not.an.ip.addr"));
    }

    #[test]
    fn test_mac_validation() {
        assert!(validate_mac("aa:bb:cc:dd:ee:ff"));
        assert!(validate_mac("AA-BB-CC-DD-EE-FF"));
        assert!(validate_mac("00:11:22:33:44:55"));
        assert!(!validate_mac("aabbcc"));
        assert!(!validate_mac("aa:bb:cc:dd:ee"));
        assert!(!validate_mac("gg:bb:cc:dd:ee:ff"));
    }

    #[test]
    fn test_subnet_validation_is_narrow() {
        assert!(validate_subnet_mask("255.255.255.0"));
        assert!(validate_subnet_mask("255.255.1.2"));
        assert!(validate_subnet_mask("255.255.0.0"));
        // Only 255.255.X.Y masks are accepted
        assert!(!validate_subnet_mask("255.0.0.0"));
        assert!(!validate_subnet_mask("255.255.256.0"));
        assert!(!validate_subnet_mask("255.255.255"));
    }

    #[test]
    fn test_generated_addresses_pass_validation() {
        for _ in 0..100 {
            let ip = generate_ipv4();
            assert!(validate_ipv4(&ip), "generated IP {} failed validation", ip);
            assert!(ip.starts_with("192.168.1."));

            let mac = generate_mac();
            assert!(validate_mac(&mac), "generated MAC {} failed validation", mac);
            assert_eq!(mac, mac.to_lowercase());
        }
    }
}
