//! Bluetooth device address parsing.
//!
//! The address is validated once at entry. Every subprocess argument and file
//! name derived from it afterwards comes from the parsed octets, never from the
//! raw command-line string.

use crate::error::VenbluezError;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

/// A six-octet Bluetooth device address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BdAddr([u8; 6]);

/// Colon-separated form, any case: `AA:bb:01:23:45:67`.
const ADDRESS_PATTERN: &str = r"^([0-9A-Fa-f]{2}:){5}[0-9A-Fa-f]{2}$";

impl BdAddr {
    /// Key used to find this device in audio server source names,
    /// e.g. `aa_bb_cc_dd_ee_ff`.
    pub fn source_key(&self) -> String {
        self.joined('_').to_lowercase()
    }

    /// Stem for the recording file name, e.g. `AA_BB_CC_DD_EE_FF`.
    pub fn file_stem(&self) -> String {
        self.joined('_')
    }

    fn joined(&self, sep: char) -> String {
        self.0
            .iter()
            .map(|b| format!("{b:02X}"))
            .collect::<Vec<_>>()
            .join(&sep.to_string())
    }
}

impl FromStr for BdAddr {
    type Err = VenbluezError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let regex = Regex::new(ADDRESS_PATTERN)
            .map_err(|e| VenbluezError::InvalidAddress(format!("{s} ({e})")))?;
        if !regex.is_match(trimmed) {
            return Err(VenbluezError::InvalidAddress(s.to_string()));
        }

        let mut octets = [0u8; 6];
        for (slot, part) in octets.iter_mut().zip(trimmed.split(':')) {
            *slot = u8::from_str_radix(part, 16)
                .map_err(|_| VenbluezError::InvalidAddress(s.to_string()))?;
        }
        Ok(Self(octets))
    }
}

impl fmt::Display for BdAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined(':'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_normalizes_case() {
        let addr: BdAddr = "aa:Bb:cC:01:02:ff".parse().unwrap();
        assert_eq!(addr.to_string(), "AA:BB:CC:01:02:FF");
        assert_eq!(addr, "AA:BB:CC:01:02:FF".parse().unwrap());
    }

    #[test]
    fn source_key_is_lowercase_with_underscores() {
        let addr: BdAddr = "AA:BB:CC:DD:EE:FF".parse().unwrap();
        assert_eq!(addr.source_key(), "aa_bb_cc_dd_ee_ff");

        let mixed: BdAddr = "Aa:bB:Cc:dD:eE:Ff".parse().unwrap();
        assert_eq!(mixed.source_key(), "aa_bb_cc_dd_ee_ff");
    }

    #[test]
    fn file_stem_uses_underscores() {
        let addr: BdAddr = "11:22:33:44:55:66".parse().unwrap();
        assert_eq!(addr.file_stem(), "11_22_33_44_55_66");
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let addr: BdAddr = "  11:22:33:44:55:66\n".parse().unwrap();
        assert_eq!(addr.to_string(), "11:22:33:44:55:66");
    }

    #[test]
    fn rejects_malformed_addresses() {
        for bad in [
            "",
            "11:22:33:44:55",
            "11:22:33:44:55:66:77",
            "11-22-33-44-55-66",
            "112233445566",
            "GG:22:33:44:55:66",
            "1:22:33:44:55:66",
            "11:22:33:44:55:66; rm -rf /",
            "../../etc/passwd",
        ] {
            let err = bad.parse::<BdAddr>().unwrap_err();
            assert!(
                matches!(err, VenbluezError::InvalidAddress(_)),
                "{bad:?} should be rejected"
            );
        }
    }
}
