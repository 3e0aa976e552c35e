// Rust Dash Library
// Written for Dash in 2022 by
//     The Dash Core Developers
//
// To the extent possible under law, the author(s) have dedicated all
// copyright and related and neighboring rights to this software to
// the public domain worldwide. This software is distributed without
// any warranty.
//
// You should have received a copy of the CC0 Public Domain Dedication
// along with this software.
// If not, see <http://creativecommons.org/publicdomain/zero/1.0/>.
//

//! Field checks shared by the special transaction payloads.
//!
//! Each check is pure and reports the first violated constraint.
//!

use core::ops::RangeInclusive;
use std::net::Ipv6Addr;

use hashes::Hash;

use crate::blockdata::transaction::special_transaction::ValidationError;

/// Checks that `version` is one of the `supported` versions.
pub fn check_version(
    field: &'static str,
    version: u16,
    supported: RangeInclusive<u16>,
) -> Result<(), ValidationError> {
    if supported.contains(&version) {
        Ok(())
    } else {
        Err(ValidationError::UnsupportedVersion { field, version })
    }
}

/// Checks that a numeric field lies in `min..=max`.
pub fn check_range(
    field: &'static str,
    value: i64,
    min: i64,
    max: i64,
) -> Result<(), ValidationError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange { field, value, min, max })
    }
}

/// Checks that a variable length field holds between `min` and `max` bytes.
pub fn check_length(
    field: &'static str,
    bytes: &[u8],
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    let length = bytes.len();
    if (min..=max).contains(&length) {
        Ok(())
    } else {
        Err(ValidationError::InvalidLength { field, length, min, max })
    }
}

/// Checks that a hash is not all zeroes.
pub fn check_not_null<H: Hash>(field: &'static str, hash: &H) -> Result<(), ValidationError> {
    if *hash == H::all_zeros() {
        Err(ValidationError::NullHash(field))
    } else {
        Ok(())
    }
}

/// Checks a masternode service address.
///
/// A set address must be an IPv4-mapped address with a non-zero port. When `allow_unset` is
/// true, the all-zero address with port zero is accepted as well.
pub fn check_service(ip_address: u128, port: u16, allow_unset: bool) -> Result<(), ValidationError> {
    if ip_address == 0 && port == 0 {
        return if allow_unset {
            Ok(())
        } else {
            Err(ValidationError::InvalidService("service address is not set"))
        };
    }
    let ip = Ipv6Addr::from(ip_address.to_le_bytes());
    match ip.to_ipv4_mapped() {
        None => Err(ValidationError::InvalidService("only IPv4 addresses are supported")),
        Some(v4) if v4.is_unspecified() => {
            Err(ValidationError::InvalidService("address is unspecified"))
        }
        Some(_) if port == 0 => Err(ValidationError::InvalidService("port is zero")),
        Some(_) => Ok(()),
    }
}

#[cfg(test)]
thread_local! {
    static VALIDATE_CALLS: core::cell::Cell<usize> = core::cell::Cell::new(0);
}

/// Counts a `validate` call on the current thread.
#[cfg(test)]
pub(crate) fn record_validate_call() { VALIDATE_CALLS.with(|calls| calls.set(calls.get() + 1)); }

/// Returns the number of `validate` calls on the current thread since the last call, and
/// resets the counter.
#[cfg(test)]
pub(crate) fn take_validate_calls() -> usize { VALIDATE_CALLS.with(|calls| calls.replace(0)) }

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use super::*;
    use crate::hash_types::ProTxHash;

    fn ipv4(a: u8, b: u8, c: u8, d: u8) -> u128 {
        u128::from_le_bytes(Ipv4Addr::new(a, b, c, d).to_ipv6_mapped().octets())
    }

    #[test]
    fn versions_and_ranges() {
        assert!(check_version("version", 1, 1..=1).is_ok());
        assert_eq!(
            check_version("version", 2, 1..=1),
            Err(ValidationError::UnsupportedVersion { field: "version", version: 2 })
        );
        assert!(check_range("reason", 3, 0, 3).is_ok());
        assert!(check_range("reason", 4, 0, 3).is_err());
        assert!(check_length("scriptPayout", &[], 1, 10).is_err());
        assert!(check_length("payloadSig", &[], 0, 96).is_ok());
        assert!(check_length("payloadSig", &[0; 97], 0, 96).is_err());
    }

    #[test]
    fn null_hashes() {
        assert_eq!(
            check_not_null("proTXHash", &ProTxHash::all_zeros()),
            Err(ValidationError::NullHash("proTXHash"))
        );
        assert!(check_not_null("proTXHash", &ProTxHash::from_byte_array([1; 32])).is_ok());
    }

    #[test]
    fn services() {
        assert!(check_service(ipv4(52, 36, 64, 148), 19999, false).is_ok());
        assert!(check_service(0, 0, true).is_ok());
        assert!(check_service(0, 0, false).is_err());
        assert!(check_service(ipv4(52, 36, 64, 148), 0, false).is_err());
        assert!(check_service(ipv4(0, 0, 0, 0), 19999, false).is_err());
        let v6 = u128::from_le_bytes("2001:db8::1".parse::<Ipv6Addr>().unwrap().octets());
        assert!(check_service(v6, 19999, false).is_err());
    }
}
