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

//! Blockdata constants.
//!
//! This module provides the protocol constants that bound special transaction
//! payloads: the recognised payload versions, the widths of key identifiers and
//! BLS elements, and the ceilings for variable length fields.
//!

/// The maximum allowed script size, in bytes.
pub const MAX_SCRIPT_SIZE: usize = 10_000;
/// The largest payload signature carried in a variable length field: a BLS signature.
pub const MAX_PAYLOAD_SIG_SIZE: usize = BLS_SIGNATURE_SIZE;
/// The operator reward is expressed in hundredths of a percent, so 10000 is 100%.
pub const MAX_OPERATOR_REWARD: u16 = 10_000;

/// Width of a key identifier (`HASH160` of an ECDSA public key).
pub const KEY_ID_SIZE: usize = 20;
/// Width of a BLS public key.
pub const BLS_PUBLIC_KEY_SIZE: usize = 48;
/// Width of a BLS signature.
pub const BLS_SIGNATURE_SIZE: usize = 96;
/// Width of every double-SHA256 hash field.
pub const HASH_SIZE: usize = 32;

/// The only recognised provider registration payload version.
pub const PROVIDER_REGISTRATION_VERSION: u16 = 1;
/// The only recognised provider update service payload version.
pub const PROVIDER_UPDATE_SERVICE_VERSION: u16 = 1;
/// The only recognised provider update registrar payload version.
pub const PROVIDER_UPDATE_REGISTRAR_VERSION: u16 = 1;
/// The only recognised provider update revocation payload version.
pub const PROVIDER_UPDATE_REVOCATION_VERSION: u16 = 1;
/// The only recognised quorum commitment payload version.
pub const QUORUM_COMMITMENT_VERSION: u16 = 1;

/// Coinbase payload version carrying only the masternode list merkle root.
pub const COINBASE_VERSION_MN_LIST: u16 = 1;
/// Coinbase payload version adding the quorum merkle root (DIP8 activation).
pub const COINBASE_VERSION_QUORUMS: u16 = 2;
/// Coinbase payload version adding the best chainlock and the credit pool balance.
pub const COINBASE_VERSION_CHAINLOCK: u16 = 3;

/// The lowest final commitment version.
pub const MIN_QUORUM_FINAL_COMMITMENT_VERSION: u16 = 1;
/// The highest final commitment version.
pub const MAX_QUORUM_FINAL_COMMITMENT_VERSION: u16 = 4;

/// The only recognised masternode type in a registration.
pub const PROVIDER_TYPE_REGULAR: u16 = 0;
/// The only recognised masternode mode in a registration.
pub const PROVIDER_MODE_REGULAR: u16 = 0;
