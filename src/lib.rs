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

//! # Dash Special Transaction Payloads
//!
//! Byte-exact codec and validation for the payloads carried by Dash special transactions
//! (DIP2). Every payload type round-trips between its consensus encoding, an owned Rust value
//! and a JSON object, and is re-validated each time it crosses one of those boundaries.
//!
//! The supported payloads are the masternode lifecycle transactions of DIP3 (registration,
//! service update, registrar update and revocation), the coinbase commitment of DIP4 and the
//! quorum commitment of DIP6.
//!
//! ```
//! use dash_special_payloads::special_transaction::{TransactionPayload, TransactionType};
//!
//! let raw = hex::decode("0100080000003da1ae2e7c1d5dc1b4ebcf2de4e15478f7a5c8ac13ab6e3bc6d04b3c6c6e5e4d").unwrap();
//! let payload = TransactionPayload::from_buffer(TransactionType::Coinbase, &raw).unwrap();
//! assert_eq!(payload.get_type(), TransactionType::Coinbase);
//! assert_eq!(payload.to_buffer().unwrap(), raw);
//! ```
//!

// Coding conventions
#![forbid(unsafe_code)]
#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]
#![deny(dead_code)]
#![deny(unused_imports)]
#![deny(missing_docs)]
#![deny(unused_must_use)]

// Re-export dependencies we control.
pub use hashes;

#[cfg(test)]
#[macro_use]
mod test_macros;
mod internal_macros;

pub mod blockdata;
pub mod bls_sig_utils;
pub mod consensus;
pub mod hash_types;

use std::io;

pub use crate::blockdata::transaction::outpoint::OutPoint;
pub use crate::blockdata::transaction::special_transaction;
pub use crate::bls_sig_utils::{BLSPublicKey, BLSSignature};
pub use crate::consensus::encode::VarInt;
pub use crate::hash_types::*;
