// Rust Dash Library
// Originally written in 2014 by
//     Andrew Poelstra <apoelstra@wpsoftware.net>
//     For Bitcoin
// Updated for Dash in 2022 by
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

//! Dash Outpoints.
//!
//! An outpoint is a reference to one of the indexed destinations of a transaction. Provider
//! registrations use one to point at the masternode collateral.
//!

use core::fmt;

use hashes::Hash;

use crate::hash_types::Txid;
use crate::internal_macros::impl_consensus_encoding;

/// A reference to a transaction output.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct OutPoint {
    /// The referenced transaction's txid.
    pub txid: Txid,
    /// The index of the referenced output in its transaction's vout.
    pub vout: u32,
}

impl_consensus_encoding!(OutPoint, txid, vout);

impl OutPoint {
    /// Creates a new [`OutPoint`].
    #[inline]
    pub fn new(txid: Txid, vout: u32) -> OutPoint { OutPoint { txid, vout } }

    /// Checks whether the referenced transaction hash is all zeroes.
    ///
    /// A provider registration whose collateral is created inside the registering transaction
    /// itself carries such a hash, with `vout` naming the output of that same transaction.
    #[inline]
    pub fn has_null_txid(&self) -> bool { self.txid == Txid::all_zeros() }
}

impl fmt::Display for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.txid, self.vout)
    }
}
