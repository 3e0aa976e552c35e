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

//! Dash hash types.
//!
//! This module defines types for hashes used throughout the library. These
//! types are needed in order to avoid mixing data of the same hash format
//! (e.g. `SHA256d`) but of different meaning (such as transaction id, block
//! hash).
//!
//! Double-SHA256 hashes are displayed byte-reversed, as Dash Core does for every
//! `uint256`. Key identifiers (`HASH160`) are displayed in natural byte order.
//!

#[rustfmt::skip]
macro_rules! impl_hashencode {
    ($hashtype:ident) => {
        impl $crate::consensus::Encodable for $hashtype {
            fn consensus_encode<W: $crate::io::Write + ?Sized>(&self, w: &mut W) -> Result<usize, $crate::io::Error> {
                $crate::consensus::Encodable::consensus_encode(&self.0, w)
            }
        }

        impl $crate::consensus::Decodable for $hashtype {
            fn consensus_decode<R: $crate::io::Read + ?Sized>(r: &mut R) -> Result<Self, $crate::consensus::encode::Error> {
                use $crate::hashes::Hash;
                Ok(Self::from_byte_array(<<$hashtype as $crate::hashes::Hash>::Bytes as $crate::consensus::Decodable>::consensus_decode(r)?))
            }
        }
    };
}

#[rustfmt::skip]
macro_rules! impl_hex_string {
    ($hashtype:ident, $inner:ty) => {
        impl $hashtype {
            #[doc = concat!("Parses a `", stringify!($hashtype), "` from its display hex string.")]
            pub fn from_hex(s: &str) -> Result<$hashtype, Error> {
                Ok(Self(<$inner>::from_str(s)?))
            }

            #[doc = concat!("Formats a `", stringify!($hashtype), "` as its display hex string.")]
            pub fn to_hex(&self) -> String {
                self.0.to_string()
            }
        }
    };
}

// newtypes module is solely here so we can rustfmt::skip.
pub use newtypes::*;

#[rustfmt::skip]
mod newtypes {
    use core::str::FromStr;
    use hashes::{sha256d, hash160, hash_newtype};
    use hashes::hex::Error;

    hash_newtype! {
        /// A dash transaction hash/transaction ID.
        pub struct Txid(sha256d::Hash);

        /// A hash of a public key, used as a key identifier.
        pub struct PubkeyHash(hash160::Hash);

        /// The merkle root of the masternode list
        pub struct MerkleRootMasternodeList(sha256d::Hash);
        /// The merkle root of the quorums
        pub struct MerkleRootQuorums(sha256d::Hash);
        /// A special transaction payload hash
        pub struct SpecialTransactionPayloadHash(sha256d::Hash);
        /// A hash of all transaction inputs
        pub struct InputsHash(sha256d::Hash);
        /// A hash used to identify a quorum
        pub struct QuorumHash(sha256d::Hash);
        /// A hash of a quorum verification vector
        pub struct QuorumVVecHash(sha256d::Hash);
        /// ProTxHash is the hash of the transaction that registered a masternode
        pub struct ProTxHash(sha256d::Hash);
    }

    impl_hashencode!(Txid);
    impl_hashencode!(PubkeyHash);

    impl_hashencode!(MerkleRootMasternodeList);
    impl_hashencode!(MerkleRootQuorums);

    impl_hashencode!(SpecialTransactionPayloadHash);
    impl_hashencode!(InputsHash);

    impl_hashencode!(QuorumHash);
    impl_hashencode!(QuorumVVecHash);
    impl_hashencode!(ProTxHash);

    impl_hex_string!(Txid, sha256d::Hash);
    impl_hex_string!(PubkeyHash, hash160::Hash);
    impl_hex_string!(MerkleRootMasternodeList, sha256d::Hash);
    impl_hex_string!(MerkleRootQuorums, sha256d::Hash);
    impl_hex_string!(SpecialTransactionPayloadHash, sha256d::Hash);
    impl_hex_string!(InputsHash, sha256d::Hash);
    impl_hex_string!(QuorumHash, sha256d::Hash);
    impl_hex_string!(QuorumVVecHash, sha256d::Hash);
    impl_hex_string!(ProTxHash, sha256d::Hash);
}

#[cfg(test)]
mod tests {
    use hashes::Hash;

    use super::*;
    use crate::consensus::{deserialize, serialize};

    #[test]
    fn sha256d_types_display_reversed() {
        let mut bytes = [0u8; 32];
        bytes[0] = 0xa4;
        bytes[31] = 0x09;
        let hash = ProTxHash::from_byte_array(bytes);
        let hex = hash.to_hex();
        assert!(hex.starts_with("09"));
        assert!(hex.ends_with("a4"));
        assert_eq!(ProTxHash::from_hex(&hex).unwrap(), hash);
        // on the wire the natural order is kept
        assert_eq!(serialize(&hash), bytes.to_vec());
        assert_eq!(deserialize::<ProTxHash>(&bytes).unwrap(), hash);
    }

    #[test]
    fn key_ids_display_natural() {
        let hex = "010000000000000000000000ffff0102030604d4";
        let key_id = PubkeyHash::from_hex(hex).unwrap();
        assert_eq!(key_id.to_hex(), hex);
        assert_eq!(serialize(&key_id), ::hex::decode(hex).unwrap());
    }

    #[test]
    fn wrong_length_hex_is_rejected() {
        assert!(ProTxHash::from_hex("00").is_err());
        assert!(PubkeyHash::from_hex("010000000000000000000000ffff0102030604").is_err());
    }
}
