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

//! Dash Coinbase Special Transaction.
//!
//! Each time a block is mined it includes a coinbase special transaction.
//! It is defined in DIP4 https://github.com/dashpay/dips/blob/master/dip-0004.md.
//!
//! The payload grew over time. Version 2 adds the merkle root of the active quorums, version 3
//! adds the best known chainlock and the balance of the credit pool.
//!

use crate::blockdata::constants::{
    BLS_SIGNATURE_SIZE, COINBASE_VERSION_CHAINLOCK, COINBASE_VERSION_MN_LIST,
    COINBASE_VERSION_QUORUMS,
};
use crate::blockdata::transaction::special_transaction::json::{JsonFields, JsonObject};
use crate::blockdata::transaction::special_transaction::validation::{check_range, check_version};
use crate::blockdata::transaction::special_transaction::{
    Error, SpecialTransactionBasePayloadEncodable, SpecialTransactionPayload, TransactionType,
    ValidationError,
};
use crate::bls_sig_utils::BLSSignature;
use crate::consensus::encode::VarInt;
use crate::consensus::{encode, Decodable, Encodable};
use crate::hash_types::{MerkleRootMasternodeList, MerkleRootQuorums};
use crate::internal_macros::impl_payload_serde;
use crate::io;

/// A Coinbase payload. This is contained as the payload of a coinbase special transaction.
/// The Coinbase payload is described in DIP4.
///
/// The optional fields are present exactly when `version` calls for them.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub struct CoinbasePayload {
    /// The payload version, 1 to 3.
    pub version: u16,
    /// The height of the block holding the coinbase.
    pub height: u32,
    /// The merkle root of the masternode list.
    pub merkle_root_masternode_list: MerkleRootMasternodeList,
    /// The merkle root of the active quorums, from version 2.
    pub merkle_root_quorums: Option<MerkleRootQuorums>,
    /// How far below `height` the best known chainlock is, from version 3.
    pub best_cl_height_diff: Option<u64>,
    /// The signature of the best known chainlock, from version 3.
    pub best_cl_signature: Option<BLSSignature>,
    /// The credit pool balance in duffs, from version 3.
    pub credit_pool_balance: Option<i64>,
}

impl SpecialTransactionBasePayloadEncodable for CoinbasePayload {
    fn base_payload_data_encode<W: io::Write>(&self, mut w: W) -> Result<usize, io::Error> {
        self.consensus_encode(&mut w)
    }
}

impl Encodable for CoinbasePayload {
    fn consensus_encode<W: io::Write + ?Sized>(&self, w: &mut W) -> Result<usize, io::Error> {
        let mut len = 0;
        len += self.version.consensus_encode(w)?;
        len += self.height.consensus_encode(w)?;
        len += self.merkle_root_masternode_list.consensus_encode(w)?;
        if let Some(merkle_root_quorums) = &self.merkle_root_quorums {
            len += merkle_root_quorums.consensus_encode(w)?;
        }
        if let Some(best_cl_height_diff) = self.best_cl_height_diff {
            len += VarInt(best_cl_height_diff).consensus_encode(w)?;
        }
        if let Some(best_cl_signature) = &self.best_cl_signature {
            len += best_cl_signature.consensus_encode(w)?;
        }
        if let Some(credit_pool_balance) = self.credit_pool_balance {
            len += credit_pool_balance.consensus_encode(w)?;
        }
        Ok(len)
    }
}

impl Decodable for CoinbasePayload {
    fn consensus_decode<R: io::Read + ?Sized>(r: &mut R) -> Result<Self, encode::Error> {
        let version = u16::consensus_decode(r)?;
        let height = u32::consensus_decode(r)?;
        let merkle_root_masternode_list = MerkleRootMasternodeList::consensus_decode(r)?;
        let merkle_root_quorums = if version >= COINBASE_VERSION_QUORUMS {
            Some(MerkleRootQuorums::consensus_decode(r)?)
        } else {
            None
        };
        let (best_cl_height_diff, best_cl_signature, credit_pool_balance) =
            if version >= COINBASE_VERSION_CHAINLOCK {
                (
                    Some(VarInt::consensus_decode(r)?.0),
                    Some(BLSSignature::consensus_decode(r)?),
                    Some(i64::consensus_decode(r)?),
                )
            } else {
                (None, None, None)
            };

        Ok(CoinbasePayload {
            version,
            height,
            merkle_root_masternode_list,
            merkle_root_quorums,
            best_cl_height_diff,
            best_cl_signature,
            credit_pool_balance,
        })
    }
}

impl SpecialTransactionPayload for CoinbasePayload {
    const TRANSACTION_TYPE: TransactionType = TransactionType::Coinbase;

    fn size(&self) -> usize {
        let mut size = 2 + 4 + 32;
        if self.merkle_root_quorums.is_some() {
            size += 32;
        }
        if let Some(best_cl_height_diff) = self.best_cl_height_diff {
            size += VarInt(best_cl_height_diff).len();
        }
        if self.best_cl_signature.is_some() {
            size += BLS_SIGNATURE_SIZE;
        }
        if self.credit_pool_balance.is_some() {
            size += 8;
        }
        size
    }

    fn check_fields(&self) -> Result<(), ValidationError> {
        check_version("version", self.version, COINBASE_VERSION_MN_LIST..=COINBASE_VERSION_CHAINLOCK)?;
        if self.merkle_root_quorums.is_some() != (self.version >= COINBASE_VERSION_QUORUMS) {
            return Err(ValidationError::Inconsistent(
                "merkleRootQuorums must be present exactly from version 2",
            ));
        }
        let chainlock_fields = [
            self.best_cl_height_diff.is_some(),
            self.best_cl_signature.is_some(),
            self.credit_pool_balance.is_some(),
        ];
        let expected = self.version >= COINBASE_VERSION_CHAINLOCK;
        if chainlock_fields.iter().any(|present| *present != expected) {
            return Err(ValidationError::Inconsistent(
                "chainlock and credit pool fields must be present exactly from version 3",
            ));
        }
        if let Some(credit_pool_balance) = self.credit_pool_balance {
            check_range("creditPoolBalance", credit_pool_balance, 0, i64::MAX)?;
        }
        Ok(())
    }

    fn read_json_fields(fields: &JsonFields) -> Result<Self, Error> {
        let merkle_root_quorums = if fields.contains("merkleRootQuorums") {
            Some(fields.parse_with(
                "merkleRootQuorums",
                "a 32 byte hash",
                MerkleRootQuorums::from_hex,
            )?)
        } else {
            None
        };
        let best_cl_height_diff = if fields.contains("bestCLHeightDiff") {
            Some(fields.integer("bestCLHeightDiff")?)
        } else {
            None
        };
        let best_cl_signature = if fields.contains("bestCLSignature") {
            Some(fields.parse_with(
                "bestCLSignature",
                "a 96 byte BLS signature",
                BLSSignature::from_hex,
            )?)
        } else {
            None
        };
        let credit_pool_balance = if fields.contains("creditPoolBalance") {
            Some(fields.integer("creditPoolBalance")?)
        } else {
            None
        };

        Ok(CoinbasePayload {
            version: fields.integer("version")?,
            height: fields.integer("height")?,
            merkle_root_masternode_list: fields.parse_with(
                "merkleRootMNList",
                "a 32 byte hash",
                MerkleRootMasternodeList::from_hex,
            )?,
            merkle_root_quorums,
            best_cl_height_diff,
            best_cl_signature,
            credit_pool_balance,
        })
    }

    fn write_json_fields(&self) -> JsonObject {
        let mut object = JsonObject::new()
            .number("version", self.version)
            .number("height", self.height)
            .string("merkleRootMNList", self.merkle_root_masternode_list);
        if let Some(merkle_root_quorums) = self.merkle_root_quorums {
            object = object.string("merkleRootQuorums", merkle_root_quorums);
        }
        if let Some(best_cl_height_diff) = self.best_cl_height_diff {
            object = object.number("bestCLHeightDiff", best_cl_height_diff);
        }
        if let Some(best_cl_signature) = self.best_cl_signature {
            object = object.string("bestCLSignature", best_cl_signature);
        }
        if let Some(credit_pool_balance) = self.credit_pool_balance {
            object = object.number("creditPoolBalance", credit_pool_balance);
        }
        object
    }
}

impl_payload_serde!(CoinbasePayload);

#[cfg(test)]
mod tests {
    use hashes::Hash;
    use serde_json::json;

    use super::*;
    use crate::consensus::serialize;

    const COINBASE_V1_HEX: &str =
        "0100080000003da1ae2e7c1d5dc1b4ebcf2de4e15478f7a5c8ac13ab6e3bc6d04b3c6c6e5e4d";

    fn coinbase_v3() -> CoinbasePayload {
        CoinbasePayload {
            version: 3,
            height: 1_000_000,
            merkle_root_masternode_list: MerkleRootMasternodeList::from_byte_array([0x11; 32]),
            merkle_root_quorums: Some(MerkleRootQuorums::from_byte_array([0x22; 32])),
            best_cl_height_diff: Some(300),
            best_cl_signature: Some(BLSSignature::from([0x33; 96])),
            credit_pool_balance: Some(12_345_678),
        }
    }

    #[test]
    fn test_coinbase_payload_v1() {
        let raw = hex!(COINBASE_V1_HEX);
        let payload = CoinbasePayload::from_buffer(&raw).unwrap();
        assert_eq!(payload.version, 1);
        assert_eq!(payload.height, 8);
        assert_eq!(
            payload.merkle_root_masternode_list.to_hex(),
            "4d5e6e6c3c4bd0c63b6eab13acc8a5f77854e1e42dcfebb4c15d1d7c2eaea13d"
        );
        assert_eq!(payload.merkle_root_quorums, None);
        assert_eq!(payload.size(), raw.len());
        assert_eq!(payload.to_buffer().unwrap(), raw);

        // no detachable signature, the hash covers everything
        assert_eq!(
            payload.payload_hash().unwrap(),
            crate::hash_types::SpecialTransactionPayloadHash::hash(&raw)
        );
    }

    #[test]
    fn test_coinbase_payload_v2() {
        let mut raw = hex!(COINBASE_V1_HEX);
        raw[0] = 2;
        raw.extend_from_slice(&[0x44; 32]);
        let payload = CoinbasePayload::from_buffer(&raw).unwrap();
        assert_eq!(payload.merkle_root_quorums, Some(MerkleRootQuorums::from_byte_array([0x44; 32])));
        assert_eq!(payload.to_buffer().unwrap(), raw);

        // a version 2 payload without the quorum root is cut short
        let mut short = hex!(COINBASE_V1_HEX);
        short[0] = 2;
        assert!(matches!(CoinbasePayload::from_buffer(&short), Err(Error::PayloadTruncated)));
    }

    #[test]
    fn test_coinbase_payload_v3() {
        let payload = coinbase_v3();
        let raw = payload.to_buffer().unwrap();
        // 300 needs a three byte compact size
        assert_eq!(raw.len(), 2 + 4 + 32 + 32 + 3 + 96 + 8);
        assert_eq!(&raw[70..73], &[0xfd, 0x2c, 0x01]);
        assert_eq!(payload.size(), raw.len());
        assert_eq!(CoinbasePayload::from_buffer(&raw).unwrap(), payload);

        let value = payload.to_json().unwrap();
        assert_eq!(value["bestCLHeightDiff"], json!(300));
        assert_eq!(value["creditPoolBalance"], json!(12_345_678));
        assert_eq!(CoinbasePayload::from_json(&value).unwrap(), payload);
        serde_round_trip!(payload);
    }

    #[test]
    fn version_and_fields_must_agree() {
        let mut payload = coinbase_v3();
        payload.credit_pool_balance = None;
        assert!(matches!(
            payload.validate(),
            Err(Error::ValidationFailed(ValidationError::Inconsistent(_)))
        ));

        let mut payload = coinbase_v3();
        payload.version = 2;
        assert!(payload.validate().is_err());

        let mut payload = coinbase_v3();
        payload.credit_pool_balance = Some(-1);
        assert_error_contains!(payload.to_buffer(), "creditPoolBalance -1 is out of range");

        let mut payload = coinbase_v3();
        payload.version = 4;
        assert!(CoinbasePayload::from_buffer(&serialize(&payload)).is_err());
    }

    #[test]
    fn json_keys_follow_version() {
        let payload = CoinbasePayload::from_buffer(&hex!(COINBASE_V1_HEX)).unwrap();
        let value = payload.to_json().unwrap();
        assert_eq!(
            value,
            json!({
                "version": 1,
                "height": 8,
                "merkleRootMNList": "4d5e6e6c3c4bd0c63b6eab13acc8a5f77854e1e42dcfebb4c15d1d7c2eaea13d",
            })
        );

        let mut upgraded = value;
        upgraded["version"] = json!(2);
        assert!(matches!(
            CoinbasePayload::from_json(&upgraded),
            Err(Error::ValidationFailed(ValidationError::Inconsistent(_)))
        ));
    }
}
