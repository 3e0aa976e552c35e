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

//! Dash Quorum Commitment Special Transaction.
//!
//! It is defined in DIP6 https://github.com/dashpay/dips/blob/master/dip-0006.md.
//!

use crate::blockdata::constants::{
    BLS_PUBLIC_KEY_SIZE, BLS_SIGNATURE_SIZE, MAX_QUORUM_FINAL_COMMITMENT_VERSION,
    MIN_QUORUM_FINAL_COMMITMENT_VERSION, QUORUM_COMMITMENT_VERSION,
};
use crate::blockdata::transaction::special_transaction::json::{JsonFields, JsonObject};
use crate::blockdata::transaction::special_transaction::validation::{
    check_not_null, check_range, check_version,
};
use crate::blockdata::transaction::special_transaction::{
    Error, SpecialTransactionBasePayloadEncodable, SpecialTransactionPayload, TransactionType,
    ValidationError,
};
use crate::bls_sig_utils::{BLSPublicKey, BLSSignature};
use crate::consensus::encode::{read_bounded, VarInt};
use crate::consensus::{encode, Decodable, Encodable};
use crate::hash_types::{QuorumHash, QuorumVVecHash};
use crate::internal_macros::impl_payload_serde;
use crate::io;

/// Packs bits LSB-first, the last byte padded with zero bits.
fn pack_bits(bits: &[bool]) -> Vec<u8> {
    let mut bytes = vec![0u8; (bits.len() + 7) / 8];
    for (i, _) in bits.iter().enumerate().filter(|(_, bit)| **bit) {
        bytes[i / 8] |= 1 << (i % 8);
    }
    bytes
}

/// Unpacks `count` bits, `None` if `bytes` has the wrong length or a padding bit is set.
fn unpack_bits(bytes: &[u8], count: usize) -> Option<Vec<bool>> {
    if bytes.len() != count / 8 + usize::from(count % 8 != 0) {
        return None;
    }
    if count % 8 != 0 && bytes[bytes.len() - 1] >> (count % 8) != 0 {
        return None;
    }
    Some((0..count).map(|i| bytes[i / 8] & (1 << (i % 8)) != 0).collect())
}

fn bitset_size(bits: &[bool]) -> usize { VarInt(bits.len() as u64).len() + (bits.len() + 7) / 8 }

fn encode_bitset<W: io::Write + ?Sized>(bits: &[bool], w: &mut W) -> Result<usize, io::Error> {
    let mut len = VarInt(bits.len() as u64).consensus_encode(w)?;
    let bytes = pack_bits(bits);
    w.write_all(&bytes)?;
    len += bytes.len();
    Ok(len)
}

fn decode_bitset<R: io::Read + ?Sized>(r: &mut R) -> Result<Vec<bool>, encode::Error> {
    let count = VarInt::consensus_decode(r)?.0;
    let bytes = read_bounded(r, count / 8 + u64::from(count % 8 != 0))?;
    unpack_bits(&bytes, count as usize)
        .ok_or(encode::Error::ParseFailed("non-zero padding bits in bitset"))
}

fn is_indexed(version: u16) -> bool { version == 2 || version == 4 }

/// A Quorum Finalization Commitment. It is described in the finalization section of DIP6:
/// https://github.com/dashpay/dips/blob/master/dip-0006.md#6-finalization-phase
///
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub struct QuorumFinalizationCommitment {
    /// The commitment version, 1 to 4. Versions 2 and 4 carry a quorum index.
    pub version: u16,
    /// The type of the long living masternode quorum.
    pub llmq_type: u8,
    /// The hash of the block the quorum was formed at.
    pub quorum_hash: QuorumHash,
    /// The index of the quorum among rotating quorums.
    pub quorum_index: Option<i16>,
    /// Which members signed the commitment.
    pub signers: Vec<bool>,
    /// Which members are valid.
    pub valid_members: Vec<bool>,
    /// The quorum public key.
    pub quorum_public_key: BLSPublicKey,
    /// The hash of the quorum verification vector.
    pub quorum_vvec_hash: QuorumVVecHash,
    /// The threshold signature of the quorum.
    pub quorum_sig: BLSSignature,
    /// The aggregated signature of the signing members.
    pub members_sig: BLSSignature,
}

impl QuorumFinalizationCommitment {
    /// The size of the encoded commitment in bytes.
    pub fn size(&self) -> usize {
        let mut size = 2 + 1 + 32;
        if self.quorum_index.is_some() {
            size += 2;
        }
        size + bitset_size(&self.signers)
            + bitset_size(&self.valid_members)
            + BLS_PUBLIC_KEY_SIZE
            + 32
            + BLS_SIGNATURE_SIZE * 2
    }

    /// The number of members that signed.
    pub fn count_signers(&self) -> usize { self.signers.iter().filter(|b| **b).count() }

    /// The number of valid members.
    pub fn count_valid_members(&self) -> usize {
        self.valid_members.iter().filter(|b| **b).count()
    }

    fn check_fields(&self) -> Result<(), ValidationError> {
        check_version(
            "commitment version",
            self.version,
            MIN_QUORUM_FINAL_COMMITMENT_VERSION..=MAX_QUORUM_FINAL_COMMITMENT_VERSION,
        )?;
        check_range("llmqType", self.llmq_type.into(), 1, u8::MAX.into())?;
        check_not_null("quorumHash", &self.quorum_hash)?;
        match self.quorum_index {
            Some(_) if !is_indexed(self.version) => {
                return Err(ValidationError::Inconsistent(
                    "quorumIndex is only carried by indexed commitment versions",
                ))
            }
            None if is_indexed(self.version) => {
                return Err(ValidationError::Inconsistent(
                    "indexed commitment versions require a quorumIndex",
                ))
            }
            Some(quorum_index) => {
                check_range("quorumIndex", quorum_index.into(), 0, i16::MAX.into())?
            }
            None => {}
        }
        if self.signers.len() != self.valid_members.len() {
            return Err(ValidationError::Inconsistent(
                "signers and validMembers must have the same bit count",
            ));
        }
        Ok(())
    }

    fn read_json_fields(fields: &JsonFields) -> Result<Self, Error> {
        let quorum_index =
            if fields.contains("quorumIndex") { Some(fields.integer("quorumIndex")?) } else { None };
        Ok(QuorumFinalizationCommitment {
            version: fields.integer("version")?,
            llmq_type: fields.integer("llmqType")?,
            quorum_hash: fields.parse_with("quorumHash", "a 32 byte hash", QuorumHash::from_hex)?,
            quorum_index,
            signers: read_json_bitset(fields, "signersCount", "signers")?,
            valid_members: read_json_bitset(fields, "validMembersCount", "validMembers")?,
            quorum_public_key: fields.parse_with(
                "quorumPublicKey",
                "a 48 byte BLS public key",
                BLSPublicKey::from_hex,
            )?,
            quorum_vvec_hash: fields.parse_with(
                "quorumVvecHash",
                "a 32 byte hash",
                QuorumVVecHash::from_hex,
            )?,
            quorum_sig: fields.parse_with(
                "quorumSig",
                "a 96 byte BLS signature",
                BLSSignature::from_hex,
            )?,
            members_sig: fields.parse_with(
                "membersSig",
                "a 96 byte BLS signature",
                BLSSignature::from_hex,
            )?,
        })
    }

    fn write_json_fields(&self) -> JsonObject {
        let mut object = JsonObject::new()
            .number("version", self.version)
            .number("llmqType", self.llmq_type)
            .string("quorumHash", self.quorum_hash);
        if let Some(quorum_index) = self.quorum_index {
            object = object.number("quorumIndex", quorum_index);
        }
        object
            .number("signersCount", self.signers.len() as u64)
            .hex("signers", pack_bits(&self.signers))
            .number("validMembersCount", self.valid_members.len() as u64)
            .hex("validMembers", pack_bits(&self.valid_members))
            .string("quorumPublicKey", self.quorum_public_key)
            .string("quorumVvecHash", self.quorum_vvec_hash)
            .string("quorumSig", self.quorum_sig)
            .string("membersSig", self.members_sig)
    }
}

fn read_json_bitset(
    fields: &JsonFields,
    count_key: &'static str,
    bits_key: &'static str,
) -> Result<Vec<bool>, Error> {
    let count: usize = fields.integer(count_key)?;
    let bytes = fields.hex_bytes(bits_key)?;
    unpack_bits(&bytes, count).ok_or(Error::FieldMalformed {
        field: bits_key,
        expected: "a packed bitset matching its count with zero padding",
    })
}

impl Encodable for QuorumFinalizationCommitment {
    fn consensus_encode<W: io::Write + ?Sized>(&self, w: &mut W) -> Result<usize, io::Error> {
        let mut len = 0;
        len += self.version.consensus_encode(w)?;
        len += self.llmq_type.consensus_encode(w)?;
        len += self.quorum_hash.consensus_encode(w)?;
        if let Some(quorum_index) = self.quorum_index {
            len += quorum_index.consensus_encode(w)?;
        }
        len += encode_bitset(&self.signers, w)?;
        len += encode_bitset(&self.valid_members, w)?;
        len += self.quorum_public_key.consensus_encode(w)?;
        len += self.quorum_vvec_hash.consensus_encode(w)?;
        len += self.quorum_sig.consensus_encode(w)?;
        len += self.members_sig.consensus_encode(w)?;
        Ok(len)
    }
}

impl Decodable for QuorumFinalizationCommitment {
    fn consensus_decode<R: io::Read + ?Sized>(r: &mut R) -> Result<Self, encode::Error> {
        let version = u16::consensus_decode(r)?;
        let llmq_type = u8::consensus_decode(r)?;
        let quorum_hash = QuorumHash::consensus_decode(r)?;
        let quorum_index =
            if is_indexed(version) { Some(i16::consensus_decode(r)?) } else { None };
        let signers = decode_bitset(r)?;
        let valid_members = decode_bitset(r)?;
        let quorum_public_key = BLSPublicKey::consensus_decode(r)?;
        let quorum_vvec_hash = QuorumVVecHash::consensus_decode(r)?;
        let quorum_sig = BLSSignature::consensus_decode(r)?;
        let members_sig = BLSSignature::consensus_decode(r)?;
        Ok(QuorumFinalizationCommitment {
            version,
            llmq_type,
            quorum_hash,
            quorum_index,
            signers,
            valid_members,
            quorum_public_key,
            quorum_vvec_hash,
            quorum_sig,
            members_sig,
        })
    }
}

/// A Quorum Commitment Payload used in a Quorum Commitment Special Transaction.
/// This is used in the mining phase as described in DIP 6:
/// https://github.com/dashpay/dips/blob/master/dip-0006.md#7-mining-phase.
///
/// Miners take the best final commitment for a DKG session and mine it into a block.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub struct QuorumCommitmentPayload {
    /// The payload version.
    pub version: u16,
    /// The height of the block holding the commitment.
    pub height: u32,
    /// The mined commitment.
    pub commitment: QuorumFinalizationCommitment,
}

impl SpecialTransactionBasePayloadEncodable for QuorumCommitmentPayload {
    fn base_payload_data_encode<W: io::Write>(&self, mut w: W) -> Result<usize, io::Error> {
        self.consensus_encode(&mut w)
    }
}

impl Encodable for QuorumCommitmentPayload {
    fn consensus_encode<W: io::Write + ?Sized>(&self, w: &mut W) -> Result<usize, io::Error> {
        let mut len = 0;
        len += self.version.consensus_encode(w)?;
        len += self.height.consensus_encode(w)?;
        len += self.commitment.consensus_encode(w)?;
        Ok(len)
    }
}

impl Decodable for QuorumCommitmentPayload {
    fn consensus_decode<R: io::Read + ?Sized>(r: &mut R) -> Result<Self, encode::Error> {
        let version = u16::consensus_decode(r)?;
        let height = u32::consensus_decode(r)?;
        let commitment = QuorumFinalizationCommitment::consensus_decode(r)?;
        Ok(QuorumCommitmentPayload { version, height, commitment })
    }
}

impl SpecialTransactionPayload for QuorumCommitmentPayload {
    const TRANSACTION_TYPE: TransactionType = TransactionType::QuorumCommitment;

    fn size(&self) -> usize { 2 + 4 + self.commitment.size() }

    fn check_fields(&self) -> Result<(), ValidationError> {
        check_version("version", self.version, QUORUM_COMMITMENT_VERSION..=QUORUM_COMMITMENT_VERSION)?;
        self.commitment.check_fields()
    }

    fn read_json_fields(fields: &JsonFields) -> Result<Self, Error> {
        Ok(QuorumCommitmentPayload {
            version: fields.integer("version")?,
            height: fields.integer("height")?,
            commitment: QuorumFinalizationCommitment::read_json_fields(&fields.object("commitment")?)?,
        })
    }

    fn write_json_fields(&self) -> JsonObject {
        JsonObject::new()
            .number("version", self.version)
            .number("height", self.height)
            .object("commitment", self.commitment.write_json_fields())
    }
}

impl_payload_serde!(QuorumCommitmentPayload);

#[cfg(test)]
mod tests {
    use hashes::Hash;
    use serde_json::json;

    use super::*;
    use crate::consensus::{deserialize, serialize};

    fn commitment(version: u16) -> QuorumFinalizationCommitment {
        let mut signers = vec![true; 10];
        signers[3] = false;
        QuorumFinalizationCommitment {
            version,
            llmq_type: 4,
            quorum_hash: QuorumHash::from_byte_array([0x0a; 32]),
            quorum_index: if is_indexed(version) { Some(7) } else { None },
            signers,
            valid_members: vec![true; 10],
            quorum_public_key: BLSPublicKey::from([0x0b; 48]),
            quorum_vvec_hash: QuorumVVecHash::from_byte_array([0x0c; 32]),
            quorum_sig: BLSSignature::from([0x0d; 96]),
            members_sig: BLSSignature::from([0x0e; 96]),
        }
    }

    fn payload(version: u16) -> QuorumCommitmentPayload {
        QuorumCommitmentPayload { version: 1, height: 850_000, commitment: commitment(version) }
    }

    #[test]
    fn bitsets_pack_lsb_first() {
        let bits = [true, false, false, true, false, false, false, false, true];
        assert_eq!(pack_bits(&bits), vec![0x09, 0x01]);
        assert_eq!(unpack_bits(&[0x09, 0x01], 9).unwrap(), bits.to_vec());
        assert_eq!(unpack_bits(&[0x09, 0x03], 9), None);
        assert_eq!(unpack_bits(&[0x09], 9), None);
        assert_eq!(unpack_bits(&[], 0), Some(vec![]));

        assert_eq!(serialize(&VarInt(9)), vec![9]);
        let mut encoded = Vec::new();
        encode_bitset(&bits, &mut encoded).unwrap();
        assert_eq!(encoded, vec![0x09, 0x09, 0x01]);
        assert_eq!(decode_bitset(&mut encoded.as_slice()).unwrap(), bits.to_vec());
    }

    #[test]
    fn padding_bits_must_be_zero() {
        let raw = payload(1).to_buffer().unwrap();
        // signers: count byte then two packed bytes, the second holding two real bits
        let signers_at = 2 + 4 + 2 + 1 + 32;
        assert_eq!(raw[signers_at], 10);
        let mut tampered = raw.clone();
        tampered[signers_at + 2] |= 0x80;
        assert!(matches!(
            QuorumCommitmentPayload::from_buffer(&tampered),
            Err(Error::Decode(encode::Error::ParseFailed(_)))
        ));
    }

    #[test]
    fn huge_bitset_counts_are_rejected() {
        assert_eq!(unpack_bits(&[], usize::MAX), None);

        let mut value = payload(1).to_json().unwrap();
        value["commitment"]["signersCount"] = json!(u64::MAX);
        value["commitment"]["signers"] = json!("");
        assert!(matches!(
            QuorumCommitmentPayload::from_json(&value),
            Err(Error::FieldMalformed { field: "signers", .. })
                | Err(Error::FieldMalformed { field: "signersCount", .. })
        ));

        // a signers count far past the cap, followed by a handful of bytes
        let raw = payload(1).to_buffer().unwrap();
        let signers_at = 2 + 4 + 2 + 1 + 32;
        let mut lying = raw[..signers_at].to_vec();
        lying.extend_from_slice(&[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 1, 2, 3]);
        assert!(matches!(QuorumCommitmentPayload::from_buffer(&lying), Err(Error::PayloadTruncated)));
    }

    #[test]
    fn test_quorum_commitment_payload() {
        for version in 1..=4 {
            let original = payload(version);
            let raw = original.to_buffer().unwrap();
            assert_eq!(original.size(), raw.len());
            let decoded = QuorumCommitmentPayload::from_buffer(&raw).unwrap();
            assert_eq!(decoded, original);
            assert_eq!(decoded.commitment.count_signers(), 9);
            assert_eq!(decoded.commitment.count_valid_members(), 10);
            assert_eq!(
                deserialize::<QuorumFinalizationCommitment>(&serialize(&original.commitment)).unwrap(),
                original.commitment
            );
        }
        assert_eq!(payload(2).size(), payload(1).size() + 2);
    }

    #[test]
    fn json_round_trip() {
        let indexed = payload(2);
        let value = indexed.to_json().unwrap();
        assert_eq!(value["commitment"]["quorumIndex"], json!(7));
        assert_eq!(value["commitment"]["signersCount"], json!(10));
        assert_eq!(value["commitment"]["signers"], json!("f703"));
        assert_eq!(value["commitment"]["validMembers"], json!("ff03"));
        assert_eq!(QuorumCommitmentPayload::from_json(&value).unwrap(), indexed);
        assert!(payload(1).to_json().unwrap()["commitment"].get("quorumIndex").is_none());
        serde_round_trip!(indexed);

        let mut value = value;
        value["commitment"]["signers"] = json!("f707");
        assert!(matches!(
            QuorumCommitmentPayload::from_json(&value),
            Err(Error::FieldMalformed { field: "signers", .. })
                | Err(Error::FieldMalformed { field: "signersCount", .. })
        ));
        value["commitment"] = json!("not an object");
        assert!(matches!(
            QuorumCommitmentPayload::from_json(&value),
            Err(Error::FieldMalformed { field: "commitment", .. })
        ));
    }

    #[test]
    fn commitment_rules() {
        let mut bad = payload(1);
        bad.commitment.quorum_index = Some(1);
        assert!(matches!(
            bad.validate(),
            Err(Error::ValidationFailed(ValidationError::Inconsistent(_)))
        ));

        let mut bad = payload(4);
        bad.commitment.quorum_index = Some(-1);
        assert!(bad.validate().is_err());

        let mut bad = payload(1);
        bad.commitment.valid_members.pop();
        assert_error_contains!(bad.to_buffer(), "same bit count");

        let mut bad = payload(1);
        bad.commitment.llmq_type = 0;
        assert!(bad.validate().is_err());

        let mut bad = payload(1);
        bad.commitment.version = 5;
        assert_error_contains!(bad.validate(), "unsupported commitment version 5");

        let mut bad = payload(1);
        bad.version = 2;
        assert!(bad.validate().is_err());
    }
}
