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

//! Dash Provider Update Registrar Special Transaction.
//!
//! The provider update registrar special transaction is used to update the owner controlled
//! options for a masternode.
//! It is defined in DIP3 https://github.com/dashpay/dips/blob/master/dip-0003.md.
//!
//! The owner of a masternode can use this transaction to replace the key identifiers of the
//! operator and of the voting key, and to change the payout script. The update is authorised by
//! `payload_sig`, made by the owner key over every other field of the payload.
//!

use crate::blockdata::constants::{
    KEY_ID_SIZE, MAX_PAYLOAD_SIG_SIZE, MAX_SCRIPT_SIZE, PROVIDER_UPDATE_REGISTRAR_VERSION,
};
use crate::blockdata::transaction::special_transaction::json::{JsonFields, JsonObject};
use crate::blockdata::transaction::special_transaction::validation::{
    check_length, check_not_null, check_version,
};
use crate::blockdata::transaction::special_transaction::{
    Error, SpecialTransactionBasePayloadEncodable, SpecialTransactionPayload, TransactionType,
    ValidationError,
};
use crate::consensus::encode::size_with_prefix;
use crate::consensus::{encode, Decodable, Encodable};
use crate::hash_types::{InputsHash, ProTxHash, PubkeyHash};
use crate::internal_macros::impl_payload_serde;
use crate::io;

/// A Provider Update Registrar Payload used in a Provider Update Registrar Special Transaction.
/// This is used to update the base aspects a Masternode on the network.
/// It must be signed by the owner's key that was set at registration.
///
/// Interesting Fields:
/// *The mode is carried through unchanged, every value of it is accepted.
/// *The script payout is the script to which one wants to have the masternode pay out.
/// *The inputs hash is used to guarantee the uniqueness of the payload sig.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub struct ProviderUpdateRegistrarPayload {
    /// The payload version, currently always 1.
    pub version: u16,
    /// The hash of the registration transaction of the masternode being updated.
    pub pro_tx_hash: ProTxHash,
    /// The operation mode.
    pub mode: u16,
    /// The key identifier of the new operator key.
    pub key_id_operator: PubkeyHash,
    /// The key identifier of the new voting key.
    pub key_id_voting: PubkeyHash,
    /// The script the masternode reward is paid to.
    pub script_payout: Vec<u8>,
    /// The hash of all inputs of the carrying transaction.
    pub inputs_hash: InputsHash,
    /// The owner signature over the rest of the payload, empty before signing.
    pub payload_sig: Vec<u8>,
}

impl SpecialTransactionBasePayloadEncodable for ProviderUpdateRegistrarPayload {
    fn base_payload_data_encode<W: io::Write>(&self, mut w: W) -> Result<usize, io::Error> {
        let mut len = 0;
        len += self.version.consensus_encode(&mut w)?;
        len += self.pro_tx_hash.consensus_encode(&mut w)?;
        len += self.mode.consensus_encode(&mut w)?;
        len += self.key_id_operator.consensus_encode(&mut w)?;
        len += self.key_id_voting.consensus_encode(&mut w)?;
        len += self.script_payout.consensus_encode(&mut w)?;
        len += self.inputs_hash.consensus_encode(&mut w)?;
        Ok(len)
    }
}

impl Encodable for ProviderUpdateRegistrarPayload {
    fn consensus_encode<W: io::Write + ?Sized>(&self, w: &mut W) -> Result<usize, io::Error> {
        let mut len = 0;
        len += self.base_payload_data_encode(&mut *w)?;
        len += self.payload_sig.consensus_encode(w)?;
        Ok(len)
    }
}

impl Decodable for ProviderUpdateRegistrarPayload {
    fn consensus_decode<R: io::Read + ?Sized>(r: &mut R) -> Result<Self, encode::Error> {
        let version = u16::consensus_decode(r)?;
        let pro_tx_hash = ProTxHash::consensus_decode(r)?;
        let mode = u16::consensus_decode(r)?;
        let key_id_operator = PubkeyHash::consensus_decode(r)?;
        let key_id_voting = PubkeyHash::consensus_decode(r)?;
        let script_payout = Vec::<u8>::consensus_decode(r)?;
        let inputs_hash = InputsHash::consensus_decode(r)?;
        let payload_sig = Vec::<u8>::consensus_decode(r)?;

        Ok(ProviderUpdateRegistrarPayload {
            version,
            pro_tx_hash,
            mode,
            key_id_operator,
            key_id_voting,
            script_payout,
            inputs_hash,
            payload_sig,
        })
    }
}

impl SpecialTransactionPayload for ProviderUpdateRegistrarPayload {
    const TRANSACTION_TYPE: TransactionType = TransactionType::ProviderUpdateRegistrar;

    fn size(&self) -> usize {
        2 + 32 + 2 + KEY_ID_SIZE * 2
            + size_with_prefix(&self.script_payout)
            + 32
            + size_with_prefix(&self.payload_sig)
    }

    fn check_fields(&self) -> Result<(), ValidationError> {
        check_version(
            "version",
            self.version,
            PROVIDER_UPDATE_REGISTRAR_VERSION..=PROVIDER_UPDATE_REGISTRAR_VERSION,
        )?;
        check_not_null("proTXHash", &self.pro_tx_hash)?;
        check_not_null("keyIdVoting", &self.key_id_voting)?;
        check_length("scriptPayout", &self.script_payout, 1, MAX_SCRIPT_SIZE)?;
        check_length("payloadSig", &self.payload_sig, 0, MAX_PAYLOAD_SIG_SIZE)
    }

    fn read_json_fields(fields: &JsonFields) -> Result<Self, Error> {
        Ok(ProviderUpdateRegistrarPayload {
            version: fields.integer("version")?,
            pro_tx_hash: fields.parse_with("proTXHash", "a 32 byte hash", ProTxHash::from_hex)?,
            mode: fields.integer("mode")?,
            key_id_operator: fields.parse_with(
                "keyIdOperator",
                "a 20 byte key id",
                PubkeyHash::from_hex,
            )?,
            key_id_voting: fields.parse_with(
                "keyIdVoting",
                "a 20 byte key id",
                PubkeyHash::from_hex,
            )?,
            script_payout: fields.hex_bytes("scriptPayout")?,
            inputs_hash: fields.parse_with("inputsHash", "a 32 byte hash", InputsHash::from_hex)?,
            payload_sig: fields.omittable_hex_bytes("payloadSig")?,
        })
    }

    fn write_json_fields(&self) -> JsonObject {
        JsonObject::new()
            .number("version", self.version)
            .string("proTXHash", self.pro_tx_hash)
            .number("mode", self.mode)
            .string("keyIdOperator", self.key_id_operator)
            .string("keyIdVoting", self.key_id_voting)
            .hex("scriptPayout", &self.script_payout)
            .string("inputsHash", self.inputs_hash)
            .hex_unless_empty("payloadSig", &self.payload_sig)
    }
}

impl_payload_serde!(ProviderUpdateRegistrarPayload);
