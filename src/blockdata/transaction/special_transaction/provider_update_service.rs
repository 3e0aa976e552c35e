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

//! Dash Provider Update Service Special Transaction.
//!
//! The provider update service special transaction is used to update the operator controlled
//! options for a masternode.
//!
//! It is defined in DIP3 https://github.com/dashpay/dips/blob/master/dip-0003.md as follows:
//!
//! To service update a masternode, the masternode operator must submit another special
//! transaction (DIP2) to the network. This special transaction is called a Provider Update
//! Service Transaction and is abbreviated as ProUpServTx. It can only be done by the operator.
//!
//! An operator can update the IP address and port fields of a masternode entry. If a non-zero
//! operatorReward was set in the initial ProRegTx, the operator may also set the
//! scriptOperatorPayout field in the ProUpServTx. If scriptOperatorPayout is not set and
//! operatorReward is non-zero, the owner gets the full masternode reward.
//!
//! The special transaction type used for ProUpServTx Transactions is 2.

use crate::blockdata::constants::{
    BLS_SIGNATURE_SIZE, MAX_SCRIPT_SIZE, PROVIDER_UPDATE_SERVICE_VERSION,
};
use crate::blockdata::transaction::special_transaction::json::{JsonFields, JsonObject};
use crate::blockdata::transaction::special_transaction::validation::{
    check_length, check_not_null, check_service, check_version,
};
use crate::blockdata::transaction::special_transaction::{
    Error, SpecialTransactionBasePayloadEncodable, SpecialTransactionPayload, TransactionType,
    ValidationError,
};
use crate::bls_sig_utils::BLSSignature;
use crate::consensus::encode::size_with_prefix;
use crate::consensus::{encode, Decodable, Encodable};
use crate::hash_types::{InputsHash, ProTxHash};
use crate::internal_macros::impl_payload_serde;
use crate::io;

/// A Provider Update Service Payload used in a Provider Update Service Special Transaction.
/// This is used to update the operational aspects a Masternode on the network.
/// It must be signed by the operator's key that was set either at registration or by the last
/// registrar update of the masternode.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub struct ProviderUpdateServicePayload {
    /// The payload version.
    pub version: u16,
    /// The hash of the registration transaction of the masternode being updated.
    pub pro_tx_hash: ProTxHash,
    /// The new service address, as the sixteen wire bytes packed little-endian.
    pub ip_address: u128,
    /// The new service port, big-endian on the wire.
    pub port: u16,
    /// The script the operator share of the reward is paid to, possibly empty.
    pub script_operator_payout: Vec<u8>,
    /// The hash of all inputs of the carrying transaction.
    pub inputs_hash: InputsHash,
    /// The operator signature over the rest of the payload.
    pub payload_sig: BLSSignature,
}

impl SpecialTransactionBasePayloadEncodable for ProviderUpdateServicePayload {
    fn base_payload_data_encode<W: io::Write>(&self, mut w: W) -> Result<usize, io::Error> {
        let mut len = 0;
        len += self.version.consensus_encode(&mut w)?;
        len += self.pro_tx_hash.consensus_encode(&mut w)?;
        len += self.ip_address.consensus_encode(&mut w)?;
        len += u16::swap_bytes(self.port).consensus_encode(&mut w)?;
        len += self.script_operator_payout.consensus_encode(&mut w)?;
        len += self.inputs_hash.consensus_encode(&mut w)?;
        Ok(len)
    }
}

impl Encodable for ProviderUpdateServicePayload {
    fn consensus_encode<W: io::Write + ?Sized>(&self, w: &mut W) -> Result<usize, io::Error> {
        let mut len = 0;
        len += self.base_payload_data_encode(&mut *w)?;
        len += self.payload_sig.consensus_encode(w)?;
        Ok(len)
    }
}

impl Decodable for ProviderUpdateServicePayload {
    fn consensus_decode<R: io::Read + ?Sized>(r: &mut R) -> Result<Self, encode::Error> {
        let version = u16::consensus_decode(r)?;
        let pro_tx_hash = ProTxHash::consensus_decode(r)?;
        let ip_address = u128::consensus_decode(r)?;
        let port = u16::swap_bytes(u16::consensus_decode(r)?);
        let script_operator_payout = Vec::<u8>::consensus_decode(r)?;
        let inputs_hash = InputsHash::consensus_decode(r)?;
        let payload_sig = BLSSignature::consensus_decode(r)?;

        Ok(ProviderUpdateServicePayload {
            version,
            pro_tx_hash,
            ip_address,
            port,
            script_operator_payout,
            inputs_hash,
            payload_sig,
        })
    }
}

impl SpecialTransactionPayload for ProviderUpdateServicePayload {
    const TRANSACTION_TYPE: TransactionType = TransactionType::ProviderUpdateService;

    fn size(&self) -> usize {
        2 + 32 + 16 + 2 + size_with_prefix(&self.script_operator_payout) + 32 + BLS_SIGNATURE_SIZE
    }

    fn check_fields(&self) -> Result<(), ValidationError> {
        check_version(
            "version",
            self.version,
            PROVIDER_UPDATE_SERVICE_VERSION..=PROVIDER_UPDATE_SERVICE_VERSION,
        )?;
        check_not_null("proTXHash", &self.pro_tx_hash)?;
        check_service(self.ip_address, self.port, false)?;
        check_length("scriptOperatorPayout", &self.script_operator_payout, 0, MAX_SCRIPT_SIZE)
    }

    fn read_json_fields(fields: &JsonFields) -> Result<Self, Error> {
        let (ip_address, port) = fields.service("service")?;
        Ok(ProviderUpdateServicePayload {
            version: fields.integer("version")?,
            pro_tx_hash: fields.parse_with("proTXHash", "a 32 byte hash", ProTxHash::from_hex)?,
            ip_address,
            port,
            script_operator_payout: fields.optional_hex_bytes("scriptOperatorPayout")?,
            inputs_hash: fields.parse_with("inputsHash", "a 32 byte hash", InputsHash::from_hex)?,
            payload_sig: fields.parse_with(
                "payloadSig",
                "a 96 byte BLS signature",
                BLSSignature::from_hex,
            )?,
        })
    }

    fn write_json_fields(&self) -> JsonObject {
        JsonObject::new()
            .number("version", self.version)
            .string("proTXHash", self.pro_tx_hash)
            .service("service", self.ip_address, self.port)
            .hex("scriptOperatorPayout", &self.script_operator_payout)
            .string("inputsHash", self.inputs_hash)
            .string("payloadSig", self.payload_sig)
    }
}

impl_payload_serde!(ProviderUpdateServicePayload);
