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

//! Dash Provider Update Revocation Special Transaction.
//!
//! The provider update revocation special transaction is used to signal to the owner that they
//! should choose a new operator.
//!
//! It is defined in DIP3 https://github.com/dashpay/dips/blob/master/dip-0003.md as follows:
//!
//! If an operator suspects their keys are insecure or if they wish to terminate service, they
//! can issue a special transaction to the network. This special transaction is called a Provider
//! Update Revocation Transaction and is abbreviated as ProUpRevTx. It can only be done by the
//! operator and allows them to signal the owner through the blockchain to choose a new operator
//! (or the same one with a new non-compromised key).
//!
//! <https://github.com/dashpay/dips/blob/master/dip-0003.md#appendix-a-reasons-for-self-revocation-of-operators>
//! describes potential reasons for a revocation.
//!
//! The special transaction type used for Provider Update Revoking Transactions is 4.

use core::convert::TryFrom;
use core::fmt;

use crate::blockdata::constants::{BLS_SIGNATURE_SIZE, PROVIDER_UPDATE_REVOCATION_VERSION};
use crate::blockdata::transaction::special_transaction::json::{JsonFields, JsonObject};
use crate::blockdata::transaction::special_transaction::validation::{
    check_not_null, check_range, check_version,
};
use crate::blockdata::transaction::special_transaction::{
    Error, SpecialTransactionBasePayloadEncodable, SpecialTransactionPayload, TransactionType,
    ValidationError,
};
use crate::bls_sig_utils::BLSSignature;
use crate::consensus::{encode, Decodable, Encodable};
use crate::hash_types::{InputsHash, ProTxHash};
use crate::internal_macros::impl_payload_serde;
use crate::io;

/// Why an operator revokes its own key.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[repr(u16)]
pub enum RevocationReason {
    /// No reason given.
    NotSpecified = 0,
    /// The operator is ending the service.
    TerminationOfService = 1,
    /// The operator keys may be compromised.
    CompromisedKeys = 2,
    /// The operator wants a new key.
    ChangeOfKeys = 3,
}

impl RevocationReason {
    /// The highest known reason code.
    pub const MAX: u16 = RevocationReason::ChangeOfKeys as u16;
}

impl TryFrom<u16> for RevocationReason {
    type Error = ValidationError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(RevocationReason::NotSpecified),
            1 => Ok(RevocationReason::TerminationOfService),
            2 => Ok(RevocationReason::CompromisedKeys),
            3 => Ok(RevocationReason::ChangeOfKeys),
            _ => Err(ValidationError::OutOfRange {
                field: "reason",
                value: value.into(),
                min: 0,
                max: RevocationReason::MAX.into(),
            }),
        }
    }
}

impl fmt::Display for RevocationReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            RevocationReason::NotSpecified => write!(f, "not specified"),
            RevocationReason::TerminationOfService => write!(f, "termination of service"),
            RevocationReason::CompromisedKeys => write!(f, "compromised keys"),
            RevocationReason::ChangeOfKeys => write!(f, "change of keys"),
        }
    }
}

/// A Provider Update Revocation Payload used in a Provider Update Revocation Special Transaction.
/// This is used to signal and stop a Masternode from the operator.
/// It must be signed by the operator's key that was set at registration or registrar update.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub struct ProviderUpdateRevocationPayload {
    /// The payload version.
    pub version: u16,
    /// The hash of the registration transaction of the masternode being revoked.
    pub pro_tx_hash: ProTxHash,
    /// The raw reason code, see [`RevocationReason`].
    pub reason: u16,
    /// The hash of all inputs of the carrying transaction.
    pub inputs_hash: InputsHash,
    /// The operator signature over the rest of the payload.
    pub payload_sig: BLSSignature,
}

impl ProviderUpdateRevocationPayload {
    /// The revocation reason, or an error if the code is not a known reason.
    pub fn revocation_reason(&self) -> Result<RevocationReason, ValidationError> {
        RevocationReason::try_from(self.reason)
    }
}

impl SpecialTransactionBasePayloadEncodable for ProviderUpdateRevocationPayload {
    fn base_payload_data_encode<W: io::Write>(&self, mut w: W) -> Result<usize, io::Error> {
        let mut len = 0;
        len += self.version.consensus_encode(&mut w)?;
        len += self.pro_tx_hash.consensus_encode(&mut w)?;
        len += self.reason.consensus_encode(&mut w)?;
        len += self.inputs_hash.consensus_encode(&mut w)?;
        Ok(len)
    }
}

impl Encodable for ProviderUpdateRevocationPayload {
    fn consensus_encode<W: io::Write + ?Sized>(&self, w: &mut W) -> Result<usize, io::Error> {
        let mut len = 0;
        len += self.base_payload_data_encode(&mut *w)?;
        len += self.payload_sig.consensus_encode(w)?;
        Ok(len)
    }
}

impl Decodable for ProviderUpdateRevocationPayload {
    fn consensus_decode<R: io::Read + ?Sized>(r: &mut R) -> Result<Self, encode::Error> {
        let version = u16::consensus_decode(r)?;
        let pro_tx_hash = ProTxHash::consensus_decode(r)?;
        let reason = u16::consensus_decode(r)?;
        let inputs_hash = InputsHash::consensus_decode(r)?;
        let payload_sig = BLSSignature::consensus_decode(r)?;

        Ok(ProviderUpdateRevocationPayload { version, pro_tx_hash, reason, inputs_hash, payload_sig })
    }
}

impl SpecialTransactionPayload for ProviderUpdateRevocationPayload {
    const TRANSACTION_TYPE: TransactionType = TransactionType::ProviderUpdateRevocation;

    fn size(&self) -> usize { 2 + 32 + 2 + 32 + BLS_SIGNATURE_SIZE }

    fn check_fields(&self) -> Result<(), ValidationError> {
        check_version(
            "version",
            self.version,
            PROVIDER_UPDATE_REVOCATION_VERSION..=PROVIDER_UPDATE_REVOCATION_VERSION,
        )?;
        check_not_null("proTXHash", &self.pro_tx_hash)?;
        check_range("reason", self.reason.into(), 0, RevocationReason::MAX.into())
    }

    fn read_json_fields(fields: &JsonFields) -> Result<Self, Error> {
        Ok(ProviderUpdateRevocationPayload {
            version: fields.integer("version")?,
            pro_tx_hash: fields.parse_with("proTXHash", "a 32 byte hash", ProTxHash::from_hex)?,
            reason: fields.integer("reason")?,
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
            .number("reason", self.reason)
            .string("inputsHash", self.inputs_hash)
            .string("payloadSig", self.payload_sig)
    }
}

impl_payload_serde!(ProviderUpdateRevocationPayload);
