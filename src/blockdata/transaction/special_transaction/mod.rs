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

//! Dash Special Transaction.
//!
//! A dash special transaction's purpose is to relay more data than just economic information.
//! They are defined in DIP2 [dip-0002](https://github.com/dashpay/dips/blob/master/dip-0002.md).
//! The list of special transactions can be found here:
//! [dip-0002-special-transactions](https://github.com/dashpay/dips/blob/master/dip-0002-special-transactions.md)
//!
//! Every payload implements [`SpecialTransactionPayload`]. Values only come into existence
//! through [`SpecialTransactionPayload::from_buffer`] or [`SpecialTransactionPayload::from_json`],
//! both of which validate, and every serialisation path validates again before emitting anything.
//! A payload that was mutated into an invalid state can therefore never be written out.
//!

use core::convert::TryFrom;
use core::fmt::{Debug, Display, Formatter};

use log::{debug, trace};
use serde_json::Value;

use crate::blockdata::transaction::special_transaction::coinbase::CoinbasePayload;
use crate::blockdata::transaction::special_transaction::provider_registration::ProviderRegistrationPayload;
use crate::blockdata::transaction::special_transaction::provider_update_registrar::ProviderUpdateRegistrarPayload;
use crate::blockdata::transaction::special_transaction::provider_update_revocation::ProviderUpdateRevocationPayload;
use crate::blockdata::transaction::special_transaction::provider_update_service::ProviderUpdateServicePayload;
use crate::blockdata::transaction::special_transaction::quorum_commitment::QuorumCommitmentPayload;
use crate::blockdata::transaction::special_transaction::TransactionPayload::{CoinbasePayloadType, ProviderRegistrationPayloadType, ProviderUpdateRegistrarPayloadType, ProviderUpdateRevocationPayloadType, ProviderUpdateServicePayloadType, QuorumCommitmentPayloadType};
use crate::blockdata::transaction::special_transaction::TransactionType::{Classic, Coinbase, ProviderRegistration, ProviderUpdateRegistrar, ProviderUpdateRevocation, ProviderUpdateService, QuorumCommitment};
use crate::consensus::{serialize, Decodable, Encodable};
use crate::hash_types::SpecialTransactionPayloadHash;
use crate::io;

pub mod coinbase;
pub mod error;
pub mod json;
pub mod provider_registration;
pub mod provider_update_registrar;
pub mod provider_update_revocation;
pub mod provider_update_service;
pub mod quorum_commitment;
pub mod validation;

pub use self::error::{Error, ValidationError};
use self::json::{JsonFields, JsonObject};

/// Data which can be encoded in a consensus-consistent way
pub trait SpecialTransactionBasePayloadEncodable {
    /// Encode the payload with a well-defined format.
    /// Returns the number of bytes written on success.
    ///
    /// For payloads carrying a detachable signature this is everything but the signature, so
    /// that the signature can be checked against a stable pre-image.
    ///
    /// The only errors returned are errors propagated from the writer.
    fn base_payload_data_encode<W: io::Write>(&self, writer: W) -> Result<usize, io::Error>;

    /// The hash of the base payload special transaction data.
    fn base_payload_hash(&self) -> SpecialTransactionPayloadHash {
        use hashes::Hash;

        let mut engine = SpecialTransactionPayloadHash::engine();
        self.base_payload_data_encode(&mut engine).expect("engines don't error");
        SpecialTransactionPayloadHash::from_engine(engine)
    }
}

/// The contract shared by every special transaction payload.
///
/// Implementors provide the field checks and the JSON field mapping; decoding, encoding and the
/// mandatory validation around them come from the provided methods. `Clone` yields a fully
/// independent copy since payloads own all of their bytes.
pub trait SpecialTransactionPayload:
    Encodable + Decodable + SpecialTransactionBasePayloadEncodable + Clone
{
    /// The transaction type carrying this payload.
    const TRANSACTION_TYPE: TransactionType;

    /// The size of the encoded payload in bytes.
    fn size(&self) -> usize;

    /// Checks every field constraint, including the ones spanning several fields.
    fn check_fields(&self) -> Result<(), ValidationError>;

    /// Builds a payload from its JSON fields without validating it.
    fn read_json_fields(fields: &JsonFields) -> Result<Self, Error>;

    /// Writes the JSON fields of the payload.
    fn write_json_fields(&self) -> JsonObject;

    /// Validates the payload.
    ///
    /// Pure and idempotent: it never changes the payload and always gives the same answer for
    /// the same field values.
    fn validate(&self) -> Result<(), Error> {
        #[cfg(test)]
        validation::record_validate_call();

        self.check_fields().map_err(|e| {
            debug!("{} payload failed validation: {}", Self::TRANSACTION_TYPE, e);
            Error::ValidationFailed(e)
        })
    }

    /// Decodes exactly one payload spanning the whole of `bytes`, then validates it.
    ///
    /// Fails with [`Error::PayloadTruncated`] if a field would run past the end of `bytes` and
    /// with [`Error::PayloadTooLong`] if bytes are left once every field has been read.
    fn from_buffer(bytes: &[u8]) -> Result<Self, Error> {
        let mut cursor = io::Cursor::new(bytes);
        let payload = Self::consensus_decode(&mut cursor).map_err(|e| {
            debug!("could not decode {} payload: {}", Self::TRANSACTION_TYPE, e);
            Error::from(e)
        })?;
        let consumed = cursor.position() as usize;
        if consumed != bytes.len() {
            debug!(
                "{} payload has {} trailing bytes",
                Self::TRANSACTION_TYPE,
                bytes.len() - consumed
            );
            return Err(Error::PayloadTooLong { unconsumed: bytes.len() - consumed });
        }
        payload.validate()?;
        Ok(payload)
    }

    /// Builds a payload from its JSON object, then validates it.
    fn from_json(value: &Value) -> Result<Self, Error> {
        let fields = JsonFields::new(value)?;
        let payload = Self::read_json_fields(&fields)?;
        payload.validate()?;
        Ok(payload)
    }

    /// Validates the payload, then encodes it.
    fn to_buffer(&self) -> Result<Vec<u8>, Error> {
        self.validate()?;
        Ok(serialize(self))
    }

    /// Validates the payload, then returns its JSON object.
    fn to_json(&self) -> Result<Value, Error> {
        self.validate()?;
        Ok(self.write_json_fields().into_value())
    }

    /// Validates the payload, then returns the double-SHA256 of its unsigned pre-image.
    fn payload_hash(&self) -> Result<SpecialTransactionPayloadHash, Error> {
        self.validate()?;
        Ok(self.base_payload_hash())
    }
}

/// An enum wrapper around various special transaction payloads.
/// Special transactions are defined in DIP 2.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub enum TransactionPayload {
    /// A wrapper for a Masternode Registration payload
    ProviderRegistrationPayloadType(ProviderRegistrationPayload),
    /// A wrapper for a Masternode Update Service payload
    ProviderUpdateServicePayloadType(ProviderUpdateServicePayload),
    /// A wrapper for a Masternode Update Registrar payload
    ProviderUpdateRegistrarPayloadType(ProviderUpdateRegistrarPayload),
    /// A wrapper for a Masternode Update Revocation payload
    ProviderUpdateRevocationPayloadType(ProviderUpdateRevocationPayload),
    /// A wrapper for a Coinbase payload
    CoinbasePayloadType(CoinbasePayload),
    /// A wrapper for a Quorum Commitment payload
    QuorumCommitmentPayloadType(QuorumCommitmentPayload),
}

macro_rules! for_each_payload {
    ($payload:expr, $p:ident => $body:expr) => {
        match $payload {
            ProviderRegistrationPayloadType($p) => $body,
            ProviderUpdateServicePayloadType($p) => $body,
            ProviderUpdateRegistrarPayloadType($p) => $body,
            ProviderUpdateRevocationPayloadType($p) => $body,
            CoinbasePayloadType($p) => $body,
            QuorumCommitmentPayloadType($p) => $body,
        }
    };
}

macro_rules! impl_payload_conversions {
    ($($payload:ident => $variant:ident, $to_fn:ident;)+) => {
        $(
            impl From<$payload> for TransactionPayload {
                fn from(payload: $payload) -> Self { $variant(payload) }
            }
        )+

        impl TransactionPayload {
            $(
                #[doc = concat!("Convenience method that assumes the payload to be a `", stringify!($payload), "`.")]
                ///
                /// Errors if it is a payload of another type.
                pub fn $to_fn(self) -> Result<$payload, Error> {
                    if let $variant(payload) = self {
                        Ok(payload)
                    } else {
                        Err(Error::WrongPayloadConversion {
                            expected: <$payload as SpecialTransactionPayload>::TRANSACTION_TYPE,
                            actual: self.get_type(),
                        })
                    }
                }
            )+
        }
    };
}

impl_payload_conversions! {
    ProviderRegistrationPayload => ProviderRegistrationPayloadType, to_provider_registration_payload;
    ProviderUpdateServicePayload => ProviderUpdateServicePayloadType, to_update_service_payload;
    ProviderUpdateRegistrarPayload => ProviderUpdateRegistrarPayloadType, to_update_registrar_payload;
    ProviderUpdateRevocationPayload => ProviderUpdateRevocationPayloadType, to_update_revocation_payload;
    CoinbasePayload => CoinbasePayloadType, to_coinbase_payload;
    QuorumCommitmentPayload => QuorumCommitmentPayloadType, to_quorum_commitment_payload;
}

impl Encodable for TransactionPayload {
    fn consensus_encode<W: io::Write + ?Sized>(&self, w: &mut W) -> Result<usize, io::Error> {
        for_each_payload!(self, p => p.consensus_encode(w))
    }
}

impl TransactionPayload {
    /// Decodes a raw payload of the given transaction type through the payload registry.
    pub fn from_buffer(tx_type: TransactionType, bytes: &[u8]) -> Result<Self, Error> {
        let decode = tx_type.payload_decoder().ok_or(Error::NoPayload(tx_type))?;
        let payload = decode(bytes)?;
        trace!("decoded {} payload of {} bytes", tx_type, bytes.len());
        Ok(payload)
    }

    /// Builds a payload of the given transaction type from its JSON object.
    pub fn from_json(tx_type: TransactionType, value: &Value) -> Result<Self, Error> {
        Ok(match tx_type {
            Classic => return Err(Error::NoPayload(tx_type)),
            ProviderRegistration => ProviderRegistrationPayload::from_json(value)?.into(),
            ProviderUpdateService => ProviderUpdateServicePayload::from_json(value)?.into(),
            ProviderUpdateRegistrar => ProviderUpdateRegistrarPayload::from_json(value)?.into(),
            ProviderUpdateRevocation => ProviderUpdateRevocationPayload::from_json(value)?.into(),
            Coinbase => CoinbasePayload::from_json(value)?.into(),
            QuorumCommitment => QuorumCommitmentPayload::from_json(value)?.into(),
        })
    }

    /// Validates the wrapped payload, then encodes it.
    pub fn to_buffer(&self) -> Result<Vec<u8>, Error> {
        for_each_payload!(self, p => p.to_buffer())
    }

    /// Validates the wrapped payload, then returns its JSON object.
    pub fn to_json(&self) -> Result<Value, Error> {
        for_each_payload!(self, p => p.to_json())
    }

    /// Validates the wrapped payload.
    pub fn validate(&self) -> Result<(), Error> {
        for_each_payload!(self, p => p.validate())
    }

    /// Validates the wrapped payload, then returns the hash of its unsigned pre-image.
    pub fn payload_hash(&self) -> Result<SpecialTransactionPayloadHash, Error> {
        for_each_payload!(self, p => p.payload_hash())
    }

    /// Gets the Transaction Type for a Special Transaction Payload
    pub fn get_type(&self) -> TransactionType {
        match self {
            ProviderRegistrationPayloadType(_) => ProviderRegistration,
            ProviderUpdateServicePayloadType(_) => ProviderUpdateService,
            ProviderUpdateRegistrarPayloadType(_) => ProviderUpdateRegistrar,
            ProviderUpdateRevocationPayloadType(_) => ProviderUpdateRevocation,
            CoinbasePayloadType(_) => Coinbase,
            QuorumCommitmentPayloadType(_) => QuorumCommitment,
        }
    }

    /// Gets the size of the encoded special transaction payload
    pub fn size(&self) -> usize {
        for_each_payload!(self, p => p.size())
    }

    /// Validates the payload and writes it as the compact size prefixed `extra_payload` of a
    /// transaction.
    pub fn encode_extra_payload<W: io::Write + ?Sized>(&self, w: &mut W) -> Result<usize, Error> {
        let raw = self.to_buffer()?;
        Ok(raw.consensus_encode(w)?)
    }
}

/// A decoder turning a raw payload into a [`TransactionPayload`].
pub type PayloadDecoder = fn(&[u8]) -> Result<TransactionPayload, Error>;

fn decode_payload<P>(bytes: &[u8]) -> Result<TransactionPayload, Error>
where
    P: SpecialTransactionPayload + Into<TransactionPayload>,
{
    P::from_buffer(bytes).map(Into::into)
}

/// The transaction type. Special transactions were introduced in DIP2.
/// Compared to Bitcoin the version field is split into two 16 bit integers.
/// The first part for the version and the second part for the transaction
/// type.
///
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum TransactionType {
    /// A Classic transaction
    Classic = 0,
    /// A Masternode Registration Transaction
    ProviderRegistration = 1,
    /// A Masternode Update Service Transaction, used by the operator to signal changes to service
    ProviderUpdateService = 2,
    /// A Masternode Update Registrar Transaction, used by the owner to signal base changes
    ProviderUpdateRegistrar = 3,
    /// A Masternode Update Revocation Transaction, used by the operator to signal termination of service
    ProviderUpdateRevocation = 4,
    /// A Coinbase Transaction, contained as the first transaction in each block
    Coinbase = 5,
    /// A Quorum Commitment Transaction, used to save quorum information to the state
    QuorumCommitment = 6,
}

impl Debug for TransactionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match *self {
            Classic => write!(f, "Classic Transaction"),
            ProviderRegistration => write!(f, "Provider Registration Transaction"),
            ProviderUpdateService => write!(f, "Provider Update Service Transaction"),
            ProviderUpdateRegistrar => write!(f, "Provider Update Registrar Transaction"),
            ProviderUpdateRevocation => write!(f, "Provider Update Revocation Transaction"),
            Coinbase => write!(f, "Coinbase Transaction"),
            QuorumCommitment => write!(f, "Quorum Commitment Transaction"),
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match *self {
            Classic => write!(f, "Classic"),
            ProviderRegistration => write!(f, "Provider Registration"),
            ProviderUpdateService => write!(f, "Provider Update Service"),
            ProviderUpdateRegistrar => write!(f, "Provider Update Registrar"),
            ProviderUpdateRevocation => write!(f, "Provider Update Revocation"),
            Coinbase => write!(f, "Coinbase"),
            QuorumCommitment => write!(f, "Quorum Commitment"),
        }
    }
}

impl TryFrom<u16> for TransactionType {
    type Error = Error;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Classic),
            1 => Ok(ProviderRegistration),
            2 => Ok(ProviderUpdateService),
            3 => Ok(ProviderUpdateRegistrar),
            4 => Ok(ProviderUpdateRevocation),
            5 => Ok(Coinbase),
            6 => Ok(QuorumCommitment),
            _ => Err(Error::UnknownTransactionType(value)),
        }
    }
}

impl TransactionType {
    /// Get the transaction type from an optional payload
    /// If the payload in None then we have a Classical Transaction
    pub fn from_optional_payload(payload: &Option<TransactionPayload>) -> Self {
        match payload {
            None => Classic,
            Some(payload) => payload.get_type(),
        }
    }

    /// Splits the 32 bit version field of a transaction into its 16 bit version (low half) and
    /// its transaction type (high half).
    pub fn from_version_field(version: u32) -> Result<(u16, TransactionType), Error> {
        let tx_version = (version & 0xffff) as u16;
        let tx_type = TransactionType::try_from((version >> 16) as u16)?;
        Ok((tx_version, tx_type))
    }

    /// Joins a 16 bit transaction version and this type into a 32 bit version field.
    pub fn to_version_field(self, tx_version: u16) -> u32 {
        (self as u32) << 16 | tx_version as u32
    }

    /// The registry entry for this transaction type, `None` for types without a payload.
    pub fn payload_decoder(self) -> Option<PayloadDecoder> {
        let decoder: PayloadDecoder = match self {
            Classic => return None,
            ProviderRegistration => decode_payload::<ProviderRegistrationPayload>,
            ProviderUpdateService => decode_payload::<ProviderUpdateServicePayload>,
            ProviderUpdateRegistrar => decode_payload::<ProviderUpdateRegistrarPayload>,
            ProviderUpdateRevocation => decode_payload::<ProviderUpdateRevocationPayload>,
            Coinbase => decode_payload::<CoinbasePayload>,
            QuorumCommitment => decode_payload::<QuorumCommitmentPayload>,
        };
        Some(decoder)
    }

    /// Reads the compact size prefixed `extra_payload` of a transaction of this type and decodes
    /// it strictly. Classic transactions carry no payload and read nothing.
    pub fn decode_extra_payload<R: io::Read + ?Sized>(
        self,
        r: &mut R,
    ) -> Result<Option<TransactionPayload>, Error> {
        match self.payload_decoder() {
            None => Ok(None),
            Some(decode) => {
                let raw = Vec::<u8>::consensus_decode(r)?;
                decode(&raw).map(Some)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::consensus::deserialize;

    // version 1, height 8, merkleRootMNList
    const COINBASE_V1: &str =
        "0100080000003da1ae2e7c1d5dc1b4ebcf2de4e15478f7a5c8ac13ab6e3bc6d04b3c6c6e5e4d";

    #[test]
    fn transaction_type_tags() {
        for n in 0u16..=6 {
            assert_eq!(TransactionType::try_from(n).unwrap() as u16, n);
        }
        assert!(matches!(TransactionType::try_from(7u16), Err(Error::UnknownTransactionType(7))));
        assert!(matches!(TransactionType::try_from(8u16), Err(Error::UnknownTransactionType(8))));
        assert_eq!(format!("{:?}", Coinbase), "Coinbase Transaction");
        assert_eq!(Coinbase.to_string(), "Coinbase");
    }

    #[test]
    fn version_field_split() {
        let (version, tx_type) = TransactionType::from_version_field(0x0003_0003).unwrap();
        assert_eq!(version, 3);
        assert_eq!(tx_type, ProviderUpdateRegistrar);
        assert_eq!(tx_type.to_version_field(version), 0x0003_0003);
        assert_eq!(TransactionType::from_version_field(2).unwrap(), (2, Classic));
        assert!(TransactionType::from_version_field(0x0063_0003).is_err());
    }

    #[test]
    fn registry_dispatch() {
        assert!(Classic.payload_decoder().is_none());
        for n in 1u16..=6 {
            assert!(TransactionType::try_from(n).unwrap().payload_decoder().is_some());
        }

        let raw = hex!(COINBASE_V1);
        let payload = TransactionPayload::from_buffer(Coinbase, &raw).unwrap();
        assert_eq!(payload.get_type(), Coinbase);
        assert_eq!(payload.size(), raw.len());
        assert_eq!(payload.to_buffer().unwrap(), raw);

        // a coinbase payload is not a valid registrar update
        assert!(TransactionPayload::from_buffer(ProviderUpdateRegistrar, &raw).is_err());
        assert!(matches!(
            TransactionPayload::from_buffer(Classic, &raw),
            Err(Error::NoPayload(Classic))
        ));
    }

    #[test]
    fn wrong_conversion() {
        let payload = TransactionPayload::from_buffer(Coinbase, &hex!(COINBASE_V1)).unwrap();
        assert!(payload.clone().to_coinbase_payload().is_ok());
        match payload.to_update_registrar_payload() {
            Err(Error::WrongPayloadConversion { expected, actual }) => {
                assert_eq!(expected, ProviderUpdateRegistrar);
                assert_eq!(actual, Coinbase);
            }
            other => panic!("unexpected conversion result: {:?}", other),
        }
    }

    #[test]
    fn json_dispatch() {
        let value = json!({
            "version": 1,
            "height": 8,
            "merkleRootMNList": "4d5e6e6c3c4bd0c63b6eab13acc8a5f77854e1e42dcfebb4c15d1d7c2eaea13d",
        });
        let payload = TransactionPayload::from_json(Coinbase, &value).unwrap();
        assert_eq!(payload.to_buffer().unwrap(), hex!(COINBASE_V1));
        assert_eq!(payload.to_json().unwrap(), value);
        assert!(matches!(
            TransactionPayload::from_json(Classic, &value),
            Err(Error::NoPayload(Classic))
        ));
    }

    #[test]
    fn extra_payload_framing() {
        let payload = TransactionPayload::from_buffer(Coinbase, &hex!(COINBASE_V1)).unwrap();
        let mut framed = Vec::new();
        let written = payload.encode_extra_payload(&mut framed).unwrap();
        assert_eq!(written, framed.len());
        assert_eq!(framed[0] as usize, payload.size());

        let decoded = Coinbase.decode_extra_payload(&mut framed.as_slice()).unwrap();
        assert_eq!(decoded, Some(payload));
        assert_eq!(Classic.decode_extra_payload(&mut [0u8; 0].as_slice()).unwrap(), None);

        // the framed length covers one byte more than the payload holds
        let mut padded = framed.clone();
        padded[0] += 1;
        padded.push(0);
        assert!(matches!(
            Coinbase.decode_extra_payload(&mut padded.as_slice()),
            Err(Error::PayloadTooLong { unconsumed: 1 })
        ));

        // the framing itself is cut short
        let short = &framed[..framed.len() - 1];
        assert!(matches!(
            Coinbase.decode_extra_payload(&mut &short[..]),
            Err(Error::PayloadTruncated)
        ));
        assert!(deserialize::<Vec<u8>>(&framed).is_ok());
    }
}
