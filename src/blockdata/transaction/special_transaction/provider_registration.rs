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

//! Dash Provider Registration Special Transaction.
//!
//! The provider registration special transaction is used to register a masternode.
//! It is defined in DIP3 https://github.com/dashpay/dips/blob/master/dip-0003.md.
//!
//! The ProRegTx contains 2 public key IDs and one BLS public key, which represent 3 different
//! roles in the masternode and define update and voting rights. A "public key ID" refers to the
//! hash160 of an ECDSA public key. The keys are:
//!
//! KeyIdOwner (renamed to owner_key_hash): This is the public key ID of the masternode or
//! collateral owner. It is different than the key used in the collateral output. Only the owner
//! is allowed to issue ProUpRegTx transactions.
//!
//! PubKeyOperator (renamed to operator_public_key): This is the BLS public key of the masternode
//! operator. Only the operator is allowed to issue ProUpServTx transactions. The operator key is
//! also used while operating the masternode to sign masternode related P2P messages, quorum
//! related messages and governance trigger votes. Messages signed with this key are only valid
//! while the masternode is in the valid set.
//!
//! KeyIdVoting (renamed to voting_key_hash): This is the public key ID used for proposal voting.
//! Votes signed with this key are valid while the masternode is in the registered set.

use crate::blockdata::constants::{
    BLS_PUBLIC_KEY_SIZE, KEY_ID_SIZE, MAX_OPERATOR_REWARD, MAX_PAYLOAD_SIG_SIZE, MAX_SCRIPT_SIZE,
    PROVIDER_MODE_REGULAR, PROVIDER_REGISTRATION_VERSION, PROVIDER_TYPE_REGULAR,
};
use crate::blockdata::transaction::outpoint::OutPoint;
use crate::blockdata::transaction::special_transaction::json::{JsonFields, JsonObject};
use crate::blockdata::transaction::special_transaction::validation::{
    check_length, check_not_null, check_range, check_service, check_version,
};
use crate::blockdata::transaction::special_transaction::{
    Error, SpecialTransactionBasePayloadEncodable, SpecialTransactionPayload, TransactionType,
    ValidationError,
};
use crate::bls_sig_utils::BLSPublicKey;
use crate::consensus::encode::size_with_prefix;
use crate::consensus::{encode, Decodable, Encodable};
use crate::hash_types::{InputsHash, PubkeyHash, Txid};
use crate::internal_macros::impl_payload_serde;
use crate::io;

/// A Provider Registration Payload used in a Provider Registration Special Transaction.
/// This is used to register a Masternode on the network.
/// The current version is 1.
/// Interesting Fields:
/// *Provider type refers to the type of Masternode. Currently only valid value is 0.
/// *Provider mode refers to the mode of the Masternode. Currently only valid value is 0.
/// *The collateral outpoint links to a transaction with a 1000 Dash unspent (at registration)
/// outpoint. A null txid means the collateral is an output of the registering transaction.
/// *The operator reward defines the ratio when divided by 10000 of the amount going to the operator.
/// The max value for the operator reward is 10000.
/// *The script payout is the script to which one wants to have the masternode pay out.
/// *The inputs hash is used to guarantee the uniqueness of the payload sig.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub struct ProviderRegistrationPayload {
    /// The payload version.
    pub version: u16,
    /// The masternode type.
    pub provider_type: u16,
    /// The masternode mode.
    pub provider_mode: u16,
    /// The output holding the collateral.
    pub collateral_outpoint: OutPoint,
    /// The service address, as the sixteen wire bytes packed little-endian.
    pub ip_address: u128,
    /// The service port, big-endian on the wire.
    pub port: u16,
    /// The owner key identifier.
    pub owner_key_hash: PubkeyHash,
    /// The operator BLS public key.
    pub operator_public_key: BLSPublicKey,
    /// The voting key identifier.
    pub voting_key_hash: PubkeyHash,
    /// The operator share of the reward in hundredths of a percent.
    pub operator_reward: u16,
    /// The script the masternode reward is paid to.
    pub script_payout: Vec<u8>,
    /// The hash of all inputs of the carrying transaction.
    pub inputs_hash: InputsHash,
    /// The collateral signature, empty for internal collateral.
    pub payload_sig: Vec<u8>,
}

impl ProviderRegistrationPayload {
    /// Whether the collateral is created by the registering transaction itself.
    pub fn has_internal_collateral(&self) -> bool { self.collateral_outpoint.has_null_txid() }
}

impl SpecialTransactionBasePayloadEncodable for ProviderRegistrationPayload {
    fn base_payload_data_encode<W: io::Write>(&self, mut w: W) -> Result<usize, io::Error> {
        let mut len = 0;
        len += self.version.consensus_encode(&mut w)?;
        len += self.provider_type.consensus_encode(&mut w)?;
        len += self.provider_mode.consensus_encode(&mut w)?;
        len += self.collateral_outpoint.consensus_encode(&mut w)?;
        len += self.ip_address.consensus_encode(&mut w)?;
        len += u16::swap_bytes(self.port).consensus_encode(&mut w)?;
        len += self.owner_key_hash.consensus_encode(&mut w)?;
        len += self.operator_public_key.consensus_encode(&mut w)?;
        len += self.voting_key_hash.consensus_encode(&mut w)?;
        len += self.operator_reward.consensus_encode(&mut w)?;
        len += self.script_payout.consensus_encode(&mut w)?;
        len += self.inputs_hash.consensus_encode(&mut w)?;
        Ok(len)
    }
}

impl Encodable for ProviderRegistrationPayload {
    fn consensus_encode<W: io::Write + ?Sized>(&self, w: &mut W) -> Result<usize, io::Error> {
        let mut len = 0;
        len += self.base_payload_data_encode(&mut *w)?;
        len += self.payload_sig.consensus_encode(w)?;
        Ok(len)
    }
}

impl Decodable for ProviderRegistrationPayload {
    fn consensus_decode<R: io::Read + ?Sized>(r: &mut R) -> Result<Self, encode::Error> {
        let version = u16::consensus_decode(r)?;
        let provider_type = u16::consensus_decode(r)?;
        let provider_mode = u16::consensus_decode(r)?;
        let collateral_outpoint = OutPoint::consensus_decode(r)?;
        let ip_address = u128::consensus_decode(r)?;
        let port = u16::swap_bytes(u16::consensus_decode(r)?);
        let owner_key_hash = PubkeyHash::consensus_decode(r)?;
        let operator_public_key = BLSPublicKey::consensus_decode(r)?;
        let voting_key_hash = PubkeyHash::consensus_decode(r)?;
        let operator_reward = u16::consensus_decode(r)?;
        let script_payout = Vec::<u8>::consensus_decode(r)?;
        let inputs_hash = InputsHash::consensus_decode(r)?;
        let payload_sig = Vec::<u8>::consensus_decode(r)?;

        Ok(ProviderRegistrationPayload {
            version,
            provider_type,
            provider_mode,
            collateral_outpoint,
            ip_address,
            port,
            owner_key_hash,
            operator_public_key,
            voting_key_hash,
            operator_reward,
            script_payout,
            inputs_hash,
            payload_sig,
        })
    }
}

impl SpecialTransactionPayload for ProviderRegistrationPayload {
    const TRANSACTION_TYPE: TransactionType = TransactionType::ProviderRegistration;

    fn size(&self) -> usize {
        2 + 2 + 2 + 36 + 16 + 2 + KEY_ID_SIZE + BLS_PUBLIC_KEY_SIZE + KEY_ID_SIZE + 2
            + size_with_prefix(&self.script_payout)
            + 32
            + size_with_prefix(&self.payload_sig)
    }

    fn check_fields(&self) -> Result<(), ValidationError> {
        check_version(
            "version",
            self.version,
            PROVIDER_REGISTRATION_VERSION..=PROVIDER_REGISTRATION_VERSION,
        )?;
        check_version("type", self.provider_type, PROVIDER_TYPE_REGULAR..=PROVIDER_TYPE_REGULAR)?;
        check_version("mode", self.provider_mode, PROVIDER_MODE_REGULAR..=PROVIDER_MODE_REGULAR)?;
        check_service(self.ip_address, self.port, true)?;
        check_not_null("keyIdOwner", &self.owner_key_hash)?;
        if self.operator_public_key.is_zeroed() {
            return Err(ValidationError::NullHash("pubKeyOperator"));
        }
        check_not_null("keyIdVoting", &self.voting_key_hash)?;
        check_range(
            "operatorReward",
            self.operator_reward.into(),
            0,
            MAX_OPERATOR_REWARD.into(),
        )?;
        check_length("scriptPayout", &self.script_payout, 1, MAX_SCRIPT_SIZE)?;
        check_length("payloadSig", &self.payload_sig, 0, MAX_PAYLOAD_SIG_SIZE)?;
        if self.has_internal_collateral() && !self.payload_sig.is_empty() {
            return Err(ValidationError::Inconsistent(
                "internal collateral registrations carry no payloadSig",
            ));
        }
        Ok(())
    }

    fn read_json_fields(fields: &JsonFields) -> Result<Self, Error> {
        let (ip_address, port) = fields.service("service")?;
        Ok(ProviderRegistrationPayload {
            version: fields.integer("version")?,
            provider_type: fields.integer("type")?,
            provider_mode: fields.integer("mode")?,
            collateral_outpoint: OutPoint::new(
                fields.parse_with("collateralHash", "a 32 byte hash", Txid::from_hex)?,
                fields.integer("collateralIndex")?,
            ),
            ip_address,
            port,
            owner_key_hash: fields.parse_with("keyIdOwner", "a 20 byte key id", PubkeyHash::from_hex)?,
            operator_public_key: fields.parse_with(
                "pubKeyOperator",
                "a 48 byte BLS public key",
                BLSPublicKey::from_hex,
            )?,
            voting_key_hash: fields.parse_with(
                "keyIdVoting",
                "a 20 byte key id",
                PubkeyHash::from_hex,
            )?,
            operator_reward: fields.integer("operatorReward")?,
            script_payout: fields.hex_bytes("scriptPayout")?,
            inputs_hash: fields.parse_with("inputsHash", "a 32 byte hash", InputsHash::from_hex)?,
            payload_sig: fields.omittable_hex_bytes("payloadSig")?,
        })
    }

    fn write_json_fields(&self) -> JsonObject {
        JsonObject::new()
            .number("version", self.version)
            .number("type", self.provider_type)
            .number("mode", self.provider_mode)
            .string("collateralHash", self.collateral_outpoint.txid)
            .number("collateralIndex", self.collateral_outpoint.vout)
            .service("service", self.ip_address, self.port)
            .string("keyIdOwner", self.owner_key_hash)
            .string("pubKeyOperator", self.operator_public_key)
            .string("keyIdVoting", self.voting_key_hash)
            .number("operatorReward", self.operator_reward)
            .hex("scriptPayout", &self.script_payout)
            .string("inputsHash", self.inputs_hash)
            .hex_unless_empty("payloadSig", &self.payload_sig)
    }
}

impl_payload_serde!(ProviderRegistrationPayload);

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use serde_json::json;

    use super::*;

    const EXTERNAL_COLLATERAL_HEX: &str = "010000000000ca9a43051750da7c5f858008f2ff7732d15691e48eb7f845c791e5dca78bab580000000000000000000000000000ffff010205064e1f3dd03f9ec192b5f275a433bfc90f468ee1a3eb4c157b10706659e25eb362b5d902d809f9160b1688e201ee6e94b40f9b5062d7074683ef05a2d5efb7793c47059c878dfad38a30fafe61575db40f05ab0a08d55119b0aad300001976a9144fbc8fb6e11e253d77e5a9c987418e89cf4a63d288ac3477990b757387cb0406168c2720acf55f83603736a314a37d01b135b873a27b411fb37e49c1ff2b8057713939a5513e6e711a71cff2e517e6224df724ed750aef1b7f9ad9ec612b4a7250232e1e400da718a9501e1d9a5565526e4b1ff68c028763";

    const INTERNAL_COLLATERAL_HEX: &str = "01000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000ffff010101014e1f3dd03f9ec192b5f275a433bfc90f468ee1a3eb4c157b10706659e25eb362b5d902d809f9160b1688e201ee6e94b40f9b5062d7074683ef05a2d5efb7793c47059c878dfad38a30fafe61575db40f05ab0a08d55119b0aad300001976a9143795a62df2eb953c1d08bc996d4089ee5d67e28b88ac14b33f2231f0df567e0dfb12899c893f5d2d05f6dcc7d9c8c27b68a71191c75400";

    #[test]
    fn test_collateral_provider_registration_payload() {
        let raw = hex!(EXTERNAL_COLLATERAL_HEX);
        let payload = ProviderRegistrationPayload::from_buffer(&raw).unwrap();

        assert_eq!(payload.version, 1);
        assert_eq!(payload.provider_type, 0);
        assert_eq!(payload.provider_mode, 0);
        assert_eq!(
            payload.collateral_outpoint.to_string(),
            "58ab8ba7dce591c745f8b78ee49156d13277fff20880855f7cda501705439aca:0"
        );
        assert!(!payload.has_internal_collateral());

        let [a, b, c, d] = Ipv4Addr::new(1, 2, 5, 6).octets();
        let ipv6_bytes: [u8; 16] = [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0xFF, 0xFF, a, b, c, d];
        assert_eq!(payload.ip_address.to_le_bytes(), ipv6_bytes);
        assert_eq!(payload.port, 19999);

        assert_eq!(payload.owner_key_hash.to_hex(), "3dd03f9ec192b5f275a433bfc90f468ee1a3eb4c");
        assert_eq!(
            payload.operator_public_key.to_hex(),
            "157b10706659e25eb362b5d902d809f9160b1688e201ee6e94b40f9b5062d7074683ef05a2d5efb7793c47059c878dfa"
        );
        assert_eq!(payload.voting_key_hash.to_hex(), "d38a30fafe61575db40f05ab0a08d55119b0aad3");
        assert_eq!(payload.operator_reward, 0);
        assert_eq!(payload.script_payout, hex!("76a9144fbc8fb6e11e253d77e5a9c987418e89cf4a63d288ac"));
        assert_eq!(
            payload.inputs_hash.to_hex(),
            "7ba273b835b1017da314a3363760835ff5ac20278c160604cb8773750b997734",
            "inputs hash calculation has issues"
        );
        assert_eq!(payload.payload_sig.len(), 65);

        assert_eq!(
            payload.payload_hash().unwrap().to_hex(),
            "71e973f79003accd202b9a2ab2613ac6ced601b26684e82f561f6684fef2f102",
            "Payload hash calculation has issues"
        );
        assert_eq!(payload.size(), raw.len());
        assert_eq!(payload.to_buffer().unwrap(), raw);
    }

    #[test]
    fn test_no_collateral_provider_registration_payload() {
        let raw = hex!(INTERNAL_COLLATERAL_HEX);
        let payload = ProviderRegistrationPayload::from_buffer(&raw).unwrap();

        assert!(payload.has_internal_collateral());
        assert_eq!(payload.collateral_outpoint.vout, 0);
        assert!(payload.payload_sig.is_empty());
        assert_eq!(
            payload.inputs_hash.to_hex(),
            "54c79111a7687bc2c8d9c7dcf6052d5d3f899c8912fb0d7e56dff031223fb314"
        );
        assert_eq!(
            payload.payload_hash().unwrap().to_hex(),
            "87f79fe00fcdc7676c5613000e63b4987713732a90f94d5491c263638027a51d"
        );
        assert_eq!(payload.to_buffer().unwrap(), raw);

        let mut signed = payload;
        signed.payload_sig = vec![0x1f; 65];
        assert!(matches!(
            signed.validate(),
            Err(Error::ValidationFailed(ValidationError::Inconsistent(_)))
        ));
    }

    #[test]
    fn json_round_trip() {
        let payload = ProviderRegistrationPayload::from_buffer(&hex!(EXTERNAL_COLLATERAL_HEX)).unwrap();
        let value = payload.to_json().unwrap();
        assert_eq!(value["collateralHash"], json!("58ab8ba7dce591c745f8b78ee49156d13277fff20880855f7cda501705439aca"));
        assert_eq!(value["collateralIndex"], json!(0));
        assert_eq!(value["service"], json!("1.2.5.6:19999"));
        assert_eq!(value["type"], json!(0));
        assert_eq!(value["operatorReward"], json!(0));

        let from_json = ProviderRegistrationPayload::from_json(&value).unwrap();
        assert_eq!(from_json, payload);
        assert_eq!(from_json.to_buffer().unwrap(), hex!(EXTERNAL_COLLATERAL_HEX));

        let internal = ProviderRegistrationPayload::from_buffer(&hex!(INTERNAL_COLLATERAL_HEX)).unwrap();
        let value = internal.to_json().unwrap();
        assert!(value.get("payloadSig").is_none());
        serde_round_trip!(internal);
    }

    #[test]
    fn field_rules() {
        let payload = ProviderRegistrationPayload::from_buffer(&hex!(EXTERNAL_COLLATERAL_HEX)).unwrap();

        let mut bad = payload.clone();
        bad.operator_reward = MAX_OPERATOR_REWARD + 1;
        assert_error_contains!(bad.to_buffer(), "operatorReward 10001 is out of range");

        let mut full_reward = payload.clone();
        full_reward.operator_reward = MAX_OPERATOR_REWARD;
        assert!(full_reward.validate().is_ok());

        let mut bad = payload.clone();
        bad.provider_type = 1;
        assert!(bad.validate().is_err());

        let mut bad = payload.clone();
        bad.operator_public_key = BLSPublicKey::from([0; 48]);
        assert_error_contains!(bad.validate(), "pubKeyOperator must not be null");

        let mut bad = payload.clone();
        bad.port = 0;
        assert!(matches!(
            bad.validate(),
            Err(Error::ValidationFailed(ValidationError::InvalidService(_)))
        ));

        let mut unset = payload;
        unset.ip_address = 0;
        unset.port = 0;
        assert!(unset.validate().is_ok());
        assert_eq!(unset.to_json().unwrap()["service"], json!("[::]:0"));
    }
}
