//! Exercises the payload registry end to end through the public API: every fixture decodes
//! through its transaction type, re-encodes byte for byte and survives the JSON path.

use std::convert::TryFrom;

use dash_special_payloads::special_transaction::provider_update_registrar::ProviderUpdateRegistrarPayload;
use dash_special_payloads::special_transaction::{
    Error, SpecialTransactionPayload, TransactionPayload, TransactionType,
};

const FIXTURES: &[(TransactionType, &str)] = &[
    (
        TransactionType::ProviderRegistration,
        "010000000000ca9a43051750da7c5f858008f2ff7732d15691e48eb7f845c791e5dca78bab580000000000000000000000000000ffff010205064e1f3dd03f9ec192b5f275a433bfc90f468ee1a3eb4c157b10706659e25eb362b5d902d809f9160b1688e201ee6e94b40f9b5062d7074683ef05a2d5efb7793c47059c878dfad38a30fafe61575db40f05ab0a08d55119b0aad300001976a9144fbc8fb6e11e253d77e5a9c987418e89cf4a63d288ac3477990b757387cb0406168c2720acf55f83603736a314a37d01b135b873a27b411fb37e49c1ff2b8057713939a5513e6e711a71cff2e517e6224df724ed750aef1b7f9ad9ec612b4a7250232e1e400da718a9501e1d9a5565526e4b1ff68c028763",
    ),
    (
        TransactionType::ProviderUpdateService,
        "01003a72099db84b1c1158568eec863bea1b64f90eccee3304209cebe1df5e7539fd00000000000000000000ffff342440944e1f00e6725f799ea20480f06fb105ebe27e7c4845ab84155e4c2adf2d6e5b73a998b1174f9621bbeda5009c5a6487bdf75edcf602b67fe0da15c275cc91777cb25f5fd4bb94e84fd42cb2bb547c83792e57c80d196acd47020e4054895a0640b7861b3729c41dd681d4996090d5750f65c4b649a5cd5b2bdf55c880459821e53d91c9",
    ),
    (
        TransactionType::ProviderUpdateRegistrar,
        "0100a45f4e6af45dfc15d44147ec6e5ab0d8d2048ea2e95e2820f7cdfd1c1b9175094312010000000000000000000000ffff0102030604d41976a9148603df234fe8f26064439de60ed13eb92d76cc5588ac8c62104a85a6efb165315d61e1660ee7e25c1831d240c35878053929ba377c88411fdaf84b78552f91c99eb267efec1be0e63b7459e66f142daabb0345477842592b68ce0f59b163197c480061fe834a888f9a9697e7635b36b4ede84a2374ad9831",
    ),
    (
        TransactionType::Coinbase,
        "0100080000003da1ae2e7c1d5dc1b4ebcf2de4e15478f7a5c8ac13ab6e3bc6d04b3c6c6e5e4d",
    ),
];

fn init_logging() { let _ = env_logger::builder().is_test(true).try_init(); }

#[test]
fn fixtures_round_trip_through_the_registry() {
    init_logging();
    for (tx_type, fixture) in FIXTURES {
        let raw = hex::decode(fixture).unwrap();
        let payload = TransactionPayload::from_buffer(*tx_type, &raw).unwrap();
        assert_eq!(payload.get_type(), *tx_type);
        assert_eq!(payload.size(), raw.len());
        assert_eq!(payload.to_buffer().unwrap(), raw, "{:?}", tx_type);

        let value = payload.to_json().unwrap();
        let from_json = TransactionPayload::from_json(*tx_type, &value).unwrap();
        assert_eq!(from_json, payload);
        assert_eq!(from_json.payload_hash().unwrap(), payload.payload_hash().unwrap());
    }
}

#[test]
fn trailing_bytes_fail_for_every_type() {
    init_logging();
    for (tx_type, fixture) in FIXTURES {
        let raw = hex::decode(format!("{}0000", fixture)).unwrap();
        let err = TransactionPayload::from_buffer(*tx_type, &raw).unwrap_err();
        assert_eq!(err.to_string(), "Failed to parse payload: raw payload is bigger than expected.");
    }
}

#[test]
fn representative_scenario() {
    let raw = hex::decode(FIXTURES[2].1).unwrap();
    let payload = ProviderUpdateRegistrarPayload::from_buffer(&raw).unwrap();
    assert_eq!(payload.version, 1);
    assert_eq!(payload.mode, 4675);
    assert_eq!(payload.to_buffer().unwrap(), raw);

    let typed = TransactionPayload::from_buffer(TransactionType::ProviderUpdateRegistrar, &raw)
        .unwrap()
        .to_update_registrar_payload()
        .unwrap();
    assert_eq!(typed, payload);

    let serde_value = serde_json::to_value(&payload).unwrap();
    assert_eq!(serde_value, payload.to_json().unwrap());
    let back: ProviderUpdateRegistrarPayload = serde_json::from_value(serde_value).unwrap();
    assert_eq!(back, payload);
}

#[test]
fn transaction_framing() {
    let raw = hex::decode(FIXTURES[2].1).unwrap();
    let version_field = TransactionType::ProviderUpdateRegistrar.to_version_field(3);
    assert_eq!(version_field, 0x0003_0003);

    let (version, tx_type) = TransactionType::from_version_field(version_field).unwrap();
    assert_eq!(version, 3);

    let payload = TransactionPayload::from_buffer(tx_type, &raw).unwrap();
    let mut extra_payload = Vec::new();
    payload.encode_extra_payload(&mut extra_payload).unwrap();
    assert_eq!(extra_payload[0] as usize, raw.len());
    assert_eq!(&extra_payload[1..], &raw[..]);

    let decoded = tx_type.decode_extra_payload(&mut extra_payload.as_slice()).unwrap();
    assert_eq!(decoded, Some(payload));
}

#[test]
fn unknown_and_classic_types() {
    assert!(matches!(TransactionType::try_from(9u16), Err(Error::UnknownTransactionType(9))));
    assert!(TransactionType::Classic.payload_decoder().is_none());
    assert!(matches!(
        TransactionPayload::from_buffer(TransactionType::Classic, &[]),
        Err(Error::NoPayload(TransactionType::Classic))
    ));
    assert!(matches!(
        TransactionPayload::from_json(TransactionType::Classic, &serde_json::json!({})),
        Err(Error::NoPayload(TransactionType::Classic))
    ));
}

#[test]
fn invalid_json_never_yields_a_payload() {
    init_logging();
    let raw = hex::decode(FIXTURES[2].1).unwrap();
    let payload = ProviderUpdateRegistrarPayload::from_buffer(&raw).unwrap();
    let mut value = payload.to_json().unwrap();
    value["version"] = serde_json::json!(2);
    assert!(matches!(
        ProviderUpdateRegistrarPayload::from_json(&value),
        Err(Error::ValidationFailed(_))
    ));
    assert!(matches!(
        ProviderUpdateRegistrarPayload::from_json(&serde_json::json!("0100")),
        Err(Error::NotAnObject)
    ));
}
