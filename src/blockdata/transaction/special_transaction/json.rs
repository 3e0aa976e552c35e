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

//! JSON mapping of special transaction payloads.
//!
//! Byte strings are lowercase hex, integers are JSON numbers, and service addresses are
//! `"ip:port"` strings. Double-SHA256 hashes use their byte-reversed display form while key
//! identifiers, scripts and signatures keep their natural byte order.
//!

use core::convert::TryFrom;
use std::net::{Ipv6Addr, SocketAddr, SocketAddrV6};

use serde_json::{Map, Value};

use crate::blockdata::transaction::special_transaction::Error;

/// Read access to the fields of a payload JSON object.
#[derive(Clone, Copy, Debug)]
pub struct JsonFields<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> JsonFields<'a> {
    /// Wraps a JSON value, failing if it is not an object.
    pub fn new(value: &'a Value) -> Result<Self, Error> {
        value.as_object().map(|map| JsonFields { map }).ok_or(Error::NotAnObject)
    }

    /// Returns true if `key` is present and not `null`.
    pub fn contains(&self, key: &str) -> bool {
        self.map.get(key).map_or(false, |v| !v.is_null())
    }

    fn value(&self, key: &'static str) -> Result<&'a Value, Error> {
        match self.map.get(key) {
            Some(Value::Null) | None => Err(Error::FieldMissing(key)),
            Some(value) => Ok(value),
        }
    }

    /// Reads an integer field that must fit in `T`.
    pub fn integer<T>(&self, key: &'static str) -> Result<T, Error>
    where
        T: TryFrom<i64> + TryFrom<u64>,
    {
        let malformed = Error::FieldMalformed { field: key, expected: "an integer in range" };
        match self.value(key)? {
            Value::Number(n) => {
                if let Some(v) = n.as_u64() {
                    <T as TryFrom<u64>>::try_from(v).map_err(|_| malformed)
                } else if let Some(v) = n.as_i64() {
                    <T as TryFrom<i64>>::try_from(v).map_err(|_| malformed)
                } else {
                    Err(malformed)
                }
            }
            _ => Err(malformed),
        }
    }

    /// Reads a string field.
    pub fn str(&self, key: &'static str) -> Result<&'a str, Error> {
        self.value(key)?
            .as_str()
            .ok_or(Error::FieldMalformed { field: key, expected: "a string" })
    }

    /// Reads a string field and converts it with `parse`, reporting `expected` on failure.
    pub fn parse_with<T, E>(
        &self,
        key: &'static str,
        expected: &'static str,
        parse: impl FnOnce(&str) -> Result<T, E>,
    ) -> Result<T, Error> {
        parse(self.str(key)?).map_err(|_| Error::FieldMalformed { field: key, expected })
    }

    /// Reads a hex encoded byte string of any length.
    pub fn hex_bytes(&self, key: &'static str) -> Result<Vec<u8>, Error> {
        self.parse_with(key, "a hex string", |s| hex::decode(s))
    }

    /// Reads a hex encoded byte string that may be absent, in which case it is empty.
    pub fn optional_hex_bytes(&self, key: &'static str) -> Result<Vec<u8>, Error> {
        if self.contains(key) {
            self.hex_bytes(key)
        } else {
            Ok(Vec::new())
        }
    }

    /// Reads a byte string written by [`JsonObject::hex_unless_empty`].
    ///
    /// An absent key reads as empty; an explicit empty string is malformed since it would not
    /// survive a round trip.
    pub fn omittable_hex_bytes(&self, key: &'static str) -> Result<Vec<u8>, Error> {
        let bytes = self.optional_hex_bytes(key)?;
        if bytes.is_empty() && self.contains(key) {
            return Err(Error::FieldMalformed {
                field: key,
                expected: "a non-empty hex string, or no value at all",
            });
        }
        Ok(bytes)
    }

    /// Reads a service field of the form `"a.b.c.d:port"` or `"[ipv6]:port"`.
    ///
    /// The address is returned as the sixteen byte IPv6 (or IPv4-mapped) form used on the wire,
    /// packed little-endian into a `u128`.
    pub fn service(&self, key: &'static str) -> Result<(u128, u16), Error> {
        self.parse_with(key, "an \"ip:port\" string", |s| {
            s.parse::<SocketAddr>().map(|addr| {
                let ip = match addr {
                    SocketAddr::V4(v4) => v4.ip().to_ipv6_mapped(),
                    SocketAddr::V6(v6) => *v6.ip(),
                };
                (u128::from_le_bytes(ip.octets()), addr.port())
            })
        })
    }

    /// Reads a nested JSON object.
    pub fn object(&self, key: &'static str) -> Result<JsonFields<'a>, Error> {
        self.value(key)?
            .as_object()
            .map(|map| JsonFields { map })
            .ok_or(Error::FieldMalformed { field: key, expected: "an object" })
    }
}

/// Builder for the JSON object of a payload.
#[derive(Clone, Debug, Default)]
pub struct JsonObject(Map<String, Value>);

impl JsonObject {
    /// Creates an empty object.
    pub fn new() -> Self { JsonObject(Map::new()) }

    /// Adds a numeric field.
    pub fn number(mut self, key: &str, n: impl Into<Value>) -> Self {
        self.0.insert(key.to_owned(), n.into());
        self
    }

    /// Adds a string field, typically a hash in its display form.
    pub fn string(mut self, key: &str, s: impl ToString) -> Self {
        self.0.insert(key.to_owned(), Value::String(s.to_string()));
        self
    }

    /// Adds a byte string as lowercase hex.
    pub fn hex(self, key: &str, bytes: impl AsRef<[u8]>) -> Self {
        self.string(key, hex::encode(bytes))
    }

    /// Adds a byte string as lowercase hex unless it is empty.
    pub fn hex_unless_empty(self, key: &str, bytes: &[u8]) -> Self {
        if bytes.is_empty() {
            self
        } else {
            self.hex(key, bytes)
        }
    }

    /// Adds a service address.
    pub fn service(self, key: &str, ip_address: u128, port: u16) -> Self {
        self.string(key, service_to_string(ip_address, port))
    }

    /// Adds a nested object.
    pub fn object(mut self, key: &str, object: JsonObject) -> Self {
        self.0.insert(key.to_owned(), object.into_value());
        self
    }

    /// Finishes the object.
    pub fn into_value(self) -> Value { Value::Object(self.0) }
}

/// Formats a wire service address, showing IPv4-mapped addresses in dotted form.
pub fn service_to_string(ip_address: u128, port: u16) -> String {
    let ip = Ipv6Addr::from(ip_address.to_le_bytes());
    match ip.to_ipv4_mapped() {
        Some(v4) => format!("{}:{}", v4, port),
        None => SocketAddrV6::new(ip, port, 0, 0).to_string(),
    }
}
