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

//! Special transaction payload errors.
//!
//! Every payload operation either succeeds completely or fails with one of these errors; there
//! is no partial success.
//!

use std::{error, fmt};

use crate::blockdata::transaction::special_transaction::TransactionType;
use crate::consensus::encode;
use crate::io;

/// An error raised while decoding, importing, exporting or validating a special transaction
/// payload.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// A field read would have run past the end of the raw payload.
    PayloadTruncated,
    /// Every field was decoded but raw payload bytes were left over.
    PayloadTooLong {
        /// How many bytes were not consumed.
        unconsumed: usize,
    },
    /// Any other wire level fault, such as a non-minimal compact size.
    Decode(encode::Error),
    /// The JSON form of a payload was not a JSON object.
    NotAnObject,
    /// A required JSON field was absent.
    FieldMissing(&'static str),
    /// A JSON field had the wrong type, size or format.
    FieldMalformed {
        /// The JSON key of the field.
        field: &'static str,
        /// What the field should have looked like.
        expected: &'static str,
    },
    /// The payload fields break a protocol constraint.
    ValidationFailed(ValidationError),
    /// The special transaction type is not known.
    UnknownTransactionType(u16),
    /// The transaction type does not carry a payload.
    NoPayload(TransactionType),
    /// A payload was requested as a different type than the one it holds.
    WrongPayloadConversion {
        /// The type that was asked for.
        expected: TransactionType,
        /// The type of the payload that was found.
        actual: TransactionType,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::PayloadTruncated => {
                write!(f, "Failed to parse payload: raw payload is smaller than expected.")
            }
            Error::PayloadTooLong { .. } => {
                write!(f, "Failed to parse payload: raw payload is bigger than expected.")
            }
            Error::Decode(ref e) => write!(f, "Failed to parse payload: {}", e),
            Error::NotAnObject => write!(f, "payload JSON is not an object"),
            Error::FieldMissing(field) => write!(f, "payload field '{}' is missing", field),
            Error::FieldMalformed { field, expected } => {
                write!(f, "payload field '{}' is malformed: expected {}", field, expected)
            }
            Error::ValidationFailed(ref e) => write!(f, "invalid payload: {}", e),
            Error::UnknownTransactionType(n) => write!(f, "unknown special transaction type {}", n),
            Error::NoPayload(tx_type) => write!(f, "{} transactions carry no payload", tx_type),
            Error::WrongPayloadConversion { expected, actual } => {
                write!(f, "expected a {} payload, found a {} payload", expected, actual)
            }
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Decode(e) => Some(e),
            Error::ValidationFailed(e) => Some(e),
            Error::PayloadTruncated
            | Error::PayloadTooLong { .. }
            | Error::NotAnObject
            | Error::FieldMissing(..)
            | Error::FieldMalformed { .. }
            | Error::UnknownTransactionType(..)
            | Error::NoPayload(..)
            | Error::WrongPayloadConversion { .. } => None,
        }
    }
}

#[doc(hidden)]
impl From<encode::Error> for Error {
    fn from(e: encode::Error) -> Self {
        if e.is_truncation() {
            Error::PayloadTruncated
        } else {
            Error::Decode(e)
        }
    }
}

#[doc(hidden)]
impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self { Error::from(encode::Error::Io(e)) }
}

#[doc(hidden)]
impl From<ValidationError> for Error {
    fn from(e: ValidationError) -> Self { Error::ValidationFailed(e) }
}

/// The reason a payload failed validation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    /// The payload, or a structure inside it, has a version this library does not know.
    UnsupportedVersion {
        /// The field holding the version.
        field: &'static str,
        /// The version found.
        version: u16,
    },
    /// A numeric field is outside its allowed range.
    OutOfRange {
        /// The offending field.
        field: &'static str,
        /// The value found.
        value: i64,
        /// The smallest allowed value.
        min: i64,
        /// The largest allowed value.
        max: i64,
    },
    /// A variable length field is too short or too long.
    InvalidLength {
        /// The offending field.
        field: &'static str,
        /// The length found.
        length: usize,
        /// The smallest allowed length.
        min: usize,
        /// The largest allowed length.
        max: usize,
    },
    /// A hash or key that must be set is all zeroes.
    NullHash(&'static str),
    /// A network service address is not a usable IPv4 address and port.
    InvalidService(&'static str),
    /// Two or more fields contradict each other.
    Inconsistent(&'static str),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ValidationError::UnsupportedVersion { field, version } => {
                write!(f, "unsupported {} {}", field, version)
            }
            ValidationError::OutOfRange { field, value, min, max } => {
                write!(f, "{} {} is out of range [{}, {}]", field, value, min, max)
            }
            ValidationError::InvalidLength { field, length, min, max } => {
                write!(f, "{} is {} bytes long, expected between {} and {}", field, length, min, max)
            }
            ValidationError::NullHash(field) => write!(f, "{} must not be null", field),
            ValidationError::InvalidService(reason) => write!(f, "invalid service: {}", reason),
            ValidationError::Inconsistent(reason) => write!(f, "inconsistent fields: {}", reason),
        }
    }
}

impl error::Error for ValidationError {}
