// Rust Dash Library
// Originally written in 2014 by
//     Andrew Poelstra <apoelstra@wpsoftware.net>
//     For Bitcoin
// Updated for Dash in 2022 by
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

//! Internal macros.
//!
//! Macros meant to be used inside the Rust Dash library.
//!

/// Implements consensus encoding for a struct by encoding its fields in declaration order.
macro_rules! impl_consensus_encoding {
    ($thing:ident, $($field:ident),+) => (
        impl $crate::consensus::Encodable for $thing {
            #[inline]
            fn consensus_encode<W: $crate::io::Write + ?Sized>(
                &self,
                w: &mut W,
            ) -> Result<usize, $crate::io::Error> {
                let mut len = 0;
                $(len += $crate::consensus::Encodable::consensus_encode(&self.$field, w)?;)+
                Ok(len)
            }
        }

        impl $crate::consensus::Decodable for $thing {
            #[inline]
            fn consensus_decode<R: $crate::io::Read + ?Sized>(
                r: &mut R,
            ) -> Result<$thing, $crate::consensus::encode::Error> {
                Ok($thing {
                    $($field: $crate::consensus::Decodable::consensus_decode(r)?),+
                })
            }
        }
    );
}
pub(crate) use impl_consensus_encoding;

/// Implements standard array methods for a given wrapper type.
macro_rules! impl_array_newtype {
    ($thing:ident, $ty:ty, $len:literal) => {
        impl $thing {
            /// Returns the length of the object as an array.
            #[inline]
            pub fn len(&self) -> usize { $len }

            /// Returns whether the object, as an array, is empty. Always false.
            #[inline]
            pub fn is_empty(&self) -> bool { false }

            /// Returns a reference to the underlying bytes.
            #[inline]
            pub fn as_bytes(&self) -> &[$ty; $len] { &self.0 }

            /// Returns the underlying bytes.
            #[inline]
            pub fn to_bytes(self) -> [$ty; $len] { self.0 }

            /// Returns true if every byte is zero.
            #[inline]
            pub fn is_zeroed(&self) -> bool { self.0.iter().all(|b| *b == 0) }
        }

        impl core::convert::From<[$ty; $len]> for $thing {
            fn from(data: [$ty; $len]) -> Self { $thing(data) }
        }

        impl<'a> core::convert::TryFrom<&'a [$ty]> for $thing {
            type Error = core::array::TryFromSliceError;

            fn try_from(data: &'a [$ty]) -> Result<Self, Self::Error> {
                <[$ty; $len]>::try_from(data).map($thing)
            }
        }

        impl AsRef<[$ty; $len]> for $thing {
            fn as_ref(&self) -> &[$ty; $len] { &self.0 }
        }

        impl AsRef<[$ty]> for $thing {
            fn as_ref(&self) -> &[$ty] { &self.0 }
        }
    };
}
pub(crate) use impl_array_newtype;

/// Implements hex formatting and parsing for a fixed size byte array wrapper.
macro_rules! impl_bytes_newtype {
    ($t:ident, $len:literal) => {
        impl $t {
            /// Parses the bytes from a lowercase or uppercase hex string of exactly the right length.
            pub fn from_hex(s: &str) -> Result<$t, ::hex::FromHexError> {
                let mut data = [0u8; $len];
                ::hex::decode_to_slice(s, &mut data)?;
                Ok($t(data))
            }

            /// Formats the bytes as a lowercase hex string.
            pub fn to_hex(&self) -> String { ::hex::encode(&self.0[..]) }
        }

        impl core::fmt::LowerHex for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                for ch in &self.0[..] {
                    write!(f, "{:02x}", *ch)?;
                }
                Ok(())
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                core::fmt::LowerHex::fmt(self, f)
            }
        }

        impl core::fmt::Debug for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                core::fmt::LowerHex::fmt(self, f)
            }
        }

        impl core::str::FromStr for $t {
            type Err = ::hex::FromHexError;

            fn from_str(s: &str) -> Result<Self, Self::Err> { $t::from_hex(s) }
        }
    };
}
pub(crate) use impl_bytes_newtype;

/// Implements `serde` for a special transaction payload by going through its JSON form, so that
/// values entering or leaving a serde document are validated like any other boundary crossing.
macro_rules! impl_payload_serde {
    ($payload:ident) => {
        impl serde::Serialize for $payload {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                use $crate::special_transaction::SpecialTransactionPayload;
                let value = self.to_json().map_err(serde::ser::Error::custom)?;
                serde::Serialize::serialize(&value, serializer)
            }
        }

        impl<'de> serde::Deserialize<'de> for $payload {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                use $crate::special_transaction::SpecialTransactionPayload;
                let value = <serde_json::Value as serde::Deserialize>::deserialize(deserializer)?;
                $payload::from_json(&value).map_err(serde::de::Error::custom)
            }
        }
    };
}
pub(crate) use impl_payload_serde;
