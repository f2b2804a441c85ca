//! Representation of a shared secret, either raw bytes or a base 32 encoded
//! String.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//! use otp_rs::{Algorithm, Secret, TOTP};
//!
//! // The form authenticator apps exchange: RFC 4648 base32, no padding.
//! let secret = Secret::Encoded("N5XGKLLUNFWWKLLQMFZXGLLTMVRXEZLU".to_string());
//! let totp = TOTP::new(
//!     Algorithm::SHA1,
//!     6,
//!     Duration::from_secs(30),
//!     secret.to_bytes().unwrap(),
//!     None,
//!     String::new(),
//! ).unwrap();
//! println!("{}", totp.generate_current().unwrap());
//! ```
//!
//! ```
//! use otp_rs::Secret;
//!
//! // Raw bytes and their encoded form compare equal.
//! let raw = Secret::Raw(b"one-time-pass-secret".to_vec());
//! assert_eq!(raw.to_encoded(), Secret::Encoded("N5XGKLLUNFWWKLLQMFZXGLLTMVRXEZLU".to_string()));
//! ```

use base32::{self, Alphabet};

use constant_time_eq::constant_time_eq;

/// Different ways secret parsing failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretParseError {
    /// Invalid base32 input.
    ParseBase32,
}

impl std::error::Error for SecretParseError {}

impl std::fmt::Display for SecretParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecretParseError::ParseBase32 => write!(f, "Could not decode base32 secret."),
        }
    }
}

/// Shared secret between prover and verifier, used to generate a token and
/// to validate one.
#[derive(Debug, Clone, Eq)]
#[cfg_attr(feature = "zeroize", derive(zeroize::Zeroize, zeroize::ZeroizeOnDrop))]
pub enum Secret {
    /// Non-encoded "raw" secret.
    Raw(Vec<u8>),
    /// Base32 encoded secret.
    Encoded(String),
}

impl PartialEq for Secret {
    /// Will check that to_bytes() returns the same.
    /// One secret can be Raw, and the other Encoded.
    fn eq(&self, other: &Self) -> bool {
        constant_time_eq(&self.to_bytes().unwrap(), &other.to_bytes().unwrap())
    }
}

#[cfg(feature = "gen_secret")]
#[cfg_attr(docsrs, doc(cfg(feature = "gen_secret")))]
impl Default for Secret {
    fn default() -> Self {
        Secret::generate_secret()
    }
}

impl Secret {
    /// Get the inner value as a Vec of bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SecretParseError> {
        match self {
            Secret::Raw(s) => Ok(s.to_vec()),
            Secret::Encoded(s) => match base32::decode(Alphabet::Rfc4648 { padding: false }, s) {
                Some(bytes) => Ok(bytes),
                None => Err(SecretParseError::ParseBase32),
            },
        }
    }

    /// Try to transform a `Secret::Encoded` into a `Secret::Raw`
    pub fn to_raw(&self) -> Result<Self, SecretParseError> {
        match self {
            Secret::Raw(_) => Ok(self.clone()),
            Secret::Encoded(s) => match base32::decode(Alphabet::Rfc4648 { padding: false }, s) {
                Some(buf) => Ok(Secret::Raw(buf)),
                None => Err(SecretParseError::ParseBase32),
            },
        }
    }

    /// Transform a `Secret::Raw` into a `Secret::Encoded`.
    pub fn to_encoded(&self) -> Self {
        match self {
            Secret::Raw(s) => {
                Secret::Encoded(base32::encode(Alphabet::Rfc4648 { padding: false }, s))
            }
            Secret::Encoded(_) => self.clone(),
        }
    }

    /// Generate a CSPRNG binary value of 160 bits, the recommended size
    /// from [rfc-4226](https://www.rfc-editor.org/rfc/rfc4226#section-4).
    ///
    /// > The length of the shared secret MUST be at least 128 bits.
    /// > This document RECOMMENDs a shared secret length of 160 bits.
    ///
    /// ⚠️ The generated secret is not guaranteed to be a valid UTF-8 sequence.
    #[cfg(feature = "gen_secret")]
    #[cfg_attr(docsrs, doc(cfg(feature = "gen_secret")))]
    pub fn generate_secret() -> Secret {
        use rand::Rng;

        let mut rng = rand::rng();
        let mut secret: [u8; 20] = Default::default();
        rng.fill(&mut secret[..]);
        Secret::Raw(secret.to_vec())
    }
}

impl std::fmt::Display for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Secret::Raw(bytes) => {
                for b in bytes {
                    write!(f, "{:02x}", b)?;
                }
                Ok(())
            }
            Secret::Encoded(s) => write!(f, "{}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Secret;

    const BASE32: &str = "N5XGKLLUNFWWKLLQMFZXGLLTMVRXEZLU";
    const BYTES: &[u8] = b"one-time-pass-secret";
    const BYTES_DISPLAY: &str = "6f6e652d74696d652d706173732d736563726574";

    #[test]
    fn secret_display() {
        let secret_raw = Secret::Raw(BYTES.to_vec());
        let secret_base32 = Secret::Encoded(BASE32.to_string());
        assert_eq!(secret_raw.to_string(), BYTES_DISPLAY.to_string());
        assert_eq!(secret_base32.to_string(), BASE32.to_string());
    }

    #[test]
    fn secret_convert_base32_raw() {
        let secret_raw = Secret::Raw(BYTES.to_vec());
        let secret_base32 = Secret::Encoded(BASE32.to_string());

        assert_eq!(&secret_raw.to_encoded(), &secret_base32);
        assert_eq!(&secret_raw.to_raw().unwrap(), &secret_raw);

        assert_eq!(&secret_base32.to_raw().unwrap(), &secret_raw);
        assert_eq!(&secret_base32.to_encoded(), &secret_base32);
    }

    #[test]
    fn secret_as_bytes() {
        assert_eq!(Secret::Raw(BYTES.to_vec()).to_bytes().unwrap(), BYTES);
        assert_eq!(
            Secret::Encoded(BASE32.to_string()).to_bytes().unwrap(),
            BYTES
        );
    }

    #[test]
    fn secret_invalid_base32() {
        let secret = Secret::Encoded("not base32!".to_string());
        assert!(secret.to_raw().is_err());
        assert!(secret.to_bytes().is_err());
    }

    #[test]
    #[cfg(feature = "gen_secret")]
    fn secret_gen_secret() {
        let secret = Secret::generate_secret();

        assert!(matches!(secret, Secret::Raw(_)));
        assert_eq!(secret.to_bytes().unwrap().len(), 20);
    }

    #[test]
    #[cfg(feature = "gen_secret")]
    fn secret_gen_default() {
        let secret = Secret::default();

        assert!(matches!(secret, Secret::Raw(_)));
        assert_eq!(secret.to_bytes().unwrap().len(), 20);
    }
}
