//! One-time password generation and verification per [rfc-4226] (HOTP, keyed
//! by an explicit counter) and [rfc-6238] (TOTP, keyed by elapsed time), with
//! encoding and decoding of the `otpauth://` provisioning URL understood by
//! the common authenticator apps.
//!
//! Be aware that some authenticator apps will accept the `SHA256` and
//! `SHA512` algorithms but silently fall back to `SHA1`, which makes
//! verification fail due to mismatched algorithms. Use `SHA1` to avoid this
//! problem.
//!
//! [rfc-4226]: https://tools.ietf.org/html/rfc4226
//! [rfc-6238]: https://tools.ietf.org/html/rfc6238
//!
//! # Examples
//!
//! ```rust
//! use otp_rs::{Algorithm, HOTP};
//!
//! let hotp = HOTP::new(
//!     Algorithm::SHA1,
//!     6,
//!     "12345678901234567890".as_bytes().to_vec(),
//!     Some("Example".to_string()),
//!     "alice@example.com".to_string(),
//! ).unwrap();
//! assert_eq!(hotp.generate(0), "755224");
//! assert!(hotp.check("287082", 1, 0));
//! ```
//!
//! ```rust
//! use std::time::Duration;
//! use otp_rs::{Algorithm, Secret, TOTP};
//!
//! let totp = TOTP::new(
//!     Algorithm::SHA1,
//!     6,
//!     Duration::from_secs(30),
//!     Secret::Encoded("KRSXG5CTMVRXEZLUKN2XAZLSKNSWG4TFOQ".to_string()).to_bytes().unwrap(),
//!     Some("Example".to_string()),
//!     "alice@example.com".to_string(),
//! ).unwrap();
//! println!("{}", totp.generate_current().unwrap());
//! println!("{}", totp.get_url());
//! ```

mod hotp;
mod otpauth;
mod rfc;
mod secret;
mod totp;
mod url_error;

pub use hotp::HOTP;
pub use rfc::{Rfc4226, Rfc6238, RfcError};
pub use secret::{Secret, SecretParseError};
pub use totp::{InvalidTimeError, TOTP};
pub use url_error::OtpUrlError;

use constant_time_eq::constant_time_eq;

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

use core::fmt;

use hmac::Mac;

type HmacSha1 = hmac::Hmac<sha1::Sha1>;
type HmacSha256 = hmac::Hmac<sha2::Sha256>;
type HmacSha512 = hmac::Hmac<sha2::Sha512>;

/// Algorithm enum holds the three standard algorithms permitted by the
/// [reference implementation](https://tools.ietf.org/html/rfc6238#appendix-A).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub enum Algorithm {
    SHA1,
    SHA256,
    SHA512,
}

impl Default for Algorithm {
    fn default() -> Self {
        Algorithm::SHA1
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::SHA1 => f.write_str("SHA1"),
            Algorithm::SHA256 => f.write_str("SHA256"),
            Algorithm::SHA512 => f.write_str("SHA512"),
        }
    }
}

impl Algorithm {
    fn hash<D>(mut digest: D, data: &[u8]) -> Vec<u8>
    where
        D: Mac,
    {
        digest.update(data);
        digest.finalize().into_bytes().to_vec()
    }

    /// HMAC of `data` under `key`. Key setup never fails: HMAC hashes long
    /// keys down and pads short ones, so every length is a valid key.
    pub(crate) fn sign(&self, key: &[u8], data: &[u8]) -> Vec<u8> {
        match self {
            Algorithm::SHA1 => Algorithm::hash(HmacSha1::new_from_slice(key).unwrap(), data),
            Algorithm::SHA256 => Algorithm::hash(HmacSha256::new_from_slice(key).unwrap(), data),
            Algorithm::SHA512 => Algorithm::hash(HmacSha512::new_from_slice(key).unwrap(), data),
        }
    }
}

/// Dynamic truncation per [rfc-4226 §5.3](https://tools.ietf.org/html/rfc4226#section-5.3):
/// HMAC the big-endian counter, pick the 31-bit word at the offset named by
/// the digest's last nibble, keep the low `digits` decimal digits.
pub(crate) fn derive_code(algorithm: Algorithm, secret: &[u8], counter: u64, digits: usize) -> String {
    let hash = algorithm.sign(secret, counter.to_be_bytes().as_ref());
    let offset = (hash.last().unwrap() & 0x0f) as usize;
    let binary = u32::from_be_bytes(hash[offset..offset + 4].try_into().unwrap()) & 0x7fff_ffff;
    format!(
        "{:0width$}",
        binary % 10_u32.pow(digits as u32),
        width = digits
    )
}

/// Accept `code` iff it matches one of the counters in
/// `[counter, counter + window]`. The window only reaches forward: counters
/// already passed never match again, so an observed code can't be replayed
/// against a verifier that moved on. The scan stops at `u64::MAX`.
pub(crate) fn check_window(
    algorithm: Algorithm,
    secret: &[u8],
    digits: usize,
    code: &str,
    counter: u64,
    window: u64,
) -> bool {
    for ahead in 0..=window {
        let candidate = match counter.checked_add(ahead) {
            Some(c) => derive_code(algorithm, secret, c, digits),
            None => break,
        };
        if constant_time_eq(candidate.as_bytes(), code.as_bytes()) {
            return true;
        }
    }
    false
}
