//! Counter-based one-time passwords per [rfc-4226](https://tools.ietf.org/html/rfc4226).

use core::fmt;

use base32::Alphabet;
use constant_time_eq::constant_time_eq;

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

use crate::otpauth;
use crate::rfc::{assert_digits, assert_secret};
use crate::url_error::OtpUrlError;
use crate::{check_window, derive_code, Algorithm};

/// HOTP holds the configuration to generate and validate counter-based
/// codes. Its [secret](struct.HOTP.html#structfield.secret) field is
/// sensitive data, treat it accordingly.
///
/// The moving factor lives with the caller: the generator keeps no counter
/// state, every call names the counter it works on.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub struct HOTP<T = Vec<u8>> {
    /// SHA-1 is the most widespread algorithm; for HMAC use its known
    /// collision weaknesses [do not apply](https://tools.ietf.org/html/rfc4226#appendix-B.2).
    /// Not all clients support the other two.
    pub algorithm: Algorithm,
    /// The number of digits composing the code. Per
    /// [rfc-4226](https://tools.ietf.org/html/rfc4226#section-5.3) between 6 and 8.
    pub digits: usize,
    /// Non-encoded secret bytes. Per [rfc-4226](https://tools.ietf.org/html/rfc4226#section-4)
    /// they should come from a strong source, most likely a CSPRNG.
    pub secret: T,
    /// The "Example" part of "Example:alice". Must not contain a colon.
    pub issuer: Option<String>,
    /// The "alice" part of "Example:alice". Must not contain a colon.
    pub account_name: String,
}

impl<T: AsRef<[u8]>> PartialEq for HOTP<T> {
    /// Will not check for issuer and account_name equality, as they aren't
    /// taken into account for code generation or checking.
    fn eq(&self, other: &Self) -> bool {
        if self.algorithm != other.algorithm {
            return false;
        }
        if self.digits != other.digits {
            return false;
        }
        constant_time_eq(self.secret.as_ref(), other.secret.as_ref())
    }
}

impl fmt::Display for HOTP {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "digits: {}; alg: {}; issuer: <{}>({})",
            self.digits,
            self.algorithm,
            self.issuer.clone().unwrap_or_else(|| "None".to_string()),
            self.account_name
        )
    }
}

#[cfg(feature = "gen_secret")]
#[cfg_attr(docsrs, doc(cfg(feature = "gen_secret")))]
impl Default for HOTP {
    fn default() -> Self {
        HOTP::new(
            Algorithm::SHA1,
            6,
            crate::Secret::generate_secret().to_bytes().unwrap(),
            None,
            "".to_string(),
        )
        .unwrap()
    }
}

impl<T: AsRef<[u8]>> HOTP<T> {
    /// Will create a new instance of HOTP with given parameters. See
    /// [the doc](struct.HOTP.html#fields) for reference as to how to choose
    /// those values.
    ///
    /// # Errors
    ///
    /// Will return an error when `digits` is outside 6..=8, when `secret`
    /// is empty, or when issuer or account name contain a colon.
    pub fn new(
        algorithm: Algorithm,
        digits: usize,
        secret: T,
        issuer: Option<String>,
        account_name: String,
    ) -> Result<HOTP<T>, OtpUrlError> {
        assert_digits(&digits)?;
        assert_secret(secret.as_ref())?;
        if let Some(issuer) = &issuer {
            if issuer.contains(':') {
                return Err(OtpUrlError::Issuer(issuer.clone()));
            }
        }
        if account_name.contains(':') {
            return Err(OtpUrlError::AccountName(account_name));
        }
        Ok(HOTP {
            algorithm,
            digits,
            secret,
            issuer,
            account_name,
        })
    }

    /// Generate the code for `counter`. The counter is taken as-is;
    /// advancing it between calls is the caller's burden.
    pub fn generate(&self, counter: u64) -> String {
        derive_code(self.algorithm, self.secret.as_ref(), counter, self.digits)
    }

    /// Will check if `code` is valid for `counter`, also accepting codes up
    /// to `window` counters ahead. Counters behind `counter` never match, so
    /// a consumed code can't be replayed once the verifier advanced past it.
    pub fn check(&self, code: &str, counter: u64, window: u64) -> bool {
        check_window(
            self.algorithm,
            self.secret.as_ref(),
            self.digits,
            code,
            counter,
            window,
        )
    }

    /// Will return the base32 representation of the secret, which might be
    /// useful when users want to manually add the secret to their
    /// authenticator.
    pub fn get_secret_base32(&self) -> String {
        base32::encode(Alphabet::Rfc4648 { padding: false }, self.secret.as_ref())
    }

    /// Will generate a standard provisioning URL used to automatically add
    /// this configuration to authenticator apps, with `counter` as the
    /// initial moving factor.
    ///
    /// Issuer and account name will be URL-encoded; the secret is base32'd
    /// without padding, as per RFC.
    pub fn get_url(&self, counter: u64) -> String {
        otpauth::build(
            otpauth::HOTP_TYPE,
            self.issuer.as_deref(),
            &self.account_name,
            &self.get_secret_base32(),
            self.algorithm,
            self.digits,
            ("counter", counter),
        )
    }

    /// Generate an HOTP from the standard otpauth URL, together with the
    /// initial counter the URL carries.
    ///
    /// `secret` and `counter` are mandatory; `digits` and `algorithm`
    /// default to 6 and SHA1.
    pub fn from_url<S: AsRef<str>>(url: S) -> Result<(HOTP<Vec<u8>>, u64), OtpUrlError> {
        let parsed = otpauth::parse(url.as_ref(), otpauth::HOTP_TYPE)?;
        let counter = parsed.counter.ok_or(OtpUrlError::MissingCounter)?;
        let hotp = HOTP::new(
            parsed.algorithm,
            parsed.digits,
            parsed.secret,
            parsed.issuer,
            parsed.account_name,
        )?;
        Ok((hotp, counter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "12345678901234567890";
    const SECRET_B32: &str = "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ";

    fn hotp() -> HOTP<&'static str> {
        HOTP::new(Algorithm::SHA1, 6, SECRET, None, "".to_string()).unwrap()
    }

    #[test]
    fn rfc4226_appendix_d_vectors() {
        let expected = [
            "755224", "287082", "359152", "969429", "338314", "254676", "287922", "162583",
            "399871", "520489",
        ];
        let hotp = hotp();
        for (counter, expected) in expected.iter().enumerate() {
            assert_eq!(&hotp.generate(counter as u64), expected);
        }
    }

    #[test]
    fn longer_codes_keep_the_low_digits() {
        let seven = HOTP::new(Algorithm::SHA1, 7, SECRET, None, "".to_string()).unwrap();
        assert_eq!(seven.generate(0), "4755224");
        let eight = HOTP::new(Algorithm::SHA1, 8, SECRET, None, "".to_string()).unwrap();
        assert_eq!(eight.generate(0), "84755224");
    }

    #[test]
    fn checks_code_without_window() {
        let hotp = hotp();
        assert!(hotp.check("755224", 0, 0));
        assert!(!hotp.check("755224", 1, 0));
        assert!(!hotp.check("755225", 0, 0));
    }

    #[test]
    fn window_accepts_only_counters_ahead() {
        let hotp = hotp();
        for k in 0..=3u64 {
            let code = hotp.generate(2 + k);
            assert!(hotp.check(&code, 2, 3), "offset {} should match", k);
        }
        assert!(!hotp.check(&hotp.generate(6), 2, 3));
        assert!(!hotp.check(&hotp.generate(1), 2, 3));
        assert!(!hotp.check(&hotp.generate(0), 2, 3));
    }

    #[test]
    fn round_trips_generated_codes() {
        let hotp = HOTP::new(Algorithm::SHA512, 8, SECRET, None, "".to_string()).unwrap();
        for counter in [0, 1, 9, 1_000_000, u64::MAX] {
            assert!(hotp.check(&hotp.generate(counter), counter, 0));
        }
    }

    #[test]
    fn new_rejects_invalid_configuration() {
        assert_eq!(
            HOTP::new(Algorithm::SHA1, 5, SECRET, None, "".to_string()).unwrap_err(),
            OtpUrlError::DigitsNumber(5)
        );
        assert_eq!(
            HOTP::new(Algorithm::SHA1, 6, "", None, "".to_string()).unwrap_err(),
            OtpUrlError::EmptySecret
        );
        assert_eq!(
            HOTP::new(
                Algorithm::SHA1,
                6,
                SECRET,
                Some("Bad:Issuer".to_string()),
                "".to_string()
            )
            .unwrap_err(),
            OtpUrlError::Issuer("Bad:Issuer".to_string())
        );
        assert_eq!(
            HOTP::new(Algorithm::SHA1, 6, SECRET, None, "bad:account".to_string()).unwrap_err(),
            OtpUrlError::AccountName("bad:account".to_string())
        );
    }

    #[test]
    fn url_matches_wire_format() {
        let hotp = HOTP::new(
            Algorithm::SHA1,
            6,
            SECRET,
            Some("Example".to_string()),
            "alice@example.com".to_string(),
        )
        .unwrap();
        assert_eq!(
            hotp.get_url(5),
            format!(
                "otpauth://hotp/Example:alice%40example.com?secret={}&algorithm=SHA1&digits=6&counter=5",
                SECRET_B32
            )
        );
    }

    #[test]
    fn url_without_account_drops_the_colon() {
        let hotp = HOTP::new(
            Algorithm::SHA1,
            6,
            SECRET,
            Some("Example".to_string()),
            "".to_string(),
        )
        .unwrap();
        assert_eq!(
            hotp.get_url(0),
            format!(
                "otpauth://hotp/Example?secret={}&algorithm=SHA1&digits=6&counter=0",
                SECRET_B32
            )
        );
    }

    #[test]
    fn from_url_round_trip() {
        let original = HOTP::new(
            Algorithm::SHA256,
            8,
            SECRET.as_bytes().to_vec(),
            Some("Example".to_string()),
            "alice@example.com".to_string(),
        )
        .unwrap();
        let (decoded, counter) = HOTP::<Vec<u8>>::from_url(original.get_url(42)).unwrap();
        assert_eq!(decoded, original);
        assert_eq!(counter, 42);
        assert_eq!(decoded.issuer, original.issuer);
        assert_eq!(decoded.account_name, original.account_name);
    }

    #[test]
    fn from_url_applies_defaults() {
        let (hotp, counter) = HOTP::<Vec<u8>>::from_url(format!(
            "otpauth://hotp/alice?secret={}&counter=0",
            SECRET_B32
        ))
        .unwrap();
        assert_eq!(hotp.algorithm, Algorithm::SHA1);
        assert_eq!(hotp.digits, 6);
        assert_eq!(hotp.secret, SECRET.as_bytes());
        assert_eq!(counter, 0);
    }

    #[test]
    fn from_url_requires_counter() {
        let err =
            HOTP::<Vec<u8>>::from_url(format!("otpauth://hotp/alice?secret={}", SECRET_B32))
                .unwrap_err();
        assert_eq!(err, OtpUrlError::MissingCounter);
    }

    #[test]
    fn from_url_requires_secret() {
        let err = HOTP::<Vec<u8>>::from_url("otpauth://hotp/alice?counter=0").unwrap_err();
        assert_eq!(err, OtpUrlError::MissingSecret);
    }

    #[test]
    fn from_url_rejects_totp_host() {
        let err = HOTP::<Vec<u8>>::from_url(format!(
            "otpauth://totp/alice?secret={}&counter=0",
            SECRET_B32
        ))
        .unwrap_err();
        assert_eq!(err, OtpUrlError::Host("totp".to_string()));
    }

    #[test]
    fn comparison_ignores_label() {
        let reference = HOTP::new(
            Algorithm::SHA1,
            6,
            SECRET,
            Some("Example".to_string()),
            "alice".to_string(),
        )
        .unwrap();
        let same_key = HOTP::new(Algorithm::SHA1, 6, SECRET, None, "bob".to_string()).unwrap();
        assert_eq!(reference, same_key);

        let other_algorithm =
            HOTP::new(Algorithm::SHA256, 6, SECRET, None, "alice".to_string()).unwrap();
        assert_ne!(reference, other_algorithm);
        let other_digits = HOTP::new(Algorithm::SHA1, 8, SECRET, None, "alice".to_string()).unwrap();
        assert_ne!(reference, other_digits);
    }

    #[test]
    #[cfg(feature = "gen_secret")]
    fn default_values() {
        let hotp = HOTP::default();
        assert_eq!(hotp.algorithm, Algorithm::SHA1);
        assert_eq!(hotp.digits, 6);
        assert_eq!(hotp.secret.len(), 20);
    }
}
