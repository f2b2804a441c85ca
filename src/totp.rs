//! Time-based one-time passwords per [rfc-6238](https://tools.ietf.org/html/rfc6238).

use core::fmt;

use std::time::{Duration, SystemTime, SystemTimeError, UNIX_EPOCH};

use base32::Alphabet;
use constant_time_eq::constant_time_eq;

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

use crate::otpauth;
use crate::rfc::{assert_digits, assert_period, assert_secret};
use crate::url_error::OtpUrlError;
use crate::{check_window, derive_code, Algorithm};

/// An explicit timestamp handed to [TOTP::generate](struct.TOTP.html#method.generate)
/// must sit strictly after the Unix epoch; zero marks an unset value, not a
/// clock reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTimeError;

impl std::error::Error for InvalidTimeError {}

impl fmt::Display for InvalidTimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("time must be above zero")
    }
}

fn system_time_millis() -> Result<u128, SystemTimeError> {
    let t = SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis();
    Ok(t)
}

/// TOTP holds the configuration to generate and validate time-based codes.
/// Its [secret](struct.TOTP.html#structfield.secret) field is sensitive
/// data, treat it accordingly.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub struct TOTP<T = Vec<u8>> {
    /// SHA-1 is the main algorithm cited in
    /// [rfc-6238](https://tools.ietf.org/html/rfc6238#section-3), even though
    /// the reference implementation permits SHA-1, SHA-256 and SHA-512.
    /// Not all clients support the other two.
    pub algorithm: Algorithm,
    /// The number of digits composing the code. Per
    /// [rfc-4226](https://tools.ietf.org/html/rfc4226#section-5.3) between 6 and 8.
    pub digits: usize,
    /// Length of one time step; the code changes once per period. The
    /// recommended value per [rfc-6238](https://tools.ietf.org/html/rfc6238#section-5.2)
    /// is 30 seconds.
    pub period: Duration,
    /// Non-encoded secret bytes. Per [rfc-4226](https://tools.ietf.org/html/rfc4226#section-4)
    /// they should come from a strong source, most likely a CSPRNG.
    pub secret: T,
    /// The "Example" part of "Example:alice". Must not contain a colon.
    pub issuer: Option<String>,
    /// The "alice" part of "Example:alice". Must not contain a colon.
    pub account_name: String,
}

impl<T: AsRef<[u8]>> PartialEq for TOTP<T> {
    /// Will not check for issuer and account_name equality, as they aren't
    /// taken into account for code generation or checking.
    fn eq(&self, other: &Self) -> bool {
        if self.algorithm != other.algorithm {
            return false;
        }
        if self.digits != other.digits {
            return false;
        }
        if self.period != other.period {
            return false;
        }
        constant_time_eq(self.secret.as_ref(), other.secret.as_ref())
    }
}

impl fmt::Display for TOTP {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "digits: {}; period: {}s; alg: {}; issuer: <{}>({})",
            self.digits,
            self.period.as_secs(),
            self.algorithm,
            self.issuer.clone().unwrap_or_else(|| "None".to_string()),
            self.account_name
        )
    }
}

#[cfg(feature = "gen_secret")]
#[cfg_attr(docsrs, doc(cfg(feature = "gen_secret")))]
impl Default for TOTP {
    fn default() -> Self {
        TOTP::new(
            Algorithm::SHA1,
            6,
            Duration::from_secs(30),
            crate::Secret::generate_secret().to_bytes().unwrap(),
            None,
            "".to_string(),
        )
        .unwrap()
    }
}

impl<T: AsRef<[u8]>> TOTP<T> {
    /// Will create a new instance of TOTP with given parameters. See
    /// [the doc](struct.TOTP.html#fields) for reference as to how to choose
    /// those values.
    ///
    /// # Errors
    ///
    /// Will return an error when `digits` is outside 6..=8, when `secret`
    /// is empty, when `period` is shorter than a second, or when issuer or
    /// account name contain a colon.
    pub fn new(
        algorithm: Algorithm,
        digits: usize,
        period: Duration,
        secret: T,
        issuer: Option<String>,
        account_name: String,
    ) -> Result<TOTP<T>, OtpUrlError> {
        assert_digits(&digits)?;
        assert_secret(secret.as_ref())?;
        assert_period(&period)?;
        if let Some(issuer) = &issuer {
            if issuer.contains(':') {
                return Err(OtpUrlError::Issuer(issuer.clone()));
            }
        }
        if account_name.contains(':') {
            return Err(OtpUrlError::AccountName(account_name));
        }
        Ok(TOTP {
            algorithm,
            digits,
            period,
            secret,
            issuer,
            account_name,
        })
    }

    /// Whole periods elapsed since the epoch, in millisecond arithmetic so
    /// fractional-second periods divide exactly.
    fn counter_at_millis(&self, millis: u128) -> u64 {
        (millis / self.period.as_millis()) as u64
    }

    /// Will generate a code for the provided timestamp in seconds.
    ///
    /// # Errors
    ///
    /// An explicit timestamp of zero is rejected, see
    /// [InvalidTimeError](struct.InvalidTimeError.html).
    pub fn generate(&self, time: u64) -> Result<String, InvalidTimeError> {
        if time == 0 {
            return Err(InvalidTimeError);
        }
        let counter = self.counter_at_millis(u128::from(time) * 1000);
        Ok(derive_code(
            self.algorithm,
            self.secret.as_ref(),
            counter,
            self.digits,
        ))
    }

    /// Will generate a code for the provided instant, truncated to whole
    /// seconds. Instants at or before the epoch are rejected like a zero
    /// timestamp.
    pub fn generate_at(&self, time: SystemTime) -> Result<String, InvalidTimeError> {
        let seconds = time
            .duration_since(UNIX_EPOCH)
            .map_err(|_| InvalidTimeError)?
            .as_secs();
        self.generate(seconds)
    }

    /// Generate a code for the current system time.
    pub fn generate_current(&self) -> Result<String, SystemTimeError> {
        let millis = system_time_millis()?;
        let counter = self.counter_at_millis(millis);
        Ok(derive_code(
            self.algorithm,
            self.secret.as_ref(),
            counter,
            self.digits,
        ))
    }

    /// Will check if `code` is valid for the provided timestamp in seconds,
    /// also accepting codes up to `window` periods ahead. Periods already
    /// passed never match.
    pub fn check(&self, code: &str, time: u64, window: u64) -> bool {
        let counter = self.counter_at_millis(u128::from(time) * 1000);
        check_window(
            self.algorithm,
            self.secret.as_ref(),
            self.digits,
            code,
            counter,
            window,
        )
    }

    /// Will check if `code` is valid for the current system time.
    pub fn check_current(&self, code: &str, window: u64) -> Result<bool, SystemTimeError> {
        let millis = system_time_millis()?;
        let counter = self.counter_at_millis(millis);
        Ok(check_window(
            self.algorithm,
            self.secret.as_ref(),
            self.digits,
            code,
            counter,
            window,
        ))
    }

    /// Give the time left before the code for the current period rolls over.
    pub fn ttl(&self) -> Result<Duration, SystemTimeError> {
        let millis = system_time_millis()?;
        let period = self.period.as_millis();
        Ok(Duration::from_millis((period - millis % period) as u64))
    }

    /// Will return the base32 representation of the secret, which might be
    /// useful when users want to manually add the secret to their
    /// authenticator.
    pub fn get_secret_base32(&self) -> String {
        base32::encode(Alphabet::Rfc4648 { padding: false }, self.secret.as_ref())
    }

    /// Will generate a standard provisioning URL used to automatically add
    /// this configuration to authenticator apps, with the period in whole
    /// seconds.
    ///
    /// Issuer and account name will be URL-encoded; the secret is base32'd
    /// without padding, as per RFC.
    pub fn get_url(&self) -> String {
        otpauth::build(
            otpauth::TOTP_TYPE,
            self.issuer.as_deref(),
            &self.account_name,
            &self.get_secret_base32(),
            self.algorithm,
            self.digits,
            ("period", self.period.as_secs()),
        )
    }

    /// Generate a TOTP from the standard otpauth URL.
    ///
    /// `secret` is mandatory; `digits`, `algorithm` and `period` default to
    /// 6, SHA1 and 30 seconds.
    pub fn from_url<S: AsRef<str>>(url: S) -> Result<TOTP<Vec<u8>>, OtpUrlError> {
        let parsed = otpauth::parse(url.as_ref(), otpauth::TOTP_TYPE)?;
        TOTP::new(
            parsed.algorithm,
            parsed.digits,
            parsed.period,
            parsed.secret,
            parsed.issuer,
            parsed.account_name,
        )
    }
}
