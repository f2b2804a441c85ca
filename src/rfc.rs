//! Construction-time validation shared by both generators, plus
//! [rfc-4226](https://tools.ietf.org/html/rfc4226) and
//! [rfc-6238](https://tools.ietf.org/html/rfc6238) compliant option sets
//! carrying the recommended defaults.

use std::time::Duration;

use crate::{Algorithm, OtpUrlError, HOTP, TOTP};

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

/// Configuration that violates rfc-4226 or rfc-6238.
#[derive(Debug, Eq, PartialEq)]
pub enum RfcError {
    /// Implementations MUST extract a 6-digit code at a minimum and possibly
    /// 7 and 8-digit codes.
    InvalidDigits(usize),
    /// The shared secret must carry at least one byte.
    EmptySecret,
    /// A time step must span at least one second.
    InvalidPeriod(u64),
}

impl std::error::Error for RfcError {}

impl std::fmt::Display for RfcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RfcError::InvalidDigits(digits) => write!(
                f,
                "Password length must be between 6 and 8 digits, got {}",
                digits
            ),
            RfcError::EmptySecret => write!(f, "Secret must not be empty"),
            RfcError::InvalidPeriod(seconds) => {
                write!(f, "Period must be at least 1 second, got {}s", seconds)
            }
        }
    }
}

pub(crate) fn assert_digits(digits: &usize) -> Result<(), RfcError> {
    if !(&6..=&8).contains(&digits) {
        Err(RfcError::InvalidDigits(*digits))
    } else {
        Ok(())
    }
}

pub(crate) fn assert_secret(secret: &[u8]) -> Result<(), RfcError> {
    if secret.is_empty() {
        Err(RfcError::EmptySecret)
    } else {
        Ok(())
    }
}

pub(crate) fn assert_period(period: &Duration) -> Result<(), RfcError> {
    if period.as_secs() < 1 {
        Err(RfcError::InvalidPeriod(period.as_secs()))
    } else {
        Ok(())
    }
}

/// [rfc-4226](https://tools.ietf.org/html/rfc4226) compliant set of options
/// to create an [HOTP](struct.HOTP.html) generator.
///
/// # Example
/// ```
/// use otp_rs::{Rfc4226, HOTP};
///
/// let mut options = Rfc4226::with_defaults("hotp-secret-123").unwrap();
///
/// // optional, change digits, algorithm, issuer, account_name
/// options.digits(8).unwrap();
/// options.issuer("Example".to_string());
/// options.account_name("alice".to_string());
///
/// let hotp = HOTP::try_from(options).unwrap();
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub struct Rfc4226<T = Vec<u8>> {
    algorithm: Algorithm,
    digits: usize,
    secret: T,
    issuer: Option<String>,
    account_name: String,
}

impl<T: AsRef<[u8]>> Rfc4226<T> {
    /// Validated option set for a counter-based generator.
    ///
    /// # Errors
    ///
    /// Will return a [RfcError](enum.RfcError.html) when
    /// - `digits` is lower than 6 or higher than 8
    /// - `secret` is empty
    pub fn new(
        digits: usize,
        secret: T,
        issuer: Option<String>,
        account_name: String,
    ) -> Result<Rfc4226<T>, RfcError> {
        assert_digits(&digits)?;
        assert_secret(secret.as_ref())?;
        Ok(Rfc4226 {
            algorithm: Algorithm::SHA1,
            digits,
            secret,
            issuer,
            account_name,
        })
    }

    /// Option set with the defaults: SHA1, 6 digits, no issuer, empty
    /// account name.
    pub fn with_defaults(secret: T) -> Result<Rfc4226<T>, RfcError> {
        Rfc4226::new(6, secret, None, "".to_string())
    }

    /// Set the `algorithm`
    pub fn algorithm(&mut self, value: Algorithm) {
        self.algorithm = value;
    }

    /// Set the `digits`
    pub fn digits(&mut self, value: usize) -> Result<(), RfcError> {
        assert_digits(&value)?;
        self.digits = value;
        Ok(())
    }

    /// Set the `issuer`
    pub fn issuer(&mut self, value: String) {
        self.issuer = Some(value);
    }

    /// Set the `account_name`
    pub fn account_name(&mut self, value: String) {
        self.account_name = value;
    }
}

impl<T: AsRef<[u8]>> TryFrom<Rfc4226<T>> for HOTP<T> {
    type Error = OtpUrlError;

    fn try_from(options: Rfc4226<T>) -> Result<Self, Self::Error> {
        HOTP::new(
            options.algorithm,
            options.digits,
            options.secret,
            options.issuer,
            options.account_name,
        )
    }
}

/// [rfc-6238](https://tools.ietf.org/html/rfc6238) compliant set of options
/// to create a [TOTP](struct.TOTP.html) generator.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use otp_rs::{Rfc6238, TOTP};
///
/// let mut options = Rfc6238::with_defaults("totp-secret-123").unwrap();
///
/// // optional, change digits, period, issuer, account_name
/// options.digits(8).unwrap();
/// options.period(Duration::from_secs(60)).unwrap();
///
/// let totp = TOTP::try_from(options).unwrap();
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub struct Rfc6238<T = Vec<u8>> {
    algorithm: Algorithm,
    digits: usize,
    /// The recommended value per [rfc-6238](https://tools.ietf.org/html/rfc6238#section-5.2)
    /// is 30 seconds.
    period: Duration,
    secret: T,
    issuer: Option<String>,
    account_name: String,
}

impl<T: AsRef<[u8]>> Rfc6238<T> {
    /// Validated option set for a time-based generator.
    ///
    /// # Errors
    ///
    /// Will return a [RfcError](enum.RfcError.html) when
    /// - `digits` is lower than 6 or higher than 8
    /// - `secret` is empty
    pub fn new(
        digits: usize,
        secret: T,
        issuer: Option<String>,
        account_name: String,
    ) -> Result<Rfc6238<T>, RfcError> {
        assert_digits(&digits)?;
        assert_secret(secret.as_ref())?;
        Ok(Rfc6238 {
            algorithm: Algorithm::SHA1,
            digits,
            period: Duration::from_secs(30),
            secret,
            issuer,
            account_name,
        })
    }

    /// Option set with the defaults: SHA1, 6 digits, 30 second period, no
    /// issuer, empty account name.
    pub fn with_defaults(secret: T) -> Result<Rfc6238<T>, RfcError> {
        Rfc6238::new(6, secret, None, "".to_string())
    }

    /// Set the `algorithm`
    pub fn algorithm(&mut self, value: Algorithm) {
        self.algorithm = value;
    }

    /// Set the `digits`
    pub fn digits(&mut self, value: usize) -> Result<(), RfcError> {
        assert_digits(&value)?;
        self.digits = value;
        Ok(())
    }

    /// Set the `period`
    pub fn period(&mut self, value: Duration) -> Result<(), RfcError> {
        assert_period(&value)?;
        self.period = value;
        Ok(())
    }

    /// Set the `issuer`
    pub fn issuer(&mut self, value: String) {
        self.issuer = Some(value);
    }

    /// Set the `account_name`
    pub fn account_name(&mut self, value: String) {
        self.account_name = value;
    }
}

impl<T: AsRef<[u8]>> TryFrom<Rfc6238<T>> for TOTP<T> {
    type Error = OtpUrlError;

    fn try_from(options: Rfc6238<T>) -> Result<Self, Self::Error> {
        TOTP::new(
            options.algorithm,
            options.digits,
            options.period,
            options.secret,
            options.issuer,
            options.account_name,
        )
    }
}
