use url::ParseError;

use crate::RfcError;

/// Everything that can go wrong while decoding an `otpauth://` URL into a
/// generator, or while validating the values a generator is built from.
#[derive(Debug, Eq, PartialEq)]
pub enum OtpUrlError {
    Url(ParseError),
    Scheme(String),
    Host(String),
    MissingSecret,
    MissingCounter,
    Secret(String),
    EmptySecret,
    Algorithm(String),
    Digits(String),
    DigitsNumber(usize),
    Counter(String),
    Period(String),
    PeriodSeconds(u64),
    Issuer(String),
    IssuerDecoding(String),
    IssuerMismatch(String, String),
    AccountName(String),
    AccountNameDecoding(String),
}

impl std::error::Error for OtpUrlError {}

impl std::fmt::Display for OtpUrlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OtpUrlError::Url(e) => write!(
                f,
                "Error parsing URL: {}",
                e
            ),
            OtpUrlError::Scheme(scheme) => write!(
                f,
                "Scheme should be otpauth, not \"{}\"",
                scheme
            ),
            OtpUrlError::Host(host) => write!(
                f,
                "Host should be hotp or totp, not \"{}\"",
                host
            ),
            OtpUrlError::MissingSecret => write!(
                f,
                "The secret query parameter must be set"
            ),
            OtpUrlError::MissingCounter => write!(
                f,
                "An hotp URL must carry a counter query parameter"
            ),
            OtpUrlError::Secret(secret) => write!(
                f,
                "Secret \"{}\" is not a valid non-padded base32 string",
                secret,
            ),
            OtpUrlError::EmptySecret => write!(
                f,
                "Secret must not be empty"
            ),
            OtpUrlError::Algorithm(algorithm) => write!(
                f,
                "Algorithm can only be SHA1, SHA256 or SHA512, not \"{}\"",
                algorithm
            ),
            OtpUrlError::Digits(digits) => write!(
                f,
                "Could not parse \"{}\" as a number",
                digits,
            ),
            OtpUrlError::DigitsNumber(digits) => write!(
                f,
                "Password length must be between 6 and 8 digits, {} is not allowed",
                digits,
            ),
            OtpUrlError::Counter(counter) => write!(
                f,
                "Could not parse \"{}\" as a number",
                counter,
            ),
            OtpUrlError::Period(period) => write!(
                f,
                "Could not parse \"{}\" as a number",
                period,
            ),
            OtpUrlError::PeriodSeconds(seconds) => write!(
                f,
                "Period must be at least 1 second, {}s is not allowed",
                seconds,
            ),
            OtpUrlError::Issuer(issuer) => write!(
                f,
                "Issuer can't contain a colon. \"{}\" contains a colon",
                issuer
            ),
            OtpUrlError::IssuerDecoding(issuer) => write!(
                f,
                "Couldn't URL decode \"{}\"",
                issuer
            ),
            OtpUrlError::IssuerMismatch(label_issuer, query_issuer) => write!(
                f,
                "An issuer \"{}\" could be retrieved from the path, but a different issuer \"{}\" was found in the issuer URL parameter",
                label_issuer,
                query_issuer,
            ),
            OtpUrlError::AccountName(name) => write!(
                f,
                "Account name can't contain a colon. \"{}\" contains a colon",
                name
            ),
            OtpUrlError::AccountNameDecoding(name) => write!(
                f,
                "Couldn't URL decode \"{}\"",
                name
            ),
        }
    }
}

impl From<RfcError> for OtpUrlError {
    fn from(e: RfcError) -> Self {
        match e {
            RfcError::InvalidDigits(digits) => OtpUrlError::DigitsNumber(digits),
            RfcError::EmptySecret => OtpUrlError::EmptySecret,
            RfcError::InvalidPeriod(seconds) => OtpUrlError::PeriodSeconds(seconds),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{OtpUrlError, RfcError};

    #[test]
    fn scheme() {
        let error = OtpUrlError::Scheme("https".to_string());
        assert_eq!(
            error.to_string(),
            "Scheme should be otpauth, not \"https\"".to_string()
        )
    }

    #[test]
    fn host() {
        let error = OtpUrlError::Host("steam".to_string());
        assert_eq!(
            error.to_string(),
            "Host should be hotp or totp, not \"steam\"".to_string()
        )
    }

    #[test]
    fn missing_counter() {
        let error = OtpUrlError::MissingCounter;
        assert_eq!(
            error.to_string(),
            "An hotp URL must carry a counter query parameter".to_string()
        )
    }

    #[test]
    fn algorithm() {
        let error = OtpUrlError::Algorithm("MD5".to_string());
        assert_eq!(
            error.to_string(),
            "Algorithm can only be SHA1, SHA256 or SHA512, not \"MD5\"".to_string()
        )
    }

    #[test]
    fn digits_number() {
        let error = OtpUrlError::DigitsNumber(5);
        assert_eq!(
            error.to_string(),
            "Password length must be between 6 and 8 digits, 5 is not allowed".to_string()
        )
    }

    #[test]
    fn issuer_mismatch() {
        let error = OtpUrlError::IssuerMismatch("Example".to_string(), "Other".to_string());
        assert_eq!(error.to_string(), "An issuer \"Example\" could be retrieved from the path, but a different issuer \"Other\" was found in the issuer URL parameter".to_string())
    }

    #[test]
    fn from_rfc_error() {
        assert_eq!(
            OtpUrlError::from(RfcError::InvalidDigits(9)),
            OtpUrlError::DigitsNumber(9)
        );
        assert_eq!(
            OtpUrlError::from(RfcError::EmptySecret),
            OtpUrlError::EmptySecret
        );
        assert_eq!(
            OtpUrlError::from(RfcError::InvalidPeriod(0)),
            OtpUrlError::PeriodSeconds(0)
        );
    }

    #[test]
    fn url() {
        let error = OtpUrlError::Url(url::ParseError::EmptyHost);
        assert_eq!(
            error.to_string(),
            "Error parsing URL: empty host".to_string()
        )
    }
}
