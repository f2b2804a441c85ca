//! The `otpauth://` provisioning URL, shared by both generators.
//!
//! Wire format:
//!
//! ```text
//! otpauth://{hotp|totp}/[{issuer}:]{account}?secret={base32}&algorithm={name}&digits={6..8}&{counter={n}|period={seconds}}
//! ```
//!
//! The query string is the loosely-typed boundary: parsing converts it into
//! typed fields right here, and nothing past this module ever sees the raw
//! map.

use std::time::Duration;

use base32::Alphabet;
use url::{Host, Url};

use crate::url_error::OtpUrlError;
use crate::Algorithm;

/// URL host naming the counter-based type.
pub(crate) const HOTP_TYPE: &str = "hotp";
/// URL host naming the time-based type.
pub(crate) const TOTP_TYPE: &str = "totp";

/// Typed form of a parsed URL. Absent optional fields already hold their
/// defaults; `counter` stays optional because only hotp URLs require it.
#[derive(Debug)]
pub(crate) struct Parsed {
    pub secret: Vec<u8>,
    pub algorithm: Algorithm,
    pub digits: usize,
    pub counter: Option<u64>,
    pub period: Duration,
    pub issuer: Option<String>,
    pub account_name: String,
}

/// Parse `url`, requiring `otp_type` as its host.
pub(crate) fn parse(url: &str, otp_type: &str) -> Result<Parsed, OtpUrlError> {
    let url = Url::parse(url).map_err(OtpUrlError::Url)?;
    if url.scheme() != "otpauth" {
        return Err(OtpUrlError::Scheme(url.scheme().to_string()));
    }
    match url.host() {
        Some(Host::Domain(host)) if host == otp_type => (),
        Some(host) => return Err(OtpUrlError::Host(host.to_string())),
        None => return Err(OtpUrlError::Host(String::new())),
    }

    let mut algorithm = Algorithm::SHA1;
    let mut digits = 6;
    let mut period = Duration::from_secs(30);
    let mut counter = None;
    let mut secret = None;
    let mut issuer: Option<String> = None;
    let mut account_name: String;

    let path = url.path().trim_start_matches('/');
    if let Some((issuer_part, account_part)) = path.split_once(':') {
        issuer = Some(
            urlencoding::decode(issuer_part)
                .map_err(|_| OtpUrlError::IssuerDecoding(issuer_part.to_owned()))?
                .to_string(),
        );
        account_name = account_part.trim_start_matches(':').to_owned();
    } else {
        account_name = path.to_owned();
    }

    account_name = urlencoding::decode(account_name.as_str())
        .map_err(|_| OtpUrlError::AccountNameDecoding(account_name.to_string()))?
        .to_string();

    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "algorithm" => {
                algorithm = match value.as_ref() {
                    "SHA1" => Algorithm::SHA1,
                    "SHA256" => Algorithm::SHA256,
                    "SHA512" => Algorithm::SHA512,
                    _ => return Err(OtpUrlError::Algorithm(value.to_string())),
                }
            }
            "digits" => {
                digits = value
                    .parse::<usize>()
                    .map_err(|_| OtpUrlError::Digits(value.to_string()))?;
            }
            "period" => {
                let seconds = value
                    .parse::<u64>()
                    .map_err(|_| OtpUrlError::Period(value.to_string()))?;
                period = Duration::from_secs(seconds);
            }
            "counter" => {
                counter = Some(
                    value
                        .parse::<u64>()
                        .map_err(|_| OtpUrlError::Counter(value.to_string()))?,
                );
            }
            "secret" => {
                secret = Some(
                    base32::decode(Alphabet::Rfc4648 { padding: false }, value.as_ref())
                        .ok_or_else(|| OtpUrlError::Secret(value.to_string()))?,
                );
            }
            "issuer" => {
                let query_issuer = value.to_string();
                if let Some(label_issuer) = &issuer {
                    if label_issuer != &query_issuer {
                        return Err(OtpUrlError::IssuerMismatch(
                            label_issuer.clone(),
                            query_issuer,
                        ));
                    }
                }
                issuer = Some(query_issuer);
            }
            _ => {}
        }
    }

    let secret = secret.ok_or(OtpUrlError::MissingSecret)?;

    Ok(Parsed {
        secret,
        algorithm,
        digits,
        counter,
        period,
        issuer,
        account_name,
    })
}

/// `[{issuer}:]{account}` with both segments percent-escaped. The colon and
/// account segment drop out when the account is empty.
fn label(issuer: Option<&str>, account_name: &str) -> String {
    match issuer {
        Some(issuer) if account_name.is_empty() => urlencoding::encode(issuer).to_string(),
        Some(issuer) => format!(
            "{}:{}",
            urlencoding::encode(issuer),
            urlencoding::encode(account_name)
        ),
        None => urlencoding::encode(account_name).to_string(),
    }
}

/// Assemble the wire form. `moving_factor` is the type-specific tail pair,
/// `("counter", n)` for hotp and `("period", seconds)` for totp.
pub(crate) fn build(
    otp_type: &str,
    issuer: Option<&str>,
    account_name: &str,
    secret_base32: &str,
    algorithm: Algorithm,
    digits: usize,
    moving_factor: (&str, u64),
) -> String {
    let (factor_key, factor_value) = moving_factor;
    format!(
        "otpauth://{}/{}?secret={}&algorithm={}&digits={}&{}={}",
        otp_type,
        label(issuer, account_name),
        secret_base32,
        algorithm,
        digits,
        factor_key,
        factor_value,
    )
}
