//! Currency codes and six-letter pair codes

use crate::error::{FxError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// ISO 4217 style currency code: exactly three uppercase ASCII letters
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode([u8; 3]);

impl CurrencyCode {
    pub const USD: CurrencyCode = CurrencyCode(*b"USD");
    pub const EUR: CurrencyCode = CurrencyCode(*b"EUR");
    pub const GBP: CurrencyCode = CurrencyCode(*b"GBP");
    pub const JPY: CurrencyCode = CurrencyCode(*b"JPY");
    pub const CHF: CurrencyCode = CurrencyCode(*b"CHF");

    /// Parse a currency code, rejecting anything but three uppercase letters
    pub fn parse(s: &str) -> Result<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(u8::is_ascii_uppercase) {
            return Err(FxError::MalformedCode(format!(
                "{:?} is not a three letter uppercase currency code",
                s
            )));
        }
        Ok(Self([bytes[0], bytes[1], bytes[2]]))
    }

    /// Get currency code as string
    pub fn as_str(&self) -> &str {
        // Always ASCII: only `parse` and the constants construct this type.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CurrencyCode {
    type Err = FxError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = FxError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.as_str().to_string()
    }
}

/// Ordered currency pair. `EURUSD` reads "units of USD per 1 EUR".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CurrencyPair {
    pub base: CurrencyCode,
    pub quote: CurrencyCode,
}

impl CurrencyPair {
    pub fn new(base: CurrencyCode, quote: CurrencyCode) -> Self {
        Self { base, quote }
    }

    /// Get inverse pair
    pub fn inverse(&self) -> Self {
        Self {
            base: self.quote,
            quote: self.base,
        }
    }

    /// Six-letter storage code, e.g. `EURUSD`
    pub fn code(&self) -> String {
        encode(self.base, self.quote)
    }

    pub fn is_identity(&self) -> bool {
        self.base == self.quote
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.base, self.quote)
    }
}

impl FromStr for CurrencyPair {
    type Err = FxError;

    fn from_str(s: &str) -> Result<Self> {
        decode(s)
    }
}

/// Split a six-letter pair code into its two currencies
pub fn decode(code: &str) -> Result<CurrencyPair> {
    if code.len() != 6 || !code.is_ascii() {
        return Err(FxError::MalformedCode(format!(
            "{:?} is not a six letter currency pair code",
            code
        )));
    }
    let base = CurrencyCode::parse(&code[..3])?;
    let quote = CurrencyCode::parse(&code[3..])?;
    Ok(CurrencyPair::new(base, quote))
}

/// Join two currencies into a pair code
pub fn encode(base: CurrencyCode, quote: CurrencyCode) -> String {
    format!("{}{}", base, quote)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_code_parse() {
        assert_eq!(CurrencyCode::parse("USD").unwrap(), CurrencyCode::USD);
        assert_eq!("GBP".parse::<CurrencyCode>().unwrap().as_str(), "GBP");
        assert!(CurrencyCode::parse("usd").is_err());
        assert!(CurrencyCode::parse("US").is_err());
        assert!(CurrencyCode::parse("US1").is_err());
    }

    #[test]
    fn test_decode() {
        let pair = decode("EURGBP").unwrap();
        assert_eq!(pair.base, CurrencyCode::EUR);
        assert_eq!(pair.quote, CurrencyCode::GBP);
        assert!(!pair.is_identity());
    }

    #[test]
    fn test_decode_malformed() {
        for code in ["", "EURUS", "EURUSDX", "eurusd", "EUR/USD", "EUR1SD", "EURÜS"] {
            let err = decode(code).unwrap_err();
            assert!(matches!(err, FxError::MalformedCode(_)), "{}", code);
        }
    }

    #[test]
    fn test_encode_and_display() {
        assert_eq!(encode(CurrencyCode::JPY, CurrencyCode::USD), "JPYUSD");

        let pair = CurrencyPair::new(CurrencyCode::EUR, CurrencyCode::USD);
        assert_eq!(pair.to_string(), "EURUSD");
        assert_eq!(pair.code(), "EURUSD");
        assert_eq!(pair.inverse().code(), "USDEUR");
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&CurrencyCode::CHF).unwrap();
        assert_eq!(json, "\"CHF\"");

        let code: CurrencyCode = serde_json::from_str("\"EUR\"").unwrap();
        assert_eq!(code, CurrencyCode::EUR);
        assert!(serde_json::from_str::<CurrencyCode>("\"E1R\"").is_err());
    }
}
