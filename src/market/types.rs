//! Wire types for the market-data API
//!
//! Field names on the wire are the provider's single-letter keys; the
//! structs carry descriptive names and rename on (de)serialization.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Real-time quote for a symbol
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Quote {
    #[serde(rename = "c")]
    pub current: f64,
    #[serde(rename = "d")]
    pub change: f64,
    #[serde(rename = "dp")]
    pub percent_change: f64,
    #[serde(rename = "h")]
    pub high: f64,
    #[serde(rename = "l")]
    pub low: f64,
    #[serde(rename = "o")]
    pub open: f64,
    #[serde(rename = "pc")]
    pub previous_close: f64,
    #[serde(rename = "t")]
    pub timestamp: i64,
}

/// OHLCV candle arrays for a symbol over a period
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Candles {
    #[serde(rename = "c")]
    pub close: Vec<f64>,
    #[serde(rename = "h")]
    pub high: Vec<f64>,
    #[serde(rename = "l")]
    pub low: Vec<f64>,
    #[serde(rename = "o")]
    pub open: Vec<f64>,
    #[serde(rename = "s")]
    pub status: String,
    #[serde(rename = "t")]
    pub timestamps: Vec<i64>,
    #[serde(rename = "v")]
    pub volumes: Vec<f64>,
}

impl Candles {
    /// The provider reports "ok" when data is present, "no_data" otherwise.
    pub fn has_data(&self) -> bool {
        self.status == "ok"
    }

    pub fn len(&self) -> usize {
        self.close.len()
    }

    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }
}

/// Company profile record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    pub country: String,
    pub currency: String,
    pub exchange: String,
    pub ipo: String,
    pub market_capitalization: f64,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    pub share_outstanding: f64,
    pub ticker: String,
    pub weburl: String,
    pub logo: String,
    #[serde(rename = "finnhubIndustry")]
    pub industry: String,
}

/// Exchange rates against a base currency
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForexRates {
    pub base: String,
    pub quote: HashMap<String, f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_wire_format() {
        let json = r#"{"c":178.72,"d":-1.05,"dp":-0.58,"h":180.42,"l":177.97,"o":179.99,"pc":179.77,"t":1703275201}"#;

        let quote: Quote = serde_json::from_str(json).unwrap();
        assert_eq!(quote.current, 178.72);
        assert_eq!(quote.previous_close, 179.77);
        assert_eq!(quote.timestamp, 1_703_275_201);
    }

    #[test]
    fn test_candles_no_data_status() {
        let json = r#"{"c":[],"h":[],"l":[],"o":[],"s":"no_data","t":[],"v":[]}"#;

        let candles: Candles = serde_json::from_str(json).unwrap();
        assert!(!candles.has_data());
        assert!(candles.is_empty());
    }

    #[test]
    fn test_forex_rates_quote_map() {
        let json = r#"{"base":"GBP","quote":{"USD":1.27,"EUR":1.17}}"#;

        let rates: ForexRates = serde_json::from_str(json).unwrap();
        assert_eq!(rates.base, "GBP");
        assert_eq!(rates.quote.get("USD"), Some(&1.27));
    }
}
