//! Pyth Hermes price responses and display formatting.

use serde::{Deserialize, Serialize};

use chainflow_tools::{fetch_json, HttpClient};

use crate::error::WorkflowError;

/// Significant digits kept when displaying a scaled price.
const DISPLAY_SIGNIFICANT_DIGITS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PythPrice {
    /// Integer mantissa, string-encoded.
    pub price: String,
    pub conf: String,
    pub expo: i32,
    pub publish_time: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PythPriceUpdate {
    pub id: String,
    pub price: PythPrice,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ema_price: Option<PythPrice>,
}

/// Latest-price response; only `parsed` is used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PythResponse {
    #[serde(default)]
    pub parsed: Vec<PythPriceUpdate>,
}

impl PythResponse {
    /// First parsed price, if any.
    pub fn first_price(&self) -> Option<&PythPrice> {
        self.parsed.first().map(|update| &update.price)
    }
}

pub async fn fetch_price(http: &dyn HttpClient, url: &str) -> Result<PythResponse, WorkflowError> {
    tracing::debug!(url, "Fetching Pyth price");
    Ok(fetch_json(http, url).await?)
}

/// Latest-price URL for one feed id on a Hermes base URL.
pub fn latest_price_url(base_url: &str, feed_id: &str) -> String {
    format!(
        "{}/v2/updates/price/latest?ids%5B%5D={}",
        base_url.trim_end_matches('/'),
        feed_id
    )
}

/// Render `price * 10^expo` with at most 8 significant digits and en-US
/// thousands grouping, e.g. `("1234567891", -5)` -> `"12,345.679"`.
pub fn format_scaled_price(price: &str, expo: i32) -> Result<String, WorkflowError> {
    let raw = price.trim();
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(WorkflowError::Data(format!("invalid price mantissa: {price}")));
    }

    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok("0".to_string());
    }

    let (mantissa, exponent) = round_significant(digits, expo as i64, DISPLAY_SIGNIFICANT_DIGITS);

    let (integer, fraction) = if exponent >= 0 {
        (format!("{}{}", mantissa, "0".repeat(exponent as usize)), String::new())
    } else {
        let shift = (-exponent) as usize;
        if shift >= mantissa.len() {
            (
                "0".to_string(),
                format!("{}{}", "0".repeat(shift - mantissa.len()), mantissa),
            )
        } else {
            let split = mantissa.len() - shift;
            (mantissa[..split].to_string(), mantissa[split..].to_string())
        }
    };

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&group_thousands(&integer));

    let fraction = fraction.trim_end_matches('0');
    if !fraction.is_empty() {
        out.push('.');
        out.push_str(fraction);
    }

    Ok(out)
}

/// Round a digit string half-up to `keep` significant digits.
fn round_significant(digits: &str, exponent: i64, keep: usize) -> (String, i64) {
    if digits.len() <= keep {
        return (digits.to_string(), exponent);
    }

    let dropped = (digits.len() - keep) as i64;
    let mut kept: Vec<u8> = digits.as_bytes()[..keep].to_vec();
    let mut exponent = exponent + dropped;

    if digits.as_bytes()[keep] >= b'5' {
        let mut i = kept.len();
        loop {
            if i == 0 {
                // 99999999 rounded up
                kept.insert(0, b'1');
                kept.pop();
                exponent += 1;
                break;
            }
            i -= 1;
            if kept[i] == b'9' {
                kept[i] = b'0';
            } else {
                kept[i] += 1;
                break;
            }
        }
    }

    (String::from_utf8_lossy(&kept).into_owned(), exponent)
}

fn group_thousands(integer: &str) -> String {
    let len = integer.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_small_price() {
        // SHIB-like: 1234 * 10^-8
        assert_eq!(format_scaled_price("1234", -8).unwrap(), "0.00001234");
        assert_eq!(format_scaled_price("123456789", -13).unwrap(), "0.000012345679");
    }

    #[test]
    fn test_format_large_price_grouping() {
        assert_eq!(format_scaled_price("6543210987654", -8).unwrap(), "65,432.11");
        assert_eq!(format_scaled_price("1234567891", -5).unwrap(), "12,345.679");
        assert_eq!(format_scaled_price("1000000", 0).unwrap(), "1,000,000");
    }

    #[test]
    fn test_format_rounding_carry() {
        assert_eq!(format_scaled_price("999999999", -8).unwrap(), "10");
        assert_eq!(format_scaled_price("150000000", -8).unwrap(), "1.5");
    }

    #[test]
    fn test_format_zero_and_negative() {
        assert_eq!(format_scaled_price("0", -8).unwrap(), "0");
        assert_eq!(format_scaled_price("-250", -2).unwrap(), "-2.5");
    }

    #[test]
    fn test_format_rejects_garbage() {
        assert!(format_scaled_price("12a", -2).is_err());
        assert!(format_scaled_price("", -2).is_err());
    }

    #[test]
    fn test_latest_price_url() {
        assert_eq!(
            latest_price_url("https://hermes.pyth.network/", "0xabc"),
            "https://hermes.pyth.network/v2/updates/price/latest?ids%5B%5D=0xabc"
        );
    }

    #[test]
    fn test_response_parsing() {
        let resp: PythResponse = serde_json::from_value(serde_json::json!({
            "binary": {"encoding": "hex", "data": ["00"]},
            "parsed": [{
                "id": "f0d5",
                "price": {"price": "1234", "conf": "5", "expo": -8, "publish_time": 1700000000},
                "ema_price": {"price": "1233", "conf": "5", "expo": -8, "publish_time": 1700000000},
                "metadata": {"slot": 1}
            }]
        }))
        .unwrap();
        assert_eq!(resp.first_price().unwrap().price, "1234");

        let empty: PythResponse = serde_json::from_value(serde_json::json!({"parsed": []})).unwrap();
        assert!(empty.first_price().is_none());
    }
}
