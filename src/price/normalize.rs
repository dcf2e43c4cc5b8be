use crate::config::PriceConfig;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Width of one thousands group
const GROUP_WIDTH: usize = 3;

/// Converts storefront price text into canonical decimal prices
///
/// The same instance is used for every price the crate parses or displays,
/// so that a price written to a result file and read back is unchanged.
///
/// # Normalization Steps
///
/// 1. Fold Arabic-Indic digits and separators to their ASCII forms
/// 2. Remove currency words and symbols (case-insensitive, longest first)
/// 3. Reject negative amounts
/// 4. Drop everything except digits and separators
/// 5. Keep a single significant decimal point; other dots and commas are
///    thousands separators
/// 6. Without a decimal point, a last thousands group of `3 + cents_digits`
///    digits (e.g. `1,23400`) carries fused cents and gets a decimal point
/// 7. Round to `cents_digits` fractional digits
///
/// # Example
///
/// ```
/// use souq_scout::config::PriceConfig;
/// use souq_scout::price::PriceNormalizer;
/// use rust_decimal::Decimal;
///
/// let normalizer = PriceNormalizer::new(&PriceConfig::default());
/// assert_eq!(normalizer.normalize("1,234 EGP"), Some(Decimal::from(1234)));
/// assert_eq!(normalizer.normalize("abc"), None);
/// ```
#[derive(Debug, Clone)]
pub struct PriceNormalizer {
    /// Lower-cased currency tokens, longest first
    currency_tokens: Vec<String>,
    cents_digits: u32,
}

impl PriceNormalizer {
    /// Creates a normalizer from the price configuration
    pub fn new(config: &PriceConfig) -> Self {
        let mut currency_tokens: Vec<String> = config
            .currency_tokens
            .iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        currency_tokens.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));

        Self {
            currency_tokens,
            cents_digits: config.cents_digits,
        }
    }

    /// Number of fractional digits in canonical prices
    pub fn cents_digits(&self) -> u32 {
        self.cents_digits
    }

    /// Normalizes a textual price
    ///
    /// # Returns
    ///
    /// * `Some(Decimal)` - The canonical price
    /// * `None` - The text holds no valid non-negative amount
    pub fn normalize(&self, raw: &str) -> Option<Decimal> {
        let mut text = fold_digits(raw).to_lowercase();
        for token in &self.currency_tokens {
            if text.contains(token.as_str()) {
                text = text.replace(token.as_str(), " ");
            }
        }

        if is_negative(&text) {
            return None;
        }

        let kept: String = amount_span(&text)?
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
            .collect();

        let (integer, fraction) = self.split_amount(&kept)?;
        let literal = if fraction.is_empty() {
            integer
        } else {
            format!("{}.{}", integer, fraction)
        };

        let value = Decimal::from_str(&literal).ok()?;
        self.normalize_decimal(value)
    }

    /// Normalizes an already numeric price
    pub fn normalize_decimal(&self, value: Decimal) -> Option<Decimal> {
        if value.is_sign_negative() && !value.is_zero() {
            return None;
        }
        Some(value.round_dp(self.cents_digits))
    }

    /// Normalizes a floating point price
    pub fn normalize_f64(&self, value: f64) -> Option<Decimal> {
        if !value.is_finite() {
            return None;
        }
        Decimal::from_f64(value).and_then(|d| self.normalize_decimal(d))
    }

    /// Renders a price in canonical form (always `cents_digits` decimals)
    ///
    /// Normalizing the rendered text yields the same price again.
    pub fn format(&self, price: Decimal) -> String {
        format!("{:.*}", self.cents_digits as usize, price)
    }

    /// Splits separator-bearing digit text into integer and fraction digits
    fn split_amount(&self, kept: &str) -> Option<(String, String)> {
        let dots = kept.matches('.').count();

        if dots == 1 {
            if let Some((left, right)) = kept.split_once('.') {
                let fraction: String = right.chars().filter(|c| c.is_ascii_digit()).collect();
                if !fraction.is_empty() {
                    let integer = digits_only(left);
                    let integer = if integer.is_empty() {
                        "0".to_string()
                    } else {
                        integer
                    };
                    return Some((integer, fraction));
                }
                // "1,234." - trailing point with nothing after it
                return self.split_grouped(left);
            }
        }

        // No point, or several points acting as thousands separators
        self.split_grouped(&kept.replace('.', ","))
    }

    /// Handles digit text without a decimal point
    fn split_grouped(&self, grouped: &str) -> Option<(String, String)> {
        let digits = digits_only(grouped);
        if digits.is_empty() {
            return None;
        }

        let cents = self.cents_digits as usize;
        if cents > 0 {
            if let Some((_, last_group)) = grouped.rsplit_once(',') {
                if last_group.len() == GROUP_WIDTH + cents
                    && last_group.chars().all(|c| c.is_ascii_digit())
                {
                    let split = digits.len() - cents;
                    return Some((digits[..split].to_string(), digits[split..].to_string()));
                }
            }
        }

        Some((digits, String::new()))
    }
}

impl Default for PriceNormalizer {
    fn default() -> Self {
        Self::new(&PriceConfig::default())
    }
}

/// Folds Arabic-Indic digits and separators into ASCII
///
/// Both the Arabic-Indic (`٠`–`٩`) and Extended Arabic-Indic (`۰`–`۹`)
/// ranges are mapped; `٫` becomes `.` and `٬` becomes `,`.
pub fn fold_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{0660}'..='\u{0669}' => char::from(b'0' + (c as u32 - 0x0660) as u8),
            '\u{06F0}'..='\u{06F9}' => char::from(b'0' + (c as u32 - 0x06F0) as u8),
            '\u{066B}' => '.',
            '\u{066C}' => ',',
            _ => c,
        })
        .collect()
}

/// Slice from the first digit to the last one
///
/// Separators left behind by abbreviated currencies (`ج.م.`) sit outside
/// the span. A point directly before the first digit stays, so `.50` reads
/// as a fraction.
fn amount_span(text: &str) -> Option<&str> {
    let first = text.find(|c: char| c.is_ascii_digit())?;
    let last = text.rfind(|c: char| c.is_ascii_digit())?;
    let start = if text[..first].ends_with('.') {
        first - 1
    } else {
        first
    };
    Some(&text[start..=last])
}

fn digits_only(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// True when a minus sign directly precedes the first digit
fn is_negative(text: &str) -> bool {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    match compact.find(|c: char| c.is_ascii_digit()) {
        Some(idx) => compact[..idx].ends_with('-'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> PriceNormalizer {
        PriceNormalizer::default()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_thousands_separator_with_currency() {
        assert_eq!(normalizer().normalize("1,234 EGP"), Some(dec("1234")));
    }

    #[test]
    fn test_no_digits_is_unparsable() {
        assert_eq!(normalizer().normalize("abc"), None);
        assert_eq!(normalizer().normalize(""), None);
        assert_eq!(normalizer().normalize("EGP"), None);
    }

    #[test]
    fn test_decimal_point_is_kept() {
        assert_eq!(normalizer().normalize("1,234.50 EGP"), Some(dec("1234.50")));
        assert_eq!(normalizer().normalize("EGP 99.9"), Some(dec("99.9")));
    }

    #[test]
    fn test_listing_price_with_trailing_point() {
        // whole part "1,234." followed by fraction "00"
        assert_eq!(normalizer().normalize("1,234.00 EGP"), Some(dec("1234")));
        assert_eq!(normalizer().normalize("1,234."), Some(dec("1234")));
    }

    #[test]
    fn test_stray_points_around_amount() {
        assert_eq!(normalizer().normalize("1,234.50 ج.م."), Some(dec("1234.50")));
        assert_eq!(normalizer().normalize("EGP 1,234.50."), Some(dec("1234.50")));
        assert_eq!(normalizer().normalize("ج.م. 1,234.50"), Some(dec("1234.50")));
        assert_eq!(normalizer().normalize(".50"), Some(dec("0.50")));
    }

    #[test]
    fn test_fused_cents_group() {
        // decimal point lost between whole and fraction spans
        assert_eq!(normalizer().normalize("1,23400 EGP"), Some(dec("1234.00")));
        assert_eq!(normalizer().normalize("12,345,67850"), Some(dec("12345678.50")));
    }

    #[test]
    fn test_plain_digit_run_is_integer() {
        assert_eq!(normalizer().normalize("123400"), Some(dec("123400")));
        assert_eq!(normalizer().normalize("1234"), Some(dec("1234")));
    }

    #[test]
    fn test_arabic_currency_and_digits() {
        assert_eq!(normalizer().normalize("١٬٢٣٤ ج.م"), Some(dec("1234")));
        assert_eq!(normalizer().normalize("٩٩٫٥٠ جنيه"), Some(dec("99.50")));
    }

    #[test]
    fn test_currency_tokens_case_insensitive() {
        assert_eq!(normalizer().normalize("egp 450"), Some(dec("450")));
        assert_eq!(normalizer().normalize("US$ 12.99"), Some(dec("12.99")));
    }

    #[test]
    fn test_negative_is_unparsable() {
        assert_eq!(normalizer().normalize("-5 EGP"), None);
        assert_eq!(normalizer().normalize_decimal(dec("-1")), None);
        assert_eq!(normalizer().normalize_f64(-3.5), None);
    }

    #[test]
    fn test_multiple_dots_are_separators() {
        assert_eq!(normalizer().normalize("1.234.567"), Some(dec("1234567")));
    }

    #[test]
    fn test_rounds_to_cents() {
        assert_eq!(normalizer().normalize("10.499"), Some(dec("10.50")));
    }

    #[test]
    fn test_numeric_inputs() {
        assert_eq!(normalizer().normalize_f64(1234.0), Some(dec("1234")));
        assert_eq!(normalizer().normalize_f64(f64::NAN), None);
        assert_eq!(normalizer().normalize_decimal(dec("15.5")), Some(dec("15.5")));
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let n = normalizer();
        let inputs = [
            "1,234 EGP",
            "1,23400 EGP",
            "99.9",
            "EGP 0.50",
            "١٬٢٣٤ ج.م",
            "12,345,67850",
            "7",
            "10.499",
        ];

        for input in inputs {
            let once = n.normalize(input).unwrap();
            let rendered = n.format(once);
            assert_eq!(n.normalize(&rendered), Some(once), "input {:?}", input);
            assert_eq!(n.normalize_decimal(once), Some(once));
        }
    }

    #[test]
    fn test_format_uses_cents_digits() {
        assert_eq!(normalizer().format(dec("1234")), "1234.00");
        assert_eq!(normalizer().format(dec("9.5")), "9.50");
    }

    #[test]
    fn test_fold_digits() {
        assert_eq!(fold_digits("٤٦"), "46");
        assert_eq!(fold_digits("۱۵۰۰"), "1500");
        assert_eq!(fold_digits("abc"), "abc");
    }
}
