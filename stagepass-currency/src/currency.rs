/// A currency supported for display and checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Currency {
    /// ISO-4217-like code
    pub code: &'static str,
    pub symbol: &'static str,
    pub flag: &'static str,
    /// Number of minor-unit digits (2 for paise/cents, 0 for yen)
    pub decimals: u32,
    /// BCP-47 locale tag driving digit grouping
    pub locale: &'static str,
}

/// The fixed set of currencies the client can price and render in.
/// Any code outside this set falls back to the item's base currency.
const SUPPORTED: &[Currency] = &[
    Currency { code: "INR", symbol: "₹", flag: "🇮🇳", decimals: 2, locale: "en-IN" },
    Currency { code: "USD", symbol: "$", flag: "🇺🇸", decimals: 2, locale: "en-US" },
    Currency { code: "EUR", symbol: "€", flag: "🇪🇺", decimals: 2, locale: "de-DE" },
    Currency { code: "GBP", symbol: "£", flag: "🇬🇧", decimals: 2, locale: "en-GB" },
    Currency { code: "AED", symbol: "د.إ", flag: "🇦🇪", decimals: 2, locale: "ar-AE" },
    Currency { code: "SGD", symbol: "S$", flag: "🇸🇬", decimals: 2, locale: "en-SG" },
    Currency { code: "AUD", symbol: "A$", flag: "🇦🇺", decimals: 2, locale: "en-AU" },
    Currency { code: "JPY", symbol: "¥", flag: "🇯🇵", decimals: 0, locale: "ja-JP" },
];

/// Look up a supported currency by code
pub fn lookup(code: &str) -> Option<&'static Currency> {
    SUPPORTED.iter().find(|c| c.code == code)
}

pub fn is_supported(code: &str) -> bool {
    lookup(code).is_some()
}

/// All supported currencies, in display order
pub fn supported_currencies() -> &'static [Currency] {
    SUPPORTED
}

/// Map a locale region (e.g. "IN" from "en_IN.UTF-8") to a default currency code
pub fn currency_for_region(region: &str) -> Option<&'static str> {
    let code = match region {
        "IN" => "INR",
        "US" => "USD",
        "GB" => "GBP",
        "AE" => "AED",
        "SG" => "SGD",
        "AU" => "AUD",
        "JP" => "JPY",
        "DE" | "FR" | "ES" | "IT" | "NL" | "IE" | "AT" | "PT" | "FI" | "BE" => "EUR",
        _ => return None,
    };
    Some(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_supported() {
        let inr = lookup("INR").unwrap();
        assert_eq!(inr.symbol, "₹");
        assert_eq!(inr.decimals, 2);
        assert!(lookup("XYZ").is_none());
    }

    #[test]
    fn test_region_mapping() {
        assert_eq!(currency_for_region("IN"), Some("INR"));
        assert_eq!(currency_for_region("DE"), Some("EUR"));
        assert_eq!(currency_for_region("ZZ"), None);
    }
}
