//! Display currencies

/// Currency used until the user picks one
pub const DEFAULT_CURRENCY: &str = "usd";

/// Currency codes the wallet can display balances in
pub const SUPPORTED_CURRENCIES: &[&str] = &[
    "usd", "eur", "gbp", "jpy", "cny", "rub", "krw", "inr", "try", "uah", "btc", "eth",
];

/// Check whether a (lowercase) code is supported
pub fn is_supported_currency(code: &str) -> bool {
    SUPPORTED_CURRENCIES.contains(&code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_supported() {
        assert!(is_supported_currency(DEFAULT_CURRENCY));
        assert!(!is_supported_currency("USD"));
        assert!(!is_supported_currency("doge"));
    }
}
