use std::borrow::Cow;
use std::collections::HashMap;

lazy_static::lazy_static! {
    static ref CURRENCY_SYMBOLS: HashMap<&'static str, &'static str> = vec![
        ("USD", "$"),
        ("AUD", "A$"),
        ("BRL", "R$"),
        ("CAD", "CA$"),
        ("CNY", "CN¥"),
        ("EUR", "€"),
        ("HKD", "HK$"),
        ("HUF", "HUF "),
        ("INR", "₹"),
        ("ILS", "₪"),
        ("JPY", "¥"),
        ("MXN", "MX$"),
        ("TWD", "NT$"),
        ("NZD", "NZ$"),
        ("GBP", "£"),
        ("ZAR", "ZAR "),
        ("KRW", "₩ "),
    ]
    .into_iter()
    .collect();
}

/// Display prefix for an amount in the given ISO 4217 currency.
///
/// Lookup is exact. Codes without a known symbol are rendered as the code
/// followed by a space, e.g. `"XYZ "`.
pub fn currency_symbol(iso_code: &str) -> Cow<'static, str> {
    match CURRENCY_SYMBOLS.get(iso_code) {
        Some(symbol) => Cow::Borrowed(*symbol),
        None => Cow::Owned(format!("{} ", iso_code)),
    }
}
