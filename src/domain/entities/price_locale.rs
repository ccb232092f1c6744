use std::collections::HashMap;

use once_cell::sync::Lazy;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::errors::PriceFormatError;

#[derive(Debug)]
struct CurrencyInfo {
    code: &'static str,
    symbol: &'static str,
    minor_digits: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum SymbolPosition {
    /// "$1.00"
    Prefix,
    /// "1,00 €"
    Suffix,
}

#[derive(Debug)]
struct NumberConventions {
    grouping_separator: &'static str,
    decimal_separator: &'static str,
    symbol_position: SymbolPosition,
}

const NBSP: &str = "\u{a0}";
const NARROW_NBSP: &str = "\u{202f}";

static CURRENCIES: Lazy<HashMap<&'static str, CurrencyInfo>> = Lazy::new(|| {
    [
        ("USD", "$", 2),
        ("EUR", "€", 2),
        ("GBP", "£", 2),
        ("JPY", "¥", 0),
        ("CNY", "¥", 2),
        ("CHF", "CHF", 2),
        ("SEK", "kr", 2),
        ("NOK", "kr", 2),
        ("DKK", "kr.", 2),
        ("PLN", "zł", 2),
        ("RUB", "₽", 2),
        ("UAH", "₴", 2),
        ("CAD", "CA$", 2),
        ("AUD", "A$", 2),
    ]
    .into_iter()
    .map(|(code, symbol, minor_digits)| {
        (
            code,
            CurrencyInfo {
                code,
                symbol,
                minor_digits,
            },
        )
    })
    .collect()
});

static REGION_CURRENCIES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("US", "USD"),
        ("GB", "GBP"),
        ("JP", "JPY"),
        ("CN", "CNY"),
        ("CH", "CHF"),
        ("SE", "SEK"),
        ("NO", "NOK"),
        ("DK", "DKK"),
        ("PL", "PLN"),
        ("RU", "RUB"),
        ("UA", "UAH"),
        ("CA", "CAD"),
        ("AU", "AUD"),
        ("AT", "EUR"),
        ("BE", "EUR"),
        ("DE", "EUR"),
        ("EE", "EUR"),
        ("ES", "EUR"),
        ("FI", "EUR"),
        ("FR", "EUR"),
        ("IE", "EUR"),
        ("IT", "EUR"),
        ("LT", "EUR"),
        ("LV", "EUR"),
        ("NL", "EUR"),
        ("PT", "EUR"),
    ])
});

static LANGUAGE_CONVENTIONS: Lazy<HashMap<&'static str, NumberConventions>> = Lazy::new(|| {
    let prefix_point = || NumberConventions {
        grouping_separator: ",",
        decimal_separator: ".",
        symbol_position: SymbolPosition::Prefix,
    };
    let suffix_comma = |grouping_separator| NumberConventions {
        grouping_separator,
        decimal_separator: ",",
        symbol_position: SymbolPosition::Suffix,
    };
    HashMap::from([
        ("en", prefix_point()),
        ("ja", prefix_point()),
        ("zh", prefix_point()),
        ("de", suffix_comma(".")),
        ("it", suffix_comma(".")),
        ("da", suffix_comma(".")),
        ("fr", suffix_comma(NARROW_NBSP)),
        ("et", suffix_comma(NBSP)),
        ("fi", suffix_comma(NBSP)),
        ("sv", suffix_comma(NBSP)),
        ("nb", suffix_comma(NBSP)),
        ("pl", suffix_comma(NBSP)),
        ("ru", suffix_comma(NBSP)),
        ("uk", suffix_comma(NBSP)),
        ("lt", suffix_comma(NBSP)),
        ("lv", suffix_comma(NBSP)),
    ])
});

/// Locale a vendor price is expressed in, e.g. `en_US@currency=USD`.
///
/// Parsing resolves everything needed to format an amount, so a parsed locale
/// only fails to format negative amounts or amounts with no room left for the
/// currency's minor digits.
#[derive(Debug)]
pub struct PriceLocale {
    identifier: String,
    conventions: &'static NumberConventions,
    currency: &'static CurrencyInfo,
}

impl PriceLocale {
    /// Parses an ICU-style locale identifier: `lang[_Script][_REGION][@currency=XXX]`.
    ///
    /// When no currency keyword is present, the currency is derived from the
    /// region.
    pub fn parse(identifier: &str) -> Result<Self, PriceFormatError> {
        let malformed = || PriceFormatError::MalformedLocale(identifier.to_owned());

        let (base, keywords) = match identifier.split_once('@') {
            Some((base, keywords)) => (base, Some(keywords)),
            None => (identifier, None),
        };

        let mut subtags = base.split(|c| c == '_' || c == '-');
        let language = subtags
            .next()
            .filter(|l| (2..=3).contains(&l.len()) && l.chars().all(|c| c.is_ascii_lowercase()))
            .ok_or_else(malformed)?;
        let mut region = None;
        for subtag in subtags {
            match subtag.len() {
                // Script subtag, irrelevant to number formatting.
                4 if region.is_none() && subtag.chars().all(|c| c.is_ascii_alphabetic()) => {}
                2 if region.is_none() && subtag.chars().all(|c| c.is_ascii_uppercase()) => {
                    region = Some(subtag)
                }
                _ => return Err(malformed()),
            }
        }

        let mut explicit_currency = None;
        for keyword in keywords.into_iter().flat_map(|k| k.split(';')) {
            let (key, value) = keyword.split_once('=').ok_or_else(malformed)?;
            if key.eq_ignore_ascii_case("currency") {
                explicit_currency = Some(value.to_ascii_uppercase());
            }
        }

        let conventions = LANGUAGE_CONVENTIONS
            .get(language)
            .ok_or_else(|| PriceFormatError::UnsupportedLanguage(language.to_owned()))?;

        if let Some(region) = region {
            rust_iso3166::from_alpha2(region)
                .ok_or_else(|| PriceFormatError::UnknownRegion(region.to_owned()))?;
        }

        let currency = match explicit_currency {
            Some(code) => CURRENCIES
                .get(code.as_str())
                .ok_or(PriceFormatError::UnknownCurrency(code))?,
            None => region
                .and_then(|r| REGION_CURRENCIES.get(r))
                .and_then(|code| CURRENCIES.get(code))
                .ok_or_else(|| PriceFormatError::MissingCurrency(identifier.to_owned()))?,
        };

        Ok(Self {
            identifier: identifier.to_owned(),
            conventions,
            currency,
        })
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// ISO 4217 code of the resolved currency.
    pub fn currency_code(&self) -> &str {
        self.currency.code
    }

    /// Formats `amount` as a currency string, rounded half-even to the
    /// currency's minor units.
    pub fn format(&self, amount: Decimal) -> Result<String, PriceFormatError> {
        if amount < Decimal::ZERO {
            return Err(PriceFormatError::NegativePrice(amount));
        }
        let mut rounded = amount.round_dp_with_strategy(
            self.currency.minor_digits,
            RoundingStrategy::MidpointNearestEven,
        );
        rounded.rescale(self.currency.minor_digits);
        // Amounts too close to `Decimal::MAX` have no room for minor digits.
        if rounded.scale() != self.currency.minor_digits {
            return Err(PriceFormatError::UnrepresentablePrice(amount));
        }

        let digits = rounded.to_string();
        let (integer, fraction) = match digits.split_once('.') {
            Some((integer, fraction)) => (integer, fraction),
            None => (digits.as_str(), ""),
        };

        let mut number = group_digits(integer, self.conventions.grouping_separator);
        if !fraction.is_empty() {
            number.push_str(self.conventions.decimal_separator);
            number.push_str(fraction);
        }

        let symbol = self.currency.symbol;
        Ok(match self.conventions.symbol_position {
            SymbolPosition::Prefix => {
                if symbol.ends_with(|c: char| c.is_alphabetic()) {
                    format!("{symbol}{NBSP}{number}")
                } else {
                    format!("{symbol}{number}")
                }
            }
            SymbolPosition::Suffix => format!("{number}{NBSP}{symbol}"),
        })
    }
}

fn group_digits(integer: &str, separator: &str) -> String {
    let len = integer.len();
    let mut grouped = String::with_capacity(len + len / 3 * separator.len());
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push_str(separator);
        }
        grouped.push(digit);
    }
    grouped
}
