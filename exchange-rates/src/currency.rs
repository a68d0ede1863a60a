//! Currency codes and currency pairs.
//!
//! Currencies are declared once through `define_currencies!`, which
//! generates the `CurrencyCode` enum together with its lookup tables and
//! parsing. Add a line to the invocation at the bottom to support another
//! currency.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Declares the supported currencies.
///
/// # Syntax
/// ```ignore
/// define_currencies! {
///     Variant => "CODE",
/// }
/// ```
macro_rules! define_currencies {
    (
        $(
            $name:ident => $code:literal
        ),* $(,)?
    ) => {
        /// ISO 4217 currency codes known to the catalog.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "UPPERCASE")]
        pub enum CurrencyCode {
            $($name),*
        }

        impl CurrencyCode {
            pub fn code(&self) -> &'static str {
                match self {
                    $(CurrencyCode::$name => $code),*
                }
            }

        }

        impl std::str::FromStr for CurrencyCode {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_uppercase().as_str() {
                    $($code => Ok(CurrencyCode::$name),)*
                    _ => Err(format!("Unknown currency: {}", s)),
                }
            }
        }
    };
}

define_currencies! {
    USD => "USD",
    BRL => "BRL",
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A directed pair of currencies.
///
/// `stored` is the currency catalog prices are persisted in; `local` is the
/// currency callers express search bounds in. A rate for the pair is the
/// number of `local` units one `stored` unit buys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    pub stored: CurrencyCode,
    pub local: CurrencyCode,
}

impl CurrencyPair {
    /// US dollars stored, Brazilian reais supplied by callers.
    pub const USD_BRL: CurrencyPair = CurrencyPair {
        stored: CurrencyCode::USD,
        local: CurrencyCode::BRL,
    };

    /// Formats the pair as `STORED-LOCAL`, e.g. `USD-BRL`.
    pub fn dashed(&self) -> String {
        format!("{}-{}", self.stored, self.local)
    }
}

impl Default for CurrencyPair {
    fn default() -> Self {
        Self::USD_BRL
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.stored, self.local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_code_parse() {
        assert_eq!("USD".parse::<CurrencyCode>().unwrap(), CurrencyCode::USD);
        assert_eq!(" brl ".parse::<CurrencyCode>().unwrap(), CurrencyCode::BRL);
        assert!("XYZ".parse::<CurrencyCode>().is_err());
        assert!("EUR".parse::<CurrencyCode>().is_err());
    }

    #[test]
    fn test_currency_code_display() {
        assert_eq!(CurrencyCode::BRL.to_string(), "BRL");
        assert_eq!(CurrencyCode::USD.code(), "USD");
    }

    #[test]
    fn test_pair_formatting() {
        assert_eq!(CurrencyPair::USD_BRL.dashed(), "USD-BRL");
        assert_eq!(CurrencyPair::USD_BRL.to_string(), "USD/BRL");
    }
}
