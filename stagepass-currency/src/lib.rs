pub mod currency;
pub mod engine;
pub mod money;
pub mod preference;
pub mod rates;

pub use currency::{lookup, supported_currencies, Currency};
pub use engine::CurrencyConversionEngine;
pub use money::Money;
pub use preference::{CurrencyPreference, FilePreferenceStore, MemoryPreferenceStore, PreferenceStore};
pub use rates::ExchangeRateTable;
