//! FX (Foreign Exchange) module - rate-to-base models, converter, services, and traits.

pub mod currency;
pub mod currency_converter;
mod fx_errors;
mod fx_model;
mod fx_service;
mod fx_traits;

pub use currency::{is_valid_currency_code, normalize_currency_code};
pub use currency_converter::CurrencyConverter;
pub use fx_errors::FxError;
pub use fx_model::{ExchangeRate, NewExchangeRate, RateSource};
pub use fx_service::FxService;
pub use fx_traits::{FxRepositoryTrait, FxServiceTrait};
