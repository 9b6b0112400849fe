//! Providers Module - External Data Sources
//!
//! One client per third-party API. Each maps its bespoke JSON into the
//! normalized types in `models::types`.

pub mod countries;
pub mod exchange;
pub mod http;
pub mod news;
pub mod random_user;

pub use countries::CountriesClient;
pub use exchange::ExchangeRateClient;
pub use news::NewsClient;
pub use random_user::RandomUserClient;
