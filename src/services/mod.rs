pub mod fetch;
pub mod market_data;
pub mod memory;
pub mod universe;
pub mod yahoo;

pub use fetch::FetchPolicy;
pub use market_data::{Interval, MetadataProvider, NoMetadata, PriceProvider, SymbolUniverse};
pub use memory::{InMemoryPriceProvider, StaticMetadataProvider};
pub use universe::{dedupe_symbols, StaticUniverse};
pub use yahoo::YahooFinanceClient;
