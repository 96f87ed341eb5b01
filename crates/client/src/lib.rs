//! Client side of the shared-expense tracker: settings, the REST client of
//! the accounting service and the incremental feed loader that pages its
//! lists.

pub mod config;
pub mod convert;
pub mod error;
pub mod feed;
pub mod http;
pub mod sentinel;
pub mod sources;

pub use config::ClientConfig;
pub use error::ClientError;
pub use feed::{FeedError, FeedLoader, FeedStatus, LoadOutcome, PageSource};
pub use http::Client;
pub use sentinel::{Sentinel, Span};
pub use sources::{ActivitySource, GroupBillsSource};
