//! # veritrust-registry
//!
//! A client for the [Veritrust](https://a2a.veritrust.vc) A2A agent registry
//! REST API.
//!
//! This crate lets you:
//!
//! - **Run registry operations** (`list`, `get`, `search`, `register`,
//!   `reverify`) against any registry instance with explicit [`Credentials`].
//! - **Build requests without sending them** via [`RegistryRequest::build`],
//!   mapping each [`Operation`] to its method, URL, headers and JSON body.
//! - **Process input items in order** with [`execute_items`], producing one
//!   [`OutputRecord`] per item and aborting on the first failure.
//!
//! # Quick start
//!
//! ```ignore
//! use veritrust_registry::{Credentials, RegistryClient, SearchFilters};
//!
//! let client = RegistryClient::new(
//!     Credentials::new("https://a2a.veritrust.vc").api_key("my-key"),
//! );
//!
//! let verified = client.list(true).await?;
//! let agent = client.get("0b6c6f7e-2a7f-4a4e-9a55-1c0a5d1f6f00").await?;
//! let hits = client
//!     .search(SearchFilters {
//!         query: "weather".into(),
//!         skills: veritrust_registry::csv_filter("forecast, alerts"),
//!         ..Default::default()
//!     })
//!     .await?;
//! ```

pub mod catalog;
pub mod client;
pub mod credentials;
pub mod error;
pub mod executor;
pub mod operation;
pub mod request;

pub use catalog::{
    OperationDescriptor, ParameterDefault, ParameterDescriptor, ParameterKind, operations,
};
pub use client::RegistryClient;
pub use credentials::{Credentials, DEFAULT_AUTH_HEADER, DEFAULT_BASE_URL};
pub use error::{Error, Result};
pub use executor::{InputItem, OutputRecord, execute_items};
pub use operation::{
    ItemParameters, Operation, OperationKind, SearchFilters, csv_filter, split_csv,
};
pub use request::RegistryRequest;
