pub mod clients;
pub mod config;
pub mod error;
pub mod extractors;
pub mod models;
pub mod services;
pub mod storage;

pub use clients::{ClientPool, Cookies, FetchResponse, Fetcher};
pub use error::{Error, FormatError, Result};
pub use models::{ListingSnapshot, TableRow};
pub use services::ListingService;
pub use storage::{Table, TableFormat, TableStore};
