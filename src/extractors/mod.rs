pub mod field;
pub mod listing;

pub use field::{Document, Label, TextRead};
pub use listing::{ListingExtractor, build_snapshot, decode_date, decode_refundable};

use crate::error::Result;

/// Turns a fetched page body into a typed record.
pub trait Extractor: Send + Sync {
    type Output;

    fn extract(&self, body: &[u8]) -> Result<Self::Output>;
}
