use chrono::NaiveDateTime;

use super::ListingSnapshot;

/// Second-precision ISO-8601 without a zone suffix, e.g. `2021-01-01T00:00:00`.
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A listing as stored in the daily table, stamped with its capture time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub auction_id: String,
    pub title: String,
    pub datetime: String,
    pub access: i64,
    pub watch: i64,
    pub bid: i64,
}

impl TableRow {
    pub fn from_listing(listing: &ListingSnapshot, captured_at: NaiveDateTime) -> Self {
        Self {
            auction_id: listing.auction_id.clone(),
            title: listing.title.clone(),
            datetime: captured_at.format(DATETIME_FORMAT).to_string(),
            access: listing.access_count,
            watch: listing.watch_count,
            bid: listing.bid_count,
        }
    }
}
