use chrono::{NaiveDate, NaiveDateTime};

/// Placeholder timestamp for a listing whose start or end time is missing.
pub fn epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2000, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// One listing page, fully extracted at fetch time.
///
/// Fields missing from the markup hold their zero value (`""`, `0`,
/// `false`, [`epoch`]); see [`ListingSnapshot::default`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingSnapshot {
    pub auction_id: String,
    pub title: String,
    pub seller_name: String,
    pub stock: i64,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub refundable: bool,
    pub start_price: String,
    pub time_left: String,
    pub bid_count: i64,
    pub access_count: i64,
    pub watch_count: i64,
}

impl Default for ListingSnapshot {
    fn default() -> Self {
        Self {
            auction_id: String::new(),
            title: String::new(),
            seller_name: String::new(),
            stock: 0,
            start_time: epoch(),
            end_time: epoch(),
            refundable: false,
            start_price: String::new(),
            time_left: String::new(),
            bid_count: 0,
            access_count: 0,
            watch_count: 0,
        }
    }
}
