use std::sync::LazyLock;
use chrono::{NaiveDate, NaiveDateTime};
use scraper::Selector;
use tracing::debug;

use crate::error::{Error, Result};
use crate::extractors::Extractor;
use crate::extractors::field::{self, Document, Label, TextRead, static_selector};
use crate::models::{ListingSnapshot, epoch};

const AUCTION_ID: &str = "オークションID";
const STOCK: &str = "個数";
const START_TIME: &str = "開始日時";
const END_TIME: &str = "終了日時";
const REFUND: &str = "返品";
const START_PRICE: &str = "開始価格";
const TIME_LEFT: &str = "残り時間";
const BID_COUNT: &str = "入札件数";

/// Refund policy text meaning the item cannot be returned.
pub const NOT_REFUNDABLE: &str = "返品不可";

/// Length of the localized suffix after the bid count digits.
const BID_SUFFIX_LEN: usize = 4;

static DETAIL_LABEL: LazyLock<Selector> = LazyLock::new(|| static_selector("dt"));
static DETAIL_VALUE: LazyLock<Selector> =
    LazyLock::new(|| static_selector("dd.ProductDetail__description"));
static COUNTER_VALUE: LazyLock<Selector> = LazyLock::new(|| static_selector("dd.Count__number"));
static TITLE: LazyLock<Selector> = LazyLock::new(|| static_selector("h1.ProductTitle__text"));
static SELLER: LazyLock<Selector> =
    LazyLock::new(|| static_selector(r#"a[data-ylk^="rsec:seller;slk:slfinfo;"]"#));
static ACCESS_TERM: LazyLock<Selector> =
    LazyLock::new(|| static_selector("span.StatisticsInfo__term--access"));
static WATCH_TERM: LazyLock<Selector> =
    LazyLock::new(|| static_selector("span.StatisticsInfo__term--watch"));
static STATISTICS_VALUE: LazyLock<Selector> =
    LazyLock::new(|| static_selector("span.StatisticsInfo__data"));

fn detail(doc: &Document, text: &str) -> Option<String> {
    let label = Label::Text { selector: &*DETAIL_LABEL, text };
    field::extract(doc, &label, &DETAIL_VALUE)
}

fn counter(doc: &Document, text: &str, trailing: usize) -> Option<String> {
    let label = Label::Text { selector: &*DETAIL_LABEL, text };
    field::extract_counter(doc, &label, &COUNTER_VALUE, trailing)
}

fn statistic(doc: &Document, term: &Selector) -> Option<String> {
    field::extract_with(doc, &Label::Node(term), &STATISTICS_VALUE, TextRead::Whole)
}

fn parse_count(field: &'static str, raw: Option<String>) -> Result<i64> {
    match raw {
        Some(text) => text.trim().parse().map_err(|_| Error::decode(field, text)),
        None => Ok(0),
    }
}

fn parse_date(field: &'static str, raw: Option<String>) -> Result<NaiveDateTime> {
    match raw {
        Some(text) => decode_date(&text).map_err(|_| Error::decode(field, text)),
        None => Ok(epoch()),
    }
}

/// Decode the marketplace's compact timestamp, e.g. `2021.10.12（火）19:54`.
///
/// Only character offsets are read: year `[0,4)`, month `[5,7)`, day
/// `[8,10)`, hour `[13,15)`, minute `[16,18)`. Everything in between is
/// ignored.
pub fn decode_date(s: &str) -> Result<NaiveDateTime> {
    let chars: Vec<char> = s.chars().collect();
    let number = |start: usize, end: usize| -> Result<u32> {
        chars
            .get(start..end)
            .map(|digits| digits.iter().collect::<String>())
            .and_then(|digits| digits.parse().ok())
            .ok_or_else(|| Error::decode("datetime", s))
    };

    let year = number(0, 4)?;
    let month = number(5, 7)?;
    let day = number(8, 10)?;
    let hour = number(13, 15)?;
    let minute = number(16, 18)?;

    NaiveDate::from_ymd_opt(year as i32, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .ok_or_else(|| Error::decode("datetime", s))
}

pub fn decode_refundable(raw: &str) -> bool {
    raw != NOT_REFUNDABLE
}

/// Extract every field of a listing page.
///
/// Absent fields take their zero value; a present field that does not
/// decode fails the whole listing.
pub fn build_snapshot(doc: &Document) -> Result<ListingSnapshot> {
    let auction_id = detail(doc, AUCTION_ID).unwrap_or_default();
    let title = field::extract_text(doc, &TITLE).unwrap_or_default();
    let seller_name = field::extract_text(doc, &SELLER).unwrap_or_default();
    let stock = detail(doc, STOCK);
    let start_time = detail(doc, START_TIME);
    let end_time = detail(doc, END_TIME);
    let refundable = detail(doc, REFUND).is_some_and(|raw| decode_refundable(&raw));
    let start_price = detail(doc, START_PRICE).unwrap_or_default();
    let time_left = counter(doc, TIME_LEFT, 0).unwrap_or_default();
    let bid_count = counter(doc, BID_COUNT, BID_SUFFIX_LEN);
    let access_count = statistic(doc, &ACCESS_TERM);
    let watch_count = statistic(doc, &WATCH_TERM);

    Ok(ListingSnapshot {
        auction_id,
        title,
        seller_name,
        stock: parse_count("stock", stock)?,
        start_time: parse_date("start_time", start_time)?,
        end_time: parse_date("end_time", end_time)?,
        refundable,
        start_price,
        time_left,
        bid_count: parse_count("bid_count", bid_count)?,
        access_count: parse_count("access_count", access_count)?,
        watch_count: parse_count("watch_count", watch_count)?,
    })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ListingExtractor;

impl Extractor for ListingExtractor {
    type Output = ListingSnapshot;

    fn extract(&self, body: &[u8]) -> Result<ListingSnapshot> {
        let snapshot = build_snapshot(&Document::parse(body))?;
        debug!(
            auction_id = %snapshot.auction_id,
            bids = snapshot.bid_count,
            "Extracted listing"
        );
        Ok(snapshot)
    }
}
