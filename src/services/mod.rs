pub mod pagination;
pub mod listing;

pub use pagination::{collect_urls, ITEM_LINK, NEXT_PAGE};
pub use listing::ListingService;
