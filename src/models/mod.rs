mod listing;
mod row;

pub use listing::{ListingSnapshot, epoch};
pub use row::TableRow;
