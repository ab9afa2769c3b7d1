//! Pagination module
//!
//! Fetches every page of a page-numbered listing endpoint.
//!
//! # Overview
//!
//! The first page is requested alone to learn the total page count; all
//! remaining pages are then requested together and their rows concatenated
//! in page-number order, regardless of the order in which responses arrive.
//! Whether the page number travels in the JSON body or the query string is
//! configurable; read (GET) requests always carry it in the query string.

mod fetcher;
mod types;

pub use fetcher::PageFetcher;
pub use types::{
    apply_filters, PagePlacement, PageRequest, PaginationConfig, PaginationOverrides, RowSet,
};
