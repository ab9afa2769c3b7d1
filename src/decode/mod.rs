//! Response decoding module
//!
//! Turns heterogeneous API responses into flat row lists.
//!
//! # Overview
//!
//! Listing endpoints wrap rows under a configurable key next to paging
//! metadata; detail endpoints answer with a wrapped list, a bare list or a
//! single object. `RowDecoder` normalizes all of these shapes.

mod rows;

pub use rows::{RowDecoder, DEFAULT_ROWS_KEY};
