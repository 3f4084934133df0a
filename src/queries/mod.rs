//! Aggregate queries over stored grade records
//!
//! Both deployed reports ("more than 3 twos", "fewer than 5 twos") are the
//! same grouping with a different comparison and threshold, so they share
//! one parameterized operation.

mod filter;
mod service;

pub use filter::{
    Comparison, TwosFilter, DEFAULT_FEWER_THAN_THRESHOLD, DEFAULT_MORE_THAN_THRESHOLD,
};
pub use service::GradeQueryService;
