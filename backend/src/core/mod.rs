//! Core date handling
//!
//! Every computation in this crate works on whole calendar days.

pub mod date;
