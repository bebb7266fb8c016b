//! Data structures representing format components.
//!
//! Contains the fixed-layout WAVE header and the handles that pair a decoded
//! header with the byte source it was read from.

pub mod handle;
pub mod header;
