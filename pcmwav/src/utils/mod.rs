//! Utility functions and supporting infrastructure.
//!
//! Provides byte-order serialization, buffered reading helpers and the
//! error types shared by the header and combination code.

pub mod byteorder;
pub mod errors;
pub mod reader;
