//! Shared request/response types.

pub mod account;
pub mod common;

pub use account::*;
pub use common::*;
