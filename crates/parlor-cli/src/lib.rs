//! Parlor command-line replay tool.
//!
//! Loads a recorded room dump, feeds it through a [`parlor_core::Room`] with a
//! [`parlor_app::RoomView`] attached, and prints what a client would show.
//!
//! # Components
//!
//! - [`Dump`]: Live and backfill batches decoded from a JSON file
//! - [`Session`]: Rooms plus the views following them
//! - [`render`]: Plain-text output of a view

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod dump;
mod error;
pub mod render;
mod session;

pub use dump::Dump;
pub use error::CliError;
pub use session::Session;
