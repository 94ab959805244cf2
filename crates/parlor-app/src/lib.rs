//! Application layer for Parlor
//!
//! View models that consume [`parlor_core::Room`] notifications and keep a
//! render-ready picture of one room, without depending on any GUI toolkit.
//!
//! # Components
//!
//! - [`MemberList`]: Sorted roster of active members keyed by resolved name
//! - [`Timeline`]: Rendered message log with batch boundaries and notices
//! - [`RoomView`]: Both of the above plus topic and title, as a
//!   [`parlor_core::RoomObserver`]

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
mod member_list;
mod timeline;
mod view;

pub use error::ViewError;
pub use member_list::MemberList;
pub use timeline::{Timeline, TimelineItem};
pub use view::RoomView;
