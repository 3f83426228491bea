//! chart-cursor maps press/drag positions over a line chart to the nearest
//! data index and publishes the result as shared crosshair state for sibling
//! decorations (crosshair line, tooltip label).
//!
//! The crate is rendering-framework-neutral: the host toolkit delivers
//! [`TouchEvent`]s to a [`CursorSession`] and decorations poll the
//! [`CursorFeed`] for the latest sample.

#![forbid(unsafe_code)]

pub mod cursor;
pub mod feed;
pub mod geom;
pub mod keys;
pub mod scale;
pub mod segment;

pub use cursor::{CursorContext, CursorSession, TouchEvent};
pub use feed::{CursorFeed, CursorSample, CursorUpdate, FeedMemberId};
pub use geom::{ScreenPoint, ScreenRect};
pub use keys::{KeyError, KeyMode, KeySeries, nearest_index};
pub use scale::{LinearScale, Range};
pub use segment::segment_for_index;
