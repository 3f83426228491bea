//! Cursor sessions: pointer events in, published cursor samples out.
//!
//! A session tracks one gesture stream. Each press or drag update is clamped
//! into the drawable area, inverted through the current scale, resolved to
//! the nearest data index, and published to the shared feed.

use tracing::{debug, trace};

use crate::feed::{CursorFeed, CursorSample, FeedMemberId};
use crate::geom::{ScreenPoint, ScreenRect};
use crate::keys::KeySeries;
use crate::scale::{LinearScale, Range};
use crate::segment::segment_for_index;

/// A single pointer update delivered by the host gesture recognizer.
///
/// Positions may exceed the drawable bounds; the session clamps them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TouchEvent {
    /// A press started a gesture.
    Began(ScreenPoint),
    /// The pointer moved within an active gesture.
    Moved(ScreenPoint),
    /// The gesture ended (release or cancellation).
    Ended,
}

/// Per-event chart collaborators needed to resolve a pointer position.
///
/// Rebuilt by the caller per event: the drawable area, domain, and key
/// sequence may all change between renders.
#[derive(Debug, Clone, Copy)]
pub struct CursorContext<'a> {
    keys: &'a KeySeries,
    area: ScreenRect,
    domain: Option<Range>,
    segment_count: Option<usize>,
}

impl<'a> CursorContext<'a> {
    /// Create a context over a key sequence and drawable area.
    pub fn new(keys: &'a KeySeries, area: ScreenRect) -> Self {
        Self {
            keys,
            area,
            domain: None,
            segment_count: None,
        }
    }

    /// Set an explicit domain instead of the default `[0, len]`.
    pub fn with_domain(mut self, domain: Range) -> Self {
        self.domain = Some(domain);
        self
    }

    /// Set the rendered path's segment count for segment correction.
    pub fn with_segment_count(mut self, count: usize) -> Self {
        self.segment_count = Some(count);
        self
    }
}

/// Tracks one gesture stream and publishes cursor samples to a feed.
#[derive(Debug)]
pub struct CursorSession {
    feed: CursorFeed,
    member: FeedMemberId,
    gesture: u64,
    active: bool,
}

impl CursorSession {
    /// Create a session publishing into the feed.
    pub fn new(feed: &CursorFeed) -> Self {
        Self {
            feed: feed.clone(),
            member: feed.register_member(),
            gesture: 0,
            active: false,
        }
    }

    /// Access the session's feed member identifier.
    pub fn member(&self) -> FeedMemberId {
        self.member
    }

    /// Check whether a gesture is in progress.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Process one pointer event against the current chart context.
    ///
    /// Returns the published sample for `Began`/`Moved`. `Ended` publishes
    /// the inactive state and returns `None`. Unresolvable events (no active
    /// gesture, degenerate geometry, empty keys) are dropped: the previous
    /// publication stands.
    pub fn handle(
        &mut self,
        context: &CursorContext<'_>,
        event: TouchEvent,
    ) -> Option<CursorSample> {
        match event {
            TouchEvent::Began(position) => {
                self.gesture = self.feed.begin_gesture();
                self.active = true;
                debug!(gesture = self.gesture, "cursor gesture began");
                self.resolve_and_publish(context, position)
            }
            TouchEvent::Moved(position) => {
                if !self.active {
                    return None;
                }
                self.resolve_and_publish(context, position)
            }
            TouchEvent::Ended => {
                if !self.active {
                    return None;
                }
                self.active = false;
                debug!(gesture = self.gesture, "cursor gesture ended");
                self.feed.publish_inactive(self.member, self.gesture);
                None
            }
        }
    }

    fn resolve_and_publish(
        &mut self,
        context: &CursorContext<'_>,
        position: ScreenPoint,
    ) -> Option<CursorSample> {
        let sample = resolve_sample(context, position)?;
        self.feed.publish_sample(self.member, self.gesture, sample);
        Some(sample)
    }
}

/// Resolve a pointer position to a cursor sample.
///
/// The pipeline of one event: clamp into the drawable area, invert the
/// linear scale at the horizontal offset, locate the nearest key, and apply
/// segment correction when a segment count is known.
fn resolve_sample(context: &CursorContext<'_>, position: ScreenPoint) -> Option<CursorSample> {
    if !context.area.is_valid() || context.keys.is_empty() {
        return None;
    }
    let clamped = context.area.clamp(position);
    let offset = f64::from(clamped.x - context.area.min.x);
    let width = f64::from(context.area.width());

    let domain = context
        .domain
        .unwrap_or_else(|| context.keys.default_domain());
    let scale = LinearScale::new(domain, Range::new(0.0, width))?;
    let query = scale.invert_value(offset)?;
    let index = context.keys.nearest_index(query)?;
    let segment = context
        .segment_count
        .and_then(|count| segment_for_index(index, count, context.keys.len()));
    trace!(index, query, "cursor sample resolved");

    Some(CursorSample {
        index,
        segment,
        position: clamped,
    })
}
