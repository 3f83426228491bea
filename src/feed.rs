//! Shared cursor state for sibling chart decorations.
//!
//! A [`CursorFeed`] is a last-write-wins cell: each pointer event overwrites
//! the previous publication and readers observe only the latest value.
//! Publications carry a sequence number so a reader polling the feed can
//! apply an update exactly once.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::geom::ScreenPoint;

const FEED_EPSILON: f32 = 1e-6;

/// Member identifier inside a cursor feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeedMemberId(u64);

/// Cursor sample published per pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CursorSample {
    /// Nearest data index.
    pub index: usize,
    /// Path segment for the index, when segment counts are known.
    pub segment: Option<usize>,
    /// Pointer position in screen space.
    pub position: ScreenPoint,
}

/// Latest cursor publication.
///
/// A `None` sample is the inactive state: the gesture has ended and
/// decorations should hide.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CursorUpdate {
    /// Publication sequence number, increasing per distinct publication.
    pub seq: u64,
    /// Member that produced the update.
    pub source: FeedMemberId,
    /// Published sample, or `None` when the cursor is inactive.
    pub sample: Option<CursorSample>,
}

/// Shared cursor cell used to synchronize chart decorations.
///
/// Clones share the same cell. The feed is `Send + Sync`, so the sample
/// computation may run on whichever thread hosts the chart's numeric
/// context; readers on other threads still observe the latest write.
#[derive(Debug, Clone, Default)]
pub struct CursorFeed {
    inner: Arc<RwLock<FeedState>>,
}

impl CursorFeed {
    /// Create an empty feed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a publishing member.
    pub fn register_member(&self) -> FeedMemberId {
        let mut state = self.inner.write().expect("cursor feed lock");
        state.next_member_id = state.next_member_id.wrapping_add(1);
        FeedMemberId(state.next_member_id)
    }

    /// Start a gesture and return its generation.
    ///
    /// Samples published for a gesture whose end has already been published
    /// are dropped, so the release always wins over stale in-flight work.
    pub(crate) fn begin_gesture(&self) -> u64 {
        let mut state = self.inner.write().expect("cursor feed lock");
        state.next_gesture = state.next_gesture.wrapping_add(1);
        state.next_gesture
    }

    pub(crate) fn publish_sample(&self, source: FeedMemberId, gesture: u64, sample: CursorSample) {
        let mut state = self.inner.write().expect("cursor feed lock");
        if state.ended.get(&source).is_some_and(|ended| gesture <= *ended) {
            return;
        }
        if let Some(current) = state.update
            && current.source == source
            && current
                .sample
                .is_some_and(|existing| sample_approx_eq(existing, sample))
        {
            return;
        }
        let seq = state.next_seq();
        state.update = Some(CursorUpdate {
            seq,
            source,
            sample: Some(sample),
        });
    }

    pub(crate) fn publish_inactive(&self, source: FeedMemberId, gesture: u64) {
        let mut state = self.inner.write().expect("cursor feed lock");
        let ended = state.ended.entry(source).or_insert(0);
        *ended = (*ended).max(gesture);
        if let Some(current) = state.update
            && current.source == source
            && current.sample.is_none()
        {
            return;
        }
        let seq = state.next_seq();
        state.update = Some(CursorUpdate {
            seq,
            source,
            sample: None,
        });
    }

    /// Read the latest publication, if any.
    pub fn latest(&self) -> Option<CursorUpdate> {
        self.inner.read().expect("cursor feed lock").update
    }
}

#[derive(Debug, Default)]
struct FeedState {
    next_member_id: u64,
    next_seq: u64,
    next_gesture: u64,
    ended: HashMap<FeedMemberId, u64>,
    update: Option<CursorUpdate>,
}

impl FeedState {
    fn next_seq(&mut self) -> u64 {
        self.next_seq = self.next_seq.wrapping_add(1);
        self.next_seq
    }
}

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() <= FEED_EPSILON
}

fn sample_approx_eq(a: CursorSample, b: CursorSample) -> bool {
    a.index == b.index
        && a.segment == b.segment
        && approx_eq(a.position.x, b.position.x)
        && approx_eq(a.position.y, b.position.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(index: usize, x: f32) -> CursorSample {
        CursorSample {
            index,
            segment: None,
            position: ScreenPoint::new(x, 0.0),
        }
    }

    #[test]
    fn publish_deduplicates_same_payload() {
        let feed = CursorFeed::new();
        let member = feed.register_member();
        let gesture = feed.begin_gesture();

        feed.publish_sample(member, gesture, sample(3, 40.0));
        let first = feed.latest().expect("cursor update");
        feed.publish_sample(member, gesture, sample(3, 40.0));
        let second = feed.latest().expect("cursor update");

        assert_eq!(first.seq, second.seq);
    }

    #[test]
    fn distinct_payloads_advance_the_sequence() {
        let feed = CursorFeed::new();
        let member = feed.register_member();
        let gesture = feed.begin_gesture();

        feed.publish_sample(member, gesture, sample(3, 40.0));
        let first = feed.latest().expect("cursor update").seq;
        feed.publish_sample(member, gesture, sample(4, 52.0));
        let update = feed.latest().expect("cursor update");

        assert!(update.seq > first);
        assert_eq!(update.sample.map(|sample| sample.index), Some(4));
    }

    #[test]
    fn release_wins_over_stale_samples() {
        let feed = CursorFeed::new();
        let member = feed.register_member();
        let gesture = feed.begin_gesture();

        feed.publish_sample(member, gesture, sample(2, 20.0));
        feed.publish_inactive(member, gesture);
        // A computation from earlier in the gesture lands after the release.
        feed.publish_sample(member, gesture, sample(3, 30.0));

        let update = feed.latest().expect("cursor update");
        assert!(update.sample.is_none());
    }

    #[test]
    fn a_new_gesture_publishes_after_a_release() {
        let feed = CursorFeed::new();
        let member = feed.register_member();

        let first = feed.begin_gesture();
        feed.publish_sample(member, first, sample(1, 10.0));
        feed.publish_inactive(member, first);

        let second = feed.begin_gesture();
        feed.publish_sample(member, second, sample(5, 60.0));

        let update = feed.latest().expect("cursor update");
        assert_eq!(update.sample.map(|sample| sample.index), Some(5));
    }

    #[test]
    fn members_do_not_block_each_other() {
        let feed = CursorFeed::new();
        let first = feed.register_member();
        let second = feed.register_member();

        let gesture = feed.begin_gesture();
        feed.publish_sample(first, gesture, sample(1, 10.0));
        feed.publish_inactive(first, gesture);

        let other = feed.begin_gesture();
        feed.publish_sample(second, other, sample(2, 20.0));

        let update = feed.latest().expect("cursor update");
        assert_eq!(update.source, second);
        assert_eq!(update.sample.map(|sample| sample.index), Some(2));
    }

    #[test]
    fn clones_share_the_same_cell() {
        let feed = CursorFeed::new();
        let reader = feed.clone();
        let member = feed.register_member();
        let gesture = feed.begin_gesture();

        feed.publish_sample(member, gesture, sample(7, 70.0));

        let update = reader.latest().expect("cursor update");
        assert_eq!(update.sample.map(|sample| sample.index), Some(7));
    }

    #[test]
    fn publications_cross_threads() {
        let feed = CursorFeed::new();
        let writer = feed.clone();
        let handle = std::thread::spawn(move || {
            let member = writer.register_member();
            let gesture = writer.begin_gesture();
            writer.publish_sample(member, gesture, sample(9, 90.0));
        });
        handle.join().expect("writer thread");

        let update = feed.latest().expect("cursor update");
        assert_eq!(update.sample.map(|sample| sample.index), Some(9));
    }
}
