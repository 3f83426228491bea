//! Key sequences and nearest-index lookup.
//!
//! The key layer holds the sorted X values of a chart's data (timestamps, or
//! implicit indices) and answers one question per pointer event: which data
//! index is closest to this domain value?

use thiserror::Error;

use crate::scale::Range;

/// Mode of the key values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMode {
    /// Keys are implicit indices.
    Index,
    /// Keys are explicitly provided values (timestamps).
    Explicit,
}

/// Errors that can occur when appending keys.
///
/// These errors indicate misuse of a key sequence (for example, pushing
/// explicit keys into an index-mode sequence).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum KeyError {
    /// Attempted to append with an incompatible key mode.
    #[error("append is incompatible with the key mode")]
    WrongMode,
    /// Explicit keys are not ascending.
    ///
    /// Non-ascending keys disable the binary-search fast path.
    #[error("explicit keys are not ascending")]
    NonAscending,
}

/// Sorted key sequence with nearest-index lookup.
///
/// The sequence is owned by the chart and rebuilt whenever the underlying
/// data array changes; lookups never mutate it.
#[derive(Debug, Clone)]
pub struct KeySeries {
    keys: Vec<f64>,
    mode: KeyMode,
    ascending: bool,
}

impl KeySeries {
    /// Create a sequence of `len` implicit index keys.
    pub fn indexed(len: usize) -> Self {
        Self {
            keys: (0..len).map(|index| index as f64).collect(),
            mode: KeyMode::Index,
            ascending: true,
        }
    }

    /// Create an empty sequence with explicit keys.
    pub fn explicit() -> Self {
        Self {
            keys: Vec::new(),
            mode: KeyMode::Explicit,
            ascending: true,
        }
    }

    /// Build an explicit sequence from an iterator of keys.
    pub fn from_iter_keys<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<f64>,
    {
        let mut series = Self::explicit();
        let _ = series.extend_keys(iter);
        series
    }

    /// Append an explicit key.
    pub fn push_key(&mut self, key: f64) -> Result<usize, KeyError> {
        let index = self.keys.len();
        self.extend_keys([key]).map(|_| index)
    }

    /// Append multiple explicit keys.
    ///
    /// Descending keys are still appended but flag the sequence as
    /// non-ascending, which degrades lookups to a linear scan.
    pub fn extend_keys<I, T>(&mut self, keys: I) -> Result<usize, KeyError>
    where
        I: IntoIterator<Item = T>,
        T: Into<f64>,
    {
        if self.mode != KeyMode::Explicit {
            return Err(KeyError::WrongMode);
        }

        let keys = keys.into_iter();
        let (reserve, _) = keys.size_hint();
        self.keys.reserve(reserve);

        let start_len = self.keys.len();
        let mut last = self.keys.last().copied();
        let mut non_ascending = false;
        for key in keys {
            let key = key.into();
            if let Some(last) = last
                && key < last
            {
                self.ascending = false;
                non_ascending = true;
            }
            self.keys.push(key);
            last = Some(key);
        }

        if non_ascending {
            Err(KeyError::NonAscending)
        } else {
            Ok(self.keys.len() - start_len)
        }
    }

    /// Access all keys as a slice.
    pub fn keys(&self) -> &[f64] {
        &self.keys
    }

    /// Access a single key by index.
    pub fn key(&self, index: usize) -> Option<f64> {
        self.keys.get(index).copied()
    }

    /// Number of keys stored.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check if there are no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Access the key mode.
    pub fn mode(&self) -> KeyMode {
        self.mode
    }

    /// Check whether explicit keys are ascending.
    pub fn is_ascending(&self) -> bool {
        self.ascending
    }

    /// Domain used when the chart supplies none: `[0, len]`.
    pub fn default_domain(&self) -> Range {
        Range::new(0.0, self.keys.len() as f64)
    }

    /// Find the index of the key nearest to the query value.
    pub fn nearest_index(&self, query: f64) -> Option<usize> {
        if self.keys.is_empty() || !query.is_finite() {
            return None;
        }

        match self.mode {
            KeyMode::Index => {
                let last = self.keys.len() - 1;
                let clamped = query.clamp(0.0, last as f64);
                let below = clamped.floor();
                let index = if clamped - below > 0.5 {
                    below as usize + 1
                } else {
                    below as usize
                };
                Some(index.min(last))
            }
            KeyMode::Explicit => {
                if !self.ascending {
                    return self.nearest_index_linear(query);
                }
                nearest_index(&self.keys, query)
            }
        }
    }

    fn nearest_index_linear(&self, query: f64) -> Option<usize> {
        let mut best_index = None;
        let mut best_distance = f64::INFINITY;
        for (index, key) in self.keys.iter().enumerate() {
            let distance = (key - query).abs();
            if distance < best_distance {
                best_distance = distance;
                best_index = Some(index);
            }
        }
        best_index
    }
}

/// Find the index of the key closest to the query in an ascending slice.
///
/// Queries at or beyond either end clamp to the first or last index. An
/// interior exact match returns immediately; otherwise the two bracketing
/// keys are compared by distance and equal distances resolve to the lower
/// index. Returns `None` for an empty slice or a non-finite query.
///
/// O(log n) time, O(1) space.
pub fn nearest_index(keys: &[f64], query: f64) -> Option<usize> {
    if keys.is_empty() || !query.is_finite() {
        return None;
    }
    let last = keys.len() - 1;
    if query <= keys[0] {
        return Some(0);
    }
    if query >= keys[last] {
        return Some(last);
    }

    let mut left = 0;
    let mut right = last;
    while left <= right {
        let mid = (left + right) / 2;
        if keys[mid] == query {
            return Some(mid);
        }
        // The boundary checks above keep `mid - 1` and `mid + 1` in bounds.
        if keys[mid] < query {
            left = mid + 1;
        } else {
            right = mid - 1;
        }
    }

    // The bounds crossed: `right` indexes the nearest key below the query,
    // `left` the nearest key above it.
    let below = right;
    let above = left;
    if (keys[below] - query).abs() <= (keys[above] - query).abs() {
        Some(below)
    } else {
        Some(above)
    }
}
