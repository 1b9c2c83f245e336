use std::collections::HashMap;

use tracing::debug;

use crate::models::chart::GrowthPoint;
use crate::models::timeframe::Timeframe;

/// Growth series memoized per timeframe.
///
/// Lives exactly as long as one dashboard mount for one account; the
/// controller clears it on unmount and on account change. Daily buckets and
/// recent activity are not cached here.
#[derive(Debug, Clone, Default)]
pub struct TimeframeCache {
    entries: HashMap<Timeframe, Vec<GrowthPoint>>,
}

impl TimeframeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, timeframe: Timeframe) -> Option<&[GrowthPoint]> {
        self.entries.get(&timeframe).map(Vec::as_slice)
    }

    pub fn contains(&self, timeframe: Timeframe) -> bool {
        self.entries.contains_key(&timeframe)
    }

    /// Insert or replace the series for a timeframe.
    pub fn set(&mut self, timeframe: Timeframe, series: Vec<GrowthPoint>) {
        debug!(%timeframe, points = series.len(), "caching growth series");
        self.entries.insert(timeframe, series);
    }

    pub fn invalidate_all(&mut self) {
        if !self.entries.is_empty() {
            debug!(entries = self.entries.len(), "invalidating timeframe cache");
        }
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
