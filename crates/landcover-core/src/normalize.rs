//! Class normalizer: remaps fine codes to canonical codes before aggregation.

use std::collections::BTreeMap;

use crate::record::ChangeRecord;

/// Ordered {source code → replacement code} mapping.
///
/// Applied identically to both sides of a transition; unmapped codes pass
/// through unchanged. No filtering happens here.
#[derive(Debug, Clone, Default)]
pub struct Remap(BTreeMap<u16, u16>);

impl Remap {
    pub fn new(pairs: impl IntoIterator<Item = (u16, u16)>) -> Self {
        Self(pairs.into_iter().collect())
    }

    /// Canonical mapping folding the derived successional sub-types back into
    /// their parent classes: 56 (Shrub/Scrub successional) → 52 and
    /// 75 (Harvested/Disturbed) → 71 (Herbaceous).
    pub fn merge_successional() -> Self {
        Self::new([(56, 52), (75, 71)])
    }

    /// Replace both class codes of `record` where the mapping applies.
    pub fn apply(&self, record: &mut ChangeRecord) {
        if let Some(&c) = self.0.get(&record.start_class) {
            record.start_class = c;
        }
        if let Some(&c) = self.0.get(&record.end_class) {
            record.end_class = c;
        }
    }

    pub fn apply_all(&self, records: &mut [ChangeRecord]) {
        for r in records.iter_mut() {
            self.apply(r);
        }
    }
}
