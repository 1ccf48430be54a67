//! Per-tick report channels.
//!
//! Phases write human-readable outcomes into one of eight categorized
//! channels. The orchestrator clears every channel at the start of each
//! committed tick; the caller reads them after the tick returns. Entries
//! never survive into the next tick.

use std::collections::BTreeMap;

use campaign_types::ReportCategory;

/// Categorized, append-only log of the current tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportChannels {
    channels: BTreeMap<ReportCategory, Vec<String>>,
}

impl ReportChannels {
    /// Create empty channels.
    pub const fn new() -> Self {
        Self {
            channels: BTreeMap::new(),
        }
    }

    /// Append an entry to `category`.
    pub fn write(&mut self, category: ReportCategory, entry: impl Into<String>) {
        self.channels.entry(category).or_default().push(entry.into());
    }

    /// Entries of `category` in the order they were written.
    pub fn entries(&self, category: ReportCategory) -> &[String] {
        self.channels.get(&category).map_or(&[], Vec::as_slice)
    }

    /// Empty every channel.
    pub fn clear_all(&mut self) {
        self.channels.clear();
    }

    /// Whether no channel holds an entry.
    pub fn is_empty(&self) -> bool {
        self.channels.values().all(Vec::is_empty)
    }

    /// Total entries across all channels.
    pub fn len(&self) -> usize {
        self.channels.values().map(Vec::len).sum()
    }

    /// Non-empty channels in category order.
    pub fn iter(&self) -> impl Iterator<Item = (ReportCategory, &[String])> {
        ReportCategory::ALL.into_iter().filter_map(|category| {
            let entries = self.entries(category);
            (!entries.is_empty()).then_some((category, entries))
        })
    }
}

/// Anything phases can write report entries into.
pub trait ReportSink {
    /// Mutable access to the report channels.
    fn reports_mut(&mut self) -> &mut ReportChannels;

    /// Append an entry to `category`.
    fn report(&mut self, category: ReportCategory, entry: impl Into<String>)
    where
        Self: Sized,
    {
        self.reports_mut().write(category, entry);
    }
}

impl ReportSink for ReportChannels {
    fn reports_mut(&mut self) -> &mut ReportChannels {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_channels_are_empty() {
        let reports = ReportChannels::new();
        assert!(reports.is_empty());
        for category in ReportCategory::ALL {
            assert!(reports.entries(category).is_empty());
        }
    }

    #[test]
    fn entries_keep_write_order_per_category() {
        let mut reports = ReportChannels::new();
        reports.write(ReportCategory::Finances, "first");
        reports.write(ReportCategory::General, "other");
        reports.write(ReportCategory::Finances, "second");
        assert_eq!(reports.entries(ReportCategory::Finances), ["first", "second"]);
        assert_eq!(reports.len(), 3);
    }

    #[test]
    fn clear_all_empties_every_channel() {
        let mut reports = ReportChannels::new();
        for category in ReportCategory::ALL {
            reports.report(category, "entry");
        }
        reports.clear_all();
        assert!(reports.is_empty());
        assert_eq!(reports.len(), 0);
    }

    #[test]
    fn iter_skips_empty_channels_in_category_order() {
        let mut reports = ReportChannels::new();
        reports.write(ReportCategory::Politics, "p");
        reports.write(ReportCategory::General, "g");
        let categories: Vec<ReportCategory> = reports.iter().map(|(c, _)| c).collect();
        assert_eq!(categories, vec![ReportCategory::General, ReportCategory::Politics]);
    }
}
