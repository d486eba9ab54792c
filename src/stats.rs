/// Counters collected during one conversion
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConversionStats {
    pub pages_seen: u64,
    pub pages_accepted: u64,
    pub redirects_skipped: u64,
    pub namespace_skipped: u64,
    pub bodies_truncated: u64,
    pub categories_emitted: u64,
    /// Set when the record limit ended the run before the end of the dump
    pub stopped_early: bool,
}

impl ConversionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_seen(&mut self) {
        self.pages_seen += 1;
    }

    pub fn inc_accepted(&mut self) {
        self.pages_accepted += 1;
    }

    pub fn inc_redirects(&mut self) {
        self.redirects_skipped += 1;
    }

    pub fn inc_namespace(&mut self) {
        self.namespace_skipped += 1;
    }

    pub fn inc_truncated(&mut self) {
        self.bodies_truncated += 1;
    }

    pub fn add_categories(&mut self, count: u64) {
        self.categories_emitted += count;
    }

    pub fn skipped(&self) -> u64 {
        self.redirects_skipped + self.namespace_skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values_are_zero() {
        let stats = ConversionStats::new();
        assert_eq!(stats.pages_seen, 0);
        assert_eq!(stats.pages_accepted, 0);
        assert_eq!(stats.skipped(), 0);
        assert_eq!(stats.bodies_truncated, 0);
        assert_eq!(stats.categories_emitted, 0);
        assert!(!stats.stopped_early);
    }

    #[test]
    fn skipped_sums_both_reasons() {
        let mut stats = ConversionStats::new();
        stats.inc_redirects();
        stats.inc_redirects();
        stats.inc_namespace();
        assert_eq!(stats.skipped(), 3);
    }

    #[test]
    fn mixed_operations() {
        let mut stats = ConversionStats::new();
        stats.inc_seen();
        stats.inc_accepted();
        stats.inc_truncated();
        stats.inc_seen();
        stats.inc_namespace();
        stats.add_categories(3);
        stats.add_categories(2);

        assert_eq!(stats.pages_seen, 2);
        assert_eq!(stats.categories_emitted, 5);
        assert_eq!(stats.pages_accepted, 1);
        assert_eq!(stats.bodies_truncated, 1);
        assert_eq!(stats.namespace_skipped, 1);
    }
}
