/// Text dump of a transferred zone, one entry per zone node.
///
/// A node entry holds every record of one owner name and may itself span
/// several lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneRecordSet {
    lines: Vec<String>,
}

impl ZoneRecordSet {
    /// Build a record set from per-node text
    #[must_use]
    pub const fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// Per-node text, in zone order
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of nodes
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns true if the zone has no nodes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines joined with `\n`, without a trailing newline
    #[must_use]
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }
}

impl FromIterator<String> for ZoneRecordSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_text_has_no_trailing_newline() {
        let set: ZoneRecordSet = ["@ 3600 IN SOA a b 1 2 3 4 5", "www 300 IN A 192.0.2.1"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(set.len(), 2);
        assert_eq!(
            set.to_text(),
            "@ 3600 IN SOA a b 1 2 3 4 5\nwww 300 IN A 192.0.2.1"
        );
    }

    #[test]
    fn test_empty() {
        let set = ZoneRecordSet::default();
        assert!(set.is_empty());
        assert_eq!(set.to_text(), "");
    }
}
