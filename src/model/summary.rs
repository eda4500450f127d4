use serde::Serialize;

use super::Classification;

/// Verdict for a named package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageReport {
    pub name: String,
    #[serde(flatten)]
    pub classification: Classification,
}

impl PackageReport {
    pub fn new(name: impl Into<String>, classification: Classification) -> Self {
        Self {
            name: name.into(),
            classification,
        }
    }
}

/// Aggregated result of one scan.
///
/// Reports are kept in the order the package names were supplied. The
/// counters always add up to the number of reports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    dead_count: usize,
    unknown_count: usize,
    alive_count: usize,
    packages: Vec<PackageReport>,
}

impl ScanSummary {
    /// Appends a report and bumps the matching counter.
    pub fn push(&mut self, report: PackageReport) {
        match report.classification {
            Classification::Dead { .. } => self.dead_count += 1,
            Classification::Alive => self.alive_count += 1,
            Classification::Unknown { .. } => self.unknown_count += 1,
        }
        self.packages.push(report);
    }

    pub fn dead_count(&self) -> usize {
        self.dead_count
    }

    pub fn unknown_count(&self) -> usize {
        self.unknown_count
    }

    pub fn alive_count(&self) -> usize {
        self.alive_count
    }

    pub fn total(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn has_dead(&self) -> bool {
        self.dead_count > 0
    }

    pub fn packages(&self) -> &[PackageReport] {
        &self.packages
    }

    pub fn dead(&self) -> impl Iterator<Item = &PackageReport> {
        self.packages.iter().filter(|p| p.classification.is_dead())
    }

    pub fn unknown(&self) -> impl Iterator<Item = &PackageReport> {
        self.packages.iter().filter(|p| p.classification.is_unknown())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn dead(name: &str) -> PackageReport {
        PackageReport::new(
            name,
            Classification::Dead {
                days_since_release: 400,
                last_release: Utc.with_ymd_and_hms(2024, 11, 27, 0, 0, 0).unwrap(),
            },
        )
    }

    #[test]
    fn test_empty_summary() {
        let summary = ScanSummary::default();
        assert!(summary.is_empty());
        assert_eq!(summary.dead_count(), 0);
        assert_eq!(summary.unknown_count(), 0);
        assert_eq!(summary.alive_count(), 0);
        assert!(!summary.has_dead());
    }

    #[test]
    fn test_push_updates_counters_and_keeps_order() {
        let mut summary = ScanSummary::default();
        summary.push(dead("left-pad"));
        summary.push(PackageReport::new("react", Classification::Alive));
        summary.push(PackageReport::new("ghost", Classification::unknown("not found in registry")));
        summary.push(dead("request"));

        assert_eq!(summary.dead_count(), 2);
        assert_eq!(summary.alive_count(), 1);
        assert_eq!(summary.unknown_count(), 1);
        assert_eq!(
            summary.dead_count() + summary.alive_count() + summary.unknown_count(),
            summary.total()
        );

        let names: Vec<&str> = summary.packages().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["left-pad", "react", "ghost", "request"]);

        let dead_names: Vec<&str> = summary.dead().map(|p| p.name.as_str()).collect();
        assert_eq!(dead_names, vec!["left-pad", "request"]);
    }

    #[test]
    fn test_report_json_is_flat() {
        let json = serde_json::to_value(PackageReport::new("react", Classification::Alive)).unwrap();
        assert_eq!(json["name"], "react");
        assert_eq!(json["status"], "alive");
    }
}
