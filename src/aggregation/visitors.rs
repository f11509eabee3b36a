//! 访客聚合

use super::names::sorted_unique;
use crate::models::{VisitorEntry, VisitorReport, VisitorSummary};

pub fn aggregate_visitors(records: &[VisitorEntry]) -> VisitorReport {
    let valid: Vec<&VisitorEntry> = records.iter().filter(|v| !v.is_sentinel()).collect();

    VisitorReport {
        summary: VisitorSummary {
            total_visitors: valid.len(),
        },
        visitors_list: sorted_unique(valid.iter().map(|v| v.name.as_str())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_rows_and_lists_unique_names() {
        let records: Vec<VisitorEntry> = ["zoe Quinn", "Adam Park", "Adam Park", "No Data"]
            .iter()
            .map(|n| VisitorEntry::from_row(&[n.to_string()]).unwrap())
            .collect();

        let report = aggregate_visitors(&records);

        assert_eq!(report.summary.total_visitors, 3);
        assert_eq!(report.visitors_list, vec!["Adam Park", "zoe Quinn"]);
    }
}
