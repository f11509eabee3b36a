//! 活动聚合

use tracing::info;

use super::classify::classify_event;
use super::names::{is_reserved_role, sorted_unique};
use crate::models::{EventActivity, EventCounts, EventReport, EventSummary};

pub fn is_countable(event: &EventActivity) -> bool {
    !event.is_sentinel() && !is_reserved_role(&event.attending_member)
}

pub fn aggregate_events(records: &[EventActivity]) -> EventReport {
    let valid: Vec<&EventActivity> = records.iter().filter(|e| is_countable(e)).collect();

    let mut counts = EventCounts::default();
    for event in &valid {
        counts.add(classify_event(&event.event_type));
    }

    let submitted_by = sorted_unique(valid.iter().map(|e| e.attending_member_name.as_str()));
    info!(
        "活动统计: 共 {} 次出席, 出席成员 {} 人",
        valid.len(),
        submitted_by.len()
    );

    EventReport {
        summary: EventSummary {
            total: valid.len(),
            counts,
            members_submitted: submitted_by.len(),
        },
        submitted_by,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::classify::EventType;

    fn event(member: &str, kind: &str) -> EventActivity {
        let row = vec![member.to_string(), "Host Person".to_string(), kind.to_string()];
        EventActivity::from_row(&row).unwrap()
    }

    #[test]
    fn counts_each_bucket_and_dedupes_attendees() {
        let records = vec![
            event("Jane Doe", "Mixer"),
            event("Jane Doe", "Open Mic"),
            event("Bob Roe", "Listening/Viewing"),
            event("Bob Roe", "Hackathon"),
            event("Executive Producer", "Mixer"),
            event("No Data", ""),
        ];

        let report = aggregate_events(&records);

        assert_eq!(report.summary.total, 4);
        assert_eq!(report.summary.counts.mixer, 1);
        assert_eq!(report.summary.counts.open_mic, 1);
        assert_eq!(report.summary.counts.listening_viewing, 1);
        assert_eq!(report.summary.counts.get(EventType::Other), 1);
        assert_eq!(report.submitted_by, vec!["Bob R.", "Jane D."]);
        assert_eq!(report.summary.members_submitted, 2);
    }

    #[test]
    fn empty_input_yields_empty_report() {
        let report = aggregate_events(&[]);
        assert_eq!(report.summary.total, 0);
        assert!(report.submitted_by.is_empty());
    }
}
