//! 周检查表聚合
//!
//! 分母是成员报表的成员数，所以必须先拿到成员列表。

use tracing::info;

use super::names::{is_reserved_role, sorted_unique};
use super::numbers::{percentage, DEFAULT_PRECISION};
use crate::error::ValidationError;
use crate::models::{ChecklistEntry, ChecklistSummary, WeeklyChecklistReport};

pub fn aggregate_checklist(
    members_list: &[String],
    entries: &[ChecklistEntry],
) -> Result<WeeklyChecklistReport, ValidationError> {
    let total_members = members_list.len();
    if total_members == 0 {
        return Err(ValidationError::ZeroDenominator {
            context: "成员总数",
        });
    }

    let valid: Vec<&ChecklistEntry> = entries
        .iter()
        .filter(|e| !e.is_sentinel() && !is_reserved_role(&e.member))
        .collect();
    let submitted_by = sorted_unique(valid.iter().map(|e| e.member_name.as_str()));

    let missing_list: Vec<String> = members_list
        .iter()
        .filter(|name| !submitted_by.contains(name))
        .cloned()
        .collect();

    let created_percentage = percentage(valid.len() as f64, total_members as f64, DEFAULT_PRECISION)?;
    let missing_percentage = percentage(
        missing_list.len() as f64,
        total_members as f64,
        DEFAULT_PRECISION,
    )?;

    info!(
        "周检查表: {} 份, 未提交 {} 人 ({}%)",
        valid.len(),
        missing_list.len(),
        missing_percentage
    );

    Ok(WeeklyChecklistReport {
        summary: ChecklistSummary {
            total_members,
            total_checklists: valid.len(),
            members_submitted: submitted_by.len(),
            missing_checklists: missing_list.len(),
            created_percentage,
            missing_percentage,
        },
        members_list: members_list.to_vec(),
        submitted_by,
        missing_list,
    })
}
