//! 文本报表
//!
//! 脱敏报表只读取 `*Summary`，姓名列表只出现在非脱敏部分。

use chrono::{DateTime, TimeZone};

use crate::aggregation::{EventType, SessionType};
use crate::models::{
    BlindedChapterReport, ChapterPerformanceReport, ChecklistSummary, EventSummary,
    MemberSummary, ReferralSummary, Scope, SessionSummary, SocialMediaReport, VisitorSummary,
    WeeklyChecklistReport,
};

const DIVIDER: &str = "--------------------------------";
const AS_OF_FORMAT: &str = "%m/%d/%Y %I:%M %p";

fn join_or_none(names: &[String]) -> String {
    if names.is_empty() {
        "None".to_string()
    } else {
        names.join(", ")
    }
}

fn unavailable(scope: Scope) -> String {
    format!("Unavailable ({} data could not be collected)", scope)
}

fn members_section(summary: &MemberSummary) -> String {
    [
        format!("Total Members: {}", summary.total_members),
        format!("Zero Activity: {}", summary.zero_activity),
        format!("Low Activity: {}", summary.low_activity),
    ]
    .join("\n")
}

fn social_media_section(social: &SocialMediaReport) -> String {
    [
        format!("Total Posts: {}", social.total_posts),
        format!("Avg Posts per Member: {}", social.avg_posts_per_member),
        format!(
            "Avg Rounds of Posts: {} → {}",
            social.avg_rounds_of_posts.raw, social.avg_rounds_of_posts.rounded
        ),
    ]
    .join("\n")
}

fn sessions_section(summary: &SessionSummary) -> String {
    let mut lines = vec![format!("Total Sessions: {}", summary.total)];
    lines.extend(
        SessionType::REPORT_ORDER
            .iter()
            .filter(|kind| summary.counts.get(**kind) > 0)
            .map(|kind| format!("{}: {}", kind.display_name(), summary.counts.get(*kind))),
    );
    lines.join("\n")
}

fn events_section(summary: &EventSummary) -> String {
    let mut lines = vec![format!("Total Events: {}", summary.total)];
    lines.extend(
        EventType::REPORT_ORDER
            .iter()
            .filter(|kind| summary.counts.get(**kind) > 0)
            .map(|kind| format!("{}: {}", kind.display_name(), summary.counts.get(*kind))),
    );
    lines.join("\n")
}

fn visitors_section(summary: &VisitorSummary) -> String {
    format!("Total Visitors: {}", summary.total_visitors)
}

fn referrals_section(summary: &ReferralSummary) -> String {
    [
        format!("Referrals: {}", summary.referrals),
        format!("Business Bucks: {}", summary.business_bucks),
    ]
    .join("\n")
}

/// 脱敏章节报表
pub fn chapter_blinded<Tz>(report: &BlindedChapterReport, as_of: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let section = |title: &str, body: Option<String>, scope: Scope| {
        format!("{}\n{}", title, body.unwrap_or_else(|| unavailable(scope)))
    };

    let sections = [
        format!(
            "📣 Weekly Chapter Performance Report (as of {})\n{}",
            as_of.format(AS_OF_FORMAT),
            report
                .members
                .as_ref()
                .map(members_section)
                .unwrap_or_else(|| unavailable(Scope::Members))
        ),
        section(
            "💬 Social Media",
            report.social_media.as_ref().map(social_media_section),
            Scope::Members,
        ),
        section(
            "🤝 Sessions",
            report.sessions.as_ref().map(sessions_section),
            Scope::Sessions,
        ),
        section(
            "🎟️  Events",
            report.events.as_ref().map(events_section),
            Scope::Events,
        ),
        section(
            "👋 Visitors",
            report.visitors.as_ref().map(visitors_section),
            Scope::Visitors,
        ),
        section(
            "💰 Referrals + Business Bucks",
            report.referrals_and_business_bucks.as_ref().map(referrals_section),
            Scope::Members,
        ),
    ];

    sections.join("\n\n")
}

/// 非脱敏章节报表（姓名列表）
pub fn chapter_unblinded(report: &ChapterPerformanceReport) -> String {
    let names = |list: Option<&Vec<String>>, scope: Scope| match list {
        Some(list) => join_or_none(list),
        None => unavailable(scope),
    };

    let members = report.members.as_ref();
    let referrals = report.referrals_and_business_bucks.as_ref();
    let parts = [
        ("Members List:", names(members.map(|m| &m.members_list), Scope::Members)),
        (
            "Zero Activity Members:",
            names(members.map(|m| &m.zero_activity_list), Scope::Members),
        ),
        (
            "Low Activity Members:",
            names(members.map(|m| &m.low_activity_list), Scope::Members),
        ),
        (
            "Session Submitters:",
            names(report.sessions.as_ref().map(|s| &s.submitted_by), Scope::Sessions),
        ),
        (
            "Event Attendees:",
            names(report.events.as_ref().map(|e| &e.submitted_by), Scope::Events),
        ),
        (
            "Visitors:",
            names(report.visitors.as_ref().map(|v| &v.visitors_list), Scope::Visitors),
        ),
        ("Referrers:", names(referrals.map(|r| &r.referrers), Scope::Members)),
        (
            "Business Bucks Receivers:",
            names(referrals.map(|r| &r.business_bucks_receivers), Scope::Members),
        ),
    ];

    let body: Vec<String> = parts
        .iter()
        .map(|(title, value)| format!("{}\n{}", title, value))
        .collect();
    format!("{}\n\n🔍 Unblinded Data:\n{}", DIVIDER, body.join("\n\n"))
}

/// 脱敏周检查表报表
pub fn checklist_blinded<Tz>(summary: &ChecklistSummary, as_of: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    [
        format!(
            "{}\n\n📣 Weekly Checklist Report (as of {})",
            DIVIDER,
            as_of.format(AS_OF_FORMAT)
        ),
        format!("Total Members: {}", summary.total_members),
        format!(
            "Weekly Checklists Created: {} ({}%)",
            summary.total_checklists, summary.created_percentage
        ),
        format!(
            "Weekly Checklists Missing: {} ({}%)",
            summary.missing_checklists, summary.missing_percentage
        ),
    ]
    .join("\n")
}

pub fn checklist_unblinded(report: &WeeklyChecklistReport) -> String {
    format!(
        "{}\n\n🔍 Unblinded Data:\nMembers List:\n{}\n\nChecklist Submitters:\n{}\n\nMissing Checklists:\n{}",
        DIVIDER,
        join_or_none(&report.members_list),
        join_or_none(&report.submitted_by),
        join_or_none(&report.missing_list),
    )
}
