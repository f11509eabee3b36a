//! 成员聚合：成员列表、活跃度分级、社交媒体、推荐与 Business Bucks
//!
//! 三个片段都来自同一组 `unique_members`，不会出现两次过滤结果不一致。

use tracing::info;

use super::names::{compare_names, is_reserved_role, sorted_unique};
use super::numbers::{average, round_to, DEFAULT_PRECISION};
use crate::error::ValidationError;
use crate::models::{
    MemberActivity, MemberReport, MemberSummary, ReferralReport, ReferralSummary, RoundsOfPosts,
    SocialMediaReport,
};

/// 成员报表域产出的三个片段
#[derive(Debug, Clone, PartialEq)]
pub struct MemberAggregate {
    pub members: MemberReport,
    pub social_media: SocialMediaReport,
    pub referrals: ReferralReport,
}

/// 去掉占位行和保留角色，按整条记录去重，再按脱敏名排序
pub fn unique_members(records: &[MemberActivity]) -> Vec<&MemberActivity> {
    let mut unique: Vec<&MemberActivity> = Vec::new();
    for record in records
        .iter()
        .filter(|r| !r.is_sentinel() && !is_reserved_role(&r.full_name))
    {
        if !unique.iter().any(|u| *u == record) {
            unique.push(record);
        }
    }
    unique.sort_by(|a, b| compare_names(&a.name, &b.name));
    unique
}

/// 每个脱敏名的活跃度合计（输入已按脱敏名排序）
fn totals_by_name<'a>(members: &[&'a MemberActivity]) -> Vec<(&'a str, f64)> {
    let mut totals: Vec<(&'a str, f64)> = Vec::new();
    for &member in members {
        match totals.last_mut() {
            Some(last) if last.0 == member.name => last.1 += member.total(),
            _ => totals.push((member.name.as_str(), member.total())),
        }
    }
    totals
}

pub fn aggregate_members(records: &[MemberActivity]) -> Result<MemberAggregate, ValidationError> {
    let members = unique_members(records);
    let members_list = sorted_unique(members.iter().map(|m| m.name.as_str()));
    let total_members = members_list.len();

    if total_members == 0 {
        return Err(ValidationError::ZeroDenominator {
            context: "成员总数",
        });
    }

    // 同一脱敏名只归入一个活跃度档位
    let totals = totals_by_name(&members);
    let zero_activity_list: Vec<String> = totals
        .iter()
        .filter(|(_, total)| *total == 0.0)
        .map(|(name, _)| name.to_string())
        .collect();
    let low_activity_list: Vec<String> = totals
        .iter()
        .filter(|(_, total)| *total == 1.0)
        .map(|(name, _)| name.to_string())
        .collect();

    info!(
        "成员统计: 共 {} 人, 零活跃 {} 人, 低活跃 {} 人",
        total_members,
        zero_activity_list.len(),
        low_activity_list.len()
    );

    let social_media = social_media(&members, total_members)?;
    let referrals = referrals(&members)?;

    Ok(MemberAggregate {
        members: MemberReport {
            summary: MemberSummary {
                total_members,
                zero_activity: zero_activity_list.len(),
                low_activity: low_activity_list.len(),
            },
            members_list,
            zero_activity_list,
            low_activity_list,
        },
        social_media,
        referrals,
    })
}

fn social_media(
    members: &[&MemberActivity],
    total_members: usize,
) -> Result<SocialMediaReport, ValidationError> {
    let total_posts: u64 = members.iter().map(|m| u64::from(m.posts)).sum();
    let avg_posts_per_member = average(total_posts as f64, total_members, "每位成员平均帖子数")?;
    let rounds = avg_posts_per_member / total_members as f64;

    Ok(SocialMediaReport {
        total_posts,
        avg_posts_per_member,
        avg_rounds_of_posts: RoundsOfPosts {
            raw: round_to(rounds, DEFAULT_PRECISION)?,
            rounded: rounds.floor() as u32,
        },
    })
}

fn referrals(members: &[&MemberActivity]) -> Result<ReferralReport, ValidationError> {
    let referrers: Vec<&&MemberActivity> = members.iter().filter(|m| m.referrals > 0).collect();
    let receivers: Vec<&&MemberActivity> = members.iter().filter(|m| m.business_bucks > 0.0).collect();

    let business_bucks: f64 = receivers.iter().map(|m| m.business_bucks).sum();

    Ok(ReferralReport {
        summary: ReferralSummary {
            referrals: referrers.iter().map(|m| u64::from(m.referrals)).sum(),
            business_bucks: round_to(business_bucks, DEFAULT_PRECISION)?,
        },
        referrers: sorted_unique(referrers.iter().map(|m| m.name.as_str())),
        business_bucks_receivers: sorted_unique(receivers.iter().map(|m| m.name.as_str())),
    })
}
