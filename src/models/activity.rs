//! 活动记录 - 一行表格数据解析出的不可变值
//!
//! 每种报表域一个结构体，都同时保留原始全名和脱敏名（"Jane S."）。
//! `from_row` 只负责按列取值，排除/分类规则在 `aggregation` 中。

use serde::Serialize;

use crate::aggregation::names::{blind_name, is_sentinel};

/// 一行原始单元格文本（已去除首尾空白）
pub type RawRow = Vec<String>;

fn cell(cells: &[String], index: usize) -> &str {
    cells.get(index).map(|s| s.trim()).unwrap_or("")
}

/// 占位行可能只有一个合并单元格，列数检查只针对真实记录
fn check_shape(cells: &[String], required: usize) -> Result<(), String> {
    let first = cell(cells, 0);
    if is_sentinel(first) {
        return Ok(());
    }
    if cells.len() < required {
        return Err(format!("需要至少 {} 列，实际 {} 列", required, cells.len()));
    }
    if first.is_empty() {
        return Err("姓名列为空".to_string());
    }
    Ok(())
}

/// 按 parseInt 语义读取计数：只取开头的数字，读不到时为 0，超出范围时取 `u32::MAX`
pub fn parse_count(text: &str) -> u32 {
    let digits: String = text
        .trim()
        .trim_start_matches('+')
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(u32::MAX)
}

/// 读取金额：忽略货币符号和千分位，读不到或为负时为 0
pub fn parse_amount(text: &str) -> f64 {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();
    let numeric: String = cleaned
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    match numeric.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => value,
        _ => 0.0,
    }
}

/// 成员活跃度（SM Report 一行）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberActivity {
    pub full_name: String,
    pub first_name: String,
    pub last_name: String,
    /// 脱敏名
    pub name: String,
    pub sessions: u32,
    pub referrals: u32,
    pub business_bucks: f64,
    pub event_attendance: u32,
    pub posts: u32,
    pub visitors: u32,
}

impl MemberActivity {
    /// 列布局：0 姓名, 3 Business Bucks, 4 推荐, 5 访客, 6 会面, 7 活动出席, 8 帖子
    pub fn from_row(cells: &[String]) -> Result<Self, String> {
        check_shape(cells, 9)?;

        let full_name = cell(cells, 0).to_string();
        let mut parts = full_name.split_whitespace();
        let first_name = parts.next().unwrap_or("").to_string();
        let last_name = parts.collect::<Vec<_>>().join(" ");

        Ok(Self {
            name: blind_name(&full_name),
            full_name,
            first_name,
            last_name,
            business_bucks: parse_amount(cell(cells, 3)),
            referrals: parse_count(cell(cells, 4)),
            visitors: parse_count(cell(cells, 5)),
            sessions: parse_count(cell(cells, 6)),
            event_attendance: parse_count(cell(cells, 7)),
            posts: parse_count(cell(cells, 8)),
        })
    }

    /// 所有计入活跃度的字段之和
    pub fn total(&self) -> f64 {
        let counts = [
            self.sessions,
            self.referrals,
            self.event_attendance,
            self.posts,
            self.visitors,
        ];
        counts.into_iter().map(f64::from).sum::<f64>() + self.business_bucks
    }

    pub fn is_sentinel(&self) -> bool {
        is_sentinel(&self.full_name)
    }
}

/// 会面记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionActivity {
    pub submitted_by: String,
    pub submitted_by_name: String,
    pub session_with: String,
    pub session_type: String,
}

impl SessionActivity {
    /// 列布局：0 提交人, 1 会面对象, 2 类型
    pub fn from_row(cells: &[String]) -> Result<Self, String> {
        check_shape(cells, 3)?;
        let submitted_by = cell(cells, 0).to_string();
        Ok(Self {
            submitted_by_name: blind_name(&submitted_by),
            submitted_by,
            session_with: cell(cells, 1).to_string(),
            session_type: cell(cells, 2).to_string(),
        })
    }

    pub fn is_sentinel(&self) -> bool {
        is_sentinel(&self.submitted_by)
    }
}

/// 活动出席记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventActivity {
    pub attending_member: String,
    pub attending_member_name: String,
    pub event_by: String,
    pub event_type: String,
}

impl EventActivity {
    /// 列布局：0 出席成员, 1 主办人, 2 类型
    pub fn from_row(cells: &[String]) -> Result<Self, String> {
        check_shape(cells, 3)?;
        let attending_member = cell(cells, 0).to_string();
        Ok(Self {
            attending_member_name: blind_name(&attending_member),
            attending_member,
            event_by: cell(cells, 1).to_string(),
            event_type: cell(cells, 2).to_string(),
        })
    }

    pub fn is_sentinel(&self) -> bool {
        is_sentinel(&self.attending_member)
    }
}

/// 访客（非成员，只保留原名）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisitorEntry {
    pub name: String,
}

impl VisitorEntry {
    pub fn from_row(cells: &[String]) -> Result<Self, String> {
        check_shape(cells, 1)?;
        Ok(Self {
            name: cell(cells, 0).to_string(),
        })
    }

    pub fn is_sentinel(&self) -> bool {
        is_sentinel(&self.name)
    }
}

/// 周检查表条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistEntry {
    pub member: String,
    pub member_name: String,
    pub date: String,
}

impl ChecklistEntry {
    /// 列布局：0 成员, 2 日期
    pub fn from_row(cells: &[String]) -> Result<Self, String> {
        check_shape(cells, 3)?;
        let member = cell(cells, 0).to_string();
        Ok(Self {
            member_name: blind_name(&member),
            member,
            date: cell(cells, 2).to_string(),
        })
    }

    pub fn is_sentinel(&self) -> bool {
        is_sentinel(&self.member)
    }
}
