use serde::Serialize;

/// 报表域（一个被抓取的数据页面）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scope {
    /// 成员活跃度（SM Report）
    Members,
    /// 会面记录
    Sessions,
    /// 活动记录
    Events,
    /// 访客
    Visitors,
    /// 周检查表
    WeeklyChecklist,
}

/// 页面中目标数据表的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TablePosition {
    First,
    Last,
}

impl TablePosition {
    pub fn as_js(self) -> &'static str {
        match self {
            TablePosition::First => "first",
            TablePosition::Last => "last",
        }
    }
}

impl Scope {
    /// 日志/错误中使用的短标签
    pub fn label(self) -> &'static str {
        match self {
            Scope::Members => "members",
            Scope::Sessions => "sessions",
            Scope::Events => "events",
            Scope::Visitors => "visitors",
            Scope::WeeklyChecklist => "weekly-checklist",
        }
    }

    /// 后台页面名称
    pub fn page_title(self) -> &'static str {
        match self {
            Scope::Members => "SM Report",
            Scope::Sessions => "Session Report",
            Scope::Events => "Event Report",
            Scope::Visitors => "Visitor Report",
            Scope::WeeklyChecklist => "Weekly Checklist",
        }
    }

    /// 成员页和访客页只有一张表，其余页面的数据在最后一张表
    pub fn table_position(self) -> TablePosition {
        match self {
            Scope::Members | Scope::Visitors => TablePosition::First,
            Scope::Sessions | Scope::Events | Scope::WeeklyChecklist => TablePosition::Last,
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
