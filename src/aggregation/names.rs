//! 姓名规则：脱敏名、保留角色、占位行、去重排序

use std::cmp::Ordering;

/// 保留的占位账号，不计入成员统计
pub const RESERVED_ROLE: &str = "executive producer";

/// 空表时的占位行
const SENTINEL_PREFIX: &str = "no data";

/// 脱敏名：名 + 空格 + 姓的首字母 + "."
///
/// 只有一个词时原样返回名
pub fn blind_name(full_name: &str) -> String {
    let mut parts = full_name.split_whitespace();
    let first = parts.next().unwrap_or("");
    match parts.next().and_then(|last| last.chars().next()) {
        Some(initial) => format!("{} {}.", first, initial),
        None => first.to_string(),
    }
}

/// 是否为保留角色（接受全名或脱敏名）
pub fn is_reserved_role(name: &str) -> bool {
    let lower = name.trim().to_lowercase();
    lower.starts_with(RESERVED_ROLE) || lower.starts_with("executive p.")
}

/// 是否为"No Data"占位行
pub fn is_sentinel(text: &str) -> bool {
    text.trim().to_lowercase().starts_with(SENTINEL_PREFIX)
}

/// 忽略大小写的字母序，大小写不同的同名再按原文排序保证确定性
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// 按完全相等去重并排序
pub fn sorted_unique<'a, I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut list: Vec<String> = names.into_iter().map(str::to_string).collect();
    list.sort_by(|a, b| compare_names(a, b));
    list.dedup();
    list
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blinds_to_first_name_and_initial() {
        assert_eq!(blind_name("Jane Smith"), "Jane S.");
        assert_eq!(blind_name("  Mary   Ann Lee "), "Mary A.");
        assert_eq!(blind_name("Cher"), "Cher");
        assert_eq!(blind_name("No Data"), "No D.");
    }

    #[test]
    fn recognises_reserved_role_in_either_form() {
        assert!(is_reserved_role("Executive Producer"));
        assert!(is_reserved_role("executive producer Bob"));
        assert!(is_reserved_role("Executive P."));
        assert!(!is_reserved_role("Executive Chef Ann"));
        assert!(!is_reserved_role("Jane D."));
    }

    #[test]
    fn sentinel_is_case_insensitive_prefix() {
        assert!(is_sentinel("No Data"));
        assert!(is_sentinel("no data available in table"));
        assert!(!is_sentinel("Nora Data"));
    }

    #[test]
    fn sorted_unique_orders_case_insensitively() {
        let names = ["bob K.", "Amy L.", "Jane D.", "Amy L.", "Bob K."];
        assert_eq!(
            sorted_unique(names),
            vec!["Amy L.", "Bob K.", "bob K.", "Jane D."]
        );
    }
}
