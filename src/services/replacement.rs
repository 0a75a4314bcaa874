//! 替换策略引擎 - 业务能力层
//!
//! 把用户选择的策略翻译成确定的「符号 → 替换文本」映射。
//!
//! 底层的选择容器本可以多选，这里用 `PolicySelection` 包一层，
//! 由引擎维护「至多一个策略被选中」的不变量，调用方无法构造多选状态。

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::models::PunctuationCatalog;

/// 替换策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplacementPolicy {
    /// 只去掉停顿符号
    OnlyPauseSymbols,
    /// 去掉全部标点
    AllPunctuation,
}

impl ReplacementPolicy {
    /// 界面上显示的名称
    pub fn label(self) -> &'static str {
        match self {
            ReplacementPolicy::OnlyPauseSymbols => "Only Remove Pause Symbols",
            ReplacementPolicy::AllPunctuation => "Remove All Punctuation Marks",
        }
    }
}

impl std::str::FromStr for ReplacementPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pause" | "only_remove_pause_symbols" => Ok(ReplacementPolicy::OnlyPauseSymbols),
            "all" | "remove_all_punctuation_marks" => Ok(ReplacementPolicy::AllPunctuation),
            other => Err(format!("未知的替换策略: {}", other)),
        }
    }
}

/// 当前选择
///
/// 要么恰好一个策略，要么显式的「未选择」。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicySelection {
    active: Option<ReplacementPolicy>,
}

impl PolicySelection {
    /// 挂载时的默认选择：只去掉停顿符号
    pub fn new() -> Self {
        Self::with(ReplacementPolicy::OnlyPauseSymbols)
    }

    pub fn with(policy: ReplacementPolicy) -> Self {
        Self {
            active: Some(policy),
        }
    }

    /// 显式的「未选择」状态，对应空替换表
    pub fn none() -> Self {
        Self { active: None }
    }

    pub fn active(&self) -> Option<ReplacementPolicy> {
        self.active
    }

    pub fn is_selected(&self, policy: ReplacementPolicy) -> bool {
        self.active == Some(policy)
    }

    /// 勾选 / 取消勾选某个策略，就地更新
    pub fn toggle(&mut self, policy: ReplacementPolicy, checked: bool) {
        *self = select_policy(*self, policy, checked);
    }

    /// 当前选择的显示文本
    pub fn label(&self) -> &'static str {
        self.active.map(ReplacementPolicy::label).unwrap_or("None")
    }
}

impl Default for PolicySelection {
    fn default() -> Self {
        Self::new()
    }
}

/// 计算新的选择
///
/// - 勾选：结果只包含被勾选的策略
/// - 取消勾选：总是空操作。取消唯一选中的策略会被忽略；
///   取消一个本来就没选中的策略也不会改变任何状态
pub fn select_policy(
    current: PolicySelection,
    requested: ReplacementPolicy,
    checked: bool,
) -> PolicySelection {
    if checked {
        PolicySelection::with(requested)
    } else {
        current
    }
}

/// 符号 → 替换文本
///
/// 使用 `BTreeMap`，序列化结果与构造顺序无关。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ReplacementMap(BTreeMap<String, String>);

impl ReplacementMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, symbol: impl Into<String>, replacement: impl Into<String>) {
        self.0.insert(symbol.into(), replacement.into());
    }

    pub fn get(&self, symbol: &str) -> Option<&str> {
        self.0.get(symbol).map(String::as_str)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.0.contains_key(symbol)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 序列化为表单字段使用的 JSON 字符串
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// 在本地执行同样的替换，用于预览
    ///
    /// 每个位置优先匹配最长的键；空键被忽略。
    pub fn apply(&self, text: &str) -> String {
        let mut keys: Vec<(&str, &str)> = self
            .0
            .iter()
            .filter(|(k, _)| !k.is_empty())
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        keys.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        let mut output = String::with_capacity(text.len());
        let mut rest = text;
        'outer: while let Some(ch) = rest.chars().next() {
            for (key, replacement) in &keys {
                if rest.starts_with(key) {
                    output.push_str(replacement);
                    rest = &rest[key.len()..];
                    continue 'outer;
                }
            }
            output.push(ch);
            rest = &rest[ch.len_utf8()..];
        }
        output
    }
}

impl fmt::Display for ReplacementMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<&str> = self.keys().collect();
        write!(f, "[{}]", keys.join(" "))
    }
}

/// 根据策略生成替换表，所有值都是空串
pub fn build_map(policy: ReplacementPolicy, catalog: &PunctuationCatalog) -> ReplacementMap {
    let mut map = ReplacementMap::new();
    match policy {
        ReplacementPolicy::OnlyPauseSymbols => {
            for symbol in catalog.pause_symbols() {
                map.insert(symbol, "");
            }
        }
        ReplacementPolicy::AllPunctuation => {
            for symbol in catalog.all_punctuation() {
                map.insert(symbol, "");
            }
        }
    }
    map
}

/// 根据当前选择生成替换表，未选择时返回空表
pub fn build_map_for_selection(
    selection: &PolicySelection,
    catalog: &PunctuationCatalog,
) -> ReplacementMap {
    selection
        .active()
        .map(|policy| build_map(policy, catalog))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_prefers_longest_key() {
        let mut map = ReplacementMap::new();
        map.insert("-", "");
        map.insert("--", "—");
        assert_eq!(map.apply("a--b-c"), "a—bc");
    }

    #[test]
    fn test_apply_keeps_unmatched_multibyte() {
        let mut map = ReplacementMap::new();
        map.insert("，", "");
        assert_eq!(map.apply("你好，世界"), "你好世界");
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!(
            "pause".parse::<ReplacementPolicy>().unwrap(),
            ReplacementPolicy::OnlyPauseSymbols
        );
        assert_eq!(
            "ALL".parse::<ReplacementPolicy>().unwrap(),
            ReplacementPolicy::AllPunctuation
        );
        assert!("some".parse::<ReplacementPolicy>().is_err());
    }
}
