//! 编译后模式模型
//! 正则编译后的结构，引擎构建后只读

use regex::Regex;

use crate::rule::{EntityType, FragmentField, Rule};

/// 单条规则编译出的三组正则
#[derive(Debug, Clone)]
pub struct RulePatterns {
    /// 快速检查：before 片段后紧跟数字
    pub quick_check: Regex,
    /// ID 提取：before + (?P<id>数字) + after（after 可同时匹配分页后缀）
    pub id_pattern: Regex,
    /// 分页提取：分页 before + (?P<page>数字) + 分页 after
    pub page_pattern: Regex,
}

/// 编译后的规则
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub entity: EntityType,
    /// 组内序号
    pub ordinal: usize,
    pub rule: Rule,
    /// 片段无法编译时为 None，该规则永远不会匹配
    pub patterns: Option<RulePatterns>,
}

impl CompiledRule {
    /// 规则键，例如 `topic1`、`noids0`
    pub fn key(&self) -> String {
        format!("{}{}", self.entity, self.ordinal)
    }

    pub fn replacement_prefix(&self) -> &str {
        &self.rule.replacement_prefix
    }

    /// 路径中是否存在该规则可定位的数字ID
    pub fn has_id_in(&self, path: &str) -> bool {
        self.patterns
            .as_ref()
            .is_some_and(|p| p.quick_check.is_match(path))
    }

    /// 按模式取出对应的提取正则
    pub fn extraction_pattern(&self, field: FragmentField) -> Option<&Regex> {
        self.patterns.as_ref().map(|p| match field {
            FragmentField::Pattern => &p.id_pattern,
            FragmentField::Paginate => &p.page_pattern,
        })
    }
}

/// 编译后的整路径静态规则（team 分组）
#[derive(Debug, Clone)]
pub struct CompiledStaticRule {
    /// 在静态规则列表中的序号
    pub ordinal: usize,
    pub regex: Regex,
    pub replacement: String,
}

impl CompiledStaticRule {
    /// 规则键，例如 `team0`
    pub fn key(&self) -> String {
        format!("{}{}", EntityType::Team, self.ordinal)
    }
}

/// 编译后的规则表
#[derive(Debug, Clone)]
pub struct CompiledRuleTable {
    /// 按规则表顺序展开的全部规则
    pub rules: Vec<CompiledRule>,
    pub static_rules: Vec<CompiledStaticRule>,
    /// noids 兜底替换前缀
    pub fallback_replacement: Option<String>,
    /// noids 分页 before 片段
    pub pagination_before: Option<String>,
}
