//! 规则编译器核心
//! 负责把规则片段拼接为组合正则并编译

use std::time::Instant;
use regex::Regex;
use tracing::{debug, warn};

use super::pattern::{CompiledRule, CompiledRuleTable, CompiledStaticRule, RulePatterns};
use crate::error::{SeoRegressionError, SeoResult};
use crate::rule::{EntityType, FragmentField, Rule, RuleTable, Side};

/// 永不匹配的占位模式（同一位置既是单词边界又不是单词边界）
pub const NEVER_MATCH: &str = r"(?:\b\B)";

/// 规则编译器
pub struct RuleCompiler;

impl RuleCompiler {
    /// 编译整张规则表；个别规则编译失败只会禁用该规则
    pub fn compile(table: &RuleTable) -> CompiledRuleTable {
        let start = Instant::now();
        let mut stats = CompileStats::default();

        let rules: Vec<CompiledRule> = table
            .iter_rules()
            .map(|(entity, ordinal, rule)| {
                let patterns = match Self::compile_rule(entity, ordinal, rule) {
                    Ok(patterns) => {
                        stats.compiled += 1;
                        Some(patterns)
                    }
                    Err(e) => {
                        warn!("规则已禁用：{}", e);
                        stats.disabled += 1;
                        None
                    }
                };
                CompiledRule {
                    entity,
                    ordinal,
                    rule: rule.clone(),
                    patterns,
                }
            })
            .collect();

        let static_rules = table
            .static_rules
            .iter()
            .enumerate()
            .filter_map(|(ordinal, rule)| {
                let regex = Self::build_regex(
                    &format!("^/(?:{})$", rule.literal_pattern),
                    &format!("{}{}", EntityType::Team, ordinal),
                );
                match regex {
                    Ok(regex) => {
                        stats.statics += 1;
                        Some(CompiledStaticRule {
                            ordinal,
                            regex,
                            replacement: rule.replacement.clone(),
                        })
                    }
                    Err(e) => {
                        warn!("静态规则已跳过：{}", e);
                        stats.disabled += 1;
                        None
                    }
                }
            })
            .collect();

        debug!("✅ 规则编译完成，总耗时{:?}", start.elapsed());
        debug!(
            "📊 编译统计：ID规则{}条、静态规则{}条、禁用{}条",
            stats.compiled, stats.statics, stats.disabled
        );

        CompiledRuleTable {
            rules,
            static_rules,
            fallback_replacement: table.fallback_rule().map(|r| r.replacement_prefix.clone()),
            pagination_before: table.pagination_before().map(str::to_string),
        }
    }

    /// 编译单条规则的快速检查、ID 提取、分页提取三组正则
    pub fn compile_rule(entity: EntityType, ordinal: usize, rule: &Rule) -> SeoResult<RulePatterns> {
        let name = format!("{}{}", entity, ordinal);
        let before = Self::compose(rule, FragmentField::Pattern, Side::Before);
        let after = Self::compose(rule, FragmentField::Pattern, Side::After);
        let page_before = Self::compose(rule, FragmentField::Paginate, Side::Before);
        let page_after = Self::compose(rule, FragmentField::Paginate, Side::After);

        Ok(RulePatterns {
            quick_check: Self::build_regex(&format!(r"{}\d+", before), &name)?,
            id_pattern: Self::build_regex(&format!(r"{}(?P<id>\d+){}", before, after), &name)?,
            page_pattern: Self::build_regex(
                &format!(r"{}(?P<page>\d+){}", page_before, page_after),
                &name,
            )?,
        })
    }

    /// 生成指定字段/位置的组合片段
    ///
    /// ID 模式的 after 片段在规则带分页时写成二选一：
    /// 要么直接是 after，要么是 分页before + 页码 + after，
    /// 这样一个正则即可同时匹配 topic12.html 与 topic12-30.html。
    /// 片段缺省时返回永不匹配的占位模式。
    pub fn compose(rule: &Rule, field: FragmentField, side: Side) -> String {
        let Some(fragment) = rule.fragment(field, side) else {
            return NEVER_MATCH.to_string();
        };

        let page_before = rule.fragment(FragmentField::Paginate, Side::Before);
        match (field, side, page_before) {
            (FragmentField::Pattern, Side::After, Some(page_before)) => format!(
                r"(?:(?:{after})|(?:{page_before})(?P<page>\d+)(?:{after}))",
                after = fragment,
                page_before = page_before
            ),
            _ => format!("(?:{})", fragment),
        }
    }

    fn build_regex(pattern: &str, rule: &str) -> SeoResult<Regex> {
        Regex::new(pattern).map_err(|source| SeoRegressionError::MalformedFragment {
            rule: rule.to_string(),
            source,
        })
    }
}

/// 编译统计信息
#[derive(Debug, Clone, Default)]
struct CompileStats {
    compiled: usize,
    statics: usize,
    disabled: usize,
}
