//! 规则激活器
//! 两轮筛选：第一轮要求路径中存在该规则可定位的数字ID，回退轮只激活 noids 规则

use tracing::debug;

use crate::compiler::{CompiledRule, CompiledRuleTable};
use crate::rule::EntityType;

/// 本次请求中通过快速检查的规则集合（按规则表顺序）
#[derive(Debug, Clone, Default)]
pub struct ActiveRuleSet<'a> {
    rules: Vec<&'a CompiledRule>,
}

impl<'a> ActiveRuleSet<'a> {
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a CompiledRule> + '_ {
        self.rules.iter().copied()
    }

    /// 规则键列表，例如 ["topic1", "forum0"]
    pub fn keys(&self) -> Vec<String> {
        self.rules.iter().map(|r| r.key()).collect()
    }
}

/// 规则激活器
pub struct RuleActivator;

impl RuleActivator {
    /// 单轮激活
    pub fn activate<'a>(table: &'a CompiledRuleTable, path: &str, ids_required: bool) -> ActiveRuleSet<'a> {
        let rules = table
            .rules
            .iter()
            .filter(|rule| Self::admits(rule, path, ids_required))
            .collect();
        let active = ActiveRuleSet { rules };

        debug!(
            "规则激活（ids_required={}）：{} -> {:?}",
            ids_required,
            path,
            active.keys()
        );
        active
    }

    fn admits(rule: &CompiledRule, path: &str, ids_required: bool) -> bool {
        if !rule.rule.has_fragments() || rule.rule.replacement_prefix.is_empty() {
            return false;
        }

        if ids_required {
            // noids 规则同样要求快速检查通过，不能抢占带ID的规则
            rule.has_id_in(path)
        } else {
            // 回退轮只为 noids 规则而存在
            rule.entity == EntityType::Noids && rule.patterns.is_some()
        }
    }
}
