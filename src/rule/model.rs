//! 规则数据模型定义
//! 仅存储规则数据，无任何匹配逻辑，支持序列化/反序列化

use std::fmt;
use serde::{Deserialize, Serialize};

use super::forum::ForumDirectory;
use crate::error::{SeoRegressionError, SeoResult};

/// 实体类型（规则分组标签）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Post,
    Topic,
    User,
    Group,
    Forum,
    Team,
    /// 无 ID 兜底分组，仅在回退轮次激活
    Noids,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Post => "post",
            EntityType::Topic => "topic",
            EntityType::User => "user",
            EntityType::Group => "group",
            EntityType::Forum => "forum",
            EntityType::Team => "team",
            EntityType::Noids => "noids",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 片段所属字段：ID 模式 / 分页模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentField {
    Pattern,
    Paginate,
}

/// 片段位置：数字之前 / 数字之后
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Before,
    After,
}

/// 正则安全的字面片段（可以包含转义后的元字符，如 `\.html`）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fragment(String);

impl Fragment {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// ID 定位片段：before + 数字 + after
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternFragment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<Fragment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<Fragment>,
}

/// 分页片段与 ID 片段结构相同，例如 `-` + 页码 + `\.html`
pub type PaginationFragment = PatternFragment;

impl PatternFragment {
    /// 空字符串视为缺省
    pub fn new(before: &str, after: &str) -> Self {
        let non_empty = |s: &str| (!s.is_empty()).then(|| Fragment::new(s));
        Self {
            before: non_empty(before),
            after: non_empty(after),
        }
    }

    /// 获取指定位置的片段（空片段按缺省处理）
    pub fn side(&self, side: Side) -> Option<&str> {
        let fragment = match side {
            Side::Before => self.before.as_ref(),
            Side::After => self.after.as_ref(),
        };
        fragment.filter(|f| !f.is_empty()).map(Fragment::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.side(Side::Before).is_none() && self.side(Side::After).is_none()
    }
}

/// 单条还原规则
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default)]
    pub pattern: PatternFragment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paginate: Option<PaginationFragment>,
    /// 原始查询串前缀，例如 `viewtopic.php?t=`
    #[serde(rename = "replacement")]
    pub replacement_prefix: String,
}

impl Rule {
    pub fn new(before: &str, after: &str, replacement_prefix: &str) -> Self {
        Self {
            pattern: PatternFragment::new(before, after),
            paginate: None,
            replacement_prefix: replacement_prefix.to_string(),
        }
    }

    /// 附加分页片段
    pub fn paginated(mut self, before: &str, after: &str) -> Self {
        self.paginate = Some(PaginationFragment::new(before, after));
        self
    }

    pub fn fragment(&self, field: FragmentField, side: Side) -> Option<&str> {
        match field {
            FragmentField::Pattern => self.pattern.side(side),
            FragmentField::Paginate => self.paginate.as_ref().and_then(|p| p.side(side)),
        }
    }

    /// 规则是否至少定义了一个可匹配的片段
    pub fn has_fragments(&self) -> bool {
        !self.pattern.is_empty() || self.paginate.as_ref().is_some_and(|p| !p.is_empty())
    }
}

/// 规则分组（同一实体类型，顺序即平局时的优先级）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleGroup {
    pub entity: EntityType,
    pub rules: Vec<Rule>,
}

/// 整路径字面规则，不携带 ID（如 team.html）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticRule {
    #[serde(rename = "pattern")]
    pub literal_pattern: String,
    pub replacement: String,
}

impl StaticRule {
    pub fn new(literal_pattern: &str, replacement: &str) -> Self {
        Self {
            literal_pattern: literal_pattern.to_string(),
            replacement: replacement.to_string(),
        }
    }
}

/// 完整规则表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTable {
    pub groups: Vec<RuleGroup>,
    #[serde(default)]
    pub static_rules: Vec<StaticRule>,
}

impl RuleTable {
    /// 构建并校验规则表
    pub fn new(groups: Vec<RuleGroup>, static_rules: Vec<StaticRule>) -> SeoResult<Self> {
        let table = Self { groups, static_rules };
        table.validate()?;
        Ok(table)
    }

    /// 从 JSON 解析自定义规则表
    pub fn from_json(json: &str) -> SeoResult<Self> {
        let table: RuleTable = serde_json::from_str(json)?;
        table.validate()?;
        Ok(table)
    }

    /// 校验：所有规则必须有替换前缀；必须存在带分页前缀的 noids 分组
    pub fn validate(&self) -> SeoResult<()> {
        for (entity, ordinal, rule) in self.iter_rules() {
            if rule.replacement_prefix.is_empty() {
                return Err(SeoRegressionError::InvalidRuleTable(format!(
                    "{}{} 缺少 replacement",
                    entity, ordinal
                )));
            }
        }

        if let Some(rule) = self.static_rules.iter().find(|r| r.replacement.is_empty()) {
            return Err(SeoRegressionError::InvalidRuleTable(format!(
                "静态规则 {} 缺少 replacement",
                rule.literal_pattern
            )));
        }

        if self.pagination_before().is_none() {
            return Err(SeoRegressionError::InvalidRuleTable(
                "noids 分组缺失或未定义分页 before 片段".to_string(),
            ));
        }

        Ok(())
    }

    /// 按表顺序遍历 (实体类型, 组内序号, 规则)
    pub fn iter_rules(&self) -> impl Iterator<Item = (EntityType, usize, &Rule)> {
        self.groups.iter().flat_map(|group| {
            group
                .rules
                .iter()
                .enumerate()
                .map(move |(ordinal, rule)| (group.entity, ordinal, rule))
        })
    }

    /// noids 兜底规则（第一条）
    pub fn fallback_rule(&self) -> Option<&Rule> {
        self.groups
            .iter()
            .find(|g| g.entity == EntityType::Noids)
            .and_then(|g| g.rules.first())
    }

    /// noids 兜底规则的分页 before 片段，用于识别虚拟目录分页
    pub fn pagination_before(&self) -> Option<&str> {
        self.fallback_rule()
            .and_then(|rule| rule.fragment(FragmentField::Paginate, Side::Before))
    }
}

/// SEO 设置（由外部重写层导出）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoSettings {
    /// URL 中已去除 ID
    #[serde(default, rename = "rem_ids", alias = "remove_ids")]
    pub remove_ids: bool,
    /// 论坛以虚拟目录形式出现（forum-name/page2.html）
    #[serde(default)]
    pub virtual_folder: bool,
}

/// 运行时数据文件内容：论坛目录 + 设置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeData {
    #[serde(default)]
    pub forum_urls: ForumDirectory,
    #[serde(default)]
    pub settings: SeoSettings,
}
