//! ID 提取器
//! 对每条激活规则做全局匹配，只取最右侧（偏移最大）的一次匹配

use tracing::{debug, warn};

use crate::compiler::CompiledRule;
use crate::error::{SeoRegressionError, SeoResult};
use crate::rule::FragmentField;

/// 单条规则的提取结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRecord {
    /// 规则键（仅用于日志）
    pub rule_key: String,
    /// 实体ID；分页模式或ID为 0 时为 None
    pub entity_id: Option<u64>,
    /// 分页起始值，0 表示无分页
    pub page_number: u64,
    pub replacement_prefix: String,
    /// 最右侧匹配在路径中的起始位置，仅用于排序
    pub offset: usize,
}

/// ID 提取器
pub struct IdExtractor;

impl IdExtractor {
    /// 提取单条规则；`field` 为 Pattern 时读取 ID（及可选页码），为 Paginate 时只读取页码
    ///
    /// 数字超出 u64 范围时返回错误，整个请求不再重写
    pub fn extract(path: &str, rule: &CompiledRule, field: FragmentField) -> SeoResult<Option<ExtractionRecord>> {
        let Some(regex) = rule.extraction_pattern(field) else {
            return Ok(None);
        };

        // 路径前段的论坛/分类名称也可能带数字，取最后一次匹配可减少误判
        let Some(caps) = regex.captures_iter(path).last() else {
            return Ok(None);
        };
        let Some(whole) = caps.get(0) else {
            return Ok(None);
        };

        let entity_id = match field {
            FragmentField::Pattern => {
                let Some(id) = caps.name("id") else {
                    return Ok(None);
                };
                Some(Self::parse_number(rule, id.as_str())?).filter(|id| *id > 0)
            }
            FragmentField::Paginate => None,
        };

        let page_number = match caps.name("page") {
            Some(page) => Self::parse_number(rule, page.as_str())?,
            None => 0,
        };

        let record = ExtractionRecord {
            rule_key: rule.key(),
            entity_id,
            page_number,
            replacement_prefix: rule.replacement_prefix().to_string(),
            offset: whole.start(),
        };
        debug!("规则 {} 提取结果：{:?}", record.rule_key, record);
        Ok(Some(record))
    }

    /// 对一组规则依次提取，保持规则顺序
    pub fn extract_all<'a>(
        path: &str,
        rules: impl IntoIterator<Item = &'a CompiledRule>,
        field: FragmentField,
    ) -> SeoResult<Vec<ExtractionRecord>> {
        rules
            .into_iter()
            .filter_map(|rule| Self::extract(path, rule, field).transpose())
            .collect()
    }

    // 前导零按数值归一化：post007 → p=7
    fn parse_number(rule: &CompiledRule, digits: &str) -> SeoResult<u64> {
        digits.parse::<u64>().map_err(|e| {
            warn!("规则 {} 提取的数字无效：{}（{}）", rule.key(), digits, e);
            SeoRegressionError::InvalidNumber {
                rule: rule.key(),
                digits: digits.to_string(),
            }
        })
    }
}
