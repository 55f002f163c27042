//! 胜出者选择与地址拼接

use super::extractor::ExtractionRecord;

/// 胜出者选择器
pub struct WinnerSelector;

impl WinnerSelector {
    /// 偏移量严格更大才替换当前胜出者，偏移相同时保留规则表中靠前的记录
    pub fn select(records: Vec<ExtractionRecord>) -> Option<ExtractionRecord> {
        records.into_iter().fold(None, |winner, record| match winner {
            Some(current) if record.offset <= current.offset => Some(current),
            _ => Some(record),
        })
    }
}

/// 原始地址拼接
pub struct UrlBuilder;

impl UrlBuilder {
    /// `前缀 + ID`，页码大于 0 时追加 `&start=页码`
    pub fn build(replacement_prefix: &str, id: u64, page_number: u64) -> String {
        if page_number > 0 {
            format!("{}{}&start={}", replacement_prefix, id, page_number)
        } else {
            format!("{}{}", replacement_prefix, id)
        }
    }
}
