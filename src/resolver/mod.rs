//! 还原模块：规则激活、ID 提取、胜出者选择与整体流程
pub mod activator;
pub mod extractor;
pub mod selector;
pub mod resolver;
pub mod global;

// 导出核心接口
pub use self::activator::{ActiveRuleSet, RuleActivator};
pub use self::extractor::{ExtractionRecord, IdExtractor};
pub use self::selector::{UrlBuilder, WinnerSelector};
pub use self::resolver::UrlResolver;
pub use self::global::{init_seo_regression, init_seo_regression_with_config, seo_regression};
