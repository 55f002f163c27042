//! seo-regression - 伪静态论坛地址还原工具
//!
//! 根据外部 SEO 重写层的地址约定（规则表）和论坛名称目录，
//! 把 post12346.html、topic1234-60.html 这类地址还原为 viewtopic.php?p=12346 等原始地址。

// 导出全局错误类型
pub use self::error::{SeoRegressionError, SeoResult};

// 导出配置模块
pub use self::config::{GlobalConfig, ConfigManager, CustomConfigBuilder};

// 导出规则模块核心接口
pub use self::rule::{
    EntityType, Fragment, PatternFragment, PaginationFragment, Rule, RuleGroup, RuleTable,
    StaticRule, ForumDirectory, ForumInfo, SeoSettings, RuntimeData, RuntimeLoader,
};

// 导出编译模块核心接口
pub use self::compiler::{CompiledRule, CompiledRuleTable, RuleCompiler};

// 导出工具模块核心接口
pub use self::utils::{RequestUri, UrlHelper};

// 导出还原模块核心接口
pub use self::resolver::{
    UrlResolver,
    ActiveRuleSet,
    ExtractionRecord,
    init_seo_regression,
    init_seo_regression_with_config,
    seo_regression,
};

// 声明所有子模块
pub mod config;
pub mod error;
pub mod rule;
pub mod utils;
pub mod compiler;
pub mod resolver;
