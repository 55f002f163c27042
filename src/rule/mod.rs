//! 规则模块：负责规则表、论坛目录、运行时数据的模型定义与加载
pub mod model;
pub mod builtin;
pub mod forum;
pub mod loader;

// 导出核心接口
pub use self::model::{
    EntityType, Fragment, FragmentField, PaginationFragment, PatternFragment, Rule, RuleGroup,
    RuleTable, RuntimeData, SeoSettings, Side, StaticRule,
};
pub use self::forum::{ForumDirectory, ForumInfo};
pub use self::loader::RuntimeLoader;
