//! 编译模块：将规则片段编译为可执行的正则模式
pub mod pattern;
pub mod compiler;

pub use self::pattern::{CompiledRule, CompiledRuleTable, CompiledStaticRule, RulePatterns};
pub use self::compiler::{RuleCompiler, NEVER_MATCH};
