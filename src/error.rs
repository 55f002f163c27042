//! 全局错误类型定义
//! 所有失败最终都归结为"不重写"（NoRewrite），没有任何一种会中断宿主进程

use thiserror::Error;
use regex::Error as RegexError;
use serde_json::Error as SerdeJsonError;
use std::io::Error as IoError;

#[derive(Error, Debug)]
pub enum SeoRegressionError {
    // 入口校验（不属于真正的错误，仅表示该请求不归本引擎处理）
    #[error("请求路径不在论坛目录下：{0}")]
    NotUnderBasePath(String),
    #[error("请求已是原始脚本地址：{0}")]
    CanonicalScript(String),
    #[error("根路径请求无需还原")]
    RootRequest,

    // 还原流程
    #[error("没有任何规则被激活：{0}")]
    NoActiveRule(String),
    #[error("未能提取到ID：{0}")]
    NoIdFound(String),
    #[error("规则 {rule} 提取的数字超出范围：{digits}")]
    InvalidNumber { rule: String, digits: String },

    // 规则相关错误
    #[error("规则片段无法编译（{rule}）：{source}")]
    MalformedFragment {
        rule: String,
        #[source]
        source: RegexError,
    },
    #[error("规则表无效：{0}")]
    InvalidRuleTable(String),

    // 运行时数据
    #[error("运行时数据加载失败：{0}")]
    RuntimeLoadError(String),
    #[error("引擎未初始化")]
    EngineNotInitialized,

    // 序列化/反序列化错误
    #[error("JSON解析失败：{0}")]
    JsonError(#[from] SerdeJsonError),

    // 基础错误
    #[error("IO操作失败：{0}")]
    IoError(#[from] IoError),
}

// 全局Result类型
pub type SeoResult<T> = Result<T, SeoRegressionError>;
