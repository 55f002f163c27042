//! 全局还原器单例管理
use once_cell::sync::Lazy;
use std::sync::Arc;
use tokio::sync::OnceCell;

use super::resolver::UrlResolver;
use crate::config::{ConfigManager, GlobalConfig};
use crate::error::{SeoRegressionError, SeoResult};

/// 全局还原器实例（进程内只加载一次运行时数据，之后只读）
static GLOBAL_RESOLVER: Lazy<Arc<OnceCell<UrlResolver>>> = Lazy::new(|| {
    Arc::new(OnceCell::new())
});

/// 初始化全局还原器（默认配置）
pub async fn init_seo_regression() -> SeoResult<()> {
    init_seo_regression_with_config(ConfigManager::get_default()).await
}

/// 带自定义配置初始化全局还原器，重复调用时保留第一次的实例
pub async fn init_seo_regression_with_config(config: GlobalConfig) -> SeoResult<()> {
    GLOBAL_RESOLVER
        .get_or_try_init(|| UrlResolver::from_config(config))
        .await?;
    Ok(())
}

/// 获取全局还原器
pub(crate) fn get_global_resolver() -> SeoResult<&'static UrlResolver> {
    GLOBAL_RESOLVER.get()
        .ok_or(SeoRegressionError::EngineNotInitialized)
}

/// 使用全局还原器计算重定向目标；`None` 表示不重写
pub fn seo_regression(request_uri: &str) -> SeoResult<Option<String>> {
    Ok(get_global_resolver()?.redirect_target(request_uri))
}
