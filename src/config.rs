//! 全局配置管理,存储所有可配置项

use std::path::PathBuf;

/// 全局配置
#[derive(Debug, Clone)]
pub struct GlobalConfig {
    // 论坛所在路径（phpBB 的 script_path），只处理该前缀下的请求
    pub script_path: String,
    // 重定向目标的根路径（拼接在还原后的 URL 前）
    pub root_path: String,
    // 原始脚本扩展名，已是 .php 的请求不再处理
    pub php_ext: String,
    // 运行时数据文件（论坛名称目录 + SEO 设置）
    pub runtime_file: PathBuf,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            script_path: "/".to_string(),
            root_path: "/".to_string(),
            php_ext: "php".to_string(),
            runtime_file: PathBuf::from("phpbb_cache.json"),
        }
    }
}

/// 配置管理器（单例）
pub struct ConfigManager;

impl ConfigManager {
    /// 获取默认配置
    pub fn get_default() -> GlobalConfig {
        GlobalConfig::default()
    }

    /// 自定义配置
    pub fn custom() -> CustomConfigBuilder {
        CustomConfigBuilder::new()
    }
}

/// 配置构建器（便于自定义配置）
#[derive(Debug, Clone)]
pub struct CustomConfigBuilder {
    config: GlobalConfig,
}

impl Default for CustomConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CustomConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: GlobalConfig::default(),
        }
    }

    pub fn script_path(mut self, path: impl Into<String>) -> Self {
        self.config.script_path = path.into();
        self
    }

    pub fn root_path(mut self, path: impl Into<String>) -> Self {
        self.config.root_path = path.into();
        self
    }

    pub fn php_ext(mut self, ext: impl Into<String>) -> Self {
        self.config.php_ext = ext.into();
        self
    }

    pub fn runtime_file(mut self, path: PathBuf) -> Self {
        self.config.runtime_file = path;
        self
    }

    pub fn build(self) -> GlobalConfig {
        self.config
    }
}
