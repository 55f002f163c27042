//! 运行时数据加载管理器
//! 负责读取外部重写层导出的论坛目录与设置，以及可选的自定义规则表

use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

use super::model::{RuleTable, RuntimeData};
use crate::config::GlobalConfig;
use crate::error::{SeoRegressionError, SeoResult};

/// 运行时数据加载管理器
pub struct RuntimeLoader;

impl RuntimeLoader {
    /// 按配置加载运行时数据；文件不存在时返回空目录与默认设置
    pub async fn load(config: &GlobalConfig) -> SeoResult<RuntimeData> {
        Self::load_from_path(&config.runtime_file).await
    }

    pub async fn load_from_path(path: &Path) -> SeoResult<RuntimeData> {
        let raw = match tokio::fs::read(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("运行时数据文件不存在：{}，使用空论坛目录", path.display());
                return Ok(RuntimeData::default());
            }
            Err(e) => return Err(e.into()),
        };

        let runtime = Self::parse(&raw).map_err(|e| {
            SeoRegressionError::RuntimeLoadError(format!("{}：{}", path.display(), e))
        })?;

        debug!(
            "运行时数据加载成功，论坛数：{}，rem_ids={}，virtual_folder={}",
            runtime.forum_urls.len(),
            runtime.settings.remove_ids,
            runtime.settings.virtual_folder
        );
        Ok(runtime)
    }

    /// 解析运行时数据 JSON
    pub fn parse(raw: &[u8]) -> SeoResult<RuntimeData> {
        Ok(serde_json::from_slice(raw)?)
    }

    /// 加载自定义规则表（JSON），加载后立即校验
    pub async fn load_rule_table(path: &Path) -> SeoResult<RuleTable> {
        let raw = tokio::fs::read_to_string(path).await?;
        let table = RuleTable::from_json(&raw)?;
        debug!("自定义规则表加载成功：{}，规则数：{}", path.display(), table.iter_rules().count());
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("seo_regression_{}_{}", std::process::id(), name));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_parse_runtime_data() {
        let raw = br#"{"forum_urls": {"7": "forum", "12": "general-chat"}, "settings": {"rem_ids": false, "virtual_folder": true}}"#;
        let runtime = RuntimeLoader::parse(raw).unwrap();

        assert_eq!(runtime.forum_urls.len(), 2);
        assert_eq!(runtime.forum_urls.resolve_forum("/general-chat/").map(|f| f.id), Some(12));
        assert!(runtime.settings.virtual_folder);
        assert!(!runtime.settings.remove_ids);
    }

    #[test]
    fn test_parse_without_settings_uses_defaults() {
        let runtime = RuntimeLoader::parse(br#"{"forum_urls": {"1": "news"}}"#).unwrap();
        assert_eq!(runtime.settings, Default::default());
    }

    #[tokio::test]
    async fn test_missing_file_yields_empty_runtime() {
        let path = std::env::temp_dir().join("seo_regression_does_not_exist.json");
        let runtime = RuntimeLoader::load_from_path(&path).await.unwrap();
        assert!(runtime.forum_urls.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_file_is_reported() {
        let path = temp_file("invalid.json", "{ not json");
        let err = RuntimeLoader::load_from_path(&path).await.unwrap_err();
        assert!(matches!(err, SeoRegressionError::RuntimeLoadError(_)));
        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_load_rule_table_file() {
        let table_json = serde_json::to_string(&RuleTable::builtin()).unwrap();
        let path = temp_file("rules.json", &table_json);
        let table = RuntimeLoader::load_rule_table(&path).await.unwrap();
        assert_eq!(table, RuleTable::builtin());
        let _ = std::fs::remove_file(path);
    }
}
