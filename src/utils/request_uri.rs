//! 请求地址工具
//! 拆分 REQUEST_URI、校验是否允许还原、把原始查询参数并入重定向地址

use url::form_urlencoded;

use crate::error::{SeoRegressionError, SeoResult};

/// 拆分后的请求地址
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestUri {
    /// 原始请求（路径 + 查询串）
    pub raw: String,
    /// 去掉查询串后的路径
    pub base: String,
    /// 解码后的查询参数（保持原顺序）
    pub params: Vec<(String, String)>,
}

impl RequestUri {
    pub fn parse(uri: &str) -> Self {
        let (base, query) = match uri.split_once('?') {
            Some((base, query)) => (base, query),
            None => (uri, ""),
        };

        Self {
            raw: uri.to_string(),
            base: base.to_string(),
            params: form_urlencoded::parse(query.as_bytes()).into_owned().collect(),
        }
    }

    /// 去掉论坛路径前缀，得到以 `/` 开头的相对路径
    pub fn base_uri(&self, script_path: &str) -> SeoResult<String> {
        let Some(rest) = self.base.strip_prefix(script_path) else {
            return Err(SeoRegressionError::NotUnderBasePath(self.base.clone()));
        };

        if rest.starts_with('/') {
            Ok(rest.to_string())
        } else {
            Ok(format!("/{}", rest))
        }
    }
}

/// 地址拼接工具
pub struct UrlHelper;

impl UrlHelper {
    /// 校验相对路径是否允许还原：不能已是 .php 脚本地址，也不能是根路径
    pub fn check_rebuild_allowed(base_uri: &str, php_ext: &str) -> SeoResult<()> {
        if base_uri.contains(&format!(".{}", php_ext)) {
            return Err(SeoRegressionError::CanonicalScript(base_uri.to_string()));
        }
        if base_uri == "/" {
            return Err(SeoRegressionError::RootRequest);
        }
        Ok(())
    }

    /// 把参数并入地址：同名参数以新值覆盖（位置不变），其余追加在后
    pub fn append_url_params(url: &str, params: &[(String, String)]) -> String {
        let (path, query) = match url.split_once('?') {
            Some((path, query)) => (path, query),
            None => (url, ""),
        };

        let mut merged: Vec<(String, String)> =
            form_urlencoded::parse(query.as_bytes()).into_owned().collect();
        for (key, value) in params {
            match merged.iter_mut().find(|(k, _)| k == key) {
                Some(entry) => entry.1 = value.clone(),
                None => merged.push((key.clone(), value.clone())),
            }
        }

        if merged.is_empty() {
            return path.to_string();
        }

        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(merged.iter())
            .finish();
        format!("{}?{}", path, query)
    }

    /// 生成最终重定向地址：根路径 + 还原后的地址 + 原始查询参数
    pub fn redirect_target(root_path: &str, canonical: &str, params: &[(String, String)]) -> String {
        Self::append_url_params(&format!("{}{}", root_path, canonical), params)
    }
}
