//! 工具模块：请求地址拆分与重定向地址拼接
pub mod request_uri;

pub use self::request_uri::{RequestUri, UrlHelper};
