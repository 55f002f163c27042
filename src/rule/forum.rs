//! 论坛名称目录
//! 论坛名称 → 论坛ID 的查找，以及从路径中剥离论坛名称

use std::fmt;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use super::model::SeoSettings;

// 非虚拟目录模式下论坛地址的后缀（forum-name.html）
const FORUM_URL_SUFFIX: &str = ".html";

/// 查找到的论坛信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForumInfo {
    pub id: u64,
    pub name: String,
    /// 名称在路径中首次出现的位置
    pub position: usize,
}

/// 论坛目录（保持原始顺序，查找时先到先得）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForumDirectory {
    entries: Vec<(u64, String)>,
}

impl ForumDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: u64, name: impl Into<String>) {
        self.entries.push((id, name.into()));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, &str)> {
        self.entries.iter().map(|(id, name)| (*id, name.as_str()))
    }

    /// 返回第一个名称出现在路径中的论坛（子串匹配，不要求落在路径段边界）
    ///
    /// 刻意保持"首个命中"语义：当某个论坛名是另一个的子串时，目录中靠前的条目胜出。
    pub fn resolve_forum(&self, path: &str) -> Option<ForumInfo> {
        self.iter()
            .filter(|(_, name)| !name.is_empty())
            .find_map(|(id, name)| {
                path.find(name).map(|position| ForumInfo {
                    id,
                    name: name.to_string(),
                    position,
                })
            })
    }

    /// 从路径中剥离论坛名称，返回剥离后的路径以及命中的论坛
    ///
    /// - 没有命中论坛：原样返回
    /// - 虚拟目录模式下名称后紧跟分页片段（forum-name/page2.html）：原样返回
    /// - 否则去掉 `名称 + 后缀`（非虚拟目录时后缀为 `.html`）及其之前的全部内容，
    ///   找不到带后缀的形式时只去掉名称及其之前的内容
    pub fn strip_forum_name<'a>(
        &self,
        path: &'a str,
        settings: &SeoSettings,
        pagination_before: Option<&str>,
    ) -> (&'a str, Option<ForumInfo>) {
        let Some(forum) = self.resolve_forum(path) else {
            return (path, None);
        };

        if settings.virtual_folder && Self::followed_by_pagination(path, &forum, pagination_before) {
            debug!("论坛 {} 为虚拟目录分页地址，保留原路径", forum.name);
            return (path, Some(forum));
        }

        let suffix = if settings.virtual_folder { "" } else { FORUM_URL_SUFFIX };
        let with_suffix = format!("{}{}", forum.name, suffix);
        let stripped = match path.find(&with_suffix) {
            Some(pos) => &path[pos + with_suffix.len()..],
            None => &path[forum.position + forum.name.len()..],
        };

        debug!("剥离论坛名称：{} -> {}（论坛ID={}）", path, stripped, forum.id);
        (stripped, Some(forum))
    }

    fn followed_by_pagination(path: &str, forum: &ForumInfo, pagination_before: Option<&str>) -> bool {
        let Some(before) = pagination_before.filter(|b| !b.is_empty()) else {
            return false;
        };
        let rest = &path[forum.position + forum.name.len()..];
        let rest = rest.strip_prefix('/').unwrap_or(rest);
        rest.starts_with(before)
    }
}

impl FromIterator<(u64, String)> for ForumDirectory {
    fn from_iter<T: IntoIterator<Item = (u64, String)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

// ======== 序列化：JSON 对象 {"论坛ID": "论坛名称"}，保持文档顺序 ========
impl Serialize for ForumDirectory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, name) in &self.entries {
            map.serialize_entry(&id.to_string(), name)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ForumDirectory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DirectoryVisitor;

        impl<'de> Visitor<'de> for DirectoryVisitor {
            type Value = ForumDirectory;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("论坛ID到论坛名称的映射")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut directory = ForumDirectory::new();
                while let Some((key, name)) = access.next_entry::<String, String>()? {
                    let id = key
                        .trim()
                        .parse::<u64>()
                        .map_err(|_| <A::Error as de::Error>::custom(format!("无效的论坛ID：{}", key)))?;
                    directory.insert(id, name);
                }
                Ok(directory)
            }
        }

        deserializer.deserialize_map(DirectoryVisitor)
    }
}
