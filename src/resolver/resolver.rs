//! 还原引擎核心：串联静态规则、论坛名称剥离、两轮规则激活、ID 提取与地址拼接
//!
//! 流程：
//! 静态规则 → 剥离论坛名称 → 第一轮（要求ID）→ 成功则拼接地址
//!                                         → 失败则回退轮（noids）→ 仅论坛ID + 分页 → 拼接地址 / 不重写

use std::sync::Arc;
use tracing::debug;

use super::activator::{ActiveRuleSet, RuleActivator};
use super::extractor::IdExtractor;
use super::selector::{UrlBuilder, WinnerSelector};
use crate::compiler::{CompiledRuleTable, CompiledStaticRule, RuleCompiler};
use crate::config::GlobalConfig;
use crate::error::{SeoRegressionError, SeoResult};
use crate::rule::{ForumDirectory, ForumInfo, FragmentField, RuleTable, RuntimeData, RuntimeLoader, SeoSettings};
use crate::utils::{RequestUri, UrlHelper};

/// 伪静态地址还原器
#[derive(Debug, Clone)]
pub struct UrlResolver {
    config: GlobalConfig,
    runtime: Arc<RuntimeData>,
    compiled: Arc<CompiledRuleTable>,
}

impl UrlResolver {
    /// 使用内置规则表创建还原器
    pub fn new(config: GlobalConfig, runtime: RuntimeData) -> Self {
        Self::from_parts(config, runtime, &RuleTable::builtin())
    }

    /// 使用自定义规则表创建还原器（先校验规则表）
    pub fn with_rule_table(config: GlobalConfig, runtime: RuntimeData, table: &RuleTable) -> SeoResult<Self> {
        table.validate()?;
        Ok(Self::from_parts(config, runtime, table))
    }

    /// 按配置读取运行时数据文件后创建还原器
    pub async fn from_config(config: GlobalConfig) -> SeoResult<Self> {
        let runtime = RuntimeLoader::load(&config).await?;
        Ok(Self::new(config, runtime))
    }

    fn from_parts(config: GlobalConfig, runtime: RuntimeData, table: &RuleTable) -> Self {
        Self {
            config,
            runtime: Arc::new(runtime),
            compiled: Arc::new(RuleCompiler::compile(table)),
        }
    }

    pub fn config(&self) -> &GlobalConfig {
        &self.config
    }

    pub fn directory(&self) -> &ForumDirectory {
        &self.runtime.forum_urls
    }

    pub fn settings(&self) -> &SeoSettings {
        &self.runtime.settings
    }

    /// 还原请求地址，返回相对的原始地址；任何失败都视为不重写
    pub fn resolve(&self, request_uri: &str) -> Option<String> {
        match self.try_resolve(request_uri) {
            Ok(url) => Some(url),
            Err(e) => {
                debug!("不重写 {}：{}", request_uri, e);
                None
            }
        }
    }

    /// 还原请求地址，失败时返回具体原因
    pub fn try_resolve(&self, request_uri: &str) -> SeoResult<String> {
        self.resolve_request(&RequestUri::parse(request_uri))
    }

    /// 生成 301 重定向目标：根路径 + 原始地址 + 请求中原有的查询参数
    pub fn redirect_target(&self, request_uri: &str) -> Option<String> {
        let request = RequestUri::parse(request_uri);
        let canonical = self.resolve_request(&request).ok()?;
        Some(UrlHelper::redirect_target(&self.config.root_path, &canonical, &request.params))
    }

    fn resolve_request(&self, request: &RequestUri) -> SeoResult<String> {
        // 入口校验：调用方通常已检查，这里再校验一次
        let base_uri = request.base_uri(&self.config.script_path)?;
        UrlHelper::check_rebuild_allowed(&base_uri, &self.config.php_ext)?;

        if let Some(rule) = self.check_static(&base_uri) {
            debug!("静态规则 {} 命中：{} -> {}", rule.key(), base_uri, rule.replacement);
            return Ok(rule.replacement.clone());
        }

        let settings = &self.runtime.settings;
        let (clean, forum) = self.runtime.forum_urls.strip_forum_name(
            &base_uri,
            settings,
            self.compiled.pagination_before.as_deref(),
        );

        // 没有剥离出论坛名称且设置了 rem_ids 时，地址中本就没有ID
        let ids_required = !(settings.remove_ids && request.raw == clean);

        let first = if ids_required {
            RuleActivator::activate(&self.compiled, clean, true)
        } else {
            ActiveRuleSet::default()
        };

        if !first.is_empty() {
            let records = IdExtractor::extract_all(clean, first.iter(), FragmentField::Pattern)?;
            match WinnerSelector::select(records) {
                Some(winner) => {
                    if let Some(id) = winner.entity_id {
                        debug!("规则 {} 胜出：ID={}，页码={}", winner.rule_key, id, winner.page_number);
                        return Ok(UrlBuilder::build(&winner.replacement_prefix, id, winner.page_number));
                    }
                    debug!("规则 {} 胜出但没有ID，转入回退流程", winner.rule_key);
                }
                None => debug!("激活规则均未提取到ID：{}", clean),
            }
        }

        let fallback = RuleActivator::activate(&self.compiled, clean, false);
        if first.is_empty() && fallback.is_empty() {
            return Err(SeoRegressionError::NoActiveRule(clean.to_string()));
        }

        let candidates = if fallback.is_empty() { &first } else { &fallback };
        self.resolve_forum_only(request, clean, forum, candidates)
    }

    /// 仅论坛ID：优先使用剥离时命中的论坛，否则在原始请求中查找；再尝试读取分页
    fn resolve_forum_only(
        &self,
        request: &RequestUri,
        clean: &str,
        forum: Option<ForumInfo>,
        candidates: &ActiveRuleSet<'_>,
    ) -> SeoResult<String> {
        let forum = forum
            .or_else(|| self.runtime.forum_urls.resolve_forum(&request.raw))
            .filter(|f| f.id > 0)
            .ok_or_else(|| SeoRegressionError::NoIdFound(clean.to_string()))?;

        let records = IdExtractor::extract_all(clean, candidates.iter(), FragmentField::Paginate)?;
        if let Some(winner) = WinnerSelector::select(records) {
            debug!("论坛 {}（ID={}）分页={}", forum.name, forum.id, winner.page_number);
            return Ok(UrlBuilder::build(&winner.replacement_prefix, forum.id, winner.page_number));
        }

        let prefix = self
            .compiled
            .fallback_replacement
            .as_deref()
            .ok_or_else(|| SeoRegressionError::NoIdFound(clean.to_string()))?;
        debug!("论坛 {}（ID={}）无分页", forum.name, forum.id);
        Ok(UrlBuilder::build(prefix, forum.id, 0))
    }

    /// 静态规则：整路径匹配 `^/(规则)$`，按表顺序首个命中
    fn check_static(&self, base_uri: &str) -> Option<&CompiledStaticRule> {
        self.compiled
            .static_rules
            .iter()
            .find(|rule| rule.regex.is_match(base_uri))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigManager;
    use crate::rule::{EntityType, Rule, RuleGroup, StaticRule};

    fn runtime(forums: &[(u64, &str)], settings: SeoSettings) -> RuntimeData {
        RuntimeData {
            forum_urls: forums.iter().map(|(id, name)| (*id, name.to_string())).collect(),
            settings,
        }
    }

    fn resolver(forums: &[(u64, &str)]) -> UrlResolver {
        let config = ConfigManager::custom().script_path("/forum").root_path("/").build();
        UrlResolver::new(config, runtime(forums, SeoSettings::default()))
    }

    #[test]
    fn test_concrete_scenarios() {
        let r = resolver(&[(7, "forum")]);

        assert_eq!(
            r.redirect_target("/forum/post12346.html?hilit=keyword").as_deref(),
            Some("/viewtopic.php?p=12346&hilit=keyword")
        );
        assert_eq!(
            r.redirect_target("/forum/topic1234-60.html").as_deref(),
            Some("/viewtopic.php?t=1234&start=60")
        );
        assert_eq!(
            r.redirect_target("/forum/member42.html").as_deref(),
            Some("/memberlist.php?mode=viewprofile&u=42")
        );
        assert_eq!(
            r.redirect_target("/forum/forumpage3.html").as_deref(),
            Some("/viewforum.php?f=7&start=3")
        );
        assert_eq!(
            r.redirect_target("/forum/team.html").as_deref(),
            Some("/memberlist.php?mode=team")
        );
        assert_eq!(r.redirect_target("/some/unrelated/path"), None);
    }

    #[test]
    fn test_outside_base_path_is_not_rewritten() {
        let r = resolver(&[]);
        for uri in ["/board/post1.html", "/", "/foru", "/other/topic5-30.html"] {
            assert!(matches!(
                r.try_resolve(uri),
                Err(SeoRegressionError::NotUnderBasePath(_))
            ));
        }
    }

    #[test]
    fn test_guard_rejects_scripts_and_root() {
        let r = resolver(&[]);
        assert!(matches!(
            r.try_resolve("/forum/viewtopic.php?t=1"),
            Err(SeoRegressionError::CanonicalScript(_))
        ));
        assert!(matches!(r.try_resolve("/forum/"), Err(SeoRegressionError::RootRequest)));
        assert!(matches!(r.try_resolve("/forum"), Err(SeoRegressionError::RootRequest)));
    }

    #[test]
    fn test_round_trip_every_plain_rule() {
        let r = resolver(&[]);
        let table = RuleTable::builtin();
        for (entity, _, rule) in table.iter_rules() {
            if entity == EntityType::Noids {
                continue;
            }
            let (Some(before), Some(after)) = (rule.pattern.before.as_ref(), rule.pattern.after.as_ref()) else {
                continue;
            };
            // 片段中的转义还原为字面量
            let before = before.as_str().replace('\\', "");
            let after = after.as_str().replace('\\', "");
            for n in ["1", "42", "12346", "987654321"] {
                let uri = format!("/forum/{}{}{}", before, n, after);
                assert_eq!(
                    r.resolve(&uri),
                    Some(format!("{}{}", rule.replacement_prefix, n)),
                    "uri={}",
                    uri
                );
            }
        }
    }

    #[test]
    fn test_pagination_round_trip() {
        let r = resolver(&[]);
        let cases = [
            ("/forum/topic55-90.html", "viewtopic.php?t=55&start=90"),
            ("/forum/sujet55-15.html", "viewtopic.php?t=55&start=15"),
            ("/forum/some-title-t55-30.html", "viewtopic.php?t=55&start=30"),
            ("/forum/viewtopic_32090_s30.html", "viewtopic.php?t=32090&start=30"),
            ("/forum/viewtopic_32215_pd0_poasc_s30.html", "viewtopic.php?t=32215&start=30"),
            ("/forum/members-g12-60/", "memberlist.php?mode=group&g=12&start=60"),
        ];
        for (uri, expected) in cases {
            assert_eq!(r.resolve(uri).as_deref(), Some(expected), "uri={}", uri);
        }
    }

    #[test]
    fn test_user_and_group_folder_style() {
        let r = resolver(&[]);
        assert_eq!(
            r.resolve("/forum/member/john-u48/").as_deref(),
            Some("memberlist.php?mode=viewprofile&u=48")
        );
        assert_eq!(
            r.resolve("/forum/group/moderators-g4/").as_deref(),
            Some("memberlist.php?mode=group&g=4")
        );
    }

    #[test]
    fn test_rightmost_occurrence_is_used() {
        let r = resolver(&[]);
        assert_eq!(
            r.resolve("/forum/topic11.html/topic22.html").as_deref(),
            Some("viewtopic.php?t=22")
        );
        // 分类名中的 post2020 不影响结果
        assert_eq!(
            r.resolve("/forum/archive-post2020/topic9.html").as_deref(),
            Some("viewtopic.php?t=9")
        );
    }

    #[test]
    fn test_tie_break_prefers_earlier_rule() {
        // 两条规则在同一位置匹配，规则表中靠前的胜出
        let table = RuleTable::new(
            vec![
                RuleGroup {
                    entity: EntityType::Post,
                    rules: vec![Rule::new("item", r"\.html", "viewtopic.php?p=")],
                },
                RuleGroup {
                    entity: EntityType::Topic,
                    rules: vec![Rule::new("item", r"\.html", "viewtopic.php?t=")],
                },
                RuleGroup {
                    entity: EntityType::Noids,
                    rules: vec![Rule::new("", "", "viewforum.php?f=").paginated("page", r"\.html")],
                },
            ],
            Vec::new(),
        )
        .unwrap();
        let config = ConfigManager::custom().script_path("/forum").build();
        let r = UrlResolver::with_rule_table(config, RuntimeData::default(), &table).unwrap();
        assert_eq!(r.resolve("/forum/item8.html").as_deref(), Some("viewtopic.php?p=8"));
    }

    #[test]
    fn test_static_shortcut_precedes_extraction() {
        let mut table = RuleTable::builtin();
        table.static_rules.insert(0, StaticRule::new(r"topic1\.html", "index.php"));
        let config = ConfigManager::custom().script_path("/forum").build();
        let r = UrlResolver::with_rule_table(config, RuntimeData::default(), &table).unwrap();

        assert_eq!(r.resolve("/forum/topic1.html").as_deref(), Some("index.php"));
        assert_eq!(r.resolve("/forum/topic2.html").as_deref(), Some("viewtopic.php?t=2"));
        assert_eq!(r.resolve("/forum/equipe.html").as_deref(), Some("memberlist.php?mode=team"));
        // 静态规则必须整路径匹配
        assert_eq!(r.resolve("/forum/x/team.html"), None);
    }

    #[test]
    fn test_forum_name_stripped_before_extraction() {
        let r = resolver(&[(3, "general-discussion")]);
        assert_eq!(
            r.resolve("/forum/general-discussion/topic77.html").as_deref(),
            Some("viewtopic.php?t=77")
        );
        // 论坛首页地址只还原为论坛ID
        assert_eq!(
            r.resolve("/forum/general-discussion.html").as_deref(),
            Some("viewforum.php?f=3")
        );
        assert_eq!(
            r.resolve("/forum/general-discussion/page50.html").as_deref(),
            Some("viewforum.php?f=3&start=50")
        );
    }

    #[test]
    fn test_forum_rule_without_directory_entry_is_not_rewritten() {
        // -f12 激活了论坛规则，但 after 片段缺省无法提取ID，目录中也没有该论坛
        let r = resolver(&[]);
        assert!(matches!(
            r.try_resolve("/forum/general-f12/"),
            Err(SeoRegressionError::NoIdFound(_))
        ));
    }

    #[test]
    fn test_forum_folder_with_id_uses_directory() {
        let r = resolver(&[(12, "general")]);
        assert_eq!(r.resolve("/forum/general-f12/page2.html").as_deref(), Some("viewforum.php?f=12&start=2"));
    }

    #[test]
    fn test_unknown_page_without_forum_is_not_rewritten() {
        let r = resolver(&[]);
        assert!(matches!(
            r.try_resolve("/forum/faq.html"),
            Err(SeoRegressionError::NoIdFound(_))
        ));
    }

    #[test]
    fn test_remove_ids_skips_first_pass() {
        let config = ConfigManager::custom().build();
        let settings = SeoSettings {
            remove_ids: true,
            virtual_folder: false,
        };
        let r = UrlResolver::new(config, runtime(&[(9, "news")], settings));

        // 原始请求未被剥离（无论坛名）：只走 noids 回退，帖子地址不会被还原
        assert_eq!(r.resolve("/post5.html"), None);
        // 剥离了论坛名后第一轮照常进行
        assert_eq!(r.resolve("/news/topic5.html").as_deref(), Some("viewtopic.php?t=5"));
    }

    #[test]
    fn test_virtual_folder_pagination() {
        let config = ConfigManager::custom().build();
        let settings = SeoSettings {
            remove_ids: false,
            virtual_folder: true,
        };
        let r = UrlResolver::new(config, runtime(&[(4, "help-desk")], settings));

        assert_eq!(r.resolve("/help-desk/page25.html").as_deref(), Some("viewforum.php?f=4&start=25"));
        assert_eq!(r.resolve("/help-desk/").as_deref(), Some("viewforum.php?f=4"));
        assert_eq!(r.resolve("/help-desk/topic8-10.html").as_deref(), Some("viewtopic.php?t=8&start=10"));
    }

    #[test]
    fn test_malformed_custom_rule_is_skipped() {
        let mut table = RuleTable::builtin();
        table.groups[1].rules.insert(0, Rule::new("topic(", r"\.html", "broken.php?t="));
        let config = ConfigManager::custom().script_path("/forum").build();
        let r = UrlResolver::with_rule_table(config, RuntimeData::default(), &table).unwrap();

        assert_eq!(r.resolve("/forum/topic3.html").as_deref(), Some("viewtopic.php?t=3"));
    }

    #[test]
    fn test_oversized_id_is_not_rewritten() {
        // 目录中的论坛名出现在请求路径里，也不能把帖子地址改写成论坛地址
        let r = resolver(&[(7, "forum")]);
        assert!(matches!(
            r.try_resolve("/forum/topic99999999999999999999999.html"),
            Err(SeoRegressionError::InvalidNumber { .. })
        ));
        assert_eq!(r.resolve("/forum/topic99999999999999999999999.html"), None);
        assert_eq!(r.redirect_target("/forum/topic5-99999999999999999999999.html"), None);
        assert_eq!(r.resolve("/forum/post007.html").as_deref(), Some("viewtopic.php?p=7"));
    }

    #[test]
    fn test_no_active_rule_when_fallback_is_disabled() {
        let mut table = RuleTable::builtin();
        let noids = table
            .groups
            .iter_mut()
            .find(|group| group.entity == EntityType::Noids)
            .unwrap();
        noids.rules[0] = Rule::new("", "", "viewforum.php?f=").paginated("page", r"\.html(");

        let config = ConfigManager::custom().script_path("/forum").build();
        let r = UrlResolver::with_rule_table(config, RuntimeData::default(), &table).unwrap();
        assert!(matches!(
            r.try_resolve("/forum/faq.html"),
            Err(SeoRegressionError::NoActiveRule(ref path)) if path == "/faq.html"
        ));
        // ID 规则不受影响
        assert_eq!(r.resolve("/forum/topic3.html").as_deref(), Some("viewtopic.php?t=3"));
    }
}
