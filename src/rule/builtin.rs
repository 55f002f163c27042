//! 内置规则表
//! 覆盖 phpBB2 与 phpBB3 常见 SEO 插件的伪静态地址格式
//!
//! 示例：
//!     伪静态：http://domain.tld/phpBB/post12346.html?hilit=keyword
//!     原始：  http://domain.tld/phpBB/viewtopic.php?p=12346&hilit=keyword
//!
//! 片段均为正则片段，`after` 推荐填写；`/` 需写成 `\/`。
//! 分页示例：topic1234-60.html | forum-f1234/page60.html

use once_cell::sync::Lazy;

use super::model::{EntityType, Rule, RuleGroup, RuleTable, StaticRule};

const TOPIC_URL: &str = "viewtopic.php?t=";
const POST_URL: &str = "viewtopic.php?p=";
const PROFILE_URL: &str = "memberlist.php?mode=viewprofile&u=";
const GROUP_URL: &str = "memberlist.php?mode=group&g=";
const FORUM_URL: &str = "viewforum.php?f=";
const TEAM_URL: &str = "memberlist.php?mode=team";

static BUILTIN_RULE_TABLE: Lazy<RuleTable> = Lazy::new(|| RuleTable {
    groups: vec![
        RuleGroup {
            entity: EntityType::Post,
            rules: vec![
                // phpBB2
                Rule::new("viewpost_", r"\.html", POST_URL),
                // phpBB3
                Rule::new("post", r"\.html", POST_URL),
                Rule::new("message", r"\.html", POST_URL),
            ],
        },
        RuleGroup {
            entity: EntityType::Topic,
            rules: vec![
                // phpBB2：viewtopic_32090_s30.html、viewtopic_32215_pd0_poasc_s30.html（排序参数忽略）
                Rule::new("viewtopic_", ".html", TOPIC_URL).paginated("(?:_.+)?_s", ".html"),
                // phpBB3
                Rule::new("topic", r"\.html", TOPIC_URL).paginated("-", r"\.html"),
                Rule::new("sujet", r"\.html", TOPIC_URL).paginated("-", r"\.html"),
                Rule::new("-t", r"\.html", TOPIC_URL).paginated("-", r"\.html"),
            ],
        },
        RuleGroup {
            entity: EntityType::User,
            rules: vec![
                // phpBB2
                Rule::new("memberlist_viewprofile_", r"\.html", PROFILE_URL),
                // phpBB3
                Rule::new("-u", r"\/", PROFILE_URL),
                Rule::new("member", r"\.html", PROFILE_URL),
                Rule::new("membre", r"\.html", PROFILE_URL),
            ],
        },
        RuleGroup {
            entity: EntityType::Group,
            rules: vec![
                // phpBB2
                Rule::new("memberlist_group_", r"\.html", GROUP_URL),
                // phpBB3
                Rule::new("-g", r"\/", GROUP_URL).paginated("-", r"\.html"),
            ],
        },
        RuleGroup {
            entity: EntityType::Forum,
            rules: vec![
                Rule::new("forum", "", FORUM_URL).paginated("page", r"\.html"),
                Rule::new("-f", "", FORUM_URL).paginated("page", r"\.html"),
            ],
        },
        // 不要删除该分组，只允许修改分页的 before/after
        RuleGroup {
            entity: EntityType::Noids,
            rules: vec![Rule::new("", "", FORUM_URL).paginated("page", r"\.html")],
        },
    ],
    static_rules: vec![
        StaticRule::new(r"team\.html", TEAM_URL),
        StaticRule::new(r"equipe\.html", TEAM_URL),
    ],
});

impl RuleTable {
    /// 内置规则表
    pub fn builtin() -> RuleTable {
        BUILTIN_RULE_TABLE.clone()
    }
}
