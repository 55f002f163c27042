//! seo-regression 命令行：批量验证伪静态地址的还原结果

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use seo_regression::{ConfigManager, RuntimeLoader, UrlResolver};

/// 将伪静态论坛地址还原为原始查询串地址
#[derive(Debug, Parser)]
#[command(name = "seo-regression", version, about)]
struct Cli {
    /// 论坛所在路径前缀
    #[arg(long, default_value = "/")]
    script_path: String,

    /// 重定向目标的根路径
    #[arg(long, default_value = "/")]
    root_path: String,

    /// 原始脚本扩展名
    #[arg(long, default_value = "php")]
    php_ext: String,

    /// 运行时数据文件（论坛目录 + 设置，JSON）
    #[arg(long, default_value = "phpbb_cache.json")]
    runtime_file: PathBuf,

    /// 自定义规则表（JSON），缺省使用内置规则
    #[arg(long)]
    rules: Option<PathBuf>,

    /// 强制开启 rem_ids
    #[arg(long)]
    rem_ids: bool,

    /// 强制开启 virtual_folder
    #[arg(long)]
    virtual_folder: bool,

    /// 输出调试日志
    #[arg(short, long)]
    verbose: bool,

    /// 待还原的请求地址（路径 + 查询串）
    #[arg(required = true)]
    uris: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ConfigManager::custom()
        .script_path(cli.script_path)
        .root_path(cli.root_path)
        .php_ext(cli.php_ext)
        .runtime_file(cli.runtime_file)
        .build();

    let mut runtime = RuntimeLoader::load(&config)
        .await
        .with_context(|| format!("读取运行时数据失败：{}", config.runtime_file.display()))?;
    runtime.settings.remove_ids |= cli.rem_ids;
    runtime.settings.virtual_folder |= cli.virtual_folder;

    let resolver = match cli.rules {
        Some(path) => {
            let table = RuntimeLoader::load_rule_table(&path)
                .await
                .with_context(|| format!("读取规则表失败：{}", path.display()))?;
            UrlResolver::with_rule_table(config, runtime, &table)?
        }
        None => UrlResolver::new(config, runtime),
    };

    for uri in &cli.uris {
        match resolver.redirect_target(uri) {
            Some(target) => println!("{} -> {}", uri, target),
            None => println!("{} -> no rewrite", uri),
        }
    }

    Ok(())
}
