use anyhow::{Context, Result};
use clap::Parser;

use doc_toolbox::cli::{CliArgs, Command};
use doc_toolbox::clients::parse_urls;
use doc_toolbox::services::PolicySelection;
use doc_toolbox::utils::logging;
use doc_toolbox::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    // 加载配置
    let mut config = Config::load(args.config.as_deref()).context("加载配置失败")?;

    // 初始化日志
    logging::init(args.verbose || config.verbose_logging);

    match args.command {
        Command::Replace {
            policy,
            no_auto_download,
            files,
        } => {
            if no_auto_download {
                config.auto_download = false;
            }
            let app = App::initialize(config)?;
            let summary = app.run_replace(&files, PolicySelection::with(policy)).await?;
            if summary.failed_count() > 0 {
                std::process::exit(1);
            }
        }
        Command::Subtitles {
            word,
            urls_file,
            mut urls,
        } => {
            if let Some(path) = urls_file {
                let content = tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("无法读取 {}", path.display()))?;
                urls.extend(parse_urls(&content));
            }

            let app = App::initialize(config)?;
            if let Some(batch) = app.fetch_subtitles(urls, word).await? {
                app.browse(batch).await?;
            }
        }
    }

    Ok(())
}
