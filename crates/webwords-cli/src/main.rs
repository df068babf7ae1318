use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::{env, fs, io};

use anyhow::Context;
use clap::Parser;
use tokio::runtime;
use webwords_crawler::{crawl, CrawlResult};
use webwords_page::HttpParser;
use webwords_profiler::Profiler;

mod config;

use config::JobConfig;

/// Parallel word-frequency web crawler
#[derive(Debug, Parser)]
#[command(version)]
pub struct Args {
    /// Path to the JSON crawl job configuration
    pub config: PathBuf,
    /// Override the configured starting URLs (repeatable)
    #[arg(long = "start-page")]
    pub start_pages: Vec<String>,
    /// Override the crawl depth limit
    #[arg(long)]
    pub max_depth: Option<usize>,
    /// Override the crawl wall-clock budget, in seconds
    #[arg(long)]
    pub timeout_seconds: Option<f64>,
    /// Override the number of pages processed concurrently
    #[arg(long)]
    pub parallelism: Option<usize>,
    /// Override the size of the most-frequent-words report
    #[arg(long)]
    pub popular_word_count: Option<usize>,
    /// Write the crawl report to this file instead of stdout
    #[arg(long)]
    pub result_path: Option<PathBuf>,
    /// Append the profiling report to this file instead of stdout
    #[arg(long)]
    pub profile_output_path: Option<PathBuf>,
    /// When quiet no logs are outputted
    #[arg(long, short)]
    pub quiet: bool,
}

impl TryFrom<&Args> for JobConfig {
    type Error = anyhow::Error;

    fn try_from(args: &Args) -> Result<Self, Self::Error> {
        let raw = fs::read_to_string(&args.config)
            .with_context(|| format!("Couldn't read {}", args.config.display()))?;
        let mut conf: JobConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Couldn't parse {}", args.config.display()))?;

        if !args.start_pages.is_empty() {
            conf.start_pages = args.start_pages.clone();
        }
        if let Some(max_depth) = args.max_depth {
            conf.crawler.max_depth = max_depth;
        }
        if let Some(timeout_seconds) = args.timeout_seconds {
            conf.crawler.timeout_seconds = timeout_seconds;
        }
        if let Some(parallelism) = args.parallelism {
            conf.crawler.parallelism = parallelism;
        }
        if let Some(popular_word_count) = args.popular_word_count {
            conf.crawler.popular_word_count = popular_word_count;
        }
        if let Some(result_path) = &args.result_path {
            conf.result_path = Some(result_path.clone());
        }
        if let Some(profile_output_path) = &args.profile_output_path {
            conf.profile_output_path = Some(profile_output_path.clone());
        }
        Ok(conf)
    }
}

fn run(conf: JobConfig) -> anyhow::Result<()> {
    let parser = HttpParser::new(&conf.page)?;
    let profiler = Profiler::new();
    let parser = Arc::new(profiler.wrap(parser)?);

    let rt = runtime::Builder::new_multi_thread()
        .worker_threads(conf.crawler.effective_parallelism())
        .enable_all()
        .build()?;
    let result = rt.block_on(crawl(&conf.start_pages, &conf.crawler, parser))?;

    log::info!(
        "Visited {} URLs, reporting {} words",
        result.urls_visited,
        result.word_counts.len()
    );

    write_result(&result, conf.result_path.as_deref())?;
    match conf.profile_output_path.as_deref() {
        Some(path) => profiler
            .write_report_path(path)
            .with_context(|| format!("Couldn't write profile data to {}", path.display()))?,
        None => profiler.write_report(&mut io::stdout().lock())?,
    }

    Ok(())
}

fn write_result(result: &CrawlResult, path: Option<&Path>) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            let file = fs::File::create(path)
                .with_context(|| format!("Couldn't write crawl report to {}", path.display()))?;
            serde_json::to_writer_pretty(file, result)?;
        }
        None => {
            serde_json::to_writer_pretty(io::stdout().lock(), result)?;
            println!();
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if !args.quiet {
        if env::var_os("RUST_LOG").is_none() {
            env::set_var("RUST_LOG", "webwords=info,webwords_crawler=info,webwords_page=warn");
        }
        env_logger::init();
    }

    let conf = JobConfig::try_from(&args)?;
    run(conf)
}
