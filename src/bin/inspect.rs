//! Classifies one page from the command line.
//!
//! ```text
//! inspect <url> [--analyze] [--model <type>]
//! ```

use anyhow::{Context, Result, bail};
use lnk_lens::{
    cache::{AnalysisCache, ExpiryPolicy, MemoryStore},
    config::Config,
    entities::scale::{BiasBand, ReliabilityBand, format_bias, warning_title},
    fetcher::AnalysisClient,
    service::AnalyzerService,
    telemetry,
};
use std::sync::Arc;

struct Args {
    url: String,
    analyze: bool,
    model_type: Option<String>,
}

fn parse_args() -> Result<Args> {
    let mut url = None;
    let mut analyze = false;
    let mut model_type = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--analyze" {
            analyze = true;
        } else if arg == "--model" {
            model_type = Some(args.next().context("--model needs a value")?);
        } else if arg.starts_with("--") {
            bail!("unknown flag {arg}");
        } else if url.is_none() {
            url = Some(arg);
        } else {
            bail!("unexpected argument {arg}");
        }
    }

    Ok(Args {
        url: url.context("usage: inspect <url> [--analyze] [--model <type>]")?,
        analyze,
        model_type,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing();

    let args = parse_args()?;
    let config = Config::from_env()?;

    let cache = Arc::new(AnalysisCache::new(
        Arc::new(MemoryStore::new()),
        ExpiryPolicy::from_window(config.cache_expiry()),
    ));
    let client = AnalysisClient::new(config.api_base(), config.request_timeout())?;
    let service = AnalyzerService::new(client, cache, config.default_model_type());

    let classification = service.inspect(&args.url).await?;
    let info = &classification.article_info;
    println!("url:          {}", info.url);
    println!("hostname:     {}", info.hostname);
    println!("title:        {}", info.title);
    println!("news article: {}", classification.is_news_article);

    if !args.analyze {
        return Ok(());
    }
    if !classification.is_news_article {
        bail!("not a news article, refusing to analyze");
    }

    let analysis = service
        .analyze(&args.url, args.model_type.as_deref(), true)
        .await?;
    let result = &analysis.result;

    println!();
    println!("publication:  {}", result.publication);
    println!(
        "reliability:  {:.0}/100 ({})",
        result.reliability_score,
        ReliabilityBand::from_score(result.reliability_score).label()
    );
    println!(
        "bias:         {} ({})",
        format_bias(result.bias_score),
        BiasBand::from_score(result.bias_score).label()
    );
    if !result.summary.is_empty() {
        println!("summary:      {}", result.summary);
    }
    for warning in &result.warnings {
        println!("warning:      {}: {}", warning_title(&warning.kind), warning.message);
    }
    if let Some(hash) = &result.hash {
        println!("report:       {}", service.report_url(hash));
    }

    Ok(())
}
