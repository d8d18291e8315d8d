use anyhow::bail;
use clap::{Parser, Subcommand};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use webintel::aggregate::{aggregate, union_list};
use webintel::compare::{ComparisonReport, Indicator, compare};
use webintel::config::{AnalysisConfig, ConfigLoader};
use webintel::engine::{AnalysisEngine, GroupRun};
use webintel::extract::keys;
use webintel::metrics::MetricsSnapshot;

#[derive(Parser)]
#[command(name = "webintel")]
#[command(version = "0.1.0")]
#[command(about = "Answer-engine readiness analysis for groups of web pages", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and analyze every group in a config file
    Analyze {
        /// Path to the configuration file (JSON/YAML/TOML)
        #[arg(short, long)]
        config: PathBuf,

        /// Show progress bars (stderr)
        #[arg(short, long, default_value_t = true, action = clap::ArgAction::Set)]
        progress: bool,
    },
    /// Analyze two groups and compare them metric by metric
    Compare {
        /// Path to the configuration file (JSON/YAML/TOML)
        #[arg(short, long)]
        config: PathBuf,

        /// Show progress bars (stderr)
        #[arg(short, long, default_value_t = true, action = clap::ArgAction::Set)]
        progress: bool,
    },
    /// Validate a configuration file
    Check {
        /// Path to the configuration file
        #[arg(short, long)]
        config: PathBuf,
    },
}

fn init_logging(multi: &MultiProgress, progress: bool) -> anyhow::Result<()> {
    let logger = env_logger::Builder::from_default_env().build();
    if progress {
        indicatif_log_bridge::LogWrapper::new(multi.clone(), logger).try_init()?;
    } else {
        let level = logger.filter();
        log::set_boxed_logger(Box::new(logger))?;
        log::set_max_level(level);
    }
    Ok(())
}

async fn run_groups(
    config: &AnalysisConfig,
    progress: bool,
    multi: Arc<MultiProgress>,
) -> anyhow::Result<(AnalysisEngine, Vec<GroupRun>)> {
    let engine = ConfigLoader::create_engine(config);
    let mut sink = ConfigLoader::create_output(config, progress.then(|| multi.clone())).await?;

    let mut progress_bar: Option<ProgressBar> = None;
    let mut progress_task = None;
    if progress {
        let pb = multi.add(ProgressBar::new(0));
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                .progress_chars("#>-"),
        );

        let mut metrics_rx = engine.watch_metrics();
        let pb_clone = pb.clone();
        progress_bar = Some(pb);
        progress_task = Some(tokio::spawn(async move {
            while metrics_rx.changed().await.is_ok() {
                let snapshot: MetricsSnapshot = metrics_rx.borrow().clone();
                pb_clone.set_length(snapshot.urls_queued);
                pb_clone.set_position(snapshot.urls_processed);
                pb_clone.set_message(format!(
                    "Analyzed: {} | Fallbacks: {} | Success: {:.1}%",
                    snapshot.pages_analyzed,
                    snapshot.fallbacks(),
                    snapshot.success_rate
                ));
            }
        }));
    }

    let mut runs = Vec::with_capacity(config.groups.len());
    for group in &config.groups {
        let urls = ConfigLoader::group_urls(config, group)?;
        if urls.is_empty() {
            log::warn!("Group '{}' has no URLs", group.name);
        }
        runs.push(engine.run_group(&group.name, &urls, sink.as_mut()).await?);
    }
    sink.close().await?;

    if let Some(task) = progress_task {
        task.abort();
    }
    if let Some(pb) = progress_bar {
        let final_metrics = engine.get_metrics();
        pb.set_style(
            ProgressStyle::default_bar()
                .template("✅ [{elapsed_precise}] [{bar:40.green/blue}] {pos}/{len} {msg}")?
                .progress_chars("#>-"),
        );
        pb.set_length(final_metrics.urls_queued);
        pb.set_position(final_metrics.urls_processed);
        pb.finish_with_message(format!(
            "Analyzed: {} | Success: {:.1}% - Completed",
            final_metrics.pages_analyzed, final_metrics.success_rate
        ));
    }

    Ok((engine, runs))
}

fn print_group(run: &GroupRun) {
    let records = run.records();
    let summary = aggregate(&records);
    println!("\n📊 Group '{}':", run.name);
    println!("   Pages Analyzed: {}", run.reports.len());
    println!("   Failed: {}", run.failures.len());
    for (url, error) in &run.failures {
        println!("     ✗ {}: {}", url, error);
    }
    if summary.is_empty() {
        return;
    }
    println!("   Atomic Paragraph Ratio: {:.2}", summary.get(keys::ATOMIC_PARAGRAPH_RATIO));
    println!("   Heading Coverage: {:.2}", summary.get(keys::HEADING_COVERAGE_RATIO));
    println!("   Schema Blocks: {:.1}", summary.get(keys::SCHEMA_BLOCKS_COUNT));
    println!("   HTML/JS Ratio: {:.2}", summary.get(keys::HTML_JS_BYTE_RATIO));
    let frameworks = union_list(&records, keys::FRAMEWORKS_DETECTED);
    if !frameworks.is_empty() {
        println!("   Frameworks: {}", frameworks.into_iter().collect::<Vec<_>>().join(", "));
    }
    let types = union_list(&records, keys::SCHEMA_TYPES);
    if !types.is_empty() {
        println!("   Schema Types: {}", types.into_iter().collect::<Vec<_>>().join(", "));
    }
}

fn indicator_label(indicator: Indicator, a: &str, b: &str) -> String {
    match indicator {
        Indicator::A => format!("🟢 {}", a),
        Indicator::B => format!("🔵 {}", b),
        Indicator::Neutral => "⚪ tie".to_string(),
    }
}

fn print_comparison(report: &ComparisonReport, a: &str, b: &str) {
    let mut section = "";
    for row in &report.rows {
        if row.section != section {
            section = &row.section;
            println!("\n{}", section);
        }
        println!(
            "   {:<24} {:>10.2} {:>10.2}   {}",
            row.label,
            row.value_a,
            row.value_b,
            indicator_label(row.indicator, a, b)
        );
    }

    println!();
    match report.verdict {
        Some(Indicator::A) => println!("🏆 Verdict: {} is more AEO-friendly", a),
        Some(Indicator::B) => println!("🏆 Verdict: {} is more AEO-friendly", b),
        Some(Indicator::Neutral) => println!("🤝 Verdict: both groups are evenly matched"),
        None => println!("Verdict: not enough data"),
    }

    println!("\n💡 Insights:");
    if report.insights.is_empty() {
        println!("   Both groups show similar AEO performance across key metrics");
    }
    for insight in &report.insights {
        println!("   • {}", insight);
    }
}

fn print_stats(stats: &MetricsSnapshot) {
    println!("\n✅ Analysis Completed:");
    println!("   URLs Processed: {}", stats.urls_processed);
    println!(
        "   Fetch Methods: primary {} | secondary {} | tertiary {}",
        stats.primary_successes, stats.secondary_successes, stats.tertiary_successes
    );
    println!("   Success Rate: {:.1}%", stats.success_rate);
    println!("   Average Duration: {}ms", stats.avg_response_time_ms);
    println!("   Total Time: {:.1}s", stats.elapsed_seconds);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        unsafe {
            std::env::set_var("RUST_LOG", "info");
        }
    }
    let cli = Cli::parse();
    let multi = Arc::new(MultiProgress::new());

    match cli.command {
        Commands::Analyze { config, progress } => {
            init_logging(&multi, progress)?;
            log::info!("Loading config from {:?}", config);
            let config_data = ConfigLoader::load(&config)?;

            let (engine, runs) = run_groups(&config_data, progress, multi).await?;
            for run in &runs {
                print_group(run);
            }
            print_stats(&engine.get_metrics());
        }
        Commands::Compare { config, progress } => {
            init_logging(&multi, progress)?;
            log::info!("Loading config from {:?}", config);
            let config_data = ConfigLoader::load(&config)?;
            if config_data.groups.len() != 2 {
                bail!(
                    "compare needs exactly two groups, '{}' defines {}",
                    config_data.name,
                    config_data.groups.len()
                );
            }

            let (engine, runs) = run_groups(&config_data, progress, multi).await?;
            for run in &runs {
                print_group(run);
            }
            let (a, b) = (&runs[0], &runs[1]);
            let report = compare(&aggregate(&a.records()), &aggregate(&b.records()));
            print_comparison(&report, &a.name, &b.name);
            print_stats(&engine.get_metrics());
        }
        Commands::Check { config } => match ConfigLoader::load(&config) {
            Ok(cfg) => {
                println!("✅ Config is valid:");
                println!("   Name: {}", cfg.name);
                for group in &cfg.groups {
                    match ConfigLoader::group_urls(&cfg, group) {
                        Ok(urls) => println!("   Group '{}': {} URLs", group.name, urls.len()),
                        Err(e) => println!("   Group '{}': {}", group.name, e),
                    }
                }
                println!("   Timeout: {}s", cfg.timeout_secs);
                println!("   Stealth Delay: {}", cfg.stealth_delay);
            }
            Err(e) => {
                eprintln!("❌ Config error: {}", e);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}
