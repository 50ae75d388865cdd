use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use discovery_core::config::Config;
use discovery_core::types::{ActiveFilterValue, ActiveFilters, Preferences, Topic};
use discovery_engine::{HtmlNewsletter, Orchestrator};
use discovery_wallet::MockWallet;

const USAGE: &str = "Usage: discovery <query|topic|filters|newsletter|wallet> [args...]
  query \"<text>\" [--filter id=<json>]... [--json]
  topic \"<text>\"
  filters <topic>
  newsletter \"<text>\" [--filter id=<json>]... [--out file.html]
  wallet [theme] [topic...]";

#[derive(Default)]
struct Options {
    positional: Vec<String>,
    filters: ActiveFilters,
    json: bool,
    out: Option<PathBuf>,
}

fn parse_args() -> (String, Vec<String>) {
    let mut args: Vec<String> = env::args().collect();
    args.remove(0);
    if args.is_empty() { eprintln!("{}", USAGE); std::process::exit(1); }
    let cmd = args.remove(0);
    (cmd, args)
}

/// `id=<json>`; values that are not valid JSON are kept as plain strings.
fn parse_filter(arg: &str) -> anyhow::Result<(String, ActiveFilterValue)> {
    let (id, raw) = arg.split_once('=').with_context(|| format!("filter '{}' must look like id=value", arg))?;
    let value = serde_json::from_str(raw).unwrap_or_else(|_| ActiveFilterValue::Other(serde_json::Value::String(raw.to_string())));
    Ok((id.to_string(), value))
}

fn parse_options(args: Vec<String>) -> anyhow::Result<Options> {
    let mut opts = Options::default();
    let mut it = args.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--json" => opts.json = true,
            "--filter" => {
                let filter = it.next().context("--filter needs a value")?;
                let (id, value) = parse_filter(&filter)?;
                opts.filters.insert(id, value);
            }
            "--out" => opts.out = Some(PathBuf::from(it.next().context("--out needs a path")?)),
            _ => opts.positional.push(arg),
        }
    }
    Ok(opts)
}

fn query_text(opts: &Options) -> String {
    if opts.positional.is_empty() { eprintln!("{}", USAGE); std::process::exit(1); }
    opts.positional.join(" ")
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "discovery=info,discovery_core=info,discovery_query=info,discovery_search=info,discovery_wallet=info,discovery_engine=info".into()
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let settings = config.settings()?;
    let (cmd, args) = parse_args();
    let opts = parse_options(args)?;

    let base = env::current_dir()?;
    let wallet = MockWallet::new(settings.wallet.clone());
    let orchestrator: Orchestrator<MockWallet, HtmlNewsletter> = Orchestrator::from_settings(settings, &base, wallet)?;
    orchestrator.initialize()?;

    match cmd.as_str() {
        "query" => {
            let text = query_text(&opts);
            let outcome = orchestrator.process_query(&text, &opts.filters);
            if opts.json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
                return Ok(());
            }
            if let Some(err) = &outcome.error {
                eprintln!("Query failed: {}", err);
                std::process::exit(2);
            }
            println!("Topic: {} ({})", outcome.topic, outcome.topic.code());
            println!("Keywords: {}", outcome.keywords.join(", "));
            println!("\nFilters:");
            for f in &outcome.filters { println!("  - {} [{}] {}", f.id, f.kind, f.label); }
            println!("\nFound {} results:", outcome.data.len());
            for (i, item) in outcome.data.iter().enumerate() {
                let name = ["title", "name", "destination"].iter().find_map(|k| item.get(*k).and_then(|v| v.as_str())).unwrap_or("?");
                println!("  {}. {}", i + 1, name);
            }
        }
        "topic" => {
            let text = query_text(&opts);
            let pipeline = orchestrator.pipeline();
            let normalized = pipeline.normalizer().normalize(&text);
            let keywords = pipeline.extractor().extract(&normalized);
            println!("Topic: {}", pipeline.classifier().detect_topic(&normalized));
            for (topic, score) in pipeline.classifier().scores(&keywords) { println!("  {:<12} {}", topic.slug(), score); }
        }
        "filters" => {
            let topic: Topic = opts.positional.first().map(String::as_str).unwrap_or("default").parse()?;
            println!("Filters for {}:", topic);
            for f in orchestrator.catalog().filters_for_topic(topic) {
                let mark = if f.newsletter_relevant { " (newsletter)" } else { "" };
                println!("  - {} [{}] {}{}", f.id, f.kind, f.label, mark);
            }
        }
        "newsletter" => {
            let outcome = orchestrator.process_query(&query_text(&opts), &opts.filters);
            if let Some(err) = &outcome.error { eprintln!("Query failed: {}", err); std::process::exit(2); }
            match &opts.out {
                Some(path) => {
                    fs::write(path, &outcome.newsletter).with_context(|| format!("writing {}", path.display()))?;
                    println!("Newsletter written to {}", path.display());
                }
                None => println!("{}", outcome.newsletter),
            }
        }
        "wallet" => {
            let theme = opts.positional.first().cloned().unwrap_or_else(|| "dark".to_string());
            let topics = opts.positional.iter().skip(1).map(|s| s.parse()).collect::<Result<Vec<Topic>, _>>()?;
            let prefs = Preferences { theme, topics, filters: opts.filters.clone() };
            tokio::runtime::Runtime::new()?.block_on(async {
                let account = orchestrator.connect_wallet().await?;
                println!("Connected: {} ({})", account.address, account.name.as_deref().unwrap_or("unnamed"));
                let tx = orchestrator.store_preferences(&account, &prefs).await?;
                println!("Stored preferences, tx {}", tx);
                let stored = orchestrator.get_preferences(&account).await;
                println!("Read back: {}", serde_json::to_string(&stored)?);
                orchestrator.disconnect_wallet().await?;
                anyhow::Ok(())
            })?;
        }
        _ => { eprintln!("Unknown command: {}\n{}", cmd, USAGE); std::process::exit(1); }
    }
    Ok(())
}
