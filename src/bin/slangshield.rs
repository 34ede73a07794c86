//! slangshield CLI — 将邮件草稿改写为正式语体的命令行工具
//!
//! Usage:
//!   slangshield formalize [--lang en|it] [--file <path>] [--settings <path>]
//!   slangshield detect [--file <path>]
//!   slangshield config show [--settings <path>]
//!   slangshield config init --provider <id> [--model <m>] [--api-key <k>] [--base-url <u>]

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;

use slangshield::{
    detect_language, FileSettingsStore, FormalizeRequest, FormalizeService, Formalizer, Language,
    ProviderKind, Settings, SettingsStore,
};

/// Two per-call timeouts plus slack.
const REQUEST_DEADLINE: Duration = Duration::from_secs(55);

#[tokio::main]
async fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let outcome = match args[1].as_str() {
        "formalize" => cmd_formalize(&args[2..]).await,
        "detect" => cmd_detect(&args[2..]).await,
        "config" => cmd_config(&args[2..]).await,
        "version" | "--version" | "-V" => {
            println!("slangshield {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = outcome {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_usage() {
    println!(
        r#"slangshield — rewrite email drafts into formal corporate language

USAGE:
    slangshield <COMMAND> [OPTIONS]

COMMANDS:
    formalize [--lang en|it] [--file <path>] [--settings <path>]
                                Rewrite text from --file or stdin, print the result
    detect [--file <path>]      Print the detected language (en/it)
    config show [--settings <path>]
                                Show the current settings (API key redacted)
    config init --provider <id> [--model <m>] [--api-key <k>] [--base-url <u>] [--settings <path>]
                                Validate and write a settings file
    version                     Show version information
    help                        Show this help message

PROVIDERS:
    gemini, openai, openai_compat, anthropic

ENVIRONMENT:
    SLANGSHIELD_SETTINGS             Settings file (default: slangshield.yaml)
    SLANGSHIELD_API_KEY              Fallback API key
    SLANGSHIELD_HTTP_TIMEOUT_SECS    Per-call timeout (default: 25)
    SLANGSHIELD_PROXY_URL            HTTP(S) proxy
    RUST_LOG                         Log filter (default: warn)"#
    );
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn settings_store(args: &[String]) -> FileSettingsStore {
    match flag_value(args, "--settings") {
        Some(path) => FileSettingsStore::new(PathBuf::from(path)),
        None => FileSettingsStore::from_env(),
    }
}

async fn read_input(args: &[String]) -> Result<String> {
    match flag_value(args, "--file") {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("cannot read {path}")),
        None => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .context("cannot read stdin")?;
            Ok(text)
        }
    }
}

async fn cmd_formalize(args: &[String]) -> Result<()> {
    let language = flag_value(args, "--lang")
        .map(str::parse::<Language>)
        .transpose()?;
    let text = read_input(args).await?;

    let store = settings_store(args);
    let formalizer = Formalizer::new()?;
    let service =
        FormalizeService::new(formalizer, Arc::new(store)).request_deadline(REQUEST_DEADLINE);

    let mut request = FormalizeRequest::new(text);
    request.language = language;

    match service.handle(request).await.into_result() {
        Ok(out) if !out.trim().is_empty() => {
            println!("{out}");
            Ok(())
        }
        Ok(_) => bail!("Empty response / missing configuration."),
        Err(e) => bail!("{e}"),
    }
}

async fn cmd_detect(args: &[String]) -> Result<()> {
    let text = read_input(args).await?;
    println!("{}", detect_language(&text));
    Ok(())
}

async fn cmd_config(args: &[String]) -> Result<()> {
    match args.first().map(String::as_str) {
        Some("show") => cmd_config_show(&args[1..]).await,
        Some("init") => cmd_config_init(&args[1..]).await,
        Some(other) => bail!("unknown config command: {other} (expected show or init)"),
        None => bail!("missing config command (expected show or init)"),
    }
}

async fn cmd_config_show(args: &[String]) -> Result<()> {
    let store = settings_store(args);
    let settings = store.load().await?;

    println!("file:     {}", store.path().display());
    println!("provider: {}", settings.provider);
    println!("model:    {}", settings.model);
    if !settings.base_url.is_empty() {
        println!("base_url: {}", settings.base_url);
    }
    println!(
        "api_key:  {}",
        if settings.api_key.is_empty() { "<empty>" } else { "<redacted>" }
    );
    match settings.validate() {
        Ok(_) => println!("status:   ok"),
        Err(e) => println!("status:   {e}"),
    }
    Ok(())
}

async fn cmd_config_init(args: &[String]) -> Result<()> {
    let provider = flag_value(args, "--provider").context("--provider is required")?;
    // Reject unknown ids before writing anything.
    let kind: ProviderKind = provider.parse()?;

    let settings = Settings {
        provider: kind.id().to_string(),
        api_key: flag_value(args, "--api-key").unwrap_or_default().to_string(),
        model: flag_value(args, "--model").unwrap_or_default().to_string(),
        base_url: flag_value(args, "--base-url").unwrap_or_default().to_string(),
    }
    .with_provider_defaults();

    let store = settings_store(args);
    store.save(&settings).await?;
    println!("Saved {} settings to {}", kind.id(), store.path().display());
    Ok(())
}
