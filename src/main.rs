mod cli;

use posterforged::config;
use posterforged::engine::PosterEngine;
use posterforged::providers::PlatformQuery;
use posterforged::session::NavAction;
use posterforged_common::{KindFilter, UserId};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

/// User id used for one-shot CLI sessions.
const CLI_USER: i64 = 0;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "posterforged=trace,posterforged_common=debug".to_string()
        } else {
            "posterforged=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Providers => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(list_providers(cli.config.as_deref()))
        }
        Commands::Fetch {
            provider,
            input,
            kind,
            language,
            page,
        } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(fetch_once(
                cli.config.as_deref(),
                provider,
                input,
                kind,
                language,
                page,
            ))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("posterforged {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

async fn load_engine(config_path: Option<&std::path::Path>) -> Result<PosterEngine> {
    let mut config = config::load_config_or_default(config_path)?;
    config::remote::mirror_from_remote(&mut config).await;
    Ok(PosterEngine::from_config(&config))
}

async fn list_providers(config_path: Option<&std::path::Path>) -> Result<()> {
    let engine = load_engine(config_path).await?;

    println!("{:<10} {:<22} {}", "KEY", "NAME", "STATUS");
    for provider in engine.registry().all() {
        let status = if provider.is_available() {
            "available"
        } else {
            "disabled"
        };
        println!(
            "{:<10} {:<22} {}",
            provider.name(),
            provider.display_name(),
            status
        );
    }
    Ok(())
}

async fn fetch_once(
    config_path: Option<&std::path::Path>,
    provider: String,
    input: String,
    kind: KindFilter,
    language: Option<String>,
    page: Option<usize>,
) -> Result<()> {
    let engine = load_engine(config_path).await?;

    let query = PlatformQuery {
        provider_key: provider,
        raw: input,
        kind,
        language,
    };
    let mut rendered = engine.browse(UserId::from(CLI_USER), query).await?;

    if let Some(page) = page {
        let target = page
            .checked_sub(1)
            .ok_or_else(|| anyhow::anyhow!("pages are numbered from 1"))?;
        rendered = engine
            .paginate(rendered.session_id, NavAction::Jump(target))
            .await?;
    }

    for note in &rendered.partial_failures {
        println!("{note}");
    }

    match &rendered.view.record {
        Some(record) => {
            println!(
                "Page {}/{} - {} {} ({})",
                rendered.view.index + 1,
                rendered.view.total,
                record.provider_name,
                record.kind,
                record.language.as_deref().unwrap_or("No Language"),
            );
            if let Some(caption) = &rendered.caption {
                println!("{}", caption.text);
                println!("{}", caption.link);
            }
        }
        None => println!("No results matched the filters."),
    }

    Ok(())
}

fn validate_config(path: Option<&std::path::Path>) -> Result<()> {
    let config = config::load_config_or_default(path)?;
    let platforms = config.resolved_platforms();
    let enabled = platforms.iter().filter(|p| p.enabled).count();
    println!(
        "Config OK: {} platforms ({} enabled), session TTL {}s",
        platforms.len(),
        enabled,
        config.session.ttl_secs
    );
    Ok(())
}
