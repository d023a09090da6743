use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::{Path, PathBuf};

use rsswriter::config::Config;
use rsswriter::manifest::FeedManifest;
use rsswriter::xml::check_well_formed;

/// Default config file location (~/.config/rsswriter/config.toml), if HOME is set.
fn default_config_path() -> Option<PathBuf> {
    let home = std::env::var("HOME").ok()?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("rsswriter")
            .join("config.toml"),
    )
}

/// Replaces `path` with `content` through a sibling temp file, so readers
/// see either the old feed or the new one.
fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    let temp_path = path.with_extension(format!("{}.{:08x}.tmp", std::process::id(), nonce));

    let written = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&temp_path)
        .and_then(|mut file| {
            file.write_all(content)?;
            file.sync_all()
        })
        .and_then(|()| std::fs::rename(&temp_path, path));

    if let Err(e) = written {
        let _ = std::fs::remove_file(&temp_path);
        return Err(e).with_context(|| format!("Failed to write feed to '{}'", path.display()));
    }
    Ok(())
}

#[derive(Parser, Debug)]
#[command(name = "rsswriter", about = "Render an RSS 2.0 feed from a TOML or JSON manifest")]
struct Args {
    /// Feed manifest (.toml or .json)
    #[arg(value_name = "MANIFEST")]
    manifest: PathBuf,

    /// Config file (default: ~/.config/rsswriter/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the feed to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Write everything on one line (overrides the configured indent)
    #[arg(long)]
    compact: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match args.config.as_deref() {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Config::load(path)
        }
        None => match default_config_path() {
            Some(path) => Config::load(&path),
            None => Ok(Config::default()),
        },
    }
    .context("Failed to load configuration")?;

    let mut options = config.write_options();
    if args.compact {
        options.indent = 0;
    }

    let feed = FeedManifest::load(&args.manifest)
        .with_context(|| format!("Failed to load manifest: {}", args.manifest.display()))?
        .into_feed()
        .context("Failed to build feed from manifest")?;

    let xml = feed
        .to_xml_with(&options)
        .context("Failed to render feed")?;

    if config.check_output {
        check_well_formed(&xml).context("Rendered feed is not well-formed")?;
        tracing::debug!("Output passed well-formedness check");
    }

    match &args.output {
        Some(path) => {
            atomic_write(path, xml.as_bytes())?;
            tracing::info!(path = %path.display(), bytes = xml.len(), "Wrote feed");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(xml.as_bytes())
                .and_then(|_| stdout.write_all(b"\n"))
                .context("Failed to write feed to stdout")?;
        }
    }

    Ok(())
}
