//! pw-page - Projects & Workshops page generator
//!
//! Renders the committee's static page from its data table, then enriches it
//! with photo galleries from the media repository and the member roster from
//! the published sheet, re-rendering as each piece of data arrives.

mod config;
mod constants;
mod enrich;
mod error;
mod fetcher;
mod formatter;
mod gallery;
mod generator;
mod loader;
mod members;
mod models;
mod semester;
mod sheet;

use chrono::{Datelike, Local};
use error::{Error, Result};
use generator::PageContext;
use std::env;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

const DEFAULT_CONFIG: &str = "pw-page.toml";
const DEFAULT_OUT_DIR: &str = "dist";

/// Command-line options
#[derive(Debug, Default, PartialEq)]
struct Options {
    offline: bool,
    config: Option<PathBuf>,
    data: Option<PathBuf>,
    out_dir: Option<PathBuf>,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Options> {
    let mut opts = Options::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        let mut value = |flag: &str| {
            args.next()
                .map(PathBuf::from)
                .ok_or_else(|| Error::Config(format!("{} requires a value", flag)))
        };
        match arg.as_str() {
            "--offline" => opts.offline = true,
            "--config" => opts.config = Some(value("--config")?),
            "--data" => opts.data = Some(value("--data")?),
            "--out" => opts.out_dir = Some(value("--out")?),
            other => return Err(Error::Config(format!("unknown argument: {}", other))),
        }
    }

    Ok(opts)
}

fn render(data: &models::SiteData, ctx: &PageContext) -> String {
    formatter::format_html(&generator::render_page(data, ctx))
}

/// Render, format, and write one snapshot of the page
fn publish(path: &Path, data: &models::SiteData, ctx: &PageContext) -> Result<()> {
    generator::write_page(path, &render(data, ctx))
}

/// Writes rendered pages in the order they are sent, on its own task, so
/// file I/O never holds up the pending fetches. Resolves to the number of
/// successful writes once every sender is dropped.
fn spawn_page_writer(path: PathBuf) -> (mpsc::UnboundedSender<String>, JoinHandle<usize>) {
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let handle = tokio::spawn(async move {
        let mut written = 0usize;
        while let Some(html) = rx.recv().await {
            match tokio::fs::write(&path, html).await {
                Ok(()) => written += 1,
                Err(e) => log::error!("Failed to rewrite {}: {}", path.display(), e),
            }
        }
        written
    });
    (tx, handle)
}

/// Main entry point for the page generator.
///
/// This program:
/// 1. Loads settings and the page data table
/// 2. Works out the current and past semester from today's date
/// 3. Writes the static page immediately
/// 4. (Unless --offline) fetches galleries and members concurrently,
///    rewriting the page after each fetch completes
#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opts = parse_args(env::args().skip(1))?;

    let config_path = opts
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let settings = config::load_settings(&config_path)?;

    let data = loader::load_site_data(opts.data.as_deref())?;
    println!(
        "Loaded data table: {} subsections",
        data.subsections.len()
    );

    let (current, past) = semester::current_semesters();
    println!("Semesters - current: {}, past: {}", current, past);

    let ctx = PageContext {
        current_year: Local::now().year().to_string(),
        semester_label: current.label(),
    };

    let out_dir = opts
        .out_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR));
    let page_path = out_dir.join("index.html");

    println!("Writing static page to {}", page_path.display());
    publish(&page_path, &data, &ctx)?;

    if opts.offline {
        println!("Offline mode - skipping galleries and members");
    } else {
        println!("\n=== Enriching from remote sources ===");

        let token = fetcher::resolve_github_token(settings.github_token.as_deref());
        if token.is_none() {
            println!("No GitHub token found - using unauthenticated requests");
        }
        let source = fetcher::GitHubSource::new(&settings, token)?;

        let (pages, writer) = spawn_page_writer(page_path.clone());
        let enriched = enrich::enrich_site(data, &source, &settings, (current, past), |snapshot| {
            if pages.send(render(snapshot, &ctx)).is_err() {
                log::error!("Page writer stopped; dropping snapshot");
            }
        })
        .await;
        drop(pages);
        let rewrites = writer.await?;

        let image_count: usize = enriched
            .subsections
            .iter()
            .filter_map(|s| s.gallery.as_ref())
            .map(|g| g.images().count())
            .sum();
        let member_count = enriched
            .subsection(constants::MEMBERS_SUBSECTION)
            .map_or(0, |s| s.members.len());
        println!(
            "✓ Page rewritten {} times ({} images, {} members)",
            rewrites, image_count, member_count
        );
    }

    println!("\n✓ Done! Page generated at {}", page_path.display());

    Ok(())
}
