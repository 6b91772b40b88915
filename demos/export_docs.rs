//! Export Paper documents to a local directory
//!
//! This demo:
//! - Lists documents, following cursors while more pages exist
//! - Resolves each document's folder path
//! - Downloads each document in the requested format
//!
//! Run with: cargo run --example export_docs -- --out ./paper-export

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use paper_client::{
    Config, Context, DocExportRequest, ExportFormat, FolderRef, ListDocsArgs, ListDocsSortBy,
    ListDocsSortOrder, PaperApi, PaperClient,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Markdown,
    Html,
}

#[derive(Parser, Debug)]
#[command(name = "export-docs")]
#[command(about = "Export Dropbox Paper documents")]
struct Args {
    /// OAuth2 access token
    #[arg(long, env = "PAPER_ACCESS_TOKEN")]
    token: String,

    /// API base URL
    #[arg(long, default_value = paper_client::DEFAULT_BASE_URL, env = "PAPER_API_URL")]
    base_url: String,

    /// Export format
    #[arg(short, long, value_enum, default_value = "markdown")]
    format: Format,

    /// Page size for listing
    #[arg(long, default_value = "50")]
    limit: i32,

    /// Output directory
    #[arg(short, long, default_value = "paper-export")]
    out: PathBuf,

    /// Overall time budget in seconds
    #[arg(long, default_value = "300")]
    timeout_secs: u64,

    /// Enable debug logging
    #[arg(short, long, env = "PAPER_DEBUG")]
    debug: bool,
}

/// Turn a server-supplied name into a single path component that cannot
/// leave the directory it is joined onto.
fn safe_component(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':' | '\0') { '_' } else { c })
        .collect();
    match cleaned.trim() {
        "" | "." | ".." => "_".to_string(),
        trimmed => trimmed.to_string(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| format!("paper_client={},export_docs={}", log_level, log_level).into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let client = PaperClient::with_config(Config::new(&args.token).with_base_url(&args.base_url))?;
    let ctx = Context::with_timeout(Duration::from_secs(args.timeout_secs));

    // Ctrl-C cancels whatever call is in flight
    let on_signal = ctx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_signal.cancel();
        }
    });

    let (format, extension) = match args.format {
        Format::Markdown => (ExportFormat::Markdown, "md"),
        Format::Html => (ExportFormat::Html, "html"),
    };

    let list_args = ListDocsArgs::new()
        .with_sort_by(ListDocsSortBy::Modified)
        .with_sort_order(ListDocsSortOrder::Descending)
        .with_limit(args.limit);

    let mut page = client.list_docs(&ctx, &list_args).await?;
    let mut doc_ids = std::mem::take(&mut page.doc_ids);
    while page.has_more {
        tracing::debug!("Fetching next page, cursor expires {:?}", page.cursor.expires_at());
        page = client.list_docs_continue(&ctx, &page.cursor.value).await?;
        doc_ids.append(&mut page.doc_ids);
    }
    tracing::info!("Found {} documents", doc_ids.len());

    for doc_id in &doc_ids {
        let placement = client.get_folder_info(&ctx, &FolderRef::new(doc_id)).await?;
        let mut dir = args.out.clone();
        for folder in &placement.folders {
            dir.push(safe_component(&folder.name));
        }

        let (meta, content) = client
            .download_doc(&ctx, &DocExportRequest::new(doc_id, format))
            .await?;

        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("creating {}", dir.display()))?;
        let name = if meta.title.is_empty() { doc_id.as_str() } else { meta.title.as_str() };
        let file = dir.join(format!("{}.{}", safe_component(name), extension));
        tokio::fs::write(&file, &content)
            .await
            .with_context(|| format!("writing {}", file.display()))?;

        tracing::info!(
            "Exported '{}' (rev {}, {} bytes) to {}",
            meta.title,
            meta.revision,
            content.len(),
            file.display()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Component, Path};

    #[test]
    fn test_safe_component_rejects_dot_names() {
        assert_eq!(safe_component(".."), "_");
        assert_eq!(safe_component("."), "_");
        assert_eq!(safe_component(""), "_");
        assert_eq!(safe_component("  "), "_");
    }

    #[test]
    fn test_safe_component_replaces_separators() {
        assert_eq!(safe_component("../etc"), ".._etc");
        assert_eq!(safe_component("/abs"), "_abs");
        assert_eq!(safe_component("a\\b"), "a_b");
        assert_eq!(safe_component("C:"), "C_");
        assert_eq!(safe_component("Eng Notes"), "Eng Notes");
    }

    #[test]
    fn test_joined_path_stays_inside_output() {
        let out = Path::new("paper-export");
        let mut dir = out.to_path_buf();
        for name in ["..", "/", "..", "."] {
            dir.push(safe_component(name));
        }
        let file = dir.join(format!("{}.md", safe_component("..")));

        assert!(file.starts_with(out));
        assert!(file
            .components()
            .all(|c| matches!(c, Component::Normal(_))));
        assert_eq!(file.components().count(), 6);
    }
}
