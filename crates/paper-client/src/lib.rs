//! # Paper Client SDK
//!
//! A client SDK for the Dropbox Paper documents API.
//!
//! ## Features
//!
//! - **Listing**: Page through document ids with filters and sorting
//! - **Export**: Download documents as Markdown or HTML together with their metadata
//! - **Folders**: Resolve which folders contain a document
//! - **Cancellation**: Every call runs under a [`Context`] that can be cancelled or given a deadline
//!
//! ## Example
//!
//! ```rust,ignore
//! use paper_client::{Context, DocExportRequest, ExportFormat, ListDocsArgs, PaperApi, PaperClient};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = PaperClient::new("your-oauth-token")?;
//!     let ctx = Context::with_timeout(Duration::from_secs(30));
//!
//!     let page = client.list_docs(&ctx, &ListDocsArgs::new().with_limit(10)).await?;
//!     for id in &page.doc_ids {
//!         let (meta, content) = client
//!             .download_doc(&ctx, &DocExportRequest::new(id, ExportFormat::Markdown))
//!             .await?;
//!         println!("{} (rev {}): {} bytes", meta.title, meta.revision, content.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod context;
mod error;
mod types;

pub use client::{PaperApi, PaperClient, API_ARG_HEADER, API_RESULT_HEADER};
pub use config::{Config, DEFAULT_BASE_URL};
pub use context::Context;
pub use error::{ApiError, ClientError, Result};
pub use types::*;

pub use bytes::Bytes;
pub use tokio_util::sync::CancellationToken;
