//! Request and response types for the Paper docs endpoints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which timestamp `list_docs` filters on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListDocsFilterBy {
    Accessed,
    Modified,
    Created,
}

/// Which timestamp `list_docs` sorts on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListDocsSortBy {
    Accessed,
    Modified,
    Created,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListDocsSortOrder {
    Ascending,
    Descending,
}

/// Arguments for listing documents. Unset fields are left to server defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListDocsArgs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_by: Option<ListDocsFilterBy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<ListDocsSortBy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<ListDocsSortOrder>,
    /// Maximum number of ids per page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i32>,
}

impl ListDocsArgs {
    /// Create empty arguments
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter_by(mut self, filter_by: ListDocsFilterBy) -> Self {
        self.filter_by = Some(filter_by);
        self
    }

    pub fn with_sort_by(mut self, sort_by: ListDocsSortBy) -> Self {
        self.sort_by = Some(sort_by);
        self
    }

    pub fn with_sort_order(mut self, sort_order: ListDocsSortOrder) -> Self {
        self.sort_order = Some(sort_order);
        self
    }

    pub fn with_limit(mut self, limit: i32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Pagination cursor returned by a listing
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    /// Opaque cursor value
    pub value: String,
    /// Expiration timestamp as sent by the server
    #[serde(default)]
    pub expiration: String,
}

impl Cursor {
    /// Expiration as a timestamp, if the server sent a valid RFC 3339 value
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.expiration)
            .ok()
            .map(|d| d.with_timezone(&Utc))
    }
}

/// One page of document ids
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListDocsResponse {
    pub doc_ids: Vec<String>,
    #[serde(default)]
    pub cursor: Cursor,
    /// More ids are available through `list_docs_continue`
    #[serde(default)]
    pub has_more: bool,
}

#[derive(Clone, Debug, Serialize)]
pub(crate) struct ListDocsContinueArgs<'a> {
    pub cursor: &'a str,
}

/// Export format for downloads
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Markdown,
    Html,
}

/// Download request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocExportRequest {
    pub doc_id: String,
    pub export_format: ExportFormat,
}

impl DocExportRequest {
    pub fn new(doc_id: impl Into<String>, export_format: ExportFormat) -> Self {
        Self {
            doc_id: doc_id.into(),
            export_format,
        }
    }
}

/// Metadata delivered alongside exported content
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocExportResult {
    /// Owner account (usually an email)
    pub owner: String,
    pub title: String,
    pub revision: i64,
    pub mime_type: String,
}

/// Reference to a single document
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderRef {
    pub doc_id: String,
}

impl FolderRef {
    pub fn new(doc_id: impl Into<String>) -> Self {
        Self { doc_id: doc_id.into() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    pub name: String,
}

/// Who may access the folders containing a document
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FolderSharingPolicy {
    Team,
    InviteOnly,
}

/// Folder placement of a document
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoldersContainingDoc {
    /// Absent when the document is not inside any folder
    #[serde(
        rename = "FolderSharingPolicyType",
        alias = "folder_sharing_policy_type",
        default
    )]
    pub sharing_policy: Option<FolderSharingPolicy>,
    /// Outermost folder first
    #[serde(rename = "Folders", alias = "folders", default)]
    pub folders: Vec<Folder>,
}
