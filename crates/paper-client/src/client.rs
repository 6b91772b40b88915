//! Main client implementation

use crate::{
    ApiError, ClientError, Config, Context, Result,
    types::*,
};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, RequestBuilder, Response, StatusCode, header};
use serde::{Serialize, de::DeserializeOwned};
use std::future::Future;
use tracing::{debug, instrument};

/// Request header carrying the JSON argument of a content call
pub const API_ARG_HEADER: &str = "Dropbox-API-Arg";
/// Response header carrying the JSON result of a content call
pub const API_RESULT_HEADER: &str = "Dropbox-API-Result";

const LIST_DOCS: &str = "/2/paper/docs/list";
const LIST_DOCS_CONTINUE: &str = "/2/paper/docs/list/continue";
const DOWNLOAD_DOC: &str = "/2/paper/docs/download";
const GET_FOLDER_INFO: &str = "/2/paper/docs/get_folder_info";

/// Operations offered by the Paper docs API
#[async_trait]
pub trait PaperApi: Send + Sync {
    /// List one page of documents. Follow up with `list_docs_continue`
    /// while `has_more` is set.
    async fn list_docs(&self, ctx: &Context, args: &ListDocsArgs) -> Result<ListDocsResponse>;

    /// Fetch the page after `cursor`
    async fn list_docs_continue(&self, ctx: &Context, cursor: &str) -> Result<ListDocsResponse>;

    /// Export a document, returning its metadata and raw content
    async fn download_doc(
        &self,
        ctx: &Context,
        request: &DocExportRequest,
    ) -> Result<(DocExportResult, Bytes)>;

    /// Folders containing a document, outermost first
    async fn get_folder_info(&self, ctx: &Context, doc: &FolderRef) -> Result<FoldersContainingDoc>;
}

/// Paper docs API client
#[derive(Clone)]
pub struct PaperClient {
    config: Config,
    http: Client,
}

impl PaperClient {
    /// Create a client for `token` with default configuration
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_config(Config::new(token))
    }

    /// Create a new client with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_str(&config.user_agent)
                .map_err(|_| ClientError::Config(format!("invalid user agent: {:?}", config.user_agent)))?,
        );

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self { config, http })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    // ==================== Helper Methods ====================

    fn post(&self, route: &str) -> RequestBuilder {
        self.http
            .post(self.config.url(route))
            .bearer_auth(&self.config.access_token)
    }

    /// JSON in, JSON out.
    pub(crate) async fn rpc<I, O>(&self, ctx: &Context, route: &str, arg: &I) -> Result<O>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let body = serde_json::to_vec(arg)?;
        let req = self
            .post(route)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body);

        with_context(ctx, async move {
            debug!("Sending rpc request to {}", route);
            let response = check_status(req.send().await?).await?;
            let body = response.bytes().await?;
            Ok(serde_json::from_slice(&body)?)
        })
        .await
    }

    /// JSON argument in a header, JSON result in a header, raw content in the body.
    pub(crate) async fn content<I, O>(&self, ctx: &Context, route: &str, arg: &I) -> Result<(O, Bytes)>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned + Default,
    {
        let json = serde_json::to_string(arg)?;
        let value = header::HeaderValue::from_str(&header_safe_json(&json))
            .map_err(|e| ClientError::Encoding(serde::ser::Error::custom(e)))?;
        let req = self.post(route).header(API_ARG_HEADER, value);

        with_context(ctx, async move {
            debug!("Sending content request to {}", route);
            let response = check_status(req.send().await?).await?;

            let result = match response.headers().get(API_RESULT_HEADER) {
                Some(raw) if !raw.is_empty() => serde_json::from_slice(raw.as_bytes())?,
                _ => O::default(),
            };

            let content = response.bytes().await?;
            debug!("Received {} bytes of content", content.len());
            Ok((result, content))
        })
        .await
    }
}

#[async_trait]
impl PaperApi for PaperClient {
    #[instrument(skip(self, ctx))]
    async fn list_docs(&self, ctx: &Context, args: &ListDocsArgs) -> Result<ListDocsResponse> {
        self.rpc(ctx, LIST_DOCS, args).await
    }

    #[instrument(skip(self, ctx))]
    async fn list_docs_continue(&self, ctx: &Context, cursor: &str) -> Result<ListDocsResponse> {
        self.rpc(ctx, LIST_DOCS_CONTINUE, &ListDocsContinueArgs { cursor }).await
    }

    #[instrument(skip(self, ctx))]
    async fn download_doc(
        &self,
        ctx: &Context,
        request: &DocExportRequest,
    ) -> Result<(DocExportResult, Bytes)> {
        self.content(ctx, DOWNLOAD_DOC, request).await
    }

    #[instrument(skip(self, ctx))]
    async fn get_folder_info(&self, ctx: &Context, doc: &FolderRef) -> Result<FoldersContainingDoc> {
        self.rpc(ctx, GET_FOLDER_INFO, doc).await
    }
}

/// Run `call` until it finishes or `ctx` is done. The losing future is
/// dropped, which releases the connection.
async fn with_context<T>(ctx: &Context, call: impl Future<Output = Result<T>>) -> Result<T> {
    if ctx.is_done() {
        return Err(ClientError::Cancelled);
    }

    tokio::select! {
        biased;
        _ = ctx.done() => {
            debug!("Request cancelled");
            Err(ClientError::Cancelled)
        }
        result = call => result,
    }
}

/// Turn any non-200 response into a remote error.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status == StatusCode::OK {
        return Ok(response);
    }

    let body = response.bytes().await?;
    debug!("API returned {}", status);
    let error: ApiError = serde_json::from_slice(&body)?;
    Err(ClientError::Remote {
        status: status.as_u16(),
        error,
    })
}

/// Escape characters outside printable ASCII so JSON can travel in a header.
fn header_safe_json(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        if (' '..='~').contains(&c) {
            out.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{:04x}", unit));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

    struct Echo;

    impl Respond for Echo {
        fn respond(&self, request: &Request) -> ResponseTemplate {
            ResponseTemplate::new(200).set_body_bytes(request.body.clone())
        }
    }

    #[test]
    fn test_header_safe_json() {
        assert_eq!(header_safe_json(r#"{"doc_id":"abc"}"#), r#"{"doc_id":"abc"}"#);
        assert_eq!(header_safe_json("\"caf\u{e9}\""), r#""caf\u00e9""#);
        assert_eq!(header_safe_json("\u{1f600}"), r"\ud83d\ude00");
        assert_eq!(header_safe_json("\u{7f}"), r"\u007f");
    }

    #[test]
    fn test_header_safe_json_is_valid_header() {
        let request = DocExportRequest::new("a\n\tb\u{7f}\u{e9}\u{1f600}\"", ExportFormat::Html);
        let json = serde_json::to_string(&request).unwrap();

        let value = header::HeaderValue::from_str(&header_safe_json(&json)).unwrap();
        let decoded: DocExportRequest = serde_json::from_slice(value.as_bytes()).unwrap();
        assert_eq!(decoded, request);
    }

    #[tokio::test]
    async fn test_list_args_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(LIST_DOCS))
            .respond_with(Echo)
            .mount(&server)
            .await;

        let client = PaperClient::with_config(Config::new("tok").with_base_url(server.uri())).unwrap();
        let ctx = Context::background();

        let filters = [
            None,
            Some(ListDocsFilterBy::Accessed),
            Some(ListDocsFilterBy::Modified),
            Some(ListDocsFilterBy::Created),
        ];
        let sorts = [
            None,
            Some(ListDocsSortBy::Accessed),
            Some(ListDocsSortBy::Modified),
            Some(ListDocsSortBy::Created),
        ];
        let orders = [
            None,
            Some(ListDocsSortOrder::Ascending),
            Some(ListDocsSortOrder::Descending),
        ];
        let limits = [None, Some(i32::MIN), Some(-1), Some(0), Some(100), Some(i32::MAX)];

        let mut cases = Vec::new();
        for filter_by in filters {
            for sort_by in sorts {
                for sort_order in orders {
                    for limit in limits {
                        cases.push(ListDocsArgs {
                            filter_by,
                            sort_by,
                            sort_order,
                            limit,
                        });
                    }
                }
            }
        }
        assert_eq!(cases.len(), 288);

        for args in cases {
            let echoed: ListDocsArgs = client.rpc(&ctx, LIST_DOCS, &args).await.unwrap();
            assert_eq!(echoed, args);
        }
    }

    #[tokio::test]
    async fn test_content_decodes_unicode_arg_header() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(DOWNLOAD_DOC))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"x".to_vec()))
            .mount(&server)
            .await;

        let client = PaperClient::with_config(Config::new("tok").with_base_url(server.uri())).unwrap();
        let request = DocExportRequest::new("d\u{e9}", ExportFormat::Markdown);
        let (_, content): (DocExportResult, Bytes) = client
            .content(&Context::background(), DOWNLOAD_DOC, &request)
            .await
            .unwrap();
        assert_eq!(&content[..], b"x");

        let received = server.received_requests().await.unwrap();
        let arg = received[0].headers.get(API_ARG_HEADER).unwrap().to_str().unwrap();
        let decoded: DocExportRequest = serde_json::from_str(arg).unwrap();
        assert_eq!(decoded, request);
    }
}
