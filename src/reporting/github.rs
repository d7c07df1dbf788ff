//! GitHub REST reporting: pull request comment and check run.

use std::path::Path;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use reqwest::header::ACCEPT;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use super::{conclusion, render_markdown, Reporter, CHECK_NAME};
use crate::quality::results::QualityCheckResults;
use crate::{GateError, Result};

/// API root used when `GITHUB_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const API_VERSION: &str = "2022-11-28";

/// Pull request that triggered the workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRef {
    pub number: u64,
    pub head_sha: Option<String>,
}

/// The workflow run's repository, commit and triggering event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubContext {
    pub owner: String,
    pub repo: String,
    pub sha: String,
    pub event_name: Option<String>,
    pub pull_request: Option<PullRequestRef>,
    pub api_url: String,
}

impl GitHubContext {
    /// Read the context from the Actions runner environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `GITHUB_REPOSITORY` or `GITHUB_SHA` is missing, or
    /// if the event payload exists but is not valid JSON.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the context from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// See [`GitHubContext::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let repository = get("GITHUB_REPOSITORY")
            .ok_or_else(|| GateError::missing_context("GITHUB_REPOSITORY is not set"))?;
        let (owner, repo) = repository
            .split_once('/')
            .filter(|(owner, repo)| !owner.is_empty() && !repo.is_empty())
            .ok_or_else(|| {
                GateError::missing_context(format!(
                    "GITHUB_REPOSITORY '{repository}' is not in owner/repo form"
                ))
            })?;
        let sha =
            get("GITHUB_SHA").ok_or_else(|| GateError::missing_context("GITHUB_SHA is not set"))?;

        let pull_request = match get("GITHUB_EVENT_PATH") {
            Some(path) => read_pull_request(Path::new(&path))?,
            None => None,
        };

        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            sha,
            event_name: get("GITHUB_EVENT_NAME"),
            pull_request,
            api_url: get("GITHUB_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        })
    }

    /// Commit the check run is attached to: the PR head when known.
    #[must_use]
    pub fn head_sha(&self) -> &str {
        self.pull_request
            .as_ref()
            .and_then(|pr| pr.head_sha.as_deref())
            .unwrap_or(&self.sha)
    }
}

/// Extract the pull request from an event payload file.
///
/// A missing file yields no pull request, like an empty payload.
fn read_pull_request(path: &Path) -> Result<Option<PullRequestRef>> {
    if !path.exists() {
        warn!("GITHUB_EVENT_PATH {} does not exist", path.display());
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)?;
    let payload: Value = serde_json::from_str(&content)?;
    Ok(pull_request_from_payload(&payload))
}

fn pull_request_from_payload(payload: &Value) -> Option<PullRequestRef> {
    let pr = payload.get("pull_request")?;
    let number = pr.get("number").and_then(Value::as_u64)?;
    let head_sha = pr
        .pointer("/head/sha")
        .and_then(Value::as_str)
        .map(str::to_string);
    Some(PullRequestRef { number, head_sha })
}

/// Body of the issue-comment request.
#[must_use]
pub fn comment_payload(results: &QualityCheckResults) -> Value {
    json!({ "body": render_markdown(results) })
}

/// Body of the check-run request.
#[must_use]
pub fn check_run_payload(
    context: &GitHubContext,
    results: &QualityCheckResults,
    completed_at: &str,
) -> Value {
    let summary = if results.all_passed() {
        "All quality gates passed"
    } else {
        "Quality gate checks failed"
    };

    json!({
        "name": CHECK_NAME,
        "head_sha": context.head_sha(),
        "status": "completed",
        "conclusion": conclusion(results),
        "completed_at": completed_at,
        "output": {
            "title": CHECK_NAME,
            "summary": summary,
            "text": render_markdown(results),
        },
    })
}

/// Publishes results through the GitHub REST API.
pub struct GitHubReporter {
    client: reqwest::Client,
    token: String,
    context: GitHubContext,
}

impl GitHubReporter {
    /// Create a reporter with a default HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty or the client cannot be built.
    pub fn new(token: impl Into<String>, context: GitHubContext) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("quality-gate/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Self::with_client(token, context, client)
    }

    /// Create a reporter using `client`.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty.
    pub fn with_client(
        token: impl Into<String>,
        context: GitHubContext,
        client: reqwest::Client,
    ) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(GateError::invalid_config(
                "github-token",
                "a token is required to report to GitHub",
            ));
        }
        Ok(Self {
            client,
            token,
            context,
        })
    }

    #[must_use]
    pub fn context(&self) -> &GitHubContext {
        &self.context
    }

    async fn post(&self, operation: &str, path: &str, body: &Value) -> Result<()> {
        let url = format!("{}{}", self.context.api_url, path);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(GateError::api(operation, status.as_u16(), text));
        }
        Ok(())
    }
}

#[async_trait]
impl Reporter for GitHubReporter {
    async fn post_comment(&self, results: &QualityCheckResults) -> Result<()> {
        let Some(ref pr) = self.context.pull_request else {
            info!(
                "Not a pull request ({} event), skipping comment",
                self.context.event_name.as_deref().unwrap_or("unknown")
            );
            return Ok(());
        };

        let path = format!(
            "/repos/{}/{}/issues/{}/comments",
            self.context.owner, self.context.repo, pr.number
        );
        self.post("create comment", &path, &comment_payload(results))
            .await?;
        info!("Posted results to pull request #{}", pr.number);
        Ok(())
    }

    async fn set_check_status(&self, results: &QualityCheckResults) -> Result<()> {
        let path = format!(
            "/repos/{}/{}/check-runs",
            self.context.owner, self.context.repo
        );
        let completed_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let body = check_run_payload(&self.context, results, &completed_at);
        self.post("create check run", &path, &body).await?;
        debug!(
            "Check run for {} concluded {}",
            self.context.head_sha(),
            conclusion(results)
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::results::{CoverageResult, LintResult, TypeCheckResult};
    use std::collections::HashMap;
    use tempfile::TempDir;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    fn results(passed: bool) -> QualityCheckResults {
        QualityCheckResults {
            coverage: CoverageResult::measured(if passed { 80 } else { 40 }, 70),
            lint: LintResult::clean("✅ No linting errors found"),
            type_check: TypeCheckResult::passed("✅ No TypeScript errors found"),
        }
    }

    fn push_context(api_url: &str) -> GitHubContext {
        GitHubContext {
            owner: "acme".to_string(),
            repo: "widgets".to_string(),
            sha: "abc123".to_string(),
            event_name: Some("push".to_string()),
            pull_request: None,
            api_url: api_url.to_string(),
        }
    }

    fn local_client() -> reqwest::Client {
        reqwest::Client::builder().no_proxy().build().unwrap()
    }

    /// Serve one request, answering with `status` and returning the raw request.
    async fn serve_once(status: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
                let text = String::from_utf8_lossy(&buf).to_string();
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let length = text[..header_end]
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if buf.len() >= header_end + 4 + length {
                        break;
                    }
                }
            }
            let body = r#"{"message":"stub"}"#;
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            String::from_utf8_lossy(&buf).to_string()
        });
        (format!("http://{addr}"), handle)
    }

    #[test]
    fn test_context_from_push_event() {
        let ctx = GitHubContext::from_lookup(lookup(&[
            ("GITHUB_REPOSITORY", "acme/widgets"),
            ("GITHUB_SHA", "abc123"),
            ("GITHUB_EVENT_NAME", "push"),
        ]))
        .unwrap();

        assert_eq!(ctx.owner, "acme");
        assert_eq!(ctx.repo, "widgets");
        assert_eq!(ctx.event_name.as_deref(), Some("push"));
        assert_eq!(ctx.pull_request, None);
        assert_eq!(ctx.api_url, DEFAULT_API_URL);
        assert_eq!(ctx.head_sha(), "abc123");
    }

    #[test]
    fn test_context_reads_pull_request_from_event_file() {
        let temp = TempDir::new().unwrap();
        let event = temp.path().join("event.json");
        std::fs::write(
            &event,
            r#"{"action":"synchronize","pull_request":{"number":42,"head":{"sha":"feedbeef"}}}"#,
        )
        .unwrap();

        let ctx = GitHubContext::from_lookup(lookup(&[
            ("GITHUB_REPOSITORY", "acme/widgets"),
            ("GITHUB_SHA", "merge-sha"),
            ("GITHUB_EVENT_PATH", event.to_str().unwrap()),
            ("GITHUB_API_URL", "https://ghe.example.com/api/v3/"),
        ]))
        .unwrap();

        assert_eq!(
            ctx.pull_request,
            Some(PullRequestRef {
                number: 42,
                head_sha: Some("feedbeef".to_string())
            })
        );
        assert_eq!(ctx.head_sha(), "feedbeef");
        assert_eq!(ctx.api_url, "https://ghe.example.com/api/v3");
    }

    #[test]
    fn test_context_missing_event_file_means_no_pull_request() {
        let ctx = GitHubContext::from_lookup(lookup(&[
            ("GITHUB_REPOSITORY", "acme/widgets"),
            ("GITHUB_SHA", "abc123"),
            ("GITHUB_EVENT_PATH", "/nonexistent/event.json"),
        ]))
        .unwrap();
        assert!(ctx.pull_request.is_none());
    }

    #[test]
    fn test_context_requires_repository() {
        let err = GitHubContext::from_lookup(lookup(&[("GITHUB_SHA", "abc123")])).unwrap_err();
        assert!(matches!(err, GateError::MissingContext { .. }));

        let err = GitHubContext::from_lookup(lookup(&[
            ("GITHUB_REPOSITORY", "widgets"),
            ("GITHUB_SHA", "abc123"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("owner/repo"));
    }

    #[test]
    fn test_check_run_payload() {
        let body = check_run_payload(&push_context(DEFAULT_API_URL), &results(false), "2024-01-01T00:00:00Z");

        assert_eq!(body["name"], "Code Quality Gate");
        assert_eq!(body["head_sha"], "abc123");
        assert_eq!(body["status"], "completed");
        assert_eq!(body["conclusion"], "failure");
        assert_eq!(body["completed_at"], "2024-01-01T00:00:00Z");
        assert_eq!(body["output"]["title"], "Code Quality Gate");
        assert_eq!(body["output"]["summary"], "Quality gate checks failed");
        assert!(body["output"]["text"]
            .as_str()
            .unwrap()
            .starts_with("## Code Quality Gate ❌ FAILED"));

        let body = check_run_payload(&push_context(DEFAULT_API_URL), &results(true), "now");
        assert_eq!(body["conclusion"], "success");
        assert_eq!(body["output"]["summary"], "All quality gates passed");
    }

    #[test]
    fn test_reporter_requires_token() {
        let err = GitHubReporter::with_client("  ", push_context(DEFAULT_API_URL), local_client())
            .err()
            .unwrap();
        assert!(err.is_config_error());
    }

    #[tokio::test]
    async fn test_comment_skipped_outside_pull_requests() {
        // Unroutable URL: any request would fail.
        let reporter =
            GitHubReporter::with_client("token", push_context("http://127.0.0.1:1"), local_client())
                .unwrap();
        assert!(reporter.post_comment(&results(true)).await.is_ok());
    }

    #[tokio::test]
    async fn test_comment_posted_to_pull_request() {
        let (url, server) = serve_once("201 Created").await;
        let mut context = push_context(&url);
        context.pull_request = Some(PullRequestRef {
            number: 7,
            head_sha: Some("feedbeef".to_string()),
        });
        let reporter = GitHubReporter::with_client("s3cret", context, local_client()).unwrap();

        reporter.post_comment(&results(true)).await.unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /repos/acme/widgets/issues/7/comments HTTP/1.1"));
        let lower = request.to_lowercase();
        assert!(lower.contains("authorization: bearer s3cret"));
        assert!(lower.contains("accept: application/vnd.github+json"));
        assert!(lower.contains("x-github-api-version: 2022-11-28"));
        assert!(request.contains("Code Quality Gate ✅ PASSED"));
    }

    #[tokio::test]
    async fn test_check_run_rejection_is_an_api_error() {
        let (url, server) = serve_once("403 Forbidden").await;
        let reporter =
            GitHubReporter::with_client("s3cret", push_context(&url), local_client()).unwrap();

        let err = reporter.set_check_status(&results(false)).await.unwrap_err();

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /repos/acme/widgets/check-runs HTTP/1.1"));
        assert!(request.contains(r#""head_sha":"abc123""#));
        match err {
            GateError::Api {
                operation, status, ..
            } => {
                assert_eq!(operation, "create check run");
                assert_eq!(status, 403);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
