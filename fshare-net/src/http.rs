// fshare-net/src/http.rs
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use fshare_common::config::Config;
use fshare_common::error::{FshareError, Result};
use fshare_common::model::{CandidateFile, RepoRef};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, StatusCode};
use tracing::{debug, info, warn};
use url::Url;

use crate::validation::validate_url;

const USER_AGENT_STRING: &str = "fshare installer (Rust)";

/// HTTP access to the repository host.
#[derive(Debug, Clone)]
pub struct RepoClient {
    client: Client,
    base_url: Url,
}

impl RepoClient {
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = validate_url(&config.base_url)?;
        let client = build_http_client(config)?;
        debug!("Repository client ready for {}", base_url);
        Ok(Self { client, base_url })
    }

    /// `{base-url}/{owner}/{name}/{file}`
    pub fn candidate_url(&self, repo: &RepoRef, candidate: CandidateFile) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                FshareError::Config(format!("Base URL '{}' cannot carry a path", self.base_url))
            })?
            .pop_if_empty()
            .extend([repo.owner(), repo.name(), candidate.file_name()]);
        Ok(url)
    }

    /// Probes every candidate in order and stores each one answered with
    /// HTTP 200 in `dest_dir`. Failures are recorded per candidate and never
    /// stop the remaining probes.
    pub async fn fetch(&self, repo: &RepoRef, dest_dir: &Path) -> FetchReport {
        info!("Fetching repo: {}", repo);
        let mut attempts = Vec::with_capacity(CandidateFile::ALL.len());

        for candidate in CandidateFile::ALL {
            let outcome = match self.candidate_url(repo, candidate) {
                Ok(url) => {
                    info!("Trying {} ...", url);
                    let dest = dest_dir.join(candidate.file_name());
                    self.fetch_candidate(&url, &dest).await
                }
                Err(e) => Err(e),
            };
            match &outcome {
                Ok(path) => info!("Downloaded {} to {}", candidate, path.display()),
                Err(FshareError::DownloadError(_, _, reason)) => {
                    warn!("Not found: {} ({})", candidate, reason)
                }
                Err(e) => warn!("Error fetching {}: {}", candidate, e),
            }
            attempts.push(CandidateAttempt { candidate, outcome });
        }

        FetchReport {
            repo: repo.clone(),
            attempts,
        }
    }

    async fn fetch_candidate(&self, url: &Url, dest: &Path) -> Result<PathBuf> {
        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            debug!("HTTP request failed for {url}: {e}");
            FshareError::from(e)
        })?;
        let status = response.status();
        debug!("Received HTTP status: {} for {}", status, url);

        if status != StatusCode::OK {
            return Err(FshareError::DownloadError(
                dest.file_name()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_default(),
                url.to_string(),
                format!("HTTP {status}"),
            ));
        }

        let content = response.bytes().await.map_err(|e| {
            FshareError::HttpError(format!("Failed to read response body bytes: {e}"))
        })?;
        fshare_aio::fs::atomic_write_file(dest, &content)?;
        debug!("Wrote {} bytes to {}", content.len(), dest.display());
        Ok(dest.to_path_buf())
    }
}

fn build_http_client(config: &Config) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_STRING));
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));

    let mut builder = Client::builder()
        .default_headers(headers)
        .redirect(reqwest::redirect::Policy::limited(10));
    if let Some(timeout) = config.http_timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(timeout) = config.connect_timeout {
        builder = builder.connect_timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| FshareError::HttpError(format!("Failed to build HTTP client: {e}")))
}

/// Outcome of probing one candidate.
#[derive(Debug)]
pub struct CandidateAttempt {
    pub candidate: CandidateFile,
    pub outcome: Result<PathBuf>,
}

/// Every probe made by [`RepoClient::fetch`], in probe order.
#[derive(Debug)]
pub struct FetchReport {
    repo: RepoRef,
    attempts: Vec<CandidateAttempt>,
}

impl FetchReport {
    pub fn attempts(&self) -> &[CandidateAttempt] {
        &self.attempts
    }

    pub fn retrieved(&self) -> impl Iterator<Item = (CandidateFile, &Path)> {
        self.attempts.iter().filter_map(|a| match &a.outcome {
            Ok(path) => Some((a.candidate, path.as_path())),
            Err(_) => None,
        })
    }

    pub fn contains(&self, candidate: CandidateFile) -> bool {
        self.retrieved().any(|(c, _)| c == candidate)
    }

    /// Folds the attempts into the set of retrieved files. An empty set is
    /// [`FshareError::NotFound`].
    pub fn into_retrieved(self) -> Result<RetrievedSet> {
        let files: BTreeMap<_, _> = self
            .attempts
            .into_iter()
            .filter_map(|a| a.outcome.ok().map(|path| (a.candidate, path)))
            .collect();
        if files.is_empty() {
            return Err(FshareError::NotFound(format!(
                "No files found in repo {}",
                self.repo
            )));
        }
        Ok(RetrievedSet { files })
    }
}

/// Candidates that were downloaded into the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievedSet {
    files: BTreeMap<CandidateFile, PathBuf>,
}

impl RetrievedSet {
    pub fn contains(&self, candidate: CandidateFile) -> bool {
        self.files.contains_key(&candidate)
    }

    pub fn path(&self, candidate: CandidateFile) -> Option<&Path> {
        self.files.get(&candidate).map(PathBuf::as_path)
    }

    /// Retrieved archives in extraction order.
    pub fn archives(&self) -> impl Iterator<Item = (CandidateFile, &Path)> {
        CandidateFile::ARCHIVES
            .into_iter()
            .filter_map(|c| self.path(c).map(|p| (c, p)))
    }

    pub fn candidates(&self) -> Vec<CandidateFile> {
        self.files.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use httpmock::prelude::*;
    use tempfile::TempDir;

    use super::*;

    fn client_for(server: &MockServer) -> RepoClient {
        let base = format!("{}/repos", server.base_url());
        let config = Config::from_lookup(|key| match key {
            "FSHARE_BASE_URL" => Some(base.clone()),
            _ => None,
        })
        .unwrap();
        RepoClient::new(&config).unwrap()
    }

    #[test]
    fn candidate_url_joins_owner_name_and_file() {
        let config = Config::from_lookup(|key| match key {
            "FSHARE_BASE_URL" => Some("https://example.net/repos/".to_string()),
            _ => None,
        })
        .unwrap();
        let client = RepoClient::new(&config).unwrap();
        let repo = RepoRef::parse("alice/tool").unwrap();
        let url = client
            .candidate_url(&repo, CandidateFile::InstallScript)
            .unwrap();
        assert_eq!(url.as_str(), "https://example.net/repos/alice/tool/install.sh");
    }

    #[tokio::test]
    async fn probes_all_candidates_in_order_and_keeps_only_200() {
        let server = MockServer::start();
        let main = server.mock(|when, then| {
            when.method(GET).path("/repos/alice/tool/main.zip");
            then.status(500);
        });
        let app = server.mock(|when, then| {
            when.method(GET).path("/repos/alice/tool/app.zip");
            then.status(200).body("zip-bytes");
        });
        let root = server.mock(|when, then| {
            when.method(GET).path("/repos/alice/tool/root.zip");
            then.status(204);
        });
        let script = server.mock(|when, then| {
            when.method(GET).path("/repos/alice/tool/install.sh");
            then.status(200).body("#!/bin/sh\n");
        });

        let dir = TempDir::new().unwrap();
        let repo = RepoRef::parse("alice/tool").unwrap();
        let report = client_for(&server).fetch(&repo, dir.path()).await;

        let order: Vec<_> = report.attempts().iter().map(|a| a.candidate).collect();
        assert_eq!(order, CandidateFile::ALL);
        main.assert();
        app.assert();
        root.assert();
        script.assert();
        assert!(report.contains(CandidateFile::AppArchive));
        assert!(!report.contains(CandidateFile::MainArchive));

        let retrieved = report.into_retrieved().unwrap();
        assert_eq!(
            retrieved.candidates(),
            vec![CandidateFile::AppArchive, CandidateFile::InstallScript]
        );
        assert_eq!(
            std::fs::read(dir.path().join("app.zip")).unwrap(),
            b"zip-bytes"
        );
        assert!(!dir.path().join("main.zip").exists());
        assert!(!dir.path().join("root.zip").exists());
    }

    #[tokio::test]
    async fn transport_error_does_not_stop_later_probes() {
        let server = MockServer::start();
        let slow = server.mock(|when, then| {
            when.method(GET).path("/repos/alice/tool/main.zip");
            then.status(200).body("late").delay(Duration::from_secs(3));
        });
        let app = server.mock(|when, then| {
            when.method(GET).path("/repos/alice/tool/app.zip");
            then.status(200).body("zip-bytes");
        });
        let base = format!("{}/repos", server.base_url());
        let config = Config::from_lookup(|key| match key {
            "FSHARE_BASE_URL" => Some(base.clone()),
            "FSHARE_HTTP_TIMEOUT_SECS" => Some("1".to_string()),
            _ => None,
        })
        .unwrap();

        let dir = TempDir::new().unwrap();
        let repo = RepoRef::parse("alice/tool").unwrap();
        let report = RepoClient::new(&config).unwrap().fetch(&repo, dir.path()).await;

        slow.assert();
        app.assert();
        let attempts = report.attempts();
        assert_eq!(attempts.len(), 4);
        assert!(matches!(attempts[0].outcome, Err(FshareError::Http(_))));
        assert!(!dir.path().join("main.zip").exists());
        assert_eq!(
            report.into_retrieved().unwrap().candidates(),
            vec![CandidateFile::AppArchive]
        );
    }

    #[tokio::test]
    async fn nothing_retrieved_is_not_found() {
        let server = MockServer::start();
        let dir = TempDir::new().unwrap();
        let repo = RepoRef::parse("alice/missing").unwrap();

        let report = client_for(&server).fetch(&repo, dir.path()).await;
        assert_eq!(report.attempts().len(), 4);
        assert_eq!(report.retrieved().count(), 0);
        assert!(!report.contains(CandidateFile::MainArchive));
        assert!(matches!(
            report.into_retrieved(),
            Err(FshareError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn archives_are_listed_in_extraction_order() {
        let server = MockServer::start();
        for file in ["root.zip", "main.zip"] {
            server.mock(|when, then| {
                when.method(GET).path(format!("/repos/alice/tool/{file}"));
                then.status(200).body("x");
            });
        }
        let dir = TempDir::new().unwrap();
        let repo = RepoRef::parse("alice/tool").unwrap();
        let retrieved = client_for(&server)
            .fetch(&repo, dir.path())
            .await
            .into_retrieved()
            .unwrap();

        let archives: Vec<_> = retrieved.archives().map(|(c, _)| c).collect();
        assert_eq!(
            archives,
            vec![CandidateFile::MainArchive, CandidateFile::RootArchive]
        );
        assert!(!retrieved.contains(CandidateFile::InstallScript));
    }
}
