use super::{is_safe_slug, DataSource, FetchError};
use crate::config::SiteConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::debug;

/// Fetches `<site_root>/<data_dir>/<name>.json` over HTTP.
pub struct HttpSource {
    http: Client,
    data_url: Url,
}

impl HttpSource {
    pub fn new(cfg: &SiteConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(cfg.user_agent.clone());
        if let Some(timeout) = cfg.fetch_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("build HTTP client")?;

        let mut root = Url::parse(&cfg.site_root).context("parse site root URL")?;
        if !root.path().ends_with('/') {
            let path = format!("{}/", root.path());
            root.set_path(&path);
        }
        let data_dir = cfg.data_dir.trim_matches('/');
        let data_url = if data_dir.is_empty() {
            root
        } else {
            root.join(&format!("{data_dir}/"))
                .context("join data directory")?
        };

        Ok(Self { http, data_url })
    }

    /// URL of `resource`. `None` unless it resolves to a file directly under the data URL.
    pub fn url_for(&self, resource: &str) -> Option<Url> {
        if !is_safe_slug(resource) {
            return None;
        }
        let url = self.data_url.join(&format!("{resource}.json")).ok()?;
        url.as_str()
            .starts_with(self.data_url.as_str())
            .then_some(url)
    }
}

#[async_trait]
impl DataSource for HttpSource {
    fn locate(&self, resource: &str) -> String {
        self.url_for(resource)
            .map(|u| u.to_string())
            .unwrap_or_else(|| format!("{}{resource}.json", self.data_url))
    }

    async fn fetch_bytes(&self, resource: &str) -> Result<Vec<u8>, FetchError> {
        let url = self
            .url_for(resource)
            .ok_or_else(|| FetchError::InvalidResource {
                resource: resource.to_string(),
            })?;
        debug!(%url, "fetching");

        let transport = |source: reqwest::Error| {
            if source.is_timeout() {
                FetchError::Timeout {
                    resource: resource.to_string(),
                }
            } else {
                FetchError::Transport {
                    resource: resource.to_string(),
                    source,
                }
            }
        };

        let resp = self.http.get(url).send().await.map_err(transport)?;
        if !resp.status().is_success() {
            return Err(FetchError::Status {
                status: resp.status().as_u16(),
                resource: resource.to_string(),
            });
        }
        let body = resp.bytes().await.map_err(transport)?;
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(root: &str, data_dir: &str) -> HttpSource {
        HttpSource::new(&SiteConfig {
            site_root: root.into(),
            data_dir: data_dir.into(),
            ..SiteConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn resources_live_under_the_data_directory() {
        let s = source("https://math.example.edu/seminar", "data");
        assert_eq!(
            s.url_for("fall-2024").unwrap().as_str(),
            "https://math.example.edu/seminar/data/fall-2024.json"
        );
    }

    #[test]
    fn trailing_slashes_do_not_double_up() {
        let s = source("https://math.example.edu/seminar/", "/data/");
        assert_eq!(
            s.locate("current"),
            "https://math.example.edu/seminar/data/current.json"
        );
    }

    #[test]
    fn empty_data_dir_reads_from_root() {
        let s = source("http://localhost:8000", "");
        assert_eq!(
            s.locate("semesters-index"),
            "http://localhost:8000/semesters-index.json"
        );
    }

    #[tokio::test]
    async fn resources_cannot_leave_the_data_url() {
        let s = source("https://math.example.edu/seminar", "data");
        for name in ["https://evil.example/x", "//evil.example/x", "../secret", "a/b"] {
            assert!(s.url_for(name).is_none(), "{name:?} resolved");
            let err = s.fetch_bytes(name).await.unwrap_err();
            assert!(matches!(err, FetchError::InvalidResource { .. }));
        }
    }

    mod served {
        use super::*;
        use crate::page::past::PastSeminarsPage;
        use crate::page::seminar::SeminarPage;
        use crate::page::{Region, UiState};
        use crate::source::{fetch_semester, ResourceLocator};
        use axum::{http::StatusCode, routing::get, Router};
        use std::time::Duration;
        use tokio::net::TcpListener;

        const CURRENT: &str = r#"{
            "semester": "Spring 2025",
            "topic": "Condensed mathematics",
            "meeting": "Evans 939",
            "organizers": ["Ada", "Grace"],
            "talks": [
                {"date":"Jan 24","year":"2025","title":"Solid modules","speaker":"Emmy","affiliation":"Bonn","abstract":"..."}
            ]
        }"#;

        async fn serve() -> String {
            let app = Router::new()
                .route("/seminar/data/current.json", get(|| async { CURRENT }))
                .route(
                    "/seminar/data/semesters-index.json",
                    get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
                )
                .route(
                    "/seminar/data/slow.json",
                    get(|| async {
                        tokio::time::sleep(Duration::from_secs(5)).await;
                        CURRENT
                    }),
                );
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                let _ = axum::serve(listener, app).await;
            });
            format!("http://{addr}/seminar")
        }

        fn http_source(root: String, timeout: Option<Duration>) -> HttpSource {
            HttpSource::new(&SiteConfig {
                site_root: root,
                fetch_timeout: timeout,
                ..SiteConfig::default()
            })
            .unwrap()
        }

        #[tokio::test]
        async fn loads_current_semester_over_http() {
            let source = http_source(serve().await, None);
            let mut page = SeminarPage::new();
            page.load(&source, &ResourceLocator::Current).await;

            assert_eq!(page.state(), &UiState::Content);
            let record = page.record().unwrap();
            assert_eq!(record.semester, "Spring 2025");
            assert_eq!(record.talks.len(), 1);
        }

        #[tokio::test]
        async fn index_500_leaves_page_in_error() {
            let source = http_source(serve().await, None);
            let mut page = PastSeminarsPage::new();
            page.load(&source, "semesters-index").await;

            let msg = page.state().error_message().unwrap();
            assert_eq!(
                msg,
                "Failed to load past seminars: HTTP 500 for semesters-index"
            );
            assert!(page.shell().is_visible(Region::Error));
            assert!(!page.shell().is_visible(Region::Content));
        }

        #[tokio::test]
        async fn missing_resource_is_a_404() {
            let source = http_source(serve().await, None);
            let err = fetch_semester(&source, "fall-1999").await.unwrap_err();
            assert!(matches!(err, FetchError::Status { status: 404, .. }));
        }

        #[tokio::test]
        async fn configured_timeout_bounds_hung_fetches() {
            let source = http_source(serve().await, Some(Duration::from_millis(200)));
            let err = source.fetch_bytes("slow").await.unwrap_err();
            assert!(matches!(err, FetchError::Timeout { .. }));
        }
    }
}
