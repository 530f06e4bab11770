//! Page selection and whole-site builds.

use crate::config::SiteConfig;
use crate::export;
use crate::page::past::PastSeminarsPage;
use crate::page::seminar::SeminarPage;
use crate::page::DocumentOptions;
use crate::source::{is_safe_slug, DataSource, ResourceLocator};
use anyhow::Result;
use futures::future::join_all;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const PAST_SEMINARS_PAGE: &str = "past-seminars.html";

/// Which controller serves a page path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Seminar,
    PastSeminars,
}

impl PageKind {
    pub fn from_path(path: &str) -> Self {
        let file = path.rsplit('/').next().unwrap_or_default();
        if file == PAST_SEMINARS_PAGE {
            PageKind::PastSeminars
        } else {
            PageKind::Seminar
        }
    }
}

/// Document options for a page at `depth` directories below the site root.
pub fn document_options(cfg: &SiteConfig, depth: usize) -> DocumentOptions {
    DocumentOptions {
        title: cfg.title.clone(),
        stylesheet: cfg.stylesheet.clone(),
        root: "../".repeat(depth),
    }
}

/// Pages written by a site build.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub written: Vec<PathBuf>,
    /// Pages that ended in the error state or were skipped, with their message.
    pub failed: Vec<(PathBuf, String)>,
}

impl BuildReport {
    fn skip(&mut self, path: PathBuf, msg: String) {
        warn!(page = %path.display(), error = %msg, "page skipped");
        self.failed.push((path, msg));
    }

    fn record(&mut self, path: PathBuf, error: Option<&str>) {
        if let Some(msg) = error {
            warn!(page = %path.display(), error = msg, "page rendered in error state");
            self.failed.push((path.clone(), msg.to_string()));
        }
        self.written.push(path);
    }
}

async fn render_seminar(
    source: &dyn DataSource,
    locator: ResourceLocator,
) -> (ResourceLocator, SeminarPage) {
    let mut page = SeminarPage::new();
    page.load(source, &locator).await;
    (locator, page)
}

/// Render the landing page, the past-seminars index and one page per indexed semester into `out_dir`.
pub async fn build_site(
    source: &dyn DataSource,
    cfg: &SiteConfig,
    out_dir: &Path,
) -> Result<BuildReport> {
    let mut report = BuildReport::default();

    let mut past = PastSeminarsPage::new();
    past.load(source, &cfg.index_name).await;
    let past_path = out_dir.join(PAST_SEMINARS_PAGE);
    export::write_file(&past_path, &past.to_document(&document_options(cfg, 0)))?;
    report.record(past_path, past.state().error_message());

    let mut locators = vec![ResourceLocator::Current];
    for summary in past.summaries() {
        if is_safe_slug(&summary.slug) {
            locators.push(ResourceLocator::Semester(summary.slug.clone()));
        } else {
            report.skip(
                PathBuf::from(format!("semesters/{}.html", summary.slug)),
                format!("unsafe semester slug {:?}", summary.slug),
            );
        }
    }
    let pages = join_all(locators.into_iter().map(|l| render_seminar(source, l))).await;

    for (locator, page) in pages {
        let (path, depth) = match &locator {
            ResourceLocator::Current => (out_dir.join("index.html"), 0),
            ResourceLocator::Semester(slug) => {
                (out_dir.join("semesters").join(format!("{slug}.html")), 1)
            }
        };
        export::write_file(&path, &page.to_document(&document_options(cfg, depth)))?;
        report.record(path, page.state().error_message());
    }

    info!(
        written = report.written.len(),
        failed = report.failed.len(),
        out_dir = %out_dir.display(),
        "site build finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::testing::MemorySource;

    #[test]
    fn page_kind_from_path() {
        assert_eq!(PageKind::from_path("/past-seminars.html"), PageKind::PastSeminars);
        assert_eq!(PageKind::from_path("past-seminars.html"), PageKind::PastSeminars);
        assert_eq!(PageKind::from_path("/index.html"), PageKind::Seminar);
        assert_eq!(
            PageKind::from_path("/semesters/fall-2024.html"),
            PageKind::Seminar
        );
    }

    #[tokio::test]
    async fn build_writes_every_page_and_reports_failures() {
        let semester = |label: &str| {
            format!(r#"{{"semester":"{label}","topic":"T","meeting":"M","talks":[]}}"#)
        };
        let source = MemorySource::default()
            .with("current", &semester("Spring 2025"))
            .with("semesters-index", r#"{"semesters":["fall-2024","spring-2024"]}"#)
            .with("fall-2024", &semester("Fall 2024"))
            .with_status("spring-2024", 503);
        let dir = tempfile::tempdir().unwrap();
        let cfg = SiteConfig::default();

        let report = build_site(&source, &cfg, dir.path()).await.unwrap();

        assert_eq!(report.written.len(), 4);
        assert!(dir.path().join("index.html").exists());
        assert!(dir.path().join("past-seminars.html").exists());
        let fall = std::fs::read_to_string(dir.path().join("semesters/fall-2024.html")).unwrap();
        assert!(fall.contains("Fall 2024"));
        assert!(fall.contains("href=\"../style.css\""));

        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].0.ends_with("semesters/spring-2024.html"));
        assert!(report.failed[0].1.contains("503"));
    }

    #[tokio::test]
    async fn unsafe_slugs_are_skipped_and_reported() {
        let semester = r#"{"semester":"S","topic":"T","meeting":"M","talks":[]}"#;
        let source = MemorySource::default()
            .with("current", semester)
            .with(
                "semesters-index",
                r#"{"semesters":["../../pwned","nested/page","fall-2024"]}"#,
            )
            .with("../../pwned", semester)
            .with("nested/page", semester)
            .with("fall-2024", semester);
        let root = tempfile::tempdir().unwrap();
        let out_dir = root.path().join("a").join("site");

        let report = build_site(&source, &SiteConfig::default(), &out_dir)
            .await
            .unwrap();

        assert!(!root.path().join("a").join("pwned.html").exists());
        assert!(!out_dir.join("semesters").join("nested").exists());
        assert!(out_dir.join("semesters").join("fall-2024.html").exists());
        assert_eq!(report.written.len(), 3);
        assert_eq!(report.failed.len(), 2);
        assert!(report.failed[0].1.contains("../../pwned"));
    }
}
