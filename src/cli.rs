use crate::config::SiteConfig;
use crate::export;
use crate::page::past::PastSeminarsPage;
use crate::page::seminar::SeminarPage;
use crate::site::{self, PageKind};
use crate::source::{self, resolve_data_source, DataSource, ResourceLocator};
use crate::text_summary;
use anyhow::{anyhow, bail, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Parser, Clone)]
#[command(
    name = "seminar-site",
    version,
    about = "Render seminar semester pages from JSON data"
)]
pub struct Cli {
    /// Config file (JSON). Defaults to <config dir>/seminar-site/config.json when present
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Site root: an http(s) URL or a local directory
    #[arg(long)]
    pub site_root: Option<String>,

    /// Directory under the site root holding the JSON resources
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Resource name of the semester index
    #[arg(long)]
    pub index_name: Option<String>,

    /// Page path to render, e.g. index.html or semesters/fall-2024.html
    #[arg(long, default_value = "index.html")]
    pub page: String,

    /// Render the past-seminars index regardless of --page
    #[arg(long)]
    pub past: bool,

    /// Toggle the abstract of talk N after rendering (repeatable)
    #[arg(long, value_name = "N")]
    pub expand: Vec<usize>,

    /// Stylesheet href relative to the site root
    #[arg(long)]
    pub stylesheet: Option<String>,

    /// Per-request timeout for HTTP fetches (no timeout by default)
    #[arg(long)]
    pub fetch_timeout: Option<humantime::Duration>,

    /// Print the loaded data as JSON instead of HTML
    #[arg(long, conflicts_with = "text")]
    pub json: bool,

    /// Print a plain-text summary instead of HTML
    #[arg(long)]
    pub text: bool,

    /// Write output to a file instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Build the whole site (index, past seminars, every semester page) into this directory
    #[arg(long, conflicts_with_all = ["json", "text", "out", "past"])]
    pub build_dir: Option<PathBuf>,
}

/// Merge the config file with CLI overrides.
pub fn build_config(args: &Cli) -> Result<SiteConfig> {
    let mut cfg = SiteConfig::load(args.config.as_deref())?;
    if let Some(root) = &args.site_root {
        cfg.site_root = root.clone();
    }
    if let Some(dir) = &args.data_dir {
        cfg.data_dir = dir.clone();
    }
    if let Some(name) = &args.index_name {
        cfg.index_name = name.clone();
    }
    if let Some(href) = &args.stylesheet {
        cfg.stylesheet = Some(href.clone());
    }
    if let Some(timeout) = args.fetch_timeout {
        cfg.fetch_timeout = Some(timeout.into());
    }
    Ok(cfg)
}

pub async fn run(args: Cli) -> Result<()> {
    let cfg = build_config(&args)?;
    let source = source::open(&cfg)?;

    if let Some(dir) = args.build_dir.as_deref() {
        let report = site::build_site(source.as_ref(), &cfg, dir).await?;
        if !report.failed.is_empty() {
            bail!("{} pages failed to load", report.failed.len());
        }
        return Ok(());
    }

    let kind = if args.past {
        PageKind::PastSeminars
    } else {
        PageKind::from_path(&args.page)
    };
    match kind {
        PageKind::Seminar => run_seminar(&args, &cfg, source.as_ref()).await,
        PageKind::PastSeminars => run_past(&args, &cfg, source.as_ref()).await,
    }
}

/// Page depth below the site root, for relative links.
fn page_depth(page: &str) -> usize {
    page.trim_start_matches("./")
        .trim_start_matches('/')
        .matches('/')
        .count()
}

async fn run_seminar(args: &Cli, cfg: &SiteConfig, source: &dyn DataSource) -> Result<()> {
    let locator = resolve_data_source(&args.page);
    let mut page = SeminarPage::new();
    page.load(source, &locator).await;

    for &index in &args.expand {
        if page.toggle_abstract(index).is_none() {
            warn!(index, "no talk to expand");
        }
    }

    let output = if args.json {
        let record = page
            .record()
            .ok_or_else(|| anyhow!("{}", error_of(page.state())))?;
        export::to_json(record)?
    } else if args.text {
        lines(text_summary::build_seminar_summary(&page)?.lines)
    } else {
        page.to_document(&site::document_options(cfg, page_depth(&args.page)))
    };
    export::write_output(args.out.as_deref(), &output)?;
    finish(page.state(), &locator)
}

async fn run_past(args: &Cli, cfg: &SiteConfig, source: &dyn DataSource) -> Result<()> {
    let mut page = PastSeminarsPage::new();
    page.load(source, &cfg.index_name).await;

    let output = if args.json {
        if let Some(msg) = page.state().error_message() {
            bail!("{msg}");
        }
        export::to_json(&page.summaries())?
    } else if args.text {
        lines(text_summary::build_past_summary(&page)?.lines)
    } else {
        page.to_document(&site::document_options(cfg, page_depth(&args.page)))
    };
    export::write_output(args.out.as_deref(), &output)?;
    if let Some(msg) = page.state().error_message() {
        bail!("{msg}");
    }
    info!(rows = page.summaries().len(), "rendered past seminars");
    Ok(())
}

fn error_of(state: &crate::page::UiState) -> &str {
    state.error_message().unwrap_or("no seminar data")
}

fn finish(state: &crate::page::UiState, locator: &ResourceLocator) -> Result<()> {
    match state.error_message() {
        Some(msg) => Err(anyhow!("{msg}").context(format!(
            "rendering page for {}",
            locator.resource_name()
        ))),
        None => {
            info!(resource = locator.resource_name(), "rendered seminar page");
            Ok(())
        }
    }
}

fn lines(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"site_root":"https://a.example","data_dir":"json","title":"Babytop"}"#,
        )
        .unwrap();

        let args = Cli::parse_from([
            "seminar-site",
            "--config",
            path.to_str().unwrap(),
            "--site-root",
            "https://b.example",
            "--fetch-timeout",
            "5s",
        ]);
        let cfg = build_config(&args).unwrap();
        assert_eq!(cfg.site_root, "https://b.example");
        assert_eq!(cfg.data_dir, "json");
        assert_eq!(cfg.title, "Babytop");
        assert_eq!(cfg.fetch_timeout, Some(std::time::Duration::from_secs(5)));
    }

    #[test]
    fn json_and_text_conflict() {
        assert!(Cli::try_parse_from(["seminar-site", "--json", "--text"]).is_err());
    }

    #[test]
    fn depth_counts_directories() {
        assert_eq!(page_depth("index.html"), 0);
        assert_eq!(page_depth("/index.html"), 0);
        assert_eq!(page_depth("semesters/fall-2024.html"), 1);
        assert_eq!(page_depth("./semesters/fall-2024.html"), 1);
    }

    #[tokio::test]
    async fn renders_local_semester_page_to_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("data")).unwrap();
        std::fs::write(
            dir.path().join("data").join("fall-2024.json"),
            r#"{"semester":"Fall 2024","topic":"Knots","meeting":"Evans 939","talks":[
                {"date":"Sep 6","year":"2024","title":"Braids","speaker":"Ada","affiliation":"UCB","abstract":"Artin groups."}
            ]}"#,
        )
        .unwrap();
        let out = dir.path().join("out.html");

        let args = Cli::parse_from([
            "seminar-site",
            "--config",
            dir.path().join("missing.json").to_str().unwrap(),
        ]);
        // Explicit config must exist.
        assert!(run(args).await.is_err());

        let args = Cli::parse_from([
            "seminar-site",
            "--site-root",
            dir.path().to_str().unwrap(),
            "--page",
            "semesters/fall-2024.html",
            "--expand",
            "0",
            "--out",
            out.to_str().unwrap(),
        ]);
        run(args).await.unwrap();

        let html = std::fs::read_to_string(&out).unwrap();
        assert!(html.contains("Fall 2024"));
        assert!(html.contains("talk-abstract expanded"));
        assert!(html.contains('▲'));
        assert!(html.contains("href=\"../style.css\""));
    }

    #[tokio::test]
    async fn error_page_is_written_and_reported() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.html");
        let args = Cli::parse_from([
            "seminar-site",
            "--site-root",
            dir.path().to_str().unwrap(),
            "--out",
            out.to_str().unwrap(),
        ]);
        let err = run(args).await.unwrap_err();
        assert!(format!("{err:#}").contains("Failed to load seminar data"));

        let html = std::fs::read_to_string(&out).unwrap();
        assert!(html.contains("id=\"error\" class=\"error\" style=\"display: block\""));
        assert!(html.contains("id=\"semester-info\" class=\"semester-info\" style=\"display: none\""));
    }
}
