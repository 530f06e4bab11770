//! Past-seminars index: one row per semester listed in the index resource.

use super::dom::Element;
use super::{render_document, DocumentOptions, PageShell, UiState};
use crate::format::format_name_list;
use crate::model::SemesterSummary;
use crate::source::{fetch_index, fetch_semester, is_safe_slug, DataSource};
use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, error, info, warn};

pub const CONTENT_ID: &str = "talks-container";

pub struct PastSeminarsPage {
    shell: PageShell,
    summaries: Vec<SemesterSummary>,
}

impl Default for PastSeminarsPage {
    fn default() -> Self {
        Self::new()
    }
}

impl PastSeminarsPage {
    pub fn new() -> Self {
        let content = Element::div()
            .with_id(CONTENT_ID)
            .with_class("past-semesters");
        Self {
            shell: PageShell::new(content),
            summaries: Vec::new(),
        }
    }

    pub fn state(&self) -> &UiState {
        self.shell.state()
    }

    pub fn shell(&self) -> &PageShell {
        &self.shell
    }

    pub fn summaries(&self) -> &[SemesterSummary] {
        &self.summaries
    }

    /// Fetch the index and every listed semester, then render.
    ///
    /// Only a failed index fetch is a page error; individual semesters fall back.
    pub async fn load(&mut self, source: &dyn DataSource, index_name: &str) {
        info!(location = %source.locate(index_name), "loading past seminars");
        let index = match fetch_index(source, index_name).await {
            Ok(index) => index,
            Err(e) => {
                error!(error = %e, "error loading past seminars");
                self.shell
                    .show_error(format!("Failed to load past seminars: {e}"));
                return;
            }
        };
        let summaries = load_all(source, &index.semesters).await;
        self.render(summaries);
    }

    /// Replace the list with one row per summary. Ignored once terminal.
    pub fn render(&mut self, summaries: Vec<SemesterSummary>) {
        if !self.shell.show_content() {
            return;
        }
        let container = &mut self.shell.content;
        container.clear_children();
        for summary in &summaries {
            container.append(semester_element(summary));
        }
        debug!(rows = summaries.len(), "rendered past seminars");
        self.summaries = summaries;
    }

    pub fn to_document(&self, opts: &DocumentOptions) -> String {
        render_document(opts, &self.shell)
    }
}

/// Summary for one slug. Never fails: errors are logged and replaced by a placeholder row.
pub async fn load_semester_summary(source: &dyn DataSource, slug: &str) -> SemesterSummary {
    if !is_safe_slug(slug) {
        warn!(slug, "unsafe semester slug, using placeholder");
        return SemesterSummary::fallback(slug);
    }
    match fetch_semester(source, slug).await {
        Ok(record) => SemesterSummary::from_record(slug, &record),
        Err(e) => {
            warn!(slug, error = %e, "error loading semester, using placeholder");
            SemesterSummary::fallback(slug)
        }
    }
}

/// Fetch every summary concurrently. The result is in `slugs` order, not completion order.
pub async fn load_all(source: &dyn DataSource, slugs: &[String]) -> Vec<SemesterSummary> {
    let mut pending: FuturesUnordered<_> = slugs
        .iter()
        .enumerate()
        .map(|(i, slug)| async move { (i, load_semester_summary(source, slug).await) })
        .collect();

    let mut slots: Vec<Option<SemesterSummary>> = vec![None; slugs.len()];
    while let Some((i, summary)) = pending.next().await {
        slots[i] = Some(summary);
    }

    slots
        .into_iter()
        .zip(slugs)
        .map(|(slot, slug)| slot.unwrap_or_else(|| SemesterSummary::fallback(slug)))
        .collect()
}

fn labelled(label: &str, value: String) -> Element {
    Element::new("p")
        .with_child(Element::new("strong").with_text(format!("{label}:")))
        .with_text(format!(" {value}"))
}

fn semester_element(summary: &SemesterSummary) -> Element {
    Element::div()
        .with_class("past-semester")
        .with_child(Element::new("h3").with_text(summary.semester.clone()))
        .with_child(labelled("Topic", summary.topic.clone()))
        .with_child(labelled("Organizers", format_name_list(&summary.organizers)))
        .with_child(
            Element::new("a")
                .with_attr("href", summary.page_href())
                .with_text(format!("View {} talks →", summary.semester)),
        )
}
