//! Single-semester page: semester metadata plus an expandable talk list.

use super::dom::Element;
use super::{render_document, DocumentOptions, PageShell, UiState};
use crate::format::{format_name_list, organizer_label};
use crate::model::{SemesterRecord, TalkRecord};
use crate::source::{fetch_semester, DataSource, ResourceLocator};
use tracing::{debug, error, info};

pub const CONTENT_ID: &str = "semester-info";
pub const TALKS_ID: &str = "talks-container";
pub const CALENDAR_TEXT: &str = "Click here to add the seminar to your Google calendar.";

/// Expand/collapse state of one talk's abstract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AbstractState {
    #[default]
    Collapsed,
    Expanded,
}

impl AbstractState {
    pub fn toggled(self) -> Self {
        match self {
            AbstractState::Collapsed => AbstractState::Expanded,
            AbstractState::Expanded => AbstractState::Collapsed,
        }
    }

    pub fn indicator(self) -> &'static str {
        match self {
            AbstractState::Collapsed => "▼",
            AbstractState::Expanded => "▲",
        }
    }

    pub fn is_expanded(self) -> bool {
        self == AbstractState::Expanded
    }
}

pub struct SeminarPage {
    shell: PageShell,
    record: Option<SemesterRecord>,
    abstracts: Vec<AbstractState>,
}

impl Default for SeminarPage {
    fn default() -> Self {
        Self::new()
    }
}

impl SeminarPage {
    pub fn new() -> Self {
        let calendar = Element::new("p").with_child(Element::new("a").with_id("calendar-link"));
        let organizer = Element::new("p")
            .with_class("organizer-line")
            .with_child(Element::new("span").with_id("organizer"));

        let content = Element::div()
            .with_id(CONTENT_ID)
            .with_class("semester-info")
            .with_child(Element::new("h2").with_id("semester-title"))
            .with_child(Element::new("p").with_id("organizer-info"))
            .with_child(Element::new("p").with_id("semester-description"))
            .with_child(Element::new("p").with_id("meeting-info"))
            .with_child(calendar)
            .with_child(organizer)
            .with_child(Element::div().with_id(TALKS_ID).with_class("talks"));

        Self {
            shell: PageShell::new(content),
            record: None,
            abstracts: Vec::new(),
        }
    }

    pub fn state(&self) -> &UiState {
        self.shell.state()
    }

    pub fn shell(&self) -> &PageShell {
        &self.shell
    }

    pub fn record(&self) -> Option<&SemesterRecord> {
        self.record.as_ref()
    }

    pub fn abstract_state(&self, index: usize) -> Option<AbstractState> {
        self.abstracts.get(index).copied()
    }

    /// Fetch the semester and render it, or land in the error state.
    pub async fn load(&mut self, source: &dyn DataSource, locator: &ResourceLocator) {
        let resource = locator.resource_name();
        info!(location = %source.locate(resource), "loading seminar data");
        match fetch_semester(source, resource).await {
            Ok(record) => self.render(record),
            Err(e) => {
                error!(error = %e, "error loading seminar data");
                self.shell
                    .show_error(format!("Failed to load seminar data: {e}"));
            }
        }
    }

    /// Show `record`. Ignored once the page reached a terminal state.
    pub fn render(&mut self, record: SemesterRecord) {
        if !self.shell.show_content() {
            return;
        }
        self.render_semester_info(&record);
        self.render_talks(&record.talks);
        self.record = Some(record);
    }

    fn set_text(&mut self, id: &str, text: String) {
        if let Some(el) = self.shell.content.find_by_id_mut(id) {
            el.set_text(text);
        }
    }

    fn render_semester_info(&mut self, record: &SemesterRecord) {
        self.set_text("semester-title", record.semester.clone());
        self.set_text("organizer-info", organizer_label(&record.organizers));
        self.set_text("semester-description", record.topic.clone());
        self.set_text("meeting-info", format!("We meet at {}.", record.meeting));
        self.set_text("organizer", format_name_list(&record.organizers));

        if let Some(href) = &record.calendar_link {
            if let Some(link) = self.shell.content.find_by_id_mut("calendar-link") {
                link.set_attr("href", href.clone());
                link.set_text(CALENDAR_TEXT);
            }
        }
    }

    fn render_talks(&mut self, talks: &[TalkRecord]) {
        self.abstracts = vec![AbstractState::Collapsed; talks.len()];
        let Some(container) = self.shell.content.find_by_id_mut(TALKS_ID) else {
            return;
        };
        container.clear_children();
        for (index, talk) in talks.iter().enumerate() {
            container.append(talk_element(talk, index));
        }
        debug!(talks = talks.len(), "rendered talks");
    }

    /// Flip the abstract of talk `index`. Returns the new state, or `None` if no such talk.
    pub fn toggle_abstract(&mut self, index: usize) -> Option<AbstractState> {
        let next = self.abstracts.get(index)?.toggled();
        let container = self.shell.content.find_by_id_mut(TALKS_ID)?;
        let talk = container.child_elements_mut().nth(index)?;
        if let Some(abstract_el) = talk.find_by_id_mut(&abstract_id(index)) {
            if abstract_el.has_class("expanded") != next.is_expanded() {
                abstract_el.toggle_class("expanded");
            }
        }
        if let Some(indicator) = talk.find_by_class_mut("talk-expand-indicator") {
            indicator.set_text(next.indicator());
        }
        self.abstracts[index] = next;
        Some(next)
    }

    pub fn to_document(&self, opts: &DocumentOptions) -> String {
        render_document(opts, &self.shell)
    }
}

fn abstract_id(index: usize) -> String {
    format!("abstract-{index}")
}

fn talk_element(talk: &TalkRecord, index: usize) -> Element {
    let speaker = Element::div()
        .with_class("talk-speaker")
        .with_text(format!("{} ", talk.speaker))
        .with_child(
            Element::new("span")
                .with_class("talk-affiliation")
                .with_text(format!("({})", talk.affiliation)),
        );

    let header = Element::div()
        .with_class("talk-header")
        .with_attr("data-talk-index", index.to_string())
        .with_child(
            Element::div()
                .with_class("talk-date")
                .with_text(format!("{} {}", talk.date, talk.year)),
        )
        .with_child(Element::div().with_class("talk-title").with_text(&talk.title))
        .with_child(speaker)
        .with_child(
            Element::div()
                .with_class("talk-expand-indicator")
                .with_text(AbstractState::Collapsed.indicator()),
        );

    let abstract_el = Element::div()
        .with_id(abstract_id(index))
        .with_class("talk-abstract")
        .with_child(
            Element::div()
                .with_class("talk-abstract-content")
                .with_text(&talk.abstract_text),
        );

    Element::div()
        .with_class("talk")
        .with_child(header)
        .with_child(abstract_el)
}
