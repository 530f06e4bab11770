//! Page controllers and the loading/content/error shell they share.

pub mod dom;
pub mod past;
pub mod seminar;

use dom::{html_escape, Element};
use tracing::debug;

pub const LOADING_ID: &str = "loading";
pub const ERROR_ID: &str = "error";

/// Which of the three page regions is visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiState {
    Loading,
    Content,
    Error(String),
}

impl UiState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, UiState::Loading)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            UiState::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Loading,
    Content,
    Error,
}

/// Owns the visibility state and the three region elements of a page.
///
/// Starts in `Loading`. `show_content` and `show_error` move out of it once;
/// after that the state is final.
#[derive(Debug, Clone)]
pub struct PageShell {
    state: UiState,
    pub loading: Element,
    pub content: Element,
    pub error: Element,
}

impl PageShell {
    pub fn new(content: Element) -> Self {
        Self {
            state: UiState::Loading,
            loading: Element::div()
                .with_id(LOADING_ID)
                .with_class("loading")
                .with_text("Loading…"),
            content,
            error: Element::div().with_id(ERROR_ID).with_class("error"),
        }
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn is_visible(&self, region: Region) -> bool {
        matches!(
            (&self.state, region),
            (UiState::Loading, Region::Loading)
                | (UiState::Content, Region::Content)
                | (UiState::Error(_), Region::Error)
        )
    }

    /// Returns false if the page already reached a terminal state.
    pub fn show_content(&mut self) -> bool {
        if self.state.is_terminal() {
            debug!(state = ?self.state, "ignoring content transition");
            return false;
        }
        self.state = UiState::Content;
        true
    }

    /// Returns false if the page already reached a terminal state.
    pub fn show_error(&mut self, message: impl Into<String>) -> bool {
        if self.state.is_terminal() {
            debug!(state = ?self.state, "ignoring error transition");
            return false;
        }
        let message = message.into();
        self.error.set_text(message.clone());
        self.state = UiState::Error(message);
        true
    }

    /// Region elements in document order, with hidden ones marked.
    pub fn regions(&self) -> Vec<Element> {
        [
            (Region::Loading, &self.loading),
            (Region::Content, &self.content),
            (Region::Error, &self.error),
        ]
        .into_iter()
        .map(|(region, el)| {
            let mut el = el.clone();
            if self.is_visible(region) {
                el.set_attr("style", "display: block");
            } else {
                el.set_attr("style", "display: none");
            }
            el
        })
        .collect()
    }
}

/// Options for the surrounding HTML document.
#[derive(Debug, Clone)]
pub struct DocumentOptions {
    pub title: String,
    /// Stylesheet href relative to the site root.
    pub stylesheet: Option<String>,
    /// Prefix from the page back to the site root: `""` or `"../"`.
    pub root: String,
}

impl DocumentOptions {
    fn site_href(&self, href: &str) -> String {
        if href.starts_with('/') || href.contains("://") {
            href.to_string()
        } else {
            format!("{}{href}", self.root)
        }
    }
}

fn site_header(opts: &DocumentOptions) -> Element {
    let nav = Element::new("nav")
        .with_child(
            Element::new("a")
                .with_attr("href", opts.site_href("index.html"))
                .with_text("Current semester"),
        )
        .with_child(
            Element::new("a")
                .with_attr("href", opts.site_href("past-seminars.html"))
                .with_text("Past seminars"),
        );
    Element::new("header")
        .with_child(Element::new("h1").with_text(opts.title.clone()))
        .with_child(nav)
}

/// Wrap a page's regions into a full HTML document.
pub fn render_document(opts: &DocumentOptions, shell: &PageShell) -> String {
    let mut body = Element::new("main")
        .with_class("container")
        .with_child(site_header(opts));
    for region in shell.regions() {
        body.append(region);
    }

    let stylesheet = opts
        .stylesheet
        .as_deref()
        .map(|href| {
            format!(
                "  <link rel=\"stylesheet\" href=\"{}\">\n",
                html_escape(&opts.site_href(href))
            )
        })
        .unwrap_or_default();

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n  <meta charset=\"UTF-8\">\n  \
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n  \
         <title>{}</title>\n{}</head>\n<body>\n{}</body>\n</html>\n",
        html_escape(&opts.title),
        stylesheet,
        body.to_html()
    )
}
