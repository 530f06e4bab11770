//! Text summary builder for CLI output.
//!
//! Formats a rendered page as plain lines instead of HTML.

use crate::format::{format_name_list, organizer_label};
use crate::page::past::PastSeminarsPage;
use crate::page::seminar::SeminarPage;
use anyhow::{anyhow, Result};

/// Pre-formatted lines for text output.
pub(crate) struct TextSummary {
    pub lines: Vec<String>,
}

pub(crate) fn build_seminar_summary(page: &SeminarPage) -> Result<TextSummary> {
    if let Some(msg) = page.state().error_message() {
        return Err(anyhow!("{msg}"));
    }
    let record = page
        .record()
        .ok_or_else(|| anyhow!("seminar page has no data"))?;

    let mut lines = vec![
        record.semester.clone(),
        organizer_label(&record.organizers),
        format!("Topic: {}", record.topic),
        format!("We meet at {}.", record.meeting),
    ];
    if let Some(link) = record.calendar_link.as_deref() {
        lines.push(format!("Calendar: {link}"));
    }
    lines.push(String::new());

    for (index, talk) in record.talks.iter().enumerate() {
        let expanded = page
            .abstract_state(index)
            .map(|s| s.is_expanded())
            .unwrap_or(false);
        let glyph = page
            .abstract_state(index)
            .map(|s| s.indicator())
            .unwrap_or_default();
        lines.push(format!(
            "{} {} {} | {} | {} ({})",
            glyph, talk.date, talk.year, talk.title, talk.speaker, talk.affiliation
        ));
        if expanded {
            for line in talk.abstract_text.lines() {
                lines.push(format!("    {line}"));
            }
        }
    }

    Ok(TextSummary { lines })
}

pub(crate) fn build_past_summary(page: &PastSeminarsPage) -> Result<TextSummary> {
    if let Some(msg) = page.state().error_message() {
        return Err(anyhow!("{msg}"));
    }
    let lines = page
        .summaries()
        .iter()
        .map(|s| {
            format!(
                "{} | {} | {} | {}",
                s.semester,
                s.topic,
                format_name_list(&s.organizers),
                s.page_href()
            )
        })
        .collect();
    Ok(TextSummary { lines })
}
