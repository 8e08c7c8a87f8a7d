//! `CommonMark` to HTML rendering.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};

/// Result of rendering a markdown document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderResult {
    /// Rendered HTML.
    pub html: String,
    /// Text of the first level-1 heading, if extraction was enabled.
    pub title: Option<String>,
}

/// Renders markdown to HTML.
///
/// Tables, strikethrough, task lists and footnotes are enabled. Raw HTML in
/// the input, including container output, is passed through.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownRenderer {
    extract_title: bool,
}

impl MarkdownRenderer {
    /// Create a renderer with title extraction disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract the first H1 as the document title.
    #[must_use]
    pub fn with_title_extraction(mut self) -> Self {
        self.extract_title = true;
        self
    }

    /// Render `markdown` to HTML.
    #[must_use]
    pub fn render(&self, markdown: &str) -> RenderResult {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_FOOTNOTES;
        let events: Vec<Event<'_>> = Parser::new_ext(markdown, options).collect();

        let title = if self.extract_title {
            first_h1(&events)
        } else {
            None
        };

        let mut output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut output, events.into_iter());

        RenderResult {
            html: output,
            title,
        }
    }
}

/// Plain text of the first level-1 heading.
fn first_h1(events: &[Event<'_>]) -> Option<String> {
    let start = events.iter().position(|event| {
        matches!(
            event,
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            })
        )
    })?;

    let mut title = String::new();
    for event in &events[start + 1..] {
        match event {
            Event::End(TagEnd::Heading(HeadingLevel::H1)) => break,
            Event::Text(text) | Event::Code(text) => title.push_str(text),
            Event::SoftBreak | Event::HardBreak => title.push(' '),
            _ => {}
        }
    }

    let title = title.trim();
    (!title.is_empty()).then(|| title.to_owned())
}
