use std::collections::HashMap;

use ammonia::Builder;
use pulldown_cmark::{html, Event, HeadingLevel, Options, Parser, Tag};

/// Converts markdown text to a sanitized HTML fragment. Pure and stateless:
/// the same input always produces the same output, blank input produces an
/// empty string.
///
/// The extension set is fixed to what the existing content corpus uses:
/// fenced code blocks, tables, strikethrough and task lists, with a stable
/// id attached to every heading. Intra-word underscores and lists cuddled
/// against a paragraph already behave the expected way in CommonMark.
pub fn render_markdown(input: &str) -> String {
    if input.trim().is_empty() {
        return String::new();
    }

    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let events = attach_heading_ids(Parser::new_ext(input, options));

    let mut unsafe_html = String::new();
    html::push_html(&mut unsafe_html, events.into_iter());

    sanitize_fragment(&unsafe_html)
}

/// Rewrites every heading into raw HTML carrying an id derived from the
/// heading text, so anchors stay stable across renders.
fn attach_heading_ids<'a>(parser: Parser<'a, '_>) -> Vec<Event<'a>> {
    let mut events = Vec::new();
    let mut seen_slugs: HashMap<String, usize> = HashMap::new();
    let mut heading: Option<(HeadingLevel, Vec<Event<'a>>)> = None;

    for event in parser {
        match event {
            Event::Start(Tag::Heading(level, _, _)) => {
                heading = Some((level, Vec::new()));
            }
            Event::End(Tag::Heading(..)) => {
                if let Some((level, inner)) = heading.take() {
                    let slug = unique_slug(&heading_text(&inner), &mut seen_slugs);
                    let tag = heading_tag(level);

                    let mut body = String::new();
                    html::push_html(&mut body, inner.into_iter());

                    events.push(Event::Html(format!("<{} id=\"{}\">", tag, slug).into()));
                    events.push(Event::Html(body.into()));
                    events.push(Event::Html(format!("</{}>\n", tag).into()));
                }
            }
            other => match heading.as_mut() {
                Some((_, inner)) => inner.push(other),
                None => events.push(other),
            },
        }
    }
    events
}

fn heading_tag(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::H1 => "h1",
        HeadingLevel::H2 => "h2",
        HeadingLevel::H3 => "h3",
        HeadingLevel::H4 => "h4",
        HeadingLevel::H5 => "h5",
        HeadingLevel::H6 => "h6",
    }
}

fn heading_text(events: &[Event]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            _ => {}
        }
    }
    text
}

/// Lower-cases the heading text, collapses every non-alphanumeric run into a
/// single hyphen, and disambiguates repeats with a numeric suffix.
fn unique_slug(text: &str, seen: &mut HashMap<String, usize>) -> String {
    let mut slug = String::new();
    let mut pending_dash = false;
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            for lower in ch.to_lowercase() {
                slug.push(lower);
            }
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        slug.push_str("section");
    }

    let count = seen.entry(slug.clone()).or_insert(0);
    *count += 1;
    if *count > 1 {
        format!("{}-{}", slug, *count - 1)
    } else {
        slug
    }
}

/// Allows the default safe markup plus what our markdown output needs on top:
/// heading ids, language classes on code blocks, and the disabled checkbox
/// inputs task lists produce. Scripting never survives.
fn sanitize_fragment(html_input: &str) -> String {
    Builder::default()
        .add_tags(&["input"])
        .add_tag_attributes("input", &["type", "checked", "disabled"])
        .add_generic_attributes(&["id", "class"])
        .clean(html_input)
        .to_string()
}
