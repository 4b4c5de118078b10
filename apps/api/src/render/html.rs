//! HTML writer for rendered documents.
//!
//! Class names match the builder's stylesheet (`resume-page`, `section-title`,
//! `item-header`, `skill-pill`, ...). All user text is escaped.

use crate::render::document::{Document, Header, Item, Section, SectionBody};

/// Inline SVG shown in the empty state.
const EMPTY_ICON: &str = r#"<svg fill="none" stroke="currentColor" viewBox="0 0 24 24" aria-hidden="true"><path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M9 12h6m-6 4h6m2 5H7a2 2 0 01-2-2V5a2 2 0 012-2h5.586a1 1 0 01.707.293l5.414 5.414a1 1 0 01.293.707V19a2 2 0 01-2 2z"></path></svg>"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Main,
    Sidebar,
}

pub fn to_html(document: &Document) -> String {
    match document {
        Document::Empty { heading, hint } => format!(
            r#"<div class="empty-state">{EMPTY_ICON}<h3>{}</h3><p>{}</p></div>"#,
            escape(heading),
            escape(hint)
        ),
        Document::SingleColumn {
            template,
            accent,
            header,
            sections,
        } => {
            let mut html = format!(
                r#"<div class="resume-page template-{}" style="--accent:{}">"#,
                template.as_str(),
                escape(accent.as_str())
            );
            html.push_str(&header_html(header, Column::Main));
            for section in sections {
                html.push_str(&section_html(section, Column::Main));
            }
            html.push_str("</div>");
            html
        }
        Document::TwoColumn {
            accent,
            sidebar,
            main,
        } => {
            let mut html = format!(
                r#"<div class="resume-page template-sidebar" style="--accent:{}"><div class="wrapper">"#,
                escape(accent.as_str())
            );
            html.push_str(&format!(
                r#"<div class="sidebar" style="background:{}">"#,
                escape(sidebar.background.as_str())
            ));
            html.push_str(&header_html(&sidebar.header, Column::Sidebar));
            for section in &sidebar.sections {
                html.push_str(&section_html(section, Column::Sidebar));
            }
            html.push_str(r#"</div><div class="main">"#);
            for section in main {
                html.push_str(&section_html(section, Column::Main));
            }
            html.push_str("</div></div></div>");
            html
        }
    }
}

fn header_html(header: &Header, column: Column) -> String {
    let contact: String = match column {
        Column::Main => header
            .contact
            .iter()
            .map(|bit| format!("<span>{}</span>", escape(bit)))
            .collect(),
        Column::Sidebar => header
            .contact
            .iter()
            .map(|bit| format!("<div>{}</div>", escape(bit)))
            .collect(),
    };
    let heading = format!(
        r#"<h1>{}</h1><div class="contact">{contact}</div>"#,
        escape(&header.name)
    );
    match column {
        Column::Main => format!(r#"<div class="resume-header">{heading}</div>"#),
        Column::Sidebar => heading,
    }
}

fn section_html(section: &Section, column: Column) -> String {
    let title = match column {
        // Sidebar titles carry no accent color.
        Column::Sidebar => format!(
            r#"<div class="section-title">{}</div>"#,
            escape(&section.title)
        ),
        Column::Main => format!(
            r#"<div class="section-title" style="color:{}">{}</div>"#,
            escape(section.accent.as_str()),
            escape(&section.title)
        ),
    };

    let body = match (&section.body, column) {
        (SectionBody::Text(text), Column::Main) => {
            format!(r#"<div class="section-text">{}</div>"#, escape(text))
        }
        (SectionBody::Text(text), Column::Sidebar) => {
            format!(r#"<div class="skills">{}</div>"#, escape(text))
        }
        (SectionBody::Tags(tags), Column::Main) => {
            let pills: String = tags
                .iter()
                .map(|tag| format!(r#"<span class="skill-pill">{}</span>"#, escape(tag)))
                .collect();
            format!(r#"<div class="skills-list">{pills}</div>"#)
        }
        (SectionBody::Tags(tags), Column::Sidebar) => {
            let lines: Vec<String> = tags.iter().map(|tag| escape(tag)).collect();
            format!(r#"<div class="skills">{}</div>"#, lines.join("<br>"))
        }
        (SectionBody::Items(items), _) => items.iter().map(item_html).collect(),
    };

    match column {
        Column::Main => format!(r#"<div class="resume-section">{title}{body}</div>"#),
        Column::Sidebar => format!("{title}{body}"),
    }
}

fn item_html(item: &Item) -> String {
    let mut html = String::from(r#"<div class="item"><div class="item-header"><div>"#);
    html.push_str(&format!(
        r#"<div class="item-title">{}</div>"#,
        escape(&item.title)
    ));
    if let Some(subtitle) = &item.subtitle {
        html.push_str(&format!(
            r#"<div class="item-subtitle">{}</div>"#,
            escape(subtitle)
        ));
    }
    html.push_str("</div>");
    if let Some(meta) = &item.meta {
        html.push_str(&format!(
            r#"<div class="item-duration">{}</div>"#,
            escape(meta)
        ));
    }
    html.push_str("</div>");

    if !item.bullets.is_empty() {
        html.push_str(r#"<div class="item-description"><ul>"#);
        for bullet in &item.bullets {
            html.push_str(&format!("<li>{}</li>", escape(bullet)));
        }
        html.push_str("</ul></div>");
    }

    html.push_str("</div>");
    html
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
