//! Template layouts.
//!
//! All three templates draw from the same section builders; what differs is
//! structure:
//! - `standard` / `formal`: header, then Summary, Experience, Projects,
//!   Education, Certifications, Skills, Languages in one column.
//! - `sidebar`: name, contact, Skills and Languages in an accent-colored
//!   sidebar; the remaining sections in the main column, same order.

use tracing::debug;

use crate::models::{AccentColor, ResumeRecord, Template};
use crate::render::blocks::{
    certifications_section, education_section, experience_section, header, languages_section,
    projects_section, skills_section, summary_section, CertificationStyle,
};
use crate::render::document::{Document, Section, Sidebar};

/// Renders the record with its own template and accent color.
pub fn render(record: &ResumeRecord) -> Document {
    render_with(record, record.template, &record.accent_color)
}

/// Renders the record with an explicit template and accent color.
/// Total over any record: missing fields are omitted or replaced by a
/// placeholder, never an error.
pub fn render_with(record: &ResumeRecord, template: Template, accent: &AccentColor) -> Document {
    if record.is_blank_identity() {
        debug!("Name and email are blank, rendering empty state");
        return Document::empty();
    }

    if template.is_two_column() {
        two_column(record, accent)
    } else {
        single_column(record, template, accent)
    }
}

fn single_column(record: &ResumeRecord, template: Template, accent: &AccentColor) -> Document {
    let sections: Vec<Section> = [
        summary_section(record, "Professional Summary", accent),
        experience_section(record, "Work Experience", accent),
        projects_section(record, "Projects", accent),
        education_section(record, "Education", accent),
        certifications_section(record, "Certifications", accent, CertificationStyle::Split),
        skills_section(record, "Skills", accent),
        languages_section(record, "Languages", accent),
    ]
    .into_iter()
    .flatten()
    .collect();

    Document::SingleColumn {
        template,
        accent: accent.clone(),
        header: header(record),
        sections,
    }
}

fn two_column(record: &ResumeRecord, accent: &AccentColor) -> Document {
    let sidebar_sections: Vec<Section> = [
        skills_section(record, "Skills", accent),
        languages_section(record, "Languages", accent),
    ]
    .into_iter()
    .flatten()
    .collect();

    let main: Vec<Section> = [
        summary_section(record, "About Me", accent),
        experience_section(record, "Experience", accent),
        projects_section(record, "Projects", accent),
        education_section(record, "Education", accent),
        certifications_section(record, "Certifications", accent, CertificationStyle::Folded),
    ]
    .into_iter()
    .flatten()
    .collect();

    Document::TwoColumn {
        accent: accent.clone(),
        sidebar: Sidebar {
            background: accent.clone(),
            header: header(record),
            sections: sidebar_sections,
        },
        main,
    }
}
