//! Building blocks shared by every layout: contact line, bullet lists, skill
//! tags, and one section builder per part of the résumé.
//!
//! Section builders return `None` when there is nothing to show, so a layout
//! never emits an empty header.

use crate::models::{
    non_blank, AccentColor, Certification, Education, Experience, GroupEntry, Project,
    ResumeRecord,
};
use crate::render::document::{Header, Item, Section, SectionBody, SectionKind, NAME_PLACEHOLDER};

/// Contact fields in display priority.
const CONTACT_FIELDS: &[&str] = &["email", "phone", "location", "linkedin", "website"];

/// Glyphs users type at the start of a line to mark a bullet.
const BULLET_GLYPHS: &[char] = &['•', '▪', '◦'];

/// How a certification's issuer and year are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertificationStyle {
    /// Issuer as subtitle, year right-aligned.
    Split,
    /// `issuer • year` folded into the subtitle.
    Folded,
}

pub fn contact_line(record: &ResumeRecord) -> Vec<String> {
    CONTACT_FIELDS
        .iter()
        .filter_map(|field| record.scalar(field))
        .filter_map(non_blank)
        .collect()
}

pub fn header(record: &ResumeRecord) -> Header {
    Header {
        name: record
            .name
            .as_deref()
            .and_then(non_blank)
            .unwrap_or_else(|| NAME_PLACEHOLDER.to_string()),
        contact: contact_line(record),
    }
}

/// Splits free text into bullet items: one per non-blank line, trimmed, with a
/// leading bullet glyph removed.
pub fn bulletize(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.trim_start_matches(BULLET_GLYPHS).trim_start())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Splits a comma-separated skills field into trimmed, non-empty tags.
pub fn skill_tags(skills: &str) -> Vec<String> {
    skills
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

pub fn summary_section(record: &ResumeRecord, title: &str, accent: &AccentColor) -> Option<Section> {
    let summary = record.summary.as_deref().and_then(non_blank)?;
    Some(section(SectionKind::Summary, title, accent, SectionBody::Text(summary)))
}

pub fn experience_section(
    record: &ResumeRecord,
    title: &str,
    accent: &AccentColor,
) -> Option<Section> {
    group_section(
        SectionKind::Experience,
        title,
        accent,
        &record.experience,
        |exp: &Experience| Item {
            title: exp.title.trim().to_string(),
            subtitle: non_blank(&exp.company),
            meta: non_blank(&exp.duration),
            bullets: bulletize(&exp.description),
        },
    )
}

pub fn projects_section(
    record: &ResumeRecord,
    title: &str,
    accent: &AccentColor,
) -> Option<Section> {
    group_section(
        SectionKind::Projects,
        title,
        accent,
        &record.projects,
        |proj: &Project| Item {
            title: proj.name.trim().to_string(),
            subtitle: non_blank(&proj.link),
            meta: None,
            bullets: bulletize(&proj.description),
        },
    )
}

pub fn education_section(
    record: &ResumeRecord,
    title: &str,
    accent: &AccentColor,
) -> Option<Section> {
    group_section(
        SectionKind::Education,
        title,
        accent,
        &record.education,
        |edu: &Education| Item {
            title: edu.degree.trim().to_string(),
            subtitle: non_blank(&edu.institution),
            meta: non_blank(&edu.year),
            bullets: Vec::new(),
        },
    )
}

pub fn certifications_section(
    record: &ResumeRecord,
    title: &str,
    accent: &AccentColor,
    style: CertificationStyle,
) -> Option<Section> {
    group_section(
        SectionKind::Certifications,
        title,
        accent,
        &record.certifications,
        |cert: &Certification| {
            let issuer = non_blank(&cert.issuer);
            let year = non_blank(&cert.year);
            let (subtitle, meta) = match style {
                CertificationStyle::Split => (issuer, year),
                CertificationStyle::Folded => {
                    let folded = match (issuer, year) {
                        (Some(issuer), Some(year)) => Some(format!("{issuer} • {year}")),
                        (issuer, year) => issuer.or(year),
                    };
                    (folded, None)
                }
            };
            Item {
                title: cert.name.trim().to_string(),
                subtitle,
                meta,
                bullets: Vec::new(),
            }
        },
    )
}

pub fn skills_section(record: &ResumeRecord, title: &str, accent: &AccentColor) -> Option<Section> {
    let tags = skill_tags(record.skills.as_deref().unwrap_or_default());
    if tags.is_empty() {
        return None;
    }
    Some(section(SectionKind::Skills, title, accent, SectionBody::Tags(tags)))
}

/// Languages are shown as typed; unlike skills they are not split.
pub fn languages_section(
    record: &ResumeRecord,
    title: &str,
    accent: &AccentColor,
) -> Option<Section> {
    let languages = record.languages.as_deref().and_then(non_blank)?;
    Some(section(
        SectionKind::Languages,
        title,
        accent,
        SectionBody::Text(languages),
    ))
}

fn group_section<E: GroupEntry>(
    kind: SectionKind,
    title: &str,
    accent: &AccentColor,
    entries: &[E],
    to_item: impl Fn(&E) -> Item,
) -> Option<Section> {
    let items: Vec<Item> = entries
        .iter()
        .filter(|entry| entry.is_present())
        .map(to_item)
        .collect();
    if items.is_empty() {
        return None;
    }
    Some(section(kind, title, accent, SectionBody::Items(items)))
}

fn section(kind: SectionKind, title: &str, accent: &AccentColor, body: SectionBody) -> Section {
    Section {
        kind,
        title: title.to_string(),
        accent: accent.clone(),
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulletize_strips_glyphs_and_blank_lines() {
        assert_eq!(bulletize("• A\nB\n\n• C"), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_bulletize_blank_input() {
        assert!(bulletize("").is_empty());
        assert!(bulletize("  \n \n").is_empty());
        assert!(bulletize("•\n  • ").is_empty());
    }

    #[test]
    fn test_bulletize_handles_crlf_and_indent() {
        assert_eq!(
            bulletize("  •Led team\r\n   ▪ Cut costs 40%  "),
            vec!["Led team", "Cut costs 40%"]
        );
    }

    #[test]
    fn test_skill_tags_split_and_trim() {
        assert_eq!(
            skill_tags("Go, Rust ,  , Python"),
            vec!["Go", "Rust", "Python"]
        );
        assert!(skill_tags(" , ,").is_empty());
    }

    #[test]
    fn test_contact_line_priority_order() {
        let record = ResumeRecord {
            website: Some("ada.dev".to_string()),
            phone: Some("555-0100".to_string()),
            email: Some("ada@example.com".to_string()),
            ..Default::default()
        };
        assert_eq!(
            contact_line(&record),
            vec!["ada@example.com", "555-0100", "ada.dev"]
        );
    }

    #[test]
    fn test_header_uses_placeholder_for_missing_name() {
        let record = ResumeRecord {
            email: Some("ada@example.com".to_string()),
            ..Default::default()
        };
        assert_eq!(header(&record).name, NAME_PLACEHOLDER);
    }

    #[test]
    fn test_group_section_skips_blank_primary_entries() {
        let record = ResumeRecord {
            education: vec![
                Education {
                    degree: "  ".to_string(),
                    institution: "MIT".to_string(),
                    year: "1999".to_string(),
                },
                Education {
                    degree: "BSc".to_string(),
                    institution: String::new(),
                    year: "2001".to_string(),
                },
            ],
            ..Default::default()
        };
        let section = education_section(&record, "Education", &AccentColor::default()).unwrap();
        let items = section.body.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "BSc");
        assert_eq!(items[0].subtitle, None);
        assert_eq!(items[0].meta.as_deref(), Some("2001"));
    }

    #[test]
    fn test_group_section_omitted_when_nothing_present() {
        let record = ResumeRecord {
            projects: vec![Project {
                name: String::new(),
                description: "orphan".to_string(),
                link: String::new(),
            }],
            ..Default::default()
        };
        assert!(projects_section(&record, "Projects", &AccentColor::default()).is_none());
    }

    #[test]
    fn test_certification_styles() {
        let record = ResumeRecord {
            certifications: vec![
                Certification {
                    name: "CKA".to_string(),
                    issuer: "CNCF".to_string(),
                    year: "2023".to_string(),
                },
                Certification {
                    name: "OSCP".to_string(),
                    issuer: String::new(),
                    year: "2021".to_string(),
                },
            ],
            ..Default::default()
        };
        let accent = AccentColor::default();

        let split =
            certifications_section(&record, "Certifications", &accent, CertificationStyle::Split)
                .unwrap();
        assert_eq!(split.body.items()[0].subtitle.as_deref(), Some("CNCF"));
        assert_eq!(split.body.items()[0].meta.as_deref(), Some("2023"));

        let folded =
            certifications_section(&record, "Certifications", &accent, CertificationStyle::Folded)
                .unwrap();
        assert_eq!(
            folded.body.items()[0].subtitle.as_deref(),
            Some("CNCF • 2023")
        );
        assert_eq!(folded.body.items()[0].meta, None);
        assert_eq!(folded.body.items()[1].subtitle.as_deref(), Some("2021"));
    }

    #[test]
    fn test_languages_not_split() {
        let record = ResumeRecord {
            languages: Some("English, French".to_string()),
            ..Default::default()
        };
        let section = languages_section(&record, "Languages", &AccentColor::default()).unwrap();
        assert_eq!(section.body, SectionBody::Text("English, French".to_string()));
    }
}
