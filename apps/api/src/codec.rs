//! Record codec: converts a `ResumeRecord` to and from the flat, string-keyed
//! map that is persisted as a single JSON payload.
//!
//! # Flat layout
//! - Present scalars map directly: `"name": "Ada"`.
//! - Each group field maps to a list under `<prefix>_<field>[]`, one element per
//!   entry, in entry order: `"exp_title[]": ["Engineer", "Lead"]`.
//! - `template` and `color` are top-level text keys.
//!
//! Decoding fails closed: if the lists of one group disagree on length the whole
//! call fails with `MalformedRecord` and no record is produced.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::models::{AccentColor, Group, ResumeRecord, Template, SCALAR_FIELDS};

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Malformed record: '{key}' holds {found} entries, expected {expected}")]
    MalformedRecord {
        key: String,
        expected: usize,
        found: usize,
    },

    #[error("Malformed record: '{key}' should hold {expected}")]
    WrongShape { key: String, expected: &'static str },

    #[error("Unreadable payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// A value in the flat representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlatValue {
    Text(String),
    List(Vec<String>),
}

/// Sorted so that encoding the same record twice yields identical bytes.
pub type FlatMap = BTreeMap<String, FlatValue>;

/// How many entries each group must have in the form before stored values can
/// be written back into it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatCounts(BTreeMap<Group, usize>);

impl RepeatCounts {
    pub fn get(&self, group: Group) -> usize {
        self.0.get(&group).copied().unwrap_or(0)
    }

    pub fn set(&mut self, group: Group, count: usize) {
        self.0.insert(group, count);
    }

    pub fn of(record: &ResumeRecord) -> Self {
        let mut counts = Self::default();
        for group in Group::ALL {
            counts.set(group, record.group_len(group));
        }
        counts
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Record <-> flat map
// ────────────────────────────────────────────────────────────────────────────

pub fn serialize(record: &ResumeRecord) -> FlatMap {
    let mut flat = FlatMap::new();

    for &name in SCALAR_FIELDS {
        if let Some(value) = record.scalar(name) {
            flat.insert(name.to_string(), FlatValue::Text(value.to_string()));
        }
    }

    flat.insert(
        "template".to_string(),
        FlatValue::Text(record.template.as_str().to_string()),
    );
    flat.insert(
        "color".to_string(),
        FlatValue::Text(record.accent_color.as_str().to_string()),
    );

    for group in Group::ALL {
        let len = record.group_len(group);
        if len == 0 {
            continue;
        }
        for &field in group.fields() {
            let column = (0..len)
                .map(|i| {
                    record
                        .entry_field(group, i, field)
                        .unwrap_or_default()
                        .to_string()
                })
                .collect();
            flat.insert(group.field_key(field), FlatValue::List(column));
        }
    }

    flat
}

pub fn deserialize(flat: &FlatMap) -> Result<(ResumeRecord, RepeatCounts), CodecError> {
    let mut record = ResumeRecord::default();

    for (key, value) in flat {
        if key.ends_with("[]") {
            if Group::parse_field_key(key).is_none() {
                debug!("Ignoring unknown repeated key '{key}'");
            }
            continue;
        }

        let text = match value {
            FlatValue::Text(text) => text,
            FlatValue::List(_) => {
                if key == "template" || key == "color" || SCALAR_FIELDS.contains(&key.as_str()) {
                    return Err(CodecError::WrongShape {
                        key: key.clone(),
                        expected: "text",
                    });
                }
                debug!("Ignoring unknown key '{key}'");
                continue;
            }
        };

        match key.as_str() {
            "template" => record.template = Template::from_name(text),
            "color" => record.accent_color = AccentColor::new(text.as_str()),
            other => {
                if !record.set_scalar(other, text) {
                    debug!("Ignoring unknown key '{other}'");
                }
            }
        }
    }

    let mut counts = RepeatCounts::default();

    for group in Group::ALL {
        let mut expected: Option<usize> = None;
        let mut columns: Vec<(&'static str, &Vec<String>)> = Vec::new();

        for &field in group.fields() {
            let key = group.field_key(field);
            let Some(value) = flat.get(&key) else {
                continue;
            };
            let FlatValue::List(values) = value else {
                return Err(CodecError::WrongShape {
                    key,
                    expected: "a list",
                });
            };

            match expected {
                None => expected = Some(values.len()),
                Some(n) if n != values.len() => {
                    return Err(CodecError::MalformedRecord {
                        key,
                        expected: n,
                        found: values.len(),
                    });
                }
                Some(_) => {}
            }
            columns.push((field, values));
        }

        let count = expected.unwrap_or(0);
        record.ensure_group_len(group, count);
        for (field, values) in columns {
            for (index, value) in values.iter().enumerate() {
                record.set_entry_field(group, index, field, value);
            }
        }
        counts.set(group, count);
    }

    Ok((record, counts))
}

// ────────────────────────────────────────────────────────────────────────────
// Payload
// ────────────────────────────────────────────────────────────────────────────

pub fn encode(flat: &FlatMap) -> Result<String, CodecError> {
    Ok(serde_json::to_string(flat)?)
}

pub fn decode(payload: &str) -> Result<FlatMap, CodecError> {
    Ok(serde_json::from_str(payload)?)
}

/// `serialize` + `encode`.
pub fn to_payload(record: &ResumeRecord) -> Result<String, CodecError> {
    encode(&serialize(record))
}

/// `decode` + `deserialize`.
pub fn from_payload(payload: &str) -> Result<(ResumeRecord, RepeatCounts), CodecError> {
    deserialize(&decode(payload)?)
}

/// Expands the flat map into repeated name/value pairs, the shape a form
/// submission takes. List elements keep their order.
pub fn to_form_pairs(flat: &FlatMap) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (key, value) in flat {
        match value {
            FlatValue::Text(text) => pairs.push((key.clone(), text.clone())),
            FlatValue::List(values) => {
                pairs.extend(values.iter().map(|v| (key.clone(), v.clone())));
            }
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Certification, Education, Experience, Project};

    fn sample_record() -> ResumeRecord {
        ResumeRecord {
            name: Some("Ada Lovelace".to_string()),
            email: Some("ada@example.com".to_string()),
            location: Some("London".to_string()),
            skills: Some("Math, Poetry".to_string()),
            experience: vec![
                Experience {
                    title: "Engineer".to_string(),
                    company: "Analytical Eng.".to_string(),
                    duration: "1840-1850".to_string(),
                    description: "• Wrote first algorithm".to_string(),
                },
                Experience {
                    title: "Translator".to_string(),
                    company: "Menabrea".to_string(),
                    duration: "1842".to_string(),
                    description: "Notes A–G".to_string(),
                },
            ],
            education: vec![Education {
                degree: "Private tutoring".to_string(),
                institution: "De Morgan".to_string(),
                year: "1840".to_string(),
            }],
            projects: vec![Project {
                name: "Note G".to_string(),
                description: "Bernoulli numbers".to_string(),
                link: "example.com/g".to_string(),
            }],
            certifications: vec![Certification {
                name: "Fellowship".to_string(),
                issuer: "Society".to_string(),
                year: "1843".to_string(),
            }],
            template: Template::Sidebar,
            accent_color: AccentColor::new("#7c3aed"),
            ..Default::default()
        }
    }

    #[test]
    fn test_round_trip_preserves_record_and_order() {
        let record = sample_record();
        let (restored, counts) = deserialize(&serialize(&record)).unwrap();

        assert_eq!(restored, record);
        assert_eq!(counts.get(Group::Experience), 2);
        assert_eq!(counts.get(Group::Education), 1);
        assert_eq!(counts.get(Group::Project), 1);
        assert_eq!(counts.get(Group::Certification), 1);
    }

    #[test]
    fn test_round_trip_through_payload() {
        let record = sample_record();
        let payload = to_payload(&record).unwrap();
        let (restored, _) = from_payload(&payload).unwrap();
        assert_eq!(restored, record);
    }

    #[test]
    fn test_serialize_is_stable() {
        let record = sample_record();
        assert_eq!(
            to_payload(&record).unwrap(),
            to_payload(&record).unwrap()
        );
    }

    #[test]
    fn test_serialize_layout() {
        let flat = serialize(&sample_record());
        assert_eq!(
            flat.get("exp_title[]"),
            Some(&FlatValue::List(vec![
                "Engineer".to_string(),
                "Translator".to_string()
            ]))
        );
        assert_eq!(
            flat.get("template"),
            Some(&FlatValue::Text("sidebar".to_string()))
        );
        assert!(!flat.contains_key("phone"));
    }

    #[test]
    fn test_blank_slots_survive_storage() {
        let mut record = ResumeRecord::default();
        record.set_entry_field(Group::Experience, 1, "title", "Lead");
        let (restored, counts) = deserialize(&serialize(&record)).unwrap();
        assert_eq!(counts.get(Group::Experience), 2);
        assert!(restored.experience[0].title.is_empty());
        assert_eq!(restored.experience[1].title, "Lead");
    }

    #[test]
    fn test_mismatched_lengths_fail_closed() {
        let payload = r#"{
            "name": "Ada",
            "exp_title[]": ["Engineer", "Lead"],
            "exp_company[]": ["Acme"]
        }"#;
        let err = from_payload(payload).unwrap_err();
        match err {
            CodecError::MalformedRecord {
                key,
                expected,
                found,
            } => {
                assert_eq!(key, "exp_company[]");
                assert_eq!(expected, 2);
                assert_eq!(found, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_field_column_reads_as_blank() {
        let payload = r#"{ "edu_degree[]": ["BSc", "MSc"] }"#;
        let (record, counts) = from_payload(payload).unwrap();
        assert_eq!(counts.get(Group::Education), 2);
        assert_eq!(record.education[1].degree, "MSc");
        assert!(record.education[1].institution.is_empty());
    }

    #[test]
    fn test_legacy_payload_is_accepted() {
        // Payload as written by the first version of the builder.
        let payload = r##"{
            "name": "Ada",
            "email": "ada@example.com",
            "phone": "",
            "proj_name[]": ["Engine"],
            "proj_description[]": [""],
            "proj_link[]": [""],
            "template": "creative",
            "color": "#dc2626"
        }"##;
        let (record, counts) = from_payload(payload).unwrap();
        assert_eq!(record.template, Template::Sidebar);
        assert_eq!(record.accent_color.as_str(), "#dc2626");
        assert_eq!(record.phone, None);
        assert_eq!(counts.get(Group::Project), 1);
        assert_eq!(counts.get(Group::Experience), 0);
    }

    #[test]
    fn test_scalar_holding_list_is_rejected() {
        let payload = r#"{ "name": ["Ada", "Byron"] }"#;
        assert!(matches!(
            from_payload(payload),
            Err(CodecError::WrongShape { .. })
        ));
    }

    #[test]
    fn test_garbage_payload_is_rejected() {
        assert!(matches!(
            from_payload("not json"),
            Err(CodecError::Payload(_))
        ));
    }

    #[test]
    fn test_form_pairs_expand_lists_in_order() {
        let mut flat = FlatMap::new();
        flat.insert(
            "cert_name[]".to_string(),
            FlatValue::List(vec!["A".to_string(), "B".to_string()]),
        );
        flat.insert("name".to_string(), FlatValue::Text("Ada".to_string()));
        let pairs = to_form_pairs(&flat);
        assert_eq!(
            pairs,
            vec![
                ("cert_name[]".to_string(), "A".to_string()),
                ("cert_name[]".to_string(), "B".to_string()),
                ("name".to_string(), "Ada".to_string()),
            ]
        );
    }
}
