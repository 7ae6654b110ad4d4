//! Structured resume produced by the rewrite stage and consumed by the renderer.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Declared type of a resume section. Unknown tags decode as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SectionKind {
    Experience,
    Education,
    Skills,
    Certifications,
    Other,
}

impl SectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Experience => "experience",
            SectionKind::Education => "education",
            SectionKind::Skills => "skills",
            SectionKind::Certifications => "certifications",
            SectionKind::Other => "other",
        }
    }
}

impl From<String> for SectionKind {
    fn from(tag: String) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "experience" => SectionKind::Experience,
            "education" => SectionKind::Education,
            "skills" => SectionKind::Skills,
            "certifications" => SectionKind::Certifications,
            _ => SectionKind::Other,
        }
    }
}

impl From<SectionKind> for String {
    fn from(kind: SectionKind) -> Self {
        kind.as_str().to_string()
    }
}

/// One role within an experience section. Bullet order is significant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub company: String,
    pub title: String,
    pub dates: String,
    pub bullets: Vec<String>,
}

/// Section body. Experience sections carry entries; every other kind carries
/// a single free-text block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SectionContent {
    Experience(Vec<ExperienceEntry>),
    FreeText(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SectionWire")]
pub struct Section {
    #[serde(rename = "type")]
    pub kind: SectionKind,
    pub title: String,
    pub content: SectionContent,
}

/// Raw wire shape; `content` is resolved against the declared kind.
#[derive(Deserialize)]
struct SectionWire {
    #[serde(rename = "type")]
    kind: SectionKind,
    title: String,
    content: Value,
}

impl TryFrom<SectionWire> for Section {
    type Error = String;

    fn try_from(wire: SectionWire) -> Result<Self, Self::Error> {
        let content = match (wire.kind, wire.content) {
            (SectionKind::Experience, value @ Value::Array(_)) => {
                let entries: Vec<ExperienceEntry> = serde_json::from_value(value)
                    .map_err(|e| format!("section '{}': {e}", wire.title))?;
                SectionContent::Experience(entries)
            }
            (SectionKind::Experience, _) => {
                return Err(format!(
                    "section '{}': experience content must be a list of entries",
                    wire.title
                ))
            }
            (_, Value::String(text)) => SectionContent::FreeText(text),
            // A list of plain lines is accepted and kept one line per item.
            (_, Value::Array(items)) if items.iter().all(Value::is_string) => {
                let lines: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
                SectionContent::FreeText(lines.join("\n"))
            }
            (kind, _) => {
                return Err(format!(
                    "section '{}': {} content must be text",
                    wire.title,
                    kind.as_str()
                ))
            }
        };

        Ok(Section {
            kind: wire.kind,
            title: wire.title,
            content,
        })
    }
}

/// The rewritten resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeDocument {
    pub name: String,
    pub contact: String,
    #[serde(default)]
    pub profile: String,
    pub sections: Vec<Section>,
    /// Plain-text rendition, used by callers for diffing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
}

impl ResumeDocument {
    /// Flattens the document into plain text in reading order.
    pub fn plain_text(&self) -> String {
        let mut lines: Vec<String> = Vec::new();
        push_nonblank(&mut lines, &self.name);
        push_nonblank(&mut lines, &self.contact);
        push_nonblank(&mut lines, &self.profile);

        for section in &self.sections {
            push_nonblank(&mut lines, &section.title.to_uppercase());
            match &section.content {
                SectionContent::Experience(entries) => {
                    for entry in entries {
                        push_nonblank(&mut lines, &entry.title);
                        push_nonblank(&mut lines, &format!("{} | {}", entry.company, entry.dates));
                        for bullet in &entry.bullets {
                            push_nonblank(&mut lines, &format!("• {bullet}"));
                        }
                    }
                }
                SectionContent::FreeText(text) => {
                    for line in text.lines() {
                        push_nonblank(&mut lines, line);
                    }
                }
            }
        }

        lines.join("\n")
    }

    /// Fills `raw_text` from the structured content when the model omitted it.
    pub fn with_raw_text(mut self) -> Self {
        let missing = self
            .raw_text
            .as_deref()
            .map_or(true, |text| text.trim().is_empty());
        if missing {
            self.raw_text = Some(self.plain_text());
        }
        self
    }
}

fn push_nonblank(lines: &mut Vec<String>, text: &str) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        lines.push(trimmed.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "name": "Jordan Lee",
        "contact": "jordan@example.com | Chicago, IL",
        "profile": "Analyst with seven years in retail finance.",
        "sections": [
            {
                "type": "experience",
                "title": "Professional Experience",
                "content": [
                    {
                        "company": "Acme Retail",
                        "title": "Senior Analyst",
                        "dates": "2019 - Present",
                        "bullets": ["Built weekly forecast, cutting stockouts 12%."]
                    }
                ]
            },
            {"type": "skills", "title": "Skills", "content": "SQL, Excel, Tableau"},
            {"type": "profile", "title": "Interests", "content": "Chess"}
        ]
    }"#;

    #[test]
    fn test_resume_deserializes_tagged_sections() {
        let doc: ResumeDocument = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(doc.sections.len(), 3);
        match &doc.sections[0].content {
            SectionContent::Experience(entries) => {
                assert_eq!(entries[0].title, "Senior Analyst");
            }
            other => panic!("expected experience content, got {other:?}"),
        }
        assert_eq!(
            doc.sections[1].content,
            SectionContent::FreeText("SQL, Excel, Tableau".to_string())
        );
    }

    #[test]
    fn test_unknown_section_type_decodes_as_other() {
        let doc: ResumeDocument = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(doc.sections[2].kind, SectionKind::Other);
    }

    #[test]
    fn test_experience_with_text_content_is_rejected() {
        let json = r#"{"type": "experience", "title": "Work", "content": "Acme 2019-2021"}"#;
        let err = serde_json::from_str::<Section>(json).unwrap_err();
        assert!(err.to_string().contains("list of entries"));
    }

    #[test]
    fn test_entry_missing_dates_is_rejected() {
        let json = r#"{"type": "experience", "title": "Work",
            "content": [{"company": "Acme", "title": "Analyst", "bullets": []}]}"#;
        assert!(serde_json::from_str::<Section>(json).is_err());
    }

    #[test]
    fn test_free_text_list_of_lines_is_joined() {
        let json = r#"{"type": "skills", "title": "Skills", "content": ["SQL", "Python"]}"#;
        let section: Section = serde_json::from_str(json).unwrap();
        assert_eq!(section.content, SectionContent::FreeText("SQL\nPython".to_string()));
    }

    #[test]
    fn test_section_serializes_with_type_key() {
        let doc: ResumeDocument = serde_json::from_str(SAMPLE).unwrap();
        let value = serde_json::to_value(&doc.sections[1]).unwrap();
        assert_eq!(value["type"], "skills");
        assert_eq!(value["content"], "SQL, Excel, Tableau");
    }

    #[test]
    fn test_plain_text_keeps_bullet_order() {
        let doc: ResumeDocument = serde_json::from_str(SAMPLE).unwrap();
        let text = doc.with_raw_text().raw_text.unwrap();
        let title = text.find("Senior Analyst").unwrap();
        let bullet = text.find("• Built weekly forecast").unwrap();
        assert!(title < bullet);
        assert!(text.contains("SKILLS"));
    }
}
