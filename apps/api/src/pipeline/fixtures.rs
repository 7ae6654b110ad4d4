//! Shared test fixtures: a job description, a resume, and the three replies a
//! well-behaved generation service would give for them.

use crate::models::{GapAnalysis, RequirementsProfile};

pub const JOB_DESCRIPTION: &str = "Senior Data Analyst, Retail Finance. \
    We need 5+ years of SQL and financial modelling experience, Tableau and Snowflake \
    skills, and strong stakeholder communication. Hybrid role in Chicago.";

pub const RESUME_TEXT: &str = "Jordan Lee\n\
    jordan@example.com | Chicago, IL\n\
    Analyst with seven years in retail finance.\n\
    EXPERIENCE\n\
    Senior Analyst, Acme Retail, 2019 - Present\n\
    - Built weekly demand forecast in SQL\n\
    - Maintained Tableau dashboards for regional managers\n\
    - Presented monthly variance reviews to finance leadership\n\
    EDUCATION\n\
    BSc Economics, University of Illinois, 2016";

/// Wrapped in commentary the way models often answer.
pub const REQUIREMENTS_REPLY: &str = r#"Here is the analysis you asked for:
```json
{
  "hard_requirements": ["5+ years SQL", "Financial modelling"],
  "soft_requirements": ["Stakeholder communication"],
  "tools_and_platforms": ["Tableau", "Snowflake"],
  "implicit_expectations": {"industry": "retail finance", "seniority": "senior", "work_type": "hybrid"},
  "role_context": {"industry": "retail", "seniority": "senior", "work_type": "hybrid"},
  "red_flags": ["No cloud data warehouse experience"]
}
```"#;

/// `overall` is deliberately wrong; it must be recomputed to 49.
pub const GAP_REPLY: &str = r#"{
  "match_score": {"hard_skill": 40, "tools": 50, "soft_skill": 70, "overall": 61},
  "matched_keywords": ["SQL", "Tableau"],
  "keyword_gaps": ["Snowflake"],
  "semantic_gaps": [{"jd_term": "stakeholder communication", "resume_equivalent": "variance reviews to finance leadership"}],
  "over_indexed": [],
  "missing_context": ["team size"],
  "gap_bridges": [{"missing_skill": "Snowflake", "transferable_experience": "SQL forecasting pipelines"}]
}"#;

pub const REWRITE_REPLY: &str = r#"{
  "name": "Jordan Lee",
  "contact": "jordan@example.com | Chicago, IL",
  "profile": "Retail finance analyst with seven years of SQL forecasting and financial modelling.",
  "sections": [
    {
      "type": "experience",
      "title": "Professional Experience",
      "content": [
        {
          "company": "Acme Retail",
          "title": "Senior Analyst",
          "dates": "2019 - Present",
          "bullets": [
            "Built a weekly SQL demand forecast, cutting stockouts 12% across 40 stores.",
            "Maintained Tableau dashboards, giving regional managers same-day sales visibility.",
            "Presented monthly variance reviews, aligning finance leadership on budget corrections."
          ]
        }
      ]
    },
    {"type": "skills", "title": "Core Skills", "content": "SQL\nTableau\nFinancial modelling"},
    {"type": "education", "title": "Education", "content": "BSc Economics, University of Illinois, 2016"}
  ]
}"#;

pub fn requirements() -> RequirementsProfile {
    crate::pipeline::extract::extract(REQUIREMENTS_REPLY, crate::pipeline::Stage::RequirementsExtraction)
        .expect("fixture decodes")
}

pub fn gap_analysis() -> GapAnalysis {
    serde_json::from_str(GAP_REPLY).expect("fixture decodes")
}
