//! Job-requirements profile produced by the requirements-extraction stage.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Inferred shape of the role. Every field is optional; the model fills what
/// the job description supports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleContext {
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub seniority: Option<String>,
    #[serde(default)]
    pub work_type: Option<String>,
}

/// Structured requirements for a single job description.
///
/// All list fields are required on the wire (possibly empty) and never null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementsProfile {
    pub hard_requirements: Vec<String>,
    pub soft_requirements: Vec<String>,
    pub tools_and_platforms: Vec<String>,
    /// Open mapping of contextual attributes (industry, seniority, team size, ...).
    pub implicit_expectations: BTreeMap<String, Value>,
    #[serde(default)]
    pub role_context: Option<RoleContext>,
    pub red_flags: Vec<String>,
}

impl RequirementsProfile {
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.hard_requirements.is_empty()
            && self.soft_requirements.is_empty()
            && self.tools_and_platforms.is_empty()
    }
}
