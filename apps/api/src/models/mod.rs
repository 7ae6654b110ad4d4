pub mod gap_analysis;
pub mod requirements;
pub mod resume;

pub use gap_analysis::GapAnalysis;
pub use requirements::RequirementsProfile;
pub use resume::{ExperienceEntry, ResumeDocument, SectionContent};
