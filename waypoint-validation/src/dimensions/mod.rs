//! Verification dimensions, run in order: schema, citation, coverage,
//! diversity. Each records findings and never short-circuits the others.

pub mod citation;
pub mod coverage;
pub mod diversity;
pub mod schema;

/// Findings of one dimension.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Findings {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl Findings {
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }

    pub(crate) fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub(crate) fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}
