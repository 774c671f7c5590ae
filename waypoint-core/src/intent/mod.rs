mod classification;
mod taxonomy;

pub use classification::{EditTarget, IntentClassification, OutputKind, Slots};
pub use taxonomy::Intent;
