// Live trigger expansion - detects completed triggers in edit events and
// replaces them with their template

mod detector;
mod executor;

pub use detector::{classify, detect, EditClass, EditEvent, ExpansionRequest};
pub use executor::{expand, CaretOffset, ParsedTemplate, CARET_MARKER};
