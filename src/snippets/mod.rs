// Snippet dictionary - user snippet store, built-in presets and the
// per-language active dictionary used by live expansion

mod presets;
mod resolver;
mod store;

pub use presets::{BuiltinPresets, PresetTable};
pub use resolver::{ActiveDictionary, TemplateResolver};
pub use store::{
    ImportSummary, JsonFileBackend, MemoryBackend, Snippet, SnippetBackend, SnippetError,
    SnippetExport, SnippetPatch, SnippetStore,
};
