// Template resolver - builds the active trigger dictionary for one language
//
// Two tiers: enabled user snippets first, built-in presets second. Nothing is
// cached; the store or language may change between keystrokes.

use std::collections::HashMap;

use super::presets::{BuiltinPresets, PresetTable};
use super::store::SnippetStore;

/// Trigger -> template lookup for one expansion attempt
#[derive(Debug, Clone, Default)]
pub struct ActiveDictionary<'a> {
    /// Enabled user snippets, trigger -> template
    overlay: HashMap<&'a str, &'a str>,
    /// Built-in presets for the language
    builtin: Option<&'a PresetTable>,
}

impl<'a> ActiveDictionary<'a> {
    /// Look up a trigger; user snippets win over presets
    pub fn get(&self, trigger: &str) -> Option<&'a str> {
        self.overlay.get(trigger).copied().or_else(|| {
            self.builtin
                .and_then(|table| table.get(trigger))
                .map(String::as_str)
        })
    }

    pub fn contains(&self, trigger: &str) -> bool {
        self.get(trigger).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.overlay.is_empty() && self.builtin.map_or(true, HashMap::is_empty)
    }

    /// Number of distinct triggers across both tiers
    pub fn len(&self) -> usize {
        let shadowed_free = self
            .builtin
            .map(|table| {
                table
                    .keys()
                    .filter(|trigger| !self.overlay.contains_key(trigger.as_str()))
                    .count()
            })
            .unwrap_or(0);
        self.overlay.len() + shadowed_free
    }

    /// Flattened copy of the dictionary
    pub fn to_map(&self) -> HashMap<String, String> {
        let mut merged: HashMap<String, String> = self.builtin.cloned().unwrap_or_default();
        for (trigger, template) in &self.overlay {
            merged.insert(trigger.to_string(), template.to_string());
        }
        merged
    }
}

/// Resolves active dictionaries from presets and the snippet store
pub struct TemplateResolver<'a> {
    presets: &'a BuiltinPresets,
    store: &'a SnippetStore,
}

impl<'a> TemplateResolver<'a> {
    pub fn new(presets: &'a BuiltinPresets, store: &'a SnippetStore) -> Self {
        Self { presets, store }
    }

    /// Active dictionary for `language`
    pub fn resolve(&self, language: &str) -> ActiveDictionary<'a> {
        // Later snippets overwrite earlier ones, matching insertion order
        let overlay = self
            .store
            .list_by_language(language)
            .into_iter()
            .map(|s| (s.trigger.as_str(), s.template.as_str()))
            .collect();

        ActiveDictionary {
            overlay,
            builtin: self.presets.for_language(language),
        }
    }
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod tests;
