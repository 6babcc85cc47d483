// Built-in snippet presets, per language
// Immutable for the life of the process; user snippets are layered on top.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Trigger -> template table for one language
pub type PresetTable = HashMap<String, String>;

/// Markup-with-script languages and the scripting language they borrow presets from
const PRESET_FALLBACKS: &[(&str, &str)] = &[("jsx", "typescript")];

const REACT_COMPONENT: &str = "import React from 'react';\n\nconst NewComponent = (props) => {\n    return (\n        <div>\n            $CURSOR$\n        </div>\n    );\n};\n\nexport default NewComponent;";
const USE_STATE: &str = "const [value, setValue] = React.useState($CURSOR$initialValue);";

const STANDARD_PRESETS: &[(&str, &[(&str, &str)])] = &[
    (
        "html",
        &[
            (
                "!",
                "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n    <meta charset=\"UTF-8\">\n    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n    <title>Document</title>\n</head>\n<body>\n    $CURSOR$\n</body>\n</html>",
            ),
            (
                "table",
                "<table>\n    <thead>\n        <tr>\n            <th>Header 1</th>\n            <th>Header 2</th>\n        </tr>\n    </thead>\n    <tbody>\n        <tr>\n            <td>$CURSOR$Data 1</td>\n            <td>Data 2</td>\n        </tr>\n    </tbody>\n</table>",
            ),
            ("link:css", "<link rel=\"stylesheet\" href=\"style.css\">"),
            ("script:src", "<script src=\"app.js\" defer>$CURSOR$</script>"),
        ],
    ),
    (
        "css",
        &[
            ("bg", "background-color: $CURSOR$;"),
            (
                "btn",
                ".button {\n    display: inline-block;\n    padding: 10px 20px;\n    font-size: 16px;\n    cursor: pointer;\n    text-align: center;\n    color: #fff;\n    background-color: #4CAF50;\n    border: none;\n    border-radius: 15px;\n}\n.button:hover {background-color: #3e8e41}$CURSOR$",
            ),
            ("flex", "display: flex;\nalign-items: center;\njustify-content: center;$CURSOR$"),
        ],
    ),
    (
        "javascript",
        &[
            ("log", "console.log($CURSOR$);"),
            ("fun", "function functionName($CURSOR$) {\n    // code block\n}"),
            (
                "for",
                "for (let i = 0; i < array.length; i++) {\n    const element = array[i];\n    $CURSOR$\n}",
            ),
            (
                "fetch",
                "fetch('https://api.example.com/data')\n    .then(response => response.json())\n    .then(data => {\n        console.log(data);\n        $CURSOR$\n    })\n    .catch(error => console.error('Error fetching data:', error));",
            ),
        ],
    ),
    (
        "typescript",
        &[
            ("interface", "interface NewInterface {\n    property: string;\n    $CURSOR$\n}"),
            ("type", "type NewType = {\n    id: number;\n    name: string;\n    $CURSOR$\n};"),
            ("comp", REACT_COMPONENT),
            ("useState", USE_STATE),
        ],
    ),
    ("jsx", &[("comp", REACT_COMPONENT), ("useState", USE_STATE)]),
    (
        "python",
        &[
            ("def", "def new_function(arg1, arg2):\n    # function body\n    $CURSOR$\n    pass"),
            (
                "class",
                "class NewClass:\n    def __init__(self$CURSOR$):\n        pass\n\n    def method(self):\n        pass",
            ),
            ("for", "for item in iterable:\n    # process item\n    $CURSOR$\n    pass"),
        ],
    ),
];

/// Built-in presets for every language
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuiltinPresets {
    tables: HashMap<String, PresetTable>,
}

impl BuiltinPresets {
    /// Empty preset set
    pub fn new() -> Self {
        Self::default()
    }

    /// The presets shipped with the playground
    pub fn standard() -> Self {
        let tables = STANDARD_PRESETS
            .iter()
            .map(|(language, entries)| {
                let table = entries
                    .iter()
                    .map(|(trigger, template)| (trigger.to_string(), template.to_string()))
                    .collect();
                (language.to_string(), table)
            })
            .collect();
        Self { tables }
    }

    /// Process-wide shared copy of the standard presets
    pub fn shared() -> Arc<Self> {
        static SHARED: OnceLock<Arc<BuiltinPresets>> = OnceLock::new();
        Arc::clone(SHARED.get_or_init(|| Arc::new(Self::standard())))
    }

    /// Builder-style insertion, used to assemble custom preset sets
    pub fn with_preset(mut self, language: &str, trigger: &str, template: &str) -> Self {
        self.tables
            .entry(language.to_string())
            .or_default()
            .insert(trigger.to_string(), template.to_string());
        self
    }

    /// Presets defined directly for `language`
    pub fn table(&self, language: &str) -> Option<&PresetTable> {
        self.tables.get(language).filter(|table| !table.is_empty())
    }

    /// Presets for `language`, falling back to the base scripting
    /// language for markup-with-script variants that define none
    pub fn for_language(&self, language: &str) -> Option<&PresetTable> {
        self.table(language).or_else(|| {
            PRESET_FALLBACKS
                .iter()
                .find(|(variant, _)| *variant == language)
                .and_then(|(_, base)| self.table(base))
        })
    }

    /// Languages that have at least one preset
    pub fn languages(&self) -> Vec<&str> {
        let mut languages: Vec<&str> = self
            .tables
            .iter()
            .filter(|(_, table)| !table.is_empty())
            .map(|(language, _)| language.as_str())
            .collect();
        languages.sort_unstable();
        languages
    }
}
