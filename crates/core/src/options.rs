//! Scanner configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Options consulted by the attribute parser.
///
/// Deserializes from JSON with camelCase or snake_case keys; any missing
/// field takes its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// Rewrite shorthand class tokens such as `.1/2` or `.!red`.
    #[serde(alias = "expandShorthandClasses")]
    pub expand_shorthand_classes: bool,
    /// Extra shorthand mappings, consulted before the built-in table.
    /// Keys match case-insensitively.
    #[serde(alias = "classShorthands")]
    pub class_shorthands: BTreeMap<String, String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            expand_shorthand_classes: true,
            class_shorthands: BTreeMap::new(),
        }
    }
}

impl ScanOptions {
    /// Options that emit every class token verbatim.
    pub fn verbatim() -> Self {
        Self {
            expand_shorthand_classes: false,
            ..Self::default()
        }
    }

    /// Adds a shorthand mapping, replacing any earlier one for the same key.
    pub fn with_shorthand(mut self, token: impl Into<String>, class: impl Into<String>) -> Self {
        self.class_shorthands
            .insert(token.into().to_ascii_lowercase(), class.into());
        self
    }

    /// Parses options from a JSON document and validates the shorthand keys.
    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        let parsed: ScanOptions = serde_json::from_str(input)?;
        parsed.validated()
    }

    fn validated(self) -> Result<Self, ConfigError> {
        let mut class_shorthands = BTreeMap::new();
        for (key, class) in self.class_shorthands {
            if key.is_empty() {
                return Err(ConfigError::InvalidShorthand {
                    key,
                    reason: "key is empty",
                });
            }
            // Chunks split on whitespace and stop at quotes and braces.
            if key
                .bytes()
                .any(|b| crate::scan::is_space(b) || matches!(b, b'"' | b'\\' | b'{' | b'}' | b'\n'))
            {
                return Err(ConfigError::InvalidShorthand {
                    key,
                    reason: "key contains whitespace, a quote, a backslash or a brace",
                });
            }
            class_shorthands.insert(key.to_ascii_lowercase(), class);
        }
        Ok(Self {
            class_shorthands,
            ..self
        })
    }
}
