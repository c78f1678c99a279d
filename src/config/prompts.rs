//! Prompt templates for qarag.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Literal answer the model must give when the context does not support one.
pub const REFUSAL: &str = "I cannot find this information in the source.";

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Prompts {
    pub rag: RagPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Prompts for grounded answer generation.
///
/// `{{context}}`, `{{question}}` and `{{refusal}}` are filled in per query.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagPrompts {
    pub template: String,
}

impl Default for RagPrompts {
    fn default() -> Self {
        Self {
            template: r#"You answer questions using only the source context below.
Questions that fall into the same implicit category may share a context entry or answer.
If the context does not contain the answer, reply exactly:
"{{refusal}}"

Context:
{{context}}

Question:
{{question}}

Answer:
"#
            .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let rag_path = custom_path.join("rag.toml");
            if rag_path.exists() {
                let content = std::fs::read_to_string(&rag_path)?;
                prompts.rag = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    ///
    /// The template is scanned once, left to right. Substituted values are never
    /// re-scanned, and unknown placeholders are kept verbatim.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(open) = rest.find("{{") {
            result.push_str(&rest[..open]);
            let after = &rest[open + 2..];
            let Some(close) = after.find("}}") else {
                rest = &rest[open..];
                break;
            };

            match vars.get(&after[..close]) {
                Some(value) => {
                    result.push_str(value);
                    rest = &after[close + 2..];
                }
                None => {
                    result.push_str("{{");
                    rest = after;
                }
            }
        }

        result.push_str(rest);
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}
