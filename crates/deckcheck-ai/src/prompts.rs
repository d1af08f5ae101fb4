//! Prompt templates for AI rules
//!
//! Handlebars templates with two helpers:
//! - or_unknown: render null/missing values as "unknown"
//! - yes_no: render a flag as "yes"/"no"

use handlebars::{handlebars_helper, Handlebars};
use serde_json::{json, Value};

use crate::service::ReasoningError;
use crate::summary::DeckSummary;

const SYSTEM_TEMPLATE: &str = "system";
const USER_TEMPLATE: &str = "user";

const SYSTEM_PROMPT: &str = concat!(
    "You are an expert slide deck validator for a professional conference. ",
    "Evaluate using ONLY the provided metadata. You do NOT see actual slide content. ",
    "Consider the platform/format when making judgments. ",
    "When uncertain, prefer pass=true with constructive feedback. ",
    "Respond with strict JSON: {\"pass\": boolean, \"reasons\": string[]}. ",
    "Keep reasons concise, actionable, and positive (max 2-3 items).",
    "{{#if platform}} Platform: {{platform}}{{/if}}",
);

const USER_PROMPT: &str = concat!(
    "Validation Rule: {{rule_label}}\n",
    "Instructions: {{prompt}}\n",
    "Deck Analysis:\n",
    "- Format: {{or_unknown summary.format}}\n",
    "- Platform: {{or_unknown summary.platform}}\n",
    "- Source: {{or_unknown summary.sourceType}}\n",
    "- Slides: {{or_unknown summary.pageCount}}\n",
    "- Images: {{or_unknown summary.imagesApprox}}\n",
    "- Text elements: {{or_unknown summary.textOpsApprox}}\n",
    "- Bullet points: {{or_unknown summary.bulletsApprox}}\n",
    "- Video: {{yes_no summary.hasVideo}}\n",
    "- Audio: {{yes_no summary.hasAudio}}\n",
    "- Aspect ratio: {{or_unknown summary.aspect.commonRatio}}\n",
    "\n",
    "Respond with JSON only: {\"pass\": boolean, \"reasons\": string[]}",
);

/// System and user prompt for one rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RulePrompt {
    pub system: String,
    pub user: String,
}

pub struct PromptRenderer {
    handlebars: Handlebars<'static>,
}

impl PromptRenderer {
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        // prompts are plain text, not HTML
        handlebars.register_escape_fn(handlebars::no_escape);

        handlebars.register_helper("or_unknown", Box::new(or_unknown));
        handlebars.register_helper("yes_no", Box::new(yes_no));

        for (name, template) in [(SYSTEM_TEMPLATE, SYSTEM_PROMPT), (USER_TEMPLATE, USER_PROMPT)] {
            if let Err(e) = handlebars.register_template_string(name, template) {
                tracing::error!(template = name, error = %e, "prompt template rejected");
            }
        }

        Self { handlebars }
    }

    pub fn render(
        &self,
        rule_label: &str,
        prompt: &str,
        summary: &DeckSummary,
    ) -> Result<RulePrompt, ReasoningError> {
        let data = json!({
            "rule_label": rule_label,
            "prompt": prompt,
            "platform": summary.platform,
            "summary": summary,
        });

        Ok(RulePrompt {
            system: self.render_named(SYSTEM_TEMPLATE, &data)?,
            user: self.render_named(USER_TEMPLATE, &data)?,
        })
    }

    fn render_named(&self, name: &str, data: &Value) -> Result<String, ReasoningError> {
        self.handlebars
            .render(name, data)
            .map_err(|e| ReasoningError::Prompt(e.to_string()))
    }
}

impl Default for PromptRenderer {
    fn default() -> Self {
        Self::new()
    }
}

handlebars_helper!(or_unknown: |value: Json| match value {
    Value::Null => "unknown".to_string(),
    Value::String(s) if s.is_empty() => "unknown".to_string(),
    Value::String(s) => s.clone(),
    other => other.to_string(),
});

handlebars_helper!(yes_no: |flag: Json| if flag.as_bool().unwrap_or(false) { "yes" } else { "no" });
