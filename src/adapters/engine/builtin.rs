//! Builtin lint engine
//!
//! A small rule set standing in for the full ktlint engine. Formatting
//! applies every autocorrecting rule until the text stops changing.

use super::rules::{Rule, standard_rules};
use super::syntax::Source;
use crate::core::models::Properties;
use crate::core::ports::{Code, EngineError, Formatted, LintEngine, LintError};

const MAX_FORMAT_PASSES: usize = 5;

/// [`LintEngine`] backed by [`standard_rules`]
#[derive(Debug)]
pub struct BuiltinEngine {
    name: String,
    rules: Vec<Box<dyn Rule>>,
}

impl Default for BuiltinEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl BuiltinEngine {
    /// Engine with every standard rule
    #[must_use]
    pub fn new() -> Self {
        Self::with_rules(standard_rules())
    }

    /// Engine with a custom rule list
    #[must_use]
    pub fn with_rules(rules: Vec<Box<dyn Rule>>) -> Self {
        Self {
            name: format!("builtin {}", crate::VERSION),
            rules,
        }
    }

    /// Ids of every loaded rule
    #[must_use]
    pub fn rule_ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.id()).collect()
    }

    fn enabled<'a>(&'a self, properties: &'a Properties) -> impl Iterator<Item = &'a dyn Rule> + 'a {
        self.rules
            .iter()
            .map(|rule| &**rule)
            .filter(|rule| !properties.is_rule_disabled(rule.id()))
    }

    fn check(&self, text: &str, properties: &Properties) -> Result<Vec<LintError>, EngineError> {
        let source = Source::parse(text)?;
        let mut errors: Vec<LintError> =
            self.enabled(properties).flat_map(|rule| rule.check(&source, properties)).collect();
        errors.sort_by(|a, b| (a.line, a.col, &a.rule_id).cmp(&(b.line, b.col, &b.rule_id)));
        Ok(errors)
    }
}

impl LintEngine for BuiltinEngine {
    fn name(&self) -> &str {
        &self.name
    }

    fn lint(&self, code: &Code, properties: &Properties) -> Result<Vec<LintError>, EngineError> {
        self.check(&code.text, properties)
    }

    fn format(&self, code: &Code, properties: &Properties) -> Result<Formatted, EngineError> {
        let before = self.check(&code.text, properties)?;

        let mut text = code.text.clone();
        for _ in 0..MAX_FORMAT_PASSES {
            let start = text.clone();
            for rule in self.enabled(properties).filter(|rule| rule.auto_correctable()) {
                let source = Source::parse(&text)?;
                if let Some(fixed) = rule.fix(&source, properties) {
                    text = fixed;
                }
            }
            if text == start {
                break;
            }
        }

        let after = self.check(&text, properties)?;
        let issues = before
            .into_iter()
            .filter(|error| error.can_be_auto_corrected)
            .map(|error| (error, true))
            .chain(after.into_iter().map(|error| (error, false)))
            .collect();

        Ok(Formatted { text, issues })
    }
}
