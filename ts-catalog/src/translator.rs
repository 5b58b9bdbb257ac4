use std::collections::HashMap;

use tracing::{debug, warn};

use crate::model::{Catalog, TranslationStatus};
use crate::plural::PluralRuleSet;

/// How a catalog is turned into a lookup table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranslatorOptions {
    /// Use the text of unfinished translations instead of the source text
    pub include_unfinished: bool,
}

#[derive(Debug)]
struct Entry {
    comment: String,
    numerus: bool,
    forms: Vec<String>,
}

/// Runtime lookup table built from one catalog.
///
/// Messages are keyed by context, then source text, then disambiguation
/// comment. Obsolete, vanished and empty translations are left out, as are
/// unfinished ones unless [`TranslatorOptions::include_unfinished`] is set,
/// so a lookup for any of them falls back to the source text.
#[derive(Debug, Default)]
pub struct Translator {
    language: Option<String>,
    plural_rules: Option<PluralRuleSet>,
    entries: HashMap<String, HashMap<String, Vec<Entry>>>,
    len: usize,
}

impl Translator {
    pub fn from_catalog(catalog: &Catalog, options: TranslatorOptions) -> Self {
        let plural_rules = catalog.language.as_deref().and_then(|language| {
            PluralRuleSet::for_locale(language)
                .map_err(|e| warn!("No plural rules for catalog language: {}", e))
                .ok()
        });

        let mut translator = Translator {
            language: catalog.language.clone(),
            plural_rules,
            entries: HashMap::new(),
            len: 0,
        };

        for (context, message) in catalog.messages() {
            let usable = match message.translation.status {
                TranslationStatus::Finished => true,
                TranslationStatus::Unfinished => options.include_unfinished,
                TranslationStatus::Obsolete | TranslationStatus::Vanished => false,
            };
            if !usable || message.translation.text.is_empty() {
                continue;
            }

            let by_comment = translator
                .entries
                .entry(context.to_string())
                .or_default()
                .entry(message.source.clone())
                .or_default();
            if by_comment.iter().any(|e| e.comment == message.comment_key()) {
                debug!(
                    "Duplicate message '{}' in context '{}', keeping the first",
                    message.source, context
                );
                continue;
            }
            by_comment.push(Entry {
                comment: message.comment_key().to_string(),
                numerus: message.numerus,
                forms: message.translation.text.forms().to_vec(),
            });
            translator.len += 1;
        }

        translator
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn plural_rules(&self) -> Option<&PluralRuleSet> {
        self.plural_rules.as_ref()
    }

    /// Number of usable translations
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Translated text, or `None` when the caller should show the source.
    ///
    /// A miss with a non-empty disambiguation comment is retried without
    /// it. For plural messages, `count` selects the numerus form through the
    /// plural rules of the catalog language; without rules the first form
    /// is used.
    pub fn translate(
        &self,
        context: &str,
        source: &str,
        comment: &str,
        count: Option<usize>,
    ) -> Option<&str> {
        let entry = self.find(context, source, comment).or_else(|| {
            if comment.is_empty() {
                None
            } else {
                self.find(context, source, "")
            }
        })?;

        let index = match (count, &self.plural_rules) {
            (Some(count), Some(rules)) if entry.numerus => rules.select(count),
            _ => 0,
        };
        let form = entry.forms.get(index).or_else(|| entry.forms.last())?;
        if form.is_empty() {
            None
        } else {
            Some(form.as_str())
        }
    }

    /// Translate `source`, falling back to it when no translation exists
    pub fn tr<'a>(&'a self, context: &str, source: &'a str) -> &'a str {
        self.tr_n(context, source, "", None)
    }

    /// Like [`Translator::tr`], with a disambiguation comment and a count
    pub fn tr_n<'a>(
        &'a self,
        context: &str,
        source: &'a str,
        comment: &str,
        count: Option<usize>,
    ) -> &'a str {
        match self.translate(context, source, comment, count) {
            Some(text) => text,
            None => {
                debug!(
                    "No translation for '{}' in context '{}', using source text",
                    source, context
                );
                source
            }
        }
    }

    fn find(&self, context: &str, source: &str, comment: &str) -> Option<&Entry> {
        self.entries
            .get(context)?
            .get(source)?
            .iter()
            .find(|entry| entry.comment == comment)
    }
}
