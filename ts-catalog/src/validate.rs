use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::model::{Catalog, Message, TranslationStatus};
use crate::plural::PluralRuleSet;

/// `%1`..`%99`, `%L1` and `%n`
static FORMAT_SPECIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%L?([1-9][0-9]?|n)").expect("valid specifier pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// A context name appears more than once
    DuplicateContext,
    /// The same source and comment appear twice in one context
    DuplicateMessage,
    /// Marked finished, but a form is empty
    EmptyFinishedTranslation,
    /// Wrong number of numerus forms for the catalog language
    NumerusFormCount { expected: usize, found: usize },
    /// Plural flag and translation shape disagree
    NumerusMismatch,
    /// Translation uses different `%` placeholders than the source
    FormatSpecifierMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },
    MissingLanguage,
    UnknownLanguage(String),
}

/// One problem found in a catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub severity: Severity,
    pub kind: IssueKind,
    pub context: Option<String>,
    pub source: Option<String>,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{}: ", severity)?;
        match &self.kind {
            IssueKind::DuplicateContext => write!(f, "duplicate context")?,
            IssueKind::DuplicateMessage => write!(f, "duplicate message")?,
            IssueKind::EmptyFinishedTranslation => {
                write!(f, "finished translation is empty")?
            }
            IssueKind::NumerusFormCount { expected, found } => write!(
                f,
                "expected {} numerus form(s), found {}",
                expected, found
            )?,
            IssueKind::NumerusMismatch => {
                write!(f, "numerus flag does not match translation forms")?
            }
            IssueKind::FormatSpecifierMismatch { expected, found } => write!(
                f,
                "format specifiers differ: source has [{}], translation has [{}]",
                expected.join(", "),
                found.join(", ")
            )?,
            IssueKind::MissingLanguage => write!(f, "catalog has no language attribute")?,
            IssueKind::UnknownLanguage(language) => {
                write!(f, "no plural rules for language '{}'", language)?
            }
        }
        if let Some(context) = &self.context {
            write!(f, " in context '{}'", context)?;
        }
        if let Some(source) = &self.source {
            write!(f, " for \"{}\"", source)?;
        }
        Ok(())
    }
}

/// All issues found in one catalog, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    fn push(&mut self, severity: Severity, kind: IssueKind, context: Option<&str>, message: Option<&Message>) {
        self.issues.push(Issue {
            severity,
            kind,
            context: context.map(str::to_string),
            source: message.map(|m| m.source.clone()),
        });
    }
}

impl<'a> IntoIterator for &'a ValidationReport {
    type Item = &'a Issue;
    type IntoIter = std::slice::Iter<'a, Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.iter()
    }
}

/// Check a catalog for integrity problems.
///
/// Obsolete and vanished messages are not checked.
pub fn validate(catalog: &Catalog) -> ValidationReport {
    let mut report = ValidationReport::default();

    let rules = match catalog.language.as_deref() {
        None => {
            report.push(Severity::Warning, IssueKind::MissingLanguage, None, None);
            None
        }
        Some(language) => match PluralRuleSet::for_locale(language) {
            Ok(rules) => Some(rules),
            Err(_) => {
                report.push(
                    Severity::Warning,
                    IssueKind::UnknownLanguage(language.to_string()),
                    None,
                    None,
                );
                None
            }
        },
    };

    let mut context_names = HashSet::new();
    for context in &catalog.contexts {
        let name = Some(context.name.as_str());
        if !context_names.insert(context.name.as_str()) {
            report.push(Severity::Error, IssueKind::DuplicateContext, name, None);
        }

        let mut keys = HashSet::new();
        for message in context.messages.iter().filter(|m| m.is_live()) {
            if !keys.insert((message.source.as_str(), message.comment_key())) {
                report.push(Severity::Error, IssueKind::DuplicateMessage, name, Some(message));
            }
            check_message(&mut report, name, message, rules.as_ref());
        }
    }

    report
}

fn check_message(
    report: &mut ValidationReport,
    context: Option<&str>,
    message: &Message,
    rules: Option<&PluralRuleSet>,
) {
    let translation = &message.translation;
    let forms = translation.text.forms();

    if message.numerus != translation.text.is_plural() {
        report.push(Severity::Error, IssueKind::NumerusMismatch, context, Some(message));
    } else if message.numerus {
        if let Some(rules) = rules {
            if !rules.accepts_form_count(forms.len()) {
                report.push(
                    Severity::Error,
                    IssueKind::NumerusFormCount {
                        expected: rules.form_count(),
                        found: forms.len(),
                    },
                    context,
                    Some(message),
                );
            }
        }
    }

    let finished = translation.status == TranslationStatus::Finished;
    if finished && (forms.is_empty() || forms.iter().any(|form| form.is_empty())) {
        report.push(
            Severity::Error,
            IssueKind::EmptyFinishedTranslation,
            context,
            Some(message),
        );
    }

    let expected = format_specifiers(&message.source, message.numerus);
    for form in forms.iter().filter(|form| !form.is_empty()) {
        let found = format_specifiers(form, message.numerus);
        if found != expected {
            let severity = if finished {
                Severity::Error
            } else {
                Severity::Warning
            };
            report.push(
                severity,
                IssueKind::FormatSpecifierMismatch {
                    expected: expected.iter().map(|s| format!("%{}", s)).collect(),
                    found: found.iter().map(|s| format!("%{}", s)).collect(),
                },
                context,
                Some(message),
            );
            break;
        }
    }
}

/// Placeholders used in `text`, sorted; repeated placeholders are kept.
///
/// Plural translations may leave out `%n`, so it is not collected for them.
pub fn format_specifiers(text: &str, numerus: bool) -> Vec<String> {
    let mut specifiers: Vec<String> = FORMAT_SPECIFIER
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .filter(|spec| !(numerus && spec == "n"))
        .collect();
    specifiers.sort();
    specifiers
}
