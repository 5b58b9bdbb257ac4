use serde::Serialize;

use crate::model::{Catalog, Context, TranslationStatus};

/// Message counts by translation status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub messages: usize,
    pub finished: usize,
    pub unfinished: usize,
    /// Obsolete and vanished messages
    pub obsolete: usize,
    pub numerus: usize,
}

impl Counts {
    fn of(context: &Context) -> Self {
        let mut counts = Counts::default();
        for message in context {
            counts.messages += 1;
            match message.status() {
                TranslationStatus::Finished => counts.finished += 1,
                TranslationStatus::Unfinished => counts.unfinished += 1,
                TranslationStatus::Obsolete | TranslationStatus::Vanished => counts.obsolete += 1,
            }
            if message.numerus {
                counts.numerus += 1;
            }
        }
        counts
    }

    fn add(&mut self, other: &Counts) {
        self.messages += other.messages;
        self.finished += other.finished;
        self.unfinished += other.unfinished;
        self.obsolete += other.obsolete;
        self.numerus += other.numerus;
    }

    /// Share of live messages that are finished, 1.0 when none are live
    pub fn completion(&self) -> f64 {
        let live = self.finished + self.unfinished;
        if live == 0 {
            1.0
        } else {
            self.finished as f64 / live as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextStats {
    pub name: String,
    pub counts: Counts,
}

/// Translation progress of a catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogStats {
    pub language: Option<String>,
    pub contexts: usize,
    pub totals: Counts,
    pub per_context: Vec<ContextStats>,
}

impl CatalogStats {
    pub fn of(catalog: &Catalog) -> Self {
        let mut totals = Counts::default();
        let per_context: Vec<ContextStats> = catalog
            .contexts
            .iter()
            .map(|context| {
                let counts = Counts::of(context);
                totals.add(&counts);
                ContextStats {
                    name: context.name.clone(),
                    counts,
                }
            })
            .collect();

        CatalogStats {
            language: catalog.language.clone(),
            contexts: catalog.contexts.len(),
            totals,
            per_context,
        }
    }

    pub fn completion(&self) -> f64 {
        self.totals.completion()
    }
}
