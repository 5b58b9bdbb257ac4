use ts_catalog::{CatalogStats, ValidationReport};

/// One line per issue, prefixed with the file it came from
pub fn format_issues(file: &str, report: &ValidationReport) -> String {
    let mut out = String::new();
    for issue in report {
        out.push_str(&format!("{}: {}\n", file, issue));
    }
    out
}

/// Human-readable progress summary of a catalog
pub fn format_stats(file: &str, stats: &CatalogStats, per_context: bool) -> String {
    let totals = &stats.totals;
    let mut out = format!(
        "{} [{}]: {:.1}% complete ({} finished, {} unfinished, {} obsolete; {} messages in {} contexts, {} plural)\n",
        file,
        stats.language.as_deref().unwrap_or("?"),
        stats.completion() * 100.0,
        totals.finished,
        totals.unfinished,
        totals.obsolete,
        totals.messages,
        stats.contexts,
        totals.numerus,
    );

    if per_context {
        let width = stats
            .per_context
            .iter()
            .map(|c| c.name.chars().count())
            .max()
            .unwrap_or(0);
        for context in &stats.per_context {
            out.push_str(&format!(
                "  {:<width$}  {:>5.1}%  {:>4}/{:<4}\n",
                context.name,
                context.counts.completion() * 100.0,
                context.counts.finished,
                context.counts.finished + context.counts.unfinished,
                width = width,
            ));
        }
    }
    out
}
