use icu_locale::Locale;
use icu_plurals::{PluralCategory, PluralRuleType, PluralRules};

use crate::error::{CatalogError, CatalogResult};

/// A plural category used by a language, with a count that selects it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PluralForm {
    pub category: PluralCategory,
    pub sample: u32,
}

impl PluralForm {
    pub fn name(&self) -> String {
        format!("{:?}", self.category).to_lowercase()
    }
}

/// Cardinal plural rules of one locale, reduced to the categories that
/// non-negative integer counts can reach.
///
/// The number of reachable categories is the number of numerus forms a
/// translation for this locale carries. For example:
/// - Chinese has 1 form: other
/// - English has 2 forms: one (1) and other (2)
/// - Russian has 3 forms: one (1), few (2), many (5)
/// - Arabic has 6 forms: zero (0), one (1), two (2), few (3), many (11), other (100)
///
/// Some languages have a CLDR category only fractions reach (Polish `other`),
/// and catalogs for them often carry a form for it as well.
pub struct PluralRuleSet {
    locale: String,
    rules: PluralRules,
    forms: Vec<PluralForm>,
    category_count: usize,
}

impl PluralRuleSet {
    /// Build the rules for a locale in Qt (`zh_CN`) or BCP-47 (`zh-CN`) notation
    ///
    /// # Errors
    /// Returns an error if the locale is invalid or plural rules cannot be loaded
    pub fn for_locale(locale_str: &str) -> CatalogResult<Self> {
        let bcp47 = locale_str.trim().replace('_', "-");
        let locale: Locale = bcp47
            .parse()
            .map_err(|e| CatalogError::locale(locale_str, format!("{:?}", e)))?;

        let rules = PluralRules::try_new(locale.into(), PluralRuleType::Cardinal.into())
            .map_err(|e| CatalogError::locale(locale_str, format!("{:?}", e)))?;

        // Representative counts per category, probed in order; the first
        // count that lands in the category becomes its sample
        let samples_by_category = [
            (PluralCategory::Zero, vec![0u32]),
            (PluralCategory::One, vec![1u32, 21u32, 31u32, 41u32]),
            (PluralCategory::Two, vec![2u32, 22u32, 32u32]),
            (PluralCategory::Few, vec![3u32, 4u32, 23u32, 24u32]),
            (PluralCategory::Many, vec![5u32, 11u32, 101u32]),
            (
                PluralCategory::Other,
                vec![6u32, 7u32, 8u32, 9u32, 10u32, 25u32, 100u32, 1000u32],
            ),
        ];

        let mut forms = Vec::new();
        for (expected_category, samples) in samples_by_category.iter() {
            for &sample in samples {
                if rules.category_for(sample as usize) == *expected_category {
                    forms.push(PluralForm {
                        category: *expected_category,
                        sample,
                    });
                    break;
                }
            }
        }

        if forms.is_empty() {
            return Err(CatalogError::locale(locale_str, "no plural categories"));
        }

        let category_count = rules.categories().count().max(forms.len());

        Ok(PluralRuleSet {
            locale: locale_str.to_string(),
            rules,
            forms,
            category_count,
        })
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn forms(&self) -> &[PluralForm] {
        &self.forms
    }

    /// Number of numerus forms a translation should carry
    pub fn form_count(&self) -> usize {
        self.forms.len()
    }

    /// Number of CLDR cardinal categories, fractional ones included
    pub fn category_count(&self) -> usize {
        self.category_count
    }

    /// Whether a translation with `found` numerus forms fits this locale
    pub fn accepts_form_count(&self, found: usize) -> bool {
        found == self.form_count() || found == self.category_count
    }

    /// Index of the numerus form used for `count`
    pub fn select(&self, count: usize) -> usize {
        let category = self.rules.category_for(count);
        self.forms
            .iter()
            .position(|form| form.category == category)
            .unwrap_or(self.forms.len() - 1)
    }
}

impl std::fmt::Debug for PluralRuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluralRuleSet")
            .field("locale", &self.locale)
            .field("forms", &self.forms)
            .field("category_count", &self.category_count)
            .finish()
    }
}
