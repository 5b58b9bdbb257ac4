//! Choosing the UI locale and stacking the catalogs for it.
//!
//! The locale is a `lang_territory` pair such as `de_DE`. For it, the
//! catalog of the bare language (`de`) is installed first and the
//! territory-specific one (`de_DE`) second; lookups consult the most
//! recently installed catalog first, so territory strings override
//! language strings and anything missing from both shows the source text.

use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{CatalogError, CatalogResult};
use crate::loader::load_catalog_from_file;
use crate::translator::{Translator, TranslatorOptions};

/// Locale used when nothing else is configured
pub const DEFAULT_LOCALE: &str = "en_US";

/// Candidate sources for the UI locale, highest precedence first:
/// command line, stored setting, system locale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageSettings {
    pub command_line: Option<String>,
    pub stored: Option<String>,
    pub system: Option<String>,
}

impl LanguageSettings {
    /// The `lang_territory` to use, e.g. `zh_CN`
    pub fn resolve(&self) -> String {
        [&self.command_line, &self.stored, &self.system]
            .into_iter()
            .flatten()
            .map(|value| value.trim())
            .find(|value| !value.is_empty())
            .map(|value| value.replace('-', "_"))
            .unwrap_or_else(|| DEFAULT_LOCALE.to_string())
    }
}

/// System locale from POSIX environment variables
///
/// Checks `LC_ALL`, `LC_MESSAGES` and `LANG` in that order, through `lookup`
/// so callers decide where the variables come from.
pub fn system_locale<F>(lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .into_iter()
        .filter_map(|key| lookup(key))
        .find_map(|value| normalize_posix_locale(&value))
}

/// `zh_CN.UTF-8@pinyin` becomes `zh_CN`; `C` and `POSIX` carry no language
pub fn normalize_posix_locale(value: &str) -> Option<String> {
    let locale = value
        .split(['.', '@'])
        .next()
        .unwrap_or_default()
        .trim();
    match locale {
        "" | "C" | "POSIX" => None,
        locale => Some(locale.to_string()),
    }
}

/// `de_DE` → `Some("de")`; a locale without territory has no base
pub fn base_language(lang_territory: &str) -> Option<&str> {
    lang_territory
        .rfind('_')
        .map(|index| &lang_territory[..index])
        .filter(|lang| !lang.is_empty())
}

/// Locales to install for `lang_territory`, in installation order
pub fn install_order(lang_territory: &str) -> Vec<String> {
    let mut order = Vec::new();
    if let Some(lang) = base_language(lang_territory) {
        order.push(lang.to_string());
    }
    order.push(lang_territory.to_string());
    order
}

/// Stack of translators consulted newest first
#[derive(Debug, Default)]
pub struct Localizer {
    translators: Vec<Translator>,
}

impl Localizer {
    pub fn new() -> Self {
        Localizer::default()
    }

    /// Install `<dir>/<prefix>_<locale>.ts` for every locale in
    /// [`install_order`]. Missing files are skipped.
    ///
    /// # Errors
    /// Files that exist but cannot be read or parsed
    pub fn load(
        dir: &Path,
        prefix: &str,
        lang_territory: &str,
        options: TranslatorOptions,
    ) -> CatalogResult<Self> {
        let mut localizer = Localizer::new();
        for locale in install_order(lang_territory) {
            let path = dir.join(format!("{}_{}.ts", prefix, locale));
            match load_catalog_from_file(&path) {
                Ok(catalog) => {
                    info!("Installing translations from {}", path.display());
                    localizer.install(Translator::from_catalog(&catalog, options));
                }
                Err(CatalogError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
                    debug!("No catalog at {}", path.display());
                }
                Err(e) => return Err(e),
            }
        }

        if localizer.is_empty() {
            warn!(
                "No translations for '{}' in {}, showing source text",
                lang_territory,
                dir.display()
            );
        }
        Ok(localizer)
    }

    /// Install a translator on top of the stack
    pub fn install(&mut self, translator: Translator) -> &mut Self {
        self.translators.push(translator);
        self
    }

    pub fn len(&self) -> usize {
        self.translators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.translators.is_empty()
    }

    pub fn translate(
        &self,
        context: &str,
        source: &str,
        comment: &str,
        count: Option<usize>,
    ) -> Option<&str> {
        self.translators
            .iter()
            .rev()
            .find_map(|translator| translator.translate(context, source, comment, count))
    }

    pub fn tr<'a>(&'a self, context: &str, source: &'a str) -> &'a str {
        self.tr_n(context, source, "", None)
    }

    pub fn tr_n<'a>(
        &'a self,
        context: &str,
        source: &'a str,
        comment: &str,
        count: Option<usize>,
    ) -> &'a str {
        self.translate(context, source, comment, count)
            .unwrap_or(source)
    }
}
