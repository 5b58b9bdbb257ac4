//! Qt Linguist translation catalogs
//!
//! Reads and writes `.ts` files, checks them for integrity problems and
//! turns them into lookup tables that fall back to the source text.
//!
//! ```ignore
//! use ts_catalog::{Translator, TranslatorOptions, load_catalog_from_file};
//! use std::path::Path;
//!
//! let catalog = load_catalog_from_file(Path::new("locale/bitcoin_zh_CN.ts"))?;
//! let translator = Translator::from_catalog(&catalog, TranslatorOptions::default());
//! assert_eq!(translator.tr("AddressBookPage", "&Copy Address"), "复制地址(&C)");
//! ```

pub mod error;
pub mod loader;
pub mod locale;
pub mod model;
pub mod plural;
pub mod reader;
pub mod stats;
pub mod translator;
pub mod validate;
pub mod writer;

#[cfg(test)]
mod integration_tests;

// Re-export the types most callers need
pub use error::{CatalogError, CatalogResult};
pub use loader::{
    load_all_catalogs_from_dir, load_catalog_from_file, locale_from_filename, same_locale,
    save_catalog_to_file,
};
pub use locale::{LanguageSettings, Localizer, system_locale};
pub use model::{
    Catalog, Context, LineRef, Location, Message, Translation, TranslationStatus, TranslationText,
};
pub use plural::{PluralForm, PluralRuleSet};
pub use reader::{Parser, parse_catalog};
pub use stats::{CatalogStats, Counts};
pub use translator::{Translator, TranslatorOptions};
pub use validate::{Issue, IssueKind, Severity, ValidationReport, validate};
pub use writer::write_catalog;
