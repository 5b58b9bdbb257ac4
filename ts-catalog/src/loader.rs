use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{CatalogError, CatalogResult};
use crate::model::Catalog;
use crate::reader::parse_catalog;
use crate::writer::write_catalog;

/// Load a catalog from a single TS file
///
/// # Arguments
/// * `path` - Path to the `.ts` file
///
/// # Errors
/// - File not found or unreadable
/// - Malformed XML or a document that is not a TS catalog
pub fn load_catalog_from_file(path: &Path) -> CatalogResult<Catalog> {
    let content = fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
    let catalog = parse_catalog(&content)?;
    debug!(
        "Loaded {} messages in {} contexts from {}",
        catalog.len(),
        catalog.contexts.len(),
        path.display()
    );
    Ok(catalog)
}

/// Write a catalog to a TS file in canonical layout
pub fn save_catalog_to_file(catalog: &Catalog, path: &Path) -> CatalogResult<()> {
    fs::write(path, write_catalog(catalog)).map_err(|e| CatalogError::io(path, e))
}

/// Locale encoded in a TS file name.
///
/// With a prefix, the stem must be `<prefix>_<locale>`: `bitcoin_zh_CN.ts`
/// with prefix `bitcoin` gives `zh_CN`. Without one, the whole stem is the
/// locale.
pub fn locale_from_filename(path: &Path, prefix: Option<&str>) -> Option<String> {
    if path.extension().and_then(|ext| ext.to_str()) != Some("ts") {
        return None;
    }
    let stem = path.file_stem().and_then(|stem| stem.to_str())?;
    let locale = match prefix {
        Some(prefix) => stem.strip_prefix(prefix)?.strip_prefix('_')?,
        None => stem,
    };
    if locale.is_empty() {
        None
    } else {
        Some(locale.to_string())
    }
}

/// Whether two locale names match, in either Qt (`zh_TW`) or BCP-47 (`zh-TW`) notation
pub fn same_locale(a: &str, b: &str) -> bool {
    a.trim().replace('-', "_") == b.trim().replace('-', "_")
}

/// Load all catalogs from a directory of TS files
///
/// Files that are not `*.ts`, or do not match `prefix`, are skipped. Each
/// catalog is keyed by the locale in its file name.
///
/// # Arguments
/// * `dir` - Directory containing the translation files
/// * `prefix` - Optional file name prefix, e.g. `bitcoin` for `bitcoin_de.ts`
///
/// # Returns
/// A map from locale to catalog, ordered by locale
///
/// # Errors
/// - Directory not found
/// - File read/parse errors
pub fn load_all_catalogs_from_dir(
    dir: &Path,
    prefix: Option<&str>,
) -> CatalogResult<BTreeMap<String, Catalog>> {
    if !dir.exists() {
        return Err(CatalogError::DirectoryNotFound(dir.to_path_buf()));
    }

    if !dir.is_dir() {
        return Err(CatalogError::NotADirectory(dir.to_path_buf()));
    }

    let mut catalogs = BTreeMap::new();

    let entries = fs::read_dir(dir).map_err(|e| CatalogError::io(dir, e))?;
    for entry in entries {
        let path = entry.map_err(|e| CatalogError::io(dir, e))?.path();

        let Some(locale) = locale_from_filename(&path, prefix) else {
            debug!("Skipping {}", path.display());
            continue;
        };

        let catalog = load_catalog_from_file(&path)?;
        if let Some(language) = catalog.language.as_deref() {
            if !same_locale(language, &locale) {
                warn!(
                    "{} declares language '{}' but its file name says '{}'",
                    path.display(),
                    language,
                    locale
                );
            }
        }

        catalogs.insert(locale, catalog);
    }

    if catalogs.is_empty() {
        warn!("No TS files found in directory {}", dir.display());
    }

    Ok(catalogs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Context, Message, Translation};
    use std::path::PathBuf;

    fn sample(language: &str, translation: &str) -> Catalog {
        Catalog::new(language).with_context(
            Context::new("SendCoinsDialog")
                .with_message(Message::new("Send Coins", Translation::finished(translation))),
        )
    }

    #[test]
    fn test_locale_from_filename() {
        let path = PathBuf::from("locale/bitcoin_zh_CN.ts");
        assert_eq!(
            locale_from_filename(&path, Some("bitcoin")),
            Some("zh_CN".to_string())
        );
        assert_eq!(
            locale_from_filename(&path, None),
            Some("bitcoin_zh_CN".to_string())
        );
        assert_eq!(locale_from_filename(&path, Some("qt")), None);
        assert_eq!(locale_from_filename(Path::new("bitcoin_.ts"), Some("bitcoin")), None);
        assert_eq!(locale_from_filename(Path::new("bitcoin_de.qm"), Some("bitcoin")), None);
        assert_eq!(locale_from_filename(Path::new("bitcoinx_de.ts"), Some("bitcoin")), None);
    }

    #[test]
    fn test_same_locale() {
        assert!(same_locale("zh-TW", "zh_TW"));
        assert!(same_locale("zh_TW", "zh_TW"));
        assert!(same_locale("de", "de"));
        assert!(!same_locale("zh-CN", "zh"));
        assert!(!same_locale("zh_CN", "zh_TW"));
    }

    #[test]
    fn test_load_dir_bcp47_language() {
        let dir = tempfile::tempdir().unwrap();
        save_catalog_to_file(&sample("zh-TW", "付款"), &dir.path().join("bitcoin_zh_TW.ts")).unwrap();

        let catalogs = load_all_catalogs_from_dir(dir.path(), Some("bitcoin")).unwrap();
        assert_eq!(catalogs["zh_TW"].language.as_deref(), Some("zh-TW"));
        assert!(same_locale(catalogs["zh_TW"].language.as_deref().unwrap(), "zh_TW"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bitcoin_zh_TW.ts");
        let catalog = sample("zh_TW", "付款");

        save_catalog_to_file(&catalog, &path).unwrap();
        assert_eq!(load_catalog_from_file(&path).unwrap(), catalog);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_catalog_from_file(Path::new("/nonexistent/bitcoin_de.ts")).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }

    #[test]
    fn test_load_dir() {
        let dir = tempfile::tempdir().unwrap();
        save_catalog_to_file(&sample("zh_CN", "发送"), &dir.path().join("bitcoin_zh_CN.ts")).unwrap();
        save_catalog_to_file(&sample("zh_TW", "付款"), &dir.path().join("bitcoin_zh_TW.ts")).unwrap();
        fs::write(dir.path().join("README.md"), "not a catalog").unwrap();
        fs::write(dir.path().join("qt_de.ts"), "not even xml").unwrap();

        let catalogs = load_all_catalogs_from_dir(dir.path(), Some("bitcoin")).unwrap();
        let locales: Vec<&String> = catalogs.keys().collect();
        assert_eq!(locales, vec!["zh_CN", "zh_TW"]);
        assert_eq!(catalogs["zh_TW"].language.as_deref(), Some("zh_TW"));
    }

    #[test]
    fn test_load_dir_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bitcoin_de.ts"), "<html/>").unwrap();
        let err = load_all_catalogs_from_dir(dir.path(), Some("bitcoin")).unwrap_err();
        assert!(matches!(err, CatalogError::Format(_)));
    }

    #[test]
    fn test_load_dir_errors() {
        let err = load_all_catalogs_from_dir(Path::new("/nonexistent/locale"), None).unwrap_err();
        assert!(matches!(err, CatalogError::DirectoryNotFound(_)));

        let file = tempfile::NamedTempFile::new().unwrap();
        let err = load_all_catalogs_from_dir(file.path(), None).unwrap_err();
        assert!(matches!(err, CatalogError::NotADirectory(_)));
    }
}
