use ts_catalog::{LanguageSettings, system_locale};

/// Environment variable holding the stored UI language setting
pub const STORED_LANGUAGE_ENV: &str = "TSCAT_LANGUAGE";

/// Collect the language candidates from the command line and the environment
pub fn language_settings(command_line: Option<&str>) -> LanguageSettings {
    language_settings_from(command_line, |key| std::env::var(key).ok())
}

pub(crate) fn language_settings_from<F>(command_line: Option<&str>, lookup: F) -> LanguageSettings
where
    F: Fn(&str) -> Option<String>,
{
    LanguageSettings {
        command_line: command_line.map(str::to_string),
        stored: lookup(STORED_LANGUAGE_ENV),
        system: system_locale(&lookup),
    }
}
