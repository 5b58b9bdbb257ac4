use serde::{Deserialize, Serialize};

/// Completion status of a translation, taken from the `type` attribute of
/// `<translation>`. A missing attribute means the translation is finished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationStatus {
    #[default]
    Finished,
    Unfinished,
    Obsolete,
    Vanished,
}

impl TranslationStatus {
    /// Value of the `type` attribute, `None` for finished translations
    pub fn as_attribute(&self) -> Option<&'static str> {
        match self {
            TranslationStatus::Finished => None,
            TranslationStatus::Unfinished => Some("unfinished"),
            TranslationStatus::Obsolete => Some("obsolete"),
            TranslationStatus::Vanished => Some("vanished"),
        }
    }

    pub fn from_attribute(value: &str) -> Option<Self> {
        match value {
            "unfinished" => Some(TranslationStatus::Unfinished),
            "obsolete" => Some(TranslationStatus::Obsolete),
            "vanished" => Some(TranslationStatus::Vanished),
            _ => None,
        }
    }

    /// Obsolete and vanished messages are kept for translators only
    pub fn is_live(&self) -> bool {
        matches!(
            self,
            TranslationStatus::Finished | TranslationStatus::Unfinished
        )
    }
}

/// Translated text: a single string, or one string per numerus form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationText {
    Single(String),
    Plural(Vec<String>),
}

impl Default for TranslationText {
    fn default() -> Self {
        TranslationText::Single(String::new())
    }
}

impl TranslationText {
    pub fn forms(&self) -> &[String] {
        match self {
            TranslationText::Single(text) => std::slice::from_ref(text),
            TranslationText::Plural(forms) => forms,
        }
    }

    pub fn is_plural(&self) -> bool {
        matches!(self, TranslationText::Plural(_))
    }

    /// True when no form carries any text
    pub fn is_empty(&self) -> bool {
        self.forms().iter().all(|form| form.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub status: TranslationStatus,
    pub text: TranslationText,
}

impl Translation {
    pub fn finished(text: &str) -> Self {
        Translation {
            status: TranslationStatus::Finished,
            text: TranslationText::Single(text.to_string()),
        }
    }

    pub fn unfinished(text: &str) -> Self {
        Translation {
            status: TranslationStatus::Unfinished,
            text: TranslationText::Single(text.to_string()),
        }
    }

    pub fn plural(status: TranslationStatus, forms: Vec<String>) -> Self {
        Translation {
            status,
            text: TranslationText::Plural(forms),
        }
    }
}

/// Where a message was extracted from.
///
/// Both fields are kept exactly as written. `line` may be absolute (`"42"`)
/// or relative to the previous location (`"+3"`, `"-7"`), and a missing
/// `filename` means "same file as the previous location".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub filename: Option<String>,
    pub line: Option<String>,
}

/// Parsed form of [`Location::line`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRef {
    Absolute(u32),
    Relative(i32),
}

impl Location {
    pub fn line_ref(&self) -> Option<LineRef> {
        let line = self.line.as_deref()?.trim();
        if line.starts_with('+') || line.starts_with('-') {
            line.parse::<i32>().ok().map(LineRef::Relative)
        } else {
            line.parse::<u32>().ok().map(LineRef::Absolute)
        }
    }
}

/// One translatable unit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Option<String>,
    pub numerus: bool,
    pub locations: Vec<Location>,
    pub source: String,
    pub oldsource: Option<String>,
    /// Disambiguation comment; part of the lookup key
    pub comment: Option<String>,
    pub oldcomment: Option<String>,
    pub extracomment: Option<String>,
    pub translatorcomment: Option<String>,
    pub translation: Translation,
}

impl Message {
    pub fn new(source: &str, translation: Translation) -> Self {
        Message {
            numerus: translation.text.is_plural(),
            source: source.to_string(),
            translation,
            ..Default::default()
        }
    }

    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_string());
        self
    }

    pub fn with_location(mut self, filename: Option<&str>, line: Option<&str>) -> Self {
        self.locations.push(Location {
            filename: filename.map(str::to_string),
            line: line.map(str::to_string),
        });
        self
    }

    /// Disambiguation comment, empty when absent
    pub fn comment_key(&self) -> &str {
        self.comment.as_deref().unwrap_or("")
    }

    pub fn status(&self) -> TranslationStatus {
        self.translation.status
    }

    pub fn is_live(&self) -> bool {
        self.translation.status.is_live()
    }
}

/// A named group of messages, usually one UI component or dialog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    pub name: String,
    pub comment: Option<String>,
    pub messages: Vec<Message>,
}

impl Context {
    pub fn new(name: &str) -> Self {
        Context {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Live message for the given source and disambiguation comment
    pub fn find(&self, source: &str, comment: &str) -> Option<&Message> {
        self.messages
            .iter()
            .find(|m| m.is_live() && m.source == source && m.comment_key() == comment)
    }
}

impl<'a> IntoIterator for &'a Context {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

/// The translated strings of one `.ts` file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub version: Option<String>,
    /// Target locale in Qt notation, e.g. `zh_CN`
    pub language: Option<String>,
    pub source_language: Option<String>,
    pub contexts: Vec<Context>,
}

impl Catalog {
    pub fn new(language: &str) -> Self {
        Catalog {
            version: Some("2.1".to_string()),
            language: Some(language.to_string()),
            ..Default::default()
        }
    }

    pub fn with_context(mut self, context: Context) -> Self {
        self.contexts.push(context);
        self
    }

    /// First context with the given name
    pub fn context(&self, name: &str) -> Option<&Context> {
        self.contexts.iter().find(|c| c.name == name)
    }

    /// All messages paired with the name of their context
    pub fn messages(&self) -> impl Iterator<Item = (&str, &Message)> {
        self.contexts
            .iter()
            .flat_map(|c| c.messages.iter().map(move |m| (c.name.as_str(), m)))
    }

    pub fn len(&self) -> usize {
        self.contexts.iter().map(|c| c.messages.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serialize as JSON, for dumping and diffing
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Context;
    type IntoIter = std::slice::Iter<'a, Context>;

    fn into_iter(self) -> Self::IntoIter {
        self.contexts.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_ref() {
        let absolute = Location {
            filename: Some("../sendcoinsdialog.cpp".to_string()),
            line: Some("142".to_string()),
        };
        assert_eq!(absolute.line_ref(), Some(LineRef::Absolute(142)));

        let forward = Location {
            filename: None,
            line: Some("+3".to_string()),
        };
        assert_eq!(forward.line_ref(), Some(LineRef::Relative(3)));

        let backward = Location {
            filename: None,
            line: Some("-17".to_string()),
        };
        assert_eq!(backward.line_ref(), Some(LineRef::Relative(-17)));

        assert_eq!(Location::default().line_ref(), None);
    }

    #[test]
    fn test_status_attribute() {
        assert_eq!(TranslationStatus::Finished.as_attribute(), None);
        assert_eq!(
            TranslationStatus::from_attribute("unfinished"),
            Some(TranslationStatus::Unfinished)
        );
        assert_eq!(TranslationStatus::from_attribute("done"), None);
        assert!(!TranslationStatus::Vanished.is_live());
        assert!(TranslationStatus::Unfinished.is_live());
    }

    #[test]
    fn test_context_find_skips_obsolete() {
        let mut stale = Message::new("Amount", Translation::finished("旧"));
        stale.translation.status = TranslationStatus::Obsolete;
        let context = Context::new("BitcoinUnits")
            .with_message(stale)
            .with_message(Message::new("Amount", Translation::finished("金额")));

        let found = context.find("Amount", "").map(|m| m.translation.text.forms()[0].as_str());
        assert_eq!(found, Some("金额"));
        assert!(context.find("Amount", "unit").is_none());
    }

    #[test]
    fn test_catalog_messages() {
        let catalog = Catalog::new("zh_CN")
            .with_context(
                Context::new("AddressBookPage")
                    .with_message(Message::new("&Copy", Translation::finished("复制(&C)"))),
            )
            .with_context(Context::new("BitcoinGUI").with_message(Message::new(
                "%n active connection(s) to Bitcoin network",
                Translation::plural(
                    TranslationStatus::Finished,
                    vec!["%n 个到比特币网络的活动连接".to_string()],
                ),
            )));

        assert_eq!(catalog.len(), 2);
        let names: Vec<&str> = catalog.messages().map(|(ctx, _)| ctx).collect();
        assert_eq!(names, vec!["AddressBookPage", "BitcoinGUI"]);
        assert!(catalog.context("BitcoinGUI").is_some_and(|c| c.messages[0].numerus));
    }

    #[test]
    fn test_json_dump() {
        let catalog = Catalog::new("zh_TW").with_context(
            Context::new("QObject").with_message(Message::new("Amount", Translation::unfinished(""))),
        );
        let json = catalog.to_json().unwrap();
        assert!(json.contains("\"language\": \"zh_TW\""));
        assert!(json.contains("\"status\": \"unfinished\""));

        let back: Catalog = serde_json::from_str(&json).unwrap();
        assert_eq!(back, catalog);
    }
}
