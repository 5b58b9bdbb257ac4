use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::{debug, warn};

use crate::error::{CatalogError, CatalogResult};
use crate::model::{
    Catalog, Context, Location, Message, Translation, TranslationStatus, TranslationText,
};

/// Parse a TS document into a [`Catalog`]
pub fn parse_catalog(xml: &str) -> CatalogResult<Catalog> {
    Parser::new(xml).parse()
}

/// Event-driven reader for the Qt Linguist TS format.
///
/// Document structure:
/// ```text
/// TS (version, language, sourcelanguage)
///   -> context
///      -> name
///      -> comment?
///      -> message (id, numerus)
///         -> location* (filename, line)
///         -> source
///         -> oldsource? comment? oldcomment? extracomment? translatorcomment?
///         -> translation (type)
///            -> numerusform*   (plural messages only)
/// ```
/// Elements outside this structure are skipped.
pub struct Parser<'a> {
    reader: Reader<&'a [u8]>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut reader = Reader::from_str(source);
        reader.trim_text(false);
        Parser { reader }
    }

    pub fn parse(&mut self) -> CatalogResult<Catalog> {
        loop {
            match self.next_event()? {
                Event::Start(e) if e.name().as_ref() == b"TS" => return self.parse_ts(&e),
                Event::Empty(e) if e.name().as_ref() == b"TS" => return self.parse_ts_attributes(&e),
                Event::Start(e) | Event::Empty(e) => {
                    return Err(CatalogError::Format(format!(
                        "expected <TS> root element, found <{}>",
                        tag_name(&e)
                    )));
                }
                Event::Eof => {
                    return Err(CatalogError::Format(
                        "missing <TS> root element".to_string(),
                    ));
                }
                // Declaration, doctype, comments, whitespace
                _ => continue,
            }
        }
    }

    fn parse_ts_attributes(&self, start: &BytesStart) -> CatalogResult<Catalog> {
        let mut catalog = Catalog::default();
        for (key, value) in self.attributes(start)? {
            match key.as_str() {
                "version" => catalog.version = Some(value),
                "language" => catalog.language = Some(value),
                "sourcelanguage" => catalog.source_language = Some(value),
                _ => debug!("Ignoring <TS> attribute '{}'", key),
            }
        }
        Ok(catalog)
    }

    fn parse_ts(&mut self, start: &BytesStart) -> CatalogResult<Catalog> {
        let mut catalog = self.parse_ts_attributes(start)?;
        loop {
            match self.next_event()? {
                Event::Start(e) if e.name().as_ref() == b"context" => {
                    catalog.contexts.push(self.parse_context()?);
                }
                Event::Empty(e) if e.name().as_ref() == b"context" => {
                    return Err(CatalogError::Format(
                        "<context> without <name>".to_string(),
                    ));
                }
                Event::Start(e) => self.skip_element(&e)?,
                Event::End(_) => return Ok(catalog),
                Event::Eof => return Err(unexpected_eof("TS")),
                _ => continue,
            }
        }
    }

    fn parse_context(&mut self) -> CatalogResult<Context> {
        let mut name = None;
        let mut context = Context::default();
        loop {
            match self.next_event()? {
                Event::Start(e) => match e.name().as_ref() {
                    b"name" => name = Some(self.read_text()?),
                    b"comment" => context.comment = Some(self.read_text()?),
                    b"message" => {
                        let message = self.parse_message(&e, name.as_deref())?;
                        context.messages.push(message);
                    }
                    _ => self.skip_element(&e)?,
                },
                Event::Empty(e) => match e.name().as_ref() {
                    b"name" => name = Some(String::new()),
                    b"comment" => context.comment = Some(String::new()),
                    b"message" => {
                        return Err(CatalogError::Format(format!(
                            "<message> without <source> in context '{}'",
                            name.as_deref().unwrap_or("")
                        )));
                    }
                    _ => debug!("Skipping empty <{}> in <context>", tag_name(&e)),
                },
                Event::End(_) => break,
                Event::Eof => return Err(unexpected_eof("context")),
                _ => continue,
            }
        }

        context.name =
            name.ok_or_else(|| CatalogError::Format("<context> without <name>".to_string()))?;
        Ok(context)
    }

    fn parse_message(
        &mut self,
        start: &BytesStart,
        context_name: Option<&str>,
    ) -> CatalogResult<Message> {
        let mut message = Message::default();
        for (key, value) in self.attributes(start)? {
            match key.as_str() {
                "id" => message.id = Some(value),
                "numerus" => message.numerus = value == "yes",
                _ => debug!("Ignoring <message> attribute '{}'", key),
            }
        }

        let mut source = None;
        let mut translation = None;
        loop {
            match self.next_event()? {
                Event::Start(e) => match e.name().as_ref() {
                    b"location" => {
                        message.locations.push(self.parse_location(&e)?);
                        self.skip_element(&e)?;
                    }
                    b"source" => source = Some(self.read_text()?),
                    b"oldsource" => message.oldsource = Some(self.read_text()?),
                    b"comment" => message.comment = Some(self.read_text()?),
                    b"oldcomment" => message.oldcomment = Some(self.read_text()?),
                    b"extracomment" => message.extracomment = Some(self.read_text()?),
                    b"translatorcomment" => message.translatorcomment = Some(self.read_text()?),
                    b"translation" => {
                        translation = Some(self.parse_translation(&e, message.numerus)?)
                    }
                    _ => self.skip_element(&e)?,
                },
                Event::Empty(e) => match e.name().as_ref() {
                    b"location" => message.locations.push(self.parse_location(&e)?),
                    b"source" => source = Some(String::new()),
                    b"oldsource" => message.oldsource = Some(String::new()),
                    b"comment" => message.comment = Some(String::new()),
                    b"oldcomment" => message.oldcomment = Some(String::new()),
                    b"extracomment" => message.extracomment = Some(String::new()),
                    b"translatorcomment" => message.translatorcomment = Some(String::new()),
                    b"translation" => {
                        let status = self.translation_status(&e)?;
                        translation = Some(Translation {
                            status,
                            text: empty_text(message.numerus),
                        });
                    }
                    _ => debug!("Skipping empty <{}> in <message>", tag_name(&e)),
                },
                Event::End(_) => break,
                Event::Eof => return Err(unexpected_eof("message")),
                _ => continue,
            }
        }

        message.source = source.ok_or_else(|| {
            CatalogError::Format(format!(
                "<message> without <source> in context '{}'",
                context_name.unwrap_or("")
            ))
        })?;
        message.translation = translation.unwrap_or_else(|| Translation {
            status: TranslationStatus::Unfinished,
            text: empty_text(message.numerus),
        });
        Ok(message)
    }

    fn parse_location(&self, start: &BytesStart) -> CatalogResult<Location> {
        let mut location = Location::default();
        for (key, value) in self.attributes(start)? {
            match key.as_str() {
                "filename" => location.filename = Some(value),
                "line" => location.line = Some(value),
                _ => debug!("Ignoring <location> attribute '{}'", key),
            }
        }
        Ok(location)
    }

    fn translation_status(&self, start: &BytesStart) -> CatalogResult<TranslationStatus> {
        let mut status = TranslationStatus::Finished;
        for (key, value) in self.attributes(start)? {
            if key == "type" {
                status = TranslationStatus::from_attribute(&value).unwrap_or_else(|| {
                    warn!("Unknown translation type '{}', treating as finished", value);
                    TranslationStatus::Finished
                });
            }
        }
        Ok(status)
    }

    fn parse_translation(&mut self, start: &BytesStart, numerus: bool) -> CatalogResult<Translation> {
        let status = self.translation_status(start)?;
        let mut text = String::new();
        let mut forms = Vec::new();
        let mut has_forms = false;

        loop {
            match self.next_event()? {
                Event::Text(t) => {
                    let decoded = t.unescape().map_err(|e| self.xml_error(e))?;
                    text.push_str(&decoded);
                }
                Event::CData(cdata) => text.push_str(&String::from_utf8_lossy(cdata.as_ref())),
                Event::Start(e) if e.name().as_ref() == b"numerusform" => {
                    forms.push(self.read_text()?);
                    has_forms = true;
                }
                Event::Empty(e) if e.name().as_ref() == b"numerusform" => {
                    forms.push(String::new());
                    has_forms = true;
                }
                Event::Empty(e) if e.name().as_ref() == b"byte" => {
                    text.push(self.byte_value(&e)?);
                }
                Event::Start(e) => self.skip_element(&e)?,
                Event::End(_) => break,
                Event::Eof => return Err(unexpected_eof("translation")),
                _ => continue,
            }
        }

        let text = if numerus || has_forms {
            TranslationText::Plural(forms)
        } else {
            TranslationText::Single(text)
        };
        Ok(Translation { status, text })
    }

    /// Collect the text content of the current element up to its end tag
    fn read_text(&mut self) -> CatalogResult<String> {
        let mut text = String::new();
        loop {
            match self.next_event()? {
                Event::Text(t) => {
                    let decoded = t.unescape().map_err(|e| self.xml_error(e))?;
                    text.push_str(&decoded);
                }
                Event::CData(cdata) => text.push_str(&String::from_utf8_lossy(cdata.as_ref())),
                Event::Empty(e) if e.name().as_ref() == b"byte" => {
                    text.push(self.byte_value(&e)?);
                }
                Event::Start(e) => self.skip_element(&e)?,
                Event::End(_) => return Ok(text),
                Event::Eof => return Err(unexpected_eof("text element")),
                _ => continue,
            }
        }
    }

    /// `<byte value="x1b"/>` encodes a control character inside text
    fn byte_value(&self, start: &BytesStart) -> CatalogResult<char> {
        let value = self
            .attributes(start)?
            .into_iter()
            .find(|(key, _)| key == "value")
            .map(|(_, value)| value)
            .ok_or_else(|| CatalogError::Format("<byte> without value".to_string()))?;

        let code = match value.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => value.parse::<u32>().ok(),
        };
        code.and_then(char::from_u32)
            .ok_or_else(|| CatalogError::Format(format!("invalid <byte> value '{}'", value)))
    }

    fn skip_element(&mut self, start: &BytesStart) -> CatalogResult<()> {
        debug!("Skipping <{}>", tag_name(start));
        let mut depth = 0usize;
        loop {
            match self.next_event()? {
                Event::Start(_) => depth += 1,
                Event::End(_) if depth == 0 => return Ok(()),
                Event::End(_) => depth -= 1,
                Event::Eof => return Err(unexpected_eof(&tag_name(start))),
                _ => continue,
            }
        }
    }

    fn attributes(&self, start: &BytesStart) -> CatalogResult<Vec<(String, String)>> {
        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(|e| self.xml_error(e))?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = attribute
                .unescape_value()
                .map_err(|e| self.xml_error(e))?
                .into_owned();
            attributes.push((key, value));
        }
        Ok(attributes)
    }

    fn next_event(&mut self) -> CatalogResult<Event<'a>> {
        match self.reader.read_event() {
            Ok(event) => Ok(event),
            Err(e) => Err(self.xml_error(e)),
        }
    }

    fn xml_error(&self, error: impl std::fmt::Display) -> CatalogError {
        CatalogError::Xml {
            position: self.reader.buffer_position(),
            message: error.to_string(),
        }
    }
}

fn tag_name(start: &BytesStart) -> String {
    String::from_utf8_lossy(start.name().as_ref()).into_owned()
}

fn empty_text(numerus: bool) -> TranslationText {
    if numerus {
        TranslationText::Plural(Vec::new())
    } else {
        TranslationText::Single(String::new())
    }
}

fn unexpected_eof(element: &str) -> CatalogError {
    CatalogError::Format(format!("unexpected end of document inside <{}>", element))
}
