use std::borrow::Cow;

use quick_xml::escape::escape;

use crate::model::{Catalog, Context, Location, Message, Translation, TranslationText};

/// Serialize a catalog in the layout written by Qt's `lupdate`
pub fn write_catalog(catalog: &Catalog) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    out.push_str("<!DOCTYPE TS>\n");

    out.push_str("<TS");
    push_attribute(&mut out, "version", catalog.version.as_deref());
    push_attribute(&mut out, "language", catalog.language.as_deref());
    push_attribute(&mut out, "sourcelanguage", catalog.source_language.as_deref());
    out.push_str(">\n");

    for context in &catalog.contexts {
        write_context(&mut out, context);
    }
    out.push_str("</TS>\n");
    out
}

fn write_context(out: &mut String, context: &Context) {
    out.push_str("<context>\n");
    push_element(out, 4, "name", &context.name);
    if let Some(comment) = &context.comment {
        push_element(out, 4, "comment", comment);
    }
    for message in &context.messages {
        write_message(out, message);
    }
    out.push_str("</context>\n");
}

fn write_message(out: &mut String, message: &Message) {
    out.push_str("    <message");
    push_attribute(out, "id", message.id.as_deref());
    if message.numerus {
        push_attribute(out, "numerus", Some("yes"));
    }
    out.push_str(">\n");

    for location in &message.locations {
        write_location(out, location);
    }
    push_element(out, 8, "source", &message.source);
    let optional = [
        ("oldsource", &message.oldsource),
        ("comment", &message.comment),
        ("oldcomment", &message.oldcomment),
        ("extracomment", &message.extracomment),
        ("translatorcomment", &message.translatorcomment),
    ];
    for (tag, value) in optional {
        if let Some(value) = value {
            push_element(out, 8, tag, value);
        }
    }
    write_translation(out, &message.translation);
    out.push_str("    </message>\n");
}

fn write_location(out: &mut String, location: &Location) {
    out.push_str("        <location");
    push_attribute(out, "filename", location.filename.as_deref());
    push_attribute(out, "line", location.line.as_deref());
    out.push_str("/>\n");
}

fn write_translation(out: &mut String, translation: &Translation) {
    out.push_str("        <translation");
    push_attribute(out, "type", translation.status.as_attribute());
    out.push('>');
    match &translation.text {
        TranslationText::Single(text) => out.push_str(&escape_text(text)),
        TranslationText::Plural(forms) if forms.is_empty() => {}
        TranslationText::Plural(forms) => {
            out.push('\n');
            for form in forms {
                push_element(out, 12, "numerusform", form);
            }
            out.push_str("        ");
        }
    }
    out.push_str("</translation>\n");
}

fn push_element(out: &mut String, indent: usize, tag: &str, text: &str) {
    out.push_str(&" ".repeat(indent));
    out.push_str(&format!("<{tag}>{}</{tag}>\n", escape_text(text)));
}

fn push_attribute(out: &mut String, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        out.push_str(&format!(" {}=\"{}\"", key, escape_text(value)));
    }
}

/// Escape markup characters, and control characters as numeric references
fn escape_text(text: &str) -> Cow<'_, str> {
    let escaped = escape(text);
    if !escaped.chars().any(is_escaped_control) {
        return escaped;
    }
    let mut out = String::with_capacity(escaped.len() + 8);
    for ch in escaped.chars() {
        if is_escaped_control(ch) {
            out.push_str(&format!("&#x{:x};", ch as u32));
        } else {
            out.push(ch);
        }
    }
    Cow::Owned(out)
}

fn is_escaped_control(ch: char) -> bool {
    ch.is_control() && (ch as u32) < 0x20 && !matches!(ch, '\t' | '\n' | '\r')
}
