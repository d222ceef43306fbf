//! Re-indentation of the XML documents rendered on-chain.
//!
//! `print_rss` returns the whole feed on one line. [`format`] re-serializes it
//! with one element per line and four-space indentation. Whitespace-only text
//! between elements is dropped and replaced by the indentation. An element
//! that directly holds other text or CDATA is mixed content: it starts on its
//! own line and everything inside it is written back byte-for-byte.

use quick_xml::events::Event;
use quick_xml::{Reader, Writer};
use thiserror::Error;

const INDENT_WIDTH: usize = 4;

/// Why a document could not be formatted. Formatting never returns a
/// partial document.
#[derive(Debug, Error)]
pub enum XmlError {
    /// Syntax error or mismatched end tag reported by the parser.
    #[error("XML parse error at byte {position}: {message}")]
    Parse { position: u64, message: String },
    /// Input ended with elements still open.
    #[error("unclosed element <{0}> at end of input")]
    Unclosed(String),
    #[error("document has no root element")]
    NoRoot,
    #[error("document has more than one root element")]
    MultipleRoots,
    #[error("text outside the root element")]
    TextOutsideRoot,
    #[error("failed to write XML: {0}")]
    Write(String),
}

/// Formats a well-formed XML document with stable indentation.
///
/// Idempotent: formatting an already formatted document returns it unchanged.
pub fn format(xml: &str) -> Result<String, XmlError> {
    let (events, mixed) = read_events(xml)?;
    write_events(events, &mixed)
}

fn is_blank(event: &Event<'_>) -> bool {
    matches!(event, Event::Text(t) if t.iter().all(u8::is_ascii_whitespace))
}

/// Parses and validates the whole document. `mixed[i]` is set when event `i`
/// opens an element that directly holds non-whitespace text or CDATA.
fn read_events(xml: &str) -> Result<(Vec<Event<'_>>, Vec<bool>), XmlError> {
    let mut reader = Reader::from_str(xml);
    let mut events = Vec::new();
    let mut mixed = Vec::new();
    // (name, index of the Start event)
    let mut open: Vec<(String, usize)> = Vec::new();
    let mut roots = 0usize;

    loop {
        let event = reader.read_event().map_err(|e| XmlError::Parse {
            position: reader.error_position(),
            message: e.to_string(),
        })?;

        match &event {
            Event::Start(e) => {
                if open.is_empty() {
                    roots += 1;
                    if roots > 1 {
                        return Err(XmlError::MultipleRoots);
                    }
                }
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                open.push((name, events.len()));
            }
            Event::End(_) => {
                open.pop();
            }
            Event::Empty(_) if open.is_empty() => {
                roots += 1;
                if roots > 1 {
                    return Err(XmlError::MultipleRoots);
                }
            }
            Event::Text(_) | Event::CData(_) if !is_blank(&event) => match open.last() {
                Some(&(_, start)) => mixed[start] = true,
                None => return Err(XmlError::TextOutsideRoot),
            },
            Event::Eof => break,
            _ => {}
        }

        events.push(event);
        mixed.push(false);
    }

    if let Some((name, _)) = open.pop() {
        return Err(XmlError::Unclosed(name));
    }
    if roots == 0 {
        return Err(XmlError::NoRoot);
    }
    Ok((events, mixed))
}

fn write_events(events: Vec<Event<'_>>, mixed: &[bool]) -> Result<String, XmlError> {
    let mut writer = Writer::new(Vec::new());
    let mut depth = 0usize;
    // Depth of the mixed element being copied verbatim, if any.
    let mut verbatim: Option<usize> = None;
    // The last block written was a start tag with nothing after it yet.
    let mut after_start = false;

    for (i, event) in events.into_iter().enumerate() {
        if let Some(level) = verbatim {
            match event {
                Event::Start(_) => depth += 1,
                Event::End(_) => {
                    depth -= 1;
                    if depth == level {
                        verbatim = None;
                    }
                }
                _ => {}
            }
            write(&mut writer, event)?;
            continue;
        }

        match event {
            _ if is_blank(&event) => continue,
            Event::End(_) => {
                depth -= 1;
                if !after_start {
                    newline(&mut writer, depth);
                }
                after_start = false;
            }
            Event::Start(_) => {
                newline(&mut writer, depth);
                if mixed[i] {
                    verbatim = Some(depth);
                }
                after_start = !mixed[i];
                depth += 1;
            }
            _ => {
                newline(&mut writer, depth);
                after_start = false;
            }
        }
        write(&mut writer, event)?;
    }

    String::from_utf8(writer.into_inner()).map_err(|e| XmlError::Write(e.to_string()))
}

fn newline(writer: &mut Writer<Vec<u8>>, depth: usize) {
    let out = writer.get_mut();
    if !out.is_empty() {
        out.push(b'\n');
    }
    out.resize(out.len() + depth * INDENT_WIDTH, b' ');
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), XmlError> {
    writer
        .write_event(event)
        .map_err(|e| XmlError::Write(e.to_string()))
}
