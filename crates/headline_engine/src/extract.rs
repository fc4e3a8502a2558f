use std::io::Cursor;

use headline_core::{collapse_whitespace, Candidate, SourceId};
use headline_logging::headline_warn;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use scraper::Html;

use crate::DecodedDocument;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("document has no feed root and no items")]
    NotAFeed,
}

pub trait TitleExtractor: Send + Sync {
    fn extract(&self, document: &DecodedDocument, source: &SourceId) -> Candidates;
}

/// Pulls item and entry titles out of RSS, RDF and Atom documents.
///
/// The document is streamed through a lenient XML reader: mismatched or
/// missing end tags close the open item instead of aborting, and an item
/// without a usable title is simply skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct FeedTitleExtractor;

impl TitleExtractor for FeedTitleExtractor {
    fn extract(&self, document: &DecodedDocument, source: &SourceId) -> Candidates {
        if document.is_empty() {
            return Candidates::empty(source.clone(), None);
        }

        let mut reader = Reader::from_reader(Cursor::new(document.text().as_bytes().to_vec()));
        let config = reader.config_mut();
        config.check_end_names = false;
        config.allow_unmatched_ends = true;

        let mut candidates = Candidates {
            reader: Some(reader),
            buf: Vec::new(),
            item: None,
            source: source.clone(),
            error: None,
        };

        // The first element decides whether this is a feed at all.
        loop {
            match candidates.read_token() {
                Some(Token::Open { tag, .. }) | Some(Token::Empty(tag)) => {
                    return match tag {
                        Tag::Root => candidates,
                        Tag::Item => {
                            candidates.item = Some(Title::Pending);
                            candidates
                        }
                        Tag::Title | Tag::Other => {
                            Candidates::empty(source.clone(), Some(ParseError::NotAFeed))
                        }
                    };
                }
                Some(_) => continue,
                None => return Candidates::empty(source.clone(), Some(ParseError::NotAFeed)),
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Root,
    Item,
    Title,
    Other,
}

impl Tag {
    fn classify(local_name: &[u8]) -> Self {
        let is = |name: &[u8]| local_name.eq_ignore_ascii_case(name);
        if is(b"item") || is(b"entry") {
            Tag::Item
        } else if is(b"title") {
            Tag::Title
        } else if is(b"rss") || is(b"feed") || is(b"rdf") || is(b"channel") {
            Tag::Root
        } else {
            Tag::Other
        }
    }
}

/// Reader events reduced to what title extraction needs, owned so the
/// read buffer can be reused.
enum Token {
    Open { tag: Tag, html: bool },
    Close(Tag),
    Empty(Tag),
    /// Text as written in the document, entity references still escaped.
    Escaped(String),
    /// CDATA content, taken as HTML source.
    Markup(String),
    Ignored,
}

/// Title state of the item currently being read.
enum Title {
    Pending,
    Reading { source: String, html: bool },
    Finished(String),
}

/// Lazy, single-pass sequence of candidates in document order.
pub struct Candidates {
    reader: Option<Reader<Cursor<Vec<u8>>>>,
    buf: Vec<u8>,
    item: Option<Title>,
    source: SourceId,
    error: Option<ParseError>,
}

impl Candidates {
    fn empty(source: SourceId, error: Option<ParseError>) -> Self {
        Self {
            reader: None,
            buf: Vec::new(),
            item: None,
            source,
            error,
        }
    }

    /// Why the document produced nothing, when it was not a feed at all.
    pub fn parse_error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    /// Next token, or `None` once the document is exhausted or unreadable.
    fn read_token(&mut self) -> Option<Token> {
        let reader = self.reader.as_mut()?;
        self.buf.clear();
        let token = match reader.read_event_into(&mut self.buf) {
            Ok(Event::Start(start)) => Token::Open {
                tag: Tag::classify(start.local_name().as_ref()),
                html: is_html_typed(&start),
            },
            Ok(Event::Empty(start)) => Token::Empty(Tag::classify(start.local_name().as_ref())),
            Ok(Event::End(end)) => Token::Close(Tag::classify(end.local_name().as_ref())),
            Ok(Event::Text(text)) => Token::Escaped(String::from_utf8_lossy(&text).into_owned()),
            Ok(Event::GeneralRef(reference)) => {
                Token::Escaped(format!("&{};", String::from_utf8_lossy(&reference)))
            }
            Ok(Event::CData(data)) => Token::Markup(String::from_utf8_lossy(&data).into_owned()),
            Ok(Event::Eof) => {
                self.reader = None;
                return None;
            }
            Ok(_) => Token::Ignored,
            Err(error) => {
                headline_warn!(
                    "{}: feed unreadable at byte {}: {}",
                    self.source,
                    reader.buffer_position(),
                    error
                );
                self.reader = None;
                return None;
            }
        };
        Some(token)
    }

    /// Closes the open item, yielding its title when it has a usable one.
    fn finish_item(&mut self) -> Option<Candidate> {
        let text = match self.item.take()? {
            Title::Pending => return None,
            Title::Reading { source, html } => clean_title(&source, html),
            Title::Finished(text) => text,
        };
        Candidate::new(text, self.source.clone())
    }

    fn finish_title(&mut self) {
        if let Some(Title::Reading { source, html }) = self.item.take() {
            self.item = Some(Title::Finished(clean_title(&source, html)));
        }
    }
}

impl Iterator for Candidates {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        loop {
            let Some(token) = self.read_token() else {
                return self.finish_item();
            };
            match token {
                Token::Open { tag: Tag::Item, .. } => {
                    let finished = self.finish_item();
                    self.item = Some(Title::Pending);
                    if finished.is_some() {
                        return finished;
                    }
                }
                Token::Empty(Tag::Item) => {
                    if let Some(candidate) = self.finish_item() {
                        return Some(candidate);
                    }
                }
                Token::Close(Tag::Item) | Token::Close(Tag::Root) => {
                    if let Some(candidate) = self.finish_item() {
                        return Some(candidate);
                    }
                }
                Token::Open { tag: Tag::Title, html } => {
                    if matches!(self.item, Some(Title::Pending)) {
                        self.item = Some(Title::Reading {
                            source: String::new(),
                            html,
                        });
                    }
                }
                Token::Empty(Tag::Title) => {
                    if matches!(self.item, Some(Title::Pending)) {
                        self.item = Some(Title::Finished(String::new()));
                    }
                }
                Token::Close(Tag::Title) => self.finish_title(),
                Token::Escaped(text) => {
                    if let Some(Title::Reading { source, html }) = &mut self.item {
                        if *html {
                            source.push_str(&html_text(&text));
                        } else {
                            source.push_str(&text);
                        }
                    }
                }
                Token::Markup(text) => {
                    if let Some(Title::Reading { source, .. }) = &mut self.item {
                        source.push_str(&text);
                    }
                }
                _ => {}
            }
        }
    }
}

/// Atom marks escaped HTML content with `type="html"`.
fn is_html_typed(start: &BytesStart<'_>) -> bool {
    start.attributes().flatten().any(|attribute| {
        attribute.key.local_name().as_ref() == b"type"
            && attribute.value.as_ref().eq_ignore_ascii_case(b"html")
    })
}

fn html_text(source: &str) -> String {
    Html::parse_fragment(source).root_element().text().collect()
}

/// `source` is HTML source: document text still carrying its escapes,
/// plus CDATA or unescaped `type="html"` content. Entities are decoded
/// exactly once and inline markup is dropped.
fn clean_title(source: &str, html: bool) -> String {
    if html || source.contains(['<', '&'].as_ref()) {
        collapse_whitespace(&html_text(source))
    } else {
        collapse_whitespace(source)
    }
}
