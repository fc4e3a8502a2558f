use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use headline_logging::{headline_debug, headline_warn};

/// Above this share of U+FFFD the lossy decode is considered garbage.
const MAX_REPLACEMENT_RATIO: f64 = 0.25;

/// Only the start of the document is searched for an XML prolog.
const PROLOG_SCAN_BYTES: usize = 512;

/// Which recovery step produced the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodePath {
    /// A byte-order mark named the encoding.
    Bom,
    /// The statistical estimate decoded cleanly.
    Detected,
    /// The estimate failed; the declared label decoded cleanly.
    Declared,
    /// Nothing decoded cleanly; bad sequences were replaced with U+FFFD.
    Lossy,
    /// Even the lossy decode was mostly garbage; the document is empty.
    Undecodable,
}

impl DecodePath {
    pub fn is_fallback(self) -> bool {
        matches!(
            self,
            DecodePath::Declared | DecodePath::Lossy | DecodePath::Undecodable
        )
    }
}

/// Feed text plus the encoding that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedDocument {
    text: String,
    encoding: &'static Encoding,
    path: DecodePath,
}

impl DecodedDocument {
    fn new(text: String, encoding: &'static Encoding, path: DecodePath) -> Self {
        Self {
            text,
            encoding,
            path,
        }
    }

    fn undecodable(encoding: &'static Encoding) -> Self {
        Self::new(String::new(), encoding, DecodePath::Undecodable)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn encoding_label(&self) -> &'static str {
        self.encoding.name()
    }

    pub fn path(&self) -> DecodePath {
        self.path
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("{replaced} of {total} characters undecodable as {encoding}")]
    Undecodable {
        encoding: String,
        replaced: usize,
        total: usize,
    },
}

/// Byte-to-text recovery for one payload.
///
/// Implementors only supply the initial guess; the fallback cascade
/// (BOM, guess, declared label, lossy decode, empty document) is shared.
pub trait EncodingRecoverer: Send + Sync {
    /// Best estimate for `bytes`, given the source's top-level domain.
    fn guess(&self, bytes: &[u8], tld: Option<&str>) -> &'static Encoding;

    fn try_recover(
        &self,
        bytes: &[u8],
        declared: Option<&str>,
        tld: Option<&str>,
    ) -> Result<DecodedDocument, DecodeError> {
        if bytes.is_empty() {
            return Ok(DecodedDocument::new(String::new(), UTF_8, DecodePath::Detected));
        }

        if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
            if let Some(text) = decode_strict(&bytes[bom_len..], encoding) {
                return Ok(DecodedDocument::new(text, encoding, DecodePath::Bom));
            }
        }

        let declared_encoding =
            declared.and_then(|label| Encoding::for_label(label.trim().as_bytes()));
        let detected = self.guess(bytes, tld);
        if let Some(declared_encoding) = declared_encoding {
            if declared_encoding != detected {
                headline_debug!(
                    "Declared {} disagrees with detected {}",
                    declared_encoding.name(),
                    detected.name()
                );
            }
        }

        if let Some(text) = decode_strict(bytes, detected) {
            return Ok(DecodedDocument::new(text, detected, DecodePath::Detected));
        }

        if let Some(encoding) = declared_encoding.filter(|enc| *enc != detected) {
            if let Some(text) = decode_strict(bytes, encoding) {
                return Ok(DecodedDocument::new(text, encoding, DecodePath::Declared));
            }
        }

        decode_lossy(bytes, declared_encoding.unwrap_or(detected))
    }

    /// Never fails: an undecodable source yields an empty document.
    fn recover(&self, bytes: &[u8], declared: Option<&str>, tld: Option<&str>) -> DecodedDocument {
        match self.try_recover(bytes, declared, tld) {
            Ok(document) => {
                if document.path.is_fallback() {
                    headline_warn!(
                        "Encoding fallback {:?} to {} (declared {:?})",
                        document.path,
                        document.encoding_label(),
                        declared
                    );
                }
                document
            }
            Err(err) => {
                headline_warn!("Giving up on document: {}", err);
                DecodedDocument::undecodable(declared_or_utf8(declared))
            }
        }
    }
}

/// Guesses with `chardetng`, trusting byte statistics over the declared label.
#[derive(Debug, Default, Clone, Copy)]
pub struct ChardetRecoverer;

impl EncodingRecoverer for ChardetRecoverer {
    fn guess(&self, bytes: &[u8], tld: Option<&str>) -> &'static Encoding {
        let mut detector = EncodingDetector::new();
        detector.feed(bytes, true);
        detector.guess(tld.map(str::as_bytes), true)
    }
}

/// Decode feed bytes with [`ChardetRecoverer`].
pub fn recover(bytes: &[u8], declared: Option<&str>) -> DecodedDocument {
    ChardetRecoverer.recover(bytes, declared, None)
}

/// Like [`recover`], with the source's top-level domain as a detector hint.
pub fn recover_with_hint(bytes: &[u8], declared: Option<&str>, tld: Option<&str>) -> DecodedDocument {
    ChardetRecoverer.recover(bytes, declared, tld)
}

pub fn try_recover(
    bytes: &[u8],
    declared: Option<&str>,
    tld: Option<&str>,
) -> Result<DecodedDocument, DecodeError> {
    ChardetRecoverer.try_recover(bytes, declared, tld)
}

fn decode_lossy(bytes: &[u8], encoding: &'static Encoding) -> Result<DecodedDocument, DecodeError> {
    let (text, _) = encoding.decode_without_bom_handling(bytes);
    let total = text.chars().count();
    let replaced = text.chars().filter(|c| *c == char::REPLACEMENT_CHARACTER).count();
    if replaced as f64 > total as f64 * MAX_REPLACEMENT_RATIO {
        return Err(DecodeError::Undecodable {
            encoding: encoding.name().to_string(),
            replaced,
            total,
        });
    }
    Ok(DecodedDocument::new(text.into_owned(), encoding, DecodePath::Lossy))
}

fn decode_strict(bytes: &[u8], encoding: &'static Encoding) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
}

fn declared_or_utf8(declared: Option<&str>) -> &'static Encoding {
    declared
        .and_then(|label| Encoding::for_label(label.trim().as_bytes()))
        .unwrap_or(UTF_8)
}

/// Encoding label a response claims for itself: the `Content-Type` charset,
/// else the `encoding` attribute of the XML prolog.
pub fn declared_encoding(content_type: Option<&str>, bytes: &[u8]) -> Option<String> {
    content_type
        .and_then(charset_from_content_type)
        .or_else(|| encoding_from_prolog(bytes))
}

fn charset_from_content_type(content_type: &str) -> Option<String> {
    content_type.split(';').find_map(|part| {
        let (key, value) = part.split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        let value = value.trim().trim_matches(['"', '\''].as_ref());
        (!value.is_empty()).then(|| value.to_string())
    })
}

fn encoding_from_prolog(bytes: &[u8]) -> Option<String> {
    let head = &bytes[..bytes.len().min(PROLOG_SCAN_BYTES)];
    let head = String::from_utf8_lossy(head);
    let prolog_start = head.find("<?xml")?;
    let prolog = &head[prolog_start..];
    let prolog = &prolog[..prolog.find("?>")?];
    let after = &prolog[prolog.find("encoding")? + "encoding".len()..];
    let after = after.trim_start().strip_prefix('=')?.trim_start();
    let quote = after.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let value = &after[1..];
    let value = &value[..value.find(quote)?];
    (!value.is_empty()).then(|| value.to_string())
}

/// Top-level domain of a feed URL, in the form the encoding detector accepts.
pub fn tld_hint(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let label = parsed.host_str()?.rsplit('.').next()?;
    if label.is_empty() || !label.bytes().all(|b| b.is_ascii_alphabetic()) {
        return None;
    }
    Some(label.to_ascii_lowercase())
}
