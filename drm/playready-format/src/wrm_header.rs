/*!
    WRM (Windows Rights Management) Header XML format.

    Found inside PlayReady Object records (type 1) within PSSH boxes.
    Encoded as UTF-16 LE XML.

    Layout understood here (version 4.0):
    - `<WRMHEADER>` root with `version` attribute
    - one or more `<DATA>` containers, each with:
      - `<PROTECTINFO>` → `<KEYLEN>` + `<ALGID>` (AESCTR, COCKTAIL)
      - `<KID>` (base64-encoded GUID, little-endian field order)
      - `<CHECKSUM>` content key checksum (not verified)
      - `<LA_URL>` license acquisition URL
      - `<LUI_URL>` license UI URL
      - `<DS_ID>` domain service ID

    Unknown elements such as `<CUSTOMATTRIBUTES>` are skipped.
*/

use drm_core::{KEY_ID_LEN, PsshError, PsshResult, kid_from_guid};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

const ROOT: &str = "WRMHEADER";
const DATA: &str = "DATA";
const PROTECTINFO: &str = "PROTECTINFO";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrmHeader {
    pub version: String,
    /**
        `<DATA>` entries in document order. Never empty.
    */
    pub data: Vec<DataEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataEntry {
    /**
        Key ID exactly as written in the header (base64, GUID byte order).
    */
    pub kid: String,
    pub checksum: Option<String>,
    pub la_url: Option<String>,
    pub lui_url: Option<String>,
    pub ds_id: Option<String>,
    pub protect_info: Vec<ProtectInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtectInfo {
    /**
        Key length in bytes, as written (e.g. `16`).
    */
    pub key_len: String,
    /**
        Algorithm ID, as written (e.g. `AESCTR`).
    */
    pub alg_id: String,
}

impl WrmHeader {
    /**
        Parse WRM header XML.

        Fails with [`PsshError::MalformedHeader`] on any XML error, a root
        other than `<WRMHEADER>`, no `<DATA>` element, or a `<DATA>` element
        without a `<KID>`.
    */
    pub fn from_xml(xml: &str) -> PsshResult<Self> {
        let mut reader = Reader::from_str(xml);
        let mut parser = HeaderParser::default();

        loop {
            match reader.read_event().map_err(|e| xml_err(&e.to_string()))? {
                Event::Start(e) => parser.start(&e)?,
                Event::Empty(e) => {
                    parser.start(&e)?;
                    parser.end()?;
                }
                Event::End(_) => parser.end()?,
                Event::Text(e) => {
                    let text = e.unescape().map_err(|e| xml_err(&e.to_string()))?;
                    parser.text(&text)?;
                }
                Event::CData(e) => {
                    let text = std::str::from_utf8(&e).map_err(|e| xml_err(&e.to_string()))?;
                    parser.text(text)?;
                }
                Event::Eof => break,
                _ => {}
            }
        }

        parser.finish()
    }

    /**
        License acquisition URL of the first entry that has one.
    */
    pub fn la_url(&self) -> Option<&str> {
        self.data.iter().find_map(|d| d.la_url.as_deref())
    }
}

impl DataEntry {
    /**
        Decode `kid` into its 16 raw bytes, still in GUID byte order.
    */
    pub fn key_id_guid(&self) -> PsshResult<[u8; 16]> {
        let bytes = data_encoding::BASE64
            .decode(self.kid.as_bytes())
            .map_err(|e| PsshError::InvalidKeyId(format!("'{}': {e}", self.kid)))?;
        <[u8; KEY_ID_LEN]>::try_from(bytes.as_slice()).map_err(|_| {
            PsshError::InvalidKeyId(format!(
                "'{}' decodes to {} bytes, expected {KEY_ID_LEN}",
                self.kid,
                bytes.len()
            ))
        })
    }

    /**
        Key ID in canonical (big-endian, `tenc`) byte order.
    */
    pub fn key_id(&self) -> PsshResult<[u8; 16]> {
        kid_from_guid(&self.key_id_guid()?)
    }
}

/**
    Event-driven builder for [`WrmHeader`].

    Tracks the open element path; leaf text is collected between a start
    tag and its matching end tag and assigned by (parent, element) name.
*/
#[derive(Default)]
struct HeaderParser {
    stack: Vec<String>,
    text: String,
    root_closed: bool,
    version: String,
    data: Vec<DataEntry>,
    entry: Option<(DataEntry, bool)>,
    protect_info: Option<ProtectInfo>,
}

impl HeaderParser {
    fn start(&mut self, e: &BytesStart<'_>) -> PsshResult<()> {
        let name = element_name(e)?;
        match (self.stack.last().map(String::as_str), name.as_str()) {
            (None, _) if self.root_closed => {
                return Err(xml_err(&format!("<{name}> after the root element")));
            }
            (None, ROOT) => {
                self.version = attribute(e, b"version")?.unwrap_or_default();
            }
            (None, other) => {
                return Err(xml_err(&format!(
                    "root element is <{other}>, expected <{ROOT}>"
                )));
            }
            (Some(ROOT), DATA) => self.entry = Some((DataEntry::default(), false)),
            (Some(DATA), PROTECTINFO) => self.protect_info = Some(ProtectInfo::default()),
            _ => {}
        }
        self.stack.push(name);
        self.text.clear();
        Ok(())
    }

    fn text(&mut self, text: &str) -> PsshResult<()> {
        if self.stack.is_empty() {
            if text.trim().is_empty() {
                return Ok(());
            }
            return Err(xml_err("text outside the root element"));
        }
        self.text.push_str(text);
        Ok(())
    }

    fn end(&mut self) -> PsshResult<()> {
        let name = self
            .stack
            .pop()
            .ok_or_else(|| xml_err("closing tag without an open element"))?;
        let text = std::mem::take(&mut self.text);
        let value = text.trim().to_owned();

        match (self.stack.last().map(String::as_str), name.as_str()) {
            (Some(PROTECTINFO), "KEYLEN") => {
                if let Some(info) = &mut self.protect_info {
                    info.key_len = value;
                }
            }
            (Some(PROTECTINFO), "ALGID") => {
                if let Some(info) = &mut self.protect_info {
                    info.alg_id = value;
                }
            }
            (Some(DATA), PROTECTINFO) => {
                if let (Some(info), Some((entry, _))) = (self.protect_info.take(), &mut self.entry) {
                    entry.protect_info.push(info);
                }
            }
            (Some(DATA), field) => {
                if let Some((entry, has_kid)) = &mut self.entry {
                    match field {
                        "KID" => {
                            entry.kid = value;
                            *has_kid = true;
                        }
                        "CHECKSUM" => entry.checksum = Some(value),
                        "LA_URL" => entry.la_url = Some(value),
                        "LUI_URL" => entry.lui_url = Some(value),
                        "DS_ID" => entry.ds_id = Some(value),
                        _ => {}
                    }
                }
            }
            (Some(ROOT), DATA) => {
                if let Some((entry, has_kid)) = self.entry.take() {
                    if !has_kid {
                        return Err(xml_err(&format!(
                            "<{DATA}> element {} has no <KID>",
                            self.data.len()
                        )));
                    }
                    self.data.push(entry);
                }
            }
            (None, _) => self.root_closed = true,
            _ => {}
        }
        Ok(())
    }

    fn finish(self) -> PsshResult<WrmHeader> {
        if let Some(open) = self.stack.last() {
            return Err(xml_err(&format!("document ends inside <{open}>")));
        }
        if !self.root_closed {
            return Err(xml_err(&format!("missing <{ROOT}> root element")));
        }
        if self.data.is_empty() {
            return Err(xml_err(&format!("<{ROOT}> has no <{DATA}> element")));
        }
        Ok(WrmHeader {
            version: self.version,
            data: self.data,
        })
    }
}

fn element_name(e: &BytesStart<'_>) -> PsshResult<String> {
    let name = e.name();
    std::str::from_utf8(local_name(name.as_ref()))
        .map(str::to_owned)
        .map_err(|e| xml_err(&e.to_string()))
}

fn attribute(e: &BytesStart<'_>, key: &[u8]) -> PsshResult<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(|e| xml_err(&e.to_string()))?;
        if local_name(attr.key.as_ref()) == key {
            let value = attr
                .unescape_value()
                .map_err(|e| xml_err(&e.to_string()))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/**
    Extract the local name from a possibly namespace-prefixed tag.
*/
fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().position(|&b| b == b':') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

fn xml_err(msg: &str) -> PsshError {
    PsshError::MalformedHeader(msg.into())
}
