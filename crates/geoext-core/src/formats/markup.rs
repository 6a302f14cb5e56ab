//! Small element builder over `quick_xml::Writer` shared by the XML writers.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::{GeoextError, Result};

fn xml_error(err: impl std::fmt::Display) -> GeoextError {
    GeoextError::Io(std::io::Error::other(err.to_string()))
}

pub(crate) struct Markup {
    writer: Writer<Vec<u8>>,
}

impl Markup {
    pub(crate) fn new() -> Self {
        Self { writer: Writer::new(Vec::new()) }
    }

    pub(crate) fn start(&mut self, name: &str, id: Option<&str>) -> Result<()> {
        let mut start = BytesStart::new(name);
        if let Some(id) = id {
            start.push_attribute(("id", id));
        }
        self.writer.write_event(Event::Start(start)).map_err(xml_error)
    }

    pub(crate) fn end(&mut self, name: &str) -> Result<()> {
        self.writer.write_event(Event::End(BytesEnd::new(name))).map_err(xml_error)
    }

    /// `<name>text</name>`, with the text escaped
    pub(crate) fn element(&mut self, name: &str, text: &str) -> Result<()> {
        self.start(name, None)?;
        self.writer.write_event(Event::Text(BytesText::new(text))).map_err(xml_error)?;
        self.end(name)
    }

    pub(crate) fn finish(self) -> Result<String> {
        String::from_utf8(self.writer.into_inner()).map_err(xml_error)
    }
}
