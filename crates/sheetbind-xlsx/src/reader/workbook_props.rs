//! Workbook properties from `xl/workbook.xml`

use std::io::{BufReader, Read, Seek};

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};

/// Whether the workbook uses the 1904 date system
///
/// Reads the `date1904` attribute of `<workbookPr>`; absent means 1900.
pub(crate) fn read_date1904<R: Read + Seek>(reader: R) -> XlsxResult<bool> {
    let mut archive = zip::ZipArchive::new(reader)?;
    let file = archive
        .by_name("xl/workbook.xml")
        .map_err(|_| XlsxError::MissingPart("xl/workbook.xml".into()))?;

    let mut xml_reader = Reader::from_reader(BufReader::new(file));
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e)) | Ok(Event::Start(e))
                if e.local_name().as_ref() == b"workbookPr" =>
            {
                for attr in e.attributes().flatten() {
                    if attr.key.local_name().as_ref() == b"date1904" {
                        let value = attr.unescape_value()?;
                        return Ok(matches!(value.as_ref(), "1" | "true"));
                    }
                }
                return Ok(false);
            }
            // workbookPr always precedes the sheet list
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"sheets" => return Ok(false),
            Ok(Event::Eof) => return Ok(false),
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }
}
