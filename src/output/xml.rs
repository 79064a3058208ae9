/// Media-center library XML
///
/// ```xml
/// <library>
///   <movies year="2010">
///     <movie>
///       <title>MovieX (2010)</title>
///       <link>http://host/(2010)/MovieX/MovieX.2010.mkv</link>
///       <thumbnail>http://host/(2010)/MovieX/poster.jpg</thumbnail>
///       <fanart>http://host/(2010)/MovieX/poster.jpg</fanart>
///     </movie>
///   </movies>
/// </library>
/// ```
use crate::catalog::{Catalog, ResolvedItem};
use crate::error::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

const ROOT: &str = "library";
const YEAR_BLOCK: &str = "movies";
const ITEM: &str = "movie";

pub fn render(catalog: &Catalog) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new(ROOT)))?;

    for bucket in &catalog.buckets {
        let year = bucket.year.to_string();
        let mut start = BytesStart::new(YEAR_BLOCK);
        start.push_attribute(("year", year.as_str()));
        writer.write_event(Event::Start(start))?;

        for item in &bucket.items {
            write_item(&mut writer, item)?;
        }

        writer.write_event(Event::End(BytesEnd::new(YEAR_BLOCK)))?;
    }

    writer.write_event(Event::End(BytesEnd::new(ROOT)))?;

    let mut document = String::from_utf8(writer.into_inner())?;
    document.push('\n');
    Ok(document)
}

fn write_item<W: Write>(writer: &mut Writer<W>, item: &ResolvedItem) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(ITEM)))?;
    write_text_element(writer, "title", &item.title)?;
    write_text_element(writer, "link", item.video_url.as_str())?;
    write_text_element(writer, "thumbnail", item.thumbnail_url.as_str())?;
    write_text_element(writer, "fanart", item.thumbnail_url.as_str())?;
    writer.write_event(Event::End(BytesEnd::new(ITEM)))?;
    Ok(())
}

fn write_text_element<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}
