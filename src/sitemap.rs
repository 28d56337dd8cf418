//! News-sitemap XML parsing.
//!
//! Reads the news-sitemap protocol extension shape:
//!
//! ```text
//! <urlset>
//!   <url>
//!     <loc>https://example.com/daerah/berita-1</loc>
//!     <news:news>
//!       <news:publication_date>2024-01-05T07:30:00+07:00</news:publication_date>
//!       <news:title>Berita Satu</news:title>
//!     </news:news>
//!   </url>
//!   ...
//! </urlset>
//! ```
//!
//! The parse is permissive about entries and strict about the document:
//! a `<url>` missing its news children still yields an entry with empty
//! fields, while XML that is not well-formed fails the whole call. Output
//! preserves document order, which the batch driver relies on for
//! progress reporting.

use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::{debug, info, instrument};

use crate::error::SitemapError;
use crate::models::SitemapEntry;

/// Which child element's text we are currently inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Loc,
    PublicationDate,
    Title,
}

/// Parse a news sitemap into its entries, in document order.
///
/// Elements are matched by local name, so `news:title` and a differently
/// prefixed `n:title` read the same. `publication_date` and `title` are
/// only honored inside a `<news:news>` child, matching the schema; `loc`
/// is read directly under `<url>`.
///
/// # Errors
///
/// [`SitemapError`] when the document is not well-formed XML. Nothing
/// else fails: N `<url>` elements always produce exactly N entries.
#[instrument(level = "info", skip_all)]
pub fn parse_sitemap(xml: &str) -> Result<Vec<SitemapEntry>, SitemapError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut current: Option<SitemapEntry> = None;
    let mut field: Option<Field> = None;
    let mut in_news = false;

    loop {
        match reader.read_event()? {
            Event::Start(start) => match start.local_name().as_ref() {
                b"url" => {
                    current = Some(SitemapEntry::default());
                    in_news = false;
                    field = None;
                }
                b"loc" if current.is_some() && !in_news => field = Some(Field::Loc),
                b"news" if current.is_some() => in_news = true,
                b"publication_date" if in_news => field = Some(Field::PublicationDate),
                b"title" if in_news => field = Some(Field::Title),
                _ => field = None,
            },
            Event::Text(text) => {
                if let (Some(entry), Some(which)) = (current.as_mut(), field) {
                    let value = text
                        .unescape()
                        .map_err(quick_xml::Error::from)?
                        .into_owned();
                    match which {
                        Field::Loc => entry.loc = value,
                        Field::PublicationDate => entry.publication_date = value,
                        Field::Title => entry.title = value,
                    }
                }
            }
            Event::CData(cdata) => {
                if let (Some(entry), Some(which)) = (current.as_mut(), field) {
                    let value = String::from_utf8_lossy(&cdata).into_owned();
                    match which {
                        Field::Loc => entry.loc = value,
                        Field::PublicationDate => entry.publication_date = value,
                        Field::Title => entry.title = value,
                    }
                }
            }
            Event::End(end) => match end.local_name().as_ref() {
                b"url" => {
                    if let Some(entry) = current.take() {
                        debug!(loc = %entry.loc, title = %entry.title, "Parsed sitemap entry");
                        entries.push(entry);
                    }
                    field = None;
                }
                b"news" => {
                    in_news = false;
                    field = None;
                }
                _ => field = None,
            },
            Event::Eof => break,
            _ => {}
        }
    }

    info!(count = entries.len(), "Parsed sitemap");
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SITEMAP: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"
        xmlns:news="http://www.google.com/schemas/sitemap-news/0.9">
  <url>
    <loc>https://example.com/daerah/berita-1</loc>
    <news:news>
      <news:publication_date>2024-01-05T07:30:00+07:00</news:publication_date>
      <news:title>Berita Satu</news:title>
    </news:news>
  </url>
  <url>
    <loc>https://example.com/nasional/berita-2</loc>
    <news:news>
      <news:publication_date>2024-01-06T09:00:00+07:00</news:publication_date>
      <news:title>Berita Dua</news:title>
    </news:news>
  </url>
</urlset>"#;

    #[test]
    fn test_parses_all_entries_in_document_order() {
        let entries = parse_sitemap(SITEMAP).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].loc, "https://example.com/daerah/berita-1");
        assert_eq!(entries[0].title, "Berita Satu");
        assert_eq!(entries[0].publication_date, "2024-01-05T07:30:00+07:00");
        assert_eq!(entries[1].title, "Berita Dua");
    }

    #[test]
    fn test_missing_news_children_yield_empty_strings() {
        let xml = r#"<urlset>
  <url><loc>https://example.com/daerah/berita-1</loc></url>
  <url>
    <loc>https://example.com/daerah/berita-2</loc>
    <news:news><news:title>Hanya Judul</news:title></news:news>
  </url>
</urlset>"#;
        let entries = parse_sitemap(xml).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "");
        assert_eq!(entries[0].publication_date, "");
        assert_eq!(entries[1].title, "Hanya Judul");
        assert_eq!(entries[1].publication_date, "");
    }

    #[test]
    fn test_title_outside_news_element_is_ignored() {
        let xml = r#"<urlset>
  <url>
    <loc>https://example.com/a</loc>
    <title>bukan judul berita</title>
  </url>
</urlset>"#;
        let entries = parse_sitemap(xml).unwrap();
        assert_eq!(entries[0].title, "");
    }

    #[test]
    fn test_prefix_agnostic_matching() {
        let xml = r#"<urlset xmlns:n="http://www.google.com/schemas/sitemap-news/0.9">
  <url>
    <loc>https://example.com/a</loc>
    <n:news><n:title>Judul</n:title></n:news>
  </url>
</urlset>"#;
        let entries = parse_sitemap(xml).unwrap();
        assert_eq!(entries[0].title, "Judul");
    }

    #[test]
    fn test_entities_are_unescaped() {
        let xml = r#"<urlset>
  <url>
    <loc>https://example.com/a?x=1&amp;y=2</loc>
    <news:news><news:title>Satu &amp; Dua</news:title></news:news>
  </url>
</urlset>"#;
        let entries = parse_sitemap(xml).unwrap();
        assert_eq!(entries[0].loc, "https://example.com/a?x=1&y=2");
        assert_eq!(entries[0].title, "Satu & Dua");
    }

    #[test]
    fn test_malformed_xml_fails_the_parse() {
        assert!(parse_sitemap("<urlset><url></urlset>").is_err());
        assert!(parse_sitemap("<urlset><url><loc>x</url></urlset>").is_err());
    }

    #[test]
    fn test_empty_urlset_is_fine() {
        assert!(parse_sitemap("<urlset></urlset>").unwrap().is_empty());
    }
}
