//! Media-region image extraction.
//!
//! Images are only trusted when they sit inside an element whose class
//! attribute carries the media token (default `photo__img`). Everything
//! else on the page (logos, ad creatives, tracking pixels) is ignored.
//! The class match is a substring match because the containers carry
//! multiple tokens (`photo__img photo__img--main`).

use scraper::{Html, Selector};
use tracing::{debug, instrument};

use crate::config::ScrapeConfig;
use crate::error::ConfigError;
use crate::models::ImageRef;

/// Harvests `<img>` elements from the page's media regions.
pub struct ImageExtractor {
    selector: Selector,
}

impl ImageExtractor {
    /// Build an extractor for the configured media class token.
    pub fn new(config: &ScrapeConfig) -> Result<Self, ConfigError> {
        let token = config.media_class_token.trim();
        if token.is_empty() || token.contains(['"', '\\']) {
            return Err(ConfigError::InvalidSelector(format!(
                "media class token {token:?} cannot be used in a selector"
            )));
        }
        let selector = Selector::parse(&format!(r#"[class*="{token}"] img"#))
            .map_err(|e| ConfigError::InvalidSelector(e.to_string()))?;
        Ok(Self { selector })
    }

    /// Extract normalized image references, in document order.
    ///
    /// Never fails: no media region (or no images in one) is an empty
    /// vec. Parses the whole page, not just the article subtree, since
    /// the supported site keeps its photo containers outside `<article>`.
    #[instrument(level = "debug", skip_all)]
    pub fn extract(&self, html: &str) -> Vec<ImageRef> {
        let document = Html::parse_document(html);
        let images: Vec<ImageRef> = document
            .select(&self.selector)
            .filter_map(|img| {
                let src = img.value().attr("src")?;
                Some(ImageRef {
                    url: normalize_url(src),
                    alt: img.value().attr("alt").unwrap_or_default().to_string(),
                })
            })
            .collect();
        debug!(count = images.len(), "Extracted media-region images");
        images
    }
}

/// Strip characters illegal in a URL.
///
/// Keeps printable ASCII only, which deletes whitespace (including the
/// stray spaces the source site embeds in image URLs) and control or
/// non-ASCII characters. Spaces are removed, not percent-encoded.
fn normalize_url(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_graphic).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> ImageExtractor {
        ImageExtractor::new(&ScrapeConfig::default()).unwrap()
    }

    #[test]
    fn test_only_media_region_images() {
        let html = r#"<html><body>
            <img src="https://example.com/logo.png" alt="logo">
            <div class="photo__img">
                <img src="https://example.com/a.jpg" alt="Foto A">
            </div>
            <div class="sidebar"><img src="https://example.com/ad.gif"></div>
        </body></html>"#;
        let images = extractor().extract(html);
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].url, "https://example.com/a.jpg");
        assert_eq!(images[0].alt, "Foto A");
    }

    #[test]
    fn test_class_token_substring_match() {
        let html = r#"
            <div class="photo__img photo__img--main">
                <img src="https://example.com/a.jpg">
            </div>
            <figure class="content photo__img--wide">
                <img src="https://example.com/b.jpg">
            </figure>"#;
        let images = extractor().extract(html);
        assert_eq!(images.len(), 2);
    }

    #[test]
    fn test_nested_images_in_document_order() {
        let html = r#"<div class="photo__img">
            <figure><img src="https://example.com/1.jpg"></figure>
            <div class="inner"><img src="https://example.com/2.jpg"></div>
            <img src="https://example.com/3.jpg">
        </div>"#;
        let urls: Vec<_> = extractor().extract(html).into_iter().map(|i| i.url).collect();
        assert_eq!(
            urls,
            vec![
                "https://example.com/1.jpg",
                "https://example.com/2.jpg",
                "https://example.com/3.jpg"
            ]
        );
    }

    #[test]
    fn test_url_whitespace_is_deleted_not_encoded() {
        let html = r#"<div class="photo__img">
            <img src="https://example.com/foto satu .jpg" alt="spasi">
        </div>"#;
        let images = extractor().extract(html);
        assert_eq!(images[0].url, "https://example.com/fotosatu.jpg");
        assert!(!images[0].url.contains("%20"));
    }

    #[test]
    fn test_missing_alt_defaults_to_empty() {
        let html = r#"<div class="photo__img"><img src="https://example.com/a.jpg"></div>"#;
        let images = extractor().extract(html);
        assert_eq!(images[0].alt, "");
    }

    #[test]
    fn test_srcless_images_are_skipped() {
        let html = r#"<div class="photo__img"><img alt="tanpa sumber"></div>"#;
        assert!(extractor().extract(html).is_empty());
    }

    #[test]
    fn test_no_media_region_is_empty() {
        assert!(extractor().extract("<html><body><img src='x.jpg'></body></html>").is_empty());
        assert!(extractor().extract("").is_empty());
    }

    #[test]
    fn test_rejects_unusable_token() {
        let config = ScrapeConfig {
            media_class_token: "a\"b".to_string(),
            ..ScrapeConfig::default()
        };
        assert!(ImageExtractor::new(&config).is_err());
    }

    #[test]
    fn test_normalize_strips_newlines_and_nonascii() {
        assert_eq!(
            normalize_url("https://example.com/\na b\tc\u{00e9}.jpg"),
            "https://example.com/abc.jpg"
        );
    }
}
