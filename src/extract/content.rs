//! Article-region isolation and cleaning.
//!
//! The canonical content boundary is the page's first `<article>`
//! element. Inside it, whole element classes are noise on the supported
//! site: `div` (ad and photo containers), `a` (related-story links),
//! `center`, and `script` are removed with their entire subtrees.
//! What survives is serialized back to fragment markup and scrubbed of
//! plain-text boilerplate the structural pass cannot reach.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};

use crate::config::ScrapeConfig;
use crate::error::ConfigError;
use crate::models::CleanedContent;

static ARTICLE: Lazy<Selector> = Lazy::new(|| Selector::parse("article").unwrap());

/// HTML comments, including multi-line ones and `<!--img1-->` style
/// image-placeholder markers.
static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

/// Isolates and cleans the `<article>` region of a page.
///
/// Construction compiles the configured cleanup patterns once; a single
/// extractor is reused across every page of a run.
pub struct ContentExtractor {
    strip_tags: Vec<String>,
    /// See-also lead-in through the next line break, e.g.
    /// `Baca Juga: some headline<br/>`.
    see_also_line: Regex,
    /// A bold see-also label left dangling once its line is gone.
    see_also_label: Regex,
}

impl ContentExtractor {
    /// Build an extractor from the configured heuristics.
    pub fn new(config: &ScrapeConfig) -> Result<Self, ConfigError> {
        let phrase = regex::escape(config.see_also_phrase.trim());
        let see_also_line = Regex::new(&format!(r"(?i){phrase}.*?<br\s*/?>"))?;
        let see_also_label = Regex::new(&format!(r"(?i)<strong>\s*{phrase}\s*</strong>"))?;
        Ok(Self {
            strip_tags: config
                .strip_tags
                .iter()
                .map(|tag| tag.to_ascii_lowercase())
                .collect(),
            see_also_line,
            see_also_label,
        })
    }

    /// Extract the cleaned article content from a full page.
    ///
    /// Never fails: malformed markup parses permissively, and a page with
    /// no `<article>` element yields the
    /// [`NO_ARTICLE_SENTINEL`](crate::models::NO_ARTICLE_SENTINEL) marker.
    #[instrument(level = "debug", skip_all)]
    pub fn extract(&self, html: &str) -> CleanedContent {
        let mut document = Html::parse_document(html);

        let Some(article_id) = document.select(&ARTICLE).next().map(|el| el.id()) else {
            debug!("Page has no <article> element");
            return CleanedContent::no_article();
        };

        // Snapshot matching descendants before touching the tree, then
        // detach in reverse document order: children come off before
        // their ancestors and no detached node is ever dereferenced.
        let doomed: Vec<_> = document
            .tree
            .get(article_id)
            .map(|article| {
                article
                    .descendants()
                    .skip(1)
                    .filter(|node| {
                        node.value()
                            .as_element()
                            .is_some_and(|el| self.is_stripped(el.name()))
                    })
                    .map(|node| node.id())
                    .collect()
            })
            .unwrap_or_default();

        let removed = doomed.len();
        for id in doomed.into_iter().rev() {
            if let Some(mut node) = document.tree.get_mut(id) {
                node.detach();
            }
        }

        let inner = document
            .tree
            .get(article_id)
            .and_then(ElementRef::wrap)
            .map(|article| article.inner_html())
            .unwrap_or_default();

        let cleaned = self.scrub(&inner);
        debug!(
            removed_elements = removed,
            bytes = cleaned.len(),
            "Cleaned article content"
        );
        CleanedContent::new(cleaned)
    }

    fn is_stripped(&self, tag: &str) -> bool {
        self.strip_tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Textual cleanup passes, applied in a fixed order. Each pass is
    /// idempotent, so re-scrubbing already-clean markup is a no-op.
    pub fn scrub(&self, html: &str) -> String {
        let pass = self.see_also_line.replace_all(html, "");
        let pass = self.see_also_label.replace_all(&pass, "");
        COMMENT.replace_all(&pass, "").into_owned()
    }
}
