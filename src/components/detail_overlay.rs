use crate::api::search_structs::{BaseMatch, PatentMatch};
use crate::common::image_ref::resolve_display_url;
use derive_more::Constructor;

/// A result that can be shown full size in the overlay.
pub trait DetailRecord: Clone {
    /// Url of the full-resolution image to display.
    fn display_url(&self) -> String;
}

impl DetailRecord for PatentMatch {
    fn display_url(&self) -> String {
        self.pages
            .first()
            .map(|page| resolve_display_url(&page.file_path, false))
            .unwrap_or_default()
    }
}

impl DetailRecord for BaseMatch {
    fn display_url(&self) -> String {
        self.pages
            .first()
            .map(|page| page.full_image_path())
            .unwrap_or_default()
    }
}

/// Copy of a record annotated with where its image is served from.
#[derive(Debug, Clone, PartialEq, Constructor)]
pub struct DetailView<R> {
    pub record: R,
    pub display_url: String,
}

#[derive(Debug, Clone)]
pub struct DetailOverlay<R> {
    visible: bool,
    current: Option<DetailView<R>>,
}

impl<R> Default for DetailOverlay<R> {
    fn default() -> Self {
        Self {
            visible: false,
            current: None,
        }
    }
}

impl<R: DetailRecord> DetailOverlay<R> {
    pub fn open(&mut self, record: &R) -> &DetailView<R> {
        let view = DetailView::new(record.clone(), record.display_url());
        self.visible = true;
        self.current.insert(view)
    }

    pub fn close(&mut self) {
        self.visible = false;
        self.current = None;
    }

    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub const fn current(&self) -> Option<&DetailView<R>> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::search_structs::{BasePage, PatentMetadata, PatentPage};

    fn patent(file_path: &str) -> PatentMatch {
        PatentMatch {
            patent_id: "USD123456".into(),
            max_score: 0.8,
            pages: vec![PatentPage {
                id: 7,
                image_index: 0,
                file_name: "page1.TIF".into(),
                file_path: file_path.into(),
                score: 0.8,
            }],
            metadata: PatentMetadata {
                title: Some("Lamp".into()),
                ..PatentMetadata::default()
            },
        }
    }

    #[test]
    fn open_resolves_full_resolution_url() {
        let mut overlay = DetailOverlay::default();
        let view = overlay.open(&patent("http://host/design_patents/USD123456/page1.TIF"));

        assert_eq!(view.display_url, "/api/design/image/USD123456/page1.TIF");
        assert!(overlay.is_visible());
    }

    #[test]
    fn unmatched_reference_is_shown_raw() {
        let mut overlay = DetailOverlay::default();
        let view = overlay.open(&patent("s3://elsewhere/page1.TIF"));
        assert_eq!(view.display_url, "s3://elsewhere/page1.TIF");
    }

    #[test]
    fn editing_the_copy_leaves_the_source_alone() {
        let source = patent("http://host/design_patents/USD123456/page1.TIF");
        let mut overlay = DetailOverlay::default();
        overlay.open(&source);

        let mut copy = overlay.current().cloned().expect("open");
        copy.record.metadata.title = Some("Changed".into());

        assert_eq!(source.metadata.title.as_deref(), Some("Lamp"));
    }

    #[test]
    fn close_is_idempotent() {
        let mut overlay: DetailOverlay<PatentMatch> = DetailOverlay::default();
        overlay.close();
        assert!(!overlay.is_visible());

        overlay.open(&patent("x"));
        overlay.close();
        overlay.close();
        assert!(!overlay.is_visible());
        assert!(overlay.current().is_none());
    }

    #[test]
    fn base_match_uses_full_image_endpoint() {
        let record = BaseMatch {
            patent_id: "CN1".into(),
            max_score: 0.5,
            pages: vec![BasePage {
                id: 1,
                file_name: "CN1_0001.png".into(),
                page_num: "001".into(),
                score: 0.5,
                thumbnail_url: "/api/image/CN1_0001.png".into(),
            }],
        };
        assert_eq!(record.display_url(), "/api/image/full/CN1_0001.png");
    }
}
