use derive_more::Constructor;
use regex::Regex;
use std::sync::LazyLock;

/// Object-store prefix the design-patent images live under.
pub const DESIGN_PATENT_PREFIX: &str = "design_patents";

static DESIGN_REF_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"design_patents/([^/?#]+)/([^/?#]+)").expect("valid design reference pattern")
});

/// `(patent_id, file_name)` pair extracted from a storage reference.
#[derive(Debug, Clone, PartialEq, Eq, Constructor)]
pub struct DesignImageRef {
    pub patent_id: String,
    pub file_name: String,
}

impl DesignImageRef {
    /// Proxy path through the search service, e.g.
    /// `/api/design/image/USD123456/page1.TIF?thumbnail=true`.
    #[must_use]
    pub fn proxy_path(&self, thumbnail: bool) -> String {
        design_image_path(&self.patent_id, &self.file_name, thumbnail)
    }
}

#[must_use]
pub fn design_image_path(patent_id: &str, file_name: &str, thumbnail: bool) -> String {
    let path = format!("/api/design/image/{patent_id}/{file_name}");
    if thumbnail {
        format!("{path}?thumbnail=true")
    } else {
        path
    }
}

/// Find the `design_patents/<id>/<file>` segment in a storage reference
/// (an object-store url or key).
#[must_use]
pub fn parse_design_ref(reference: &str) -> Option<DesignImageRef> {
    DESIGN_REF_PATTERN.captures(reference).map(|caps| {
        DesignImageRef::new(caps[1].to_string(), caps[2].to_string())
    })
}

/// Displayable url for a storage reference. References that don't match the
/// known layout are returned verbatim.
#[must_use]
pub fn resolve_display_url(reference: &str, thumbnail: bool) -> String {
    parse_design_ref(reference).map_or_else(
        || reference.to_string(),
        |image_ref| image_ref.proxy_path(thumbnail),
    )
}
