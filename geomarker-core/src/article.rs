/// One entry of the paged article listing, before enrichment.
///
/// # Examples
/// ```
/// use geomarker_core::Article;
///
/// let article = Article::new(7, "London");
/// assert_eq!(article.page_id, 7);
/// assert_eq!(article.title, "London");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Article {
    /// Page identifier assigned by the wiki.
    pub page_id: u64,
    /// Display title, also used to address the coordinate lookup.
    pub title: String,
}

impl Article {
    /// Construct an article from its page id and title.
    pub fn new(page_id: u64, title: impl Into<String>) -> Self {
        Self {
            page_id,
            title: title.into(),
        }
    }
}
