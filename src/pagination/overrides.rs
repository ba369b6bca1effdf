//! Resolved header/footer content per page

use crate::document::{Document, PageSelector, RegionKind};
use crate::pagination::options::{HeaderFooterContent, PaginationOptions};
use std::collections::BTreeMap;

/// Content for one region together with where it came from
#[derive(Debug, Clone, Copy)]
pub struct ResolvedContent<'a> {
    pub content: &'a HeaderFooterContent,
    /// True when a page-specific override supplied the content
    pub from_override: bool,
}

/// Options and document overrides merged into one lookup.
///
/// Document entries take precedence over option-level custom content, and an
/// `AllPages` document entry replaces the option default. When the document
/// holds two entries for the same key the earlier one is used.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OverrideSet {
    common_header: HeaderFooterContent,
    common_footer: HeaderFooterContent,
    headers: BTreeMap<u32, HeaderFooterContent>,
    footers: BTreeMap<u32, HeaderFooterContent>,
}

impl OverrideSet {
    pub fn resolve(options: &PaginationOptions, document: &Document) -> Self {
        let mut common_header = None;
        let mut common_footer = None;
        let mut headers = BTreeMap::new();
        let mut footers = BTreeMap::new();

        for entry in document.override_entries() {
            let content = HeaderFooterContent::from_entry(entry);
            match (entry.position(), entry.page_number()) {
                (RegionKind::Header, PageSelector::AllPages) => {
                    common_header.get_or_insert(content);
                }
                (RegionKind::Footer, PageSelector::AllPages) => {
                    common_footer.get_or_insert(content);
                }
                (RegionKind::Header, PageSelector::Page(page)) => {
                    headers.entry(page).or_insert(content);
                }
                (RegionKind::Footer, PageSelector::Page(page)) => {
                    footers.entry(page).or_insert(content);
                }
            }
        }

        for (page, content) in &options.custom_header {
            headers.entry(*page).or_insert_with(|| content.clone());
        }
        for (page, content) in &options.custom_footer {
            footers.entry(*page).or_insert_with(|| content.clone());
        }

        Self {
            common_header: common_header.unwrap_or_else(|| options.header.clone()),
            common_footer: common_footer.unwrap_or_else(|| options.footer.clone()),
            headers,
            footers,
        }
    }

    fn pages(&self, kind: RegionKind) -> &BTreeMap<u32, HeaderFooterContent> {
        match kind {
            RegionKind::Header => &self.headers,
            RegionKind::Footer => &self.footers,
        }
    }

    /// Content used on pages without a page-specific override
    pub fn common(&self, kind: RegionKind) -> &HeaderFooterContent {
        match kind {
            RegionKind::Header => &self.common_header,
            RegionKind::Footer => &self.common_footer,
        }
    }

    pub fn page_override(&self, kind: RegionKind, page: u32) -> Option<&HeaderFooterContent> {
        self.pages(kind).get(&page)
    }

    pub fn has_override(&self, kind: RegionKind, page: u32) -> bool {
        self.pages(kind).contains_key(&page)
    }

    /// Override if present, common content otherwise
    pub fn content_for(&self, kind: RegionKind, page: u32) -> ResolvedContent<'_> {
        match self.page_override(kind, page) {
            Some(content) => ResolvedContent {
                content,
                from_override: true,
            },
            None => ResolvedContent {
                content: self.common(kind),
                from_override: false,
            },
        }
    }

    /// Pages carrying an override, ascending
    pub fn override_pages(&self, kind: RegionKind) -> impl Iterator<Item = u32> + '_ {
        self.pages(kind).keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Block, Node, OverrideEntry};

    fn entry(kind: RegionKind, page: PageSelector, right: &str) -> Node {
        Node::Entry(OverrideEntry::new(
            kind,
            page,
            vec![Block::empty()],
            vec![Block::paragraph(right)],
        ))
    }

    fn doc_with(entries: Vec<Node>) -> Document {
        Document::from_nodes(vec![
            Node::Container { children: entries },
            Node::Leaf(Block::paragraph("body")),
        ])
    }

    #[test]
    fn test_defaults_without_entries() {
        let set = OverrideSet::resolve(&PaginationOptions::default(), &Document::new());
        let footer = set.content_for(RegionKind::Footer, 3);
        assert!(!footer.from_override);
        assert_eq!(footer.content.right, vec![Block::paragraph("{page}")]);
    }

    #[test]
    fn test_all_pages_entry_replaces_default() {
        let doc = doc_with(vec![entry(RegionKind::Footer, PageSelector::AllPages, "shared")]);
        let set = OverrideSet::resolve(&PaginationOptions::default(), &doc);
        assert_eq!(set.common(RegionKind::Footer).right, vec![Block::paragraph("shared")]);
        assert!(!set.content_for(RegionKind::Footer, 1).from_override);
    }

    #[test]
    fn test_document_wins_over_options() {
        let mut options = PaginationOptions::default();
        options.custom_header.insert(
            2,
            HeaderFooterContent::from_fragments("", "from options").unwrap(),
        );
        options.custom_header.insert(
            4,
            HeaderFooterContent::from_fragments("", "only options").unwrap(),
        );
        let doc = doc_with(vec![entry(RegionKind::Header, PageSelector::Page(2), "from doc")]);
        let set = OverrideSet::resolve(&options, &doc);

        let page2 = set.content_for(RegionKind::Header, 2);
        assert!(page2.from_override);
        assert_eq!(page2.content.right, vec![Block::paragraph("from doc")]);
        assert_eq!(set.override_pages(RegionKind::Header).collect::<Vec<_>>(), vec![2, 4]);
    }

    #[test]
    fn test_first_duplicate_wins() {
        let doc = doc_with(vec![
            entry(RegionKind::Footer, PageSelector::Page(1), "first"),
            entry(RegionKind::Footer, PageSelector::Page(1), "second"),
        ]);
        let set = OverrideSet::resolve(&PaginationOptions::default(), &doc);
        assert_eq!(
            set.page_override(RegionKind::Footer, 1).map(|c| c.right.clone()),
            Some(vec![Block::paragraph("first")])
        );
    }
}
