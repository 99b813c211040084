use serde::{Deserialize, Serialize};

/// Which panel a tab shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageView {
    Home,
    Sources,
    Settings,
    Browser,
}

/// One entry of the tab bar. The page list is fixed at startup and its order is
/// the tab order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub view: PageView,
    pub name: &'static str,
    /// Reachable even while the backend is downloading.
    pub always_enabled: bool,
}

impl Page {
    pub const fn new(view: PageView, name: &'static str, always_enabled: bool) -> Self {
        Self {
            view,
            name,
            always_enabled,
        }
    }

    /// Case-insensitive match against a location fragment.
    pub fn matches(&self, hint: &str) -> bool {
        self.name.eq_ignore_ascii_case(hint.trim())
    }

    pub fn fragment(&self) -> String {
        self.name.to_lowercase()
    }
}

pub fn default_pages() -> Vec<Page> {
    vec![
        Page::new(PageView::Home, "Home", true),
        Page::new(PageView::Sources, "Sources", false),
        Page::new(PageView::Settings, "Settings", false),
        Page::new(PageView::Browser, "Browser", true),
    ]
}

/// Counters the backend may attach to a status response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Progress {
    #[serde(default)]
    pub total_posts: u64,
    #[serde(default)]
    pub total_urls: u64,
    #[serde(default)]
    pub failed_urls: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DownloadPhase {
    #[default]
    Idle,
    Downloading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Non-blocking message shown in the notice strip until dismissed or expired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub level: NoticeLevel,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_matches_ignores_case() {
        let page = Page::new(PageView::Sources, "Sources", false);
        assert!(page.matches("sources"));
        assert!(page.matches("SOURCES"));
        assert!(page.matches(" Sources "));
        assert!(!page.matches("source"));
        assert_eq!(page.fragment(), "sources");
    }

    #[test]
    fn test_default_pages_start_with_enabled_home() {
        let pages = default_pages();
        assert_eq!(pages.len(), 4);
        assert_eq!(pages[0].view, PageView::Home);
        assert!(pages[0].always_enabled);
        assert!(pages[3].always_enabled);
    }
}
