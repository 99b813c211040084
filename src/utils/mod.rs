use std::fmt;

use url::Url;

use crate::domain::AppError;

/// Address the shell is mounted at. The fragment names the active tab, the
/// rest of the URL is where the backend listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    url: Url,
}

impl Location {
    pub fn parse(input: &str) -> Result<Self, AppError> {
        let url = Url::parse(input.trim())
            .map_err(|e| AppError::InvalidLocation(format!("{}: {}", input, e)))?;

        if url.cannot_be_a_base() {
            return Err(AppError::InvalidLocation(format!(
                "{}: not a hierarchical URL",
                input
            )));
        }

        Ok(Self { url })
    }

    /// Page name hint taken from the fragment, if any.
    pub fn page_hint(&self) -> Option<&str> {
        self.url
            .fragment()
            .map(|f| f.trim_start_matches('/').trim())
            .filter(|f| !f.is_empty())
    }

    pub fn set_page(&mut self, name: &str) {
        self.url.set_fragment(Some(&name.to_lowercase()));
    }

    /// Base URL for backend requests, without query or fragment.
    pub fn backend_base(&self) -> Url {
        let mut base = self.url.clone();
        base.set_fragment(None);
        base.set_query(None);
        base
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}
