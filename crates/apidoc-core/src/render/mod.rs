//! Page rendering

mod html;
mod markdown;

pub use html::HtmlRenderer;

use thiserror::Error;

use crate::resolver::ResolveError;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("failed to format page: {0}")]
    Format(#[from] std::fmt::Error),
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Path from a page back to the output root, e.g. `../../` for
/// `classes/app/box.html`
#[must_use]
pub fn relative_root(page: &str) -> String {
    "../".repeat(page.matches('/').count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_root() {
        assert_eq!(relative_root("index.html"), "");
        assert_eq!(relative_root("classes/box.html"), "../");
        assert_eq!(relative_root("classes/app/http/client.html"), "../../../");
    }
}
