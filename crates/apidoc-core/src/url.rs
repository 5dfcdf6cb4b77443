//! Links to structure pages
//!
//! Documented structures link to their generated page. Structures of the
//! global namespace or of a configured built-in namespace link to the PHP
//! manual; anything else has no link.

use crate::util::to_kebab_case;

pub const DEFAULT_EXTERNAL_URL: &str = "https://www.php.net/manual/en/class.{name}.php";

/// Output path of a structure page: `classes/app/http-client.html`
#[must_use]
pub fn output_path(name: &str) -> String {
    let segments: Vec<String> = name
        .trim_start_matches('\\')
        .split('\\')
        .map(to_kebab_case)
        .collect();
    format!("classes/{}.html", segments.join("/"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlResolver {
    base_url: String,
    builtin_namespaces: Vec<String>,
    external_url: String,
}

impl Default for UrlResolver {
    fn default() -> Self {
        Self::new("")
    }
}

impl UrlResolver {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            builtin_namespaces: Vec::new(),
            external_url: DEFAULT_EXTERNAL_URL.to_string(),
        }
    }

    #[must_use]
    pub fn with_builtin_namespaces(mut self, namespaces: impl IntoIterator<Item = String>) -> Self {
        self.builtin_namespaces = namespaces
            .into_iter()
            .map(|ns| ns.trim_matches('\\').to_string())
            .collect();
        self
    }

    /// Template for external links; `{name}` is replaced by the link name
    #[must_use]
    pub fn with_external_url(mut self, template: impl Into<String>) -> Self {
        self.external_url = template.into();
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the structure `name` in `namespace`
    ///
    /// `documented` selects the generated page. Returns `None` when the
    /// structure has neither a page nor an external reference.
    #[must_use]
    pub fn resolve(&self, name: &str, namespace: &str, documented: bool) -> Option<String> {
        if documented {
            return Some(format!("{}{}", self.base_url, output_path(name)));
        }
        if namespace.is_empty() || self.is_builtin_namespace(namespace) {
            return Some(self.external(name));
        }
        None
    }

    fn is_builtin_namespace(&self, namespace: &str) -> bool {
        let namespace = namespace.trim_matches('\\');
        self.builtin_namespaces.iter().any(|builtin| {
            namespace.eq_ignore_ascii_case(builtin)
                || (namespace
                    .get(..builtin.len())
                    .is_some_and(|prefix| prefix.eq_ignore_ascii_case(builtin))
                    && namespace[builtin.len()..].starts_with('\\'))
        })
    }

    fn external(&self, name: &str) -> String {
        let link_name = name
            .trim_start_matches('\\')
            .to_ascii_lowercase()
            .replace('\\', "-");
        self.external_url.replace("{name}", &link_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path() {
        assert_eq!(output_path("App\\Http\\HTTPClient"), "classes/app/http/http-client.html");
        assert_eq!(output_path("\\Box"), "classes/box.html");
    }

    #[test]
    fn test_documented_structures_use_base_url() {
        let resolver = UrlResolver::new("/api/");
        assert_eq!(
            resolver.resolve("App\\Box", "App", true).as_deref(),
            Some("/api/classes/app/box.html")
        );
    }

    #[test]
    fn test_external_links() {
        let resolver = UrlResolver::default().with_builtin_namespaces(["Random".to_string()]);
        assert_eq!(
            resolver.resolve("IteratorAggregate", "", false).as_deref(),
            Some("https://www.php.net/manual/en/class.iteratoraggregate.php")
        );
        assert_eq!(
            resolver.resolve("Random\\Engine\\Mt19937", "Random\\Engine", false).as_deref(),
            Some("https://www.php.net/manual/en/class.random-engine-mt19937.php")
        );
        assert_eq!(resolver.resolve("Randomizer\\X", "Randomizer", false), None);
        assert_eq!(resolver.resolve("Vendor\\Lib", "Vendor", false), None);
    }

    #[test]
    fn test_custom_template() {
        let resolver = UrlResolver::default().with_external_url("https://docs.example/{name}");
        assert_eq!(
            resolver.resolve("ArrayObject", "", false).as_deref(),
            Some("https://docs.example/arrayobject")
        );
    }
}
