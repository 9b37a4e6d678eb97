use serde::{Deserialize, Serialize};

/// Raw HTML, CSS or script authored in the CMS.
///
/// Content of this type is never escaped by the renderer. It deliberately has
/// no `Display` or `Deref<Target = str>`: reading it requires
/// `as_unescaped_str`, so every call site that emits it into a page makes an
/// explicit choice to sanitize, sandbox or pass it through verbatim.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UntrustedMarkup(String);

impl UntrustedMarkup {
    pub fn new(markup: impl Into<String>) -> Self {
        Self(markup.into())
    }

    /// The raw, unescaped markup
    pub fn as_unescaped_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl std::fmt::Debug for UntrustedMarkup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("UntrustedMarkup")
            .field(&format!("{} bytes", self.0.len()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transparent_serde() {
        let markup = UntrustedMarkup::new("<script>track()</script>");
        let json = serde_json::to_string(&markup).unwrap();
        assert_eq!(json, "\"<script>track()</script>\"");

        let back: UntrustedMarkup = serde_json::from_str(&json).unwrap();
        assert_eq!(back.as_unescaped_str(), "<script>track()</script>");
    }

    #[test]
    fn test_debug_does_not_leak_content() {
        let markup = UntrustedMarkup::new("<b>secret</b>");
        assert_eq!(format!("{:?}", markup), "UntrustedMarkup(\"13 bytes\")");
    }
}
