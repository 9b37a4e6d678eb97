//! Static pages shown in place of content.

use crate::renderer::RenderedPage;
use crate::vnode::VNode;

/// The page served for every slug that is not publicly visible. Missing and
/// unpublished pages share this output.
pub fn not_found_page() -> RenderedPage {
    static_page(
        "Page not found",
        "pc-not-found",
        "404",
        "The page you are looking for does not exist.",
    )
}

/// Fallback while the content service cannot be reached
pub fn unavailable_page() -> RenderedPage {
    static_page(
        "Temporarily unavailable",
        "pc-unavailable",
        "503",
        "This page cannot be loaded right now. Please try again shortly.",
    )
}

fn static_page(title: &str, class: &str, code: &str, message: &str) -> RenderedPage {
    let body = VNode::element("section")
        .with_attr("class", format!("pc-status-page {}", class))
        .with_child(VNode::element("p").with_attr("class", "pc-status-code").with_text(code))
        .with_child(VNode::element("h1").with_text(title))
        .with_child(VNode::element("p").with_text(message))
        .with_child(
            VNode::element("a")
                .with_attr("class", "pc-button pc-button-primary")
                .with_attr("href", "/")
                .with_text("Back to home"),
        );

    RenderedPage {
        title: title.to_string(),
        description: String::new(),
        nodes: vec![body],
        custom_css: None,
        custom_js: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_page_is_stable() {
        assert_eq!(not_found_page(), not_found_page());
        assert_eq!(not_found_page().title, "Page not found");
        assert!(not_found_page().custom_js.is_none());
    }
}
