//! Small helpers shared by the page scrapers

use scraper::ElementRef;

/// Normalize link/heading text for matching: trim, lowercase, and collapse
/// each whitespace run into a single hyphen. "Accessibility  Statement",
/// "accessibility statement" and "ACCESSIBILITY-STATEMENT" all normalize to
/// "accessibility-statement".
pub fn normalize_label(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Concatenated text content of an element's descendants
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

/// The next sibling in document order that is an element, skipping text and
/// comment nodes. None when the element closes out its parent.
pub fn element_after<'a>(element: ElementRef<'a>) -> Option<ElementRef<'a>> {
    element.next_siblings().find_map(ElementRef::wrap)
}
