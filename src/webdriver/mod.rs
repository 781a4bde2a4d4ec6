//! Minimal blocking W3C WebDriver client for driving Firefox through
//! geckodriver, plus the waiting and retry primitives built on top of it.

pub mod capabilities;
pub mod client;
pub mod driver;
pub mod error;
pub mod retry;
pub mod wait;

pub use client::{Element, WebDriver};
pub use error::{WebDriverError, WebDriverErrorKind};
pub use retry::Retry;
pub use wait::Wait;

/// Quote `s` as an XPath string literal.
pub fn xpath_literal(s: &str) -> String {
    if !s.contains('\'') {
        format!("'{s}'")
    } else if !s.contains('"') {
        format!("\"{s}\"")
    } else {
        let pieces: Vec<String> = s.split('\'').map(|p| format!("'{p}'")).collect();
        format!("concat({})", pieces.join(", \"'\", "))
    }
}

#[cfg(test)]
mod tests {
    use super::xpath_literal;

    #[test]
    fn literal_quoting() {
        assert_eq!(xpath_literal("Absence"), "'Absence'");
        assert_eq!(xpath_literal("Don't"), "\"Don't\"");
        assert_eq!(
            xpath_literal("a'b\"c"),
            "concat('a', \"'\", 'b\"c')"
        );
    }
}
