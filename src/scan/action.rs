// SPDX-License-Identifier: MPL-2.0

//! Payload classification
//!
//! A scanned payload is classified once, right after decode, so the UI and
//! the CLI can present the matching action without re-parsing.

/// Action derived from scanned payload content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadAction {
    /// URL that can be opened in a browser
    Url(String),
    /// Phone number (tel: URI)
    Phone(String),
    /// Email address (mailto: URI)
    Email(String),
    /// Plain text with no recognized structure
    Text(String),
}

impl PayloadAction {
    /// Parse payload content into an action
    ///
    /// Falls back to `Text` for unrecognized formats.
    pub fn parse(content: &str) -> Self {
        let trimmed = content.trim();

        // Check for URL schemes
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            return Self::Url(trimmed.to_string());
        }

        // Check for tel: URI
        if let Some(number) = trimmed.strip_prefix("tel:") {
            return Self::Phone(number.to_string());
        }

        // Check for mailto: URI, dropping any query parameters
        if let Some(rest) = trimmed.strip_prefix("mailto:") {
            let (address, _params) = rest.split_once('?').unwrap_or((rest, ""));
            return Self::Email(address.to_string());
        }

        // Check if it looks like a URL without scheme
        if trimmed.contains('.') && !trimmed.contains(' ') && trimmed.len() < 256 {
            // Could be a domain name - treat as URL
            if trimmed.contains("www.")
                || trimmed.ends_with(".com")
                || trimmed.ends_with(".org")
                || trimmed.ends_with(".net")
                || trimmed.ends_with(".io")
            {
                return Self::Url(format!("https://{}", trimmed));
            }
        }

        // Default to plain text
        Self::Text(trimmed.to_string())
    }

    /// Get the primary action label for this payload type
    pub fn action_label(&self) -> &'static str {
        match self {
            Self::Url(_) => "Open Link",
            Self::Phone(_) => "Call",
            Self::Email(_) => "Send Email",
            Self::Text(_) => "Copy Text",
        }
    }

    /// Short kind name for machine-readable output
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Url(_) => "url",
            Self::Phone(_) => "phone",
            Self::Email(_) => "email",
            Self::Text(_) => "text",
        }
    }

    /// URI handed to the system opener, when the action has one
    pub fn open_uri(&self) -> Option<String> {
        match self {
            Self::Url(url) => Some(url.clone()),
            Self::Phone(number) => Some(format!("tel:{}", number)),
            Self::Email(address) => Some(format!("mailto:{}", address)),
            Self::Text(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_url() {
        assert!(matches!(
            PayloadAction::parse("https://example.com"),
            PayloadAction::Url(_)
        ));
        assert!(matches!(
            PayloadAction::parse("http://example.com/path"),
            PayloadAction::Url(_)
        ));
    }

    #[test]
    fn test_parse_bare_domain_as_url() {
        let action = PayloadAction::parse("www.example.com");
        match action {
            PayloadAction::Url(url) => assert_eq!(url, "https://www.example.com"),
            _ => panic!("Expected Url action"),
        }
    }

    #[test]
    fn test_parse_phone() {
        let action = PayloadAction::parse("tel:+1234567890");
        match action {
            PayloadAction::Phone(number) => {
                assert_eq!(number, "+1234567890");
            }
            _ => panic!("Expected Phone action"),
        }
    }

    #[test]
    fn test_parse_mailto_drops_params() {
        let action = PayloadAction::parse("mailto:test@example.com?subject=Hello");
        match action {
            PayloadAction::Email(address) => {
                assert_eq!(address, "test@example.com");
            }
            _ => panic!("Expected Email action"),
        }
    }

    #[test]
    fn test_parse_plain_text() {
        let action = PayloadAction::parse("Hello World!");
        assert!(matches!(action, PayloadAction::Text(_)));
        assert_eq!(action.action_label(), "Copy Text");
    }

    #[test]
    fn test_sentence_with_period_stays_text() {
        assert!(matches!(
            PayloadAction::parse("Release v2. Final"),
            PayloadAction::Text(_)
        ));
    }

    #[test]
    fn test_open_uri() {
        assert_eq!(
            PayloadAction::parse("tel:123").open_uri(),
            Some("tel:123".to_string())
        );
        assert_eq!(
            PayloadAction::parse("https://a.example").open_uri(),
            Some("https://a.example".to_string())
        );
        assert_eq!(PayloadAction::parse("plain note").open_uri(), None);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(PayloadAction::parse("https://a.com").kind(), "url");
        assert_eq!(PayloadAction::parse("tel:1").kind(), "phone");
        assert_eq!(PayloadAction::parse("mailto:a@b.c").kind(), "email");
        assert_eq!(PayloadAction::parse("hi there").kind(), "text");
    }
}
