use std::fmt;

use thiserror::Error;

const TOKEN_PREFIXES: [&str; 2] = ["ghp_", "github_pat_"];
const MASK_VISIBLE: usize = 8;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Please enter a GitHub token")]
    Empty,
    #[error("Invalid token format. GitHub tokens start with \"ghp_\" or \"github_pat_\"")]
    InvalidFormat,
}

/// GitHub personal access token used to dispatch the search workflow.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    pub fn parse(raw: &str) -> Result<Self, TokenError> {
        let token = raw.trim();
        if token.is_empty() {
            return Err(TokenError::Empty);
        }
        if !TOKEN_PREFIXES
            .iter()
            .any(|prefix| token.starts_with(prefix))
        {
            return Err(TokenError::InvalidFormat);
        }
        Ok(Self(token.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn masked(&self) -> String {
        mask_token(&self.0)
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiToken").field(&self.masked()).finish()
    }
}

/// First eight characters followed by an ellipsis.
pub fn mask_token(token: &str) -> String {
    let visible: String = token.chars().take(MASK_VISIBLE).collect();
    format!("{visible}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_both_token_styles() {
        assert!(ApiToken::parse("ghp_abcdefghijklmnop").is_ok());
        let token = ApiToken::parse("  github_pat_11AAAA  ").unwrap();
        assert_eq!(token.expose(), "github_pat_11AAAA");
    }

    #[test]
    fn rejects_empty_and_foreign_tokens() {
        assert_eq!(ApiToken::parse("   "), Err(TokenError::Empty));
        assert_eq!(ApiToken::parse("gho_oauth"), Err(TokenError::InvalidFormat));
        assert_eq!(
            TokenError::Empty.to_string(),
            "Please enter a GitHub token"
        );
    }

    #[test]
    fn masking_keeps_eight_characters() {
        let token = ApiToken::parse("ghp_1234567890").unwrap();
        assert_eq!(token.masked(), "ghp_1234...");
        assert_eq!(mask_token("ghp_"), "ghp_...");
        assert!(!format!("{token:?}").contains("567890"));
    }
}
