// Variantmap Layout Tokens
// Parses "layout(variant)" tokens into a base layout plus optional variant

use std::fmt;
use std::str::FromStr;

/// A keyboard layout, optionally narrowed to one of its variants
///
/// Renders as `base(variant)` when a variant is present, `base` otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LayoutToken {
    base: String,
    variant: Option<String>,
}

/// Shape of a raw token as seen by the compact-form grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenShape<'a> {
    /// No compact form detected; the whole token is the base layout
    Plain(&'a str),
    /// `base(variant)` followed by whatever came after the closing paren
    Compact {
        base: &'a str,
        variant: &'a str,
        trailing: &'a str,
    },
}

/// Errors that can occur while building a layout token
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("layout token cannot be empty")]
    EmptyToken,

    #[error("layout token '{token}' already carries a variant, cannot also apply '{variant}'")]
    ConflictingVariant { token: String, variant: String },
}

/// Split a raw token according to the compact `base(variant)` grammar
///
/// `base` is everything before the first `(`, `variant` everything up to the
/// next `)`. Both must be non-empty and the closing paren must exist,
/// otherwise the token is [`TokenShape::Plain`].
///
/// # Examples
/// ```
/// use variantmap_core::layout::{split_compact, TokenShape};
/// assert_eq!(
///     split_compact("de(nodeadkeys)"),
///     TokenShape::Compact { base: "de", variant: "nodeadkeys", trailing: "" }
/// );
/// assert_eq!(split_compact("us"), TokenShape::Plain("us"));
/// ```
pub fn split_compact(token: &str) -> TokenShape<'_> {
    let Some(open) = token.find('(') else {
        return TokenShape::Plain(token);
    };
    let base = &token[..open];
    let rest = &token[open + 1..];
    let Some(close) = rest.find(')') else {
        return TokenShape::Plain(token);
    };
    let variant = &rest[..close];

    if base.is_empty() || variant.is_empty() {
        return TokenShape::Plain(token);
    }

    TokenShape::Compact {
        base,
        variant,
        trailing: &rest[close + 1..],
    }
}

impl LayoutToken {
    /// Build a token from already separated parts
    ///
    /// An empty variant string counts as no variant.
    pub fn new(base: impl Into<String>, variant: Option<&str>) -> Self {
        Self {
            base: base.into(),
            variant: variant.filter(|v| !v.is_empty()).map(str::to_string),
        }
    }

    /// Parse a single token that may use the compact `base(variant)` form
    pub fn parse(token: &str) -> Result<Self, TokenError> {
        Self::parse_with_variant(token, None)
    }

    /// Parse a token, applying a separately supplied variant
    ///
    /// A compact token must not be combined with a separate variant; that
    /// yields [`TokenError::ConflictingVariant`].
    pub fn parse_with_variant(token: &str, variant: Option<&str>) -> Result<Self, TokenError> {
        if token.is_empty() {
            return Err(TokenError::EmptyToken);
        }

        match split_compact(token) {
            TokenShape::Compact {
                base,
                variant: inline,
                trailing,
            } => {
                if let Some(extra) = variant {
                    return Err(TokenError::ConflictingVariant {
                        token: token.to_string(),
                        variant: extra.to_string(),
                    });
                }
                if !trailing.is_empty() {
                    log::warn!("ignoring trailing text '{}' in layout token '{}'", trailing, token);
                }
                Ok(Self::new(base, Some(inline)))
            }
            TokenShape::Plain(base) => Ok(Self::new(base, variant)),
        }
    }

    /// Base layout name (e.g. `de` for `de(nodeadkeys)`)
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Variant name, if any
    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }

    pub fn has_variant(&self) -> bool {
        self.variant.is_some()
    }
}

impl fmt::Display for LayoutToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.variant {
            Some(variant) => write!(f, "{}({})", self.base, variant),
            None => write!(f, "{}", self.base),
        }
    }
}

impl FromStr for LayoutToken {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
