use serde::{Deserialize, Serialize};

/// Color identifier of a block.
///
/// The engine never interprets the value; it is whatever name the front-end
/// supplied in [`EngineConfig::colors`](crate::EngineConfig::colors), such as
/// `"red"` or `"#ff7f00"`.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct BlockColor(String);

impl BlockColor {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BlockColor {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Colors used when the configuration does not name any.
pub const DEFAULT_COLORS: [&str; 7] = [
    "cyan", "yellow", "green", "red", "blue", "magenta", "#ff7f00",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_plain_string() {
        let color = BlockColor::from("red");
        assert_eq!(serde_json::to_string(&color).unwrap(), "\"red\"");

        let parsed: BlockColor = serde_json::from_str("\"#00ff00\"").unwrap();
        assert_eq!(parsed.as_str(), "#00ff00");
    }

    #[test]
    fn test_display_is_the_name() {
        assert_eq!(BlockColor::new("blue").to_string(), "blue");
    }
}
