use std::str::FromStr;

/// A game key, already mapped from whatever the host's keyboard reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Pause,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unrecognized key: {name:?}")]
pub struct ParseKeyError {
    name: String,
}

/// Accepts browser-style key identifiers (`"ArrowLeft"`, `" "`) as well as
/// short lowercase names (`"left"`, `"space"`, `"pause"`).
impl FromStr for Key {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s {
            "ArrowUp" | "up" => Self::Up,
            "ArrowDown" | "down" => Self::Down,
            "ArrowLeft" | "left" => Self::Left,
            "ArrowRight" | "right" => Self::Right,
            " " | "space" | "pause" => Self::Pause,
            _ => {
                return Err(ParseKeyError { name: s.to_owned() });
            }
        };
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_names() {
        let cases = [
            ("ArrowUp", Key::Up),
            ("up", Key::Up),
            ("ArrowDown", Key::Down),
            ("down", Key::Down),
            ("ArrowLeft", Key::Left),
            ("left", Key::Left),
            ("ArrowRight", Key::Right),
            ("right", Key::Right),
            (" ", Key::Pause),
            ("space", Key::Pause),
            ("pause", Key::Pause),
        ];
        for (name, key) in cases {
            assert_eq!(name.parse::<Key>(), Ok(key), "{name:?}");
        }
    }

    #[test]
    fn test_parse_unknown_key() {
        let err = "Enter".parse::<Key>().unwrap_err();
        assert_eq!(err.to_string(), r#"unrecognized key: "Enter""#);
        assert!("arrowup".parse::<Key>().is_err());
        assert!("".parse::<Key>().is_err());
    }
}
