//! Tint color parsing.
//!
//! Colors arrive as hex text from page script and are packed as
//! `0xAARRGGBB`. Parsing is total: malformed text becomes the zero color.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Packed ARGB tint, `[alpha][red][green][blue]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TintColor(u32);

impl TintColor {
    pub const ZERO: Self = Self(0);

    pub const fn from_argb(argb: u32) -> Self {
        Self(argb)
    }

    pub const fn from_channels(alpha: u8, red: u8, green: u8, blue: u8) -> Self {
        Self(((alpha as u32) << 24) | ((red as u32) << 16) | ((green as u32) << 8) | blue as u32)
    }

    /// Parse `#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA` (the `#` is optional).
    pub fn parse(text: &str) -> Self {
        parse_color(text)
    }

    pub const fn argb(self) -> u32 {
        self.0
    }

    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Same color with alpha raised to at least `min`.
    pub const fn with_min_alpha(self, min: u8) -> Self {
        if self.alpha() >= min {
            self
        } else {
            Self((self.0 & 0x00FF_FFFF) | ((min as u32) << 24))
        }
    }
}

impl From<u32> for TintColor {
    fn from(argb: u32) -> Self {
        Self(argb)
    }
}

impl From<TintColor> for u32 {
    fn from(color: TintColor) -> Self {
        color.0
    }
}

impl fmt::Display for TintColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02X}{:02X}{:02X}{:02X}",
            self.red(),
            self.green(),
            self.blue(),
            self.alpha()
        )
    }
}

impl Serialize for TintColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TintColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(parse_color(&text))
    }
}

/// Parse a hex color into packed ARGB.
///
/// 6 and 8 digits read two-digit channels in R, G, B, (A) order; 3 and 4
/// digits duplicate each RGB nibble. The 4-digit alpha nibble is shifted
/// into the high nibble without duplication (`"F00A"` has alpha `0xA0`).
/// Missing alpha defaults to `0xFF`. Any other length, including empty
/// input and a lone `#`, yields [`TintColor::ZERO`].
pub fn parse_color(text: &str) -> TintColor {
    let digits: Vec<char> = text.strip_prefix('#').unwrap_or(text).chars().collect();

    let (alpha, red, green, blue) = match digits.len() {
        6 | 8 => {
            let red = field(&digits[0..2]);
            let green = field(&digits[2..4]);
            let blue = field(&digits[4..6]);
            let alpha = if digits.len() == 8 { field(&digits[6..8]) } else { 0xFF };
            (alpha, red, green, blue)
        }
        3 | 4 => {
            let red = nibble(digits[0]) * 0x11;
            let green = nibble(digits[1]) * 0x11;
            let blue = nibble(digits[2]) * 0x11;
            let alpha = if digits.len() == 4 { nibble(digits[3]) << 4 } else { 0xFF };
            (alpha, red, green, blue)
        }
        _ => return TintColor::ZERO,
    };

    TintColor::from_channels(alpha, red, green, blue)
}

/// Two-digit field read like `strtol(.., 16)`: leading whitespace and one
/// sign are accepted, digits stop at the first non-hex character, and the
/// result is truncated to a byte (`"-1"` is `0xFF`).
fn field(chars: &[char]) -> u8 {
    let mut rest = chars
        .iter()
        .copied()
        .skip_while(|&c| c.is_ascii_whitespace() || c == '\u{0b}')
        .peekable();

    let negative = match rest.peek() {
        Some('-') => {
            rest.next();
            true
        }
        Some('+') => {
            rest.next();
            false
        }
        _ => false,
    };

    let value = rest
        .map_while(|c| c.to_digit(16))
        .fold(0i32, |acc, d| acc * 16 + d as i32);
    (if negative { -value } else { value }) as u8
}

fn nibble(c: char) -> u8 {
    c.to_digit(16).unwrap_or(0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_six_digit_forms() {
        assert_eq!(parse_color("#FF0000").argb(), 0xFFFF0000);
        assert_eq!(parse_color("00ff7f").argb(), 0xFF00FF7F);
        assert_eq!(parse_color("#123456").argb(), 0xFF123456);
    }

    #[test]
    fn test_eight_digit_alpha_is_last() {
        assert_eq!(parse_color("#11223344").argb(), 0x44112233);
        assert_eq!(parse_color("00000000").argb(), 0x00000000);
        assert_eq!(parse_color("#28282880").alpha(), 0x80);
    }

    #[test]
    fn test_shorthand_duplicates_rgb_nibbles() {
        assert_eq!(parse_color("F00").argb(), 0xFFFF0000);
        assert_eq!(parse_color("#abc").argb(), 0xFFAABBCC);
    }

    #[test]
    fn test_shorthand_alpha_is_not_duplicated() {
        assert_eq!(parse_color("#F00A").argb(), 0xA0FF0000);
        assert_eq!(parse_color("0001").alpha(), 0x10);
    }

    #[test]
    fn test_degenerate_input_is_zero() {
        assert_eq!(parse_color(""), TintColor::ZERO);
        assert_eq!(parse_color("#"), TintColor::ZERO);
        assert_eq!(parse_color("#12345"), TintColor::ZERO);
        assert_eq!(parse_color("#123456789"), TintColor::ZERO);
        assert_eq!(parse_color("##FF0000"), TintColor::ZERO);
    }

    #[test]
    fn test_invalid_digits_degrade_per_field() {
        // "G0" reads no digits, "0G" reads only the leading 0.
        assert_eq!(parse_color("G0FF0G").argb(), 0xFF00FF00);
        assert_eq!(parse_color("FXF").argb(), 0xFFFF00FF);
    }

    #[test]
    fn test_fields_accept_space_and_sign() {
        assert_eq!(parse_color("+F0000").argb(), 0xFF0F0000);
        assert_eq!(parse_color(" F0000").argb(), 0xFF0F0000);
        assert_eq!(parse_color("\tF0000").argb(), 0xFF0F0000);
        assert_eq!(parse_color("-10000").argb(), 0xFFFF0000);
        assert_eq!(parse_color("#00-100").argb(), 0xFF00FF00);
        // A sign with no digits after it reads as zero.
        assert_eq!(parse_color("+-0000").argb(), 0xFF000000);
    }

    #[test]
    fn test_min_alpha() {
        let color = TintColor::from_argb(0x00282828);
        assert_eq!(color.with_min_alpha(1).argb(), 0x01282828);
        assert_eq!(TintColor::from_argb(0x80FFFFFF).with_min_alpha(1).argb(), 0x80FFFFFF);
    }

    #[test]
    fn test_display_and_serde() {
        let color = parse_color("#0A0B0C");
        assert_eq!(color.to_string(), "#0A0B0CFF");

        let json = serde_json::to_string(&color).unwrap();
        assert_eq!(json, "\"#0A0B0CFF\"");
        let back: TintColor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, color);
    }
}
