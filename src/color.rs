use std::{fmt, str::FromStr};

/// ABGR color packed as u32 value (most of the platforms are little-endian)
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct RGBA(u32);

impl RGBA {
    pub const BLACK: RGBA = RGBA::new(0, 0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((a as u32) << 24) | ((b as u32) << 16) | ((g as u32) << 8) | (r as u32))
    }

    pub const fn alpha(self) -> u8 {
        ((self.0 >> 24) & 0xff) as u8
    }

    pub const fn blue(self) -> u8 {
        ((self.0 >> 16) & 0xff) as u8
    }

    pub const fn green(self) -> u8 {
        ((self.0 >> 8) & 0xff) as u8
    }

    pub const fn red(self) -> u8 {
        (self.0 & 0xff) as u8
    }

    /// Convert color to sRGBA list
    pub fn to_rgba(self) -> [u8; 4] {
        [self.red(), self.green(), self.blue(), self.alpha()]
    }

    /// Parse color which can also be specified as `none`
    pub fn parse_paint(paint: &str) -> Result<Option<Self>, ColorError> {
        match paint.trim() {
            "none" | "transparent" => Ok(None),
            color => color.parse().map(Some),
        }
    }
}

impl fmt::Debug for RGBA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RGBA({})", self)
    }
}

impl fmt::Display for RGBA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.to_rgba();
        write!(f, "#{:02x}{:02x}{:02x}", r, g, b)?;
        if a != 255 {
            write!(f, "{:02x}", a)?;
        }
        Ok(())
    }
}

impl FromStr for RGBA {
    type Err = ColorError;

    fn from_str(color: &str) -> Result<Self, Self::Err> {
        let color = color.trim();
        if let Some(hex) = color.strip_prefix('#') {
            parse_hex(hex.as_bytes())
        } else if let Some(args) = color
            .strip_prefix("rgba(")
            .and_then(|args| args.strip_suffix(')'))
        {
            parse_components(args, true)
        } else if let Some(args) = color
            .strip_prefix("rgb(")
            .and_then(|args| args.strip_suffix(')'))
        {
            parse_components(args, false)
        } else {
            Err(ColorError::UnknownFormat)
        }
    }
}

/// Parse `RGB`, `RRGGBB` or `RRGGBBAA` hexadecimal digits
fn parse_hex(bytes: &[u8]) -> Result<RGBA, ColorError> {
    let digit = |byte| match byte {
        b'A'..=b'F' => Ok(byte - b'A' + 10),
        b'a'..=b'f' => Ok(byte - b'a' + 10),
        b'0'..=b'9' => Ok(byte - b'0'),
        _ => Err(ColorError::HexExpected),
    };
    match bytes.len() {
        3 => {
            // #RGB is a shorthand for #RRGGBB
            let mut hex = bytes
                .iter()
                .map(|byte| -> Result<u8, ColorError> { Ok(digit(*byte)? * 17) });
            Ok(RGBA::new(
                hex.next().unwrap_or(Ok(0))?,
                hex.next().unwrap_or(Ok(0))?,
                hex.next().unwrap_or(Ok(0))?,
                255,
            ))
        }
        6 | 8 => {
            let mut hex = bytes.chunks(2).map(|pair| -> Result<u8, ColorError> {
                Ok((digit(pair[0])? << 4) | digit(pair[1])?)
            });
            Ok(RGBA::new(
                hex.next().unwrap_or(Ok(0))?,
                hex.next().unwrap_or(Ok(0))?,
                hex.next().unwrap_or(Ok(0))?,
                hex.next().unwrap_or(Ok(255))?,
            ))
        }
        _ => Err(ColorError::HexExpected),
    }
}

/// Parse comma separated components of `rgb(r, g, b)` or `rgba(r, g, b, a)`
///
/// Alpha accepts both `0..=1` fraction and `0..=255` integer forms.
fn parse_components(args: &str, with_alpha: bool) -> Result<RGBA, ColorError> {
    let mut values = args.split(',').map(str::trim);
    let mut channel = || -> Result<u8, ColorError> {
        values
            .next()
            .ok_or(ColorError::ComponentExpected)?
            .parse::<u8>()
            .map_err(|_| ColorError::ComponentExpected)
    };
    let (r, g, b) = (channel()?, channel()?, channel()?);
    let a = if with_alpha {
        let alpha = values.next().ok_or(ColorError::ComponentExpected)?;
        match alpha.parse::<u8>() {
            Ok(alpha) => alpha,
            Err(_) => {
                let alpha: f64 = alpha.parse().map_err(|_| ColorError::ComponentExpected)?;
                if !(0.0..=1.0).contains(&alpha) {
                    return Err(ColorError::ComponentExpected);
                }
                (alpha * 255.0).round() as u8
            }
        }
    } else {
        255
    };
    if values.next().is_some() {
        return Err(ColorError::ComponentExpected);
    }
    Ok(RGBA::new(r, g, b, a))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    HexExpected,
    ComponentExpected,
    UnknownFormat,
}

impl fmt::Display for ColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorError::HexExpected => {
                write!(f, "Color expected to be #RGB or #RRGGBB(AA) in hexadecimal format")
            }
            ColorError::ComponentExpected => {
                write!(f, "Color expected to be rgb(r, g, b) or rgba(r, g, b, a)")
            }
            ColorError::UnknownFormat => write!(f, "Unknown color format"),
        }
    }
}

impl std::error::Error for ColorError {}
