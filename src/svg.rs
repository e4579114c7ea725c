//! SVG path data and transform attribute syntax
//!
//! See [SVG Path Specification](https://www.w3.org/TR/SVG11/paths.html#PathData)
//! and [SVG Transform Specification](https://www.w3.org/TR/SVG11/coords.html#TransformAttribute)
use crate::{Error, PI, Scalar, Transform};
use std::str::FromStr;

/// Low level syntax error, converted to [`Error`] by the caller which knows the context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SyntaxError {
    reason: &'static str,
    offset: usize,
}

impl SyntaxError {
    fn into_path_error(self, cmd: char) -> Error {
        Error::InvalidPathData {
            command: Some(cmd),
            reason: format!("{} at offset {}", self.reason, self.offset),
        }
    }

    fn into_transform_error(self) -> Error {
        Error::InvalidTransform {
            reason: self.reason.to_owned(),
            offset: self.offset,
        }
    }
}

/// Byte oriented scanner shared by path arguments and transform parsers
struct Parser<'a> {
    // text containing unparsed input
    text: &'a [u8],
    // current offset in the text
    offset: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a [u8]) -> Self {
        Self { text, offset: 0 }
    }

    fn error(&self, reason: &'static str) -> SyntaxError {
        SyntaxError {
            reason,
            offset: self.offset,
        }
    }

    /// Byte at the current position
    fn current(&self) -> Option<u8> {
        self.text.get(self.offset).copied()
    }

    /// Advance current position by `count` bytes
    fn advance(&mut self, count: usize) {
        self.offset += count;
    }

    /// Check if end of input is reached
    fn is_eof(&self) -> bool {
        self.offset >= self.text.len()
    }

    /// Consume insignificant separators
    fn parse_separators(&mut self) {
        while let Some(b' ' | b'\t' | b'\r' | b'\n' | b',') = self.current() {
            self.advance(1);
        }
    }

    /// Consume digits, returns true if at least one digit was found
    fn parse_digits(&mut self) -> bool {
        let start = self.offset;
        while let Some(b'0'..=b'9') = self.current() {
            self.advance(1);
        }
        self.offset > start
    }

    /// Consume `+|-` sign
    fn parse_sign(&mut self) {
        if let Some(b'-' | b'+') = self.current() {
            self.advance(1);
        }
    }

    /// Consume ascii letters
    fn parse_ident(&mut self) -> &'a [u8] {
        let start = self.offset;
        while self.current().is_some_and(|byte| byte.is_ascii_alphabetic()) {
            self.advance(1);
        }
        &self.text[start..self.offset]
    }

    /// Parse single scalar
    ///
    /// A number ends where the next one can start, so `-` or a second `.` act
    /// as implicit separators: `1.2.3-4` is `1.2`, `.3`, `-4`.
    fn parse_scalar(&mut self) -> Result<Scalar, SyntaxError> {
        self.parse_separators();
        let start = self.offset;
        self.parse_sign();
        let whole = self.parse_digits();
        let fraction = match self.current() {
            Some(b'.') => {
                self.advance(1);
                self.parse_digits()
            }
            _ => false,
        };
        if !whole && !fraction {
            return Err(self.error("failed to parse scalar"));
        }
        if let Some(b'e' | b'E') = self.current() {
            self.advance(1);
            self.parse_sign();
            if !self.parse_digits() {
                return Err(self.error("failed to parse scalar exponent"));
            }
        }
        lexical_core::parse::<Scalar>(&self.text[start..self.offset])
            .map_err(|_| SyntaxError {
                reason: "failed to parse scalar",
                offset: start,
            })
    }
}

/// Split path data into segments, each segment starts with a command letter
/// and contains all of the command arguments.
///
/// Letter `e`/`E` that follows a digit is an exponent of a number, not a command.
/// Command letters are not validated here, see [`crate::Tracer::trace`].
pub fn split_segments(data: &str) -> Result<Vec<&str>, Error> {
    let bytes = data.as_bytes();
    let mut segments = Vec::new();
    let mut start: Option<usize> = None;
    for (index, byte) in bytes.iter().copied().enumerate() {
        match byte {
            b'e' | b'E'
                if start.is_some()
                    && index > 0
                    && matches!(bytes[index - 1], b'0'..=b'9' | b'.') => {}
            _ if byte.is_ascii_alphabetic() => {
                if let Some(start) = start {
                    segments.push(data[start..index].trim_end());
                }
                start = Some(index);
            }
            b'0'..=b'9' | b'-' | b'+' | b'.' | b',' if start.is_some() => {}
            _ if byte.is_ascii_whitespace() => {}
            _ => {
                return Err(Error::InvalidPathData {
                    command: None,
                    reason: if start.is_some() {
                        format!("unexpected character at offset {}", index)
                    } else {
                        format!("command expected at offset {}", index)
                    },
                });
            }
        }
    }
    if let Some(start) = start {
        segments.push(data[start..].trim_end());
    }
    Ok(segments)
}

/// Parse numeric arguments of a segment (everything after the command letter)
pub fn parse_args(cmd: char, args: &str) -> Result<Vec<Scalar>, Error> {
    let mut parser = Parser::new(args.as_bytes());
    let mut output = Vec::new();
    loop {
        parser.parse_separators();
        if parser.is_eof() {
            break;
        }
        let value = parser
            .parse_scalar()
            .map_err(|error| error.into_path_error(cmd))?;
        output.push(value);
    }
    Ok(output)
}

struct TransformParser<'a> {
    parser: Parser<'a>,
}

impl<'a> TransformParser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            parser: Parser::new(text.as_bytes()),
        }
    }

    fn scalar(&mut self) -> Result<Scalar, Error> {
        self.parser
            .parse_scalar()
            .map_err(SyntaxError::into_transform_error)
    }

    /// Parse scalar if the argument list is not finished yet
    fn scalar_opt(&mut self) -> Result<Option<Scalar>, Error> {
        self.parser.parse_separators();
        match self.parser.current() {
            Some(b')') | None => Ok(None),
            _ => self.scalar().map(Some),
        }
    }

    // parse angle in radians
    fn angle(&mut self) -> Result<Scalar, Error> {
        let value = self.scalar()?;
        match self.parser.parse_ident() {
            b"" | b"deg" => Ok(value * PI / 180.0),
            b"rad" => Ok(value),
            b"grad" => Ok(value * PI / 200.0),
            b"turn" => Ok(value * 2.0 * PI),
            _ => Err(self.parser.error("invalid angle units").into_transform_error()),
        }
    }

    fn length(&mut self) -> Result<Scalar, Error> {
        let value = self.scalar()?;
        match self.parser.parse_ident() {
            b"" | b"px" => Ok(value),
            _ => Err(self.parser.error("invalid length units").into_transform_error()),
        }
    }

    fn length_opt(&mut self) -> Result<Option<Scalar>, Error> {
        self.parser.parse_separators();
        match self.parser.current() {
            Some(b')') | None => Ok(None),
            _ => self.length().map(Some),
        }
    }

    fn expect(&mut self, byte: u8) -> Result<(), Error> {
        self.parser.parse_separators();
        if self.parser.current() != Some(byte) {
            let reason = if byte == b'(' {
                "'(' expected"
            } else {
                "')' expected"
            };
            return Err(self.parser.error(reason).into_transform_error());
        }
        self.parser.advance(1);
        Ok(())
    }

    fn parse_transform(&mut self) -> Result<Option<Transform>, Error> {
        self.parser.parse_separators();
        if self.parser.is_eof() {
            return Ok(None);
        }

        let start = self.parser.offset;
        let name = self.parser.parse_ident();
        self.expect(b'(')?;
        let tr = Transform::identity();
        let tr = match name {
            b"matrix" => {
                let a = self.scalar()?;
                let b = self.scalar()?;
                let c = self.scalar()?;
                let d = self.scalar()?;
                let e = self.scalar()?;
                let f = self.scalar()?;
                Transform::new(a, b, c, d, e, f)
            }
            b"translate" => {
                let tx = self.length()?;
                let ty = self.length_opt()?.unwrap_or(0.0);
                tr.translate(tx, ty)
            }
            b"translateX" => tr.translate(self.length()?, 0.0),
            b"translateY" => tr.translate(0.0, self.length()?),
            b"scale" => {
                let sx = self.scalar()?;
                let sy = self.scalar_opt()?.unwrap_or(sx);
                tr.scale(sx, sy)
            }
            b"scaleX" => tr.scale(self.scalar()?, 1.0),
            b"scaleY" => tr.scale(1.0, self.scalar()?),
            b"rotate" => {
                let angle = self.angle()?;
                match self.length_opt()? {
                    None => tr.rotate(angle),
                    Some(cx) => {
                        let cy = self.length()?;
                        tr.rotate_around(angle, (cx, cy))
                    }
                }
            }
            b"skewX" => tr.skew_x(self.angle()?),
            b"skewY" => tr.skew_y(self.angle()?),
            _ => {
                return Err(Error::InvalidTransform {
                    reason: format!(
                        "unknown transform function '{}'",
                        String::from_utf8_lossy(name)
                    ),
                    offset: start,
                });
            }
        };
        self.expect(b')')?;
        Ok(Some(tr))
    }
}

impl FromStr for Transform {
    type Err = Error;

    /// Parse SVG `transform` attribute, functions are composed left to right
    ///
    /// Angles without units are in degrees, `rad`, `grad` and `turn` units are also accepted.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut tr = Transform::identity();
        let mut parser = TransformParser::new(text);
        while let Some(tr_next) = parser.parse_transform()? {
            tr = tr * tr_next;
        }
        Ok(tr)
    }
}
