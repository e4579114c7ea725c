use crate::{
    BBox, Point, RGBA, Scalar, Section, Transform, Vector, section::trace_sections,
    svg::split_segments,
};
use std::{cell::OnceCell, fmt, str::FromStr};

/// Paint of a path resolved by the document (group and CSS cascading is done by the caller)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    /// Fill color, `None` corresponds to `none`
    pub fill: Option<RGBA>,
    /// Stroke color, `None` corresponds to `none`
    pub stroke: Option<RGBA>,
    pub stroke_width: Scalar,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: Some(RGBA::BLACK),
            stroke: Some(RGBA::BLACK),
            stroke_width: 1.0,
        }
    }
}

/// Options controlling how path is traced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TraceOptions {
    /// Curve sampling density level, each level doubles number of samples
    pub resolution: i32,
    /// Split path into sections at each moveto command, otherwise the whole path
    /// is traced as a single section
    pub subpaths: bool,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self {
            resolution: 0,
            subpaths: true,
        }
    }
}

impl TraceOptions {
    /// Largest magnitude of the resolution level, levels outside are clamped
    pub const MAX_RESOLUTION: i32 = 32;

    /// Resolution scale passed to the tracer (`2^resolution`)
    pub fn resolution_scale(&self) -> Scalar {
        let level = self
            .resolution
            .clamp(-Self::MAX_RESOLUTION, Self::MAX_RESOLUTION);
        (2.0 as Scalar).powi(level)
    }
}

/// Path element: path data with its style and transform
///
/// Sections are traced on first access and memoized, including the failure.
#[derive(Clone)]
pub struct Path {
    data: String,
    style: Style,
    tr: Transform,
    options: TraceOptions,
    sections: OnceCell<Result<Vec<Section>, Error>>,
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Path")
            .field("data", &self.data)
            .field("style", &self.style)
            .field("tr", &self.tr)
            .field("options", &self.options)
            .finish()
    }
}

impl Path {
    /// Create new path, path data must start with moveto command
    pub fn new(
        data: impl Into<String>,
        style: Style,
        tr: Transform,
        options: TraceOptions,
    ) -> Result<Self, Error> {
        let data = data.into();
        if !data.trim_start().starts_with(['M', 'm']) {
            return Err(Error::InvalidPathData {
                command: None,
                reason: "path data must start with moveto command".to_owned(),
            });
        }
        Ok(Self {
            data,
            style,
            tr,
            options,
            sections: OnceCell::new(),
        })
    }

    /// Raw path data
    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn style(&self) -> Style {
        self.style
    }

    pub fn transform(&self) -> Transform {
        self.tr
    }

    pub fn options(&self) -> TraceOptions {
        self.options
    }

    /// Traced sections of the path in the order of the path data
    pub fn sections(&self) -> Result<&[Section], Error> {
        self.sections
            .get_or_init(|| self.trace())
            .as_deref()
            .map_err(|error| error.clone())
    }

    /// Transformed points of all sections
    pub fn points(&self) -> Result<Vec<Point>, Error> {
        Ok(self
            .sections()?
            .iter()
            .flat_map(|section| section.points().iter().copied())
            .collect())
    }

    /// Bounding box of all sections
    pub fn bbox(&self) -> Result<BBox, Error> {
        Ok(self
            .sections()?
            .iter()
            .fold(BBox::empty(), |bbox, section| bbox.union(section.bbox())))
    }

    fn trace(&self) -> Result<Vec<Section>, Error> {
        let _span = tracing::debug_span!("[trace]", resolution = self.options.resolution).entered();
        let segments = split_segments(&self.data)?;
        let resolution = self.options.resolution_scale();
        let sections = if self.options.subpaths {
            trace_sections(&segments, resolution, self.tr, self.style)?
        } else {
            vec![Section::trace(
                &segments,
                Vector::ZERO,
                true,
                resolution,
                self.tr,
                self.style,
            )?]
        };
        tracing::debug!(
            "[trace:sections] segments={} sections={} points={}",
            segments.len(),
            sections.len(),
            sections
                .iter()
                .map(|section| section.points().len())
                .sum::<usize>()
        );
        Ok(sections)
    }

    /// Convert path to JSON value
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<serde_json::Value, Error> {
        let sections: Vec<_> = self.sections()?.iter().map(Section::to_json).collect();
        Ok(serde_json::json!({
            "transform": self.tr.to_string(),
            "resolution": self.options.resolution,
            "sections": sections,
        }))
    }
}

impl FromStr for Path {
    type Err = Error;

    fn from_str(text: &str) -> Result<Path, Self::Err> {
        Path::new(
            text,
            Style::default(),
            Transform::identity(),
            TraceOptions::default(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Error {
    /// Malformed numbers, wrong number of arguments or missing moveto
    InvalidPathData {
        command: Option<char>,
        reason: String,
    },
    /// Unknown path command
    InvalidCommand(char),
    /// Known but unsupported path command (elliptical arc)
    NotImplemented(char),
    /// Malformed transform attribute
    InvalidTransform { reason: String, offset: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidPathData {
                command: Some(command),
                reason,
            } => write!(f, "invalid path data for command {}: {}", command, reason),
            Error::InvalidPathData {
                command: None,
                reason,
            } => write!(f, "invalid path data: {}", reason),
            Error::InvalidCommand(command) => write!(f, "invalid path command: {}", command),
            Error::NotImplemented(command) => {
                write!(f, "path command is not implemented: {}", command)
            }
            Error::InvalidTransform { reason, offset } => {
                write!(f, "invalid transform at offset {}: {}", offset, reason)
            }
        }
    }
}

impl From<Error> for std::io::Error {
    fn from(error: Error) -> Self {
        Self::new(std::io::ErrorKind::InvalidData, error)
    }
}

impl std::error::Error for Error {}
