//! Subpath sections of a path and their fill classification
use crate::{BBox, Error, Point, RGBA, Scalar, Style, Tracer, Transform, Vector};

/// Traced subpath with transformed points
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    points: Vec<Point>,
    bbox: BBox,
    trace_bbox: BBox,
    end: Vector,
    filled: bool,
    enclosed: bool,
    style: Style,
}

impl Section {
    /// Trace segments into a section
    ///
    /// Tracing starts at `origin`, which is the end of the previous section. If `first` is
    /// set the section is the first one of the path. Points are transformed with `tr`
    /// once tracing is complete, while [`Section::end`] stays untransformed.
    pub fn trace(
        segments: &[&str],
        origin: impl Into<Vector>,
        first: bool,
        resolution: Scalar,
        tr: Transform,
        style: Style,
    ) -> Result<Self, Error> {
        let mut tracer = Tracer::new(resolution, origin, first);
        for segment in segments {
            tracer.trace(segment)?;
        }
        let end = tracer.position();
        let trace_bbox = tracer.bbox();
        let points: Vec<_> = tracer
            .into_points()
            .into_iter()
            .map(|point| point.transform(tr))
            .collect();
        if points.is_empty() {
            return Err(Error::InvalidPathData {
                command: None,
                reason: "section does not contain any points".to_owned(),
            });
        }
        let bbox = points.iter().map(|point| point.position).collect();
        let filled = segments
            .last()
            .is_some_and(|segment| segment.starts_with(['Z', 'z']));
        Ok(Self {
            points,
            bbox,
            trace_bbox,
            end,
            filled,
            enclosed: false,
            style,
        })
    }

    /// Transformed points of the section
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Bounding box of the transformed points
    pub fn bbox(&self) -> BBox {
        self.bbox
    }

    /// Bounding box of the points before transformation, used to classify enclosure
    pub fn trace_bbox(&self) -> BBox {
        self.trace_bbox
    }

    /// Untransformed position where tracing of the section ended
    pub fn end(&self) -> Vector {
        self.end
    }

    /// Whether the section ends with close path command
    pub fn is_filled(&self) -> bool {
        self.filled
    }

    /// Whether the section lies inside of one of the preceding sections
    ///
    /// This is a bounding box approximation of a hole in the fill, concave
    /// shapes can be misclassified.
    pub fn is_enclosed(&self) -> bool {
        self.enclosed
    }

    pub fn style(&self) -> Style {
        self.style
    }

    /// Fill color, `None` unless the section is filled
    pub fn fill_color(&self) -> Option<RGBA> {
        if self.filled { self.style.fill } else { None }
    }

    pub fn stroke_color(&self) -> Option<RGBA> {
        self.style.stroke
    }

    pub fn stroke_width(&self) -> Scalar {
        self.style.stroke_width
    }

    /// Convert section to JSON value
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> serde_json::Value {
        let paint = |color: Option<RGBA>| match color {
            Some(color) => color.to_string(),
            None => "none".to_owned(),
        };
        let points: Vec<_> = self
            .points
            .iter()
            .map(|point| {
                let position: [Scalar; 2] = point.position.into();
                let normal: [Scalar; 2] = point.normal.into();
                serde_json::json!({ "position": position, "normal": normal })
            })
            .collect();
        let min: [Scalar; 2] = self.bbox.min().into();
        let max: [Scalar; 2] = self.bbox.max().into();
        let trace_min: [Scalar; 2] = self.trace_bbox.min().into();
        let trace_max: [Scalar; 2] = self.trace_bbox.max().into();
        serde_json::json!({
            "points": points,
            "bbox": { "min": min, "max": max },
            "trace_bbox": { "min": trace_min, "max": trace_max },
            "fill": paint(self.fill_color()),
            "stroke": paint(self.stroke_color()),
            "stroke_width": self.stroke_width(),
            "filled": self.filled,
            "enclosed": self.enclosed,
        })
    }
}

/// Split segments into subpaths, each subpath starts with moveto command
pub fn split_subpaths<'a, 'b>(segments: &'b [&'a str]) -> Vec<&'b [&'a str]> {
    let mut subpaths = Vec::new();
    let mut start = 0;
    for (index, segment) in segments.iter().enumerate() {
        if index > start && segment.starts_with(['M', 'm']) {
            subpaths.push(&segments[start..index]);
            start = index;
        }
    }
    if start < segments.len() {
        subpaths.push(&segments[start..]);
    }
    subpaths
}

/// Mark sections which are inside of any preceding section that is not enclosed itself
///
/// Untransformed bounding boxes are compared, so classification does not depend
/// on rotation or skew of the path.
pub fn classify_enclosure(sections: &mut [Section]) {
    for index in 0..sections.len() {
        let (prior, rest) = sections.split_at_mut(index);
        let section = &mut rest[0];
        section.enclosed = prior
            .iter()
            .any(|other| {
                !other.enclosed && section.trace_bbox.is_inside_of(&other.trace_bbox)
            });
    }
}

/// Trace every subpath into a section, each section continues from the end of
/// the previous one.
pub fn trace_sections(
    segments: &[&str],
    resolution: Scalar,
    tr: Transform,
    style: Style,
) -> Result<Vec<Section>, Error> {
    let mut sections: Vec<Section> = Vec::new();
    for subpath in split_subpaths(segments) {
        let (origin, first) = match sections.last() {
            None => (Vector::ZERO, true),
            Some(prev) => (prev.end(), false),
        };
        sections.push(Section::trace(
            subpath, origin, first, resolution, tr, style,
        )?);
    }
    classify_enclosure(&mut sections);
    Ok(sections)
}
