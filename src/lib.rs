//! Trace SVG path data into polylines suitable for plotting and contour following.
//!
//! Main features:
//!  - SVG path data and transform attribute parsing
//!  - Resolution adaptive flattening of bezier curves
//!  - Per vertex normals, bounding boxes and fill/hole classification of subpaths
//!
#![deny(warnings)]

mod color;
mod curve;
mod geometry;
mod path;
mod section;
mod svg;
mod trace;
mod utils;

pub use color::{ColorError, RGBA};
pub use curve::{BASE_STEP, Cubic, Curve, CurveSamples, Quad};
pub use geometry::{BBox, EPSILON, EPSILON_SQRT, PI, Point, Scalar, Transform, Vector, scalar_fmt};
pub use path::{Error, Path, Style, TraceOptions};
pub use section::{Section, classify_enclosure, split_subpaths, trace_sections};
pub use svg::{parse_args, split_segments};
pub use trace::Tracer;
