//! Path tracer: converts path data segments into points with normals
use crate::{BBox, Cubic, Curve, Error, Point, Quad, Scalar, Vector, svg::parse_args};

/// Traces segments of path data into a list of points with normals.
///
/// Curves are flattened with density controlled by `resolution`, see
/// [`Curve::samples`]. Points are not transformed.
#[derive(Debug, Clone)]
pub struct Tracer {
    // sampling density of the curves
    resolution: Scalar,
    // very first subpath of the path, relative moveto with no points is absolute
    first: bool,
    // current position from which next segment starts
    position: Vector,
    // control point reflected by smooth curves
    last_control: Vector,
    // index of the point created by the latest moveto
    start: usize,
    points: Vec<Point>,
    bbox: BBox,
}

impl Tracer {
    /// Create tracer starting at `origin`
    pub fn new(resolution: Scalar, origin: impl Into<Vector>, first: bool) -> Self {
        let origin = origin.into();
        Self {
            resolution,
            first,
            position: origin,
            last_control: origin,
            start: 0,
            points: Vec::new(),
            bbox: BBox::empty(),
        }
    }

    /// Current position of the tracer
    pub fn position(&self) -> Vector {
        self.position
    }

    /// Points traced so far
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Bounding box of the points traced so far
    pub fn bbox(&self) -> BBox {
        self.bbox
    }

    /// Consume tracer returning traced points
    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    /// Trace single segment, command letter followed by its arguments (`"L10,0 20,0"`)
    pub fn trace(&mut self, segment: &str) -> Result<(), Error> {
        let mut chars = segment.trim_start().chars();
        let cmd = chars.next().ok_or_else(|| Error::InvalidPathData {
            command: None,
            reason: "empty segment".to_owned(),
        })?;
        let args = chars.as_str();
        tracing::trace!("[trace:segment] {}", segment);
        match cmd {
            'M' | 'm' => self.move_to(cmd, args),
            'L' | 'l' => self.line_to(cmd, args),
            'H' | 'h' => self.horizontal_to(cmd, args),
            'V' | 'v' => self.vertical_to(cmd, args),
            'C' | 'c' => self.cubic_to(cmd, args),
            'S' | 's' => self.cubic_smooth_to(cmd, args),
            'Q' | 'q' => self.quad_to(cmd, args),
            'T' | 't' => self.quad_smooth_to(cmd, args),
            'Z' | 'z' => self.close(cmd, args),
            'A' | 'a' => Err(Error::NotImplemented(cmd)),
            _ => Err(Error::InvalidCommand(cmd)),
        }
    }

    /// Append point, normal is computed from the direction of the incoming segment
    fn add_point(&mut self, position: Vector) {
        let normal = match self.points.last() {
            None => Vector::ZERO,
            // zero length segment keeps direction of the previous one
            Some(prev) => (position - prev.position)
                .perp()
                .normalize()
                .unwrap_or(prev.normal),
        };
        self.push(Point { position, normal });
    }

    fn push(&mut self, point: Point) {
        self.bbox = self.bbox.extend(point.position);
        self.position = point.position;
        self.points.push(point);
    }

    /// Resolve possibly relative coordinates against current position
    fn resolve(&self, cmd: char, x: Scalar, y: Scalar) -> Vector {
        let point = Vector::new(x, y);
        if cmd.is_ascii_lowercase() {
            self.position + point
        } else {
            point
        }
    }

    fn move_to(&mut self, cmd: char, args: &str) -> Result<(), Error> {
        let values = args_with_arity(cmd, args, 2)?;
        let mut pairs = values.chunks_exact(2);
        if let Some(&[x, y]) = pairs.next() {
            let position = if self.first && self.points.is_empty() {
                Vector::new(x, y)
            } else {
                self.resolve(cmd, x, y)
            };
            self.start = self.points.len();
            self.push(Point {
                position,
                normal: Vector::ZERO,
            });
        }
        // following pairs are implicit lineto commands, last control point is kept
        for pair in pairs {
            let point = self.resolve(cmd, pair[0], pair[1]);
            self.add_point(point);
        }
        Ok(())
    }

    fn line_to(&mut self, cmd: char, args: &str) -> Result<(), Error> {
        for pair in args_with_arity(cmd, args, 2)?.chunks_exact(2) {
            let point = self.resolve(cmd, pair[0], pair[1]);
            self.add_point(point);
        }
        self.last_control = self.position;
        Ok(())
    }

    fn horizontal_to(&mut self, cmd: char, args: &str) -> Result<(), Error> {
        for x in args_with_arity(cmd, args, 1)? {
            let x = if cmd == 'h' { self.position.x() + x } else { x };
            self.add_point(Vector::new(x, self.position.y()));
        }
        self.last_control = self.position;
        Ok(())
    }

    fn vertical_to(&mut self, cmd: char, args: &str) -> Result<(), Error> {
        for y in args_with_arity(cmd, args, 1)? {
            let y = if cmd == 'v' { self.position.y() + y } else { y };
            self.add_point(Vector::new(self.position.x(), y));
        }
        self.last_control = self.position;
        Ok(())
    }

    fn add_curve(&mut self, curve: &impl Curve) {
        for point in curve.samples(self.resolution) {
            self.add_point(point);
        }
    }

    fn cubic_to(&mut self, cmd: char, args: &str) -> Result<(), Error> {
        for group in args_with_arity(cmd, args, 6)?.chunks_exact(6) {
            let cubic = Cubic::new(
                self.position,
                self.resolve(cmd, group[0], group[1]),
                self.resolve(cmd, group[2], group[3]),
                self.resolve(cmd, group[4], group[5]),
            );
            self.add_curve(&cubic);
            self.last_control = cubic.points()[2];
        }
        Ok(())
    }

    fn cubic_smooth_to(&mut self, cmd: char, args: &str) -> Result<(), Error> {
        for group in args_with_arity(cmd, args, 4)?.chunks_exact(4) {
            let cubic = Cubic::new(
                self.position,
                self.position.reflect(self.last_control),
                self.resolve(cmd, group[0], group[1]),
                self.resolve(cmd, group[2], group[3]),
            );
            self.add_curve(&cubic);
            self.last_control = cubic.points()[2];
        }
        Ok(())
    }

    fn quad_to(&mut self, cmd: char, args: &str) -> Result<(), Error> {
        for group in args_with_arity(cmd, args, 4)?.chunks_exact(4) {
            let quad = Quad::new(
                self.position,
                self.resolve(cmd, group[0], group[1]),
                self.resolve(cmd, group[2], group[3]),
            );
            self.add_curve(&quad);
            self.last_control = quad.points()[1];
        }
        Ok(())
    }

    fn quad_smooth_to(&mut self, cmd: char, args: &str) -> Result<(), Error> {
        for group in args_with_arity(cmd, args, 2)?.chunks_exact(2) {
            let quad = Quad::new(
                self.position,
                self.position.reflect(self.last_control),
                self.resolve(cmd, group[0], group[1]),
            );
            self.add_curve(&quad);
            self.last_control = quad.points()[1];
        }
        Ok(())
    }

    fn close(&mut self, cmd: char, args: &str) -> Result<(), Error> {
        if !parse_args(cmd, args)?.is_empty() {
            return Err(Error::InvalidPathData {
                command: Some(cmd),
                reason: "close path does not accept arguments".to_owned(),
            });
        }
        let Some(start) = self.points.get(self.start).map(|point| point.position) else {
            return Ok(());
        };
        if !self.position.is_close_to(start) {
            self.add_point(start);
            let normal = self.points[self.points.len() - 1].normal;
            self.points[self.start].normal = normal;
        }
        Ok(())
    }
}

/// Parse arguments making sure they form non-empty groups of `arity` values
fn args_with_arity(cmd: char, args: &str, arity: usize) -> Result<Vec<Scalar>, Error> {
    let values = parse_args(cmd, args)?;
    if values.is_empty() || values.len() % arity != 0 {
        return Err(Error::InvalidPathData {
            command: Some(cmd),
            reason: format!(
                "expected arguments in groups of {}, found {}",
                arity,
                values.len()
            ),
        });
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_approx_eq;

    fn trace(segments: &[&str]) -> Result<Tracer, Error> {
        let mut tracer = Tracer::new(1.0, Vector::ZERO, true);
        for segment in segments {
            tracer.trace(segment)?;
        }
        Ok(tracer)
    }

    #[test]
    fn test_lines() -> Result<(), Error> {
        let tracer = trace(&["M0,0", "L10,0"])?;
        let points = tracer.points();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0], Point::new((0.0, 0.0), (0.0, 0.0)));
        assert_eq!(points[1], Point::new((10.0, 0.0), (0.0, 1.0)));

        let tracer = trace(&["M1,1", "h2", "v3", "H0", "V0", "l1-1"])?;
        let positions: Vec<_> = tracer.points().iter().map(|p| p.position).collect();
        assert_eq!(
            positions,
            vec![
                Vector::new(1.0, 1.0),
                Vector::new(3.0, 1.0),
                Vector::new(3.0, 4.0),
                Vector::new(0.0, 4.0),
                Vector::new(0.0, 0.0),
                Vector::new(1.0, -1.0),
            ]
        );
        let bbox = tracer.bbox();
        assert_eq!(bbox.min(), Vector::new(0.0, -1.0));
        assert_eq!(bbox.max(), Vector::new(3.0, 4.0));
        Ok(())
    }

    #[test]
    fn test_move_to() -> Result<(), Error> {
        // extra pairs are implicit linetos
        let tracer = trace(&["m1,1 2,0 0,2"])?;
        let positions: Vec<_> = tracer.points().iter().map(|p| p.position).collect();
        assert_eq!(
            positions,
            vec![
                Vector::new(1.0, 1.0),
                Vector::new(3.0, 1.0),
                Vector::new(3.0, 3.0)
            ]
        );

        // first relative moveto of a path is anchored at absolute origin
        let mut tracer = Tracer::new(1.0, (5.0, 5.0), true);
        tracer.trace("m1,1")?;
        assert_eq!(tracer.position(), Vector::new(1.0, 1.0));

        // otherwise it is relative to the origin
        let mut tracer = Tracer::new(1.0, (5.0, 5.0), false);
        tracer.trace("m1,1")?;
        assert_eq!(tracer.position(), Vector::new(6.0, 6.0));
        tracer.trace("M0,0")?;
        assert_eq!(tracer.position(), Vector::new(0.0, 0.0));
        assert_eq!(tracer.points()[1].normal, Vector::ZERO);
        Ok(())
    }

    #[test]
    fn test_close() -> Result<(), Error> {
        let tracer = trace(&["M0,0", "L10,0", "L10,10", "L0,10", "Z"])?;
        let points = tracer.points();
        assert_eq!(points.len(), 5);
        assert_eq!(points[4].position, points[0].position);
        // closing segment goes up, first point takes its normal
        assert_eq!(points[4].normal, Vector::new(1.0, 0.0));
        assert_eq!(points[0].normal, points[4].normal);
        assert_eq!(tracer.position(), Vector::new(0.0, 0.0));

        // already closed
        let tracer = trace(&["M0,0", "L10,0", "L0,0", "z"])?;
        assert_eq!(tracer.points().len(), 3);
        assert_eq!(tracer.points()[0].normal, Vector::ZERO);
        Ok(())
    }

    #[test]
    fn test_zero_length_segment() -> Result<(), Error> {
        let tracer = trace(&["M0,0", "L10,0", "L10,0"])?;
        let points = tracer.points();
        assert_eq!(points.len(), 3);
        assert_eq!(points[2].normal, points[1].normal);
        assert!(points.iter().all(|p| !p.normal.x().is_nan()));
        Ok(())
    }

    #[test]
    fn test_degenerate_quad() -> Result<(), Error> {
        for resolution in [0.25, 1.0, 4.0] {
            let mut tracer = Tracer::new(resolution, Vector::ZERO, true);
            tracer.trace("M0,0")?;
            tracer.trace("Q50,0 100,0")?;
            let points = tracer.points();
            assert!(points.len() > 2);
            for point in points {
                assert_approx_eq!(point.position.y(), 0.0, 1e-9);
            }
            assert_eq!(tracer.position(), Vector::new(100.0, 0.0));
        }
        Ok(())
    }

    #[test]
    fn test_curve_resolution() -> Result<(), Error> {
        let count = |resolution| -> Result<usize, Error> {
            let mut tracer = Tracer::new(resolution, Vector::ZERO, true);
            tracer.trace("M0,0")?;
            tracer.trace("C0,10 10,10 10,0")?;
            assert_eq!(tracer.position(), Vector::new(10.0, 0.0));
            Ok(tracer.points().len())
        };
        let coarse = count(1.0)?;
        let fine = count(8.0)?;
        assert!(coarse > 2);
        assert!(fine > 4 * coarse);
        Ok(())
    }

    #[test]
    fn test_smooth_cubic() -> Result<(), Error> {
        let tracer = trace(&["M0,0", "C0,10 10,10 20,10"])?;
        assert_eq!(tracer.last_control, Vector::new(10.0, 10.0));
        assert_eq!(
            tracer.position().reflect(tracer.last_control),
            Vector::new(30.0, 10.0)
        );

        // reflected control point (30, 10) pulls the curve above the chord
        let mut tracer = tracer;
        let before = tracer.points().len();
        tracer.trace("S30,0 40,0")?;
        assert_eq!(tracer.position(), Vector::new(40.0, 0.0));
        let sampled = &tracer.points()[before..];
        let expected = Cubic::new((20.0, 10.0), (30.0, 10.0), (30.0, 0.0), (40.0, 0.0));
        let step = expected.samples(1.0).step();
        let first = sampled[0].position;
        assert!(first.is_close_to(expected.at(step)));
        assert_eq!(tracer.last_control, Vector::new(30.0, 0.0));

        // relative form gives the same result
        let mut relative = trace(&["M0,0", "c0,10 10,10 20,10"])?;
        relative.trace("s10-10 20-10")?;
        assert_eq!(relative.points().len(), tracer.points().len());
        assert!(relative.position().is_close_to(tracer.position()));
        Ok(())
    }

    #[test]
    fn test_smooth_quad() -> Result<(), Error> {
        let tracer = trace(&["M0,0", "Q5,10 10,0", "T20,0"])?;
        assert_eq!(tracer.last_control, Vector::new(15.0, -10.0));
        assert!(tracer.points().iter().any(|p| p.position.y() < -1.0));

        // after a line reflection has no offset
        let tracer = trace(&["M0,0", "L10,0", "T20,0"])?;
        assert_eq!(tracer.last_control, Vector::new(10.0, 0.0));
        for point in tracer.points() {
            assert_approx_eq!(point.position.y(), 0.0, 1e-9);
        }
        Ok(())
    }

    #[test]
    fn test_smooth_after_move() -> Result<(), Error> {
        // moveto keeps last control point, which starts at the origin
        let tracer = trace(&["M10,10"])?;
        assert_eq!(tracer.last_control, Vector::ZERO);
        let mut tracer = tracer;
        tracer.trace("S20,0 30,10")?;
        let expected = Cubic::new((10.0, 10.0), (20.0, 20.0), (20.0, 0.0), (30.0, 10.0));
        let step = expected.samples(1.0).step();
        assert!(tracer.points()[1].position.is_close_to(expected.at(step)));
        assert_eq!(tracer.position(), Vector::new(30.0, 10.0));

        // later sections start with the control point at their origin
        let mut tracer = Tracer::new(1.0, (5.0, 5.0), false);
        tracer.trace("M10,10")?;
        assert_eq!(tracer.last_control, Vector::new(5.0, 5.0));
        Ok(())
    }

    #[test]
    fn test_smooth_after_close() -> Result<(), Error> {
        let mut tracer = trace(&["M0,0", "C0,10 10,10 20,10", "Z"])?;
        assert_eq!(tracer.position(), Vector::new(0.0, 0.0));
        assert_eq!(tracer.last_control, Vector::new(10.0, 10.0));
        tracer.trace("S-20,-10 -30,0")?;
        assert_eq!(tracer.last_control, Vector::new(-20.0, -10.0));
        assert_eq!(tracer.position(), Vector::new(-30.0, 0.0));
        // reflected control point (-10, -10) pulls the curve below the chord
        assert!(tracer.points().iter().any(|p| p.position.y() < -5.0));
        Ok(())
    }

    #[test]
    fn test_errors() {
        let mut tracer = Tracer::new(1.0, Vector::ZERO, true);
        assert_eq!(tracer.trace("A1,1 0 0 1 5,5"), Err(Error::NotImplemented('A')));
        assert_eq!(tracer.trace("a1,1 0 0 1 5,5"), Err(Error::NotImplemented('a')));
        assert_eq!(tracer.trace("X1,1"), Err(Error::InvalidCommand('X')));
        for segment in ["L1", "C1,2,3,4,5", "H", "M1,2,3", "Z1", "Q1-"] {
            let command = segment.chars().next();
            match tracer.trace(segment) {
                Err(Error::InvalidPathData { command: found, .. }) if found == command => {}
                result => panic!("{:?} should fail, got {:?}", segment, result),
            }
        }
    }
}
