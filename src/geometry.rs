use crate::*;

#[derive(Debug, Default, Clone, Copy, PartialEq, new)]
pub struct Rect {
    xmin: float,
    ymin: float,
    xmax: float,
    ymax: float,
}
impl Rect {
    pub fn from_size(xmin: float, ymin: float, width: float, height: float) -> Self {
        Self {
            xmin,
            ymin,
            xmax: xmin + width,
            ymax: ymin + height,
        }
    }
    pub fn width(&self) -> float {
        self.xmax - self.xmin
    }
    pub fn height(&self) -> float {
        self.ymax - self.ymin
    }
    pub fn area(&self) -> float {
        self.width() * self.height()
    }
    pub fn center(&self) -> Vector2 {
        (
            (self.xmin + self.xmax) / 2.0,
            (self.ymin + self.ymax) / 2.0,
        )
    }
    pub fn bbox(&self) -> [[float; 2]; 2] {
        [[self.xmin, self.ymin], [self.xmax, self.ymax]]
    }
    /// Strict interior overlap. Rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.xmax <= other.xmin
            || other.xmax <= self.xmin
            || self.ymax <= other.ymin
            || other.ymax <= self.ymin)
    }
    /// Edge-to-edge adjacency: the shared edge must have a nonzero projection
    /// overlap on the perpendicular axis.
    pub fn abuts(&self, other: &Rect) -> bool {
        let horizontal = (self.xmax == other.xmin || other.xmax == self.xmin)
            && !(self.ymax <= other.ymin || other.ymax <= self.ymin);
        let vertical = (self.ymax == other.ymin || other.ymax == self.ymin)
            && !(self.xmax <= other.xmin || other.xmax <= self.xmin);
        horizontal || vertical
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_is_strict() {
        let a = Rect::from_size(0.0, 0.0, 10.0, 10.0);
        let b = Rect::from_size(10.0, 0.0, 10.0, 10.0);
        let c = Rect::from_size(9.0, 9.0, 5.0, 5.0);
        assert!(!a.overlaps(&b)); // touching edges only
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&a));
    }

    #[test]
    fn test_abutment_requires_projection_overlap() {
        let a = Rect::from_size(0.0, 0.0, 10.0, 10.0);
        let right = Rect::from_size(10.0, 5.0, 4.0, 4.0);
        let below = Rect::from_size(3.0, 10.0, 4.0, 4.0);
        let diagonal = Rect::from_size(10.0, 10.0, 4.0, 4.0);
        let apart = Rect::from_size(11.0, 0.0, 4.0, 4.0);
        assert!(a.abuts(&right));
        assert!(a.abuts(&below));
        assert!(!a.abuts(&diagonal)); // corner contact only
        assert!(!a.abuts(&apart));
    }
}
