use crate::*;
use bon::bon;

/// Placement affinity of a block within the final bounding box.
///
/// Corner variants are near-hard (enforced exactly by post-processing),
/// quadrant and center variants are soft, `DontCare` is unconstrained.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    TopLeftCorner,
    TopLeftQuad,
    TopRightCorner,
    TopRightQuad,
    BottomLeftCorner,
    BottomLeftQuad,
    BottomRightCorner,
    BottomRightQuad,
    Center,
    #[default]
    DontCare,
}
impl Location {
    /// Parses the textual tags used by case files. Legacy corner aliases
    /// (`top-left`, ...) normalize to the corner variants; anything
    /// unrecognized falls back to `DontCare`.
    pub fn parse(tag: &str) -> Self {
        match tag {
            "top-left-corner" | "top-left" => Self::TopLeftCorner,
            "top-left-quad" => Self::TopLeftQuad,
            "top-right-corner" | "top-right" => Self::TopRightCorner,
            "top-right-quad" => Self::TopRightQuad,
            "bottom-left-corner" | "bottom-left" => Self::BottomLeftCorner,
            "bottom-left-quad" => Self::BottomLeftQuad,
            "bottom-right-corner" | "bottom-right" => Self::BottomRightCorner,
            "bottom-right-quad" => Self::BottomRightQuad,
            "center" => Self::Center,
            _ => Self::DontCare,
        }
    }
    pub fn is_corner(&self) -> bool {
        matches!(
            self,
            Self::TopLeftCorner
                | Self::TopRightCorner
                | Self::BottomLeftCorner
                | Self::BottomRightCorner
        )
    }
    pub fn is_quad(&self) -> bool {
        matches!(
            self,
            Self::TopLeftQuad | Self::TopRightQuad | Self::BottomLeftQuad | Self::BottomRightQuad
        )
    }
    /// Corner and center blocks are pinned by dedicated machinery and skipped
    /// by the greedy compaction sweeps.
    pub fn is_strict(&self) -> bool {
        self.is_corner() || *self == Self::Center
    }
}
impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let tag = match self {
            Self::TopLeftCorner => "top-left-corner",
            Self::TopLeftQuad => "top-left-quad",
            Self::TopRightCorner => "top-right-corner",
            Self::TopRightQuad => "top-right-quad",
            Self::BottomLeftCorner => "bottom-left-corner",
            Self::BottomLeftQuad => "bottom-left-quad",
            Self::BottomRightCorner => "bottom-right-corner",
            Self::BottomRightQuad => "bottom-right-quad",
            Self::Center => "center",
            Self::DontCare => "don't care",
        };
        write!(f, "{}", tag)
    }
}

/// A named rectangle to place. `width`/`height` reflect the current
/// orientation; the `original_*` pair restores it after rotations.
#[derive(Debug, Clone)]
pub struct Block {
    pub name: String,
    pub width: float,
    pub height: float,
    pub original_width: float,
    pub original_height: float,
    pub location: Location,
    /// Name of a block this one should abut. May chain transitively and may
    /// reference a name that is absent from the run (soft, unsatisfiable).
    pub neighbor: Option<String>,
    pub x: float,
    pub y: float,
    pub rotated: bool,
}
#[bon]
impl Block {
    #[builder]
    pub fn new(
        #[builder(into)] name: String,
        width: float,
        height: float,
        #[builder(default)] location: Location,
        #[builder(into)] neighbor: Option<String>,
    ) -> Self {
        Self {
            name,
            width,
            height,
            original_width: width,
            original_height: height,
            location,
            neighbor,
            x: 0.0,
            y: 0.0,
            rotated: false,
        }
    }
    /// Rotates 90 degrees by swapping the current dimensions. Involutive.
    pub fn rotate(&mut self) {
        std::mem::swap(&mut self.width, &mut self.height);
        self.rotated = !self.rotated;
    }
    pub fn reset_rotation(&mut self) {
        if self.rotated {
            self.rotate();
        }
    }
    pub fn area(&self) -> float {
        self.width * self.height
    }
    pub fn rect(&self) -> Rect {
        Rect::from_size(self.x, self.y, self.width, self.height)
    }
    pub fn center(&self) -> Vector2 {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
    pub fn overlaps(&self, other: &Block) -> bool {
        self.rect().overlaps(&other.rect())
    }
    pub fn abuts(&self, other: &Block) -> bool {
        self.rect().abuts(&other.rect())
    }
}
impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Block({}, {}x{}, pos=({}, {}){})",
            self.name,
            self.width,
            self.height,
            self.x,
            self.y,
            if self.rotated { ", rotated" } else { "" }
        )
    }
}

/// An owning collection of placed blocks plus the derived bounding box.
#[derive(Debug, Default, Clone)]
pub struct FloorPlan {
    pub blocks: Vec<Block>,
    pub bounding_width: float,
    pub bounding_height: float,
}
impl FloorPlan {
    pub fn add_block(&mut self, block: Block) {
        self.blocks.push(block);
    }
    pub fn get_block(&self, name: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.name == name)
    }
    /// Bounding extents computed fresh from the current positions.
    pub fn bounds(&self) -> Vector2 {
        let max_x = self
            .blocks
            .iter()
            .map(|b| OrderedFloat(b.x + b.width))
            .max()
            .map_or(0.0, |m| m.0);
        let max_y = self
            .blocks
            .iter()
            .map(|b| OrderedFloat(b.y + b.height))
            .max()
            .map_or(0.0, |m| m.0);
        (max_x, max_y)
    }
    pub fn update_bounding_box(&mut self) {
        let (w, h) = self.bounds();
        self.bounding_width = w;
        self.bounding_height = h;
    }
    pub fn area(&self) -> float {
        self.bounding_width * self.bounding_height
    }
    /// Ratio of the larger to the smaller bounding dimension; 0 when the
    /// plan is empty or degenerate.
    pub fn aspect_ratio(&self) -> float {
        let (w, h) = (self.bounding_width, self.bounding_height);
        if w <= 0.0 || h <= 0.0 {
            return 0.0;
        }
        (w / h).max(h / w)
    }
    pub fn has_overlaps(&self) -> bool {
        self.blocks
            .iter()
            .tuple_combinations()
            .any(|(a, b)| a.overlaps(b))
    }
    /// Index pairs of overlapping blocks, for diagnostics and repair.
    pub fn overlapping_pairs(&self) -> Vec<(usize, usize)> {
        (0..self.blocks.len())
            .tuple_combinations()
            .filter(|&(i, j)| self.blocks[i].overlaps(&self.blocks[j]))
            .collect()
    }
}
impl fmt::Display for FloorPlan {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "FloorPlan({} blocks, {}x{})",
            self.blocks.len(),
            self.bounding_width,
            self.bounding_height
        )
    }
}
