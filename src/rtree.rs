use crate::*;

/// Spatial index over block centers, used for proximity queries during the
/// density-driven packing pass.
#[derive(Default, Debug, Clone)]
pub struct PointTree {
    tree: RTree<GeomWithData<[float; 2], usize>>,
}
impl PointTree {
    pub fn from_points<T>(points: T) -> Self
    where
        T: IntoIterator<Item = (usize, Vector2)>,
    {
        Self {
            tree: RTree::bulk_load(
                points
                    .into_iter()
                    .map(|(id, p)| GeomWithData::new([p.0, p.1], id))
                    .collect(),
            ),
        }
    }
    pub fn count_within(&self, p: Vector2, radius: float) -> usize {
        self.tree
            .locate_within_distance([p.0, p.1], radius * radius)
            .count()
    }
    pub fn size(&self) -> usize {
        self.tree.size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_within_radius() {
        let tree = PointTree::from_points([
            (0, (0.0, 0.0)),
            (1, (3.0, 4.0)),   // distance 5
            (2, (30.0, 40.0)), // distance 50
        ]);
        assert_eq!(tree.size(), 3);
        assert_eq!(tree.count_within((0.0, 0.0), 10.0), 2);
        assert_eq!(tree.count_within((0.0, 0.0), 100.0), 3);
        assert_eq!(tree.count_within((100.0, 100.0), 1.0), 0);
    }
}
