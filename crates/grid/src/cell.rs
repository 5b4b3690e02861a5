/// A 2D cell coordinate in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
}

impl CellCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Inclusive rectangle of cells. Empty when `min` exceeds `max` on either axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub min: CellCoord,
    pub max: CellCoord,
}

impl CellRange {
    pub fn new(min: CellCoord, max: CellCoord) -> Self {
        Self { min, max }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Number of cells covered.
    pub fn len(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        let w = (self.max.x - self.min.x + 1) as usize;
        let h = (self.max.y - self.min.y + 1) as usize;
        w * h
    }

    pub fn contains(&self, coord: CellCoord) -> bool {
        (self.min.x..=self.max.x).contains(&coord.x) && (self.min.y..=self.max.y).contains(&coord.y)
    }

    /// Row-major walk over every cell in the range.
    pub fn iter(self) -> impl Iterator<Item = CellCoord> {
        (self.min.y..=self.max.y)
            .flat_map(move |y| (self.min.x..=self.max.x).map(move |x| CellCoord::new(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_iterates_row_major() {
        let r = CellRange::new(CellCoord::new(0, 0), CellCoord::new(1, 1));
        let cells: Vec<_> = r.iter().collect();
        assert_eq!(
            cells,
            vec![
                CellCoord::new(0, 0),
                CellCoord::new(1, 0),
                CellCoord::new(0, 1),
                CellCoord::new(1, 1),
            ]
        );
        assert_eq!(r.len(), 4);
    }

    #[test]
    fn inverted_range_is_empty() {
        let r = CellRange::new(CellCoord::new(3, 0), CellCoord::new(2, 5));
        assert!(r.is_empty());
        assert_eq!(r.len(), 0);
        assert_eq!(r.iter().count(), 0);
    }

    #[test]
    fn contains_is_inclusive() {
        let r = CellRange::new(CellCoord::new(1, 1), CellCoord::new(3, 2));
        assert!(r.contains(CellCoord::new(3, 2)));
        assert!(!r.contains(CellCoord::new(0, 1)));
    }
}
