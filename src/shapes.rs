//! Polyomino catalog: one square bitmap per rotation state, fixed 90° steps.

/// A square bitmap, row-major, `size * size` entries of 0/1.
pub type Bitmap = &'static [u8];

/// One polyomino: bitmap side length and its rotation states in clockwise order.
#[derive(Debug)]
pub struct ShapeType {
    pub size: usize,
    pub rotations: &'static [Bitmap],
}

#[rustfmt::skip]
pub static SHAPE_TYPES: [ShapeType; 7] = [
    // T
    ShapeType { size: 3, rotations: &[
        &[0, 1, 0,
          1, 1, 1,
          0, 0, 0],
        &[0, 1, 0,
          0, 1, 1,
          0, 1, 0],
        &[0, 0, 0,
          1, 1, 1,
          0, 1, 0],
        &[0, 1, 0,
          1, 1, 0,
          0, 1, 0],
    ]},
    // J
    ShapeType { size: 3, rotations: &[
        &[1, 0, 0,
          1, 1, 1,
          0, 0, 0],
        &[0, 1, 1,
          0, 1, 0,
          0, 1, 0],
        &[0, 0, 0,
          1, 1, 1,
          0, 0, 1],
        &[0, 1, 0,
          0, 1, 0,
          1, 1, 0],
    ]},
    // L
    ShapeType { size: 3, rotations: &[
        &[0, 0, 1,
          1, 1, 1,
          0, 0, 0],
        &[0, 1, 0,
          0, 1, 0,
          0, 1, 1],
        &[0, 0, 0,
          1, 1, 1,
          1, 0, 0],
        &[1, 1, 0,
          0, 1, 0,
          0, 1, 0],
    ]},
    // S
    ShapeType { size: 3, rotations: &[
        &[0, 1, 1,
          1, 1, 0,
          0, 0, 0],
        &[0, 1, 0,
          0, 1, 1,
          0, 0, 1],
        &[0, 0, 0,
          0, 1, 1,
          1, 1, 0],
        &[1, 0, 0,
          1, 1, 0,
          0, 1, 0],
    ]},
    // Z
    ShapeType { size: 3, rotations: &[
        &[1, 1, 0,
          0, 1, 1,
          0, 0, 0],
        &[0, 0, 1,
          0, 1, 1,
          0, 1, 0],
        &[0, 0, 0,
          1, 1, 0,
          0, 1, 1],
        &[0, 1, 0,
          1, 1, 0,
          1, 0, 0],
    ]},
    // O
    ShapeType { size: 2, rotations: &[
        &[1, 1,
          1, 1],
    ]},
    // I
    ShapeType { size: 4, rotations: &[
        &[0, 0, 0, 0,
          1, 1, 1, 1,
          0, 0, 0, 0,
          0, 0, 0, 0],
        &[0, 0, 1, 0,
          0, 0, 1, 0,
          0, 0, 1, 0,
          0, 0, 1, 0],
        &[0, 0, 0, 0,
          0, 0, 0, 0,
          1, 1, 1, 1,
          0, 0, 0, 0],
        &[0, 1, 0, 0,
          0, 1, 0, 0,
          0, 1, 0, 0,
          0, 1, 0, 0],
    ]},
];

/// Polyomino kinds, in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    T,
    J,
    L,
    S,
    Z,
    O,
    I,
}

/// Tight bounding box of a bitmap's filled cells, in bitmap cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl ShapeKind {
    pub const ALL: [Self; 7] = [Self::T, Self::J, Self::L, Self::S, Self::Z, Self::O, Self::I];

    pub fn shape_type(self) -> &'static ShapeType {
        &SHAPE_TYPES[self as usize]
    }

    pub fn size(self) -> usize {
        self.shape_type().size
    }

    pub fn rotation_count(self) -> usize {
        self.shape_type().rotations.len()
    }

    /// Bitmap for a rotation state. An out-of-range index is a caller bug and panics.
    pub fn bitmap(self, rotation: usize) -> Bitmap {
        let rotations = self.shape_type().rotations;
        assert!(
            rotation < rotations.len(),
            "rotation {rotation} out of range for {:?} ({} states)",
            self,
            rotations.len()
        );
        rotations[rotation]
    }

    /// Filled cells of a rotation as (column, row) inside the bitmap square.
    pub fn filled_cells(self, rotation: usize) -> impl Iterator<Item = (i32, i32)> {
        let size = self.size();
        self.bitmap(rotation)
            .iter()
            .enumerate()
            .filter(|(_, filled)| **filled != 0)
            .map(move |(i, _)| ((i % size) as i32, (i / size) as i32))
    }

    /// Tight bounding box of a rotation's filled cells.
    pub fn bounds(self, rotation: usize) -> ShapeRect {
        let (mut min_x, mut min_y) = (i32::MAX, i32::MAX);
        let (mut max_x, mut max_y) = (i32::MIN, i32::MIN);
        for (x, y) in self.filled_cells(rotation) {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        assert!(min_x <= max_x, "{:?} rotation {rotation} has no filled cells", self);
        ShapeRect {
            x: min_x,
            y: min_y,
            w: max_x - min_x + 1,
            h: max_y - min_y + 1,
        }
    }
}

/// Check the static catalog: square bitmaps, 0/1 entries, four cells per rotation.
/// Panics on the first malformed entry.
pub fn validate_catalog() {
    for kind in ShapeKind::ALL {
        let shape = kind.shape_type();
        assert!(!shape.rotations.is_empty(), "{kind:?} has no rotations");
        for (r, bitmap) in shape.rotations.iter().enumerate() {
            assert_eq!(
                bitmap.len(),
                shape.size * shape.size,
                "{kind:?} rotation {r} is not {0}x{0}",
                shape.size
            );
            assert!(bitmap.iter().all(|&b| b <= 1), "{kind:?} rotation {r} is not 0/1");
            assert_eq!(
                kind.filled_cells(r).count(),
                4,
                "{kind:?} rotation {r} is not a tetromino"
            );
        }
    }
}
