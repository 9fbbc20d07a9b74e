/// Dimensions of a padded simulation grid.
///
/// `width x height` interior cells are surrounded by a one-cell ghost border,
/// so the backing buffer holds `(width + 2) x (height + 2)` cells. Interior
/// cells are addressed with `1..=width` and `1..=height`; index `0` and
/// `width + 1` (or `height + 1`) are border cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid2 {
    width: usize,
    height: usize,
}

impl Grid2 {
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0, "width must be > 0");
        assert!(height > 0, "height must be > 0");
        Self { width, height }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn full_width(&self) -> usize {
        self.width + 2
    }

    pub fn full_height(&self) -> usize {
        self.height + 2
    }

    /// Number of cells in the padded buffer.
    pub fn size(&self) -> usize {
        self.full_width() * self.full_height()
    }

    pub fn interior_size(&self) -> usize {
        self.width * self.height
    }

    pub fn idx(&self, i: usize, j: usize) -> usize {
        debug_assert!(
            i <= self.width + 1 && j <= self.height + 1,
            "cell ({i}, {j}) outside padded {}x{} grid",
            self.width,
            self.height
        );
        j * self.full_width() + i
    }

    pub fn is_interior(&self, i: usize, j: usize) -> bool {
        (1..=self.width).contains(&i) && (1..=self.height).contains(&j)
    }
}
