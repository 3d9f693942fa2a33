//! Per-pixel overlap counter.

/// One counter per canvas pixel, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageGrid {
    width: u32,
    height: u32,
    cells: Vec<u32>,
}

impl CoverageGrid {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![0; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Adds one to every in-bounds cell of the `tw x th` rectangle at `(x, y)`.
    /// Parts of the rectangle outside the grid are ignored.
    pub fn stamp(&mut self, x: u32, y: u32, tw: u32, th: u32) {
        let x_end = x.saturating_add(tw).min(self.width);
        let y_end = y.saturating_add(th).min(self.height);
        if x >= x_end || y >= y_end {
            return;
        }
        let row_len = self.width as usize;
        for row in y as usize..y_end as usize {
            let offset = row * row_len;
            for cell in &mut self.cells[offset + x as usize..offset + x_end as usize] {
                *cell = cell.saturating_add(1);
            }
        }
    }

    /// Coverage at `(x, y)`, or 0 outside the grid.
    pub fn get(&self, x: u32, y: u32) -> u32 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.cells[y as usize * self.width as usize + x as usize]
    }

    /// Sum of every cell.
    pub fn total(&self) -> u64 {
        self.cells.iter().map(|&c| u64::from(c)).sum()
    }

    pub fn max(&self) -> u32 {
        self.cells.iter().copied().max().unwrap_or(0)
    }
}
