//! HeightIndex - O(log n) prefix sums and lower_bound via Fenwick tree
//!
//! Provides efficient operations for computing cumulative row heights and
//! finding rows by vertical offset (scroll position).
//!
//! # Complexity
//!
//! - `prefix_sum`: O(log n)
//! - `lower_bound`: O(log² n)
//! - `push`: O(log n)
//! - `truncate`: O(k log n) for k removed rows
//! - `total`: O(log n)
//! - `len`: O(1)

/// HeightIndex wraps a Fenwick tree for O(log n) prefix sum queries and updates.
///
/// Keeps the raw heights alongside the tree so single heights are O(1) and
/// truncation can subtract exactly what each removed row contributed.
#[derive(Debug, Clone, Default)]
pub struct HeightIndex {
    /// Fenwick tree backing storage (0-indexed API over the `fenwick` crate).
    tree: Vec<isize>,
    /// Height of each measured row.
    heights: Vec<usize>,
}

impl HeightIndex {
    /// Creates a new HeightIndex with the given initial capacity.
    ///
    /// # Examples
    ///
    /// ```
    /// # use runlog::view_state::height_index::HeightIndex;
    /// let index = HeightIndex::new(100);
    /// assert_eq!(index.len(), 0);
    /// assert_eq!(index.total(), 0);
    /// ```
    pub fn new(capacity: usize) -> Self {
        Self {
            tree: vec![0; capacity],
            heights: Vec::with_capacity(capacity),
        }
    }

    /// Height of a single row.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn height(&self, index: usize) -> usize {
        self.heights[index]
    }

    /// Returns the cumulative height up to and including the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use runlog::view_state::height_index::HeightIndex;
    /// let mut index = HeightIndex::new(10);
    /// index.push(3);
    /// index.push(4);
    /// index.push(5);
    /// assert_eq!(index.prefix_sum(0), 3);
    /// assert_eq!(index.prefix_sum(1), 7);
    /// assert_eq!(index.prefix_sum(2), 12);
    /// ```
    pub fn prefix_sum(&self, index: usize) -> usize {
        assert!(
            index < self.len(),
            "index {} out of bounds (len: {})",
            index,
            self.len()
        );

        let sum = fenwick::array::prefix_sum(&self.tree, index);
        sum.max(0) as usize
    }

    /// Binary search for the first index where `prefix_sum(index) > value`.
    ///
    /// Returns the row containing vertical offset `value`, or `None` if
    /// `value >= total()` or the index is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use runlog::view_state::height_index::HeightIndex;
    /// let mut index = HeightIndex::new(10);
    /// index.push(10);  // [0..10)
    /// index.push(20);  // [10..30)
    /// index.push(15);  // [30..45)
    ///
    /// assert_eq!(index.lower_bound(0), Some(0));
    /// assert_eq!(index.lower_bound(10), Some(1));
    /// assert_eq!(index.lower_bound(30), Some(2));
    /// assert_eq!(index.lower_bound(100), None);
    /// ```
    pub fn lower_bound(&self, value: usize) -> Option<usize> {
        if self.is_empty() {
            return None;
        }

        // Row i covers [prefix_sum(i-1), prefix_sum(i))
        let mut left = 0;
        let mut right = self.len();

        while left < right {
            let mid = left + (right - left) / 2;
            if self.prefix_sum(mid) > value {
                right = mid;
            } else {
                left = mid + 1;
            }
        }

        if left >= self.len() {
            None
        } else {
            Some(left)
        }
    }

    /// Returns the total cumulative height of all rows.
    pub fn total(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.prefix_sum(self.len() - 1)
        }
    }

    /// Returns the number of measured rows.
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// Returns true if no rows are measured.
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Appends a new row with the given height.
    ///
    /// Grows the backing storage if necessary.
    pub fn push(&mut self, height: usize) {
        if self.heights.len() >= self.tree.len() {
            self.grow();
        }

        let idx = self.heights.len();
        self.heights.push(height);
        fenwick::array::update(&mut self.tree, idx, height as isize);
    }

    /// Drops every row from `len` onward. No-op if `len >= self.len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use runlog::view_state::height_index::HeightIndex;
    /// let mut index = HeightIndex::new(4);
    /// for h in [1, 2, 3, 4] {
    ///     index.push(h);
    /// }
    /// index.truncate(2);
    /// assert_eq!(index.total(), 3);
    /// index.push(10);
    /// assert_eq!(index.total(), 13);
    /// ```
    pub fn truncate(&mut self, len: usize) {
        while self.heights.len() > len {
            let idx = self.heights.len() - 1;
            let height = self.heights[idx];
            if height != 0 {
                fenwick::array::update(&mut self.tree, idx, -(height as isize));
            }
            self.heights.pop();
        }
    }

    /// Double the tree, rebuilding it so upper nodes cover existing rows.
    fn grow(&mut self) {
        let capacity = self.tree.len().max(1) * 2;
        self.tree = vec![0; capacity];
        for (i, &h) in self.heights.iter().enumerate() {
            fenwick::array::update(&mut self.tree, i, h as isize);
        }
    }
}
