//! Cartesian product of scan axes

use super::ScanAxis;

/// Iterator over every combination of one offset per axis.
///
/// Dimension 0 varies fastest, dimension `N - 1` slowest. For `[x, y]`
/// axes this is raster order.
#[derive(Debug, Clone)]
pub struct CartesianProduct<'a, const N: usize> {
    axes: &'a [ScanAxis; N],
    cursor: [usize; N],
    done: bool,
}

/// Combine `N` axes into the positions of a dense grid.
pub fn cartesian_product<const N: usize>(axes: &[ScanAxis; N]) -> CartesianProduct<'_, N> {
    CartesianProduct {
        axes,
        cursor: [0; N],
        done: axes.iter().any(ScanAxis::is_empty),
    }
}

impl<const N: usize> CartesianProduct<'_, N> {
    fn remaining(&self) -> usize {
        if self.done {
            return 0;
        }
        // Mixed-radix distance from the cursor to the end
        let mut consumed = 0;
        let mut radix = 1;
        for (dim, axis) in self.axes.iter().enumerate() {
            consumed += self.cursor[dim] * radix;
            radix *= axis.len();
        }
        radix - consumed
    }
}

impl<const N: usize> Iterator for CartesianProduct<'_, N> {
    type Item = [usize; N];

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut position = [0; N];
        for (dim, slot) in position.iter_mut().enumerate() {
            *slot = self.axes[dim].offsets()[self.cursor[dim]];
        }

        // Advance like an odometer, lowest dimension first
        self.done = true;
        for dim in 0..N {
            self.cursor[dim] += 1;
            if self.cursor[dim] < self.axes[dim].len() {
                self.done = false;
                break;
            }
            self.cursor[dim] = 0;
        }

        Some(position)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl<const N: usize> ExactSizeIterator for CartesianProduct<'_, N> {}

impl<const N: usize> std::iter::FusedIterator for CartesianProduct<'_, N> {}
