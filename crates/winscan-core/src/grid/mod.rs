//! Dense grid sampling of window anchors

pub mod axis;
pub mod product;

pub use axis::{ScanAxis, compute_axis};
pub use product::{CartesianProduct, cartesian_product};

use thiserror::Error;

/// Invalid grid request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("window extent must be > 0")]
    ZeroExtent,

    #[error("stride must be > 0")]
    ZeroStride,

    #[error("window extent {extent} exceeds bound {size}")]
    WindowExceedsBound { size: usize, extent: usize },

    #[error("dimension {dim}: {source}")]
    Dimension {
        dim: usize,
        #[source]
        source: Box<GridError>,
    },
}

/// All window anchors to evaluate at one scale, over `N` dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanGrid<const N: usize> {
    axes: [ScanAxis; N],
}

impl<const N: usize> ScanGrid<N> {
    /// Sample every dimension independently with [`compute_axis`].
    pub fn new(
        bounds: [usize; N],
        extents: [usize; N],
        strides: [usize; N],
    ) -> Result<Self, GridError> {
        let mut axes: [ScanAxis; N] = std::array::from_fn(|_| ScanAxis::default());
        for (dim, axis) in axes.iter_mut().enumerate() {
            *axis = compute_axis(bounds[dim], extents[dim], strides[dim]).map_err(|e| {
                GridError::Dimension {
                    dim,
                    source: Box::new(e),
                }
            })?;
        }

        Ok(Self { axes })
    }

    /// Build from precomputed axes
    pub fn from_axes(axes: [ScanAxis; N]) -> Self {
        Self { axes }
    }

    pub fn axes(&self) -> &[ScanAxis; N] {
        &self.axes
    }

    pub fn axis(&self, dim: usize) -> &ScanAxis {
        &self.axes[dim]
    }

    /// Number of anchors in the grid
    pub fn len(&self) -> usize {
        self.axes.iter().map(ScanAxis::len).product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate anchors with dimension 0 varying fastest.
    pub fn positions(&self) -> CartesianProduct<'_, N> {
        cartesian_product(&self.axes)
    }
}

impl<'a, const N: usize> IntoIterator for &'a ScanGrid<N> {
    type Item = [usize; N];
    type IntoIter = CartesianProduct<'a, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.positions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_2d_raster_order() {
        let grid = ScanGrid::new([30, 25], [10, 10], [10, 5]).unwrap();
        assert_eq!(grid.axis(0).offsets(), &[0, 10, 20]);
        assert_eq!(grid.axis(1).offsets(), &[0, 5, 10, 15]);
        assert_eq!(grid.len(), 12);

        let positions: Vec<[usize; 2]> = grid.positions().collect();
        assert_eq!(positions.len(), 12);
        assert_eq!(positions[0], [0, 0]);
        assert_eq!(positions[1], [10, 0]);
        assert_eq!(positions[2], [20, 0]);
        assert_eq!(positions[3], [0, 5]);
        assert_eq!(positions[11], [20, 15]);
    }

    #[test]
    fn test_grid_3d_count() {
        let grid = ScanGrid::new([16, 16, 8], [8, 8, 4], [4, 4, 2]).unwrap();
        assert_eq!(grid.len(), 3 * 3 * 3);
        assert_eq!(grid.positions().count(), 27);
        assert_eq!(grid.positions().last(), Some([8, 8, 4]));
    }

    #[test]
    fn test_grid_reports_failing_dimension() {
        let err = ScanGrid::new([100, 10], [20, 20], [10, 10]).unwrap_err();
        assert_eq!(
            err,
            GridError::Dimension {
                dim: 1,
                source: Box::new(GridError::WindowExceedsBound {
                    size: 10,
                    extent: 20
                }),
            }
        );
        assert!(err.to_string().contains("dimension 1"));
    }

    #[test]
    fn test_grid_iterates_by_reference() {
        let grid = ScanGrid::new([20], [10], [5]).unwrap();
        let xs: Vec<usize> = (&grid).into_iter().map(|[x]| x).collect();
        assert_eq!(xs, vec![0, 5, 10]);
    }
}
