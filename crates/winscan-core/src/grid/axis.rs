//! One-dimensional scan offsets

use super::GridError;

/// Ordered window offsets along one dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanAxis {
    offsets: Vec<usize>,
    extent: usize,
    bound: usize,
}

impl ScanAxis {
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Window extent the axis was sampled for
    pub fn extent(&self) -> usize {
        self.extent
    }

    /// Bound (image size) along this axis
    pub fn bound(&self) -> usize {
        self.bound
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, usize> {
        self.offsets.iter()
    }

    /// Unused pixels before the first window and after the last one.
    pub fn margins(&self) -> (usize, usize) {
        match (self.offsets.first(), self.offsets.last()) {
            (Some(&first), Some(&last)) => (first, self.bound - (last + self.extent)),
            _ => (0, self.bound),
        }
    }
}

impl<'a> IntoIterator for &'a ScanAxis {
    type Item = &'a usize;
    type IntoIter = std::slice::Iter<'a, usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.offsets.iter()
    }
}

/// Compute the offsets of a window of `extent` sliding over `size` at `stride`.
///
/// The samples are `0, stride, 2 * stride, ...` up to the last window that
/// still fits, then shifted together by half of the remaining margin so the
/// scan is centered. When `size - extent` is not a multiple of `stride` the
/// last window does not reach the far edge.
pub fn compute_axis(size: usize, extent: usize, stride: usize) -> Result<ScanAxis, GridError> {
    if extent == 0 {
        return Err(GridError::ZeroExtent);
    }
    if stride == 0 {
        return Err(GridError::ZeroStride);
    }
    if extent > size {
        return Err(GridError::WindowExceedsBound { size, extent });
    }

    let count = (size - extent) / stride + 1;
    let last = (count - 1) * stride;
    let leftover = (size - extent - last) / 2;

    let offsets = (0..count).map(|i| i * stride + leftover).collect();

    Ok(ScanAxis {
        offsets,
        extent,
        bound: size,
    })
}
