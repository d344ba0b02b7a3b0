//! Output buffers for elementwise results
//!
//! Handlers allocate an empty buffer of the resolved shape, set each flat
//! index from an element stream, and seal the buffer into a host array.

use ndarray::{ArrayD, IxDyn};

use crate::error::{ArrayError, ArrayResult};

pub(crate) struct Buffer<T> {
    shape: Vec<usize>,
    slots: Vec<Option<T>>,
}

impl<T> Buffer<T> {
    pub fn empty(shape: &[usize]) -> Self {
        let len = shape.iter().product();
        Buffer { shape: shape.to_vec(), slots: std::iter::repeat_with(|| None).take(len).collect() }
    }

    pub fn set(&mut self, index: usize, value: T) -> ArrayResult<()> {
        let len = self.slots.len();
        let slot = self.slots.get_mut(index).ok_or_else(|| ArrayError::internal(format!("flat index {} out of range for {} elements", index, len)))?;
        *slot = Some(value);
        Ok(())
    }

    pub fn seal(self) -> ArrayResult<ArrayD<T>> {
        let filled = self.slots.len();
        let elements = self.slots.into_iter().collect::<Option<Vec<T>>>()
            .ok_or_else(|| ArrayError::internal(format!("output buffer of {} elements left partially filled", filled)))?;
        Ok(ArrayD::from_shape_vec(IxDyn(&self.shape), elements)?)
    }
}

/// Fill a buffer of `shape` by applying `f` to each item of `source`, in
/// row-major order.
pub(crate) fn fill<S, T, F>(shape: &[usize], source: S, mut f: F) -> ArrayResult<ArrayD<T>>
where
    S: IntoIterator,
    F: FnMut(S::Item) -> ArrayResult<T>,
{
    let mut buffer = Buffer::empty(shape);
    for (i, item) in source.into_iter().enumerate() {
        buffer.set(i, f(item)?)?;
    }
    buffer.seal()
}
