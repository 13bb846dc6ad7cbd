use std::ops;

use crate::dims::Dims;

/// Row-major 2D buffer indexed by [`Dims`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Array2D<T> {
    buf: Vec<T>,
    width: usize,
    height: usize,
}

impl<T> Array2D<T> {
    /// Builds an array from a flat row-major buffer.
    ///
    /// Returns `None` if the buffer doesn't match the dimensions.
    pub fn from_buf(buf: Vec<T>, width: usize, height: usize) -> Option<Self> {
        if buf.len() != width * height {
            return None;
        }

        Some(Self { buf, width, height })
    }

    pub fn size(&self) -> Dims {
        Dims(self.width as i32, self.height as i32)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn dim_to_idx(&self, pos: Dims) -> Option<usize> {
        if !pos.all_non_negative() {
            return None;
        }

        let (x, y) = (pos.0 as usize, pos.1 as usize);
        if x >= self.width || y >= self.height {
            return None;
        }

        Some(y * self.width + x)
    }

    pub fn idx_to_dim(&self, idx: usize) -> Option<Dims> {
        if idx >= self.buf.len() {
            return None;
        }

        Some(Dims((idx % self.width) as i32, (idx / self.width) as i32))
    }

    pub fn get(&self, pos: Dims) -> Option<&T> {
        self.dim_to_idx(pos).and_then(|i| self.buf.get(i))
    }

    pub fn get_mut(&mut self, pos: Dims) -> Option<&mut T> {
        self.dim_to_idx(pos).and_then(|i| self.buf.get_mut(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.buf.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.buf.iter_mut()
    }

    pub fn iter_pos(&self) -> impl Iterator<Item = Dims> + '_ {
        (0..self.buf.len()).filter_map(move |i| self.idx_to_dim(i))
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.buf.chunks(self.width.max(1))
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Array2D<U> {
        Array2D {
            buf: self.buf.into_iter().map(f).collect(),
            width: self.width,
            height: self.height,
        }
    }
}

impl<T: Clone> Array2D<T> {
    pub fn new(item: T, width: usize, height: usize) -> Self {
        Self {
            buf: vec![item; width * height],
            width,
            height,
        }
    }

    pub fn fill(&mut self, item: T) {
        self.buf.fill(item);
    }
}

impl<T> ops::Index<Dims> for Array2D<T> {
    type Output = T;

    fn index(&self, index: Dims) -> &Self::Output {
        self.get(index)
            .unwrap_or_else(|| panic!("Index out of bounds: {:?}", index))
    }
}

impl<T> ops::IndexMut<Dims> for Array2D<T> {
    fn index_mut(&mut self, index: Dims) -> &mut Self::Output {
        self.get_mut(index)
            .unwrap_or_else(|| panic!("Index out of bounds: {:?}", index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_conversions() {
        let arr = Array2D::new(0u8, 3, 2);
        assert_eq!(arr.dim_to_idx(Dims(2, 1)), Some(5));
        assert_eq!(arr.idx_to_dim(4), Some(Dims(1, 1)));
        assert_eq!(arr.dim_to_idx(Dims(3, 0)), None);
        assert_eq!(arr.dim_to_idx(Dims(-1, 0)), None);
        assert_eq!(arr.idx_to_dim(6), None);
    }

    #[test]
    fn from_buf_checks_len() {
        assert!(Array2D::from_buf(vec![1, 2, 3], 2, 2).is_none());

        let arr = Array2D::from_buf(vec![1, 2, 3, 4], 2, 2).unwrap();
        assert_eq!(arr[Dims(1, 0)], 2);
        assert_eq!(arr[Dims(0, 1)], 3);
        assert_eq!(arr.rows().count(), 2);
    }
}
