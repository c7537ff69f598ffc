//! Row access for field nodes

use sqlexpr_types::TypedValue;

/// Positional access to the current row
pub trait Row {
    /// Value of the field at `index`, `None` past the end
    fn field(&self, index: usize) -> Option<&TypedValue>;

    /// Number of fields
    fn width(&self) -> usize;
}

impl Row for [TypedValue] {
    fn field(&self, index: usize) -> Option<&TypedValue> {
        self.get(index)
    }

    fn width(&self) -> usize {
        self.len()
    }
}

impl Row for Vec<TypedValue> {
    fn field(&self, index: usize) -> Option<&TypedValue> {
        self.get(index)
    }

    fn width(&self) -> usize {
        self.len()
    }
}

impl<const N: usize> Row for [TypedValue; N] {
    fn field(&self, index: usize) -> Option<&TypedValue> {
        self.get(index)
    }

    fn width(&self) -> usize {
        N
    }
}

impl<R: Row + ?Sized> Row for &R {
    fn field(&self, index: usize) -> Option<&TypedValue> {
        (**self).field(index)
    }

    fn width(&self) -> usize {
        (**self).width()
    }
}
