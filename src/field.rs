//! Indirection layers between a record field and its concrete value.
//!
//! A field may be declared as `T`, `Option<T>`, `Box<T>`, or any nesting of
//! those (`Option<Box<Option<T>>>`). [`Field`] peels the layers statically:
//! decoding always targets [`Field::Concrete`], and the result is wrapped back
//! through every layer before it is stored.

use crate::decode::Decode;

/// A field type: a concrete [`Decode`] type behind zero or more layers of
/// `Option`/`Box`.
pub trait Field: Sized {
    /// The type the layers resolve to.
    type Concrete: Decode;

    /// Number of `Option`/`Box` layers above [`Field::Concrete`].
    const DEPTH: usize;

    /// Build the complete chain of layers around `value`.
    fn wrap(value: Self::Concrete) -> Self;

    /// The concrete value, if every layer is populated.
    fn concrete_mut(&mut self) -> Option<&mut Self::Concrete>;
}

impl<T: Field> Field for Option<T> {
    type Concrete = T::Concrete;
    const DEPTH: usize = T::DEPTH + 1;

    fn wrap(value: Self::Concrete) -> Self {
        Some(T::wrap(value))
    }

    fn concrete_mut(&mut self) -> Option<&mut Self::Concrete> {
        self.as_mut().and_then(T::concrete_mut)
    }
}

impl<T: Field> Field for Box<T> {
    type Concrete = T::Concrete;
    const DEPTH: usize = T::DEPTH + 1;

    fn wrap(value: Self::Concrete) -> Self {
        Box::new(T::wrap(value))
    }

    fn concrete_mut(&mut self) -> Option<&mut Self::Concrete> {
        T::concrete_mut(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_counts_layers() {
        assert_eq!(<i32 as Field>::DEPTH, 0);
        assert_eq!(<Option<i32> as Field>::DEPTH, 1);
        assert_eq!(<Option<Box<Option<i32>>> as Field>::DEPTH, 3);
    }

    #[test]
    fn wrap_populates_every_layer() {
        let v = <Option<Box<Option<String>>> as Field>::wrap("x".to_owned());
        assert_eq!(v, Some(Box::new(Some("x".to_owned()))));
    }

    #[test]
    fn concrete_mut_stops_at_an_empty_layer() {
        let mut empty: Option<Box<Option<u8>>> = Some(Box::new(None));
        assert!(empty.concrete_mut().is_none());

        let mut full: Option<Box<Option<u8>>> = Some(Box::new(Some(4)));
        if let Some(v) = full.concrete_mut() {
            *v = 5;
        }
        assert_eq!(full, Some(Box::new(Some(5))));
    }
}
