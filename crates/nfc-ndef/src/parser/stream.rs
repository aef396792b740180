use winnow::{Bytes, Partial};

/// Input for every parser in this crate, partial so a short read surfaces as
/// `ErrMode::Incomplete` instead of a hard failure
pub type Stream<'i> = Partial<&'i Bytes>;

pub fn new(b: &[u8]) -> Stream<'_> {
    Partial::new(Bytes::new(b))
}

pub trait StreamExt {
    fn len(&self) -> usize;
    fn to_stream(&self) -> Stream<'_>;
    fn to_vec(&self) -> Vec<u8>;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StreamExt for Stream<'_> {
    fn len(&self) -> usize {
        self.as_ref().len()
    }

    fn to_stream(&self) -> Stream<'_> {
        *self
    }

    fn to_vec(&self) -> Vec<u8> {
        self.as_ref().to_vec()
    }
}

impl StreamExt for [u8] {
    fn len(&self) -> usize {
        <[u8]>::len(self)
    }

    fn to_stream(&self) -> Stream<'_> {
        new(self)
    }

    fn to_vec(&self) -> Vec<u8> {
        <[u8]>::to_vec(self)
    }
}
