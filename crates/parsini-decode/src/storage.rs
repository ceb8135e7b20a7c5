//! The stack of values currently being decoded.

use parsini_tree::Value;
use tracing::trace;

/// Stack of borrowed value frames. The top frame is what [`Decoder`](crate::Decoder)
/// hands to newly requested containers.
///
/// Never empty while a container method runs; touching an empty stack is a bug
/// in the decoder, not a decode failure.
#[derive(Debug)]
pub(crate) struct Storage<'v> {
    frames: Vec<&'v Value>,
}

impl<'v> Storage<'v> {
    pub(crate) fn new(root: &'v Value) -> Self {
        Self { frames: vec![root] }
    }

    pub(crate) fn len(&self) -> usize {
        self.frames.len()
    }

    #[track_caller]
    pub(crate) fn top(&self) -> &'v Value {
        match self.frames.last() {
            Some(value) => value,
            None => panic!("decode storage is empty"),
        }
    }

    pub(crate) fn push(&mut self, value: &'v Value) {
        trace!(depth = self.len(), kind = value.kind_description(), "push frame");
        self.frames.push(value);
    }

    #[track_caller]
    pub(crate) fn pop(&mut self) {
        if self.frames.pop().is_none() {
            panic!("decode storage is empty");
        }
        trace!(depth = self.frames.len(), "pop frame");
    }
}
