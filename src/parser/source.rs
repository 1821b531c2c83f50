//! Byte sources for the input decoder

use std::collections::VecDeque;
use std::time::Duration;

/// A readiness-gated supply of input bytes.
///
/// `next_byte` must never block longer than `wait`: it returns `None` when
/// no byte becomes available in time, which the decoder treats as "the
/// sequence ended here".
pub trait ByteSource {
    fn next_byte(&mut self, wait: Duration) -> Option<u8>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn next_byte(&mut self, wait: Duration) -> Option<u8> {
        (**self).next_byte(wait)
    }
}

/// In-memory byte source, used for canned input
#[derive(Debug, Clone, Default)]
pub struct SliceSource {
    bytes: VecDeque<u8>,
}

impl SliceSource {
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.iter().copied().collect(),
        }
    }

    /// Queue more bytes behind the pending ones
    pub fn push(&mut self, bytes: &[u8]) {
        self.bytes.extend(bytes.iter().copied());
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }
}

impl ByteSource for SliceSource {
    fn next_byte(&mut self, _wait: Duration) -> Option<u8> {
        self.bytes.pop_front()
    }
}
