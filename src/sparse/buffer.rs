/// Append-only buffer for when the final length is only estimated.
///
/// Starts at the estimate and doubles whenever it fills up, so appends are
/// amortized O(1). [`GrowableBuffer::trim`] hands back a `Vec` holding
/// exactly the elements pushed.
#[derive(Debug, Clone)]
pub struct GrowableBuffer<T> {
    data: Vec<T>,
    len: usize,
}

impl<T: Copy + Default> GrowableBuffer<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        GrowableBuffer {
            data: vec![T::default(); capacity.max(1)],
            len: 0,
        }
    }

    pub fn push(&mut self, value: T) {
        if self.len == self.data.len() {
            let doubled = self.data.len() * 2;
            self.data.resize(doubled, T::default());
        }
        self.data[self.len] = value;
        self.len += 1;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Slots currently allocated, filled or not.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn trim(mut self) -> Vec<T> {
        self.data.truncate(self.len);
        self.data.shrink_to_fit();
        self.data
    }
}
