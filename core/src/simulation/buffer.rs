use crate::interface::DetectedObject;

/// Bounded, append-ordered store of detected objects.
///
/// Truncation happens on push, so `len() <= capacity()` holds after every
/// append and the buffer always keeps the most recent entries.
#[derive(Debug, Clone)]
pub struct DetectionBuffer {
    items: Vec<DetectedObject>,
    capacity: usize,
}

impl DetectionBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: Vec::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Appends `object`, returning how many of the oldest entries were dropped.
    pub fn push(&mut self, object: DetectedObject) -> usize {
        self.items.push(object);
        let excess = self.items.len().saturating_sub(self.capacity);
        if excess > 0 {
            self.items.drain(..excess);
        }
        excess
    }

    /// Keeps entries matching `keep`, returning how many were removed.
    pub fn retain(&mut self, keep: impl FnMut(&DetectedObject) -> bool) -> usize {
        let before = self.items.len();
        self.items.retain(keep);
        before - self.items.len()
    }

    pub fn as_slice(&self) -> &[DetectedObject] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(id: u64) -> DetectedObject {
        DetectedObject::new(id, 0.0, 20.0, 3.0, id)
    }

    #[test]
    fn push_drops_oldest_beyond_capacity() {
        let mut buffer = DetectionBuffer::with_capacity(3);
        for id in 0..3 {
            assert_eq!(buffer.push(object(id)), 0);
        }
        assert_eq!(buffer.push(object(3)), 1);
        let ids: Vec<u64> = buffer.as_slice().iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn retain_reports_removed_count() {
        let mut buffer = DetectionBuffer::with_capacity(4);
        for id in 0..4 {
            buffer.push(object(id));
        }
        assert_eq!(buffer.retain(|o| o.id % 2 == 0), 2);
        assert_eq!(buffer.len(), 2);
    }
}
