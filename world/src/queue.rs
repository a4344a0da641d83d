use std::collections::VecDeque;

use fuseblocks_core::{CellCoord, Direction};

use crate::MOVE_QUEUE_CAPACITY;

/// Pending request that the piece occupying a cell shift one column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct QueuedMove {
    pub(crate) cell: CellCoord,
    pub(crate) direction: Direction,
}

/// Fixed-capacity FIFO buffer holding player move requests.
///
/// A push against a full buffer is refused outright; queued input is never
/// overwritten.
#[derive(Clone, Debug)]
pub(crate) struct MoveQueue {
    slots: VecDeque<QueuedMove>,
}

impl MoveQueue {
    pub(crate) fn new() -> Self {
        Self {
            slots: VecDeque::with_capacity(MOVE_QUEUE_CAPACITY),
        }
    }

    pub(crate) fn push(&mut self, request: QueuedMove) -> bool {
        if self.slots.len() >= MOVE_QUEUE_CAPACITY {
            return false;
        }
        self.slots.push_back(request);
        true
    }

    pub(crate) fn pop(&mut self) -> Option<QueuedMove> {
        self.slots.pop_front()
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::{MoveQueue, QueuedMove};
    use crate::MOVE_QUEUE_CAPACITY;
    use fuseblocks_core::{CellCoord, Direction};

    fn request(column: u32) -> QueuedMove {
        QueuedMove {
            cell: CellCoord::new(column, 0),
            direction: Direction::Right,
        }
    }

    #[test]
    fn push_refuses_once_capacity_is_reached() {
        let mut queue = MoveQueue::new();
        for column in 0..MOVE_QUEUE_CAPACITY {
            assert!(queue.push(request(column as u32)));
        }
        assert_eq!(queue.len(), MOVE_QUEUE_CAPACITY);
        assert!(!queue.push(request(99)));
        assert_eq!(queue.len(), MOVE_QUEUE_CAPACITY);
    }

    #[test]
    fn pop_preserves_submission_order() {
        let mut queue = MoveQueue::new();
        assert!(queue.push(request(1)));
        assert!(queue.push(request(2)));
        assert!(queue.push(request(3)));

        assert_eq!(queue.pop(), Some(request(1)));
        assert_eq!(queue.pop(), Some(request(2)));
        assert_eq!(queue.pop(), Some(request(3)));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn refused_push_leaves_existing_entries_intact() {
        let mut queue = MoveQueue::new();
        for column in 0..MOVE_QUEUE_CAPACITY {
            assert!(queue.push(request(column as u32)));
        }
        assert!(!queue.push(request(42)));
        assert_eq!(queue.pop(), Some(request(0)));
    }

    #[test]
    fn clear_empties_the_buffer() {
        let mut queue = MoveQueue::new();
        assert!(queue.push(request(7)));
        queue.clear();
        assert_eq!(queue.len(), 0);
        assert_eq!(queue.pop(), None);
    }
}
