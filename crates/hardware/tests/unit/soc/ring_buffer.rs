//! # Ring Buffer Tests

use plasim_core::soc::memory::buffer::RingBuffer;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn filled(capacity: usize, values: &[u32]) -> RingBuffer<u32> {
    let mut rb = RingBuffer::new(capacity);
    for &v in values {
        let _ = rb.push(v);
    }
    rb
}

#[test]
fn test_zero_capacity_is_raised_to_one() {
    let rb = RingBuffer::<u32>::new(0);
    assert_eq!(rb.capacity(), 1);
}

#[test]
fn test_overflow_evicts_oldest() {
    let mut rb = filled(3, &[1, 2, 3]);
    assert!(rb.is_full());
    assert_eq!(rb.push(4), Some(1));
    assert_eq!(rb.head(), rb.tail());
    assert_eq!(rb.iter().collect::<Vec<_>>(), vec![2, 3, 4]);
}

#[test]
fn test_pop_is_fifo() {
    let mut rb = filled(2, &[5, 6, 7]);
    assert_eq!(rb.peek(), Some(6));
    assert_eq!(rb.pop(), Some(6));
    assert_eq!(rb.pop(), Some(7));
    assert_eq!(rb.pop(), None);
    assert!(rb.is_empty());
}

#[test]
fn test_resize_keeps_newest() {
    let mut rb = filled(4, &[1, 2, 3, 4]);
    rb.resize(2);
    assert_eq!(rb.capacity(), 2);
    assert_eq!(rb.iter().collect::<Vec<_>>(), vec![3, 4]);

    rb.resize(5);
    assert_eq!(rb.iter().collect::<Vec<_>>(), vec![3, 4]);
    let _ = rb.push(9);
    assert_eq!(rb.iter().collect::<Vec<_>>(), vec![3, 4, 9]);
}

#[test]
fn test_resize_after_wrap_preserves_order() {
    let mut rb = filled(3, &[1, 2, 3, 4, 5]);
    rb.resize(4);
    assert_eq!(rb.iter().collect::<Vec<_>>(), vec![3, 4, 5]);
    rb.resize(0);
    assert_eq!(rb.capacity(), 1);
    assert_eq!(rb.iter().collect::<Vec<_>>(), vec![5]);
}

proptest! {
    #[test]
    fn prop_keeps_last_capacity_values(
        capacity in 1usize..16,
        values in proptest::collection::vec(any::<u32>(), 0..64),
    ) {
        let rb = filled(capacity, &values);
        let keep = values.len().min(capacity);
        prop_assert!(rb.len() <= rb.capacity());
        prop_assert_eq!(rb.iter().collect::<Vec<_>>(), values[values.len() - keep..].to_vec());
    }

    #[test]
    fn prop_resize_keeps_newest_in_order(
        capacity in 1usize..16,
        new_capacity in 0usize..16,
        values in proptest::collection::vec(any::<u32>(), 0..40),
    ) {
        let mut rb = filled(capacity, &values);
        let before: Vec<u32> = rb.iter().collect();
        rb.resize(new_capacity);
        let keep = before.len().min(new_capacity.max(1));
        prop_assert_eq!(rb.iter().collect::<Vec<_>>(), before[before.len() - keep..].to_vec());
    }
}
