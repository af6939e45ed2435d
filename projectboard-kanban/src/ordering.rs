//! Index computation for column and card ordering

/// Move the element at `from` so it ends up at index `to`, keeping every
/// other element in its relative order.
///
/// Returns `None` when either index is out of bounds.
pub fn array_move<T: Clone>(items: &[T], from: usize, to: usize) -> Option<Vec<T>> {
    if from >= items.len() || to >= items.len() {
        return None;
    }
    let mut moved = items.to_vec();
    let item = moved.remove(from);
    moved.insert(to, item);
    Some(moved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_move_last_to_front() {
        assert_eq!(array_move(&["todo", "doing", "done"], 2, 0), Some(vec!["done", "todo", "doing"]));
    }

    #[test]
    fn test_move_front_to_back() {
        assert_eq!(array_move(&[1, 2, 3, 4], 0, 3), Some(vec![2, 3, 4, 1]));
    }

    #[test]
    fn test_move_same_index_is_identity() {
        assert_eq!(array_move(&[1, 2, 3], 1, 1), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_move_out_of_bounds() {
        assert_eq!(array_move(&[1, 2, 3], 3, 0), None);
        assert_eq!(array_move(&[1, 2, 3], 0, 3), None);
        assert_eq!(array_move::<i32>(&[], 0, 0), None);
    }

    proptest! {
        #[test]
        fn prop_move_places_item_and_keeps_relative_order(
            len in 1usize..12,
            seed_from in 0usize..64,
            seed_to in 0usize..64,
        ) {
            let items: Vec<usize> = (0..len).collect();
            let from = seed_from % len;
            let to = seed_to % len;
            let moved = array_move(&items, from, to).unwrap();

            prop_assert_eq!(moved.len(), len);
            prop_assert_eq!(moved[to], items[from]);

            let rest: Vec<usize> = moved.iter().copied().filter(|i| *i != items[from]).collect();
            let expected: Vec<usize> = items.iter().copied().filter(|i| *i != items[from]).collect();
            prop_assert_eq!(rest, expected);
        }
    }
}
