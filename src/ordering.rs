/// Placeholder position used while two rows swap places under the unique index.
pub const PARKED_ORDER: i64 = 0;

/// `None` once the highest order has no successor.
pub fn next_order(current_max: Option<i64>) -> Option<i64> {
    match current_max {
        Some(max) => max.checked_add(1),
        None => Some(1),
    }
}

/// Writes needed to move one item to a new order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reorder {
    Unchanged,
    Move { to: i64 },
    Swap { to: i64, other_id: i64, other_to: i64 },
}

/// `holder` is the id of the item currently sitting at `requested`, if any.
pub fn plan_reorder(current: i64, requested: i64, holder: Option<i64>) -> Reorder {
    if current == requested {
        return Reorder::Unchanged;
    }
    match holder {
        Some(other_id) => Reorder::Swap {
            to: requested,
            other_id,
            other_to: current,
        },
        None => Reorder::Move { to: requested },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_item_gets_order_one() {
        assert_eq!(next_order(None), Some(1));
    }

    #[test]
    fn next_order_follows_maximum() {
        assert_eq!(next_order(Some(7)), Some(8));
    }

    #[test]
    fn next_order_does_not_overflow() {
        assert_eq!(next_order(Some(i64::MAX)), None);
    }

    #[test]
    fn same_order_is_a_noop() {
        assert_eq!(plan_reorder(3, 3, Some(10)), Reorder::Unchanged);
    }

    #[test]
    fn free_slot_is_a_plain_move() {
        assert_eq!(plan_reorder(2, 9, None), Reorder::Move { to: 9 });
    }

    #[test]
    fn occupied_slot_swaps() {
        assert_eq!(
            plan_reorder(2, 3, Some(11)),
            Reorder::Swap {
                to: 3,
                other_id: 11,
                other_to: 2
            }
        );
    }
}
