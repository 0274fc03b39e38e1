//! Pairs "Cover from X" / "Forward to Y" transfers with the purchase they
//! cover, by absolute amount.
//!
//! Matching relies on amount equality only; two coincidental pairs with the
//! same amount are resolved in encounter order (FIFO per amount bucket).
//! That mispairing is an accepted approximation of the upstream app, not a
//! bug to fix here.

use std::collections::{HashMap, VecDeque};

use crate::model::Transaction;

const COVER_PREFIXES: [&str; 2] = ["Cover from", "Forward to"];

/// Cents rounded up to whole currency units, matching the sign convention of
/// the original matcher: a cover keeps its own sign, a purchase is negated
/// before lookup, so the pair lands on the same key.
fn normalized_amount(base_units: i64) -> i64 {
    // Signed `div_ceil` is unstable (int_roundings); this is its stable
    // equivalent: truncating division, bumped when a positive remainder
    // means truncation rounded toward zero instead of +inf.
    let quotient = base_units / 100;
    if base_units % 100 > 0 {
        quotient + 1
    } else {
        quotient
    }
}

fn is_cover(transaction: &Transaction) -> bool {
    COVER_PREFIXES
        .iter()
        .any(|prefix| transaction.description.starts_with(prefix))
}

/// Annotates a transaction list with cover links, in place.
///
/// Transactions already carrying a link from a previous run pass through
/// untouched, so re-running over an accumulated list (after a "load more")
/// is idempotent and only matches the still-unpaired remainder. The list is
/// never reordered, grown, or shrunk.
pub fn find_covers(transactions: &mut [Transaction]) {
    let mut pending: HashMap<i64, VecDeque<usize>> = HashMap::new();

    for current in 0..transactions.len() {
        let transaction = &transactions[current];
        if transaction.cover_transaction_id.is_some()
            || transaction.original_transaction_id.is_some()
        {
            continue;
        }

        if is_cover(transaction) {
            let key = normalized_amount(transaction.amount.value_in_base_units);
            pending.entry(key).or_default().push_back(current);
            continue;
        }

        if !transaction.is_categorizable {
            continue;
        }

        let key = normalized_amount(-transaction.amount.value_in_base_units);
        let (candidate, emptied) = match pending.get_mut(&key) {
            Some(queue) => {
                let head = queue.pop_front();
                (head, queue.is_empty())
            }
            None => (None, false),
        };
        if emptied {
            pending.remove(&key);
        }

        if let Some(cover) = candidate {
            let cover_id = transactions[cover].id.clone();
            let current_id = transactions[current].id.clone();
            transactions[current].cover_transaction_id = Some(cover_id);
            transactions[cover].original_transaction_id = Some(current_id);
        }
    }
}
