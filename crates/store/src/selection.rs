//! Multi-select over transaction ids, shared across accounts.
//!
//! The range anchor is an explicit part of this state and remembers which
//! account it was set in; a shift-click in a different account degrades to a
//! plain click instead of spanning a range across unrelated lists.

use std::collections::HashSet;

use crate::model::Transaction;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Anchor {
    account_id: String,
    position: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Selection {
    selected: HashSet<String>,
    anchor: Option<Anchor>,
}

impl Selection {
    pub fn add<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.selected.extend(ids);
    }

    pub fn remove<'a, I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for id in ids {
            self.selected.remove(id);
        }
    }

    pub fn has(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn count(&self) -> usize {
        self.selected.len()
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.anchor = None;
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    /// A plain checkbox toggle at `position` in `view` (one account's
    /// currently filtered, currently rendered order). Records the anchor for
    /// a following shift-click.
    pub fn click(&mut self, account_id: &str, position: usize, view: &[Transaction], select: bool) {
        let Some(transaction) = view.get(position) else {
            return;
        };
        self.anchor = Some(Anchor {
            account_id: account_id.to_string(),
            position,
        });
        if select {
            self.selected.insert(transaction.id.clone());
        } else {
            self.selected.remove(&transaction.id);
        }
    }

    /// Range toggle between the anchor and `position`, inclusive, restricted
    /// to categorizable transactions. The anchor itself is left where it is,
    /// so repeated shift-clicks extend from the same origin.
    pub fn shift_click(
        &mut self,
        account_id: &str,
        position: usize,
        view: &[Transaction],
        select: bool,
    ) {
        let anchor_position = match &self.anchor {
            Some(anchor) if anchor.account_id == account_id => anchor.position,
            _ => {
                // No usable anchor in this account.
                self.click(account_id, position, view, select);
                return;
            }
        };

        let (first, last) = if anchor_position < position {
            (anchor_position, position)
        } else {
            (position, anchor_position)
        };
        // The filtered view may have shrunk since the anchor was set; act on
        // the rows that are still rendered.
        if first >= view.len() {
            return;
        }
        let last = last.min(view.len() - 1);

        for transaction in &view[first..=last] {
            if !transaction.is_categorizable {
                continue;
            }
            if select {
                self.selected.insert(transaction.id.clone());
            } else {
                self.selected.remove(&transaction.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Amount;

    fn tx(id: &str, categorizable: bool) -> Transaction {
        Transaction {
            id: id.to_string(),
            description: id.to_string(),
            raw_text: None,
            amount: Amount {
                value: "-1.00".to_string(),
                value_in_base_units: -100,
            },
            created_at: chrono::DateTime::parse_from_rfc3339("2023-04-12T09:54:15+10:00")
                .unwrap(),
            is_categorizable: categorizable,
            category_id: None,
            transfer_account_id: None,
            tag_ids: Vec::new(),
            cover_transaction_id: None,
            original_transaction_id: None,
        }
    }

    fn view(ids: &[(&str, bool)]) -> Vec<Transaction> {
        ids.iter().map(|(id, cat)| tx(id, *cat)).collect()
    }

    #[test]
    fn click_then_shift_click_selects_inclusive_range() {
        let view = view(&[
            ("t0", true),
            ("t1", true),
            ("t2", true),
            ("t3", true),
            ("t4", true),
            ("t5", true),
        ]);
        let mut selection = Selection::default();

        selection.click("acc", 2, &view, true);
        selection.shift_click("acc", 5, &view, true);

        assert_eq!(selection.count(), 4);
        for id in ["t2", "t3", "t4", "t5"] {
            assert!(selection.has(id), "{id} missing");
        }
        assert!(!selection.has("t1"));
    }

    #[test]
    fn range_skips_non_categorizable_transactions() {
        let view = view(&[("t0", true), ("hold", false), ("t2", true)]);
        let mut selection = Selection::default();

        selection.click("acc", 0, &view, true);
        selection.shift_click("acc", 2, &view, true);

        assert!(selection.has("t0"));
        assert!(selection.has("t2"));
        assert!(!selection.has("hold"));
    }

    #[test]
    fn shift_click_works_upwards_and_deselects() {
        let view = view(&[("t0", true), ("t1", true), ("t2", true), ("t3", true)]);
        let mut selection = Selection::default();

        selection.click("acc", 3, &view, true);
        selection.shift_click("acc", 1, &view, true);
        assert_eq!(selection.count(), 3);

        selection.shift_click("acc", 2, &view, false);
        assert!(!selection.has("t2"));
        assert!(!selection.has("t3"));
        assert!(selection.has("t1"));
    }

    #[test]
    fn anchor_does_not_leak_across_accounts() {
        let spending = view(&[("s0", true), ("s1", true), ("s2", true)]);
        let savings = view(&[("v0", true), ("v1", true), ("v2", true)]);
        let mut selection = Selection::default();

        selection.click("spending", 0, &spending, true);
        // Shift-click in another account falls back to a single toggle.
        selection.shift_click("savings", 2, &savings, true);

        assert!(selection.has("s0"));
        assert!(selection.has("v2"));
        assert!(!selection.has("v0"));
        assert!(!selection.has("v1"));

        // The fallback re-anchored in the new account.
        selection.shift_click("savings", 0, &savings, true);
        assert!(selection.has("v0"));
        assert!(selection.has("v1"));
    }

    #[test]
    fn shift_click_clamps_to_the_current_view() {
        let full = view(&[("t0", true), ("t1", true), ("t2", true), ("t3", true)]);
        let mut selection = Selection::default();
        selection.click("acc", 3, &full, true);

        // A filter change narrowed the list; the anchor now points past the
        // end, but the visible rows still get toggled.
        let narrowed = view(&[("t0", true), ("t1", true)]);
        selection.shift_click("acc", 0, &narrowed, true);

        assert!(selection.has("t0"));
        assert!(selection.has("t1"));
        assert!(selection.has("t3"));

        // An anchor in an empty view toggles nothing and does not panic.
        selection.shift_click("acc", 0, &[], true);
        assert_eq!(selection.count(), 3);
    }

    #[test]
    fn clear_resets_ids_and_anchor() {
        let view = view(&[("t0", true), ("t1", true)]);
        let mut selection = Selection::default();
        selection.click("acc", 0, &view, true);
        selection.clear();

        assert_eq!(selection.count(), 0);
        // Anchor is gone too: shift-click behaves like a plain click.
        selection.shift_click("acc", 1, &view, true);
        assert_eq!(selection.count(), 1);
        assert!(selection.has("t1"));
    }

    #[test]
    fn add_remove_roundtrip() {
        let mut selection = Selection::default();
        selection.add(["a".to_string(), "b".to_string()]);
        assert_eq!(selection.count(), 2);
        selection.remove(["a"]);
        assert!(!selection.has("a"));
        assert!(selection.has("b"));
    }
}
