#![forbid(unsafe_code)]

//! Typed mutations and the pure reducer.
//!
//! [`reduce`] is the only place list contents change. It never mutates its
//! input; a change yields a fresh [`TodoList`] and a no-op says why.
//!
//! # Wire shape (feature `serde`)
//!
//! ```json
//! { "type": "INSERT", "todo": { "id": 4, "text": "Buy milk", "checked": false } }
//! { "type": "REMOVE", "id": 1 }
//! { "type": "TOGGLE", "id": 2 }
//! ```
//!
//! Any other `type` deserializes to [`Action::Unknown`] and leaves state
//! untouched.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use vtodo_core::{Item, ItemId, TodoList};

/// A requested state change.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum Action {
    /// Append `todo` to the end of the list.
    Insert { todo: Item },
    /// Remove the item with `id`.
    Remove { id: ItemId },
    /// Flip `checked` on the item with `id`.
    Toggle { id: ItemId },
    /// An action kind this reducer does not recognise.
    #[cfg_attr(feature = "serde", serde(other))]
    Unknown,
}

impl Action {
    #[must_use]
    pub fn insert(todo: Item) -> Self {
        Self::Insert { todo }
    }

    #[must_use]
    pub fn remove(id: ItemId) -> Self {
        Self::Remove { id }
    }

    #[must_use]
    pub fn toggle(id: ItemId) -> Self {
        Self::Toggle { id }
    }

    /// Discriminant without payload, for logging.
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Insert { .. } => ActionKind::Insert,
            Self::Remove { .. } => ActionKind::Remove,
            Self::Toggle { .. } => ActionKind::Toggle,
            Self::Unknown => ActionKind::Unknown,
        }
    }
}

/// Payload-free action discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Insert,
    Remove,
    Toggle,
    Unknown,
}

impl ActionKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Remove => "remove",
            Self::Toggle => "toggle",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a dispatch left the list as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoopReason {
    /// `Remove`/`Toggle` named an id that is not in the list.
    NotFound(ItemId),
    /// `Insert` carried an id that is already present.
    DuplicateId(ItemId),
    /// The action kind is not recognised.
    UnknownAction,
}

/// Result of applying an [`Action`] to a [`TodoList`].
#[derive(Debug, Clone, PartialEq)]
pub enum Reduced {
    /// A new snapshot with the change applied.
    Changed(TodoList),
    /// Nothing to do; the input list stands.
    Unchanged(NoopReason),
}

impl Reduced {
    #[must_use]
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Changed(_))
    }

    /// The resulting list: the new snapshot, or `current` for a no-op.
    #[must_use]
    pub fn into_list(self, current: &TodoList) -> TodoList {
        match self {
            Self::Changed(next) => next,
            Self::Unchanged(_) => current.clone(),
        }
    }
}

/// Apply `action` to `list`.
///
/// - `Insert` appends. An id collision is an invariant violation: it panics
///   in debug builds and is logged and ignored in release builds.
/// - `Remove` drops the matching item and closes the gap.
/// - `Toggle` replaces the matching item with its toggled copy in place.
/// - Unknown ids and unknown actions are no-ops.
#[must_use]
pub fn reduce(list: &TodoList, action: &Action) -> Reduced {
    match action {
        Action::Insert { todo } => {
            if list.contains(todo.id) {
                tracing::error!(id = %todo.id, "insert collided with an existing id; ignoring");
                if cfg!(debug_assertions) {
                    panic!("id collision on insert: {} is already in the list", todo.id);
                }
                return Reduced::Unchanged(NoopReason::DuplicateId(todo.id));
            }
            Reduced::Changed(list.with_appended(todo.clone()))
        }
        Action::Remove { id } => match list.position(*id) {
            Some(index) => Reduced::Changed(list.without_index(index)),
            None => Reduced::Unchanged(NoopReason::NotFound(*id)),
        },
        Action::Toggle { id } => match list.position(*id) {
            Some(index) => {
                let toggled = match list.get(index) {
                    Some(item) => item.toggled(),
                    None => return Reduced::Unchanged(NoopReason::NotFound(*id)),
                };
                Reduced::Changed(list.with_replaced(index, toggled))
            }
            None => Reduced::Unchanged(NoopReason::NotFound(*id)),
        },
        Action::Unknown => Reduced::Unchanged(NoopReason::UnknownAction),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three() -> TodoList {
        TodoList::from_items([
            Item::new(ItemId(1), "one").with_checked(true),
            Item::new(ItemId(2), "two").with_checked(true),
            Item::new(ItemId(3), "three"),
        ])
    }

    fn changed(reduced: Reduced) -> TodoList {
        match reduced {
            Reduced::Changed(list) => list,
            Reduced::Unchanged(reason) => panic!("expected a change, got {reason:?}"),
        }
    }

    #[test]
    fn insert_appends_at_end() {
        let list = three();
        let next = changed(reduce(&list, &Action::insert(Item::new(ItemId(4), "Buy milk"))));
        assert_eq!(next.len(), 4);
        assert_eq!(**next.get(3).unwrap(), Item::new(ItemId(4), "Buy milk"));
    }

    #[test]
    fn toggle_flips_only_target() {
        let list = three();
        let next = changed(reduce(&list, &Action::toggle(ItemId(2))));
        let checked: Vec<bool> = next.iter().map(|item| item.checked).collect();
        assert_eq!(checked, vec![true, false, false]);
    }

    #[test]
    fn remove_preserves_order() {
        let list = three();
        let next = changed(reduce(&list, &Action::remove(ItemId(1))));
        let ids: Vec<u64> = next.iter().map(|item| item.id.get()).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn absent_ids_are_noops() {
        let list = three();
        assert_eq!(
            reduce(&list, &Action::remove(ItemId(99))),
            Reduced::Unchanged(NoopReason::NotFound(ItemId(99)))
        );
        assert_eq!(
            reduce(&list, &Action::toggle(ItemId(99))),
            Reduced::Unchanged(NoopReason::NotFound(ItemId(99)))
        );
    }

    #[test]
    fn unknown_action_is_noop() {
        let list = three();
        let reduced = reduce(&list, &Action::Unknown);
        assert!(!reduced.is_changed());
        assert!(reduced.into_list(&list).same_snapshot(&list));
    }

    #[test]
    fn reducer_never_touches_input() {
        let list = three();
        let before = list.to_vec();
        let _ = reduce(&list, &Action::toggle(ItemId(1)));
        let _ = reduce(&list, &Action::remove(ItemId(2)));
        assert_eq!(list.to_vec(), before);
        assert_eq!(list.revision(), 0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "id collision")]
    fn duplicate_insert_panics_in_debug() {
        let list = three();
        let _ = reduce(&list, &Action::insert(Item::new(ItemId(2), "dup")));
    }

    #[test]
    fn kind_labels() {
        assert_eq!(Action::toggle(ItemId(1)).kind(), ActionKind::Toggle);
        assert_eq!(ActionKind::Insert.to_string(), "insert");
        assert_eq!(Action::Unknown.kind().as_str(), "unknown");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn wire_shape_round_trips_and_unknown_is_tolerated() {
        let action: Action =
            serde_json::from_str(r#"{"type":"TOGGLE","id":2}"#).expect("toggle parses");
        assert_eq!(action, Action::toggle(ItemId(2)));

        let action: Action = serde_json::from_str(
            r#"{"type":"INSERT","todo":{"id":4,"text":"Buy milk","checked":false}}"#,
        )
        .expect("insert parses");
        assert_eq!(action, Action::insert(Item::new(ItemId(4), "Buy milk")));

        let action: Action =
            serde_json::from_str(r#"{"type":"ARCHIVE"}"#).expect("unknown kind parses");
        assert_eq!(action, Action::Unknown);
    }
}
