/// An item carried through the queue by the harness. Resolves the
/// poison-protocol ambiguity (§9's first open question) with a
/// dedicated variant rather than a null-equivalent payload, so a data
/// value of zero or any other "empty-looking" value is never confused
/// with termination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkItem<T> {
    Data(T),
    Poison,
}

impl<T> WorkItem<T> {
    pub fn is_poison(&self) -> bool {
        matches!(self, WorkItem::Poison)
    }
}
