//! # Unordered container with deferred insertion.
//!
//! [`Group`] owns a set of steppable objects (`contents`) plus a
//! pending-insertion queue (`additions`). [`Container::add`] only ever
//! touches the queue; queued objects become visible in `contents` at a
//! single merge point — after the current traversal, never mid-iteration.
//! An object added during tick *N* is therefore not stepped during tick
//! *N*.
//!
//! The [`Container`] trait is the capability shared by every container
//! variant (group, node, barrier, trigger): expose your `Group` storage and
//! inherit the membership operations.

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::Ctx;
use crate::error::StepError;
use crate::units::{Lifecycle, Steppable};

/// Owner of a set of lifecycle objects with deferred insertion.
pub struct Group {
    life: Rc<Lifecycle>,
    contents: RefCell<Vec<Rc<dyn Steppable>>>,
    additions: RefCell<Vec<Rc<dyn Steppable>>>,
}

impl Group {
    pub fn new(ctx: &Ctx) -> Rc<Self> {
        Rc::new(Self::new_inner(ctx))
    }

    /// Non-`Rc` constructor for container variants composing over `Group`.
    pub(crate) fn new_inner(ctx: &Ctx) -> Self {
        Self {
            life: Lifecycle::new(ctx),
            contents: RefCell::new(Vec::new()),
            additions: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn lifecycle_ref(&self) -> &Rc<Lifecycle> {
        &self.life
    }

    /// Fixed copy of the current contents, safe to iterate while the
    /// membership changes underneath.
    pub(crate) fn snapshot(&self) -> Vec<Rc<dyn Steppable>> {
        self.contents.borrow().clone()
    }

    pub(crate) fn enqueue(&self, item: Rc<dyn Steppable>) {
        self.additions.borrow_mut().push(item);
    }

    /// Drops a member from contents and from the pending queue.
    pub(crate) fn drop_member(&self, item: &Rc<dyn Steppable>) {
        self.contents
            .borrow_mut()
            .retain(|m| !Rc::ptr_eq(m, item));
        self.additions
            .borrow_mut()
            .retain(|m| !Rc::ptr_eq(m, item));
    }

    /// Removes members that completed since the last traversal.
    pub(crate) fn prune(&self) {
        self.contents.borrow_mut().retain(|m| m.is_active());
    }

    /// The merge point: moves pending insertions into contents.
    pub(crate) fn merge(&self) {
        let mut additions = self.additions.borrow_mut();
        if additions.is_empty() {
            return;
        }
        self.contents.borrow_mut().append(&mut additions);
    }

    pub(crate) fn member_count(&self) -> usize {
        self.contents.borrow().len()
    }

    pub(crate) fn pending_count(&self) -> usize {
        self.additions.borrow().len()
    }

    pub(crate) fn any_active(&self) -> bool {
        self.contents.borrow().iter().any(|m| m.is_active())
    }
}

impl Steppable for Group {
    fn lifecycle(&self) -> &Rc<Lifecycle> {
        &self.life
    }

    /// A plain group does not step its members (that is a node's job); it
    /// prunes completed members and merges pending insertions.
    fn step(&self) -> Result<(), StepError> {
        if !self.life.mark_step() {
            return Ok(());
        }
        self.prune();
        self.merge();
        Ok(())
    }
}

/// Membership operations shared by every container variant.
pub trait Container: Steppable {
    /// The underlying group storage.
    fn as_group(&self) -> &Group;

    /// Enqueues an object for membership. Never mutates the visible
    /// contents synchronously; the object appears at the next merge point.
    fn add(&self, item: Rc<dyn Steppable>) {
        self.as_group().enqueue(item);
    }

    /// Enqueues several objects, preserving their order.
    fn add_all(&self, items: impl IntoIterator<Item = Rc<dyn Steppable>>)
    where
        Self: Sized,
    {
        for item in items {
            self.add(item);
        }
    }

    /// Removes an object from contents and from the pending queue.
    fn remove(&self, item: &Rc<dyn Steppable>) {
        self.as_group().drop_member(item);
    }

    /// Number of currently visible members (pending insertions excluded).
    fn len(&self) -> usize {
        self.as_group().member_count()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether insertions are queued but not yet merged.
    fn has_pending_additions(&self) -> bool {
        self.as_group().pending_count() > 0
    }
}

impl Container for Group {
    fn as_group(&self) -> &Group {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Config, Ctx};
    use crate::units::Unit;

    fn ctx() -> Ctx {
        Ctx::new(&Config::default())
    }

    #[test]
    fn test_add_is_deferred_until_step() {
        let c = ctx();
        let group = Group::new(&c);
        let unit = Unit::new(&c);

        group.add(unit);
        assert_eq!(group.len(), 0, "additions must not appear synchronously");
        assert!(group.has_pending_additions());

        group.step().unwrap();
        assert_eq!(group.len(), 1, "merge point is the group's step");
        assert!(!group.has_pending_additions());
    }

    #[test]
    fn test_completed_members_are_pruned() {
        let c = ctx();
        let group = Group::new(&c);
        let unit = Unit::new(&c);

        group.add(unit.clone());
        group.step().unwrap();
        assert_eq!(group.len(), 1);

        unit.complete();
        group.step().unwrap();
        assert_eq!(group.len(), 0, "inactive members must be removed");
    }

    #[test]
    fn test_remove_covers_pending_queue() {
        let c = ctx();
        let group = Group::new(&c);
        let unit = Unit::new(&c);
        let as_dyn: Rc<dyn Steppable> = unit.clone();

        group.add(unit);
        group.remove(&as_dyn);
        group.step().unwrap();
        assert_eq!(group.len(), 0, "removal must also purge pending additions");
    }

    #[test]
    fn test_merge_preserves_insertion_order() {
        let c = ctx();
        let group = Group::new(&c);
        let a = Unit::new(&c);
        let b = Unit::new(&c);
        group.add(a.clone());
        group.add(b.clone());
        group.step().unwrap();

        let ids: Vec<u64> = group.snapshot().iter().map(|m| m.id()).collect();
        assert_eq!(ids, vec![a.id(), b.id()]);
    }

    #[test]
    fn test_inactive_group_does_not_merge() {
        let c = ctx();
        let group = Group::new(&c);
        group.add(Unit::new(&c));
        group.complete();
        group.step().unwrap();
        assert_eq!(group.len(), 0);
        assert!(group.has_pending_additions(), "no merge after completion");
    }
}
