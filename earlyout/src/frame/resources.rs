//! Frame-local resource stack.
//!
//! Everything a frame adopts or defers is pushed here and released in reverse
//! construction order, exactly once, when the frame finishes or is destroyed
//! by a propagated error.

use smallvec::SmallVec;
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use tracing::trace;

/// Typed handle to a resource adopted by a frame.
pub struct Held<R> {
    index: usize,
    _marker: PhantomData<fn() -> R>,
}

impl<R> Clone for Held<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for Held<R> {}

impl<R> fmt::Debug for Held<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Held({})", self.index)
    }
}

enum Resource {
    Owned(Box<dyn Any>),
    Deferred(Box<dyn FnOnce()>),
}

/// Stack of destructors for one frame.
///
/// Most frames hold a handful of resources, so they live inline.
#[derive(Default)]
pub struct ResourceStack {
    entries: SmallVec<[Resource; 4]>,
    released: bool,
}

impl ResourceStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of `resource`. It is dropped when the stack unwinds.
    pub fn adopt<R: 'static>(&mut self, resource: R) -> Held<R> {
        let index = self.push(Resource::Owned(Box::new(resource)));
        Held {
            index,
            _marker: PhantomData,
        }
    }

    /// Registers a cleanup callback, run when the stack unwinds.
    pub fn defer<F: FnOnce() + 'static>(&mut self, cleanup: F) {
        self.push(Resource::Deferred(Box::new(cleanup)));
    }

    pub fn get_mut<R: 'static>(&mut self, held: Held<R>) -> Option<&mut R> {
        match self.entries.get_mut(held.index)? {
            Resource::Owned(resource) => resource.downcast_mut::<R>(),
            Resource::Deferred(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Releases every entry, last constructed first.
    ///
    /// Calling this again is a no-op. Nothing is popped before this point, so
    /// a [`Held`] index always names the resource it was issued for.
    pub fn release(&mut self, frame: &str) {
        if self.released {
            return;
        }
        self.released = true;
        while let Some(entry) = self.entries.pop() {
            let index = self.entries.len();
            match entry {
                Resource::Owned(resource) => {
                    trace!(frame, index, "dropping adopted resource");
                    drop(resource);
                }
                Resource::Deferred(cleanup) => {
                    trace!(frame, index, "running deferred cleanup");
                    cleanup();
                }
            }
        }
    }

    fn push(&mut self, resource: Resource) -> usize {
        assert!(
            !self.released,
            "Cannot acquire resources after the frame released them"
        );
        self.entries.push(resource);
        self.entries.len() - 1
    }
}

impl fmt::Debug for ResourceStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceStack")
            .field("live", &self.len())
            .field("released", &self.released)
            .finish()
    }
}

impl Drop for ResourceStack {
    fn drop(&mut self) {
        self.release("<dropped>");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Named(&'static str, Rc<RefCell<Vec<&'static str>>>);

    impl Drop for Named {
        fn drop(&mut self) {
            self.1.borrow_mut().push(self.0);
        }
    }

    #[test]
    fn test_release_in_reverse_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut stack = ResourceStack::new();

        stack.adopt(Named("first", log.clone()));
        let deferred = log.clone();
        stack.defer(move || deferred.borrow_mut().push("second"));
        stack.adopt(Named("third", log.clone()));
        assert_eq!(stack.len(), 3);

        stack.release("test");
        assert_eq!(*log.borrow(), vec!["third", "second", "first"]);
        assert!(stack.is_empty());
        assert!(stack.is_released());
    }

    #[test]
    fn test_release_runs_once() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut stack = ResourceStack::new();
        stack.adopt(Named("only", log.clone()));

        stack.release("test");
        stack.release("test");
        drop(stack);
        assert_eq!(*log.borrow(), vec!["only"]);
    }

    #[test]
    fn test_drop_releases_pending_entries() {
        let log = Rc::new(RefCell::new(Vec::new()));
        {
            let mut stack = ResourceStack::new();
            stack.adopt(Named("a", log.clone()));
            stack.adopt(Named("b", log.clone()));
        }
        assert_eq!(*log.borrow(), vec!["b", "a"]);
    }

    #[test]
    fn test_get_mut_is_typed() {
        let mut stack = ResourceStack::new();
        let number = stack.adopt(41u32);
        let text = stack.adopt(String::from("x"));

        *stack.get_mut(number).unwrap() += 1;
        stack.get_mut(text).unwrap().push('y');

        assert_eq!(stack.get_mut(number), Some(&mut 42));
        assert_eq!(stack.get_mut(text).map(|s| s.as_str()), Some("xy"));

        stack.release("test");
        assert_eq!(stack.get_mut(number), None);
    }

    #[test]
    #[should_panic(expected = "after the frame released them")]
    fn test_adopt_after_release_panics() {
        let mut stack = ResourceStack::new();
        stack.release("test");
        stack.adopt(1u8);
    }
}
