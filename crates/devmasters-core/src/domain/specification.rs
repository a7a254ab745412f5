//! Specification pattern for composable business rules
//!
//! Specifications are predicate objects combined with `and`; list filters
//! are built from them.

use std::sync::Arc;

/// Core specification trait for business rules
pub trait Specification<T>: Send + Sync {
    /// Check if the entity satisfies this specification
    fn is_satisfied_by(&self, entity: &T) -> bool;

    /// Combine with another specification using AND
    fn and<S: Specification<T> + 'static>(self, other: S) -> AndSpecification<T>
    where
        Self: Sized + 'static,
    {
        AndSpecification::new(Arc::new(self), Arc::new(other))
    }
}

/// AND composite specification
pub struct AndSpecification<T> {
    left: Arc<dyn Specification<T>>,
    right: Arc<dyn Specification<T>>,
}

impl<T> AndSpecification<T> {
    pub fn new(left: Arc<dyn Specification<T>>, right: Arc<dyn Specification<T>>) -> Self {
        Self { left, right }
    }
}

impl<T> Specification<T> for AndSpecification<T>
where
    T: Send + Sync,
{
    fn is_satisfied_by(&self, entity: &T) -> bool {
        self.left.is_satisfied_by(entity) && self.right.is_satisfied_by(entity)
    }
}

/// Always true specification (identity for AND)
pub struct TrueSpec<T>(std::marker::PhantomData<fn(&T)>);

impl<T> TrueSpec<T> {
    pub fn new() -> Self {
        Self(std::marker::PhantomData)
    }
}

impl<T> Default for TrueSpec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + Sync> Specification<T> for TrueSpec<T> {
    fn is_satisfied_by(&self, _entity: &T) -> bool {
        true
    }
}
