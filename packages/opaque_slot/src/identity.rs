use std::any::{self, TypeId};
use std::fmt;

/// A value-comparable runtime token naming a Rust type.
///
/// Two identities are equal if and only if they name the same type, no matter
/// where each one was produced. Unlike the address of a monomorphized
/// function, which may differ between codegen units or dynamically loaded
/// artifacts that each carry their own instantiation, the token compares
/// correctly by value across all of them.
///
/// The diagnostic name is carried alongside the identity for error messages
/// and debug output; it takes no part in equality.
///
/// # Example
///
/// ```
/// use opaque_slot::TypeIdentity;
///
/// let int_identity = TypeIdentity::of::<i32>();
/// let float_identity = TypeIdentity::of::<f32>();
///
/// assert_eq!(int_identity, TypeIdentity::of::<i32>());
/// assert_ne!(int_identity, float_identity);
/// assert_eq!(int_identity.name(), "i32");
/// ```
#[derive(Clone, Copy, Debug)]
pub struct TypeIdentity {
    id: TypeId,
    name: &'static str,
}

impl TypeIdentity {
    /// Returns the identity of `T`.
    #[must_use]
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: any::type_name::<T>(),
        }
    }

    /// The unique identifier of the named type.
    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// A human-readable name for the type, suitable for diagnostics only.
    ///
    /// The name is not guaranteed to be unique or stable across compiler
    /// versions; equality of identities uses only [`id()`](Self::id).
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeIdentity {}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Shorthand for [`TypeIdentity::of`].
#[must_use]
pub fn identity_of<T: 'static>() -> TypeIdentity {
    TypeIdentity::of::<T>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_type_compares_equal() {
        assert_eq!(TypeIdentity::of::<String>(), TypeIdentity::of::<String>());
        assert_eq!(identity_of::<u64>(), TypeIdentity::of::<u64>());
    }

    #[test]
    fn different_types_compare_unequal() {
        assert_ne!(TypeIdentity::of::<u32>(), TypeIdentity::of::<i32>());
        assert_ne!(TypeIdentity::of::<()>(), TypeIdentity::of::<u8>());
    }

    #[test]
    fn equality_ignores_the_diagnostic_name() {
        // Two identities for the same type are equal even if the compiler
        // were to render their names differently; only the id participates.
        let a = TypeIdentity::of::<Vec<u8>>();
        let b = TypeIdentity::of::<Vec<u8>>();

        assert_eq!(a.id(), b.id());
        assert_eq!(a, b);
    }

    #[test]
    fn display_uses_the_name() {
        let identity = TypeIdentity::of::<i32>();

        assert_eq!(identity.to_string(), "i32");
        assert_eq!(identity.to_string(), identity.name());
    }
}
