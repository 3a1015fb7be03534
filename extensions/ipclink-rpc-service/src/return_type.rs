use std::any::TypeId;
use std::fmt;

/// The caller-visible shape a declared method returns.
///
/// Call adapter factories match on the shape (and on method tags) to decide
/// whether they can produce the declared return value.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ReturnShape {
    /// A plain value, produced by blocking until the call resolves.
    Value,
    /// A `Future` resolving to the decoded value.
    Future,
    /// A `Stream` yielding the decoded value.
    Stream,
    /// Any user-defined shape, identified by name.
    Custom(&'static str),
}

/// Runtime description of a declared return type.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReturnType {
    shape: ReturnShape,
    type_id: TypeId,
    type_name: &'static str,
    output_type_id: TypeId,
    output_type_name: &'static str,
}

impl ReturnType {
    /// Describes `R`, whose decoded payload is of type `O`.
    ///
    /// For [`ReturnShape::Value`] `R` and `O` are normally the same type.
    pub fn of<R: 'static, O: 'static>(shape: ReturnShape) -> Self {
        Self {
            shape,
            type_id: TypeId::of::<R>(),
            type_name: std::any::type_name::<R>(),
            output_type_id: TypeId::of::<O>(),
            output_type_name: std::any::type_name::<O>(),
        }
    }

    pub fn shape(&self) -> ReturnShape {
        self.shape
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The type the response payload decodes into.
    pub fn output_type_id(&self) -> TypeId {
        self.output_type_id
    }

    pub fn output_type_name(&self) -> &'static str {
        self.output_type_name
    }

    pub fn is_unit(&self) -> bool {
        self.output_type_id == TypeId::of::<()>()
    }
}

impl fmt::Debug for ReturnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReturnType")
            .field("shape", &self.shape)
            .field("type_name", &self.type_name)
            .field("output_type_name", &self.output_type_name)
            .finish()
    }
}

impl fmt::Display for ReturnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name)
    }
}
