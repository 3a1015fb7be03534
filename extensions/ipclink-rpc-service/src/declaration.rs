use crate::codec::{self, ArgsEncoder, ResultDecoder};
use crate::{ReturnType, method_id_hash};
use bitcode::{DecodeOwned, Encode};
use std::collections::HashMap;
use std::fmt;

/// Method names a proxy answers locally and therefore cannot be declared
/// as remote methods.
pub const RESERVED_METHOD_NAMES: &[&str] = &["clone", "eq", "ne", "hash", "fmt", "to_string"];

/// Static description of one remotely invocable interface method.
#[derive(Debug, Clone)]
pub struct MethodDeclaration {
    interface_name: &'static str,
    name: &'static str,
    method_id: u64,
    param_names: &'static [&'static str],
    return_type: ReturnType,
    tags: &'static [&'static str],
    encode_args: ArgsEncoder,
    decode_result: ResultDecoder,
}

impl MethodDeclaration {
    /// Declares a method whose arguments are the tuple `A` and whose response
    /// payload decodes into `O`, both using the default bitcode codec.
    pub fn new<A, O>(
        interface_name: &'static str,
        name: &'static str,
        param_names: &'static [&'static str],
        return_type: ReturnType,
        tags: &'static [&'static str],
    ) -> Self
    where
        A: Encode + 'static,
        O: DecodeOwned + Send + 'static,
    {
        Self::with_codec(
            interface_name,
            name,
            param_names,
            return_type,
            tags,
            codec::encode_args::<A>,
            codec::decode_result::<O>,
        )
    }

    pub fn with_codec(
        interface_name: &'static str,
        name: &'static str,
        param_names: &'static [&'static str],
        return_type: ReturnType,
        tags: &'static [&'static str],
        encode_args: ArgsEncoder,
        decode_result: ResultDecoder,
    ) -> Self {
        Self {
            interface_name,
            name,
            method_id: method_id_hash(&format!("{interface_name}.{name}")),
            param_names,
            return_type,
            tags,
            encode_args,
            decode_result,
        }
    }

    pub fn interface_name(&self) -> &'static str {
        self.interface_name
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn method_id(&self) -> u64 {
        self.method_id
    }

    pub fn param_names(&self) -> &'static [&'static str] {
        self.param_names
    }

    pub fn return_type(&self) -> &ReturnType {
        &self.return_type
    }

    pub fn tags(&self) -> &'static [&'static str] {
        self.tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(&tag)
    }

    pub fn args_encoder(&self) -> ArgsEncoder {
        self.encode_args
    }

    pub fn result_decoder(&self) -> ResultDecoder {
        self.decode_result
    }

    /// `interface.method(param, ...)`
    pub fn signature(&self) -> String {
        format!(
            "{}.{}({})",
            self.interface_name,
            self.name,
            self.param_names.join(", ")
        )
    }
}

/// A declared interface: a name plus the methods that become remote calls.
#[derive(Debug, Clone)]
pub struct InterfaceDeclaration {
    name: &'static str,
    methods: Vec<MethodDeclaration>,
}

impl InterfaceDeclaration {
    pub fn new(name: &'static str, methods: Vec<MethodDeclaration>) -> Self {
        Self { name, methods }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn methods(&self) -> &[MethodDeclaration] {
        &self.methods
    }

    pub fn method(&self, name: &str) -> Option<&MethodDeclaration> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Checks that the declaration describes a pure remote interface.
    pub fn validate(&self) -> Result<(), DeclarationError> {
        if self.name.trim().is_empty() {
            return Err(DeclarationError::BlankInterfaceName);
        }

        let mut seen_ids: HashMap<u64, &'static str> = HashMap::new();

        for method in &self.methods {
            if method.interface_name != self.name {
                return Err(DeclarationError::ForeignMethod {
                    interface: self.name,
                    method: method.name,
                    declared_on: method.interface_name,
                });
            }

            if RESERVED_METHOD_NAMES.contains(&method.name) {
                return Err(DeclarationError::ReservedMethod {
                    interface: self.name,
                    method: method.name,
                });
            }

            if let Some(existing) = seen_ids.insert(method.method_id, method.name) {
                return Err(if existing == method.name {
                    DeclarationError::DuplicateMethod {
                        interface: self.name,
                        method: method.name,
                    }
                } else {
                    DeclarationError::MethodIdCollision {
                        interface: self.name,
                        first: existing,
                        second: method.name,
                    }
                });
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclarationError {
    BlankInterfaceName,
    DuplicateMethod {
        interface: &'static str,
        method: &'static str,
    },
    ReservedMethod {
        interface: &'static str,
        method: &'static str,
    },
    MethodIdCollision {
        interface: &'static str,
        first: &'static str,
        second: &'static str,
    },
    ForeignMethod {
        interface: &'static str,
        method: &'static str,
        declared_on: &'static str,
    },
}

impl fmt::Display for DeclarationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclarationError::BlankInterfaceName => write!(f, "interface name must not be blank"),
            DeclarationError::DuplicateMethod { interface, method } => {
                write!(f, "`{interface}` declares `{method}` more than once")
            }
            DeclarationError::ReservedMethod { interface, method } => write!(
                f,
                "`{interface}.{method}` shadows a method the proxy handles locally"
            ),
            DeclarationError::MethodIdCollision {
                interface,
                first,
                second,
            } => write!(
                f,
                "`{interface}.{first}` and `{interface}.{second}` hash to the same method ID"
            ),
            DeclarationError::ForeignMethod {
                interface,
                method,
                declared_on,
            } => write!(
                f,
                "`{interface}` lists `{declared_on}.{method}`, which belongs to another interface"
            ),
        }
    }
}

impl std::error::Error for DeclarationError {}
