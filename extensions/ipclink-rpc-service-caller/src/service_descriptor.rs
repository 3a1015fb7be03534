use crate::RpcCallerError;
use std::fmt;

/// How the peer endpoint is addressed within its process.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ServiceTarget {
    Action(String),
    ClassName(String),
}

/// Identifies the remote endpoint a linker binds to.
///
/// Created once when the linker is built and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceDescriptor {
    peer: String,
    target: ServiceTarget,
}

impl ServiceDescriptor {
    /// Validates and builds a descriptor. When both `action` and `class_name`
    /// are given, the action wins.
    pub fn new(
        peer: impl Into<String>,
        action: Option<String>,
        class_name: Option<String>,
    ) -> Result<Self, RpcCallerError> {
        let peer = peer.into();
        if is_blank(Some(&peer)) {
            return Err(RpcCallerError::configuration("Peer name required."));
        }

        let target = match (action, class_name) {
            (Some(action), _) if !is_blank(Some(&action)) => ServiceTarget::Action(action),
            (_, Some(class_name)) if !is_blank(Some(&class_name)) => {
                ServiceTarget::ClassName(class_name)
            }
            _ => {
                return Err(RpcCallerError::configuration(
                    "You must set one of the action or class name.",
                ));
            }
        };

        Ok(Self { peer, target })
    }

    pub fn peer(&self) -> &str {
        &self.peer
    }

    pub fn target(&self) -> &ServiceTarget {
        &self.target
    }
}

impl fmt::Display for ServiceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            ServiceTarget::Action(action) => write!(f, "{}#{}", self.peer, action),
            ServiceTarget::ClassName(class_name) => write!(f, "{}/{}", self.peer, class_name),
        }
    }
}

fn is_blank(value: Option<&String>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}
