//! Error types for gem-rs nodes.

use thiserror::Error;

/// The main error type for node construction and parameter updates.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GemError {
    /// A parameter value failed validation.
    #[error("{class}: invalid argument for '{param}': {reason}")]
    InvalidArgument {
        /// Class name of the node that rejected the value.
        class: &'static str,
        /// Name of the parameter.
        param: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// A symbolic or numeric token does not name a known graphics constant.
    #[error("unknown graphics constant '{0}'")]
    UnknownToken(String),

    /// The constructor was given an unsupported argument list.
    #[error("{class}: invalid configuration: {reason}")]
    InvalidConfiguration {
        /// Class name of the node that could not be created.
        class: &'static str,
        /// Why the arguments were rejected.
        reason: String,
    },

    /// A control message named a selector the node does not understand.
    #[error("{class}: no method for '{selector}'")]
    UnknownSelector {
        /// Class name of the receiving node.
        class: &'static str,
        /// The selector that was sent.
        selector: String,
    },

    /// No node class is registered under the given name.
    #[error("unknown class '{0}'")]
    UnknownClass(String),

    /// No node with the given id is part of the chain.
    #[error("no node {0} in chain")]
    UnknownNode(crate::node::NodeId),
}

impl GemError {
    /// Creates an invalid argument error.
    pub fn invalid_argument(
        class: &'static str,
        param: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        GemError::InvalidArgument {
            class,
            param: param.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_configuration(class: &'static str, reason: impl Into<String>) -> Self {
        GemError::InvalidConfiguration {
            class,
            reason: reason.into(),
        }
    }

    /// Creates an unknown selector error.
    pub fn unknown_selector(class: &'static str, selector: impl Into<String>) -> Self {
        GemError::UnknownSelector {
            class,
            selector: selector.into(),
        }
    }
}

/// A specialized Result type for gem-rs node operations.
pub type Result<T> = std::result::Result<T, GemError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_argument_display() {
        let err = GemError::invalid_argument("GEMglDepthFunc", "func", "out of range");
        assert_eq!(
            err.to_string(),
            "GEMglDepthFunc: invalid argument for 'func': out of range"
        );
    }

    #[test]
    fn invalid_configuration_display() {
        let err = GemError::invalid_configuration("GEMglDepthFunc", "invalid number of arguments");
        assert_eq!(
            err.to_string(),
            "GEMglDepthFunc: invalid configuration: invalid number of arguments"
        );
    }

    #[test]
    fn unknown_token_display() {
        let err = GemError::UnknownToken("GL_BOGUS".to_string());
        assert_eq!(err.to_string(), "unknown graphics constant 'GL_BOGUS'");
    }
}
