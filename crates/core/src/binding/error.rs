use qbind_api::TypeName;
use thiserror::Error;

/// Problems with a single descriptor. Reported to the registry, never fatal to the pass.
#[derive(Error, Debug)]
pub enum BindingError {
    #[error("{type_name} has wrong number of type arguments (expected {expected}, found {found})")]
    WrongTypeArguments {
        type_name: TypeName,
        expected: usize,
        found: usize,
    },
    #[error("Error creating instance of: {type_name} reason: {reason}")]
    Construction { type_name: TypeName, reason: String },
}
