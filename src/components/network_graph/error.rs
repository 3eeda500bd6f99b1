/// Reasons an input node is excluded from layout.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
	#[error("node has an empty entity id")]
	MissingId,
	#[error("deployment node {id} has no deployment payload")]
	MissingDeployment { id: String },
	#[error("deployment node {id} has no namespace")]
	MissingNamespace { id: String },
	#[error("node {id} has unexpected entity type")]
	UnexpectedType { id: String },
}

pub type Result<T> = std::result::Result<T, InputError>;
