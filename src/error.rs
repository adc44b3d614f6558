use thiserror::Error;

pub type Result<T> = std::result::Result<T, FetchError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
	#[error("request failed: {0}")]
	Request(String),

	#[error("HTTP {0}")]
	Status(u16),

	#[error("invalid payload: {0}")]
	Decode(String),
}

impl From<serde_json::Error> for FetchError {
	fn from(err: serde_json::Error) -> Self {
		FetchError::Decode(err.to_string())
	}
}
