use serde::Serialize;

/// Fatal failures of a render pass.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not load records: {message}")]
    LoadFailure { message: String },
    #[error("no usable records (every row has an empty id)")]
    EmptyInput,
    #[error("no root could be determined")]
    NoRootFound,
    #[error("unknown node id: {id}")]
    UnknownNode { id: String },
}

impl Error {
    pub fn load(message: impl Into<String>) -> Self {
        Error::LoadFailure { message: message.into() }
    }

    /// Stable kind tag used by the frontend.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::LoadFailure { .. } => "load_failure",
            Error::EmptyInput => "empty_input",
            Error::NoRootFound => "no_root_found",
            Error::UnknownNode { .. } => "unknown_node",
        }
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        Error::load(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::load(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Non-fatal data inconsistencies found while building the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A record named a parent id with no record of its own; a stub was created.
    MissingParent { parent: String, child: String },
    /// A later record reused an id; it was ignored.
    DuplicateId { id: String },
    /// More than one node qualified as root; the first inserted was kept.
    AmbiguousRoot { chosen: String, candidates: Vec<String> },
    /// A record named itself as its parent; the link was skipped.
    SelfParent { id: String },
    /// A link pointed back into an already placed node and was dropped.
    CycleBroken { parent: String, child: String },
    /// The node is not reachable from the root and was left out of the tree.
    Unreachable { id: String },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::MissingParent { parent, child } => {
                write!(f, "parent '{}' of '{}' not found, created stub", parent, child)
            }
            Diagnostic::DuplicateId { id } => write!(f, "duplicate id '{}' ignored", id),
            Diagnostic::AmbiguousRoot { chosen, candidates } => write!(
                f,
                "{} root candidates ({}), using '{}'",
                candidates.len(),
                candidates.join(", "),
                chosen
            ),
            Diagnostic::SelfParent { id } => write!(f, "'{}' names itself as parent", id),
            Diagnostic::CycleBroken { parent, child } => {
                write!(f, "cycle: dropped link '{}' -> '{}'", parent, child)
            }
            Diagnostic::Unreachable { id } => write!(f, "'{}' is not reachable from the root", id),
        }
    }
}
