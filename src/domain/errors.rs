#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    UnknownFilter(String),
    UnknownSubFilter(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainError::UnknownFilter(name) => {
                write!(f, "Unknown filter: {} (expected All, Government or Non-Government)", name)
            }
            DomainError::UnknownSubFilter(name) => {
                write!(f, "Unknown sub-filter: {} (expected All or GSI)", name)
            }
        }
    }
}

impl std::error::Error for DomainError {}
