use derm_types::CodeError;

use crate::registry::Domain;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid code: {0}")]
    Code(#[from] CodeError),

    #[error("invalid {domain} code '{code}': {source}")]
    InvalidCode {
        domain: Domain,
        code: String,
        #[source]
        source: CodeError,
    },
    #[error("invalid label for {domain} code '{code}': {source}")]
    InvalidLabel {
        domain: Domain,
        code: String,
        #[source]
        source: CodeError,
    },
    #[error("duplicate {domain} code '{code}'")]
    DuplicateCode { domain: Domain, code: String },
    #[error("{domain} alias '{alias}' points to unknown code '{target}'")]
    DanglingAlias {
        domain: Domain,
        alias: String,
        target: String,
    },
    #[error("{domain} alias '{alias}' points to another alias '{target}'")]
    AliasChain {
        domain: Domain,
        alias: String,
        target: String,
    },

    #[error("{domain} option '{code}' is not in the {domain} table")]
    ReferentialMismatch { domain: Domain, code: String },
    #[error("{domain} option '{code}' is an alias; options must use successor codes")]
    AliasInOptions { domain: Domain, code: String },
    #[error("{domain} option '{code}' is listed more than once")]
    DuplicateOption { domain: Domain, code: String },
}

pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
