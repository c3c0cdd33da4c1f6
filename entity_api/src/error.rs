//! Error types for entity API
use std::error::Error as StdError;
use std::fmt;

use serde::Serialize;

use crate::Id;

/// Errors while executing operations against the product store.
#[derive(Debug, PartialEq)]
pub struct Error {
    // Id of the record the operation targeted, when there is one
    pub id: Option<Id>,
    // Enum representing which category of error
    pub error_kind: EntityApiErrorKind,
}

#[derive(Debug, PartialEq, Serialize)]
pub enum EntityApiErrorKind {
    // Record not found
    RecordNotFound,
    // The id sequence has no values left to hand out
    IdSequenceExhausted,
}

impl Error {
    pub fn not_found(id: Id) -> Self {
        Error {
            id: Some(id),
            error_kind: EntityApiErrorKind::RecordNotFound,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Entity API Error: {:?}", self)
    }
}

impl StdError for Error {}
