//! Concrete resources

mod basic;
mod operation_outcome;
mod parameters;

pub use basic::{Basic, BasicBuilder};
pub use operation_outcome::{
    OperationOutcome, OperationOutcomeBuilder, OperationOutcomeIssue, OperationOutcomeIssueBuilder,
};
pub use parameters::{
    Parameters, ParametersBuilder, ParametersParameter, ParametersParameterBuilder,
};
