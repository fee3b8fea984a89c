//! Task loading: the JSON description format and the builder that resolves
//! it into a [`Problem`](crate::data::Problem).

mod builder;
mod description;
mod stratify;

pub use builder::ProblemBuilder;
pub use description::{
    ActionDescription, AxiomDescription, ConditionalEffectDescription, ConstraintDescription,
    ExpressionDescription, LiteralDescription, NumericEffectDescription, NumericInitDescription,
    SymbolDescription, TaskDescription,
};
pub use stratify::stratify;

use crate::data::{Problem, Repository};
use crate::error::Result;
use std::path::Path;

/// Parse and resolve a JSON task file.
pub fn load_task(path: &Path) -> Result<(Problem, Repository)> {
    let description = TaskDescription::from_path(path)?;
    ProblemBuilder::new().build(&description)
}
