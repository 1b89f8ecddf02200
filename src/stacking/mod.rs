mod accumulator;
mod assign;
mod driver;
mod error;
mod halo_id;
mod profile;
mod progress;

pub use accumulator::ProfileAccumulator;
pub use assign::{DEFAULT_MASS_EDGES, DEFAULT_REDSHIFT_EDGES, StackAssignment, assign_stacks};
pub use driver::StackingDriver;
pub use error::StackError;
pub use halo_id::{HaloIdPattern, SimulationKind};
pub use profile::{ProfileBin, StackedProfile};
pub use progress::StackProgress;
