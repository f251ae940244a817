//! Tree generation from instruction codes: species, the generation engine,
//! post-generation hooks, and recording standing trees back into codes.
#![forbid(unsafe_code)]

pub mod context;
pub mod events;
pub mod features;
pub mod generate;
pub mod record;
pub mod species;

pub use context::{GenerationContext, PostGenerationContext};
pub use events::{EventBus, EventEnvelope, GenEvent};
pub use features::GenFeature;
pub use generate::{GenerationOutcome, GenerationReport, MAX_FORK_DEPTH, generate};
pub use record::{DEFAULT_RECORD_FACING, record_tree};
pub use species::{Species, SpeciesCatalog, SpeciesConfig, SpeciesLookup, TreeSpecies};
