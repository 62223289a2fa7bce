pub mod error;
pub mod hover;
pub mod models;
pub mod stance_logic;
pub mod validation;

pub use error::{Error, ErrorCode};
pub use hover::{HoverDelays, HoverEvent, HoverMachine, HoverState, SurfaceCommand};
pub use models::*;
pub use stance_logic::dominant;
pub use validation::*;
