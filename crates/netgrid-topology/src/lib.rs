//! netgrid-topology — network switch hierarchy and compact node selection.
//!
//! Describes a cluster's switch fabric and picks node subsets that span as
//! few leaf switches as possible, so tightly coupled jobs see fewer network
//! hops between members.
//!
//! # Components
//!
//! - **`record`**: switch record file format (TOML)
//! - **`hostlist`**: `node[01-04]` style name expansion
//! - **`tree`**: validated switch hierarchy
//! - **`eval`**: leaf-switch minimizing node selection
//! - **`evaluator`**: the [`TopologyEvaluator`] contract plugins depend on

pub mod error;
pub mod eval;
pub mod evaluator;
pub mod hostlist;
pub mod record;
pub mod tree;

pub use error::{TopologyError, TopologyResult};
pub use eval::Selection;
pub use evaluator::{SwitchTreeEvaluator, TopologyEvaluator};
pub use record::{SwitchRecord, SwitchRecordFile};
pub use tree::{Switch, SwitchTree};
