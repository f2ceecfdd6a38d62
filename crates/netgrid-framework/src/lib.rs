//! netgrid-framework — the host scheduler model that plugins run against.
//!
//! A scheduling [`Session`] carries the jobs of one scheduling cycle and the
//! extension points plugins register into. Plugins are built from their
//! [`Arguments`] (usually through a [`PluginRegistry`]), opened against a
//! session, and closed when the cycle ends.
//!
//! # Architecture
//!
//! ```text
//! PluginRegistry ── build(name, Arguments) ──> Box<dyn Plugin>
//!
//! Session
//!   ├── jobs: JobId → JobInfo (tasks, min member)
//!   └── batch node-order fns: plugin name → Arc<dyn BatchNodeOrder>
//!         └── batch_node_order(task, nodes) sums every plugin's scores
//! ```

pub mod arguments;
pub mod error;
pub mod registry;
pub mod session;
pub mod types;

pub use arguments::Arguments;
pub use error::{FrameworkError, FrameworkResult};
pub use registry::{PluginBuilder, PluginRegistry};
pub use session::{BatchNodeOrder, Plugin, Session};
pub use types::*;
