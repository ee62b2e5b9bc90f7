mod executable;
mod query_task;
mod signature;
pub mod triggers;


pub use executable::{DeferredFn, DeferredOutput, Evaluation, Executable, StaticQuery};
pub use query_task::{ANONYMOUS_TASK, QueryTask};
pub use signature::Signature;
