mod alerts;
mod bulk;
mod collection;
mod edit;

pub use alerts::*;
pub use bulk::*;
pub use collection::*;
pub use edit::*;
