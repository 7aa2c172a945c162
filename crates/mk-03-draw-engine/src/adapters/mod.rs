//! ## Mock vs Production
//!
//! | Adapter | Mock (Testing) | Production |
//! |---------|----------------|------------|
//! | `RandomSource` | `FixedRandomSource` | `ThreadRandomSource` |

pub mod random;

pub use random::{FixedRandomSource, ThreadRandomSource};
