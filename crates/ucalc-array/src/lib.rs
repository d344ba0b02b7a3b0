//! # ucalc-array - N-dimensional arrays of uncertain numbers
//!
//! Every elementwise operation goes through [`array_ufunc`], which broadcasts
//! the inputs and applies the scalar operation element by element. Accessors
//! and reductions are methods on [`UncertainArray`].

pub mod error;
pub mod array;
pub mod broadcast;
pub mod ufunc;
pub mod dispatch;
pub mod accessor;
pub mod reduce;
mod materialize;

pub use accessor::Labels;
pub use array::{Outcome, Output, UncertainArray};
pub use broadcast::{co_broadcast, Operand};
pub use dispatch::array_ufunc;
pub use error::{ArrayError, ArrayResult};
pub use ufunc::{Method, Ufunc, UfuncOptions};

pub mod prelude {
    pub use ucalc_num::prelude::*;
    pub use crate::accessor::Labels;
    pub use crate::array::{Outcome, Output, UncertainArray};
    pub use crate::broadcast::{co_broadcast, Operand};
    pub use crate::dispatch::array_ufunc;
    pub use crate::error::{ArrayError, ArrayResult};
    pub use crate::ufunc::{Method, Ufunc, UfuncOptions};
}
