use num::cast::{FromPrimitive, ToPrimitive};
use num::traits::Num;

/// Generic type that can be stored in the 2d pixel-domain containers
pub trait ValueType: Num + PartialOrd + ToPrimitive + FromPrimitive + Copy {}

// Impl for all matching types
impl<T> ValueType for T where T: Num + PartialOrd + ToPrimitive + FromPrimitive + Copy {}
