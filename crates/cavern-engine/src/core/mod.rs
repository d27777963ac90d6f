pub use self::{direction::*, grid::*, seed::*, weapon::*};

pub(crate) mod direction;
pub(crate) mod grid;
pub(crate) mod seed;
pub(crate) mod weapon;
