pub mod condition;
pub mod country;
pub mod model;
pub mod normalize;
pub mod review;
