pub mod grain;
pub mod input;
pub mod marking;
pub mod normalize;
pub mod pipeline;
pub mod rotation;
pub mod sequence;
pub mod types;
