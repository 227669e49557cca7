pub mod chosung;
pub mod normalize;
