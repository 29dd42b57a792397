pub mod assemble;
pub mod detect;
pub mod import;
pub mod normalize;
pub mod parse;
