#![allow(non_camel_case_types)]

mod anneal;
mod class;
mod corner;
mod cost;
mod engine;
mod file_reader;
mod geometry;
mod grouping;
mod perturb;
mod placer;
mod rtree;
pub mod util;

pub use anneal::*;
pub use class::*;
pub use corner::*;
pub use cost::*;
pub use engine::*;
pub use file_reader::*;
pub use geometry::*;
pub use grouping::*;
pub use perturb::*;
pub use placer::*;
pub use rtree::*;
pub use util::*;
