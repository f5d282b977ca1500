pub use crate::geometry::Rect;
pub use bon::Builder;
pub use colored::Colorize;
pub use derive_new::new;
pub use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
pub use itertools::Itertools;
pub use log::{debug, error, info, warn};
pub use logging_timer::{finish, time, timer};
pub use ordered_float::OrderedFloat;
pub use rand::distributions::{Distribution, WeightedIndex};
pub use rand::rngs::StdRng;
pub use rand::seq::SliceRandom;
pub use rand::{Rng, SeedableRng};
pub use rayon::prelude::*;
pub use rstar::{primitives::GeomWithData, RTree};
pub use std::fmt;

pub type float = f64;
pub type Set<T> = foldhash::HashSet<T>;
pub type Dict<K, V> = foldhash::HashMap<K, V>;
pub type IndexMap<K, V> = indexmap::IndexMap<K, V, foldhash::fast::RandomState>;
pub type Vector2 = (float, float);

pub fn norm1(p1: Vector2, p2: Vector2) -> float {
    (p1.0 - p2.0).abs() + (p1.1 - p2.1).abs()
}

/// Inclusive-start, exclusive-end arithmetic progression over floats.
pub fn float_range(start: float, end: float, step: float) -> Vec<float> {
    debug_assert!(step > 0.0);
    let mut values = Vec::new();
    let mut x = start;
    while x < end {
        values.push(x);
        x += step;
    }
    values
}
