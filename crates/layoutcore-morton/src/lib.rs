#![doc = include_str!("../README.md")]

mod hierarchy;
mod morton;

pub use hierarchy::{calc_common_prefix, find_split, generate_hierarchy, HNode, HNodeId, MortonCode};
pub use morton::{decode, encode, encode_point, morton_2d_u16};
