#![allow(non_camel_case_types)]
#![allow(non_upper_case_globals)]
#![allow(non_snake_case)]

pub mod common;
pub mod error;
pub mod face;
pub mod font;
pub mod heuristics;
pub mod linebreak;
pub mod ot;
pub mod ot_layout;
pub mod ot_shaper;
pub mod ot_shaper_hangul;
pub mod ot_shaper_hebrew;
pub mod shaper_item;
pub mod tables;
pub mod unicode;

pub type hb_tag_t = read_fonts::types::Tag;
