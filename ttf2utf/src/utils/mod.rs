// ttf2utf/src/utils/mod.rs
pub mod map_source;
