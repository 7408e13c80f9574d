pub mod stage0_classify;
pub mod stage1_build;
pub mod stage2_render;

pub use stage0_classify::*;
pub use stage1_build::*;
pub use stage2_render::*;
