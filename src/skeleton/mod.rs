//! 骨骼层级与名称索引

mod bone;
mod hierarchy;
mod registry;

pub use bone::Bone;
pub use hierarchy::Skeleton;
pub use registry::BoneNameIndex;

/// 骨骼在 [`Skeleton`] 中的索引
pub type BoneId = usize;
