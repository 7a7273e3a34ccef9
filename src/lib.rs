//! Avatar Engine - 模块化蒙皮角色组装
//!
//! 将共享同一骨架、独立制作的部件网格（头发、上衣、下装）在运行时合并为
//! 单一蒙皮网格：
//! - 骨骼名称索引（骨骼名 → 运行时骨骼）
//! - 部件绑定（按名称重建部件骨骼数组）
//! - 静止姿态恢复（避免多次烘焙的姿态漂移）
//! - 网格合并（统一骨骼数组、权重重映射、绑定矩阵重算）

pub mod assembler;
pub mod bake;
pub mod config;
pub mod mesh;
pub mod part;
pub mod pose;
pub mod skeleton;
pub mod skinning;

pub use assembler::{AvatarAssembler, OutputRenderer};
pub use config::AssemblerConfig;
pub use mesh::{Aabb, CombinedMesh, MeshData, RuntimeVertex, SkinWeight};
pub use part::{
    AvatarCatalog, AvatarConfig, AvatarCustomizer, BoneMap, BoundPart, PartDescriptor, PartMesh,
    PartSlot,
};
pub use pose::{BonePose, RestPose};
pub use skeleton::{Bone, BoneId, BoneNameIndex, Skeleton};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AvatarError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Pose parse error: {0}")]
    PoseParse(String),

    #[error("Bone {0} is not part of the skeleton")]
    InvalidBone(BoneId),

    #[error("Bone {bone} has invalid parent {parent}")]
    InvalidParent { bone: BoneId, parent: BoneId },
}

pub type Result<T> = std::result::Result<T, AvatarError>;

/// 组装过程中的非致命问题
///
/// 这些情况只记录并输出警告，不会中断组装流程。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssemblyWarning {
    #[error("Part '{part}': bone '{bone}' (slot {slot}) not found in rig")]
    MissingBone {
        part: String,
        bone: String,
        slot: usize,
    },

    #[error("Part '{part}' has no skinned mesh")]
    MissingMesh { part: String },

    #[error("Part '{part}' has an empty bone map")]
    EmptyBoneMap { part: String },

    #[error("No parts to bake.")]
    NoPartsToBake,

    #[error("No part bone resolved in rig, nothing to skin against.")]
    NoResolvedBones,

    #[error("Bone '{bone}' not found in rig.")]
    UnknownUnifiedBone { bone: String },

    #[error("Part '{part}': {weights} weight records for {vertices} vertices")]
    WeightCountMismatch {
        part: String,
        vertices: usize,
        weights: usize,
    },

    #[error("Part '{part}': dropped invalid triangle {triangle}")]
    InvalidTriangle { part: String, triangle: usize },

    #[error("No options available for slot {slot}")]
    EmptySlot { slot: PartSlot },
}

impl AssemblyWarning {
    /// 输出日志并追加到警告列表
    pub(crate) fn report(self, warnings: &mut Vec<AssemblyWarning>) {
        log::warn!("{}", self);
        warnings.push(self);
    }
}
