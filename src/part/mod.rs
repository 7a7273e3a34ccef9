//! 角色部件：描述数据、绑定结果与部件目录

mod binder;
mod catalog;
mod customizer;

pub use binder::bind;
pub use catalog::{AvatarCatalog, AvatarConfig, PartSlot};
pub use customizer::AvatarCustomizer;

use std::sync::Arc;

use glam::{Mat4, Quat, Vec3};

use crate::mesh::MeshData;
use crate::skeleton::{BoneId, Skeleton};

/// 部件网格源（相当于部件预制体）
///
/// `translation` / `rotation` / `scale` 是部件实例相对于部件父节点的本地变换。
#[derive(Clone, Debug)]
pub struct PartMesh {
    pub mesh: MeshData,
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl PartMesh {
    pub fn new(mesh: MeshData) -> Self {
        Self {
            mesh,
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    pub fn with_transform(mut self, translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        self.translation = translation;
        self.rotation = rotation;
        self.scale = scale;
        self
    }

    pub fn local_transform(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// 部件网格使用的骨骼名称列表，顺序与网格权重中的骨骼索引一致
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BoneMap {
    pub bone_names: Vec<String>,
}

impl BoneMap {
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self {
            bone_names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// 从网格骨骼数组记录骨骼名称，缺失的骨骼记为空字符串
    pub fn capture(skeleton: &Skeleton, bones: &[Option<BoneId>]) -> Self {
        let bone_names = bones
            .iter()
            .map(|bone| {
                bone.and_then(|id| skeleton.name(id))
                    .unwrap_or_default()
                    .to_string()
            })
            .collect();
        Self { bone_names }
    }

    pub fn len(&self) -> usize {
        self.bone_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bone_names.is_empty()
    }
}

/// 部件描述（只读的制作期数据）
#[derive(Clone, Debug)]
pub struct PartDescriptor {
    pub name: String,
    pub mesh: Option<Arc<PartMesh>>,
    pub bone_map: Option<BoneMap>,
}

impl PartDescriptor {
    pub fn new(name: impl Into<String>, mesh: PartMesh, bone_map: BoneMap) -> Self {
        Self {
            name: name.into(),
            mesh: Some(Arc::new(mesh)),
            bone_map: Some(bone_map),
        }
    }

    pub fn bone_names(&self) -> &[String] {
        self.bone_map
            .as_ref()
            .map(|m| m.bone_names.as_slice())
            .unwrap_or(&[])
    }
}

/// 运行时绑定的部件实例
///
/// `bones[i]` 对应网格权重中的局部骨骼索引 `i`，`None` 表示该骨骼在运行时骨架中不存在。
#[derive(Clone, Debug)]
pub struct BoundPart {
    pub part_name: String,
    /// 部件网格的独立副本
    pub mesh: MeshData,
    pub bones: Vec<Option<BoneId>>,
    /// 部件实例挂载的父节点
    pub parent: BoneId,
    pub local_transform: Mat4,
    /// 合并后原部件不再渲染
    pub active: bool,
}

impl BoundPart {
    /// 部件实例的世界变换 = parent.global * local
    pub fn world_transform(&self, skeleton: &Skeleton) -> Mat4 {
        skeleton.global_transform(self.parent) * self.local_transform
    }

    pub fn resolved_count(&self) -> usize {
        self.bones.iter().filter(|b| b.is_some()).count()
    }

    pub fn is_fully_resolved(&self) -> bool {
        self.bones.iter().all(Option::is_some)
    }
}
