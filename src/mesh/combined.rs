//! 合并后的蒙皮网格

use glam::{Mat4, Vec2, Vec3};

use super::{Aabb, SkinWeight};
use crate::skeleton::BoneId;

/// 烘焙输出：所有部件合并后的单一蒙皮网格（骨架根空间）
#[derive(Clone, Debug, Default)]
pub struct CombinedMesh {
    pub name: String,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub weights: Vec<SkinWeight>,
    /// 三角形列表
    pub indices: Vec<u32>,
    /// 统一骨骼数组，`weights` 中的索引指向这里
    pub bones: Vec<BoneId>,
    pub bone_names: Vec<String>,
    /// 每根统一骨骼一个绑定矩阵 = inverse(bone.global) * root.global
    pub bind_poses: Vec<Mat4>,
    pub bounds: Aabb,
}

impl CombinedMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    /// 查找统一骨骼数组中的位置
    pub fn bone_index(&self, name: &str) -> Option<usize> {
        self.bone_names.iter().position(|n| n == name)
    }

    pub fn recalculate_bounds(&mut self) {
        self.bounds = Aabb::from_points(&self.positions);
    }
}
