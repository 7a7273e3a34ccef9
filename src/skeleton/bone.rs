//! 骨骼节点

use glam::{Mat4, Quat, Vec3};

use super::BoneId;

/// 骨骼节点
#[derive(Clone, Debug)]
pub struct Bone {
    pub name: String,
    /// 只由 Skeleton::add_bone 设置，保证父节点索引小于子节点
    pub(super) parent: Option<BoneId>,

    // 本地变换（相对于父节点）
    pub local_translation: Vec3,
    pub local_rotation: Quat,
    pub local_scale: Vec3,

    // 变换结果（由 Skeleton::update_transforms 维护）
    pub local_transform: Mat4,
    pub global_transform: Mat4,
}

impl Bone {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            local_translation: Vec3::ZERO,
            local_rotation: Quat::IDENTITY,
            local_scale: Vec3::ONE,
            local_transform: Mat4::IDENTITY,
            global_transform: Mat4::IDENTITY,
        }
    }

    /// 设置本地位姿（不修改缩放）
    pub fn set_local_pose(&mut self, translation: Vec3, rotation: Quat) {
        self.local_translation = translation;
        self.local_rotation = rotation;
        self.update_local_transform();
    }

    /// 更新本地变换 = T * R * S
    pub fn update_local_transform(&mut self) {
        self.local_transform = Mat4::from_scale_rotation_translation(
            self.local_scale,
            self.local_rotation,
            self.local_translation,
        );
    }

    pub fn parent(&self) -> Option<BoneId> {
        self.parent
    }
}

impl Default for Bone {
    fn default() -> Self {
        Self::new(String::new())
    }
}
