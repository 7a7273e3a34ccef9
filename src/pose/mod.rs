//! 静止姿态快照与恢复

mod pose_file;

use glam::{Quat, Vec3};

use crate::skeleton::{BoneId, BoneNameIndex, Skeleton};

/// 单根骨骼的静止本地位姿
#[derive(Clone, Debug, PartialEq)]
pub struct BonePose {
    pub bone_name: String,
    pub local_position: Vec3,
    pub local_rotation: Quat,
}

impl BonePose {
    pub fn new(bone_name: impl Into<String>, local_position: Vec3, local_rotation: Quat) -> Self {
        Self {
            bone_name: bone_name.into(),
            local_position,
            local_rotation,
        }
    }
}

/// 静止姿态快照（制作期捕获，运行时只读）
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RestPose {
    pub bones: Vec<BonePose>,
}

impl RestPose {
    /// 记录 `root` 下所有节点（包含其本身）的本地位姿，先序遍历顺序
    pub fn capture(skeleton: &Skeleton, root: BoneId) -> Self {
        let bones = skeleton
            .traverse(root)
            .into_iter()
            .filter_map(|id| skeleton.get_bone(id))
            .map(|bone| {
                BonePose::new(bone.name.clone(), bone.local_translation, bone.local_rotation)
            })
            .collect();
        Self { bones }
    }

    /// 将快照中的本地位姿写回骨架，返回恢复的骨骼数
    ///
    /// 骨架中不存在的骨骼直接跳过。全部写入后统一重算全局变换。
    pub fn restore(&self, skeleton: &mut Skeleton, index: &BoneNameIndex) -> usize {
        let mut restored = 0;
        for pose in &self.bones {
            let Some(bone) = index.get(&pose.bone_name).and_then(|id| skeleton.get_bone_mut(id))
            else {
                continue;
            };
            bone.local_translation = pose.local_position;
            bone.local_rotation = pose.local_rotation;
            restored += 1;
        }
        skeleton.update_transforms();
        restored
    }

    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    pub fn find(&self, bone_name: &str) -> Option<&BonePose> {
        self.bones.iter().find(|b| b.bone_name == bone_name)
    }
}
