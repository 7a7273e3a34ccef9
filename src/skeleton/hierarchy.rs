//! 骨骼层级（变换树）

use glam::{Mat4, Quat, Vec3};

use super::{Bone, BoneId};
use crate::{AvatarError, Result};

/// 骨骼层级
///
/// 节点按添加顺序存储，父节点总是先于子节点添加，因此层级中不存在环。
/// 全局变换在每次修改本地位姿后由 [`Skeleton::update_transforms`] 或
/// [`Skeleton::set_local_pose`] 重新计算。
#[derive(Clone, Debug, Default)]
pub struct Skeleton {
    bones: Vec<Bone>,
    children: Vec<Vec<BoneId>>,
}

impl Skeleton {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加骨骼并返回其 ID
    ///
    /// `parent` 必须是已经存在的骨骼。
    pub fn add_bone(
        &mut self,
        name: impl Into<String>,
        parent: Option<BoneId>,
        translation: Vec3,
        rotation: Quat,
    ) -> Result<BoneId> {
        let index = self.bones.len();
        if let Some(parent_index) = parent {
            if parent_index >= index {
                return Err(AvatarError::InvalidParent {
                    bone: index,
                    parent: parent_index,
                });
            }
        }

        let mut bone = Bone::new(name);
        bone.parent = parent;
        bone.set_local_pose(translation, rotation);
        bone.global_transform = match parent {
            Some(p) => self.bones[p].global_transform * bone.local_transform,
            None => bone.local_transform,
        };

        self.bones.push(bone);
        self.children.push(Vec::new());
        if let Some(p) = parent {
            self.children[p].push(index);
        }
        Ok(index)
    }

    /// 获取骨骼数量
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    pub fn contains(&self, id: BoneId) -> bool {
        id < self.bones.len()
    }

    /// 获取骨骼
    pub fn get_bone(&self, id: BoneId) -> Option<&Bone> {
        self.bones.get(id)
    }

    /// 获取可变骨骼引用
    ///
    /// 修改本地位姿后需要调用 [`Skeleton::update_transforms`]。
    pub fn get_bone_mut(&mut self, id: BoneId) -> Option<&mut Bone> {
        self.bones.get_mut(id)
    }

    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    pub fn name(&self, id: BoneId) -> Option<&str> {
        self.bones.get(id).map(|b| b.name.as_str())
    }

    pub fn children(&self, id: BoneId) -> &[BoneId] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// 获取全局变换
    pub fn global_transform(&self, id: BoneId) -> Mat4 {
        self.bones
            .get(id)
            .map(|b| b.global_transform)
            .unwrap_or(Mat4::IDENTITY)
    }

    /// 节点相对于 `root` 的变换 = inverse(root.global) * node.global
    pub fn transform_relative_to(&self, id: BoneId, root: BoneId) -> Mat4 {
        self.global_transform(root).inverse() * self.global_transform(id)
    }

    /// 设置本地位姿并更新该节点子树的全局变换
    pub fn set_local_pose(&mut self, id: BoneId, translation: Vec3, rotation: Quat) {
        if let Some(bone) = self.bones.get_mut(id) {
            bone.set_local_pose(translation, rotation);
            self.update_global_transform_recursive(id);
        }
    }

    /// 从所有根骨骼重新计算全局变换
    pub fn update_transforms(&mut self) {
        for bone in &mut self.bones {
            bone.update_local_transform();
        }
        // 父节点索引总是小于子节点索引，按顺序遍历即可保证父节点先更新
        for i in 0..self.bones.len() {
            let parent_global = self.bones[i]
                .parent
                .map(|p| self.bones[p].global_transform)
                .unwrap_or(Mat4::IDENTITY);
            self.bones[i].global_transform = parent_global * self.bones[i].local_transform;
        }
    }

    fn update_global_transform_recursive(&mut self, id: BoneId) {
        let parent_global = self.bones[id]
            .parent
            .map(|p| self.bones[p].global_transform)
            .unwrap_or(Mat4::IDENTITY);
        self.bones[id].global_transform = parent_global * self.bones[id].local_transform;

        for i in 0..self.children[id].len() {
            let child = self.children[id][i];
            self.update_global_transform_recursive(child);
        }
    }

    /// 深度优先先序遍历（包含 `root` 本身），子节点按添加顺序访问
    pub fn traverse(&self, root: BoneId) -> Vec<BoneId> {
        let mut order = Vec::new();
        if !self.contains(root) {
            return order;
        }

        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children[id].iter().rev().copied());
        }
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> (Skeleton, BoneId, BoneId, BoneId) {
        let mut skeleton = Skeleton::new();
        let root = skeleton
            .add_bone("Root", None, Vec3::new(0.0, 1.0, 0.0), Quat::IDENTITY)
            .unwrap();
        let spine = skeleton
            .add_bone("Spine", Some(root), Vec3::new(0.0, 0.5, 0.0), Quat::IDENTITY)
            .unwrap();
        let head = skeleton
            .add_bone("Head", Some(spine), Vec3::new(0.0, 0.25, 0.0), Quat::IDENTITY)
            .unwrap();
        (skeleton, root, spine, head)
    }

    #[test]
    fn test_global_transform_accumulates() {
        let (skeleton, _, _, head) = chain();
        let pos = skeleton.global_transform(head).transform_point3(Vec3::ZERO);
        assert!(pos.abs_diff_eq(Vec3::new(0.0, 1.75, 0.0), 1e-5));
    }

    #[test]
    fn test_set_local_pose_updates_children() {
        let (mut skeleton, _, spine, head) = chain();
        skeleton.set_local_pose(
            spine,
            Vec3::new(0.0, 0.5, 0.0),
            Quat::from_rotation_z(std::f32::consts::FRAC_PI_2),
        );
        let pos = skeleton.global_transform(head).transform_point3(Vec3::ZERO);
        assert!(pos.abs_diff_eq(Vec3::new(-0.25, 1.5, 0.0), 1e-5));
    }

    #[test]
    fn test_relative_transform() {
        let (skeleton, root, _, head) = chain();
        let pos = skeleton
            .transform_relative_to(head, root)
            .transform_point3(Vec3::ZERO);
        assert!(pos.abs_diff_eq(Vec3::new(0.0, 0.75, 0.0), 1e-5));
    }

    #[test]
    fn test_invalid_parent_rejected() {
        let mut skeleton = Skeleton::new();
        let err = skeleton.add_bone("Orphan", Some(3), Vec3::ZERO, Quat::IDENTITY);
        assert!(matches!(
            err,
            Err(AvatarError::InvalidParent { bone: 0, parent: 3 })
        ));
    }

    #[test]
    fn test_pose_edit_through_get_bone_mut() {
        let (mut skeleton, root, spine, head) = chain();
        assert_eq!(skeleton.get_bone(spine).unwrap().parent(), Some(root));

        skeleton.get_bone_mut(spine).unwrap().local_translation = Vec3::new(0.0, 2.0, 0.0);
        skeleton.update_transforms();
        let pos = skeleton.global_transform(head).transform_point3(Vec3::ZERO);
        assert!(pos.abs_diff_eq(Vec3::new(0.0, 3.25, 0.0), 1e-5));
        assert_eq!(skeleton.get_bone(head).unwrap().parent(), Some(spine));
    }

    #[test]
    fn test_traverse_is_preorder() {
        let mut skeleton = Skeleton::new();
        let root = skeleton.add_bone("Root", None, Vec3::ZERO, Quat::IDENTITY).unwrap();
        let a = skeleton.add_bone("A", Some(root), Vec3::ZERO, Quat::IDENTITY).unwrap();
        let b = skeleton.add_bone("B", Some(root), Vec3::ZERO, Quat::IDENTITY).unwrap();
        let a1 = skeleton.add_bone("A1", Some(a), Vec3::ZERO, Quat::IDENTITY).unwrap();
        assert_eq!(skeleton.traverse(root), vec![root, a, a1, b]);
        assert_eq!(skeleton.traverse(a), vec![a, a1]);
        assert!(skeleton.traverse(42).is_empty());
    }
}
