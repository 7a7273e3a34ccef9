//! 骨骼名称索引

use std::collections::HashMap;

use super::{BoneId, Skeleton};

/// 骨骼名称 → 运行时骨骼 ID
///
/// 只是查找表，不持有骨骼。重名骨骼以先序遍历中最后出现的为准。
#[derive(Clone, Debug, Default)]
pub struct BoneNameIndex {
    name_to_index: HashMap<String, BoneId>,
}

impl BoneNameIndex {
    /// 从 `root`（包含其本身）开始深度优先先序遍历，建立名称索引
    pub fn build(skeleton: &Skeleton, root: BoneId) -> Self {
        let mut name_to_index = HashMap::new();
        for id in skeleton.traverse(root) {
            if let Some(name) = skeleton.name(id) {
                name_to_index.insert(name.to_string(), id);
            }
        }
        Self { name_to_index }
    }

    /// 通过名称查找骨骼
    pub fn get(&self, name: &str) -> Option<BoneId> {
        self.name_to_index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.name_to_index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.name_to_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.name_to_index.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};

    #[test]
    fn test_build_includes_root_and_descendants() {
        let mut skeleton = Skeleton::new();
        let scene = skeleton.add_bone("Scene", None, Vec3::ZERO, Quat::IDENTITY).unwrap();
        let root = skeleton.add_bone("Armature", Some(scene), Vec3::ZERO, Quat::IDENTITY).unwrap();
        let hips = skeleton.add_bone("Hips", Some(root), Vec3::ZERO, Quat::IDENTITY).unwrap();

        let index = BoneNameIndex::build(&skeleton, root);
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("Armature"), Some(root));
        assert_eq!(index.get("Hips"), Some(hips));
        // 根节点之外的节点不进入索引
        assert!(!index.contains("Scene"));
    }

    #[test]
    fn test_duplicate_names_last_in_preorder_wins() {
        let mut skeleton = Skeleton::new();
        let root = skeleton.add_bone("Root", None, Vec3::ZERO, Quat::IDENTITY).unwrap();
        let a = skeleton.add_bone("A", Some(root), Vec3::ZERO, Quat::IDENTITY).unwrap();
        let _first = skeleton.add_bone("Dup", Some(a), Vec3::ZERO, Quat::IDENTITY).unwrap();
        let second = skeleton.add_bone("Dup", Some(root), Vec3::ZERO, Quat::IDENTITY).unwrap();

        let index = BoneNameIndex::build(&skeleton, root);
        assert_eq!(index.get("Dup"), Some(second));
    }
}
