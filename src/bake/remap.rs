//! 统一骨骼数组与权重索引重映射

use std::collections::{HashMap, HashSet};

use crate::mesh::SkinWeight;
use crate::part::BoundPart;
use crate::skeleton::{BoneId, BoneNameIndex, Skeleton};
use crate::AssemblyWarning;

/// 合并网格使用的统一骨骼数组
///
/// 只包含各部件实际解析到的骨骼，按首次出现顺序排列：部件按绑定顺序，
/// 部件内按骨骼槽位顺序。同一输入每次得到相同顺序。
#[derive(Clone, Debug, Default)]
pub struct UnifiedBones {
    pub bones: Vec<BoneId>,
    pub names: Vec<String>,
    name_to_index: HashMap<String, usize>,
}

impl UnifiedBones {
    pub fn collect(
        parts: &[BoundPart],
        skeleton: &Skeleton,
        index: &BoneNameIndex,
        warnings: &mut Vec<AssemblyWarning>,
    ) -> Self {
        let mut unified = Self::default();
        let mut seen = HashSet::new();

        for part in parts {
            for &id in part.bones.iter().flatten() {
                let Some(name) = skeleton.name(id) else {
                    continue;
                };
                if !seen.insert(name.to_string()) {
                    continue;
                }
                match index.get(name) {
                    Some(bone) => unified.push(name, bone),
                    None => AssemblyWarning::UnknownUnifiedBone {
                        bone: name.to_string(),
                    }
                    .report(warnings),
                }
            }
        }
        unified
    }

    fn push(&mut self, name: &str, bone: BoneId) {
        self.name_to_index.insert(name.to_string(), self.bones.len());
        self.bones.push(bone);
        self.names.push(name.to_string());
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.name_to_index.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }
}

/// 将部件局部骨骼索引映射到统一骨骼数组
///
/// 索引越界、槽位未解析、或骨骼不在统一数组中时返回 0。
pub fn remap_bone_index(
    part_bones: &[Option<BoneId>],
    local: i32,
    skeleton: &Skeleton,
    unified: &UnifiedBones,
) -> i32 {
    let Ok(local) = usize::try_from(local) else {
        return 0;
    };
    let Some(Some(bone)) = part_bones.get(local) else {
        return 0;
    };
    skeleton
        .name(*bone)
        .and_then(|name| unified.index_of(name))
        .map(|i| i as i32)
        .unwrap_or(0)
}

/// 重映射一条权重记录的 4 个骨骼索引，权重值不变
pub fn remap_weight(
    weight: &SkinWeight,
    part_bones: &[Option<BoneId>],
    skeleton: &Skeleton,
    unified: &UnifiedBones,
) -> SkinWeight {
    SkinWeight {
        bones: weight
            .bones
            .map(|local| remap_bone_index(part_bones, local, skeleton, unified)),
        weights: weight.weights,
    }
}
