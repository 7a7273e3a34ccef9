//! 部件绑定

use super::{BoundPart, PartDescriptor};
use crate::skeleton::{BoneId, BoneNameIndex};
use crate::AssemblyWarning;

/// 实例化部件网格，并按名称将部件骨骼数组重建到运行时骨架上
///
/// 部件没有网格或骨骼名称列表为空时不做任何事，返回 `None`。
/// 找不到的骨骼留空（`None`）并记录警告；空名称表示制作时该槽位本就没有骨骼，不报警告。
pub fn bind(
    descriptor: &PartDescriptor,
    index: &BoneNameIndex,
    parent: BoneId,
    warnings: &mut Vec<AssemblyWarning>,
) -> Option<BoundPart> {
    let Some(source) = descriptor.mesh.as_ref() else {
        AssemblyWarning::MissingMesh {
            part: descriptor.name.clone(),
        }
        .report(warnings);
        return None;
    };

    let bone_names = descriptor.bone_names();
    if bone_names.is_empty() {
        AssemblyWarning::EmptyBoneMap {
            part: descriptor.name.clone(),
        }
        .report(warnings);
        return None;
    }

    let mut bones = Vec::with_capacity(bone_names.len());
    for (slot, name) in bone_names.iter().enumerate() {
        if name.is_empty() {
            bones.push(None);
            continue;
        }
        let resolved = index.get(name);
        if resolved.is_none() {
            AssemblyWarning::MissingBone {
                part: descriptor.name.clone(),
                bone: name.clone(),
                slot,
            }
            .report(warnings);
        }
        bones.push(resolved);
    }

    Some(BoundPart {
        part_name: descriptor.name.clone(),
        mesh: source.mesh.clone(),
        bones,
        parent,
        local_transform: source.local_transform(),
        active: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::MeshData;
    use crate::part::{BoneMap, PartMesh};
    use crate::skeleton::Skeleton;
    use glam::{Quat, Vec3};

    fn rig() -> (Skeleton, BoneNameIndex) {
        let mut skeleton = Skeleton::new();
        let root = skeleton.add_bone("Root", None, Vec3::ZERO, Quat::IDENTITY).unwrap();
        let spine = skeleton.add_bone("Spine", Some(root), Vec3::Y, Quat::IDENTITY).unwrap();
        skeleton.add_bone("Head", Some(spine), Vec3::Y, Quat::IDENTITY).unwrap();
        let index = BoneNameIndex::build(&skeleton, root);
        (skeleton, index)
    }

    fn descriptor(names: &[&str]) -> PartDescriptor {
        PartDescriptor::new(
            "part",
            PartMesh::new(MeshData::new("part")),
            BoneMap::new(names.iter().copied()),
        )
    }

    #[test]
    fn test_bind_resolves_all_slots_in_order() {
        let (_, index) = rig();
        let mut warnings = Vec::new();
        let source = descriptor(&["Head", "Root", "Spine"]);
        let part = bind(&source, &index, 0, &mut warnings).unwrap();

        assert_eq!(part.bones, vec![Some(2), Some(0), Some(1)]);
        assert!(part.is_fully_resolved());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_missing_bone_leaves_slot_unresolved() {
        let (_, index) = rig();
        let mut warnings = Vec::new();
        let part = bind(&descriptor(&["Root", "Tail"]), &index, 0, &mut warnings).unwrap();

        assert_eq!(part.bones, vec![Some(0), None]);
        assert_eq!(
            warnings,
            vec![AssemblyWarning::MissingBone {
                part: "part".to_string(),
                bone: "Tail".to_string(),
                slot: 1,
            }]
        );
    }

    #[test]
    fn test_empty_name_is_silently_unresolved() {
        let (_, index) = rig();
        let mut warnings = Vec::new();
        let part = bind(&descriptor(&["", "Spine"]), &index, 0, &mut warnings).unwrap();
        assert_eq!(part.bones, vec![None, Some(1)]);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_bind_without_mesh_or_bones_is_noop() {
        let (_, index) = rig();
        let mut warnings = Vec::new();

        let no_mesh = PartDescriptor {
            name: "ghost".to_string(),
            mesh: None,
            bone_map: Some(BoneMap::new(["Root"])),
        };
        assert!(bind(&no_mesh, &index, 0, &mut warnings).is_none());
        assert!(bind(&descriptor(&[]), &index, 0, &mut warnings).is_none());
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn test_bound_mesh_is_independent_copy() {
        let (_, index) = rig();
        let source = descriptor(&["Root"]);
        let mut warnings = Vec::new();
        let mut a = bind(&source, &index, 0, &mut warnings).unwrap();
        let b = bind(&source, &index, 0, &mut warnings).unwrap();

        a.mesh.name = "changed".to_string();
        assert_eq!(b.mesh.name, "part");
        assert_eq!(source.mesh.as_ref().unwrap().mesh.name, "part");
    }
}
