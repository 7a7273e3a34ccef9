//! 运行时部件切换

use super::{AvatarCatalog, AvatarConfig, PartSlot};
use crate::assembler::AvatarAssembler;
use crate::AssemblyWarning;

/// 在部件目录中循环切换各槽位的部件，并重新组装角色
pub struct AvatarCustomizer {
    catalog: AvatarCatalog,
    active: AvatarConfig,
    indices: [usize; 3],
}

impl AvatarCustomizer {
    /// 按当前配置中的部件名称确定各槽位的初始位置
    pub fn new(catalog: AvatarCatalog, active: AvatarConfig) -> Self {
        let indices = PartSlot::ALL
            .map(|slot| catalog.find_index(slot, active.get(slot).map(|p| p.as_ref())));
        Self {
            catalog,
            active,
            indices,
        }
    }

    /// 应用当前配置
    pub fn apply(&self, assembler: &mut AvatarAssembler) {
        assembler.apply_config(&self.active);
    }

    /// 切换到该槽位的下一个部件并重新组装，返回是否切换
    pub fn swap(&mut self, slot: PartSlot, assembler: &mut AvatarAssembler) -> bool {
        let options = self.catalog.options(slot);
        if options.is_empty() {
            assembler.record_warning(AssemblyWarning::EmptySlot { slot });
            return false;
        }

        let next = (self.indices[slot.index()] + 1) % options.len();
        self.indices[slot.index()] = next;
        self.active.set(slot, Some(options[next].clone()));
        self.apply(assembler);
        true
    }

    pub fn swap_hair(&mut self, assembler: &mut AvatarAssembler) -> bool {
        self.swap(PartSlot::Hair, assembler)
    }

    pub fn swap_top(&mut self, assembler: &mut AvatarAssembler) -> bool {
        self.swap(PartSlot::Top, assembler)
    }

    pub fn swap_bottom(&mut self, assembler: &mut AvatarAssembler) -> bool {
        self.swap(PartSlot::Bottom, assembler)
    }

    pub fn active_config(&self) -> &AvatarConfig {
        &self.active
    }

    pub fn current_index(&self, slot: PartSlot) -> usize {
        self.indices[slot.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use glam::{Quat, Vec2, Vec3};

    use crate::mesh::{MeshData, RuntimeVertex, SkinWeight};
    use crate::part::{BoneMap, PartDescriptor, PartMesh};
    use crate::skeleton::Skeleton;

    fn part(name: &str, vertices: usize) -> Arc<PartDescriptor> {
        let mut mesh = MeshData::new(name);
        for i in 0..vertices {
            mesh.push_vertex(
                RuntimeVertex::new(Vec3::new(i as f32, 0.0, 0.0), Vec3::Y, Vec2::ZERO),
                SkinWeight::single(0),
            );
        }
        Arc::new(PartDescriptor::new(name, PartMesh::new(mesh), BoneMap::new(["Root"])))
    }

    fn assembler() -> AvatarAssembler {
        let mut skeleton = Skeleton::new();
        let root = skeleton.add_bone("Root", None, Vec3::ZERO, Quat::IDENTITY).unwrap();
        AvatarAssembler::new(skeleton, root, root, None).unwrap()
    }

    #[test]
    fn test_swap_cycles_and_reassembles() {
        let catalog = AvatarCatalog {
            hairs: vec![part("short", 1), part("long", 2), part("bun", 3)],
            ..Default::default()
        };
        let active = AvatarConfig {
            hair: Some(part("long", 2)),
            ..Default::default()
        };
        let mut customizer = AvatarCustomizer::new(catalog, active);
        let mut assembler = assembler();
        assert_eq!(customizer.current_index(PartSlot::Hair), 1);

        assert!(customizer.swap_hair(&mut assembler));
        assert_eq!(customizer.active_config().hair.as_ref().unwrap().name, "bun");
        assert_eq!(assembler.combined_mesh().unwrap().vertex_count(), 3);

        // 末尾之后回到第一个
        assert!(customizer.swap_hair(&mut assembler));
        assert_eq!(customizer.current_index(PartSlot::Hair), 0);
        assert_eq!(assembler.combined_mesh().unwrap().vertex_count(), 1);
    }

    #[test]
    fn test_swap_empty_slot_is_noop() {
        let mut customizer =
            AvatarCustomizer::new(AvatarCatalog::default(), AvatarConfig::default());
        let mut assembler = assembler();
        assert!(!customizer.swap_top(&mut assembler));
        assert!(customizer.active_config().top.is_none());
        assert!(assembler.combined_mesh().is_none());
    }
}
