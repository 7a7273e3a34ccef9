//! 角色组装器
//!
//! 每个角色实例持有一个 [`AvatarAssembler`]。配置变化时调用
//! [`AvatarAssembler::apply_config`]，它按顺序执行：
//! 暂停动画 → 恢复静止姿态 → 清理旧部件 → 绑定部件 → 烘焙 → 恢复动画。

use std::sync::Arc;

use crate::bake;
use crate::config::{self, AssemblerConfig};
use crate::mesh::CombinedMesh;
use crate::part::{self, AvatarConfig, BoundPart, PartDescriptor};
use crate::pose::RestPose;
use crate::skeleton::{BoneId, BoneNameIndex, Skeleton};
use crate::{AssemblyWarning, AvatarError, Result};

/// 持有合并网格的输出渲染器
#[derive(Clone, Debug, Default)]
pub struct OutputRenderer {
    pub mesh: Option<CombinedMesh>,
    pub bones: Vec<BoneId>,
    pub root_bone: Option<BoneId>,
    pub update_when_offscreen: bool,
}

/// 角色组装器
pub struct AvatarAssembler {
    skeleton: Skeleton,
    /// 骨架根节点，合并网格的坐标空间
    armature_root: BoneId,
    /// 部件实例挂载的节点
    part_parent: BoneId,
    bone_index: BoneNameIndex,
    rest_pose: Option<Arc<RestPose>>,

    parts: Vec<BoundPart>,
    output: OutputRenderer,
    animation_enabled: bool,

    config: AssemblerConfig,
    warnings: Vec<AssemblyWarning>,
}

impl AvatarAssembler {
    /// 创建组装器并建立骨骼名称索引
    pub fn new(
        skeleton: Skeleton,
        armature_root: BoneId,
        part_parent: BoneId,
        rest_pose: Option<Arc<RestPose>>,
    ) -> Result<Self> {
        for id in [armature_root, part_parent] {
            if !skeleton.contains(id) {
                return Err(AvatarError::InvalidBone(id));
            }
        }

        let bone_index = BoneNameIndex::build(&skeleton, armature_root);
        log::info!(
            "骨骼名称索引建立完成: {} 个节点, {} 个名称",
            skeleton.bone_count(),
            bone_index.len()
        );

        Ok(Self {
            skeleton,
            armature_root,
            part_parent,
            bone_index,
            rest_pose,
            parts: Vec::new(),
            output: OutputRenderer::default(),
            animation_enabled: true,
            config: config::get_config(),
            warnings: Vec::new(),
        })
    }

    pub fn with_config(mut self, config: AssemblerConfig) -> Self {
        self.config = config;
        self
    }

    /// 配置变化时的唯一入口
    pub fn apply_config(&mut self, config: &AvatarConfig) {
        // 组装期间暂停动画，绑定矩阵必须在静止姿态下计算
        self.animation_enabled = false;

        self.restore_rest_pose();
        self.clear();

        for (_, descriptor) in config.parts() {
            self.bind(descriptor);
        }

        self.bake();
        self.animation_enabled = true;
    }

    /// 恢复静止姿态，返回恢复的骨骼数
    pub fn restore_rest_pose(&mut self) -> usize {
        match &self.rest_pose {
            Some(rest_pose) => rest_pose.restore(&mut self.skeleton, &self.bone_index),
            None => 0,
        }
    }

    /// 销毁所有已绑定的部件实例
    pub fn clear(&mut self) {
        self.parts.clear();
    }

    /// 绑定部件，成功注册时返回 true
    pub fn bind(&mut self, descriptor: &PartDescriptor) -> bool {
        match part::bind(
            descriptor,
            &self.bone_index,
            self.part_parent,
            &mut self.warnings,
        ) {
            Some(bound) => {
                if self.config.debug_log {
                    log::debug!(
                        "绑定部件 '{}': {}/{} 根骨骼已解析",
                        bound.part_name,
                        bound.resolved_count(),
                        bound.bones.len()
                    );
                }
                self.parts.push(bound);
                true
            }
            None => false,
        }
    }

    /// 合并所有已绑定部件并替换输出网格
    ///
    /// 没有部件时保留之前的输出，返回 false。
    pub fn bake(&mut self) -> bool {
        let Some(mesh) = bake::bake(
            &self.parts,
            &self.skeleton,
            &self.bone_index,
            self.armature_root,
            &self.config,
            &mut self.warnings,
        ) else {
            return false;
        };

        // 新网格完整构建后再替换
        self.output = OutputRenderer {
            bones: mesh.bones.clone(),
            mesh: Some(mesh),
            root_bone: Some(self.armature_root),
            update_when_offscreen: self.config.update_when_offscreen,
        };

        if self.config.hide_source_parts {
            for part in &mut self.parts {
                part.active = false;
            }
        }
        true
    }

    /// 骨架结构变化后重建名称索引
    pub fn rebuild_bone_index(&mut self) {
        self.bone_index = BoneNameIndex::build(&self.skeleton, self.armature_root);
    }

    /// 运行动画更新，组装期间不会执行，返回是否执行
    pub fn animate<F: FnOnce(&mut Skeleton)>(&mut self, update: F) -> bool {
        if !self.animation_enabled {
            return false;
        }
        update(&mut self.skeleton);
        true
    }

    pub fn is_animation_enabled(&self) -> bool {
        self.animation_enabled
    }

    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    pub fn armature_root(&self) -> BoneId {
        self.armature_root
    }

    pub fn bone_index(&self) -> &BoneNameIndex {
        &self.bone_index
    }

    pub fn parts(&self) -> &[BoundPart] {
        &self.parts
    }

    pub fn output(&self) -> &OutputRenderer {
        &self.output
    }

    pub fn combined_mesh(&self) -> Option<&CombinedMesh> {
        self.output.mesh.as_ref()
    }

    pub fn warnings(&self) -> &[AssemblyWarning] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<AssemblyWarning> {
        std::mem::take(&mut self.warnings)
    }

    pub(crate) fn record_warning(&mut self, warning: AssemblyWarning) {
        warning.report(&mut self.warnings);
    }
}
