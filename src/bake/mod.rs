//! 网格合并（烘焙）
//!
//! 将所有已绑定部件合并为一个蒙皮网格：统一骨骼数组、变换顶点到骨架根空间、
//! 重映射权重索引、偏移三角形索引、按当前（静止）姿态重算绑定矩阵。

mod remap;

pub use remap::{remap_bone_index, remap_weight, UnifiedBones};

use glam::{Mat4, Vec3};
use rayon::prelude::*;

use crate::config::AssemblerConfig;
use crate::mesh::{CombinedMesh, SkinWeight};
use crate::part::BoundPart;
use crate::skeleton::{BoneId, BoneNameIndex, Skeleton};
use crate::AssemblyWarning;

/// 合并所有部件
///
/// 没有部件或没有任何骨骼解析成功时记录警告并返回 `None`。调用前骨架应处于静止姿态，
/// 因为绑定矩阵直接读取当前骨骼全局变换。
pub fn bake(
    parts: &[BoundPart],
    skeleton: &Skeleton,
    index: &BoneNameIndex,
    root: BoneId,
    config: &AssemblerConfig,
    warnings: &mut Vec<AssemblyWarning>,
) -> Option<CombinedMesh> {
    if parts.is_empty() {
        AssemblyWarning::NoPartsToBake.report(warnings);
        return None;
    }

    let unified = UnifiedBones::collect(parts, skeleton, index, warnings);
    // 统一骨骼数组为空时权重索引 0 无处可指
    if unified.is_empty() {
        AssemblyWarning::NoResolvedBones.report(warnings);
        return None;
    }

    let vertex_total: usize = parts.iter().map(|p| p.mesh.vertex_count()).sum();
    let index_total: usize = parts.iter().map(|p| p.mesh.index_count()).sum();
    let mut mesh = CombinedMesh {
        name: config.combined_mesh_name.clone(),
        positions: Vec::with_capacity(vertex_total),
        normals: Vec::with_capacity(vertex_total),
        uvs: Vec::with_capacity(vertex_total),
        weights: Vec::with_capacity(vertex_total),
        indices: Vec::with_capacity(index_total),
        ..Default::default()
    };

    let root_inverse = skeleton.global_transform(root).inverse();
    let mut vertex_offset = 0u32;

    for part in parts {
        let mesh_to_root = root_inverse * part.world_transform(skeleton);
        append_geometry(&mut mesh, part, mesh_to_root, config.normalize_normals);
        append_weights(&mut mesh, part, skeleton, &unified, warnings);
        append_indices(&mut mesh, part, vertex_offset, warnings);

        if config.debug_log {
            log::debug!(
                "部件 '{}': {} 个顶点, {} 个三角形, 顶点偏移 {}",
                part.part_name,
                part.mesh.vertex_count(),
                part.mesh.triangle_count(),
                vertex_offset
            );
        }
        vertex_offset += part.mesh.vertex_count() as u32;
    }

    mesh.bind_poses = compute_bind_poses(skeleton, &unified.bones, root);
    mesh.bones = unified.bones;
    mesh.bone_names = unified.names;
    mesh.recalculate_bounds();

    log::info!(
        "烘焙完成: {} 个部件, {} 个顶点, {} 个索引, {} 根骨骼",
        parts.len(),
        mesh.vertex_count(),
        mesh.index_count(),
        mesh.bone_count()
    );
    Some(mesh)
}

/// 顶点位置按点变换，法线按方向变换（不含平移）
fn append_geometry(
    mesh: &mut CombinedMesh,
    part: &BoundPart,
    mesh_to_root: Mat4,
    normalize: bool,
) {
    let transformed: Vec<(Vec3, Vec3)> = part
        .mesh
        .vertices
        .par_iter()
        .map(|v| {
            let position = mesh_to_root.transform_point3(v.position);
            let normal = mesh_to_root.transform_vector3(v.normal);
            let normal = if normalize {
                normal.normalize_or_zero()
            } else {
                normal
            };
            (position, normal)
        })
        .collect();

    for ((position, normal), vertex) in transformed.into_iter().zip(&part.mesh.vertices) {
        mesh.positions.push(position);
        mesh.normals.push(normal);
        mesh.uvs.push(vertex.uv);
    }
}

/// 权重记录与顶点一一对应：不足时补零影响记录，多余的丢弃
fn append_weights(
    mesh: &mut CombinedMesh,
    part: &BoundPart,
    skeleton: &Skeleton,
    unified: &UnifiedBones,
    warnings: &mut Vec<AssemblyWarning>,
) {
    let vertex_count = part.mesh.vertex_count();
    let weight_count = part.mesh.weights.len();
    if weight_count != vertex_count {
        AssemblyWarning::WeightCountMismatch {
            part: part.part_name.clone(),
            vertices: vertex_count,
            weights: weight_count,
        }
        .report(warnings);
    }

    let empty = SkinWeight::default();
    for i in 0..vertex_count {
        let weight = part.mesh.weights.get(i).unwrap_or(&empty);
        mesh.weights.push(remap_weight(weight, &part.bones, skeleton, unified));
    }
}

/// 三角形索引加上部件的顶点偏移，保持顺序与绕序
///
/// 引用部件外顶点的三角形和末尾不完整的三角形会被丢弃。
fn append_indices(
    mesh: &mut CombinedMesh,
    part: &BoundPart,
    vertex_offset: u32,
    warnings: &mut Vec<AssemblyWarning>,
) {
    let vertex_count = part.mesh.vertex_count() as u32;
    for (triangle, corners) in part.mesh.indices.chunks(3).enumerate() {
        if corners.len() < 3 || corners.iter().any(|&i| i >= vertex_count) {
            AssemblyWarning::InvalidTriangle {
                part: part.part_name.clone(),
                triangle,
            }
            .report(warnings);
            continue;
        }
        mesh.indices.extend(corners.iter().map(|&i| i + vertex_offset));
    }
}

/// 绑定矩阵 = inverse(bone.global) * root.global
pub fn compute_bind_poses(skeleton: &Skeleton, bones: &[BoneId], root: BoneId) -> Vec<Mat4> {
    let root_global = skeleton.global_transform(root);
    bones
        .iter()
        .map(|&bone| skeleton.global_transform(bone).inverse() * root_global)
        .collect()
}
