//! 顶点蒙皮计算

use glam::{Mat4, Vec3};
use rayon::prelude::*;

use super::{SkinningInput, SkinningOutput};
use crate::mesh::{CombinedMesh, SkinWeight};
use crate::skeleton::{BoneId, Skeleton};

/// 计算合并网格在当前姿态下的蒙皮矩阵（骨架根空间）
///
/// 矩阵 = inverse(root.global) * bone.global * bind_pose，静止姿态下为单位矩阵。
pub fn skinning_matrices(mesh: &CombinedMesh, skeleton: &Skeleton, root: BoneId) -> Vec<Mat4> {
    let root_inverse = skeleton.global_transform(root).inverse();
    mesh.bones
        .iter()
        .zip(&mesh.bind_poses)
        .map(|(&bone, bind_pose)| root_inverse * skeleton.global_transform(bone) * *bind_pose)
        .collect()
}

/// 计算蒙皮（并行）
pub fn compute_skinning(input: &SkinningInput) -> SkinningOutput {
    let (positions, normals) = input
        .positions
        .par_iter()
        .zip(input.normals.par_iter())
        .zip(input.weights.par_iter())
        .map(|((position, normal), weight)| {
            compute_single_vertex(*position, *normal, weight, input.bone_matrices)
        })
        .unzip();

    SkinningOutput { positions, normals }
}

/// 按当前骨架姿态变形合并网格
pub fn skin_combined_mesh(
    mesh: &CombinedMesh,
    skeleton: &Skeleton,
    root: BoneId,
) -> SkinningOutput {
    let bone_matrices = skinning_matrices(mesh, skeleton, root);
    compute_skinning(&SkinningInput {
        positions: &mesh.positions,
        normals: &mesh.normals,
        weights: &mesh.weights,
        bone_matrices: &bone_matrices,
    })
}

/// 计算单个顶点的蒙皮
fn compute_single_vertex(
    position: Vec3,
    normal: Vec3,
    weight: &SkinWeight,
    matrices: &[Mat4],
) -> (Vec3, Vec3) {
    let total = weight.total_weight();
    if total <= 0.0 {
        return (position, normal);
    }

    let mut pos = Vec3::ZERO;
    let mut norm = Vec3::ZERO;
    for (&bone, &w) in weight.bones.iter().zip(&weight.weights) {
        if w == 0.0 {
            continue;
        }
        let m = get_matrix(matrices, bone);
        pos += m.transform_point3(position) * w;
        norm += m.transform_vector3(normal) * w;
    }

    (pos / total, norm.normalize_or_zero())
}

fn get_matrix(matrices: &[Mat4], index: i32) -> Mat4 {
    if index < 0 {
        return Mat4::IDENTITY;
    }
    matrices.get(index as usize).copied().unwrap_or(Mat4::IDENTITY)
}
