//! 网格缓冲区

mod bounds;
mod combined;

pub use bounds::Aabb;
pub use combined::CombinedMesh;

use glam::{Vec2, Vec3};

/// 运行时顶点数据
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RuntimeVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
}

impl RuntimeVertex {
    pub fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self { position, normal, uv }
    }
}

/// 顶点骨骼权重（最多 4 个影响）
///
/// `bones` 是相对于所属网格骨骼数组的索引。部件网格中的索引可能越界或为负，
/// 合并后的网格中所有索引都指向统一骨骼数组。
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SkinWeight {
    pub bones: [i32; 4],
    pub weights: [f32; 4],
}

impl SkinWeight {
    pub fn new(bones: [i32; 4], weights: [f32; 4]) -> Self {
        Self { bones, weights }
    }

    /// 单骨骼完全影响
    pub fn single(bone: i32) -> Self {
        Self {
            bones: [bone, 0, 0, 0],
            weights: [1.0, 0.0, 0.0, 0.0],
        }
    }

    /// 双骨骼混合，`weight` 为第一根骨骼的权重
    pub fn blend2(bone0: i32, bone1: i32, weight: f32) -> Self {
        Self {
            bones: [bone0, bone1, 0, 0],
            weights: [weight, 1.0 - weight, 0.0, 0.0],
        }
    }

    pub fn total_weight(&self) -> f32 {
        self.weights.iter().sum()
    }
}

/// 蒙皮网格数据（三角形列表）
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub name: String,
    pub vertices: Vec<RuntimeVertex>,
    pub weights: Vec<SkinWeight>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// 获取顶点数量
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// 获取索引数量
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// 添加一个顶点及其权重，返回顶点索引
    pub fn push_vertex(&mut self, vertex: RuntimeVertex, weight: SkinWeight) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(vertex);
        self.weights.push(weight);
        index
    }

    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }
}
