//! 组装配置
//!
//! 所有参数扁平化，直接在代码中修改默认值即可。每个 [`crate::AvatarAssembler`]
//! 在创建时复制一份全局配置，之后可以用 `with_config` 单独覆盖。

use std::sync::{PoisonError, RwLock};

use once_cell::sync::Lazy;

/// 组装配置（扁平化，不嵌套）
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblerConfig {
    /// 合并网格名称，默认 "CombinedSkinnedMesh"
    pub combined_mesh_name: String,
    /// 烘焙后隐藏原部件，默认 true
    pub hide_source_parts: bool,
    /// 变换后重新归一化法线，默认 false
    /// 部件带非均匀缩放时可以打开
    pub normalize_normals: bool,
    /// 输出渲染器在屏幕外也更新蒙皮，默认 true
    pub update_when_offscreen: bool,
    /// 是否输出每个部件的调试日志，默认 false
    pub debug_log: bool,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            combined_mesh_name: "CombinedSkinnedMesh".to_string(),
            hide_source_parts: true,
            normalize_normals: false,
            update_when_offscreen: true,
            debug_log: false,
        }
    }
}

/// 全局配置实例
static ASSEMBLER_CONFIG: Lazy<RwLock<AssemblerConfig>> =
    Lazy::new(|| RwLock::new(AssemblerConfig::default()));

/// 获取当前配置（只读）
pub fn get_config() -> AssemblerConfig {
    ASSEMBLER_CONFIG
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// 手动设置配置（用于运行时调试）
pub fn set_config(config: AssemblerConfig) {
    *ASSEMBLER_CONFIG
        .write()
        .unwrap_or_else(PoisonError::into_inner) = config;
}

/// 重置为默认配置
pub fn reset_config() {
    set_config(AssemblerConfig::default());
}
