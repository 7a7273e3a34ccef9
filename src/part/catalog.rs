//! 部件槽位、角色配置与部件目录

use std::fmt;
use std::sync::Arc;

use super::PartDescriptor;

/// 部件槽位
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PartSlot {
    Hair,
    Top,
    Bottom,
}

impl PartSlot {
    /// 绑定顺序
    pub const ALL: [PartSlot; 3] = [PartSlot::Hair, PartSlot::Top, PartSlot::Bottom];

    pub fn index(self) -> usize {
        match self {
            PartSlot::Hair => 0,
            PartSlot::Top => 1,
            PartSlot::Bottom => 2,
        }
    }
}

impl fmt::Display for PartSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartSlot::Hair => write!(f, "hair"),
            PartSlot::Top => write!(f, "top"),
            PartSlot::Bottom => write!(f, "bottom"),
        }
    }
}

/// 角色配置：每个槽位最多一个部件
#[derive(Clone, Debug, Default)]
pub struct AvatarConfig {
    pub hair: Option<Arc<PartDescriptor>>,
    pub top: Option<Arc<PartDescriptor>>,
    pub bottom: Option<Arc<PartDescriptor>>,
}

impl AvatarConfig {
    pub fn get(&self, slot: PartSlot) -> Option<&Arc<PartDescriptor>> {
        match slot {
            PartSlot::Hair => self.hair.as_ref(),
            PartSlot::Top => self.top.as_ref(),
            PartSlot::Bottom => self.bottom.as_ref(),
        }
    }

    pub fn set(&mut self, slot: PartSlot, part: Option<Arc<PartDescriptor>>) {
        match slot {
            PartSlot::Hair => self.hair = part,
            PartSlot::Top => self.top = part,
            PartSlot::Bottom => self.bottom = part,
        }
    }

    /// 按绑定顺序（头发、上衣、下装）返回已配置的部件
    pub fn parts(&self) -> impl Iterator<Item = (PartSlot, &Arc<PartDescriptor>)> {
        PartSlot::ALL
            .into_iter()
            .filter_map(move |slot| self.get(slot).map(|part| (slot, part)))
    }
}

/// 每个槽位可选的全部部件
#[derive(Clone, Debug, Default)]
pub struct AvatarCatalog {
    pub hairs: Vec<Arc<PartDescriptor>>,
    pub tops: Vec<Arc<PartDescriptor>>,
    pub bottoms: Vec<Arc<PartDescriptor>>,
}

impl AvatarCatalog {
    pub fn options(&self, slot: PartSlot) -> &[Arc<PartDescriptor>] {
        match slot {
            PartSlot::Hair => &self.hairs,
            PartSlot::Top => &self.tops,
            PartSlot::Bottom => &self.bottoms,
        }
    }

    /// 按部件名称查找选项位置，找不到时返回 0
    pub fn find_index(&self, slot: PartSlot, target: Option<&PartDescriptor>) -> usize {
        let Some(target) = target else {
            return 0;
        };
        self.options(slot)
            .iter()
            .position(|option| option.name == target.name)
            .unwrap_or(0)
    }
}
