//! 静止姿态文件
//!
//! 纯文本 UTF-8 格式，结构与 VPD 姿态文件相同，但不做坐标系转换：
//!
//! ```text
//! Rest Pose Data file
//!
//! 2;				// total bones
//!
//! Bone0{Root
//!   0.000000,0.000000,0.000000;				// trans x,y,z
//!   0.000000,0.000000,0.000000,1.000000;		// Quaternion x,y,z,w
//! }
//! ```

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use glam::{Quat, Vec3};

use super::{BonePose, RestPose};
use crate::{AvatarError, Result};

const HEADER: &str = "Rest Pose Data file";

impl RestPose {
    /// 从文件加载静止姿态
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// 保存为静止姿态文件
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_pose_text())?;
        Ok(())
    }

    /// 解析静止姿态文本
    pub fn parse(content: &str) -> Result<Self> {
        let content = content.trim_start_matches('\u{feff}');
        if !content.starts_with(HEADER) {
            return Err(AvatarError::PoseParse("Invalid rest pose header".to_string()));
        }

        let lines: Vec<&str> = content.lines().collect();
        let mut bones = Vec::new();
        let mut i = 1;

        while i < lines.len() {
            let line = lines[i].trim();

            if line.starts_with("Bone") && line.contains('{') {
                if let Some(bone) = parse_bone_block(&lines, &mut i) {
                    bones.push(bone);
                }
                continue;
            }

            // 空行、注释、骨骼数量行
            i += 1;
        }

        log::debug!("静止姿态解析完成: {} 个骨骼", bones.len());
        Ok(Self { bones })
    }

    /// 输出为静止姿态文本
    pub fn to_pose_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", HEADER);
        let _ = writeln!(out);
        let _ = writeln!(out, "{};\t\t\t\t// total bones", self.bones.len());
        let _ = writeln!(out);

        for (i, bone) in self.bones.iter().enumerate() {
            let p = bone.local_position;
            let q = bone.local_rotation;
            let _ = writeln!(out, "Bone{}{{{}", i, bone.bone_name);
            let _ = writeln!(out, "  {:.6},{:.6},{:.6};\t\t\t\t// trans x,y,z", p.x, p.y, p.z);
            let _ = writeln!(
                out,
                "  {:.6},{:.6},{:.6},{:.6};\t\t// Quaternion x,y,z,w",
                q.x, q.y, q.z, q.w
            );
            let _ = writeln!(out, "}}");
            let _ = writeln!(out);
        }
        out
    }
}

/// 解析骨骼数据块，`index` 移动到块结束之后
fn parse_bone_block(lines: &[&str], index: &mut usize) -> Option<BonePose> {
    let start_line = lines[*index].trim();
    *index += 1;

    // 格式: Bone0{骨骼名，名称也可能在下一行
    let name = match start_line.split_once('{') {
        Some((_, after)) if !after.trim().is_empty() => after.trim().to_string(),
        _ => {
            let name_line = lines.get(*index)?.trim();
            if name_line.starts_with('}') {
                *index += 1;
                return None;
            }
            *index += 1;
            name_line.to_string()
        }
    };

    let mut position = Vec3::ZERO;
    let mut rotation = Quat::IDENTITY;

    while *index < lines.len() {
        let line = lines[*index].trim();
        *index += 1;

        if line.starts_with('}') {
            break;
        }

        let values = parse_floats(line);
        match values.as_slice() {
            [x, y, z] => position = Vec3::new(*x, *y, *z),
            [x, y, z, w] => rotation = Quat::from_xyzw(*x, *y, *z, *w).normalize(),
            // 格式错误的行忽略
            _ => {}
        }
    }

    Some(BonePose::new(name, position, rotation))
}

/// 解析 `a,b,c;` 形式的数值行（忽略 `//` 注释）
fn parse_floats(line: &str) -> Vec<f32> {
    let clean = line
        .split("//")
        .next()
        .unwrap_or_default()
        .trim()
        .trim_end_matches(';');
    if clean.is_empty() {
        return Vec::new();
    }
    clean
        .split(',')
        .map(|v| v.trim().parse::<f32>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Rest Pose Data file

2;				// total bones

Bone0{Root
  0.000000,1.000000,0.000000;				// trans x,y,z
  0.000000,0.000000,0.000000,1.000000;		// Quaternion x,y,z,w
}

Bone1{Spine
  0.000000,0.500000,-0.250000;				// trans x,y,z
  0.000000,0.707107,0.000000,0.707107;		// Quaternion x,y,z,w
}
";

    #[test]
    fn test_parse_sample() {
        let pose = RestPose::parse(SAMPLE).unwrap();
        assert_eq!(pose.bone_count(), 2);

        let spine = pose.find("Spine").unwrap();
        assert!(spine.local_position.abs_diff_eq(Vec3::new(0.0, 0.5, -0.25), 1e-6));
        assert!(spine
            .local_rotation
            .abs_diff_eq(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2), 1e-5));
    }

    #[test]
    fn test_invalid_header() {
        let err = RestPose::parse("Vocaloid Pose Data file\n").unwrap_err();
        assert!(matches!(err, AvatarError::PoseParse(_)));
    }

    #[test]
    fn test_malformed_lines_fall_back_to_defaults() {
        let text = "Rest Pose Data file\nBone0{Hips\n  a,b,c;\n}\nBone1{\n}\n";
        let pose = RestPose::parse(text).unwrap();
        assert_eq!(pose.bones, vec![BonePose::new("Hips", Vec3::ZERO, Quat::IDENTITY)]);
    }

    #[test]
    fn test_text_output_parses_back() {
        let pose = RestPose {
            bones: vec![
                BonePose::new("Root", Vec3::new(0.0, 1.0, 0.0), Quat::IDENTITY),
                BonePose::new("Neck", Vec3::new(0.0, 0.2, 0.05), Quat::from_rotation_x(0.25)),
            ],
        };
        let parsed = RestPose::parse(&pose.to_pose_text()).unwrap();
        assert_eq!(parsed.bone_count(), 2);
        let neck = parsed.find("Neck").unwrap();
        assert!(neck.local_rotation.abs_diff_eq(Quat::from_rotation_x(0.25), 1e-5));
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!("rest_pose_{}.txt", std::process::id()));
        let pose = RestPose::parse(SAMPLE).unwrap();
        pose.save(&path).unwrap();
        let loaded = RestPose::load(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded.bone_count(), 2);
        assert_eq!(loaded.find("Root").unwrap().local_position, Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = RestPose::load("/nonexistent/rest_pose.txt").unwrap_err();
        assert!(matches!(err, AvatarError::Io(_)));
    }
}
