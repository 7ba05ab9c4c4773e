use crate::landmark::Landmark;

/// 骨格の接続定義 (開始, 終了)
pub const SKELETON_CONNECTIONS: [(Landmark, Landmark); 10] = [
    // 胴体
    (Landmark::LeftShoulder, Landmark::RightShoulder),
    (Landmark::LeftShoulder, Landmark::LeftHip),
    (Landmark::RightShoulder, Landmark::RightHip),
    (Landmark::LeftHip, Landmark::RightHip),
    // 脚
    (Landmark::LeftHip, Landmark::LeftKnee),
    (Landmark::LeftKnee, Landmark::LeftAnkle),
    (Landmark::RightHip, Landmark::RightKnee),
    (Landmark::RightKnee, Landmark::RightAnkle),
    // 身長（鼻→足首）
    (Landmark::Nose, Landmark::LeftAnkle),
    (Landmark::Nose, Landmark::RightAnkle),
];

pub const LANDMARK_RADIUS: i32 = 4;
