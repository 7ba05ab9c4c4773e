use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// 計測に使う体のランドマーク
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Landmark {
    Nose,
    LeftShoulder,
    RightShoulder,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl Landmark {
    pub const COUNT: usize = 9;

    pub const ALL: [Landmark; Self::COUNT] = [
        Landmark::Nose,
        Landmark::LeftShoulder,
        Landmark::RightShoulder,
        Landmark::LeftHip,
        Landmark::RightHip,
        Landmark::LeftKnee,
        Landmark::RightKnee,
        Landmark::LeftAnkle,
        Landmark::RightAnkle,
    ];

    /// snake_case 名 (e.g. "left_shoulder")
    pub fn as_str(self) -> &'static str {
        match self {
            Landmark::Nose => "nose",
            Landmark::LeftShoulder => "left_shoulder",
            Landmark::RightShoulder => "right_shoulder",
            Landmark::LeftHip => "left_hip",
            Landmark::RightHip => "right_hip",
            Landmark::LeftKnee => "left_knee",
            Landmark::RightKnee => "right_knee",
            Landmark::LeftAnkle => "left_ankle",
            Landmark::RightAnkle => "right_ankle",
        }
    }
}

impl fmt::Display for Landmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown landmark: {0}")]
pub struct UnknownLandmark(pub String);

impl FromStr for Landmark {
    type Err = UnknownLandmark;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Landmark::ALL
            .into_iter()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| UnknownLandmark(s.to_string()))
    }
}

/// フレーム上のピクセル座標
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn to_f64(self) -> [f64; 2] {
        [self.x as f64, self.y as f64]
    }
}

impl From<(i32, i32)> for PixelPoint {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// 1フレーム分のランドマーク集合
///
/// 検出できなかったランドマークは含まれない。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandmarkSet {
    points: BTreeMap<Landmark, PixelPoint>,
}

impl LandmarkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, landmark: Landmark, point: impl Into<PixelPoint>) {
        self.points.insert(landmark, point.into());
    }

    pub fn with(mut self, landmark: Landmark, point: impl Into<PixelPoint>) -> Self {
        self.insert(landmark, point);
        self
    }

    pub fn get(&self, landmark: Landmark) -> Option<PixelPoint> {
        self.points.get(&landmark).copied()
    }

    pub fn remove(&mut self, landmark: Landmark) -> Option<PixelPoint> {
        self.points.remove(&landmark)
    }

    pub fn contains(&self, landmark: Landmark) -> bool {
        self.points.contains_key(&landmark)
    }

    /// `required` のうち欠けているもの（順序は `required` のまま）
    pub fn missing(&self, required: &[Landmark]) -> Vec<Landmark> {
        required
            .iter()
            .copied()
            .filter(|l| !self.contains(*l))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Landmark, PixelPoint)> + '_ {
        self.points.iter().map(|(l, p)| (*l, *p))
    }
}

impl FromIterator<(Landmark, PixelPoint)> for LandmarkSet {
    fn from_iter<I: IntoIterator<Item = (Landmark, PixelPoint)>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}
