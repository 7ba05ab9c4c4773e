use anyhow::Result;
use minifb::{Key, KeyRepeat, Window, WindowOptions};
use opencv::core::{Mat, Vec3b};
use opencv::prelude::*;

use crate::config::DisplayConfig;
use crate::landmark::LandmarkSet;
use crate::render::skeleton::{LANDMARK_RADIUS, SKELETON_CONNECTIONS};
use crate::session::Command;

/// minifbを使用したプレビューウィンドウ
pub struct MinifbRenderer {
    window: Window,
    title: String,
    buffer: Vec<u32>,
    width: usize,
    height: usize,
}

impl MinifbRenderer {
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self> {
        let window = Window::new(
            title,
            width,
            height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )?;

        Ok(Self {
            window,
            title: title.to_string(),
            buffer: vec![0u32; width * height],
            width,
            height,
        })
    }

    /// ウィンドウが開いているか（Escで閉じる）
    pub fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    /// このフレームで押されたコマンドキー
    pub fn poll_command(&self) -> Option<Command> {
        [
            (Key::C, Command::Calibrate),
            (Key::M, Command::Measure),
            (Key::Q, Command::Quit),
        ]
        .into_iter()
        .find(|(key, _)| self.window.is_key_pressed(*key, KeyRepeat::No))
        .map(|(_, command)| command)
    }

    /// 状態表示（タイトルバー）
    pub fn set_status(&mut self, status: &str) {
        self.window.set_title(&format!("{} | {}", self.title, status));
    }

    /// BGR Mat をバッファにコピー
    pub fn draw_frame(&mut self, frame: &Mat) -> Result<()> {
        let frame_width = frame.cols() as usize;
        let frame_height = frame.rows() as usize;

        for y in 0..self.height.min(frame_height) {
            for x in 0..self.width.min(frame_width) {
                let pixel = frame.at_2d::<Vec3b>(y as i32, x as i32)?;
                let (r, g, b) = (pixel[2] as u32, pixel[1] as u32, pixel[0] as u32);
                self.buffer[y * self.width + x] = (r << 16) | (g << 8) | b;
            }
        }

        Ok(())
    }

    /// ランドマークと骨格線を描画
    pub fn draw_landmarks(&mut self, landmarks: &LandmarkSet, display: &DisplayConfig) {
        for (start, end) in SKELETON_CONNECTIONS.iter() {
            if let (Some(a), Some(b)) = (landmarks.get(*start), landmarks.get(*end)) {
                self.draw_line(a.x, a.y, b.x, b.y, display.connection_color);
            }
        }

        for (_, p) in landmarks.iter() {
            self.draw_circle(p.x, p.y, LANDMARK_RADIUS, display.landmark_color);
        }
    }

    pub fn update(&mut self) -> Result<()> {
        self.window
            .update_with_buffer(&self.buffer, self.width, self.height)?;
        Ok(())
    }

    /// Bresenham
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);

        loop {
            self.set_pixel(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn draw_circle(&mut self, cx: i32, cy: i32, radius: i32, color: u32) {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= radius * radius {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            self.buffer[y as usize * self.width + x as usize] = color;
        }
    }
}
