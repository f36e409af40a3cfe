//! Colors, rectangles and the alignment model used to place trigger buttons.

use glam::Vec2;

/// A rectangle in screen-space pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns true if `point` lies inside the rectangle (edges inclusive).
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }
}

/// RGBA color with premultiplied alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Scale the color channels, leaving alpha untouched.
    pub fn scaled(self, factor: f32) -> Self {
        Self::rgba(self.r * factor, self.g * factor, self.b * factor, self.a)
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }

    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    /// Deep blue backdrop of the gameplay scene.
    pub const MIDNIGHT: Color = Color::rgba(0.015_686_275, 0.015_686_275, 0.203_921_57, 1.0);
    /// Semi-transparent fill behind button labels.
    pub const BUTTON_BG: Color = Color::rgba(0.1, 0.1, 0.1, 0.85);
}

/// A length that is either in UI pixels or a fraction of the parent extent.
///
/// Pixel lengths are authored against an ideal UI height and scaled with the
/// actual viewport height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Length {
    Px(f32),
    Fraction(f32),
}

impl Length {
    pub const ZERO: Length = Length::Px(0.0);

    fn resolve(self, extent: f32, scale: f32) -> f32 {
        match self {
            Length::Px(px) => px * scale,
            Length::Fraction(f) => f * extent,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VAlign {
    Top,
    #[default]
    Center,
    Bottom,
}

/// Placement of a button inside the full-screen UI layer.
///
/// The button is aligned inside the viewport first, then shifted by
/// `left`/`top`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ButtonLayout {
    pub width: Length,
    pub height: Length,
    pub left: Length,
    pub top: Length,
    pub h_align: HAlign,
    pub v_align: VAlign,
}

impl ButtonLayout {
    /// A centered button of the given size.
    pub fn new(width: Length, height: Length) -> Self {
        Self {
            width,
            height,
            left: Length::ZERO,
            top: Length::ZERO,
            h_align: HAlign::Center,
            v_align: VAlign::Center,
        }
    }

    pub fn align(mut self, h_align: HAlign, v_align: VAlign) -> Self {
        self.h_align = h_align;
        self.v_align = v_align;
        self
    }

    pub fn offset(mut self, left: Length, top: Length) -> Self {
        self.left = left;
        self.top = top;
        self
    }

    /// Resolve to a pixel rectangle for a viewport of the given size.
    pub fn resolve(&self, viewport: Vec2, ideal_height: f32) -> Rect {
        let scale = if ideal_height > 0.0 {
            viewport.y / ideal_height
        } else {
            1.0
        };

        let width = self.width.resolve(viewport.x, scale);
        let height = self.height.resolve(viewport.y, scale);

        let x = match self.h_align {
            HAlign::Left => 0.0,
            HAlign::Center => (viewport.x - width) * 0.5,
            HAlign::Right => viewport.x - width,
        } + self.left.resolve(viewport.x, scale);

        let y = match self.v_align {
            VAlign::Top => 0.0,
            VAlign::Center => (viewport.y - height) * 0.5,
            VAlign::Bottom => viewport.y - height,
        } + self.top.resolve(viewport.y, scale);

        Rect::new(x, y, width, height)
    }
}
