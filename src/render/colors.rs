/// Our color representation, rendered to CSS at output time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl AppColor {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Build from a packed `0xRRGGBB` value.
    pub const fn from_rgb_u32(rgb: u32) -> Self {
        Self::new(
            ((rgb >> 16) & 0xFF) as f32 / 255.0,
            ((rgb >> 8) & 0xFF) as f32 / 255.0,
            (rgb & 0xFF) as f32 / 255.0,
        )
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Create a lighter version (hover and card accents).
    pub fn lighten(self, amount: f32) -> Self {
        Self {
            r: (self.r + amount).min(1.0),
            g: (self.g + amount).min(1.0),
            b: (self.b + amount).min(1.0),
            a: self.a,
        }
    }

    /// Create a darker version (label backgrounds, borders).
    pub fn darken(self, amount: f32) -> Self {
        Self {
            r: (self.r - amount).max(0.0),
            g: (self.g - amount).max(0.0),
            b: (self.b - amount).max(0.0),
            a: self.a,
        }
    }

    /// `#rrggbb` when opaque, `rgba(...)` otherwise.
    pub fn to_css(self) -> String {
        let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        if self.a >= 1.0 {
            format!("#{:02X}{:02X}{:02X}", c(self.r), c(self.g), c(self.b))
        } else {
            format!(
                "rgba({}, {}, {}, {:.2})",
                c(self.r),
                c(self.g),
                c(self.b),
                self.a
            )
        }
    }
}

/// Colors used by the treemap, legend, cards and tooltip.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub budget: AppColor,
    pub expenditure: AppColor,
    pub label_text: AppColor,
    pub label_background: AppColor,
    /// Opacity of the groups that are not hovered while a tooltip is shown
    pub dimmed_opacity: f32,
}

impl Default for Palette {
    fn default() -> Self {
        let budget = AppColor::from_rgb_u32(0x3288CE);
        Self {
            budget,
            expenditure: AppColor::from_rgb_u32(0x82B6E0),
            label_text: AppColor::new(1.0, 1.0, 1.0),
            label_background: budget.darken(0.25).with_alpha(0.55),
            dimmed_opacity: 0.4,
        }
    }
}
