//! ARGB framebuffer with the handful of primitives the scene and HUD need.

// ════════════════════════════════════════════════════════════════════════════
// FrameBuffer
// ════════════════════════════════════════════════════════════════════════════

pub struct FrameBuffer {
    width:  usize,
    height: usize,
    pixels: Vec<u32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        FrameBuffer { width, height, pixels: vec![0xFF000000; width * height] }
    }

    pub fn width(&self)  -> usize  { self.width }
    pub fn height(&self) -> usize  { self.height }
    pub fn pixels(&self) -> &[u32] { &self.pixels }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x < self.width && y < self.height { Some(self.pixels[y * self.width + x]) } else { None }
    }

    pub fn clear(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }

    /// Mix `color` over what is already there.
    pub fn blend_pixel(&mut self, x: usize, y: usize, color: u32, alpha: f32) {
        if x < self.width && y < self.height {
            let i = y * self.width + x;
            self.pixels[i] = blend(self.pixels[i], color, alpha);
        }
    }

    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(self.height) {
            for col in x..(x + w).min(self.width) {
                self.pixels[row * self.width + col] = color;
            }
        }
    }

    pub fn blend_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32, alpha: f32) {
        for row in y..(y + h).min(self.height) {
            for col in x..(x + w).min(self.width) {
                self.blend_pixel(col, row, color, alpha);
            }
        }
    }

    pub fn draw_border(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        if w == 0 || h == 0 { return; }
        for col in x..(x + w).min(self.width) {
            self.set_pixel(col, y, color);
            self.set_pixel(col, y + h - 1, color);
        }
        for row in y..(y + h).min(self.height) {
            self.set_pixel(x, row, color);
            self.set_pixel(x + w - 1, row, color);
        }
    }

    /// Square splat of side `diameter` centred on a sub-pixel position.
    pub fn plot_point(&mut self, cx: f32, cy: f32, diameter: f32, color: u32, alpha: f32) {
        let half = diameter / 2.0;
        let x0 = (cx - half).round();
        let y0 = (cy - half).round();
        let side = diameter.round().max(1.0) as isize;
        if x0 + side as f32 <= 0.0 || y0 + side as f32 <= 0.0 { return; }
        if x0 >= self.width as f32 || y0 >= self.height as f32 { return; }
        for dy in 0..side {
            for dx in 0..side {
                let (px, py) = (x0 as isize + dx, y0 as isize + dy);
                if px >= 0 && py >= 0 {
                    self.blend_pixel(px as usize, py as usize, color, alpha);
                }
            }
        }
    }

    pub fn fill_disc(&mut self, cx: usize, cy: usize, r: usize, color: u32, alpha: f32) {
        let r2 = (r * r) as isize;
        for dy in -(r as isize)..=r as isize {
            for dx in -(r as isize)..=r as isize {
                if dx * dx + dy * dy <= r2 {
                    let (px, py) = (cx as isize + dx, cy as isize + dy);
                    if px >= 0 && py >= 0 {
                        self.blend_pixel(px as usize, py as usize, color, alpha);
                    }
                }
            }
        }
    }

    /// 3×5 bitmap text, each font pixel drawn as a `scale`×`scale` block.
    pub fn draw_label(&mut self, text: &str, x: usize, y: usize, scale: usize, color: u32, alpha: f32) {
        let scale = scale.max(1);
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.blend_rect(cx + col * scale, y + row * scale, scale, scale, color, alpha);
                    }
                }
            }
            cx += GLYPH_ADVANCE * scale;
            if cx + GLYPH_ADVANCE * scale > self.width { break; }
        }
    }
}

/// 3 wide + 1 gap.
pub const GLYPH_ADVANCE: usize = 4;
pub const GLYPH_HEIGHT:  usize = 5;

pub fn text_width(text: &str, scale: usize) -> usize {
    let n = text.chars().count();
    if n == 0 { 0 } else { (n * GLYPH_ADVANCE - 1) * scale.max(1) }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

/// Alpha-blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
pub fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0 - t) + cb as f32 * t).round() as u32;
    let ar = (a >> 16) & 0xFF; let br = (b >> 16) & 0xFF;
    let ag = (a >>  8) & 0xFF; let bg = (b >>  8) & 0xFF;
    let ab =  a        & 0xFF; let bb =  b        & 0xFF;
    0xFF000000 | (lerp(ar, br) << 16) | (lerp(ag, bg) << 8) | lerp(ab, bb)
}

/// Scale an ARGB color's channels by `k` (0–1).
pub fn dim(color: u32, k: f32) -> u32 {
    blend(0xFF000000, color, k)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_endpoints() {
        assert_eq!(blend(0xFF000000, 0xFF0088FF, 0.0), 0xFF000000);
        assert_eq!(blend(0xFF000000, 0xFF0088FF, 1.0), 0xFF0088FF);
        assert_eq!(blend(0xFF000000, 0xFF00FFFF, 0.6), 0xFF009999);
    }

    #[test]
    fn blend_is_opaque() {
        assert_eq!(blend(0x00000000, 0x0012_3456, 0.5) >> 24, 0xFF);
    }

    #[test]
    fn out_of_bounds_writes_ignored() {
        let mut fb = FrameBuffer::new(4, 4);
        fb.set_pixel(4, 0, 0xFFFFFFFF);
        fb.fill_rect(2, 2, 10, 10, 0xFFFFFFFF);
        fb.plot_point(-5.0, -5.0, 3.0, 0xFFFFFFFF, 1.0);
        assert_eq!(fb.pixel(3, 3), Some(0xFFFFFFFF));
        assert_eq!(fb.pixel(0, 0), Some(0xFF000000));
        assert_eq!(fb.pixel(4, 4), None);
    }

    #[test]
    fn point_covers_its_footprint() {
        let mut fb = FrameBuffer::new(10, 10);
        fb.plot_point(5.0, 5.0, 2.0, 0xFFFFFFFF, 1.0);
        let lit = fb.pixels().iter().filter(|&&p| p == 0xFFFFFFFF).count();
        assert_eq!(lit, 4);
    }

    #[test]
    fn repeated_points_accumulate() {
        let mut fb = FrameBuffer::new(3, 3);
        fb.plot_point(1.5, 1.5, 1.0, 0xFF0088FF, 0.8);
        let once = fb.pixel(1, 1).unwrap();
        fb.plot_point(1.5, 1.5, 1.0, 0xFF0088FF, 0.8);
        let twice = fb.pixel(1, 1).unwrap();
        assert!(twice & 0xFF >= once & 0xFF);
        assert_ne!(once, 0xFF000000);
    }

    #[test]
    fn label_width_and_pixels() {
        assert_eq!(text_width("IDLE", 1), 15);
        assert_eq!(text_width("IDLE", 2), 30);
        assert_eq!(text_width("", 3), 0);

        let mut fb = FrameBuffer::new(20, 10);
        fb.draw_label("1", 0, 0, 1, 0xFFFFFFFF, 1.0);
        // '1' has a full-width bottom row.
        assert_eq!(fb.pixel(0, 4), Some(0xFFFFFFFF));
        assert_eq!(fb.pixel(2, 4), Some(0xFFFFFFFF));
        assert_eq!(fb.pixel(0, 0), Some(0xFF000000));
    }
}
