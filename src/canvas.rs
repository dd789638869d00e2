#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    pub const TRANSPARENT: Pixel = Pixel::rgba(0, 0, 0, 0);
    pub const WHITE: Pixel = Pixel::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn hex(v: u32) -> Self {
        Self::rgb((v >> 16) as u8, (v >> 8) as u8, v as u8)
    }

    /// Same colour, alpha replaced by `alpha` in [0,1].
    pub fn alpha(self, alpha: f32) -> Self {
        Self {
            a: (alpha.clamp(0.0, 1.0) * 255.0 + 0.5) as u8,
            ..self
        }
    }

    pub fn lerp(self, other: Pixel, t: f32) -> Pixel {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| -> u8 {
            (a as f32 + (b as f32 - a as f32) * t).round().clamp(0.0, 255.0) as u8
        };
        Pixel {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    pub fn scale(self, s: f32) -> Pixel {
        let f = |c: u8| (c as f32 * s).round().clamp(0.0, 255.0) as u8;
        Pixel {
            r: f(self.r),
            g: f(self.g),
            b: f(self.b),
            a: self.a,
        }
    }

    pub fn luminance(self) -> f32 {
        (0.2126 * self.r as f32 + 0.7152 * self.g as f32 + 0.0722 * self.b as f32) / 255.0
    }
}

/// Owned RGBA raster. Every drawing call composites source-over.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelCanvas {
    pub w: u32,
    pub h: u32,
    pub px: Vec<Pixel>,
}

impl PixelCanvas {
    pub fn new(w: u32, h: u32) -> Self {
        Self {
            w,
            h,
            px: vec![Pixel::default(); (w as usize) * (h as usize)],
        }
    }

    pub fn idx(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Pixel> {
        (x < self.w && y < self.h).then(|| self.px[self.idx(x, y)])
    }

    pub fn clear(&mut self, p: Pixel) {
        self.px.fill(p);
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Copy `src` at the origin, unscaled. Pixels outside `self` are dropped.
    pub fn blit(&mut self, src: &PixelCanvas) {
        let w = self.w.min(src.w) as usize;
        for y in 0..self.h.min(src.h) {
            let d = self.idx(0, y);
            let s = src.idx(0, y);
            self.px[d..d + w].copy_from_slice(&src.px[s..s + w]);
        }
    }

    pub fn blend_over(&mut self, x: i32, y: i32, src: Pixel) {
        if x < 0 || y < 0 || src.a == 0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        if x >= self.w || y >= self.h {
            return;
        }
        let i = self.idx(x, y);
        if src.a == 255 {
            self.px[i] = src;
            return;
        }
        let dst = self.px[i];

        let sa = src.a as f32 / 255.0;
        let da = dst.a as f32 / 255.0;

        let out_a = sa + da * (1.0 - sa);
        if out_a <= 1e-6 {
            self.px[i] = Pixel::default();
            return;
        }

        let blend = |sc: u8, dc: u8| -> u8 {
            let sc = sc as f32 / 255.0;
            let dc = dc as f32 / 255.0;
            let out = (sc * sa + dc * da * (1.0 - sa)) / out_a;
            (out.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
        };

        self.px[i] = Pixel {
            r: blend(src.r, dst.r),
            g: blend(src.g, dst.g),
            b: blend(src.b, dst.b),
            a: (out_a.clamp(0.0, 1.0) * 255.0 + 0.5) as u8,
        };
    }

    // Pixel-centre sampling: a span [a, b) covers pixel i when a <= i + 0.5 < b.
    fn span(&self, a: f32, b: f32, limit: u32) -> (i32, i32) {
        let lo = (a - 0.5).ceil().max(0.0) as i32;
        let hi = ((b - 0.5).ceil() as i32).min(limit as i32);
        (lo, hi)
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, c: Pixel) {
        let (x0, x1) = self.span(x, x + w, self.w);
        let (y0, y1) = self.span(y, y + h, self.h);
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend_over(px, py, c);
            }
        }
    }

    /// Opaque top→bottom gradient over rows [y0, y1).
    pub fn vertical_gradient(&mut self, y0: f32, y1: f32, top: Pixel, bottom: Pixel) {
        let (r0, r1) = self.span(y0, y1, self.h);
        let span = (y1 - y0).max(1.0);
        for py in r0..r1 {
            let t = (py as f32 + 0.5 - y0) / span;
            let c = top.lerp(bottom, t);
            for px in 0..self.w as i32 {
                self.blend_over(px, py, c);
            }
        }
    }

    /// Vertical band whose alpha ramps from `top.a` to `bottom.a`.
    pub fn vertical_band(&mut self, x: f32, w: f32, y0: f32, y1: f32, top: Pixel, bottom: Pixel) {
        let (c0, c1) = self.span(x, x + w, self.w);
        let (r0, r1) = self.span(y0, y1, self.h);
        let span = (y1 - y0).max(1.0);
        for py in r0..r1 {
            let c = top.lerp(bottom, (py as f32 + 0.5 - y0) / span);
            for px in c0..c1 {
                self.blend_over(px, py, c);
            }
        }
    }

    pub fn fill_ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32, c: Pixel) {
        if rx <= 0.0 || ry <= 0.0 {
            return;
        }
        let (x0, x1) = self.span(cx - rx, cx + rx, self.w);
        let (y0, y1) = self.span(cy - ry, cy + ry, self.h);
        for py in y0..y1 {
            for px in x0..x1 {
                let dx = (px as f32 + 0.5 - cx) / rx;
                let dy = (py as f32 + 0.5 - cy) / ry;
                if dx * dx + dy * dy <= 1.0 {
                    self.blend_over(px, py, c);
                }
            }
        }
    }

    pub fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, c: Pixel) {
        // sub-pixel dots still leave a mark
        if r < 0.75 {
            self.blend_over(cx.floor() as i32, cy.floor() as i32, c);
            return;
        }
        self.fill_ellipse(cx, cy, r, r, c);
    }

    /// Elliptical glow: alpha of `c` at the centre, fading to 0 at the rim.
    pub fn radial_glow(&mut self, cx: f32, cy: f32, rx: f32, ry: f32, c: Pixel) {
        if rx <= 0.0 || ry <= 0.0 {
            return;
        }
        let (x0, x1) = self.span(cx - rx, cx + rx, self.w);
        let (y0, y1) = self.span(cy - ry, cy + ry, self.h);
        let peak = c.a as f32 / 255.0;
        for py in y0..y1 {
            for px in x0..x1 {
                let dx = (px as f32 + 0.5 - cx) / rx;
                let dy = (py as f32 + 0.5 - cy) / ry;
                let d = (dx * dx + dy * dy).sqrt();
                if d < 1.0 {
                    let t = 1.0 - d;
                    self.blend_over(px, py, c.alpha(peak * t * t));
                }
            }
        }
    }

    /// Thick segment drawn as a run of discs.
    pub fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, width: f32, c: Pixel) {
        let len = ((x1 - x0).powi(2) + (y1 - y0).powi(2)).sqrt();
        let steps = (len.ceil() as usize).max(1);
        let thin = width <= 1.0;
        let r = width * 0.5;
        let mut last = None;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = x0 + (x1 - x0) * t;
            let y = y0 + (y1 - y0) * t;
            if thin {
                // plot each pixel once so translucent strokes stay even
                let key = (x.floor() as i32, y.floor() as i32);
                if last != Some(key) {
                    self.blend_over(key.0, key.1, c);
                    last = Some(key);
                }
            } else {
                self.fill_circle(x, y, r, c);
            }
        }
    }

    /// Polyline through `points`.
    pub fn polyline(&mut self, points: &[(f32, f32)], width: f32, c: Pixel) {
        for pair in points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            self.line(a.0, a.1, b.0, b.1, width, c);
        }
    }

    pub fn to_rgba_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.w, self.h, |x, y| {
            let p = self.px[self.idx(x, y)];
            image::Rgba([p.r, p.g, p.b, p.a])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_over_opaque_destination() {
        let mut c = PixelCanvas::new(2, 1);
        c.clear(Pixel::rgb(0, 0, 0));
        c.blend_over(0, 0, Pixel::rgba(255, 255, 255, 128));
        let p = c.get(0, 0).expect("in bounds");
        assert_eq!(p.a, 255);
        assert!((127..=129).contains(&p.r));
        assert_eq!(c.get(1, 0), Some(Pixel::rgb(0, 0, 0)));
    }

    #[test]
    fn fill_rect_uses_pixel_centres() {
        let mut c = PixelCanvas::new(10, 10);
        c.fill_rect(2.0, 3.0, 4.0, 2.0, Pixel::WHITE);
        let lit = c.px.iter().filter(|p| **p == Pixel::WHITE).count();
        assert_eq!(lit, 8);
        assert_eq!(c.get(2, 3), Some(Pixel::WHITE));
        assert_eq!(c.get(6, 3), Some(Pixel::default()));
    }

    #[test]
    fn drawing_outside_is_clipped() {
        let mut c = PixelCanvas::new(4, 4);
        c.fill_rect(-10.0, -10.0, 100.0, 100.0, Pixel::WHITE);
        c.fill_circle(-20.0, 50.0, 3.0, Pixel::WHITE);
        c.line(-5.0, -5.0, 50.0, 50.0, 3.0, Pixel::WHITE);
        assert!(c.px.iter().all(|p| *p == Pixel::WHITE));
    }

    #[test]
    fn blit_copies_overlap_only() {
        let mut src = PixelCanvas::new(3, 3);
        src.clear(Pixel::rgb(9, 9, 9));
        let mut dst = PixelCanvas::new(4, 2);
        dst.blit(&src);
        assert_eq!(dst.get(2, 1), Some(Pixel::rgb(9, 9, 9)));
        assert_eq!(dst.get(3, 1), Some(Pixel::default()));
    }

    #[test]
    fn gradient_runs_from_top_to_bottom() {
        let mut c = PixelCanvas::new(1, 10);
        c.vertical_gradient(0.0, 10.0, Pixel::rgb(0, 0, 0), Pixel::rgb(200, 200, 200));
        let top = c.get(0, 0).expect("top").r;
        let bottom = c.get(0, 9).expect("bottom").r;
        assert!(top < 20 && bottom > 180);
    }
}
