//! Terminal paint step.
//!
//! The game is drawn into a pixel buffer two pixels per cell (upper half
//! block), then flushed with crossterm. Drawing only reads the [`Game`].

use crossterm::{
    cursor, queue,
    style::{self, Color as CColor},
};
use std::io::{self, Write};

use crate::game::pipes::{Pipe, PipeColor};
use crate::game::{Game, GameState};

// ── Colors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }

    const fn dim(self) -> Rgb {
        Rgb(self.0 / 2, self.1 / 2, self.2 / 2)
    }
}

const SKY_TOP: Rgb = Rgb(78, 192, 202);
const SKY_BOT: Rgb = Rgb(200, 236, 240);
const LETTERBOX: Rgb = Rgb(18, 24, 32);
const GRASS: Rgb = Rgb(84, 168, 55);
const GRASS_LIGHT: Rgb = Rgb(110, 200, 70);
const DIRT: Rgb = Rgb(222, 216, 149);
const DIRT_DARK: Rgb = Rgb(176, 161, 79);
const CITY: Rgb = Rgb(160, 214, 220);
const BUSH: Rgb = Rgb(100, 190, 70);
const BIRD_Y: Rgb = Rgb(245, 200, 66);
const BIRD_HI: Rgb = Rgb(255, 225, 100);
const BIRD_WING: Rgb = Rgb(215, 165, 35);
const BIRD_EYE: Rgb = Rgb(255, 255, 255);
const BIRD_PUPIL: Rgb = Rgb(20, 20, 20);
const BIRD_BEAK: Rgb = Rgb(225, 75, 35);
const WHITE: Rgb = Rgb(255, 255, 255);
const SHADOW: Rgb = Rgb(30, 30, 30);
const PANEL: Rgb = Rgb(222, 216, 149);
const PANEL_EDGE: Rgb = Rgb(84, 56, 71);
const MEDAL: Rgb = Rgb(255, 200, 40);

/// Shading stops for a pipe column: dark edge, mid, highlight, right edge, cap rim.
struct PipePalette {
    edge: Rgb,
    mid: Rgb,
    hi: Rgb,
    right: Rgb,
    rim: Rgb,
}

const GREEN_PIPE: PipePalette = PipePalette {
    edge: Rgb(74, 122, 26),
    mid: Rgb(100, 170, 40),
    hi: Rgb(145, 215, 62),
    right: Rgb(115, 191, 46),
    rim: Rgb(60, 100, 20),
};

const RED_PIPE: PipePalette = PipePalette {
    edge: Rgb(140, 60, 20),
    mid: Rgb(210, 105, 30),
    hi: Rgb(240, 150, 70),
    right: Rgb(222, 120, 44),
    rim: Rgb(110, 45, 15),
};

fn palette(color: PipeColor) -> &'static PipePalette {
    match color {
        PipeColor::Green => &GREEN_PIPE,
        PipeColor::Red => &RED_PIPE,
    }
}

// ── Pixel buffer with half-block rendering ──────────────────────────────────

pub struct PixelBuf {
    w: usize,
    h: usize, // pixel height = terminal rows * 2
    px: Vec<Rgb>,
}

impl PixelBuf {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![LETTERBOX; w * h],
        }
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.px.resize(w * h, LETTERBOX);
    }

    fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    fn fill(&mut self, c: Rgb) {
        self.px.fill(c);
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, c);
            }
        }
    }

    pub fn flush(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut prev_fg = Rgb(0, 0, 0);
        let mut prev_bg = Rgb(0, 0, 0);
        let mut need_fg = true;
        let mut need_bg = true;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);

                if top == bot {
                    if need_bg || prev_bg != top {
                        queue!(out, style::SetBackgroundColor(term_color(top)))?;
                        prev_bg = top;
                        need_bg = false;
                    }
                    queue!(out, style::Print(' '))?;
                } else {
                    if need_fg || prev_fg != top {
                        queue!(out, style::SetForegroundColor(term_color(top)))?;
                        prev_fg = top;
                        need_fg = false;
                    }
                    if need_bg || prev_bg != bot {
                        queue!(out, style::SetBackgroundColor(term_color(bot)))?;
                        prev_bg = bot;
                        need_bg = false;
                    }
                    queue!(out, style::Print('\u{2580}'))?; // ▀
                }
            }
            if row + 1 < rows {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                need_fg = true;
                need_bg = true;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

fn term_color(c: Rgb) -> CColor {
    CColor::Rgb {
        r: c.0,
        g: c.1,
        b: c.2,
    }
}

// ── 3x5 bitmap digits ──────────────────────────────────────────────────────

#[rustfmt::skip]
const DIGITS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // 0
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1], // 1
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1], // 2
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1], // 3
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1], // 4
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // 5
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1], // 6
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0], // 7
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1], // 8
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1], // 9
];

fn draw_digit(buf: &mut PixelBuf, x: i32, y: i32, d: u8, fg: Rgb) {
    let glyph = &DIGITS[d as usize];
    for row in 0..5 {
        for col in 0..3 {
            if glyph[row * 3 + col] == 1 {
                let px = x + col as i32;
                let py = y + row as i32;
                buf.set(px + 1, py + 1, SHADOW);
                buf.set(px, py, fg);
            }
        }
    }
}

fn draw_number(buf: &mut PixelBuf, cx: i32, y: i32, n: u32, fg: Rgb) {
    let s = n.to_string();
    let total_w = s.len() as i32 * 4 - 1; // 3px per digit + 1px spacing
    let start_x = cx - total_w / 2;
    for (i, ch) in s.bytes().enumerate() {
        draw_digit(buf, start_x + i as i32 * 4, y, ch - b'0', fg);
    }
}

// ── Projection ──────────────────────────────────────────────────────────────

/// Logical playfield units to buffer pixels. Uniform scale, centered, with
/// letterbox bars on whichever axis has room to spare.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Projection {
    scale: f64,
    ox: f64,
    oy: f64,
    field_w: i32,
    field_h: i32,
}

impl Projection {
    fn fit(game: &Game, pw: usize, ph: usize) -> Self {
        let vp = game.viewport();
        let scale = (pw as f64 / vp.width).min(ph as f64 / vp.height);
        let fw = vp.width * scale;
        let fh = vp.height * scale;
        Self {
            scale,
            ox: ((pw as f64 - fw) / 2.0).floor(),
            oy: ((ph as f64 - fh) / 2.0).floor(),
            field_w: fw.round() as i32,
            field_h: fh.round() as i32,
        }
    }

    fn x(&self, lx: f64) -> i32 {
        (self.ox + lx * self.scale).round() as i32
    }

    fn y(&self, ly: f64) -> i32 {
        (self.oy + ly * self.scale).round() as i32
    }

    fn len(&self, l: f64) -> i32 {
        (l * self.scale).round().max(1.0) as i32
    }
}

// ── Renderer ────────────────────────────────────────────────────────────────

pub struct Renderer {
    buf: PixelBuf,
}

impl Renderer {
    pub fn new(pw: usize, ph: usize) -> Self {
        Self {
            buf: PixelBuf::new(pw, ph),
        }
    }

    pub fn resize(&mut self, pw: usize, ph: usize) {
        self.buf.resize(pw, ph);
    }

    pub fn buffer(&self) -> &PixelBuf {
        &self.buf
    }

    /// Draw the current game into the buffer and flush it to `out`.
    pub fn paint(&mut self, game: &Game, out: &mut impl Write) -> io::Result<()> {
        self.draw(game);
        self.buf.flush(out)
    }

    pub fn draw(&mut self, game: &Game) {
        let proj = Projection::fit(game, self.buf.w, self.buf.h);
        let buf = &mut self.buf;
        buf.fill(LETTERBOX);

        draw_sky(buf, game, &proj);
        draw_scenery(buf, game, &proj);
        if game.state() != GameState::Idle {
            for pipe in game.stream().pipes() {
                draw_pipe(buf, game, &proj, pipe);
            }
        }
        draw_ground(buf, game, &proj);
        draw_bird(buf, game, &proj);

        let cx = proj.x(game.viewport().width / 2.0);
        match game.state() {
            GameState::Idle => draw_title(buf, game, &proj),
            GameState::Playing { .. } => draw_number(buf, cx, proj.y(0.0) + 4, game.score(), WHITE),
            GameState::GameOver => draw_game_over(buf, game, &proj),
        }
    }
}

fn draw_sky(buf: &mut PixelBuf, game: &Game, proj: &Projection) {
    let top = proj.y(0.0);
    let bottom = proj.y(game.viewport().floor_y(game.tuning()));
    let left = proj.x(0.0);
    let span = (bottom - top).max(1) as i64;
    for y in top..bottom {
        let t = ((y - top) as i64 * 256 / span) as u16;
        let c = Rgb::lerp(SKY_TOP, SKY_BOT, t);
        for x in left..left + proj.field_w {
            buf.set(x, y, c);
        }
    }
}

/// Skyline and bushes along the horizon, scrolling slower than the pipes.
fn draw_scenery(buf: &mut PixelBuf, game: &Game, proj: &Projection) {
    let base = proj.y(game.viewport().floor_y(game.tuning()));
    let left = proj.x(0.0);
    let s = proj.scale;
    for x in left..left + proj.field_w {
        let lx = (x - left) as f64 / s;
        let fx = (lx + game.ground_x() * 0.2) * 0.02;
        let city = ((fx.sin() * 0.5 + 0.5) * 50.0 + 40.0).floor();
        // Blocky rooftops
        let city = city - city % 10.0;
        for y in base - proj.len(city)..base {
            buf.set(x, y, CITY);
        }
        let bx = (lx + game.ground_x() * 0.4) * 0.05;
        let bush = (bx.sin() * 8.0 + (bx * 2.3).sin() * 4.0 + 18.0).max(4.0);
        for y in base - proj.len(bush)..base {
            buf.set(x, y, BUSH);
        }
    }
}

fn draw_ground(buf: &mut PixelBuf, game: &Game, proj: &Projection) {
    let gy = proj.y(game.viewport().floor_y(game.tuning()));
    let bottom = proj.y(game.viewport().height);
    let left = proj.x(0.0);
    let offset = (game.ground_x() * proj.scale) as i32;
    for x in left..left + proj.field_w {
        let alt = ((x - left + offset) / 3) % 2 == 0;
        buf.set(x, gy, if alt { GRASS } else { GRASS_LIGHT });
        buf.set(x, gy + 1, GRASS);
    }
    for y in (gy + 2)..bottom {
        for x in left..left + proj.field_w {
            let stripe = ((x - left + offset) + (y - gy) * 2).rem_euclid(12) < 6;
            buf.set(x, y, if stripe { DIRT } else { DIRT_DARK });
        }
    }
}

fn pipe_shade(x: i32, total_w: i32, pal: &PipePalette) -> Rgb {
    if total_w <= 1 {
        return pal.mid;
    }
    let t = (x as f64 / (total_w - 1) as f64 * 256.0) as u16;
    if t < 64 {
        Rgb::lerp(pal.edge, pal.mid, (t * 4).min(256))
    } else if t < 100 {
        Rgb::lerp(pal.mid, pal.hi, ((t - 64) * 7).min(256))
    } else if t < 160 {
        Rgb::lerp(pal.hi, pal.right, ((t - 100) * 4).min(256))
    } else {
        Rgb::lerp(pal.right, pal.edge, ((t - 160) * 3).min(256))
    }
}

fn draw_pipe(buf: &mut PixelBuf, game: &Game, proj: &Projection, pipe: &Pipe) {
    let pal = palette(pipe.color);
    let tuning = game.tuning();
    let px = proj.x(pipe.x);
    let pw = proj.len(tuning.pipe_width);
    let cap_extra = proj.len(4.0);
    let cap_h = proj.len(24.0).max(2);
    let field_left = proj.x(0.0);
    let field_right = field_left + proj.field_w;
    let top = proj.y(0.0);
    let gap_top = proj.y(pipe.gap_top);
    let gap_bot = proj.y(pipe.gap_bottom(game.layout()));
    let floor = proj.y(game.viewport().floor_y(tuning));

    let clip = Clip {
        left: field_left,
        right: field_right,
        top,
    };

    for x in 0..pw {
        let c = pipe_shade(x, pw, pal);
        clip.column(buf, px + x, top, gap_top - cap_h, c);
        clip.column(buf, px + x, gap_bot + cap_h, floor, c);
    }
    for x in -cap_extra..(pw + cap_extra) {
        let c = pipe_shade(x + cap_extra, pw + cap_extra * 2, pal);
        clip.column(buf, px + x, gap_top - cap_h, gap_top, c);
        clip.column(buf, px + x, gap_top - cap_h, gap_top - cap_h + 1, pal.rim);
        clip.column(buf, px + x, gap_top - 1, gap_top, pal.rim);
        clip.column(buf, px + x, gap_bot, gap_bot + cap_h, c);
        clip.column(buf, px + x, gap_bot, gap_bot + 1, pal.rim);
        clip.column(buf, px + x, gap_bot + cap_h - 1, gap_bot + cap_h, pal.rim);
    }
}

/// Pipes are clipped to the playfield, not the letterbox.
struct Clip {
    left: i32,
    right: i32,
    top: i32,
}

impl Clip {
    fn column(&self, buf: &mut PixelBuf, x: i32, y0: i32, y1: i32, c: Rgb) {
        if x >= self.left && x < self.right {
            for y in y0.max(self.top)..y1 {
                buf.set(x, y, c);
            }
        }
    }
}

fn draw_bird(buf: &mut PixelBuf, game: &Game, proj: &Projection) {
    let tuning = game.tuning();
    let bird = game.bird();
    let size = proj.len(tuning.bird_size);
    let x0 = proj.x(game.viewport().bird_x());
    let y0 = proj.y(bird.y);

    // Tilt shears the beak and tail up or down by up to a quarter of the body.
    let tilt = ((bird.angle / 90.0) * size as f64 / 4.0).round() as i32;

    buf.fill_rect(x0, y0 + size / 6, size, size * 2 / 3, BIRD_Y);
    buf.fill_rect(x0 + size / 6, y0, size * 2 / 3, size, BIRD_Y);
    buf.fill_rect(x0 + size / 6, y0, size * 2 / 3, (size / 6).max(1), BIRD_HI);

    let flap_up = (game.ground_x() / 12.0) as u64 % 2 == 0;
    let wing_y = if flap_up { y0 + size / 3 } else { y0 + size / 2 };
    buf.fill_rect(x0, wing_y, size / 2, (size / 4).max(1), BIRD_WING);

    let eye = (size / 4).max(1);
    let ex = x0 + size - eye - size / 6;
    let ey = y0 + size / 6;
    buf.fill_rect(ex, ey, eye, eye, BIRD_EYE);
    buf.set(ex + eye - 1, ey + eye / 2, BIRD_PUPIL);

    let beak_w = (size / 3).max(1);
    let beak_h = (size / 5).max(1);
    buf.fill_rect(x0 + size - 1, y0 + size / 2 + tilt, beak_w, beak_h, BIRD_BEAK);
    buf.fill_rect(x0 - (size / 6).max(1), y0 + size / 3 - tilt, (size / 6).max(1), beak_h, BIRD_WING);
}

fn draw_title(buf: &mut PixelBuf, game: &Game, proj: &Projection) {
    let cx = proj.x(game.viewport().width / 2.0);
    let cy = proj.y(game.viewport().height / 5.0);
    // Blocky "FLAPPY" banner
    let char_w = proj.len(36.0).max(3);
    let char_h = proj.len(48.0).max(4);
    let total_w = 6 * char_w;
    let sx = cx - total_w / 2;
    for i in 0..6 {
        let bx = sx + i * char_w;
        buf.fill_rect(bx, cy, char_w - 1, char_h, BIRD_Y);
        buf.fill_rect(bx, cy, char_w - 1, 1, BIRD_HI);
    }

    // Best score under the banner
    if game.best() > 0 {
        draw_number(buf, cx, cy + char_h + 4, game.best(), MEDAL);
    }

    // Tap hint: a pulsing dot below the bird
    if (game.frame() / 8) % 2 == 0 {
        let hx = proj.x(game.viewport().bird_x() + game.tuning().bird_size / 2.0);
        let hy = proj.y(game.bird().y + game.tuning().bird_size) + 4;
        buf.fill_rect(hx - 1, hy, 3, 2, WHITE);
    }
}

fn draw_game_over(buf: &mut PixelBuf, game: &Game, proj: &Projection) {
    // Dim the frozen frame
    let left = proj.x(0.0);
    let top = proj.y(0.0);
    for y in top..top + proj.field_h {
        for x in left..left + proj.field_w {
            if x >= 0 && y >= 0 && (x as usize) < buf.w && (y as usize) < buf.h {
                let c = buf.get(x as usize, y as usize);
                buf.set(x, y, c.dim());
            }
        }
    }

    let cx = proj.x(game.viewport().width / 2.0);
    let cy = proj.y(game.viewport().height / 2.0);
    let panel_w = proj.len(200.0).max(20);
    let panel_h = proj.len(120.0).max(16);
    let px = cx - panel_w / 2;
    let py = cy - panel_h / 2;
    buf.fill_rect(px - 1, py - 1, panel_w + 2, panel_h + 2, PANEL_EDGE);
    buf.fill_rect(px, py, panel_w, panel_h, PANEL);

    draw_number(buf, cx, py + 3, game.score(), WHITE);
    let best_color = if game.score() > 0 && game.score() == game.best() {
        MEDAL
    } else {
        BIRD_Y
    };
    draw_number(buf, cx, py + panel_h / 2 + 1, game.best(), best_color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::Silent;
    use crate::game::tests::new_game;
    use crate::store::MemoryScoreStore;

    #[test]
    fn test_projection_letterboxes_wide_surface() {
        let game = new_game();
        // 400x600 logical into 200x150 pixels: height-bound, scale 0.25
        let proj = Projection::fit(&game, 200, 150);
        assert!((proj.scale - 0.25).abs() < 1e-9);
        assert_eq!(proj.field_w, 100);
        assert_eq!(proj.x(0.0), 50);
        assert_eq!(proj.y(0.0), 0);
    }

    #[test]
    fn test_draw_idle_leaves_letterbox_bars() {
        let game = new_game();
        let mut renderer = Renderer::new(200, 150);
        renderer.draw(&game);
        let buf = renderer.buffer();
        assert_eq!(buf.get(0, 10), LETTERBOX);
        assert_eq!(buf.get(199, 10), LETTERBOX);
        assert_ne!(buf.get(100, 10), LETTERBOX);
    }

    #[test]
    fn test_draw_playing_shows_pipes() {
        let mut game = new_game();
        game.start(&mut Silent);
        let mut store = MemoryScoreStore::default();
        // Bring the first pipe on screen
        while game.stream().pipes()[0].x > 200.0 {
            if game.bird().y > 280.0 {
                game.jump(&mut Silent);
            }
            game.tick(&mut Silent, &mut store);
            assert!(matches!(game.state(), GameState::Playing { .. }));
        }
        let mut renderer = Renderer::new(100, 150);
        renderer.draw(&game);
        let proj = Projection::fit(&game, 100, 150);
        let pipe = &game.stream().pipes()[0];
        let x = proj.x(pipe.x + game.tuning().pipe_width / 2.0) as usize;
        let c = renderer.buffer().get(x, 1);
        let sky = renderer.buffer().get(2, 1);
        assert_ne!(c, sky);
    }

    #[test]
    fn test_flush_emits_one_line_per_row_pair() {
        let game = new_game();
        let mut renderer = Renderer::new(20, 30);
        let mut out = Vec::new();
        renderer.paint(&game, &mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert_eq!(text.matches("\r\n").count(), 14);
    }

    #[test]
    fn test_draw_survives_tiny_surface() {
        let mut game = new_game();
        game.start(&mut Silent);
        let mut renderer = Renderer::new(1, 2);
        renderer.draw(&game);
        renderer.resize(0, 0);
        renderer.draw(&game);
    }
}
