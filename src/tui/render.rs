use crossterm::{
    cursor, queue,
    style::{self, Color as CColor},
};
use std::io::{self, Write};

use flappy_arcade::{Game, GameListener, GameState, Session, Tuning, WorldBounds};

// ── Colors ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
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

    fn term(self) -> CColor {
        CColor::Rgb {
            r: self.0,
            g: self.1,
            b: self.2,
        }
    }
}

const SKY_TOP: Rgb = Rgb(70, 180, 200);
const SKY_BOT: Rgb = Rgb(190, 232, 245);
const GRASS: Rgb = Rgb(84, 168, 55);
const GRASS_LIGHT: Rgb = Rgb(110, 200, 70);
const DIRT: Rgb = Rgb(210, 185, 110);
const DIRT_DARK: Rgb = Rgb(185, 160, 90);
const PANEL: Rgb = Rgb(220, 195, 120);
const PIPE_L: Rgb = Rgb(74, 122, 26);
const PIPE_M: Rgb = Rgb(100, 170, 40);
const PIPE_R: Rgb = Rgb(115, 191, 46);
const PIPE_HI: Rgb = Rgb(145, 215, 62);
const CAP_DARK: Rgb = Rgb(60, 100, 20);
const BIRD_Y: Rgb = Rgb(245, 200, 66);
const BIRD_HI: Rgb = Rgb(255, 225, 100);
const BIRD_WING: Rgb = Rgb(215, 165, 35);
const BIRD_EYE: Rgb = Rgb(255, 255, 255);
const BIRD_PUPIL: Rgb = Rgb(20, 20, 20);
const BIRD_BEAK: Rgb = Rgb(225, 75, 35);
const BIRD_BEAK_HI: Rgb = Rgb(240, 110, 50);
const HILL_FAR: Rgb = Rgb(120, 195, 75);
const HILL_NEAR: Rgb = Rgb(95, 175, 55);
const WHITE: Rgb = Rgb(255, 255, 255);
const SHADOW: Rgb = Rgb(30, 30, 30);
const HUD_GRAVITY: Rgb = Rgb(180, 180, 255);
const HUD_FLAP: Rgb = Rgb(255, 180, 180);
const HUD_SPEED: Rgb = Rgb(180, 255, 180);

/// Delay between the crash and the game-over panel.
const GAME_OVER_PANEL_DELAY_MS: f64 = 400.0;

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
            px: vec![SKY_TOP; w * h],
        }
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.px.resize(w * h, SKY_TOP);
    }

    fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, c);
            }
        }
    }

    fn dim_all(&mut self) {
        for c in &mut self.px {
            *c = c.dim();
        }
    }

    /// Two pixels per cell: upper half as foreground of `▀`, lower half as
    /// background. Color changes are only emitted when they differ from the
    /// previous cell.
    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut fg: Option<Rgb> = None;
        let mut bg: Option<Rgb> = None;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);

                if bg != Some(bot) {
                    queue!(out, style::SetBackgroundColor(bot.term()))?;
                    bg = Some(bot);
                }
                if top == bot {
                    queue!(out, style::Print(' '))?;
                    continue;
                }
                if fg != Some(top) {
                    queue!(out, style::SetForegroundColor(top.term()))?;
                    fg = Some(top);
                }
                queue!(out, style::Print('\u{2580}'))?; // ▀
            }
            if row + 1 < rows {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                fg = None;
                bg = None;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
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

/// Centered on `cx`, 3px glyphs with 1px spacing.
fn draw_number(buf: &mut PixelBuf, cx: i32, y: i32, n: u32, fg: Rgb) {
    let s = n.to_string();
    let total_w = s.len() as i32 * 4 - 1;
    let start_x = cx - total_w / 2;
    for (i, d) in s.bytes().enumerate() {
        draw_digit(buf, start_x + i as i32 * 4, y, d - b'0', fg);
    }
}

// ── Viewport ────────────────────────────────────────────────────────────────

/// Maps world units onto terminal pixels. The sky area shows the whole world
/// height; the ground strip sits below the world floor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub pw: usize,
    pub ph: usize,
    pub ground_h: usize,
    /// Decorative detail scale, 1.0 on a 48-pixel-tall terminal.
    pub detail: f64,
    world_height: f64,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16, world_height: f64) -> Self {
        let pw = (cols as usize).max(1);
        let ph = (rows as usize * 2).max(2);
        let detail = ph as f64 / 48.0;
        let ground_h = ((8.0 * detail).max(6.0) as usize).min(ph / 4);
        Self {
            pw,
            ph,
            ground_h,
            detail,
            world_height,
        }
    }

    /// Like [`Viewport::new`], but with the world height raised to the
    /// smallest one `tuning` can play in, the same clamp the session applies.
    pub fn fitted(cols: u16, rows: u16, world_height: f64, tuning: &Tuning) -> Self {
        let height = WorldBounds::clamped(0.0, world_height, tuning).height;
        Self::new(cols, rows, height)
    }

    pub fn sky_h(&self) -> usize {
        (self.ph - self.ground_h).max(1)
    }

    /// Pixels per world unit.
    pub fn scale(&self) -> f64 {
        self.sky_h() as f64 / self.world_height
    }

    /// World width that keeps the aspect ratio of the sky area.
    pub fn world_width(&self) -> f64 {
        self.pw as f64 / self.scale()
    }

    pub fn world_height(&self) -> f64 {
        self.world_height
    }

    fn px(&self, world: f64) -> i32 {
        (world * self.scale()).round() as i32
    }
}

// ── Scene ───────────────────────────────────────────────────────────────────

pub struct Renderer {
    buf: PixelBuf,
    view: Viewport,
    frame: u64,
    ground_x: f64,
    pub show_hud: bool,
}

impl Renderer {
    pub fn new(view: Viewport) -> Self {
        Self {
            buf: PixelBuf::new(view.pw, view.ph),
            view,
            frame: 0,
            ground_x: 0.0,
            show_hud: false,
        }
    }

    pub fn resize(&mut self, view: Viewport) {
        self.buf.resize(view.pw, view.ph);
        self.view = view;
    }

    pub fn present(&self, out: &mut impl Write) -> io::Result<()> {
        self.buf.render(out)
    }

    pub fn draw<L: GameListener>(&mut self, game: &Game<L>) {
        self.frame += 1;
        let session = game.session();
        let state = game.state();
        let scroll = match state {
            GameState::Running => session.tuning().obstacle_speed * self.view.scale(),
            GameState::Idle => 0.5,
            GameState::Paused | GameState::GameOver => 0.0,
        };
        self.ground_x += scroll;

        self.draw_sky();
        self.draw_hills();
        self.draw_pipes(session);
        self.draw_ground();
        self.draw_bird(session, state);

        match state {
            GameState::Idle => self.draw_title(session),
            GameState::Running => self.draw_score(session),
            GameState::Paused => {
                self.draw_score(session);
                self.draw_paused();
            }
            GameState::GameOver => {
                self.draw_score(session);
                let shown = game
                    .game_over_at_ms()
                    .is_some_and(|at| game.now_ms() - at >= GAME_OVER_PANEL_DELAY_MS);
                if shown {
                    self.draw_game_over(session);
                }
            }
        }
        if self.show_hud {
            self.draw_tuning_hud(session);
        }
    }

    fn draw_sky(&mut self) {
        let sky_h = self.view.sky_h();
        for y in 0..sky_h {
            let t = ((y * 256) / sky_h) as u16;
            let c = Rgb::lerp(SKY_TOP, SKY_BOT, t);
            for x in 0..self.view.pw {
                self.buf.set(x as i32, y as i32, c);
            }
        }
    }

    fn draw_hills(&mut self) {
        let base = self.view.sky_h() as i32;
        let s = self.view.detail;
        for (color, parallax, freq, amp, lift) in [
            (HILL_FAR, 0.2, 0.04, (6.0, 3.0, 1.7), 4.0),
            (HILL_NEAR, 0.4, 0.06, (4.0, 2.0, 2.3), 2.0),
        ] {
            for x in 0..self.view.pw as i32 {
                let fx = (x as f64 + self.ground_x * parallax) * freq;
                let h = (fx.sin() * amp.0 + (fx * amp.2).sin() * amp.1) * s;
                let top = base - h as i32 - (lift * s) as i32;
                for y in top..base {
                    self.buf.set(x, y, color);
                }
            }
        }
    }

    fn draw_ground(&mut self) {
        let gy = self.view.sky_h() as i32;
        for x in 0..self.view.pw as i32 {
            let alt = ((x as f64 + self.ground_x) as i32 / 3) % 2 == 0;
            self.buf.set(x, gy, if alt { GRASS } else { GRASS_LIGHT });
            self.buf.set(x, gy + 1, GRASS);
        }
        for y in (gy + 2)..self.view.ph as i32 {
            for x in 0..self.view.pw as i32 {
                let stripe = ((x as f64 + self.ground_x * 0.8) as i32 + (y - gy) * 2) % 12 < 6;
                self.buf.set(x, y, if stripe { DIRT } else { DIRT_DARK });
            }
        }
    }

    fn draw_pipes(&mut self, session: &Session) {
        let v = self.view;
        let cap_extra = (2.0 * v.detail).max(1.0) as i32;
        let cap_h = (3.0 * v.detail).max(2.0) as i32;
        let pw = v.px(session.tuning().obstacle_width).max(2);
        let floor = v.sky_h() as i32;

        for pipe in session.obstacles() {
            let px = v.px(pipe.x);
            let gap_top = v.px(pipe.top_height);
            let gap_bot = v.px(pipe.gap_bottom());

            // Top body, then its cap.
            for x in 0..pw {
                let c = pipe_shade(x, pw);
                for y in 0..gap_top - cap_h {
                    self.buf.set(px + x, y, c);
                }
            }
            for x in -cap_extra..(pw + cap_extra) {
                let c = pipe_shade(x + cap_extra, pw + cap_extra * 2);
                for y in (gap_top - cap_h)..gap_top {
                    self.buf.set(px + x, y, c);
                }
                self.buf.set(px + x, gap_top - cap_h, CAP_DARK);
                self.buf.set(px + x, gap_top - 1, CAP_DARK);
            }

            // Bottom cap, then its body down to the floor.
            for x in -cap_extra..(pw + cap_extra) {
                let c = pipe_shade(x + cap_extra, pw + cap_extra * 2);
                for y in gap_bot..(gap_bot + cap_h) {
                    self.buf.set(px + x, y, c);
                }
                self.buf.set(px + x, gap_bot, CAP_DARK);
                self.buf.set(px + x, gap_bot + cap_h - 1, CAP_DARK);
            }
            for x in 0..pw {
                let c = pipe_shade(x, pw);
                for y in (gap_bot + cap_h)..floor {
                    self.buf.set(px + x, y, c);
                }
            }
        }
    }

    fn draw_bird(&mut self, session: &Session, state: GameState) {
        let v = self.view;
        let avatar = session.avatar();
        let s = v.detail;

        // Idle bob is cosmetic only; the simulation does not move the avatar.
        let bob = if state == GameState::Idle {
            ((self.frame as f64 * 0.08).sin() * 3.0 * s) as i32
        } else {
            0
        };
        let cx = v.px(avatar.x);
        let cy = v.px(avatar.y) + bob;

        // Nose up when rising, down when falling, capped like a rotation.
        let tilt = ((avatar.velocity / 10.0).clamp(-0.35, 0.5) * 2.0).round() as i32;

        let bw = v.px(avatar.width / 2.0).max(2);
        let bh = v.px(avatar.height / 2.0).max(1);
        self.buf.fill_rect(cx - bw, cy - bh, bw * 2 + 1, bh * 2, BIRD_Y);
        self.buf
            .fill_rect(cx - bw + 1, cy - bh, bw * 2 - 2, 1.max((s * 0.8) as i32), BIRD_HI);

        // Wing only beats while the bird is alive.
        let wing_y_off = match state {
            GameState::Running | GameState::Idle if self.frame % 8 < 4 => -1,
            _ => 1,
        };
        let wing_h = (1.5 * s).max(1.0) as i32;
        let wing_w = (2.0 * s).max(1.0) as i32;
        self.buf
            .fill_rect(cx - bw + 1, cy + wing_y_off + tilt, wing_w, wing_h, BIRD_WING);

        let ex = cx + bw - (1.5 * s) as i32;
        let ey = cy - bh + (1.0 * s).max(1.0) as i32;
        let eye_r = (0.8 * s).max(1.0) as i32;
        self.buf.fill_rect(ex, ey, eye_r + 1, eye_r + 1, BIRD_EYE);
        self.buf.set(ex + eye_r, ey + eye_r, BIRD_PUPIL);
        if s >= 1.5 {
            self.buf.set(ex + eye_r - 1, ey + eye_r, BIRD_PUPIL);
        }

        let beak_x = cx + bw;
        let beak_y = cy - (0.5 * s) as i32 + tilt;
        let beak_w = (2.5 * s).max(2.0) as i32;
        let beak_h = (1.5 * s).max(1.0) as i32;
        self.buf
            .fill_rect(beak_x, beak_y, beak_w, beak_h / 2 + 1, BIRD_BEAK_HI);
        self.buf
            .fill_rect(beak_x, beak_y + beak_h / 2 + 1, beak_w, beak_h / 2, BIRD_BEAK);

        let tail_w = (1.5 * s).max(1.0) as i32;
        self.buf
            .fill_rect(cx - bw - tail_w, cy - 1 - tilt, tail_w, 2, BIRD_WING);
    }

    fn draw_score(&mut self, session: &Session) {
        draw_number(&mut self.buf, self.view.pw as i32 / 2, 4, session.score(), WHITE);
    }

    fn draw_tuning_hud(&mut self, session: &Session) {
        // Values scaled to integers: gravity and speed x100, flap x10.
        let t = session.tuning();
        let y = self.view.sky_h() as i32 - 8;
        let x = self.view.pw as i32 - 24;
        draw_number(&mut self.buf, x, y, (t.gravity * 100.0) as u32, HUD_GRAVITY);
        draw_number(&mut self.buf, x, y - 7, (-t.flap_velocity * 10.0) as u32, HUD_FLAP);
        draw_number(&mut self.buf, x, y - 14, (t.obstacle_speed * 100.0) as u32, HUD_SPEED);
    }

    fn draw_title(&mut self, session: &Session) {
        let s = self.view.detail;
        let cx = self.view.pw as i32 / 2;
        let cy = self.view.ph as i32 / 4;
        let letters = 6;
        let char_w = (4.0 * s).max(3.0) as i32;
        let char_h = (6.0 * s).max(4.0) as i32;
        let sx = cx - letters * char_w / 2;

        for i in 0..letters {
            let bx = sx + i * char_w;
            self.buf.fill_rect(bx, cy, char_w - 1, char_h, BIRD_Y);
            self.buf.fill_rect(bx, cy, char_w - 1, 1, BIRD_HI);
        }

        // "SPACE TO FLAP" as a row of blocks.
        let sub_y = cy + char_h + 4;
        let msg = "SPACE TO FLAP";
        let msg_x = cx - msg.len() as i32 * 2;
        for (i, ch) in msg.chars().enumerate() {
            if ch != ' ' {
                self.buf.fill_rect(msg_x + i as i32 * 4, sub_y, 3, 3, WHITE);
            }
        }

        if session.best() > 0 {
            draw_number(&mut self.buf, cx, sub_y + 7, session.best(), BIRD_Y);
        }
    }

    fn draw_paused(&mut self) {
        self.buf.dim_all();
        let s = self.view.detail;
        let cx = self.view.pw as i32 / 2;
        let cy = self.view.ph as i32 / 2;
        let bar_w = (2.0 * s).max(2.0) as i32;
        let bar_h = (8.0 * s).max(6.0) as i32;
        self.buf.fill_rect(cx - bar_w * 2, cy - bar_h / 2, bar_w, bar_h, WHITE);
        self.buf.fill_rect(cx + bar_w, cy - bar_h / 2, bar_w, bar_h, WHITE);
    }

    fn draw_game_over(&mut self, session: &Session) {
        let s = self.view.detail;
        let cx = self.view.pw as i32 / 2;
        let cy = self.view.ph as i32 / 2;
        let panel_w = (40.0 * s).max(30.0) as i32;
        let panel_h = (20.0 * s).max(16.0) as i32;

        self.buf.dim_all();

        let px = cx - panel_w / 2;
        let py = cy - panel_h / 2;
        self.buf.fill_rect(px - 1, py - 1, panel_w + 2, panel_h + 2, SHADOW);
        self.buf.fill_rect(px, py, panel_w, panel_h, DIRT);
        self.buf
            .fill_rect(px + 1, py + 1, panel_w - 2, panel_h - 2, PANEL);

        draw_number(&mut self.buf, cx, py + 4, session.score(), WHITE);
        draw_number(&mut self.buf, cx, py + 12, session.best(), BIRD_Y);
    }
}

fn pipe_shade(x: i32, total_w: i32) -> Rgb {
    if total_w <= 1 {
        return PIPE_M;
    }
    let t = (x as f64 / (total_w - 1) as f64 * 256.0).clamp(0.0, 256.0) as u16;
    if t < 64 {
        Rgb::lerp(PIPE_L, PIPE_M, (t * 4).min(256))
    } else if t < 100 {
        Rgb::lerp(PIPE_M, PIPE_HI, ((t - 64) * 7).min(256))
    } else if t < 160 {
        Rgb::lerp(PIPE_HI, PIPE_R, ((t - 100) * 4).min(256))
    } else {
        Rgb::lerp(PIPE_R, PIPE_L, ((t - 160) * 3).min(256))
    }
}
