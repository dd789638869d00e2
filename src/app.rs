use crate::cache::SceneCache;
use crate::canvas::PixelCanvas;
use crate::city::{CityConfig, Field};
use crate::export::{default_file_name, render_frame, write_png};
use crate::input::{collect_input_nonblocking, map_key, Action, InputEvent};
use crate::overlay::composite;
use crate::presets::PRESETS;
use crate::score::{compare, compute_scores, Metric, Scores};
use crate::settings::{save_settings_atomic, Settings};
use crate::share::to_query;
use crate::term::{bar, canvas_to_cells, draw_text, Cell, Terminal};
use crate::theme::theme_for;
use crossterm::style::Color;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// City scene refresh interval (20 updates per second).
pub const SCENE_INTERVAL: Duration = Duration::from_millis(50);
/// Quiet time after the last resize event before the new size is applied.
pub const RESIZE_SETTLE: Duration = Duration::from_millis(120);

const PANEL_W: u16 = 36;
const MIN_SCENE_COLS: u16 = 16;
const MIN_SCENE_ROWS: u16 = 6;

const FG: Color = Color::White;
const DIM: Color = Color::Grey;
const HI: Color = Color::Cyan;
const BG: Color = Color::Black;

/// Throttled scene loop. Scheduling stops entirely while stopped; there is
/// never a frame in flight to cancel.
pub struct SceneLoop {
    interval: Duration,
    next_at: Option<Instant>,
}

impl SceneLoop {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_at: None,
        }
    }

    pub fn start(&mut self, now: Instant) {
        if self.next_at.is_none() {
            self.next_at = Some(now);
        }
    }

    pub fn stop(&mut self) {
        self.next_at = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_at.is_some()
    }

    /// True when a frame is due at `now`; the following one is scheduled.
    pub fn due(&mut self, now: Instant) -> bool {
        match self.next_at {
            Some(at) if now >= at => {
                let mut next = at + self.interval;
                if next <= now {
                    // fell behind; do not try to catch up
                    next = now + self.interval;
                }
                self.next_at = Some(next);
                true
            }
            _ => false,
        }
    }
}

/// Collapses a burst of resize events into the last size.
pub struct ResizeDebounce {
    settle: Duration,
    pending: Option<(u16, u16, Instant)>,
}

impl ResizeDebounce {
    pub fn new(settle: Duration) -> Self {
        Self {
            settle,
            pending: None,
        }
    }

    pub fn push(&mut self, cols: u16, rows: u16, now: Instant) {
        self.pending = Some((cols, rows, now));
    }

    pub fn take_settled(&mut self, now: Instant) -> Option<(u16, u16)> {
        match self.pending {
            Some((c, r, at)) if now.saturating_duration_since(at) >= self.settle => {
                self.pending = None;
                Some((c, r))
            }
            _ => None,
        }
    }
}

pub struct LaunchOptions {
    pub config: CityConfig,
    pub name: Option<String>,
    pub settings: Settings,
    pub settings_path: Option<PathBuf>,
}

struct App {
    term: Terminal,
    settings: Settings,
    settings_path: Option<PathBuf>,
    config: CityConfig,
    name: Option<String>,
    scores: Scores,
    selected: usize,
    pinned: Option<(CityConfig, Scores)>,
    cache: SceneCache,
    frame: PixelCanvas,
    scene_loop: SceneLoop,
    resize: ResizeDebounce,
    started: Instant,
    scene_dirty: bool,
    show_help: bool,
    status: String,
    should_quit: bool,
}

impl App {
    fn init(opts: LaunchOptions) -> anyhow::Result<Self> {
        let term = Terminal::begin()?;
        Ok(Self {
            term,
            settings: opts.settings,
            settings_path: opts.settings_path,
            scores: compute_scores(&opts.config),
            config: opts.config,
            name: opts.name,
            selected: 0,
            pinned: None,
            cache: SceneCache::new(),
            frame: PixelCanvas::new(0, 0),
            scene_loop: SceneLoop::new(SCENE_INTERVAL),
            resize: ResizeDebounce::new(RESIZE_SETTLE),
            started: Instant::now(),
            scene_dirty: true,
            show_help: false,
            status: "h for help".to_string(),
            should_quit: false,
        })
    }

    fn run(&mut self) -> anyhow::Result<()> {
        let fps = self.settings.fps_cap.clamp(10, 240);
        let frame_dt = Duration::from_secs_f32(1.0 / fps as f32);

        while !self.should_quit {
            let frame_start = Instant::now();

            for ev in collect_input_nonblocking(frame_dt)? {
                match ev {
                    InputEvent::Resize(c, r) => self.resize.push(c, r, frame_start),
                    InputEvent::Key(code, mods) => {
                        if let Some(action) = map_key(code, mods, self.show_help) {
                            self.apply(action);
                        }
                    }
                }
                if self.should_quit {
                    break;
                }
            }

            let now = Instant::now();
            if let Some((c, r)) = self.resize.take_settled(now) {
                self.term.resize(c, r);
                self.cache.invalidate();
                self.scene_dirty = true;
                info!(cols = c, rows = r, "terminal resized");
            }

            let visible = !self.show_help && self.scene_raster_size().is_some();
            if visible && !self.settings.reduce_motion {
                self.scene_loop.start(now);
            } else {
                self.scene_loop.stop();
            }
            let tick = self.scene_loop.due(now);
            if visible && (tick || self.scene_dirty) {
                self.draw_scene();
                self.scene_dirty = false;
            }

            self.draw_cells()?;
            spin_sleep(frame_dt, frame_start);
        }
        Ok(())
    }

    fn set_config(&mut self, config: CityConfig) {
        self.config = config;
        self.scores = compute_scores(&config);
        self.scene_dirty = true;
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::HelpToggle => {
                self.show_help = !self.show_help;
                self.scene_dirty = true;
            }
            Action::SelectPrev => {
                self.selected = (self.selected + Field::ALL.len() - 1) % Field::ALL.len();
            }
            Action::SelectNext => self.selected = (self.selected + 1) % Field::ALL.len(),
            Action::Adjust(delta) => {
                let mut c = self.config;
                c.nudge(Field::ALL[self.selected], delta);
                self.set_config(c);
            }
            Action::Random => {
                self.set_config(CityConfig::random(&mut rand::thread_rng()));
                self.name = None;
                self.status = "a city from nowhere".to_string();
            }
            Action::Preset(i) => {
                if let Some(p) = PRESETS.get(i) {
                    self.set_config(p.config());
                    self.name = Some(p.title.to_string());
                    self.status = p.tagline.to_string();
                }
            }
            Action::PinToggle => {
                self.pinned = match self.pinned {
                    Some(_) => None,
                    None => Some((self.config, self.scores)),
                };
            }
            Action::Export => self.export(),
            Action::Share => {
                let query = to_query(&self.config, self.name.as_deref());
                info!(%query, "share link");
                self.status = format!("?{query}");
            }
            Action::ColorToggle => self.settings.enable_color = !self.settings.enable_color,
            Action::MotionToggle => {
                self.settings.reduce_motion = !self.settings.reduce_motion;
                self.scene_dirty = true;
            }
        }
    }

    fn scene_raster_size(&self) -> Option<(u32, u32)> {
        let cols = self.term.cols.saturating_sub(PANEL_W);
        let rows = self.term.rows.saturating_sub(1);
        (cols >= MIN_SCENE_COLS && rows >= MIN_SCENE_ROWS).then(|| (cols as u32, rows as u32 * 2))
    }

    fn timestamp_ms(&self) -> f64 {
        overlay_time_ms(self.settings.reduce_motion, self.started.elapsed())
    }

    fn draw_scene(&mut self) {
        let Some((w, h)) = self.scene_raster_size() else {
            return;
        };
        let scene = self.cache.get_or_render(&self.config, w, h);
        if self.frame.w != w || self.frame.h != h {
            self.frame = PixelCanvas::new(w, h);
        }
        let t = self.timestamp_ms();
        let theme = theme_for(self.config.environment);
        composite(&mut self.frame, &scene, &self.config, &theme, t);
    }

    fn export(&mut self) {
        let (w, h) = self.scene_raster_size().unwrap_or((240, 120));
        let frame = render_frame(&self.config, w * 2, h * 2, self.timestamp_ms());
        let dir = self
            .settings
            .export_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        let path = dir.join(default_file_name(chrono::Local::now()));
        self.status = match write_png(&frame, &path) {
            Ok(()) => format!("saved {}", path.display()),
            Err(err) => {
                warn!(%err, path = %path.display(), "export failed");
                format!("export failed: {err}")
            }
        };
    }

    fn draw_cells(&mut self) -> anyhow::Result<()> {
        self.term.cur.clear(BG);
        if !self.show_help && self.scene_raster_size().is_some() {
            canvas_to_cells(&self.frame, &mut self.term.cur, PANEL_W, 0, self.settings.enable_color);
        }
        self.draw_panel();
        if self.show_help {
            self.draw_help();
        }
        self.term.present()
    }

    fn draw_panel(&mut self) {
        let buf = &mut self.term.cur;
        draw_text(buf, 1, 0, "FUTURE CITIES PLAYGROUND", HI, BG);
        let name = self.name.as_deref().unwrap_or("untitled city");
        draw_text(buf, 1, 1, name, DIM, BG);

        for (i, field) in Field::ALL.iter().enumerate() {
            let sel = i == self.selected;
            let value = self.config.get(*field);
            let line = if field.is_numeric() {
                let pct = match field {
                    Field::Population => self.config.population(),
                    Field::Greenery => self.config.greenery(),
                    _ => self.config.tech(),
                };
                format!("{} {:<11} {} {:>3}", if sel { '>' } else { ' ' }, field.label(), bar(pct as f32 / 100.0, 10), value)
            } else {
                format!("{} {:<11} < {} >", if sel { '>' } else { ' ' }, field.label(), value)
            };
            draw_text(buf, 1, 3 + i as u16, &line, if sel { HI } else { FG }, BG);
        }

        let y = 10;
        match &self.pinned {
            None => {
                draw_text(buf, 1, y, "Scores", HI, BG);
                for (i, m) in Metric::ALL.iter().enumerate() {
                    let v = self.scores.get(*m);
                    let line = format!("{:<15} {} {:>3}", m.label(), bar(v as f32 / 100.0, 10), v);
                    draw_text(buf, 1, y + 1 + i as u16, &line, FG, BG);
                }
            }
            Some((_, pinned)) => {
                draw_text(buf, 1, y, "Compare  pinned -> now", HI, BG);
                for (i, row) in compare(pinned, &self.scores).iter().enumerate() {
                    let line = format!(
                        "{:<15} {:>3} -> {:>3} {:>+4}",
                        row.metric.label(),
                        row.left,
                        row.right,
                        row.delta
                    );
                    let fg = match row.delta {
                        d if d > 0 => Color::Green,
                        d if d < 0 => Color::Red,
                        _ => FG,
                    };
                    draw_text(buf, 1, y + 1 + i as u16, &line, fg, BG);
                }
            }
        }

        let y = 17;
        draw_text(buf, 1, y, "Scenarios", HI, BG);
        for (i, p) in PRESETS.iter().enumerate() {
            draw_text(buf, 1, y + 1 + i as u16, &format!("{} {}", i + 1, p.title), FG, BG);
        }

        let bottom = buf.h.saturating_sub(1);
        draw_text(buf, 1, bottom, &self.status, DIM, BG);
    }

    fn draw_help(&mut self) {
        const LINES: [&str; 12] = [
            "Up/Down     select a parameter",
            "Left/Right  adjust by 5 or cycle",
            "[ / ]       adjust by 1",
            "1-5         load a scenario",
            "r           random city",
            "p           pin / unpin for compare",
            "s           show share link",
            "e           export PNG",
            "c           toggle colour",
            "m           toggle reduced motion",
            "h / Esc     close help",
            "q           quit",
        ];
        let buf = &mut self.term.cur;
        let bw = 44u16.min(buf.w.saturating_sub(2));
        let bh = (LINES.len() as u16 + 4).min(buf.h.saturating_sub(2));
        if bw < 4 || bh < 4 {
            return;
        }
        let x0 = (buf.w - bw) / 2;
        let y0 = (buf.h - bh) / 2;
        draw_box(buf, x0, y0, bw, bh);
        draw_text(buf, x0 + 2, y0 + 1, "Keys", HI, BG);
        for (i, line) in LINES.iter().enumerate() {
            let yy = y0 + 3 + i as u16;
            if yy >= y0 + bh - 1 {
                break;
            }
            draw_text(buf, x0 + 2, yy, line, FG, BG);
        }
    }

    fn save_settings(&self) -> anyhow::Result<()> {
        if let Some(path) = &self.settings_path {
            save_settings_atomic(path, &self.settings)?;
        }
        Ok(())
    }
}

fn draw_box(buf: &mut crate::term::CellBuffer, x0: u16, y0: u16, w: u16, h: u16) {
    let cell = |ch| Cell { ch, fg: FG, bg: BG };
    for y in y0..y0 + h {
        for x in x0..x0 + w {
            buf.set(x, y, cell(' '));
        }
    }
    for x in x0..x0 + w {
        buf.set(x, y0, cell('─'));
        buf.set(x, y0 + h - 1, cell('─'));
    }
    for y in y0..y0 + h {
        buf.set(x0, y, cell('│'));
        buf.set(x0 + w - 1, y, cell('│'));
    }
    buf.set(x0, y0, cell('┌'));
    buf.set(x0 + w - 1, y0, cell('┐'));
    buf.set(x0, y0 + h - 1, cell('└'));
    buf.set(x0 + w - 1, y0 + h - 1, cell('┘'));
}

/// Overlay clock; frozen at zero with reduced motion.
pub fn overlay_time_ms(reduce_motion: bool, elapsed: Duration) -> f64 {
    if reduce_motion {
        0.0
    } else {
        elapsed.as_secs_f64() * 1000.0
    }
}

pub fn run(opts: LaunchOptions) -> anyhow::Result<()> {
    let mut app = App::init(opts)?;
    info!(config = ?app.config, "configurator started");
    let res = app.run();
    let ended = app.term.end();
    res?;
    ended?;
    app.save_settings()
}

/* -----------------------------
   Frame pacing helper
------------------------------ */

fn spin_sleep(target: Duration, start: Instant) {
    let end = start + target;
    loop {
        let t = Instant::now();
        if t >= end {
            break;
        }
        let left = end - t;
        if left > Duration::from_millis(2) {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_loop_only_ticks_while_running() {
        let t0 = Instant::now();
        let mut l = SceneLoop::new(SCENE_INTERVAL);
        assert!(!l.due(t0));
        l.start(t0);
        assert!(l.is_running());
        assert!(l.due(t0));
        assert!(!l.due(t0 + Duration::from_millis(10)));
        assert!(l.due(t0 + Duration::from_millis(50)));
        l.stop();
        assert!(!l.due(t0 + Duration::from_secs(5)));
    }

    #[test]
    fn scene_loop_does_not_burst_after_stall() {
        let t0 = Instant::now();
        let mut l = SceneLoop::new(SCENE_INTERVAL);
        l.start(t0);
        assert!(l.due(t0));
        let late = t0 + Duration::from_secs(2);
        assert!(l.due(late));
        assert!(!l.due(late + Duration::from_millis(1)));
    }

    #[test]
    fn overlay_clock_freezes_with_reduced_motion() {
        let elapsed = Duration::from_millis(1250);
        assert_eq!(overlay_time_ms(false, elapsed), 1250.0);
        assert_eq!(overlay_time_ms(true, elapsed), 0.0);
    }

    #[test]
    fn resize_applies_last_size_after_quiet_period() {
        let t0 = Instant::now();
        let mut d = ResizeDebounce::new(RESIZE_SETTLE);
        d.push(80, 24, t0);
        d.push(100, 30, t0 + Duration::from_millis(40));
        assert_eq!(d.take_settled(t0 + Duration::from_millis(100)), None);
        assert_eq!(d.take_settled(t0 + Duration::from_millis(200)), Some((100, 30)));
        assert_eq!(d.take_settled(t0 + Duration::from_millis(400)), None);
    }
}
