use eframe::egui;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::clip::ClipPlayer;
use crate::deck::Deck;
use crate::effects::entrance::EntranceObserver;
use crate::effects::parallax::Parallax;
use crate::effects::particles::ParticleField;
use crate::effects::typewriter::Typewriter;
use crate::effects::ease_in_out;
use crate::media::backend::{MusicPlayer, Track};
use crate::media::{AudioSink, MediaController, MusicIcon, PlayOutcome};
use crate::navigation::{NavCommand, Navigator, SwipeTracker, WheelDebounce};
use crate::oneshot::Gesture;
use crate::theme::{self, Theme};
use crate::trim::{Playhead, TrimController};
use crate::visualizer::Visualizer;

const SLIDE_FADE_DURATION: f32 = 0.6;
const ENTRANCE_RISE: f32 = 30.0;
const DOT_RADIUS: f32 = 6.0;
const DOT_SPACING: f32 = 24.0;
const MUSIC_BUTTON_RADIUS: f32 = 28.0;
const BAR_WIDTH: f32 = 4.0;
const BAR_GAP: f32 = 2.0;

/// Everything the window needs besides the deck, resolved from flags and config.
#[derive(Debug, Clone)]
pub struct PresentOptions {
    pub windowed: bool,
    /// Zero-based; clamped to the deck
    pub start_slide: Option<usize>,
    pub autostart: bool,
    pub typewriter: bool,
    pub muted: bool,
    pub volume: f32,
    pub swipe_threshold: f32,
    pub wheel_cooldown: Duration,
    pub particles: usize,
    pub parallax: f32,
    pub bars: usize,
}

struct DeckApp<S: AudioSink> {
    deck: Deck,
    theme: Theme,
    backgrounds: Vec<Option<egui::Color32>>,
    nav: Navigator,
    swipe: SwipeTracker,
    wheel: WheelDebounce,
    media: MediaController<S>,
    muted: bool,
    clip: Option<ClipPlayer>,
    poster: Option<egui::TextureHandle>,
    particles: ParticleField,
    parallax: Parallax,
    entrance: EntranceObserver,
    typewriter_enabled: bool,
    typewriter: Option<Typewriter>,
    /// Start screen dismissed and playback attempted
    started: bool,
    launched: Instant,
    shown_slide: usize,
    fade_from: Option<usize>,
    /// Window rect from the last frame, used for hit testing input
    last_rect: egui::Rect,
    last_clip_rect: Option<egui::Rect>,
}

/// Pointer and keyboard input for one frame, copied out of egui.
#[derive(Debug, Default)]
struct FrameInput {
    events: Vec<egui::Event>,
    clicked: bool,
    click_pos: Option<egui::Pos2>,
    double_clicked: bool,
    fullscreen: bool,
}

impl FrameInput {
    fn from_state(i: &egui::InputState) -> Self {
        Self {
            events: i.events.clone(),
            clicked: i.pointer.primary_clicked(),
            click_pos: i.pointer.interact_pos(),
            double_clicked: i.pointer.button_double_clicked(egui::PointerButton::Primary),
            fullscreen: i.viewport().fullscreen.unwrap_or(false),
        }
    }
}

impl<S: AudioSink> DeckApp<S> {
    fn new(
        deck: Deck,
        options: &PresentOptions,
        sink: S,
        poster: Option<egui::TextureHandle>,
    ) -> Self {
        let now = Instant::now();
        let backgrounds = deck
            .slides
            .iter()
            .map(|s| s.background.as_deref().and_then(theme::parse_hex_color))
            .collect();

        let mut nav = Navigator::new(deck.slide_count());
        if let Some(slide) = options.start_slide {
            nav.go_to_slide(slide.min(deck.slide_count() - 1));
        }

        let media = MediaController::new(sink, options.volume, Visualizer::new(options.bars));

        let clip = deck.clip.as_ref().map(|spec| {
            ClipPlayer::new(spec.duration, TrimController::new(spec.trim_window()))
        });

        let particles = ParticleField::generate(options.particles, &mut rand::rng());

        let shown_slide = nav.current();
        let mut app = Self {
            deck,
            theme: Theme::dark(),
            backgrounds,
            nav,
            swipe: SwipeTracker::new(options.swipe_threshold),
            wheel: WheelDebounce::new(options.wheel_cooldown),
            media,
            muted: options.muted,
            clip,
            poster,
            particles,
            parallax: Parallax::new(options.parallax),
            entrance: EntranceObserver::new(),
            typewriter_enabled: options.typewriter,
            typewriter: None,
            started: false,
            launched: now,
            shown_slide,
            fade_from: None,
            last_rect: egui::Rect::ZERO,
            last_clip_rect: None,
        };
        if options.autostart {
            app.begin(now);
        }
        app
    }

    /// Leave the start screen: start the visualizer and try the music.
    fn begin(&mut self, now: Instant) {
        self.started = true;
        tracing::debug!(muted = self.muted, "starting presentation");
        if self.typewriter_enabled {
            self.typewriter = Some(Typewriter::new(self.deck.slides[0].heading.clone(), now));
        }
        if self.muted {
            self.media.start_visualizer();
            return;
        }
        if let PlayOutcome::Blocked(_) = self.media.start() {
            self.media.prompt(now);
        }
    }

    fn toggle_music(&mut self, now: Instant) {
        if !self.media.toggle() && self.media.awaiting_gesture() {
            self.media.prompt(now);
        }
    }

    fn is_animating(&self, now: Instant) -> bool {
        let current = self.nav.current();
        self.media.visualizer().is_running()
            || (current == 0 && !self.particles.is_empty())
            || self.clip.as_ref().is_some_and(ClipPlayer::is_playing)
            || self.media.is_pulsing(now)
            || self.entrance.is_animating(now)
            || self.fade_progress() < 1.0
            || self
                .typewriter
                .as_ref()
                .is_some_and(|tw| current == 0 && !tw.is_finished(now))
    }

    fn clip_slide(&self) -> Option<usize> {
        self.deck.clip.as_ref().map(|c| c.slide_index())
    }

    /// Bookkeeping when the index changed since the last frame.
    fn sync_slide_change(&mut self) {
        let current = self.nav.current();
        if current == self.shown_slide {
            return;
        }
        if Some(self.shown_slide) == self.clip_slide() {
            if let Some(clip) = &mut self.clip {
                clip.pause_at(Instant::now());
            }
        }
        self.fade_from = Some(self.shown_slide);
        self.shown_slide = current;
    }

    fn fade_progress(&self) -> f32 {
        match self.nav.activated_at() {
            Some(at) => ease_in_out(at.elapsed().as_secs_f32() / SLIDE_FADE_DURATION),
            None => 1.0,
        }
    }

    fn handle_click(&mut self, pos: egui::Pos2, now: Instant) {
        let scale = compute_scale(self.last_rect);
        if let Some(dot) = dot_at(self.last_rect, self.nav.total(), scale, pos) {
            self.nav.go_to_slide(dot);
        } else if music_button_rect(self.last_rect, scale).contains(pos) {
            self.toggle_music(now);
        } else if self
            .last_clip_rect
            .is_some_and(|r| r.contains(pos) && Some(self.nav.current()) == self.clip_slide())
        {
            if let Some(clip) = &mut self.clip {
                clip.toggle(now);
            }
        }
        self.media.on_gesture(Gesture::Click);
    }

    fn handle_key(
        &mut self,
        key: egui::Key,
        now: Instant,
        fullscreen: bool,
        viewport_cmds: &mut Vec<egui::ViewportCommand>,
    ) {
        match key {
            egui::Key::Q | egui::Key::Escape => {
                self.media.stop_visualizer();
                viewport_cmds.push(egui::ViewportCommand::Close);
                return;
            }
            egui::Key::F => {
                viewport_cmds.push(egui::ViewportCommand::Fullscreen(!fullscreen));
            }
            egui::Key::M => self.toggle_music(now),
            egui::Key::D => self.theme = self.theme.toggled(),
            _ => {
                if let Some(cmd) = NavCommand::from_key(key) {
                    self.nav.apply(cmd);
                }
            }
        }
        self.media.on_gesture(Gesture::KeyDown);
    }

    /// Apply one frame of input. Returns the viewport commands to send.
    ///
    /// Until the start overlay is dismissed, the first key press or click only
    /// begins the presentation; swipes and wheel events are ignored.
    fn route_input(&mut self, input: &FrameInput, now: Instant) -> Vec<egui::ViewportCommand> {
        let mut viewport_cmds = Vec::new();

        if input.double_clicked {
            viewport_cmds.push(egui::ViewportCommand::Fullscreen(!input.fullscreen));
        }

        for event in &input.events {
            match event {
                egui::Event::Key {
                    key,
                    pressed: true,
                    repeat,
                    ..
                } => {
                    if !self.started {
                        self.begin(now);
                    } else if *repeat {
                        // held keys keep navigating but count as one gesture
                        if let Some(cmd) = NavCommand::from_key(*key) {
                            self.nav.apply(cmd);
                        }
                    } else {
                        self.handle_key(*key, now, input.fullscreen, &mut viewport_cmds);
                    }
                }
                egui::Event::Touch { phase, pos, .. } if self.started => match phase {
                    egui::TouchPhase::Start => self.swipe.touch_start(*pos),
                    egui::TouchPhase::End => {
                        if let Some(cmd) = self.swipe.touch_end(*pos) {
                            self.nav.apply(cmd);
                        }
                    }
                    _ => {}
                },
                egui::Event::MouseWheel { delta, .. } if self.started => {
                    // egui reports scrolling down as negative y
                    if let Some(cmd) = self.wheel.on_wheel(-delta.y, now) {
                        self.nav.apply(cmd);
                    }
                }
                egui::Event::PointerMoved(pos) => {
                    let origin = self.last_rect.min;
                    self.parallax
                        .pointer_moved(*pos - origin.to_vec2(), self.last_rect.size());
                }
                _ => {}
            }
        }

        if input.clicked {
            if !self.started {
                self.begin(now);
            } else if let Some(pos) = input.click_pos {
                self.handle_click(pos, now);
            }
        }

        viewport_cmds
    }
}

impl<S: AudioSink> eframe::App for DeckApp<S> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        let input = ctx.input(FrameInput::from_state);
        for cmd in self.route_input(&input, now) {
            ctx.send_viewport_cmd(cmd);
        }

        self.sync_slide_change();
        if let Some(clip) = &mut self.clip {
            clip.tick(now);
        }

        let current = self.nav.current();
        let bg = self.theme.slide_background(self.backgrounds[current]);

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(bg).inner_margin(0.0))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                self.last_rect = rect;
                let scale = compute_scale(rect);

                let fade = self.fade_progress();
                if let Some(from) = self.fade_from.filter(|_| fade < 1.0) {
                    self.draw_slide(ui, from, rect, scale, 1.0 - fade, now);
                } else {
                    self.fade_from = None;
                }
                self.draw_slide(ui, current, rect, scale, fade, now);

                self.draw_chrome(ui, rect, scale, now);

                if !self.started {
                    self.draw_start_overlay(ui, rect, scale);
                }
            });

        if self.is_animating(now) {
            ctx.request_repaint();
        }
    }
}

impl<S: AudioSink> DeckApp<S> {
    fn draw_slide(
        &mut self,
        ui: &egui::Ui,
        index: usize,
        rect: egui::Rect,
        scale: f32,
        opacity: f32,
        now: Instant,
    ) {
        let painter = ui.painter();
        let bg = self.theme.slide_background(self.backgrounds[index]);
        let glow_center = rect.center() + self.parallax.offset() * scale;
        painter.rect_filled(rect, 0.0, Theme::with_opacity(bg, opacity));
        painter.circle_filled(
            glow_center,
            rect.height() * 0.45,
            Theme::with_opacity(self.theme.accent, 0.08 * opacity),
        );

        if index == 0 && !self.particles.is_empty() {
            let elapsed = now.saturating_duration_since(self.launched).as_secs_f32();
            let field = rect.translate(self.parallax.offset() * scale);
            self.particles.paint(painter, field, elapsed, scale);
        }

        let slide = &self.deck.slides[index];
        let heading_text = match (&self.typewriter, index) {
            (Some(tw), 0) => tw.visible(now).to_string(),
            _ => slide.heading.clone(),
        };
        let heading_size = if index == 0 {
            self.theme.h1_size
        } else {
            self.theme.h2_size
        };

        let max_width = rect.width() - 240.0 * scale;
        let mut blocks: Vec<Arc<egui::Galley>> = vec![painter.layout(
            heading_text,
            egui::FontId::proportional(heading_size * scale),
            self.theme.heading_color,
            max_width,
        )];
        if let Some(subtitle) = &slide.subtitle {
            blocks.push(painter.layout(
                subtitle.clone(),
                egui::FontId::proportional(self.theme.subtitle_size * scale),
                self.theme.highlight,
                max_width,
            ));
        }
        for paragraph in &slide.body {
            blocks.push(painter.layout(
                paragraph.clone(),
                egui::FontId::proportional(self.theme.body_size * scale),
                self.theme.foreground,
                max_width,
            ));
        }

        let has_clip = Some(index) == self.clip_slide();
        let clip_size = egui::vec2(960.0, 540.0) * scale;
        let gap = 28.0 * scale;
        let content_h: f32 = blocks.iter().map(|g| g.rect.height() + gap).sum::<f32>()
            + if has_clip { clip_size.y } else { -gap };
        let mut y = rect.center().y - content_h / 2.0;

        for (element, galley) in blocks.into_iter().enumerate() {
            let size = galley.rect.size();
            let pos = egui::pos2(rect.center().x - size.x / 2.0, y);
            let element_rect = egui::Rect::from_min_size(pos, size);
            self.entrance.observe((index, element), element_rect, rect, now);
            let progress = self.entrance.progress((index, element), now);
            let lifted = pos + egui::vec2(0.0, (1.0 - progress) * ENTRANCE_RISE * scale);
            let color = self.element_color(element, slide.subtitle.is_some());
            painter.galley_with_override_text_color(
                lifted,
                galley,
                Theme::with_opacity(color, progress * opacity),
            );
            y += size.y + gap;
        }

        if has_clip {
            let clip_rect = egui::Rect::from_min_size(
                egui::pos2(rect.center().x - clip_size.x / 2.0, y),
                clip_size,
            );
            if opacity >= 1.0 {
                self.last_clip_rect = Some(clip_rect);
            }
            self.draw_clip(ui, clip_rect, scale, opacity);
        }
    }

    fn element_color(&self, element: usize, has_subtitle: bool) -> egui::Color32 {
        match element {
            0 => self.theme.heading_color,
            1 if has_subtitle => self.theme.highlight,
            _ => self.theme.foreground,
        }
    }

    fn draw_clip(&self, ui: &egui::Ui, rect: egui::Rect, scale: f32, opacity: f32) {
        let Some(clip) = &self.clip else { return };
        let painter = ui.painter();
        let corner = 12.0 * scale;

        match &self.poster {
            Some(texture) => {
                let tint = Theme::with_opacity(egui::Color32::WHITE, opacity);
                painter.image(
                    texture.id(),
                    rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    tint,
                );
            }
            None => {
                let fill = Theme::with_opacity(self.theme.overlay, opacity);
                painter.rect_filled(rect, corner, fill);
            }
        }

        if !clip.is_playing() {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "\u{25B6}",
                egui::FontId::proportional(96.0 * scale),
                Theme::with_opacity(self.theme.heading_color, 0.8 * opacity),
            );
        }

        // Timeline with the trimmed-away ends shaded
        let track = egui::Rect::from_min_size(
            egui::pos2(rect.left(), rect.bottom() - 6.0 * scale),
            egui::vec2(rect.width(), 6.0 * scale),
        );
        painter.rect_filled(track, 0.0, Theme::with_opacity(self.theme.overlay, 0.8 * opacity));
        if let Some(duration) = clip.duration().filter(|d| *d > 0.0) {
            let window = clip.trim().window();
            let x = |secs: f64| {
                track.left() + track.width() * (secs / duration).clamp(0.0, 1.0) as f32
            };
            let active = egui::Rect::from_x_y_ranges(
                x(window.start)..=x(window.stop_point(duration)),
                track.y_range(),
            );
            painter.rect_filled(active, 0.0, Theme::with_opacity(self.theme.accent, 0.5 * opacity));
        }
        let played = egui::Rect::from_min_size(
            track.min,
            egui::vec2(track.width() * clip.progress(), track.height()),
        );
        painter.rect_filled(played, 0.0, Theme::with_opacity(self.theme.highlight, opacity));

        if let Some(caption) = self.deck.clip.as_ref().and_then(|c| c.caption.as_ref()) {
            painter.text(
                egui::pos2(rect.center().x, rect.bottom() + 12.0 * scale),
                egui::Align2::CENTER_TOP,
                caption,
                egui::FontId::proportional(22.0 * scale),
                Theme::with_opacity(self.theme.foreground, 0.7 * opacity),
            );
        }
    }

    fn draw_chrome(&mut self, ui: &egui::Ui, rect: egui::Rect, scale: f32, now: Instant) {
        let painter = ui.painter();

        // Progress bar along the top edge
        let progress = self.nav.indicators().progress_fraction();
        let bar = egui::Rect::from_min_size(
            rect.min,
            egui::vec2(rect.width() * progress, 4.0 * scale),
        );
        painter.rect_filled(bar, 0.0, self.theme.accent);

        // Navigation dots
        let dots = self.nav.indicators().dots();
        for (center, &active) in dot_centers(rect, dots.len(), scale).iter().zip(dots) {
            if active {
                painter.circle_filled(*center, DOT_RADIUS * scale, self.theme.highlight);
            } else {
                painter.circle_stroke(
                    *center,
                    DOT_RADIUS * scale,
                    egui::Stroke::new(1.5 * scale, Theme::with_opacity(self.theme.foreground, 0.4)),
                );
            }
        }

        // Music button
        let button = music_button_rect(rect, scale);
        let playing = self.media.icon() == MusicIcon::Playing;
        let fill = if playing {
            self.theme.accent
        } else {
            Theme::with_opacity(self.theme.overlay, 0.8)
        };
        painter.circle_filled(button.center(), MUSIC_BUTTON_RADIUS * scale, fill);
        if self.media.is_pulsing(now) {
            let t = now.saturating_duration_since(self.launched).as_secs_f32();
            let pulse = (t * std::f32::consts::TAU).sin() * 0.5 + 0.5;
            painter.circle_stroke(
                button.center(),
                (MUSIC_BUTTON_RADIUS + 4.0 + pulse * 8.0) * scale,
                egui::Stroke::new(
                    2.0 * scale,
                    Theme::with_opacity(self.theme.highlight, 1.0 - pulse * 0.7),
                ),
            );
        }
        painter.text(
            button.center(),
            egui::Align2::CENTER_CENTER,
            self.media.icon().glyph(),
            egui::FontId::proportional(26.0 * scale),
            self.theme.heading_color,
        );

        // Visualizer bars, bottom left
        let time = now.saturating_duration_since(self.launched).as_secs_f64();
        if let Some(heights) = self.media.visualizer_frame(time) {
            let base = egui::pos2(rect.left() + 32.0 * scale, rect.bottom() - 32.0 * scale);
            let color = Theme::with_opacity(self.theme.highlight, 0.7);
            for (i, h) in heights.iter().enumerate() {
                let x = base.x + i as f32 * (BAR_WIDTH + BAR_GAP) * scale;
                let bar = egui::Rect::from_min_max(
                    egui::pos2(x, base.y - h.max(0.0) * scale),
                    egui::pos2(x + BAR_WIDTH * scale, base.y),
                );
                painter.rect_filled(bar, 1.0 * scale, color);
            }
        }

        // Footer and slide counter
        if let Some(footer) = &self.deck.footer {
            painter.text(
                egui::pos2(rect.center().x, rect.bottom() - 64.0 * scale),
                egui::Align2::CENTER_BOTTOM,
                footer,
                egui::FontId::proportional(16.0 * scale),
                Theme::with_opacity(self.theme.foreground, 0.4),
            );
        }
        painter.text(
            egui::pos2(rect.right() - 16.0 * scale, rect.top() + 16.0 * scale),
            egui::Align2::RIGHT_TOP,
            format!(
                "{} / {}",
                self.nav.indicators().active_dot().unwrap_or(0) + 1,
                self.nav.total()
            ),
            egui::FontId::monospace(14.0 * scale),
            Theme::with_opacity(self.theme.foreground, 0.3),
        );
    }

    fn draw_start_overlay(&self, ui: &egui::Ui, rect: egui::Rect, scale: f32) {
        let painter = ui.painter();
        painter.rect_filled(rect, 0.0, Theme::with_opacity(self.theme.overlay, 0.85));
        painter.text(
            rect.center() - egui::vec2(0.0, 40.0 * scale),
            egui::Align2::CENTER_BOTTOM,
            &self.deck.title,
            egui::FontId::proportional(self.theme.h2_size * scale),
            self.theme.heading_color,
        );
        painter.text(
            rect.center() + egui::vec2(0.0, 20.0 * scale),
            egui::Align2::CENTER_TOP,
            "Click or press any key to begin",
            egui::FontId::proportional(28.0 * scale),
            Theme::with_opacity(self.theme.foreground, 0.7),
        );
    }
}

fn compute_scale(rect: egui::Rect) -> f32 {
    let ref_w = 1920.0;
    let ref_h = 1080.0;
    (rect.width() / ref_w).min(rect.height() / ref_h)
}

/// Centres of the navigation dots, in a row along the bottom edge.
fn dot_centers(rect: egui::Rect, count: usize, scale: f32) -> Vec<egui::Pos2> {
    let spacing = DOT_SPACING * scale;
    let width = spacing * count.saturating_sub(1) as f32;
    let y = rect.bottom() - 32.0 * scale;
    (0..count)
        .map(|i| egui::pos2(rect.center().x - width / 2.0 + i as f32 * spacing, y))
        .collect()
}

/// Dot under `pos`, with a hit area a little larger than the drawn dot.
fn dot_at(rect: egui::Rect, count: usize, scale: f32, pos: egui::Pos2) -> Option<usize> {
    let radius = DOT_SPACING * scale / 2.0;
    dot_centers(rect, count, scale)
        .iter()
        .position(|c| c.distance(pos) <= radius)
}

fn music_button_rect(rect: egui::Rect, scale: f32) -> egui::Rect {
    let r = MUSIC_BUTTON_RADIUS * scale;
    let center = egui::pos2(rect.right() - 32.0 * scale - r, rect.bottom() - 32.0 * scale - r);
    egui::Rect::from_center_size(center, egui::vec2(r * 2.0, r * 2.0))
}

fn load_poster(ctx: &egui::Context, path: &Path) -> Option<egui::TextureHandle> {
    let image = match image::open(path) {
        Ok(image) => image.to_rgba8(),
        Err(e) => {
            tracing::warn!("failed to load clip poster {}: {e}", path.display());
            return None;
        }
    };
    let (w, h) = image.dimensions();
    let color_image =
        egui::ColorImage::from_rgba_unmultiplied([w as usize, h as usize], image.as_raw());
    Some(ctx.load_texture("clip-poster", color_image, egui::TextureOptions::LINEAR))
}

pub fn run(deck: Deck, options: PresentOptions) -> anyhow::Result<()> {
    let title = deck.title.clone();

    let viewport = if options.windowed {
        egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title(&title)
    } else {
        egui::ViewportBuilder::default()
            .with_fullscreen(true)
            .with_title(&title)
    };

    let native = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    tracing::debug!(slides = deck.slide_count(), windowed = options.windowed, "opening window");
    eframe::run_native(
        &title,
        native,
        Box::new(move |cc| {
            let poster = deck
                .poster_path()
                .and_then(|path| load_poster(&cc.egui_ctx, &path));
            let player = MusicPlayer::new(deck.music_path().as_deref(), deck.loop_music);
            tracing::debug!(
                source = ?player.source(),
                duration = player.track().map(Track::duration_secs),
                "music loaded"
            );
            Ok(Box::new(DeckApp::new(deck, &options, player, poster)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen() -> egui::Rect {
        egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(1920.0, 1080.0))
    }

    /// Pops scripted outcomes from the front, then repeats the last one.
    struct ScriptedSink {
        outcomes: Vec<PlayOutcome>,
        plays: usize,
    }

    impl AudioSink for ScriptedSink {
        fn play(&mut self, _volume: f32) -> PlayOutcome {
            self.plays += 1;
            if self.outcomes.len() > 1 {
                self.outcomes.remove(0)
            } else {
                self.outcomes[0].clone()
            }
        }

        fn pause(&mut self) {}
    }

    fn blocked() -> PlayOutcome {
        PlayOutcome::Blocked("no output device".into())
    }

    fn options() -> PresentOptions {
        PresentOptions {
            windowed: true,
            start_slide: None,
            autostart: false,
            typewriter: false,
            muted: false,
            volume: 1.0,
            swipe_threshold: 50.0,
            wheel_cooldown: Duration::from_millis(500),
            particles: 0,
            parallax: 0.0,
            bars: 4,
        }
    }

    fn app(outcomes: Vec<PlayOutcome>) -> DeckApp<ScriptedSink> {
        let yaml = "title: T\nslides: [{heading: A}, {heading: B}, {heading: C}, {heading: D}]\n";
        let deck = Deck::from_yaml(yaml, std::path::PathBuf::new()).unwrap();
        let sink = ScriptedSink { outcomes, plays: 0 };
        let mut app = DeckApp::new(deck, &options(), sink, None);
        app.last_rect = screen();
        app
    }

    fn key(key: egui::Key, repeat: bool) -> egui::Event {
        egui::Event::Key {
            key,
            physical_key: None,
            pressed: true,
            repeat,
            modifiers: egui::Modifiers::NONE,
        }
    }

    fn keys(events: Vec<egui::Event>) -> FrameInput {
        FrameInput {
            events,
            ..Default::default()
        }
    }

    fn click(pos: egui::Pos2) -> FrameInput {
        FrameInput {
            clicked: true,
            click_pos: Some(pos),
            ..Default::default()
        }
    }

    #[test]
    fn test_first_key_only_dismisses_overlay() {
        let mut app = app(vec![PlayOutcome::Started]);
        let now = Instant::now();
        let cmds = app.route_input(&keys(vec![key(egui::Key::ArrowRight, false)]), now);
        assert!(app.started);
        assert!(cmds.is_empty());
        assert_eq!(app.nav.current(), 0);
        assert_eq!(app.media.sink().plays, 1);
        assert!(app.media.is_playing());
    }

    #[test]
    fn test_first_escape_does_not_close() {
        let mut app = app(vec![PlayOutcome::Started]);
        let cmds = app.route_input(&keys(vec![key(egui::Key::Escape, false)]), Instant::now());
        assert!(cmds.is_empty());
        assert!(app.started);
    }

    #[test]
    fn test_first_click_only_dismisses_overlay() {
        let mut app = app(vec![PlayOutcome::Started]);
        let dot = dot_centers(screen(), 4, 1.0)[2];
        app.route_input(&click(dot), Instant::now());
        assert!(app.started);
        assert_eq!(app.nav.current(), 0);
    }

    #[test]
    fn test_blocked_start_prompts() {
        let mut app = app(vec![blocked()]);
        let now = Instant::now();
        app.route_input(&click(egui::pos2(10.0, 10.0)), now);
        assert!(!app.media.is_playing());
        assert!(app.media.awaiting_gesture());
        assert!(app.media.is_pulsing(now));
    }

    #[test]
    fn test_repeat_key_navigates_without_gesture() {
        let mut app = app(vec![blocked()]);
        let now = Instant::now();
        app.route_input(&keys(vec![key(egui::Key::Space, false)]), now);
        assert_eq!(app.media.sink().plays, 1);

        app.route_input(&keys(vec![key(egui::Key::ArrowRight, true)]), now);
        assert_eq!(app.nav.current(), 1);
        assert_eq!(app.media.sink().plays, 1);

        app.route_input(&keys(vec![key(egui::Key::ArrowRight, false)]), now);
        assert_eq!(app.nav.current(), 2);
        assert_eq!(app.media.sink().plays, 2);
    }

    #[test]
    fn test_repeat_key_does_not_toggle_theme() {
        let mut app = app(vec![PlayOutcome::Started]);
        let now = Instant::now();
        app.route_input(&keys(vec![key(egui::Key::Space, false)]), now);
        let dark = app.theme.name.clone();
        app.route_input(&keys(vec![key(egui::Key::D, true)]), now);
        assert_eq!(app.theme.name, dark);
        app.route_input(&keys(vec![key(egui::Key::D, false)]), now);
        assert_ne!(app.theme.name, dark);
    }

    #[test]
    fn test_dot_click_navigates_then_retries_music() {
        let mut app = app(vec![blocked(), PlayOutcome::Started]);
        let now = Instant::now();
        app.route_input(&click(egui::pos2(10.0, 10.0)), now);
        assert!(!app.media.is_playing());

        let dot = dot_centers(screen(), 4, 1.0)[3];
        app.route_input(&click(dot), now);
        assert_eq!(app.nav.current(), 3);
        assert!(app.media.is_playing());
        assert!(!app.media.awaiting_gesture());
        assert_eq!(app.media.sink().plays, 2);
    }

    #[test]
    fn test_escape_closes_after_start() {
        let mut app = app(vec![PlayOutcome::Started]);
        let now = Instant::now();
        app.route_input(&keys(vec![key(egui::Key::Space, false)]), now);
        let cmds = app.route_input(&keys(vec![key(egui::Key::Escape, false)]), now);
        assert!(matches!(cmds.as_slice(), [egui::ViewportCommand::Close]));
        assert!(!app.media.visualizer().is_running());
    }

    #[test]
    fn test_double_click_toggles_fullscreen() {
        let mut app = app(vec![PlayOutcome::Started]);
        let input = FrameInput {
            double_clicked: true,
            fullscreen: true,
            ..Default::default()
        };
        let cmds = app.route_input(&input, Instant::now());
        assert!(matches!(
            cmds.as_slice(),
            [egui::ViewportCommand::Fullscreen(false)]
        ));
    }

    #[test]
    fn test_compute_scale() {
        assert_eq!(compute_scale(screen()), 1.0);
        let small = egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(960.0, 1080.0));
        assert_eq!(compute_scale(small), 0.5);
    }

    #[test]
    fn test_dots_are_centered() {
        let centers = dot_centers(screen(), 3, 1.0);
        assert_eq!(centers.len(), 3);
        assert_eq!(centers[1].x, 960.0);
        assert_eq!(centers[2].x - centers[0].x, 2.0 * DOT_SPACING);
    }

    #[test]
    fn test_dot_hit_testing() {
        let centers = dot_centers(screen(), 9, 1.0);
        assert_eq!(dot_at(screen(), 9, 1.0, centers[4]), Some(4));
        assert_eq!(
            dot_at(screen(), 9, 1.0, centers[8] + egui::vec2(3.0, -3.0)),
            Some(8)
        );
        assert_eq!(dot_at(screen(), 9, 1.0, egui::pos2(10.0, 10.0)), None);
    }

    #[test]
    fn test_music_button_in_bottom_right() {
        let button = music_button_rect(screen(), 1.0);
        assert!(button.center().x > 1800.0);
        assert!(button.center().y > 960.0);
        assert!(dot_at(screen(), 9, 1.0, button.center()).is_none());
    }
}
