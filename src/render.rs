//! Canvas 2D renderer
//!
//! Pure consumer of settled simulation state: a ship-centered camera clamped
//! to the map, transformed sprite draws per entity (flat shapes until an
//! image finishes loading), HUD text and phase overlays. All drawing goes
//! through the host 2D context - there is no rasterizer here.

use glam::Vec2;
use web_sys::CanvasRenderingContext2d;

use crate::assets::AssetStore;
use crate::settings::Settings;
use crate::sim::rect::OrientedRect;
use crate::sim::{GameOverCause, GamePhase, GameState, TargetKind};

const BACKGROUND: &str = "#060913";
const MAP_FILL: &str = "#0b1020";
const MAP_BORDER: &str = "#2a3a6a";
const SHIP_COLOR: &str = "#9fd8ff";
const FLAME_COLOR: &str = "#ffb347";
const ASTEROID_COLOR: &str = "#8a7f72";
const CAN_COLOR: &str = "#7cf29a";
const MOON_COLOR: &str = "#d9d9e8";
const EARTH_COLOR: &str = "#3f8cff";
const HUD_COLOR: &str = "#e8eefc";

pub struct Renderer {
    ctx: CanvasRenderingContext2d,
    /// Viewport size in CSS pixels
    width: f32,
    height: f32,
}

impl Renderer {
    pub fn new(ctx: CanvasRenderingContext2d, width: f32, height: f32) -> Self {
        Self { ctx, width, height }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Clear the whole surface (scheduler auto-clear hook)
    pub fn clear(&self) {
        self.ctx.set_fill_style_str(BACKGROUND);
        self.ctx
            .fill_rect(0.0, 0.0, self.width as f64, self.height as f64);
    }

    /// Camera offset: ship-centered, clamped to the map square
    fn camera(&self, state: &GameState) -> Vec2 {
        let view = Vec2::new(self.width, self.height);
        let mut offset = state.ship.pos - view / 2.0;
        for i in 0..2 {
            if state.map_size <= view[i] {
                // Map smaller than the viewport: center it
                offset[i] = (state.map_size - view[i]) / 2.0;
            } else {
                offset[i] = offset[i].clamp(0.0, state.map_size - view[i]);
            }
        }
        offset
    }

    /// Draw one frame of settled post-tick state
    pub fn render(&self, state: &GameState, assets: &AssetStore, settings: &Settings, fps: u32) {
        let ctx = &self.ctx;
        let cam = self.camera(state);

        ctx.save();
        let _ = ctx.translate(-cam.x as f64, -cam.y as f64);

        // Map background and border
        ctx.set_fill_style_str(MAP_FILL);
        ctx.fill_rect(0.0, 0.0, state.map_size as f64, state.map_size as f64);
        ctx.set_stroke_style_str(MAP_BORDER);
        ctx.set_line_width(4.0);
        ctx.stroke_rect(0.0, 0.0, state.map_size as f64, state.map_size as f64);

        // Targets sit under everything else
        for target in &state.targets {
            let (name, color) = match target.kind {
                TargetKind::Moon => ("moon", MOON_COLOR),
                TargetKind::Earth => ("earth", EARTH_COLOR),
            };
            self.sprite(&target.bounds(), assets, settings, name, color);
        }

        for can in &state.cans {
            self.sprite(&can.bounds(), assets, settings, "can", CAN_COLOR);
        }
        for asteroid in &state.asteroids {
            self.sprite(&asteroid.bounds(), assets, settings, "asteroid", ASTEROID_COLOR);
        }

        // Ship last, with an exhaust flame while thrusting
        let ship_bounds = state.ship.bounds();
        if state.ship.thrusting && state.phase == GamePhase::Flying {
            self.flame(&ship_bounds);
        }
        self.sprite(&ship_bounds, assets, settings, "ship", SHIP_COLOR);

        ctx.restore();

        self.hud(state, settings, fps);
        self.overlay(state);
    }

    /// Draw a rotated sprite: translate to the center, rotate, image or
    /// flat rectangle fallback
    fn sprite(
        &self,
        bounds: &OrientedRect,
        assets: &AssetStore,
        settings: &Settings,
        name: &str,
        fallback: &str,
    ) {
        let ctx = &self.ctx;
        let hw = bounds.half_extents.x as f64;
        let hh = bounds.half_extents.y as f64;

        ctx.save();
        let _ = ctx.translate(bounds.center.x as f64, bounds.center.y as f64);
        let _ = ctx.rotate(bounds.rotation as f64);

        match assets.get(name).filter(|_| !settings.flat_shapes) {
            Some(img) => {
                let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
                    img,
                    -hw,
                    -hh,
                    hw * 2.0,
                    hh * 2.0,
                );
            }
            None => {
                ctx.set_fill_style_str(fallback);
                ctx.fill_rect(-hw, -hh, hw * 2.0, hh * 2.0);
            }
        }
        ctx.restore();
    }

    /// Exhaust flame behind the ship
    fn flame(&self, bounds: &OrientedRect) {
        let ctx = &self.ctx;
        let hw = bounds.half_extents.x as f64;
        let hh = bounds.half_extents.y as f64;

        ctx.save();
        let _ = ctx.translate(bounds.center.x as f64, bounds.center.y as f64);
        let _ = ctx.rotate(bounds.rotation as f64);
        ctx.set_global_alpha(0.8);
        ctx.set_fill_style_str(FLAME_COLOR);
        ctx.fill_rect(-hw - 12.0, -hh / 2.0, 12.0, hh);
        ctx.restore();
    }

    fn hud(&self, state: &GameState, settings: &Settings, fps: u32) {
        let ctx = &self.ctx;
        ctx.set_fill_style_str(HUD_COLOR);
        ctx.set_font("16px monospace");
        ctx.set_text_align("left");
        let _ = ctx.fill_text(&format!("SCORE {}", state.score), 16.0, 28.0);
        let _ = ctx.fill_text(&format!("FUEL  {:>3.0}", state.fuel), 16.0, 50.0);
        if settings.show_fps {
            ctx.set_text_align("right");
            let _ = ctx.fill_text(&format!("{fps} fps"), self.width as f64 - 16.0, 28.0);
        }
    }

    /// Centered text for non-flying phases
    fn overlay(&self, state: &GameState) {
        let (title, detail) = match state.phase {
            GamePhase::Flying => return,
            GamePhase::Paused => ("PAUSED".to_string(), "press ESC to resume".to_string()),
            GamePhase::Landed { target } => (
                format!("LANDED ON THE {:?}", target).to_uppercase(),
                format!("final score {} - press R to fly again", state.score),
            ),
            GamePhase::GameOver { cause } => {
                let title = match cause {
                    GameOverCause::Asteroid => "SHIP DESTROYED",
                    GameOverCause::OutOfFuel => "OUT OF FUEL",
                };
                (
                    title.to_string(),
                    format!("score {} - press R to retry", state.score),
                )
            }
        };

        let ctx = &self.ctx;
        let (w, h) = (self.width as f64, self.height as f64);

        ctx.save();
        ctx.set_global_alpha(0.6);
        ctx.set_fill_style_str(BACKGROUND);
        ctx.fill_rect(0.0, 0.0, w, h);
        ctx.restore();

        ctx.set_fill_style_str(HUD_COLOR);
        ctx.set_text_align("center");
        ctx.set_font("32px monospace");
        let _ = ctx.fill_text(&title, w / 2.0, h / 2.0 - 12.0);
        ctx.set_font("16px monospace");
        let _ = ctx.fill_text(&detail, w / 2.0, h / 2.0 + 20.0);
    }
}
