use crate::StringToAnyhow;
use gridcast::{Engine, Input};
use sdl2::keyboard::Keycode;
use sdl2::pixels::Color;
use sdl2::rect::{Point, Rect};
use sdl2::render::{BlendMode, Canvas};
use sdl2::video::Window;

#[derive(Clone, Copy, PartialEq, Debug)]
pub(crate) enum GameState {
    Playing,
    Minimap,
    Paused,
    Exit,
}

const SKY_TOP: Color = Color::RGB(135, 206, 235);
const SKY_HORIZON: Color = Color::RGB(0, 0, 0);
const FLOOR: Color = Color::RGB(100, 100, 100);
const MINIMAP_SIZE: u32 = 200;

// held-key axes, folded into one tick per frame
#[derive(Default)]
struct Axes {
    forward: f32,
    strafe: f32,
    turn: f32,
}

pub(crate) struct Game {
    engine: Engine,
    pub game_state: GameState,
    pub canvas: Canvas<Window>,
    axes: Axes,
    mouse_dx: i32,
    pub update: bool,
}

impl Game {
    pub fn new(engine: Engine, canvas: Canvas<Window>) -> Self {
        Self {
            engine,
            game_state: GameState::Playing,
            canvas,
            axes: Axes::default(),
            mouse_dx: 0,
            update: true,
        }
    }

    fn set_title(&mut self, title: &str) -> anyhow::Result<()> {
        self.canvas.window_mut().set_title(title)?;
        Ok(())
    }

    /// handle key presses for while in "playing" state
    pub fn playing_key_once(&mut self, key: Keycode) -> anyhow::Result<()> {
        match key {
            // minimap toggle
            Keycode::M => {
                if self.game_state == GameState::Minimap {
                    self.game_state = GameState::Playing
                } else {
                    self.game_state = GameState::Minimap;
                }
            }
            // pause game
            Keycode::Escape => {
                self.game_state = GameState::Paused;
                self.set_title("gridcast (paused, press any key)")?;
            }
            Keycode::Backspace => self.game_state = GameState::Exit,
            _ => {}
        }

        Ok(())
    }

    /// any key resumes
    pub fn paused_key_once(&mut self) -> anyhow::Result<()> {
        self.game_state = GameState::Playing;
        self.set_title("gridcast")
    }

    /// handle key repeating for while in "playing" state
    pub fn playing_key(&mut self, key: Keycode) {
        // define controls
        match key {
            Keycode::W => self.axes.forward += 1.,
            Keycode::S => self.axes.forward -= 1.,
            Keycode::D => self.axes.strafe += 1.,
            Keycode::A => self.axes.strafe -= 1.,
            Keycode::Left => self.axes.turn -= 1.,
            Keycode::Right => self.axes.turn += 1.,
            _ => {}
        }
    }

    pub fn mouse_motion(&mut self, xrel: i32) {
        self.mouse_dx += xrel;
    }

    /// advance one tick with everything gathered since the last one
    pub fn playing_tick(&mut self) {
        let axes = std::mem::take(&mut self.axes);
        let input = Input::from_axes(axes.forward, axes.strafe, axes.turn, self.engine.settings())
            .look(std::mem::take(&mut self.mouse_dx), self.engine.settings());

        if input != Input::default() {
            self.engine.step(input);
            self.update = true;
        }
    }

    fn draw_sky(&mut self, width: u32, height: u32) -> anyhow::Result<()> {
        let band = (width / 60).max(1);
        for y in (0..height / 2).step_by(band as usize) {
            let t = y as f32 * 2. / height as f32;
            let lerp = |a: u8, b: u8| (a as f32 * (1. - t) + b as f32 * t) as u8;
            self.canvas.set_draw_color(Color::RGB(
                lerp(SKY_TOP.r, SKY_HORIZON.r),
                lerp(SKY_TOP.g, SKY_HORIZON.g),
                lerp(SKY_TOP.b, SKY_HORIZON.b),
            ));
            self.canvas
                .fill_rect(Rect::new(0, y as i32, width, band))
                .ah()?;
        }

        Ok(())
    }

    // draw while in "playing" state
    pub fn playing_draw(&mut self) -> anyhow::Result<()> {
        self.engine.cast()?;

        let (width, height) = self.canvas.output_size().ah()?;

        // DRAW SKY
        self.draw_sky(width, height)?;

        // DRAW FLOOR
        self.canvas.set_draw_color(FLOOR);
        self.canvas
            .fill_rect(Rect::new(0, height as i32 / 2, width, height / 2))
            .ah()?;

        // DRAW WALLS
        let slice_width = width as f32 / self.engine.hits().len().max(1) as f32;
        for (i, column) in self.engine.columns(height as f32).enumerate() {
            if column.is_empty() {
                continue;
            }

            self.canvas
                .set_draw_color(Color::RGB(column.shade, column.shade, column.shade));
            self.canvas
                .fill_rect(Rect::new(
                    (i as f32 * slice_width) as i32,
                    column.start as i32,
                    slice_width as u32 + 1,
                    column.height() as u32,
                ))
                .ah()?;
        }

        // DRAW MINIMAP
        if self.game_state == GameState::Minimap {
            self.minimap_draw(width, height)?;
        }

        Ok(())
    }

    fn minimap_draw(&mut self, width: u32, height: u32) -> anyhow::Result<()> {
        let grid = self.engine.grid();
        let tile = MINIMAP_SIZE as f32 / grid.width().max(grid.height()) as f32;
        let offset = Point::new(
            width.saturating_sub(MINIMAP_SIZE) as i32,
            height.saturating_sub(MINIMAP_SIZE) as i32,
        );
        let to_screen = |x: f32, y: f32| Point::new((x * tile) as i32, (y * tile) as i32) + offset;

        self.canvas.set_draw_color(Color::WHITE);
        self.canvas
            .fill_rect(Rect::new(offset.x(), offset.y(), MINIMAP_SIZE, MINIMAP_SIZE))
            .ah()?;

        for cell in grid.solid_cells() {
            let corner = to_screen(cell.x as f32, cell.y as f32);
            let rect = Rect::new(corner.x(), corner.y(), tile as u32, tile as u32);
            self.canvas.set_draw_color(Color::RGB(195, 195, 195));
            self.canvas.fill_rect(rect).ah()?;
            self.canvas.set_draw_color(Color::BLACK);
            self.canvas.draw_rect(rect).ah()?;
        }

        let player = *self.engine.player();
        let eye = to_screen(player.pos.x, player.pos.y);
        self.canvas.set_draw_color(Color::YELLOW);
        for hit in self.engine.hits() {
            self.canvas
                .draw_line(eye, to_screen(hit.point.x, hit.point.y))
                .ah()?;
        }

        self.canvas.set_draw_color(Color::RED);
        self.canvas
            .fill_rect(Rect::new(eye.x() - 3, eye.y() - 3, 6, 6))
            .ah()?;

        Ok(())
    }

    // draw pause screen
    pub fn pause_draw(&mut self) -> anyhow::Result<()> {
        self.canvas.set_blend_mode(BlendMode::Blend);
        self.canvas.set_draw_color(Color::RGBA(0, 0, 0, 0xDD));
        self.canvas.fill_rect(None).ah()?;
        self.canvas.set_blend_mode(BlendMode::None);

        Ok(())
    }
}
