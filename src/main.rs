use game::{Game, GameState};
use gridcast::{Engine, Level, Settings};
use sdl2::event::Event;
use std::collections::HashSet;
use std::env;
use std::time::{Duration, Instant};

mod game;

// helper trait to convert strings into std::error types
trait StringToAnyhow<T> {
    fn ah(self) -> anyhow::Result<T>;
}

impl<T> StringToAnyhow<T> for Result<T, String> {
    fn ah(self) -> anyhow::Result<T> {
        self.map_err(|err| anyhow::anyhow!("{err}"))
    }
}

const TARGET_FPS: u64 = 60;

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init_custom_env("GRIDCAST_LOG");

    let settings = Settings::from_env()?;
    let level = match env::var_os("GRIDCAST_MAP") {
        Some(path) => Level::load(path)?,
        None => {
            log::info!("GRIDCAST_MAP not set, using the sample map");
            Level::sample()
        }
    };
    let engine = Engine::new(level, settings)?;

    // sdl boilerplate
    log::info!("initializing sdl2");
    let sdl_ctx = sdl2::init().ah()?;
    log::info!("initializing video");
    let video = sdl_ctx.video().ah()?;

    log::info!("initializing window");
    let mut window = video
        .window("gridcast", settings.screen_width, settings.screen_height)
        .position_centered()
        .build()?;
    window.set_resizable(false);
    log::info!("creating canvas");
    let canvas = window.into_canvas().present_vsync().build()?;
    log::info!("pumping events");
    let mut events = sdl_ctx.event_pump().ah()?;
    sdl_ctx.mouse().set_relative_mouse_mode(true);

    let mut keys = HashSet::new();

    log::info!("initializing game state");
    let mut game = Game::new(engine, canvas);

    let delta = Duration::from_millis(1_000 / TARGET_FPS);

    'main_loop: loop {
        let prev = Instant::now();

        // handle events
        for ev in events.poll_iter() {
            match ev {
                Event::Quit { .. } => break 'main_loop,
                Event::KeyDown {
                    keycode: Some(k),
                    repeat,
                    ..
                } => {
                    keys.insert(k);

                    if !repeat {
                        match game.game_state {
                            GameState::Playing | GameState::Minimap => game.playing_key_once(k)?,
                            GameState::Paused => game.paused_key_once()?,
                            GameState::Exit => break 'main_loop,
                        }

                        game.update = true;
                    }
                }
                Event::KeyUp {
                    keycode: Some(k), ..
                } => {
                    keys.remove(&k);
                }
                Event::MouseMotion { xrel, .. } => {
                    if game.game_state != GameState::Paused {
                        game.mouse_motion(xrel);
                    }
                }
                _ => {}
            }
        }

        match game.game_state {
            GameState::Playing | GameState::Minimap => {
                for k in keys.iter() {
                    game.playing_key(*k);
                }
                game.playing_tick();
            }
            GameState::Paused => {}
            GameState::Exit => break 'main_loop,
        }

        // draw game
        if game.update {
            if let Err(err) = match game.game_state {
                GameState::Playing | GameState::Minimap => game.playing_draw(),
                GameState::Paused => game.pause_draw(),
                GameState::Exit => break,
            } {
                log::error!("error while in game state {:?}: {err}", game.game_state);
                return Err(err);
            }
            game.canvas.present();

            game.update = false;
        }

        let diff = prev.elapsed();
        if diff < delta {
            std::thread::sleep(delta - diff);
        }
    }

    Ok(())
}
