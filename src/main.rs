//! Terminal palace runner (default binary).
//!
//! Shows one screen of a level and lets you poke its mechanisms: move the block
//! cursor, fire the trigger under it, walk between screens. It uses crossterm for
//! input and the framebuffer renderer from `tui-palace-term`.
//!
//! ```text
//! tui-palace [LEVEL.bin] [--config FILE.toml] [--replay SCRIPT.json] [--record SCRIPT.json]
//!            [--headless CYCLES]
//! ```
//!
//! With `--headless` nothing is drawn: the replay script runs for the given number of
//! cycles and the per-cycle fingerprints are printed as JSON.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use clap::{value_parser, Arg, ArgMatches, Command};
use crossterm::event::{self, Event};

use tui_palace::core::{
    Blueprint, CharacterFrame, Engine, EngineConfig, ImageListBuilder, TriggerEvent, TriggerKind,
};
use tui_palace::demo;
use tui_palace::input::{handle_key_event, is_pause_toggle, should_quit, CommandQueue, QUEUE_CAPACITY};
use tui_palace::replay::{self, ReplayScript, Schedule};
use tui_palace::term::{BlockView, FrameBuffer, PalaceView, RunnerStatus, TerminalRenderer, Viewport};
use tui_palace::types::{
    ActionCode, BlockAddr, CharacterIdentity, ControlCommand, Direction, BLOCK_COLUMNS, BLOCK_ROWS,
};

#[derive(Debug)]
struct Args {
    level: Option<PathBuf>,
    config: Option<PathBuf>,
    replay: Option<PathBuf>,
    record: Option<PathBuf>,
    headless: Option<u64>,
}

fn cli() -> Command {
    Command::new("tui-palace")
        .about("Runs one palace level in the terminal, or replays a trigger script headless")
        .arg(
            Arg::new("level")
                .value_name("LEVEL")
                .help("Level image to load; the built-in demo when omitted")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .help("TOML engine configuration")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("replay")
                .long("replay")
                .value_name("SCRIPT")
                .help("JSON trigger script to play back")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("record")
                .long("record")
                .value_name("SCRIPT")
                .help("Write the triggers fired in this session to a JSON script")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("headless")
                .long("headless")
                .value_name("CYCLES")
                .help("Run the replay script without a terminal and print fingerprints")
                .value_parser(value_parser!(u64)),
        )
}

fn args_from(matches: &ArgMatches) -> Args {
    Args {
        level: matches.get_one::<PathBuf>("level").cloned(),
        config: matches.get_one::<PathBuf>("config").cloned(),
        replay: matches.get_one::<PathBuf>("replay").cloned(),
        record: matches.get_one::<PathBuf>("record").cloned(),
        headless: matches.get_one::<u64>("headless").copied(),
    }
}

fn load_level(path: Option<&PathBuf>) -> Result<Blueprint> {
    let Some(path) = path else {
        log::info!("no level given; using the built-in demo");
        return Ok(demo::demo_level());
    };
    let bytes = std::fs::read(path).with_context(|| format!("reading level {}", path.display()))?;
    Blueprint::from_bytes(&bytes).with_context(|| format!("decoding level {}", path.display()))
}

fn load_config(path: Option<&PathBuf>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let path = path
        .to_str()
        .ok_or_else(|| anyhow!("config path is not valid UTF-8"))?;
    EngineConfig::load_from_file(path).with_context(|| format!("loading config {}", path))
}

fn main() -> Result<()> {
    env_logger::init();

    let args = args_from(&cli().get_matches());
    let level = load_level(args.level.as_ref())?;
    let config = load_config(args.config.as_ref())?;
    let script = match &args.replay {
        Some(path) => ReplayScript::load(path)?,
        None => ReplayScript::default(),
    };
    let schedule = Schedule::new(&script)?;
    let mut engine = Engine::new(level, config);

    if let Some(cycles) = args.headless {
        let kid = kid_frame(&engine);
        let records = replay::replay(&mut engine, &schedule, kid.as_slice(), cycles);
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    let mut term = TerminalRenderer::stdout();
    term.enter()?;

    let result = run(&mut term, &mut engine, &schedule);

    // Always try to restore terminal state.
    let _ = term.exit();

    let recorded = result?;
    if let Some(path) = &args.record {
        recorded.save(path)?;
        log::info!("recorded {} trigger(s) to {}", recorded.events.len(), path.display());
    }
    Ok(())
}

/// The kid standing at the level's start block, if there is one.
fn kid_frame(engine: &Engine) -> Option<CharacterFrame> {
    let (addr, face) = engine.blueprint().info().kid_start()?;
    Some(CharacterFrame {
        identity: CharacterIdentity::Kid,
        screen: addr.screen(),
        x: addr.x() + 1,
        y: addr.y(),
        image: 0,
        face,
        action: ActionCode::STAND,
        delta: (0, 0),
    })
}

fn start_cursor(engine: &Engine) -> Option<BlockAddr> {
    BlockAddr::new(engine.visible_screen().screen, 0)
}

fn move_cursor(cursor: BlockAddr, dir: Direction) -> BlockAddr {
    let (mut col, mut row) = (cursor.column(), cursor.row());
    match dir {
        Direction::Left => col = col.saturating_sub(1),
        Direction::Right => col = (col + 1).min(BLOCK_COLUMNS as u8 - 1),
        Direction::Up => row = row.saturating_sub(1),
        Direction::Down => row = (row + 1).min(BLOCK_ROWS as u8 - 1),
    }
    BlockAddr::from_column_row(cursor.screen(), col, row).unwrap_or(cursor)
}

fn run(term: &mut TerminalRenderer, engine: &mut Engine, schedule: &Schedule) -> Result<ReplayScript> {
    let tick_duration = Duration::from_millis(engine.config().render.tick_ms as u64);

    let palace = PalaceView::default();
    let mut view = BlockView::new();
    let mut lists = ImageListBuilder::new();
    let mut fb = FrameBuffer::new(0, 0);
    let mut queue = CommandQueue::new();
    let mut pending: Vec<TriggerEvent> = Vec::with_capacity(2 * QUEUE_CAPACITY);
    let mut recorded = ReplayScript::default();
    let mut kid = kid_frame(engine);

    let mut status = RunnerStatus {
        cursor: start_cursor(engine),
        ..RunnerStatus::default()
    };
    let mut last_tick = Instant::now();

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        palace.render_into(&view, engine, &status, Viewport::new(w, h), &mut fb);
        term.present(&fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if should_quit(key) {
                        return Ok(recorded);
                    }
                    if is_pause_toggle(key) {
                        status.paused = !status.paused;
                    } else if let Some(command) = handle_key_event(key) {
                        if !queue.push(command) {
                            log::warn!("input queue full; {:?} dropped", command);
                        }
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() < tick_duration {
            continue;
        }
        last_tick = Instant::now();

        pending.clear();
        for command in queue.drain() {
            match command {
                ControlCommand::Cursor(dir) => {
                    status.cursor = status.cursor.map(|c| move_cursor(c, dir));
                }
                ControlCommand::Screen(dir) => {
                    let here = engine.visible_screen().screen;
                    let Some(next) = engine.blueprint().neighbor(here, dir) else {
                        continue;
                    };
                    if engine.set_visible_screen(next) {
                        view.clear();
                        status.cursor = status
                            .cursor
                            .and_then(|c| BlockAddr::new(next, c.block()));
                    }
                }
                ControlCommand::Trigger => {
                    if let Some(addr) = status.cursor {
                        let event = TriggerEvent::new(TriggerKind::Auto, addr);
                        pending.push(event);
                        recorded.record(engine.cycle(), event);
                    }
                }
                ControlCommand::Reset => {
                    engine.reset();
                    view.clear();
                    status = RunnerStatus {
                        cursor: start_cursor(engine),
                        paused: status.paused,
                        ..RunnerStatus::default()
                    };
                    kid = kid_frame(engine);
                }
            }
        }

        if status.paused {
            continue;
        }

        pending.extend_from_slice(schedule.events_for(engine.cycle()));
        view.begin_frame();
        let report = engine.run_cycle(&pending, kid.as_slice(), &mut lists, &mut view);
        status.rejected = status.rejected.saturating_add(report.rejected as u32);
        status.dropped = status.dropped.saturating_add(lists.dropped() as u32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Result<Args, clap::Error> {
        cli().try_get_matches_from(argv).map(|m| args_from(&m))
    }

    #[test]
    fn level_and_options_parse() {
        let args = parse(&[
            "tui-palace",
            "level3.bin",
            "--config",
            "engine.toml",
            "--replay",
            "in.json",
            "--headless",
            "120",
        ])
        .unwrap();
        assert_eq!(args.level, Some(PathBuf::from("level3.bin")));
        assert_eq!(args.config, Some(PathBuf::from("engine.toml")));
        assert_eq!(args.replay, Some(PathBuf::from("in.json")));
        assert_eq!(args.record, None);
        assert_eq!(args.headless, Some(120));
    }

    #[test]
    fn no_arguments_means_demo_level() {
        let args = parse(&["tui-palace"]).unwrap();
        assert!(args.level.is_none());
        assert!(args.headless.is_none());
    }

    #[test]
    fn bad_input_is_rejected() {
        assert!(parse(&["tui-palace", "--headless", "many"]).is_err());
        assert!(parse(&["tui-palace", "--headless"]).is_err());
        assert!(parse(&["tui-palace", "--frobnicate"]).is_err());
        assert!(parse(&["tui-palace", "a.bin", "b.bin"]).is_err());
    }

    #[test]
    fn command_definition_is_consistent() {
        cli().debug_assert();
    }
}
