// SPDX-License-Identifier: MIT
//
// scrim — interactive exerciser for the screen buffer engine.
//
// Draws a framed grid with a palette strip, a movable marker and a status
// line, then repaints only what each key or mouse event changed:
//
//   stdin → KeyReader → Demo::on_event → grid mutation
//   Renderer::paint → runs of changed cells → AnsiScreen → stdout
//
// Layout:
//
//   ╔═══════════════════════════════╗
//   ║ title                         ║
//   ║ palette swatches              ║
//   ║                               ║
//   ║        marker (arrows/mouse)  ║
//   ║                               ║
//   ║ status: last key, paint stats ║
//   ╚═══════════════════════════════╝
//
// Logging goes to `--log-file` only; the terminal belongs to the grid.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use scrim_palette as palette;
use scrim_term::cell::Stroke;
use scrim_term::color::Color;
use scrim_term::frame::FrameStyle;
use scrim_term::grid::{CopyMode, Grid};
use scrim_term::keys::{Event, KeyCode, KeyEvent, Modifiers, MouseEventKind};
use scrim_term::output::AnsiScreen;
use scrim_term::paint::{PaintConfig, PaintStats, Renderer};
use scrim_term::reader::{InputConfig, KeyReader};
use scrim_term::terminal::{self, Terminal};

// ─── CLI ─────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "scrim", version)]
#[command(about = "Damage-tracked terminal screen buffer demo")]
struct Args {
    /// Columns and rows to leave unused at the right and bottom.
    #[arg(long, default_value_t = 0)]
    margin: u16,

    /// Write tracing output here (RUST_LOG filters, default `info`).
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Screen column of the grid's left edge.
    #[arg(long, default_value_t = 0)]
    offset_x: u16,

    /// Screen row of the grid's top edge.
    #[arg(long, default_value_t = 0)]
    offset_y: u16,

    /// Repaint every cell on every frame.
    #[arg(long)]
    full: bool,

    /// Milliseconds to wait for a key before repainting anyway.
    #[arg(long, default_value_t = 250)]
    key_timeout_ms: u64,
}

fn init_logging(path: Option<&PathBuf>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .context("installing tracing subscriber")?;
    Ok(())
}

// ─── Demo state ──────────────────────────────────────────────────────────────

const BACKGROUND: Color = palette::BLACK;
const FRAME: FrameStyle = FrameStyle::DOUBLE.with_fg(palette::LIGHT_CYANBLUE);
const MARKER: char = '◆';
const TITLE: &str = "scrim: arrows or mouse move the marker, q quits";

struct Demo {
    grid: Grid,
    /// Screen position of the grid's top-left cell.
    origin: (i32, i32),
    overlay: Grid,
    marker: (i32, i32),
    last_key: String,
    last_stats: PaintStats,
    quit: bool,
}

impl Demo {
    fn new(args: &Args) -> Result<Self> {
        Self::with_grid(
            Grid::from_terminal(args.margin, Some(BACKGROUND)),
            (i32::from(args.offset_x), i32::from(args.offset_y)),
        )
    }

    fn with_grid(grid: Grid, origin: (i32, i32)) -> Result<Self> {
        let overlay = Grid::transparent(grid.width(), grid.height());
        let mut demo = Self {
            marker: (i32::from(grid.width()) / 2, i32::from(grid.height()) / 2),
            grid,
            origin,
            overlay,
            last_key: String::from("-"),
            last_stats: PaintStats::default(),
            quit: false,
        };
        demo.draw_static()?;
        demo.draw_marker(true);
        Ok(demo)
    }

    /// Frame, title and palette. Only redrawn after a resize.
    fn draw_static(&mut self) -> Result<()> {
        self.grid.clear();
        if self.grid.width() < 4 || self.grid.height() < 4 {
            return Ok(());
        }
        self.grid.draw_frame(self.grid.bounds(), &FRAME)?;
        // Columns 2 ..= width - 3, clear of the right border.
        let inner = usize::from(self.grid.width()) - 4;
        let title: String = TITLE.chars().take(inner).collect();
        self.grid
            .print_text_safe(2, 1, &title, None, Some(palette::WHITE));
        let swatches = palette::NAMED.iter().map(|&(_, c)| c);
        for (x, color) in (2..i32::from(self.grid.width()) - 2).zip(swatches) {
            self.grid.set_safe(x, 2, Stroke::new().ch(' ').bg(color));
        }
        Ok(())
    }

    fn draw_marker(&mut self, visible: bool) {
        let (x, y) = self.marker;
        let stroke = if visible {
            Stroke::new().ch(MARKER).fg(palette::YELLOW)
        } else {
            Stroke::new().ch(' ')
        };
        self.overlay.set_safe(x, y, stroke);
    }

    fn move_marker(&mut self, dx: i32, dy: i32) {
        self.set_marker(self.marker.0 + dx, self.marker.1 + dy);
    }

    /// Keep the marker inside the frame and below the palette row.
    fn set_marker(&mut self, x: i32, y: i32) {
        let max_x = i32::from(self.grid.width()) - 2;
        let max_y = i32::from(self.grid.height()) - 3;
        if max_x < 1 || max_y < 3 {
            return;
        }
        self.draw_marker(false);
        self.marker = (x.clamp(1, max_x), y.clamp(3, max_y));
        self.draw_marker(true);
    }

    fn on_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.on_key(key),
            Event::Mouse(mouse) => {
                self.last_key = format!("{:?} at {},{}", mouse.kind, mouse.x, mouse.y);
                if matches!(mouse.kind, MouseEventKind::Press(_) | MouseEventKind::Drag(_)) {
                    let x = i32::from(mouse.x) - self.origin.0;
                    let y = i32::from(mouse.y) - self.origin.1;
                    self.set_marker(x, y);
                }
            }
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        self.last_key = key.to_string();
        let step = if key.modifiers.contains(Modifiers::CTRL) { 8 } else { 1 };
        match key.code {
            KeyCode::Char('q') if key.modifiers.is_empty() => self.quit = true,
            KeyCode::Char('c') if key.modifiers == Modifiers::CTRL => self.quit = true,
            KeyCode::Up => self.move_marker(0, -1),
            KeyCode::Down => self.move_marker(0, 1),
            KeyCode::Left => self.move_marker(-step, 0),
            KeyCode::Right => self.move_marker(step, 0),
            KeyCode::Home => self.set_marker(1, self.marker.1),
            KeyCode::End => self.set_marker(i32::MAX, self.marker.1),
            _ => {}
        }
    }

    /// Status line: last input and the previous paint's statistics.
    fn draw_status(&mut self) {
        let y = i32::from(self.grid.height()) - 2;
        if y < 3 {
            return;
        }
        let inner = usize::from(self.grid.width()).saturating_sub(4);
        let s = self.last_stats;
        let text = format!(
            "key: {}  paint: {} rows {} runs {} cells {} bytes{}",
            self.last_key,
            s.rows,
            s.runs,
            s.cells_painted,
            s.bytes,
            if s.full { " (full)" } else { "" },
        );
        let line: String = format!("{text:<inner$}").chars().take(inner).collect();
        self.grid
            .print_text_safe(2, y, &line, Some(palette::DARK_GREY), Some(palette::WHITE));
    }

    /// Merge the marker layer onto the grid. The overlay keeps only the
    /// marker's current and previous cells set.
    fn compose(&mut self) {
        self.overlay.copy_to(&mut self.grid, 0, 0, CopyMode::MergeIfSet);
        self.overlay = Grid::transparent(self.grid.width(), self.grid.height());
        self.draw_marker(true);
    }
}

// ─── Main loop ───────────────────────────────────────────────────────────────

fn run(args: &Args) -> Result<()> {
    if !terminal::is_tty() {
        bail!("stdin is not a terminal");
    }

    let mut term = Terminal::new();
    term.enter().context("entering raw mode")?;

    let mut keys = KeyReader::stdin(InputConfig {
        key_timeout: Duration::from_millis(args.key_timeout_ms),
        ..InputConfig::default()
    })
    .context("starting stdin reader")?;

    let mut renderer = Renderer::with_config(PaintConfig {
        offset_x: args.offset_x,
        offset_y: args.offset_y,
    });
    let mut screen = AnsiScreen::stdout();
    let mut demo = Demo::new(args)?;
    let mut size = term.size();

    while !demo.quit {
        let now = term.refresh_size();
        if now != size {
            tracing::info!(cols = now.cols, rows = now.rows, "resized");
            size = now;
            screen.set_size(now.cols, now.rows);
            demo = Demo {
                last_key: demo.last_key,
                ..Demo::new(args)?
            };
        }

        demo.compose();
        demo.draw_status();
        demo.last_stats = renderer
            .paint(&mut demo.grid, &mut screen, args.full)
            .context("painting")?;

        if let Some(event) = keys.read_key() {
            demo.on_event(event);
        } else if keys.is_closed() {
            break;
        }
    }

    term.leave().context("restoring terminal")?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_ref())?;
    tracing::info!(?args, "starting");
    run(&args)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
