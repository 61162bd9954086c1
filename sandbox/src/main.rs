// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


// Fluff sandbox: draws live input state, prints what a TCP peer sends and
// restarts the loop when the reload key is pressed.

use anyhow::{Context, Result};
use clap::Parser;
use fluff_sdk::prelude::*;
use std::cell::RefCell;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);
const TEXT_SIZE: u32 = 18;

#[derive(Parser, Debug)]
#[command(version, about = "Demo host for the Fluff runtime", long_about = None)]
struct Cli {
    /// TOML game configuration, read again on every reload
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Connect to this TCP address and print what it sends
    #[arg(long)]
    connect: Option<SocketAddr>,

    /// TrueType font used for the overlay text
    #[arg(short, long)]
    font: Option<String>,

    /// Overrides the configured width
    #[arg(long)]
    width: Option<u32>,

    /// Overrides the configured height
    #[arg(long)]
    height: Option<u32>,
}

impl Cli {
    fn load_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)
                .with_context(|| format!("failed to load {}", path.display()))?,
            None => GameConfig::default(),
        };
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Default)]
struct Demo {
    font: Option<String>,
    font_failed: bool,
    fps_timer: f64,
    fps_frames: u32,
}

fn demo_callbacks(font: Option<String>, network: Rc<EventBus<SocketEvent>>) -> CallbackTable {
    let demo = Rc::new(RefCell::new(Demo {
        font,
        ..Demo::default()
    }));
    let mut table = CallbackTable::new();

    let state = Rc::clone(&demo);
    table.on_update(move |dt, ctx| {
        for event in network.drain() {
            match event {
                SocketEvent::Data { bytes, .. } => ctx.print(&String::from_utf8_lossy(&bytes)),
                SocketEvent::Connected { label } => log::info!("Socket '{label}' connected."),
                SocketEvent::Closed { label } => log::info!("Socket '{label}' closed."),
            }
        }

        let mut demo = state.borrow_mut();
        demo.fps_timer += dt;
        demo.fps_frames += 1;
        if demo.fps_timer >= 1.0 {
            let fps = f64::from(demo.fps_frames) / demo.fps_timer;
            ctx.set_caption(&format!("Fluff sandbox ({fps:.0} fps)"));
            demo.fps_timer = 0.0;
            demo.fps_frames = 0;
        }
        Ok(())
    });

    let state = Rc::clone(&demo);
    table.on(Callback::Draw, move |_, ctx| {
        let mut demo = state.borrow_mut();
        let Some(font) = demo.font.clone() else {
            return Ok(());
        };
        if demo.font_failed {
            return Ok(());
        }
        if ctx.fonts.current().is_none() && ctx.load_font(&font, TEXT_SIZE).is_err() {
            demo.font_failed = true;
            return Ok(());
        }

        let additive = ctx.input.modifiers().shift;
        ctx.set_blend_mode(if additive { 1 } else { 0 });
        ctx.set_color(LinearRgba::WHITE);

        let keys: Vec<String> = ctx.input.keys_down().map(|k| format!("{k:?}")).collect();
        let left = if ctx.input.is_button_down(MouseButton::Left) {
            "down"
        } else {
            "up"
        };
        let lines = [
            format!(
                "pointer {}, {} (wheel {})",
                ctx.pointer.x, ctx.pointer.y, ctx.pointer.scroll_delta
            ),
            format!("keys: {}", keys.join(" ")),
            format!("left button: {left}"),
            "Esc quits, F5 reloads, hold Shift for additive text".to_string(),
        ];
        let line_height = TEXT_SIZE as i32 + 4;
        for (row, line) in lines.iter().enumerate() {
            ctx.draw_text(line, &font, 10, 10 + row as i32 * line_height, TEXT_SIZE);
        }
        Ok(())
    });

    table.on(Callback::Focus, |_, _| {
        log::info!("Focus gained.");
        Ok(())
    });
    table.on(Callback::Blur, |_, _| {
        log::info!("Focus lost.");
        Ok(())
    });
    table.on(Callback::Exit, |_, ctx| {
        ctx.print("Goodbye.\n");
        Ok(())
    });

    table
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let network = Rc::new(EventBus::<SocketEvent>::new());
    let mut host = demo_callbacks(cli.font.clone(), Rc::clone(&network));
    let mut surface = WinitSurface::new().context("failed to initialise the window system")?;

    loop {
        let config = cli.load_config()?;
        let mut frame_loop =
            FrameLoop::new(config, surface, host).with_font_loader(Box::new(AbGlyphFontLoader));

        if let Some(addr) = cli.connect {
            match TcpSocket::connect("remote", addr, CONNECT_TIMEOUT, network.sender()) {
                Ok(socket) => frame_loop
                    .context_mut()
                    .register_socket(Rc::new(RefCell::new(socket))),
                Err(e) => log::warn!("Could not connect to {addr}: {e}"),
            }
        }

        let result = frame_loop.run();
        let outcome = frame_loop.outcome();
        (surface, host) = frame_loop.into_parts();
        result?;

        if !outcome.reload_requested {
            break;
        }
        log::info!("Reload requested, restarting the loop.");
    }
    Ok(())
}
